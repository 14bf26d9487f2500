//! Triangle generation for world-space polygons

use glam::Vec2;

use super::vertex::Vertex;

/// Outline thickness used for stroked (protected) entities
pub const STROKE_WIDTH: f32 = 1.5;

/// Filled polygon as a triangle fan from the first vertex
///
/// Exact for convex outlines and for the ship arrow, whose nose sees every
/// other vertex.
pub fn polygon_fill(points: &[Vec2], color: [f32; 4]) -> Vec<Vertex> {
    if points.len() < 3 {
        return Vec::new();
    }

    let mut vertices = Vec::with_capacity((points.len() - 2) * 3);
    let anchor = points[0];
    for pair in points[1..].windows(2) {
        vertices.push(Vertex::new(anchor.x, anchor.y, color));
        vertices.push(Vertex::new(pair[0].x, pair[0].y, color));
        vertices.push(Vertex::new(pair[1].x, pair[1].y, color));
    }
    vertices
}

/// Closed outline, one quad per edge
pub fn polygon_outline(points: &[Vec2], width: f32, color: [f32; 4]) -> Vec<Vertex> {
    if points.len() < 2 {
        return Vec::new();
    }

    let half = width / 2.0;
    let mut vertices = Vec::with_capacity(points.len() * 6);

    for (i, &a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        let dir = (b - a).normalize_or_zero();
        // Perpendicular for width
        let perp = Vec2::new(-dir.y, dir.x) * half;

        let (a1, a2) = (a + perp, a - perp);
        let (b1, b2) = (b + perp, b - perp);

        // Two triangles
        vertices.push(Vertex::new(a1.x, a1.y, color));
        vertices.push(Vertex::new(a2.x, a2.y, color));
        vertices.push(Vertex::new(b1.x, b1.y, color));

        vertices.push(Vertex::new(b1.x, b1.y, color));
        vertices.push(Vertex::new(a2.x, a2.y, color));
        vertices.push(Vertex::new(b2.x, b2.y, color));
    }

    vertices
}
