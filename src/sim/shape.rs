//! Polygon geometry for entity outlines
//!
//! A polygon keeps its local-space outline (relative to the owner's
//! position, facing east) and a world-space cache rebuilt every tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::to_world;

/// A closed polygon with local and world-space vertices
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Polygon {
    /// Outline relative to the owner's position at angle 0
    pub local: Vec<Vec2>,
    /// Outline after rotation + translation (rebuilt by `transform`)
    #[serde(skip)]
    pub world: Vec<Vec2>,
}

impl Polygon {
    pub fn new(local: Vec<Vec2>) -> Self {
        let world = local.clone();
        Self { local, world }
    }

    /// Axis-aligned square with the given half extent
    pub fn square(half: f32) -> Self {
        Self::new(vec![
            Vec2::new(-half, -half),
            Vec2::new(half, -half),
            Vec2::new(half, half),
            Vec2::new(-half, half),
        ])
    }

    /// Rebuild the world-space cache from the local outline
    pub fn transform(&mut self, angle: f32, origin: Vec2) {
        self.world.clear();
        self.world
            .extend(self.local.iter().map(|&p| to_world(p, angle, origin)));
    }

    /// Even-odd containment test against the world-space outline
    pub fn contains(&self, point: Vec2) -> bool {
        let pts = &self.world;
        if pts.len() < 3 {
            return false;
        }

        let mut inside = false;
        let mut j = pts.len() - 1;
        for i in 0..pts.len() {
            let (a, b) = (pts[i], pts[j]);
            if (a.y > point.y) != (b.y > point.y) {
                let cross_x = (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x;
                if point.x < cross_x {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    /// True if any world vertex of `self` lies inside `other`
    pub fn has_vertex_inside(&self, other: &Polygon) -> bool {
        self.world.iter().any(|&p| other.contains(p))
    }

    /// Vertex containment checked in both directions
    ///
    /// Cheap and approximate: small fast shapes can pass through each other
    /// between ticks without either containing a vertex of the other.
    pub fn overlaps(&self, other: &Polygon) -> bool {
        self.has_vertex_inside(other) || other.has_vertex_inside(self)
    }
}
