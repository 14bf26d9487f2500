//! Shared physics record for every entity
//!
//! Position, velocity, facing and the polygon set live here; entity kinds
//! embed a `Body` and add their own payload on top.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::shape::Polygon;
use crate::normalize_angle;

/// Axis-aligned play area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(0.0, 0.0, 800.0, 600.0)
    }
}

/// Position, motion, facing and outline of one entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Facing angle in radians, kept in [0, 2π)
    angle: f32,
    /// Half extent, also the margin used by the wrap test
    pub size: f32,
    /// Ordered polygon set
    pub shapes: Vec<Polygon>,
    /// Index of the polygon other entities collide against
    hitbox: usize,
    dead: bool,
}

impl Body {
    pub fn new(pos: Vec2, size: f32, shapes: Vec<Polygon>) -> Self {
        let mut body = Self {
            pos,
            vel: Vec2::ZERO,
            angle: 0.0,
            size,
            shapes,
            hitbox: 0,
            dead: false,
        };
        body.refresh_shapes();
        body
    }

    /// Pick which polygon is used for collisions (defaults to the first)
    pub fn with_hitbox(mut self, index: usize) -> Self {
        self.hitbox = index.min(self.shapes.len().saturating_sub(1));
        self
    }

    #[inline]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Set the facing angle and rebuild the outline to match
    pub fn set_angle(&mut self, angle: f32) {
        self.angle = normalize_angle(angle);
        self.refresh_shapes();
    }

    pub fn rotate(&mut self, delta: f32) {
        self.set_angle(self.angle + delta);
    }

    pub fn mark_dead(&mut self) {
        self.dead = true;
    }

    pub fn revive(&mut self) {
        self.dead = false;
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn hitbox(&self) -> &Polygon {
        &self.shapes[self.hitbox]
    }

    pub fn distance(&self, other: &Body) -> f32 {
        self.pos.distance(other.pos)
    }

    /// Integrate one tick of motion
    ///
    /// Moves by velocity, wraps to the opposite edge when leaving `bounds`
    /// while still heading out, normalizes the facing angle and rebuilds
    /// every polygon's world-space outline.
    pub fn advance(&mut self, bounds: Option<&Bounds>) {
        self.pos += self.vel;

        if let Some(bounds) = bounds {
            self.wrap(bounds);
        }

        self.angle = normalize_angle(self.angle);
        self.refresh_shapes();
    }

    /// Teleport (respawn) and rebuild the outline without moving
    pub fn place(&mut self, pos: Vec2, angle: f32) {
        self.pos = pos;
        self.vel = Vec2::ZERO;
        self.angle = normalize_angle(angle);
        self.refresh_shapes();
    }

    fn wrap(&mut self, bounds: &Bounds) {
        if self.pos.x - self.size < bounds.x && self.vel.x < 0.0 {
            self.pos.x = bounds.right();
        }
        if self.pos.x + self.size > bounds.right() && self.vel.x > 0.0 {
            self.pos.x = bounds.x;
        }
        if self.pos.y - self.size < bounds.y && self.vel.y < 0.0 {
            self.pos.y = bounds.bottom();
        }
        if self.pos.y + self.size > bounds.bottom() && self.vel.y > 0.0 {
            self.pos.y = bounds.y;
        }
    }

    fn refresh_shapes(&mut self) {
        for shape in &mut self.shapes {
            shape.transform(self.angle, self.pos);
        }
    }

    /// Any polygon of either body has a vertex inside a polygon of the other
    pub fn collides_with(&self, other: &Body) -> bool {
        self.shapes
            .iter()
            .any(|a| other.shapes.iter().any(|b| a.overlaps(b)))
    }

    /// Hitbox against hitbox only (ships ignore their thrust flame)
    pub fn hitbox_collides(&self, other: &Body) -> bool {
        self.hitbox().overlaps(other.hitbox())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::{FRAC_PI_2, TAU};

    fn square_body(pos: Vec2, half: f32) -> Body {
        Body::new(pos, half, vec![Polygon::square(half)])
    }

    fn arena() -> Bounds {
        Bounds::new(0.0, 0.0, 800.0, 600.0)
    }

    #[test]
    fn test_wrap_left_edge_moving_left() {
        let mut body = square_body(Vec2::new(5.0, 300.0), 5.0);
        body.vel = Vec2::new(-2.0, 0.0);
        body.advance(Some(&arena()));
        assert_eq!(body.pos.x, 800.0);
        assert_eq!(body.pos.y, 300.0);
    }

    #[test]
    fn test_wrap_all_edges() {
        let bounds = arena();

        let mut right = square_body(Vec2::new(796.0, 300.0), 5.0);
        right.vel = Vec2::new(2.0, 0.0);
        right.advance(Some(&bounds));
        assert_eq!(right.pos.x, 0.0);

        let mut top = square_body(Vec2::new(400.0, 4.0), 5.0);
        top.vel = Vec2::new(0.0, -1.0);
        top.advance(Some(&bounds));
        assert_eq!(top.pos.y, 600.0);

        let mut bottom = square_body(Vec2::new(400.0, 597.0), 5.0);
        bottom.vel = Vec2::new(0.0, 1.0);
        bottom.advance(Some(&bounds));
        assert_eq!(bottom.pos.y, 0.0);
    }

    #[test]
    fn test_inward_motion_at_edge_is_not_wrapped() {
        let mut body = square_body(Vec2::new(2.0, 2.0), 5.0);
        body.vel = Vec2::new(1.0, 1.0);
        body.advance(Some(&arena()));
        assert_eq!(body.pos, Vec2::new(3.0, 3.0));
    }

    #[test]
    fn test_no_bounds_no_wrap() {
        let mut body = square_body(Vec2::new(1.0, 1.0), 5.0);
        body.vel = Vec2::new(-10.0, -10.0);
        body.advance(None);
        assert_eq!(body.pos, Vec2::new(-9.0, -9.0));
    }

    #[test]
    fn test_advance_rebuilds_world_outline() {
        let mut body = Body::new(
            Vec2::ZERO,
            10.0,
            vec![Polygon::new(vec![Vec2::new(10.0, 0.0), Vec2::ZERO, Vec2::new(0.0, 5.0)])],
        );
        body.vel = Vec2::new(100.0, 0.0);
        body.set_angle(FRAC_PI_2 + TAU);
        body.advance(None);
        assert!((body.angle() - FRAC_PI_2).abs() < 1e-5);
        let tip = body.shapes[0].world[0];
        assert!((tip.x - 100.0).abs() < 1e-4);
        assert!((tip.y - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_rotate_normalizes_and_turns_outline() {
        let mut body = Body::new(
            Vec2::new(50.0, 50.0),
            10.0,
            vec![Polygon::new(vec![Vec2::new(10.0, 0.0), Vec2::ZERO, Vec2::new(0.0, 5.0)])],
        );
        body.rotate(-FRAC_PI_2);
        assert!((body.angle() - (TAU - FRAC_PI_2)).abs() < 1e-5);
        let tip = body.shapes[0].world[0];
        assert!((tip.x - 50.0).abs() < 1e-4);
        assert!((tip.y - 40.0).abs() < 1e-4);
    }

    #[test]
    fn test_collides_with() {
        let a = square_body(Vec2::new(100.0, 100.0), 10.0);
        let b = square_body(Vec2::new(115.0, 105.0), 10.0);
        let c = square_body(Vec2::new(200.0, 100.0), 10.0);
        assert!(a.collides_with(&b));
        assert!(!a.collides_with(&c));
    }

    #[test]
    fn test_hitbox_selects_polygon() {
        let body = Body::new(
            Vec2::ZERO,
            10.0,
            vec![Polygon::square(50.0), Polygon::square(2.0)],
        )
        .with_hitbox(1);
        let probe = square_body(Vec2::new(30.0, 0.0), 1.0);
        assert!(body.collides_with(&probe));
        assert!(!body.hitbox_collides(&probe));
    }

    #[test]
    fn test_dead_flag_is_logical_only() {
        let mut body = square_body(Vec2::new(10.0, 10.0), 2.0);
        body.mark_dead();
        assert!(body.is_dead());
        body.revive();
        assert!(!body.is_dead());
    }

    proptest! {
        #[test]
        fn advance_keeps_angle_in_range(theta in -100.0f32..100.0) {
            let mut body = square_body(Vec2::new(400.0, 300.0), 5.0);
            body.set_angle(theta);
            body.advance(Some(&arena()));
            prop_assert!(body.angle() >= 0.0 && body.angle() < TAU);
        }

        #[test]
        fn wrapped_position_stays_in_bounds_when_moving_out(
            x in 0.0f32..800.0,
            y in 0.0f32..600.0,
            vx in -8.0f32..8.0,
            vy in -8.0f32..8.0,
        ) {
            let bounds = arena();
            let mut body = square_body(Vec2::new(x, y), 5.0);
            body.vel = Vec2::new(vx, vy);
            body.advance(Some(&bounds));
            // Anything past an edge while still heading outward was relocated
            prop_assert!(!(body.pos.x < bounds.x && body.vel.x < 0.0));
            prop_assert!(!(body.pos.x > bounds.right() && body.vel.x > 0.0));
            prop_assert!(!(body.pos.y < bounds.y && body.vel.y < 0.0));
            prop_assert!(!(body.pos.y > bounds.bottom() && body.vel.y > 0.0));
        }
    }
}
