//! Meteors: spinning squares that split when shot

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::body::{Body, Bounds};
use super::shape::Polygon;
use crate::consts::*;
use crate::heading;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meteor {
    pub id: u32,
    /// Meteor this one split from
    pub parent: Option<u32>,
    pub body: Body,
    /// Destructive hits left; at 1 or less a hit destroys it outright
    pub hits: u32,
}

impl Meteor {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, size: f32, hits: u32) -> Self {
        debug_assert!(size > 0.0, "meteor size must stay positive");
        let mut body = Body::new(pos, size, vec![Polygon::square(size)]);
        body.vel = vel;
        Self {
            id,
            parent: None,
            body,
            hits,
        }
    }

    /// Uniform speed in [0, max) along a uniform direction in [0, 2π)
    pub fn random_velocity(rng: &mut impl Rng) -> Vec2 {
        let speed = rng.random::<f32>() * METEOR_MAX_SPEED;
        let direction = rng.random::<f32>() * std::f32::consts::TAU;
        heading(direction) * speed
    }

    /// Full-size meteor on a random edge of `bounds`
    pub fn spawn_on_edge(id: u32, bounds: &Bounds, rng: &mut impl Rng) -> Self {
        let along = rng.random::<f32>();
        let pos = match rng.random_range(0..4) {
            // north
            0 => Vec2::new(bounds.x + bounds.width * along, bounds.y),
            // east
            1 => Vec2::new(bounds.right(), bounds.y + bounds.height * along),
            // south
            2 => Vec2::new(bounds.x + bounds.width * along, bounds.bottom()),
            // west
            _ => Vec2::new(bounds.x, bounds.y + bounds.height * along),
        };
        let vel = Self::random_velocity(rng);
        Self::new(id, pos, vel, METEOR_START_SIZE, METEOR_START_HITS)
    }

    #[inline]
    pub fn size(&self) -> f32 {
        self.body.size
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.body.is_dead()
    }

    /// Whether destroying this meteor leaves children behind
    pub fn splits(&self) -> bool {
        self.hits > 1
    }

    /// Children left behind when this meteor is destroyed
    ///
    /// Four quarter-size pieces centred on the quadrants around the last
    /// position, or nothing once the hit count is spent. Ids come from
    /// `next_id` so the caller owns allocation.
    pub fn split(
        &self,
        rng: &mut impl Rng,
        mut next_id: impl FnMut() -> u32,
    ) -> Vec<Meteor> {
        if !self.splits() {
            return Vec::new();
        }

        let child_size = self.size() / 2.0;
        let hits = self.hits - 1;
        let offsets = [
            Vec2::new(-child_size, -child_size),
            Vec2::new(child_size, -child_size),
            Vec2::new(-child_size, child_size),
            Vec2::new(child_size, child_size),
        ];

        offsets
            .iter()
            .map(|&offset| {
                let vel = Self::random_velocity(rng);
                let mut child = Meteor::new(next_id(), self.body.pos + offset, vel, child_size, hits);
                child.parent = Some(self.id);
                child
            })
            .collect()
    }

    /// Spin and move one tick
    pub fn drift(&mut self, bounds: &Bounds) {
        self.body.rotate(METEOR_SPIN);
        self.body.advance(Some(bounds));
    }
}

/// Swap velocities between two meteors in contact
pub fn exchange_velocities(a: &mut Meteor, b: &mut Meteor) {
    std::mem::swap(&mut a.body.vel, &mut b.body.vel);
}
