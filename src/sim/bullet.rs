//! Bullets fired by ships

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{Body, Bounds};
use super::shape::Polygon;
use super::timer::Countdown;
use crate::consts::*;
use crate::heading;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    /// Ship that fired this bullet (kill credit, self-hit exclusion)
    pub owner: u32,
    pub body: Body,
    life: Countdown,
}

impl Bullet {
    /// Spawn at the firer's position, moving at bullet speed along its
    /// facing plus the firer's own velocity
    pub fn fire(id: u32, owner: u32, from: &Body) -> Self {
        let mut body = Body::new(from.pos, BULLET_SIZE, vec![Polygon::square(BULLET_SIZE)]);
        body.vel = heading(from.angle()) * BULLET_SPEED + from.vel;
        body.set_angle(from.angle());
        Self {
            id,
            owner,
            body,
            life: Countdown::new(BULLET_LIFETIME_SECS),
        }
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.body.is_dead()
    }

    pub fn is_live_from(&self, owner: u32) -> bool {
        self.owner == owner && !self.is_dead()
    }

    /// Move one tick, then burn `dt` of lifetime; dies once it has lived
    /// its full duration
    pub fn fly(&mut self, bounds: &Bounds, dt: f32) {
        self.body.advance(Some(bounds));
        self.life.tick(dt);
        if self.life.expired() {
            self.body.mark_dead();
        }
    }

    pub fn age(&self) -> f32 {
        self.life.elapsed()
    }
}

/// Count of `owner`'s bullets still in flight
pub fn live_count<'a>(bullets: impl IntoIterator<Item = &'a Bullet>, owner: u32) -> usize {
    bullets
        .into_iter()
        .filter(|b| b.is_live_from(owner))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shooter(angle: f32, vel: Vec2) -> Body {
        let mut body = Body::new(Vec2::new(400.0, 300.0), SHIP_SIZE, vec![Polygon::square(5.0)]);
        body.set_angle(angle);
        body.vel = vel;
        body
    }

    #[test]
    fn test_fire_adds_firer_velocity() {
        let from = shooter(0.0, Vec2::new(1.0, 2.0));
        let bullet = Bullet::fire(5, 1, &from);
        assert_eq!(bullet.owner, 1);
        assert_eq!(bullet.body.pos, from.pos);
        assert!((bullet.body.vel.x - (BULLET_SPEED + 1.0)).abs() < 1e-5);
        assert!((bullet.body.vel.y - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_fire_follows_facing() {
        let from = shooter(std::f32::consts::PI, Vec2::ZERO);
        let bullet = Bullet::fire(5, 1, &from);
        assert!((bullet.body.vel.x + BULLET_SPEED).abs() < 1e-5);
        assert!(bullet.body.vel.y.abs() < 1e-4);
    }

    #[test]
    fn test_bullet_dies_exactly_at_lifetime() {
        let bounds = Bounds::default();
        let mut bullet = Bullet::fire(5, 1, &shooter(0.0, Vec2::ZERO));
        bullet.fly(&bounds, 0.5);
        bullet.fly(&bounds, 0.5);
        assert!(!bullet.is_dead(), "died early at {}", bullet.age());
        bullet.fly(&bounds, 0.5);
        assert!(bullet.is_dead());
    }

    #[test]
    fn test_live_count_ignores_dead_and_foreign() {
        let from = shooter(0.0, Vec2::ZERO);
        let mut bullets = vec![
            Bullet::fire(1, 7, &from),
            Bullet::fire(2, 7, &from),
            Bullet::fire(3, 8, &from),
        ];
        bullets[1].body.mark_dead();
        assert_eq!(live_count(&bullets, 7), 1);
        assert_eq!(live_count(&bullets, 8), 1);
        assert_eq!(live_count(&bullets, 9), 0);
    }
}
