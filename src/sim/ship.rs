//! Player ships
//!
//! One ship type with two control strategies: a human reading the input
//! snapshot and a cpu brain. Physics, lives, kills, spawn protection and
//! the bullet budget are shared.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{Body, Bounds};
use super::cpu::CpuBrain;
use super::meteor::Meteor;
use super::shape::Polygon;
use super::tick::{Keys, TickInput};
use super::timer::Countdown;
use crate::consts::*;
use crate::heading;

/// Which player slot a ship occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Seat {
    One,
    Two,
}

impl Seat {
    pub fn label(&self) -> &'static str {
        match self {
            Seat::One => "Player 1",
            Seat::Two => "Player 2",
        }
    }
}

/// Held-key state for a human pilot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HumanControl {
    turning_left: bool,
    turning_right: bool,
    thrusting: bool,
}

impl HumanControl {
    /// Fold this tick's press/release edges into held state
    ///
    /// A press and release of the same key within one tick cancel out.
    /// Returns true when fire was pressed this tick.
    pub fn apply(&mut self, input: &TickInput) -> bool {
        let (pressed, released) = (&input.pressed, &input.released);

        self.turning_left = (self.turning_left || pressed.turn_left) && !released.turn_left;
        self.turning_right = (self.turning_right || pressed.turn_right) && !released.turn_right;
        self.thrusting = (self.thrusting || pressed.thrust) && !released.thrust;

        pressed.fire
    }

    /// Let go of any held key in `released`; used while presses are ignored
    pub fn release(&mut self, released: &Keys) {
        self.turning_left &= !released.turn_left;
        self.turning_right &= !released.turn_right;
        self.thrusting &= !released.thrust;
    }

    /// Net steering this tick: -1 left, +1 right, 0 none
    pub fn steer(&self) -> f32 {
        match (self.turning_left, self.turning_right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }

    pub fn thrusting(&self) -> bool {
        self.thrusting
    }
}

/// Control strategy attached to a ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Pilot {
    Human(HumanControl),
    Cpu(CpuBrain),
}

impl Pilot {
    pub fn is_human(&self) -> bool {
        matches!(self, Pilot::Human(_))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub id: u32,
    pub seat: Seat,
    /// Polygon 0 is the thrust flame, polygon 1 the hull
    pub body: Body,
    pub pilot: Pilot,
    /// Spare lives; a death with none left takes the ship out of play
    pub lives: u32,
    pub kills: u32,
    pub bullet_limit: usize,
    /// Asserted while accelerating
    pub speeding: bool,
    shield: Countdown,
}

impl Ship {
    pub fn new(id: u32, seat: Seat, pos: Vec2, pilot: Pilot, lives: u32) -> Self {
        let half = (SHIP_SIZE / 2.0).floor();
        let flame = Polygon::new(vec![
            Vec2::new(-SHIP_SIZE, 0.0),
            Vec2::new(0.0, -(SHIP_SIZE / 4.0).floor()),
            Vec2::new(0.0, (SHIP_SIZE / 4.0).floor()),
        ]);
        let hull = Polygon::new(vec![
            Vec2::new(SHIP_SIZE, 0.0),
            Vec2::new(-half, -half),
            Vec2::new(0.0, 0.0),
            Vec2::new(-half, half),
        ]);

        Self {
            id,
            seat,
            body: Body::new(pos, SHIP_SIZE, vec![flame, hull]).with_hitbox(1),
            pilot,
            lives,
            kills: 0,
            bullet_limit: BULLET_LIMIT,
            speeding: false,
            shield: Countdown::new(INVINCIBILITY_SECS),
        }
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.body.is_dead()
    }

    /// Dead with no spare lives left
    pub fn out_of_lives(&self) -> bool {
        self.is_dead() && self.lives == 0
    }

    #[inline]
    pub fn is_invincible(&self) -> bool {
        !self.shield.expired()
    }

    /// Unprotected, or protection about to run out
    pub fn is_exposed(&self) -> bool {
        !self.is_invincible() || self.shield.remaining_below(INVINCIBILITY_EXPIRING_SECS)
    }

    pub fn shield_remaining(&self) -> f32 {
        self.shield.remaining()
    }

    pub fn drop_shield(&mut self) {
        self.shield = Countdown::expired_new(INVINCIBILITY_SECS);
    }

    pub fn add_kill(&mut self) {
        self.kills += 1;
    }

    /// Acceleration per tick while speeding
    pub fn thrust(&self) -> f32 {
        match &self.pilot {
            Pilot::Human(_) => HUMAN_THRUST,
            Pilot::Cpu(brain) => brain.thrust(),
        }
    }

    pub fn can_fire(&self, live_bullets: usize) -> bool {
        live_bullets < self.bullet_limit
    }

    /// Spawn protection, meteor contact, thrust/drag and motion for one tick
    ///
    /// Returns false if the ship died on contact; it then skips motion.
    pub fn update_standard(&mut self, meteors: &[Meteor], bounds: &Bounds, dt: f32) -> bool {
        if self.is_invincible() {
            self.shield.tick(dt);
        } else if meteors
            .iter()
            .filter(|m| !m.is_dead())
            .any(|m| self.body.hitbox_collides(&m.body))
        {
            self.body.mark_dead();
            log::debug!("{} ship {} hit a meteor", self.seat.label(), self.id);
            return false;
        }

        self.apply_thrust();
        self.body.advance(Some(bounds));
        true
    }

    /// Accelerate along the facing while speeding; drag always applies
    pub fn apply_thrust(&mut self) {
        if self.speeding {
            self.body.vel += heading(self.body.angle()) * self.thrust();
        }
        self.body.vel *= SHIP_DRAG;
    }

    /// Back in play at `pos` with fresh protection
    pub fn respawn(&mut self, pos: Vec2, angle: f32) {
        self.body.place(pos, angle);
        self.body.revive();
        self.shield.reset();
        self.speeding = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn human_ship() -> Ship {
        Ship::new(
            1,
            Seat::One,
            Vec2::new(400.0, 300.0),
            Pilot::Human(HumanControl::default()),
            3,
        )
    }

    fn press(keys: Keys) -> TickInput {
        TickInput {
            pressed: keys,
            ..Default::default()
        }
    }

    fn release(keys: Keys) -> TickInput {
        TickInput {
            released: keys,
            ..Default::default()
        }
    }

    #[test]
    fn test_drag_applies_without_thrust() {
        let mut ship = human_ship();
        ship.body.vel = Vec2::new(2.0, 0.0);
        ship.apply_thrust();
        assert!((ship.body.vel.x - 2.0 * SHIP_DRAG).abs() < 1e-6);
    }

    #[test]
    fn test_thrust_along_facing() {
        let mut ship = human_ship();
        ship.speeding = true;
        ship.apply_thrust();
        assert!((ship.body.vel.x - HUMAN_THRUST * SHIP_DRAG).abs() < 1e-6);
        assert_eq!(ship.body.vel.y, 0.0);
    }

    #[test]
    fn test_bullet_budget() {
        let ship = human_ship();
        assert_eq!(ship.bullet_limit, BULLET_LIMIT);
        let mut limited = human_ship();
        limited.bullet_limit = 3;
        assert!(limited.can_fire(2));
        assert!(!limited.can_fire(3));
        assert!(ship.can_fire(3));
    }

    #[test]
    fn test_hull_is_hitbox_not_flame() {
        let ship = human_ship();
        // Flame points backward to -SIZE, the hull forward to +SIZE
        let hitbox = ship.body.hitbox();
        assert!(hitbox.world.iter().any(|p| (p.x - 415.0).abs() < 1e-4));
        assert!(hitbox.world.iter().all(|p| p.x > 390.0));
    }

    #[test]
    fn test_spawn_protection_blocks_meteor_contact() {
        let mut ship = human_ship();
        let meteor = Meteor::new(9, ship.body.pos, Vec2::ZERO, 30.0, 3);
        let bounds = Bounds::default();

        assert!(ship.update_standard(std::slice::from_ref(&meteor), &bounds, 0.1));
        assert!(!ship.is_dead());

        ship.drop_shield();
        assert!(!ship.update_standard(std::slice::from_ref(&meteor), &bounds, 0.1));
        assert!(ship.is_dead());
    }

    #[test]
    fn test_dead_meteor_is_ignored() {
        let mut ship = human_ship();
        ship.drop_shield();
        let mut meteor = Meteor::new(9, ship.body.pos, Vec2::ZERO, 30.0, 3);
        meteor.body.mark_dead();
        assert!(ship.update_standard(&[meteor], &Bounds::default(), 0.1));
    }

    #[test]
    fn test_shield_expiry_window() {
        let mut ship = human_ship();
        assert!(ship.is_invincible());
        assert!(!ship.is_exposed());
        let bounds = Bounds::default();
        ship.update_standard(&[], &bounds, INVINCIBILITY_SECS - 0.25);
        assert!(ship.is_invincible());
        assert!(ship.is_exposed());
        ship.update_standard(&[], &bounds, 0.25);
        assert!(!ship.is_invincible());
    }

    #[test]
    fn test_human_release_stops_motion_immediately() {
        let mut control = HumanControl::default();
        control.apply(&press(Keys {
            turn_left: true,
            thrust: true,
            ..Default::default()
        }));
        assert_eq!(control.steer(), -1.0);
        assert!(control.thrusting());

        // Held keys persist across ticks with no new edges
        control.apply(&TickInput::default());
        assert_eq!(control.steer(), -1.0);

        control.apply(&release(Keys {
            turn_left: true,
            thrust: true,
            ..Default::default()
        }));
        assert_eq!(control.steer(), 0.0);
        assert!(!control.thrusting());
    }

    #[test]
    fn test_release_only_drops_held_keys() {
        let mut control = HumanControl::default();
        control.apply(&press(Keys {
            turn_right: true,
            thrust: true,
            ..Default::default()
        }));
        control.release(&Keys {
            thrust: true,
            ..Default::default()
        });
        assert!(!control.thrusting());
        assert_eq!(control.steer(), 1.0);
    }

    #[test]
    fn test_human_fire_is_one_shot_per_press() {
        let mut control = HumanControl::default();
        assert!(control.apply(&press(Keys {
            fire: true,
            ..Default::default()
        })));
        assert!(!control.apply(&TickInput::default()));
    }

    #[test]
    fn test_respawn_restores_protection() {
        let mut ship = human_ship();
        ship.drop_shield();
        ship.body.vel = Vec2::new(3.0, 3.0);
        ship.body.mark_dead();
        ship.respawn(Vec2::new(10.0, 20.0), 0.0);
        assert!(!ship.is_dead());
        assert!(ship.is_invincible());
        assert_eq!(ship.body.pos, Vec2::new(10.0, 20.0));
        assert_eq!(ship.body.vel, Vec2::ZERO);
    }
}
