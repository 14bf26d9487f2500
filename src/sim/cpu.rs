//! Cpu pilot
//!
//! Pure decision logic evaluated fresh every tick: classify each candidate
//! by distance into a stance, keep the most urgent one, turn toward (or away
//! from) it and only act once the nose is exactly on the bearing.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Body;
use crate::consts::*;
use crate::normalize_angle;

/// What the cpu wants to do about a candidate, lowest priority first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stance {
    /// Nothing in range, close the distance
    Approach,
    /// In fire range, shoot it
    Attack,
    /// Inside the death radius, run
    Escape,
}

impl Stance {
    fn turn_rate(&self) -> f32 {
        match self {
            Stance::Escape => CPU_ESCAPE_TURN_RATE,
            Stance::Attack | Stance::Approach => CPU_TURN_RATE,
        }
    }
}

/// Something the cpu could react to (a meteor, or an opposing ship)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub id: u32,
    pub pos: Vec2,
    pub size: f32,
}

/// The pick for this tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub target: u32,
    pub stance: Stance,
    pub distance: f32,
    /// Bearing to face, in [0, 2π)
    pub destination: f32,
}

/// Orders produced for the ship after steering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Orders {
    pub speeding: bool,
    pub fire: bool,
}

/// Classify one candidate at `distance`
///
/// `exposed` is true when the ship has no spawn protection (or it is about
/// to run out). Approach is only offered while the fire budget remains.
pub fn classify(
    own_size: f32,
    candidate_size: f32,
    distance: f32,
    exposed: bool,
    can_fire: bool,
) -> Option<Stance> {
    let within = |factor: f32| distance <= candidate_size * factor || distance <= own_size * factor;

    if exposed && within(DEATH_RANGE_FACTOR) {
        Some(Stance::Escape)
    } else if within(FIRE_RANGE_FACTOR) {
        Some(Stance::Attack)
    } else if can_fire {
        Some(Stance::Approach)
    } else {
        None
    }
}

/// Pick the most urgent candidate
///
/// Higher stances always win; within one stance a strictly smaller distance
/// wins, so the earliest of equally distant candidates is kept.
pub fn select(classified: impl IntoIterator<Item = (u32, Stance, f32)>) -> Option<(u32, Stance, f32)> {
    let mut best: Option<(u32, Stance, f32)> = None;
    for (id, stance, distance) in classified {
        let better = match best {
            None => true,
            Some((_, best_stance, best_distance)) => {
                stance > best_stance || (stance == best_stance && distance < best_distance)
            }
        };
        if better {
            best = Some((id, stance, distance));
        }
    }
    best
}

/// Bearing from `from` to `to`, reversed when fleeing, in [0, 2π)
pub fn bearing(from: Vec2, to: Vec2, flee: bool) -> f32 {
    let delta = to - from;
    let mut angle = delta.y.atan2(delta.x);
    if flee {
        angle += std::f32::consts::PI;
    }
    normalize_angle(angle)
}

/// Step `angle` toward `destination` by at most `rate`, landing exactly on
/// it once within one step
pub fn turn_toward(angle: f32, destination: f32, rate: f32) -> f32 {
    if angle < destination {
        (angle + rate).min(destination)
    } else if angle > destination {
        (angle - rate).max(destination)
    } else {
        angle
    }
}

/// Cpu control strategy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CpuBrain {
    thrust: f32,
}

impl Default for CpuBrain {
    fn default() -> Self {
        Self { thrust: CPU_THRUST }
    }
}

impl CpuBrain {
    pub fn thrust(&self) -> f32 {
        self.thrust
    }

    /// Decide, steer `body` and return what the ship should do this tick
    pub fn think(
        &self,
        body: &mut Body,
        exposed: bool,
        can_fire: bool,
        candidates: &[Candidate],
    ) -> Orders {
        let mut orders = Orders::default();

        let classified = candidates.iter().filter_map(|c| {
            let distance = body.pos.distance(c.pos);
            classify(body.size, c.size, distance, exposed, can_fire).map(|s| (c.id, s, distance))
        });

        let Some((target, stance, distance)) = select(classified) else {
            return orders;
        };
        let Some(target_pos) = candidates.iter().find(|c| c.id == target).map(|c| c.pos) else {
            return orders;
        };

        let decision = Decision {
            target,
            stance,
            distance,
            destination: bearing(body.pos, target_pos, stance == Stance::Escape),
        };

        let angle = turn_toward(body.angle(), decision.destination, stance.turn_rate());
        body.set_angle(angle);

        if angle == decision.destination {
            match stance {
                Stance::Escape | Stance::Approach => orders.speeding = true,
                Stance::Attack => orders.fire = can_fire,
            }
        }

        log::trace!("cpu {decision:?} -> {orders:?}");
        orders
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::shape::Polygon;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn body_at(pos: Vec2, angle: f32) -> Body {
        let mut body = Body::new(pos, SHIP_SIZE, vec![Polygon::square(5.0)]);
        body.set_angle(angle);
        body
    }

    #[test]
    fn test_escape_beats_closer_attack() {
        // Hazard at 5 (escape), target at 2 (attack): escape wins regardless
        let picked = select([(1, Stance::Escape, 5.0), (2, Stance::Attack, 2.0)]);
        assert_eq!(picked, Some((1, Stance::Escape, 5.0)));

        let picked = select([(2, Stance::Attack, 2.0), (1, Stance::Escape, 5.0)]);
        assert_eq!(picked, Some((1, Stance::Escape, 5.0)));
    }

    #[test]
    fn test_select_nearest_within_stance_first_wins_ties() {
        let picked = select([
            (1, Stance::Attack, 40.0),
            (2, Stance::Attack, 30.0),
            (3, Stance::Attack, 30.0),
            (4, Stance::Approach, 1.0),
        ]);
        assert_eq!(picked, Some((2, Stance::Attack, 30.0)));
        assert_eq!(select(Vec::new()), None);
    }

    #[test]
    fn test_classify_ranges() {
        let size = SHIP_SIZE;
        // death radius = 15 * 6 = 90, fire radius = 15 * 10 = 150 for a small meteor
        assert_eq!(classify(size, 1.0, 80.0, true, true), Some(Stance::Escape));
        assert_eq!(classify(size, 1.0, 80.0, false, true), Some(Stance::Attack));
        assert_eq!(classify(size, 1.0, 120.0, true, true), Some(Stance::Attack));
        assert_eq!(classify(size, 1.0, 200.0, true, true), Some(Stance::Approach));
        assert_eq!(classify(size, 1.0, 200.0, true, false), None);
        // a big meteor widens the radius: 30 * 6 = 180
        assert_eq!(classify(size, 30.0, 170.0, true, true), Some(Stance::Escape));
    }

    #[test]
    fn test_bearing_quadrants() {
        let origin = Vec2::new(100.0, 100.0);
        assert!((bearing(origin, Vec2::new(200.0, 100.0), false) - 0.0).abs() < 1e-6);
        assert!((bearing(origin, Vec2::new(100.0, 200.0), false) - FRAC_PI_2).abs() < 1e-6);
        assert!((bearing(origin, Vec2::new(0.0, 100.0), false) - PI).abs() < 1e-6);
        // Fleeing faces directly away
        assert!((bearing(origin, Vec2::new(200.0, 100.0), true) - PI).abs() < 1e-6);
        assert!((bearing(origin, Vec2::new(0.0, 100.0), true) - 0.0).abs() < 1e-6);
    }

    #[test]
    fn test_turn_toward_caps_and_snaps() {
        assert_eq!(turn_toward(0.0, 1.0, 0.25), 0.25);
        assert_eq!(turn_toward(0.9, 1.0, 0.25), 1.0);
        assert_eq!(turn_toward(2.0, 1.0, 0.25), 1.75);
        assert_eq!(turn_toward(1.1, 1.0, 0.25), 1.0);
        assert_eq!(turn_toward(1.0, 1.0, 0.25), 1.0);
    }

    #[test]
    fn test_no_action_while_turning() {
        let brain = CpuBrain::default();
        // Target straight behind: needs many ticks to come about
        let mut body = body_at(Vec2::new(400.0, 300.0), 0.0);
        let candidates = [Candidate {
            id: 7,
            pos: Vec2::new(300.0, 300.0),
            size: 30.0,
        }];
        let orders = brain.think(&mut body, false, true, &candidates);
        assert_eq!(orders, Orders::default());
        assert!((body.angle() - CPU_TURN_RATE).abs() < 1e-6);
    }

    #[test]
    fn test_attack_fires_when_aligned() {
        let brain = CpuBrain::default();
        let mut body = body_at(Vec2::new(400.0, 300.0), 0.0);
        let candidates = [Candidate {
            id: 7,
            pos: Vec2::new(520.0, 300.0),
            size: 1.0,
        }];
        let orders = brain.think(&mut body, false, true, &candidates);
        assert!(orders.fire);
        assert!(!orders.speeding);

        // Out of budget: still aligned, but no shot
        let orders = brain.think(&mut body, false, false, &candidates);
        assert!(!orders.fire);
    }

    #[test]
    fn test_escape_thrusts_away_when_aligned() {
        let brain = CpuBrain::default();
        // Hazard directly behind, ship already facing away
        let mut body = body_at(Vec2::new(400.0, 300.0), 0.0);
        let candidates = [Candidate {
            id: 3,
            pos: Vec2::new(350.0, 300.0),
            size: 30.0,
        }];
        let orders = brain.think(&mut body, true, true, &candidates);
        assert!(orders.speeding);
        assert!(!orders.fire);
    }

    #[test]
    fn test_approach_thrusts_toward_far_target() {
        let brain = CpuBrain::default();
        let mut body = body_at(Vec2::new(100.0, 300.0), 0.0);
        let candidates = [Candidate {
            id: 3,
            pos: Vec2::new(700.0, 300.0),
            size: 30.0,
        }];
        let orders = brain.think(&mut body, true, true, &candidates);
        assert!(orders.speeding);
    }
}
