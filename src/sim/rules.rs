//! Per-mode match rules
//!
//! Evaluated once per tick after every entity has moved, before dead
//! entities are swept. Each mode decides level progression and when the
//! match is over.

use std::f32::consts::PI;

use glam::Vec2;
use rand::Rng;

use super::body::Bounds;
use super::meteor::Meteor;
use super::ship::Ship;
use super::state::{GameEvent, Outcome, Session};
use crate::consts::*;
use crate::settings::Mode;

pub fn evaluate(session: &mut Session, dt: f32, rng: &mut impl Rng) {
    match session.mode {
        Mode::Original | Mode::Cooperative => evaluate_survival(session, rng),
        Mode::Race => evaluate_race(session, dt, rng),
        Mode::Versus => evaluate_versus(session),
    }
}

/// Seed `difficulty` full-size meteors along the edges
pub fn seed_field(session: &mut Session, rng: &mut impl Rng) {
    for _ in 0..session.difficulty {
        let id = session.ids.next();
        session.meteors.push(Meteor::spawn_on_edge(id, &session.bounds, rng));
    }
    session.events.push(GameEvent::FieldReseeded {
        count: session.difficulty,
    });
}

/// No live meteor left (pending children already merged)
fn field_clear(session: &Session) -> bool {
    session.meteors.iter().all(Meteor::is_dead)
}

fn all_out_of_lives(ships: &[Ship]) -> bool {
    ships.iter().all(Ship::out_of_lives)
}

/// Original / Cooperative: clear the field to level up, lose every ship to lose
fn evaluate_survival(session: &mut Session, rng: &mut impl Rng) {
    if all_out_of_lives(&session.ships) {
        let level = session.level;
        session.finish(Outcome::Defeat { level });
        return;
    }

    if field_clear(session) {
        session.events.push(GameEvent::LevelCleared {
            level: session.level,
        });
        session.difficulty += 1;
        session.level += 1;
        log::info!(
            "Level {} cleared, next field has {} meteors",
            session.level - 1,
            session.difficulty
        );

        // Ships that died this tick come back through cleanup
        let spawn = session.spawn_point();
        for ship in session.ships.iter_mut().filter(|s| !s.is_dead()) {
            ship.respawn(spawn, 0.0);
        }
        seed_field(session, rng);
    }
}

/// Race: most kills when the clock runs out
fn evaluate_race(session: &mut Session, dt: f32, rng: &mut impl Rng) {
    let expired = match session.race_clock.as_mut() {
        Some(clock) => {
            clock.tick(dt);
            clock.expired()
        }
        None => false,
    };

    if expired || all_out_of_lives(&session.ships) {
        let outcome = race_outcome(&session.ships);
        session.finish(outcome);
        return;
    }

    if field_clear(session) {
        session.level += 1;
        seed_field(session, rng);
    }
}

/// Strictly highest kill count wins, a shared top score is a draw
pub fn race_outcome(ships: &[Ship]) -> Outcome {
    let Some(top) = ships.iter().map(|s| s.kills).max() else {
        return Outcome::Draw;
    };
    let mut leaders = ships.iter().filter(|s| s.kills == top);
    match (leaders.next(), leaders.next()) {
        (Some(ship), None) => Outcome::Winner {
            seat: ship.seat,
            ship: ship.id,
        },
        _ => Outcome::Draw,
    }
}

/// Versus: a death with no lives left ends the match, any other death
/// resets the arena
fn evaluate_versus(session: &mut Session) {
    if !session.ships.iter().any(Ship::is_dead) {
        return;
    }

    if session.ships.iter().any(Ship::out_of_lives) {
        let mut survivors = session.ships.iter().filter(|s| !s.out_of_lives());
        let outcome = match (survivors.next(), survivors.next()) {
            (Some(ship), None) => Outcome::Winner {
                seat: ship.seat,
                ship: ship.id,
            },
            _ => Outcome::Draw,
        };
        session.finish(outcome);
        return;
    }

    for ship in session.ships.iter_mut().filter(|s| s.is_dead()) {
        ship.lives -= 1;
        session.events.push(GameEvent::ShipRespawned {
            ship: ship.id,
            lives_left: ship.lives,
        });
    }
    place_for_versus(&mut session.ships, &session.bounds);
    for bullet in session.bullets.iter_mut() {
        bullet.body.mark_dead();
    }
    session.events.push(GameEvent::VersusReset);
    log::debug!("Versus round reset");
}

/// Starting spot for a seat in Versus: opposite edges, facing each other
pub fn versus_spawn(bounds: &Bounds, index: usize) -> (Vec2, f32) {
    let y = bounds.center().y;
    if index % 2 == 0 {
        (Vec2::new(bounds.x + VERSUS_EDGE_MARGIN, y), 0.0)
    } else {
        (Vec2::new(bounds.right() - VERSUS_EDGE_MARGIN, y), PI)
    }
}

/// Put every ship back on its edge with fresh protection
pub fn place_for_versus(ships: &mut [Ship], bounds: &Bounds) {
    for (index, ship) in ships.iter_mut().enumerate() {
        let (pos, angle) = versus_spawn(bounds, index);
        ship.respawn(pos, angle);
    }
}
