//! Fixed timestep simulation tick
//!
//! One call advances the session by one tick in a fixed order: ships,
//! meteors, bullets, mode rules, cleanup. Spawns made during a pass are
//! buffered and merged once that pass is done.

use rand::Rng;

use super::bullet::{Bullet, live_count};
use super::cpu::Candidate;
use super::meteor::exchange_velocities;
use super::rules;
use super::ship::Pilot;
use super::state::{GameEvent, GamePhase, Session};
use crate::consts::*;
use crate::settings::Mode;

/// Keys that changed this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Keys {
    pub turn_left: bool,
    pub turn_right: bool,
    pub thrust: bool,
    pub fire: bool,
    /// Menu / escape (pause toggle)
    pub menu: bool,
}

/// Input edges for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub pressed: Keys,
    pub released: Keys,
}

/// Advance the session by one fixed timestep
pub fn tick(session: &mut Session, input: &TickInput, dt: f32, rng: &mut impl Rng) {
    // Handle pause toggle
    if input.pressed.menu {
        match session.phase {
            GamePhase::Playing => {
                session.phase = GamePhase::Paused;
                log::debug!("Paused at tick {}", session.time_ticks);
                release_held_keys(session, &input.released);
                return;
            }
            GamePhase::Paused => session.phase = GamePhase::Playing,
            GamePhase::GameOver => {}
        }
    }

    if matches!(session.phase, GamePhase::Paused | GamePhase::GameOver) {
        // Presses are ignored while frozen, releases still count
        release_held_keys(session, &input.released);
        return;
    }

    let dt = if dt < 0.0 {
        log::warn!("Negative tick duration {dt}, treating as zero");
        0.0
    } else {
        dt
    };

    session.time_ticks += 1;

    update_ships(session, input, dt);
    session.merge_pending();

    update_meteors(session);

    update_bullets(session, dt, rng);
    session.merge_pending();

    rules::evaluate(session, dt, rng);

    cleanup(session);
}

fn release_held_keys(session: &mut Session, released: &Keys) {
    for ship in session.ships.iter_mut() {
        if let Pilot::Human(control) = &mut ship.pilot {
            control.release(released);
        }
    }
}

/// What a ship's cpu pilot can react to
fn candidates_for(session: &Session, index: usize) -> Vec<Candidate> {
    if session.mode == Mode::Versus {
        session
            .ships
            .iter()
            .enumerate()
            .filter(|(i, s)| *i != index && !s.is_dead())
            .map(|(_, s)| Candidate {
                id: s.id,
                pos: s.body.pos,
                size: s.body.size,
            })
            .collect()
    } else {
        session
            .meteors
            .iter()
            .filter(|m| !m.is_dead())
            .map(|m| Candidate {
                id: m.id,
                pos: m.body.pos,
                size: m.size(),
            })
            .collect()
    }
}

fn update_ships(session: &mut Session, input: &TickInput, dt: f32) {
    for i in 0..session.ships.len() {
        // Key edges land even on ticks the ship cannot act on
        let fire_pressed = match &mut session.ships[i].pilot {
            Pilot::Human(control) => control.apply(input),
            Pilot::Cpu(_) => false,
        };
        if session.ships[i].is_dead() {
            continue;
        }

        let owner = session.ships[i].id;
        let candidates = match session.ships[i].pilot {
            Pilot::Cpu(_) => candidates_for(session, i),
            Pilot::Human(_) => Vec::new(),
        };
        let live = live_count(session.bullets.iter().chain(&session.pending.bullets), owner);

        let Session {
            ships,
            meteors,
            bounds,
            pending,
            events,
            ids,
            ..
        } = session;
        let ship = &mut ships[i];

        if !ship.update_standard(meteors, bounds, dt) {
            events.push(GameEvent::ShipDestroyed { ship: owner });
            continue;
        }

        let exposed = ship.is_exposed();
        let can_fire = ship.can_fire(live);
        let wants_fire = match &ship.pilot {
            Pilot::Human(control) => {
                ship.body.rotate(control.steer() * HUMAN_TURN_RATE);
                ship.speeding = control.thrusting();
                fire_pressed
            }
            Pilot::Cpu(brain) => {
                let orders = brain.think(&mut ship.body, exposed, can_fire, &candidates);
                ship.speeding = orders.speeding;
                orders.fire
            }
        };

        if wants_fire && can_fire {
            pending.bullets.push(Bullet::fire(ids.next(), owner, &ship.body));
            events.push(GameEvent::ShotFired { ship: owner });
        }
    }
}

fn update_meteors(session: &mut Session) {
    let bounds = session.bounds;
    let meteors = &mut session.meteors;
    // Pairs already swapped this tick; the partner must not swap back
    let mut swapped: Vec<(usize, usize)> = Vec::new();

    for i in 0..meteors.len() {
        if meteors[i].is_dead() {
            continue;
        }
        for j in 0..meteors.len() {
            if i == j || meteors[j].is_dead() || swapped.contains(&(j, i)) {
                continue;
            }
            if meteors[i].body.collides_with(&meteors[j].body) {
                let (a, b) = pair_mut(meteors, i, j);
                exchange_velocities(a, b);
                a.body.advance(Some(&bounds));
                swapped.push((i, j));
                break;
            }
        }
        meteors[i].drift(&bounds);
    }
}

fn update_bullets(session: &mut Session, dt: f32, rng: &mut impl Rng) {
    let versus = session.mode == Mode::Versus;
    let Session {
        bullets,
        meteors,
        ships,
        bounds,
        pending,
        events,
        ids,
        ..
    } = session;

    for bullet in bullets.iter_mut() {
        if bullet.is_dead() {
            continue;
        }

        if versus {
            for ship in ships.iter_mut() {
                if ship.id == bullet.owner || ship.is_dead() || ship.is_invincible() {
                    continue;
                }
                if bullet.body.hitbox_collides(&ship.body) {
                    bullet.body.mark_dead();
                    ship.body.mark_dead();
                    log::debug!("{} ship {} shot down", ship.seat.label(), ship.id);
                    events.push(GameEvent::ShipDestroyed { ship: ship.id });
                    break;
                }
            }
        } else {
            for meteor in meteors.iter_mut() {
                if meteor.is_dead() || !bullet.body.collides_with(&meteor.body) {
                    continue;
                }
                bullet.body.mark_dead();
                meteor.body.mark_dead();

                let children = meteor.split(rng, || ids.next());
                if children.is_empty() {
                    events.push(GameEvent::MeteorDestroyed { meteor: meteor.id });
                } else {
                    events.push(GameEvent::MeteorSplit {
                        meteor: meteor.id,
                        children: children.len(),
                    });
                }
                pending.meteors.extend(children);

                if let Some(firer) = ships.iter_mut().find(|s| s.id == bullet.owner) {
                    firer.add_kill();
                }
                break;
            }
        }

        if !bullet.is_dead() {
            bullet.fly(bounds, dt);
        }
    }
}

/// Drop spent entities and bring back ships with lives to spare
fn cleanup(session: &mut Session) {
    session.bullets.retain(|b| !b.is_dead());
    session.meteors.retain(|m| !m.is_dead());

    let spawn = session.spawn_point();
    for ship in session.ships.iter_mut() {
        if ship.is_dead() && ship.lives > 0 {
            ship.lives -= 1;
            ship.respawn(spawn, 0.0);
            session.events.push(GameEvent::ShipRespawned {
                ship: ship.id,
                lives_left: ship.lives,
            });
        }
    }

    // Race keeps eliminated ships benched so their kills still count
    if matches!(session.mode, Mode::Original | Mode::Cooperative) {
        let events = &mut session.events;
        session.ships.retain(|ship| {
            if ship.out_of_lives() {
                log::info!("{} ship {} is out of lives", ship.seat.label(), ship.id);
                events.push(GameEvent::ShipEliminated { ship: ship.id });
                false
            } else {
                true
            }
        });
    }
}

/// Mutable references to two distinct elements
fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> (&mut T, &mut T) {
    debug_assert_ne!(a, b);
    if a < b {
        let (left, right) = items.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = items.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}
