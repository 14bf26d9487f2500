//! Deterministic simulation module
//!
//! All gameplay logic lives here. Given the same seed and the same input
//! stream a session plays out identically:
//! - Fixed tick order (ships, meteors, bullets, rules, cleanup)
//! - One random stream passed in by the caller
//! - Stable iteration order (collection order, ids never reused)
//! - No rendering or platform dependencies

pub mod body;
pub mod bullet;
pub mod cpu;
pub mod meteor;
pub mod rules;
pub mod shape;
pub mod ship;
pub mod state;
pub mod tick;
pub mod timer;

pub use body::{Body, Bounds};
pub use bullet::Bullet;
pub use cpu::{CpuBrain, Stance};
pub use meteor::Meteor;
pub use shape::Polygon;
pub use ship::{HumanControl, Pilot, Seat, Ship};
pub use state::{EntityKind, GameEvent, GamePhase, Outcome, Session};
pub use tick::{Keys, TickInput, tick};
pub use timer::Countdown;
