//! Draw list generation
//!
//! The simulation never draws. Each frame the application asks for a
//! `DrawList`: world-space polygons with a color and paint style, plus
//! overlay text for the HUD and end-of-match banners. Turning that into
//! pixels is up to whatever backend consumes the vertices.

pub mod shapes;
pub mod vertex;

use glam::Vec2;

pub use vertex::{Vertex, colors};

use crate::settings::Mode;
use crate::sim::ship::{Pilot, Ship};
use crate::sim::state::{EntityKind, GamePhase, Outcome, Session};

/// How a polygon is painted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    Fill,
    /// Outline only, used while a ship is protected
    Stroke,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShapeCommand {
    pub kind: EntityKind,
    pub id: u32,
    pub points: Vec<Vec2>,
    pub color: [f32; 4],
    pub paint: Paint,
}

/// Where overlay text hangs from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    TopLeft,
    TopRight,
    Center,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextCommand {
    pub text: String,
    pub pos: Vec2,
    pub anchor: Anchor,
    pub color: [f32; 4],
}

/// Everything to draw for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    pub shapes: Vec<ShapeCommand>,
    pub text: Vec<TextCommand>,
}

const HUD_MARGIN: f32 = 10.0;
const HUD_LINE: f32 = 18.0;

fn ship_color(ship: &Ship) -> [f32; 4] {
    match ship.pilot {
        Pilot::Human(_) => colors::HUMAN_SHIP,
        Pilot::Cpu(_) => colors::CPU_SHIP,
    }
}

/// mm:ss for the race clock
pub fn format_clock(secs: f32) -> String {
    let whole = secs.max(0.0).ceil() as u32;
    format!("{:02}:{:02}", whole / 60, whole % 60)
}

impl DrawList {
    /// Build the frame for `session`; dead entities are skipped
    pub fn build(session: &Session) -> Self {
        let mut list = Self::default();

        for meteor in session.meteors.iter().filter(|m| !m.is_dead()) {
            for shape in &meteor.body.shapes {
                list.push_shape(EntityKind::Meteor, meteor.id, &shape.world, colors::METEOR, Paint::Fill);
            }
        }

        for ship in session.ships.iter().filter(|s| !s.is_dead()) {
            let paint = if ship.is_invincible() {
                Paint::Stroke
            } else {
                Paint::Fill
            };
            for (index, shape) in ship.body.shapes.iter().enumerate() {
                // Polygon 0 is the thrust flame
                let color = if index == 0 {
                    if !ship.speeding {
                        continue;
                    }
                    colors::THRUST
                } else {
                    ship_color(ship)
                };
                list.push_shape(EntityKind::Ship, ship.id, &shape.world, color, paint);
            }
        }

        for bullet in session.bullets.iter().filter(|b| !b.is_dead()) {
            let color = session
                .ship(bullet.owner)
                .map(ship_color)
                .unwrap_or(colors::BULLET);
            for shape in &bullet.body.shapes {
                list.push_shape(EntityKind::Bullet, bullet.id, &shape.world, color, Paint::Fill);
            }
        }

        list.push_hud(session);
        list
    }

    fn push_shape(&mut self, kind: EntityKind, id: u32, points: &[Vec2], color: [f32; 4], paint: Paint) {
        self.shapes.push(ShapeCommand {
            kind,
            id,
            points: points.to_vec(),
            color,
            paint,
        });
    }

    fn push_text(&mut self, text: String, pos: Vec2, anchor: Anchor, color: [f32; 4]) {
        self.text.push(TextCommand {
            text,
            pos,
            anchor,
            color,
        });
    }

    fn push_hud(&mut self, session: &Session) {
        let b = session.bounds;
        let left = Vec2::new(b.x + HUD_MARGIN, b.y + HUD_MARGIN);
        let right = Vec2::new(b.right() - HUD_MARGIN, b.y + HUD_MARGIN);

        match session.mode {
            Mode::Original | Mode::Cooperative => {
                self.push_text(format!("Level {}", session.level), left, Anchor::TopLeft, colors::TEXT);
            }
            Mode::Race => {
                let remaining = session.race_remaining().unwrap_or(0.0);
                self.push_text(
                    format!("Time {}", format_clock(remaining)),
                    left,
                    Anchor::TopLeft,
                    colors::TEXT,
                );
            }
            Mode::Versus => {}
        }

        // One line per seat down the right side
        for (row, ship) in session.ships.iter().enumerate() {
            let line = match session.mode {
                Mode::Versus => format!("{} Lives {}", ship.seat.label(), ship.lives),
                _ => format!(
                    "{} Lives {} Kills {}",
                    ship.seat.label(),
                    ship.lives,
                    ship.kills
                ),
            };
            let pos = right + Vec2::new(0.0, row as f32 * HUD_LINE);
            self.push_text(line, pos, Anchor::TopRight, ship_color(ship));
        }

        let center = b.center();
        match (session.phase, session.outcome) {
            (GamePhase::Paused, _) => {
                self.push_text("Paused".to_string(), center, Anchor::Center, colors::BANNER);
            }
            (GamePhase::GameOver, Some(outcome)) => {
                self.push_text(banner(outcome), center, Anchor::Center, colors::BANNER);
            }
            _ => {}
        }
    }

    /// Tessellate every shape into one vertex batch, in draw order
    pub fn vertices(&self) -> Vec<Vertex> {
        self.shapes
            .iter()
            .flat_map(|cmd| match cmd.paint {
                Paint::Fill => shapes::polygon_fill(&cmd.points, cmd.color),
                Paint::Stroke => shapes::polygon_outline(&cmd.points, shapes::STROKE_WIDTH, cmd.color),
            })
            .collect()
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.shapes.iter().filter(|s| s.kind == kind).count()
    }
}

/// End-of-match banner text
pub fn banner(outcome: Outcome) -> String {
    match outcome {
        Outcome::Defeat { .. } => "Game Over".to_string(),
        Outcome::Winner { seat, .. } => format!("{} Wins", seat.label()),
        Outcome::Draw => "Draw".to_string(),
    }
}
