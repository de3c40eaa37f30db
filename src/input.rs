//! Input translation
//!
//! Turns raw DOM values (client coordinates, slider strings, form text) into
//! [`Command`]s. Kept free of `web_sys` so the mapping is testable natively;
//! the wasm event listeners only read the raw values and call in here.

use glam::Vec2;

use crate::error::{Error, Result};
use crate::sim::{Color, Command, PlayerId, SimState};

/// Canvas bounding-rect origin in client coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CanvasRect {
    pub left: f32,
    pub top: f32,
}

/// Client coordinates to canvas-local coordinates
#[inline]
pub fn canvas_local(rect: CanvasRect, client_x: f32, client_y: f32) -> Vec2 {
    Vec2::new(client_x - rect.left, client_y - rect.top)
}

pub fn pointer_move(rect: CanvasRect, client_x: f32, client_y: f32) -> Command {
    let p = canvas_local(rect, client_x, client_y);
    Command::PointerMove { x: p.x, y: p.y }
}

pub fn pointer_click(rect: CanvasRect, client_x: f32, client_y: f32) -> Command {
    let p = canvas_local(rect, client_x, client_y);
    Command::Click { x: p.x, y: p.y }
}

/// Color form submission
pub fn color_submit(raw: &str) -> Result<Command> {
    let color = Color::parse(raw.trim())?;
    Ok(Command::SubmitColor { color })
}

/// A per-player range input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    BulletRate(PlayerId),
    MoveSpeed(PlayerId),
}

impl Control {
    /// Every slider on the page
    pub const ALL: [Control; 4] = [
        Control::BulletRate(PlayerId::One),
        Control::MoveSpeed(PlayerId::One),
        Control::BulletRate(PlayerId::Two),
        Control::MoveSpeed(PlayerId::Two),
    ];

    pub fn element_id(self) -> String {
        match self {
            Control::BulletRate(p) => format!("p{}-bullet-rate", p.number()),
            Control::MoveSpeed(p) => format!("p{}-move-speed", p.number()),
        }
    }

    /// Value the slider should show for the current state
    pub fn current_value(self, state: &SimState) -> u32 {
        match self {
            Control::BulletRate(p) => state.player(p).bullet_rate,
            Control::MoveSpeed(p) => state.player(p).move_speed() as u32,
        }
    }

    /// Build the command for a raw slider value
    ///
    /// Range inputs report strings; fractional values are truncated and
    /// negative ones saturate to zero (the state clamps into range).
    pub fn command(self, raw: &str) -> Result<Command> {
        let value: f64 = raw
            .trim()
            .parse()
            .ok()
            .filter(|v: &f64| v.is_finite())
            .ok_or_else(|| Error::InvalidControlValue {
                control: self.element_id(),
                value: raw.to_string(),
            })?;
        let value = value as u32;

        Ok(match self {
            Control::BulletRate(player) => Command::SetBulletRate {
                player,
                rate: value,
            },
            Control::MoveSpeed(player) => Command::SetMoveSpeed {
                player,
                speed: value,
            },
        })
    }
}
