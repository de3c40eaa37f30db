//! Commands sent from the input layer (or a replay) to the engine.
//!
//! These are the only way the outside world changes simulation state.

use serde::{Deserialize, Serialize};

use super::color::Color;
use super::state::PlayerId;

/// All possible mutations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Command {
    /// Pointer moved to canvas coordinates
    PointerMove { x: f32, y: f32 },
    /// Pointer clicked at canvas coordinates
    Click { x: f32, y: f32 },
    /// Color form submitted for the current config target
    SubmitColor { color: Color },
    /// Bullet-rate slider changed
    SetBulletRate { player: PlayerId, rate: u32 },
    /// Movement-speed slider changed (magnitude only)
    SetMoveSpeed { player: PlayerId, speed: u32 },
    Pause,
    Resume,
    /// Back to the initial state
    Reset,
}
