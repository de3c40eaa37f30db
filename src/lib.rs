//! Canvas Duel - two bouncing players trading bullets on a fixed canvas
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, stepper, spawner, engine)
//! - `renderer`: Draw-list scene building and the WebGPU SDF pipeline
//! - `input`: Pointer/form/slider translation into simulation commands
//! - `platform`: Animation-frame driver abstraction
//! - `settings`: Startup configuration for both players

pub mod error;
pub mod input;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{Error, Result};
pub use settings::{PlayerSettings, Settings};

use std::time::Duration;

/// Game configuration constants
pub mod consts {
    use std::time::Duration;

    /// Drawing surface size in canvas pixels
    pub const CANVAS_WIDTH: f32 = 500.0;
    pub const CANVAS_HEIGHT: f32 = 500.0;

    /// Fixed simulation timestep (one animation frame at 60 Hz)
    pub const TICK_DT: Duration = Duration::from_nanos(16_666_667);
    /// Maximum ticks per `advance` call to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta accepted from the host
    pub const MAX_FRAME_DT: Duration = Duration::from_millis(100);

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 20.0;
    pub const PLAYER_ONE_START: (f32, f32) = (50.0, 20.0);
    pub const PLAYER_TWO_START: (f32, f32) = (450.0, 480.0);

    /// Bullet geometry: fixed radius, fixed horizontal step per tick
    pub const BULLET_RADIUS: f32 = 5.0;
    pub const BULLET_STEP: f32 = 5.0;

    /// Bullet spawn rate (bullets/second) slider range
    pub const BULLET_RATE_MIN: u32 = 1;
    pub const BULLET_RATE_MAX: u32 = 5;
    pub const DEFAULT_BULLET_RATE: u32 = 2;

    /// Movement speed (|dy| in pixels/tick) slider range
    pub const MOVE_SPEED_MIN: u32 = 1;
    pub const MOVE_SPEED_MAX: u32 = 10;
    pub const DEFAULT_MOVE_SPEED: u32 = 3;
}

/// Spawn period for a bullet rate, e.g. 5/s -> 200ms
#[inline]
pub fn spawn_period(rate: u32) -> Duration {
    Duration::from_secs(1) / rate.max(1)
}

/// Convert a host frame delta in milliseconds into a `Duration`
///
/// Negative or non-finite deltas (clock skew, first frame) map to zero.
/// Anything longer than `MAX_FRAME_DT` saturates to it.
#[inline]
pub fn millis_to_duration(ms: f64) -> Duration {
    if !(ms.is_finite() && ms > 0.0) {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(ms / 1000.0)
        .map_or(consts::MAX_FRAME_DT, |dt| dt.min(consts::MAX_FRAME_DT))
}
