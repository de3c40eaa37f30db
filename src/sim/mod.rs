//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Time enters only through [`Engine::advance`]
//! - Stable iteration order (player one, then player two)
//! - No DOM or GPU dependencies (drawing goes through [`crate::renderer::Surface2d`])

pub mod collision;
pub mod color;
pub mod commands;
pub mod engine;
pub mod replay;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{circle_contains_point, circles_overlap, sd_circle};
pub use color::Color;
pub use commands::Command;
pub use engine::Engine;
pub use replay::{Replay, ReplayFrame, ReplayOutcome};
pub use spawner::SpawnScheduler;
pub use state::{Bullet, Phase, Player, PlayerId, Score, SimEvent, SimState};
pub use tick::tick;
