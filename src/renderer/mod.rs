//! Scene drawing
//!
//! [`render`] walks the simulation state and issues clear/fill-circle calls on
//! a [`Surface2d`]. [`DrawList`] records those calls; the WebGPU backend
//! uploads a draw list and shades every circle with an SDF in one pass.

pub mod sdf_pipeline;

pub use sdf_pipeline::SdfRenderState;

use glam::Vec2;

use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::sim::{Color, SimState};

/// Minimal 2D drawing surface
pub trait Surface2d {
    /// Clear the whole `width` x `height` surface
    fn clear(&mut self, width: f32, height: f32);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
}

/// A recorded draw call
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    Clear { width: f32, height: f32 },
    Circle { center: Vec2, radius: f32, color: Color },
}

/// Draw calls in submission order
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Circles painted since the last clear, back to front
    pub fn circles(&self) -> impl Iterator<Item = (Vec2, f32, Color)> + '_ {
        let start = self
            .commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Clear { .. }))
            .map(|i| i + 1)
            .unwrap_or(0);
        self.commands[start..].iter().filter_map(|c| match *c {
            DrawCommand::Circle {
                center,
                radius,
                color,
            } => Some((center, radius, color)),
            DrawCommand::Clear { .. } => None,
        })
    }

    pub fn reset(&mut self) {
        self.commands.clear();
    }
}

impl Surface2d for DrawList {
    fn clear(&mut self, width: f32, height: f32) {
        self.commands.push(DrawCommand::Clear { width, height });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }
}

/// Clear, then players, then bullets grouped by owner
pub fn render<S: Surface2d>(state: &SimState, surface: &mut S) {
    surface.clear(CANVAS_WIDTH, CANVAS_HEIGHT);

    for player in &state.players {
        surface.fill_circle(player.pos, player.radius, player.color);
    }

    for player in &state.players {
        for bullet in &player.bullets {
            surface.fill_circle(bullet.pos, bullet.radius, bullet.color);
        }
    }
}
