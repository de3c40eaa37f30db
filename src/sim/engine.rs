//! Simulation engine: state + spawn timers + fixed-step accumulator
//!
//! The host calls [`Engine::apply`] as input arrives and [`Engine::advance`]
//! once per frame with the real elapsed time. Both are plain method calls, so
//! tests drive the engine with fixed `dt` sequences instead of a frame pump.

use std::time::Duration;

use glam::Vec2;

use super::commands::Command;
use super::spawner::SpawnScheduler;
use super::state::{PlayerId, SimEvent, SimState};
use super::tick::tick;
use crate::consts::*;
use crate::renderer::{self, Surface2d};
use crate::settings::Settings;
use crate::spawn_period;

pub struct Engine {
    settings: Settings,
    state: SimState,
    spawner: SpawnScheduler,
    accumulator: Duration,
}

impl Engine {
    pub fn new(settings: Settings) -> Self {
        let state = SimState::new(&settings);
        let mut engine = Self {
            settings,
            state,
            spawner: SpawnScheduler::new(),
            accumulator: Duration::ZERO,
        };
        engine.sync_timers();
        engine
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn spawner(&self) -> &SpawnScheduler {
        &self.spawner
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.state.drain_events()
    }

    /// Apply one command
    pub fn apply(&mut self, command: Command) {
        let was_running = self.state.is_running();

        match command {
            Command::PointerMove { x, y } => self.state.set_cursor(Vec2::new(x, y)),
            Command::Click { x, y } => {
                if let Some(id) = self.state.click(Vec2::new(x, y)) {
                    log::debug!("Configuring {:?}", id);
                }
            }
            Command::SubmitColor { color } => match self.state.submit_color(color) {
                Some(id) => log::info!("{:?} bullet color set to {}", id, color),
                None => log::debug!("Color submit ignored: no config target"),
            },
            Command::SetBulletRate { player, rate } => {
                let applied = self.state.set_bullet_rate(player, rate);
                // Paused: the new rate is picked up on resume
                if self.state.is_running() {
                    self.spawner.reschedule(player, spawn_period(applied));
                }
            }
            Command::SetMoveSpeed { player, speed } => self.state.set_move_speed(player, speed),
            Command::Pause => {
                self.state.pause();
            }
            Command::Resume => {
                self.state.resume();
            }
            Command::Reset => {
                self.reset();
                return;
            }
        }

        if was_running != self.state.is_running() {
            self.accumulator = Duration::ZERO;
            self.sync_timers();
            log::info!(
                "{}",
                if self.state.is_running() {
                    "Resumed"
                } else {
                    "Paused"
                }
            );
        }
    }

    /// Back to the initial state for the stored settings
    pub fn reset(&mut self) {
        self.state = SimState::new(&self.settings);
        self.accumulator = Duration::ZERO;
        self.sync_timers();
        log::info!("Simulation reset");
    }

    /// One fresh timer per player while running, none while paused
    fn sync_timers(&mut self) {
        if self.state.is_running() {
            for id in PlayerId::ALL {
                let rate = self.state.player(id).bullet_rate;
                self.spawner.reschedule(id, spawn_period(rate));
            }
        } else {
            self.spawner.cancel_all();
        }
    }

    /// Run as many fixed ticks as `dt` covers. Returns the number of ticks run.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        if !self.state.is_running() {
            return 0;
        }

        self.accumulator += dt.min(MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= TICK_DT && substeps < MAX_SUBSTEPS {
            for owner in self.spawner.advance(TICK_DT) {
                self.state.spawn_bullet(owner);
                log::trace!("{:?} fired", owner);
            }
            tick(&mut self.state);
            self.accumulator -= TICK_DT;
            substeps += 1;
        }

        substeps
    }

    /// Draw the current state
    pub fn render<S: Surface2d>(&self, surface: &mut S) {
        renderer::render(&self.state, surface);
    }
}
