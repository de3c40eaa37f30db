//! Scripted input replays
//!
//! A replay is a list of frames, each a host frame delta plus the commands
//! that arrived before it. Feeding the same replay twice gives the same
//! outcome, which makes it the harness for end-to-end checks and for the
//! headless binary.

use serde::{Deserialize, Serialize};

use super::commands::Command;
use super::engine::Engine;
use super::state::{Phase, PlayerId, SimEvent};
use crate::error::Result;
use crate::millis_to_duration;
use crate::settings::Settings;

/// One host frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayFrame {
    /// Frame delta in milliseconds
    pub dt_ms: f64,
    /// Applied in order before advancing
    #[serde(default)]
    pub commands: Vec<Command>,
    /// Repeat this frame (delta and commands) this many times
    #[serde(default = "one")]
    pub repeat: u32,
}

fn one() -> u32 {
    1
}

/// A complete replay document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Replay {
    #[serde(default)]
    pub settings: Settings,
    pub frames: Vec<ReplayFrame>,
}

/// What happened over a replay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayOutcome {
    pub ticks: u64,
    pub scores: [u32; 2],
    pub spawned: [u32; 2],
    pub hits: u32,
    pub final_phase: Phase,
    pub live_bullets: usize,
}

impl Replay {
    pub fn from_json(json: &str) -> Result<Self> {
        let mut replay: Replay = serde_json::from_str(json)?;
        replay.settings = replay.settings.validate();
        Ok(replay)
    }

    /// Run against a fresh engine
    pub fn run(&self) -> ReplayOutcome {
        let mut engine = Engine::new(self.settings.clone());
        self.run_on(&mut engine)
    }

    /// Run against an existing engine
    pub fn run_on(&self, engine: &mut Engine) -> ReplayOutcome {
        let mut spawned = [0u32; 2];
        let mut hits = 0u32;

        for frame in &self.frames {
            for _ in 0..frame.repeat {
                for command in &frame.commands {
                    if *command == Command::Reset {
                        // Counters describe the current run only, like the score
                        spawned = [0; 2];
                        hits = 0;
                    }
                    engine.apply(command.clone());
                }
                engine.advance(millis_to_duration(frame.dt_ms));

                for event in engine.drain_events() {
                    match event {
                        SimEvent::BulletSpawned { owner } => spawned[owner.index()] += 1,
                        SimEvent::Hit { .. } => hits += 1,
                        _ => {}
                    }
                }
            }
        }

        let state = engine.state();
        ReplayOutcome {
            ticks: state.time_ticks,
            scores: [
                state.score.get(PlayerId::One),
                state.score.get(PlayerId::Two),
            ],
            spawned,
            hits,
            final_phase: state.phase,
            live_bullets: state.bullet_count(),
        }
    }
}
