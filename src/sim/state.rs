//! Entity state and its mutation entry points
//!
//! Everything the loop owns lives in [`SimState`]. Fields are public for
//! reading (renderer, HUD, tests); changes go through the command methods so
//! the engine can keep timers in line with the phase.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{circle_contains_point, outside_vertical_band};
use super::color::Color;
use crate::consts::*;
use crate::settings::{PlayerSettings, Settings};

/// Which of the two players
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    pub const ALL: [PlayerId; 2] = [PlayerId::One, PlayerId::Two];

    pub fn enemy(self) -> Self {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    /// Horizontal bullet direction: player one fires +x, player two -x
    pub fn fire_direction(self) -> f32 {
        match self {
            PlayerId::One => 1.0,
            PlayerId::Two => -1.0,
        }
    }

    pub fn index(self) -> usize {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        }
    }

    /// 1-based number used in element ids and labels
    pub fn number(self) -> u8 {
        self.index() as u8 + 1
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(PlayerId::One),
            2 => Some(PlayerId::Two),
            _ => None,
        }
    }

    pub fn default_color(self) -> Color {
        match self {
            PlayerId::One => Color::RED,
            PlayerId::Two => Color::BLUE,
        }
    }

    pub fn start_position(self) -> Vec2 {
        let (x, y) = match self {
            PlayerId::One => PLAYER_ONE_START,
            PlayerId::Two => PLAYER_TWO_START,
        };
        Vec2::new(x, y)
    }
}

/// A projectile in flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub radius: f32,
    /// Copied from the owner at spawn time
    pub color: Color,
}

/// A bouncing player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub pos: Vec2,
    pub radius: f32,
    pub color: Color,
    /// Vertical velocity in pixels/tick; the sign is the direction
    pub dy: f32,
    /// Bullets per second
    pub bullet_rate: u32,
    pub bullet_color: Color,
    /// Live bullets in spawn order
    pub bullets: Vec<Bullet>,
}

impl Player {
    pub fn new(id: PlayerId, settings: &PlayerSettings) -> Self {
        Self {
            id,
            pos: id.start_position(),
            radius: PLAYER_RADIUS,
            color: settings.fill_color(id),
            dy: settings.move_speed as f32,
            bullet_rate: settings.bullet_rate,
            bullet_color: settings.bullet_color(id),
            bullets: Vec::new(),
        }
    }

    /// Whether `point` lies inside (or on) this player's circle
    pub fn contains_point(&self, point: Vec2) -> bool {
        circle_contains_point(self.pos, self.radius, point)
    }

    /// Whether `y` has left `[radius, CANVAS_HEIGHT - radius]`
    pub fn out_of_bounds(&self) -> bool {
        outside_vertical_band(self.pos.y, self.radius, CANVAS_HEIGHT)
    }

    /// Current speed magnitude
    pub fn move_speed(&self) -> f32 {
        self.dy.abs()
    }
}

/// Run phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Running,
    /// Stepper and spawner suspended; with a target the color form is open
    Paused { config_target: Option<PlayerId> },
}

impl Phase {
    pub fn is_running(&self) -> bool {
        matches!(self, Phase::Running)
    }

    pub fn config_target(&self) -> Option<PlayerId> {
        match self {
            Phase::Paused { config_target } => *config_target,
            Phase::Running => None,
        }
    }
}

/// Hit counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    hits: [u32; 2],
}

impl Score {
    pub fn get(&self, id: PlayerId) -> u32 {
        self.hits[id.index()]
    }

    pub fn record_hit(&mut self, shooter: PlayerId) {
        self.hits[shooter.index()] += 1;
    }

    pub fn total(&self) -> u32 {
        self.hits.iter().sum()
    }
}

/// Things that happened, for logging and tests
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    BulletSpawned { owner: PlayerId },
    /// A bullet from `shooter` overlapped its enemy
    Hit { shooter: PlayerId },
    /// A bullet left the canvas
    BulletExpired { owner: PlayerId },
    Reflected { player: PlayerId },
    Paused { config_target: Option<PlayerId> },
    Resumed,
    BulletColorChanged { player: PlayerId, color: Color },
}

/// Complete simulation state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimState {
    pub players: [Player; 2],
    /// Last pointer position in canvas coordinates
    pub cursor: Vec2,
    pub score: Score,
    pub phase: Phase,
    /// Ticks stepped while running
    pub time_ticks: u64,
    /// Events since the last drain
    #[serde(skip)]
    pub events: Vec<SimEvent>,
}

impl SimState {
    pub fn new(settings: &Settings) -> Self {
        Self {
            players: [
                Player::new(PlayerId::One, settings.player(PlayerId::One)),
                Player::new(PlayerId::Two, settings.player(PlayerId::Two)),
            ],
            cursor: Vec2::ZERO,
            score: Score::default(),
            phase: if settings.start_paused {
                Phase::Paused {
                    config_target: None,
                }
            } else {
                Phase::Running
            },
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id.index()]
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        &mut self.players[id.index()]
    }

    pub fn is_running(&self) -> bool {
        self.phase.is_running()
    }

    /// Take all events recorded so far
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Pointer moved (canvas coordinates, last write wins)
    pub fn set_cursor(&mut self, pos: Vec2) {
        self.cursor = pos;
    }

    /// Pointer clicked. Returns the player hit, if any.
    ///
    /// A hit pauses and targets the color form at that player. A miss does
    /// nothing, paused or not.
    pub fn click(&mut self, pos: Vec2) -> Option<PlayerId> {
        let target = PlayerId::ALL
            .into_iter()
            .find(|id| self.player(*id).contains_point(pos))?;

        let phase = Phase::Paused {
            config_target: Some(target),
        };
        if self.phase != phase {
            self.phase = phase;
            self.events.push(SimEvent::Paused {
                config_target: Some(target),
            });
        }
        Some(target)
    }

    /// Pause without a config target. Returns false if already paused.
    pub fn pause(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.phase = Phase::Paused {
            config_target: None,
        };
        self.events.push(SimEvent::Paused {
            config_target: None,
        });
        true
    }

    /// Resume running. Returns false if already running.
    pub fn resume(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        self.phase = Phase::Running;
        self.events.push(SimEvent::Resumed);
        true
    }

    /// Color form submitted: recolor the target's future bullets and resume.
    ///
    /// Returns the player changed, or `None` when no form is open.
    pub fn submit_color(&mut self, color: Color) -> Option<PlayerId> {
        let target = self.phase.config_target()?;
        self.player_mut(target).bullet_color = color;
        self.events.push(SimEvent::BulletColorChanged {
            player: target,
            color,
        });
        self.resume();
        Some(target)
    }

    /// Set bullets/second, clamped to the slider range. Returns the applied rate.
    pub fn set_bullet_rate(&mut self, id: PlayerId, rate: u32) -> u32 {
        let rate = rate.clamp(BULLET_RATE_MIN, BULLET_RATE_MAX);
        self.player_mut(id).bullet_rate = rate;
        rate
    }

    /// Set speed magnitude, keeping the current direction
    pub fn set_move_speed(&mut self, id: PlayerId, speed: u32) {
        let magnitude = speed.clamp(MOVE_SPEED_MIN, MOVE_SPEED_MAX) as f32;
        let player = self.player_mut(id);
        player.dy = if player.dy < 0.0 { -magnitude } else { magnitude };
    }

    /// Append a bullet at the owner's position in the owner's current bullet color
    pub fn spawn_bullet(&mut self, owner: PlayerId) {
        let player = self.player_mut(owner);
        let bullet = Bullet {
            pos: player.pos,
            radius: BULLET_RADIUS,
            color: player.bullet_color,
        };
        player.bullets.push(bullet);
        self.events.push(SimEvent::BulletSpawned { owner });
    }

    /// Live bullets across both players
    pub fn bullet_count(&self) -> usize {
        self.players.iter().map(|p| p.bullets.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> SimState {
        SimState::new(&Settings::default())
    }

    #[test]
    fn test_initial_layout() {
        let s = state();
        let one = s.player(PlayerId::One);
        let two = s.player(PlayerId::Two);
        assert_eq!(one.pos, Vec2::new(50.0, 20.0));
        assert_eq!(two.pos, Vec2::new(450.0, 480.0));
        assert_eq!(one.radius, 20.0);
        assert_eq!(one.dy, 3.0);
        assert_eq!(one.color, Color::RED);
        assert_eq!(two.color, Color::BLUE);
        assert_eq!(s.cursor, Vec2::ZERO);
        assert_eq!(s.phase, Phase::Running);
    }

    #[test]
    fn test_click_on_player_pauses_with_target() {
        let mut s = state();
        assert_eq!(s.click(Vec2::new(455.0, 470.0)), Some(PlayerId::Two));
        assert_eq!(
            s.phase,
            Phase::Paused {
                config_target: Some(PlayerId::Two)
            }
        );
    }

    #[test]
    fn test_click_miss_changes_nothing() {
        let mut s = state();
        assert_eq!(s.click(Vec2::new(250.0, 250.0)), None);
        assert!(s.is_running());

        s.click(Vec2::new(50.0, 20.0));
        let paused = s.phase;
        assert_eq!(s.click(Vec2::new(250.0, 250.0)), None);
        assert_eq!(s.phase, paused);
    }

    #[test]
    fn test_click_while_paused_retargets() {
        let mut s = state();
        s.click(Vec2::new(50.0, 20.0));
        s.click(Vec2::new(450.0, 480.0));
        assert_eq!(s.phase.config_target(), Some(PlayerId::Two));
    }

    #[test]
    fn test_pause_and_resume_are_idempotent() {
        let mut s = state();
        assert!(!s.resume());
        assert_eq!(s.phase, Phase::Running);

        assert!(s.pause());
        let snapshot = s.clone();
        assert!(!s.pause());
        assert_eq!(s.phase, snapshot.phase);
        assert_eq!(s.events, snapshot.events);
    }

    #[test]
    fn test_submit_without_target_is_ignored() {
        let mut s = state();
        assert_eq!(s.submit_color(Color::rgb(0, 255, 0)), None);
        assert_eq!(s.player(PlayerId::One).bullet_color, Color::RED);
    }

    #[test]
    fn test_submit_color_applies_to_target_only() {
        let mut s = state();
        s.click(Vec2::new(50.0, 20.0));
        let green = Color::parse("#00FF00").unwrap();
        assert_eq!(s.submit_color(green), Some(PlayerId::One));
        assert_eq!(s.player(PlayerId::One).bullet_color, green);
        assert_eq!(s.player(PlayerId::Two).bullet_color, Color::BLUE);
        assert!(s.is_running());
    }

    #[test]
    fn test_bullet_color_is_copied_at_spawn() {
        let mut s = state();
        s.spawn_bullet(PlayerId::One);
        s.player_mut(PlayerId::One).bullet_color = Color::WHITE;
        s.spawn_bullet(PlayerId::One);
        let bullets = &s.player(PlayerId::One).bullets;
        assert_eq!(bullets[0].color, Color::RED);
        assert_eq!(bullets[1].color, Color::WHITE);
        assert_eq!(bullets[0].radius, BULLET_RADIUS);
    }

    #[test]
    fn test_move_speed_preserves_sign() {
        let mut s = state();
        s.player_mut(PlayerId::One).dy = -3.0;
        s.set_move_speed(PlayerId::One, 7);
        assert_eq!(s.player(PlayerId::One).dy, -7.0);

        s.set_move_speed(PlayerId::Two, 42);
        assert_eq!(s.player(PlayerId::Two).dy, MOVE_SPEED_MAX as f32);
    }

    #[test]
    fn test_bullet_rate_is_clamped() {
        let mut s = state();
        assert_eq!(s.set_bullet_rate(PlayerId::One, 0), BULLET_RATE_MIN);
        assert_eq!(s.set_bullet_rate(PlayerId::One, 9), BULLET_RATE_MAX);
        assert_eq!(s.player(PlayerId::One).bullet_rate, BULLET_RATE_MAX);
    }

    #[test]
    fn test_score_counts_per_shooter() {
        let mut score = Score::default();
        score.record_hit(PlayerId::Two);
        score.record_hit(PlayerId::Two);
        assert_eq!(score.get(PlayerId::One), 0);
        assert_eq!(score.get(PlayerId::Two), 2);
        assert_eq!(score.total(), 2);
    }
}
