//! Startup settings for both players
//!
//! Read once at startup from JSON embedded in the page (web) or a file
//! (native). Nothing is written back.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::Result;
use crate::sim::{Color, PlayerId};

/// Per-player configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Body fill color (red for player one, blue for player two when unset)
    pub color: Option<Color>,
    /// Color given to newly spawned bullets (body color when unset)
    pub bullet_color: Option<Color>,
    /// Bullets per second
    pub bullet_rate: u32,
    /// Vertical speed magnitude (pixels/tick)
    pub move_speed: u32,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            color: None,
            bullet_color: None,
            bullet_rate: DEFAULT_BULLET_RATE,
            move_speed: DEFAULT_MOVE_SPEED,
        }
    }
}

impl PlayerSettings {
    /// Resolved body color for `who`
    pub fn fill_color(&self, who: PlayerId) -> Color {
        self.color.unwrap_or_else(|| who.default_color())
    }

    /// Resolved bullet color for `who`
    pub fn bullet_color(&self, who: PlayerId) -> Color {
        self.bullet_color.unwrap_or_else(|| self.fill_color(who))
    }

    fn validate(&mut self, who: PlayerId) {
        let rate = self.bullet_rate.clamp(BULLET_RATE_MIN, BULLET_RATE_MAX);
        if rate != self.bullet_rate {
            log::warn!(
                "{:?}: bullet_rate {} out of range, using {}",
                who,
                self.bullet_rate,
                rate
            );
            self.bullet_rate = rate;
        }
        let speed = self.move_speed.clamp(MOVE_SPEED_MIN, MOVE_SPEED_MAX);
        if speed != self.move_speed {
            log::warn!(
                "{:?}: move_speed {} out of range, using {}",
                who,
                self.move_speed,
                speed
            );
            self.move_speed = speed;
        }
    }
}

/// Game settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub player_one: PlayerSettings,
    pub player_two: PlayerSettings,
    /// Start in the paused phase (no config target)
    pub start_paused: bool,
}

impl Settings {
    pub fn player(&self, id: PlayerId) -> &PlayerSettings {
        match id {
            PlayerId::One => &self.player_one,
            PlayerId::Two => &self.player_two,
        }
    }

    /// Clamp out-of-range values into the slider ranges
    pub fn validate(mut self) -> Self {
        self.player_one.validate(PlayerId::One);
        self.player_two.validate(PlayerId::Two);
        self
    }

    /// Parse and validate a JSON settings document
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.validate())
    }

    /// Element holding the page-embedded settings JSON
    #[cfg(target_arch = "wasm32")]
    const ELEMENT_ID: &'static str = "duel-settings";

    /// Load settings from the page (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let text = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::ELEMENT_ID))
            .and_then(|el| el.text_content());

        match text {
            Some(json) if !json.trim().is_empty() => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from #{}", Self::ELEMENT_ID);
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring #{}: {}", Self::ELEMENT_ID, e);
                    Self::default()
                }
            },
            _ => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Load settings from a file path (native)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_file(path: &std::path::Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_canvas_demo() {
        let s = Settings::default();
        assert_eq!(s.player_one.fill_color(PlayerId::One), Color::RED);
        assert_eq!(s.player_two.fill_color(PlayerId::Two), Color::BLUE);
        assert_eq!(s.player_two.bullet_color(PlayerId::Two), Color::BLUE);
        assert_eq!(s.player_one.bullet_rate, 2);
        assert_eq!(s.player_two.move_speed, 3);
        assert!(!s.start_paused);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let s = Settings::from_json(r##"{ "player_two": { "bullet_rate": 4 } }"##).unwrap();
        assert_eq!(s.player_two.bullet_rate, 4);
        assert_eq!(s.player_two.move_speed, DEFAULT_MOVE_SPEED);
        assert_eq!(s.player_two.fill_color(PlayerId::Two), Color::BLUE);
        assert_eq!(s.player_one, Settings::default().player_one);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let s = Settings::from_json(
            r##"{ "player_one": { "bullet_rate": 99, "move_speed": 0, "bullet_color": "#00ff00" } }"##,
        )
        .unwrap();
        assert_eq!(s.player_one.bullet_rate, BULLET_RATE_MAX);
        assert_eq!(s.player_one.move_speed, MOVE_SPEED_MIN);
        assert_eq!(s.player_one.bullet_color(PlayerId::One), Color::rgb(0, 255, 0));
        assert_eq!(s.player_one.fill_color(PlayerId::One), Color::RED);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(Settings::from_json("{ not json").is_err());
        assert!(Settings::from_json(r#"{ "player_one": { "color": "mauve-ish" } }"#).is_err());
    }
}
