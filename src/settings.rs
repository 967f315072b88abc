//! Draw settings and presets
//!
//! Persisted as JSON next to the draw history.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DrawError, StoreError};
use crate::persistence::{load_json, save_json};
use crate::sim::{Entrant, parse_name_list};

/// Per-award draw configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub award_name: String,
    /// Winners wanted
    pub total_count: usize,
    /// Ladder height; reaching it wins
    pub total_levels: u32,
    /// Levels visible at once
    pub display_levels: u32,
    /// Propensity to rise per tick (above 0.0, at most 1.0)
    pub activation_rate: f64,
    /// Phase length before congestion scaling
    pub base_duration_ms: u64,
    /// Decay for entrants that did not rise (0.0 - 1.0)
    pub attenuation: f64,
}

impl Default for Preset {
    fn default() -> Self {
        Self {
            award_name: "Grand Prize".to_string(),
            total_count: 3,
            total_levels: 20,
            display_levels: 8,
            activation_rate: 0.2,
            base_duration_ms: 300,
            attenuation: 0.9,
        }
    }
}

impl Preset {
    /// Reject values that can never produce a finished draw
    pub fn validate(&self) -> Result<(), DrawError> {
        let invalid = |reason: &str| Err(DrawError::InvalidPreset(reason.to_string()));

        if self.total_levels < 2 {
            return invalid("total_levels must be at least 2");
        }
        if self.total_count == 0 {
            return invalid("total_count must be at least 1");
        }
        if self.display_levels < 2 {
            return invalid("display_levels must be at least 2");
        }
        // A zero rate puts the threshold at 1.0, which no increment reaches
        if !(self.activation_rate > 0.0 && self.activation_rate <= 1.0) {
            return invalid("activation_rate must be within (0.0, 1.0]");
        }
        if !(0.0..=1.0).contains(&self.attenuation) {
            return invalid("attenuation must be within 0.0 - 1.0");
        }
        if self.base_duration_ms == 0 {
            return invalid("base_duration_ms must be positive");
        }
        Ok(())
    }
}

/// Level layout parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelUi {
    /// Max entrants allowed onto each level, nearest the leader first
    pub cap: Vec<usize>,
    /// Row height in pixels
    pub height: f32,
    /// Horizontal gap between slots in pixels
    pub gap: f32,
}

/// Entrant label parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntrantUi {
    pub font_size: f32,
    pub width: f32,
}

/// Presentation parameters; the engine reads only `level.cap`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiParams {
    pub level: LevelUi,
    pub entrant: EntrantUi,
}

impl Default for UiParams {
    fn default() -> Self {
        Self {
            level: LevelUi {
                cap: vec![3, 5, 8, 13],
                height: 64.0,
                gap: 8.0,
            },
            entrant: EntrantUi {
                font_size: 18.0,
                width: 120.0,
            },
        }
    }
}

/// Everything the user configures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Raw name-list lines, `name<delimiter>detail`
    pub name_list: Vec<String>,
    pub name_delimiter: String,
    pub presets: Vec<Preset>,
    pub ui: UiParams,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            name_list: Vec::new(),
            name_delimiter: ",".to_string(),
            presets: vec![Preset::default()],
            ui: UiParams::default(),
        }
    }
}

impl Settings {
    /// Default file name, resolved against the working directory
    pub const DEFAULT_FILE: &'static str = "progressive_draw_settings.json";

    /// Entrants parsed from the name list
    pub fn entrants(&self) -> Vec<Entrant> {
        parse_name_list(&self.name_list, &self.name_delimiter)
    }

    pub fn preset(&self, award_name: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.award_name == award_name)
    }

    /// Replace the preset with the same award name, or append it
    pub fn upsert_preset(&mut self, preset: Preset) {
        match self
            .presets
            .iter_mut()
            .find(|p| p.award_name == preset.award_name)
        {
            Some(existing) => *existing = preset,
            None => self.presets.push(preset),
        }
    }

    pub fn remove_preset(&mut self, award_name: &str) -> Option<Preset> {
        let index = self.presets.iter().position(|p| p.award_name == award_name)?;
        Some(self.presets.remove(index))
    }

    /// Load settings, falling back to defaults when the file does not exist
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        match load_json(path)? {
            Some(settings) => {
                log::info!("Loaded settings from {}", path.display());
                Ok(settings)
            }
            None => {
                log::warn!("No settings at {}, using defaults", path.display());
                Ok(Self::default())
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        save_json(path, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_preset_is_valid() {
        assert!(Preset::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad = [
            Preset { total_levels: 1, ..Default::default() },
            Preset { total_count: 0, ..Default::default() },
            Preset { display_levels: 1, ..Default::default() },
            Preset { activation_rate: 1.5, ..Default::default() },
            Preset { activation_rate: 0.0, ..Default::default() },
            Preset { activation_rate: 0.0, attenuation: 0.0, ..Default::default() },
            Preset { activation_rate: f64::NAN, ..Default::default() },
            Preset { attenuation: -0.1, ..Default::default() },
            Preset { base_duration_ms: 0, ..Default::default() },
        ];
        for preset in bad {
            assert!(matches!(preset.validate(), Err(DrawError::InvalidPreset(_))));
        }
    }

    #[test]
    fn test_preset_crud() {
        let mut settings = Settings::default();
        settings.upsert_preset(Preset {
            award_name: "Runner Up".to_string(),
            total_count: 5,
            ..Default::default()
        });
        assert_eq!(settings.presets.len(), 2);

        settings.upsert_preset(Preset {
            award_name: "Runner Up".to_string(),
            total_count: 7,
            ..Default::default()
        });
        assert_eq!(settings.presets.len(), 2);
        assert_eq!(settings.preset("Runner Up").unwrap().total_count, 7);

        let removed = settings.remove_preset("Runner Up").unwrap();
        assert_eq!(removed.total_count, 7);
        assert!(settings.preset("Runner Up").is_none());
        assert!(settings.remove_preset("Runner Up").is_none());
    }

    #[test]
    fn test_entrants_from_name_list() {
        let settings = Settings {
            name_list: vec!["Alice,R&D".to_string(), "".to_string(), "Bob".to_string()],
            ..Default::default()
        };
        let names: Vec<String> = settings.entrants().iter().map(|e| e.full_name()).collect();
        assert_eq!(names, vec!["R&D Alice", "Bob"]);
    }

    #[test]
    fn test_settings_json_round_trip() {
        let path = std::env::temp_dir()
            .join(format!("progressive-draw-settings-{}", std::process::id()))
            .join("settings.json");
        let mut settings = Settings::default();
        settings.name_list.push("Carol".to_string());
        settings.ui.level.cap = vec![1, 2];
        settings.save(&path).unwrap();

        assert_eq!(Settings::load(&path).unwrap(), settings);
    }
}
