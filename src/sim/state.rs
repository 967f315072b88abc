//! Draw run state and core simulation types
//!
//! `DrawState` is the run context: everything a single draw mutates besides
//! the entrants themselves and the camera.

use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

use rand::{Rng, RngCore, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entrant::EntrantId;
use super::level::Level;
use crate::consts::{DURATION_BASE_FACTOR, DURATION_LEVEL_FACTOR};
use crate::error::DrawError;
use crate::settings::{Preset, UiParams};

/// Phase the run will execute on its next tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    /// No run in progress
    #[default]
    Idle,
    /// Initial pause after reset so observers can lay out level 1
    Settle,
    /// Accumulate activation and apply the capacity funnel
    Activate,
    /// Move activated entrants up one level, crown winners
    Motion,
    /// Camera follow and activation decay
    Home,
    /// Park non-winners below the viewport
    Fall,
    /// Emit the completed-draw record
    Report,
}

/// Source of uniform activation increments in `[0, 1)`
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

impl<R: RngCore> RandomSource for R {
    fn next_unit(&mut self) -> f64 {
        self.random::<f64>()
    }
}

/// RNG seed wrapper for reproducible runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// Complete per-run state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DrawState {
    pub award_name: String,
    /// Ladder height; reaching it wins
    pub total_levels: u32,
    /// Occupied rungs by level number, created lazily
    pub levels: BTreeMap<u32, Level>,
    /// Confirmed winners
    pub top_level: Level,
    pub activation_rate: f64,
    /// `1 - activation_rate`, refreshed every activate phase
    pub activation_threshold: f64,
    pub total_count: usize,
    pub remaining_count: usize,
    /// Decay applied to entrants that did not rise
    pub attenuation: f64,
    pub base_duration_ms: u64,
    pub current_duration_ms: u64,
    /// Clock reading at reset
    pub start_timestamp: Duration,
    /// Max occupancy per level, nearest the top first
    pub level_count_cap: Vec<usize>,
    /// Winners in win order
    pub winners: Vec<EntrantId>,
    /// Full names excluded from this run
    pub past_winners: HashSet<String>,
    /// Entrants that rose during the current cycle's motion phase
    pub advanced: Vec<EntrantId>,
}

impl DrawState {
    /// Load a preset into a fresh run context. Levels are left empty; the
    /// scene populates level 1.
    pub fn configure(
        &mut self,
        preset: &Preset,
        ui: &UiParams,
        past_winners: HashSet<String>,
        now: Duration,
    ) -> Result<(), DrawError> {
        preset.validate()?;
        if ui.level.cap.contains(&0) {
            return Err(DrawError::InvalidPreset(
                "level caps must allow at least one entrant".to_string(),
            ));
        }

        self.award_name = preset.award_name.clone();
        self.total_levels = preset.total_levels;
        self.activation_rate = preset.activation_rate;
        self.activation_threshold = 1.0 - preset.activation_rate;
        self.total_count = preset.total_count;
        self.remaining_count = preset.total_count;
        self.attenuation = preset.attenuation;
        self.base_duration_ms = preset.base_duration_ms;
        self.current_duration_ms = preset.base_duration_ms;
        self.start_timestamp = now;
        self.level_count_cap = ui.level.cap.clone();
        self.winners.clear();
        self.past_winners = past_winners;
        self.advanced.clear();
        self.levels.clear();
        self.top_level.clear();
        Ok(())
    }

    pub fn level(&self, level_no: u32) -> Result<&Level, DrawError> {
        self.levels.get(&level_no).ok_or(DrawError::MissingLevel(level_no))
    }

    pub fn level_mut(&mut self, level_no: u32) -> Result<&mut Level, DrawError> {
        self.levels
            .get_mut(&level_no)
            .ok_or(DrawError::MissingLevel(level_no))
    }

    /// Tick length for the coming cycle given the current leading level
    pub fn cycle_duration_ms(&self, max_level: u32) -> u64 {
        let progress = max_level as f64 / self.total_levels.max(1) as f64;
        let factor = DURATION_BASE_FACTOR + progress * DURATION_LEVEL_FACTOR;
        (self.base_duration_ms as f64 * factor).round() as u64
    }

    pub fn base_duration(&self) -> Duration {
        Duration::from_millis(self.base_duration_ms)
    }

    pub fn current_duration(&self) -> Duration {
        Duration::from_millis(self.current_duration_ms)
    }
}
