//! Progressive Draw - entrants race up a level ladder until the winners emerge
//!
//! Core modules:
//! - `sim`: Draw engine (entrants, levels, camera, phase machine)
//! - `platform`: Clock abstraction (wall clock / virtual clock)
//! - `persistence`: JSON save/load
//! - `settings`: Presets, UI parameters and the name list
//! - `history`: Completed draws and text export

pub mod error;
pub mod history;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;

pub use error::{DrawError, StoreError};
pub use history::{DrawRecord, History};
pub use settings::{Preset, Settings, UiParams};

/// Draw timing constants
pub mod consts {
    /// Base-duration ticks to wait after reset before the first cycle
    pub const SETTLE_TICKS: u32 = 2;
    /// Base-duration ticks to wait after the fall phase before reporting
    pub const FALL_TICKS: u32 = 2;

    /// Cycle length = base * (BASE + max_level / total_levels * LEVEL)
    pub const DURATION_BASE_FACTOR: f64 = 0.6;
    pub const DURATION_LEVEL_FACTOR: f64 = 0.7;
}
