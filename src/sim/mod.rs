//! Draw simulation engine
//!
//! All draw logic lives here. The engine is deterministic given its inputs:
//! - Randomness only through an injected `RandomSource`
//! - Time only through the delays `tick` returns
//! - Stable iteration order (entrant list order, level arrival order)

pub mod camera;
pub mod entrant;
pub mod level;
pub mod scene;
pub mod state;
pub mod tick;

pub use camera::Camera;
pub use entrant::{Entrant, EntrantId, parse_name_list};
pub use level::Level;
pub use scene::Scene;
pub use state::{DrawState, Phase, RandomSource, RngState};
pub use tick::{TickOutcome, step_activate, step_fall, step_home, step_motion, tick};
