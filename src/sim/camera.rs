//! Visible window over the ladder

use serde::{Deserialize, Serialize};

/// Which levels are on screen: `bottom ..= bottom + levels - 1`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Camera {
    /// Lowest visible level number (>= 1)
    pub bottom: u32,
    /// Number of simultaneously visible levels
    pub levels: u32,
}

impl Default for Camera {
    fn default() -> Self {
        Self { bottom: 1, levels: 1 }
    }
}

impl Camera {
    pub fn reset(&mut self, levels: u32) {
        self.bottom = 1;
        self.levels = levels;
    }

    /// Advance one level when the leading edge is within a level of the top
    /// of the window. Returns true if the camera moved.
    pub fn follow(&mut self, max_level: u32) -> bool {
        if self.bottom + self.levels <= max_level + 2 {
            self.bottom += 1;
            true
        } else {
            false
        }
    }

    /// Highest visible level number
    pub fn top(&self) -> u32 {
        self.bottom + self.levels.saturating_sub(1)
    }
}
