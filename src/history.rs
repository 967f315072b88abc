//! Completed-draw history
//!
//! One record per finished award, in the order the draws ran. Persisted as
//! JSON; exported as plain text for printing.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::persistence::{load_json, save_json};

/// Outcome of one draw, as reported by the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawRecord {
    pub award_name: String,
    /// Seconds from reset to report
    pub duration_sec: f64,
    /// Full display names in win order
    pub winners: Vec<String>,
}

/// Draw history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    pub draws: Vec<DrawRecord>,
}

impl History {
    /// Default file name, resolved against the working directory
    pub const DEFAULT_FILE: &'static str = "progressive_draw_history.json";

    pub fn new() -> Self {
        Self { draws: Vec::new() }
    }

    pub fn record(&mut self, draw: DrawRecord) {
        self.draws.push(draw);
    }

    /// Remove the draw at `index`, if any
    pub fn remove(&mut self, index: usize) -> Option<DrawRecord> {
        (index < self.draws.len()).then(|| self.draws.remove(index))
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    /// Everyone who has already won an award; excluded from later draws
    pub fn past_winners(&self) -> HashSet<String> {
        self.draws
            .iter()
            .flat_map(|d| d.winners.iter().cloned())
            .collect()
    }

    /// Plain-text report of every draw, separated by blank lines
    pub fn export_text(&self) -> String {
        self.draws
            .iter()
            .map(|draw| {
                let header = format!(
                    "Award: {}\n\tDuration: {} seconds\n\tWinners:",
                    draw.award_name,
                    format_seconds(draw.duration_sec)
                );
                let winners = draw
                    .winners
                    .iter()
                    .enumerate()
                    .map(|(i, winner)| format!("\t\t({}) {}", i + 1, winner));
                std::iter::once(header)
                    .chain(winners)
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Load history, starting fresh when the file does not exist
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        match load_json::<Self>(path)? {
            Some(history) => {
                log::info!("Loaded {} past draws", history.draws.len());
                Ok(history)
            }
            None => {
                log::warn!("No history at {}, starting fresh", path.display());
                Ok(Self::new())
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        save_json(path, self)?;
        log::info!("History saved ({} draws)", self.draws.len());
        Ok(())
    }
}

/// Whole seconds print without a fraction, everything else with one decimal
fn format_seconds(secs: f64) -> String {
    if secs.fract() == 0.0 {
        format!("{secs:.0}")
    } else {
        format!("{secs:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw(award: &str, secs: f64, winners: &[&str]) -> DrawRecord {
        DrawRecord {
            award_name: award.to_string(),
            duration_sec: secs,
            winners: winners.iter().map(|w| w.to_string()).collect(),
        }
    }

    #[test]
    fn test_record_and_remove() {
        let mut history = History::new();
        history.record(draw("First", 10.0, &["A"]));
        history.record(draw("Second", 12.0, &["B"]));

        assert!(history.remove(5).is_none());
        let removed = history.remove(0).unwrap();
        assert_eq!(removed.award_name, "First");
        assert_eq!(history.draws.len(), 1);
        assert_eq!(history.draws[0].award_name, "Second");
    }

    #[test]
    fn test_past_winners_union() {
        let mut history = History::new();
        history.record(draw("First", 10.0, &["A", "B"]));
        history.record(draw("Second", 12.0, &["C"]));
        let past = history.past_winners();
        assert_eq!(past.len(), 3);
        assert!(past.contains("B") && past.contains("C"));
    }

    #[test]
    fn test_export_text_format() {
        let mut history = History::new();
        history.record(draw("Grand Prize", 42.0, &["E1 Alice", "Bob"]));
        history.record(draw("Runner Up", 7.5, &["Carol"]));

        let expected = "Award: Grand Prize\n\tDuration: 42 seconds\n\tWinners:\n\t\t(1) E1 Alice\n\t\t(2) Bob\n\n\
                        Award: Runner Up\n\tDuration: 7.5 seconds\n\tWinners:\n\t\t(1) Carol";
        assert_eq!(history.export_text(), expected);
    }

    #[test]
    fn test_export_empty() {
        assert_eq!(History::new().export_text(), "");

        let mut history = History::new();
        history.record(draw("Consolation", 3.0, &[]));
        assert_eq!(
            history.export_text(),
            "Award: Consolation\n\tDuration: 3 seconds\n\tWinners:"
        );
    }

    #[test]
    fn test_load_missing_starts_fresh() {
        let path = std::env::temp_dir().join("progressive-draw-no-such-history.json");
        assert!(History::load(&path).unwrap().is_empty());
    }
}
