//! Entrant: a named participant and its per-run draw state

use serde::{Deserialize, Serialize};

/// Stable handle of an entrant: its index in the scene's entrant list
pub type EntrantId = usize;

/// A participant moving up the ladder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entrant {
    /// Display identity
    pub name: String,
    /// Secondary label, shown in front of the name
    pub detail: Option<String>,
    /// Current level (1-based while the run is underway)
    pub level: u32,
    /// Accumulated activation energy
    #[serde(skip)]
    pub activation: f64,
    /// Cleared by motion; set by activate when the threshold is met
    #[serde(skip)]
    pub activated: bool,
    /// Rank of winning, 0 while not won
    #[serde(skip)]
    pub won_no: u32,
    /// Slot index within the current level (layout only)
    #[serde(skip)]
    pub horizontal_position: i32,
}

impl Entrant {
    pub fn new(name: impl Into<String>, detail: Option<String>) -> Self {
        Self {
            name: name.into(),
            detail,
            level: 1,
            activation: 0.0,
            activated: false,
            won_no: 0,
            horizontal_position: 0,
        }
    }

    /// Parse a raw name-list line of the form `name<delimiter>detail`.
    ///
    /// Both parts are trimmed; an empty detail is dropped. Returns `None` for
    /// blank lines.
    pub fn parse(raw: &str, delimiter: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        let (name, detail) = match raw.split_once(delimiter).filter(|_| !delimiter.is_empty()) {
            Some((name, detail)) => {
                let detail = detail.trim();
                (name.trim(), (!detail.is_empty()).then(|| detail.to_string()))
            }
            None => (raw, None),
        };

        if name.is_empty() {
            return None;
        }
        Some(Self::new(name, detail))
    }

    /// Detail and name joined by a single space; the identity key for
    /// past-winner exclusion
    pub fn full_name(&self) -> String {
        match &self.detail {
            Some(detail) => format!("{detail} {}", self.name),
            None => self.name.clone(),
        }
    }

    /// Clear per-run state, keeping identity
    pub fn reset(&mut self) {
        self.level = 1;
        self.activation = 0.0;
        self.activated = false;
        self.won_no = 0;
    }

    /// Mark as the `rank`-th winner
    pub fn win(&mut self, rank: u32) {
        self.won_no = rank;
        self.activation = 0.0;
    }

    #[inline]
    pub fn won(&self) -> bool {
        self.won_no > 0
    }
}

/// Parse a whole name list, skipping blank lines.
///
/// Duplicate full names are kept but logged, since past-winner exclusion
/// treats them as the same person.
pub fn parse_name_list<S: AsRef<str>>(lines: &[S], delimiter: &str) -> Vec<Entrant> {
    let entrants: Vec<Entrant> = lines
        .iter()
        .filter_map(|line| Entrant::parse(line.as_ref(), delimiter))
        .collect();

    let mut seen = std::collections::HashSet::new();
    for entrant in &entrants {
        let full = entrant.full_name();
        if !seen.insert(full.clone()) {
            log::warn!("Duplicate entrant name in list: {full}");
        }
    }

    entrants
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_name() {
        let e = Entrant::parse("  Alice  ", ",").unwrap();
        assert_eq!(e.name, "Alice");
        assert_eq!(e.detail, None);
        assert_eq!(e.full_name(), "Alice");
    }

    #[test]
    fn test_parse_with_detail() {
        let e = Entrant::parse("Alice, E1024", ",").unwrap();
        assert_eq!(e.name, "Alice");
        assert_eq!(e.detail.as_deref(), Some("E1024"));
        assert_eq!(e.full_name(), "E1024 Alice");
    }

    #[test]
    fn test_parse_blank_and_empty_detail() {
        assert!(Entrant::parse("   ", ",").is_none());
        assert!(Entrant::parse(", E1", ",").is_none());
        let e = Entrant::parse("Bob,", ",").unwrap();
        assert_eq!(e.detail, None);
    }

    #[test]
    fn test_reset_and_win() {
        let mut e = Entrant::new("Carol", None);
        e.level = 5;
        e.activation = 2.5;
        e.activated = true;
        e.win(3);
        assert!(e.won());
        assert_eq!(e.won_no, 3);
        assert_eq!(e.activation, 0.0);

        e.reset();
        assert_eq!(e.level, 1);
        assert!(!e.activated);
        assert!(!e.won());
        assert_eq!(e.name, "Carol");
    }

    #[test]
    fn test_parse_name_list_skips_blanks() {
        let lines = ["Alice", "", "Bob\tSales", "  "];
        let entrants = parse_name_list(&lines, "\t");
        assert_eq!(entrants.len(), 2);
        assert_eq!(entrants[1].full_name(), "Sales Bob");
    }
}
