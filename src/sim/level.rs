//! Level: one rung of the ladder and its horizontal slot bookkeeping
//!
//! Members are entrant handles kept in arrival order. Occupied slots are
//! always the contiguous range `[left_most, right_most]` around slot 0:
//! - add: the first member takes slot 0, later members extend whichever
//!   side has the smaller bound magnitude (ties go right)
//! - remove: members further out on the vacated side shift inward by one
//!   and that side's bound contracts

use serde::{Deserialize, Serialize};

use super::entrant::{Entrant, EntrantId};
use crate::error::DrawError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    entrants: Vec<EntrantId>,
    pub left_most: i32,
    pub right_most: i32,
}

impl Level {
    pub fn new() -> Self {
        Self::default()
    }

    /// Members in arrival order
    pub fn entrants(&self) -> &[EntrantId] {
        &self.entrants
    }

    pub fn len(&self) -> usize {
        self.entrants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entrants.is_empty()
    }

    pub fn contains(&self, id: EntrantId) -> bool {
        self.entrants.contains(&id)
    }

    /// Place an entrant on the level and assign its slot
    pub fn add_entrant(&mut self, id: EntrantId, pool: &mut [Entrant]) {
        debug_assert!(!self.contains(id), "entrant {id} added twice");

        let position = if self.entrants.is_empty() {
            self.left_most = 0;
            self.right_most = 0;
            0
        } else if self.left_most.abs() >= self.right_most.abs() {
            self.right_most += 1;
            self.right_most
        } else {
            self.left_most -= 1;
            self.left_most
        };

        pool[id].horizontal_position = position;
        self.entrants.push(id);
    }

    /// Take an entrant off the level, closing the gap it leaves.
    ///
    /// Must be called before the entrant's `level` changes.
    pub fn remove_entrant(&mut self, id: EntrantId, pool: &mut [Entrant]) -> Result<(), DrawError> {
        let index = self
            .entrants
            .iter()
            .position(|&member| member == id)
            .ok_or(DrawError::NotInLevel {
                entrant: id,
                level: pool[id].level,
            })?;
        self.entrants.remove(index);

        if self.entrants.is_empty() {
            self.left_most = 0;
            self.right_most = 0;
            return Ok(());
        }

        let removed = pool[id].horizontal_position;
        // A centre removal collapses the heavier side into slot 0
        let shrink_right = removed > 0 || (removed == 0 && self.right_most >= -self.left_most);

        if shrink_right {
            for &member in &self.entrants {
                let slot = &mut pool[member].horizontal_position;
                if *slot > removed {
                    *slot -= 1;
                }
            }
            self.right_most -= 1;
        } else {
            for &member in &self.entrants {
                let slot = &mut pool[member].horizontal_position;
                if *slot < removed {
                    *slot += 1;
                }
            }
            self.left_most += 1;
        }

        Ok(())
    }

    /// Drop all members and re-centre
    pub fn clear(&mut self) {
        self.entrants.clear();
        self.left_most = 0;
        self.right_most = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pool(n: usize) -> Vec<Entrant> {
        (0..n).map(|i| Entrant::new(format!("E{i}"), None)).collect()
    }

    fn positions(level: &Level, pool: &[Entrant]) -> Vec<i32> {
        let mut slots: Vec<i32> = level
            .entrants()
            .iter()
            .map(|&id| pool[id].horizontal_position)
            .collect();
        slots.sort_unstable();
        slots
    }

    fn assert_contiguous(level: &Level, pool: &[Entrant]) {
        if level.is_empty() {
            return;
        }
        let expected: Vec<i32> = (level.left_most..=level.right_most).collect();
        assert_eq!(positions(level, pool), expected);
    }

    #[test]
    fn test_add_alternates_sides() {
        let mut p = pool(5);
        let mut level = Level::new();
        for id in 0..5 {
            level.add_entrant(id, &mut p);
        }
        let slots: Vec<i32> = (0..5).map(|id| p[id].horizontal_position).collect();
        assert_eq!(slots, vec![0, 1, -1, 2, -2]);
        assert_eq!((level.left_most, level.right_most), (-2, 2));
    }

    #[test]
    fn test_remove_right_side_shifts_outer_members() {
        let mut p = pool(5);
        let mut level = Level::new();
        for id in 0..5 {
            level.add_entrant(id, &mut p);
        }
        // Entrant 1 sits at +1; entrant 3 at +2 slides in
        level.remove_entrant(1, &mut p).unwrap();
        assert_eq!(p[3].horizontal_position, 1);
        assert_eq!(p[4].horizontal_position, -2);
        assert_eq!((level.left_most, level.right_most), (-2, 1));
        assert_contiguous(&level, &p);
    }

    #[test]
    fn test_remove_left_side_shifts_outer_members() {
        let mut p = pool(5);
        let mut level = Level::new();
        for id in 0..5 {
            level.add_entrant(id, &mut p);
        }
        level.remove_entrant(2, &mut p).unwrap();
        assert_eq!(p[4].horizontal_position, -1);
        assert_eq!((level.left_most, level.right_most), (-1, 2));
        assert_contiguous(&level, &p);
    }

    #[test]
    fn test_remove_centre() {
        let mut p = pool(3);
        let mut level = Level::new();
        for id in 0..3 {
            level.add_entrant(id, &mut p);
        }
        level.remove_entrant(0, &mut p).unwrap();
        assert_contiguous(&level, &p);
        assert_eq!(level.len(), 2);
    }

    #[test]
    fn test_remove_last_member_recentres() {
        let mut p = pool(1);
        let mut level = Level::new();
        level.add_entrant(0, &mut p);
        level.remove_entrant(0, &mut p).unwrap();
        assert!(level.is_empty());
        assert_eq!((level.left_most, level.right_most), (0, 0));
    }

    #[test]
    fn test_remove_absent_is_error() {
        let mut p = pool(2);
        let mut level = Level::new();
        level.add_entrant(0, &mut p);
        assert_eq!(
            level.remove_entrant(1, &mut p),
            Err(DrawError::NotInLevel { entrant: 1, level: 1 })
        );
    }

    proptest! {
        #[test]
        fn prop_slots_stay_unique_and_in_bounds(ops in proptest::collection::vec((any::<bool>(), 0usize..12), 1..80)) {
            let mut p = pool(12);
            let mut level = Level::new();
            for (add, id) in ops {
                if add && !level.contains(id) {
                    level.add_entrant(id, &mut p);
                } else if !add && level.contains(id) {
                    level.remove_entrant(id, &mut p).unwrap();
                }

                let slots = positions(&level, &p);
                let mut deduped = slots.clone();
                deduped.dedup();
                prop_assert_eq!(&slots, &deduped);
                for slot in &slots {
                    prop_assert!(*slot >= level.left_most && *slot <= level.right_most);
                }
                if !level.is_empty() {
                    prop_assert_eq!(slots.len() as i32, level.right_most - level.left_most + 1);
                }
            }
        }
    }
}
