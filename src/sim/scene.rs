//! Scene: owns the entrants, camera and run context and drives a draw
//!
//! Observers read `is_active`, `camera` and `draw_state`; the only control
//! surface is `start_animate` (or `reset` + repeated `tick` for callers that
//! schedule phases themselves).

use std::collections::HashSet;
use std::time::Duration;

use super::camera::Camera;
use super::entrant::{Entrant, EntrantId};
use super::level::Level;
use super::state::{DrawState, Phase, RandomSource};
use super::tick::tick;
use crate::error::DrawError;
use crate::history::DrawRecord;
use crate::platform::Clock;
use crate::settings::{Preset, UiParams};

#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub(crate) entrants: Vec<Entrant>,
    pub(crate) draw: DrawState,
    pub(crate) camera: Camera,
    pub(crate) active: bool,
    pub(crate) phase: Phase,
}

impl Scene {
    pub fn new(entrants: Vec<Entrant>) -> Self {
        Self {
            entrants,
            ..Default::default()
        }
    }

    /// Replace the entrant pool between runs
    pub fn set_entrants(&mut self, entrants: Vec<Entrant>) -> Result<(), DrawError> {
        if self.phase != Phase::Idle {
            return Err(DrawError::AlreadyActive);
        }
        self.entrants = entrants;
        self.draw = DrawState::default();
        Ok(())
    }

    pub fn entrants(&self) -> &[Entrant] {
        &self.entrants
    }

    /// True from reset until the last winner is crowned
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn draw_state(&self) -> &DrawState {
        &self.draw
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Entrants not excluded by the past-winners set
    pub fn participated_entrants(&self) -> impl Iterator<Item = EntrantId> + '_ {
        eligible(&self.entrants, &self.draw.past_winners)
    }

    /// Participants that have not won yet
    pub fn underway_entrants(&self) -> impl Iterator<Item = EntrantId> + '_ {
        self.participated_entrants()
            .filter(|&id| !self.entrants[id].won())
    }

    /// Highest level among participants, winners included
    pub fn max_level(&self) -> Result<u32, DrawError> {
        self.participated_entrants()
            .map(|id| self.entrants[id].level)
            .max()
            .ok_or(DrawError::EmptyPool)
    }

    /// Prepare a new run: every participant back on level 1, camera at the
    /// bottom, counters loaded from the preset.
    ///
    /// On error the scene is left exactly as it was.
    pub fn reset(
        &mut self,
        preset: &Preset,
        ui: &UiParams,
        past_winners: HashSet<String>,
        now: Duration,
    ) -> Result<(), DrawError> {
        let participants: Vec<EntrantId> = eligible(&self.entrants, &past_winners).collect();
        if participants.is_empty() {
            return Err(DrawError::EmptyPool);
        }
        if participants.len() < preset.total_count {
            return Err(DrawError::NotEnoughEntrants {
                wanted: preset.total_count,
                available: participants.len(),
            });
        }

        // Validates before touching any field
        self.draw.configure(preset, ui, past_winners, now)?;

        self.camera.reset(preset.display_levels);

        let mut first = Level::new();
        for id in participants {
            self.entrants[id].reset();
            first.add_entrant(id, &mut self.entrants);
        }
        self.draw.levels.insert(1, first);

        self.active = true;
        self.phase = Phase::Settle;
        log::info!(
            "Draw '{}' reset: {} entrants, {} winners over {} levels",
            preset.award_name,
            self.draw.levels.get(&1).map_or(0, |l| l.len()),
            preset.total_count,
            preset.total_levels
        );
        Ok(())
    }

    /// Run a whole draw, sleeping on `clock` between phases, and hand the
    /// completed record to `on_finish`
    pub fn start_animate<C, R, F>(
        &mut self,
        preset: &Preset,
        ui: &UiParams,
        past_winners: HashSet<String>,
        clock: &mut C,
        rng: &mut R,
        on_finish: F,
    ) -> Result<(), DrawError>
    where
        C: Clock + ?Sized,
        R: RandomSource + ?Sized,
        F: FnOnce(DrawRecord),
    {
        if self.phase != Phase::Idle {
            return Err(DrawError::AlreadyActive);
        }
        self.reset(preset, ui, past_winners, clock.now())?;

        loop {
            let outcome = match tick(self, rng, clock.now()) {
                Ok(outcome) => outcome,
                Err(err) => {
                    log::error!("Draw aborted: {err}");
                    self.abort();
                    return Err(err);
                }
            };

            if let Some(record) = outcome.record {
                on_finish(record);
                return Ok(());
            }
            clock.sleep(outcome.delay);
        }
    }

    /// Completed-draw summary as of `now`
    pub fn summary(&self, now: Duration) -> DrawRecord {
        DrawRecord {
            award_name: self.draw.award_name.clone(),
            duration_sec: now.saturating_sub(self.draw.start_timestamp).as_secs_f64(),
            winners: self
                .draw
                .winners
                .iter()
                .map(|&id| self.entrants[id].full_name())
                .collect(),
        }
    }

    fn abort(&mut self) {
        self.active = false;
        self.phase = Phase::Idle;
    }
}

fn eligible<'a>(
    entrants: &'a [Entrant],
    past_winners: &'a HashSet<String>,
) -> impl Iterator<Item = EntrantId> + 'a {
    entrants
        .iter()
        .enumerate()
        .filter(|(_, e)| !past_winners.contains(&e.full_name()))
        .map(|(id, _)| id)
}
