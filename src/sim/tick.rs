//! Phase machine for a draw run
//!
//! `tick` executes whatever phase the scene is in and reports how long to
//! wait before the next one. One cycle is activate -> motion -> home; cycles
//! repeat until the last winner is crowned, then fall and report.

use std::time::Duration;

use super::entrant::{Entrant, EntrantId};
use super::scene::Scene;
use super::state::{Phase, RandomSource};
use crate::consts::{FALL_TICKS, SETTLE_TICKS};
use crate::error::DrawError;
use crate::history::DrawRecord;

/// Result of executing one phase
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    /// Phase that just ran
    pub phase: Phase,
    /// Wait before the next tick
    pub delay: Duration,
    /// Set once, by the report phase
    pub record: Option<DrawRecord>,
}

/// Execute the scene's current phase and advance to the next
pub fn tick<R: RandomSource + ?Sized>(
    scene: &mut Scene,
    rng: &mut R,
    now: Duration,
) -> Result<TickOutcome, DrawError> {
    let phase = scene.phase;
    let mut record = None;

    let (next, delay) = match phase {
        Phase::Idle => (Phase::Idle, Duration::ZERO),
        Phase::Settle => (Phase::Activate, scene.draw.base_duration() * SETTLE_TICKS),
        Phase::Activate => {
            let max_level = scene.max_level()?;
            scene.draw.current_duration_ms = scene.draw.cycle_duration_ms(max_level);
            step_activate(scene, rng)?;
            (Phase::Motion, scene.draw.current_duration())
        }
        Phase::Motion => {
            step_motion(scene)?;
            (Phase::Home, scene.draw.current_duration())
        }
        Phase::Home => {
            step_home(scene)?;
            let next = if scene.active { Phase::Activate } else { Phase::Fall };
            (next, scene.draw.current_duration())
        }
        Phase::Fall => {
            step_fall(scene);
            (Phase::Report, scene.draw.base_duration() * FALL_TICKS)
        }
        Phase::Report => {
            let summary = scene.summary(now);
            log::info!(
                "Draw '{}' finished in {:.1}s: {}",
                summary.award_name,
                summary.duration_sec,
                summary.winners.join(", ")
            );
            record = Some(summary);
            (Phase::Idle, Duration::ZERO)
        }
    };

    log::debug!("{phase:?} -> {next:?} after {}ms", delay.as_millis());
    scene.phase = next;
    Ok(TickOutcome {
        phase,
        delay,
        record,
    })
}

/// Accumulate activation for every underway entrant, then apply the
/// capacity funnel near the top of the ladder
pub fn step_activate<R: RandomSource + ?Sized>(
    scene: &mut Scene,
    rng: &mut R,
) -> Result<(), DrawError> {
    let underway: Vec<EntrantId> = scene.underway_entrants().collect();

    scene.draw.activation_threshold = 1.0 - scene.draw.activation_rate;
    scene.draw.advanced.clear();
    let threshold = scene.draw.activation_threshold;

    for id in underway {
        let entrant = &mut scene.entrants[id];
        entrant.activation += rng.next_unit();
        entrant.activated = entrant.activation >= threshold;
    }

    apply_level_caps(scene)
}

/// Limit how many entrants may leave each rung near the top.
///
/// The last rung may release at most `remaining_count`. Each rung below the
/// leading level may release at most its cap minus what the rung above it
/// still holds after its own departures.
fn apply_level_caps(scene: &mut Scene) -> Result<(), DrawError> {
    let max_level = scene.max_level()?;
    let last_rung = scene.draw.total_levels - 1;
    let span = scene.draw.level_count_cap.len() as u32;
    let lowest = max_level.saturating_sub(span).max(1);

    if let Some(level) = scene.draw.levels.get(&last_rung) {
        let activated = activated_members(level.entrants(), &scene.entrants);
        demote_excess(&mut scene.entrants, activated, scene.draw.remaining_count, last_rung);
    }

    // Entrants projected to stay on the rung above the one being examined
    let mut next_level_count = 0;
    for level_no in (lowest..=max_level).rev() {
        let Some(level) = scene.draw.levels.get(&level_no) else {
            next_level_count = 0;
            continue;
        };

        let members = level.len();
        let activated = activated_members(level.entrants(), &scene.entrants);
        let mut leaving = activated.len();

        if level_no < max_level && level_no != last_rung {
            let cap = scene.draw.level_count_cap[(max_level - level_no - 1) as usize];
            let vacancy = cap.saturating_sub(next_level_count);
            leaving = leaving.min(vacancy);
            demote_excess(&mut scene.entrants, activated, vacancy, level_no);
        }

        next_level_count = members - leaving;
    }

    Ok(())
}

fn activated_members(members: &[EntrantId], entrants: &[Entrant]) -> Vec<EntrantId> {
    members
        .iter()
        .copied()
        .filter(|&id| entrants[id].activated)
        .collect()
}

/// Keep the `allowed` highest activations; equal activations keep arrival
/// order
fn demote_excess(entrants: &mut [Entrant], mut activated: Vec<EntrantId>, allowed: usize, level_no: u32) {
    if activated.len() <= allowed {
        return;
    }

    activated.sort_by(|&a, &b| entrants[b].activation.total_cmp(&entrants[a].activation));
    log::debug!(
        "Level {level_no}: {} activated, {allowed} allowed",
        activated.len()
    );
    for &id in &activated[allowed..] {
        entrants[id].activated = false;
    }
}

/// Move every activated entrant up one level; crossing the top wins
pub fn step_motion(scene: &mut Scene) -> Result<(), DrawError> {
    let underway: Vec<EntrantId> = scene.underway_entrants().collect();

    for id in underway {
        if !scene.entrants[id].activated {
            continue;
        }
        scene.entrants[id].activated = false;

        let from = scene.entrants[id].level;
        scene.draw.level_mut(from)?.remove_entrant(id, &mut scene.entrants)?;

        let to = from + 1;
        scene.entrants[id].level = to;
        scene.draw.advanced.push(id);

        if to >= scene.draw.total_levels {
            debug_assert!(scene.draw.remaining_count > 0, "winner beyond total count");
            scene.draw.top_level.add_entrant(id, &mut scene.entrants);
            let rank = scene.draw.winners.len() as u32 + 1;
            scene.entrants[id].win(rank);
            scene.draw.winners.push(id);
            scene.draw.remaining_count = scene.draw.remaining_count.saturating_sub(1);
            log::info!("Winner #{rank}: {}", scene.entrants[id].full_name());

            if scene.draw.remaining_count == 0 {
                scene.active = false;
            }
        } else {
            scene
                .draw
                .levels
                .entry(to)
                .or_default()
                .add_entrant(id, &mut scene.entrants);
        }
    }

    Ok(())
}

/// Camera follow, then carry over or decay activation energy
pub fn step_home(scene: &mut Scene) -> Result<(), DrawError> {
    let max_level = scene.max_level()?;
    if scene.camera.follow(max_level) {
        log::debug!("Camera bottom -> {}", scene.camera.bottom);
    }

    let mut rose = vec![false; scene.entrants.len()];
    for &id in &scene.draw.advanced {
        rose[id] = true;
    }

    let threshold = scene.draw.activation_threshold;
    let attenuation = scene.draw.attenuation;
    let underway: Vec<EntrantId> = scene.underway_entrants().collect();
    for id in underway {
        let entrant = &mut scene.entrants[id];
        if rose[id] {
            entrant.activation -= threshold;
        } else {
            entrant.activation *= attenuation;
        }
    }

    Ok(())
}

/// Park everyone who did not win just below the viewport
pub fn step_fall(scene: &mut Scene) {
    let floor = scene.camera.bottom.saturating_sub(1);
    let losers: Vec<EntrantId> = scene.underway_entrants().collect();
    for id in losers {
        scene.entrants[id].level = floor;
    }
}
