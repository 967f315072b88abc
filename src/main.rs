//! Progressive Draw entry point
//!
//! Headless driver: runs draws from a settings file and keeps the history.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};

use progressive_draw::platform::{Clock, SystemClock, VirtualClock};
use progressive_draw::sim::{RngState, Scene, parse_name_list};
use progressive_draw::{DrawRecord, History, Settings};

#[derive(Parser, Debug)]
#[command(
    name = "progressive-draw",
    version,
    about = "Run progressive prize draws and keep their history"
)]
struct Cli {
    /// Settings file (presets, name list, level caps).
    #[arg(long, default_value = Settings::DEFAULT_FILE)]
    settings: PathBuf,

    /// History file holding completed draws.
    #[arg(long, default_value = History::DEFAULT_FILE)]
    history: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one draw for a preset and append it to the history.
    Run {
        /// Award name of the preset to run.
        #[arg(short, long)]
        preset: String,
        /// Read names from this file instead of the settings name list.
        #[arg(short, long)]
        names: Option<PathBuf>,
        /// Seed for a reproducible draw; random when omitted.
        #[arg(long)]
        seed: Option<u64>,
        /// Pace phases on the wall clock instead of finishing immediately.
        #[arg(long)]
        realtime: bool,
    },
    /// Print the draw history as text.
    History,
    /// Delete one history entry (1-based, as printed by `history`).
    HistoryRemove { index: usize },
    /// List configured presets.
    Presets,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::info!("Progressive Draw starting...");

    match cli.command {
        Command::Run {
            preset,
            names,
            seed,
            realtime,
        } => run_draw(&cli.settings, &cli.history, &preset, names, seed, realtime),
        Command::History => {
            let history = History::load(&cli.history)?;
            if history.is_empty() {
                println!("No draws recorded.");
            } else {
                println!("{}", history.export_text());
            }
            Ok(())
        }
        Command::HistoryRemove { index } => {
            let mut history = History::load(&cli.history)?;
            let removed = index
                .checked_sub(1)
                .and_then(|i| history.remove(i))
                .ok_or_else(|| anyhow!("no history entry #{index}"))?;
            history.save(&cli.history)?;
            println!("Removed '{}'", removed.award_name);
            Ok(())
        }
        Command::Presets => {
            let settings = Settings::load(&cli.settings)?;
            for p in &settings.presets {
                println!(
                    "{}: {} winners, {} levels, rate {}, {}ms",
                    p.award_name, p.total_count, p.total_levels, p.activation_rate, p.base_duration_ms
                );
            }
            Ok(())
        }
    }
}

fn run_draw(
    settings_path: &Path,
    history_path: &Path,
    award_name: &str,
    names: Option<PathBuf>,
    seed: Option<u64>,
    realtime: bool,
) -> Result<()> {
    let settings = Settings::load(settings_path)?;
    let preset = settings
        .preset(award_name)
        .with_context(|| format!("no preset named '{award_name}'"))?;

    let entrants = match names {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading names from {}", path.display()))?;
            let lines: Vec<&str> = text.lines().collect();
            parse_name_list(&lines, &settings.name_delimiter)
        }
        None => settings.entrants(),
    };
    if entrants.is_empty() {
        bail!("the name list is empty");
    }

    let mut history = History::load(history_path)?;
    let seed = seed.unwrap_or_else(rand::random);
    log::info!("Seed {seed}");
    let mut rng = RngState::new(seed).to_rng();

    let mut clock: Box<dyn Clock> = if realtime {
        Box::new(SystemClock::new())
    } else {
        Box::new(VirtualClock::new())
    };

    let mut scene = Scene::new(entrants);
    let mut finished: Option<DrawRecord> = None;
    scene.start_animate(
        preset,
        &settings.ui,
        history.past_winners(),
        clock.as_mut(),
        &mut rng,
        |record| finished = Some(record),
    )?;

    let record = finished.context("draw ended without a result")?;
    println!("{} ({:.1}s)", record.award_name, record.duration_sec);
    for (i, winner) in record.winners.iter().enumerate() {
        println!("  ({}) {}", i + 1, winner);
    }

    history.record(record);
    history.save(history_path)?;
    Ok(())
}
