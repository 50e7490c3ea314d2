use clap::Subcommand;
use pulse_core::{Config, Routine, RoutineId};
use serde::Serialize;

use super::player::{play_sequence, PlayOptions};

#[derive(Subcommand)]
pub enum RoutineAction {
    /// List available routines
    List,
    /// Print a routine's phases as JSON
    Show {
        /// Routine id (morning, evening, sleep)
        id: RoutineId,
    },
    /// Play a routine
    Play {
        /// Routine id (morning, evening, sleep)
        id: RoutineId,
        /// One second per phase
        #[arg(long)]
        quick: bool,
        /// Advance automatically when a phase is ready
        #[arg(long)]
        auto: bool,
        /// Override the tick length in milliseconds
        #[arg(long)]
        tick_ms: Option<u64>,
    },
}

#[derive(Serialize)]
struct RoutineSummary {
    id: RoutineId,
    title: &'static str,
    subtitle: &'static str,
    duration: &'static str,
    emoji: &'static str,
    phases: usize,
    total_secs: u64,
}

impl From<&Routine> for RoutineSummary {
    fn from(r: &Routine) -> Self {
        Self {
            id: r.id,
            title: r.title,
            subtitle: r.subtitle,
            duration: r.duration_display,
            emoji: r.emoji,
            phases: r.sequence.len(),
            total_secs: r.sequence.total_duration_secs(),
        }
    }
}

pub fn run(action: RoutineAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        RoutineAction::List => {
            let summaries: Vec<RoutineSummary> = Routine::all().iter().map(RoutineSummary::from).collect();
            println!("{}", serde_json::to_string_pretty(&summaries)?);
        }
        RoutineAction::Show { id } => {
            let routine = Routine::get(id);
            println!("{}", serde_json::to_string_pretty(&routine.sequence)?);
        }
        RoutineAction::Play { id, quick, auto, tick_ms } => {
            let config = Config::load_or_default();
            let routine = Routine::get(id);
            let sequence = if quick || config.routines.quick {
                routine.sequence.quick()
            } else {
                routine.sequence
            };
            let tick = tick_ms
                .filter(|ms| *ms > 0)
                .map(std::time::Duration::from_millis)
                .unwrap_or_else(|| config.tick());
            play_sequence(sequence, PlayOptions { tick, auto })?;
        }
    }
    Ok(())
}
