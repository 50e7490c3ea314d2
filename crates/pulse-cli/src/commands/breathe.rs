use clap::Args;
use pulse_core::{BreathPattern, BreathingCycle, Config};

use super::player::play_breathing;

#[derive(Args)]
pub struct BreatheArgs {
    /// Inhale seconds (defaults to breathing.inhale)
    #[arg(long)]
    inhale: Option<u64>,
    /// Hold seconds, 0 to skip (defaults to breathing.hold)
    #[arg(long)]
    hold: Option<u64>,
    /// Exhale seconds (defaults to breathing.exhale)
    #[arg(long)]
    exhale: Option<u64>,
    /// Countdown before the first inhale (defaults to breathing.lead_in)
    #[arg(long)]
    lead_in: Option<u64>,
    /// Stop after this many full breaths
    #[arg(long)]
    cycles: Option<u64>,
    /// Override the tick length in milliseconds
    #[arg(long)]
    tick_ms: Option<u64>,
}

pub fn run(args: BreatheArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let pattern = BreathPattern::with_hold(
        args.inhale.unwrap_or(config.breathing.inhale),
        args.hold.unwrap_or(config.breathing.hold),
        args.exhale.unwrap_or(config.breathing.exhale),
    );
    let cycle = BreathingCycle::new(pattern)?.with_lead_in(args.lead_in.unwrap_or(config.breathing.lead_in));

    let tick = args
        .tick_ms
        .filter(|ms| *ms > 0)
        .map(std::time::Duration::from_millis)
        .unwrap_or_else(|| config.tick());
    play_breathing(cycle, tick, args.cycles)
}
