use clap::Args;
use pulse_core::routine::{calming_flow, ReleaseOption};
use pulse_core::{Config, RngChooser};

use super::player::{play_sequence, PlayOptions};

#[derive(Args)]
pub struct FlowArgs {
    /// Tension release exercise (pressure, hug)
    #[arg(long, default_value = "pressure")]
    release: ReleaseOption,
    /// Seed for the coping phrase and closure action
    #[arg(long)]
    seed: Option<u64>,
    /// Advance automatically when a phase is ready
    #[arg(long)]
    auto: bool,
    /// Print the generated phases as JSON instead of playing them
    #[arg(long)]
    show: bool,
    /// Override the tick length in milliseconds
    #[arg(long)]
    tick_ms: Option<u64>,
}

pub fn run(args: FlowArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut chooser = RngChooser::new(args.seed);
    let sequence = calming_flow(&config.flow_settings(), args.release, &mut chooser)?;

    if args.show {
        println!("{}", serde_json::to_string_pretty(&sequence)?);
        return Ok(());
    }

    let tick = args
        .tick_ms
        .filter(|ms| *ms > 0)
        .map(std::time::Duration::from_millis)
        .unwrap_or_else(|| config.tick());
    play_sequence(sequence, PlayOptions { tick, auto: args.auto })
}
