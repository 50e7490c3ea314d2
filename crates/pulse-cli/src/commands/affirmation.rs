use clap::Args;
use pulse_core::routine::affirmation;
use pulse_core::RngChooser;

#[derive(Args)]
pub struct AffirmationArgs {
    /// Seed for a reproducible pick
    #[arg(long)]
    seed: Option<u64>,
}

pub fn run(args: AffirmationArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut chooser = RngChooser::new(args.seed);
    println!("{}", affirmation(&mut chooser));
    Ok(())
}
