use clap::Subcommand;
use pulse_core::routine::SOUNDS;
use pulse_core::{Config, Database, LoggingSink, RngChooser, SoundPicker};

#[derive(Subcommand)]
pub enum SoundAction {
    /// List ambient sounds
    List,
    /// Play a sound, or stop it if it is already playing
    Play {
        /// Sound id (e.g. rain, ocean, fire)
        id: String,
    },
    /// Play a random sound different from the last one
    Random {
        /// Seed for a reproducible pick
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Stop the current sound
    Stop,
    /// Print the current and last played sound as JSON
    Status,
}

pub fn run(action: SoundAction) -> Result<(), Box<dyn std::error::Error>> {
    if let SoundAction::List = action {
        println!("{}", serde_json::to_string_pretty(&SOUNDS)?);
        return Ok(());
    }

    let config = Config::load_or_default();
    let db = Database::open()?;
    let mut picker = SoundPicker::new(LoggingSink::default())
        .avoid_repeat(config.sounds.avoid_repeat)
        .restore(&db)?;

    match action {
        SoundAction::List => {}
        SoundAction::Play { id } => {
            let event = picker.toggle(&id)?;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        SoundAction::Random { seed } => {
            let event = picker.play_random(&mut RngChooser::new(seed))?;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        SoundAction::Stop => match picker.stop() {
            Some(event) => println!("{}", serde_json::to_string_pretty(&event)?),
            None => println!("nothing playing"),
        },
        SoundAction::Status => {
            let value = serde_json::json!({
                "current": picker.current(),
                "last_played": picker.last_played(),
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }

    picker.save(&db)?;
    Ok(())
}
