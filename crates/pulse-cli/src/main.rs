use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "pulse-cli", version, about = "Pulse CLI")]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Guided routines (morning, evening, sleep)
    Routine {
        #[command(subcommand)]
        action: commands::routine::RoutineAction,
    },
    /// Run the calming flow
    Flow(commands::flow::FlowArgs),
    /// Free-running breathing exercise
    Breathe(commands::breathe::BreatheArgs),
    /// Mood tracking
    Mood {
        #[command(subcommand)]
        action: commands::mood::MoodAction,
    },
    /// Ambient sounds
    Sound {
        #[command(subcommand)]
        action: commands::sound::SoundAction,
    },
    /// Psychoeducation articles
    Article {
        #[command(subcommand)]
        action: commands::article::ArticleAction,
    },
    /// Print today's affirmation
    Affirmation(commands::affirmation::AffirmationArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions(commands::completions::CompletionsArgs),
}

fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Routine { action } => commands::routine::run(action),
        Commands::Flow(args) => commands::flow::run(args),
        Commands::Breathe(args) => commands::breathe::run(args),
        Commands::Mood { action } => commands::mood::run(action),
        Commands::Sound { action } => commands::sound::run(action),
        Commands::Article { action } => commands::article::run(action),
        Commands::Affirmation(args) => commands::affirmation::run(args),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
