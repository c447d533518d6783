use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "ritualog-cli", version, about = "Ritualog journal CLI")]
struct Cli {
    /// Journal owner id (defaults to `user.id` in the config file)
    #[arg(long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Daily entries and the morning/evening rituals
    Day {
        #[command(subcommand)]
        action: commands::day::DayAction,
    },
    /// Habit definitions and completions
    Habit {
        #[command(subcommand)]
        action: commands::habit::HabitAction,
    },
    /// Life task, skills and practice sessions
    Mastery {
        #[command(subcommand)]
        action: commands::mastery::MasteryAction,
    },
    /// Sleep and training protocols
    Protocol {
        #[command(subcommand)]
        action: commands::protocol::ProtocolAction,
    },
    /// Screen time and media diet
    Consumption {
        #[command(subcommand)]
        action: commands::consumption::ConsumptionAction,
    },
    /// Creative entries, projects and ideas
    Creative {
        #[command(subcommand)]
        action: commands::creative::CreativeAction,
    },
    /// Reflections and weekly reviews
    Reflect {
        #[command(subcommand)]
        action: commands::reflect::ReflectAction,
    },
    /// Day summaries, progress and the weekly overview
    Review {
        #[command(subcommand)]
        action: commands::review::ReviewAction,
    },
    /// Prompt of the day
    Prompt {
        #[command(subcommand)]
        action: commands::prompt::PromptAction,
    },
    /// Streak calculation over arbitrary dates
    Streak {
        #[command(subcommand)]
        action: commands::streak::StreakAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ctx = commands::Context { user: cli.user };
    let result = match cli.command {
        Commands::Day { action } => commands::day::run(action, &ctx),
        Commands::Habit { action } => commands::habit::run(action, &ctx),
        Commands::Mastery { action } => commands::mastery::run(action, &ctx),
        Commands::Protocol { action } => commands::protocol::run(action, &ctx),
        Commands::Consumption { action } => commands::consumption::run(action, &ctx),
        Commands::Creative { action } => commands::creative::run(action, &ctx),
        Commands::Reflect { action } => commands::reflect::run(action, &ctx),
        Commands::Review { action } => commands::review::run(action, &ctx),
        Commands::Prompt { action } => commands::prompt::run(action),
        Commands::Streak { action } => commands::streak::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
