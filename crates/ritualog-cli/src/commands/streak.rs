use clap::Subcommand;
use ritualog_core::{Config, DateKey, FutureDatePolicy, StreakCalculator};

use super::CmdResult;

fn parse_policy(raw: &str) -> Result<FutureDatePolicy, String> {
    match raw {
        "ignore" => Ok(FutureDatePolicy::Ignore),
        "break" => Ok(FutureDatePolicy::Break),
        other => Err(format!("expected `ignore` or `break`, got `{other}`")),
    }
}

#[derive(Subcommand)]
pub enum StreakAction {
    /// Count the streak of consecutive days ending at the reference day
    Compute {
        /// Completion days as YYYY-MM-DD, in any order
        dates: Vec<String>,
        /// Reference day (default: today)
        #[arg(long)]
        as_of: Option<String>,
        /// Handling of days after the reference day: ignore or break
        /// (default: `streak.future_dates` from the config)
        #[arg(long, value_parser = parse_policy)]
        future: Option<FutureDatePolicy>,
    },
}

pub fn run(action: StreakAction) -> CmdResult {
    match action {
        StreakAction::Compute {
            dates,
            as_of,
            future,
        } => {
            let as_of = as_of.unwrap_or_else(|| DateKey::today().to_string());
            let policy = future.unwrap_or_else(|| Config::load_or_default().streak.future_dates);
            let streak = StreakCalculator::with_policy(policy).compute_str(&dates, &as_of)?;
            tracing::debug!(?policy, streak, "streak computed");
            println!("{streak}");
        }
    }
    Ok(())
}
