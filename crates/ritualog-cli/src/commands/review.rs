use clap::Subcommand;
use ritualog_core::DateKey;
use serde_json::json;

use super::{day_or_today, print_json, CmdResult, Context};

#[derive(Subcommand)]
pub enum ReviewAction {
    /// Everything logged on one day
    Day {
        #[arg(long)]
        date: Option<DateKey>,
    },
    /// Streaks and totals over the last thirty days
    Progress {
        /// Reference day (default: today)
        #[arg(long)]
        as_of: Option<DateKey>,
    },
    /// Computed scores for the week containing a day
    Week {
        #[arg(long)]
        date: Option<DateKey>,
    },
}

pub fn run(action: ReviewAction, ctx: &Context) -> CmdResult {
    let journal = ctx.journal()?;
    let (db, user) = (&journal.db, &journal.user);

    match action {
        ReviewAction::Day { date } => {
            print_json(&db.day_summary(user, day_or_today(date))?)?;
        }
        ReviewAction::Progress { as_of } => {
            let stats = db.progress_stats(
                user,
                day_or_today(as_of),
                &journal.config.streak_calculator(),
            )?;
            print_json(&stats)?;
        }
        ReviewAction::Week { date } => {
            let overview = db.weekly_overview(user, day_or_today(date))?;
            let suggested = overview.suggested_review();
            print_json(&json!({ "overview": overview, "suggested": suggested }))?;
        }
    }

    journal.finish();
    Ok(())
}
