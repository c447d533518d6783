//! Daily entry commands for CLI.

use clap::Subcommand;
use ritualog_core::records::{EveningLog, MorningLog};
use ritualog_core::DateKey;

use super::{day_or_today, print_json, CmdResult, Context};

#[derive(Subcommand)]
pub enum DayAction {
    /// Show one day's entry with its logs
    Show {
        /// Day as YYYY-MM-DD (default: today)
        #[arg(long, conflicts_with = "days_ago")]
        date: Option<DateKey>,
        /// Day counted back from today (0 is today)
        #[arg(long)]
        days_ago: Option<i64>,
    },
    /// List recent entries, newest first
    List,
    /// Save the morning ritual (unset fields keep their stored value)
    Morning {
        #[arg(long)]
        date: Option<DateKey>,
        /// Wake time as HH:MM
        #[arg(long)]
        wake_time: Option<String>,
        #[arg(long)]
        sunlight_minutes: Option<u32>,
        /// Caffeine delayed 90 minutes after waking
        #[arg(long)]
        caffeine_delayed: Option<bool>,
        #[arg(long)]
        cold_exposure: Option<bool>,
        #[arg(long)]
        meditation_minutes: Option<u32>,
        #[arg(long)]
        exercise_done: Option<bool>,
        #[arg(long)]
        intention: Option<String>,
        #[arg(long)]
        affirmation: Option<String>,
        #[arg(long)]
        observation: Option<String>,
        /// Top three priorities
        #[arg(long)]
        top3: Option<String>,
    },
    /// Save the evening review (unset fields keep their stored value)
    Evening {
        #[arg(long)]
        date: Option<DateKey>,
        #[arg(long)]
        wins: Option<String>,
        #[arg(long)]
        owned_failure: Option<String>,
        #[arg(long)]
        emotional_pattern: Option<String>,
        #[arg(long)]
        shadow_insight: Option<String>,
        #[arg(long)]
        creative_capture: Option<String>,
        #[arg(long)]
        tomorrow_focus: Option<String>,
        /// Target bedtime as HH:MM
        #[arg(long)]
        sleep_target: Option<String>,
    },
}

pub fn run(action: DayAction, ctx: &Context) -> CmdResult {
    let journal = ctx.journal()?;
    let (db, user) = (&journal.db, &journal.user);

    match action {
        DayAction::Show { date, days_ago } => {
            let date = match days_ago {
                Some(n) => DateKey::days_ago(n),
                None => day_or_today(date),
            };
            let entry = db.get_daily_entry(user, date)?;
            print_json(&entry)?;
        }
        DayAction::List => {
            print_json(&db.list_daily_entries(user)?)?;
        }
        DayAction::Morning {
            date,
            wake_time,
            sunlight_minutes,
            caffeine_delayed,
            cold_exposure,
            meditation_minutes,
            exercise_done,
            intention,
            affirmation,
            observation,
            top3,
        } => {
            let log = MorningLog {
                wake_time,
                sunlight_minutes,
                caffeine_delayed_90min: caffeine_delayed,
                cold_exposure,
                meditation_minutes,
                exercise_done,
                intention,
                identity_affirmation: affirmation,
                creative_observation: observation,
                top3,
            };
            let entry = db.save_morning_log(user, day_or_today(date), &log)?;
            print_json(&entry)?;
        }
        DayAction::Evening {
            date,
            wins,
            owned_failure,
            emotional_pattern,
            shadow_insight,
            creative_capture,
            tomorrow_focus,
            sleep_target,
        } => {
            let log = EveningLog {
                wins,
                owned_failure,
                emotional_pattern,
                shadow_insight,
                creative_capture,
                tomorrow_focus,
                sleep_target_time: sleep_target,
            };
            let entry = db.save_evening_log(user, day_or_today(date), &log)?;
            print_json(&entry)?;
        }
    }

    journal.finish();
    Ok(())
}
