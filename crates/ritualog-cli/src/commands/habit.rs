//! Habit commands for CLI.

use clap::Subcommand;
use ritualog_core::records::NewHabit;
use ritualog_core::DateKey;
use serde_json::json;

use super::{day_or_today, print_json, CmdResult, Context};

#[derive(Subcommand)]
pub enum HabitAction {
    /// Create a habit
    Create {
        /// Habit name
        name: String,
        /// Who doing this makes you ("I am someone who...")
        #[arg(long)]
        identity: Option<String>,
        #[arg(long)]
        cue: Option<String>,
        #[arg(long)]
        craving: Option<String>,
        #[arg(long)]
        response: Option<String>,
        #[arg(long)]
        reward: Option<String>,
        /// Version of the habit that takes two minutes or less
        #[arg(long)]
        two_minute: Option<String>,
        /// Frequency (default: daily)
        #[arg(long)]
        frequency: Option<String>,
    },
    /// List active habits
    List,
    /// Show one habit
    Get {
        /// Habit ID
        id: String,
    },
    /// Archive a habit (its completions are kept)
    Archive {
        /// Habit ID
        id: String,
    },
    /// Mark a habit done for a day
    Check {
        /// Habit ID
        id: String,
        #[arg(long)]
        date: Option<DateKey>,
        /// Satisfaction from 1 to 5
        #[arg(long)]
        satisfaction: Option<u8>,
    },
    /// Mark a habit not done for a day
    Uncheck {
        /// Habit ID
        id: String,
        #[arg(long)]
        date: Option<DateKey>,
    },
    /// Every active habit with its state on a day
    Today {
        #[arg(long)]
        date: Option<DateKey>,
    },
    /// Current streak of a habit
    Streak {
        /// Habit ID
        id: String,
        /// Reference day (default: today)
        #[arg(long)]
        as_of: Option<DateKey>,
    },
}

pub fn run(action: HabitAction, ctx: &Context) -> CmdResult {
    let journal = ctx.journal()?;
    let (db, user) = (&journal.db, &journal.user);

    match action {
        HabitAction::Create {
            name,
            identity,
            cue,
            craving,
            response,
            reward,
            two_minute,
            frequency,
        } => {
            let habit = db.create_habit(
                user,
                &NewHabit {
                    name,
                    identity_statement: identity,
                    cue,
                    craving,
                    response,
                    reward,
                    two_minute_version: two_minute,
                    frequency,
                },
            )?;
            print_json(&habit)?;
        }
        HabitAction::List => {
            print_json(&db.list_habits(user)?)?;
        }
        HabitAction::Get { id } => {
            print_json(&db.get_habit(user, &id)?)?;
        }
        HabitAction::Archive { id } => {
            db.archive_habit(user, &id)?;
            println!("Habit archived: {id}");
        }
        HabitAction::Check {
            id,
            date,
            satisfaction,
        } => {
            db.set_habit_completion(user, &id, day_or_today(date), true, satisfaction)?;
            println!("ok");
        }
        HabitAction::Uncheck { id, date } => {
            db.set_habit_completion(user, &id, day_or_today(date), false, None)?;
            println!("ok");
        }
        HabitAction::Today { date } => {
            let date = day_or_today(date);
            let habits = db.completions_for_date(user, date)?;
            let count = db.habit_count_for_date(user, date)?;
            print_json(&json!({
                "date": date,
                "habits": habits,
                "done": count.done,
                "total": count.total,
                "percent": count.percent(),
            }))?;
        }
        HabitAction::Streak { id, as_of } => {
            let streak = db.habit_streak(
                user,
                &id,
                day_or_today(as_of),
                &journal.config.streak_calculator(),
            )?;
            println!("{streak}");
        }
    }

    journal.finish();
    Ok(())
}
