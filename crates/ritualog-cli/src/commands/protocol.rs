//! Sleep and training commands for CLI.

use clap::Subcommand;
use ritualog_core::records::{NewWorkout, SleepLog, TrainingAdaptation};
use ritualog_core::DateKey;
use serde_json::json;

use super::{day_or_today, print_json, CmdResult, Context};

#[derive(Subcommand)]
pub enum ProtocolAction {
    /// Save the night's sleep (unset fields keep their stored value)
    Sleep {
        #[arg(long)]
        date: Option<DateKey>,
        /// Bedtime as HH:MM
        #[arg(long)]
        bedtime: Option<String>,
        /// Wake time as HH:MM
        #[arg(long)]
        wake_time: Option<String>,
        /// Quality from 1 to 10
        #[arg(long)]
        quality: Option<u8>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Show one night's sleep
    SleepShow {
        #[arg(long)]
        date: Option<DateKey>,
    },
    /// The last two weeks of sleep
    SleepRecent,
    /// Log a workout
    Workout {
        /// Workout type, e.g. Run or Lift
        workout_type: String,
        #[arg(long)]
        date: Option<DateKey>,
        /// Targeted adaptation, e.g. Strength or "VO2 Max"
        #[arg(long)]
        adaptation: Option<TrainingAdaptation>,
        #[arg(long)]
        duration: Option<u32>,
        /// Intensity from 1 to 10
        #[arg(long)]
        intensity: Option<u8>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Workouts on one day
    Workouts {
        #[arg(long)]
        date: Option<DateKey>,
    },
    /// Protocol adherence for the week containing a day
    Score {
        #[arg(long)]
        date: Option<DateKey>,
    },
}

pub fn run(action: ProtocolAction, ctx: &Context) -> CmdResult {
    let journal = ctx.journal()?;
    let (db, user) = (&journal.db, &journal.user);

    match action {
        ProtocolAction::Sleep {
            date,
            bedtime,
            wake_time,
            quality,
            notes,
        } => {
            let log = SleepLog {
                bedtime,
                wake_time,
                quality,
                notes,
            };
            print_json(&db.save_sleep_log(user, day_or_today(date), &log)?)?;
        }
        ProtocolAction::SleepShow { date } => {
            print_json(&db.get_sleep_log(user, day_or_today(date))?)?;
        }
        ProtocolAction::SleepRecent => {
            let logs: Vec<_> = db
                .recent_sleep_logs(user)?
                .into_iter()
                .map(|(date, log)| json!({ "date": date, "log": log }))
                .collect();
            print_json(&logs)?;
        }
        ProtocolAction::Workout {
            workout_type,
            date,
            adaptation,
            duration,
            intensity,
            notes,
        } => {
            let workout = db.log_workout(
                user,
                &NewWorkout {
                    date: day_or_today(date),
                    workout_type,
                    adaptation,
                    duration_min: duration,
                    intensity,
                    notes,
                },
            )?;
            print_json(&workout)?;
        }
        ProtocolAction::Workouts { date } => {
            print_json(&db.workouts_for_date(user, day_or_today(date))?)?;
        }
        ProtocolAction::Score { date } => {
            let date = day_or_today(date);
            let score = db.protocol_score_between(user, date.week_start(), date.week_end())?;
            print_json(&json!({
                "week_start": date.week_start(),
                "sleep_days": score.sleep_days,
                "workout_days": score.workout_days,
                "meditation_days": score.meditation_days,
                "percent": score.percent(),
            }))?;
        }
    }

    journal.finish();
    Ok(())
}
