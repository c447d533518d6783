use clap::Subcommand;
use ritualog_core::records::{ConsumptionLog, ConsumptionTrend};
use ritualog_core::DateKey;
use serde_json::json;

use super::{day_or_today, print_json, CmdResult, Context};

#[derive(Subcommand)]
pub enum ConsumptionAction {
    /// Save the day's screen time (unset fields keep their stored value)
    Log {
        #[arg(long)]
        date: Option<DateKey>,
        #[arg(long)]
        phone_minutes: Option<u32>,
        #[arg(long)]
        social_minutes: Option<u32>,
        #[arg(long)]
        apps: Option<String>,
        /// Content quality from 1 to 5
        #[arg(long)]
        quality: Option<u8>,
        #[arg(long)]
        impact: Option<String>,
        #[arg(long)]
        trigger: Option<String>,
        #[arg(long)]
        intention: Option<String>,
    },
    /// Show one day's log
    Show {
        #[arg(long)]
        date: Option<DateKey>,
    },
    /// Recent logs with averages and the latest change in phone time
    Recent,
}

pub fn run(action: ConsumptionAction, ctx: &Context) -> CmdResult {
    let journal = ctx.journal()?;
    let (db, user) = (&journal.db, &journal.user);

    match action {
        ConsumptionAction::Log {
            date,
            phone_minutes,
            social_minutes,
            apps,
            quality,
            impact,
            trigger,
            intention,
        } => {
            let log = ConsumptionLog {
                date: None,
                phone_minutes,
                social_media_minutes: social_minutes,
                main_apps: apps,
                content_quality: quality,
                mental_impact: impact,
                what_triggered: trigger,
                intention,
            };
            print_json(&db.save_consumption_log(user, day_or_today(date), &log)?)?;
        }
        ConsumptionAction::Show { date } => {
            print_json(&db.get_consumption_log(user, day_or_today(date))?)?;
        }
        ConsumptionAction::Recent => {
            let logs = db.recent_consumption_logs(user)?;
            let trend = ConsumptionTrend::from_logs(&logs);
            print_json(&json!({ "trend": trend, "logs": logs }))?;
        }
    }

    journal.finish();
    Ok(())
}
