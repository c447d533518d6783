//! Reflection and weekly review commands for CLI.

use clap::Subcommand;
use ritualog_core::records::{NewReflection, WeeklyReviewInput};
use ritualog_core::DateKey;

use super::{day_or_today, print_json, CmdResult, Context};

#[derive(Subcommand)]
pub enum ReflectAction {
    /// Save a reflection
    Add {
        content: String,
        #[arg(long)]
        date: Option<DateKey>,
        /// Prompt kind, e.g. shadow or envy
        #[arg(long)]
        prompt_type: Option<String>,
        /// Law the reflection refers to, e.g. "Law 4"
        #[arg(long)]
        law: Option<String>,
        /// Pattern tag for later search
        #[arg(long)]
        tag: Option<String>,
    },
    /// Reflections for one day, or the most recent ones
    List {
        #[arg(long)]
        date: Option<DateKey>,
    },
    /// Search content, tags and law references
    Search {
        query: String,
    },
    /// Every pattern tag in use
    Tags,
    /// Show the review for the week containing a day
    Week {
        #[arg(long)]
        date: Option<DateKey>,
    },
    /// Save the weekly review (unset fields keep their stored value)
    SaveWeek {
        /// Any day in the week (default: today)
        #[arg(long)]
        date: Option<DateKey>,
        #[arg(long)]
        wins: Option<String>,
        #[arg(long)]
        patterns: Option<String>,
        /// Protocol score from 0 to 100
        #[arg(long)]
        protocol_score: Option<u32>,
        /// Habit score from 0 to 100
        #[arg(long)]
        habit_score: Option<u32>,
        #[arg(long)]
        mastery_hours: Option<f64>,
        #[arg(long)]
        creative_output: Option<String>,
        #[arg(long)]
        strategic_lesson: Option<String>,
        #[arg(long)]
        identity_evolution: Option<String>,
    },
}

pub fn run(action: ReflectAction, ctx: &Context) -> CmdResult {
    let journal = ctx.journal()?;
    let (db, user) = (&journal.db, &journal.user);

    match action {
        ReflectAction::Add {
            content,
            date,
            prompt_type,
            law,
            tag,
        } => {
            let reflection = db.save_reflection(
                user,
                &NewReflection {
                    date: day_or_today(date),
                    prompt_type,
                    content: Some(content),
                    law_ref: law,
                    pattern_tag: tag,
                },
            )?;
            print_json(&reflection)?;
        }
        ReflectAction::List { date: Some(date) } => {
            print_json(&db.reflections_for_date(user, date)?)?;
        }
        ReflectAction::List { date: None } => {
            print_json(&db.recent_reflections(user)?)?;
        }
        ReflectAction::Search { query } => {
            print_json(&db.search_reflections(user, &query)?)?;
        }
        ReflectAction::Tags => {
            print_json(&db.pattern_tags(user)?)?;
        }
        ReflectAction::Week { date } => {
            print_json(&db.get_weekly_review(user, day_or_today(date))?)?;
        }
        ReflectAction::SaveWeek {
            date,
            wins,
            patterns,
            protocol_score,
            habit_score,
            mastery_hours,
            creative_output,
            strategic_lesson,
            identity_evolution,
        } => {
            let input = WeeklyReviewInput {
                wins,
                patterns,
                protocol_score,
                habit_score,
                mastery_hours,
                creative_output,
                strategic_lesson,
                identity_evolution,
            };
            print_json(&db.save_weekly_review(user, day_or_today(date), &input)?)?;
        }
    }

    journal.finish();
    Ok(())
}
