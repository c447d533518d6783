//! Mastery commands for CLI.

use clap::Subcommand;
use ritualog_core::prompts::rotate_by_day_of_month;
use ritualog_core::records::{NewMasterySession, NewSkill, SkillPhase, SkillUpdate};
use ritualog_core::{minutes_to_hours, DateKey};
use serde_json::json;

use super::{day_or_today, print_json, CmdResult, Context};

#[derive(Subcommand)]
pub enum MasteryAction {
    /// Show the current life task
    Task,
    /// State a new life task
    SetTask {
        statement: String,
    },
    /// List skills with their practice totals
    Skills,
    /// Add a skill
    AddSkill {
        name: String,
        /// How the skill serves the life task
        #[arg(long)]
        connection: Option<String>,
        /// Apprentice, "Active Mastery" or "True Mastery"
        #[arg(long)]
        phase: Option<SkillPhase>,
    },
    /// Rename a skill or move it to another phase
    UpdateSkill {
        /// Skill ID
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        phase: Option<SkillPhase>,
    },
    /// Log a practice session
    Log {
        /// Skill ID
        skill_id: String,
        /// Minutes practiced (1-1440)
        minutes: u32,
        #[arg(long)]
        date: Option<DateKey>,
        #[arg(long)]
        breakthrough: Option<String>,
        #[arg(long)]
        obstacle: Option<String>,
        #[arg(long)]
        mentor_notes: Option<String>,
    },
    /// Recent sessions for a skill
    Sessions {
        /// Skill ID
        skill_id: String,
    },
    /// Practice time in the week containing a day
    Hours {
        #[arg(long)]
        date: Option<DateKey>,
    },
    /// List active identity statements
    Identities,
    /// Add an identity statement
    AddIdentity {
        content: String,
    },
    /// The identity statement shown for a day
    IdentityToday {
        #[arg(long)]
        date: Option<DateKey>,
    },
}

pub fn run(action: MasteryAction, ctx: &Context) -> CmdResult {
    let journal = ctx.journal()?;
    let (db, user) = (&journal.db, &journal.user);

    match action {
        MasteryAction::Task => {
            print_json(&db.get_life_task(user)?)?;
        }
        MasteryAction::SetTask { statement } => {
            db.set_life_task(user, &statement)?;
            println!("ok");
        }
        MasteryAction::Skills => {
            print_json(&db.list_skills(user)?)?;
        }
        MasteryAction::AddSkill {
            name,
            connection,
            phase,
        } => {
            let skill = db.create_skill(
                user,
                &NewSkill {
                    name,
                    life_task_connection: connection,
                    phase,
                },
            )?;
            print_json(&skill)?;
        }
        MasteryAction::UpdateSkill { id, name, phase } => {
            let skill = db.update_skill(user, &id, &SkillUpdate { name, phase })?;
            print_json(&skill)?;
        }
        MasteryAction::Log {
            skill_id,
            minutes,
            date,
            breakthrough,
            obstacle,
            mentor_notes,
        } => {
            let session = db.log_mastery_session(
                user,
                &NewMasterySession {
                    skill_id,
                    date: day_or_today(date),
                    minutes,
                    breakthrough,
                    obstacle,
                    mentor_notes,
                },
            )?;
            print_json(&session)?;
        }
        MasteryAction::Sessions { skill_id } => {
            print_json(&db.sessions_for_skill(user, &skill_id)?)?;
        }
        MasteryAction::Hours { date } => {
            let date = day_or_today(date);
            let (from, to) = (date.week_start(), date.week_end());
            let minutes = db.mastery_minutes_between(user, from, to)?;
            print_json(&json!({
                "week_start": from,
                "week_end": to,
                "minutes": minutes,
                "hours": f64::from(minutes) / 60.0,
                "display": minutes_to_hours(minutes),
            }))?;
        }
        MasteryAction::Identities => {
            print_json(&db.list_identity_statements(user)?)?;
        }
        MasteryAction::AddIdentity { content } => {
            db.add_identity_statement(user, &content)?;
            println!("ok");
        }
        MasteryAction::IdentityToday { date } => {
            let statements = db.list_identity_statements(user)?;
            let today = rotate_by_day_of_month(&statements, day_or_today(date));
            print_json(&today)?;
        }
    }

    journal.finish();
    Ok(())
}
