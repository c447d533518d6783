//! Creative practice commands for CLI.

use clap::Subcommand;
use ritualog_core::records::NewCreativeEntry;
use ritualog_core::DateKey;

use super::{day_or_today, print_json, CmdResult, Context};

#[derive(Subcommand)]
pub enum CreativeAction {
    /// Save a creative entry (the day's prompt is used unless one is given)
    Entry {
        #[arg(long)]
        date: Option<DateKey>,
        #[arg(long)]
        prompt: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        medium: Option<String>,
        #[arg(long)]
        observations: Option<String>,
    },
    /// Entries for one day, or the most recent ones
    Entries {
        #[arg(long)]
        date: Option<DateKey>,
    },
    /// Active projects with their idea counts
    Projects,
    /// Start a project
    AddProject {
        title: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Capture a quick idea
    Idea {
        content: String,
        /// File the idea under a project
        #[arg(long)]
        project_id: Option<String>,
    },
    /// Recent ideas
    Ideas,
}

pub fn run(action: CreativeAction, ctx: &Context) -> CmdResult {
    let journal = ctx.journal()?;
    let (db, user) = (&journal.db, &journal.user);

    match action {
        CreativeAction::Entry {
            date,
            prompt,
            content,
            medium,
            observations,
        } => {
            let date = day_or_today(date);
            let prompt = match prompt {
                Some(p) => p,
                None => journal.config.prompt_catalog()?.creative.select(date).clone(),
            };
            let entry = db.save_creative_entry(
                user,
                &NewCreativeEntry {
                    date,
                    prompt: Some(prompt),
                    content,
                    medium,
                    observations,
                },
            )?;
            print_json(&entry)?;
        }
        CreativeAction::Entries { date: Some(date) } => {
            print_json(&db.creative_entries_for_date(user, date)?)?;
        }
        CreativeAction::Entries { date: None } => {
            print_json(&db.recent_creative_entries(user)?)?;
        }
        CreativeAction::Projects => {
            print_json(&db.list_creative_projects(user)?)?;
        }
        CreativeAction::AddProject { title, description } => {
            let project = db.create_creative_project(user, &title, description.as_deref())?;
            print_json(&project)?;
        }
        CreativeAction::Idea {
            content,
            project_id,
        } => {
            db.add_quick_idea(user, &content, project_id.as_deref())?;
            println!("ok");
        }
        CreativeAction::Ideas => {
            print_json(&db.recent_ideas(user)?)?;
        }
    }

    journal.finish();
    Ok(())
}
