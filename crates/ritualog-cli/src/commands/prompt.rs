//! Prompt-of-the-day commands for CLI.

use clap::{Subcommand, ValueEnum};
use ritualog_core::{Config, DateKey, PromptSelector};
use serde_json::json;

use super::{print_json, CmdResult};

#[derive(Clone, Copy, ValueEnum)]
pub enum PromptKind {
    Creative,
    Reflection,
}

#[derive(Subcommand)]
pub enum PromptAction {
    /// Show the prompt for a day
    Show {
        #[arg(long, value_enum, default_value = "creative")]
        kind: PromptKind,
        /// Day as YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
        /// Rotate over these prompts instead of the configured list (repeatable)
        #[arg(long = "prompt")]
        prompts: Vec<String>,
    },
    /// List the configured prompts in rotation order
    List {
        #[arg(long, value_enum, default_value = "creative")]
        kind: PromptKind,
    },
}

pub fn run(action: PromptAction) -> CmdResult {
    match action {
        PromptAction::Show {
            kind,
            date,
            prompts,
        } => {
            let date = match date {
                Some(raw) => DateKey::parse(&raw)?,
                None => DateKey::today(),
            };
            if !prompts.is_empty() {
                let selector = PromptSelector::new("--prompt", prompts)?;
                print_json(&json!({
                    "date": date,
                    "index": selector.index_for(date),
                    "prompt": selector.select(date),
                }))?;
                return Ok(());
            }
            let catalog = Config::load_or_default().prompt_catalog()?;
            match kind {
                PromptKind::Creative => print_json(&json!({
                    "date": date,
                    "index": catalog.creative.index_for(date),
                    "prompt": catalog.creative.select(date),
                }))?,
                PromptKind::Reflection => print_json(&json!({
                    "date": date,
                    "index": catalog.reflection.index_for(date),
                    "prompt": catalog.reflection.select(date),
                }))?,
            }
        }
        PromptAction::List { kind } => {
            let catalog = Config::load_or_default().prompt_catalog()?;
            match kind {
                PromptKind::Creative => print_json(catalog.creative.prompts())?,
                PromptKind::Reflection => print_json(catalog.reflection.prompts())?,
            }
        }
    }
    Ok(())
}
