//! `tally edit` - mutate a task in place

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;

use crate::render::text;
use crate::task::model::parse_tags;
use crate::task::{Priority, Store, StoreError, ValidationError};

#[derive(Args)]
pub struct EditArgs {
    /// Task number from `tally list`
    pub number: usize,

    /// New title
    #[arg(long)]
    pub title: Option<String>,

    /// New priority: high, medium, low, none (or 1-4)
    #[arg(short, long)]
    pub priority: Option<String>,

    /// New due date, or 'none' to clear it
    #[arg(short, long)]
    pub due: Option<String>,

    /// New comma-separated tags, or 'none' to clear them
    #[arg(short, long)]
    pub tags: Option<String>,
}

pub fn run(store: &Store, args: EditArgs) -> Result<()> {
    let now = Utc::now();
    let tasks = store.list()?;
    if args.number == 0 || args.number > tasks.len() {
        return Err(StoreError::NotFound(args.number.to_string()).into());
    }
    let id = tasks[args.number - 1].id.clone();

    // Resolve every input before touching the store, so a bad token can
    // never leave a half-edited task behind.
    if args.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(ValidationError::EmptyTitle.into());
    }
    let new_priority = args.priority.as_deref().map(Priority::parse).transpose()?;
    let new_due: Option<Option<DateTime<Utc>>> = match args.due.as_deref() {
        None => None,
        Some(expr) if expr.eq_ignore_ascii_case("none") => Some(None),
        Some(expr) => Some(Some(super::parse_due(expr)?)),
    };
    let new_tags = args.tags.as_deref().map(|t| {
        if t.eq_ignore_ascii_case("none") {
            Default::default()
        } else {
            parse_tags(t)
        }
    });

    let updated = store.update(&id, |task| {
        if let Some(title) = args.title {
            task.title = title;
        }
        if let Some(priority) = new_priority {
            task.priority = priority;
        }
        if let Some(due) = new_due {
            task.due = due;
        }
        if let Some(tags) = new_tags {
            task.tags = tags;
        }
    })?;

    println!("Updated:");
    println!("{}", text::format_task(&updated, args.number, now, true));
    Ok(())
}
