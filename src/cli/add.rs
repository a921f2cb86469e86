//! `tally add` - create a task

use anyhow::Result;
use chrono::Utc;
use clap::Args;

use crate::render::text;
use crate::task::model::parse_tags;
use crate::task::{Priority, Store, Task};

#[derive(Args)]
pub struct AddArgs {
    /// What needs doing
    #[arg(required = true)]
    pub title: Vec<String>,

    /// Priority: high, medium, low, none (or 1-4)
    #[arg(short, long)]
    pub priority: Option<String>,

    /// Due date: '2024-03-15', 'tomorrow', 'next monday', 'in 2 weeks', ...
    #[arg(short, long)]
    pub due: Option<String>,

    /// Comma-separated tags
    #[arg(short, long)]
    pub tags: Option<String>,
}

pub fn run(store: &Store, args: AddArgs) -> Result<()> {
    let now = Utc::now();
    let mut task = Task::new(args.title.join(" "), now)?;

    if let Some(token) = &args.priority {
        task.priority = Priority::parse(token)?;
    }
    if let Some(expr) = &args.due {
        task.due = Some(super::parse_due(expr)?);
    }
    if let Some(tags) = &args.tags {
        task.tags = parse_tags(tags);
    }

    let position = store.list()?.len() + 1;
    store.add(task.clone())?;

    println!("Added:");
    println!("{}", text::format_task(&task, position, now, true));
    Ok(())
}
