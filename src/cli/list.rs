//! `tally list` - show active tasks

use std::cmp::Ordering;
use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use clap::Args;

use crate::render::{html, text};
use crate::task::{Store, Task};

#[derive(Args)]
pub struct ListArgs {
    /// Only tasks carrying this tag
    #[arg(short, long)]
    pub tag: Option<String>,

    /// Only overdue tasks
    #[arg(long)]
    pub overdue: bool,

    /// Most urgent priority first
    #[arg(short = 'p', long)]
    pub by_priority: bool,

    /// Soonest due date first; tasks without one sort last
    #[arg(short = 'd', long)]
    pub by_date: bool,

    /// Render as an HTML page
    #[arg(long)]
    pub html: bool,

    /// Write the output to a file instead of stdout
    #[arg(short = 'f', long)]
    pub output_file: Option<PathBuf>,

    /// Turn off colored output
    #[arg(short, long)]
    pub no_color: bool,
}

pub fn run(store: &Store, args: ListArgs) -> Result<()> {
    let now = Utc::now();
    let tasks = store.list()?;

    // Filters and sorting change the view only; each line keeps its task's
    // position in the stored list so `done`/`edit` numbers stay valid.
    let mut numbered: Vec<(usize, Task)> = tasks
        .into_iter()
        .enumerate()
        .map(|(i, t)| (i + 1, t))
        .filter(|(_, t)| args.tag.as_ref().is_none_or(|tag| t.tags.contains(tag)))
        .filter(|(_, t)| !args.overdue || t.is_overdue(now))
        .collect();

    if numbered.is_empty() {
        println!("No tasks found");
        return Ok(());
    }

    sort_view(&mut numbered, args.by_priority, args.by_date);

    let plain = args.tag.is_none() && !args.overdue && !args.by_priority && !args.by_date;
    let colored = !args.no_color && args.output_file.is_none();

    let output = if args.html {
        let tasks: Vec<_> = numbered.into_iter().map(|(_, t)| t).collect();
        html::format_tasks(&tasks, now)
    } else if plain {
        // View numbering equals stored positions here.
        let tasks: Vec<_> = numbered.into_iter().map(|(_, t)| t).collect();
        text::format_list(&tasks, now, colored)
    } else {
        numbered
            .iter()
            .map(|(n, t)| text::format_task(t, *n, now, colored))
            .collect::<Vec<_>>()
            .join("\n")
    };

    super::emit(&output, args.output_file.as_ref())
}

/// Stable view ordering: `--by-priority` puts the most urgent tasks first,
/// `--by-date` the soonest due date first with undated tasks last.
/// `--by-priority` wins when both flags are passed, as in the archive
/// listing.
fn sort_view(numbered: &mut [(usize, Task)], by_priority: bool, by_date: bool) {
    if by_priority {
        numbered.sort_by_key(|(_, t)| t.priority);
    } else if by_date {
        numbered.sort_by(|(_, a), (_, b)| match (a.due, b.due) {
            (Some(first), Some(second)) => first.cmp(&second),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
    }
}
