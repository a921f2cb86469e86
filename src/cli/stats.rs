//! `tally stats` - aggregate counts over the store

use std::collections::BTreeMap;

use anyhow::Result;
use chrono::{Duration, Utc};
use clap::Args;

use crate::task::{ArchiveFilter, ArchiveReason, ArchiveSort, Priority, Store};

#[derive(Args)]
pub struct StatsArgs {
    /// Include archived tasks
    #[arg(short, long)]
    pub include_archived: bool,

    /// Show per-tag counts
    #[arg(short, long)]
    pub tags: bool,
}

pub fn run(store: &Store, args: StatsArgs) -> Result<()> {
    let now = Utc::now();
    let tasks = store.list()?;

    println!("Active tasks: {}", tasks.len());

    for priority in [
        Priority::High,
        Priority::Medium,
        Priority::Low,
        Priority::None,
    ] {
        let count = tasks.iter().filter(|t| t.priority == priority).count();
        if count > 0 {
            println!("  {}: {}", priority.label(), count);
        }
    }

    let with_due = tasks.iter().filter(|t| t.due.is_some()).count();
    let overdue = tasks.iter().filter(|t| t.is_overdue(now)).count();
    let due_soon = tasks
        .iter()
        .filter(|t| {
            t.due
                .is_some_and(|due| due > now && due <= now + Duration::days(7))
        })
        .count();
    println!("With due date: {with_due} ({overdue} overdue, {due_soon} due within a week)");

    if args.tags {
        let mut tag_counts: BTreeMap<&str, usize> = BTreeMap::new();
        for task in &tasks {
            for tag in &task.tags {
                *tag_counts.entry(tag.as_str()).or_default() += 1;
            }
        }
        if !tag_counts.is_empty() {
            println!("Tags:");
            for (tag, count) in tag_counts {
                println!("  #{tag}: {count}");
            }
        }
    }

    if args.include_archived {
        let archive = store.list_archive(&ArchiveFilter::default(), ArchiveSort::default())?;
        println!("Archived tasks: {}", archive.len());
        for reason in [
            ArchiveReason::Completed,
            ArchiveReason::Deleted,
            ArchiveReason::Expired,
        ] {
            let count = archive.iter().filter(|a| a.reason == reason).count();
            if count > 0 {
                println!("  {}: {}", reason.label(), count);
            }
        }
    }

    Ok(())
}
