//! CLI command implementations

pub mod add;
pub mod archive;
pub mod done;
pub mod edit;
pub mod list;
pub mod remove;
pub mod stats;

use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::task::dates;

#[derive(Parser)]
#[command(name = "tally", version, about = "Personal task-list manager")]
pub struct Cli {
    /// Override the data directory
    #[arg(long, global = true, env = "TALLY_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new task
    Add(add::AddArgs),

    /// List active tasks
    List(list::ListArgs),

    /// Edit a task's title, priority, due date or tags
    Edit(edit::EditArgs),

    /// Mark tasks as done
    Done(done::DoneArgs),

    /// Remove tasks from the list
    Remove(remove::RemoveArgs),

    /// Browse archived tasks
    Archive(archive::ArchiveArgs),

    /// Show task statistics
    Stats(stats::StatsArgs),

    /// Generate shell completions
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Resolve a due-date expression against the local clock, stored as UTC
pub fn parse_due(expr: &str) -> Result<DateTime<Utc>> {
    let resolved = dates::parse(expr, Local::now())?;
    Ok(resolved.with_timezone(&Utc))
}

/// Sort and deduplicate user-supplied task numbers, matching the order
/// lifecycle results come back in
pub(crate) fn normalize_numbers(numbers: &[usize]) -> Vec<usize> {
    let mut numbers = numbers.to_vec();
    numbers.sort_unstable();
    numbers.dedup();
    numbers
}

/// Send rendered output to a file when requested, stdout otherwise
pub fn emit(output: &str, file: Option<&PathBuf>) -> Result<()> {
    match file {
        Some(path) => {
            std::fs::write(path, output)?;
            println!("Output written to {}", path.display());
        }
        None => println!("{output}"),
    }
    Ok(())
}
