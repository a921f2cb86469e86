//! `tally archive` - browse archived tasks

use std::path::PathBuf;

use anyhow::{bail, Result};
use chrono::Utc;
use clap::Args;

use crate::render::{html, text};
use crate::task::{ArchiveFilter, ArchiveReason, ArchiveSort, Store};

#[derive(Args)]
pub struct ArchiveArgs {
    /// Only entries whose task carries this tag
    #[arg(short, long)]
    pub tag: Option<String>,

    /// Only entries archived for this reason (completed/deleted/expired)
    #[arg(short, long)]
    pub reason: Option<String>,

    /// Most urgent priority first
    #[arg(short = 'p', long)]
    pub by_priority: bool,

    /// Most recently archived first
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

pub fn run(store: &Store, args: ArchiveArgs) -> Result<()> {
    let reason = match &args.reason {
        Some(token) => match ArchiveReason::parse(token) {
            Some(reason) => Some(reason),
            None => bail!(
                "'{token}' is not an archive reason. Use completed, deleted or expired."
            ),
        },
        None => None,
    };

    let filter = ArchiveFilter {
        tag: args.tag.clone(),
        reason,
    };
    let sort = if args.by_priority {
        ArchiveSort::Priority
    } else if args.by_date {
        ArchiveSort::ArchivedAt
    } else {
        ArchiveSort::Insertion
    };

    let entries = store.list_archive(&filter, sort)?;
    if entries.is_empty() {
        println!("No archived tasks yet");
        return Ok(());
    }

    let output = if args.html {
        html::format_archive(&entries, Utc::now())
    } else {
        let colored = !args.no_color && args.output_file.is_none();
        text::format_archive(&entries, colored)
    };

    super::emit(&output, args.output_file.as_ref())
}
