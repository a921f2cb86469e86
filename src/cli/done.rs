//! `tally done` - mark tasks completed

use anyhow::Result;
use chrono::Utc;
use clap::Args;

use crate::render::text;
use crate::task::{Lifecycle, Store};

#[derive(Args)]
pub struct DoneArgs {
    /// Task numbers from `tally list`
    #[arg(required = true)]
    pub numbers: Vec<usize>,
}

pub fn run(store: &Store, args: DoneArgs) -> Result<()> {
    let archived = Lifecycle::new(store).complete(&args.numbers, Utc::now())?;

    if archived.len() == 1 {
        println!("Done! Task completed:");
    } else {
        println!("Done! {} tasks completed:", archived.len());
    }
    for (entry, number) in archived.iter().zip(super::normalize_numbers(&args.numbers)) {
        println!("{}", text::format_archived(entry, number, false));
    }
    Ok(())
}
