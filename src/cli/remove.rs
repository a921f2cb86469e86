//! `tally remove` - take tasks off the list
//!
//! By default removed tasks are archived with reason `deleted`. `--purge`
//! hard-deletes them with no history retained.

use anyhow::Result;
use chrono::Utc;
use clap::Args;

use crate::render::text;
use crate::task::{Lifecycle, Store, StoreError, ValidationError};

#[derive(Args)]
pub struct RemoveArgs {
    /// Task numbers from `tally list`
    #[arg(required = true)]
    pub numbers: Vec<usize>,

    /// Delete without keeping an archive record
    #[arg(long)]
    pub purge: bool,
}

pub fn run(store: &Store, args: RemoveArgs) -> Result<()> {
    if args.purge {
        return purge(store, &args.numbers);
    }

    let archived = Lifecycle::new(store).delete(&args.numbers, Utc::now())?;

    println!("Removed:");
    for (entry, number) in archived.iter().zip(super::normalize_numbers(&args.numbers)) {
        println!("{}", text::format_archived(entry, number, false));
    }
    Ok(())
}

/// Same batch policy as the lifecycle transitions: validate everything
/// upfront, then delete from the highest position down.
fn purge(store: &Store, numbers: &[usize]) -> Result<()> {
    if numbers.is_empty() {
        return Err(ValidationError::EmptySelection.into());
    }

    let tasks = store.list()?;
    let order = super::normalize_numbers(numbers);
    for &number in &order {
        if number == 0 || number > tasks.len() {
            return Err(StoreError::NotFound(number.to_string()).into());
        }
    }

    println!("Purged:");
    for &number in order.iter().rev() {
        let removed = store.remove(&tasks[number - 1].id)?;
        println!("{}. {}", number, removed.title);
    }
    Ok(())
}
