//! Terminal task transitions
//!
//! A task leaves the active list exactly once, through one of three
//! one-way transitions: complete, delete or expire. Each is an archive
//! with the matching reason; nothing ever comes back out of the archive.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::debug;

use super::model::{ArchiveReason, ArchivedTask, ValidationError};
use super::storage::{Store, StoreError};

/// Failures of a lifecycle transition
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Orchestrates terminal transitions on top of [`Store`] primitives.
///
/// Tasks are addressed by their 1-based position in the current active
/// list, the numbering `tally list` shows.
pub struct Lifecycle<'a> {
    store: &'a Store,
}

impl<'a> Lifecycle<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Archive tasks as completed
    pub fn complete(
        &self,
        positions: &[usize],
        now: DateTime<Utc>,
    ) -> Result<Vec<ArchivedTask>, LifecycleError> {
        self.transition(positions, ArchiveReason::Completed, now)
    }

    /// Archive tasks as deleted
    pub fn delete(
        &self,
        positions: &[usize],
        now: DateTime<Utc>,
    ) -> Result<Vec<ArchivedTask>, LifecycleError> {
        self.transition(positions, ArchiveReason::Deleted, now)
    }

    /// Archive tasks as expired. Nothing triggers this automatically; it
    /// exists for a future scheduler to invoke.
    pub fn expire(
        &self,
        positions: &[usize],
        now: DateTime<Utc>,
    ) -> Result<Vec<ArchivedTask>, LifecycleError> {
        self.transition(positions, ArchiveReason::Expired, now)
    }

    /// Validate the whole batch against the current active list before
    /// touching anything, so one bad position rejects the batch with no
    /// partial effect. Valid batches are processed from the highest
    /// position down; removals then never shift a position that is still
    /// pending.
    fn transition(
        &self,
        positions: &[usize],
        reason: ArchiveReason,
        now: DateTime<Utc>,
    ) -> Result<Vec<ArchivedTask>, LifecycleError> {
        if positions.is_empty() {
            return Err(ValidationError::EmptySelection.into());
        }

        let tasks = self.store.list()?;

        let mut order = positions.to_vec();
        order.sort_unstable();
        order.dedup();

        for &position in &order {
            if position == 0 || position > tasks.len() {
                return Err(StoreError::NotFound(position.to_string()).into());
            }
        }

        debug!(?reason, count = order.len(), "archiving tasks");

        let mut archived = Vec::with_capacity(order.len());
        for &position in order.iter().rev() {
            let id = &tasks[position - 1].id;
            archived.push(self.store.archive(id, reason, now)?);
        }

        // Report in ascending position order, matching the user's input.
        archived.reverse();
        Ok(archived)
    }
}
