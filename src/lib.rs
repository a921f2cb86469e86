//! Tally library - personal task-list management
//!
//! The core lives in [`task`]: the data model, the due-date expression
//! parser, JSON-file storage and the terminal lifecycle transitions.
//! [`cli`] and [`render`] consume it.

pub mod cli;
pub mod render;
pub mod task;
