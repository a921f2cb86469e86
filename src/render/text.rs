//! Plain-text and ANSI rendering of tasks

use chrono::{DateTime, Local, Utc};

use crate::task::{ArchivedTask, Task};

const RESET: &str = "\x1b[0m";
const RED: &str = "\x1b[31m";
const GRAY: &str = "\x1b[90m";

/// Render one active task as a numbered list line
pub fn format_task(task: &Task, index: usize, now: DateTime<Utc>, colored: bool) -> String {
    let mut parts: Vec<String> = vec![format!("{}.", index), task.priority.symbol().to_string()];
    parts.push(task.title.clone());

    if let Some(due) = task.due {
        let date = format_due(due);
        if task.is_overdue(now) && colored {
            parts.push(format!("📅 {RED}{date} (overdue){RESET}"));
        } else if task.is_overdue(now) {
            parts.push(format!("📅 {date} (overdue)"));
        } else {
            parts.push(format!("📅 {date}"));
        }
    }

    if !task.tags.is_empty() {
        let tags: Vec<String> = task.tags.iter().map(|t| format!("#{t}")).collect();
        parts.push(tags.join(" "));
    }

    parts.join(" ")
}

/// Render a full active list, one line per task, 1-based numbering
pub fn format_list(tasks: &[Task], now: DateTime<Utc>, colored: bool) -> String {
    if tasks.is_empty() {
        return "No tasks yet!".to_string();
    }
    tasks
        .iter()
        .enumerate()
        .map(|(i, task)| format_task(task, i + 1, now, colored))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render one archive entry as a numbered list line
pub fn format_archived(entry: &ArchivedTask, index: usize, colored: bool) -> String {
    let reason = entry.reason.label().to_uppercase();
    let line = format!(
        "{}. [{}] {} {} (archived {})",
        index,
        reason,
        entry.task.priority.symbol(),
        entry.task.title,
        entry.archived_at.with_timezone(&Local).format("%Y-%m-%d"),
    );
    if colored {
        format!("{GRAY}{line}{RESET}")
    } else {
        line
    }
}

/// Render a full archive listing
pub fn format_archive(entries: &[ArchivedTask], colored: bool) -> String {
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| format_archived(entry, i + 1, colored))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Due instants at local midnight render as a bare date; anything else
/// keeps the time of day.
fn format_due(due: DateTime<Utc>) -> String {
    let local = due.with_timezone(&Local);
    if local.format("%H:%M:%S").to_string() == "00:00:00" {
        local.format("%Y-%m-%d").to_string()
    } else {
        local.format("%Y-%m-%d %H:%M").to_string()
    }
}
