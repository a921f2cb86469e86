//! Standalone HTML page rendering of tasks

use chrono::{DateTime, Local, Utc};

use crate::task::{ArchivedTask, Priority, Task};

const STYLE: &str = r#"
body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
    max-width: 800px;
    margin: 2rem auto;
    padding: 0 1rem;
    background: #f5f5f5;
}
.task-list {
    background: white;
    border-radius: 8px;
    box-shadow: 0 2px 4px rgba(0,0,0,0.1);
    overflow: hidden;
}
.task-item {
    padding: 1rem;
    border-bottom: 1px solid #eee;
    display: flex;
    align-items: center;
    gap: 0.5rem;
}
.task-item:last-child { border-bottom: none; }
.priority { font-size: 1.2rem; width: 24px; }
.priority-high { color: #dc3545; }
.priority-medium { color: #ffc107; }
.priority-low { color: #28a745; }
.title { flex: 1; font-size: 1rem; }
.due-date { color: #0d6efd; font-size: 0.9rem; }
.due-date.overdue { color: #dc3545; }
.reason {
    color: #6c757d;
    font-size: 0.8rem;
    text-transform: uppercase;
}
.tag {
    background: #e9ecef;
    color: #495057;
    padding: 0.2rem 0.5rem;
    border-radius: 4px;
    font-size: 0.8rem;
}
h1 { color: #212529; margin-bottom: 1.5rem; }
"#;

/// Render the active list as a complete HTML document
pub fn format_tasks(tasks: &[Task], now: DateTime<Utc>) -> String {
    let mut items = String::new();
    for task in tasks {
        items.push_str(&task_item(task, now, None));
    }
    page("Task List", &items)
}

/// Render the archive as a complete HTML document
pub fn format_archive(entries: &[ArchivedTask], now: DateTime<Utc>) -> String {
    let mut items = String::new();
    for entry in entries {
        items.push_str(&task_item(&entry.task, now, Some(entry.reason.label())));
    }
    page("Task Archive", &items)
}

fn page(title: &str, items: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html>\n<head>\n\
         <meta charset=\"UTF-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         <title>{title}</title>\n\
         <style>{STYLE}</style>\n\
         </head>\n<body>\n\
         <h1>{title}</h1>\n\
         <div class=\"task-list\">\n{items}</div>\n\
         </body>\n</html>\n"
    )
}

fn task_item(task: &Task, now: DateTime<Utc>, reason: Option<&str>) -> String {
    let priority_class = match task.priority {
        Priority::High => " priority-high",
        Priority::Medium => " priority-medium",
        Priority::Low => " priority-low",
        Priority::None => "",
    };

    let mut item = format!(
        "<div class=\"task-item\">\
         <span class=\"priority{}\">{}</span>\
         <span class=\"title\">{}</span>",
        priority_class,
        task.priority.symbol(),
        escape(&task.title),
    );

    if let Some(reason) = reason {
        item.push_str(&format!("<span class=\"reason\">{}</span>", escape(reason)));
    }

    if let Some(due) = task.due {
        let overdue = if task.is_overdue(now) { " overdue" } else { "" };
        item.push_str(&format!(
            "<span class=\"due-date{}\">📅 {}</span>",
            overdue,
            due.with_timezone(&Local).format("%Y-%m-%d"),
        ));
    }

    for tag in &task.tags {
        item.push_str(&format!("<span class=\"tag\">{}</span>", escape(tag)));
    }

    item.push_str("</div>\n");
    item
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
