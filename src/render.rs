//! Table rendering for `list`.

use owo_colors::OwoColorize;
use remindcal_core::datetime::format_local;
use remindcal_core::{Event, Priority};

const ID_WIDTH: usize = 36;
const TITLE_WIDTH: usize = 50;
const DATE_WIDTH: usize = 19;
const PRIORITY_WIDTH: usize = 8;

pub fn header() -> String {
    format!(
        "|{:<ID_WIDTH$}|{:<TITLE_WIDTH$}|{:<DATE_WIDTH$}|{:<PRIORITY_WIDTH$}|{}",
        "ID", "Event", "Date/time", "Priority", "Reminder"
    )
}

/// One table row, uncolored.
pub fn row(event: &Event) -> String {
    format!(
        "|{:<ID_WIDTH$}|{}|{:<DATE_WIDTH$}|{:<PRIORITY_WIDTH$}|{}",
        event.id(),
        dotted(event.title()),
        format_local(event.start_at()),
        event.priority(),
        reminder_cell(event)
    )
}

/// Same row with the priority cell colored.
pub fn row_styled(event: &Event) -> String {
    let priority = format!("{:<PRIORITY_WIDTH$}", event.priority());
    let priority = match event.priority() {
        Priority::Low => priority.dimmed().to_string(),
        Priority::Medium => priority.yellow().to_string(),
        Priority::High => priority.red().bold().to_string(),
    };

    format!(
        "|{:<ID_WIDTH$}|{}|{:<DATE_WIDTH$}|{}|{}",
        event.id(),
        dotted(event.title()),
        format_local(event.start_at()),
        priority,
        reminder_cell(event)
    )
}

/// Pad a title to the column width with dots (width counted in characters).
fn dotted(title: &str) -> String {
    let len = title.chars().count();
    format!("{title}{}", ".".repeat(TITLE_WIDTH.saturating_sub(len)))
}

fn reminder_cell(event: &Event) -> String {
    match event.reminder() {
        None => "-".to_string(),
        Some(r) if r.is_sent() => "sent".to_string(),
        Some(r) if r.is_armed() => format!("at {}", format_local(r.at())),
        Some(r) => format!("paused ({})", format_local(r.at())),
    }
}
