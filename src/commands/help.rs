use anyhow::Result;
use remindcal_core::Priority;
use remindcal_core::datetime::{DURATION_HINT, LAYOUT_HINT};

use super::Session;
use super::events::{ADD_USAGE, REMOVE_USAGE, UPDATE_USAGE};
use super::reminders::{CANCEL_USAGE, REMIND_USAGE};

pub fn run(session: &mut Session) -> Result<()> {
    let priorities: Vec<&str> = Priority::ALL.iter().map(Priority::as_str).collect();

    let lines = [
        "Commands:".to_string(),
        format!("  Add event:        {ADD_USAGE}"),
        format!("  Remove event:     {REMOVE_USAGE}"),
        format!("  Update event:     {UPDATE_USAGE}"),
        format!("  Add reminder:     {REMIND_USAGE}"),
        format!("  Cancel reminder:  {CANCEL_USAGE}"),
        "  List events:      list".to_string(),
        "  Session log:      log | log-save | log-load".to_string(),
        "  Quit:             exit".to_string(),
        String::new(),
        format!("Date/time format: {LAYOUT_HINT}"),
        format!("Reminder duration: {DURATION_HINT}"),
        format!("Priorities: {}", priorities.join(", ")),
        "Use _ in update to keep a field unchanged".to_string(),
        String::new(),
        format!("Events are saved on exit to {}", session.data_path.display()),
        format!(
            "Session log is saved to {}",
            session.console_log_path.display()
        ),
        format!("Application logs are in {}", session.log_dir.display()),
    ];

    for line in &lines {
        session.console.println(line);
    }
    Ok(())
}
