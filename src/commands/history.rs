//! `log`, `log-save` and `log-load`: the session console transcript.

use anyhow::{Context, Result};
use log::info;

use super::Session;

pub fn show(session: &mut Session) -> Result<()> {
    let lines = session.console.snapshot();
    if lines.is_empty() {
        session.console.println("Log is empty");
        return Ok(());
    }

    // Printed directly: echoing into the transcript would duplicate it
    for line in &lines {
        println!("{line}");
    }
    info!("Printed {} log lines", lines.len());
    Ok(())
}

pub fn save(session: &mut Session) -> Result<()> {
    session
        .console
        .save()
        .with_context(|| format!("Could not save log to {}", session.console_log_path.display()))?;
    session.console.println("Log saved");
    Ok(())
}

pub fn load(session: &mut Session) -> Result<()> {
    let count = session
        .console
        .load()
        .with_context(|| format!("Could not load log from {}", session.console_log_path.display()))?;
    session
        .console
        .println(&format!("Log loaded ({count} lines)"));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::execute;
    use super::super::tests::session;

    #[test]
    fn save_then_load_restores_transcript() {
        let mut session = session();
        execute(&mut session, "list");
        execute(&mut session, "log-save");
        execute(&mut session, "help");
        execute(&mut session, "log-load");

        let log = session.console.snapshot();
        assert_eq!(log.first().unwrap(), "> list");
        assert_eq!(log.last().unwrap(), "Log loaded (3 lines)");
        assert!(!log.iter().any(|l| l == "> help"));
    }
}
