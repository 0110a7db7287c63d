//! Shell commands.
//!
//! Each handler takes the session and the already-split arguments (command
//! name first). Handlers return errors instead of printing them; `execute`
//! reports every failure to the console and the log and keeps the shell going.

pub mod events;
pub mod help;
pub mod history;
pub mod reminders;

use anyhow::{Result, anyhow, bail};
use owo_colors::OwoColorize;
use remindcal_core::Calendar;
use std::path::PathBuf;
use std::sync::Arc;

use crate::console::Console;

pub const PROMPT: &str = "> ";

/// State shared by all command handlers.
pub struct Session {
    pub calendar: Calendar,
    pub console: Arc<Console>,
    pub data_path: PathBuf,
    pub console_log_path: PathBuf,
    pub log_dir: PathBuf,
}

/// What the shell loop should do after a command.
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Run one line of user input.
pub fn execute(session: &mut Session, input: &str) -> Flow {
    let input = input.trim();
    if input.is_empty() {
        return Flow::Continue;
    }
    session.console.record(&format!("{PROMPT}{input}"));

    let args = match split_args(input) {
        Ok(args) if !args.is_empty() => args,
        Ok(_) => return Flow::Continue,
        Err(e) => {
            report(session, &e);
            return Flow::Continue;
        }
    };

    let command = args[0].to_lowercase();
    log::info!("Handling command {command}");

    let result = match command.as_str() {
        "add" => events::add(session, &args),
        "list" => events::list(session),
        "remove" => events::remove(session, &args),
        "update" => events::update(session, &args),
        "remind" => reminders::remind(session, &args),
        "remind-cancel" => reminders::cancel(session, &args),
        "help" => help::run(session),
        "log" => history::show(session),
        "log-save" => history::save(session),
        "log-load" => history::load(session),
        "exit" | "quit" => return Flow::Exit,
        _ => {
            session.console.println("Unknown command");
            session.console.println("Type <help> for the list of commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        log::error!("Command {command} failed: {e:#}");
        report(session, &e);
    }
    Flow::Continue
}

fn report(session: &Session, error: &anyhow::Error) {
    let plain = format!("Error: {error:#}");
    session.console.println_styled(&plain, &plain.red().to_string());
}

/// Require at least `count` arguments after the command name.
fn expect_args(args: &[String], count: usize, usage: &str) -> Result<()> {
    if args.len() < count + 1 {
        bail!("Usage: {usage}");
    }
    Ok(())
}

/// Split a command line into words with POSIX shell quoting rules.
pub fn split_args(input: &str) -> Result<Vec<String>> {
    shlex::split(input).ok_or_else(|| anyhow!("Unclosed quote or trailing backslash"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use remindcal_core::MemoryStore;

    pub(crate) fn session() -> Session {
        Session {
            calendar: Calendar::new(Arc::new(MemoryStore::default()), 1),
            console: Arc::new(Console::new(MemoryStore::default())),
            data_path: PathBuf::from("events.json"),
            console_log_path: PathBuf::from("console.log"),
            log_dir: PathBuf::from("logs"),
        }
    }

    fn split(input: &str) -> Vec<String> {
        split_args(input).unwrap()
    }

    #[test]
    fn split_plain_words() {
        assert_eq!(split("list"), ["list"]);
        assert_eq!(split("  remove   abc-123 "), ["remove", "abc-123"]);
    }

    #[test]
    fn split_quoted_words() {
        assert_eq!(
            split(r#"add "Meeting room A" "2035-06-15 09:30:00" low"#),
            ["add", "Meeting room A", "2035-06-15 09:30:00", "low"]
        );
        assert_eq!(split("remind id 'Don\"t forget' 10m"), ["remind", "id", "Don\"t forget", "10m"]);
    }

    #[test]
    fn split_escapes_and_empty_quotes() {
        assert_eq!(split(r#"remind id Don\'t 5m"#), ["remind", "id", "Don't", "5m"]);
        assert_eq!(split(r#"a "" b"#), ["a", "", "b"]);
        assert_eq!(split(r#"a "x\"y""#), ["a", "x\"y"]);
    }

    #[test]
    fn split_errors() {
        assert!(split_args(r#"add "open"#).is_err());
        assert!(split_args("add trailing\\").is_err());
    }

    #[test]
    fn expect_args_counts_after_command() {
        let args = split("remove");
        assert!(expect_args(&args, 1, "remove <id>").is_err());
        let args = split("remove abc");
        assert!(expect_args(&args, 1, "remove <id>").is_ok());
    }

    #[test]
    fn unknown_command_keeps_going() {
        let mut session = session();
        assert_eq!(execute(&mut session, "dance"), Flow::Continue);
        assert_eq!(
            session.console.snapshot(),
            ["> dance", "Unknown command", "Type <help> for the list of commands"]
        );
    }

    #[test]
    fn exit_and_blank_input() {
        let mut session = session();
        assert_eq!(execute(&mut session, "   "), Flow::Continue);
        assert!(session.console.snapshot().is_empty());
        assert_eq!(execute(&mut session, "EXIT"), Flow::Exit);
    }

    #[test]
    fn unclosed_quote_is_reported() {
        let mut session = session();
        execute(&mut session, r#"add "oops"#);
        assert_eq!(
            session.console.snapshot().last().unwrap(),
            "Error: Unclosed quote or trailing backslash"
        );
    }
}
