//! Interactive read-eval loop.

use anyhow::{Context, Result};
use log::{error, info, warn};
use owo_colors::OwoColorize;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::commands::{self, Flow, PROMPT, Session};
use crate::console::Console;

pub async fn run(mut session: Session) -> Result<()> {
    let drain = session
        .calendar
        .take_notifications()
        .map(|rx| spawn_drain(rx, Arc::clone(&session.console)));

    session
        .console
        .println("Welcome to remindcal. Type <help> for the list of commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print_prompt();
        let line = lines.next_line().await.context("Failed to read input")?;
        let Some(line) = line else {
            info!("End of input");
            break;
        };
        if commands::execute(&mut session, &line) == Flow::Exit {
            break;
        }
    }

    shutdown(session, drain).await
}

/// Print every fired reminder until the channel closes.
fn spawn_drain(mut rx: mpsc::Receiver<String>, console: Arc<Console>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            info!("Notification delivered: {message}");
            console.println_styled(&message, &message.cyan().bold().to_string());
            print_prompt();
        }
    })
}

fn print_prompt() {
    print!("{PROMPT}");
    // A failed flush only delays the prompt
    let _ = std::io::stdout().flush();
}

async fn shutdown(mut session: Session, drain: Option<JoinHandle<()>>) -> Result<()> {
    session.calendar.stop_all_reminders();

    let saved = session.calendar.save().with_context(|| {
        format!(
            "Could not save events to {}",
            session.data_path.display()
        )
    });
    match &saved {
        Ok(()) => {
            info!("Events saved to {}", session.data_path.display());
            session.console.println("Events saved");
        }
        Err(e) => {
            error!("{e:#}");
            let plain = format!("Error: {e:#}");
            session.console.println_styled(&plain, &plain.red().to_string());
        }
    }

    session.calendar.close();
    if let Some(drain) = drain {
        if let Err(e) = drain.await {
            warn!("Notification task ended abnormally: {e}");
        }
    }

    session.console.println("Bye");
    saved
}
