//! Session console: everything printed in the shell, kept for `log`.

use remindcal_core::{CalendarResult, Store};
use std::sync::{Mutex, PoisonError};

/// Terminal output plus an in-memory transcript of it.
///
/// Both the command loop and the notification task write here, so the
/// transcript sits behind a mutex.
pub struct Console {
    lines: Mutex<Vec<String>>,
    store: Box<dyn Store>,
}

impl Console {
    pub fn new(store: impl Store + 'static) -> Self {
        Console {
            lines: Mutex::new(Vec::new()),
            store: Box::new(store),
        }
    }

    /// Print a line and record it.
    pub fn println(&self, text: &str) {
        println!("{text}");
        self.record(text);
    }

    /// Print `styled` but record `plain`, so saved logs carry no color codes.
    pub fn println_styled(&self, plain: &str, styled: &str) {
        println!("{styled}");
        self.record(plain);
    }

    /// Record without printing (used for echoing user input).
    pub fn record(&self, text: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(text.to_string());
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn save(&self) -> CalendarResult<()> {
        let mut data = self.snapshot().join("\n");
        data.push('\n');
        self.store.save(data.as_bytes())
    }

    /// Replace the transcript with the saved one.
    pub fn load(&self) -> CalendarResult<usize> {
        let data = self.store.load()?;
        let loaded: Vec<String> = String::from_utf8_lossy(&data)
            .lines()
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();

        let count = loaded.len();
        *self.lines.lock().unwrap_or_else(PoisonError::into_inner) = loaded;
        Ok(count)
    }
}
