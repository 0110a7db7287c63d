//! Global remindcal configuration.

use std::path::{Path, PathBuf};

use config::{Config as ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{CalendarError, CalendarResult};

static DEFAULT_DATA_FILE: &str = "~/.remindcal/calendar.json";
static DEFAULT_LOG_DIR: &str = "~/.remindcal/logs";
static DEFAULT_CONSOLE_LOG_FILE: &str = "~/.remindcal/console.log";

fn default_data_file() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_FILE)
}

fn default_log_dir() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_DIR)
}

fn default_console_log_file() -> PathBuf {
    PathBuf::from(DEFAULT_CONSOLE_LOG_FILE)
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_pretty_json() -> bool {
    true
}

fn default_notification_buffer() -> usize {
    1
}

/// Configuration at ~/.config/remindcal/config.toml
///
/// Every key is optional; `REMINDCAL_<KEY>` environment variables override
/// the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Indent the saved calendar JSON
    #[serde(default = "default_pretty_json")]
    pub pretty_json: bool,

    /// How many fired notifications may queue before reminders wait on the consumer
    #[serde(default = "default_notification_buffer")]
    pub notification_buffer: usize,

    /// Where `log-save` writes the session console log
    #[serde(default = "default_console_log_file")]
    pub console_log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_file: default_data_file(),
            log_dir: default_log_dir(),
            log_level: default_log_level(),
            pretty_json: default_pretty_json(),
            notification_buffer: default_notification_buffer(),
            console_log_file: default_console_log_file(),
        }
    }
}

impl Config {
    pub fn config_path() -> CalendarResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CalendarError::Config("Could not determine config directory".into()))?
            .join("remindcal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, creating a commented template first if
    /// nothing is there yet.
    pub fn load() -> CalendarResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from an explicit file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> CalendarResult<Self> {
        ConfigBuilder::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("REMINDCAL").try_parsing(true))
            .build()
            .map_err(|e| CalendarError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CalendarError::Config(e.to_string()))
    }

    pub fn data_path(&self) -> PathBuf {
        expand(&self.data_file)
    }

    pub fn log_path(&self) -> PathBuf {
        expand(&self.log_dir)
    }

    pub fn console_log_path(&self) -> PathBuf {
        expand(&self.console_log_file)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> CalendarResult<()> {
        let contents = format!(
            "\
# remindcal configuration

# Where events are saved on exit:
# data_file = \"{DEFAULT_DATA_FILE}\"

# Application log directory and level:
# log_dir = \"{DEFAULT_LOG_DIR}\"
# log_level = \"info\"

# Indent saved JSON:
# pretty_json = true

# Notifications that may queue before reminders wait on the console:
# notification_buffer = 1

# Session console log written by `log-save`:
# console_log_file = \"{DEFAULT_CONSOLE_LOG_FILE}\"
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CalendarError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| CalendarError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

fn expand(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.notification_buffer, 1);
        assert!(config.pretty_json);
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "data_file = \"/tmp/events.json\"\npretty_json = false\nnotification_buffer = 8\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.data_path(), PathBuf::from("/tmp/events.json"));
        assert!(!config.pretty_json);
        assert_eq!(config.notification_buffer, 8);
        assert_eq!(config.log_dir, default_log_dir());
    }

    #[test]
    fn default_template_parses_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("remindcal/config.toml");
        Config::create_default_config(&path).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.data_file, default_data_file());
        assert_eq!(config.console_log_file, default_console_log_file());
    }

    #[test]
    fn tilde_is_expanded() {
        if dirs::home_dir().is_none() {
            return;
        }
        let config = Config::default();
        assert!(!config.data_path().to_string_lossy().starts_with('~'));
    }
}
