//! Widget configuration.
//!
//! bubbletea-rs builds the root model through `Model::init()`, which takes no
//! arguments, so the binary installs its [`Config`] once before the program
//! starts and the widget reads it back with [`current`].

use crate::timer::{clamp_duration, DEFAULT_DURATION, DEFAULT_INTERVAL};
use crate::tone::Tone;
use once_cell::sync::OnceCell;
use std::time::Duration;

static CONFIG: OnceCell<Config> = OnceCell::new();

/// Settings for one widget.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Initial countdown duration. Floored at one second.
    pub duration: Duration,
    /// Initial task label.
    pub task: String,
    /// Redraw cadence while the timer runs.
    pub tick_interval: Duration,
    /// Ring the terminal bell on completion.
    pub bell: bool,
    /// The completion tone.
    pub tone: Tone,
    /// Width of the progress bar in cells.
    pub bar_width: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            duration: DEFAULT_DURATION,
            task: String::new(),
            tick_interval: DEFAULT_INTERVAL,
            bell: true,
            tone: Tone::default(),
            bar_width: 40,
        }
    }
}

impl Config {
    /// Sets the initial duration, flooring it like the timer does.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Duration::from_millis(clamp_duration(duration));
        self
    }

    /// Sets the initial task label.
    pub fn with_task(mut self, task: impl Into<String>) -> Self {
        self.task = task.into();
        self
    }

    /// Turns the completion bell on or off.
    pub fn with_bell(mut self, bell: bool) -> Self {
        self.bell = bell;
        self
    }
}

/// Installs the process-wide configuration. Returns the rejected config if
/// one was already installed.
pub fn install(config: Config) -> Result<(), Config> {
    CONFIG.set(config)
}

/// The installed configuration, or the default when none was installed.
pub fn current() -> Config {
    CONFIG.get().cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.duration, Duration::from_secs(25 * 60));
        assert_eq!(config.tick_interval, Duration::from_millis(16));
        assert!(config.bell);
        assert!(config.task.is_empty());
    }

    #[test]
    fn test_with_duration_floors() {
        let config = Config::default().with_duration(Duration::from_millis(10));
        assert_eq!(config.duration, Duration::from_secs(1));
    }

    #[test]
    fn test_builders() {
        let config = Config::default().with_task("inbox zero").with_bell(false);
        assert_eq!(config.task, "inbox zero");
        assert!(!config.bell);
    }
}
