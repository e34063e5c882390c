#![warn(missing_docs)]

//! # procrastinator-partner
//!
//! A countdown timer widget for the terminal, built on
//! [bubbletea-rs](https://github.com/joshka/bubbletea-rs). Type what you are
//! putting off, click the big countdown to start it, click again to pause,
//! triple-click to start over. A bell rings when time is up.
//!
//! ## Components
//!
//! Each component follows the Elm Architecture: a `Model` with `update()`
//! and `view()`, and commands handed back to the runtime for anything that
//! happens later.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`timer`] | Countdown state machine with drift-free recomputation |
//! | [`click`] | Single- vs triple-click classifier |
//! | [`progress`] | Progress bar for the elapsed fraction |
//! | [`taskinput`] | Single-line task label field |
//! | [`tone`] | Completion tone and playback sinks |
//! | [`widget`] | The full screen composing everything above |
//!
//! ## Using the engine directly
//!
//! ```rust
//! use procrastinator_partner::prelude::*;
//! use std::time::Duration;
//!
//! let mut timer = timer_new(Duration::from_secs(10 * 60));
//! let _tick = timer.toggle();
//! assert_eq!(timer.status(), TimerStatus::Running);
//!
//! timer.reset();
//! assert_eq!(timer.view(), "10:00");
//! assert_eq!(timer.progress(), 0.0);
//! ```
//!
//! ## Embedding the screen
//!
//! ```rust
//! use bubbletea_rs::Model as BubbleTeaModel;
//! use procrastinator_partner::prelude::*;
//!
//! let config = Config::default().with_task("answer email");
//! let screen = Widget::new(&config, Box::new(SilentSink));
//! assert!(screen.view().contains("answer email"));
//! ```

pub mod click;
pub mod config;
pub mod format;
pub mod key;
pub mod progress;
pub mod taskinput;
pub mod timer;
pub mod tone;
pub mod widget;

use bubbletea_rs::Cmd;

/// Components that can take keyboard focus.
///
/// A focused component accepts key input and draws its active state; a
/// blurred one ignores keys.
///
/// ```rust
/// use procrastinator_partner::prelude::*;
///
/// let mut input = taskinput_new();
/// assert!(!input.focused());
/// input.focus();
/// assert!(input.focused());
/// input.blur();
/// assert!(!input.focused());
/// ```
pub trait Component {
    /// Takes focus. May return a command, for instance to start a blink.
    fn focus(&mut self) -> Option<Cmd>;

    /// Gives up focus.
    fn blur(&mut self);

    /// Whether the component has focus.
    fn focused(&self) -> bool;
}

pub use click::{ClickAction, ClickOutcome, Model as ClickClassifier};
pub use config::Config;
pub use format::{format_time, FormattedTime};
pub use key::{Binding, KeyMap, KeyPress};
pub use progress::Model as Progress;
pub use taskinput::Model as TaskInput;
pub use timer::{
    new as timer_new, new_with_interval as timer_new_with_interval, CompletedMsg,
    Model as Timer, Status as TimerStatus, TickMsg as TimerTickMsg, TimerSnapshot,
};
pub use tone::{play_or_log, SilentSink, TerminalBell, Tone, ToneError, ToneSink};
pub use widget::Model as Widget;

/// Common imports.
///
/// ```rust
/// use procrastinator_partner::prelude::*;
/// ```
pub mod prelude {
    pub use crate::click::{ClickAction, ClickOutcome, Model as ClickClassifier};
    pub use crate::config::Config;
    pub use crate::format::{format_time, FormattedTime};
    pub use crate::key::{Binding, KeyMap, KeyPress};
    pub use crate::progress::Model as Progress;
    pub use crate::taskinput::{new as taskinput_new, Model as TaskInput};
    pub use crate::timer::{
        new as timer_new, new_with_interval as timer_new_with_interval, CompletedMsg,
        Model as Timer, Status as TimerStatus, TickMsg as TimerTickMsg, TimerSnapshot,
    };
    pub use crate::tone::{play_or_log, SilentSink, TerminalBell, Tone, ToneError, ToneSink};
    pub use crate::widget::Model as Widget;
    pub use crate::Component;
}
