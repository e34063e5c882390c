//! The Procrastinator Partner screen.
//!
//! One task field, one large countdown, a status line, a progress bar and a
//! help line. Clicking the countdown toggles it; triple-clicking resets it.
//! The keyboard offers the same operations plus duration changes.
//!
//! ```text
//!   Procrastinator Partner
//!
//!   Task: write the report
//!
//!   ███ ███   ███ ███
//!     █ █   █ █   █ █
//!   ███ ███   ███ █ █
//!   █     █ █   █ █ █
//!   ███ ███   ███ ███
//!   idle · click to start, triple-click to reset
//!
//!   ░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░   0%
//!
//!   space start/pause • r reset • + 1 min more • ...
//! ```

use crate::click::{self, ClickAction, ClickOutcome};
use crate::config::{self, Config};
use crate::key::KeyMap;
use crate::progress::{self, with_width};
use crate::taskinput;
use crate::timer::{self, CompletedMsg, Status};
use crate::tone::{self, SilentSink, TerminalBell, Tone, ToneSink};
use crate::Component;
use bubbletea_rs::{quit, Cmd, KeyMsg, Model as BubbleTeaModel, MouseMsg, Msg, WindowSizeMsg};
use crossterm::event::{MouseButton, MouseEventKind};
use lipgloss_extras::lipgloss::{Color, Style};
use std::time::Duration;

const MARGIN: u16 = 2;
const TITLE: &str = "Procrastinator Partner";

const TASK_ROW: u16 = 2;
const DISPLAY_TOP: u16 = 4;
const GLYPH_HEIGHT: u16 = 5;
const STEP: Duration = Duration::from_secs(60);

/// Which element receives keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// The task label field.
    Task,
    /// The countdown.
    Timer,
}

/// Root model of the widget.
pub struct Model {
    /// Task label field.
    pub task: taskinput::Model,
    /// Countdown engine.
    pub timer: timer::Model,
    /// Key bindings.
    pub keys: KeyMap,

    clicks: click::Model,
    progress: progress::Model,
    tone: Tone,
    sink: Box<dyn ToneSink>,
    focus: Focus,
    bar_width: usize,
}

impl Model {
    /// Builds the screen from `config`, playing the completion tone on
    /// `sink`.
    pub fn new(config: &Config, sink: Box<dyn ToneSink>) -> Self {
        let mut task = taskinput::new();
        task.set_value(config.task.clone());

        let mut model = Self {
            task,
            timer: timer::new_with_interval(config.duration, config.tick_interval),
            keys: KeyMap::default(),
            clicks: click::new(),
            progress: progress::new(&[with_width(config.bar_width)]),
            tone: config.tone,
            sink,
            focus: Focus::Timer,
            bar_width: config.bar_width,
        };

        if config.task.is_empty() {
            model.set_focus(Focus::Task);
        }
        model
    }

    /// Which element receives keystrokes.
    pub fn focus(&self) -> Focus {
        self.focus
    }

    fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        match focus {
            Focus::Task => {
                let _ = self.task.focus();
            }
            Focus::Timer => self.task.blur(),
        }
    }

    fn apply(&mut self, action: ClickAction) -> Option<Cmd> {
        match action {
            ClickAction::Toggle => self.timer.toggle(),
            ClickAction::Reset => {
                self.timer.reset();
                None
            }
        }
    }

    fn shift_duration(&mut self, longer: bool) {
        let current = Duration::from_millis(self.timer.initial_ms());
        let next = if longer {
            current.saturating_add(STEP)
        } else {
            current.saturating_sub(STEP)
        };
        self.timer.set_duration(next);
    }

    fn quit(&mut self) -> Option<Cmd> {
        self.timer.teardown();
        self.clicks.clear();
        tracing::info!("quitting");
        Some(quit())
    }

    fn handle_key(&mut self, key_msg: &KeyMsg, msg: &Msg) -> Option<Cmd> {
        if self.keys.force_quit.matches(key_msg) {
            return self.quit();
        }

        if self.focus == Focus::Task {
            if self.keys.leave_input.matches(key_msg) || self.keys.switch_focus.matches(key_msg) {
                self.set_focus(Focus::Timer);
                return None;
            }
            return self.task.update(msg);
        }

        if self.keys.quit.matches(key_msg) {
            self.quit()
        } else if self.keys.toggle.matches(key_msg) {
            self.timer.toggle()
        } else if self.keys.reset.matches(key_msg) {
            self.timer.reset();
            None
        } else if self.keys.longer.matches(key_msg) {
            self.shift_duration(true);
            None
        } else if self.keys.shorter.matches(key_msg) {
            self.shift_duration(false);
            None
        } else if self.keys.switch_focus.matches(key_msg) {
            self.set_focus(Focus::Task);
            None
        } else {
            None
        }
    }

    fn handle_mouse(&mut self, mouse: &MouseMsg) -> Option<Cmd> {
        if mouse.button != MouseEventKind::Down(MouseButton::Left) {
            return None;
        }

        if self.display_hit(mouse.x, mouse.y) {
            return match self.clicks.click() {
                ClickOutcome::Action(action) => self.apply(action),
                ClickOutcome::Deferred(cmd) => Some(cmd),
            };
        }

        if mouse.y == TASK_ROW {
            self.set_focus(Focus::Task);
        } else if self.focus == Focus::Task {
            self.set_focus(Focus::Timer);
        }
        None
    }

    /// Whether a cell lies on the big countdown digits.
    pub fn display_hit(&self, x: u16, y: u16) -> bool {
        let width = display_width(&self.timer.view()) as u16;
        (DISPLAY_TOP..DISPLAY_TOP + GLYPH_HEIGHT).contains(&y)
            && (MARGIN..MARGIN + width).contains(&x)
    }

    fn resize(&mut self, width: u16) {
        let available = usize::from(width.saturating_sub(MARGIN * 2));
        self.progress.width = self.bar_width.min(available);
    }

    fn status_line(&self) -> String {
        let hint = match self.timer.status() {
            Status::Idle => "click to start, triple-click to reset",
            Status::Running => "click to pause, triple-click to reset",
            Status::Paused => "click to resume, triple-click to reset",
            Status::Completed => "done! click to reset",
        };
        format!("{} · {}", self.timer.status(), hint)
    }

    fn display_style(&self) -> Style {
        let color = match self.timer.status() {
            Status::Idle => "#DDDDDD",
            Status::Running => "#04B575",
            Status::Paused => "#ECD06F",
            Status::Completed => "#F25D94",
        };
        let style = Style::new().foreground(Color::from(color)).bold(true);
        if self.focus == Focus::Timer {
            style
        } else {
            style.faint(true)
        }
    }
}

impl BubbleTeaModel for Model {
    fn init() -> (Self, Option<Cmd>) {
        let config = config::current();
        let sink: Box<dyn ToneSink> = if config.bell {
            Box::new(TerminalBell::stdout())
        } else {
            Box::new(SilentSink)
        };
        (Model::new(&config, sink), None)
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            return self.handle_key(key_msg, &msg);
        }

        if let Some(mouse) = msg.downcast_ref::<MouseMsg>() {
            return self.handle_mouse(mouse);
        }

        if let Some(size) = msg.downcast_ref::<WindowSizeMsg>() {
            self.resize(size.width);
            return None;
        }

        if let Some(completed) = msg.downcast_ref::<CompletedMsg>() {
            if completed.id == self.timer.id() {
                tone::play_or_log(self.sink.as_mut(), &self.tone);
            }
            return None;
        }

        if let Some(action) = self.clicks.update(&msg) {
            return self.apply(action);
        }

        self.timer.update(&msg)
    }

    fn view(&self) -> String {
        let pad = " ".repeat(usize::from(MARGIN));
        let title = Style::new()
            .foreground(Color::from("#F25D94"))
            .bold(true)
            .render(TITLE);
        let status = Style::new()
            .foreground(Color::from("#767676"))
            .render(&self.status_line());

        let mut progress = self.progress.clone();
        progress.set_percent(self.timer.progress());

        let style = self.display_style();
        let mut lines = vec![title, String::new(), self.task.view(), String::new()];
        lines.extend(big_digits(&self.timer.view()).iter().map(|row| style.render(row)));
        lines.push(status);
        lines.push(String::new());
        lines.push(progress.view());
        lines.push(String::new());
        lines.push(self.keys.help_view());

        lines
            .iter()
            .map(|line| {
                if line.is_empty() {
                    String::new()
                } else {
                    format!("{}{}", pad, line)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn glyph(c: char) -> [&'static str; 5] {
    match c {
        '0' => ["███", "█ █", "█ █", "█ █", "███"],
        '1' => [" █ ", "██ ", " █ ", " █ ", "███"],
        '2' => ["███", "  █", "███", "█  ", "███"],
        '3' => ["███", "  █", "███", "  █", "███"],
        '4' => ["█ █", "█ █", "███", "  █", "  █"],
        '5' => ["███", "█  ", "███", "  █", "███"],
        '6' => ["███", "█  ", "███", "█ █", "███"],
        '7' => ["███", "  █", "  █", "  █", "  █"],
        '8' => ["███", "█ █", "███", "█ █", "███"],
        '9' => ["███", "█ █", "███", "  █", "███"],
        ':' => [" ", "█", " ", "█", " "],
        _ => ["   ", "   ", "   ", "   ", "   "],
    }
}

/// Renders `text` in the five-row block font.
pub fn big_digits(text: &str) -> Vec<String> {
    (0..usize::from(GLYPH_HEIGHT))
        .map(|row| {
            text.chars()
                .map(|c| glyph(c)[row])
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

/// Cell width of `text` in the block font.
pub fn display_width(text: &str) -> usize {
    big_digits(text)
        .first()
        .map(|row| row.chars().count())
        .unwrap_or(0)
}
