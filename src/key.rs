//! Key bindings for the widget.

use bubbletea_rs::KeyMsg;
use crossterm::event::{KeyCode, KeyModifiers};
use lipgloss_extras::lipgloss::{Color, Style};

/// A key plus the modifiers that must accompany it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    /// The key.
    pub code: KeyCode,
    /// Required modifiers. `NONE` matches only an unmodified press.
    pub modifiers: KeyModifiers,
}

impl From<KeyCode> for KeyPress {
    fn from(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }
}

impl From<(KeyCode, KeyModifiers)> for KeyPress {
    fn from((code, modifiers): (KeyCode, KeyModifiers)) -> Self {
        Self { code, modifiers }
    }
}

/// A set of keys that trigger one action, with its help text.
#[derive(Debug, Clone)]
pub struct Binding {
    /// Keys that trigger the binding.
    pub keys: Vec<KeyPress>,
    /// Short key label shown in help, e.g. `"space"`.
    pub help: String,
    /// What the binding does, shown in help.
    pub description: String,
    /// Disabled bindings never match and are left out of help.
    pub enabled: bool,
}

impl Binding {
    /// Creates a binding for the given keys.
    pub fn new<K: Into<KeyPress>>(keys: Vec<K>) -> Self {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            help: String::new(),
            description: String::new(),
            enabled: true,
        }
    }

    /// Sets the help label and description.
    pub fn with_help(mut self, help: impl Into<String>, description: impl Into<String>) -> Self {
        self.help = help.into();
        self.description = description.into();
        self
    }

    /// Whether `key_msg` triggers this binding.
    ///
    /// Shift is ignored for character keys since terminals report it
    /// inconsistently for symbols like `+`.
    pub fn matches(&self, key_msg: &KeyMsg) -> bool {
        if !self.enabled {
            return false;
        }
        self.keys.iter().any(|k| {
            let pressed = match key_msg.key {
                KeyCode::Char(_) => key_msg.modifiers.difference(KeyModifiers::SHIFT),
                _ => key_msg.modifiers,
            };
            k.code == key_msg.key && k.modifiers == pressed
        })
    }
}

/// Bindings understood by the countdown widget.
#[derive(Debug, Clone)]
pub struct KeyMap {
    /// Start or pause.
    pub toggle: Binding,
    /// Back to the full duration.
    pub reset: Binding,
    /// Add a minute.
    pub longer: Binding,
    /// Remove a minute.
    pub shorter: Binding,
    /// Move focus between the task field and the timer.
    pub switch_focus: Binding,
    /// Leave the task field.
    pub leave_input: Binding,
    /// Exit.
    pub quit: Binding,
    /// Exit, even while typing.
    pub force_quit: Binding,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            toggle: Binding::new(vec![KeyCode::Char(' '), KeyCode::Enter])
                .with_help("space", "start/pause"),
            reset: Binding::new(vec![KeyCode::Char('r')]).with_help("r", "reset"),
            longer: Binding::new(vec![KeyCode::Char('+'), KeyCode::Char('='), KeyCode::Up])
                .with_help("+", "1 min more"),
            shorter: Binding::new(vec![KeyCode::Char('-'), KeyCode::Down])
                .with_help("-", "1 min less"),
            switch_focus: Binding::new(vec![KeyCode::Tab]).with_help("tab", "edit task"),
            leave_input: Binding::new(vec![KeyCode::Esc, KeyCode::Enter]),
            quit: Binding::new(vec![KeyCode::Char('q'), KeyCode::Esc]).with_help("q", "quit"),
            force_quit: Binding::new(vec![(KeyCode::Char('c'), KeyModifiers::CONTROL)]),
        }
    }
}

impl KeyMap {
    /// Bindings listed in the help line, in display order.
    pub fn short_help(&self) -> Vec<&Binding> {
        [
            &self.toggle,
            &self.reset,
            &self.longer,
            &self.shorter,
            &self.switch_focus,
            &self.quit,
        ]
        .into_iter()
        .filter(|b| b.enabled && !b.help.is_empty())
        .collect()
    }

    /// Renders the help line, e.g. `space start/pause • r reset`.
    pub fn help_view(&self) -> String {
        let key_style = Style::new().foreground(Color::from("#909090"));
        let desc_style = Style::new().foreground(Color::from("#626262"));
        let sep = Style::new().foreground(Color::from("#4A4A4A")).render(" • ");

        self.short_help()
            .iter()
            .map(|b| {
                format!(
                    "{} {}",
                    key_style.render(&b.help),
                    desc_style.render(&b.description)
                )
            })
            .collect::<Vec<_>>()
            .join(sep.as_str())
    }
}
