//! Single-line input for the task label.
//!
//! The label is free text kept in the widget's own state: nothing validates
//! it and nothing stores it. The cursor position counts grapheme clusters so
//! Backspace removes what the user sees as one character.

use crate::Component;
use bubbletea_rs::{Cmd, KeyMsg, Msg};
use crossterm::event::{KeyCode, KeyModifiers};
use lipgloss_extras::lipgloss::{Color, Style};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

const DEFAULT_PLACEHOLDER: &str = "What are you putting off?";

/// Task label input state.
#[derive(Debug, Clone)]
pub struct Model {
    /// Text shown before the value.
    pub prompt: String,
    /// Shown dimmed while the value is empty.
    pub placeholder: String,
    /// Maximum visible width in cells; `0` means unbounded.
    pub width: usize,
    /// Maximum length in graphemes; `0` means unbounded.
    pub char_limit: usize,
    /// Style for the prompt.
    pub prompt_style: Style,
    /// Style for the value text.
    pub text_style: Style,
    /// Style for the placeholder.
    pub placeholder_style: Style,
    /// Style for the cursor cell.
    pub cursor_style: Style,

    value: String,
    pos: usize,
    focus: bool,
}

/// Creates an empty, blurred input with the default placeholder.
pub fn new() -> Model {
    Model {
        prompt: "Task: ".to_string(),
        placeholder: DEFAULT_PLACEHOLDER.to_string(),
        width: 0,
        char_limit: 120,
        prompt_style: Style::new().bold(true),
        text_style: Style::new(),
        placeholder_style: Style::new().foreground(Color::from("#767676")),
        cursor_style: Style::new().reverse(true),
        value: String::new(),
        pos: 0,
        focus: false,
    }
}

impl Default for Model {
    fn default() -> Self {
        new()
    }
}

impl Model {
    /// The current label.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Cursor position in graphemes.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Replaces the label, truncating to the character limit and moving the
    /// cursor to the end.
    pub fn set_value(&mut self, value: impl Into<String>) {
        let value = value.into();
        self.value = if self.char_limit > 0 {
            value.graphemes(true).take(self.char_limit).collect()
        } else {
            value
        };
        self.pos = self.len();
    }

    /// Moves the cursor, clamped to the value.
    pub fn set_cursor(&mut self, pos: usize) {
        self.pos = pos.min(self.len());
    }

    /// Clears the label.
    pub fn reset(&mut self) {
        self.value.clear();
        self.pos = 0;
    }

    /// Handles editing keys while focused.
    pub fn update(&mut self, msg: &Msg) -> Option<Cmd> {
        if !self.focus {
            return None;
        }
        let key_msg = msg.downcast_ref::<KeyMsg>()?;

        match key_msg.key {
            KeyCode::Char('u') if key_msg.modifiers.contains(KeyModifiers::CONTROL) => {
                self.reset();
            }
            KeyCode::Char(ch)
                if !key_msg.modifiers.contains(KeyModifiers::CONTROL)
                    && !key_msg.modifiers.contains(KeyModifiers::ALT) =>
            {
                self.insert(ch);
            }
            KeyCode::Backspace => {
                if self.pos > 0 {
                    self.remove(self.pos - 1);
                    self.pos -= 1;
                }
            }
            KeyCode::Delete => {
                if self.pos < self.len() {
                    self.remove(self.pos);
                }
            }
            KeyCode::Left => self.pos = self.pos.saturating_sub(1),
            KeyCode::Right => self.pos = (self.pos + 1).min(self.len()),
            KeyCode::Home => self.pos = 0,
            KeyCode::End => self.pos = self.len(),
            _ => {}
        }

        None
    }

    /// Renders prompt, value and cursor.
    pub fn view(&self) -> String {
        let prompt = self.prompt_style.render(&self.prompt);

        if self.value.is_empty() {
            let placeholder = self.placeholder_style.render(&self.placeholder);
            if self.focus {
                return format!("{}{}{}", prompt, self.cursor_style.render(" "), placeholder);
            }
            return format!("{}{}", prompt, placeholder);
        }

        let graphemes: Vec<&str> = self.visible_graphemes();
        let start = self.scroll_offset(&graphemes);
        let cursor = self.pos - start;
        let window = &graphemes[start..];

        let mut v = String::new();
        v.push_str(&self.text_style.render(&window[..cursor.min(window.len())].concat()));
        if self.focus {
            match window.get(cursor) {
                Some(under) => {
                    v.push_str(&self.cursor_style.render(under));
                    v.push_str(&self.text_style.render(&window[cursor + 1..].concat()));
                }
                None => v.push_str(&self.cursor_style.render(" ")),
            }
        } else if cursor < window.len() {
            v.push_str(&self.text_style.render(&window[cursor..].concat()));
        }

        format!("{}{}", prompt, v)
    }

    fn len(&self) -> usize {
        self.value.graphemes(true).count()
    }

    fn visible_graphemes(&self) -> Vec<&str> {
        self.value.graphemes(true).collect()
    }

    /// First grapheme to draw so the cursor stays inside `width`.
    fn scroll_offset(&self, graphemes: &[&str]) -> usize {
        if self.width == 0 {
            return 0;
        }
        let budget = self.width.saturating_sub(self.prompt.width() + 1);
        let mut start = self.pos;
        let mut used = 0;
        while start > 0 {
            let w = graphemes[start - 1].width();
            if used + w > budget {
                break;
            }
            used += w;
            start -= 1;
        }
        start
    }

    fn byte_offset(&self, grapheme: usize) -> usize {
        self.value
            .grapheme_indices(true)
            .nth(grapheme)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    fn insert(&mut self, ch: char) {
        if self.char_limit > 0 && self.len() >= self.char_limit {
            return;
        }
        let at = self.byte_offset(self.pos);
        self.value.insert(at, ch);
        self.pos = (self.pos + 1).min(self.len());
    }

    fn remove(&mut self, grapheme: usize) {
        let start = self.byte_offset(grapheme);
        let end = self.byte_offset(grapheme + 1);
        self.value.replace_range(start..end, "");
    }
}

impl Component for Model {
    fn focus(&mut self) -> Option<Cmd> {
        self.focus = true;
        None
    }

    fn blur(&mut self) {
        self.focus = false;
    }

    fn focused(&self) -> bool {
        self.focus
    }
}
