//! Progress bar for the countdown.
//!
//! Renders the fraction of the timer that has elapsed as a row of filled and
//! empty cells, optionally followed by a percentage. The timer already
//! redraws at display rate, so the bar draws the ratio it is given directly
//! and keeps no animation state of its own.
//!
//! ```rust
//! use procrastinator_partner::progress::{new, with_width, without_percentage};
//!
//! let mut bar = new(&[with_width(10), without_percentage()]);
//! bar.set_percent(0.5);
//! assert_eq!(bar.percent(), 0.5);
//! ```

use lipgloss_extras::lipgloss::{self, Color, Style};

const DEFAULT_WIDTH: usize = 40;
const DEFAULT_FULL_COLOR: &str = "#F25D94";
const DEFAULT_EMPTY_COLOR: &str = "#606060";

/// Configuration applied by [`new`].
pub enum ProgressOption {
    /// Total width in cells, percentage included.
    WithWidth(usize),
    /// Characters for filled and empty cells.
    WithFillCharacters(char, char),
    /// Colors for filled and empty cells.
    WithColors(String, String),
    /// Hide the trailing percentage.
    WithoutPercentage,
}

impl ProgressOption {
    fn apply(&self, m: &mut Model) {
        match self {
            ProgressOption::WithWidth(width) => m.width = *width,
            ProgressOption::WithFillCharacters(full, empty) => {
                m.full = *full;
                m.empty = *empty;
            }
            ProgressOption::WithColors(full, empty) => {
                m.full_color = full.clone();
                m.empty_color = empty.clone();
            }
            ProgressOption::WithoutPercentage => m.show_percentage = false,
        }
    }
}

/// Sets the total width in cells.
pub fn with_width(width: usize) -> ProgressOption {
    ProgressOption::WithWidth(width)
}

/// Sets the characters used for filled and empty cells.
pub fn with_fill_characters(full: char, empty: char) -> ProgressOption {
    ProgressOption::WithFillCharacters(full, empty)
}

/// Sets the colors used for filled and empty cells.
pub fn with_colors(full: impl Into<String>, empty: impl Into<String>) -> ProgressOption {
    ProgressOption::WithColors(full.into(), empty.into())
}

/// Hides the trailing percentage.
pub fn without_percentage() -> ProgressOption {
    ProgressOption::WithoutPercentage
}

/// Progress bar state.
#[derive(Debug, Clone)]
pub struct Model {
    /// Total width in cells, percentage included.
    pub width: usize,
    /// Character for filled cells.
    pub full: char,
    /// Color of filled cells.
    pub full_color: String,
    /// Character for empty cells.
    pub empty: char,
    /// Color of empty cells.
    pub empty_color: String,
    /// Whether to append the percentage.
    pub show_percentage: bool,
    /// Style for the percentage text.
    pub percentage_style: Style,

    percent: f64,
}

/// Creates a progress bar with the given options.
pub fn new(opts: &[ProgressOption]) -> Model {
    let mut m = Model {
        width: DEFAULT_WIDTH,
        full: '█',
        full_color: DEFAULT_FULL_COLOR.to_string(),
        empty: '░',
        empty_color: DEFAULT_EMPTY_COLOR.to_string(),
        show_percentage: true,
        percentage_style: Style::new(),
        percent: 0.0,
    };

    for opt in opts {
        opt.apply(&mut m);
    }

    m
}

impl Default for Model {
    fn default() -> Self {
        new(&[])
    }
}

impl Model {
    /// The ratio currently shown, in `[0, 1]`.
    pub fn percent(&self) -> f64 {
        self.percent
    }

    /// Sets the ratio to show, clamped to `[0, 1]`. NaN shows as empty.
    pub fn set_percent(&mut self, p: f64) {
        self.percent = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
    }

    /// Renders the current ratio.
    pub fn view(&self) -> String {
        self.view_as(self.percent)
    }

    /// Renders an arbitrary ratio without storing it.
    pub fn view_as(&self, percent: f64) -> String {
        let percent = if percent.is_nan() { 0.0 } else { percent.clamp(0.0, 1.0) };
        let percent_view = self.percentage_view(percent);
        let percent_width = lipgloss::width_visible(&percent_view);
        format!("{}{}", self.bar_view(percent, percent_width), percent_view)
    }

    /// Number of filled cells for `percent` when the bar has `text_width`
    /// cells of trailing text.
    pub fn filled_cells(&self, percent: f64, text_width: usize) -> usize {
        let total = self.width.saturating_sub(text_width);
        ((total as f64 * percent).round() as usize).min(total)
    }

    fn bar_view(&self, percent: f64, text_width: usize) -> String {
        let total = self.width.saturating_sub(text_width);
        let filled = self.filled_cells(percent, text_width);

        let full = Style::new()
            .foreground(Color::from(self.full_color.as_str()))
            .render(&self.full.to_string().repeat(filled));
        let empty = Style::new()
            .foreground(Color::from(self.empty_color.as_str()))
            .render(&self.empty.to_string().repeat(total - filled));

        format!("{}{}", full, empty)
    }

    fn percentage_view(&self, percent: f64) -> String {
        if !self.show_percentage {
            return String::new();
        }
        let percentage = format!(" {:3.0}%", percent * 100.0);
        self.percentage_style.render(&percentage)
    }
}
