//! Clock-face formatting for remaining time.
//!
//! The countdown display shows `MM:SS` until the remaining time reaches an
//! hour, then switches to `H:MM:SS`. The hour field is never padded; minutes
//! and seconds always are. Sub-second precision is kept in the decomposition
//! but not shown in the display string.
//!
//! ```rust
//! use procrastinator_partner::format::format_time;
//!
//! assert_eq!(format_time(0).display, "00:00");
//! assert_eq!(format_time(3_661_000).display, "1:01:01");
//! ```

use std::fmt;

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;

/// Remaining time split into display fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedTime {
    /// Whole hours.
    pub hours: u64,
    /// Minutes past the hour, `0..60`.
    pub minutes: u64,
    /// Seconds past the minute, `0..60`.
    pub seconds: u64,
    /// Milliseconds past the second, `0..1000`. Truncated, never rounded.
    pub milliseconds: u64,
    /// The clock-face string, `MM:SS` or `H:MM:SS`.
    pub display: String,
}

/// Decomposes a millisecond count into a [`FormattedTime`].
pub fn format_time(ms: u64) -> FormattedTime {
    let hours = ms / MS_PER_HOUR;
    let minutes = (ms % MS_PER_HOUR) / MS_PER_MINUTE;
    let seconds = (ms % MS_PER_MINUTE) / MS_PER_SECOND;
    let milliseconds = ms % MS_PER_SECOND;

    let display = if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    };

    FormattedTime {
        hours,
        minutes,
        seconds,
        milliseconds,
        display,
    }
}

impl fmt::Display for FormattedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}
