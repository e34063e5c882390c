//! Single- vs triple-click disambiguation.
//!
//! The countdown display toggles on a click and resets on a triple click. A
//! toggle can't fire on the first click because that click may be the start
//! of a triple click, so the classifier holds each click in a short window:
//!
//! - every click is buffered and the buffer is pruned to the clicks within
//!   [`CLICK_WINDOW`] of the newest one;
//! - three or more buffered clicks are a reset, reported immediately, and the
//!   buffer is cleared so a longer burst still yields a single reset;
//! - otherwise a deferred check is scheduled one window later, and if it
//!   still finds one or two buffered clicks it reports a toggle.
//!
//! ```rust
//! use procrastinator_partner::click::{new, ClickAction, ClickOutcome};
//! use std::time::{Duration, Instant};
//!
//! let mut clicks = new();
//! let t0 = Instant::now();
//!
//! assert!(matches!(clicks.click_at(t0), ClickOutcome::Deferred(_)));
//! assert!(matches!(clicks.click_at(t0 + Duration::from_millis(100)), ClickOutcome::Deferred(_)));
//! assert!(matches!(
//!     clicks.click_at(t0 + Duration::from_millis(200)),
//!     ClickOutcome::Action(ClickAction::Reset)
//! ));
//! ```

use bubbletea_rs::{tick as bubbletea_tick, Cmd, Msg};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{Duration, Instant};

/// Trailing window within which clicks count as one burst.
pub const CLICK_WINDOW: Duration = Duration::from_millis(500);

/// Clicks inside one window that make a reset.
pub const RESET_CLICKS: usize = 3;

static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// What a burst of clicks means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickAction {
    /// One or two clicks: start or pause.
    Toggle,
    /// Three or more clicks: back to the full duration.
    Reset,
}

/// Result of registering a click.
pub enum ClickOutcome {
    /// The burst resolved right away.
    Action(ClickAction),
    /// Nothing yet; run the command and feed its message back to
    /// [`Model::update`] to learn whether the burst became a toggle.
    Deferred(Cmd),
}

/// Fires one window after a click to settle a pending toggle.
#[derive(Debug, Clone)]
pub struct WindowElapsedMsg {
    /// The classifier that scheduled the check.
    pub id: i64,
    tag: i64,
}

/// Click burst classifier.
#[derive(Debug, Clone)]
pub struct Model {
    /// Trailing window within which clicks count as one burst.
    pub window: Duration,

    id: i64,
    tag: i64,
    clicks: VecDeque<Instant>,
}

/// Creates a classifier with the standard 500 ms window.
pub fn new() -> Model {
    Model {
        window: CLICK_WINDOW,
        id: next_id(),
        tag: 0,
        clicks: VecDeque::new(),
    }
}

impl Default for Model {
    fn default() -> Self {
        new()
    }
}

impl Model {
    /// Unique identifier of this classifier.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Number of clicks currently held in the window.
    pub fn pending(&self) -> usize {
        self.clicks.len()
    }

    /// Registers a click now.
    pub fn click(&mut self) -> ClickOutcome {
        self.click_at(Instant::now())
    }

    /// Registers a click at `now`.
    pub fn click_at(&mut self, now: Instant) -> ClickOutcome {
        self.clicks.push_back(now);
        while let Some(&oldest) = self.clicks.front() {
            if now.saturating_duration_since(oldest) > self.window {
                self.clicks.pop_front();
            } else {
                break;
            }
        }

        if self.clicks.len() >= RESET_CLICKS {
            tracing::debug!(id = self.id, clicks = self.clicks.len(), "reset burst");
            self.settle();
            return ClickOutcome::Action(ClickAction::Reset);
        }

        ClickOutcome::Deferred(self.schedule_check())
    }

    /// Settles a deferred check. Returns [`ClickAction::Toggle`] when the
    /// window closed on one or two clicks.
    pub fn update(&mut self, msg: &Msg) -> Option<ClickAction> {
        let elapsed = msg.downcast_ref::<WindowElapsedMsg>()?;
        if elapsed.id != self.id || elapsed.tag != self.tag {
            return None;
        }
        if (1..RESET_CLICKS).contains(&self.clicks.len()) {
            tracing::debug!(id = self.id, clicks = self.clicks.len(), "toggle burst");
            self.settle();
            return Some(ClickAction::Toggle);
        }
        None
    }

    /// Drops buffered clicks and pending checks.
    pub fn clear(&mut self) {
        self.settle();
    }

    fn settle(&mut self) {
        self.clicks.clear();
        self.tag += 1;
    }

    fn schedule_check(&self) -> Cmd {
        let id = self.id;
        let tag = self.tag;
        bubbletea_tick(self.window, move |_| {
            Box::new(WindowElapsedMsg { id, tag }) as Msg
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn elapsed(model: &Model) -> Msg {
        Box::new(WindowElapsedMsg {
            id: model.id(),
            tag: model.tag,
        }) as Msg
    }

    fn is_reset(outcome: &ClickOutcome) -> bool {
        matches!(outcome, ClickOutcome::Action(ClickAction::Reset))
    }

    #[test]
    fn test_single_click_toggles_after_window() {
        let mut clicks = new();
        let t0 = Instant::now();

        assert!(matches!(clicks.click_at(t0), ClickOutcome::Deferred(_)));
        assert_eq!(clicks.pending(), 1);

        let check = elapsed(&clicks);
        assert_eq!(clicks.update(&check), Some(ClickAction::Toggle));
        assert_eq!(clicks.pending(), 0);
    }

    #[test]
    fn test_double_click_toggles_once() {
        let mut clicks = new();
        let t0 = Instant::now();

        // Both clicks schedule a check with the same tag.
        let _ = clicks.click_at(t0);
        let first = elapsed(&clicks);
        let _ = clicks.click_at(t0 + ms(200));
        let second = elapsed(&clicks);

        let actions: Vec<_> = [first, second]
            .iter()
            .filter_map(|m| clicks.update(m))
            .collect();
        assert_eq!(actions, vec![ClickAction::Toggle]);
    }

    #[test]
    fn test_triple_click_resets_without_toggle() {
        let mut clicks = new();
        let t0 = Instant::now();

        let _ = clicks.click_at(t0);
        let first = elapsed(&clicks);
        let _ = clicks.click_at(t0 + ms(150));
        let second = elapsed(&clicks);
        assert!(is_reset(&clicks.click_at(t0 + ms(300))));
        assert_eq!(clicks.pending(), 0);

        // The checks scheduled by the first two clicks are now stale.
        assert_eq!(clicks.update(&first), None);
        assert_eq!(clicks.update(&second), None);
    }

    #[test]
    fn test_long_burst_resets_once() {
        let mut clicks = new();
        let t0 = Instant::now();

        let resets = (0..5)
            .map(|i| clicks.click_at(t0 + ms(i * 60)))
            .filter(is_reset)
            .count();
        assert_eq!(resets, 1);
    }

    #[test]
    fn test_window_prunes_old_clicks() {
        let mut clicks = new();
        let t0 = Instant::now();

        let _ = clicks.click_at(t0);
        let _ = clicks.click_at(t0 + ms(400));
        // t0 falls out of the window; two clicks remain, no reset.
        assert!(!is_reset(&clicks.click_at(t0 + ms(650))));
        assert_eq!(clicks.pending(), 2);
    }

    #[test]
    fn test_click_exactly_on_window_edge_counts() {
        let mut clicks = new();
        let t0 = Instant::now();

        let _ = clicks.click_at(t0);
        let _ = clicks.click_at(t0 + ms(250));
        assert!(is_reset(&clicks.click_at(t0 + ms(500))));
    }

    #[test]
    fn test_foreign_check_ignored() {
        let mut clicks = new();
        let other = new();
        let _ = clicks.click_at(Instant::now());

        assert_eq!(clicks.update(&elapsed(&other)), None);
        assert_eq!(clicks.pending(), 1);
    }

    #[test]
    fn test_clear_drops_pending_check() {
        let mut clicks = new();
        let _ = clicks.click_at(Instant::now());
        let check = elapsed(&clicks);

        clicks.clear();
        assert_eq!(clicks.update(&check), None);
    }

    #[test]
    fn test_unrelated_message_ignored() {
        let mut clicks = new();
        let msg = Box::new(42u32) as Msg;
        assert_eq!(clicks.update(&msg), None);
    }

    #[tokio::test]
    async fn test_deferred_command_delivers_window_elapsed() {
        let mut clicks = new();
        let ClickOutcome::Deferred(cmd) = clicks.click() else {
            panic!("single click must defer");
        };

        let msg = cmd.await.expect("window message");
        assert!(msg.downcast_ref::<WindowElapsedMsg>().is_some());
        assert_eq!(clicks.update(&msg), Some(ClickAction::Toggle));
    }
}
