//! Countdown timer engine.
//!
//! The engine owns one [`TimerSnapshot`] and moves it through the
//! `idle → running → paused/completed` state machine. While running it
//! recomputes the remaining time from the wall-clock distance to the instant
//! it was started, never by subtracting the tick interval, so scheduling
//! jitter in the event loop cannot accumulate into drift.
//!
//! # Basic Usage
//!
//! ```rust
//! use procrastinator_partner::timer::{new, Status};
//! use std::time::Duration;
//!
//! let mut timer = new(Duration::from_secs(90));
//! assert_eq!(timer.status(), Status::Idle);
//! assert_eq!(timer.view(), "01:30");
//!
//! // Starting returns the command that drives the periodic recomputation.
//! let _tick = timer.start();
//! assert_eq!(timer.status(), Status::Running);
//!
//! timer.pause();
//! assert_eq!(timer.status(), Status::Paused);
//! ```
//!
//! # bubbletea-rs Integration
//!
//! ```rust
//! use bubbletea_rs::{Cmd, Model as BubbleTeaModel, Msg};
//! use procrastinator_partner::timer::{new, CompletedMsg, Model};
//! use std::time::Duration;
//!
//! struct App {
//!     timer: Model,
//!     done: bool,
//! }
//!
//! impl BubbleTeaModel for App {
//!     fn init() -> (Self, Option<Cmd>) {
//!         let mut timer = new(Duration::from_secs(10));
//!         let cmd = timer.start();
//!         (App { timer, done: false }, cmd)
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Option<Cmd> {
//!         if let Some(completed) = msg.downcast_ref::<CompletedMsg>() {
//!             if completed.id == self.timer.id() {
//!                 self.done = true;
//!                 return None;
//!             }
//!         }
//!         self.timer.update(&msg)
//!     }
//!
//!     fn view(&self) -> String {
//!         self.timer.view()
//!     }
//! }
//! ```

use crate::format::{format_time, FormattedTime};
use bubbletea_rs::{tick as bubbletea_tick, Cmd, Model as BubbleTeaModel, Msg};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Shortest duration a timer can be set to, in milliseconds.
pub const MIN_DURATION_MS: u64 = 1_000;

/// Duration used when the caller does not supply one.
pub const DEFAULT_DURATION: Duration = Duration::from_secs(25 * 60);

/// Redraw cadence while running, roughly 60 updates per second.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(16);

static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Converts a duration to milliseconds, flooring it at [`MIN_DURATION_MS`].
///
/// Zero and sub-second durations are raised to the floor silently rather
/// than rejected.
pub fn clamp_duration(d: Duration) -> u64 {
    let ms = u64::try_from(d.as_millis()).unwrap_or(u64::MAX);
    ms.max(MIN_DURATION_MS)
}

/// Where the timer is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Freshly constructed, reset, or given a new duration.
    Idle,
    /// Counting down; ticks are being scheduled.
    Running,
    /// Stopped part way; remaining time is frozen.
    Paused,
    /// Reached zero. Remaining time is pinned to zero.
    Completed,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Status::Idle => "idle",
            Status::Running => "running",
            Status::Paused => "paused",
            Status::Completed => "completed",
        })
    }
}

/// A copy of the timer's observable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerSnapshot {
    /// Time left, in milliseconds.
    pub remaining_ms: u64,
    /// Current lifecycle state.
    pub status: Status,
    /// The duration the timer resets to, in milliseconds.
    pub initial_ms: u64,
}

impl TimerSnapshot {
    /// Fraction of the initial duration that has elapsed, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.initial_ms == 0 {
            return 0.0;
        }
        let elapsed = self.initial_ms.saturating_sub(self.remaining_ms);
        (elapsed as f64 / self.initial_ms as f64).clamp(0.0, 1.0)
    }
}

/// Message sent on every tick while the timer runs.
///
/// Ticks are stamped with the instant they fired. A tick is only honored when
/// both its `id` and its internal tag match the timer; every transition out
/// of `Running` bumps the tag, so ticks scheduled before the transition fall
/// through as no-ops.
#[derive(Debug, Clone)]
pub struct TickMsg {
    /// The timer this tick belongs to.
    pub id: i64,
    tag: i64,
    at: Instant,
}

/// Message sent once when a running timer reaches zero.
#[derive(Debug, Clone)]
pub struct CompletedMsg {
    /// The timer that completed.
    pub id: i64,
}

/// Callback invoked with the timer id when the countdown reaches zero.
pub type CompleteFunc = Arc<dyn Fn(i64) + Send + Sync>;

#[derive(Debug, Clone, Copy)]
struct Baseline {
    at: Instant,
    remaining_ms: u64,
}

/// Countdown timer state machine.
///
/// All operations change state synchronously. Operations that need a future
/// event (the next tick, or the completion notice) hand back a [`Cmd`] for
/// the bubbletea-rs runtime to schedule.
#[derive(Clone)]
pub struct Model {
    /// Time between recomputations while running.
    pub interval: Duration,

    id: i64,
    tag: i64,
    remaining_ms: u64,
    initial_ms: u64,
    status: Status,
    baseline: Option<Baseline>,
    on_complete: Option<CompleteFunc>,
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("id", &self.id)
            .field("tag", &self.tag)
            .field("interval", &self.interval)
            .field("remaining_ms", &self.remaining_ms)
            .field("initial_ms", &self.initial_ms)
            .field("status", &self.status)
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

/// Creates an idle timer with a custom recomputation interval.
///
/// The initial duration is floored at [`MIN_DURATION_MS`].
///
/// ```rust
/// use procrastinator_partner::timer::new_with_interval;
/// use std::time::Duration;
///
/// let timer = new_with_interval(Duration::from_secs(5), Duration::from_millis(100));
/// assert_eq!(timer.initial_ms(), 5_000);
/// assert_eq!(timer.interval, Duration::from_millis(100));
/// ```
pub fn new_with_interval(initial: Duration, interval: Duration) -> Model {
    let initial_ms = clamp_duration(initial);
    Model {
        interval,
        id: next_id(),
        tag: 0,
        remaining_ms: initial_ms,
        initial_ms,
        status: Status::Idle,
        baseline: None,
        on_complete: None,
    }
}

/// Creates an idle timer that recomputes every [`DEFAULT_INTERVAL`].
pub fn new(initial: Duration) -> Model {
    new_with_interval(initial, DEFAULT_INTERVAL)
}

impl Model {
    /// Registers a callback fired exactly once each time the countdown
    /// reaches zero.
    pub fn with_on_complete<F>(mut self, f: F) -> Self
    where
        F: Fn(i64) + Send + Sync + 'static,
    {
        self.on_complete = Some(Arc::new(f));
        self
    }

    /// Unique identifier of this timer instance.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Current lifecycle state.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Time left, in milliseconds.
    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    /// The duration the timer resets to, in milliseconds.
    pub fn initial_ms(&self) -> u64 {
        self.initial_ms
    }

    /// Whether the timer is counting down.
    pub fn running(&self) -> bool {
        self.status == Status::Running
    }

    /// A copy of the observable state.
    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            remaining_ms: self.remaining_ms,
            status: self.status,
            initial_ms: self.initial_ms,
        }
    }

    /// Fraction of the initial duration that has elapsed, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        self.snapshot().progress()
    }

    /// The remaining time broken into display fields.
    pub fn formatted(&self) -> FormattedTime {
        format_time(self.remaining_ms)
    }

    /// Starts or resumes the countdown.
    ///
    /// Does nothing when already running or when no time is left. Otherwise
    /// the current instant and remaining time become the baseline every tick
    /// measures against, and the first tick is returned.
    pub fn start(&mut self) -> Option<Cmd> {
        self.start_at(Instant::now())
    }

    /// [`start`](Self::start) with an explicit baseline instant.
    pub fn start_at(&mut self, now: Instant) -> Option<Cmd> {
        if self.status == Status::Running || self.remaining_ms == 0 {
            return None;
        }

        self.tag += 1;
        self.baseline = Some(Baseline {
            at: now,
            remaining_ms: self.remaining_ms,
        });
        self.status = Status::Running;
        tracing::debug!(id = self.id, remaining_ms = self.remaining_ms, "timer started");

        Some(self.tick())
    }

    /// Pauses a running countdown, freezing the remaining time at its last
    /// computed value. Does nothing in any other state.
    pub fn pause(&mut self) {
        if self.status != Status::Running {
            return;
        }
        self.cancel();
        self.status = Status::Paused;
        tracing::debug!(id = self.id, remaining_ms = self.remaining_ms, "timer paused");
    }

    /// Returns to `Idle` with the full initial duration. Valid from any state.
    pub fn reset(&mut self) {
        self.cancel();
        self.remaining_ms = self.initial_ms;
        self.status = Status::Idle;
        tracing::debug!(id = self.id, initial_ms = self.initial_ms, "timer reset");
    }

    /// Pauses when running, starts when idle or paused, and resets when
    /// completed. A completed timer lands in `Idle`, not `Running`.
    pub fn toggle(&mut self) -> Option<Cmd> {
        self.toggle_at(Instant::now())
    }

    /// [`toggle`](Self::toggle) with an explicit instant for the start case.
    pub fn toggle_at(&mut self, now: Instant) -> Option<Cmd> {
        match self.status {
            Status::Running => {
                self.pause();
                None
            }
            Status::Idle | Status::Paused => self.start_at(now),
            Status::Completed => {
                self.reset();
                None
            }
        }
    }

    /// Replaces the duration entirely and returns to `Idle`.
    ///
    /// Durations below [`MIN_DURATION_MS`] are raised to it.
    pub fn set_duration(&mut self, d: Duration) {
        let ms = clamp_duration(d);
        self.cancel();
        self.initial_ms = ms;
        self.remaining_ms = ms;
        self.status = Status::Idle;
        tracing::debug!(id = self.id, initial_ms = ms, "timer duration set");
    }

    /// Cancels any outstanding tick without touching the snapshot. Call when
    /// the owning view goes away.
    pub fn teardown(&mut self) {
        self.cancel();
    }

    /// Processes this timer's [`TickMsg`]s. Everything else is ignored.
    pub fn update(&mut self, msg: &Msg) -> Option<Cmd> {
        let tick = msg.downcast_ref::<TickMsg>()?;
        if tick.id != self.id || tick.tag != self.tag || self.status != Status::Running {
            return None;
        }
        let baseline = self.baseline?;

        let elapsed = tick.at.saturating_duration_since(baseline.at);
        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        self.remaining_ms = baseline.remaining_ms.saturating_sub(elapsed_ms);

        if self.remaining_ms == 0 {
            return Some(self.complete());
        }
        Some(self.tick())
    }

    /// Renders the remaining time as `MM:SS` or `H:MM:SS`.
    pub fn view(&self) -> String {
        self.formatted().display
    }

    fn cancel(&mut self) {
        self.tag += 1;
        self.baseline = None;
    }

    fn complete(&mut self) -> Cmd {
        self.cancel();
        self.remaining_ms = 0;
        self.status = Status::Completed;
        tracing::info!(id = self.id, initial_ms = self.initial_ms, "timer completed");

        if let Some(on_complete) = &self.on_complete {
            on_complete(self.id);
        }

        let id = self.id;
        bubbletea_tick(Duration::from_nanos(1), move |_| {
            Box::new(CompletedMsg { id }) as Msg
        })
    }

    fn tick(&self) -> Cmd {
        let id = self.id;
        let tag = self.tag;
        bubbletea_tick(self.interval, move |_| {
            Box::new(TickMsg {
                id,
                tag,
                at: Instant::now(),
            }) as Msg
        })
    }
}

impl BubbleTeaModel for Model {
    fn init() -> (Self, Option<Cmd>) {
        (Model::default(), None)
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        Model::update(self, &msg)
    }

    fn view(&self) -> String {
        Model::view(self)
    }
}

impl Default for Model {
    fn default() -> Self {
        new(DEFAULT_DURATION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn tick_at(timer: &Model, at: Instant) -> Msg {
        Box::new(TickMsg {
            id: timer.id(),
            tag: timer.tag,
            at,
        }) as Msg
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_new_is_idle_with_full_duration() {
        let timer = new(Duration::from_secs(30));
        assert_eq!(timer.status(), Status::Idle);
        assert_eq!(timer.remaining_ms(), 30_000);
        assert_eq!(timer.initial_ms(), 30_000);
        assert_eq!(timer.interval, DEFAULT_INTERVAL);
        assert!(timer.id() > 0);
        assert_eq!(timer.progress(), 0.0);
    }

    #[test]
    fn test_new_floors_duration() {
        let timer = new(Duration::ZERO);
        assert_eq!(timer.initial_ms(), MIN_DURATION_MS);
        assert_eq!(timer.remaining_ms(), MIN_DURATION_MS);
    }

    #[test]
    fn test_unique_ids() {
        let a = new(Duration::from_secs(10));
        let b = new(Duration::from_secs(10));
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_default_timer() {
        let timer = Model::default();
        assert_eq!(timer.initial_ms(), 25 * 60 * 1000);
        assert_eq!(timer.view(), "25:00");
    }

    #[test]
    fn test_set_duration_floors_and_idles() {
        for d in [0u64, 1, 500, 999, 1_000, 1_001, 90_000, 7_200_000] {
            let mut timer = new(Duration::from_secs(60));
            let _ = timer.start_at(Instant::now());
            timer.set_duration(ms(d));
            assert_eq!(timer.remaining_ms(), d.max(1_000), "duration {d}");
            assert_eq!(timer.initial_ms(), d.max(1_000), "duration {d}");
            assert_eq!(timer.status(), Status::Idle);
        }
    }

    #[test]
    fn test_start_then_pause_keeps_remaining() {
        let mut timer = new(Duration::from_secs(10));
        let t0 = Instant::now();

        assert!(timer.start_at(t0).is_some());
        assert_eq!(timer.status(), Status::Running);
        timer.pause();

        assert_eq!(timer.status(), Status::Paused);
        assert_eq!(timer.remaining_ms(), 10_000);
    }

    #[test]
    fn test_start_is_idempotent_while_running() {
        let mut timer = new(Duration::from_secs(10));
        let t0 = Instant::now();

        assert!(timer.start_at(t0).is_some());
        let tag = timer.tag;
        assert!(timer.start_at(t0 + ms(300)).is_none());

        assert_eq!(timer.tag, tag);
        assert_eq!(timer.baseline.map(|b| b.at), Some(t0));

        // The baseline still measures from t0.
        timer.update(&tick_at(&timer, t0 + ms(400)));
        assert_eq!(timer.remaining_ms(), 9_600);
    }

    #[test]
    fn test_tick_uses_wall_clock_delta() {
        let mut timer = new(Duration::from_secs(10));
        let t0 = Instant::now();
        let _ = timer.start_at(t0);

        // Irregular tick spacing must not accumulate error.
        for offset in [17u64, 40, 41, 95, 100] {
            assert!(timer.update(&tick_at(&timer, t0 + ms(offset))).is_some());
            assert_eq!(timer.remaining_ms(), 10_000 - offset);
        }
    }

    #[test]
    fn test_pause_and_resume_rebaselines() {
        let mut timer = new(Duration::from_secs(10));
        let t0 = Instant::now();
        let _ = timer.start_at(t0);
        timer.update(&tick_at(&timer, t0 + ms(300)));
        timer.pause();
        assert_eq!(timer.remaining_ms(), 9_700);

        let t1 = t0 + ms(5_000);
        let _ = timer.start_at(t1);
        timer.update(&tick_at(&timer, t1 + ms(200)));
        assert_eq!(timer.remaining_ms(), 9_500);
    }

    #[test]
    fn test_completion_fires_once() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        let mut timer = new(Duration::from_secs(1)).with_on_complete(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let t0 = Instant::now();
        let _ = timer.start_at(t0);

        timer.update(&tick_at(&timer, t0 + ms(500)));
        assert_eq!(timer.status(), Status::Running);
        assert_eq!(timer.remaining_ms(), 500);

        assert!(timer.update(&tick_at(&timer, t0 + ms(1_003))).is_some());
        assert_eq!(timer.status(), Status::Completed);
        assert_eq!(timer.remaining_ms(), 0);
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        // Late ticks, stale or current-tag, change nothing.
        assert!(timer.update(&tick_at(&timer, t0 + ms(1_020))).is_none());
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(timer.progress(), 1.0);
    }

    #[tokio::test]
    async fn test_completion_emits_completed_msg() {
        let mut timer = new(Duration::from_secs(1));
        let t0 = Instant::now();
        let _ = timer.start_at(t0);

        let cmd = timer
            .update(&tick_at(&timer, t0 + ms(1_000)))
            .expect("completion command");
        let msg = cmd.await.expect("completion message");
        let completed = msg.downcast_ref::<CompletedMsg>().expect("CompletedMsg");
        assert_eq!(completed.id, timer.id());
    }

    #[test]
    fn test_start_noop_when_nothing_left() {
        let mut timer = new(Duration::from_secs(1));
        let t0 = Instant::now();
        let _ = timer.start_at(t0);
        timer.update(&tick_at(&timer, t0 + ms(2_000)));
        assert_eq!(timer.status(), Status::Completed);

        assert!(timer.start_at(t0 + ms(3_000)).is_none());
        assert_eq!(timer.status(), Status::Completed);
    }

    #[test]
    fn test_toggle_transitions() {
        let mut timer = new(Duration::from_secs(10));
        let t0 = Instant::now();

        assert!(timer.toggle_at(t0).is_some());
        assert_eq!(timer.status(), Status::Running);

        assert!(timer.toggle_at(t0 + ms(100)).is_none());
        assert_eq!(timer.status(), Status::Paused);

        assert!(timer.toggle_at(t0 + ms(200)).is_some());
        assert_eq!(timer.status(), Status::Running);
    }

    #[test]
    fn test_toggle_on_completed_resets_to_idle() {
        let mut timer = new(Duration::from_secs(1));
        let t0 = Instant::now();
        let _ = timer.start_at(t0);
        timer.update(&tick_at(&timer, t0 + ms(1_000)));
        assert_eq!(timer.status(), Status::Completed);

        assert!(timer.toggle_at(t0 + ms(1_500)).is_none());
        assert_eq!(timer.status(), Status::Idle);
        assert_eq!(timer.remaining_ms(), timer.initial_ms());
    }

    #[test]
    fn test_reset_from_every_state() {
        let t0 = Instant::now();

        let mut idle = new(Duration::from_secs(5));
        idle.reset();
        assert_eq!(idle.snapshot().status, Status::Idle);

        let mut running = new(Duration::from_secs(5));
        let _ = running.start_at(t0);
        running.update(&tick_at(&running, t0 + ms(1_200)));
        running.reset();
        assert_eq!(running.status(), Status::Idle);
        assert_eq!(running.remaining_ms(), 5_000);
        assert_eq!(running.progress(), 0.0);

        let mut paused = new(Duration::from_secs(5));
        let _ = paused.start_at(t0);
        paused.pause();
        paused.reset();
        assert_eq!(paused.status(), Status::Idle);
    }

    #[test]
    fn test_stale_ticks_ignored() {
        let mut timer = new(Duration::from_secs(10));
        let t0 = Instant::now();
        let _ = timer.start_at(t0);
        let stale = tick_at(&timer, t0 + ms(500));

        timer.pause();
        let _ = timer.start_at(t0 + ms(1_000));

        assert!(timer.update(&stale).is_none());
        assert_eq!(timer.remaining_ms(), 10_000);
    }

    #[test]
    fn test_set_duration_cancels_ticking() {
        let mut timer = new(Duration::from_secs(10));
        let t0 = Instant::now();
        let _ = timer.start_at(t0);
        let pending = tick_at(&timer, t0 + ms(500));

        timer.set_duration(Duration::from_secs(30));
        assert!(timer.update(&pending).is_none());
        assert_eq!(timer.remaining_ms(), 30_000);
        assert_eq!(timer.status(), Status::Idle);
    }

    #[test]
    fn test_teardown_cancels_ticking() {
        let mut timer = new(Duration::from_secs(10));
        let t0 = Instant::now();
        let _ = timer.start_at(t0);
        let pending = tick_at(&timer, t0 + ms(500));

        timer.teardown();
        assert!(timer.update(&pending).is_none());
        assert_eq!(timer.remaining_ms(), 10_000);
    }

    #[test]
    fn test_foreign_ticks_ignored() {
        let mut timer = new(Duration::from_secs(10));
        let other = new(Duration::from_secs(10));
        let t0 = Instant::now();
        let _ = timer.start_at(t0);

        let foreign = Box::new(TickMsg {
            id: other.id(),
            tag: timer.tag,
            at: t0 + ms(500),
        }) as Msg;
        assert!(timer.update(&foreign).is_none());
        assert_eq!(timer.remaining_ms(), 10_000);
    }

    #[test]
    fn test_progress_is_monotonic_while_running() {
        let mut timer = new(Duration::from_secs(4));
        let t0 = Instant::now();
        let _ = timer.start_at(t0);

        let mut last = timer.progress();
        for offset in (0..=4_000).step_by(250) {
            timer.update(&tick_at(&timer, t0 + ms(offset)));
            let p = timer.progress();
            assert!(p >= last);
            assert!((0.0..=1.0).contains(&p));
            last = p;
        }
        assert_eq!(last, 1.0);

        timer.set_duration(Duration::from_secs(4));
        assert_eq!(timer.progress(), 0.0);
    }

    #[test]
    fn test_progress_zero_initial() {
        let snapshot = TimerSnapshot {
            remaining_ms: 0,
            status: Status::Idle,
            initial_ms: 0,
        };
        assert_eq!(snapshot.progress(), 0.0);
    }

    #[test]
    fn test_view_switches_to_hours() {
        let mut timer = new(Duration::from_secs(59 * 60));
        assert_eq!(timer.view(), "59:00");
        timer.set_duration(Duration::from_secs(3_661));
        assert_eq!(timer.view(), "1:01:01");
    }

    #[test]
    fn test_status_display() {
        assert_eq!(Status::Idle.to_string(), "idle");
        assert_eq!(Status::Running.to_string(), "running");
        assert_eq!(Status::Paused.to_string(), "paused");
        assert_eq!(Status::Completed.to_string(), "completed");
    }
}
