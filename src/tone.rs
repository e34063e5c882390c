//! Completion tone.
//!
//! A [`Tone`] describes a short sine beep with an exponential fade. It can
//! synthesize its own samples, but how it reaches the user is up to a
//! [`ToneSink`]: the terminal widget rings the terminal bell. Playback is
//! best effort and a failing sink is only ever logged.

use std::f32::consts::TAU;
use std::fmt;
use std::io::{self, Write};
#[cfg(test)]
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;
use thiserror::Error;

const BEL: &[u8] = b"\x07";

/// Why a tone could not be played.
#[derive(Debug, Error)]
pub enum ToneError {
    /// Writing to the output failed.
    #[error("failed to write tone: {0}")]
    Io(#[from] io::Error),
}

/// A sine beep with an exponential gain decay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Oscillator frequency.
    pub frequency_hz: f32,
    /// How long the gain takes to decay from `start_gain` to `end_gain`.
    pub duration: Duration,
    /// Gain at the first sample.
    pub start_gain: f32,
    /// Gain at the end of `duration`. Must be above zero for the decay curve.
    pub end_gain: f32,
}

impl Default for Tone {
    fn default() -> Self {
        Self {
            frequency_hz: 800.0,
            duration: Duration::from_millis(500),
            start_gain: 0.3,
            end_gain: 0.01,
        }
    }
}

impl Tone {
    /// Gain at `t` seconds into the tone.
    pub fn gain_at(&self, t: f32) -> f32 {
        let total = self.duration.as_secs_f32();
        if total <= 0.0 || self.start_gain <= 0.0 || self.end_gain <= 0.0 {
            return 0.0;
        }
        let progress = (t / total).clamp(0.0, 1.0);
        self.start_gain * (self.end_gain / self.start_gain).powf(progress)
    }

    /// Synthesizes mono samples in `[-1, 1]` at `sample_rate` Hz.
    pub fn samples(&self, sample_rate: u32) -> Vec<f32> {
        let n = (self.duration.as_secs_f64() * f64::from(sample_rate)).round() as usize;
        let rate = sample_rate as f32;
        (0..n)
            .map(|i| {
                let t = i as f32 / rate;
                self.gain_at(t) * (TAU * self.frequency_hz * t).sin()
            })
            .collect()
    }
}

/// Something that can make a [`Tone`] audible.
pub trait ToneSink: Send {
    /// Plays the tone once.
    fn play(&mut self, tone: &Tone) -> Result<(), ToneError>;
}

/// Rings the terminal bell. The terminal decides what the bell sounds like,
/// so only the fact of playing is honored, not the tone's shape.
///
/// The bell is written directly rather than through the rendered view:
/// bubbletea-rs diffs `view()` output into cells, and a BEL placed there
/// would ring on every repaint. BEL moves no cursor and draws nothing, so
/// writing it between frames leaves the renderer's screen state intact.
pub struct TerminalBell<W = io::Stdout> {
    out: W,
}

impl TerminalBell<io::Stdout> {
    /// A bell on standard output.
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> TerminalBell<W> {
    /// A bell written to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// The underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.out
    }
}

impl<W> fmt::Debug for TerminalBell<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TerminalBell")
    }
}

impl<W: Write + Send> ToneSink for TerminalBell<W> {
    fn play(&mut self, _tone: &Tone) -> Result<(), ToneError> {
        self.out.write_all(BEL)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Plays nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSink;

impl ToneSink for SilentSink {
    fn play(&mut self, _tone: &Tone) -> Result<(), ToneError> {
        Ok(())
    }
}

/// Counts plays. Clones share the count.
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub(crate) struct RecordingSink {
    plays: Arc<AtomicUsize>,
}

#[cfg(test)]
impl RecordingSink {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn plays(&self) -> usize {
        self.plays.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
impl ToneSink for RecordingSink {
    fn play(&mut self, _tone: &Tone) -> Result<(), ToneError> {
        self.plays.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Plays `tone`, logging and swallowing any failure. Returns whether it
/// played.
pub fn play_or_log(sink: &mut dyn ToneSink, tone: &Tone) -> bool {
    match sink.play(tone) {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(error = %err, "completion tone could not be played");
            false
        }
    }
}
