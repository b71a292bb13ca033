//! Playback clock
//!
//! Elapsed playback time net of pauses:
//! `elapsed = playing ? banked + (now − anchor) : banked`.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Monotonic time basis in seconds
pub trait TimeSource: Send + Sync {
    /// Current time in seconds; never decreases
    fn now(&self) -> f64;
}

/// Wall-clock-independent monotonic source backed by [`Instant`]
#[derive(Debug, Clone, Copy)]
pub struct MonotonicTimeSource {
    origin: Instant,
}

impl MonotonicTimeSource {
    /// Source whose zero is the moment of creation
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicTimeSource {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Externally driven source (audio position of an offline render, tests)
///
/// Clones share the same time value.
#[derive(Debug, Clone, Default)]
pub struct ManualTimeSource {
    seconds: Arc<AtomicU64>,
}

impl ManualTimeSource {
    /// Source starting at 0 s
    pub fn new() -> Self {
        Self::default()
    }

    /// Jump to an absolute time
    pub fn set(&self, seconds: f64) {
        self.seconds.store(seconds.to_bits(), Ordering::SeqCst);
    }

    /// Move forward by `delta` seconds
    pub fn advance(&self, delta: f64) {
        self.set(self.now() + delta);
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> f64 {
        f64::from_bits(self.seconds.load(Ordering::SeqCst))
    }
}

/// Pause-aware playback clock
pub struct PlaybackClock {
    source: Arc<dyn TimeSource>,
    banked: f64,
    anchor: f64,
    playing: bool,
}

impl fmt::Debug for PlaybackClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackClock")
            .field("banked", &self.banked)
            .field("anchor", &self.anchor)
            .field("playing", &self.playing)
            .finish()
    }
}

impl PlaybackClock {
    /// Stopped clock at 0 s
    pub fn new(source: Arc<dyn TimeSource>) -> Self {
        let anchor = source.now();
        Self {
            source,
            banked: 0.0,
            anchor,
            playing: false,
        }
    }

    /// Zero the clock and start playing
    pub fn start(&mut self) {
        self.reset();
        self.playing = true;
    }

    /// Zero banked time and re-anchor to now
    pub fn reset(&mut self) {
        self.banked = 0.0;
        self.anchor = self.source.now();
    }

    /// Bank the running segment and stop; no-op when already paused
    pub fn pause(&mut self) {
        if !self.playing {
            return;
        }
        self.banked += (self.source.now() - self.anchor).max(0.0);
        self.playing = false;
    }

    /// Re-anchor and start playing; no-op when already playing
    pub fn resume(&mut self) {
        if self.playing {
            return;
        }
        self.anchor = self.source.now();
        self.playing = true;
    }

    /// Whether the clock is running
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Seconds of playback, never negative
    pub fn elapsed(&self) -> f64 {
        let running = if self.playing {
            (self.source.now() - self.anchor).max(0.0)
        } else {
            0.0
        };
        (self.banked + running).max(0.0)
    }
}
