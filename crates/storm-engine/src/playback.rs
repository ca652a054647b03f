//! Timer-driven playback.
//!
//! Playback is driven by the caller's clock: `now` is any monotonic
//! [`Duration`] (time since session start, a tokio `Instant` offset, or a
//! synthetic value in tests). A [`Timeline`] fires at most once per poll and
//! never bursts to catch up after a stall.

use std::time::Duration;

/// Whether a timeline is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    Idle,
    Playing { next_due: Duration },
}

/// Fixed-period ticker.
#[derive(Debug, Clone)]
pub struct Timeline {
    period: Duration,
    state: PlayState,
}

impl Timeline {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            state: PlayState::Idle,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn state(&self) -> PlayState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.state, PlayState::Playing { .. })
    }

    /// Start ticking; the first tick is due one period after `now`.
    ///
    /// Starting an already-playing timeline keeps its schedule.
    pub fn start(&mut self, now: Duration) {
        if !self.is_playing() {
            self.state = PlayState::Playing {
                next_due: now + self.period,
            };
        }
    }

    pub fn stop(&mut self) {
        self.state = PlayState::Idle;
    }

    /// Flip between playing and idle. Returns whether the timeline now plays.
    pub fn toggle(&mut self, now: Duration) -> bool {
        if self.is_playing() {
            self.stop();
        } else {
            self.start(now);
        }
        self.is_playing()
    }

    /// Returns `true` when a tick is due at `now`.
    pub fn poll(&mut self, now: Duration) -> bool {
        let PlayState::Playing { next_due } = self.state else {
            return false;
        };
        if now < next_due {
            return false;
        }

        let mut next = next_due + self.period;
        if next <= now {
            next = now + self.period;
        }
        self.state = PlayState::Playing { next_due: next };
        true
    }
}

/// Cycles through time groups, wrapping after the last one.
#[derive(Debug, Clone)]
pub struct GroupPlayback {
    timeline: Timeline,
    index: usize,
    count: usize,
}

impl GroupPlayback {
    pub fn new(period: Duration) -> Self {
        Self {
            timeline: Timeline::new(period),
            index: 0,
            count: 0,
        }
    }

    /// Stop and rewind for a new set of `count` groups.
    pub fn reset(&mut self, count: usize) {
        self.timeline.stop();
        self.index = 0;
        self.count = count;
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_playing(&self) -> bool {
        self.timeline.is_playing()
    }

    /// Start cycling. With no groups the timeline stays idle.
    pub fn start(&mut self, now: Duration) -> bool {
        if self.count > 0 {
            self.timeline.start(now);
        }
        self.is_playing()
    }

    pub fn stop(&mut self) {
        self.timeline.stop();
    }

    pub fn toggle(&mut self, now: Duration) -> bool {
        if self.is_playing() {
            self.stop();
            false
        } else {
            self.start(now)
        }
    }

    /// Jump to `index` and stop playing. Returns `false` if out of range.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.count {
            return false;
        }
        self.timeline.stop();
        self.index = index;
        true
    }

    /// Index `delta` groups away from the current one, wrapping.
    pub fn offset(&self, delta: isize) -> Option<usize> {
        if self.count == 0 {
            return None;
        }
        let count = self.count as isize;
        Some((self.index as isize + delta).rem_euclid(count) as usize)
    }

    /// Advance to the next group if a tick is due.
    pub fn tick(&mut self, now: Duration) -> Option<usize> {
        if self.count == 0 || !self.timeline.poll(now) {
            return None;
        }
        self.index = (self.index + 1) % self.count;
        Some(self.index)
    }
}

/// Outcome of one storm playback tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StormTick {
    pub step: usize,
    /// The cursor moved on this tick
    pub advanced: bool,
    /// The last step was reached and playback stopped
    pub finished: bool,
}

/// Steps through one storm path, stopping at the last observation.
#[derive(Debug, Clone)]
pub struct StormPlayback {
    timeline: Timeline,
    step: usize,
    len: usize,
}

impl StormPlayback {
    pub fn new(period: Duration) -> Self {
        Self {
            timeline: Timeline::new(period),
            step: 0,
            len: 0,
        }
    }

    /// Stop and rewind for a path of `len` observations.
    pub fn reset(&mut self, len: usize) {
        self.timeline.stop();
        self.step = 0;
        self.len = len;
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_playing(&self) -> bool {
        self.timeline.is_playing()
    }

    fn at_end(&self) -> bool {
        self.step + 1 >= self.len
    }

    /// Start stepping. A path already at its last step (or shorter than two
    /// observations) stays idle.
    pub fn start(&mut self, now: Duration) -> bool {
        if !self.at_end() {
            self.timeline.start(now);
        }
        self.is_playing()
    }

    pub fn stop(&mut self) {
        self.timeline.stop();
    }

    pub fn toggle(&mut self, now: Duration) -> bool {
        if self.is_playing() {
            self.stop();
            false
        } else {
            self.start(now)
        }
    }

    /// Move `delta` steps, clamped to the path. Returns `true` if the step changed.
    pub fn seek(&mut self, delta: isize) -> bool {
        if self.len == 0 {
            return false;
        }
        let last = (self.len - 1) as isize;
        let target = (self.step as isize + delta).clamp(0, last) as usize;
        let changed = target != self.step;
        self.step = target;
        changed
    }

    /// Advance one step if a tick is due. A due tick that finds the cursor
    /// already on the last step (after a seek) stops without advancing.
    pub fn tick(&mut self, now: Duration) -> Option<StormTick> {
        if !self.timeline.poll(now) {
            return None;
        }
        let advanced = !self.at_end();
        if advanced {
            self.step += 1;
        }
        let finished = self.at_end();
        if finished {
            self.timeline.stop();
        }
        Some(StormTick {
            step: self.step,
            advanced,
            finished,
        })
    }
}
