//! Roulette reveal animation
//!
//! A spin shows random decoys at a tick interval that depends only on how far
//! through the spin we are:
//!
//! | progress      | interval (ms)                 |
//! |---------------|-------------------------------|
//! | `< 0.7`       | 50                            |
//! | `0.7 .. 0.9`  | `100 + (progress - 0.7) * 500`  |
//! | `>= 0.9`      | `200 + (progress - 0.9) * 2000` |
//!
//! Once the spin duration has elapsed the animator shows the number it was
//! started with, holds it for the settle delay, and reports `Settled` once.
//! The animator never chooses the outcome and never writes game state.

use crate::game::{DrawnSet, GameRange};
use crate::rng::NumberSource;
use crate::stage::Stage;
use crate::tone::{Cue, CuePlayer};
use std::time::Duration;
use tracing::debug;

/// Default spin length
pub const SPIN_DURATION: Duration = Duration::from_millis(3000);

/// Default hold on the final number before the draw completes
pub const SETTLE_DELAY: Duration = Duration::from_millis(500);

const STEADY_END: f64 = 0.7;
const RAMP_END: f64 = 0.9;
const STEADY_INTERVAL_MS: f64 = 50.0;
const RAMP_BASE_MS: f64 = 100.0;
const RAMP_SLOPE_MS: f64 = 500.0;
const LANDING_BASE_MS: f64 = 200.0;
const LANDING_SLOPE_MS: f64 = 2000.0;

/// Tick pitch range in Hz, upper bound exclusive
pub const TICK_FREQUENCY_RANGE: (f64, f64) = (400.0, 1200.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Fixed fast ticks
    Steady,
    /// Linearly slowing ticks
    Ramp,
    /// Steeper slowdown before the reveal
    Landing,
    /// Spin time is up
    Done,
}

/// Spin pacing parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseTable {
    spin: Duration,
    settle: Duration,
}

impl PhaseTable {
    pub fn new(spin: Duration, settle: Duration) -> Self {
        Self {
            spin: spin.max(Duration::from_millis(1)),
            settle,
        }
    }

    pub fn spin(&self) -> Duration {
        self.spin
    }

    pub fn settle(&self) -> Duration {
        self.settle
    }

    pub fn phase_at(&self, progress: f64) -> Phase {
        if progress < STEADY_END {
            Phase::Steady
        } else if progress < RAMP_END {
            Phase::Ramp
        } else if progress < 1.0 {
            Phase::Landing
        } else {
            Phase::Done
        }
    }

    /// Delay before the next tick, in milliseconds
    pub fn interval_ms_at(&self, progress: f64) -> f64 {
        match self.phase_at(progress) {
            Phase::Steady => STEADY_INTERVAL_MS,
            Phase::Ramp => RAMP_BASE_MS + (progress - STEADY_END) * RAMP_SLOPE_MS,
            Phase::Landing | Phase::Done => {
                LANDING_BASE_MS + (progress - RAMP_END) * LANDING_SLOPE_MS
            }
        }
    }

    pub fn interval_at(&self, progress: f64) -> Duration {
        let micros = (self.interval_ms_at(progress).max(0.0) * 1000.0).round();
        Duration::from_micros(micros as u64)
    }
}

impl Default for PhaseTable {
    fn default() -> Self {
        Self::new(SPIN_DURATION, SETTLE_DELAY)
    }
}

/// Start time and length of one spin
#[derive(Debug, Clone, Copy)]
pub struct PhaseClock {
    started_at: Duration,
    total: Duration,
}

impl PhaseClock {
    pub fn new(started_at: Duration, total: Duration) -> Self {
        Self { started_at, total }
    }

    pub fn elapsed(&self, now: Duration) -> Duration {
        now.saturating_sub(self.started_at)
    }

    pub fn progress(&self, now: Duration) -> f64 {
        self.elapsed(now).as_secs_f64() / self.total.as_secs_f64()
    }

    pub fn is_spent(&self, now: Duration) -> bool {
        self.elapsed(now) >= self.total
    }
}

/// What the caller should do after a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouletteStep {
    /// Call `step` again at this time
    Wait(Duration),
    /// The reveal is over; reported once per animation
    Settled(u8),
    /// Nothing left to do
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Spinning,
    Settling,
    Finished,
}

pub struct RouletteAnimator {
    target: u8,
    clock: PhaseClock,
    table: PhaseTable,
    status: Status,
    ticks: u32,
}

impl RouletteAnimator {
    pub fn start(target: u8, now: Duration, table: PhaseTable) -> Self {
        Self {
            target,
            clock: PhaseClock::new(now, table.spin()),
            table,
            status: Status::Spinning,
            ticks: 0,
        }
    }

    pub fn target(&self) -> u8 {
        self.target
    }

    /// Decoys shown so far
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    pub fn is_finished(&self) -> bool {
        self.status == Status::Finished
    }

    /// Advance the animation.
    ///
    /// `drawn` is the set of already called numbers; decoys come from its
    /// complement, which still contains the target.
    pub fn step(
        &mut self,
        now: Duration,
        drawn: &DrawnSet,
        range: GameRange,
        rng: &mut dyn NumberSource,
        stage: &mut dyn Stage,
        cues: &dyn CuePlayer,
    ) -> RouletteStep {
        match self.status {
            Status::Spinning if !self.clock.is_spent(now) => {
                let progress = self.clock.progress(now);
                let interval = self.table.interval_at(progress);

                let decoy = drawn.pick_undrawn(range, rng).unwrap_or(self.target);
                let hue = rng.next_f64_range(0.0, 360.0);
                let (low, high) = TICK_FREQUENCY_RANGE;
                let frequency = rng.next_f64_range(low, high);

                stage.show_decoy(decoy, hue);
                cues.play(Cue::Tick {
                    frequency_hz: frequency as f32,
                });
                self.ticks += 1;
                debug!(
                    decoy,
                    progress,
                    interval_ms = interval.as_millis() as u64,
                    "roulette tick"
                );

                RouletteStep::Wait(now + interval)
            }
            Status::Spinning => {
                stage.show_final(self.target);
                self.status = Status::Settling;
                debug!(target = self.target, ticks = self.ticks, "roulette landed");
                RouletteStep::Wait(now + self.table.settle())
            }
            Status::Settling => {
                stage.clear_final_highlight();
                self.status = Status::Finished;
                RouletteStep::Settled(self.target)
            }
            Status::Finished => RouletteStep::Finished,
        }
    }
}
