//! Draw orchestration
//!
//! `DrawOrchestrator` is the only owner of the game state. A trigger picks
//! the outcome up front, hands it to a `RouletteAnimator` for the reveal, and
//! commits it when the animator reports that it has settled. Every delayed
//! step goes through one `TimerQueue`, so the caller only needs to call
//! `poll` whenever `next_deadline` has passed.

use crate::clock::Clock;
use crate::game::{DrawState, GameRange};
use crate::rng::NumberSource;
use crate::roulette::{PhaseTable, RouletteAnimator, RouletteStep};
use crate::stage::{Notice, Stage};
use crate::timers::TimerQueue;
use crate::tone::{Cue, CuePlayer};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Pause between the last number landing and the game-over notice
pub const GAME_COMPLETE_DELAY: Duration = Duration::from_millis(500);

/// Result of pressing the draw control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// A draw is already running; nothing happened
    Ignored,
    /// Every number has been called; the user was told so
    Exhausted,
    /// A draw cycle began and will reveal `target`
    Started { target: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DrawTimer {
    Roulette,
    GameCompleteNotice,
}

pub struct DrawOrchestrator {
    state: DrawState,
    table: PhaseTable,
    animator: Option<RouletteAnimator>,
    timers: TimerQueue<DrawTimer>,
    clock: Box<dyn Clock>,
    rng: Box<dyn NumberSource>,
}

impl DrawOrchestrator {
    pub fn new(table: PhaseTable, clock: Box<dyn Clock>, rng: Box<dyn NumberSource>) -> Self {
        Self {
            state: DrawState::new(GameRange::standard()),
            table,
            animator: None,
            timers: TimerQueue::new(),
            clock,
            rng,
        }
    }

    pub fn state(&self) -> &DrawState {
        &self.state
    }

    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// When `poll` next has work to do
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    /// Leaving now would abandon a game
    pub fn is_in_progress(&self) -> bool {
        self.state.is_drawing() || (!self.state.drawn().is_empty() && !self.state.is_complete())
    }

    /// Start a draw cycle if none is running and numbers remain
    pub fn trigger(&mut self, stage: &mut dyn Stage, cues: &dyn CuePlayer) -> TriggerOutcome {
        if self.state.is_drawing() {
            debug!("Draw already in progress, ignoring trigger");
            return TriggerOutcome::Ignored;
        }

        if self.state.is_complete() {
            info!("Trigger after every number was drawn");
            stage.notify(Notice::AllNumbersDrawn);
            return TriggerOutcome::Exhausted;
        }

        cues.play(Cue::ButtonClick);
        self.state.begin_draw();
        stage.set_trigger_enabled(false);

        let target = match self.state.pick_undrawn(self.rng.as_mut()) {
            Some(target) => target,
            None => {
                warn!("No undrawn number left despite incomplete game");
                self.state.end_draw();
                stage.set_trigger_enabled(true);
                stage.notify(Notice::AllNumbersDrawn);
                return TriggerOutcome::Exhausted;
            }
        };

        cues.play(Cue::DrumRoll);

        let now = self.clock.now();
        self.animator = Some(RouletteAnimator::start(target, now, self.table));
        info!(
            draw = self.state.drawn().len() + 1,
            remaining = self.state.remaining(),
            "Draw started"
        );
        self.advance_roulette(now, stage, cues);

        TriggerOutcome::Started { target }
    }

    /// Fire every timer that is due.
    ///
    /// Returns the number committed during this call, if a draw completed.
    pub fn poll(&mut self, stage: &mut dyn Stage, cues: &dyn CuePlayer) -> Option<u8> {
        let now = self.clock.now();
        let mut committed = None;

        while let Some(timer) = self.timers.pop_due(now) {
            match timer {
                DrawTimer::Roulette => {
                    if let Some(number) = self.advance_roulette(now, stage, cues) {
                        committed = Some(number);
                    }
                }
                DrawTimer::GameCompleteNotice => {
                    info!("Game complete");
                    stage.notify(Notice::GameComplete);
                }
            }
        }

        committed
    }

    /// Start over with an empty board.
    ///
    /// Refused while a draw is running, since a spin cannot be cancelled.
    pub fn new_game(&mut self, stage: &mut dyn Stage) -> bool {
        if self.state.is_drawing() {
            debug!("New game refused during a draw");
            return false;
        }

        self.state = DrawState::new(self.state.range());
        self.animator = None;
        self.timers.clear();
        stage.reset_board();
        stage.set_trigger_enabled(true);
        info!("New game");
        true
    }

    fn advance_roulette(
        &mut self,
        now: Duration,
        stage: &mut dyn Stage,
        cues: &dyn CuePlayer,
    ) -> Option<u8> {
        let animator = self.animator.as_mut()?;
        let step = animator.step(
            now,
            self.state.drawn(),
            self.state.range(),
            self.rng.as_mut(),
            stage,
            cues,
        );

        match step {
            RouletteStep::Wait(due) => {
                self.timers.schedule(due, DrawTimer::Roulette);
                None
            }
            RouletteStep::Settled(number) => {
                self.animator = None;
                self.complete_draw(number, now, stage, cues);
                Some(number)
            }
            RouletteStep::Finished => {
                self.animator = None;
                None
            }
        }
    }

    fn complete_draw(
        &mut self,
        number: u8,
        now: Duration,
        stage: &mut dyn Stage,
        cues: &dyn CuePlayer,
    ) {
        if !self.state.commit(number) {
            warn!(number, "Settled number was already drawn");
        }

        cues.play(Cue::Fanfare);
        stage.mark_drawn(number);
        stage.celebrate(number);

        self.state.end_draw();
        stage.set_trigger_enabled(true);
        info!(
            number,
            drawn = self.state.drawn().len(),
            "Number drawn"
        );

        if self.state.is_complete() {
            self.timers
                .schedule(now + GAME_COMPLETE_DELAY, DrawTimer::GameCompleteNotice);
        }
    }
}
