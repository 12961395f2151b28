//! # Bingo Roulette
//!
//! A bingo caller for the terminal. Each draw picks an uncalled number from
//! 1 to 75, spins a decelerating roulette of decoys with tick sounds and a
//! drum roll, lands on the picked number, plays a fanfare and marks the
//! board.
//!
//! ## Architecture
//!
//! - [`draw::DrawOrchestrator`] owns the game state ([`game::DrawState`]),
//!   chooses each number before the spin starts, and commits it once the
//!   reveal has settled.
//! - [`roulette::RouletteAnimator`] paces the reveal from a pure phase table;
//!   it only reads the set of called numbers.
//! - [`timers::TimerQueue`] holds every delayed step, driven by an injected
//!   [`clock::Clock`], so whole draw cycles run in tests without sleeping.
//! - Presentation goes through two fire-and-forget seams:
//!   [`stage::Stage`] (implemented by [`scene::Scene`]) and
//!   [`tone::CuePlayer`] (implemented by [`tone::ToneGenerator`]).
//!
//! ## Headless draw
//!
//! ```rust
//! use bingo_roulette::clock::ManualClock;
//! use bingo_roulette::draw::{DrawOrchestrator, TriggerOutcome};
//! use bingo_roulette::rng::SeededSource;
//! use bingo_roulette::roulette::PhaseTable;
//! use bingo_roulette::testing::{RecordingCues, RecordingStage};
//!
//! let clock = ManualClock::new();
//! let mut game = DrawOrchestrator::new(
//!     PhaseTable::default(),
//!     Box::new(clock.clone()),
//!     Box::new(SeededSource::from_seed(1)),
//! );
//! let mut stage = RecordingStage::default();
//! let cues = RecordingCues::default();
//!
//! let TriggerOutcome::Started { target } = game.trigger(&mut stage, &cues) else {
//!     panic!("fresh game should start a draw");
//! };
//! while let Some(due) = game.next_deadline() {
//!     clock.set(due);
//!     game.poll(&mut stage, &cues);
//! }
//! assert_eq!(game.state().current(), Some(target));
//! ```

pub mod app;
pub mod audio;
pub mod clock;
pub mod config;
pub mod draw;
pub mod effects;
pub mod envelope;
pub mod export;
pub mod game;
pub mod rng;
pub mod roulette;
pub mod scene;
pub mod stage;
pub mod synth;
pub mod testing;
pub mod timers;
pub mod tone;
pub mod ui;
