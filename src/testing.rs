//! Test doubles for the draw engine's collaborators
//!
//! Provides a stage and a cue player that record every call, and a number
//! source that replays a fixed script, so draw cycles can be checked without
//! a terminal, an audio device or real randomness.

use crate::rng::NumberSource;
use crate::stage::{Notice, Stage};
use crate::tone::{Cue, CuePlayer};
use std::cell::RefCell;

/// Replays scripted values in a loop.
///
/// Integer values are folded into the requested range with `%`, so an index
/// script works for any pool size. An empty script yields the range minimum
/// and `0.0`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    ints: Vec<u32>,
    floats: Vec<f64>,
    int_pos: usize,
    float_pos: usize,
}

impl ScriptedSource {
    pub fn new(ints: Vec<u32>, floats: Vec<f64>) -> Self {
        Self {
            ints,
            floats,
            int_pos: 0,
            float_pos: 0,
        }
    }
}

impl NumberSource for ScriptedSource {
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        if self.ints.is_empty() || max <= min {
            return min;
        }
        let value = self.ints[self.int_pos % self.ints.len()];
        self.int_pos += 1;
        min + value % (max - min + 1)
    }

    fn next_f64(&mut self) -> f64 {
        if self.floats.is_empty() {
            return 0.0;
        }
        let value = self.floats[self.float_pos % self.floats.len()];
        self.float_pos += 1;
        value.clamp(0.0, 0.999_999)
    }
}

/// Cue player that remembers what it was asked to play
#[derive(Debug, Default)]
pub struct RecordingCues {
    played: RefCell<Vec<Cue>>,
}

impl RecordingCues {
    pub fn cues(&self) -> Vec<Cue> {
        self.played.borrow().clone()
    }

    /// Tick pitches in play order
    pub fn ticks(&self) -> Vec<f32> {
        self.played
            .borrow()
            .iter()
            .filter_map(|cue| match cue {
                Cue::Tick { frequency_hz } => Some(*frequency_hz),
                _ => None,
            })
            .collect()
    }

    /// Played cues other than ticks
    pub fn events(&self) -> Vec<Cue> {
        self.played
            .borrow()
            .iter()
            .filter(|cue| !matches!(cue, Cue::Tick { .. }))
            .copied()
            .collect()
    }

    pub fn clear(&self) {
        self.played.borrow_mut().clear();
    }
}

impl CuePlayer for RecordingCues {
    fn play(&self, cue: Cue) {
        self.played.borrow_mut().push(cue);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StageCall {
    ShowDecoy { number: u8, hue: f64 },
    ShowFinal(u8),
    ClearFinalHighlight,
    TriggerEnabled(bool),
    MarkDrawn(u8),
    Celebrate(u8),
    Notify(Notice),
    ResetBoard,
}

/// Stage that records every call in order
#[derive(Debug, Default)]
pub struct RecordingStage {
    calls: Vec<StageCall>,
}

impl RecordingStage {
    pub fn calls(&self) -> &[StageCall] {
        &self.calls
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                StageCall::Notify(notice) => Some(*notice),
                _ => None,
            })
            .collect()
    }

    pub fn decoys(&self) -> Vec<u8> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                StageCall::ShowDecoy { number, .. } => Some(*number),
                _ => None,
            })
            .collect()
    }

    /// Last value passed to `set_trigger_enabled`, true if never called
    pub fn trigger_enabled(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|call| match call {
                StageCall::TriggerEnabled(enabled) => Some(*enabled),
                _ => None,
            })
            .unwrap_or(true)
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Stage for RecordingStage {
    fn show_decoy(&mut self, number: u8, hue: f64) {
        self.calls.push(StageCall::ShowDecoy { number, hue });
    }

    fn show_final(&mut self, number: u8) {
        self.calls.push(StageCall::ShowFinal(number));
    }

    fn clear_final_highlight(&mut self) {
        self.calls.push(StageCall::ClearFinalHighlight);
    }

    fn set_trigger_enabled(&mut self, enabled: bool) {
        self.calls.push(StageCall::TriggerEnabled(enabled));
    }

    fn mark_drawn(&mut self, number: u8) {
        self.calls.push(StageCall::MarkDrawn(number));
    }

    fn celebrate(&mut self, number: u8) {
        self.calls.push(StageCall::Celebrate(number));
    }

    fn notify(&mut self, notice: Notice) {
        self.calls.push(StageCall::Notify(notice));
    }

    fn reset_board(&mut self) {
        self.calls.push(StageCall::ResetBoard);
    }
}
