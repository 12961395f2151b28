//! Terminal view model
//!
//! `Scene` is what the draw engine paints on: it keeps the big number
//! display, the board cells, pending notices and the particles, and the UI
//! renders it each frame.

use crate::effects::{confetti_burst, Backdrop, ConfettiPiece, FallingLogo};
use crate::game::GameRange;
use crate::rng::NumberSource;
use crate::stage::{Notice, Stage};
use std::collections::VecDeque;
use std::time::Duration;

/// How long a freshly drawn cell stays highlighted
pub const CELEBRATION_TIME: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Display {
    /// Nothing drawn yet
    Idle,
    /// Cycling decoys
    Spinning { number: u8, hue: f64 },
    /// Landed, with the transient highlight
    Landed { number: u8 },
    /// Resting on the last drawn number
    Shown { number: u8 },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellView {
    pub drawn: bool,
    pub celebrating_until: Option<Duration>,
}

pub struct Scene {
    range: GameRange,
    now: Duration,
    display: Display,
    cells: Vec<CellView>,
    trigger_enabled: bool,
    notices: VecDeque<Notice>,
    confetti: Vec<ConfettiPiece>,
    backdrop: Option<Backdrop>,
    rng: Box<dyn NumberSource>,
}

impl Scene {
    pub fn new(range: GameRange, backdrop: bool, rng: Box<dyn NumberSource>) -> Self {
        Self {
            range,
            now: Duration::ZERO,
            display: Display::Idle,
            cells: vec![CellView::default(); range.max() as usize],
            trigger_enabled: true,
            notices: VecDeque::new(),
            confetti: Vec::new(),
            backdrop: backdrop.then(Backdrop::new),
            rng,
        }
    }

    /// Move the scene's notion of time forward and expire transient effects
    pub fn advance(&mut self, now: Duration) {
        self.now = self.now.max(now);
        let now = self.now;

        for cell in &mut self.cells {
            if cell.celebrating_until.is_some_and(|until| now >= until) {
                cell.celebrating_until = None;
            }
        }
        self.confetti.retain(|piece| !piece.is_expired(now));
        if let Some(backdrop) = self.backdrop.as_mut() {
            backdrop.advance(now, self.rng.as_mut());
        }
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn range(&self) -> GameRange {
        self.range
    }

    pub fn display(&self) -> Display {
        self.display
    }

    pub fn cell(&self, number: u8) -> Option<CellView> {
        let index = (number as usize).checked_sub(1)?;
        self.cells.get(index).copied()
    }

    pub fn is_drawn(&self, number: u8) -> bool {
        self.cell(number).is_some_and(|cell| cell.drawn)
    }

    pub fn is_celebrating(&self, number: u8) -> bool {
        self.cell(number)
            .is_some_and(|cell| cell.celebrating_until.is_some())
    }

    pub fn drawn_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.drawn).count()
    }

    pub fn trigger_enabled(&self) -> bool {
        self.trigger_enabled
    }

    /// Oldest notice not yet dismissed
    pub fn notice(&self) -> Option<Notice> {
        self.notices.front().copied()
    }

    pub fn dismiss_notice(&mut self) -> Option<Notice> {
        self.notices.pop_front()
    }

    pub fn confetti(&self) -> &[ConfettiPiece] {
        &self.confetti
    }

    pub fn logos(&self) -> &[FallingLogo] {
        match &self.backdrop {
            Some(backdrop) => backdrop.logos(),
            None => &[],
        }
    }

    fn cell_mut(&mut self, number: u8) -> Option<&mut CellView> {
        if !self.range.contains(number) {
            return None;
        }
        self.cells.get_mut(number as usize - 1)
    }
}

impl Stage for Scene {
    fn show_decoy(&mut self, number: u8, hue: f64) {
        self.display = Display::Spinning { number, hue };
    }

    fn show_final(&mut self, number: u8) {
        self.display = Display::Landed { number };
    }

    fn clear_final_highlight(&mut self) {
        if let Display::Landed { number } = self.display {
            self.display = Display::Shown { number };
        }
    }

    fn set_trigger_enabled(&mut self, enabled: bool) {
        self.trigger_enabled = enabled;
    }

    fn mark_drawn(&mut self, number: u8) {
        if let Some(cell) = self.cell_mut(number) {
            cell.drawn = true;
        }
    }

    fn celebrate(&mut self, number: u8) {
        let until = self.now + CELEBRATION_TIME;
        if let Some(cell) = self.cell_mut(number) {
            cell.celebrating_until = Some(until);
        }
        let burst = confetti_burst(self.now, self.rng.as_mut());
        self.confetti.extend(burst);
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push_back(notice);
    }

    fn reset_board(&mut self) {
        self.cells.fill(CellView::default());
        self.display = Display::Idle;
        self.notices.clear();
        self.confetti.clear();
    }
}
