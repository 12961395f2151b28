//! Game state for one bingo session
//!
//! Holds the set of numbers already called, the most recently revealed
//! number and the flag that keeps two draw cycles from overlapping.

use crate::rng::NumberSource;
use std::collections::BTreeSet;

/// Highest number on a standard board
pub const MAX_NUMBER: u8 = 75;

/// Inclusive range of callable numbers, always starting at 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameRange {
    max: u8,
}

impl GameRange {
    /// The fixed `[1, 75]` board
    pub const fn standard() -> Self {
        Self { max: MAX_NUMBER }
    }

    pub fn max(&self) -> u8 {
        self.max
    }

    pub fn contains(&self, number: u8) -> bool {
        (1..=self.max).contains(&number)
    }

    pub fn numbers(&self) -> impl Iterator<Item = u8> {
        1..=self.max
    }
}

impl Default for GameRange {
    fn default() -> Self {
        Self::standard()
    }
}

/// Numbers already called in this game, in ascending order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrawnSet {
    numbers: BTreeSet<u8>,
}

impl DrawnSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, number: u8) -> bool {
        self.numbers.contains(&number)
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.numbers.iter().copied()
    }

    /// Numbers of `range` not yet called
    pub fn undrawn(&self, range: GameRange) -> Vec<u8> {
        range.numbers().filter(|n| !self.contains(*n)).collect()
    }

    /// Uniform pick from the numbers of `range` not yet called
    pub fn pick_undrawn(&self, range: GameRange, rng: &mut dyn NumberSource) -> Option<u8> {
        let pool = self.undrawn(range);
        if pool.is_empty() {
            return None;
        }
        let index = rng.next_u32_range(0, pool.len() as u32 - 1) as usize;
        pool.get(index).copied()
    }

    /// Returns false for duplicates and numbers outside `range`
    fn insert(&mut self, number: u8, range: GameRange) -> bool {
        range.contains(number) && self.numbers.insert(number)
    }
}

/// State owned by the draw orchestrator
#[derive(Debug, Clone, Default)]
pub struct DrawState {
    range: GameRange,
    drawn: DrawnSet,
    current: Option<u8>,
    drawing: bool,
}

impl DrawState {
    pub fn new(range: GameRange) -> Self {
        Self {
            range,
            drawn: DrawnSet::new(),
            current: None,
            drawing: false,
        }
    }

    pub fn range(&self) -> GameRange {
        self.range
    }

    pub fn drawn(&self) -> &DrawnSet {
        &self.drawn
    }

    /// The most recently committed number
    pub fn current(&self) -> Option<u8> {
        self.current
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    /// Every number of the range has been called
    pub fn is_complete(&self) -> bool {
        self.drawn.len() >= self.range.max() as usize
    }

    pub fn remaining(&self) -> usize {
        (self.range.max() as usize).saturating_sub(self.drawn.len())
    }

    pub fn undrawn(&self) -> Vec<u8> {
        self.drawn.undrawn(self.range)
    }

    pub fn pick_undrawn(&self, rng: &mut dyn NumberSource) -> Option<u8> {
        self.drawn.pick_undrawn(self.range, rng)
    }

    pub(crate) fn begin_draw(&mut self) {
        self.drawing = true;
    }

    pub(crate) fn end_draw(&mut self) {
        self.drawing = false;
    }

    /// Record `number` as called and make it current.
    ///
    /// Returns false (and leaves the state alone) if the number was already
    /// called or lies outside the range.
    pub(crate) fn commit(&mut self, number: u8) -> bool {
        if !self.drawn.insert(number, self.range) {
            return false;
        }
        self.current = Some(number);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedSource;

    #[test]
    fn test_standard_range() {
        let range = GameRange::standard();
        assert_eq!(range.max(), 75);
        assert!(range.contains(1));
        assert!(range.contains(75));
        assert!(!range.contains(0));
        assert!(!range.contains(76));
        assert_eq!(range.numbers().count(), 75);
    }

    #[test]
    fn test_commit_rejects_duplicates_and_out_of_range() {
        let mut state = DrawState::new(GameRange::standard());
        assert!(state.commit(12));
        assert!(!state.commit(12));
        assert!(!state.commit(0));
        assert!(!state.commit(76));
        assert_eq!(state.drawn().len(), 1);
        assert_eq!(state.current(), Some(12));
    }

    #[test]
    fn test_pick_undrawn_skips_called_numbers() {
        let mut state = DrawState::new(GameRange::standard());
        for n in 1..=74 {
            state.commit(n);
        }
        // Only 75 is left, whatever the source says
        let mut rng = ScriptedSource::new(vec![0, 40, 73], vec![]);
        assert_eq!(state.pick_undrawn(&mut rng), Some(75));
        assert_eq!(state.remaining(), 1);

        state.commit(75);
        assert!(state.is_complete());
        assert_eq!(state.pick_undrawn(&mut rng), None);
    }

    #[test]
    fn test_pick_undrawn_indexes_into_pool() {
        let mut state = DrawState::new(GameRange::standard());
        state.commit(1);
        state.commit(2);
        // Pool is 3..=75, index 0 maps to 3
        let mut rng = ScriptedSource::new(vec![0, 72], vec![]);
        assert_eq!(state.pick_undrawn(&mut rng), Some(3));
        assert_eq!(state.pick_undrawn(&mut rng), Some(75));
    }
}
