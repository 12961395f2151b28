//! Renderer collaborator seen by the draw engine
//!
//! Every call is fire-and-forget: the engine never reads anything back from
//! the stage, so the terminal scene and the test recorder are
//! interchangeable.

/// Fixed colour of a settled number (#4CAF50)
pub const FINAL_COLOR: (u8, u8, u8) = (0x4C, 0xAF, 0x50);

/// User-visible messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// A draw was attempted after every number was called
    AllNumbersDrawn,
    /// The last number was just called
    GameComplete,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::AllNumbersDrawn => "All numbers have been drawn!",
            Notice::GameComplete => "Game over! Every number has been drawn!",
        }
    }
}

pub trait Stage {
    /// Show a decoy while spinning, coloured `hsl(hue, 70%, 50%)`
    fn show_decoy(&mut self, number: u8, hue: f64);

    /// Stop spinning and show the drawn number in `FINAL_COLOR`
    fn show_final(&mut self, number: u8);

    /// End the transient highlight on the settled number
    fn clear_final_highlight(&mut self);

    fn set_trigger_enabled(&mut self, enabled: bool);

    fn mark_drawn(&mut self, number: u8);

    /// Briefly highlight the cell and burst confetti
    fn celebrate(&mut self, number: u8);

    fn notify(&mut self, notice: Notice);

    /// Clear every mark for a new game
    fn reset_board(&mut self);
}
