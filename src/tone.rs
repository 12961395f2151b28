//! Sound cues for draw events
//!
//! `ToneGenerator` plays the four cues through the audio device. When no
//! device can be opened (or audio is disabled) it stays silent and every cue
//! is a no-op, so game logic never depends on sound.

use crate::audio::AudioEngine;
use crate::config::AudioConfig;
use crate::synth;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cue {
    /// One roulette step
    Tick { frequency_hz: f32 },
    /// Swell under the whole spin
    DrumRoll,
    /// Number revealed
    Fanfare,
    /// Draw accepted
    ButtonClick,
}

/// Anything that can sound a cue without blocking the caller
pub trait CuePlayer {
    fn play(&self, cue: Cue);
}

struct Output {
    engine: AudioEngine,
    sample_rate: f32,
    drum_roll: Vec<f32>,
    fanfare: Vec<f32>,
    click: Vec<f32>,
}

pub struct ToneGenerator {
    output: Option<Output>,
    muted: bool,
}

impl ToneGenerator {
    pub fn new(config: &AudioConfig) -> Self {
        if !config.enabled {
            info!("Audio disabled by configuration");
            return Self::silent();
        }

        match AudioEngine::new(config.gain) {
            Ok(engine) => {
                let sample_rate = engine.sample_rate() as f32;
                // Fixed cues are rendered once up front
                let output = Output {
                    drum_roll: synth::render_drum_roll(sample_rate),
                    fanfare: synth::render_fanfare(sample_rate),
                    click: synth::render_button_click(sample_rate),
                    sample_rate,
                    engine,
                };
                Self {
                    output: Some(output),
                    muted: false,
                }
            }
            Err(e) => {
                warn!("Audio unavailable, cues will be silent: {}", e);
                Self::silent()
            }
        }
    }

    /// Generator with no output device
    pub fn silent() -> Self {
        Self {
            output: None,
            muted: false,
        }
    }

    pub fn is_available(&self) -> bool {
        self.output.is_some()
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn tick(&self, frequency_hz: f32) {
        if let Some(output) = self.live_output() {
            let samples = synth::render_tick(frequency_hz, output.sample_rate);
            output.engine.play(samples);
        }
    }

    pub fn drum_roll(&self) {
        if let Some(output) = self.live_output() {
            output.engine.play(output.drum_roll.clone());
        }
    }

    pub fn fanfare(&self) {
        if let Some(output) = self.live_output() {
            output.engine.play(output.fanfare.clone());
        }
    }

    pub fn button_click(&self) {
        if let Some(output) = self.live_output() {
            output.engine.play(output.click.clone());
        }
    }

    fn live_output(&self) -> Option<&Output> {
        if self.muted {
            return None;
        }
        self.output.as_ref()
    }
}

impl CuePlayer for ToneGenerator {
    fn play(&self, cue: Cue) {
        match cue {
            Cue::Tick { frequency_hz } => self.tick(frequency_hz),
            Cue::DrumRoll => self.drum_roll(),
            Cue::Fanfare => self.fanfare(),
            Cue::ButtonClick => self.button_click(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_generator_accepts_every_cue() {
        let mut tones = ToneGenerator::silent();
        assert!(!tones.is_available());
        tones.play(Cue::ButtonClick);
        tones.play(Cue::DrumRoll);
        tones.play(Cue::Tick { frequency_hz: 640.0 });
        tones.play(Cue::Fanfare);

        tones.set_muted(true);
        assert!(tones.is_muted());
        tones.play(Cue::Fanfare);
    }

    #[test]
    fn test_disabled_config_never_opens_device() {
        let config = AudioConfig {
            enabled: false,
            ..AudioConfig::default()
        };
        assert!(!ToneGenerator::new(&config).is_available());
    }
}
