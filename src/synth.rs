//! Offline synthesis of the four sound cues
//!
//! Each cue is an oscillator shaped by an `Envelope`, rendered into a mono
//! buffer at the output device's sample rate. The drum roll also passes
//! through a low-pass biquad.

use crate::envelope::Envelope;
use biquad::{Biquad, Coefficients, DirectForm2Transposed, ToHertz};
use std::f32::consts::PI;
use tracing::debug;

/// Fanfare pitches: C5, E5, G5, C6
pub const FANFARE_NOTES: [f32; 4] = [523.25, 659.25, 783.99, 1046.5];

/// Delay between fanfare notes, seconds
pub const FANFARE_STAGGER: f32 = 0.1;

pub const CLICK_FREQUENCY: f32 = 1000.0;
pub const DRUM_ROLL_FREQUENCY: f32 = 100.0;
pub const DRUM_ROLL_CUTOFF: f32 = 1000.0;

/// Pitch used when exporting a representative tick
pub const DEFAULT_TICK_FREQUENCY: f32 = 800.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
}

impl Waveform {
    /// Value at `phase` in `[0, 1)`
    pub fn sample(&self, phase: f32) -> f32 {
        match self {
            Waveform::Sine => (2.0 * PI * phase).sin(),
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sawtooth => 2.0 * phase - 1.0,
        }
    }
}

pub fn tick_envelope() -> Envelope {
    Envelope::starting_at(0.1).exponential_to(0.01, 0.05)
}

pub fn click_envelope() -> Envelope {
    Envelope::starting_at(0.3).exponential_to(0.01, 0.1)
}

pub fn drum_roll_envelope() -> Envelope {
    Envelope::starting_at(0.0)
        .linear_to(0.05, 0.5)
        .linear_to(0.1, 2.5)
        .linear_to(0.0, 3.0)
}

pub fn fanfare_note_envelope() -> Envelope {
    Envelope::starting_at(0.0)
        .linear_to(0.2, 0.02)
        .exponential_to(0.01, 0.3)
}

/// Oscillator at `frequency` multiplied by `envelope`, as long as the envelope
pub fn shaped_tone(
    waveform: Waveform,
    frequency: f32,
    envelope: &Envelope,
    sample_rate: f32,
) -> Vec<f32> {
    let len = (envelope.duration() * sample_rate).round() as usize;
    let step = frequency / sample_rate;
    let mut phase = 0.0f32;
    let mut buffer = Vec::with_capacity(len);

    for i in 0..len {
        let t = i as f32 / sample_rate;
        buffer.push(waveform.sample(phase) * envelope.level_at(t));
        phase = (phase + step).fract();
    }
    buffer
}

/// Short sine blip at `frequency`
pub fn render_tick(frequency: f32, sample_rate: f32) -> Vec<f32> {
    shaped_tone(Waveform::Sine, frequency, &tick_envelope(), sample_rate)
}

pub fn render_button_click(sample_rate: f32) -> Vec<f32> {
    shaped_tone(Waveform::Sine, CLICK_FREQUENCY, &click_envelope(), sample_rate)
}

/// Three-second filtered sawtooth swell
pub fn render_drum_roll(sample_rate: f32) -> Vec<f32> {
    let mut buffer = shaped_tone(
        Waveform::Sawtooth,
        DRUM_ROLL_FREQUENCY,
        &drum_roll_envelope(),
        sample_rate,
    );

    match Coefficients::<f32>::from_params(
        biquad::Type::LowPass,
        sample_rate.hz(),
        DRUM_ROLL_CUTOFF.hz(),
        1.0,
    ) {
        Ok(coeffs) => {
            let mut filter = DirectForm2Transposed::<f32>::new(coeffs);
            for sample in buffer.iter_mut() {
                *sample = filter.run(*sample);
            }
        }
        Err(e) => debug!("Drum roll filter skipped at {} Hz: {:?}", sample_rate, e),
    }

    buffer
}

/// Four square-wave notes, staggered, mixed into one buffer
pub fn render_fanfare(sample_rate: f32) -> Vec<f32> {
    let envelope = fanfare_note_envelope();
    let last_start = FANFARE_STAGGER * (FANFARE_NOTES.len() - 1) as f32;
    let total = ((last_start + envelope.duration()) * sample_rate).round() as usize;
    let mut mix = vec![0.0f32; total];

    for (index, &freq) in FANFARE_NOTES.iter().enumerate() {
        let offset = (index as f32 * FANFARE_STAGGER * sample_rate).round() as usize;
        let note = shaped_tone(Waveform::Square, freq, &envelope, sample_rate);
        for (slot, sample) in mix.iter_mut().skip(offset).zip(note) {
            *slot += sample;
        }
    }
    mix
}
