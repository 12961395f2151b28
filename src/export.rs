//! Write the sound cues to WAV files

use crate::synth;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Render all four cues into `dir`, returning the files written
pub fn export_cues(dir: &Path, sample_rate: u32) -> Result<Vec<PathBuf>, String> {
    fs::create_dir_all(dir)
        .map_err(|e| format!("Failed to create {}: {e}", dir.display()))?;

    let rate = sample_rate as f32;
    let cues = [
        ("tick.wav", synth::render_tick(synth::DEFAULT_TICK_FREQUENCY, rate)),
        ("drum_roll.wav", synth::render_drum_roll(rate)),
        ("fanfare.wav", synth::render_fanfare(rate)),
        ("button_click.wav", synth::render_button_click(rate)),
    ];

    let mut written = Vec::with_capacity(cues.len());
    for (name, samples) in cues {
        let path = dir.join(name);
        write_wav(&path, &samples, sample_rate)?;
        info!("Wrote {} ({} samples)", path.display(), samples.len());
        written.push(path);
    }
    Ok(written)
}

/// 16-bit mono WAV
pub fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) -> Result<(), String> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)
        .map_err(|e| format!("Failed to create WAV file: {e}"))?;

    for &sample in samples {
        let scaled = (sample.clamp(-1.0, 1.0) * 32767.0) as i16;
        writer
            .write_sample(scaled)
            .map_err(|e| format!("Failed to write sample: {e}"))?;
    }

    writer
        .finalize()
        .map_err(|e| format!("Failed to finalize WAV: {e}"))?;

    Ok(())
}
