//! Real-time audio output using cpal
//! Works with JACK, ALSA, CoreAudio, WASAPI, etc.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tracing::{error, info};

/// Output stream plus the mixer feeding it
pub struct AudioEngine {
    sample_rate: u32,
    mixer: Arc<Mutex<Mixer>>,
    _stream: cpal::Stream,
}

pub(crate) struct Mixer {
    voices: Vec<Voice>,
    pending: VecDeque<Vec<f32>>,
    gain: f32,
}

struct Voice {
    samples: Vec<f32>,
    position: usize,
    active: bool,
}

impl AudioEngine {
    /// Open the default output device and start streaming silence
    pub fn new(gain: f32) -> Result<Self, Box<dyn std::error::Error>> {
        let host = cpal::default_host();
        info!("Audio host: {:?}", host.id());

        let device = host
            .default_output_device()
            .ok_or("No audio output device found")?;
        info!("Audio device: {}", device.name()?);

        let config = device.default_output_config()?;
        info!("Audio config: {:?}", config);

        let sample_rate = config.sample_rate().0;
        let channels = config.channels() as usize;

        let mixer = Arc::new(Mutex::new(Mixer::new(gain)));
        let mixer_clone = mixer.clone();

        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => {
                Self::build_stream::<f32>(&device, &config.into(), mixer_clone, channels)
            }
            cpal::SampleFormat::I16 => {
                Self::build_stream::<i16>(&device, &config.into(), mixer_clone, channels)
            }
            cpal::SampleFormat::U16 => {
                Self::build_stream::<u16>(&device, &config.into(), mixer_clone, channels)
            }
            _ => return Err("Unsupported sample format".into()),
        }?;

        stream.play()?;
        info!("Audio stream started at {} Hz", sample_rate);

        Ok(Self {
            sample_rate,
            mixer,
            _stream: stream,
        })
    }

    fn build_stream<T>(
        device: &cpal::Device,
        config: &cpal::StreamConfig,
        mixer: Arc<Mutex<Mixer>>,
        channels: usize,
    ) -> Result<cpal::Stream, Box<dyn std::error::Error>>
    where
        T: cpal::SizedSample + cpal::FromSample<f32>,
    {
        let stream = device.build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| match mixer.lock() {
                Ok(mut mixer) => mixer.process_audio(data, channels),
                Err(_) => data
                    .iter_mut()
                    .for_each(|sample| *sample = T::from_sample(0.0)),
            },
            |err| error!("Audio stream error: {}", err),
            None,
        )?;

        Ok(stream)
    }

    /// Queue a mono buffer; it starts on the next device callback
    pub fn play(&self, samples: Vec<f32>) {
        if let Ok(mut mixer) = self.mixer.lock() {
            mixer.queue(samples);
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

impl Mixer {
    pub(crate) fn new(gain: f32) -> Self {
        Self {
            voices: Vec::new(),
            pending: VecDeque::new(),
            gain,
        }
    }

    pub(crate) fn queue(&mut self, samples: Vec<f32>) {
        self.pending.push_back(samples);
    }

    #[cfg(test)]
    pub(crate) fn active_voices(&self) -> usize {
        self.voices.iter().filter(|v| v.active).count()
    }

    pub(crate) fn process_audio<T>(&mut self, output: &mut [T], channels: usize)
    where
        T: cpal::SizedSample + cpal::FromSample<f32>,
    {
        // Start pending cues, reusing finished voices
        while let Some(samples) = self.pending.pop_front() {
            match self.voices.iter_mut().find(|v| !v.active) {
                Some(voice) => {
                    voice.samples = samples;
                    voice.position = 0;
                    voice.active = true;
                }
                None => self.voices.push(Voice {
                    samples,
                    position: 0,
                    active: true,
                }),
            }
        }

        for frame in output.chunks_mut(channels.max(1)) {
            let mut mixed = 0.0f32;

            for voice in &mut self.voices {
                if !voice.active {
                    continue;
                }
                match voice.samples.get(voice.position) {
                    Some(sample) => {
                        mixed += sample;
                        voice.position += 1;
                    }
                    None => voice.active = false,
                }
            }

            // Soft clipping so overlapping cues never wrap
            mixed = (mixed * self.gain).tanh();

            for channel in frame.iter_mut() {
                *channel = T::from_sample(mixed);
            }
        }
    }
}
