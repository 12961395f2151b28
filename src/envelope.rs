//! Breakpoint amplitude envelopes for the sound cues
//!
//! An envelope starts at a level and moves through breakpoints, each reached
//! by a linear or exponential ramp. Exponential ramps follow
//! `v0 * (v1 / v0)^((t - t0) / (t1 - t0))`; a ramp whose endpoints are zero or
//! of opposite sign holds its start level. After the last breakpoint the
//! envelope holds the final level.

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ramp {
    Linear,
    Exponential,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Breakpoint {
    /// Seconds from envelope start
    time: f32,
    level: f32,
    ramp: Ramp,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    start_level: f32,
    points: Vec<Breakpoint>,
}

impl Envelope {
    pub fn starting_at(level: f32) -> Self {
        Self {
            start_level: level,
            points: Vec::new(),
        }
    }

    /// Linear ramp reaching `level` at `time` seconds
    pub fn linear_to(self, level: f32, time: f32) -> Self {
        self.push(level, time, Ramp::Linear)
    }

    /// Exponential ramp reaching `level` at `time` seconds
    pub fn exponential_to(self, level: f32, time: f32) -> Self {
        self.push(level, time, Ramp::Exponential)
    }

    fn push(mut self, level: f32, time: f32, ramp: Ramp) -> Self {
        // Breakpoints never go back in time
        let time = time.max(self.duration());
        self.points.push(Breakpoint { time, level, ramp });
        self
    }

    /// Time of the last breakpoint
    pub fn duration(&self) -> f32 {
        self.points.last().map_or(0.0, |p| p.time)
    }

    pub fn level_at(&self, t: f32) -> f32 {
        let mut prev_time = 0.0;
        let mut prev_level = self.start_level;

        for point in &self.points {
            if t < point.time {
                let span = point.time - prev_time;
                if span <= 0.0 {
                    return point.level;
                }
                let frac = ((t - prev_time) / span).clamp(0.0, 1.0);
                return match point.ramp {
                    Ramp::Linear => prev_level + (point.level - prev_level) * frac,
                    Ramp::Exponential => {
                        if prev_level * point.level <= 0.0 {
                            prev_level
                        } else {
                            prev_level * (point.level / prev_level).powf(frac)
                        }
                    }
                };
            }
            prev_time = point.time;
            prev_level = point.level;
        }

        prev_level
    }

    /// Sample the envelope `len` times at `sample_rate`
    pub fn render(&self, sample_rate: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| self.level_at(i as f32 / sample_rate))
            .collect()
    }
}
