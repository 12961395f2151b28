//! Decorative particles: confetti bursts and the falling-logo backdrop
//!
//! Pure data with spawn times; the UI asks each particle where it is at the
//! current time. Nothing here affects the game.

use crate::rng::NumberSource;
use std::time::Duration;

pub const CONFETTI_COLORS: [(u8, u8, u8); 6] = [
    (0xFF, 0x6B, 0x6B),
    (0x4E, 0xCD, 0xC4),
    (0x45, 0xB7, 0xD1),
    (0xFF, 0xA0, 0x7A),
    (0x98, 0xD8, 0xC8),
    (0x6C, 0x5C, 0xE7),
];

pub const CONFETTI_PIECES: usize = 30;
pub const CONFETTI_LIFETIME: Duration = Duration::from_secs(2);

pub const INITIAL_LOGOS: usize = 10;
pub const INITIAL_LOGO_STAGGER: Duration = Duration::from_millis(500);
pub const LOGO_INTERVAL: Duration = Duration::from_secs(3);
pub const LOGO_LIFETIME: Duration = Duration::from_secs(20);

/// Fraction of a fall completed at `now`, `None` before it starts or after it ends
fn fall_progress(now: Duration, start: Duration, fall: Duration) -> Option<f64> {
    if now < start {
        return None;
    }
    let progress = (now - start).as_secs_f64() / fall.as_secs_f64().max(f64::EPSILON);
    (progress <= 1.0).then_some(progress)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfettiPiece {
    /// Horizontal position, 0.0 (left) to 1.0 (right)
    pub left: f64,
    pub color: (u8, u8, u8),
    pub delay: Duration,
    pub fall: Duration,
    pub spawned_at: Duration,
}

impl ConfettiPiece {
    /// Vertical position, 0.0 (top) to 1.0 (bottom)
    pub fn position(&self, now: Duration) -> Option<f64> {
        fall_progress(now, self.spawned_at + self.delay, self.fall)
    }

    pub fn is_expired(&self, now: Duration) -> bool {
        now >= self.spawned_at + CONFETTI_LIFETIME
    }
}

/// Thirty pieces with random colour, position, delay (0-0.5 s) and fall (1-2 s)
pub fn confetti_burst(now: Duration, rng: &mut dyn NumberSource) -> Vec<ConfettiPiece> {
    (0..CONFETTI_PIECES)
        .map(|_| {
            let left = rng.next_f64();
            let color_index = rng.next_u32_range(0, CONFETTI_COLORS.len() as u32 - 1) as usize;
            let delay = Duration::from_secs_f64(rng.next_f64_range(0.0, 0.5));
            let fall = Duration::from_secs_f64(rng.next_f64_range(1.0, 2.0));
            ConfettiPiece {
                left,
                color: CONFETTI_COLORS[color_index % CONFETTI_COLORS.len()],
                delay,
                fall,
                spawned_at: now,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoKind {
    Common,
    Uncommon,
    Rare,
}

impl LogoKind {
    /// 90 % common, 5 % uncommon, 5 % rare
    pub fn from_roll(roll: f64) -> Self {
        if roll < 0.9 {
            LogoKind::Common
        } else if roll < 0.95 {
            LogoKind::Uncommon
        } else {
            LogoKind::Rare
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FallingLogo {
    pub kind: LogoKind,
    /// Nominal size, 50-250
    pub size: f64,
    pub left: f64,
    pub fall: Duration,
    pub delay: Duration,
    /// 0.1-0.4
    pub opacity: f64,
    pub spawned_at: Duration,
}

impl FallingLogo {
    fn spawn(at: Duration, rng: &mut dyn NumberSource) -> Self {
        let kind = LogoKind::from_roll(rng.next_f64());
        let size = rng.next_f64_range(50.0, 250.0);
        let left = rng.next_f64();
        let fall = Duration::from_secs_f64(rng.next_f64_range(10.0, 15.0));
        let delay = Duration::from_secs_f64(rng.next_f64_range(0.0, 2.0));
        let opacity = rng.next_f64_range(0.1, 0.4);
        Self {
            kind,
            size,
            left,
            fall,
            delay,
            opacity,
            spawned_at: at,
        }
    }

    pub fn position(&self, now: Duration) -> Option<f64> {
        fall_progress(now, self.spawned_at + self.delay, self.fall)
    }

    pub fn is_expired(&self, now: Duration) -> bool {
        now >= self.spawned_at + LOGO_LIFETIME
    }
}

/// Ten logos staggered at start, then one every few seconds
#[derive(Debug, Clone, Default)]
pub struct Backdrop {
    logos: Vec<FallingLogo>,
    started_at: Option<Duration>,
    initial_spawned: usize,
    next_periodic: Duration,
}

impl Backdrop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn logos(&self) -> &[FallingLogo] {
        &self.logos
    }

    pub fn advance(&mut self, now: Duration, rng: &mut dyn NumberSource) {
        let started_at = *self.started_at.get_or_insert_with(|| {
            self.next_periodic = now + LOGO_INTERVAL;
            now
        });

        while self.initial_spawned < INITIAL_LOGOS {
            let at = started_at + INITIAL_LOGO_STAGGER * self.initial_spawned as u32;
            if at > now {
                break;
            }
            self.logos.push(FallingLogo::spawn(at, rng));
            self.initial_spawned += 1;
        }

        // After a long stall, skip spawns that would already be gone
        if now > self.next_periodic + LOGO_LIFETIME {
            self.next_periodic = now - LOGO_LIFETIME;
        }
        while self.next_periodic <= now {
            self.logos.push(FallingLogo::spawn(self.next_periodic, rng));
            self.next_periodic += LOGO_INTERVAL;
        }

        self.logos.retain(|logo| !logo.is_expired(now));
    }
}
