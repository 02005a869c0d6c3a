use std::thread;
use std::time::Duration;

use rand::Rng;

/// Produces the randomized pauses that pace every externally visible action.
///
/// The ranges are part of the behavioral contract, not tuning constants:
/// every click, keystroke, scroll and navigation is followed by a uniformly
/// random pause so the cadence never settles into a fixed rhythm.
#[derive(Debug, Clone)]
pub struct Pacer {
    scale: f64,
}

impl Pacer {
    pub fn new() -> Self {
        Self { scale: 1.0 }
    }

    /// Pacer with all sleeps multiplied by `scale`.
    pub fn scaled(scale: f64) -> Self {
        Self { scale: scale.max(0.0) }
    }

    /// Pacer that never sleeps (tests).
    pub fn instant() -> Self {
        Self { scale: 0.0 }
    }

    /// Sleep for a uniformly random duration between `min_s` and `max_s` seconds.
    pub fn pause(&self, min_s: f64, max_s: f64) {
        let secs = rand::thread_rng().gen_range(min_s..=max_s) * self.scale;
        if secs > 0.0 {
            thread::sleep(Duration::from_secs_f64(secs));
        }
    }

    /// Gap between two simulated keystrokes.
    pub fn keystroke_gap(&self) {
        self.pause(0.05, 0.15);
    }

    /// Long cooldown injected between page batches.
    pub fn long_pause(&self) {
        self.pause(200.0, 500.0);
    }
}

impl Default for Pacer {
    fn default() -> Self {
        Self::new()
    }
}

/// Counts down pages until the next long cooldown is due.
///
/// The interval is re-rolled from 2..=6 after every cooldown so the cadence
/// itself stays irregular.
#[derive(Debug)]
pub struct Cooldown {
    remaining: u32,
}

impl Cooldown {
    pub fn new() -> Self {
        Self { remaining: roll_interval() }
    }

    /// Advance by one page. Returns true when a cooldown is due.
    pub fn tick(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.remaining = roll_interval();
            true
        } else {
            false
        }
    }
}

impl Default for Cooldown {
    fn default() -> Self {
        Self::new()
    }
}

fn roll_interval() -> u32 {
    rand::thread_rng().gen_range(2..=6)
}
