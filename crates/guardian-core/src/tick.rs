use rand::rngs::StdRng;
use rand::SeedableRng;

/// Per-tick timing handed to every update and think call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    pub tick: u64,
    pub dt_seconds: f32,
    /// Simulation seconds elapsed before this tick.
    pub elapsed_seconds: f64,
    pub seed: u64,
}

impl TickContext {
    pub fn new(tick: u64, tick_rate: u32, seed: u64) -> Self {
        let rate = tick_rate.max(1);
        Self {
            tick,
            dt_seconds: 1.0 / rate as f32,
            elapsed_seconds: tick as f64 / rate as f64,
            seed,
        }
    }

    /// Whether this tick lands on a `period`-tick boundary (tick 0 included).
    pub fn every(&self, period: u64) -> bool {
        period != 0 && self.tick % period == 0
    }
}

pub fn mix64(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xBF58476D1CE4E5B9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94D049BB133111EB);
    x ^ (x >> 31)
}

/// Independent seed for a named stream of a session (map layout, resource spawns, ...).
pub fn derive_seed(session_seed: u64, stream: u64) -> u64 {
    mix64(session_seed ^ mix64(stream.wrapping_add(0x9E3779B97F4A7C15)))
}

pub fn stream_rng(session_seed: u64, stream: u64) -> StdRng {
    StdRng::seed_from_u64(derive_seed(session_seed, stream))
}
