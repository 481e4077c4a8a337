//! Random rolls
//!
//! Every probabilistic engine function takes `rng: &mut impl Rng`; these
//! helpers keep the rolls uniform so a seeded source replays a run exactly.

use rand::Rng;

/// Uniform roll in `[0, 100)`
pub fn roll_percent(rng: &mut impl Rng) -> f64 {
    rng.gen::<f64>() * 100.0
}

/// True with probability `p` (values outside `[0, 1]` saturate)
pub fn chance(rng: &mut impl Rng, p: f64) -> bool {
    rng.gen::<f64>() < p
}

/// Uniform factor in `[1 - spread, 1 + spread)`
pub fn variance(rng: &mut impl Rng, spread: f64) -> f64 {
    1.0 - spread + rng.gen::<f64>() * spread * 2.0
}
