//! ProgressionManager - experience, breakthroughs, recovery and encounter conclusion

mod breakthrough;
mod conclude;
mod leveling;
mod recovery;

pub use breakthrough::{
    attempt_breakthrough, breakthrough_rate, can_breakthrough, BreakthroughOutcome,
    BreakthroughReport,
};
pub use conclude::{conclude_encounter, Conclusion};
pub use leveling::{exp_cap, gain_exp};
pub use recovery::{cultivate, heal_injury, meditate, retreat};
