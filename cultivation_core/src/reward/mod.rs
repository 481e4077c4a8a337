//! Encounter rewards: pending yields rolled at spawn, final payout at conclusion

mod calculator;

pub use calculator::{
    finalize, level_overshoot_multiplier, realm_gap_multiplier, roll_pending, FinalRewards,
    PendingRewards, RewardContext,
};
