//! Instruction handlers for the Pooled Staking program.
//!
//! Each handler validates accounts, runs the matching `ledger` operation,
//! moves tokens and emits events.

pub mod admin;
pub mod claim_rewards;
pub mod distribute_bonus;
pub mod distribute_referral;
pub mod initialize;
pub mod stake;
pub mod unstake;

pub use admin::*;
pub use claim_rewards::*;
pub use distribute_bonus::*;
pub use distribute_referral::*;
pub use initialize::*;
pub use stake::*;
pub use unstake::*;
