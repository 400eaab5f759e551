//! State structures for the Pooled Staking program.
//!
//! This module defines all account structures used to store program state,
//! together with the pure state transitions the ledger builds on.

pub mod bonus_pool;
pub mod global_config;
pub mod referral_pool;
pub mod staking_pool;
pub mod user_position;

pub use bonus_pool::*;
pub use global_config::*;
pub use referral_pool::*;
pub use staking_pool::*;
pub use user_position::*;
