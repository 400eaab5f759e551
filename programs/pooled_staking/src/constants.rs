//! Program constants for the Pooled Staking program.
//!
//! This module defines all constant values used throughout the program,
//! including PDA seeds, fee basis points, countdown periods and precision values.

/// Seed for deriving the global config PDA
pub const GLOBAL_CONFIG_SEED: &[u8] = b"global_config";

/// Seed for deriving the staking pool PDA
pub const STAKING_POOL_SEED: &[u8] = b"staking_pool";

/// Seed for deriving user position PDAs
pub const USER_POSITION_SEED: &[u8] = b"user_position";

/// Seed for deriving the bonus pool PDA
pub const BONUS_POOL_SEED: &[u8] = b"bonus_pool";

/// Seed for deriving the referral pool PDA
pub const REFERRAL_POOL_SEED: &[u8] = b"referral_pool";

/// Seed for deriving the pool vault PDA
pub const POOL_VAULT_SEED: &[u8] = b"pool_vault";

/// Decimals the staking mint must use
pub const TOKEN_DECIMALS: u8 = 9;

/// One whole token in base units
pub const ONE_TOKEN: u64 = 1_000_000_000;

/// Minimum gross stake (0.01 token)
pub const MIN_STAKE: u64 = ONE_TOKEN / 100;

/// Minimum gross unstake (0.01 token)
pub const MIN_UNSTAKE: u64 = ONE_TOKEN / 100;

/// Minimum gross stake that extends the bonus countdown and enters the last-ten ring
pub const MIN_BONUS_QUALIFY: u64 = ONE_TOKEN;

/// Basis points denominator (100% = 10000 basis points)
pub const BASIS_POINTS_DENOMINATOR: u64 = 10_000;

/// Fee routed to existing stakers through the accumulator (7%)
pub const FEE_STAKERS_BPS: u64 = 700;

/// Fee routed to the treasury (1%)
pub const FEE_TREASURY_BPS: u64 = 100;

/// Fee routed to the bonus pool (1%)
pub const FEE_BONUS_BPS: u64 = 100;

/// Fee routed to the referrer, or the referral pool when there is none (0.5%)
pub const FEE_REFERRAL_BPS: u64 = 50;

/// Fee routed to the team wallet (0.5%)
pub const FEE_TEAM_BPS: u64 = 50;

/// Total fee taken on every stake and unstake (10%)
pub const TOTAL_FEE_BPS: u64 = 1_000;

/// Number of seconds in a minute
pub const SECONDS_PER_MINUTE: i64 = 60;

/// Number of seconds in an hour
pub const SECONDS_PER_HOUR: i64 = 3_600;

/// Number of seconds in a day
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Bonus countdown window, also the cap on how far ahead the expiry may sit (12 hours)
pub const BONUS_COUNTDOWN_SECONDS: i64 = 12 * SECONDS_PER_HOUR;

/// Countdown extension per qualifying stake (15 minutes)
pub const BONUS_EXTENSION_SECONDS: i64 = 15 * SECONDS_PER_MINUTE;

/// Bonus pool becomes distributable after this long without a qualifying stake (6 hours)
pub const BONUS_INACTIVITY_LIMIT: i64 = 6 * SECONDS_PER_HOUR;

/// Capacity of the last-ten ring
pub const BONUS_BUFFER_SIZE: usize = 10;

/// Share of the bonus pool paid pro-rata to the last-ten ring (40%)
pub const BONUS_LAST_TEN_BPS: u64 = 4_000;

/// Share of the bonus pool injected into the reward accumulator (40%)
pub const BONUS_STAKERS_BPS: u64 = 4_000;

/// Referral pool distribution period (30 days)
pub const REFERRAL_PERIOD_SECONDS: i64 = 30 * SECONDS_PER_DAY;

/// Share of the referral pool injected into the reward accumulator (50%)
pub const REFERRAL_STAKERS_BPS: u64 = 5_000;

/// Precision multiplier for the reward-per-share accumulator
pub const REWARD_PRECISION: u128 = 1_000_000_000_000; // 10^12
