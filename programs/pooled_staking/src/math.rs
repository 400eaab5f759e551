//! Checked integer helpers shared by the fee split and the reward accumulator.
//!
//! Every intermediate product is widened to `u128` and every operation is
//! checked, so no computation can wrap or silently truncate.

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::StakingError;

/// Basis-point share of an amount, floor-divided.
///
/// `bps_of(1_000, 500) == 50`
pub fn bps_of(amount: u64, bps: u64) -> Result<u64> {
    let scaled = (amount as u128)
        .checked_mul(bps as u128)
        .ok_or(StakingError::MathOverflow)?;
    let share = scaled
        .checked_div(BASIS_POINTS_DENOMINATOR as u128)
        .ok_or(StakingError::DivisionByZero)?;
    to_u64(share)
}

/// Accumulator increase for distributing `reward` across `total_staked` units.
///
/// `increase = reward * REWARD_PRECISION / total_staked`
pub fn reward_per_share_increase(reward: u64, total_staked: u64) -> Result<u128> {
    require!(total_staked > 0, StakingError::DivisionByZero);
    let scaled = (reward as u128)
        .checked_mul(REWARD_PRECISION)
        .ok_or(StakingError::MathOverflow)?;
    scaled
        .checked_div(total_staked as u128)
        .ok_or(StakingError::DivisionByZero.into())
}

/// Reward accrued by `principal` at accumulator value `reward_per_share`.
///
/// `accrued = principal * reward_per_share / REWARD_PRECISION`
pub fn accrued_reward(principal: u64, reward_per_share: u128) -> Result<u128> {
    let scaled = (principal as u128)
        .checked_mul(reward_per_share)
        .ok_or(StakingError::MathOverflow)?;
    Ok(scaled / REWARD_PRECISION)
}

/// Narrow a `u128` back to `u64`.
pub fn to_u64(value: u128) -> Result<u64> {
    u64::try_from(value).map_err(|_| StakingError::ConversionOverflow.into())
}
