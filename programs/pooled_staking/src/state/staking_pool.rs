use anchor_lang::prelude::*;

use crate::error::StakingError;
use crate::math::reward_per_share_increase;

/// Aggregate ledger of the pool.
/// PDA: ["staking_pool"]
///
/// Also the authority of the pool vault, so every vault-signed transfer
/// uses this account's seeds.
#[account]
#[derive(Default)]
pub struct StakingPool {
    /// Sum of every position's principal
    pub total_staked: u64,

    /// Accumulated reward per staked unit, scaled by REWARD_PRECISION.
    /// Never decreases.
    pub reward_per_share: u128,

    /// Number of positions with non-zero principal
    pub total_stakers: u64,

    pub last_update: i64,

    /// Monotonic counter handing out operation ids
    pub operation_count: u64,

    /// Rewards paid out through claims and unstakes (lifetime)
    pub total_rewards_claimed: u64,

    /// Fees taken on stake and unstake (lifetime)
    pub total_fees_collected: u64,

    pub bump: u8,
}

impl StakingPool {
    pub const LEN: usize = 8 + // discriminator
        8 + // total_staked
        16 + // reward_per_share
        8 + // total_stakers
        8 + // last_update
        8 + // operation_count
        8 + // total_rewards_claimed
        8 + // total_fees_collected
        1; // bump

    /// Hand out the id for the operation being executed.
    pub fn next_operation_id(&mut self) -> Result<u64> {
        self.operation_count = self
            .operation_count
            .checked_add(1)
            .ok_or(StakingError::MathOverflow)?;
        Ok(self.operation_count)
    }

    /// Spread `reward` over the current `total_staked`.
    ///
    /// Returns `false` without touching the accumulator when nothing is
    /// staked; the caller decides where the undistributed reward goes.
    pub fn accumulate(&mut self, reward: u64) -> Result<bool> {
        if reward == 0 {
            return Ok(true);
        }
        if self.total_staked == 0 {
            return Ok(false);
        }

        let before = self.reward_per_share;
        let increase = reward_per_share_increase(reward, self.total_staked)?;
        let after = before
            .checked_add(increase)
            .ok_or(StakingError::MathOverflow)?;
        require!(after >= before, StakingError::RewardPerShareInvariantViolation);

        self.reward_per_share = after;
        Ok(true)
    }

    pub fn add_principal(&mut self, amount: u64) -> Result<()> {
        self.total_staked = self
            .total_staked
            .checked_add(amount)
            .ok_or(StakingError::MathOverflow)?;
        Ok(())
    }

    pub fn remove_principal(&mut self, amount: u64) -> Result<()> {
        self.total_staked = self
            .total_staked
            .checked_sub(amount)
            .ok_or(StakingError::TotalStakedInvariantViolation)?;
        Ok(())
    }

    pub fn staker_joined(&mut self) -> Result<()> {
        self.total_stakers = self
            .total_stakers
            .checked_add(1)
            .ok_or(StakingError::MathOverflow)?;
        Ok(())
    }

    pub fn staker_left(&mut self) -> Result<()> {
        self.total_stakers = self
            .total_stakers
            .checked_sub(1)
            .ok_or(StakingError::StakerCountInvariantViolation)?;
        Ok(())
    }

    pub fn record_fees(&mut self, total_fee: u64) -> Result<()> {
        self.total_fees_collected = self
            .total_fees_collected
            .checked_add(total_fee)
            .ok_or(StakingError::MathOverflow)?;
        Ok(())
    }

    pub fn record_rewards_paid(&mut self, amount: u64) -> Result<()> {
        self.total_rewards_claimed = self
            .total_rewards_claimed
            .checked_add(amount)
            .ok_or(StakingError::MathOverflow)?;
        Ok(())
    }
}
