use anchor_lang::prelude::*;

use crate::error::StakingError;
use crate::math::{accrued_reward, to_u64};

/// One participant's position.
/// PDA: ["user_position", staking_pool, owner]
///
/// Never closed: a zero principal is the inactive state, and the referrer
/// binding survives it.
#[account]
#[derive(Default)]
pub struct UserPosition {
    pub owner: Pubkey,
    pub staking_pool: Pubkey,

    /// Net staked amount (after the entry fee)
    pub principal: u64,

    /// Checkpoint of `principal * reward_per_share / REWARD_PRECISION`
    /// minus whatever is still pending
    pub reward_debt: u128,

    pub first_stake_time: i64,
    pub last_claim_time: i64,

    /// Bound on the first stake, if any; never rebound
    pub referrer: Option<Pubkey>,

    /// Rewards received through claims and unstakes (lifetime)
    pub total_claimed: u64,

    pub bump: u8,
}

impl UserPosition {
    pub const LEN: usize = 8 + 32 + 32 + 8 + 16 + 8 + 8 + (1 + 32) + 8 + 1;

    pub fn is_active(&self) -> bool {
        self.principal > 0
    }

    /// Reward owed to the position at accumulator value `reward_per_share`.
    pub fn pending_reward(&self, reward_per_share: u128) -> Result<u64> {
        let accrued = accrued_reward(self.principal, reward_per_share)?;
        let pending = accrued
            .checked_sub(self.reward_debt)
            .ok_or(StakingError::RewardDebtInvariantViolation)?;
        to_u64(pending)
    }

    /// Zero the pending reward against `reward_per_share`.
    pub fn checkpoint(&mut self, reward_per_share: u128) -> Result<()> {
        self.reward_debt = accrued_reward(self.principal, reward_per_share)?;
        Ok(())
    }

    /// Move to `new_principal` while keeping the reward already pending.
    ///
    /// Only the pending amount is carried; principal added here starts from
    /// `reward_per_share`. Returns the carried amount. A new principal too
    /// small to carry the pending amount is rejected, so withdrawals settle
    /// with [`UserPosition::checkpoint`] after paying the reward out.
    pub fn rebase(&mut self, new_principal: u64, reward_per_share: u128) -> Result<u64> {
        let pending = self.pending_reward(reward_per_share)?;
        let accrued = accrued_reward(new_principal, reward_per_share)?;
        self.reward_debt = accrued
            .checked_sub(pending as u128)
            .ok_or(StakingError::RewardDebtInvariantViolation)?;
        self.principal = new_principal;
        Ok(pending)
    }

    /// Bind `candidate` as referrer if none is bound and it is not the owner.
    pub fn bind_referrer(&mut self, candidate: Option<Pubkey>) -> bool {
        match candidate {
            Some(referrer) if self.referrer.is_none() && referrer != self.owner => {
                self.referrer = Some(referrer);
                true
            }
            _ => false,
        }
    }
}
