use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::StakingError;
use crate::math::bps_of;

/// Calendar-gated pool fed by the referral share of un-referred positions.
/// PDA: ["referral_pool"]
#[account]
#[derive(Default)]
pub struct ReferralPool {
    pub balance: u64,
    pub next_distribution: i64,
    pub last_distribution: i64,
    /// Amount injected into the accumulator (lifetime)
    pub total_distributed: u64,
    pub bump: u8,
}

impl ReferralPool {
    pub const LEN: usize = 8 + 8 + 8 + 8 + 8 + 1;

    pub fn start(&mut self, now: i64, bump: u8) -> Result<()> {
        self.balance = 0;
        self.next_distribution = now
            .checked_add(REFERRAL_PERIOD_SECONDS)
            .ok_or(StakingError::MathOverflow)?;
        self.last_distribution = now;
        self.total_distributed = 0;
        self.bump = bump;
        Ok(())
    }

    pub fn is_due(&self, now: i64) -> bool {
        now >= self.next_distribution
    }

    pub fn deposit(&mut self, amount: u64) -> Result<()> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(StakingError::MathOverflow)?;
        Ok(())
    }

    /// Half of the balance, floored, destined for stakers.
    pub fn stakers_share(&self) -> Result<u64> {
        bps_of(self.balance, REFERRAL_STAKERS_BPS)
    }

    /// Take `injected` out of the balance and roll the calendar forward.
    pub fn settle(&mut self, injected: u64, now: i64) -> Result<()> {
        self.balance = self
            .balance
            .checked_sub(injected)
            .ok_or(StakingError::MathUnderflow)?;
        self.total_distributed = self
            .total_distributed
            .checked_add(injected)
            .ok_or(StakingError::MathOverflow)?;
        self.last_distribution = now;
        self.next_distribution = now
            .checked_add(REFERRAL_PERIOD_SECONDS)
            .ok_or(StakingError::MathOverflow)?;
        Ok(())
    }
}
