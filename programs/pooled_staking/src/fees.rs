//! Five-way fee split applied to every stake and unstake.

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::StakingError;
use crate::math::bps_of;

/// Exact integer decomposition of a gross amount.
///
/// `stakers + treasury + bonus + referral + team == total_fee` and
/// `total_fee + net_amount == gross_amount` always hold for a value
/// returned by [`FeeBreakdown::split`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeeBreakdown {
    pub gross_amount: u64,
    pub stakers: u64,
    pub treasury: u64,
    pub bonus: u64,
    pub referral: u64,
    pub team: u64,
    pub total_fee: u64,
    pub net_amount: u64,
}

impl FeeBreakdown {
    /// Split `gross_amount` by basis points.
    ///
    /// Each component is floor-divided; whatever the floors leave between the
    /// components and the 10% total goes to the stakers' share.
    pub fn split(gross_amount: u64) -> Result<Self> {
        require!(gross_amount > 0, StakingError::ZeroAmount);

        let total_fee = bps_of(gross_amount, TOTAL_FEE_BPS)?;
        let treasury = bps_of(gross_amount, FEE_TREASURY_BPS)?;
        let bonus = bps_of(gross_amount, FEE_BONUS_BPS)?;
        let referral = bps_of(gross_amount, FEE_REFERRAL_BPS)?;
        let team = bps_of(gross_amount, FEE_TEAM_BPS)?;

        let routed = treasury
            .checked_add(bonus)
            .and_then(|v| v.checked_add(referral))
            .and_then(|v| v.checked_add(team))
            .ok_or(StakingError::MathOverflow)?;
        let stakers = total_fee
            .checked_sub(routed)
            .ok_or(StakingError::InvalidFeeBreakdown)?;
        let net_amount = gross_amount
            .checked_sub(total_fee)
            .ok_or(StakingError::MathUnderflow)?;

        let fees = Self {
            gross_amount,
            stakers,
            treasury,
            bonus,
            referral,
            team,
            total_fee,
            net_amount,
        };
        fees.verify()?;
        Ok(fees)
    }

    /// Assert the components reconstruct the total fee and the gross amount.
    pub fn verify(&self) -> Result<()> {
        let components = self
            .stakers
            .checked_add(self.treasury)
            .and_then(|v| v.checked_add(self.bonus))
            .and_then(|v| v.checked_add(self.referral))
            .and_then(|v| v.checked_add(self.team))
            .ok_or(StakingError::MathOverflow)?;
        require!(components == self.total_fee, StakingError::InvalidFeeBreakdown);

        let reconstructed = components
            .checked_add(self.net_amount)
            .ok_or(StakingError::MathOverflow)?;
        require!(
            reconstructed == self.gross_amount,
            StakingError::InvalidFeeBreakdown
        );
        Ok(())
    }

    /// Part of the gross amount that leaves the pool vault's custody:
    /// treasury, team and (when paid directly) the referrer.
    pub fn external(&self, referral_paid_directly: bool) -> Result<u64> {
        let mut external = self
            .treasury
            .checked_add(self.team)
            .ok_or(StakingError::MathOverflow)?;
        if referral_paid_directly {
            external = external
                .checked_add(self.referral)
                .ok_or(StakingError::MathOverflow)?;
        }
        Ok(external)
    }
}
