//! Referral pool distribution handler.
//!
//! Moves half of the referral pool into the reward accumulator. No tokens
//! leave the vault; the injected half becomes claimable rewards.

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::events::ReferralPoolDistributed;
use crate::ledger;
use crate::state::{GlobalConfig, ReferralPool, StakingPool};

/// Accounts required for distributing the referral pool.
#[derive(Accounts)]
pub struct DistributeReferral<'info> {
    /// SECURITY: Checked against `global_config.authority` in the handler.
    pub authority: Signer<'info>,

    #[account(
        seeds = [GLOBAL_CONFIG_SEED],
        bump = global_config.bump
    )]
    pub global_config: Account<'info, GlobalConfig>,

    #[account(
        mut,
        seeds = [STAKING_POOL_SEED],
        bump = staking_pool.bump
    )]
    pub staking_pool: Account<'info, StakingPool>,

    #[account(
        mut,
        seeds = [REFERRAL_POOL_SEED],
        bump = referral_pool.bump
    )]
    pub referral_pool: Account<'info, ReferralPool>,
}

/// Distribute the referral pool.
///
/// # Arguments
/// * `ctx` - DistributeReferral accounts context
/// * `force` - Skip the 30-day calendar check
///
/// # Returns
/// The operation id
pub fn handler(ctx: Context<DistributeReferral>, force: bool) -> Result<u64> {
    let authority = ctx.accounts.authority.key();
    ctx.accounts.global_config.require_authority(&authority)?;

    let now = Clock::get()?.unix_timestamp;

    let distribution = ledger::distribute_referral(
        &mut ctx.accounts.staking_pool,
        &mut ctx.accounts.referral_pool,
        force,
        now,
    )?;

    let operation_id = ctx.accounts.staking_pool.next_operation_id()?;

    emit!(ReferralPoolDistributed {
        operation_id,
        total: distribution.total,
        to_stakers: distribution.to_stakers,
        injected: distribution.injected,
        carried_forward: distribution.carried_forward,
        forced: force,
        next_distribution: distribution.next_distribution,
        timestamp: now,
    });

    msg!(
        "Referral pool distributed: {} of {} to stakers{}",
        distribution.injected,
        distribution.total,
        if force { " (forced)" } else { "" }
    );
    msg!("Next distribution at {}", distribution.next_distribution);

    Ok(operation_id)
}
