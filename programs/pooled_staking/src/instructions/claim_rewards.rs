//! Claim rewards instruction handler.
//!
//! Pays out pending rewards from the pool vault without touching principal.

use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::*;
use crate::error::StakingError;
use crate::events::RewardsClaimed;
use crate::ledger;
use crate::state::{BonusPool, GlobalConfig, ReferralPool, StakingPool, UserPosition};
use crate::transfer::{transfer_from_vault, verify_vault_backing};

/// Accounts required for claiming rewards.
#[derive(Accounts)]
pub struct ClaimRewards<'info> {
    /// The user claiming rewards.
    #[account(mut)]
    pub user: Signer<'info>,

    #[account(
        seeds = [GLOBAL_CONFIG_SEED],
        bump = global_config.bump,
        has_one = staking_mint @ StakingError::MintMismatch,
        has_one = pool_vault @ StakingError::VaultMismatch
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
        seeds = [USER_POSITION_SEED, staking_pool.key().as_ref(), user.key().as_ref()],
        bump = user_position.bump,
        constraint = user_position.owner == user.key() @ StakingError::Unauthorized,
        constraint = user_position.staking_pool == staking_pool.key()
    )]
    pub user_position: Account<'info, UserPosition>,

    /// Read for the vault backing check.
    #[account(seeds = [BONUS_POOL_SEED], bump = bonus_pool.bump)]
    pub bonus_pool: Account<'info, BonusPool>,

    /// Read for the vault backing check.
    #[account(seeds = [REFERRAL_POOL_SEED], bump = referral_pool.bump)]
    pub referral_pool: Account<'info, ReferralPool>,

    pub staking_mint: Account<'info, Mint>,

    /// User's token account for receiving rewards.
    #[account(
        mut,
        constraint = user_token_account.mint == staking_mint.key() @ StakingError::MintMismatch,
        constraint = user_token_account.owner == user.key() @ StakingError::InvalidTokenAccountOwner
    )]
    pub user_token_account: Account<'info, TokenAccount>,

    #[account(mut)]
    pub pool_vault: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

/// Claim accumulated rewards.
///
/// Available while paused. No fee is taken.
///
/// # Arguments
/// * `ctx` - ClaimRewards accounts context
///
/// # Returns
/// The operation id
pub fn handler(ctx: Context<ClaimRewards>) -> Result<u64> {
    let now = Clock::get()?.unix_timestamp;

    let amount = ledger::claim(
        &mut ctx.accounts.staking_pool,
        &mut ctx.accounts.user_position,
        now,
    )?;

    transfer_from_vault(
        ctx.accounts.token_program.to_account_info(),
        ctx.accounts.pool_vault.to_account_info(),
        ctx.accounts.user_token_account.to_account_info(),
        ctx.accounts.staking_pool.to_account_info(),
        ctx.accounts.staking_pool.bump,
        amount,
    )?;

    let reserved = ledger::reserved_balance(
        &ctx.accounts.staking_pool,
        &ctx.accounts.bonus_pool,
        &ctx.accounts.referral_pool,
    )?;
    verify_vault_backing(&mut ctx.accounts.pool_vault, reserved)?;

    let operation_id = ctx.accounts.staking_pool.next_operation_id()?;
    let position = &ctx.accounts.user_position;

    emit!(RewardsClaimed {
        operation_id,
        user: ctx.accounts.user.key(),
        amount,
        total_claimed: position.total_claimed,
        timestamp: now,
    });

    msg!("Claimed {} reward tokens", amount);
    msg!("Total rewards claimed by user: {}", position.total_claimed);

    Ok(operation_id)
}
