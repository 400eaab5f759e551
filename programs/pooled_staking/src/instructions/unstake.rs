//! Unstake instruction handler.
//!
//! Withdraws principal less the 10% exit fee and settles pending rewards in
//! the same transfer.

use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::*;
use crate::error::StakingError;
use crate::events::{ReferralPaid, Unstaked};
use crate::instructions::stake::require_referrer_account;
use crate::ledger;
use crate::state::{BonusPool, GlobalConfig, ReferralPool, StakingPool, UserPosition};
use crate::transfer::{transfer_from_vault, verify_vault_backing};

/// Accounts required for unstaking.
#[derive(Accounts)]
pub struct Unstake<'info> {
    /// The user unstaking tokens.
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

    #[account(
        mut,
        seeds = [BONUS_POOL_SEED],
        bump = bonus_pool.bump
    )]
    pub bonus_pool: Account<'info, BonusPool>,

    #[account(
        mut,
        seeds = [REFERRAL_POOL_SEED],
        bump = referral_pool.bump
    )]
    pub referral_pool: Account<'info, ReferralPool>,

    pub staking_mint: Account<'info, Mint>,

    /// User's token account for receiving the withdrawal.
    #[account(
        mut,
        constraint = user_token_account.mint == staking_mint.key() @ StakingError::MintMismatch,
        constraint = user_token_account.owner == user.key() @ StakingError::InvalidTokenAccountOwner
    )]
    pub user_token_account: Account<'info, TokenAccount>,

    #[account(mut)]
    pub pool_vault: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = treasury_token_account.owner == global_config.treasury @ StakingError::InvalidTreasury,
        constraint = treasury_token_account.mint == staking_mint.key() @ StakingError::MintMismatch
    )]
    pub treasury_token_account: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = team_token_account.owner == global_config.team_wallet @ StakingError::InvalidTeamWallet,
        constraint = team_token_account.mint == staking_mint.key() @ StakingError::MintMismatch
    )]
    pub team_token_account: Account<'info, TokenAccount>,

    #[account(mut)]
    pub referrer_token_account: Option<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
}

/// Unstake tokens from the pool.
///
/// # Arguments
/// * `ctx` - Unstake accounts context
/// * `amount` - Gross principal to withdraw, fees included
///
/// # Returns
/// The operation id
pub fn handler(ctx: Context<Unstake>, amount: u64) -> Result<u64> {
    ctx.accounts.global_config.require_accepting_deposits()?;

    let now = Clock::get()?.unix_timestamp;
    let user_key = ctx.accounts.user.key();

    let outcome = ledger::unstake(
        &mut ctx.accounts.staking_pool,
        &mut ctx.accounts.user_position,
        &mut ctx.accounts.bonus_pool,
        &mut ctx.accounts.referral_pool,
        amount,
        now,
    )?;
    let fees = outcome.fees;

    // === TOKEN TRANSFERS ===

    let token_program = ctx.accounts.token_program.to_account_info();
    let vault = ctx.accounts.pool_vault.to_account_info();
    let pool_signer = ctx.accounts.staking_pool.to_account_info();
    let pool_bump = ctx.accounts.staking_pool.bump;

    transfer_from_vault(
        token_program.clone(),
        vault.clone(),
        ctx.accounts.user_token_account.to_account_info(),
        pool_signer.clone(),
        pool_bump,
        outcome.user_payout()?,
    )?;
    transfer_from_vault(
        token_program.clone(),
        vault.clone(),
        ctx.accounts.treasury_token_account.to_account_info(),
        pool_signer.clone(),
        pool_bump,
        fees.treasury,
    )?;
    transfer_from_vault(
        token_program.clone(),
        vault.clone(),
        ctx.accounts.team_token_account.to_account_info(),
        pool_signer.clone(),
        pool_bump,
        fees.team,
    )?;
    if let Some(recipient) = outcome.referral_recipient {
        let referrer_account = require_referrer_account(
            &ctx.accounts.referrer_token_account,
            recipient,
            ctx.accounts.staking_mint.key(),
        )?;
        transfer_from_vault(
            token_program,
            vault,
            referrer_account.to_account_info(),
            pool_signer,
            pool_bump,
            fees.referral,
        )?;
    }

    let reserved = ledger::reserved_balance(
        &ctx.accounts.staking_pool,
        &ctx.accounts.bonus_pool,
        &ctx.accounts.referral_pool,
    )?;
    verify_vault_backing(&mut ctx.accounts.pool_vault, reserved)?;

    // === EVENTS ===

    let operation_id = ctx.accounts.staking_pool.next_operation_id()?;
    let staking_pool = &ctx.accounts.staking_pool;
    let position = &ctx.accounts.user_position;

    emit!(Unstaked {
        operation_id,
        user: user_key,
        gross_amount: fees.gross_amount,
        net_amount: fees.net_amount,
        fee_stakers: fees.stakers,
        fee_treasury: fees.treasury,
        fee_bonus: fees.bonus,
        fee_referral: fees.referral,
        fee_team: fees.team,
        referrer: outcome.referral_recipient,
        stakers_share_deferred: !outcome.stakers_share_injected,
        rewards_paid: outcome.rewards_paid,
        position_closed: outcome.position_closed,
        remaining_principal: position.principal,
        pool_total_staked: staking_pool.total_staked,
        total_stakers: staking_pool.total_stakers,
        reward_per_share: staking_pool.reward_per_share,
        bonus_balance: ctx.accounts.bonus_pool.balance,
        referral_balance: ctx.accounts.referral_pool.balance,
        timestamp: now,
    });

    if let Some(recipient) = outcome.referral_recipient {
        emit!(ReferralPaid {
            operation_id,
            referrer: recipient,
            referee: user_key,
            amount: fees.referral,
            timestamp: now,
        });
    }

    msg!("Unstaked {} (net {}, fee {})", amount, fees.net_amount, fees.total_fee);
    msg!("Rewards paid: {}", outcome.rewards_paid);
    msg!("Remaining principal: {}", position.principal);
    if outcome.position_closed {
        msg!("Position closed");
    }

    Ok(operation_id)
}
