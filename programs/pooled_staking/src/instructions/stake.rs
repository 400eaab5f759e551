//! Stake instruction handler.
//!
//! Takes the 10% entry fee, credits the net amount as principal and routes
//! each fee share to its destination.

use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::*;
use crate::error::StakingError;
use crate::events::{BonusCountdownExtended, InvestorAddedToLastTen, ReferralPaid, Staked};
use crate::ledger;
use crate::state::{BonusPool, GlobalConfig, ReferralPool, StakingPool, UserPosition};
use crate::transfer::{transfer_from_user, verify_vault_backing};

/// Accounts required for staking.
#[derive(Accounts)]
pub struct Stake<'info> {
    /// The user staking tokens.
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

    /// User's position (created on first stake).
    #[account(
        init_if_needed,
        payer = user,
        space = UserPosition::LEN,
        seeds = [USER_POSITION_SEED, staking_pool.key().as_ref(), user.key().as_ref()],
        bump
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

    /// User's token account for the staking token.
    #[account(
        mut,
        constraint = user_token_account.mint == staking_mint.key() @ StakingError::MintMismatch,
        constraint = user_token_account.owner == user.key() @ StakingError::InvalidTokenAccountOwner
    )]
    pub user_token_account: Account<'info, TokenAccount>,

    /// Pool vault (validated through `global_config.pool_vault`).
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

    /// Token account of the bound referrer. Required once a referrer is bound.
    #[account(mut)]
    pub referrer_token_account: Option<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,

    pub system_program: Program<'info, System>,
}

/// Stake tokens into the pool.
///
/// # Arguments
/// * `ctx` - Stake accounts context
/// * `amount` - Gross amount, fees included
/// * `referrer` - Referrer to bind; only honored on a position's first stake
///
/// # Returns
/// The operation id
pub fn handler(ctx: Context<Stake>, amount: u64, referrer: Option<Pubkey>) -> Result<u64> {
    ctx.accounts.global_config.require_accepting_deposits()?;

    let now = Clock::get()?.unix_timestamp;
    let user_key = ctx.accounts.user.key();

    // First stake: stamp identity on the freshly created position
    let position = &mut ctx.accounts.user_position;
    if position.owner == Pubkey::default() {
        position.owner = user_key;
        position.staking_pool = ctx.accounts.staking_pool.key();
        position.bump = ctx.bumps.user_position;
    }
    require_keys_eq!(position.owner, user_key, StakingError::Unauthorized);

    let outcome = ledger::stake(
        &mut ctx.accounts.staking_pool,
        &mut ctx.accounts.user_position,
        &mut ctx.accounts.bonus_pool,
        &mut ctx.accounts.referral_pool,
        amount,
        referrer,
        now,
    )?;
    let fees = outcome.fees;

    // === TOKEN TRANSFERS ===

    let token_program = ctx.accounts.token_program.to_account_info();
    let user_tokens = ctx.accounts.user_token_account.to_account_info();
    let user = ctx.accounts.user.to_account_info();

    transfer_from_user(
        token_program.clone(),
        user_tokens.clone(),
        ctx.accounts.pool_vault.to_account_info(),
        user.clone(),
        outcome.vault_inflow()?,
    )?;
    transfer_from_user(
        token_program.clone(),
        user_tokens.clone(),
        ctx.accounts.treasury_token_account.to_account_info(),
        user.clone(),
        fees.treasury,
    )?;
    transfer_from_user(
        token_program.clone(),
        user_tokens.clone(),
        ctx.accounts.team_token_account.to_account_info(),
        user.clone(),
        fees.team,
    )?;
    if let Some(recipient) = outcome.referral_recipient {
        let referrer_account = require_referrer_account(
            &ctx.accounts.referrer_token_account,
            recipient,
            ctx.accounts.staking_mint.key(),
        )?;
        transfer_from_user(
            token_program,
            user_tokens,
            referrer_account.to_account_info(),
            user,
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
    let bonus_pool = &ctx.accounts.bonus_pool;

    emit!(Staked {
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
        carried_pending: outcome.carried_pending,
        new_staker: outcome.new_staker,
        new_principal: position.principal,
        pool_total_staked: staking_pool.total_staked,
        total_stakers: staking_pool.total_stakers,
        reward_per_share: staking_pool.reward_per_share,
        bonus_balance: bonus_pool.balance,
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

    if let Some(entry) = outcome.ring_entry {
        emit!(BonusCountdownExtended {
            operation_id,
            investor: user_key,
            new_expiry: entry.new_expiry,
            seconds_remaining: bonus_pool.seconds_remaining(now),
            timestamp: now,
        });
        emit!(InvestorAddedToLastTen {
            operation_id,
            investor: user_key,
            amount: fees.gross_amount,
            slot: entry.slot,
            count: bonus_pool.count,
            total_participants_ever: bonus_pool.total_participants_ever,
            timestamp: now,
        });
    }

    msg!("Staked {} (net {}, fee {})", amount, fees.net_amount, fees.total_fee);
    msg!("Principal: {}, pool total: {}", position.principal, staking_pool.total_staked);
    if outcome.carried_pending > 0 {
        msg!("Pending rewards carried: {}", outcome.carried_pending);
    }

    Ok(operation_id)
}

/// The referrer token account, checked against the bound referrer.
pub fn require_referrer_account<'a, 'info>(
    account: &'a Option<Account<'info, TokenAccount>>,
    referrer: Pubkey,
    staking_mint: Pubkey,
) -> Result<&'a Account<'info, TokenAccount>> {
    let account = account
        .as_ref()
        .ok_or(StakingError::InvalidReferrerAccount)?;
    require_keys_eq!(account.owner, referrer, StakingError::InvalidReferrerAccount);
    require_keys_eq!(account.mint, staking_mint, StakingError::MintMismatch);
    Ok(account)
}
