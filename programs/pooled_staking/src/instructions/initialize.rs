/// Initialize instruction handler.
///
/// Creates the global config, the staking pool, both prize pools and the
/// pool vault in one transaction.
///
/// ## Security Guarantees
/// - Every account is a PDA with a fixed seed, so there is exactly one protocol
/// - The vault's authority is the staking pool PDA
/// - Mint, vault, treasury and team wallet are locked into the config

use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::*;
use crate::error::StakingError;
use crate::events::ProtocolInitialized;
use crate::state::{BonusPool, GlobalConfig, ReferralPool, StakingPool};

/// Accounts required for protocol initialization.
///
/// ## Security Notes
/// - `init` on the config PDA fails if it already exists
/// - `pool_vault` is derived from the staking pool, not supplied freely
#[derive(Accounts)]
pub struct Initialize<'info> {
    /// The authority that will control pausing and forced referral payouts.
    /// SECURITY: Stored in the config and never changed afterwards.
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        init,
        payer = authority,
        space = GlobalConfig::LEN,
        seeds = [GLOBAL_CONFIG_SEED],
        bump
    )]
    pub global_config: Account<'info, GlobalConfig>,

    #[account(
        init,
        payer = authority,
        space = StakingPool::LEN,
        seeds = [STAKING_POOL_SEED],
        bump
    )]
    pub staking_pool: Account<'info, StakingPool>,

    #[account(
        init,
        payer = authority,
        space = BonusPool::LEN,
        seeds = [BONUS_POOL_SEED],
        bump
    )]
    pub bonus_pool: Account<'info, BonusPool>,

    #[account(
        init,
        payer = authority,
        space = ReferralPool::LEN,
        seeds = [REFERRAL_POOL_SEED],
        bump
    )]
    pub referral_pool: Account<'info, ReferralPool>,

    /// The staked token's mint.
    /// SECURITY: Must use 9 decimals; the minimums are expressed in those units.
    #[account(
        constraint = staking_mint.decimals == TOKEN_DECIMALS @ StakingError::InvalidMintDecimals
    )]
    pub staking_mint: Account<'info, Mint>,

    /// The vault holding principal, undistributed rewards and both pool balances.
    /// SECURITY:
    /// - PDA derived from POOL_VAULT_SEED + staking_pool
    /// - Authority set to staking_pool PDA (cannot be changed)
    #[account(
        init,
        payer = authority,
        seeds = [POOL_VAULT_SEED, staking_pool.key().as_ref()],
        bump,
        token::mint = staking_mint,
        token::authority = staking_pool
    )]
    pub pool_vault: Account<'info, TokenAccount>,

    pub system_program: Program<'info, System>,

    pub token_program: Program<'info, Token>,

    pub rent: Sysvar<'info, Rent>,
}

/// Initialize the protocol.
///
/// # Arguments
/// * `ctx` - Initialize accounts context
/// * `treasury` - Wallet receiving the 1% treasury fee
/// * `team_wallet` - Wallet receiving the 0.5% team fee
///
/// # Returns
/// The operation id
pub fn handler(ctx: Context<Initialize>, treasury: Pubkey, team_wallet: Pubkey) -> Result<u64> {
    // === INPUT VALIDATION ===

    require!(treasury != Pubkey::default(), StakingError::InvalidTreasury);
    require!(team_wallet != Pubkey::default(), StakingError::InvalidTeamWallet);

    require!(
        ctx.accounts.pool_vault.owner == ctx.accounts.staking_pool.key(),
        StakingError::VaultMismatch
    );
    require!(
        ctx.accounts.pool_vault.mint == ctx.accounts.staking_mint.key(),
        StakingError::MintMismatch
    );

    let now = Clock::get()?.unix_timestamp;
    require!(now > 0, StakingError::InvalidTimestamp);

    // === STATE INITIALIZATION ===

    let config = &mut ctx.accounts.global_config;
    config.mark_initialized()?;
    config.authority = ctx.accounts.authority.key();
    config.treasury = treasury;
    config.team_wallet = team_wallet;
    config.staking_mint = ctx.accounts.staking_mint.key();
    config.pool_vault = ctx.accounts.pool_vault.key();
    config.paused = false;
    config.created_at = now;
    config.bump = ctx.bumps.global_config;
    config.vault_bump = ctx.bumps.pool_vault;

    let staking_pool = &mut ctx.accounts.staking_pool;
    staking_pool.total_staked = 0;
    staking_pool.reward_per_share = 0;
    staking_pool.total_stakers = 0;
    staking_pool.last_update = now;
    staking_pool.bump = ctx.bumps.staking_pool;

    ctx.accounts.bonus_pool.start(now, ctx.bumps.bonus_pool)?;
    ctx.accounts.referral_pool.start(now, ctx.bumps.referral_pool)?;

    let operation_id = ctx.accounts.staking_pool.next_operation_id()?;

    emit!(ProtocolInitialized {
        operation_id,
        authority: ctx.accounts.authority.key(),
        treasury,
        team_wallet,
        staking_mint: ctx.accounts.staking_mint.key(),
        pool_vault: ctx.accounts.pool_vault.key(),
        bonus_expiry: ctx.accounts.bonus_pool.expiry_time,
        next_referral_distribution: ctx.accounts.referral_pool.next_distribution,
        timestamp: now,
    });

    msg!("Pooled staking initialized");
    msg!("Authority: {}", ctx.accounts.authority.key());
    msg!("Mint: {}", ctx.accounts.staking_mint.key());
    msg!("Treasury: {}, Team: {}", treasury, team_wallet);
    msg!("Bonus countdown ends at {}", ctx.accounts.bonus_pool.expiry_time);

    Ok(operation_id)
}
