//! Bonus pool distribution handler.
//!
//! Permissionless once the countdown (or the inactivity limit) has lapsed.
//! The last-ten token accounts are passed as remaining accounts, one per
//! occupied slot, in slot order.

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Mint, Token, TokenAccount};

use crate::constants::*;
use crate::error::StakingError;
use crate::events::BonusPoolDistributed;
use crate::ledger;
use crate::state::{BonusPool, BufferEntry, GlobalConfig, ReferralPool, StakingPool};
use crate::transfer::{transfer_from_vault, verify_vault_backing};

/// Accounts required for distributing the bonus pool.
#[derive(Accounts)]
pub struct DistributeBonus<'info> {
    /// Anyone may trigger an expired distribution.
    pub caller: Signer<'info>,

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
        seeds = [BONUS_POOL_SEED],
        bump = bonus_pool.bump
    )]
    pub bonus_pool: Account<'info, BonusPool>,

    /// Read for the vault backing check.
    #[account(seeds = [REFERRAL_POOL_SEED], bump = referral_pool.bump)]
    pub referral_pool: Account<'info, ReferralPool>,

    pub staking_mint: Account<'info, Mint>,

    #[account(mut)]
    pub pool_vault: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

/// Split an expired bonus pool 40/40/20.
///
/// # Arguments
/// * `ctx` - DistributeBonus accounts context; remaining accounts are the
///   last-ten token accounts
///
/// # Returns
/// The operation id
pub fn handler<'info>(ctx: Context<'_, '_, '_, 'info, DistributeBonus<'info>>) -> Result<u64> {
    let now = Clock::get()?.unix_timestamp;

    let entries: Vec<BufferEntry> = ctx.accounts.bonus_pool.entries().to_vec();
    let recipients = ctx.remaining_accounts;
    require!(
        recipients.len() == entries.len(),
        StakingError::InvalidLastTenAccounts
    );
    let mint = ctx.accounts.staking_mint.key();
    for (entry, info) in entries.iter().zip(recipients.iter()) {
        require_last_ten_account(info, entry, &mint)?;
    }

    let distribution = ledger::distribute_bonus(
        &mut ctx.accounts.staking_pool,
        &mut ctx.accounts.bonus_pool,
        now,
    )?;
    let split = distribution.split;

    // === TOKEN TRANSFERS ===

    let token_program = ctx.accounts.token_program.to_account_info();
    let vault = ctx.accounts.pool_vault.to_account_info();
    let pool_signer = ctx.accounts.staking_pool.to_account_info();
    let pool_bump = ctx.accounts.staking_pool.bump;

    for (payout, info) in split.payouts.iter().zip(recipients.iter()) {
        transfer_from_vault(
            token_program.clone(),
            vault.clone(),
            info.clone(),
            pool_signer.clone(),
            pool_bump,
            *payout,
        )?;
    }

    let reserved = ledger::reserved_balance(
        &ctx.accounts.staking_pool,
        &ctx.accounts.bonus_pool,
        &ctx.accounts.referral_pool,
    )?;
    verify_vault_backing(&mut ctx.accounts.pool_vault, reserved)?;

    let operation_id = ctx.accounts.staking_pool.next_operation_id()?;
    let bonus_pool = &ctx.accounts.bonus_pool;

    emit!(BonusPoolDistributed {
        operation_id,
        caller: ctx.accounts.caller.key(),
        total: split.total,
        to_last_ten: split.to_last_ten,
        last_ten_paid: split.last_ten_paid,
        to_stakers: split.to_stakers,
        injected: distribution.injected,
        carried_forward: distribution.carried_forward,
        recipients: distribution.last_ten_count,
        round: bonus_pool.rounds,
        next_expiry: bonus_pool.expiry_time,
        timestamp: now,
    });

    msg!("Bonus pool distributed: {}", split.total);
    msg!(
        "Last ten: {} across {} slots, stakers: {}, carried: {}",
        split.last_ten_paid,
        distribution.last_ten_count,
        distribution.injected,
        distribution.carried_forward
    );

    Ok(operation_id)
}

/// A remaining account must be a token account of the staking mint owned by
/// the slot's investor.
fn require_last_ten_account(info: &AccountInfo, entry: &BufferEntry, mint: &Pubkey) -> Result<()> {
    require_keys_eq!(*info.owner, token::ID, StakingError::InvalidLastTenAccounts);
    require!(info.is_writable, StakingError::InvalidLastTenAccounts);

    let data = info.try_borrow_data()?;
    let account = TokenAccount::try_deserialize(&mut &data[..])
        .map_err(|_| error!(StakingError::InvalidLastTenAccounts))?;
    require_keys_eq!(account.owner, entry.investor, StakingError::InvalidLastTenAccounts);
    require_keys_eq!(account.mint, *mint, StakingError::MintMismatch);
    Ok(())
}
