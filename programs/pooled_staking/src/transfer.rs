//! SPL token movements around the pool vault.
//!
//! The vault's authority is the staking pool PDA, so every outbound
//! transfer signs with `[STAKING_POOL_SEED, bump]`. Zero amounts are skipped.

use anchor_lang::prelude::*;
use anchor_spl::token::{self, TokenAccount, Transfer};

use crate::constants::*;
use crate::error::StakingError;

/// Transfer signed by the owner of `from`.
pub fn transfer_from_user<'info>(
    token_program: AccountInfo<'info>,
    from: AccountInfo<'info>,
    to: AccountInfo<'info>,
    authority: AccountInfo<'info>,
    amount: u64,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }
    let cpi_accounts = Transfer {
        from,
        to,
        authority,
    };
    let cpi_ctx = CpiContext::new(token_program, cpi_accounts);
    token::transfer(cpi_ctx, amount)
}

/// Transfer out of the pool vault, signed by the staking pool PDA.
pub fn transfer_from_vault<'info>(
    token_program: AccountInfo<'info>,
    pool_vault: AccountInfo<'info>,
    to: AccountInfo<'info>,
    staking_pool: AccountInfo<'info>,
    pool_bump: u8,
    amount: u64,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }
    let seeds = &[STAKING_POOL_SEED, &[pool_bump]];
    let signer_seeds = &[&seeds[..]];

    let cpi_accounts = Transfer {
        from: pool_vault,
        to,
        authority: staking_pool,
    };
    let cpi_ctx = CpiContext::new_with_signer(token_program, cpi_accounts, signer_seeds);
    token::transfer(cpi_ctx, amount)
}

/// Re-read the vault after the transfers and check it still backs every
/// principal plus both pool balances.
pub fn verify_vault_backing(pool_vault: &mut Account<'_, TokenAccount>, reserved: u64) -> Result<()> {
    pool_vault.reload()?;
    require!(
        pool_vault.amount >= reserved,
        StakingError::TotalStakedInvariantViolation
    );
    Ok(())
}
