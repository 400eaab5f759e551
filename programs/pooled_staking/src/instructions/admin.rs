/// Admin instruction handlers.
///
/// ## Security Guarantees
/// - Signer must equal `global_config.authority`
/// - The authority is fixed at initialization; there is no transfer

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::events::PauseToggled;
use crate::state::{GlobalConfig, StakingPool};

/// Accounts required for admin operations.
#[derive(Accounts)]
pub struct AdminControl<'info> {
    /// SECURITY: Checked against `global_config.authority` in the handler.
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [GLOBAL_CONFIG_SEED],
        bump = global_config.bump
    )]
    pub global_config: Account<'info, GlobalConfig>,

    /// Hands out the operation id.
    #[account(
        mut,
        seeds = [STAKING_POOL_SEED],
        bump = staking_pool.bump
    )]
    pub staking_pool: Account<'info, StakingPool>,
}

/// Set the paused state.
///
/// # Security
/// - Only the authority can call this
/// - While paused, stake and unstake are rejected; claims and both pool
///   distributions keep working
///
/// # Arguments
/// * `ctx` - AdminControl accounts context
/// * `paused` - True to pause, false to resume
///
/// # Returns
/// The operation id
pub fn set_paused_handler(ctx: Context<AdminControl>, paused: bool) -> Result<u64> {
    let authority = ctx.accounts.authority.key();
    ctx.accounts.global_config.require_authority(&authority)?;

    let now = Clock::get()?.unix_timestamp;
    let config = &mut ctx.accounts.global_config;
    let previous_state = config.paused;
    config.paused = paused;

    let operation_id = ctx.accounts.staking_pool.next_operation_id()?;

    emit!(PauseToggled {
        operation_id,
        authority,
        paused,
        timestamp: now,
    });

    msg!(
        "Staking {} (was {})",
        if paused { "PAUSED" } else { "RESUMED" },
        if previous_state { "paused" } else { "active" }
    );
    msg!("Admin: {}", authority);

    Ok(operation_id)
}
