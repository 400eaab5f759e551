use anchor_lang::prelude::*;

use crate::error::StakingError;

/// Process-wide configuration.
/// PDA: ["global_config"]
#[account]
#[derive(Default)]
pub struct GlobalConfig {
    /// Only key allowed to pause or force a referral distribution
    pub authority: Pubkey,

    /// Wallet receiving the treasury fee share
    pub treasury: Pubkey,

    /// Wallet receiving the team fee share
    pub team_wallet: Pubkey,

    /// Mint of the staked token
    pub staking_mint: Pubkey,

    /// Vault holding principal, rewards and both pool balances
    pub pool_vault: Pubkey,

    /// Blocks stake and unstake while set
    pub paused: bool,

    /// Flips to true exactly once, in `initialize`
    pub initialized: bool,

    pub created_at: i64,

    pub bump: u8,
    pub vault_bump: u8,
}

impl GlobalConfig {
    pub const LEN: usize = 8 + // discriminator
        (32 * 5) + // authority, treasury, team_wallet, staking_mint, pool_vault
        1 + // paused
        1 + // initialized
        8 + // created_at
        1 + // bump
        1; // vault_bump

    /// Flip `initialized`; a second call fails.
    pub fn mark_initialized(&mut self) -> Result<()> {
        require!(!self.initialized, StakingError::AlreadyInitialized);
        self.initialized = true;
        Ok(())
    }

    /// Fails unless the config has been initialized and is not paused.
    pub fn require_accepting_deposits(&self) -> Result<()> {
        require!(self.initialized, StakingError::NotInitialized);
        require!(!self.paused, StakingError::PoolPaused);
        Ok(())
    }

    /// Fails unless `caller` is the configured authority.
    pub fn require_authority(&self, caller: &Pubkey) -> Result<()> {
        require!(self.initialized, StakingError::NotInitialized);
        require_keys_eq!(*caller, self.authority, StakingError::Unauthorized);
        Ok(())
    }
}
