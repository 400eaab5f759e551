//! # Pooled Staking Program
//!
//! A single-token staking pool funded entirely by its own fees. Every stake
//! and unstake pays 10%, split five ways:
//!
//! - **Stakers** (7%): spread over existing principal through a reward-per-share accumulator
//! - **Treasury** (1%) and **Team** (0.5%): paid out immediately
//! - **Bonus pool** (1%): countdown-gated prize, split 40/40/20 between the
//!   last ten qualifying stakers, all stakers and the next round
//! - **Referral** (0.5%): paid to the bound referrer, or to a monthly
//!   referral pool that shares half with stakers
//!
//! ## Features
//! - Claim rewards without unstaking; unstaking settles pending rewards
//! - Bonus countdown extended by every stake of at least one token
//! - Checked integer arithmetic throughout
//! - Every state-changing instruction returns an operation id

use anchor_lang::prelude::*;

declare_id!("E7hGuvnFRy7WruCBDkoye6WADMoYF5RtSj4WAuktXSgA");

pub mod constants;
pub mod error;
pub mod events;
pub mod fees;
pub mod instructions;
pub mod ledger;
pub mod math;
pub mod state;
pub mod transfer;

use instructions::*;

#[program]
pub mod pooled_staking {
    use super::*;

    /// Creates the config, staking pool, bonus pool, referral pool and vault.
    ///
    /// # Arguments
    /// * `ctx` - The context containing all accounts needed for initialization
    /// * `treasury` - Wallet receiving the treasury fee share
    /// * `team_wallet` - Wallet receiving the team fee share
    ///
    /// # Errors
    /// Returns an error if either wallet is the default key, the mint does
    /// not use 9 decimals, or the protocol already exists.
    pub fn initialize(ctx: Context<Initialize>, treasury: Pubkey, team_wallet: Pubkey) -> Result<u64> {
        instructions::initialize::handler(ctx, treasury, team_wallet)
    }

    /// Admin function to pause or resume staking and unstaking.
    ///
    /// # Arguments
    /// * `ctx` - The context containing admin accounts
    /// * `paused` - True to pause, false to resume
    ///
    /// # Errors
    /// Returns an error if caller is not the authority.
    pub fn set_paused(ctx: Context<AdminControl>, paused: bool) -> Result<u64> {
        instructions::admin::set_paused_handler(ctx, paused)
    }

    /// Stakes tokens, paying the 10% entry fee.
    ///
    /// # Arguments
    /// * `ctx` - The context containing all accounts needed for staking
    /// * `amount` - Gross amount, fees included
    /// * `referrer` - Referrer to bind on the first stake; ignored afterwards
    ///
    /// # Errors
    /// Returns an error if:
    /// - Staking is paused
    /// - Amount is below 0.01 token
    /// - A referrer is bound but its token account is missing or wrong
    pub fn stake(ctx: Context<Stake>, amount: u64, referrer: Option<Pubkey>) -> Result<u64> {
        instructions::stake::handler(ctx, amount, referrer)
    }

    /// Unstakes principal, paying the 10% exit fee and settling pending rewards.
    ///
    /// # Arguments
    /// * `ctx` - The context containing all accounts needed for unstaking
    /// * `amount` - Gross principal to withdraw
    ///
    /// # Errors
    /// Returns an error if:
    /// - Staking is paused
    /// - Amount is below 0.01 token or exceeds the principal
    pub fn unstake(ctx: Context<Unstake>, amount: u64) -> Result<u64> {
        instructions::unstake::handler(ctx, amount)
    }

    /// Claims pending rewards without unstaking.
    ///
    /// # Errors
    /// Returns an error if nothing is pending.
    pub fn claim_rewards(ctx: Context<ClaimRewards>) -> Result<u64> {
        instructions::claim_rewards::handler(ctx)
    }

    /// Distributes an expired bonus pool. Callable by anyone.
    ///
    /// Remaining accounts: one token account per occupied last-ten slot, in
    /// slot order.
    ///
    /// # Errors
    /// Returns an error if:
    /// - Neither the countdown nor the inactivity limit has elapsed
    /// - The pool is empty
    /// - The remaining accounts do not match the ring
    pub fn distribute_bonus_pool<'info>(
        ctx: Context<'_, '_, '_, 'info, DistributeBonus<'info>>,
    ) -> Result<u64> {
        instructions::distribute_bonus::handler(ctx)
    }

    /// Admin function to move half of the referral pool to stakers.
    ///
    /// # Arguments
    /// * `ctx` - The context containing admin accounts
    /// * `force` - Distribute before the 30-day period ends
    ///
    /// # Errors
    /// Returns an error if:
    /// - Caller is not the authority
    /// - The period has not ended and `force` is false
    /// - The pool is empty
    pub fn distribute_referral_pool(ctx: Context<DistributeReferral>, force: bool) -> Result<u64> {
        instructions::distribute_referral::handler(ctx, force)
    }
}
