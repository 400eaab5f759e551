//! Error types for the Pooled Staking program.
//!
//! This module defines all custom error codes that can be returned by the program.
//! Each error has a unique code and descriptive message.
//!
//! ## Error Code Ranges
//! - 6000-6004: Arithmetic errors
//! - 6005-6010: Input validation errors
//! - 6011-6019: State precondition errors
//! - 6020-6026: Authorization errors
//! - 6027-6029: Account validation errors
//! - 6030-6033: Invariant violations

use anchor_lang::prelude::*;

/// Custom error codes for the Pooled Staking program.
///
/// Error codes start at 6000 (Anchor's custom error offset).
#[error_code]
pub enum StakingError {
    // ========== Arithmetic Errors (6000-6004) ==========

    /// [6000] Arithmetic overflow occurred during calculation.
    #[msg("Arithmetic overflow occurred during calculation")]
    MathOverflow,

    /// [6001] Arithmetic underflow occurred during calculation.
    #[msg("Arithmetic underflow occurred during calculation")]
    MathUnderflow,

    /// [6002] Division by zero attempted.
    #[msg("Division by zero attempted")]
    DivisionByZero,

    /// [6003] A derived amount did not match its expected value.
    #[msg("Invalid calculation result")]
    InvalidCalculation,

    /// [6004] Integer conversion failed (value out of range).
    #[msg("Integer conversion failed - value out of range")]
    ConversionOverflow,

    // ========== Input Validation Errors (6005-6010) ==========

    /// [6005] Gross stake is below the minimum.
    #[msg("Stake amount is below the minimum (0.01 token)")]
    StakeTooSmall,

    /// [6006] Gross unstake is below the minimum.
    #[msg("Unstake amount is below the minimum (0.01 token)")]
    UnstakeTooSmall,

    /// [6007] Amount must be non-zero.
    #[msg("Amount must be greater than zero")]
    ZeroAmount,

    /// [6008] Fee components plus net do not reconstruct the gross amount.
    #[msg("Invalid fee breakdown - components do not reconstruct the gross amount")]
    InvalidFeeBreakdown,

    /// [6009] Clock returned an unusable timestamp.
    #[msg("Invalid timestamp detected")]
    InvalidTimestamp,

    /// [6010] Staking mint must use 9 decimals.
    #[msg("Staking mint must use 9 decimals")]
    InvalidMintDecimals,

    // ========== State Precondition Errors (6011-6019) ==========

    /// [6011] User does not have enough principal for the operation.
    #[msg("Insufficient staked principal for this operation")]
    InsufficientPrincipal,

    /// [6012] No rewards are available to claim.
    #[msg("No rewards available to claim")]
    NoRewardsAvailable,

    /// [6013] No active position found for this user.
    #[msg("User has no staked position")]
    NoStakePosition,

    /// [6014] Staking and unstaking are paused by the authority.
    #[msg("Staking pool is paused")]
    PoolPaused,

    /// [6015] Neither the countdown nor the inactivity limit has elapsed.
    #[msg("Bonus pool countdown has not expired")]
    BonusNotExpired,

    /// [6016] Nothing to distribute from the bonus pool.
    #[msg("Bonus pool is empty")]
    BonusPoolEmpty,

    /// [6017] The monthly referral distribution is not due yet.
    #[msg("Referral pool distribution period has not ended")]
    ReferralPeriodNotEnded,

    /// [6018] Nothing to distribute from the referral pool.
    #[msg("Referral pool is empty")]
    ReferralPoolEmpty,

    /// [6019] Last-ten ring bookkeeping is out of range.
    #[msg("Circular buffer is full")]
    CircularBufferFull,

    // ========== Authorization Errors (6020-6026) ==========

    /// [6020] Unauthorized - caller is not the configured authority.
    #[msg("Unauthorized: caller is not the authority")]
    Unauthorized,

    /// [6021] Treasury identity or token account does not match the config.
    #[msg("Invalid treasury account")]
    InvalidTreasury,

    /// [6022] Team wallet identity or token account does not match the config.
    #[msg("Invalid team wallet account")]
    InvalidTeamWallet,

    /// [6023] Global config was already initialized.
    #[msg("Account already initialized")]
    AlreadyInitialized,

    /// [6024] Global config has not been initialized.
    #[msg("Account not initialized")]
    NotInitialized,

    /// [6025] Referrer token account missing or not owned by the bound referrer.
    #[msg("Referrer token account missing or does not belong to the referrer")]
    InvalidReferrerAccount,

    /// [6026] Remaining accounts do not match the occupied last-ten slots.
    #[msg("Last-ten payout accounts do not match the ring")]
    InvalidLastTenAccounts,

    // ========== Account Validation Errors (6027-6029) ==========

    /// [6027] The provided mint does not match the pool's staking token.
    #[msg("Token mint mismatch - wrong token for this pool")]
    MintMismatch,

    /// [6028] The provided vault does not match the pool's vault.
    #[msg("Pool vault address mismatch")]
    VaultMismatch,

    /// [6029] Token account is not owned by the expected wallet.
    #[msg("Token account owner mismatch")]
    InvalidTokenAccountOwner,

    // ========== Invariant Violations (6030-6033) ==========

    /// [6030] Vault balance no longer covers principal plus pool balances.
    #[msg("Total staked invariant violated")]
    TotalStakedInvariantViolation,

    /// [6031] Reward-per-share accumulator decreased.
    #[msg("Reward per share invariant violated")]
    RewardPerShareInvariantViolation,

    /// [6032] Reward debt exceeds accrued reward (negative pending).
    #[msg("Reward debt invariant violated")]
    RewardDebtInvariantViolation,

    /// [6033] Staker count would go negative.
    #[msg("Staker count invariant violated")]
    StakerCountInvariantViolation,
}
