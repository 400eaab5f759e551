use anchor_lang::prelude::*;

/// Emitted once, when the protocol accounts are created
#[event]
pub struct ProtocolInitialized {
    pub operation_id: u64,
    pub authority: Pubkey,
    pub treasury: Pubkey,
    pub team_wallet: Pubkey,
    pub staking_mint: Pubkey,
    pub pool_vault: Pubkey,
    pub bonus_expiry: i64,
    pub next_referral_distribution: i64,
    pub timestamp: i64,
}

/// Emitted when a user stakes tokens
#[event]
pub struct Staked {
    pub operation_id: u64,
    pub user: Pubkey,
    pub gross_amount: u64,
    pub net_amount: u64,
    pub fee_stakers: u64,
    pub fee_treasury: u64,
    pub fee_bonus: u64,
    pub fee_referral: u64,
    pub fee_team: u64,
    /// Direct referral recipient; `None` when the share went to the referral pool
    pub referrer: Option<Pubkey>,
    /// The stakers' share went to the bonus pool because nothing else was staked
    pub stakers_share_deferred: bool,
    /// Reward pending on the old principal, kept across the deposit
    pub carried_pending: u64,
    pub new_staker: bool,
    pub new_principal: u64,
    pub pool_total_staked: u64,
    pub total_stakers: u64,
    pub reward_per_share: u128,
    pub bonus_balance: u64,
    pub referral_balance: u64,
    pub timestamp: i64,
}

/// Emitted when a user unstakes tokens
#[event]
pub struct Unstaked {
    pub operation_id: u64,
    pub user: Pubkey,
    pub gross_amount: u64,
    pub net_amount: u64,
    pub fee_stakers: u64,
    pub fee_treasury: u64,
    pub fee_bonus: u64,
    pub fee_referral: u64,
    pub fee_team: u64,
    pub referrer: Option<Pubkey>,
    pub stakers_share_deferred: bool,
    pub rewards_paid: u64,
    pub position_closed: bool,
    pub remaining_principal: u64,
    pub pool_total_staked: u64,
    pub total_stakers: u64,
    pub reward_per_share: u128,
    pub bonus_balance: u64,
    pub referral_balance: u64,
    pub timestamp: i64,
}

/// Emitted when rewards are claimed
#[event]
pub struct RewardsClaimed {
    pub operation_id: u64,
    pub user: Pubkey,
    pub amount: u64,
    pub total_claimed: u64,
    pub timestamp: i64,
}

/// Emitted when a referrer is paid its share directly
#[event]
pub struct ReferralPaid {
    pub operation_id: u64,
    pub referrer: Pubkey,
    pub referee: Pubkey,
    pub amount: u64,
    pub timestamp: i64,
}

/// Emitted when a qualifying stake pushes the bonus expiry out
#[event]
pub struct BonusCountdownExtended {
    pub operation_id: u64,
    pub investor: Pubkey,
    pub new_expiry: i64,
    pub seconds_remaining: i64,
    pub timestamp: i64,
}

/// Emitted when a qualifying stake is written into the last-ten ring
#[event]
pub struct InvestorAddedToLastTen {
    pub operation_id: u64,
    pub investor: Pubkey,
    pub amount: u64,
    pub slot: u8,
    pub count: u8,
    pub total_participants_ever: u64,
    pub timestamp: i64,
}

/// Emitted when an expired bonus pool is split
#[event]
pub struct BonusPoolDistributed {
    pub operation_id: u64,
    pub caller: Pubkey,
    pub total: u64,
    pub to_last_ten: u64,
    pub last_ten_paid: u64,
    pub to_stakers: u64,
    pub injected: u64,
    pub carried_forward: u64,
    pub recipients: u8,
    pub round: u64,
    pub next_expiry: i64,
    pub timestamp: i64,
}

/// Emitted when half the referral pool moves to stakers
#[event]
pub struct ReferralPoolDistributed {
    pub operation_id: u64,
    pub total: u64,
    pub to_stakers: u64,
    pub injected: u64,
    pub carried_forward: u64,
    pub forced: bool,
    pub next_distribution: i64,
    pub timestamp: i64,
}

/// Emitted when the authority pauses or resumes staking
#[event]
pub struct PauseToggled {
    pub operation_id: u64,
    pub authority: Pubkey,
    pub paused: bool,
    pub timestamp: i64,
}
