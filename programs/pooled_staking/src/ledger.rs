//! Accounting for every operation, independent of the runtime.
//!
//! Handlers load the accounts, call one function here, then move tokens and
//! emit events from the returned outcome. A call that fails may have written
//! to its arguments; on chain the instruction reverts as a whole, so nothing
//! partial is ever committed.

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::StakingError;
use crate::fees::FeeBreakdown;
use crate::state::{BonusPool, BonusSplit, ReferralPool, StakingPool, UserPosition};

/// Where a qualifying stake landed in the last-ten ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingEntry {
    pub slot: u8,
    pub new_expiry: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StakeOutcome {
    pub fees: FeeBreakdown,
    pub new_staker: bool,
    pub referrer_bound: bool,
    /// Paid the referral share directly; `None` means it went to the referral pool
    pub referral_recipient: Option<Pubkey>,
    /// `false` when nothing else was staked and the stakers' share fed the bonus pool
    pub stakers_share_injected: bool,
    /// Reward pending on the old principal, kept across the deposit
    pub carried_pending: u64,
    pub ring_entry: Option<RingEntry>,
}

impl StakeOutcome {
    /// Amount the user moves into the pool vault.
    pub fn vault_inflow(&self) -> Result<u64> {
        let external = self.fees.external(self.referral_recipient.is_some())?;
        self.fees
            .gross_amount
            .checked_sub(external)
            .ok_or(StakingError::MathUnderflow.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnstakeOutcome {
    pub fees: FeeBreakdown,
    /// Pending reward settled with the withdrawal, fee free
    pub rewards_paid: u64,
    pub referral_recipient: Option<Pubkey>,
    pub stakers_share_injected: bool,
    pub position_closed: bool,
}

impl UnstakeOutcome {
    /// Amount the vault sends to the user: net withdrawal plus rewards.
    pub fn user_payout(&self) -> Result<u64> {
        self.fees
            .net_amount
            .checked_add(self.rewards_paid)
            .ok_or(StakingError::MathOverflow.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BonusDistribution {
    pub split: BonusSplit,
    /// Part of the stakers' share that reached the accumulator
    pub injected: u64,
    /// Balance left in the pool
    pub carried_forward: u64,
    pub last_ten_count: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferralDistribution {
    pub total: u64,
    pub to_stakers: u64,
    pub injected: u64,
    pub carried_forward: u64,
    pub next_distribution: i64,
}

fn require_valid_time(now: i64) -> Result<()> {
    require!(now > 0, StakingError::InvalidTimestamp);
    Ok(())
}

/// Route the referral share: to the bound referrer, else into the referral pool.
fn route_referral(
    position: &UserPosition,
    referral: &mut ReferralPool,
    amount: u64,
) -> Result<Option<Pubkey>> {
    match position.referrer {
        Some(referrer) => Ok(Some(referrer)),
        None => {
            referral.deposit(amount)?;
            Ok(None)
        }
    }
}

/// Spread a fee-funded stakers' share, falling back to the bonus pool.
fn inject_stakers_share(pool: &mut StakingPool, bonus: &mut BonusPool, amount: u64) -> Result<bool> {
    let injected = pool.accumulate(amount)?;
    if !injected {
        bonus.deposit(amount)?;
    }
    Ok(injected)
}

/// Deposit `gross_amount` for `position.owner`.
///
/// The stakers' share is spread over the principal staked *before* this
/// deposit, so the depositor's new principal never earns from its own fee.
pub fn stake(
    pool: &mut StakingPool,
    position: &mut UserPosition,
    bonus: &mut BonusPool,
    referral: &mut ReferralPool,
    gross_amount: u64,
    referrer: Option<Pubkey>,
    now: i64,
) -> Result<StakeOutcome> {
    require_valid_time(now)?;
    require!(gross_amount >= MIN_STAKE, StakingError::StakeTooSmall);

    let fees = FeeBreakdown::split(gross_amount)?;

    let new_staker = !position.is_active();
    let mut referrer_bound = false;
    if new_staker {
        pool.staker_joined()?;
        // Referrer binds on the position's first ever stake only
        if position.first_stake_time == 0 {
            referrer_bound = position.bind_referrer(referrer);
            position.first_stake_time = now;
            position.last_claim_time = now;
        }
    }

    let stakers_share_injected = inject_stakers_share(pool, bonus, fees.stakers)?;

    let new_principal = position
        .principal
        .checked_add(fees.net_amount)
        .ok_or(StakingError::MathOverflow)?;
    let carried_pending = position.rebase(new_principal, pool.reward_per_share)?;
    pool.add_principal(fees.net_amount)?;

    bonus.deposit(fees.bonus)?;
    let referral_recipient = route_referral(position, referral, fees.referral)?;
    pool.record_fees(fees.total_fee)?;

    let ring_entry = if gross_amount >= MIN_BONUS_QUALIFY {
        let new_expiry = bonus.extend_countdown(now)?;
        let slot = bonus.record_entry(position.owner, gross_amount)?;
        Some(RingEntry { slot, new_expiry })
    } else {
        None
    };

    pool.last_update = now;

    Ok(StakeOutcome {
        fees,
        new_staker,
        referrer_bound,
        referral_recipient,
        stakers_share_injected,
        carried_pending,
        ring_entry,
    })
}

/// Withdraw `gross_amount` of principal.
///
/// Pending reward is paid out with the withdrawal; the stakers' share of the
/// exit fee is spread over the principal that remains.
pub fn unstake(
    pool: &mut StakingPool,
    position: &mut UserPosition,
    bonus: &mut BonusPool,
    referral: &mut ReferralPool,
    gross_amount: u64,
    now: i64,
) -> Result<UnstakeOutcome> {
    require_valid_time(now)?;
    require!(gross_amount >= MIN_UNSTAKE, StakingError::UnstakeTooSmall);
    require!(position.is_active(), StakingError::NoStakePosition);
    require!(
        position.principal >= gross_amount,
        StakingError::InsufficientPrincipal
    );

    let fees = FeeBreakdown::split(gross_amount)?;

    let rewards_paid = position.pending_reward(pool.reward_per_share)?;
    position.principal = position
        .principal
        .checked_sub(gross_amount)
        .ok_or(StakingError::MathUnderflow)?;
    position.checkpoint(pool.reward_per_share)?;
    pool.remove_principal(gross_amount)?;

    let stakers_share_injected = inject_stakers_share(pool, bonus, fees.stakers)?;
    bonus.deposit(fees.bonus)?;
    let referral_recipient = route_referral(position, referral, fees.referral)?;

    let position_closed = !position.is_active();
    if position_closed {
        pool.staker_left()?;
    }

    if rewards_paid > 0 {
        position.last_claim_time = now;
        position.total_claimed = position
            .total_claimed
            .checked_add(rewards_paid)
            .ok_or(StakingError::MathOverflow)?;
        pool.record_rewards_paid(rewards_paid)?;
    }

    pool.record_fees(fees.total_fee)?;
    pool.last_update = now;

    Ok(UnstakeOutcome {
        fees,
        rewards_paid,
        referral_recipient,
        stakers_share_injected,
        position_closed,
    })
}

/// Settle the position's pending reward. No fee is taken.
pub fn claim(pool: &mut StakingPool, position: &mut UserPosition, now: i64) -> Result<u64> {
    require_valid_time(now)?;

    let pending = position.pending_reward(pool.reward_per_share)?;
    require!(pending > 0, StakingError::NoRewardsAvailable);

    position.checkpoint(pool.reward_per_share)?;
    position.last_claim_time = now;
    position.total_claimed = position
        .total_claimed
        .checked_add(pending)
        .ok_or(StakingError::MathOverflow)?;
    pool.record_rewards_paid(pending)?;

    Ok(pending)
}

/// Split an expired bonus pool 40/40/20.
///
/// Restarts the countdown and the inactivity clock, so a second caller in
/// the same window fails with `BonusNotExpired`.
pub fn distribute_bonus(
    pool: &mut StakingPool,
    bonus: &mut BonusPool,
    now: i64,
) -> Result<BonusDistribution> {
    require_valid_time(now)?;
    require!(bonus.is_expired(now), StakingError::BonusNotExpired);
    require!(bonus.balance > 0, StakingError::BonusPoolEmpty);

    let split = bonus.split()?;
    let injected = if pool.accumulate(split.to_stakers)? {
        split.to_stakers
    } else {
        0
    };

    let distributed = split
        .last_ten_paid
        .checked_add(injected)
        .ok_or(StakingError::MathOverflow)?;
    bonus.balance = split
        .total
        .checked_sub(distributed)
        .ok_or(StakingError::MathUnderflow)?;
    require!(bonus.balance >= split.carry, StakingError::InvalidCalculation);

    bonus.total_distributed = bonus
        .total_distributed
        .checked_add(distributed)
        .ok_or(StakingError::MathOverflow)?;
    bonus.restart(now)?;
    pool.last_update = now;

    Ok(BonusDistribution {
        split,
        injected,
        carried_forward: bonus.balance,
        last_ten_count: bonus.count,
    })
}

/// Move half of the referral pool into the accumulator.
pub fn distribute_referral(
    pool: &mut StakingPool,
    referral: &mut ReferralPool,
    force: bool,
    now: i64,
) -> Result<ReferralDistribution> {
    require_valid_time(now)?;
    require!(
        force || referral.is_due(now),
        StakingError::ReferralPeriodNotEnded
    );
    require!(referral.balance > 0, StakingError::ReferralPoolEmpty);

    let total = referral.balance;
    let to_stakers = referral.stakers_share()?;
    let injected = if pool.accumulate(to_stakers)? {
        to_stakers
    } else {
        0
    };
    referral.settle(injected, now)?;
    pool.last_update = now;

    Ok(ReferralDistribution {
        total,
        to_stakers,
        injected,
        carried_forward: referral.balance,
        next_distribution: referral.next_distribution,
    })
}

/// Vault balance the ledger accounts for: principal plus both pool balances.
pub fn reserved_balance(pool: &StakingPool, bonus: &BonusPool, referral: &ReferralPool) -> Result<u64> {
    pool.total_staked
        .checked_add(bonus.balance)
        .and_then(|v| v.checked_add(referral.balance))
        .ok_or(StakingError::MathOverflow.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{accrued_reward, bps_of};

    const T0: i64 = 1_700_000_000;

    struct Ledger {
        pool: StakingPool,
        bonus: BonusPool,
        referral: ReferralPool,
    }

    impl Ledger {
        fn new() -> Self {
            let mut bonus = BonusPool::default();
            bonus.start(T0, 253).unwrap();
            let mut referral = ReferralPool::default();
            referral.start(T0, 252).unwrap();
            Self {
                pool: StakingPool::default(),
                bonus,
                referral,
            }
        }

        fn stake(
            &mut self,
            position: &mut UserPosition,
            gross: u64,
            referrer: Option<Pubkey>,
            now: i64,
        ) -> Result<StakeOutcome> {
            stake(
                &mut self.pool,
                position,
                &mut self.bonus,
                &mut self.referral,
                gross,
                referrer,
                now,
            )
        }

        fn unstake(&mut self, position: &mut UserPosition, gross: u64, now: i64) -> Result<UnstakeOutcome> {
            unstake(
                &mut self.pool,
                position,
                &mut self.bonus,
                &mut self.referral,
                gross,
                now,
            )
        }
    }

    fn user() -> UserPosition {
        UserPosition {
            owner: Pubkey::new_unique(),
            ..Default::default()
        }
    }

    #[test]
    fn first_stake_splits_fees_exactly() {
        let mut ledger = Ledger::new();
        let mut alice = user();

        let out = ledger.stake(&mut alice, ONE_TOKEN, None, T0 + 10).unwrap();
        assert_eq!(out.fees.stakers, 70_000_000);
        assert_eq!(out.fees.treasury, 10_000_000);
        assert_eq!(out.fees.bonus, 10_000_000);
        assert_eq!(out.fees.referral, 5_000_000);
        assert_eq!(out.fees.team, 5_000_000);
        assert_eq!(alice.principal, 900_000_000);
        assert_eq!(ledger.pool.total_staked, 900_000_000);
        assert_eq!(ledger.pool.total_stakers, 1);
        assert!(out.new_staker);

        // Nobody else was staked: the stakers' share lands in the bonus pool.
        assert!(!out.stakers_share_injected);
        assert_eq!(ledger.pool.reward_per_share, 0);
        assert_eq!(ledger.bonus.balance, 80_000_000);
        assert_eq!(ledger.referral.balance, 5_000_000);
        assert_eq!(out.referral_recipient, None);

        let entry = out.ring_entry.unwrap();
        assert_eq!(entry.slot, 0);
        assert_eq!(ledger.bonus.count, 1);
        assert_eq!(ledger.bonus.entries()[0].investor, alice.owner);
        assert_eq!(ledger.bonus.entries()[0].amount, ONE_TOKEN);
        assert_eq!(out.vault_inflow().unwrap(), ONE_TOKEN - 15_000_000);
    }

    #[test]
    fn full_exit_returns_ninety_percent_of_principal() {
        let mut ledger = Ledger::new();
        let mut alice = user();
        ledger.stake(&mut alice, ONE_TOKEN, None, T0 + 1).unwrap();

        let out = ledger.unstake(&mut alice, 900_000_000, T0 + 2).unwrap();
        assert_eq!(out.fees.net_amount, 810_000_000);
        assert_eq!(out.rewards_paid, 0);
        assert_eq!(out.user_payout().unwrap(), 810_000_000);
        assert!(out.position_closed);
        assert_eq!(alice.principal, 0);
        assert_eq!(ledger.pool.total_staked, 0);
        assert_eq!(ledger.pool.total_stakers, 0);
        // Exit fee's stakers' share has nobody left to pay: bonus pool.
        assert!(!out.stakers_share_injected);
    }

    #[test]
    fn earlier_staker_earns_from_later_deposit_fee() {
        let mut ledger = Ledger::new();
        let mut alice = user();
        let mut bob = user();
        let gross = 10 * ONE_TOKEN;

        ledger.stake(&mut alice, gross, None, T0 + 1).unwrap();
        let total_before_bob = ledger.pool.total_staked;
        let out = ledger.stake(&mut bob, gross, None, T0 + 2).unwrap();
        assert!(out.stakers_share_injected);

        let bob_fee = bps_of(gross, FEE_STAKERS_BPS).unwrap();
        let expected = (alice.principal as u128 * bob_fee as u128 / total_before_bob as u128) as u64;
        let pending = alice.pending_reward(ledger.pool.reward_per_share).unwrap();
        assert!(pending <= expected && expected - pending <= 1);
        assert_eq!(bob.pending_reward(ledger.pool.reward_per_share).unwrap(), 0);
    }

    #[test]
    fn topping_up_keeps_pending_reward() {
        let mut ledger = Ledger::new();
        let mut alice = user();
        let mut bob = user();

        ledger.stake(&mut alice, 10 * ONE_TOKEN, None, T0 + 1).unwrap();
        ledger.stake(&mut bob, 10 * ONE_TOKEN, None, T0 + 2).unwrap();
        let before = alice.pending_reward(ledger.pool.reward_per_share).unwrap();
        assert!(before > 0);

        let out = ledger.stake(&mut alice, ONE_TOKEN, None, T0 + 3).unwrap();
        assert!(!out.new_staker);
        let after = alice.pending_reward(ledger.pool.reward_per_share).unwrap();
        // Carried amount plus alice's old principal's cut of her own top-up fee.
        assert_eq!(out.carried_pending, after);
        assert!(after >= before);
    }

    #[test]
    fn claim_pays_once() {
        let mut ledger = Ledger::new();
        let mut alice = user();
        let mut bob = user();
        ledger.stake(&mut alice, 10 * ONE_TOKEN, None, T0 + 1).unwrap();
        ledger.stake(&mut bob, 10 * ONE_TOKEN, None, T0 + 2).unwrap();

        let paid = claim(&mut ledger.pool, &mut alice, T0 + 3).unwrap();
        assert!(paid > 0);
        assert_eq!(alice.total_claimed, paid);
        assert_eq!(alice.last_claim_time, T0 + 3);
        assert_eq!(ledger.pool.total_rewards_claimed, paid);
        assert_eq!(
            claim(&mut ledger.pool, &mut alice, T0 + 4).unwrap_err(),
            StakingError::NoRewardsAvailable.into()
        );
    }

    #[test]
    fn referrer_is_paid_directly_and_bound_once() {
        let mut ledger = Ledger::new();
        let mut alice = user();
        let referrer = Pubkey::new_unique();

        let out = ledger
            .stake(&mut alice, ONE_TOKEN, Some(referrer), T0 + 1)
            .unwrap();
        assert!(out.referrer_bound);
        assert_eq!(out.referral_recipient, Some(referrer));
        assert_eq!(ledger.referral.balance, 0);
        assert_eq!(out.vault_inflow().unwrap(), ONE_TOKEN - 20_000_000);

        let out = ledger
            .stake(&mut alice, ONE_TOKEN, Some(Pubkey::new_unique()), T0 + 2)
            .unwrap();
        assert!(!out.referrer_bound);
        assert_eq!(out.referral_recipient, Some(referrer));

        // Exits keep paying the bound referrer, and the binding outlives a zero balance.
        let principal = alice.principal;
        let out = ledger.unstake(&mut alice, principal, T0 + 3).unwrap();
        assert_eq!(out.referral_recipient, Some(referrer));
        assert_eq!(alice.referrer, Some(referrer));
    }

    #[test]
    fn self_referral_is_ignored() {
        let mut ledger = Ledger::new();
        let mut alice = user();
        let own = alice.owner;
        let out = ledger.stake(&mut alice, ONE_TOKEN, Some(own), T0 + 1).unwrap();
        assert!(!out.referrer_bound);
        assert_eq!(out.referral_recipient, None);
        assert_eq!(ledger.referral.balance, 5_000_000);
    }

    #[test]
    fn referrer_cannot_be_attached_after_a_full_exit() {
        let mut ledger = Ledger::new();
        let mut alice = user();
        ledger.stake(&mut alice, ONE_TOKEN, None, T0 + 1).unwrap();
        let principal = alice.principal;
        ledger.unstake(&mut alice, principal, T0 + 2).unwrap();

        let referral_before = ledger.referral.balance;
        let out = ledger
            .stake(&mut alice, ONE_TOKEN, Some(Pubkey::new_unique()), T0 + 3)
            .unwrap();
        assert!(out.new_staker);
        assert!(!out.referrer_bound);
        assert_eq!(out.referral_recipient, None);
        assert_eq!(alice.referrer, None);
        assert_eq!(ledger.referral.balance, referral_before + out.fees.referral);
    }

    #[test]
    fn unstake_leaves_countdown_and_ring_alone() {
        let mut ledger = Ledger::new();
        let mut alice = user();
        ledger.stake(&mut alice, 5 * ONE_TOKEN, None, T0 + 10).unwrap();

        let expiry = ledger.bonus.expiry_time;
        let last_activity = ledger.bonus.last_activity_time;
        let count = ledger.bonus.count;
        let cursor = ledger.bonus.write_cursor;

        ledger.unstake(&mut alice, 2 * ONE_TOKEN, T0 + SECONDS_PER_HOUR).unwrap();
        assert_eq!(ledger.bonus.expiry_time, expiry);
        assert_eq!(ledger.bonus.last_activity_time, last_activity);
        assert_eq!(ledger.bonus.count, count);
        assert_eq!(ledger.bonus.write_cursor, cursor);
    }

    #[test]
    fn restaker_is_counted_again_only_after_full_exit() {
        let mut ledger = Ledger::new();
        let mut alice = user();
        ledger.stake(&mut alice, ONE_TOKEN, None, T0 + 1).unwrap();
        ledger.stake(&mut alice, ONE_TOKEN, None, T0 + 2).unwrap();
        assert_eq!(ledger.pool.total_stakers, 1);

        let principal = alice.principal;
        ledger.unstake(&mut alice, principal, T0 + 3).unwrap();
        assert_eq!(ledger.pool.total_stakers, 0);

        let out = ledger.stake(&mut alice, ONE_TOKEN, None, T0 + 4).unwrap();
        assert!(out.new_staker);
        assert_eq!(ledger.pool.total_stakers, 1);
        assert_eq!(alice.first_stake_time, T0 + 1);
    }

    #[test]
    fn small_stakes_skip_the_ring() {
        let mut ledger = Ledger::new();
        let mut alice = user();
        let out = ledger.stake(&mut alice, ONE_TOKEN - 1, None, T0 + 1).unwrap();
        assert_eq!(out.ring_entry, None);
        assert_eq!(ledger.bonus.count, 0);
        assert_eq!(ledger.bonus.last_activity_time, T0);
    }

    #[test]
    fn stake_and_unstake_enforce_minimums() {
        let mut ledger = Ledger::new();
        let mut alice = user();
        assert_eq!(
            ledger.stake(&mut alice, MIN_STAKE - 1, None, T0).unwrap_err(),
            StakingError::StakeTooSmall.into()
        );
        assert_eq!(
            ledger.unstake(&mut alice, MIN_UNSTAKE, T0).unwrap_err(),
            StakingError::NoStakePosition.into()
        );
        ledger.stake(&mut alice, ONE_TOKEN, None, T0).unwrap();
        assert_eq!(
            ledger.unstake(&mut alice, MIN_UNSTAKE - 1, T0).unwrap_err(),
            StakingError::UnstakeTooSmall.into()
        );
        assert_eq!(
            ledger.unstake(&mut alice, ONE_TOKEN, T0).unwrap_err(),
            StakingError::InsufficientPrincipal.into()
        );
    }

    #[test]
    fn unstake_pays_pending_and_spreads_fee_over_the_rest() {
        let mut ledger = Ledger::new();
        let mut alice = user();
        let mut bob = user();
        ledger.stake(&mut alice, 10 * ONE_TOKEN, None, T0 + 1).unwrap();
        ledger.stake(&mut bob, 10 * ONE_TOKEN, None, T0 + 2).unwrap();

        let pending = alice.pending_reward(ledger.pool.reward_per_share).unwrap();
        let principal = alice.principal;
        let out = ledger.unstake(&mut alice, principal, T0 + 3).unwrap();
        assert_eq!(out.rewards_paid, pending);
        assert!(out.stakers_share_injected);

        // Bob is the only one left and collects the exit fee's stakers' share.
        let bob_pending = bob.pending_reward(ledger.pool.reward_per_share).unwrap();
        assert!(out.fees.stakers - bob_pending <= 1);
    }

    #[test]
    fn bonus_distribution_waits_for_expiry() {
        let mut ledger = Ledger::new();
        let mut alice = user();
        ledger.stake(&mut alice, 2 * ONE_TOKEN, None, T0 + 60).unwrap();

        assert_eq!(
            distribute_bonus(&mut ledger.pool, &mut ledger.bonus, T0 + 120).unwrap_err(),
            StakingError::BonusNotExpired.into()
        );

        // Countdown lapses (inactivity triggers first: 6h after the last qualifying stake).
        let now = T0 + 60 + BONUS_INACTIVITY_LIMIT;
        let balance = ledger.bonus.balance;
        let out = distribute_bonus(&mut ledger.pool, &mut ledger.bonus, now).unwrap();
        assert_eq!(out.split.total, balance);
        assert_eq!(out.split.payouts[0], out.split.to_last_ten);
        assert_eq!(out.injected, out.split.to_stakers);
        assert_eq!(out.carried_forward, out.split.carry);
        assert_eq!(ledger.bonus.expiry_time, now + BONUS_COUNTDOWN_SECONDS);
        assert_eq!(ledger.bonus.count, 1);

        // A racing second caller sees the restarted countdown.
        assert_eq!(
            distribute_bonus(&mut ledger.pool, &mut ledger.bonus, now).unwrap_err(),
            StakingError::BonusNotExpired.into()
        );
    }

    #[test]
    fn bonus_stakers_share_carries_when_nothing_is_staked() {
        let mut ledger = Ledger::new();
        ledger.bonus.balance = 1_000;
        let now = T0 + BONUS_COUNTDOWN_SECONDS;
        let out = distribute_bonus(&mut ledger.pool, &mut ledger.bonus, now).unwrap();
        assert_eq!(out.injected, 0);
        assert_eq!(out.split.last_ten_paid, 0);
        assert_eq!(ledger.bonus.balance, 1_000);
        assert_eq!(ledger.pool.reward_per_share, 0);
    }

    #[test]
    fn empty_bonus_pool_cannot_distribute() {
        let mut ledger = Ledger::new();
        let now = T0 + BONUS_COUNTDOWN_SECONDS;
        assert_eq!(
            distribute_bonus(&mut ledger.pool, &mut ledger.bonus, now).unwrap_err(),
            StakingError::BonusPoolEmpty.into()
        );
    }

    #[test]
    fn forced_referral_distribution_halves_the_pool() {
        let mut ledger = Ledger::new();
        let mut alice = user();
        ledger.stake(&mut alice, 10 * ONE_TOKEN, None, T0 + 1).unwrap();
        let balance = ledger.referral.balance;
        assert_eq!(balance, 50_000_000);

        assert_eq!(
            distribute_referral(&mut ledger.pool, &mut ledger.referral, false, T0 + 2).unwrap_err(),
            StakingError::ReferralPeriodNotEnded.into()
        );

        let out = distribute_referral(&mut ledger.pool, &mut ledger.referral, true, T0 + 2).unwrap();
        assert_eq!(out.injected, balance / 2);
        assert!(out.carried_forward.abs_diff(out.injected) <= 1);
        assert_eq!(out.next_distribution, T0 + 2 + REFERRAL_PERIOD_SECONDS);
        let pending = alice.pending_reward(ledger.pool.reward_per_share).unwrap();
        assert!(out.injected - pending <= 1);
    }

    #[test]
    fn referral_distribution_is_due_after_the_period() {
        let mut ledger = Ledger::new();
        ledger.referral.balance = 11;
        let due = ledger.referral.next_distribution;
        let out = distribute_referral(&mut ledger.pool, &mut ledger.referral, false, due).unwrap();
        // Nothing staked: the half stays in the pool.
        assert_eq!(out.injected, 0);
        assert_eq!(ledger.referral.balance, 11);
        assert_eq!(ledger.referral.last_distribution, due);
    }

    /// Deterministic pseudo-random operation sequence checking the ledger
    /// invariants after every step.
    #[test]
    fn invariants_hold_over_mixed_operations() {
        let mut ledger = Ledger::new();
        let referrer = Pubkey::new_unique();
        let mut users: Vec<UserPosition> = (0..5).map(|_| user()).collect();

        let mut seed: u64 = 0x9E37_79B9_7F4A_7C15;
        let mut next = move |bound: u64| {
            seed = seed
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            (seed >> 33) % bound
        };

        let mut now = T0;
        let mut vault: u128 = 0;
        let mut last_rps = 0u128;
        let mut operations: u128 = 0;

        for _ in 0..600 {
            now += next(3 * SECONDS_PER_HOUR as u64) as i64;
            let idx = next(users.len() as u64) as usize;
            let position = &mut users[idx];

            match next(6) {
                0 | 1 => {
                    let gross = MIN_STAKE + next(30 * ONE_TOKEN);
                    let hint = if idx % 2 == 0 { Some(referrer) } else { None };
                    let out = ledger.stake(position, gross, hint, now).unwrap();
                    vault += out.vault_inflow().unwrap() as u128;
                }
                2 => {
                    if position.principal >= MIN_UNSTAKE {
                        let gross = MIN_UNSTAKE + next(position.principal - MIN_UNSTAKE + 1);
                        let out = ledger.unstake(position, gross, now).unwrap();
                        let external = out.fees.external(out.referral_recipient.is_some()).unwrap();
                        vault -= (out.user_payout().unwrap() + external) as u128;
                    }
                }
                3 => {
                    if position.pending_reward(ledger.pool.reward_per_share).unwrap() > 0 {
                        let paid = claim(&mut ledger.pool, position, now).unwrap();
                        vault -= paid as u128;
                    }
                }
                4 => {
                    if ledger.bonus.is_expired(now) && ledger.bonus.balance > 0 {
                        let out = distribute_bonus(&mut ledger.pool, &mut ledger.bonus, now).unwrap();
                        vault -= out.split.last_ten_paid as u128;
                    }
                }
                _ => {
                    if ledger.referral.balance > 0 {
                        distribute_referral(&mut ledger.pool, &mut ledger.referral, true, now).unwrap();
                    }
                }
            }
            operations += 1;

            // Monotonic accumulator.
            assert!(ledger.pool.reward_per_share >= last_rps);
            last_rps = ledger.pool.reward_per_share;

            // Aggregates match the positions.
            let principal_sum: u64 = users.iter().map(|u| u.principal).sum();
            let active = users.iter().filter(|u| u.is_active()).count() as u64;
            assert_eq!(ledger.pool.total_staked, principal_sum);
            assert_eq!(ledger.pool.total_stakers, active);

            // No negative pending anywhere.
            let mut owed: u128 = 0;
            for u in &users {
                let accrued = accrued_reward(u.principal, ledger.pool.reward_per_share).unwrap();
                assert!(accrued >= u.reward_debt);
                owed += u.pending_reward(ledger.pool.reward_per_share).unwrap() as u128;
            }

            // Ring bound and qualifying entries only.
            assert!(ledger.bonus.count as usize <= BONUS_BUFFER_SIZE);
            assert!(ledger.bonus.entries().iter().all(|e| e.amount >= MIN_BONUS_QUALIFY));

            // Vault covers principal and both pools, and (up to one unit of
            // rounding per settlement) everything owed to stakers.
            let reserved =
                reserved_balance(&ledger.pool, &ledger.bonus, &ledger.referral).unwrap() as u128;
            assert!(vault >= reserved);
            assert!(vault + operations >= reserved + owed);
        }
    }
}
