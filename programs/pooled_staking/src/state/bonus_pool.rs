use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::StakingError;
use crate::math::{bps_of, to_u64};

/// One slot of the last-ten ring.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BufferEntry {
    pub investor: Pubkey,
    /// Gross amount of the qualifying stake
    pub amount: u64,
}

impl BufferEntry {
    pub const LEN: usize = 32 + 8;
}

/// Countdown-gated prize pool.
/// PDA: ["bonus_pool"]
///
/// `buffer` is a ring of the ten most recent qualifying stakes. Slots fill
/// from index 0, so while `count < 10` the occupied slots are `0..count`.
#[account]
#[derive(Default)]
pub struct BonusPool {
    pub balance: u64,

    /// Distribution opens at this time
    pub expiry_time: i64,

    /// Last qualifying stake (or distribution); drives the inactivity trigger
    pub last_activity_time: i64,

    pub buffer: [BufferEntry; 10],

    /// Slot the next qualifying stake overwrites (0..9)
    pub write_cursor: u8,

    /// Occupied slots (0..=10)
    pub count: u8,

    /// Display metric: distinct investors seen entering the ring
    pub total_participants_ever: u64,

    pub total_distributed: u64,
    pub rounds: u64,

    pub bump: u8,
}

/// Outcome of splitting the bonus balance, before anything is moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BonusSplit {
    pub total: u64,
    pub to_last_ten: u64,
    pub to_stakers: u64,
    pub carry: u64,
    /// Per-slot payouts, aligned with `BonusPool::entries`
    pub payouts: [u64; BONUS_BUFFER_SIZE],
    pub last_ten_paid: u64,
}

impl BonusPool {
    pub const LEN: usize = 8 + // discriminator
        8 + // balance
        8 + // expiry_time
        8 + // last_activity_time
        (BufferEntry::LEN * BONUS_BUFFER_SIZE) + // buffer
        1 + // write_cursor
        1 + // count
        8 + // total_participants_ever
        8 + // total_distributed
        8 + // rounds
        1; // bump

    /// Fresh pool with the countdown starting at `now`.
    pub fn start(&mut self, now: i64, bump: u8) -> Result<()> {
        self.balance = 0;
        self.expiry_time = now
            .checked_add(BONUS_COUNTDOWN_SECONDS)
            .ok_or(StakingError::MathOverflow)?;
        self.last_activity_time = now;
        self.buffer = [BufferEntry::default(); BONUS_BUFFER_SIZE];
        self.write_cursor = 0;
        self.count = 0;
        self.total_participants_ever = 0;
        self.total_distributed = 0;
        self.rounds = 0;
        self.bump = bump;
        Ok(())
    }

    /// Countdown lapsed, or no qualifying stake for the inactivity limit.
    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.expiry_time
            || now.saturating_sub(self.last_activity_time) >= BONUS_INACTIVITY_LIMIT
    }

    pub fn seconds_remaining(&self, now: i64) -> i64 {
        self.expiry_time.saturating_sub(now).max(0)
    }

    pub fn deposit(&mut self, amount: u64) -> Result<()> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(StakingError::MathOverflow)?;
        Ok(())
    }

    /// Push the expiry out by one extension, never past `now + 12h`.
    /// Returns the new expiry.
    pub fn extend_countdown(&mut self, now: i64) -> Result<i64> {
        let extended = self
            .expiry_time
            .checked_add(BONUS_EXTENSION_SECONDS)
            .ok_or(StakingError::MathOverflow)?;
        let ceiling = now
            .checked_add(BONUS_COUNTDOWN_SECONDS)
            .ok_or(StakingError::MathOverflow)?;
        self.expiry_time = extended.min(ceiling);
        self.last_activity_time = now;
        Ok(self.expiry_time)
    }

    /// Occupied slots of the ring.
    pub fn entries(&self) -> &[BufferEntry] {
        let count = (self.count as usize).min(BONUS_BUFFER_SIZE);
        &self.buffer[..count]
    }

    /// Write a qualifying stake at the cursor and advance it.
    ///
    /// The participant counter moves only for investors with no entry left
    /// in the ring. Returns the slot written.
    pub fn record_entry(&mut self, investor: Pubkey, amount: u64) -> Result<u8> {
        require!(
            (self.count as usize) <= BONUS_BUFFER_SIZE
                && (self.write_cursor as usize) < BONUS_BUFFER_SIZE,
            StakingError::CircularBufferFull
        );

        let returning = self.entries().iter().any(|e| e.investor == investor);

        let slot = self.write_cursor;
        self.buffer[slot as usize] = BufferEntry { investor, amount };
        self.write_cursor = ((slot as usize + 1) % BONUS_BUFFER_SIZE) as u8;
        self.count = (self.count as usize + 1).min(BONUS_BUFFER_SIZE) as u8;

        if !returning {
            self.total_participants_ever = self
                .total_participants_ever
                .checked_add(1)
                .ok_or(StakingError::MathOverflow)?;
        }
        Ok(slot)
    }

    /// Split the balance 40/40/20 and size each ring payout.
    ///
    /// Payout for slot `i` is `amount_i * to_last_ten / Σ amounts`, floored;
    /// the floors' remainder is not paid. With an empty ring nothing is paid.
    pub fn split(&self) -> Result<BonusSplit> {
        let total = self.balance;
        let to_last_ten = bps_of(total, BONUS_LAST_TEN_BPS)?;
        let to_stakers = bps_of(total, BONUS_STAKERS_BPS)?;
        let carry = total
            .checked_sub(to_last_ten)
            .and_then(|v| v.checked_sub(to_stakers))
            .ok_or(StakingError::MathUnderflow)?;

        let mut payouts = [0u64; BONUS_BUFFER_SIZE];
        let mut last_ten_paid: u64 = 0;

        let entries = self.entries();
        let invested: u128 = entries.iter().map(|e| e.amount as u128).sum();
        if to_last_ten > 0 && invested > 0 {
            for (i, entry) in entries.iter().enumerate() {
                let share = (entry.amount as u128)
                    .checked_mul(to_last_ten as u128)
                    .ok_or(StakingError::MathOverflow)?
                    / invested;
                payouts[i] = to_u64(share)?;
                last_ten_paid = last_ten_paid
                    .checked_add(payouts[i])
                    .ok_or(StakingError::MathOverflow)?;
            }
        }
        require!(last_ten_paid <= to_last_ten, StakingError::InvalidCalculation);

        Ok(BonusSplit {
            total,
            to_last_ten,
            to_stakers,
            carry,
            payouts,
            last_ten_paid,
        })
    }

    /// Restart the countdown after a distribution. The ring is kept.
    pub fn restart(&mut self, now: i64) -> Result<()> {
        self.expiry_time = now
            .checked_add(BONUS_COUNTDOWN_SECONDS)
            .ok_or(StakingError::MathOverflow)?;
        self.last_activity_time = now;
        self.rounds = self.rounds.checked_add(1).ok_or(StakingError::MathOverflow)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: i64 = 1_700_000_000;

    fn started() -> BonusPool {
        let mut pool = BonusPool::default();
        pool.start(T0, 255).unwrap();
        pool
    }

    #[test]
    fn fresh_pool_counts_down_twelve_hours() {
        let pool = started();
        assert!(!pool.is_expired(T0));
        assert_eq!(pool.seconds_remaining(T0), BONUS_COUNTDOWN_SECONDS);
        assert!(pool.is_expired(T0 + BONUS_COUNTDOWN_SECONDS));
    }

    #[test]
    fn inactivity_expires_before_countdown() {
        let pool = started();
        assert!(!pool.is_expired(T0 + BONUS_INACTIVITY_LIMIT - 1));
        assert!(pool.is_expired(T0 + BONUS_INACTIVITY_LIMIT));
    }

    #[test]
    fn extension_is_capped_at_twelve_hours_from_now() {
        let mut pool = started();
        // Already at the ceiling: extending cannot push past now + 12h.
        assert_eq!(pool.extend_countdown(T0).unwrap(), T0 + BONUS_COUNTDOWN_SECONDS);

        let later = T0 + 2 * SECONDS_PER_HOUR;
        assert_eq!(
            pool.extend_countdown(later).unwrap(),
            T0 + BONUS_COUNTDOWN_SECONDS + BONUS_EXTENSION_SECONDS
        );
        assert_eq!(pool.last_activity_time, later);
    }

    #[test]
    fn ring_wraps_and_bounds_count() {
        let mut pool = started();
        let investors: Vec<Pubkey> = (0..13).map(|_| Pubkey::new_unique()).collect();
        for (i, investor) in investors.iter().enumerate() {
            let slot = pool.record_entry(*investor, ONE_TOKEN + i as u64).unwrap();
            assert_eq!(slot as usize, i % BONUS_BUFFER_SIZE);
            assert!(pool.count as usize <= BONUS_BUFFER_SIZE);
        }
        assert_eq!(pool.count as usize, BONUS_BUFFER_SIZE);
        assert_eq!(pool.write_cursor, 3);
        assert_eq!(pool.entries().len(), BONUS_BUFFER_SIZE);
        // Oldest three were overwritten by the newest three.
        assert_eq!(pool.buffer[0].investor, investors[10]);
        assert_eq!(pool.buffer[2].investor, investors[12]);
        assert_eq!(pool.buffer[3].investor, investors[3]);
        assert_eq!(pool.total_participants_ever, 13);
    }

    #[test]
    fn returning_investor_is_not_recounted() {
        let mut pool = started();
        let alice = Pubkey::new_unique();
        pool.record_entry(alice, ONE_TOKEN).unwrap();
        pool.record_entry(alice, 2 * ONE_TOKEN).unwrap();
        assert_eq!(pool.count, 2);
        assert_eq!(pool.total_participants_ever, 1);
    }

    #[test]
    fn corrupted_cursor_is_rejected() {
        let mut pool = started();
        pool.write_cursor = 10;
        assert_eq!(
            pool.record_entry(Pubkey::new_unique(), ONE_TOKEN).unwrap_err(),
            StakingError::CircularBufferFull.into()
        );
    }

    #[test]
    fn split_is_forty_forty_twenty_with_pro_rata_ring() {
        let mut pool = started();
        pool.balance = 1_000;
        pool.record_entry(Pubkey::new_unique(), 1).unwrap();
        pool.record_entry(Pubkey::new_unique(), 2).unwrap();

        let split = pool.split().unwrap();
        assert_eq!(split.to_last_ten, 400);
        assert_eq!(split.to_stakers, 400);
        assert_eq!(split.carry, 200);
        // 400 * 1/3 = 133, 400 * 2/3 = 266; one unit stays behind.
        assert_eq!(split.payouts[0], 133);
        assert_eq!(split.payouts[1], 266);
        assert_eq!(split.last_ten_paid, 399);
    }

    #[test]
    fn empty_ring_pays_nothing() {
        let mut pool = started();
        pool.balance = 1_000;
        let split = pool.split().unwrap();
        assert_eq!(split.last_ten_paid, 0);
        assert_eq!(split.payouts, [0; BONUS_BUFFER_SIZE]);
    }

    #[test]
    fn restart_keeps_ring() {
        let mut pool = started();
        pool.record_entry(Pubkey::new_unique(), ONE_TOKEN).unwrap();
        let later = T0 + BONUS_COUNTDOWN_SECONDS;
        pool.restart(later).unwrap();
        assert_eq!(pool.expiry_time, later + BONUS_COUNTDOWN_SECONDS);
        assert_eq!(pool.count, 1);
        assert_eq!(pool.rounds, 1);
        assert!(!pool.is_expired(later));
    }
}
