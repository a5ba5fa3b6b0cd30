use anchor_lang::prelude::*;

use crate::{distribution::next_carry_over, error::HonoraryFeeError, utils::MathUtil};

/// Distribution policy for one vault, fixed at initialization
#[account]
pub struct Policy {
    /// The vault this policy belongs to (PDA seed)
    pub vault: Pubkey,

    /// The quote mint fees are collected in
    pub quote_mint: Pubkey,

    /// Creator's quote ATA for remainder distribution
    pub creator_quote_ata: Pubkey,

    /// Maximum investor share of claimed fees in basis points (0-10000)
    pub investor_fee_share_bps: u16,

    /// Optional cap on what investors can receive per day
    pub daily_cap_lamports: Option<u64>,

    /// Payouts below this amount are kept as dust
    pub min_payout_lamports: u64,

    /// Total investor allocation minted at TGE
    pub y0: u64,

    /// Bump for PDA derivation
    pub bump: u8,
}

impl Policy {
    pub const LEN: usize = 8 + // discriminator
        32 +   // vault
        32 +   // quote_mint
        32 +   // creator_quote_ata
        2 +    // investor_fee_share_bps
        1 + 8 + // daily_cap_lamports
        8 +    // min_payout_lamports
        8 +    // y0
        1;     // bump
}

/// Metadata about the position held by the owner PDA
#[account]
pub struct HonoraryPosition {
    pub vault: Pubkey,
    pub pool: Pubkey,
    pub position: Pubkey,
    pub owner_pda: Pubkey,
    pub quote_mint: Pubkey,
    pub base_mint: Pubkey,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub bump: u8,
}

impl HonoraryPosition {
    pub const LEN: usize = 8 + // discriminator
        32 * 6 + // vault, pool, position, owner_pda, quote_mint, base_mint
        4 +    // tick_lower
        4 +    // tick_upper
        1;     // bump
}

/// Per-day distribution progress
#[account]
pub struct Progress {
    pub vault: Pubkey,

    /// floor(open timestamp / 86400) of the current or last day
    pub day_id: u64,

    /// Timestamp the current or last day was opened at
    pub last_distribution_ts: i64,

    /// Next page expected by the crank
    pub cursor_idx: u32,

    /// Whether the current day's distribution is complete
    pub is_closed: bool,

    /// Quote fees claimed when the day opened
    pub claimed_today: u64,

    /// Quote reserved for investors today
    pub investor_pot: u64,

    /// Quote owed to the creator at day close
    pub creator_share: u64,

    /// Investor quote held back by the daily cap
    pub cap_excess: u64,

    /// Quote paid to investors so far today
    pub distributed_today: u64,

    /// Undistributed investor quote rolled into the next day
    pub carry_over_lamports: u64,

    /// Locked total all of today's weights are computed against
    pub locked_total_snapshot: u64,

    /// Locked amounts of investors paged through so far today
    pub locked_seen_today: u64,

    /// Bit i set once page i has paid out today
    pub processed_pages: [u8; 64],

    pub bump: u8,
}

/// What the crank should do with an incoming page
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageAdmission {
    /// Page 0 after the gate opened: claim and start a new day
    OpenDay,
    /// Page already paid out, nothing to do
    Replay,
    /// Next page of the open day
    Continue,
}

impl Progress {
    pub const MAX_PAGES: usize = 512;
    pub const BITMAP_BYTES: usize = 64;

    pub const LEN: usize = 8 + // discriminator
        32 +   // vault
        8 +    // day_id
        8 +    // last_distribution_ts
        4 +    // cursor_idx
        1 +    // is_closed
        8 * 8 + // claimed_today .. locked_seen_today
        Self::BITMAP_BYTES + // processed_pages
        1;     // bump

    /// Clear every per-day field and open `day_id` at `now_ts`.
    /// The carry-over survives, it belongs to the next pot.
    pub fn open_day(&mut self, day_id: u64, now_ts: i64, locked_total: u64) {
        self.day_id = day_id;
        self.last_distribution_ts = now_ts;
        self.cursor_idx = 0;
        self.is_closed = false;
        self.claimed_today = 0;
        self.investor_pot = 0;
        self.creator_share = 0;
        self.cap_excess = 0;
        self.distributed_today = 0;
        self.locked_total_snapshot = locked_total;
        self.locked_seen_today = 0;
        self.processed_pages = [0u8; Self::BITMAP_BYTES];
    }

    pub fn is_page_processed(&self, idx: u32) -> bool {
        let idx = idx as usize;
        if idx >= Self::MAX_PAGES {
            return false;
        }
        self.processed_pages[idx / 8] & (1 << (idx % 8)) != 0
    }

    pub fn mark_page_processed(&mut self, idx: u32) -> Result<()> {
        let idx = idx as usize;
        require!(idx < Self::MAX_PAGES, HonoraryFeeError::InvalidPaginationCursor);
        self.processed_pages[idx / 8] |= 1 << (idx % 8);
        Ok(())
    }

    /// Whether a new day may open at `now_ts`
    pub fn day_gate_open(&self, now_ts: i64) -> bool {
        self.is_closed
            && (self.last_distribution_ts == 0
                || MathUtil::is_24h_elapsed(self.last_distribution_ts, now_ts))
    }

    /// Decide how to handle `page_index` at `now_ts`.
    ///
    /// Processed pages replay as a no-op whether or not the day is closed or
    /// the gate has reopened. Only page 0 can open a new day.
    pub fn admit_page(
        &self,
        page_index: u32,
        now_ts: i64,
        locked_total: u64,
    ) -> Result<PageAdmission> {
        if self.day_gate_open(now_ts) && page_index == 0 {
            return Ok(PageAdmission::OpenDay);
        }
        if self.is_page_processed(page_index) {
            return Ok(PageAdmission::Replay);
        }
        if self.day_gate_open(now_ts) {
            return err!(HonoraryFeeError::InvalidPaginationCursor);
        }
        require!(!self.is_closed, HonoraryFeeError::DayGateNotOpen);
        require!(
            page_index == self.cursor_idx,
            HonoraryFeeError::InvalidPaginationCursor
        );
        require!(
            locked_total == self.locked_total_snapshot,
            HonoraryFeeError::LockedTotalMismatch
        );
        Ok(PageAdmission::Continue)
    }

    /// Book a paid page and advance the cursor
    pub fn record_page(&mut self, page_index: u32, paid: u64, locked_in_page: u64) -> Result<()> {
        self.distributed_today = MathUtil::safe_add(self.distributed_today, paid)?;
        self.locked_seen_today = MathUtil::safe_add(self.locked_seen_today, locked_in_page)?;
        self.mark_page_processed(page_index)?;
        self.cursor_idx = page_index
            .checked_add(1)
            .ok_or(HonoraryFeeError::ArithmeticOverflow)?;
        Ok(())
    }

    /// Close the day and return the carry-over for the next one
    pub fn close_day(&mut self) -> Result<u64> {
        self.carry_over_lamports =
            next_carry_over(self.investor_pot, self.distributed_today, self.cap_excess)?;
        self.is_closed = true;
        Ok(self.carry_over_lamports)
    }
}

/// Seeds for PDA derivation
pub const VAULT_SEED: &[u8] = b"vault";
pub const INVESTOR_FEE_POS_OWNER_SEED: &[u8] = b"investor_fee_pos_owner";
pub const POLICY_SEED: &[u8] = b"policy";
pub const PROGRESS_SEED: &[u8] = b"progress";
pub const HONORARY_POSITION_SEED: &[u8] = b"honorary_position";

/// Helper functions for PDA derivation
pub fn get_investor_fee_position_owner_pda(
    vault: &Pubkey,
    program_id: &Pubkey,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[VAULT_SEED, vault.as_ref(), INVESTOR_FEE_POS_OWNER_SEED],
        program_id,
    )
}

pub fn get_policy_pda(
    vault: &Pubkey,
    program_id: &Pubkey,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[POLICY_SEED, vault.as_ref()], program_id)
}

pub fn get_progress_pda(
    vault: &Pubkey,
    program_id: &Pubkey,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[PROGRESS_SEED, vault.as_ref()], program_id)
}

pub fn get_honorary_position_pda(
    pool: &Pubkey,
    program_id: &Pubkey,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[HONORARY_POSITION_SEED, pool.as_ref()], program_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::SECONDS_PER_DAY;
    use anchor_lang::error::Error;

    const T0: i64 = 1_700_000_000;

    fn error_code<T: std::fmt::Debug>(result: Result<T>) -> u32 {
        match result {
            Err(Error::AnchorError(e)) => e.error_code_number,
            other => panic!("expected anchor error, got {:?}", other),
        }
    }

    /// A day opened at `T0` that paid pages 0..=2 and then closed
    fn day_closed_at_t0() -> Progress {
        let mut progress = closed_progress();
        progress.open_day(MathUtil::day_id(T0), T0, 1_000);
        progress.investor_pot = 900;
        progress.cap_excess = 50;
        for page in 0..3 {
            progress.record_page(page, 100, 200).unwrap();
        }
        progress.close_day().unwrap();
        progress
    }

    fn closed_progress() -> Progress {
        Progress {
            vault: Pubkey::new_unique(),
            day_id: 0,
            last_distribution_ts: 0,
            cursor_idx: 0,
            is_closed: true,
            claimed_today: 0,
            investor_pot: 0,
            creator_share: 0,
            cap_excess: 0,
            distributed_today: 0,
            carry_over_lamports: 0,
            locked_total_snapshot: 0,
            locked_seen_today: 0,
            processed_pages: [0u8; Progress::BITMAP_BYTES],
            bump: 255,
        }
    }

    #[test]
    fn account_lengths_match_serialized_layout() {
        let mut buf = Vec::new();
        closed_progress().try_serialize(&mut buf).unwrap();
        assert_eq!(buf.len(), Progress::LEN);

        let policy = Policy {
            vault: Pubkey::new_unique(),
            quote_mint: Pubkey::new_unique(),
            creator_quote_ata: Pubkey::new_unique(),
            investor_fee_share_bps: 5_000,
            daily_cap_lamports: Some(1_000),
            min_payout_lamports: 10,
            y0: 1_000_000,
            bump: 1,
        };
        let mut buf = Vec::new();
        policy.try_serialize(&mut buf).unwrap();
        assert_eq!(buf.len(), Policy::LEN);

        let position = HonoraryPosition {
            vault: Pubkey::new_unique(),
            pool: Pubkey::new_unique(),
            position: Pubkey::new_unique(),
            owner_pda: Pubkey::new_unique(),
            quote_mint: Pubkey::new_unique(),
            base_mint: Pubkey::new_unique(),
            tick_lower: -10,
            tick_upper: 10,
            bump: 2,
        };
        let mut buf = Vec::new();
        position.try_serialize(&mut buf).unwrap();
        assert_eq!(buf.len(), HonoraryPosition::LEN);
    }

    #[test]
    fn bitmap_covers_every_page() {
        assert_eq!(Progress::BITMAP_BYTES * 8, Progress::MAX_PAGES);
    }

    #[test]
    fn pages_are_tracked_in_bitmap() {
        let mut progress = closed_progress();
        assert!(!progress.is_page_processed(0));

        progress.mark_page_processed(0).unwrap();
        progress.mark_page_processed(9).unwrap();
        progress.mark_page_processed(511).unwrap();

        assert!(progress.is_page_processed(0));
        assert!(progress.is_page_processed(9));
        assert!(progress.is_page_processed(511));
        assert!(!progress.is_page_processed(8));
        assert!(!progress.is_page_processed(10));
    }

    #[test]
    fn out_of_range_page_is_rejected() {
        let mut progress = closed_progress();
        assert!(!progress.is_page_processed(512));
        assert!(progress.mark_page_processed(512).is_err());
    }

    #[test]
    fn open_day_resets_pages_but_keeps_carry_over() {
        let mut progress = closed_progress();
        progress.carry_over_lamports = 77;
        progress.distributed_today = 500;
        progress.cursor_idx = 3;
        progress.mark_page_processed(2).unwrap();

        progress.open_day(19_000, 19_000 * 86_400 + 5, 1_234);

        assert_eq!(progress.day_id, 19_000);
        assert_eq!(progress.last_distribution_ts, 19_000 * 86_400 + 5);
        assert_eq!(progress.cursor_idx, 0);
        assert!(!progress.is_closed);
        assert_eq!(progress.distributed_today, 0);
        assert_eq!(progress.locked_total_snapshot, 1_234);
        assert_eq!(progress.carry_over_lamports, 77);
        assert!(!progress.is_page_processed(2));
    }

    #[test]
    fn pdas_are_scoped_per_vault() {
        let program_id = crate::ID;
        let a = Pubkey::new_unique();
        let b = Pubkey::new_unique();
        assert_ne!(get_policy_pda(&a, &program_id).0, get_policy_pda(&b, &program_id).0);
        assert_ne!(get_policy_pda(&a, &program_id).0, get_progress_pda(&a, &program_id).0);
        assert_ne!(
            get_investor_fee_position_owner_pda(&a, &program_id).0,
            get_investor_fee_position_owner_pda(&b, &program_id).0
        );
    }

    #[test]
    fn first_day_opens_without_waiting() {
        let progress = closed_progress();
        assert_eq!(progress.admit_page(0, 5, 1_000).unwrap(), PageAdmission::OpenDay);
        assert_eq!(
            error_code(progress.admit_page(1, 5, 1_000)),
            u32::from(HonoraryFeeError::InvalidPaginationCursor)
        );
    }

    #[test]
    fn closed_day_stays_gated_until_24h_pass() {
        let progress = day_closed_at_t0();
        let before = T0 + SECONDS_PER_DAY - 1;

        assert!(!progress.day_gate_open(before));
        assert_eq!(
            error_code(progress.admit_page(3, before, 1_000)),
            u32::from(HonoraryFeeError::DayGateNotOpen)
        );
        assert_eq!(
            progress.admit_page(0, T0 + SECONDS_PER_DAY, 1_000).unwrap(),
            PageAdmission::OpenDay
        );
    }

    #[test]
    fn processed_pages_replay_before_and_after_the_gate_reopens() {
        let progress = day_closed_at_t0();

        for page in 0..3 {
            assert_eq!(progress.admit_page(page, T0 + 10, 0).unwrap(), PageAdmission::Replay);
        }
        // A late retry of a non-zero page after 24h is still a no-op
        assert_eq!(
            progress.admit_page(1, T0 + SECONDS_PER_DAY, 0).unwrap(),
            PageAdmission::Replay
        );
        assert_eq!(
            progress.admit_page(2, T0 + 3 * SECONDS_PER_DAY, 0).unwrap(),
            PageAdmission::Replay
        );
        assert_eq!(
            error_code(progress.admit_page(5, T0 + SECONDS_PER_DAY, 0)),
            u32::from(HonoraryFeeError::InvalidPaginationCursor)
        );
    }

    #[test]
    fn open_day_continues_past_24h() {
        let mut progress = closed_progress();
        progress.open_day(MathUtil::day_id(T0), T0, 1_000);
        progress.record_page(0, 0, 400).unwrap();

        assert_eq!(
            progress.admit_page(1, T0 + 2 * SECONDS_PER_DAY, 1_000).unwrap(),
            PageAdmission::Continue
        );
        assert_eq!(progress.admit_page(0, T0 + 10, 1_000).unwrap(), PageAdmission::Replay);
    }

    #[test]
    fn open_day_enforces_cursor_and_locked_total() {
        let mut progress = closed_progress();
        progress.open_day(MathUtil::day_id(T0), T0, 1_000);
        progress.record_page(0, 0, 400).unwrap();

        assert_eq!(
            error_code(progress.admit_page(2, T0 + 10, 1_000)),
            u32::from(HonoraryFeeError::InvalidPaginationCursor)
        );
        assert_eq!(
            error_code(progress.admit_page(1, T0 + 10, 999)),
            u32::from(HonoraryFeeError::LockedTotalMismatch)
        );
    }

    #[test]
    fn recorded_pages_advance_cursor_and_totals() {
        let mut progress = closed_progress();
        progress.open_day(MathUtil::day_id(T0), T0, 1_000);
        progress.record_page(0, 120, 300).unwrap();
        progress.record_page(1, 80, 200).unwrap();

        assert_eq!(progress.cursor_idx, 2);
        assert_eq!(progress.distributed_today, 200);
        assert_eq!(progress.locked_seen_today, 500);
        assert!(progress.is_page_processed(1));
        assert!(progress.record_page(512, 0, 0).is_err());
    }

    #[test]
    fn closing_carries_leftover_pot_and_cap_excess() {
        let progress = day_closed_at_t0();
        assert!(progress.is_closed);
        // 900 pot - 300 paid + 50 held back by the cap
        assert_eq!(progress.carry_over_lamports, 650);

        let mut overpaid = closed_progress();
        overpaid.open_day(1, T0, 1_000);
        overpaid.investor_pot = 10;
        overpaid.distributed_today = 11;
        assert!(overpaid.close_day().is_err());
    }
}
