use anchor_lang::prelude::*;

use crate::error::HonoraryFeeError;

pub const BPS_DENOMINATOR: u64 = 10_000;
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Mathematical utilities with overflow protection
pub struct MathUtil;

impl MathUtil {
    pub fn safe_add(a: u64, b: u64) -> Result<u64> {
        a.checked_add(b).ok_or(error!(HonoraryFeeError::ArithmeticOverflow))
    }

    pub fn safe_sub(a: u64, b: u64) -> Result<u64> {
        a.checked_sub(b).ok_or(error!(HonoraryFeeError::ArithmeticOverflow))
    }

    /// floor(a * b / denominator), computed in u128
    pub fn mul_div_floor(a: u64, b: u64, denominator: u64) -> Result<u64> {
        if denominator == 0 {
            return Err(error!(HonoraryFeeError::ArithmeticOverflow));
        }
        let value = (a as u128) * (b as u128) / (denominator as u128);
        u64::try_from(value).map_err(|_| error!(HonoraryFeeError::ArithmeticOverflow))
    }

    /// min(investor_fee_share_bps, floor(locked_total / y0 * 10000))
    pub fn eligible_share_bps(
        locked_total: u64,
        y0: u64,
        investor_fee_share_bps: u16,
    ) -> u16 {
        if y0 == 0 {
            return 0;
        }
        // f_locked(t) = locked_total(t) / Y0, in bps; saturates above 100%
        let f_locked_bps = (locked_total as u128 * BPS_DENOMINATOR as u128) / y0 as u128;
        f_locked_bps.min(investor_fee_share_bps as u128) as u16
    }

    /// Split `requested` into (allowed, held back) under an optional cap
    pub fn apply_daily_cap(requested: u64, daily_cap: Option<u64>) -> (u64, u64) {
        match daily_cap {
            Some(cap) if requested > cap => (cap, requested - cap),
            _ => (requested, 0),
        }
    }

    pub fn day_id(unix_timestamp: i64) -> u64 {
        if unix_timestamp <= 0 {
            return 0;
        }
        (unix_timestamp / SECONDS_PER_DAY) as u64
    }

    /// Check if 24 hours have passed since last distribution
    pub fn is_24h_elapsed(last_ts: i64, current_ts: i64) -> bool {
        current_ts >= last_ts.saturating_add(SECONDS_PER_DAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul_div_floors_without_intermediate_overflow() {
        assert_eq!(MathUtil::mul_div_floor(u64::MAX, u64::MAX, u64::MAX).unwrap(), u64::MAX);
        assert_eq!(MathUtil::mul_div_floor(10, 1, 3).unwrap(), 3);
        assert!(MathUtil::mul_div_floor(u64::MAX, 2, 1).is_err());
        assert!(MathUtil::mul_div_floor(1, 1, 0).is_err());
    }

    #[test]
    fn eligible_share_is_capped_by_policy() {
        // 100% still locked, policy allows 50%
        assert_eq!(MathUtil::eligible_share_bps(1_000, 1_000, 5_000), 5_000);
        // 30% still locked
        assert_eq!(MathUtil::eligible_share_bps(300, 1_000, 5_000), 3_000);
        // floor of 1/3
        assert_eq!(MathUtil::eligible_share_bps(1, 3, 10_000), 3_333);
    }

    #[test]
    fn eligible_share_is_zero_without_allocation_or_lock() {
        assert_eq!(MathUtil::eligible_share_bps(1_000, 0, 5_000), 0);
        assert_eq!(MathUtil::eligible_share_bps(0, 1_000, 5_000), 0);
    }

    #[test]
    fn locked_above_allocation_still_respects_policy() {
        assert_eq!(MathUtil::eligible_share_bps(u64::MAX, 1, 7_500), 7_500);
    }

    #[test]
    fn daily_cap_holds_back_excess() {
        assert_eq!(MathUtil::apply_daily_cap(1_000, None), (1_000, 0));
        assert_eq!(MathUtil::apply_daily_cap(1_000, Some(400)), (400, 600));
        assert_eq!(MathUtil::apply_daily_cap(300, Some(400)), (300, 0));
        assert_eq!(MathUtil::apply_daily_cap(300, Some(0)), (0, 300));
    }

    #[test]
    fn day_gate_needs_full_24h() {
        assert!(!MathUtil::is_24h_elapsed(1_000, 1_000 + SECONDS_PER_DAY - 1));
        assert!(MathUtil::is_24h_elapsed(1_000, 1_000 + SECONDS_PER_DAY));
        assert!(MathUtil::is_24h_elapsed(0, SECONDS_PER_DAY));
    }

    #[test]
    fn day_id_is_floor_of_days_since_epoch() {
        assert_eq!(MathUtil::day_id(-5), 0);
        assert_eq!(MathUtil::day_id(SECONDS_PER_DAY - 1), 0);
        assert_eq!(MathUtil::day_id(SECONDS_PER_DAY * 3 + 7), 3);
    }
}
