use anchor_lang::prelude::*;

use crate::{
    state::Policy,
    utils::{MathUtil, BPS_DENOMINATOR},
};

/// The policy terms the daily split depends on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PayoutTerms {
    pub investor_fee_share_bps: u16,
    pub daily_cap_lamports: Option<u64>,
    pub min_payout_lamports: u64,
    pub y0: u64,
}

impl From<&Policy> for PayoutTerms {
    fn from(policy: &Policy) -> Self {
        Self {
            investor_fee_share_bps: policy.investor_fee_share_bps,
            daily_cap_lamports: policy.daily_cap_lamports,
            min_payout_lamports: policy.min_payout_lamports,
            y0: policy.y0,
        }
    }
}

/// How a day's claimed quote (plus carry-over) is split.
///
/// `investor_pot + cap_excess + creator_share == claimed + carry_in`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DayPlan {
    pub eligible_bps: u16,
    /// Investor part of today's claim, before carry and cap
    pub investor_fee_quote: u64,
    /// What the pages may pay out today
    pub investor_pot: u64,
    /// Investor quote above the daily cap, carried to the next day
    pub cap_excess: u64,
    /// Paid to the creator when the day closes
    pub creator_share: u64,
}

impl DayPlan {
    pub fn compute(
        claimed: u64,
        carry_in: u64,
        locked_total: u64,
        terms: &PayoutTerms,
    ) -> Result<Self> {
        let eligible_bps =
            MathUtil::eligible_share_bps(locked_total, terms.y0, terms.investor_fee_share_bps);
        let investor_fee_quote =
            MathUtil::mul_div_floor(claimed, eligible_bps as u64, BPS_DENOMINATOR)?;

        // Everything unlocked: nobody left to pay, old carry goes to the creator too
        if locked_total == 0 {
            return Ok(Self {
                eligible_bps,
                investor_fee_quote,
                investor_pot: 0,
                cap_excess: 0,
                creator_share: MathUtil::safe_add(claimed, carry_in)?,
            });
        }

        let distributable = MathUtil::safe_add(investor_fee_quote, carry_in)?;
        let (investor_pot, cap_excess) =
            MathUtil::apply_daily_cap(distributable, terms.daily_cap_lamports);

        Ok(Self {
            eligible_bps,
            investor_fee_quote,
            investor_pot,
            cap_excess,
            creator_share: MathUtil::safe_sub(claimed, investor_fee_quote)?,
        })
    }
}

/// Amount owed to one investor, or `None` when it stays in the pot as dust
pub fn investor_payout(
    investor_pot: u64,
    locked_amount: u64,
    locked_total_snapshot: u64,
    min_payout_lamports: u64,
) -> Result<Option<u64>> {
    if locked_total_snapshot == 0 || locked_amount == 0 {
        return Ok(None);
    }
    let payout = MathUtil::mul_div_floor(investor_pot, locked_amount, locked_total_snapshot)?;
    if payout == 0 || payout < min_payout_lamports {
        return Ok(None);
    }
    Ok(Some(payout))
}

/// Carry-over for the next day once today's pages are done
pub fn next_carry_over(investor_pot: u64, distributed: u64, cap_excess: u64) -> Result<u64> {
    MathUtil::safe_add(MathUtil::safe_sub(investor_pot, distributed)?, cap_excess)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(share_bps: u16, cap: Option<u64>, min_payout: u64, y0: u64) -> PayoutTerms {
        PayoutTerms {
            investor_fee_share_bps: share_bps,
            daily_cap_lamports: cap,
            min_payout_lamports: min_payout,
            y0,
        }
    }

    #[test]
    fn fully_locked_investors_get_policy_share() {
        let plan = DayPlan::compute(1_000_000, 0, 10_000, &terms(6_000, None, 0, 10_000)).unwrap();
        assert_eq!(plan.eligible_bps, 6_000);
        assert_eq!(plan.investor_pot, 600_000);
        assert_eq!(plan.creator_share, 400_000);
        assert_eq!(plan.cap_excess, 0);
    }

    #[test]
    fn partially_unlocked_share_follows_locked_fraction() {
        // 25% still locked, policy would allow 60%
        let plan = DayPlan::compute(1_000_000, 0, 2_500, &terms(6_000, None, 0, 10_000)).unwrap();
        assert_eq!(plan.eligible_bps, 2_500);
        assert_eq!(plan.investor_pot, 250_000);
        assert_eq!(plan.creator_share, 750_000);
    }

    #[test]
    fn all_unlocked_sends_everything_to_creator() {
        let plan = DayPlan::compute(1_000, 55, 0, &terms(6_000, None, 0, 10_000)).unwrap();
        assert_eq!(plan.investor_pot, 0);
        assert_eq!(plan.cap_excess, 0);
        assert_eq!(plan.creator_share, 1_055);
    }

    #[test]
    fn carry_joins_pot_and_cap_holds_back_excess() {
        let plan = DayPlan::compute(1_000, 100, 10_000, &terms(5_000, Some(450), 0, 10_000)).unwrap();
        // 500 investor fee + 100 carry, capped at 450
        assert_eq!(plan.investor_fee_quote, 500);
        assert_eq!(plan.investor_pot, 450);
        assert_eq!(plan.cap_excess, 150);
        assert_eq!(plan.creator_share, 500);
        assert_eq!(
            plan.investor_pot + plan.cap_excess + plan.creator_share,
            1_000 + 100
        );
    }

    #[test]
    fn zero_claim_still_distributes_carry() {
        let plan = DayPlan::compute(0, 300, 10_000, &terms(5_000, None, 0, 10_000)).unwrap();
        assert_eq!(plan.investor_pot, 300);
        assert_eq!(plan.creator_share, 0);
    }

    #[test]
    fn payout_is_pro_rata_and_floored() {
        assert_eq!(investor_payout(1_000, 1, 3, 0).unwrap(), Some(333));
        assert_eq!(investor_payout(1_000, 2, 3, 0).unwrap(), Some(666));
    }

    #[test]
    fn payout_below_minimum_is_dust() {
        assert_eq!(investor_payout(1_000, 1, 3, 334).unwrap(), None);
        assert_eq!(investor_payout(1_000, 1, 3, 333).unwrap(), Some(333));
        assert_eq!(investor_payout(1, 1, 3, 0).unwrap(), None);
    }

    #[test]
    fn unlocked_investor_gets_nothing() {
        assert_eq!(investor_payout(1_000, 0, 3, 0).unwrap(), None);
        assert_eq!(investor_payout(1_000, 5, 0, 0).unwrap(), None);
    }

    #[test]
    fn leftover_pot_and_cap_excess_roll_over() {
        assert_eq!(next_carry_over(450, 449, 150).unwrap(), 151);
        assert!(next_carry_over(450, 451, 0).is_err());
    }
}
