use anchor_lang::prelude::*;
use anchor_spl::token::{self, Mint, Token, TokenAccount, Transfer};
use cp_amm_stub::{
    cpi::accounts::ClaimFees,
    program::CpAmmStub,
    state::{Pool, Position},
};
use streamflow_mock::program::StreamflowMock;

use crate::{
    distribution::{investor_payout, DayPlan, PayoutTerms},
    error::HonoraryFeeError,
    events::*,
    investor_accounts::AccountParser,
    state::*,
    utils::MathUtil,
    validation::PoolValidator,
};

#[derive(Accounts)]
pub struct CrankDistributePage<'info> {
    /// The vault identifier
    /// CHECK: Used as seed for PDA derivation
    pub vault: UncheckedAccount<'info>,

    #[account(
        seeds = [POLICY_SEED, vault.key().as_ref()],
        bump = policy.bump
    )]
    pub policy: Box<Account<'info, Policy>>,

    #[account(
        mut,
        seeds = [PROGRESS_SEED, vault.key().as_ref()],
        bump = progress.bump
    )]
    pub progress: Box<Account<'info, Progress>>,

    pub cp_amm_pool: Box<Account<'info, Pool>>,

    #[account(
        seeds = [HONORARY_POSITION_SEED, cp_amm_pool.key().as_ref()],
        bump = honorary_position.bump,
        constraint = honorary_position.vault == vault.key() @ HonoraryFeeError::InvalidPositionOwner
    )]
    pub honorary_position: Box<Account<'info, HonoraryPosition>>,

    /// PDA that owns the honorary position and both treasuries
    /// CHECK: This is a PDA
    #[account(
        seeds = [VAULT_SEED, vault.key().as_ref(), INVESTOR_FEE_POS_OWNER_SEED],
        bump
    )]
    pub position_owner_pda: UncheckedAccount<'info>,

    #[account(
        mut,
        address = honorary_position.position @ HonoraryFeeError::InvalidPositionOwner
    )]
    pub cp_amm_position: Box<Account<'info, Position>>,

    /// cp-amm mint authority for claimed fees
    /// CHECK: seeds are verified by cp-amm
    pub cp_amm_pool_signer: UncheckedAccount<'info>,

    #[account(
        mut,
        address = honorary_position.base_mint @ HonoraryFeeError::InvalidPoolTokenOrder
    )]
    pub base_mint: Box<Account<'info, Mint>>,

    #[account(
        mut,
        address = policy.quote_mint @ HonoraryFeeError::InvalidQuoteMint
    )]
    pub quote_mint: Box<Account<'info, Mint>>,

    #[account(
        mut,
        associated_token::mint = base_mint,
        associated_token::authority = position_owner_pda,
    )]
    pub base_treasury: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        associated_token::mint = quote_mint,
        associated_token::authority = position_owner_pda,
    )]
    pub quote_treasury: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        address = policy.creator_quote_ata @ HonoraryFeeError::InvalidCreatorAccount
    )]
    pub creator_quote_ata: Box<Account<'info, TokenAccount>>,

    pub cp_amm_program: Program<'info, CpAmmStub>,

    pub streamflow_program: Program<'info, StreamflowMock>,

    pub token_program: Program<'info, Token>,
}

/// Totals for one processed page
struct PageOutcome {
    paid_total: u64,
    investor_count: u32,
    locked_in_page: u64,
}

/// Permissionless crank. Page 0 of a day claims fees, every page pays its
/// investors, the final page pays the creator and closes the day.
///
/// Remaining accounts: `(stream_lock, investor_quote_ata)` pairs.
pub fn handle_crank_distribute_page<'info>(
    ctx: Context<'_, '_, 'info, 'info, CrankDistributePage<'info>>,
    page_index: u32,
    is_final_page_in_day: bool,
    locked_total: u64,
) -> Result<()> {
    let now_ts = Clock::get()?.unix_timestamp;
    let owner_bump = ctx.bumps.position_owner_pda;
    let remaining_accounts = ctx.remaining_accounts;
    let accounts = ctx.accounts;

    match accounts
        .progress
        .admit_page(page_index, now_ts, locked_total)?
    {
        PageAdmission::OpenDay => accounts.open_day(owner_bump, now_ts, locked_total)?,
        // Retried pages are a no-op so cranks can resend safely
        PageAdmission::Replay => {
            msg!("Page {} of day {} already processed", page_index, accounts.progress.day_id);
            emit!(InvestorPayoutPage {
                vault: accounts.vault.key(),
                day_id: accounts.progress.day_id,
                page_index,
                investor_count: 0,
                paid_total: 0,
                timestamp: now_ts,
            });
            return Ok(());
        }
        PageAdmission::Continue => {}
    }

    let outcome = accounts.pay_investor_page(remaining_accounts, owner_bump, page_index)?;

    accounts
        .progress
        .record_page(page_index, outcome.paid_total, outcome.locked_in_page)?;

    emit!(InvestorPayoutPage {
        vault: accounts.vault.key(),
        day_id: accounts.progress.day_id,
        page_index,
        investor_count: outcome.investor_count,
        paid_total: outcome.paid_total,
        timestamp: now_ts,
    });

    msg!(
        "Page {} paid {} to {} investors",
        page_index,
        outcome.paid_total,
        outcome.investor_count
    );

    if is_final_page_in_day {
        accounts.close_day(owner_bump, now_ts)?;
    }

    Ok(())
}

impl<'info> CrankDistributePage<'info> {
    /// Reset the day, claim from the position and fix today's split
    fn open_day(&mut self, owner_bump: u8, now_ts: i64, locked_total: u64) -> Result<()> {
        let day_id = MathUtil::day_id(now_ts);
        let carry_in = self.progress.carry_over_lamports;
        self.progress.open_day(day_id, now_ts, locked_total);

        let claimed = self.claim_fees_from_position(owner_bump)?;

        // The treasury must cover both today's claim and what was carried in
        require!(
            self.quote_treasury.amount >= MathUtil::safe_add(claimed, carry_in)?,
            HonoraryFeeError::InsufficientTreasury
        );

        let plan = DayPlan::compute(
            claimed,
            carry_in,
            locked_total,
            &PayoutTerms::from(&**self.policy),
        )?;

        let progress = &mut self.progress;
        progress.claimed_today = claimed;
        progress.investor_pot = plan.investor_pot;
        progress.creator_share = plan.creator_share;
        progress.cap_excess = plan.cap_excess;
        progress.carry_over_lamports = 0;

        emit!(QuoteFeesClaimed {
            vault: self.vault.key(),
            day_id,
            amount_claimed: claimed,
            quote_mint: self.policy.quote_mint,
            timestamp: now_ts,
        });

        msg!(
            "Opened day {}: claimed {}, investor pot {}, creator share {}",
            day_id,
            claimed,
            plan.investor_pot,
            plan.creator_share
        );

        Ok(())
    }

    /// Claim fees from the honorary position into the treasuries.
    /// Returns the quote amount claimed.
    fn claim_fees_from_position(&mut self, owner_bump: u8) -> Result<u64> {
        if !self.cp_amm_position.has_pending_fees() {
            msg!("No fees accrued on {}", self.cp_amm_position.key());
            return Ok(0);
        }

        let quote_before = self.quote_treasury.amount;
        let base_before = self.base_treasury.amount;

        let vault_key = self.vault.key();
        let seeds = &[
            VAULT_SEED,
            vault_key.as_ref(),
            INVESTOR_FEE_POS_OWNER_SEED,
            &[owner_bump],
        ];
        let signer = &[&seeds[..]];

        let cpi_accounts = ClaimFees {
            pool: self.cp_amm_pool.to_account_info(),
            position: self.cp_amm_position.to_account_info(),
            owner: self.position_owner_pda.to_account_info(),
            base_mint: self.base_mint.to_account_info(),
            quote_mint: self.quote_mint.to_account_info(),
            base_treasury: self.base_treasury.to_account_info(),
            quote_treasury: self.quote_treasury.to_account_info(),
            pool_signer: self.cp_amm_pool_signer.to_account_info(),
            token_program: self.token_program.to_account_info(),
        };
        let cpi_ctx = CpiContext::new_with_signer(
            self.cp_amm_program.to_account_info(),
            cpi_accounts,
            signer,
        );
        cp_amm_stub::cpi::claim_fees(cpi_ctx)?;

        self.quote_treasury.reload()?;
        self.base_treasury.reload()?;

        let claimed_base = self.base_treasury.amount.saturating_sub(base_before);
        PoolValidator::detect_base_fees_in_claim(claimed_base)?;

        Ok(self.quote_treasury.amount.saturating_sub(quote_before))
    }

    /// Pay every investor of one page pro-rata to their locked amount
    fn pay_investor_page(
        &mut self,
        remaining_accounts: &'info [AccountInfo<'info>],
        owner_bump: u8,
        page_index: u32,
    ) -> Result<PageOutcome> {
        let terms = PayoutTerms::from(&**self.policy);
        let quote_mint = self.policy.quote_mint;
        let vault = self.vault.key();
        let day_id = self.progress.day_id;
        let investor_pot = self.progress.investor_pot;
        let snapshot = self.progress.locked_total_snapshot;

        let investors = AccountParser::parse_investor_page(
            remaining_accounts,
            &self.streamflow_program.key(),
            &quote_mint,
        )?;

        let locked_in_page = investors.iter().try_fold(0u64, |acc, investor| {
            MathUtil::safe_add(acc, investor.lock.locked_amount)
        })?;
        // Weights are fixed against the snapshot, so the pages can never
        // claim more locked tokens than it holds
        require!(
            MathUtil::safe_add(self.progress.locked_seen_today, locked_in_page)? <= snapshot,
            HonoraryFeeError::LockedTotalMismatch
        );

        let mut paid_total = 0u64;
        for investor in &investors {
            let payout = match investor_payout(
                investor_pot,
                investor.lock.locked_amount,
                snapshot,
                terms.min_payout_lamports,
            )? {
                Some(amount) => amount,
                None => continue,
            };

            if !AccountParser::can_receive_quote(investor.quote_ata, &quote_mint)? {
                msg!("Investor ATA {} not ready, keeping {}", investor.quote_ata.key, payout);
                continue;
            }

            let already_paid = MathUtil::safe_add(self.progress.distributed_today, paid_total)?;
            require!(
                MathUtil::safe_add(already_paid, payout)? <= investor_pot,
                HonoraryFeeError::InsufficientTreasury
            );

            self.transfer_from_treasury(investor.quote_ata.clone(), payout, owner_bump)?;
            paid_total = MathUtil::safe_add(paid_total, payout)?;

            emit!(InvestorPayout {
                vault,
                day_id,
                page_index,
                stream: investor.stream,
                investor_quote_ata: investor.quote_ata.key(),
                locked_amount: investor.lock.locked_amount,
                amount: payout,
            });
        }

        Ok(PageOutcome {
            paid_total,
            investor_count: investors.len() as u32,
            locked_in_page,
        })
    }

    /// Pay the creator, roll what investors did not get into the carry-over
    fn close_day(&mut self, owner_bump: u8, now_ts: i64) -> Result<()> {
        let creator_amount = self.progress.creator_share;

        if creator_amount > 0 {
            self.quote_treasury.reload()?;
            require!(
                self.quote_treasury.amount >= creator_amount,
                HonoraryFeeError::InsufficientTreasury
            );
            let creator_ata = self.creator_quote_ata.to_account_info();
            self.transfer_from_treasury(creator_ata, creator_amount, owner_bump)?;
        }

        let carry_over = self.progress.close_day()?;
        let progress = &self.progress;

        emit!(CreatorPayoutDayClosed {
            vault: self.vault.key(),
            day_id: progress.day_id,
            creator_amount,
            total_claimed_today: progress.claimed_today,
            total_distributed_to_investors: progress.distributed_today,
            carry_over,
            timestamp: now_ts,
        });

        msg!(
            "Day {} complete - paid {} to creator, carrying {}",
            progress.day_id,
            creator_amount,
            carry_over
        );

        Ok(())
    }

    /// Transfer quote out of the treasury, signed by the owner PDA
    fn transfer_from_treasury(
        &self,
        to: AccountInfo<'info>,
        amount: u64,
        owner_bump: u8,
    ) -> Result<()> {
        let vault_key = self.vault.key();
        let seeds = &[
            VAULT_SEED,
            vault_key.as_ref(),
            INVESTOR_FEE_POS_OWNER_SEED,
            &[owner_bump],
        ];
        let signer = &[&seeds[..]];

        let cpi_accounts = Transfer {
            from: self.quote_treasury.to_account_info(),
            to,
            authority: self.position_owner_pda.to_account_info(),
        };
        let cpi_ctx = CpiContext::new_with_signer(
            self.token_program.to_account_info(),
            cpi_accounts,
            signer,
        );

        token::transfer(cpi_ctx, amount)
    }
}
