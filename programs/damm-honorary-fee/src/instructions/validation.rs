use anchor_lang::prelude::*;
use cp_amm_stub::state::{Pool, Position};

use crate::error::HonoraryFeeError;

pub const MIN_TICK: i32 = -443_636;
pub const MAX_TICK: i32 = 443_636;

/// Pool validation utilities to ensure quote-only fee accrual
pub struct PoolValidator;

impl PoolValidator {
    /// Preflight run before any position is created. Rejects anything that
    /// could leave the position accruing base token fees.
    pub fn validate_quote_only_config(
        pool: &Pool,
        quote_mint: &Pubkey,
        base_mint: &Pubkey,
        tick_lower: i32,
        tick_upper: i32,
    ) -> Result<()> {
        Self::validate_token_order(pool, quote_mint, base_mint)?;
        Self::validate_tick_range(tick_lower, tick_upper)?;
        Ok(())
    }

    /// The supplied mints must be the pool's quote and base mints, in that role
    pub fn validate_token_order(
        pool: &Pool,
        quote_mint: &Pubkey,
        base_mint: &Pubkey,
    ) -> Result<()> {
        require_keys_neq!(*quote_mint, *base_mint, HonoraryFeeError::InvalidPoolTokenOrder);
        require_keys_eq!(
            pool.token_quote_mint,
            *quote_mint,
            HonoraryFeeError::InvalidQuoteMint
        );
        require_keys_eq!(
            pool.token_base_mint,
            *base_mint,
            HonoraryFeeError::InvalidPoolTokenOrder
        );
        Ok(())
    }

    pub fn validate_tick_range(tick_lower: i32, tick_upper: i32) -> Result<()> {
        require!(
            tick_lower < tick_upper && tick_lower >= MIN_TICK && tick_upper <= MAX_TICK,
            HonoraryFeeError::InvalidTickRange
        );
        Ok(())
    }

    /// Check the position the AMM actually created for us
    pub fn validate_created_position(
        position: &Position,
        pool: &Pubkey,
        owner_pda: &Pubkey,
    ) -> Result<()> {
        require_keys_eq!(position.owner, *owner_pda, HonoraryFeeError::InvalidPositionOwner);
        require_keys_eq!(position.pool, *pool, HonoraryFeeError::InvalidPositionOwner);
        require!(position.quote_only, HonoraryFeeError::NotQuoteOnly);
        Ok(())
    }

    /// Any base token movement during a claim aborts the whole crank
    pub fn detect_base_fees_in_claim(claimed_base: u64) -> Result<()> {
        if claimed_base > 0 {
            msg!("Base fees detected: {} - aborting distribution", claimed_base);
            return err!(HonoraryFeeError::BaseFeesObserved);
        }
        Ok(())
    }
}
