use anchor_lang::prelude::*;

use crate::error::AmmError;

pub const POOL_SEED: &[u8] = b"pool";
pub const POOL_SIGNER_SEED: &[u8] = b"pool_signer";
pub const POSITION_SEED: &[u8] = b"position";

/// A base/quote pair. The pool signer PDA is the mint authority of both
/// mints so that claimed fees can be minted straight into treasuries.
#[account]
pub struct Pool {
    pub token_base_mint: Pubkey,
    pub token_quote_mint: Pubkey,
    pub bump: u8,
}

impl Pool {
    pub const SIZE: usize = 32 + // token_base_mint
        32 +   // token_quote_mint
        1;     // bump
}

/// Fee-bearing position inside a pool
#[account]
pub struct Position {
    pub owner: Pubkey,
    pub pool: Pubkey,
    pub tick_lower: i32,
    pub tick_upper: i32,
    /// Only quote-side fees are expected to accrue on this position
    pub quote_only: bool,
    pub accrued_base: u64,
    pub accrued_quote: u64,
    pub bump: u8,
}

impl Position {
    pub const SIZE: usize = 32 + // owner
        32 +   // pool
        4 +    // tick_lower
        4 +    // tick_upper
        1 +    // quote_only
        8 +    // accrued_base
        8 +    // accrued_quote
        1;     // bump

    pub fn open(
        &mut self,
        owner: Pubkey,
        pool: Pubkey,
        tick_lower: i32,
        tick_upper: i32,
        quote_only: bool,
        bump: u8,
    ) -> Result<()> {
        require!(tick_lower < tick_upper, AmmError::InvalidTickRange);
        self.owner = owner;
        self.pool = pool;
        self.tick_lower = tick_lower;
        self.tick_upper = tick_upper;
        self.quote_only = quote_only;
        self.accrued_base = 0;
        self.accrued_quote = 0;
        self.bump = bump;
        Ok(())
    }

    pub fn has_pending_fees(&self) -> bool {
        self.accrued_base > 0 || self.accrued_quote > 0
    }

    /// Credit fees; accrual saturates instead of failing
    pub fn accrue(&mut self, add_base: u64, add_quote: u64) {
        self.accrued_base = self.accrued_base.saturating_add(add_base);
        self.accrued_quote = self.accrued_quote.saturating_add(add_quote);
    }

    /// Return (base, quote) accrued so far and zero both
    pub fn take_accrued(&mut self) -> (u64, u64) {
        let taken = (self.accrued_base, self.accrued_quote);
        self.accrued_base = 0;
        self.accrued_quote = 0;
        taken
    }
}

pub fn get_pool_pda(base_mint: &Pubkey, quote_mint: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[POOL_SEED, base_mint.as_ref(), quote_mint.as_ref()],
        program_id,
    )
}

pub fn get_pool_signer_pda(pool: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[POOL_SIGNER_SEED, pool.as_ref()], program_id)
}

pub fn get_position_pda(pool: &Pubkey, owner: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[POSITION_SEED, pool.as_ref(), owner.as_ref()],
        program_id,
    )
}
