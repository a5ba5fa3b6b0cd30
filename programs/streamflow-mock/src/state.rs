use anchor_lang::prelude::*;

use crate::error::StreamflowMockError;

pub const STREAM_LOCK_SEED: &[u8] = b"stream_lock";

/// Locked-amount record for a single vesting stream
#[account]
#[derive(Default)]
pub struct StreamLock {
    pub stream_pubkey: Pubkey,
    /// Wallet the stream vests to
    pub recipient: Pubkey,
    /// Key allowed to update this record
    pub authority: Pubkey,
    /// Tokens still locked in the stream
    pub locked_amount: u64,
    /// Allocation the stream started with
    pub y0: u64,
    pub bump: u8,
}

impl StreamLock {
    pub const SIZE: usize = 32 + // stream_pubkey
        32 +   // recipient
        32 +   // authority
        8 +    // locked_amount
        8 +    // y0
        1;     // bump

    /// The authority signs every write, so a zeroed authority means the
    /// record was never set
    pub fn is_initialized(&self) -> bool {
        self.authority != Pubkey::default()
    }

    pub fn initialize(&mut self, stream: Pubkey, recipient: Pubkey, authority: Pubkey, bump: u8) {
        self.stream_pubkey = stream;
        self.recipient = recipient;
        self.authority = authority;
        self.bump = bump;
    }

    /// Overwrite the amounts. Only the stream's authority may do so and the
    /// recipient cannot change.
    pub fn apply_update(
        &mut self,
        authority: &Pubkey,
        recipient: &Pubkey,
        locked_amount: u64,
        y0: u64,
    ) -> Result<()> {
        require!(locked_amount <= y0, StreamflowMockError::LockedExceedsAllocation);
        require_keys_eq!(self.authority, *authority, StreamflowMockError::Unauthorized);
        require_keys_eq!(self.recipient, *recipient, StreamflowMockError::RecipientMismatch);
        self.locked_amount = locked_amount;
        self.y0 = y0;
        Ok(())
    }

    pub fn release(&mut self, amount: u64) -> Result<()> {
        self.locked_amount = self
            .locked_amount
            .checked_sub(amount)
            .ok_or(StreamflowMockError::InsufficientLocked)?;
        Ok(())
    }
}

pub fn get_stream_lock_pda(stream: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[STREAM_LOCK_SEED, stream.as_ref()], program_id)
}
