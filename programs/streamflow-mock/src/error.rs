use anchor_lang::prelude::*;

#[error_code]
pub enum StreamflowMockError {
    #[msg("Signer is not the stream authority")]
    Unauthorized,

    #[msg("Locked amount exceeds the stream allocation")]
    LockedExceedsAllocation,

    #[msg("Release exceeds the locked amount")]
    InsufficientLocked,

    #[msg("Recipient does not match the existing stream")]
    RecipientMismatch,
}
