use anchor_lang::prelude::*;

#[error_code]
pub enum AmmError {
    #[msg("Position does not belong to this pool")]
    InvalidPool,

    #[msg("Lower tick must be below upper tick")]
    InvalidTickRange,

    #[msg("Signer is not the position owner")]
    Unauthorized,

    #[msg("Mint does not match the pool")]
    InvalidMint,
}
