use anchor_lang::prelude::*;

#[error_code]
pub enum HonoraryFeeError {
    #[msg("Position may accrue base token fees - not quote-only")]
    NotQuoteOnly,

    #[msg("Base token fees observed during claim - distribution aborted")]
    BaseFeesObserved,

    #[msg("Invalid pool token order - quote mint not identified")]
    InvalidPoolTokenOrder,

    #[msg("Invalid quote mint for this vault")]
    InvalidQuoteMint,

    #[msg("Position tick range is invalid")]
    InvalidTickRange,

    #[msg("Investor fee share must be at most 10000 bps")]
    InvalidFeeShare,

    #[msg("Position not owned by program PDA")]
    InvalidPositionOwner,

    #[msg("24 hour gate since last distribution day not yet elapsed")]
    DayGateNotOpen,

    #[msg("Invalid pagination cursor")]
    InvalidPaginationCursor,

    #[msg("Locked total does not match today's snapshot")]
    LockedTotalMismatch,

    #[msg("Invalid Streamflow stream account")]
    StreamflowReadError,

    #[msg("Investor account is not the recipient's quote ATA")]
    InvalidInvestorAccount,

    #[msg("Investor listed twice in one page")]
    DuplicateInvestor,

    #[msg("Remaining accounts must come in (stream, ATA) pairs")]
    UnpairedInvestorAccounts,

    #[msg("Creator quote account does not match policy")]
    InvalidCreatorAccount,

    #[msg("Treasury balance too low for distribution")]
    InsufficientTreasury,

    #[msg("Arithmetic overflow")]
    ArithmeticOverflow,
}
