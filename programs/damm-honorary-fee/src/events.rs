use anchor_lang::prelude::*;

/// Event emitted when honorary position is initialized
#[event]
pub struct HonoraryPositionInitialized {
    pub vault: Pubkey,
    pub pool: Pubkey,
    pub position: Pubkey,
    pub owner_pda: Pubkey,
    pub quote_mint: Pubkey,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub timestamp: i64,
}

/// Event emitted when quote fees are claimed from the honorary position
#[event]
pub struct QuoteFeesClaimed {
    pub vault: Pubkey,
    pub day_id: u64,
    pub amount_claimed: u64,
    pub quote_mint: Pubkey,
    pub timestamp: i64,
}

/// Event emitted for every investor paid
#[event]
pub struct InvestorPayout {
    pub vault: Pubkey,
    pub day_id: u64,
    pub page_index: u32,
    pub stream: Pubkey,
    pub investor_quote_ata: Pubkey,
    pub locked_amount: u64,
    pub amount: u64,
}

/// Event emitted for each investor payout page
#[event]
pub struct InvestorPayoutPage {
    pub vault: Pubkey,
    pub day_id: u64,
    pub page_index: u32,
    pub investor_count: u32,
    pub paid_total: u64,
    pub timestamp: i64,
}

/// Event emitted when creator gets remainder payout at day close
#[event]
pub struct CreatorPayoutDayClosed {
    pub vault: Pubkey,
    pub day_id: u64,
    pub creator_amount: u64,
    pub total_claimed_today: u64,
    pub total_distributed_to_investors: u64,
    pub carry_over: u64,
    pub timestamp: i64,
}
