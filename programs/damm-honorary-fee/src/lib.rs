use anchor_lang::prelude::*;

mod state;
mod error;
mod events;
mod utils;
mod instructions;

pub use state::*;
pub use error::*;
pub use events::*;
pub use utils::*;
pub use instructions::*;

declare_id!("DHCtQhk3J4Y3GQxYbJAm1H1eVDqHvGkV8PH4YyC4NujG");

#[program]
pub mod damm_honorary_fee {
    use super::*;

    /// Open a quote-only position owned by the vault PDA and store the
    /// distribution policy
    pub fn initialize_honorary_position(
        ctx: Context<InitializeHonoraryPosition>,
        tick_lower: i32,
        tick_upper: i32,
        investor_fee_share_bps: u16,
        daily_cap_lamports: Option<u64>,
        min_payout_lamports: u64,
        y0: u64,
    ) -> Result<()> {
        instructions::handle_initialize_honorary_position(
            ctx,
            tick_lower,
            tick_upper,
            investor_fee_share_bps,
            daily_cap_lamports,
            min_payout_lamports,
            y0,
        )
    }

    /// Permissionless crank to claim and distribute fees, one page at a time
    pub fn crank_distribute_page<'info>(
        ctx: Context<'_, '_, 'info, 'info, CrankDistributePage<'info>>,
        page_index: u32,
        is_final_page_in_day: bool,
        locked_total: u64,
    ) -> Result<()> {
        instructions::handle_crank_distribute_page(
            ctx,
            page_index,
            is_final_page_in_day,
            locked_total,
        )
    }
}
