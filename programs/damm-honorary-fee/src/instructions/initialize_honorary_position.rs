use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token::{Mint, Token, TokenAccount},
};
use cp_amm_stub::{
    cpi::accounts::CreatePosition,
    program::CpAmmStub,
    state::{Pool, Position},
};

use crate::{
    error::HonoraryFeeError,
    events::HonoraryPositionInitialized,
    state::*,
    utils::BPS_DENOMINATOR,
    validation::PoolValidator,
};

#[derive(Accounts)]
pub struct InitializeHonoraryPosition<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,

    /// The vault identifier (used for PDA seeds)
    /// CHECK: This is used as a seed for PDA derivation
    pub vault: UncheckedAccount<'info>,

    /// cp-amm pool the position is opened in
    pub cp_amm_pool: Box<Account<'info, Pool>>,

    /// Quote mint (the token we collect fees in)
    pub quote_mint: Box<Account<'info, Mint>>,

    /// Base mint (the token we must NOT collect fees from)
    pub base_mint: Box<Account<'info, Mint>>,

    /// Creator's quote token account (for remainder distribution)
    pub creator_quote_ata: Box<Account<'info, TokenAccount>>,

    /// PDA that will own the honorary position
    /// CHECK: seeds are verified, holds no data
    #[account(
        seeds = [VAULT_SEED, vault.key().as_ref(), INVESTOR_FEE_POS_OWNER_SEED],
        bump
    )]
    pub position_owner_pda: UncheckedAccount<'info>,

    /// The cp-amm position, created by the CPI below
    /// CHECK: cp-amm derives and initializes it; read back after the CPI
    #[account(mut)]
    pub cp_amm_position: UncheckedAccount<'info>,

    #[account(
        init,
        payer = payer,
        space = HonoraryPosition::LEN,
        seeds = [HONORARY_POSITION_SEED, cp_amm_pool.key().as_ref()],
        bump
    )]
    pub honorary_position: Box<Account<'info, HonoraryPosition>>,

    #[account(
        init,
        payer = payer,
        space = Policy::LEN,
        seeds = [POLICY_SEED, vault.key().as_ref()],
        bump
    )]
    pub policy: Box<Account<'info, Policy>>,

    #[account(
        init,
        payer = payer,
        space = Progress::LEN,
        seeds = [PROGRESS_SEED, vault.key().as_ref()],
        bump
    )]
    pub progress: Box<Account<'info, Progress>>,

    /// Treasury holding claimed quote fees
    #[account(
        init,
        payer = payer,
        associated_token::mint = quote_mint,
        associated_token::authority = position_owner_pda,
    )]
    pub quote_treasury: Box<Account<'info, TokenAccount>>,

    /// Receives base fees on claim so that any leak is observable
    #[account(
        init,
        payer = payer,
        associated_token::mint = base_mint,
        associated_token::authority = position_owner_pda,
    )]
    pub base_treasury: Box<Account<'info, TokenAccount>>,

    pub cp_amm_program: Program<'info, CpAmmStub>,

    pub system_program: Program<'info, System>,

    pub token_program: Program<'info, Token>,

    pub associated_token_program: Program<'info, AssociatedToken>,
}

pub fn handle_initialize_honorary_position(
    ctx: Context<InitializeHonoraryPosition>,
    tick_lower: i32,
    tick_upper: i32,
    investor_fee_share_bps: u16,
    daily_cap_lamports: Option<u64>,
    min_payout_lamports: u64,
    y0: u64,
) -> Result<()> {
    let vault = ctx.accounts.vault.key();
    let pool = ctx.accounts.cp_amm_pool.key();
    let quote_mint = ctx.accounts.quote_mint.key();
    let base_mint = ctx.accounts.base_mint.key();
    let owner_pda = ctx.accounts.position_owner_pda.key();

    require!(
        investor_fee_share_bps as u64 <= BPS_DENOMINATOR,
        HonoraryFeeError::InvalidFeeShare
    );

    // Preflight: nothing is created unless the config is quote-only
    PoolValidator::validate_quote_only_config(
        &ctx.accounts.cp_amm_pool,
        &quote_mint,
        &base_mint,
        tick_lower,
        tick_upper,
    )?;

    require_keys_eq!(
        ctx.accounts.creator_quote_ata.mint,
        quote_mint,
        HonoraryFeeError::InvalidQuoteMint
    );

    create_honorary_position_cpi(&ctx, tick_lower, tick_upper)?;

    let position = read_created_position(&ctx.accounts.cp_amm_position)?;
    PoolValidator::validate_created_position(&position, &pool, &owner_pda)?;

    let honorary_position = &mut ctx.accounts.honorary_position;
    honorary_position.vault = vault;
    honorary_position.pool = pool;
    honorary_position.position = ctx.accounts.cp_amm_position.key();
    honorary_position.owner_pda = owner_pda;
    honorary_position.quote_mint = quote_mint;
    honorary_position.base_mint = base_mint;
    honorary_position.tick_lower = tick_lower;
    honorary_position.tick_upper = tick_upper;
    honorary_position.bump = ctx.bumps.honorary_position;

    let policy = &mut ctx.accounts.policy;
    policy.vault = vault;
    policy.quote_mint = quote_mint;
    policy.creator_quote_ata = ctx.accounts.creator_quote_ata.key();
    policy.investor_fee_share_bps = investor_fee_share_bps;
    policy.daily_cap_lamports = daily_cap_lamports;
    policy.min_payout_lamports = min_payout_lamports;
    policy.y0 = y0;
    policy.bump = ctx.bumps.policy;

    // Start closed with no history so the first day can open immediately
    let progress = &mut ctx.accounts.progress;
    progress.vault = vault;
    progress.day_id = 0;
    progress.last_distribution_ts = 0;
    progress.cursor_idx = 0;
    progress.is_closed = true;
    progress.claimed_today = 0;
    progress.investor_pot = 0;
    progress.creator_share = 0;
    progress.cap_excess = 0;
    progress.distributed_today = 0;
    progress.carry_over_lamports = 0;
    progress.locked_total_snapshot = 0;
    progress.locked_seen_today = 0;
    progress.processed_pages = [0u8; Progress::BITMAP_BYTES];
    progress.bump = ctx.bumps.progress;

    emit!(HonoraryPositionInitialized {
        vault,
        pool,
        position: ctx.accounts.cp_amm_position.key(),
        owner_pda,
        quote_mint,
        tick_lower,
        tick_upper,
        timestamp: Clock::get()?.unix_timestamp,
    });

    msg!(
        "Initialized honorary position for vault {} with quote mint {}",
        vault,
        quote_mint
    );

    Ok(())
}

/// Create the honorary position via cp-amm CPI, owned by the PDA
fn create_honorary_position_cpi(
    ctx: &Context<InitializeHonoraryPosition>,
    tick_lower: i32,
    tick_upper: i32,
) -> Result<()> {
    let cpi_accounts = CreatePosition {
        owner: ctx.accounts.position_owner_pda.to_account_info(),
        pool: ctx.accounts.cp_amm_pool.to_account_info(),
        position: ctx.accounts.cp_amm_position.to_account_info(),
        payer: ctx.accounts.payer.to_account_info(),
        system_program: ctx.accounts.system_program.to_account_info(),
    };
    let cpi_ctx = CpiContext::new(ctx.accounts.cp_amm_program.to_account_info(), cpi_accounts);

    cp_amm_stub::cpi::create_position(cpi_ctx, tick_lower, tick_upper, true)?;

    msg!("Created honorary position {}", ctx.accounts.cp_amm_position.key());
    Ok(())
}

fn read_created_position(account: &UncheckedAccount) -> Result<Position> {
    require_keys_eq!(
        *account.owner,
        cp_amm_stub::ID,
        HonoraryFeeError::InvalidPositionOwner
    );
    let data = account.try_borrow_data()?;
    Position::try_deserialize(&mut &data[..])
}
