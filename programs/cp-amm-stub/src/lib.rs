use anchor_lang::prelude::*;
use anchor_spl::token::{self, Mint, MintTo, Token, TokenAccount};

pub mod error;
pub mod state;

pub use error::*;
pub use state::*;

declare_id!("4L3s2v8u8k4iVwV3s6Zx8u9Q2pY3aG9fQ7wE6bN5mCk7");

#[program]
pub mod cp_amm_stub {
    use super::*;

    /// Register a base/quote pool
    pub fn init_pool(ctx: Context<InitPool>) -> Result<()> {
        require_keys_neq!(
            ctx.accounts.base_mint.key(),
            ctx.accounts.quote_mint.key(),
            AmmError::InvalidMint
        );

        let pool = &mut ctx.accounts.pool;
        pool.token_base_mint = ctx.accounts.base_mint.key();
        pool.token_quote_mint = ctx.accounts.quote_mint.key();
        pool.bump = ctx.bumps.pool;

        msg!("Pool {} initialized", pool.key());
        Ok(())
    }

    /// Open a position for `owner`. The owner does not need to sign, which
    /// lets a program open a position on behalf of its PDA.
    pub fn create_position(
        ctx: Context<CreatePosition>,
        tick_lower: i32,
        tick_upper: i32,
        quote_only: bool,
    ) -> Result<()> {
        let owner = ctx.accounts.owner.key();
        let pool = ctx.accounts.pool.key();

        let pos = &mut ctx.accounts.position;
        pos.open(
            owner,
            pool,
            tick_lower,
            tick_upper,
            quote_only,
            ctx.bumps.position,
        )?;

        msg!(
            "Position {} opened for owner {} in [{}, {})",
            pos.key(),
            pos.owner,
            tick_lower,
            tick_upper
        );
        Ok(())
    }

    /// Simulates trading activity by crediting fees to a position
    pub fn accrue_fees(ctx: Context<AccrueFees>, add_base: u64, add_quote: u64) -> Result<()> {
        ctx.accounts.position.accrue(add_base, add_quote);
        Ok(())
    }

    /// Mint the accrued fees into the supplied treasuries and zero the accrual
    pub fn claim_fees(ctx: Context<ClaimFees>) -> Result<()> {
        let (base_amount, quote_amount) = ctx.accounts.position.take_accrued();

        let pool_key = ctx.accounts.pool.key();
        let seeds: &[&[u8]] = &[POOL_SIGNER_SEED, pool_key.as_ref(), &[ctx.bumps.pool_signer]];
        let signer = &[seeds];

        if base_amount > 0 {
            let cpi_ctx = CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                MintTo {
                    mint: ctx.accounts.base_mint.to_account_info(),
                    to: ctx.accounts.base_treasury.to_account_info(),
                    authority: ctx.accounts.pool_signer.to_account_info(),
                },
                signer,
            );
            token::mint_to(cpi_ctx, base_amount)?;
        }

        if quote_amount > 0 {
            let cpi_ctx = CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                MintTo {
                    mint: ctx.accounts.quote_mint.to_account_info(),
                    to: ctx.accounts.quote_treasury.to_account_info(),
                    authority: ctx.accounts.pool_signer.to_account_info(),
                },
                signer,
            );
            token::mint_to(cpi_ctx, quote_amount)?;
        }

        msg!(
            "Claimed base={} quote={} from {}",
            base_amount,
            quote_amount,
            ctx.accounts.position.key()
        );
        Ok(())
    }
}

#[derive(Accounts)]
pub struct InitPool<'info> {
    #[account(
        init,
        payer = payer,
        space = 8 + Pool::SIZE,
        seeds = [POOL_SEED, base_mint.key().as_ref(), quote_mint.key().as_ref()],
        bump,
    )]
    pub pool: Account<'info, Pool>,
    pub base_mint: Account<'info, Mint>,
    pub quote_mint: Account<'info, Mint>,
    #[account(mut)]
    pub payer: Signer<'info>,
    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct CreatePosition<'info> {
    /// CHECK: any key may own a position; claiming requires its signature
    pub owner: UncheckedAccount<'info>,
    pub pool: Account<'info, Pool>,
    #[account(
        init,
        payer = payer,
        space = 8 + Position::SIZE,
        seeds = [POSITION_SEED, pool.key().as_ref(), owner.key().as_ref()],
        bump,
    )]
    pub position: Account<'info, Position>,
    #[account(mut)]
    pub payer: Signer<'info>,
    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct AccrueFees<'info> {
    pub pool: Account<'info, Pool>,
    #[account(mut, has_one = pool @ AmmError::InvalidPool)]
    pub position: Account<'info, Position>,
}

#[derive(Accounts)]
pub struct ClaimFees<'info> {
    pub pool: Account<'info, Pool>,
    #[account(
        mut,
        has_one = pool @ AmmError::InvalidPool,
        has_one = owner @ AmmError::Unauthorized,
    )]
    pub position: Account<'info, Position>,
    pub owner: Signer<'info>,
    #[account(mut, address = pool.token_base_mint @ AmmError::InvalidMint)]
    pub base_mint: Account<'info, Mint>,
    #[account(mut, address = pool.token_quote_mint @ AmmError::InvalidMint)]
    pub quote_mint: Account<'info, Mint>,
    #[account(mut, token::mint = base_mint)]
    pub base_treasury: Account<'info, TokenAccount>,
    #[account(mut, token::mint = quote_mint)]
    pub quote_treasury: Account<'info, TokenAccount>,
    /// CHECK: mint authority PDA derived from the pool
    #[account(seeds = [POOL_SIGNER_SEED, pool.key().as_ref()], bump)]
    pub pool_signer: UncheckedAccount<'info>,
    pub token_program: Program<'info, Token>,
}
