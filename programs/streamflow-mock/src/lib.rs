use anchor_lang::prelude::*;

pub mod error;
pub mod state;

pub use error::*;
pub use state::*;

declare_id!("8Wx6m7J4R7dA9cC3G8h5o1bGQJV9oG8X5q7YwF2d3yY3");

#[program]
pub mod streamflow_mock {
    use super::*;

    /// Create a stream lock, or overwrite the amounts of an existing one
    pub fn set_locked_amount(
        ctx: Context<SetLockedAmount>,
        locked_amount: u64,
        y0: u64,
    ) -> Result<()> {
        let authority = ctx.accounts.authority.key();
        let recipient = ctx.accounts.recipient.key();

        let lock = &mut ctx.accounts.stream_lock;
        if !lock.is_initialized() {
            lock.initialize(
                ctx.accounts.stream.key(),
                recipient,
                authority,
                ctx.bumps.stream_lock,
            );
        }
        lock.apply_update(&authority, &recipient, locked_amount, y0)?;

        msg!("Stream {} locked={} y0={}", lock.stream_pubkey, locked_amount, y0);
        Ok(())
    }

    /// Unlock part of a stream, as vesting would over time
    pub fn release_locked(ctx: Context<ReleaseLocked>, amount: u64) -> Result<()> {
        let lock = &mut ctx.accounts.stream_lock;
        lock.release(amount)?;

        msg!("Stream {} released {}, locked={}", lock.stream_pubkey, amount, lock.locked_amount);
        Ok(())
    }

    pub fn get_locked_amount(ctx: Context<GetLockedAmount>) -> Result<u64> {
        Ok(ctx.accounts.stream_lock.locked_amount)
    }
}

#[derive(Accounts)]
pub struct SetLockedAmount<'info> {
    /// CHECK: arbitrary stream key used as seed; no data read
    pub stream: UncheckedAccount<'info>,
    /// CHECK: wallet that receives the vested tokens; key only
    pub recipient: UncheckedAccount<'info>,
    #[account(
        init_if_needed,
        payer = authority,
        space = 8 + StreamLock::SIZE,
        seeds = [STREAM_LOCK_SEED, stream.key().as_ref()],
        bump,
    )]
    pub stream_lock: Account<'info, StreamLock>,
    #[account(mut)]
    pub authority: Signer<'info>,
    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct ReleaseLocked<'info> {
    #[account(
        mut,
        seeds = [STREAM_LOCK_SEED, stream_lock.stream_pubkey.as_ref()],
        bump = stream_lock.bump,
        has_one = authority @ StreamflowMockError::Unauthorized,
    )]
    pub stream_lock: Account<'info, StreamLock>,
    pub authority: Signer<'info>,
}

#[derive(Accounts)]
pub struct GetLockedAmount<'info> {
    #[account(
        seeds = [STREAM_LOCK_SEED, stream_lock.stream_pubkey.as_ref()],
        bump = stream_lock.bump,
    )]
    pub stream_lock: Account<'info, StreamLock>,
}
