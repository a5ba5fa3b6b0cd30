use anchor_lang::prelude::*;
use solana_program::program_pack::Pack;
use spl_associated_token_account::get_associated_token_address;
use spl_token::state::Account as SplTokenAccount;
use streamflow_mock::state::StreamLock;

use crate::error::HonoraryFeeError;

/// One (stream, quote ATA) pair taken from the remaining accounts
pub struct InvestorEntry<'a, 'info> {
    pub stream: Pubkey,
    pub lock: StreamLock,
    pub quote_ata: &'a AccountInfo<'info>,
}

/// Safe account parsing utilities for investor pages
pub struct AccountParser;

impl AccountParser {
    /// Split remaining accounts into validated investor entries
    pub fn parse_investor_page<'a, 'info>(
        remaining_accounts: &'a [AccountInfo<'info>],
        streamflow_program: &Pubkey,
        quote_mint: &Pubkey,
    ) -> Result<Vec<InvestorEntry<'a, 'info>>> {
        require!(
            remaining_accounts.len() % 2 == 0,
            HonoraryFeeError::UnpairedInvestorAccounts
        );

        let mut entries: Vec<InvestorEntry<'a, 'info>> =
            Vec::with_capacity(remaining_accounts.len() / 2);
        for pair in remaining_accounts.chunks_exact(2) {
            let (stream_ai, ata_ai) = (&pair[0], &pair[1]);

            require!(
                !entries.iter().any(|e| e.stream == stream_ai.key()),
                HonoraryFeeError::DuplicateInvestor
            );

            let lock = Self::parse_stream_lock(stream_ai, streamflow_program)?;
            Self::validate_investor_ata(&lock, ata_ai.key, quote_mint)?;

            entries.push(InvestorEntry {
                stream: stream_ai.key(),
                lock,
                quote_ata: ata_ai,
            });
        }
        Ok(entries)
    }

    /// Read a stream lock owned by the Streamflow program
    pub fn parse_stream_lock(
        account_info: &AccountInfo,
        streamflow_program: &Pubkey,
    ) -> Result<StreamLock> {
        require_keys_eq!(
            *account_info.owner,
            *streamflow_program,
            HonoraryFeeError::StreamflowReadError
        );
        let data = account_info.try_borrow_data()?;
        StreamLock::try_deserialize(&mut &data[..])
            .map_err(|_| error!(HonoraryFeeError::StreamflowReadError))
    }

    /// Payouts only ever go to the stream recipient's quote ATA
    pub fn validate_investor_ata(
        lock: &StreamLock,
        investor_ata: &Pubkey,
        quote_mint: &Pubkey,
    ) -> Result<()> {
        require_keys_eq!(
            get_associated_token_address(&lock.recipient, quote_mint),
            *investor_ata,
            HonoraryFeeError::InvalidInvestorAccount
        );
        Ok(())
    }

    /// Whether the ATA exists and can receive quote right now. A missing or
    /// frozen account is not an error, its payout stays in the pot.
    pub fn can_receive_quote(account_info: &AccountInfo, quote_mint: &Pubkey) -> Result<bool> {
        if *account_info.owner != spl_token::ID || account_info.data_len() != SplTokenAccount::LEN {
            return Ok(false);
        }
        let data = account_info.try_borrow_data()?;
        let account = match SplTokenAccount::unpack(&data) {
            Ok(account) => account,
            Err(_) => return Ok(false),
        };
        require_keys_eq!(account.mint, *quote_mint, HonoraryFeeError::InvalidInvestorAccount);
        Ok(!account.is_frozen())
    }
}
