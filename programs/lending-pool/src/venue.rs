use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::{AccountMeta, Instruction};
use anchor_lang::solana_program::program::invoke_signed;

use crate::errors::LendingError;

/// Instruction tag the conversion venue expects for a swap.
const VENUE_SWAP_TAG: u8 = 1;

/// Swap seized collateral into the deposit asset through the external
/// conversion venue.
///
/// The venue's accounts are forwarded verbatim from the caller's remaining
/// accounts; the pool PDA is promoted to signer so the venue can debit the
/// pool-owned source vault. Wire format: `[tag, amount_in: u64 LE,
/// min_amount_out: u64 LE]`. The amount actually received is not trusted
/// from the venue; the caller measures the destination vault balance delta
/// instead.
pub fn swap<'info>(
    venue_program: &AccountInfo<'info>,
    accounts: &[AccountInfo<'info>],
    pool: Pubkey,
    amount_in: u64,
    min_amount_out: u64,
    signer_seeds: &[&[&[u8]]],
) -> Result<()> {
    let metas: Vec<AccountMeta> = accounts
        .iter()
        .map(|account| AccountMeta {
            pubkey: *account.key,
            is_signer: account.is_signer || *account.key == pool,
            is_writable: account.is_writable,
        })
        .collect();

    let mut data = Vec::with_capacity(17);
    data.push(VENUE_SWAP_TAG);
    data.extend_from_slice(&amount_in.to_le_bytes());
    data.extend_from_slice(&min_amount_out.to_le_bytes());

    let instruction = Instruction {
        program_id: *venue_program.key,
        accounts: metas,
        data,
    };

    let mut account_infos = accounts.to_vec();
    account_infos.push(venue_program.clone());

    invoke_signed(&instruction, &account_infos, signer_seeds)
        .map_err(|_| LendingError::ConversionFailed.into())
}
