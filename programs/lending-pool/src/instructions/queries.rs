use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::LendingError;
use crate::state::*;

/// Read a borrower's current debt: stored principal plus interest accrued
/// since the checkpoint. Pure read; the checkpoint is not advanced.
#[derive(Accounts)]
pub struct GetDebt<'info> {
    #[account(
        seeds = [POOL_SEED, pool.deposit_mint.as_ref(), pool.collateral_mint.as_ref()],
        bump = pool.bump
    )]
    pub pool: Account<'info, Pool>,

    /// CHECK: position owner, only used for record derivation
    pub user: UncheckedAccount<'info>,

    #[account(
        seeds = [BORROW_RECORD_SEED, pool.key().as_ref(), user.key().as_ref()],
        bump = borrow_record.bump,
        constraint = borrow_record.owner == user.key() @ LendingError::Unauthorized
    )]
    pub borrow_record: Account<'info, BorrowRecord>,
}

pub fn get_debt_handler(ctx: Context<GetDebt>) -> Result<u64> {
    let clock = Clock::get()?;
    ctx.accounts.borrow_record.debt_at(clock.unix_timestamp)
}

/// Read a lender's unclaimed yield at the stored index. The index itself
/// is only advanced by state-mutating operations.
#[derive(Accounts)]
pub struct GetPendingYield<'info> {
    #[account(
        seeds = [POOL_SEED, pool.deposit_mint.as_ref(), pool.collateral_mint.as_ref()],
        bump = pool.bump
    )]
    pub pool: Account<'info, Pool>,

    /// CHECK: record owner, only used for record derivation
    pub user: UncheckedAccount<'info>,

    #[account(
        seeds = [DEPOSIT_RECORD_SEED, pool.key().as_ref(), user.key().as_ref()],
        bump = deposit_record.bump,
        constraint = deposit_record.owner == user.key() @ LendingError::Unauthorized
    )]
    pub deposit_record: Account<'info, DepositRecord>,
}

pub fn get_pending_yield_handler(ctx: Context<GetPendingYield>) -> Result<u64> {
    ctx.accounts.pool.pending_yield(&ctx.accounts.deposit_record)
}
