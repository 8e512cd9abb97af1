use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::errors::LendingError;
use crate::state::*;

/// Supply deposit asset to the pool
///
/// Creates the caller's deposit record on first use. The index snapshot is
/// reset to the current value, so depositing settles no pending yield.
#[derive(Accounts)]
pub struct Deposit<'info> {
    #[account(mut)]
    pub user: Signer<'info>,

    #[account(
        mut,
        seeds = [POOL_SEED, pool.deposit_mint.as_ref(), pool.collateral_mint.as_ref()],
        bump = pool.bump
    )]
    pub pool: Account<'info, Pool>,

    #[account(
        init_if_needed,
        payer = user,
        space = DepositRecord::SIZE,
        seeds = [DEPOSIT_RECORD_SEED, pool.key().as_ref(), user.key().as_ref()],
        bump
    )]
    pub deposit_record: Account<'info, DepositRecord>,

    /// User's deposit-asset account (source of the deposit)
    #[account(
        mut,
        constraint = user_token_account.owner == user.key() @ LendingError::Unauthorized,
        constraint = user_token_account.mint == pool.deposit_mint @ LendingError::InvalidPoolConfig
    )]
    pub user_token_account: Account<'info, TokenAccount>,

    /// Pool deposit vault (destination)
    #[account(mut, address = pool.deposit_vault @ LendingError::InvalidPoolConfig)]
    pub deposit_vault: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<Deposit>, amount: u64) -> Result<()> {
    let pool = &mut ctx.accounts.pool;
    let record = &mut ctx.accounts.deposit_record;
    let clock = Clock::get()?;

    // Accrue interest before any balance-affecting read
    pool.accrue_interest(clock.unix_timestamp)?;

    record.owner = ctx.accounts.user.key();
    record.bump = ctx.bumps.deposit_record;

    // Pull the deposit from the caller; a failed transfer aborts everything
    let transfer_ctx = CpiContext::new(
        ctx.accounts.token_program.to_account_info(),
        Transfer {
            from: ctx.accounts.user_token_account.to_account_info(),
            to: ctx.accounts.deposit_vault.to_account_info(),
            authority: ctx.accounts.user.to_account_info(),
        },
    );
    token::transfer(transfer_ctx, amount)?;

    pool.apply_deposit(record, amount)?;

    emit!(Deposited {
        pool: pool.key(),
        user: ctx.accounts.user.key(),
        amount,
        total_deposits: pool.total_deposits,
        yield_index: pool.cumulative_yield_index,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}

#[event]
pub struct Deposited {
    pub pool: Pubkey,
    pub user: Pubkey,
    pub amount: u64,
    pub total_deposits: u64,
    pub yield_index: u128,
    pub timestamp: i64,
}
