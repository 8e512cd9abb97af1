use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::errors::LendingError;
use crate::state::*;

/// Withdraw deposit principal plus pending yield
///
/// All ledger mutations happen before the single outward transfer; a vault
/// shortfall fails the transfer and rolls the whole withdrawal back.
#[derive(Accounts)]
pub struct Withdraw<'info> {
    #[account(mut)]
    pub user: Signer<'info>,

    #[account(
        mut,
        seeds = [POOL_SEED, pool.deposit_mint.as_ref(), pool.collateral_mint.as_ref()],
        bump = pool.bump
    )]
    pub pool: Account<'info, Pool>,

    #[account(
        mut,
        seeds = [DEPOSIT_RECORD_SEED, pool.key().as_ref(), user.key().as_ref()],
        bump = deposit_record.bump,
        constraint = deposit_record.owner == user.key() @ LendingError::Unauthorized
    )]
    pub deposit_record: Account<'info, DepositRecord>,

    /// Pool deposit vault (source)
    #[account(mut, address = pool.deposit_vault @ LendingError::InvalidPoolConfig)]
    pub deposit_vault: Account<'info, TokenAccount>,

    /// User's deposit-asset account (destination)
    #[account(
        mut,
        constraint = user_token_account.owner == user.key() @ LendingError::Unauthorized,
        constraint = user_token_account.mint == pool.deposit_mint @ LendingError::InvalidPoolConfig
    )]
    pub user_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

pub fn handler(ctx: Context<Withdraw>, amount: u64) -> Result<()> {
    let pool = &mut ctx.accounts.pool;
    let record = &mut ctx.accounts.deposit_record;
    let clock = Clock::get()?;

    // Accrue interest before any balance-affecting read
    pool.accrue_interest(clock.unix_timestamp)?;

    let payout = pool.apply_withdraw(record, amount)?;

    // Single outward transfer of principal plus pending yield
    let deposit_mint = pool.deposit_mint;
    let collateral_mint = pool.collateral_mint;
    let seeds: &[&[u8]] = &[
        POOL_SEED,
        deposit_mint.as_ref(),
        collateral_mint.as_ref(),
        &[pool.bump],
    ];
    let signer = &[seeds];

    let transfer_ctx = CpiContext::new_with_signer(
        ctx.accounts.token_program.to_account_info(),
        Transfer {
            from: ctx.accounts.deposit_vault.to_account_info(),
            to: ctx.accounts.user_token_account.to_account_info(),
            authority: pool.to_account_info(),
        },
        signer,
    );
    token::transfer(transfer_ctx, payout)?;

    emit!(Withdrawn {
        pool: pool.key(),
        user: ctx.accounts.user.key(),
        amount,
        payout,
        total_deposits: pool.total_deposits,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}

#[event]
pub struct Withdrawn {
    pub pool: Pubkey,
    pub user: Pubkey,
    pub amount: u64,
    pub payout: u64,
    pub total_deposits: u64,
    pub timestamp: i64,
}
