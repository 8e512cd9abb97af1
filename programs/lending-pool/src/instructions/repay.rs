use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::errors::LendingError;
use crate::state::*;

/// Repay the full debt and recover all posted collateral
///
/// No partial repayment. The amount pulled is the current debt plus a
/// one-unit rounding buffer so floor division can never leave debt dust.
/// Both position records are closed with rent refunded to the caller.
#[derive(Accounts)]
pub struct Repay<'info> {
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
        seeds = [COLLATERAL_RECORD_SEED, pool.key().as_ref(), user.key().as_ref()],
        bump = collateral_record.bump,
        constraint = collateral_record.owner == user.key() @ LendingError::Unauthorized,
        close = user
    )]
    pub collateral_record: Account<'info, CollateralRecord>,

    #[account(
        mut,
        seeds = [BORROW_RECORD_SEED, pool.key().as_ref(), user.key().as_ref()],
        bump = borrow_record.bump,
        constraint = borrow_record.owner == user.key() @ LendingError::Unauthorized,
        close = user
    )]
    pub borrow_record: Account<'info, BorrowRecord>,

    /// User's deposit-asset account (source of the repayment)
    #[account(
        mut,
        constraint = user_token_account.owner == user.key() @ LendingError::Unauthorized,
        constraint = user_token_account.mint == pool.deposit_mint @ LendingError::InvalidPoolConfig
    )]
    pub user_token_account: Account<'info, TokenAccount>,

    /// Pool deposit vault (destination for the repayment)
    #[account(mut, address = pool.deposit_vault @ LendingError::InvalidPoolConfig)]
    pub deposit_vault: Account<'info, TokenAccount>,

    /// Pool collateral vault (source of the returned collateral)
    #[account(mut, address = pool.collateral_vault @ LendingError::InvalidPoolConfig)]
    pub collateral_vault: Account<'info, TokenAccount>,

    /// User's collateral-asset account (destination for returned collateral)
    #[account(
        mut,
        constraint = user_collateral_account.owner == user.key() @ LendingError::Unauthorized,
        constraint = user_collateral_account.mint == pool.collateral_mint @ LendingError::InvalidPoolConfig
    )]
    pub user_collateral_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

pub fn handler(ctx: Context<Repay>) -> Result<()> {
    let pool = &mut ctx.accounts.pool;
    let collateral = &mut ctx.accounts.collateral_record;
    let borrow = &mut ctx.accounts.borrow_record;
    let clock = Clock::get()?;
    let now = clock.unix_timestamp;

    // Accrue interest before any balance-affecting read
    pool.accrue_interest(now)?;

    let (debt_due, collateral_refund) = pool.apply_repay(collateral, borrow, now)?;

    // Pull the buffered debt; failure aborts the whole repayment
    let pull_ctx = CpiContext::new(
        ctx.accounts.token_program.to_account_info(),
        Transfer {
            from: ctx.accounts.user_token_account.to_account_info(),
            to: ctx.accounts.deposit_vault.to_account_info(),
            authority: ctx.accounts.user.to_account_info(),
        },
    );
    token::transfer(pull_ctx, debt_due)?;

    // Return the full collateral balance
    let deposit_mint = pool.deposit_mint;
    let collateral_mint = pool.collateral_mint;
    let seeds: &[&[u8]] = &[
        POOL_SEED,
        deposit_mint.as_ref(),
        collateral_mint.as_ref(),
        &[pool.bump],
    ];
    let signer = &[seeds];

    let push_ctx = CpiContext::new_with_signer(
        ctx.accounts.token_program.to_account_info(),
        Transfer {
            from: ctx.accounts.collateral_vault.to_account_info(),
            to: ctx.accounts.user_collateral_account.to_account_info(),
            authority: pool.to_account_info(),
        },
        signer,
    );
    token::transfer(push_ctx, collateral_refund)?;

    emit!(Repaid {
        pool: pool.key(),
        user: ctx.accounts.user.key(),
        debt_due,
        collateral_refund,
        total_borrows: pool.total_borrows,
        total_collateral: pool.total_collateral,
        timestamp: now,
    });

    Ok(())
}

#[event]
pub struct Repaid {
    pub pool: Pubkey,
    pub user: Pubkey,
    pub debt_due: u64,
    pub collateral_refund: u64,
    pub total_borrows: u64,
    pub total_collateral: u64,
    pub timestamp: i64,
}
