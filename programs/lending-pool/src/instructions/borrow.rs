use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::errors::LendingError;
use crate::state::*;

/// Post collateral and draw deposit asset up to the LTV ceiling
///
/// `collateral_amount` may be zero if the caller is already sufficiently
/// collateralized. The borrow record is rewritten to the freshly computed
/// debt plus the new draw, compounding interest accrued so far.
#[derive(Accounts)]
pub struct Borrow<'info> {
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
        space = CollateralRecord::SIZE,
        seeds = [COLLATERAL_RECORD_SEED, pool.key().as_ref(), user.key().as_ref()],
        bump
    )]
    pub collateral_record: Account<'info, CollateralRecord>,

    #[account(
        init_if_needed,
        payer = user,
        space = BorrowRecord::SIZE,
        seeds = [BORROW_RECORD_SEED, pool.key().as_ref(), user.key().as_ref()],
        bump
    )]
    pub borrow_record: Account<'info, BorrowRecord>,

    /// User's collateral-asset account (source of posted collateral)
    #[account(
        mut,
        constraint = user_collateral_account.owner == user.key() @ LendingError::Unauthorized,
        constraint = user_collateral_account.mint == pool.collateral_mint @ LendingError::InvalidPoolConfig
    )]
    pub user_collateral_account: Account<'info, TokenAccount>,

    /// Pool collateral vault (destination for posted collateral)
    #[account(mut, address = pool.collateral_vault @ LendingError::InvalidPoolConfig)]
    pub collateral_vault: Account<'info, TokenAccount>,

    /// Pool deposit vault (source of the drawn assets)
    #[account(mut, address = pool.deposit_vault @ LendingError::InvalidPoolConfig)]
    pub deposit_vault: Account<'info, TokenAccount>,

    /// User's deposit-asset account (destination for the drawn assets)
    #[account(
        mut,
        constraint = user_token_account.owner == user.key() @ LendingError::Unauthorized,
        constraint = user_token_account.mint == pool.deposit_mint @ LendingError::InvalidPoolConfig
    )]
    pub user_token_account: Account<'info, TokenAccount>,

    #[account(address = pool.oracle @ LendingError::OracleUnavailable)]
    pub oracle: Account<'info, PriceOracle>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<Borrow>, collateral_amount: u64, debt_amount: u64) -> Result<()> {
    let pool = &mut ctx.accounts.pool;
    let collateral = &mut ctx.accounts.collateral_record;
    let borrow = &mut ctx.accounts.borrow_record;
    let clock = Clock::get()?;
    let now = clock.unix_timestamp;

    // Accrue interest before any balance-affecting read
    pool.accrue_interest(now)?;

    let price = ctx.accounts.oracle.current_price(now)?;

    collateral.owner = ctx.accounts.user.key();
    collateral.bump = ctx.bumps.collateral_record;
    borrow.owner = ctx.accounts.user.key();
    borrow.bump = ctx.bumps.borrow_record;

    require!(
        debt_amount <= ctx.accounts.deposit_vault.amount,
        LendingError::InsufficientLiquidity
    );

    let new_debt = pool.apply_borrow(
        collateral,
        borrow,
        collateral_amount,
        debt_amount,
        price,
        now,
    )?;

    // Pull collateral before pushing the draw
    let pull_ctx = CpiContext::new(
        ctx.accounts.token_program.to_account_info(),
        Transfer {
            from: ctx.accounts.user_collateral_account.to_account_info(),
            to: ctx.accounts.collateral_vault.to_account_info(),
            authority: ctx.accounts.user.to_account_info(),
        },
    );
    token::transfer(pull_ctx, collateral_amount)?;

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
            from: ctx.accounts.deposit_vault.to_account_info(),
            to: ctx.accounts.user_token_account.to_account_info(),
            authority: pool.to_account_info(),
        },
        signer,
    );
    token::transfer(push_ctx, debt_amount)?;

    emit!(Borrowed {
        pool: pool.key(),
        user: ctx.accounts.user.key(),
        collateral_amount,
        debt_amount,
        new_debt,
        total_borrows: pool.total_borrows,
        total_collateral: pool.total_collateral,
        timestamp: now,
    });

    Ok(())
}

#[event]
pub struct Borrowed {
    pub pool: Pubkey,
    pub user: Pubkey,
    pub collateral_amount: u64,
    pub debt_amount: u64,
    pub new_debt: u64,
    pub total_borrows: u64,
    pub total_collateral: u64,
    pub timestamp: i64,
}
