use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::errors::LendingError;
use crate::state::*;
use crate::venue;

/// Seize an under-collateralized position
///
/// Callable by any principal. The caller receives 10% of the seized
/// collateral as a bounty; the remaining 90% is swapped through the
/// conversion venue into the deposit vault, and the yield index absorbs
/// the difference between proceeds and forfeited debt. The venue's
/// accounts are passed as remaining accounts. `min_debt_out` bounds
/// acceptable swap output; zero accepts any output.
#[derive(Accounts)]
pub struct Liquidate<'info> {
    #[account(mut)]
    pub liquidator: Signer<'info>,

    #[account(
        mut,
        seeds = [POOL_SEED, pool.deposit_mint.as_ref(), pool.collateral_mint.as_ref()],
        bump = pool.bump
    )]
    pub pool: Account<'info, Pool>,

    /// CHECK: position owner; only used for record derivation and rent refund
    #[account(mut)]
    pub borrower: UncheckedAccount<'info>,

    #[account(
        mut,
        seeds = [COLLATERAL_RECORD_SEED, pool.key().as_ref(), borrower.key().as_ref()],
        bump = collateral_record.bump,
        constraint = collateral_record.owner == borrower.key() @ LendingError::Unauthorized,
        close = borrower
    )]
    pub collateral_record: Account<'info, CollateralRecord>,

    #[account(
        mut,
        seeds = [BORROW_RECORD_SEED, pool.key().as_ref(), borrower.key().as_ref()],
        bump = borrow_record.bump,
        constraint = borrow_record.owner == borrower.key() @ LendingError::Unauthorized,
        close = borrower
    )]
    pub borrow_record: Account<'info, BorrowRecord>,

    #[account(address = pool.oracle @ LendingError::OracleUnavailable)]
    pub oracle: Account<'info, PriceOracle>,

    /// Pool collateral vault (source of the seized collateral)
    #[account(mut, address = pool.collateral_vault @ LendingError::InvalidPoolConfig)]
    pub collateral_vault: Account<'info, TokenAccount>,

    /// Pool deposit vault (destination of the swap proceeds)
    #[account(mut, address = pool.deposit_vault @ LendingError::InvalidPoolConfig)]
    pub deposit_vault: Account<'info, TokenAccount>,

    /// Liquidator's collateral-asset account (receives the bounty)
    #[account(
        mut,
        constraint = liquidator_collateral_account.owner == liquidator.key() @ LendingError::Unauthorized,
        constraint = liquidator_collateral_account.mint == pool.collateral_mint @ LendingError::InvalidPoolConfig
    )]
    pub liquidator_collateral_account: Account<'info, TokenAccount>,

    /// CHECK: external conversion venue program; its accounts follow as
    /// remaining accounts
    pub venue_program: UncheckedAccount<'info>,

    pub token_program: Program<'info, Token>,
}

pub fn handler<'info>(
    ctx: Context<'_, '_, 'info, 'info, Liquidate<'info>>,
    min_debt_out: u64,
) -> Result<()> {
    let clock = Clock::get()?;
    let now = clock.unix_timestamp;

    // Accrue interest before the eligibility check is finalized
    ctx.accounts.pool.accrue_interest(now)?;

    let price = ctx.accounts.oracle.current_price(now)?;

    let outcome = ctx.accounts.pool.apply_liquidation(
        &mut ctx.accounts.collateral_record,
        &mut ctx.accounts.borrow_record,
        price,
        now,
    )?;

    let pool = &ctx.accounts.pool;
    let pool_key = pool.key();
    let deposit_mint = pool.deposit_mint;
    let collateral_mint = pool.collateral_mint;
    let seeds: &[&[u8]] = &[
        POOL_SEED,
        deposit_mint.as_ref(),
        collateral_mint.as_ref(),
        &[pool.bump],
    ];
    let signer = &[seeds];

    // Pay the bounty in collateral to the caller
    let bounty_ctx = CpiContext::new_with_signer(
        ctx.accounts.token_program.to_account_info(),
        Transfer {
            from: ctx.accounts.collateral_vault.to_account_info(),
            to: ctx.accounts.liquidator_collateral_account.to_account_info(),
            authority: pool.to_account_info(),
        },
        signer,
    );
    token::transfer(bounty_ctx, outcome.liquidator_bounty)?;

    // Convert the pool's share; proceeds land in the deposit vault and are
    // measured as the vault balance delta rather than trusted from the venue
    let vault_before = ctx.accounts.deposit_vault.amount;
    if outcome.pool_reward > 0 {
        venue::swap(
            &ctx.accounts.venue_program.to_account_info(),
            ctx.remaining_accounts,
            pool_key,
            outcome.pool_reward,
            min_debt_out,
            signer,
        )?;
    }
    ctx.accounts.deposit_vault.reload()?;
    let received = ctx
        .accounts
        .deposit_vault
        .amount
        .checked_sub(vault_before)
        .ok_or(LendingError::ConversionFailed)?;
    require!(received >= min_debt_out, LendingError::ConversionFailed);

    ctx.accounts
        .pool
        .apply_liquidation_proceeds(received, outcome.forfeited_borrows)?;

    emit!(Liquidated {
        pool: pool_key,
        liquidator: ctx.accounts.liquidator.key(),
        borrower: ctx.accounts.borrower.key(),
        seized: outcome.seized,
        liquidator_bounty: outcome.liquidator_bounty,
        pool_reward: outcome.pool_reward,
        received,
        forfeited_borrows: outcome.forfeited_borrows,
        yield_index: ctx.accounts.pool.cumulative_yield_index,
        timestamp: now,
    });

    Ok(())
}

#[event]
pub struct Liquidated {
    pub pool: Pubkey,
    pub liquidator: Pubkey,
    pub borrower: Pubkey,
    pub seized: u64,
    pub liquidator_bounty: u64,
    pub pool_reward: u64,
    pub received: u64,
    pub forfeited_borrows: u64,
    pub yield_index: u128,
    pub timestamp: i64,
}
