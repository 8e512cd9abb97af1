use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, TokenAccount};

use crate::constants::*;
use crate::errors::LendingError;
use crate::state::*;

/// Initialize the lending pool
///
/// Wires the pool PDA to its asset mints, the two pool-owned vaults and
/// the price oracle, and seeds the deposit total so yield distribution
/// never divides by zero.
#[derive(Accounts)]
pub struct InitPool<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        init,
        payer = authority,
        space = Pool::SIZE,
        seeds = [POOL_SEED, deposit_mint.key().as_ref(), collateral_mint.key().as_ref()],
        bump
    )]
    pub pool: Account<'info, Pool>,

    /// Mint of the deposit asset (the asset borrowers draw)
    pub deposit_mint: Account<'info, Mint>,

    /// Mint of the collateral asset
    pub collateral_mint: Account<'info, Mint>,

    /// Vault holding deposited assets; must be owned by the pool PDA
    #[account(
        constraint = deposit_vault.mint == deposit_mint.key() @ LendingError::InvalidPoolConfig,
        constraint = deposit_vault.owner == pool.key() @ LendingError::InvalidPoolConfig
    )]
    pub deposit_vault: Account<'info, TokenAccount>,

    /// Vault holding posted collateral; must be owned by the pool PDA
    #[account(
        constraint = collateral_vault.mint == collateral_mint.key() @ LendingError::InvalidPoolConfig,
        constraint = collateral_vault.owner == pool.key() @ LendingError::InvalidPoolConfig
    )]
    pub collateral_vault: Account<'info, TokenAccount>,

    /// Price oracle for this asset pair
    #[account(
        seeds = [ORACLE_SEED, collateral_mint.key().as_ref(), deposit_mint.key().as_ref()],
        bump = oracle.bump
    )]
    pub oracle: Account<'info, PriceOracle>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<InitPool>) -> Result<()> {
    let pool = &mut ctx.accounts.pool;
    let clock = Clock::get()?;

    pool.initialize(
        ctx.accounts.authority.key(),
        ctx.accounts.deposit_mint.key(),
        ctx.accounts.collateral_mint.key(),
        ctx.accounts.deposit_vault.key(),
        ctx.accounts.collateral_vault.key(),
        ctx.accounts.oracle.key(),
        ctx.bumps.pool,
        clock.unix_timestamp,
    );

    emit!(PoolInitialized {
        pool: pool.key(),
        authority: ctx.accounts.authority.key(),
        deposit_mint: ctx.accounts.deposit_mint.key(),
        collateral_mint: ctx.accounts.collateral_mint.key(),
        oracle: ctx.accounts.oracle.key(),
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}

#[event]
pub struct PoolInitialized {
    pub pool: Pubkey,
    pub authority: Pubkey,
    pub deposit_mint: Pubkey,
    pub collateral_mint: Pubkey,
    pub oracle: Pubkey,
    pub timestamp: i64,
}
