use anchor_lang::prelude::*;
use anchor_spl::token::Mint;

use crate::constants::*;
use crate::errors::LendingError;
use crate::state::*;

/// Initialize the price oracle for an asset pair
///
/// The authority names the off-chain updater allowed to push prices. The
/// price starts unset; pool operations fail with `OracleUnavailable` until
/// the first push.
#[derive(Accounts)]
pub struct InitOracle<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        init,
        payer = authority,
        space = PriceOracle::SIZE,
        seeds = [ORACLE_SEED, collateral_mint.key().as_ref(), deposit_mint.key().as_ref()],
        bump
    )]
    pub oracle: Account<'info, PriceOracle>,

    pub collateral_mint: Account<'info, Mint>,

    pub deposit_mint: Account<'info, Mint>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<InitOracle>, updater: Pubkey) -> Result<()> {
    let oracle = &mut ctx.accounts.oracle;

    oracle.authority = ctx.accounts.authority.key();
    oracle.updater = updater;
    oracle.price = 0;
    oracle.last_updated = 0;
    oracle.bump = ctx.bumps.oracle;

    emit!(OracleInitialized {
        oracle: oracle.key(),
        authority: ctx.accounts.authority.key(),
        updater,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}

/// Push a new collateral price
///
/// Callable only by the designated updater; the off-chain pusher calls this
/// on its own schedule.
#[derive(Accounts)]
pub struct UpdatePrice<'info> {
    pub updater: Signer<'info>,

    #[account(
        mut,
        constraint = oracle.updater == updater.key() @ LendingError::Unauthorized
    )]
    pub oracle: Account<'info, PriceOracle>,
}

pub fn update_price_handler(ctx: Context<UpdatePrice>, new_price: u64) -> Result<()> {
    require!(new_price > 0, LendingError::InvalidAmount);

    let oracle = &mut ctx.accounts.oracle;
    let clock = Clock::get()?;

    oracle.price = new_price;
    oracle.last_updated = clock.unix_timestamp;

    emit!(PriceUpdated {
        oracle: oracle.key(),
        price: new_price,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}

#[event]
pub struct OracleInitialized {
    pub oracle: Pubkey,
    pub authority: Pubkey,
    pub updater: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct PriceUpdated {
    pub oracle: Pubkey,
    pub price: u64,
    pub timestamp: i64,
}
