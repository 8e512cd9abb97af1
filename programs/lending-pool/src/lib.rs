use anchor_lang::prelude::*;

pub mod constants;
pub mod errors;
pub mod instructions;
pub mod math;
pub mod state;
pub mod venue;

use instructions::*;

declare_id!("Fg6PaFpoGXkYsidMpWTK6W2BeZ7FEfcYkg476zPFsLnS");

#[program]
pub mod lending_pool {
    use super::*;

    /// Initialize the lending pool for a deposit/collateral asset pair
    pub fn init_pool(ctx: Context<InitPool>) -> Result<()> {
        instructions::init_pool::handler(ctx)
    }

    /// Initialize the price oracle and name its off-chain updater
    pub fn init_oracle(ctx: Context<InitOracle>, updater: Pubkey) -> Result<()> {
        instructions::oracle::handler(ctx, updater)
    }

    /// Push a new collateral price (updater only)
    pub fn update_price(ctx: Context<UpdatePrice>, new_price: u64) -> Result<()> {
        instructions::oracle::update_price_handler(ctx, new_price)
    }

    /// Supply deposit asset to the pool
    pub fn deposit(ctx: Context<Deposit>, amount: u64) -> Result<()> {
        instructions::deposit::handler(ctx, amount)
    }

    /// Withdraw deposit principal plus pending yield
    pub fn withdraw(ctx: Context<Withdraw>, amount: u64) -> Result<()> {
        instructions::withdraw::handler(ctx, amount)
    }

    /// Post collateral and draw deposit asset up to the LTV ceiling
    pub fn borrow(ctx: Context<Borrow>, collateral_amount: u64, debt_amount: u64) -> Result<()> {
        instructions::borrow::handler(ctx, collateral_amount, debt_amount)
    }

    /// Repay the full debt and recover all posted collateral
    pub fn repay(ctx: Context<Repay>) -> Result<()> {
        instructions::repay::handler(ctx)
    }

    /// Seize an under-collateralized position
    pub fn liquidate<'info>(
        ctx: Context<'_, '_, 'info, 'info, Liquidate<'info>>,
        min_debt_out: u64,
    ) -> Result<()> {
        instructions::liquidate::handler(ctx, min_debt_out)
    }

    /// Current debt of a borrow position, interest included
    pub fn get_debt(ctx: Context<GetDebt>) -> Result<u64> {
        instructions::queries::get_debt_handler(ctx)
    }

    /// Unclaimed yield on a deposit record at the stored index
    pub fn get_pending_yield(ctx: Context<GetPendingYield>) -> Result<u64> {
        instructions::queries::get_pending_yield_handler(ctx)
    }
}

// Re-export for external use
pub use constants::*;
pub use errors::*;
pub use state::*;
