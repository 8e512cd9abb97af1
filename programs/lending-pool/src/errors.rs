use anchor_lang::prelude::*;

#[error_code]
pub enum LendingError {
    #[msg("Amount exceeds the caller's recorded balance")]
    InvalidAmount,

    #[msg("Requested debt exceeds the LTV ceiling for the posted collateral")]
    ExceededMaxBorrow,

    #[msg("Position has no debt or is not below the liquidation threshold")]
    CannotBeLiquidated,

    #[msg("Asset transfer failed")]
    TransferFailed,

    #[msg("Oracle price unavailable or stale")]
    OracleUnavailable,

    #[msg("Collateral conversion failed during liquidation")]
    ConversionFailed,

    #[msg("Insufficient liquidity in the pool")]
    InsufficientLiquidity,

    #[msg("Math overflow")]
    MathOverflow,

    #[msg("Unauthorized")]
    Unauthorized,

    #[msg("Invalid pool configuration")]
    InvalidPoolConfig,
}
