/// Flat yearly borrow rate in percent. No utilization curve.
pub const INTEREST_RATE_PCT: u64 = 10;

/// Maximum borrowable value as a percentage of collateral value.
pub const LTV_PCT: u64 = 70;

/// A position becomes seizable once its collateral value falls below this
/// percentage of its debt.
pub const LIQUIDATION_THRESHOLD_PCT: u64 = 90;

/// Share of seized collateral paid to whoever triggers a liquidation.
pub const LIQUIDATOR_BOUNTY_PCT: u64 = 10;

/// Scale of the cumulative yield index: basis points of deposit asset
/// per unit deposited.
pub const YIELD_INDEX_SCALE: u64 = 10_000;

/// Seconds per year (approximate).
pub const ONE_YEAR_IN_SECS: u64 = 31_536_000;

/// Seed value for `total_deposits` so yield distribution never divides by
/// zero before the first real deposit exists.
pub const DEPOSIT_SEED: u64 = 1;

/// Extra unit added to the debt on full repayment so the floor division in
/// the interest math can never leave residual debt dust behind.
pub const REPAY_ROUNDING_BUFFER: u64 = 1;

/// Oldest oracle price the pool will act on. The off-chain pusher updates
/// every five minutes; three missed pushes mark the feed unavailable.
pub const MAX_PRICE_AGE_SECS: i64 = 900;

/// PDA seed prefixes
pub const POOL_SEED: &[u8] = b"pool";
pub const DEPOSIT_RECORD_SEED: &[u8] = b"deposit";
pub const COLLATERAL_RECORD_SEED: &[u8] = b"collateral";
pub const BORROW_RECORD_SEED: &[u8] = b"borrow";
pub const ORACLE_SEED: &[u8] = b"oracle";
