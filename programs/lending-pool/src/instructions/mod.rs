pub mod borrow;
pub mod deposit;
pub mod init_pool;
pub mod liquidate;
pub mod oracle;
pub mod queries;
pub mod repay;
pub mod withdraw;

pub use borrow::*;
pub use deposit::*;
pub use init_pool::*;
pub use liquidate::*;
pub use oracle::*;
pub use queries::*;
pub use repay::*;
pub use withdraw::*;
