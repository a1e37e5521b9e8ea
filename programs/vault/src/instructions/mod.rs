pub mod admin;
pub mod deposit;
pub mod initialize;
pub mod rebalance;
pub mod sweep_fees;
pub mod withdraw;

pub use admin::*;
pub use deposit::*;
pub use initialize::*;
pub use rebalance::*;
pub use sweep_fees::*;
pub use withdraw::*;
