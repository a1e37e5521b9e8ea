use anchor_lang::prelude::*;

// PDA Seeds - for deterministic address generation
#[constant]
pub const VAULT_SEED: &str = "vault";

#[constant]
pub const SHARE_MINT_SEED: &str = "share_mint";

#[constant]
pub const BASE_VAULT_SEED: &str = "base_vault";

#[constant]
pub const QUOTE_VAULT_SEED: &str = "quote_vault";

// Math Constants - for calculations and validations
#[constant]
pub const BPS_DENOMINATOR: u16 = 10_000; // 100%

#[constant]
pub const MAX_FEE_BASIS_POINTS: u16 = 10_000;

#[constant]
pub const MAX_RATIO_BASIS_POINTS: u16 = 10_000;

/// Rebalance deltas below this many quote units are treated as churn
/// and skipped without trading or charging a fee.
#[constant]
pub const MIN_REBALANCE_DELTA: u64 = 1_000;
