use anchor_lang::prelude::*;

#[error_code]
pub enum VaultError {
    // Lifecycle Errors
    /// Surfaced by the vault PDA's `init` constraint when the pair exists;
    /// never constructed in handler code.
    #[msg("Vault already initialized for this pair.")]
    AlreadyInitialized,
    #[msg("Vault is paused.")]
    VaultPaused,

    // Authorization Errors
    #[msg("Unauthorized access attempt.")]
    Unauthorized,

    // Deposit / Withdraw Errors
    #[msg("Both deposit amounts are zero.")]
    ZeroDeposit,
    #[msg("Share amount is zero or exceeds supply.")]
    InvalidShareAmount,
    #[msg("Caller holds fewer shares than requested.")]
    InsufficientShares,
    #[msg("Insufficient balance for operation.")]
    InsufficientBalance,

    // Reserve / Math Errors
    #[msg("Reserve cannot cover the requested amount.")]
    InsufficientReserve,
    #[msg("Mathematical overflow detected.")]
    Overflow,

    // Rebalance Errors
    #[msg("External price must be positive.")]
    InvalidPrice,

    // Configuration Errors
    #[msg("Fee exceeds maximum allowed.")]
    InvalidFee,
    #[msg("Target ratio exceeds maximum allowed.")]
    InvalidRatio,
    #[msg("Invalid token provided.")]
    InvalidToken,
}
