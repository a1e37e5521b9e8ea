use anchor_lang::prelude::*;

#[event]
pub struct DepositMade {
    pub vault: Pubkey,
    pub user: Pubkey,
    pub base_amount: u64,
    pub quote_amount: u64,
    pub shares_minted: u64,
}

#[event]
pub struct WithdrawalMade {
    pub vault: Pubkey,
    pub user: Pubkey,
    pub share_amount: u64,
    pub base_out: u64,
    pub quote_out: u64,
}

#[event]
pub struct Rebalanced {
    pub vault: Pubkey,
    pub external_price: u64,
    /// True when the base leg was sold for quote.
    pub sold_base: bool,
    pub traded: u64,
    pub fee_accrued: u64,
    pub timestamp: u64,
}

#[event]
pub struct FeesSwept {
    pub vault: Pubkey,
    pub treasury: Pubkey,
    pub base_swept: u64,
    pub quote_swept: u64,
}

#[event]
pub struct PauseToggled {
    pub vault: Pubkey,
    pub paused: bool,
}

#[event]
pub struct FeeUpdated {
    pub vault: Pubkey,
    pub fee_bps: u16,
}
