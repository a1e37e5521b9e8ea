#![allow(unexpected_cfgs)]
#![allow(deprecated)]

pub mod constants;
pub mod error;
pub mod events;
pub mod instructions;
pub mod math;
pub mod state;

use anchor_lang::prelude::*;

pub use constants::*;
pub use instructions::*;
pub use state::*;

declare_id!("57y2Lg2TEBxTvnfo5Jokj21SsAVeZyc6ijANBYXhm9bc");

#[program]
pub mod liquidity_vault {
    use super::*;

    /// Create the vault for a base/quote pair
    pub fn initialize(ctx: Context<Initialize>, fee_bps: u16, target_ratio_bps: u16) -> Result<()> {
        instructions::initialize::initialize_handler(ctx, fee_bps, target_ratio_bps)
    }

    /// Deposit both assets and receive vault shares
    pub fn deposit(ctx: Context<Deposit>, base_amount: u64, quote_amount: u64) -> Result<()> {
        instructions::deposit::deposit_handler(ctx, base_amount, quote_amount)
    }

    /// Redeem shares for a proportional slice of both reserves
    pub fn withdraw(ctx: Context<Withdraw>, share_amount: u64) -> Result<()> {
        instructions::withdraw::withdraw_handler(ctx, share_amount)
    }

    /// Move reserve composition toward the target ratio at the given price
    pub fn rebalance(ctx: Context<Rebalance>, external_price: u64) -> Result<bool> {
        instructions::rebalance::rebalance_handler(ctx, external_price)
    }

    /// Transfer accrued fees to the treasury
    pub fn sweep_fees(ctx: Context<SweepFees>) -> Result<()> {
        instructions::sweep_fees::sweep_fees_handler(ctx)
    }

    /// Pause or resume vault activity
    pub fn set_pause(ctx: Context<SetPause>, paused: bool) -> Result<()> {
        instructions::admin::set_pause_handler(ctx, paused)
    }

    /// Update the rebalance fee rate
    pub fn update_fee(ctx: Context<UpdateFee>, fee_bps: u16) -> Result<()> {
        instructions::admin::update_fee_handler(ctx, fee_bps)
    }
}
