use crate::{
    constants::*,
    error::VaultError,
    events::Rebalanced,
    math::{self, TradeLeg},
    state::Vault,
};
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct Rebalance<'info> {
    /// Vault authority
    pub authority: Signer<'info>,

    /// Vault state for the pair
    #[account(
        mut,
        seeds = [VAULT_SEED.as_bytes(), vault.base_mint.as_ref(), vault.quote_mint.as_ref()],
        bump = vault.bump,
    )]
    pub vault: Account<'info, Vault>,
}

/// Handler function for rebalancing reserve composition toward the target
/// ratio at an externally supplied price.
///
/// The trade itself is simulated on the ledger; execution against a venue
/// is the transport layer's concern. Returns whether a trade was booked.
pub fn rebalance_handler(ctx: Context<Rebalance>, external_price: u64) -> Result<bool> {
    let vault = &mut ctx.accounts.vault;
    vault.require_authority(ctx.accounts.authority.key)?;
    vault.require_active()?;
    require!(external_price > 0, VaultError::InvalidPrice);

    let plan = math::rebalance_plan(
        vault.base_reserve,
        vault.quote_reserve,
        external_price,
        vault.target_ratio_bps,
        vault.fee_bps,
        MIN_REBALANCE_DELTA,
    )?;

    let Some(plan) = plan else {
        msg!("Rebalance delta below threshold, nothing to trade");
        return Ok(false);
    };

    let now = Clock::get()?.unix_timestamp as u64;
    vault.apply_rebalance(&plan, now)?;

    emit!(Rebalanced {
        vault: vault.key(),
        external_price,
        sold_base: plan.sold == TradeLeg::Base,
        traded: plan.traded,
        fee_accrued: plan.fee,
        timestamp: now,
    });

    Ok(true)
}
