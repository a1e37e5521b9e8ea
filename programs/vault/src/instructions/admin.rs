use crate::{
    constants::*,
    error::VaultError,
    events::{FeeUpdated, PauseToggled},
    state::Vault,
};
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct SetPause<'info> {
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

#[derive(Accounts)]
pub struct UpdateFee<'info> {
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

/// Pause or resume deposit, withdraw and rebalance activity. Fee sweeps
/// stay available so a pause can never strand the treasury path.
pub fn set_pause_handler(ctx: Context<SetPause>, paused: bool) -> Result<()> {
    let vault = &mut ctx.accounts.vault;
    vault.require_authority(ctx.accounts.authority.key)?;
    vault.paused = paused;

    emit!(PauseToggled {
        vault: vault.key(),
        paused,
    });

    Ok(())
}

/// Change the rebalance fee rate for future trades.
pub fn update_fee_handler(ctx: Context<UpdateFee>, fee_bps: u16) -> Result<()> {
    let vault = &mut ctx.accounts.vault;
    vault.require_authority(ctx.accounts.authority.key)?;
    require!(fee_bps <= MAX_FEE_BASIS_POINTS, VaultError::InvalidFee);
    vault.fee_bps = fee_bps;

    emit!(FeeUpdated {
        vault: vault.key(),
        fee_bps,
    });

    Ok(())
}
