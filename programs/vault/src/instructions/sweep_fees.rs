use crate::{constants::*, error::VaultError, events::FeesSwept, state::Vault};
use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

#[derive(Accounts)]
pub struct SweepFees<'info> {
    /// Vault authority
    pub authority: Signer<'info>,

    /// Vault state for the pair
    #[account(
        mut,
        seeds = [VAULT_SEED.as_bytes(), vault.base_mint.as_ref(), vault.quote_mint.as_ref()],
        bump = vault.bump,
    )]
    pub vault: Account<'info, Vault>,

    /// Token account holding the base reserve
    #[account(
        mut,
        seeds = [BASE_VAULT_SEED.as_bytes(), vault.key().as_ref()],
        bump,
        token::mint = vault.base_mint,
        token::authority = vault
    )]
    pub base_vault: Account<'info, TokenAccount>,

    /// Token account holding the quote reserve
    #[account(
        mut,
        seeds = [QUOTE_VAULT_SEED.as_bytes(), vault.key().as_ref()],
        bump,
        token::mint = vault.quote_mint,
        token::authority = vault
    )]
    pub quote_vault: Account<'info, TokenAccount>,

    /// Treasury's base token account
    #[account(
        mut,
        constraint = treasury_base_ata.owner == vault.treasury @ VaultError::InvalidToken,
        constraint = treasury_base_ata.mint == vault.base_mint @ VaultError::InvalidToken
    )]
    pub treasury_base_ata: Account<'info, TokenAccount>,

    /// Treasury's quote token account
    #[account(
        mut,
        constraint = treasury_quote_ata.owner == vault.treasury @ VaultError::InvalidToken,
        constraint = treasury_quote_ata.mint == vault.quote_mint @ VaultError::InvalidToken
    )]
    pub treasury_quote_ata: Account<'info, TokenAccount>,

    /// SPL token program
    pub token_program: Program<'info, Token>,
}

impl<'info> SweepFees<'info> {
    /// Transfer accrued amounts to the treasury with the vault PDA as signer
    pub fn transfer_to_treasury(&self, base_fees: u64, quote_fees: u64) -> Result<()> {
        let seeds = &[
            VAULT_SEED.as_bytes(),
            self.vault.base_mint.as_ref(),
            self.vault.quote_mint.as_ref(),
            &[self.vault.bump],
        ];
        let signer_seeds = &[&seeds[..]];

        if base_fees > 0 {
            let cpi_ctx = CpiContext::new_with_signer(
                self.token_program.to_account_info(),
                Transfer {
                    from: self.base_vault.to_account_info(),
                    to: self.treasury_base_ata.to_account_info(),
                    authority: self.vault.to_account_info(),
                },
                signer_seeds,
            );
            token::transfer(cpi_ctx, base_fees)?;
        }

        if quote_fees > 0 {
            let cpi_ctx = CpiContext::new_with_signer(
                self.token_program.to_account_info(),
                Transfer {
                    from: self.quote_vault.to_account_info(),
                    to: self.treasury_quote_ata.to_account_info(),
                    authority: self.vault.to_account_info(),
                },
                signer_seeds,
            );
            token::transfer(cpi_ctx, quote_fees)?;
        }

        Ok(())
    }
}

/// Handler function for sweeping accrued fees to the treasury.
///
/// Idempotent: with nothing accrued it is a no-op, so repeated calls are
/// safe and the second of two back-to-back sweeps always moves zero.
pub fn sweep_fees_handler(ctx: Context<SweepFees>) -> Result<()> {
    let vault = &ctx.accounts.vault;
    vault.require_authority(ctx.accounts.authority.key)?;

    let base_fees = vault.accrued_base_fees;
    let quote_fees = vault.accrued_quote_fees;
    if base_fees == 0 && quote_fees == 0 {
        msg!("No accrued fees to sweep");
        return Ok(());
    }

    ctx.accounts.transfer_to_treasury(base_fees, quote_fees)?;

    let vault = &mut ctx.accounts.vault;
    let (base_swept, quote_swept) = vault.take_accrued_fees()?;

    emit!(FeesSwept {
        vault: vault.key(),
        treasury: vault.treasury,
        base_swept,
        quote_swept,
    });

    Ok(())
}
