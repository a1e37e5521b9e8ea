use crate::{constants::*, error::VaultError, state::Vault};
use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

#[derive(Accounts)]
pub struct Initialize<'info> {
    /// Authority that controls rebalancing and fee sweeps
    #[account(mut)]
    pub authority: Signer<'info>,

    /// Destination identity for swept fees
    /// CHECK: stored as an address only; fee transfers validate the
    /// treasury's token accounts at sweep time
    pub treasury: UncheckedAccount<'info>,

    /// Base asset mint
    pub base_mint: Account<'info, Mint>,

    /// Quote asset mint
    pub quote_mint: Account<'info, Mint>,

    /// The vault account to be created, one per asset pair. The `init`
    /// constraint rejects a second initialization of the same pair; that
    /// runtime failure is the `VaultError::AlreadyInitialized` kind, which
    /// this program never reaches in handler code.
    #[account(
        init,
        payer = authority,
        space = 8 + Vault::INIT_SPACE,
        seeds = [VAULT_SEED.as_bytes(), base_mint.key().as_ref(), quote_mint.key().as_ref()],
        bump
    )]
    pub vault: Account<'info, Vault>,

    /// Share token mint to be created, minted and burned by the vault
    #[account(
        init,
        payer = authority,
        mint::decimals = 6,
        mint::authority = vault,
        seeds = [SHARE_MINT_SEED.as_bytes(), vault.key().as_ref()],
        bump
    )]
    pub share_mint: Account<'info, Mint>,

    /// Token account holding the base reserve
    #[account(
        init,
        payer = authority,
        token::mint = base_mint,
        token::authority = vault,
        seeds = [BASE_VAULT_SEED.as_bytes(), vault.key().as_ref()],
        bump
    )]
    pub base_vault: Account<'info, TokenAccount>,

    /// Token account holding the quote reserve
    #[account(
        init,
        payer = authority,
        token::mint = quote_mint,
        token::authority = vault,
        seeds = [QUOTE_VAULT_SEED.as_bytes(), vault.key().as_ref()],
        bump
    )]
    pub quote_vault: Account<'info, TokenAccount>,

    /// SPL token program
    pub token_program: Program<'info, Token>,

    /// System program
    pub system_program: Program<'info, System>,
}

impl<'info> Initialize<'info> {
    /// Validate the initialize parameters
    pub fn validate(&self, fee_bps: u16, target_ratio_bps: u16) -> Result<()> {
        require!(fee_bps <= MAX_FEE_BASIS_POINTS, VaultError::InvalidFee);
        require!(
            target_ratio_bps <= MAX_RATIO_BASIS_POINTS,
            VaultError::InvalidRatio
        );

        // a vault needs two distinct assets
        require!(
            self.base_mint.key() != self.quote_mint.key(),
            VaultError::InvalidToken
        );

        Ok(())
    }
}

/// Handler function for creating a new vault
pub fn initialize_handler(
    ctx: Context<Initialize>,
    fee_bps: u16,
    target_ratio_bps: u16,
) -> Result<()> {
    ctx.accounts.validate(fee_bps, target_ratio_bps)?;

    let vault = &mut ctx.accounts.vault;
    vault.authority = ctx.accounts.authority.key();
    vault.treasury = ctx.accounts.treasury.key();
    vault.base_mint = ctx.accounts.base_mint.key();
    vault.quote_mint = ctx.accounts.quote_mint.key();
    vault.share_mint = ctx.accounts.share_mint.key();
    vault.base_reserve = 0;
    vault.quote_reserve = 0;
    vault.share_supply = 0;
    vault.fee_bps = fee_bps;
    vault.target_ratio_bps = target_ratio_bps;
    vault.accrued_base_fees = 0;
    vault.accrued_quote_fees = 0;
    vault.last_rebalance_ts = 0;
    vault.paused = false;
    vault.bump = ctx.bumps.vault;
    vault.share_mint_bump = ctx.bumps.share_mint;

    msg!(
        "Vault initialized for pair {} / {}",
        vault.base_mint,
        vault.quote_mint
    );

    Ok(())
}
