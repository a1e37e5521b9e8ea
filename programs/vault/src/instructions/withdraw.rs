use crate::{
    constants::*,
    error::VaultError,
    events::WithdrawalMade,
    math,
    state::{ReserveSide, Vault},
};
use anchor_lang::prelude::*;
use anchor_spl::token::{self, Burn, Mint, Token, TokenAccount, Transfer};

#[derive(Accounts)]
pub struct Withdraw<'info> {
    /// User redeeming shares
    #[account(mut)]
    pub user: Signer<'info>,

    /// Vault state for the pair
    #[account(
        mut,
        seeds = [VAULT_SEED.as_bytes(), vault.base_mint.as_ref(), vault.quote_mint.as_ref()],
        bump = vault.bump,
    )]
    pub vault: Account<'info, Vault>,

    /// Share token mint
    #[account(
        mut,
        seeds = [SHARE_MINT_SEED.as_bytes(), vault.key().as_ref()],
        bump = vault.share_mint_bump,
    )]
    pub share_mint: Account<'info, Mint>,

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

    /// User's base token account
    #[account(
        mut,
        constraint = user_base_ata.mint == vault.base_mint @ VaultError::InvalidToken
    )]
    pub user_base_ata: Account<'info, TokenAccount>,

    /// User's quote token account
    #[account(
        mut,
        constraint = user_quote_ata.mint == vault.quote_mint @ VaultError::InvalidToken
    )]
    pub user_quote_ata: Account<'info, TokenAccount>,

    /// User's share token account
    #[account(
        mut,
        constraint = user_share_ata.mint == vault.share_mint @ VaultError::InvalidToken
    )]
    pub user_share_ata: Account<'info, TokenAccount>,

    /// SPL token program
    pub token_program: Program<'info, Token>,
}

impl<'info> Withdraw<'info> {
    /// Validate withdraw parameters
    pub fn validate(&self, share_amount: u64) -> Result<()> {
        self.vault.require_active()?;

        require!(
            share_amount > 0 && share_amount <= self.vault.share_supply,
            VaultError::InvalidShareAmount
        );
        require!(
            self.user_share_ata.amount >= share_amount,
            VaultError::InsufficientShares
        );

        Ok(())
    }

    /// Burn the redeemed shares; the user signs for their own tokens
    pub fn burn_shares(&self, share_amount: u64) -> Result<()> {
        let cpi_ctx = CpiContext::new(
            self.token_program.to_account_info(),
            Burn {
                mint: self.share_mint.to_account_info(),
                from: self.user_share_ata.to_account_info(),
                authority: self.user.to_account_info(),
            },
        );
        token::burn(cpi_ctx, share_amount)
    }

    /// Pay both legs out of the reserves with the vault PDA as signer
    pub fn transfer_to_user(&self, base_out: u64, quote_out: u64) -> Result<()> {
        let seeds = &[
            VAULT_SEED.as_bytes(),
            self.vault.base_mint.as_ref(),
            self.vault.quote_mint.as_ref(),
            &[self.vault.bump],
        ];
        let signer_seeds = &[&seeds[..]];

        if base_out > 0 {
            let cpi_ctx = CpiContext::new_with_signer(
                self.token_program.to_account_info(),
                Transfer {
                    from: self.base_vault.to_account_info(),
                    to: self.user_base_ata.to_account_info(),
                    authority: self.vault.to_account_info(),
                },
                signer_seeds,
            );
            token::transfer(cpi_ctx, base_out)?;
        }

        if quote_out > 0 {
            let cpi_ctx = CpiContext::new_with_signer(
                self.token_program.to_account_info(),
                Transfer {
                    from: self.quote_vault.to_account_info(),
                    to: self.user_quote_ata.to_account_info(),
                    authority: self.vault.to_account_info(),
                },
                signer_seeds,
            );
            token::transfer(cpi_ctx, quote_out)?;
        }

        Ok(())
    }
}

/// Handler function for redeeming shares against the reserves
pub fn withdraw_handler(ctx: Context<Withdraw>, share_amount: u64) -> Result<()> {
    ctx.accounts.validate(share_amount)?;

    let vault = &ctx.accounts.vault;
    let base_out = math::redeemable(vault.base_reserve, share_amount, vault.share_supply)?;
    let quote_out = math::redeemable(vault.quote_reserve, share_amount, vault.share_supply)?;

    // payouts come out of principal only, never the accrued fee claim
    require!(
        base_out <= vault.available(ReserveSide::Base)
            && quote_out <= vault.available(ReserveSide::Quote),
        VaultError::InsufficientReserve
    );

    ctx.accounts.burn_shares(share_amount)?;
    ctx.accounts.transfer_to_user(base_out, quote_out)?;

    let vault = &mut ctx.accounts.vault;
    vault.record_withdraw(share_amount, base_out, quote_out)?;

    emit!(WithdrawalMade {
        vault: vault.key(),
        user: ctx.accounts.user.key(),
        share_amount,
        base_out,
        quote_out,
    });

    Ok(())
}
