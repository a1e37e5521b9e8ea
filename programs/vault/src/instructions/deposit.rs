use crate::{constants::*, error::VaultError, events::DepositMade, math, state::Vault};
use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token::{self, Mint, MintTo, Token, TokenAccount, Transfer},
};

#[derive(Accounts)]
pub struct Deposit<'info> {
    /// User depositing into the vault
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
        init_if_needed,
        payer = user,
        associated_token::mint = share_mint,
        associated_token::authority = user,
    )]
    pub user_share_ata: Account<'info, TokenAccount>,

    /// SPL token program
    pub token_program: Program<'info, Token>,

    /// Associated token program
    pub associated_token_program: Program<'info, AssociatedToken>,

    /// System program
    pub system_program: Program<'info, System>,
}

impl<'info> Deposit<'info> {
    /// Validate deposit parameters
    pub fn validate(&self, base_amount: u64, quote_amount: u64) -> Result<()> {
        self.vault.require_active()?;

        require!(base_amount > 0 || quote_amount > 0, VaultError::ZeroDeposit);

        require!(
            self.user_base_ata.amount >= base_amount,
            VaultError::InsufficientBalance
        );
        require!(
            self.user_quote_ata.amount >= quote_amount,
            VaultError::InsufficientBalance
        );

        Ok(())
    }

    /// Move both legs from the user into the reserve vaults. Settles before
    /// any shares are accounted for, so shares are never minted against
    /// un-received funds.
    pub fn transfer_to_reserves(&self, base_amount: u64, quote_amount: u64) -> Result<()> {
        if base_amount > 0 {
            let cpi_ctx = CpiContext::new(
                self.token_program.to_account_info(),
                Transfer {
                    from: self.user_base_ata.to_account_info(),
                    to: self.base_vault.to_account_info(),
                    authority: self.user.to_account_info(),
                },
            );
            token::transfer(cpi_ctx, base_amount)?;
        }

        if quote_amount > 0 {
            let cpi_ctx = CpiContext::new(
                self.token_program.to_account_info(),
                Transfer {
                    from: self.user_quote_ata.to_account_info(),
                    to: self.quote_vault.to_account_info(),
                    authority: self.user.to_account_info(),
                },
            );
            token::transfer(cpi_ctx, quote_amount)?;
        }

        Ok(())
    }

    /// Mint share tokens to the user with the vault PDA as signer
    pub fn mint_shares(&self, shares: u64) -> Result<()> {
        let seeds = &[
            VAULT_SEED.as_bytes(),
            self.vault.base_mint.as_ref(),
            self.vault.quote_mint.as_ref(),
            &[self.vault.bump],
        ];
        let signer_seeds = &[&seeds[..]];

        let cpi_ctx = CpiContext::new_with_signer(
            self.token_program.to_account_info(),
            MintTo {
                mint: self.share_mint.to_account_info(),
                to: self.user_share_ata.to_account_info(),
                authority: self.vault.to_account_info(),
            },
            signer_seeds,
        );
        token::mint_to(cpi_ctx, shares)
    }
}

/// Handler function for depositing into the vault
pub fn deposit_handler(ctx: Context<Deposit>, base_amount: u64, quote_amount: u64) -> Result<()> {
    ctx.accounts.validate(base_amount, quote_amount)?;

    // price the deposit against pre-deposit reserves
    let vault = &ctx.accounts.vault;
    let shares = math::shares_for_deposit(
        vault.share_supply,
        vault.base_reserve,
        vault.quote_reserve,
        base_amount,
        quote_amount,
    )?;

    // transfer-then-account ordering
    ctx.accounts.transfer_to_reserves(base_amount, quote_amount)?;
    ctx.accounts.mint_shares(shares)?;

    let vault = &mut ctx.accounts.vault;
    vault.record_deposit(base_amount, quote_amount, shares)?;

    emit!(DepositMade {
        vault: vault.key(),
        user: ctx.accounts.user.key(),
        base_amount,
        quote_amount,
        shares_minted: shares,
    });

    Ok(())
}
