//! Pure share-accounting and rebalance arithmetic.
//!
//! All intermediates widen to u128 before multiplying so that no product of
//! two u64 values can overflow. Division always floors, and the remainder is
//! retained by the vault so rounding can only favor existing share holders.

use anchor_lang::prelude::*;

use crate::{constants::BPS_DENOMINATOR, error::VaultError};

/// Which reserve leg a rebalance sells out of.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TradeLeg {
    Base,
    Quote,
}

/// Outcome of simulating a rebalance trade at an external price.
///
/// `traded` is the gross amount of the sold asset, `fee` the portion of it
/// retained in that asset's reserve as an accrued fee claim, `debited` the
/// post-fee amount actually removed from the sold reserve, and `acquired`
/// the converted amount credited to the other leg. Any post-fee value that
/// cannot convert to a whole unit of the bought asset stays in the sold
/// reserve as principal, so `debited <= traded - fee` and the ledger never
/// loses value to conversion rounding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RebalancePlan {
    pub sold: TradeLeg,
    pub traded: u64,
    pub fee: u64,
    pub debited: u64,
    pub acquired: u64,
}

/// Shares minted for a deposit of `base_amount` + `quote_amount` against the
/// pre-deposit reserves.
///
/// The first depositor defines the unit: shares equal the contributed sum.
/// Afterwards shares are priced against total reserve value, floored.
pub fn shares_for_deposit(
    share_supply: u64,
    base_reserve: u64,
    quote_reserve: u64,
    base_amount: u64,
    quote_amount: u64,
) -> Result<u64> {
    let contributed = base_amount
        .checked_add(quote_amount)
        .ok_or(VaultError::Overflow)?;
    require!(contributed > 0, VaultError::ZeroDeposit);

    if share_supply == 0 {
        return Ok(contributed);
    }

    let reserve_value = (base_reserve as u128)
        .checked_add(quote_reserve as u128)
        .ok_or(VaultError::Overflow)?;
    // Nonzero supply with empty reserves means outstanding shares have no
    // backing; minting against it would divide by zero.
    require!(reserve_value > 0, VaultError::InsufficientReserve);

    let shares = (share_supply as u128)
        .checked_mul(contributed as u128)
        .ok_or(VaultError::Overflow)?
        .checked_div(reserve_value)
        .ok_or(VaultError::Overflow)?;

    u64::try_from(shares).map_err(|_| VaultError::Overflow.into())
}

/// Proportional redemption of one reserve leg: `reserve * shares / supply`,
/// floored. The caller guarantees `0 < share_amount <= share_supply`.
pub fn redeemable(reserve: u64, share_amount: u64, share_supply: u64) -> Result<u64> {
    require!(
        share_amount > 0 && share_amount <= share_supply,
        VaultError::InvalidShareAmount
    );

    let out = (reserve as u128)
        .checked_mul(share_amount as u128)
        .ok_or(VaultError::Overflow)?
        .checked_div(share_supply as u128)
        .ok_or(VaultError::Overflow)?;

    // share_amount <= share_supply bounds the result by the reserve itself.
    u64::try_from(out).map_err(|_| VaultError::Overflow.into())
}

/// Fee charged on a traded amount at `fee_bps`, floored.
pub fn fee_on(traded: u64, fee_bps: u16) -> Result<u64> {
    let fee = (traded as u128)
        .checked_mul(fee_bps as u128)
        .ok_or(VaultError::Overflow)?
        .checked_div(BPS_DENOMINATOR as u128)
        .ok_or(VaultError::Overflow)?;
    u64::try_from(fee).map_err(|_| VaultError::Overflow.into())
}

/// Decides the trade that moves reserve composition toward
/// `target_ratio_bps` (the target quote share of portfolio value) at
/// `external_price` quote-per-base.
///
/// Returns `Ok(None)` when the delta is below `min_delta` quote units, so
/// negligible drifts never generate a fee-bearing trade.
pub fn rebalance_plan(
    base_reserve: u64,
    quote_reserve: u64,
    external_price: u64,
    target_ratio_bps: u16,
    fee_bps: u16,
    min_delta: u64,
) -> Result<Option<RebalancePlan>> {
    require!(external_price > 0, VaultError::InvalidPrice);

    let price = external_price as u128;
    let portfolio_value = (quote_reserve as u128)
        .checked_add(
            (base_reserve as u128)
                .checked_mul(price)
                .ok_or(VaultError::Overflow)?,
        )
        .ok_or(VaultError::Overflow)?;
    let target_quote = portfolio_value
        .checked_mul(target_ratio_bps as u128)
        .ok_or(VaultError::Overflow)?
        .checked_div(BPS_DENOMINATOR as u128)
        .ok_or(VaultError::Overflow)?;
    let current_quote = quote_reserve as u128;

    if current_quote >= target_quote {
        // Overweight quote: sell the surplus for base.
        let surplus = current_quote - target_quote;
        if surplus < min_delta as u128 {
            return Ok(None);
        }
        // surplus <= quote_reserve, so the cast cannot fail
        let traded = u64::try_from(surplus).map_err(|_| VaultError::Overflow)?;
        let fee = fee_on(traded, fee_bps)?;
        let net = traded.checked_sub(fee).ok_or(VaultError::Overflow)?;
        let acquired = u64::try_from(net as u128 / price).map_err(|_| VaultError::Overflow)?;
        // only whole base units convert; the sub-price remainder of `net`
        // stays in the quote reserve as principal
        let debited = acquired
            .checked_mul(external_price)
            .ok_or(VaultError::Overflow)?;
        Ok(Some(RebalancePlan {
            sold: TradeLeg::Quote,
            traded,
            fee,
            debited,
            acquired,
        }))
    } else {
        // Underweight quote: sell base to cover the deficit.
        let deficit = target_quote - current_quote;
        if deficit < min_delta as u128 {
            return Ok(None);
        }
        let traded = u64::try_from(deficit / price).map_err(|_| VaultError::Overflow)?;
        if traded == 0 {
            // Deficit smaller than one base unit at this price.
            return Ok(None);
        }
        let fee = fee_on(traded, fee_bps)?;
        let net = traded.checked_sub(fee).ok_or(VaultError::Overflow)?;
        let acquired = u64::try_from(
            (net as u128)
                .checked_mul(price)
                .ok_or(VaultError::Overflow)?,
        )
        .map_err(|_| VaultError::Overflow)?;
        // base converts exactly at an integer quote-per-base price
        Ok(Some(RebalancePlan {
            sold: TradeLeg::Base,
            traded,
            fee,
            debited: net,
            acquired,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_deposit_mints_contributed_sum() {
        let shares = shares_for_deposit(0, 0, 0, 1_000_000, 1_000_000).unwrap();
        assert_eq!(shares, 2_000_000);
    }

    #[test]
    fn first_deposit_single_sided() {
        assert_eq!(shares_for_deposit(0, 0, 0, 0, 750).unwrap(), 750);
    }

    #[test]
    fn zero_deposit_rejected() {
        let err = shares_for_deposit(0, 0, 0, 0, 0).unwrap_err();
        assert_eq!(err, VaultError::ZeroDeposit.into());
    }

    #[test]
    fn subsequent_deposit_priced_against_reserve_value() {
        // supply 2M backed by 2M of value: 1 share per unit contributed
        let shares = shares_for_deposit(2_000_000, 1_000_000, 1_000_000, 500_000, 500_000).unwrap();
        assert_eq!(shares, 1_000_000);
    }

    #[test]
    fn deposit_shares_floor_in_vaults_favor() {
        // V = 2, supply = 3: contributing 1 is worth 1.5 shares, minted as 1
        let shares = shares_for_deposit(3, 1, 1, 1, 0).unwrap();
        assert_eq!(shares, 1);
    }

    #[test]
    fn deposit_against_unbacked_supply_fails() {
        let err = shares_for_deposit(100, 0, 0, 10, 10).unwrap_err();
        assert_eq!(err, VaultError::InsufficientReserve.into());
    }

    #[test]
    fn redeem_half_the_supply() {
        assert_eq!(redeemable(1_000_000, 1_000_000, 2_000_000).unwrap(), 500_000);
    }

    #[test]
    fn redeem_full_supply_drains_reserve() {
        assert_eq!(redeemable(123_457, 2_000_000, 2_000_000).unwrap(), 123_457);
    }

    #[test]
    fn redeem_floors_remainder() {
        // 7 * 1 / 3 = 2.33.. -> 2, remainder stays in the reserve
        assert_eq!(redeemable(7, 1, 3).unwrap(), 2);
    }

    #[test]
    fn redeem_rejects_zero_and_oversized_amounts() {
        assert_eq!(
            redeemable(100, 0, 50).unwrap_err(),
            VaultError::InvalidShareAmount.into()
        );
        assert_eq!(
            redeemable(100, 51, 50).unwrap_err(),
            VaultError::InvalidShareAmount.into()
        );
    }

    #[test]
    fn ratio_matched_roundtrip_bounded_per_leg() {
        // deposit in the same proportion as the reserves: each leg comes
        // back at most what went in, short only the floor remainder
        let (mut base, mut quote, mut supply) = (3_000_000u64, 9_000_000u64, 10_000_001u64);
        let (dep_base, dep_quote) = (100_003u64, 300_009u64);

        let minted = shares_for_deposit(supply, base, quote, dep_base, dep_quote).unwrap();
        base += dep_base;
        quote += dep_quote;
        supply += minted;

        let base_out = redeemable(base, minted, supply).unwrap();
        let quote_out = redeemable(quote, minted, supply).unwrap();
        assert!(base_out <= dep_base);
        assert!(quote_out <= dep_quote);
    }

    #[test]
    fn imbalanced_roundtrip_bounded_in_total_value() {
        let (mut base, mut quote, mut supply) = (3_333_333u64, 7_777_777u64, 9_999_999u64);
        let (dep_base, dep_quote) = (123_456u64, 654_321u64);

        let minted = shares_for_deposit(supply, base, quote, dep_base, dep_quote).unwrap();
        base += dep_base;
        quote += dep_quote;
        supply += minted;

        let base_out = redeemable(base, minted, supply).unwrap();
        let quote_out = redeemable(quote, minted, supply).unwrap();
        assert!(base_out + quote_out <= dep_base + dep_quote);
    }

    #[test]
    fn share_price_monotone_over_deposit_withdraw_sequence() {
        let (mut base, mut quote, mut supply) = (0u64, 0u64, 0u64);
        let mut minted_lots: Vec<u64> = Vec::new();

        let deposits = [(1_000_000, 1_000_000), (17, 99_999), (250_001, 3)];
        for (b, q) in deposits {
            let prev = (base as u128 + quote as u128, supply as u128);
            let minted = shares_for_deposit(supply, base, quote, b, q).unwrap();
            base += b;
            quote += q;
            supply += minted;
            minted_lots.push(minted);
            // price(new) >= price(old) as a cross-multiplied fraction
            let now = (base as u128 + quote as u128, supply as u128);
            assert!(now.0 * prev.1 >= prev.0 * now.1);
        }

        for minted in minted_lots {
            let prev = (base as u128 + quote as u128, supply as u128);
            let b_out = redeemable(base, minted, supply).unwrap();
            let q_out = redeemable(quote, minted, supply).unwrap();
            base -= b_out;
            quote -= q_out;
            supply -= minted;
            if supply > 0 {
                let now = (base as u128 + quote as u128, supply as u128);
                assert!(now.0 * prev.1 >= prev.0 * now.1);
            }
        }
    }

    #[test]
    fn fee_is_bps_of_traded_amount() {
        assert_eq!(fee_on(500_000, 5).unwrap(), 250);
        assert_eq!(fee_on(500_000, 0).unwrap(), 0);
        assert_eq!(fee_on(10_000, 10_000).unwrap(), 10_000);
    }

    #[test]
    fn balanced_vault_needs_no_rebalance() {
        // base * price == quote and ratio 50/50: delta is exactly zero
        let plan = rebalance_plan(100, 1_000_000, 10_000, 5_000, 5, 1_000).unwrap();
        assert_eq!(plan, None);
    }

    #[test]
    fn sub_threshold_drift_is_skipped() {
        // surplus of 500 quote units, below the 1_000 minimum
        let plan = rebalance_plan(100, 1_001_000, 10_000, 5_000, 5, 1_000).unwrap();
        assert_eq!(plan, None);
    }

    #[test]
    fn overweight_quote_sells_quote() {
        // all value in quote, target 50/50 at price 10_000
        let plan = rebalance_plan(0, 1_000_000, 10_000, 5_000, 5, 1_000)
            .unwrap()
            .unwrap();
        assert_eq!(plan.sold, TradeLeg::Quote);
        assert_eq!(plan.traded, 500_000);
        assert_eq!(plan.fee, 250); // 500_000 * 5 / 10_000
        assert_eq!(plan.acquired, 49); // (500_000 - 250) / 10_000
        // only the 49 whole base units' worth of quote leaves the reserve;
        // the 9_750 sub-price remainder stays behind as principal
        assert_eq!(plan.debited, 490_000);
    }

    #[test]
    fn quote_sale_debits_exactly_the_converted_amount() {
        let price = 10_000u64;
        let plan = rebalance_plan(0, 1_000_000, price, 5_000, 5, 1_000)
            .unwrap()
            .unwrap();
        assert_eq!(plan.debited, plan.acquired * price);
        assert!(plan.debited + plan.fee <= plan.traded);
    }

    #[test]
    fn overweight_base_sells_base() {
        // all value in base, target 50/50 at price 10_000, fee 1%
        let plan = rebalance_plan(1_000, 0, 10_000, 5_000, 100, 1_000)
            .unwrap()
            .unwrap();
        assert_eq!(plan.sold, TradeLeg::Base);
        assert_eq!(plan.traded, 500); // 5_000_000 quote deficit / price
        assert_eq!(plan.fee, 5);
        assert_eq!(plan.debited, 495); // base converts exactly
        assert_eq!(plan.acquired, 4_950_000); // 495 base * price
    }

    #[test]
    fn deficit_below_one_base_unit_is_skipped() {
        // deficit of 5_000 quote at price 10_000 rounds to zero base sold
        let plan = rebalance_plan(1, 0, 10_000, 5_000, 0, 1_000).unwrap();
        assert_eq!(plan, None);
    }

    #[test]
    fn zero_price_rejected() {
        let err = rebalance_plan(1, 1, 0, 5_000, 5, 1_000).unwrap_err();
        assert_eq!(err, VaultError::InvalidPrice.into());
    }
}
