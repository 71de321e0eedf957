//! Ratio calculation from raw statement figures
//!
//! A ratio whose denominator is not positive is left undefined (`None`) and
//! its name is recorded in `RatioSet::defaults_applied`. Consumers then use
//! the neutral defaults from `finrep_core`.

use finrep_core::{
    BalanceSheet, IncomeStatement, LeverageRatios, LiquidityRatios, ProfitabilityRatios, RatioSet,
};

/// Decimal places for profitability and return ratios
pub const PROFITABILITY_PRECISION: i32 = 3;

/// Decimal places for liquidity and leverage ratios
pub const BALANCE_PRECISION: i32 = 2;

/// Compute profitability, liquidity and leverage ratios
pub fn compute_ratios(income: &IncomeStatement, balance: &BalanceSheet) -> RatioSet {
    let mut applied = Vec::new();

    let net_margin = ratio(
        "net_margin",
        income.net_income,
        income.revenue,
        PROFITABILITY_PRECISION,
        &mut applied,
    );
    let return_on_assets = ratio(
        "return_on_assets",
        income.net_income,
        balance.assets,
        PROFITABILITY_PRECISION,
        &mut applied,
    );
    let return_on_equity = ratio(
        "return_on_equity",
        income.net_income,
        balance.equity,
        PROFITABILITY_PRECISION,
        &mut applied,
    );
    let current_ratio = ratio(
        "current_ratio",
        balance.cash + balance.receivables,
        balance.liabilities,
        BALANCE_PRECISION,
        &mut applied,
    );
    let debt_to_equity = ratio(
        "debt_to_equity",
        balance.liabilities,
        balance.equity,
        BALANCE_PRECISION,
        &mut applied,
    );

    if !applied.is_empty() {
        tracing::debug!(undefined = ?applied, "ratios left at neutral defaults");
    }

    RatioSet {
        profitability: ProfitabilityRatios {
            net_margin,
            return_on_assets,
            return_on_equity,
        },
        liquidity: LiquidityRatios { current_ratio },
        leverage: LeverageRatios { debt_to_equity },
        defaults_applied: applied,
    }
}

fn ratio(
    name: &str,
    numerator: f64,
    denominator: f64,
    places: i32,
    applied: &mut Vec<String>,
) -> Option<f64> {
    if !denominator.is_finite() || !numerator.is_finite() || denominator <= 0.0 {
        applied.push(name.to_string());
        return None;
    }
    Some(round_to(numerator / denominator, places))
}

/// Round half away from zero to `places` decimals
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
