//! Template Filter
//!
//! Admission rules deciding which catalog templates fit a portfolio.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::catalog::StrategyTemplate;
use crate::model::{Portfolio, RiskLevel};

use super::builder::DEFAULT_GAS_ESTIMATE_USD;

/// Whether a template may be recommended to a portfolio.
///
/// All three must hold:
/// - a low-tolerance portfolio never gets high or extreme risk
/// - with a target APY, the template reaches at least 80% of it
/// - the gas estimate fits the budget
pub fn matches_criteria(
    template: &StrategyTemplate,
    portfolio: &Portfolio,
    target_apy: Option<Decimal>,
    max_gas_usd: Decimal,
) -> bool {
    if portfolio.risk_tolerance == RiskLevel::Low && template.risk >= RiskLevel::High {
        return false;
    }

    if let Some(target) = target_apy {
        if template.expected_apy < target * dec!(0.8) {
            return false;
        }
    }

    Decimal::from(DEFAULT_GAS_ESTIMATE_USD) <= max_gas_usd
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    #[test]
    fn test_low_tolerance_excludes_high_risk() {
        let delta = catalog::template("delta_neutral_farming").unwrap();
        let low = Portfolio::new("0x1", dec!(10000), RiskLevel::Low);
        let medium = Portfolio::new("0x1", dec!(10000), RiskLevel::Medium);

        // Excluded even though 25% clears the target
        assert!(!matches_criteria(delta, &low, Some(dec!(20)), dec!(100)));
        assert!(matches_criteria(delta, &medium, Some(dec!(20)), dec!(100)));
    }

    #[test]
    fn test_target_apy_tolerance() {
        let pendle = catalog::template("pendle_pt").unwrap();
        let portfolio = Portfolio::new("0x1", dec!(10000), RiskLevel::Medium);

        // 10 >= 0.8 * 12.5
        assert!(matches_criteria(pendle, &portfolio, Some(dec!(12.5)), dec!(100)));
        assert!(!matches_criteria(pendle, &portfolio, Some(dec!(12.6)), dec!(100)));
        assert!(matches_criteria(pendle, &portfolio, None, dec!(100)));
    }

    #[test]
    fn test_gas_budget() {
        let pendle = catalog::template("pendle_pt").unwrap();
        let portfolio = Portfolio::new("0x1", dec!(10000), RiskLevel::Medium);

        assert!(matches_criteria(pendle, &portfolio, None, dec!(50)));
        assert!(!matches_criteria(pendle, &portfolio, None, dec!(49.99)));
    }
}
