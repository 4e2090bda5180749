//! Profitability evaluation for liquidation candidates.
//!
//! Given a vault's debt and collateral and the order book's best ask,
//! decides whether executing the liquidation clears the flash-loan fee
//! plus the operator's required margin. All arithmetic is 18-decimal
//! fixed point on `U256` with checked multiplication; a subtraction that
//! would go negative is a not-profitable outcome, never a value.

use alloy::primitives::U256;
use thiserror::Error;

use crate::math::checked_wad_mul;
use vault_liquidator_chain::Vault;

/// Default flash-loan fee rate: 9e14 per 1e18 (0.09%).
pub const DEFAULT_FLASH_LOAN_FEE_WAD: U256 = U256::from_limbs([900_000_000_000_000u64, 0, 0, 0]);

/// Arithmetic failure while evaluating a candidate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EvaluationError {
    #[error("fixed-point multiplication overflowed")]
    Overflow,
}

/// Computed economics of a liquidation candidate.
///
/// Ephemeral: exists only within one evaluation, never persisted.
#[derive(Debug, Clone, Copy)]
pub struct Evaluation {
    /// Collateral-asset cost of buying the debt at the best ask
    pub flash_loan_amount: U256,
    /// Flash-loan fee on the borrowed amount
    pub fee: U256,
    /// Collateral left over after repaying the flash loan (zero on underflow)
    pub profit: U256,
    /// Whether the liquidation clears fee plus required margin
    pub profitable: bool,
}

/// Evaluates liquidation candidates against a fee model and profit margin.
///
/// Fee rate and minimum profit are fixed at startup.
#[derive(Debug, Clone)]
pub struct ProfitabilityEvaluator {
    /// Flash-loan fee rate, fixed point per 1e18
    fee_rate_wad: U256,
    /// Required profit margin, 18-decimal fixed point
    minimum_profit: U256,
}

impl ProfitabilityEvaluator {
    /// Create an evaluator with the default flash-loan fee rate.
    pub fn new(minimum_profit: U256) -> Self {
        Self {
            fee_rate_wad: DEFAULT_FLASH_LOAN_FEE_WAD,
            minimum_profit,
        }
    }

    /// Override the flash-loan fee rate.
    pub fn with_fee_rate(mut self, fee_rate_wad: U256) -> Self {
        self.fee_rate_wad = fee_rate_wad;
        self
    }

    /// Get the required profit margin.
    pub fn minimum_profit(&self) -> U256 {
        self.minimum_profit
    }

    /// Evaluate a vault against the current best ask.
    ///
    /// `flash_loan_amount = ask_price * debt / 1e18` converts the debt into
    /// collateral-asset cost at the ask. The candidate is profitable iff
    /// `fee <= profit + minimum_profit` (equality counts), unless the flash
    /// loan exceeds the collateral, which forces not-profitable.
    ///
    /// Zero-debt vaults evaluate to not-profitable: the registry should
    /// never flag them, but liquidating one is an economic no-op and the
    /// remote contract is not trusted to exclude them.
    pub fn evaluate(&self, vault: &Vault, ask_price: U256) -> Result<Evaluation, EvaluationError> {
        if vault.debt.is_zero() {
            return Ok(Evaluation {
                flash_loan_amount: U256::ZERO,
                fee: U256::ZERO,
                profit: U256::ZERO,
                profitable: false,
            });
        }

        let flash_loan_amount =
            checked_wad_mul(ask_price, vault.debt).ok_or(EvaluationError::Overflow)?;
        let fee = checked_wad_mul(flash_loan_amount, self.fee_rate_wad)
            .ok_or(EvaluationError::Overflow)?;

        let profit = match vault.collateral.checked_sub(flash_loan_amount) {
            Some(profit) => profit,
            None => {
                // Flash loan costs more than the collateral is worth
                return Ok(Evaluation {
                    flash_loan_amount,
                    fee,
                    profit: U256::ZERO,
                    profitable: false,
                });
            }
        };

        let margin = profit
            .checked_add(self.minimum_profit)
            .ok_or(EvaluationError::Overflow)?;

        Ok(Evaluation {
            flash_loan_amount,
            fee,
            profit,
            profitable: fee <= margin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::WAD;

    fn wad(n: u64) -> U256 {
        U256::from(n) * WAD
    }

    fn vault(debt: U256, collateral: U256) -> Vault {
        Vault {
            debt,
            collateral,
            closed: false,
        }
    }

    #[test]
    fn test_profitable_candidate() {
        // debt 100, ask 2.0, collateral 250:
        // flash loan 200, profit 50, fee 200 * 0.0009 = 0.18
        let evaluator = ProfitabilityEvaluator::new(U256::ZERO);
        let eval = evaluator
            .evaluate(&vault(wad(100), wad(250)), wad(2))
            .unwrap();

        assert_eq!(eval.flash_loan_amount, wad(200));
        assert_eq!(eval.profit, wad(50));
        assert_eq!(eval.fee, U256::from(180_000_000_000_000_000u128));
        assert!(eval.profitable);
    }

    #[test]
    fn test_underflow_clamps_to_not_profitable() {
        // Same as above but collateral 150: profit would be -50
        let evaluator = ProfitabilityEvaluator::new(U256::ZERO);
        let eval = evaluator
            .evaluate(&vault(wad(100), wad(150)), wad(2))
            .unwrap();

        assert_eq!(eval.flash_loan_amount, wad(200));
        assert_eq!(eval.profit, U256::ZERO);
        assert!(!eval.profitable);
    }

    #[test]
    fn test_fee_equal_to_margin_is_profitable() {
        // Comparison is non-strict: fee == profit + minimum counts
        let evaluator = ProfitabilityEvaluator::new(U256::ZERO).with_fee_rate(WAD);
        // debt 1, ask 1.0, collateral 2: flash loan 1, profit 1, fee 1
        let eval = evaluator.evaluate(&vault(wad(1), wad(2)), wad(1)).unwrap();

        assert_eq!(eval.fee, eval.profit);
        assert!(eval.profitable);
    }

    #[test]
    fn test_minimum_profit_loosens_threshold() {
        // fee 1.0 against profit 0.5: unprofitable at margin zero,
        // profitable once the margin covers the gap
        let evaluator = ProfitabilityEvaluator::new(U256::ZERO).with_fee_rate(WAD);
        let v = vault(wad(1), wad(1) + WAD / U256::from(2u64));
        let eval = evaluator.evaluate(&v, wad(1)).unwrap();
        assert!(!eval.profitable);

        let evaluator = ProfitabilityEvaluator::new(wad(1)).with_fee_rate(WAD);
        let eval = evaluator.evaluate(&v, wad(1)).unwrap();
        assert!(eval.profitable);
    }

    #[test]
    fn test_fee_monotonicity() {
        // Raising the fee rate can only flip profitable -> unprofitable
        let v = vault(wad(100), wad(250));
        let low_fee = ProfitabilityEvaluator::new(U256::ZERO)
            .with_fee_rate(DEFAULT_FLASH_LOAN_FEE_WAD)
            .evaluate(&v, wad(2))
            .unwrap();
        let high_fee = ProfitabilityEvaluator::new(U256::ZERO)
            .with_fee_rate(WAD)
            .evaluate(&v, wad(2))
            .unwrap();

        assert!(low_fee.profitable);
        assert!(high_fee.fee > low_fee.fee);
        assert!(!high_fee.profitable);
    }

    #[test]
    fn test_zero_debt_is_not_profitable() {
        let evaluator = ProfitabilityEvaluator::new(U256::ZERO);
        let eval = evaluator
            .evaluate(&vault(U256::ZERO, wad(250)), wad(2))
            .unwrap();

        assert_eq!(eval.flash_loan_amount, U256::ZERO);
        assert_eq!(eval.fee, U256::ZERO);
        assert!(!eval.profitable);
    }

    #[test]
    fn test_overflow_is_an_error() {
        let evaluator = ProfitabilityEvaluator::new(U256::ZERO);
        let result = evaluator.evaluate(&vault(U256::MAX, U256::MAX), U256::MAX);

        assert_eq!(result.unwrap_err(), EvaluationError::Overflow);
    }
}
