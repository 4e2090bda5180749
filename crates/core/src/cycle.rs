//! One full scan-evaluate-execute pass over the vault registry.
//!
//! The pass is strictly sequential: one vault's read-evaluate-submit
//! sequence completes (or fails) before the next begins. Per-vault
//! failures are contained and logged; only a failure reading the vault
//! count aborts the pass.

use alloy::primitives::U256;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::cache::ClosedVaultCache;
use crate::evaluator::ProfitabilityEvaluator;
use crate::math::wad_to_f64;
use crate::oracle::{PriceError, PriceOracle};
use vault_liquidator_chain::VaultProtocol;

/// Where a scanned vault ended up within one pass.
enum VaultOutcome {
    Closed,
    Healthy,
    NoLiquidity,
    Unprofitable,
    Submitted,
}

/// Summary of one scan pass, for observability.
#[derive(Debug, Clone)]
pub struct CycleReport {
    /// Pass start time
    pub started_at: DateTime<Utc>,
    /// Wall-clock duration of the pass
    pub duration: Duration,
    /// Vault IDs visited
    pub scanned: u64,
    /// Skipped via the closed-vault cache, no remote reads
    pub known_closed: u64,
    /// Observed closed this pass and memoized
    pub newly_closed: u64,
    /// Registry reported not eligible for liquidation
    pub healthy: u64,
    /// Vaults the registry flagged as eligible for liquidation
    pub candidates: u64,
    /// Skipped because the order book had no resting sell orders
    pub no_liquidity: u64,
    /// Evaluated but below the profitability threshold
    pub unprofitable: u64,
    /// Liquidation transactions submitted
    pub submitted: u64,
    /// Per-vault failures contained within the pass
    pub failed: u64,
}

impl CycleReport {
    fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            duration: Duration::ZERO,
            scanned: 0,
            known_closed: 0,
            newly_closed: 0,
            healthy: 0,
            candidates: 0,
            no_liquidity: 0,
            unprofitable: 0,
            submitted: 0,
            failed: 0,
        }
    }
}

/// Orchestrates one full pass over all vaults.
///
/// Not reentrant: the scheduler serializes passes so the same vault is
/// never evaluated twice concurrently.
pub struct LiquidationCycle {
    gateway: Arc<dyn VaultProtocol>,
    oracle: PriceOracle,
    evaluator: ProfitabilityEvaluator,
    cache: ClosedVaultCache,
    orderbook_index: U256,
}

impl LiquidationCycle {
    /// Create a cycle over a gateway, with the evaluator fixed at startup.
    pub fn new(
        gateway: Arc<dyn VaultProtocol>,
        evaluator: ProfitabilityEvaluator,
        orderbook_index: U256,
    ) -> Self {
        let oracle = PriceOracle::new(gateway.clone(), orderbook_index);
        Self {
            gateway,
            oracle,
            evaluator,
            cache: ClosedVaultCache::new(),
            orderbook_index,
        }
    }

    /// Closed-vault memoization state.
    pub fn closed_cache(&self) -> &ClosedVaultCache {
        &self.cache
    }

    /// Run one scan pass over `[0, vault_count)`.
    ///
    /// Fails only if the vault count itself cannot be read; every
    /// per-vault failure is logged, counted and contained.
    pub async fn run_once(&mut self) -> Result<CycleReport> {
        let started_at = Utc::now();
        let pass_start = Instant::now();

        let count = self
            .gateway
            .vault_count()
            .await
            .context("reading vault count from registry")?;

        let mut report = CycleReport::new(started_at);

        for id in 0..count {
            report.scanned += 1;

            if self.cache.is_known_closed(id) {
                report.known_closed += 1;
                continue;
            }

            match self.scan_vault(id).await {
                Ok(VaultOutcome::Closed) => report.newly_closed += 1,
                Ok(VaultOutcome::Healthy) => report.healthy += 1,
                Ok(VaultOutcome::NoLiquidity) => {
                    report.candidates += 1;
                    report.no_liquidity += 1;
                }
                Ok(VaultOutcome::Unprofitable) => {
                    report.candidates += 1;
                    report.unprofitable += 1;
                }
                Ok(VaultOutcome::Submitted) => {
                    report.candidates += 1;
                    report.submitted += 1;
                }
                Err(e) => {
                    warn!(vault = id, error = %e, "Vault scan failed, continuing pass");
                    report.failed += 1;
                }
            }
        }

        report.duration = pass_start.elapsed();

        info!(
            scanned = report.scanned,
            known_closed = report.known_closed,
            newly_closed = report.newly_closed,
            healthy = report.healthy,
            candidates = report.candidates,
            no_liquidity = report.no_liquidity,
            unprofitable = report.unprofitable,
            submitted = report.submitted,
            failed = report.failed,
            duration_ms = report.duration.as_millis(),
            "Scan pass complete"
        );

        Ok(report)
    }

    /// Scan a single vault: fetch, check eligibility, price, evaluate,
    /// and submit if profitable.
    async fn scan_vault(&mut self, id: u64) -> Result<VaultOutcome> {
        let vault = self.gateway.vault(id).await?;

        if vault.closed {
            self.cache.mark_closed(id);
            debug!(vault = id, "Vault closed, memoized for all future passes");
            return Ok(VaultOutcome::Closed);
        }

        if !self.gateway.detect_liquidation(id).await? {
            return Ok(VaultOutcome::Healthy);
        }

        let ask_price = match self.oracle.best_ask().await {
            Ok(price) => price,
            Err(PriceError::NoLiquidity) => {
                warn!(vault = id, "No liquidity on order book, skipping vault");
                return Ok(VaultOutcome::NoLiquidity);
            }
            Err(PriceError::Remote(e)) => return Err(e),
        };

        let eval = self.evaluator.evaluate(&vault, ask_price)?;

        if !eval.profitable {
            debug!(
                vault = id,
                ask = %ask_price,
                flash_loan = %eval.flash_loan_amount,
                fee = %eval.fee,
                profit = %eval.profit,
                "Not profitable, skipping vault"
            );
            return Ok(VaultOutcome::Unprofitable);
        }

        info!(
            vault = id,
            ask = %ask_price,
            flash_loan = %eval.flash_loan_amount,
            fee = %eval.fee,
            profit = %eval.profit,
            profit_approx = wad_to_f64(eval.profit),
            "Submitting liquidation"
        );

        let tx_hash = self
            .gateway
            .submit_liquidation(id, self.orderbook_index, ask_price, vault.debt)
            .await?;

        info!(vault = id, tx_hash = %tx_hash, "Liquidation submitted");
        Ok(VaultOutcome::Submitted)
    }
}
