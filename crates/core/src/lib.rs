//! Liquidator core logic.
//!
//! This crate provides the core liquidation agent functionality:
//! - WAD fixed-point arithmetic with checked multiplication
//! - Profitability evaluation against a flash-loan fee model
//! - Closed-vault memoization
//! - Best-ask price query against the order book
//! - The scan-evaluate-execute cycle and its fixed-interval scheduler
//! - Tunable configuration with profile support

mod cache;
pub mod config;
mod cycle;
mod evaluator;
pub mod math;
mod oracle;
mod scheduler;

pub use cache::ClosedVaultCache;
pub use config::{BotConfig, LiquidationTuning, SchedulerTuning};
pub use cycle::{CycleReport, LiquidationCycle};
pub use evaluator::{
    Evaluation, EvaluationError, ProfitabilityEvaluator, DEFAULT_FLASH_LOAN_FEE_WAD,
};
pub use oracle::{PriceError, PriceOracle};
pub use scheduler::Scheduler;
