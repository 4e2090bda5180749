//! Liquidator chain interaction layer.
//!
//! This crate provides:
//! - Provider management for HTTP connections
//! - Contract bindings for the Vault Registry, Order Book and Liquidator
//! - Transaction signing and sending with estimate-gas-before-send
//! - The `VaultProtocol` gateway trait consumed by the core decision loop

mod contracts;
mod gateway;
mod provider;
mod signer;

pub use contracts::LiquidatorContract;
pub use gateway::{ChainGateway, SellOrder, Vault, VaultProtocol};
pub use provider::ProviderManager;
pub use signer::{NonceManager, TransactionSender};
