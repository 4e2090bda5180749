//! Call surface of the on-chain protocol consumed by the core.
//!
//! The `VaultProtocol` trait is the seam between the decision loop and the
//! live contracts; `ChainGateway` is the production implementation backed
//! by a `ProviderManager` for reads and a `LiquidatorContract` for the
//! liquidation write.

use alloy::primitives::{B256, U256};
use anyhow::Result;
use async_trait::async_trait;

use crate::contracts::{LiquidatorContract, SellOrderData, VaultData};
use crate::provider::ProviderManager;

/// Vault record observed from the registry.
///
/// All monetary fields are unsigned 18-decimal fixed point. Closure is
/// monotonic: once `closed` is observed true it never reverts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vault {
    /// Outstanding debt, denominated in the debt asset
    pub debt: U256,
    /// Posted collateral, denominated in the collateral asset
    pub collateral: U256,
    /// Whether the vault is permanently closed
    pub closed: bool,
}

impl From<VaultData> for Vault {
    fn from(data: VaultData) -> Self {
        Self {
            debt: data.debt,
            collateral: data.collateral,
            closed: data.closed,
        }
    }
}

/// Resting sell order at the head of the best-price queue.
///
/// A `price` of exactly zero means the book holds no resting sell orders;
/// it is a no-liquidity marker, not a valid price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SellOrder {
    /// Ask price, 18-decimal fixed point
    pub price: U256,
    /// Order size in the debt asset
    pub amount: U256,
}

impl From<SellOrderData> for SellOrder {
    fn from(data: SellOrderData) -> Self {
        Self {
            price: data.price,
            amount: data.amount,
        }
    }
}

/// Remote call surface of the vault protocol.
///
/// All methods are suspension points; failures surface as errors for the
/// caller to contain. Reads are side-effect free, `submit_liquidation` is
/// the only write.
#[async_trait]
pub trait VaultProtocol: Send + Sync {
    /// Current vault count upper bound; valid IDs are `[0, count)`.
    async fn vault_count(&self) -> Result<u64>;

    /// Fetch a vault record by ID.
    async fn vault(&self, id: u64) -> Result<Vault>;

    /// Whether the registry reports the vault eligible for liquidation.
    async fn detect_liquidation(&self, id: u64) -> Result<bool>;

    /// Order ID at the head of the best-price sell queue.
    async fn sell_head(&self, orderbook_index: U256) -> Result<U256>;

    /// Fetch a resting sell order by order ID.
    async fn sell_order(&self, order_id: U256) -> Result<SellOrder>;

    /// Submit a liquidation transaction; returns the transaction hash.
    async fn submit_liquidation(
        &self,
        id: u64,
        orderbook_index: U256,
        price: U256,
        debt: U256,
    ) -> Result<B256>;
}

/// Protocol gateway backed by live contracts.
pub struct ChainGateway {
    /// Read-side provider for registry and order book
    provider: ProviderManager,
    /// Liquidator contract wrapper (write side)
    liquidator: LiquidatorContract,
}

impl ChainGateway {
    /// Create a new gateway over a provider and liquidator contract.
    pub fn new(provider: ProviderManager, liquidator: LiquidatorContract) -> Self {
        Self {
            provider,
            liquidator,
        }
    }

    /// Get the underlying provider manager.
    pub fn provider(&self) -> &ProviderManager {
        &self.provider
    }
}

#[async_trait]
impl VaultProtocol for ChainGateway {
    async fn vault_count(&self) -> Result<u64> {
        self.provider.vault_count().await
    }

    async fn vault(&self, id: u64) -> Result<Vault> {
        self.provider.vault(id).await
    }

    async fn detect_liquidation(&self, id: u64) -> Result<bool> {
        self.provider.detect_liquidation(id).await
    }

    async fn sell_head(&self, orderbook_index: U256) -> Result<U256> {
        self.provider.sell_head(orderbook_index).await
    }

    async fn sell_order(&self, order_id: U256) -> Result<SellOrder> {
        self.provider.sell_order(order_id).await
    }

    async fn submit_liquidation(
        &self,
        id: u64,
        orderbook_index: U256,
        price: U256,
        debt: U256,
    ) -> Result<B256> {
        self.liquidator
            .liquidate(id, orderbook_index, price, debt)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vault_from_data() {
        let data = VaultData {
            debt: U256::from(100u64),
            collateral: U256::from(250u64),
            closed: false,
        };

        let vault = Vault::from(data);
        assert_eq!(vault.debt, U256::from(100u64));
        assert_eq!(vault.collateral, U256::from(250u64));
        assert!(!vault.closed);
    }

    #[test]
    fn test_sell_order_from_data() {
        let data = SellOrderData {
            price: U256::ZERO,
            amount: U256::from(5u64),
        };

        let order = SellOrder::from(data);
        assert!(order.price.is_zero());
        assert_eq!(order.amount, U256::from(5u64));
    }
}
