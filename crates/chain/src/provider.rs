//! Provider management for registry and order book reads.
//! Uses Alloy providers for type-safe RPC interactions.

use alloy::primitives::{Address, U256};
use alloy::providers::{Provider, ProviderBuilder};
use anyhow::Result;
use tracing::{debug, info};

use crate::contracts::{IOrderBook, IVaultRegistry};
use crate::gateway::{SellOrder, Vault};

/// Read-side provider for the vault registry and order book contracts.
/// Uses Alloy typed providers instead of manual JSON-RPC.
#[derive(Clone)]
pub struct ProviderManager {
    /// HTTP RPC URL
    http_url: String,
    /// Vault registry address
    registry_address: Address,
    /// Order book address
    orderbook_address: Address,
}

impl ProviderManager {
    /// Create a new provider manager with Alloy providers.
    pub async fn new(
        http_url: &str,
        registry_address: Address,
        orderbook_address: Address,
    ) -> Result<Self> {
        info!(
            http = http_url,
            registry = %registry_address,
            orderbook = %orderbook_address,
            "Initializing provider manager with Alloy providers"
        );

        // Test connection
        let provider = ProviderBuilder::new().on_http(http_url.parse()?);
        let block = provider.get_block_number().await?;
        info!(block = block, "Provider connection verified");

        Ok(Self {
            http_url: http_url.to_string(),
            registry_address,
            orderbook_address,
        })
    }

    /// Get the HTTP URL.
    pub fn http_url(&self) -> &str {
        &self.http_url
    }

    /// Get the vault registry address.
    pub fn registry_address(&self) -> Address {
        self.registry_address
    }

    /// Get the order book address.
    pub fn orderbook_address(&self) -> Address {
        self.orderbook_address
    }

    /// Get current block number using Alloy provider.
    pub async fn block_number(&self) -> Result<u64> {
        let provider = ProviderBuilder::new().on_http(self.http_url.parse()?);
        let block = provider.get_block_number().await?;
        Ok(block)
    }

    /// Get chain ID using Alloy provider.
    pub async fn chain_id(&self) -> Result<u64> {
        let provider = ProviderBuilder::new().on_http(self.http_url.parse()?);
        let chain_id = provider.get_chain_id().await?;
        Ok(chain_id)
    }

    /// Current vault count upper bound from the registry.
    /// Vault IDs are dense and zero-based, so valid IDs are `[0, count)`.
    pub async fn vault_count(&self) -> Result<u64> {
        let provider = ProviderBuilder::new().on_http(self.http_url.parse()?);
        let registry = IVaultRegistry::new(self.registry_address, &provider);

        let count = registry.getID().call().await?;
        Ok(count._0.to::<u64>())
    }

    /// Fetch a vault record by ID.
    pub async fn vault(&self, id: u64) -> Result<Vault> {
        let provider = ProviderBuilder::new().on_http(self.http_url.parse()?);
        let registry = IVaultRegistry::new(self.registry_address, &provider);

        let vault = registry.getVault(U256::from(id)).call().await?;
        debug!(
            vault = id,
            debt = %vault._0.debt,
            collateral = %vault._0.collateral,
            closed = vault._0.closed,
            "Vault fetched"
        );

        Ok(Vault::from(vault._0))
    }

    /// Ask the registry whether a vault is eligible for liquidation.
    pub async fn detect_liquidation(&self, id: u64) -> Result<bool> {
        let provider = ProviderBuilder::new().on_http(self.http_url.parse()?);
        let registry = IVaultRegistry::new(self.registry_address, &provider);

        let detected = registry.detectLiquidation(U256::from(id)).call().await?;
        Ok(detected._0)
    }

    /// Order ID at the head of the best-price sell queue.
    pub async fn sell_head(&self, orderbook_index: U256) -> Result<U256> {
        let provider = ProviderBuilder::new().on_http(self.http_url.parse()?);
        let orderbook = IOrderBook::new(self.orderbook_address, &provider);

        let order_id = orderbook.getSellHead(orderbook_index).call().await?;
        Ok(order_id._0)
    }

    /// Fetch a resting sell order by order ID.
    pub async fn sell_order(&self, order_id: U256) -> Result<SellOrder> {
        let provider = ProviderBuilder::new().on_http(self.http_url.parse()?);
        let orderbook = IOrderBook::new(self.orderbook_address, &provider);

        let order = orderbook.getSell(order_id).call().await?;
        Ok(SellOrder::from(order._0))
    }

    /// Check if provider is healthy.
    pub async fn health_check(&self) -> Result<bool> {
        let block = self.block_number().await?;
        debug!(block = block, "Provider health check passed");
        Ok(block > 0)
    }
}
