//! Contract bindings for the vault protocol.
//!
//! This module provides type definitions and ABI constants for interacting
//! with the Vault Registry, Order Book and Liquidator contracts.

use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::sol;
use alloy::sol_types::SolCall;

// Define contract interfaces using sol! macro for ABI generation
sol! {
    /// Vault record as returned by the registry.
    #[derive(Debug)]
    struct VaultData {
        uint256 debt;
        uint256 collateral;
        bool closed;
    }

    /// Resting sell order as returned by the order book.
    #[derive(Debug)]
    struct SellOrderData {
        uint256 price;
        uint256 amount;
    }

    /// Vault registry interface (subset used for liquidation scanning)
    #[sol(rpc)]
    interface IVaultRegistry {
        function getID() external view returns (uint256);
        function getVault(uint256 _id) external view returns (VaultData memory);
        function detectLiquidation(uint256 _id) external view returns (bool);
    }

    /// Order book interface (best-price sell queue reads)
    #[sol(rpc)]
    interface IOrderBook {
        function getSellHead(uint256 _index) external view returns (uint256);
        function getSell(uint256 _orderID) external view returns (SellOrderData memory);
    }

    /// Flash-loan liquidator interface (matches deployed contract)
    interface ILiquidator {
        function liquidate(
            uint256 _id,
            uint256 _index,
            uint256 _price,
            uint256 _debt
        ) external;
    }
}

use crate::signer::TransactionSender;
use std::sync::Arc;

/// Liquidator contract wrapper with transaction sending capability.
pub struct LiquidatorContract {
    /// Contract address
    pub address: Address,
    /// Last encoded calldata, kept for inspection
    calldata_cache: parking_lot::RwLock<Option<Bytes>>,
    /// Transaction sender (optional)
    sender: Option<Arc<TransactionSender>>,
}

impl LiquidatorContract {
    /// Create a new Liquidator contract wrapper.
    pub fn new(address: Address) -> Self {
        Self {
            address,
            calldata_cache: parking_lot::RwLock::new(None),
            sender: None,
        }
    }

    /// Create a new Liquidator contract wrapper with transaction sender.
    pub fn with_sender(address: Address, sender: Arc<TransactionSender>) -> Self {
        Self {
            address,
            calldata_cache: parking_lot::RwLock::new(None),
            sender: Some(sender),
        }
    }

    /// Set the transaction sender.
    pub fn set_sender(&mut self, sender: Arc<TransactionSender>) {
        self.sender = Some(sender);
    }

    /// Encode liquidation calldata for a dry-run or inspection.
    pub fn encode_liquidate(
        &self,
        vault_id: u64,
        orderbook_index: U256,
        price: U256,
        debt: U256,
    ) -> Bytes {
        let call = ILiquidator::liquidateCall {
            _id: U256::from(vault_id),
            _index: orderbook_index,
            _price: price,
            _debt: debt,
        };

        Bytes::from(call.abi_encode())
    }

    /// Execute a liquidation transaction.
    ///
    /// Encodes the calldata, estimates gas on the prepared transaction and
    /// sends it from the operating account. Requires a sender to be
    /// configured via `with_sender` or `set_sender`.
    pub async fn liquidate(
        &self,
        vault_id: u64,
        orderbook_index: U256,
        price: U256,
        debt: U256,
    ) -> anyhow::Result<B256> {
        let calldata = self.encode_liquidate(vault_id, orderbook_index, price, debt);

        // Cache for inspection
        *self.calldata_cache.write() = Some(calldata.clone());

        if let Some(sender) = &self.sender {
            tracing::info!(
                contract = %self.address,
                vault = vault_id,
                price = %price,
                debt = %debt,
                calldata_len = calldata.len(),
                "Sending liquidation"
            );

            sender
                .send_transaction(self.address, calldata, U256::ZERO)
                .await
        } else {
            tracing::info!(
                contract = %self.address,
                vault = vault_id,
                calldata_len = calldata.len(),
                "Liquidation calldata encoded (signer required for actual execution)"
            );

            anyhow::bail!(
                "Transaction ready but signer not configured. Calldata: {} bytes",
                calldata.len()
            )
        }
    }

    /// Get cached calldata (for inspection/debugging).
    pub fn cached_calldata(&self) -> Option<Bytes> {
        self.calldata_cache.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_liquidate() {
        let contract = LiquidatorContract::new(Address::ZERO);
        let calldata = contract.encode_liquidate(
            7,
            U256::from(0u64),
            U256::from(2_000_000_000_000_000_000u128),
            U256::from(100_000_000_000_000_000_000u128),
        );

        // 4-byte selector + four 32-byte words
        assert_eq!(calldata.len(), 4 + 4 * 32);
        assert_eq!(&calldata[..4], ILiquidator::liquidateCall::SELECTOR.as_slice());
    }

    #[tokio::test]
    async fn test_liquidate_without_sender_caches_calldata() {
        let contract = LiquidatorContract::new(Address::ZERO);
        assert!(contract.cached_calldata().is_none());

        let result = contract
            .liquidate(0, U256::ZERO, U256::from(1u64), U256::from(1u64))
            .await;

        assert!(result.is_err());
        assert!(contract.cached_calldata().is_some());
    }
}
