//! Best-ask price query against the order book.

use alloy::primitives::U256;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use vault_liquidator_chain::VaultProtocol;

/// Failure fetching the best ask.
#[derive(Debug, Error)]
pub enum PriceError {
    /// The order book holds no resting sell orders.
    #[error("no liquidity to trade for debt on the order book")]
    NoLiquidity,
    /// A registry or order book call failed.
    #[error(transparent)]
    Remote(#[from] anyhow::Error),
}

/// Fetches the best current ask for the debt asset from the order book.
///
/// No retries at this layer; callers decide whether a failure aborts the
/// candidate or the whole pass.
pub struct PriceOracle {
    gateway: Arc<dyn VaultProtocol>,
    orderbook_index: U256,
}

impl PriceOracle {
    /// Create an oracle bound to one order book.
    pub fn new(gateway: Arc<dyn VaultProtocol>, orderbook_index: U256) -> Self {
        Self {
            gateway,
            orderbook_index,
        }
    }

    /// Current best ask, 18-decimal fixed point.
    ///
    /// Reads the head of the best-price sell queue and that order's price.
    /// A zero price is the no-liquidity marker and fails with
    /// [`PriceError::NoLiquidity`].
    pub async fn best_ask(&self) -> Result<U256, PriceError> {
        let order_id = self.gateway.sell_head(self.orderbook_index).await?;
        let order = self.gateway.sell_order(order_id).await?;

        if order.price.is_zero() {
            return Err(PriceError::NoLiquidity);
        }

        debug!(order_id = %order_id, price = %order.price, "Best ask fetched");
        Ok(order.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::B256;
    use anyhow::Result;
    use async_trait::async_trait;
    use vault_liquidator_chain::{SellOrder, Vault};

    struct FixedBook {
        price: U256,
    }

    #[async_trait]
    impl VaultProtocol for FixedBook {
        async fn vault_count(&self) -> Result<u64> {
            unimplemented!("not used by the oracle")
        }

        async fn vault(&self, _id: u64) -> Result<Vault> {
            unimplemented!("not used by the oracle")
        }

        async fn detect_liquidation(&self, _id: u64) -> Result<bool> {
            unimplemented!("not used by the oracle")
        }

        async fn sell_head(&self, _orderbook_index: U256) -> Result<U256> {
            Ok(U256::from(42u64))
        }

        async fn sell_order(&self, order_id: U256) -> Result<SellOrder> {
            assert_eq!(order_id, U256::from(42u64));
            Ok(SellOrder {
                price: self.price,
                amount: U256::from(1u64),
            })
        }

        async fn submit_liquidation(
            &self,
            _id: u64,
            _orderbook_index: U256,
            _price: U256,
            _debt: U256,
        ) -> Result<B256> {
            unimplemented!("not used by the oracle")
        }
    }

    #[tokio::test]
    async fn test_best_ask_returns_head_price() {
        let book = Arc::new(FixedBook {
            price: U256::from(2_000_000_000_000_000_000u128),
        });
        let oracle = PriceOracle::new(book, U256::ZERO);

        let ask = oracle.best_ask().await.unwrap();
        assert_eq!(ask, U256::from(2_000_000_000_000_000_000u128));
    }

    #[tokio::test]
    async fn test_zero_price_is_no_liquidity() {
        let book = Arc::new(FixedBook { price: U256::ZERO });
        let oracle = PriceOracle::new(book, U256::ZERO);

        let err = oracle.best_ask().await.unwrap_err();
        assert!(matches!(err, PriceError::NoLiquidity));
    }
}
