//! Transaction signer and sender for liquidations.
//! Uses Alloy providers for type-safe RPC interactions.
//!
//! Gas is estimated on the prepared transaction before every send, with a
//! configurable headroom applied on top of the estimate. The account nonce
//! is tracked locally and re-synced from chain after a failed send.

use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use anyhow::{Context, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

/// Cached nonce manager for transaction submission.
/// Avoids an RPC round trip per transaction by tracking the nonce locally.
pub struct NonceManager {
    /// Current nonce (atomically incremented)
    current: AtomicU64,
    /// Last confirmed nonce from chain
    last_synced: AtomicU64,
}

impl NonceManager {
    /// Create new nonce manager with initial value from chain.
    pub fn new(initial_nonce: u64) -> Self {
        Self {
            current: AtomicU64::new(initial_nonce),
            last_synced: AtomicU64::new(initial_nonce),
        }
    }

    /// Get next nonce and increment counter.
    #[inline]
    pub fn next(&self) -> u64 {
        self.current.fetch_add(1, Ordering::SeqCst)
    }

    /// Get current nonce without incrementing.
    #[inline]
    pub fn current(&self) -> u64 {
        self.current.load(Ordering::SeqCst)
    }

    /// Sync nonce from chain (call periodically or on error).
    pub fn sync(&self, chain_nonce: u64) {
        let current = self.current.load(Ordering::SeqCst);
        // Only update if chain is ahead (handles tx confirmations)
        if chain_nonce > current {
            self.current.store(chain_nonce, Ordering::SeqCst);
        }
        self.last_synced.store(chain_nonce, Ordering::SeqCst);
    }

    /// Reset nonce to chain value (use after tx failure).
    pub fn reset(&self, chain_nonce: u64) {
        self.current.store(chain_nonce, Ordering::SeqCst);
        self.last_synced.store(chain_nonce, Ordering::SeqCst);
    }
}

/// Default gas headroom applied on top of the estimate (20%).
const DEFAULT_GAS_HEADROOM_BPS: u16 = 2_000;

/// Transaction sender bound to the operating account.
pub struct TransactionSender {
    /// RPC URL for sending transactions
    rpc_url: String,
    /// Signer wallet
    wallet: EthereumWallet,
    /// Signer address
    pub address: Address,
    /// Chain ID
    chain_id: u64,
    /// Cached nonce manager
    nonce_manager: NonceManager,
    /// Headroom applied on top of the gas estimate (basis points)
    gas_headroom_bps: u16,
}

impl TransactionSender {
    /// Create a new transaction sender from private key.
    ///
    /// Fetches the initial nonce from chain and caches it for fast
    /// submission.
    pub async fn new(private_key: &str, rpc_url: &str, chain_id: u64) -> Result<Self> {
        // Parse private key (with or without 0x prefix)
        let key_str = private_key.trim_start_matches("0x");
        let signer: PrivateKeySigner = key_str.parse().context("invalid private key")?;
        let address = signer.address();
        let wallet = EthereumWallet::from(signer);

        // Fetch initial nonce from chain
        let provider = ProviderBuilder::new().on_http(rpc_url.parse()?);
        let initial_nonce = provider.get_transaction_count(address).await?;
        let nonce_manager = NonceManager::new(initial_nonce);

        info!(
            address = %address,
            chain_id = chain_id,
            initial_nonce = initial_nonce,
            "Transaction sender initialized"
        );

        Ok(Self {
            rpc_url: rpc_url.to_string(),
            wallet,
            address,
            chain_id,
            nonce_manager,
            gas_headroom_bps: DEFAULT_GAS_HEADROOM_BPS,
        })
    }

    /// Set the gas headroom applied on top of estimates.
    pub fn with_gas_headroom(mut self, headroom_bps: u16) -> Self {
        self.gas_headroom_bps = headroom_bps;
        self
    }

    /// Estimate gas for the prepared transaction, then send it.
    ///
    /// Returns the transaction hash without waiting for the receipt; the
    /// next scan pass observes the outcome through vault state.
    pub async fn send_transaction(
        &self,
        to: Address,
        calldata: Bytes,
        value: U256,
    ) -> Result<B256> {
        let nonce = self.nonce_manager.next();

        let provider = ProviderBuilder::new()
            .wallet(self.wallet.clone())
            .on_http(self.rpc_url.parse()?);

        let mut tx = TransactionRequest::default()
            .with_from(self.address)
            .with_to(to)
            .with_input(calldata)
            .with_value(value)
            .with_nonce(nonce)
            .with_chain_id(self.chain_id);

        // Estimate gas on the prepared transaction before sending
        let estimate = match provider.estimate_gas(tx.clone()).await {
            Ok(gas) => gas,
            Err(e) => {
                self.sync_nonce().await;
                return Err(e).context("gas estimation failed");
            }
        };
        let gas_limit = apply_headroom(estimate, self.gas_headroom_bps);
        tx = tx.with_gas_limit(gas_limit);

        debug!(
            to = %to,
            nonce = nonce,
            gas_estimate = estimate,
            gas_limit = gas_limit,
            "Sending transaction"
        );

        let pending = match provider.send_transaction(tx).await {
            Ok(pending) => pending,
            Err(e) => {
                self.sync_nonce().await;
                return Err(e).context("transaction send failed");
            }
        };
        let tx_hash = *pending.tx_hash();

        info!(tx_hash = %tx_hash, nonce = nonce, "Transaction submitted");

        Ok(tx_hash)
    }

    /// Sync nonce from chain (call on error or periodically).
    pub async fn sync_nonce(&self) {
        let provider = match self.rpc_url.parse() {
            Ok(url) => ProviderBuilder::new().on_http(url),
            Err(e) => {
                warn!(error = %e, "Invalid RPC URL while syncing nonce");
                return;
            }
        };
        match provider.get_transaction_count(self.address).await {
            Ok(chain_nonce) => {
                self.nonce_manager.reset(chain_nonce);
                debug!(nonce = chain_nonce, "Nonce synced from chain");
            }
            Err(e) => {
                warn!(error = %e, "Failed to sync nonce from chain");
            }
        }
    }

    /// Get current cached nonce.
    pub fn current_nonce(&self) -> u64 {
        self.nonce_manager.current()
    }

    /// Get current balance of the operating account.
    pub async fn get_balance(&self) -> Result<U256> {
        let provider = ProviderBuilder::new().on_http(self.rpc_url.parse()?);
        let balance = provider.get_balance(self.address).await?;
        Ok(balance)
    }

    /// Get the RPC URL.
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }
}

/// Apply basis-points headroom to a gas estimate.
/// Returns: estimate * (10000 + headroom_bps) / 10000
fn apply_headroom(estimate: u64, headroom_bps: u16) -> u64 {
    (estimate as u128 * (10_000 + headroom_bps as u128) / 10_000) as u64
}

impl std::fmt::Debug for TransactionSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionSender")
            .field("address", &self.address)
            .field("chain_id", &self.chain_id)
            .field("rpc_url", &self.rpc_url)
            .field("gas_headroom_bps", &self.gas_headroom_bps)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nonce_manager() {
        let manager = NonceManager::new(10);

        assert_eq!(manager.current(), 10);
        assert_eq!(manager.next(), 10);
        assert_eq!(manager.current(), 11);
        assert_eq!(manager.next(), 11);
        assert_eq!(manager.current(), 12);

        // Sync should update if chain is ahead
        manager.sync(15);
        assert_eq!(manager.current(), 15);

        // Sync should not decrease
        manager.sync(10);
        assert_eq!(manager.current(), 15);

        // Reset forces update
        manager.reset(5);
        assert_eq!(manager.current(), 5);
    }

    #[test]
    fn test_apply_headroom() {
        // 20% on a 100k estimate
        assert_eq!(apply_headroom(100_000, 2_000), 120_000);
        // 0% is the identity
        assert_eq!(apply_headroom(100_000, 0), 100_000);
        // Small estimates keep sub-10k precision
        assert_eq!(apply_headroom(21_000, 2_000), 25_200);
    }

    #[tokio::test]
    #[ignore] // Requires network
    async fn test_sender_creation() {
        // Test private key (DO NOT USE IN PRODUCTION)
        let private_key = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
        let sender = TransactionSender::new(private_key, "https://eth.llamarpc.com", 1).await;

        assert!(sender.is_ok());
        let sender = sender.unwrap();
        // This is the expected address for the test private key (case-insensitive)
        assert_eq!(
            format!("{:?}", sender.address).to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }
}
