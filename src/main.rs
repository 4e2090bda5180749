//! Vault Liquidation Agent
//!
//! Automated liquidation agent for a collateralized-debt vault protocol.
//! Features:
//! - Sequential scan over the vault registry at a fixed interval
//! - Profitability evaluation against the order book best ask and a
//!   flash-loan fee model
//! - Closed-vault memoization to avoid repeat reads
//! - Pass-failure containment with a bounded alarm

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vault_liquidator_chain::{
    ChainGateway, LiquidatorContract, ProviderManager, TransactionSender, VaultProtocol,
};
use vault_liquidator_core::{BotConfig, LiquidationCycle, ProfitabilityEvaluator, Scheduler};

/// Environment variable names.
mod env {
    pub const RPC_HTTP_URL: &str = "RPC_HTTP_URL";
    pub const VAULT_REGISTRY_ADDRESS: &str = "VAULT_REGISTRY_ADDRESS";
    pub const ORDERBOOK_ADDRESS: &str = "ORDERBOOK_ADDRESS";
    pub const LIQUIDATOR_ADDRESS: &str = "LIQUIDATOR_ADDRESS";
    pub const ADMIN_PRIVATE_KEY: &str = "ADMIN_PRIVATE_KEY";
    pub const ADMIN_ACCOUNT: &str = "ADMIN_ACCOUNT";
    pub const ORDERBOOK_INDEX: &str = "ORDERBOOK_INDEX";
    pub const MINIMUM_PROFIT: &str = "MINIMUM_PROFIT";
    pub const LIQUIDATION_FREQUENCY: &str = "LIQUIDATION_FREQUENCY";
}

#[tokio::main]
async fn main() -> Result<()> {
    // Print startup banner
    print_banner();

    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("info,vault_liquidator_core=debug,vault_liquidator_chain=debug")
        }))
        .init();

    // Load tunables (BOT_PROFILE selects testing, production, or a file)
    let bot_config = BotConfig::from_env();
    bot_config.log_config();

    info!("Starting Vault Liquidation Agent");

    // Load deployment configuration; every variable is required
    let config = load_config()?;

    // Initialize components and verify the operating account
    let scheduler = initialize_components(config, bot_config).await?;

    // Run main loop
    info!("Starting scan loop...");
    scheduler.run().await
}

/// Configuration loaded from environment.
struct Config {
    rpc_url: String,
    registry: alloy::primitives::Address,
    orderbook: alloy::primitives::Address,
    liquidator: alloy::primitives::Address,
    private_key: String,
    admin_account: alloy::primitives::Address,
    orderbook_index: alloy::primitives::U256,
    minimum_profit: alloy::primitives::U256,
    poll_interval: Duration,
}

fn load_config() -> Result<Config> {
    let get_env = |name: &str| -> Result<String> {
        std::env::var(name).map_err(|_| anyhow::anyhow!("Missing env var: {}", name))
    };

    let get_address = |name: &str| -> Result<alloy::primitives::Address> {
        get_env(name)?
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid address for {}: {}", name, e))
    };

    let orderbook_index: u64 = get_env(env::ORDERBOOK_INDEX)?
        .parse()
        .with_context(|| format!("Invalid {}", env::ORDERBOOK_INDEX))?;

    let minimum_profit: alloy::primitives::U256 = get_env(env::MINIMUM_PROFIT)?
        .parse()
        .with_context(|| format!("Invalid {} (expected wei amount)", env::MINIMUM_PROFIT))?;

    let poll_interval_secs: u64 = get_env(env::LIQUIDATION_FREQUENCY)?
        .parse()
        .with_context(|| format!("Invalid {} (expected seconds)", env::LIQUIDATION_FREQUENCY))?;

    Ok(Config {
        rpc_url: get_env(env::RPC_HTTP_URL)?,
        registry: get_address(env::VAULT_REGISTRY_ADDRESS)?,
        orderbook: get_address(env::ORDERBOOK_ADDRESS)?,
        liquidator: get_address(env::LIQUIDATOR_ADDRESS)?,
        private_key: get_env(env::ADMIN_PRIVATE_KEY)?,
        admin_account: get_address(env::ADMIN_ACCOUNT)?,
        orderbook_index: alloy::primitives::U256::from(orderbook_index),
        minimum_profit,
        poll_interval: Duration::from_secs(poll_interval_secs),
    })
}

async fn initialize_components(config: Config, bot_config: BotConfig) -> Result<Scheduler> {
    info!("Initializing components...");

    // Provider manager (verifies connectivity)
    let provider = ProviderManager::new(&config.rpc_url, config.registry, config.orderbook).await?;
    let chain_id = provider.chain_id().await?;
    info!(
        chain_id = chain_id,
        registry = %config.registry,
        orderbook = %config.orderbook,
        "Provider initialized"
    );

    // Transaction sender (for signing and sending liquidation transactions)
    let tx_sender = Arc::new(
        TransactionSender::new(&config.private_key, &config.rpc_url, chain_id)
            .await?
            .with_gas_headroom(bot_config.liquidation.gas_headroom_bps),
    );

    // The derived operating account must match the configured admin;
    // refuse to liquidate from an unexpected account.
    if tx_sender.address != config.admin_account {
        bail!(
            "Operating account {} does not match configured admin account {}",
            tx_sender.address,
            config.admin_account
        );
    }
    info!(address = %tx_sender.address, "Operating account verified");

    // Liquidator contract (with transaction sender for execution)
    let liquidator_contract = LiquidatorContract::with_sender(config.liquidator, tx_sender);

    // Gateway over the live contracts
    let gateway: Arc<dyn VaultProtocol> =
        Arc::new(ChainGateway::new(provider, liquidator_contract));

    // Profitability evaluator
    let evaluator = ProfitabilityEvaluator::new(config.minimum_profit)
        .with_fee_rate(bot_config.liquidation.flash_loan_fee());
    info!(
        minimum_profit = %config.minimum_profit,
        flash_loan_fee_wad = bot_config.liquidation.flash_loan_fee_wad,
        "Evaluator configured"
    );

    // Cycle and scheduler
    let cycle = LiquidationCycle::new(gateway, evaluator, config.orderbook_index);
    let scheduler = Scheduler::new(
        cycle,
        config.poll_interval,
        bot_config.scheduler.max_failure_streak,
    );

    info!("All components initialized");

    Ok(scheduler)
}

/// Print startup banner.
fn print_banner() {
    println!(
        r#"
    ╦  ╦┌─┐┬ ┬┬ ┌┬┐  ╦  ┬┌─┐ ┬ ┬┬┌┬┐┌─┐┌┬┐┌─┐┬─┐
    ╚╗╔╝├─┤│ ││  │   ║  ││─┼┐│ ││ ││├─┤ │ │ │├┬┘
     ╚╝ ┴ ┴└─┘┴─┘┴   ╩═╝┴└─┘└└─┘┴─┴┘┴ ┴ ┴ └─┘┴└─
    Liquidation Agent v0.1.0
    "#
    );
}
