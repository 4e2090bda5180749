//! Configuration management with profile support.
//!
//! Tunable bot parameters with support for different profiles (testing,
//! production) and TOML files. Deployment facts (endpoint, addresses,
//! credentials, thresholds) come from the environment and are validated
//! at startup in the binary; this module only carries tunables.

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

/// Main configuration structure containing all tunable bot parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Profile name (for logging/identification)
    #[serde(default = "default_profile_name")]
    pub profile: String,

    /// Scheduler behavior
    #[serde(default)]
    pub scheduler: SchedulerTuning,

    /// Liquidation execution parameters
    #[serde(default)]
    pub liquidation: LiquidationTuning,
}

fn default_profile_name() -> String {
    "default".to_string()
}

/// Scheduler behavior tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerTuning {
    /// Consecutive pass failures before the alarm log fires
    #[serde(default = "default_max_failure_streak")]
    pub max_failure_streak: u32,
}

fn default_max_failure_streak() -> u32 {
    5
}

impl Default for SchedulerTuning {
    fn default() -> Self {
        Self {
            max_failure_streak: default_max_failure_streak(),
        }
    }
}

/// Liquidation execution parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiquidationTuning {
    /// Flash-loan fee rate, fixed point per 1e18 (default 0.09%)
    #[serde(default = "default_flash_loan_fee_wad")]
    pub flash_loan_fee_wad: u64,

    /// Headroom applied on top of gas estimates (basis points)
    #[serde(default = "default_gas_headroom_bps")]
    pub gas_headroom_bps: u16,
}

fn default_flash_loan_fee_wad() -> u64 {
    900_000_000_000_000
}
fn default_gas_headroom_bps() -> u16 {
    2_000
}

impl Default for LiquidationTuning {
    fn default() -> Self {
        Self {
            flash_loan_fee_wad: default_flash_loan_fee_wad(),
            gas_headroom_bps: default_gas_headroom_bps(),
        }
    }
}

impl LiquidationTuning {
    /// Flash-loan fee rate as a U256 fixed-point value.
    pub fn flash_loan_fee(&self) -> U256 {
        U256::from(self.flash_loan_fee_wad)
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            profile: default_profile_name(),
            scheduler: SchedulerTuning::default(),
            liquidation: LiquidationTuning::default(),
        }
    }
}

impl BotConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Create a testing profile that alarms early and skips gas padding.
    pub fn testing() -> Self {
        Self {
            profile: "testing".to_string(),
            scheduler: SchedulerTuning {
                max_failure_streak: 1, // Surface problems immediately
            },
            liquidation: LiquidationTuning {
                flash_loan_fee_wad: default_flash_loan_fee_wad(),
                gas_headroom_bps: 0,
            },
        }
    }

    /// Create a production profile with conservative settings.
    pub fn production() -> Self {
        Self {
            profile: "production".to_string(),
            scheduler: SchedulerTuning {
                max_failure_streak: 10, // Tolerate longer RPC outages
            },
            liquidation: LiquidationTuning::default(),
        }
    }

    /// Get profile from environment variable BOT_PROFILE, or default.
    /// Supported values: testing, production, or a path to a TOML file.
    pub fn from_env() -> Self {
        let profile = std::env::var("BOT_PROFILE").unwrap_or_else(|_| "default".to_string());
        match profile.to_lowercase().as_str() {
            "testing" | "test" => Self::testing(),
            "production" | "prod" => Self::production(),
            "default" => Self::default(),
            path => Self::from_file(path).unwrap_or_else(|e| {
                tracing::warn!(path = path, error = %e, "Failed to load profile file, using defaults");
                Self::default()
            }),
        }
    }

    /// Log the current configuration.
    pub fn log_config(&self) {
        tracing::info!(profile = %self.profile, "Bot configuration loaded");
        tracing::info!(
            max_failure_streak = self.scheduler.max_failure_streak,
            "Scheduler tunables"
        );
        tracing::info!(
            flash_loan_fee_wad = self.liquidation.flash_loan_fee_wad,
            gas_headroom_bps = self.liquidation.gas_headroom_bps,
            "Liquidation tunables"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BotConfig::default();
        assert_eq!(config.scheduler.max_failure_streak, 5);
        assert_eq!(config.liquidation.flash_loan_fee_wad, 900_000_000_000_000);
    }

    #[test]
    fn test_testing_profile() {
        let config = BotConfig::testing();
        assert_eq!(config.profile, "testing");
        assert_eq!(config.scheduler.max_failure_streak, 1);
    }

    #[test]
    fn test_serialization() {
        let config = BotConfig::production();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("profile = \"production\""));

        let parsed: BotConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.profile, "production");
        assert_eq!(parsed.scheduler.max_failure_streak, 10);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed: BotConfig = toml::from_str("profile = \"custom\"").unwrap();
        assert_eq!(parsed.profile, "custom");
        assert_eq!(parsed.scheduler.max_failure_streak, 5);
        assert_eq!(parsed.liquidation.gas_headroom_bps, 2_000);
    }
}
