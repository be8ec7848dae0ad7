use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BASE_BET, DEFAULT_BET_FRACTION, DEFAULT_INITIAL_BALANCE, DEFAULT_MAX_BET_FRACTION,
    DEFAULT_MAX_DAILY_LOSS, DEFAULT_NUM_ROUNDS, DEFAULT_TARGET_MULTIPLIER,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backtest: BacktestConfig,
    #[serde(default)]
    pub agents: AgentsConfig,
    #[serde(default)]
    pub safety: SafetyConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestConfig {
    pub num_rounds: u32,
    pub initial_balance: f64,
    /// Seed for the run's entropy source; unset means OS randomness.
    pub rng_seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentsConfig {
    pub fixed_fraction: FixedFractionConfig,
    pub kelly: KellyConfig,
    pub martingale: MartingaleConfig,
    pub adaptive: AdaptiveConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedFractionConfig {
    pub enabled: bool,
    pub fraction: f64,
    pub target_multiplier: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KellyConfig {
    pub enabled: bool,
    pub win_prob: f64,
    pub odds: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MartingaleConfig {
    pub enabled: bool,
    pub base_bet: f64,
    pub target_multiplier: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdaptiveConfig {
    pub enabled: bool,
    pub target_multiplier: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyConfig {
    pub max_bet_fraction: f64,
    pub max_daily_loss: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub host: [u8; 4],
    pub port: u16,
}

impl Config {
    pub async fn load(path: &str) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backtest: BacktestConfig::default(),
            agents: AgentsConfig::default(),
            safety: SafetyConfig::default(),
            api: ApiConfig::default(),
        }
    }
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            num_rounds: DEFAULT_NUM_ROUNDS,
            initial_balance: DEFAULT_INITIAL_BALANCE,
            rng_seed: None,
        }
    }
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            fixed_fraction: FixedFractionConfig {
                enabled: true,
                fraction: DEFAULT_BET_FRACTION,
                target_multiplier: DEFAULT_TARGET_MULTIPLIER,
            },
            kelly: KellyConfig {
                enabled: true,
                win_prob: 0.5,
                odds: 2.0,
            },
            martingale: MartingaleConfig {
                enabled: true,
                base_bet: DEFAULT_BASE_BET,
                target_multiplier: DEFAULT_TARGET_MULTIPLIER,
            },
            adaptive: AdaptiveConfig {
                enabled: true,
                target_multiplier: DEFAULT_TARGET_MULTIPLIER,
            },
        }
    }
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            max_bet_fraction: DEFAULT_MAX_BET_FRACTION,
            max_daily_loss: DEFAULT_MAX_DAILY_LOSS,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: [0, 0, 0, 0],
            port: 8000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_enables_all_four_agents() {
        let config = Config::default();
        assert!(config.agents.fixed_fraction.enabled);
        assert!(config.agents.kelly.enabled);
        assert!(config.agents.martingale.enabled);
        assert!(config.agents.adaptive.enabled);
        assert_eq!(config.backtest.num_rounds, 100);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: Config = toml::from_str(
            r#"
            [backtest]
            num_rounds = 5
            initial_balance = 250.0
            "#,
        )
        .unwrap();
        assert_eq!(config.backtest.num_rounds, 5);
        assert_eq!(config.backtest.initial_balance, 250.0);
        assert_eq!(config.safety.max_daily_loss, DEFAULT_MAX_DAILY_LOSS);
        assert_eq!(config.api.port, 8000);
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = Config::default();
        let text = toml::to_string(&config).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.backtest.num_rounds, config.backtest.num_rounds);
        assert_eq!(back.agents.kelly.odds, config.agents.kelly.odds);
    }
}
