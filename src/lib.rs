// aviator-sim: provably-fair crash game simulation and strategy backtesting

pub mod agents;
pub mod api;
pub mod backtest;
pub mod config;
pub mod constants;
pub mod entropy;
pub mod round;
pub mod safety;
pub mod storage;
pub mod types;

// Re-exports for convenience
pub use agents::{AdaptiveLearning, AgentStrategy, FixedFraction, KellyCriterion, Martingale};
pub use backtest::{BacktestEngine, BacktestReport, MetricsCalculator};
pub use config::Config;
pub use entropy::{EntropySource, OsEntropy, SeededEntropy};
pub use round::RoundGenerator;
pub use safety::SafetyManager;
pub use types::{AgentId, BetDecision, Commitment, MetricsReport, Round, SimError};
