//! Round-by-round strategy backtesting over simulated crash rounds.

pub mod engine;
pub mod performance;

pub use engine::{BacktestEngine, BacktestReport};
pub use performance::MetricsCalculator;
