//! Automated betting strategies driven by the backtest engine.

pub mod adaptive;
pub mod fixed_fraction;
pub mod kelly;
pub mod martingale;
pub mod traits;

pub use adaptive::AdaptiveLearning;
pub use fixed_fraction::FixedFraction;
pub use kelly::KellyCriterion;
pub use martingale::Martingale;
pub use traits::{AgentState, AgentStrategy};
