// Crash multiplier derivation
pub const MULTIPLIER_GRANULARITY: u64 = 1_000_000;
pub const MIN_MULTIPLIER: f64 = 1.0;
pub const MAX_MULTIPLIER: f64 = 100.0;
pub const MULTIPLIER_SPAN: f64 = MAX_MULTIPLIER - MIN_MULTIPLIER;

// Commitment seeds (raw bytes before hex encoding)
pub const SEED_BYTES: usize = 16;

// Agent defaults
pub const DEFAULT_INITIAL_BALANCE: f64 = 1_000.0;
pub const DEFAULT_TARGET_MULTIPLIER: f64 = 2.0;
pub const DEFAULT_BET_FRACTION: f64 = 0.01;
pub const DEFAULT_BASE_BET: f64 = 10.0;

// AdaptiveLearning warms up on a fixed fraction until the log can support a fit
pub const ADAPTIVE_WARMUP_ROUNDS: usize = 10;
pub const ADAPTIVE_BASE_FRACTION: f64 = 0.01;

// Backtest defaults
pub const DEFAULT_NUM_ROUNDS: u32 = 100;

// Safety limits
pub const DEFAULT_MAX_BET_FRACTION: f64 = 0.1;
pub const DEFAULT_MAX_DAILY_LOSS: f64 = 500.0;
