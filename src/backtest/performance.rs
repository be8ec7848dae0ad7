//! Balance-series risk metrics.

use crate::types::{MetricsReport, SimError};

/// Reduces one agent's balance series into total return, max drawdown and a
/// risk-adjusted return ratio.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsCalculator;

impl MetricsCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Compute the report for a non-empty series.
    ///
    /// A single snapshot yields the degenerate all-zero report with the
    /// final balance filled in; only an empty series is an error.
    pub fn compute(&self, series: &[f64]) -> Result<MetricsReport, SimError> {
        let (initial, final_balance) = match (series.first(), series.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return Err(SimError::EmptySeries),
        };

        if series.len() < 2 {
            return Ok(MetricsReport {
                total_return: 0.0,
                max_drawdown: 0.0,
                risk_ratio: 0.0,
                final_balance,
            });
        }

        let total_return = (final_balance - initial) / initial;

        Ok(MetricsReport {
            total_return,
            max_drawdown: max_drawdown(series),
            risk_ratio: risk_ratio(series),
            final_balance,
        })
    }
}

/// (peak − trough) / peak with peak and trough taken independently over the
/// whole series. Deliberately not a running-peak drawdown: a trough that
/// precedes the peak chronologically still counts.
fn max_drawdown(series: &[f64]) -> f64 {
    let peak = series.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let trough = series.iter().cloned().fold(f64::INFINITY, f64::min);
    if peak == 0.0 {
        return 0.0;
    }
    (peak - trough) / peak
}

/// Mean per-round return over its population standard deviation; 0 when the
/// returns have no spread.
fn risk_ratio(series: &[f64]) -> f64 {
    let returns: Vec<f64> = series
        .windows(2)
        .map(|w| w[1] / w[0] - 1.0)
        .collect();
    if returns.is_empty() {
        return 0.0;
    }

    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    let variance = returns
        .iter()
        .map(|r| (r - mean).powi(2))
        .sum::<f64>()
        / returns.len() as f64;
    let std_dev = variance.sqrt();

    if std_dev > 0.0 {
        mean / std_dev
    } else {
        0.0
    }
}
