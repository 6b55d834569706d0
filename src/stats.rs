use crate::executor::RequestResult;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatsError {
    #[error("cannot summarize an empty result set")]
    EmptyResultSet,
}

/// Aggregate view of a finished run. Latency figures are milliseconds and
/// include failed requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total: usize,
    pub successes: usize,
    pub failures: usize,
    /// Percentage in `0.0..=100.0`.
    pub success_rate: f64,
    pub mean_ms: f64,
    pub p50_ms: f64,
    pub p90_ms: f64,
    pub p99_ms: f64,
    pub max_ms: f64,
}

pub fn summarize(results: &[RequestResult]) -> Result<SummaryStats, StatsError> {
    if results.is_empty() {
        return Err(StatsError::EmptyResultSet);
    }

    let total = results.len();
    let successes = results.iter().filter(|r| r.success()).count();

    let mut latencies: Vec<f64> = results.iter().map(|r| r.latency_ms).collect();
    latencies.sort_by(f64::total_cmp);
    let mean_ms = latencies.iter().sum::<f64>() / total as f64;
    let pct = |p| percentile(&latencies, p).ok_or(StatsError::EmptyResultSet);

    Ok(SummaryStats {
        total,
        successes,
        failures: total - successes,
        success_rate: successes as f64 / total as f64 * 100.0,
        mean_ms,
        p50_ms: pct(50.0)?,
        p90_ms: pct(90.0)?,
        p99_ms: pct(99.0)?,
        max_ms: latencies[total - 1],
    })
}

/// Linear interpolation between closest ranks of an ascending slice.
/// `p` is in `0.0..=100.0`; `None` for an empty slice.
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    match sorted.len() {
        0 => None,
        1 => Some(sorted[0]),
        n => {
            let rank = (p / 100.0).clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = rank.floor() as usize;
            let hi = rank.ceil() as usize;
            let weight = rank - lo as f64;
            Some(sorted[lo] + (sorted[hi] - sorted[lo]) * weight)
        }
    }
}
