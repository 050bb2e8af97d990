use serde::Serialize;

use crate::engine::WealthRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LatencyPercentiles {
    pub count: usize,
    pub p50_nanos: u64,
    pub p90_nanos: u64,
    pub p95_nanos: u64,
    pub p99_nanos: u64,
    pub max_nanos: u64,
}

/// Per-step decision latency samples (time spent inside `Trader::trade`).
#[derive(Debug, Default, Clone)]
pub struct DecisionLatencyMetrics {
    latencies_nanos: Vec<u64>,
}

impl DecisionLatencyMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_latency_nanos(&mut self, latency_nanos: u64) {
        self.latencies_nanos.push(latency_nanos);
    }

    pub fn percentiles(&self) -> Option<LatencyPercentiles> {
        if self.latencies_nanos.is_empty() {
            return None;
        }

        let mut sorted = self.latencies_nanos.clone();
        sorted.sort_unstable();
        let count = sorted.len();

        Some(LatencyPercentiles {
            count,
            p50_nanos: percentile_nearest_rank(&sorted, 50),
            p90_nanos: percentile_nearest_rank(&sorted, 90),
            p95_nanos: percentile_nearest_rank(&sorted, 95),
            p99_nanos: percentile_nearest_rank(&sorted, 99),
            max_nanos: sorted[count - 1],
        })
    }
}

fn percentile_nearest_rank(sorted: &[u64], percentile: usize) -> u64 {
    let count = sorted.len();
    let rank = (percentile * count).div_ceil(100);
    sorted[rank.saturating_sub(1)]
}

/// Ratios are `None` unless the starting wealth is positive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WealthSummary {
    pub steps: usize,
    pub initial_wealth: f64,
    pub final_wealth: f64,
    pub total_return: Option<f64>,
    pub log_growth: Option<f64>,
    pub max_drawdown: f64,
}

impl WealthSummary {
    pub fn from_records(records: &[WealthRecord]) -> Option<Self> {
        let first = records.first()?;
        let last = records.last()?;

        let mut peak = first.wealth;
        let mut max_drawdown: f64 = 0.0;
        for record in records {
            peak = peak.max(record.wealth);
            max_drawdown = max_drawdown.max(peak - record.wealth);
        }

        let total_return = (first.wealth > 0.0).then(|| last.wealth / first.wealth - 1.0);
        let log_growth =
            (first.wealth > 0.0 && last.wealth > 0.0).then(|| (last.wealth / first.wealth).ln());

        Some(Self {
            steps: records.len(),
            initial_wealth: first.wealth,
            final_wealth: last.wealth,
            total_return,
            log_growth,
            max_drawdown,
        })
    }
}
