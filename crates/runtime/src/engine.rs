use std::time::Instant;

use core_sim::PriceSource;
use serde::Serialize;
use strategy::Trader;

use crate::error::RuntimeError;
use crate::logging::{RunLogEvent, RunLogEventKind, RunLogWriter};
use crate::metrics::{DecisionLatencyMetrics, LatencyPercentiles, WealthSummary};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WealthRecord {
    pub step: usize,
    pub wealth: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub trader: String,
    pub summary: Option<WealthSummary>,
    pub latency: Option<LatencyPercentiles>,
    #[serde(skip)]
    pub records: Vec<WealthRecord>,
}

pub struct SimEngine<'a, S: PriceSource + ?Sized> {
    source: &'a S,
    step: usize,
    latency: DecisionLatencyMetrics,
}

impl<'a, S: PriceSource + ?Sized> SimEngine<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            step: 0,
            latency: DecisionLatencyMetrics::new(),
        }
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn is_finished(&self) -> bool {
        self.step >= self.source.n_steps()
    }

    pub fn latency(&self) -> &DecisionLatencyMetrics {
        &self.latency
    }

    /// Advances one step. Past the end of the source this surfaces the
    /// source's range error and leaves the engine where it was.
    pub fn step_once(
        &mut self,
        trader: &mut dyn Trader,
        log: &mut dyn RunLogWriter,
    ) -> Result<WealthRecord, RuntimeError> {
        let step = self.step;
        log.write(RunLogEvent::new(step, RunLogEventKind::StepStarted, None));

        let prices = self.source.price(step)?;
        log.write(RunLogEvent::new(step, RunLogEventKind::PricesObserved, None));

        let started = Instant::now();
        let trade = trader.trade(prices, step)?;
        let latency_nanos = u64::try_from(started.elapsed().as_nanos()).unwrap_or(u64::MAX);
        self.latency.record_latency_nanos(latency_nanos);
        log.write(RunLogEvent::new(
            step,
            RunLogEventKind::TradeComputed,
            Some(core_sim::dot(&trade, prices)),
        ));

        let wealth = trader.update_pnl(prices, &trade)?;
        log.write(RunLogEvent::new(
            step,
            RunLogEventKind::PortfolioUpdated,
            Some(wealth),
        ));
        log.write(RunLogEvent::new(
            step,
            RunLogEventKind::StepLatencyRecorded,
            Some(latency_nanos as f64),
        ));

        self.step += 1;
        Ok(WealthRecord { step, wealth })
    }
}

/// Runs `trader` over every step of `source` and collects its wealth path.
pub fn run_simulation<S: PriceSource + ?Sized>(
    source: &S,
    trader: &mut dyn Trader,
    log: &mut dyn RunLogWriter,
) -> Result<RunReport, RuntimeError> {
    let expected = trader.ledger().n_assets();
    if expected != source.n_assets() {
        return Err(RuntimeError::AssetCountMismatch {
            trader: trader.name().to_string(),
            expected,
            actual: source.n_assets(),
        });
    }

    let mut engine = SimEngine::new(source);
    let mut records = Vec::with_capacity(source.n_steps());
    while !engine.is_finished() {
        records.push(engine.step_once(trader, log)?);
    }

    Ok(RunReport {
        trader: trader.name().to_string(),
        summary: WealthSummary::from_records(&records),
        latency: engine.latency().percentiles(),
        records,
    })
}
