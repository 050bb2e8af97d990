use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunLogEventKind {
    StepStarted,
    PricesObserved,
    TradeComputed,
    PortfolioUpdated,
    StepLatencyRecorded,
    ReplayWritten,
}

impl RunLogEventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StepStarted => "step_started",
            Self::PricesObserved => "prices_observed",
            Self::TradeComputed => "trade_computed",
            Self::PortfolioUpdated => "portfolio_updated",
            Self::StepLatencyRecorded => "step_latency_recorded",
            Self::ReplayWritten => "replay_written",
        }
    }
}

/// One structured record of the step loop. `value` carries the wealth for
/// `PortfolioUpdated`, the traded notional for `TradeComputed` and the
/// latency in nanoseconds for `StepLatencyRecorded`.
#[derive(Debug, Clone, PartialEq)]
pub struct RunLogEvent {
    pub step: usize,
    pub kind: RunLogEventKind,
    pub value: Option<f64>,
}

impl RunLogEvent {
    pub fn new(step: usize, kind: RunLogEventKind, value: Option<f64>) -> Self {
        Self { step, kind, value }
    }
}

pub trait RunLogWriter {
    fn write(&mut self, event: RunLogEvent);
}

#[derive(Debug, Default)]
pub struct InMemoryRunLogWriter {
    events: Vec<RunLogEvent>,
}

impl InMemoryRunLogWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[RunLogEvent] {
        &self.events
    }
}

impl RunLogWriter for InMemoryRunLogWriter {
    fn write(&mut self, event: RunLogEvent) {
        self.events.push(event);
    }
}

/// Forwards run-log events to `tracing` at trace level, tagged by trader.
#[derive(Debug, Clone)]
pub struct TracingRunLogWriter {
    trader: String,
}

impl TracingRunLogWriter {
    pub fn new(trader: impl Into<String>) -> Self {
        Self {
            trader: trader.into(),
        }
    }
}

impl RunLogWriter for TracingRunLogWriter {
    fn write(&mut self, event: RunLogEvent) {
        trace!(
            trader = %self.trader,
            step = event.step,
            kind = event.kind.as_str(),
            value = ?event.value,
            "run event"
        );
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullRunLogWriter;

impl RunLogWriter for NullRunLogWriter {
    fn write(&mut self, _event: RunLogEvent) {}
}
