mod config;
mod wiring;

use std::error::Error;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use core_sim::PricePath;
use runtime::logging::TracingRunLogWriter;
use runtime::replay::ReplayCsvWriter;
use runtime::{run_simulation, RunReport};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::wiring::Lineup;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_logging();

    let config = config::Config::from_env()?;
    info!(
        seed = config.seed,
        n_stocks = config.n_stocks,
        n_steps = config.n_steps,
        "starting trader lineup"
    );

    let path = Arc::new(wiring::build_environment(&config)?.into_path());
    let lineup = wiring::build_lineup(&config)?;
    let reports = run_lineup(path, lineup).await?;

    write_replay(&config.replay_output_path, &reports)?;
    info!(path = %config.replay_output_path, "wealth replay written");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for report in &reports {
        serde_json::to_writer(&mut out, report)?;
        writeln!(out)?;
    }
    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .init();
}

/// Each trader runs on the blocking pool against the same shared path.
async fn run_lineup(path: Arc<PricePath>, lineup: Lineup) -> Result<Vec<RunReport>, Box<dyn Error>> {
    let handles: Vec<_> = lineup
        .into_iter()
        .map(|mut trader| {
            let path = Arc::clone(&path);
            tokio::task::spawn_blocking(move || {
                let mut log = TracingRunLogWriter::new(trader.name());
                run_simulation(&*path, &mut *trader, &mut log)
            })
        })
        .collect();

    let mut reports = Vec::with_capacity(handles.len());
    for handle in handles {
        let report = handle.await??;
        if let Some(summary) = &report.summary {
            info!(
                trader = %report.trader,
                final_wealth = summary.final_wealth,
                max_drawdown = summary.max_drawdown,
                "trader finished"
            );
        }
        reports.push(report);
    }
    Ok(reports)
}

fn initialize_replay_output(path: &str) -> Result<ReplayCsvWriter<BufWriter<File>>, io::Error> {
    let replay_path = Path::new(path);

    if let Some(parent) = replay_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
    {
        fs::create_dir_all(parent)?;
    }

    let replay_file = File::create(replay_path)?;
    let mut replay_writer = ReplayCsvWriter::new(BufWriter::new(replay_file));
    replay_writer.write_header()?;
    Ok(replay_writer)
}

fn write_replay(path: &str, reports: &[RunReport]) -> Result<(), io::Error> {
    let mut replay_writer = initialize_replay_output(path)?;
    let mut last_step = 0;
    for report in reports {
        replay_writer.append_wealth_records(&report.trader, &report.records)?;
        if let Some(record) = report.records.last() {
            last_step = last_step.max(record.step);
        }
    }

    let mut log = TracingRunLogWriter::new("replay");
    replay_writer.flush_and_log(last_step, &mut log)
}
