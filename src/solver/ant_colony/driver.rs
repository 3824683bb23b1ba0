use std::error::Error;
use std::fs::File;
use std::io::BufWriter;

use chrono::{DateTime, Utc};
use colored::*;
use csv::Writer;
use dotenv::dotenv;
use serde::Serialize;
use tracing::{info, span, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::constant::{
    END_NODE, HISTORY_CSV_PATH, LAT_RANGE, LOCATION_COUNT, LON_RANGE, SEED, START_NODE,
    SUMMARY_JSON_PATH,
};
use crate::config::AcoConfig;
use crate::domain::types::{IterationRecord, Node, Tour};
use crate::fixtures::data_generator::generate_random_nodes;

use super::colony::AntColony;

/// Initialize tracing and environment
fn init_tracing_and_env() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(
            fmt::layer()
                .with_span_events(fmt::format::FmtSpan::NEW | fmt::format::FmtSpan::CLOSE)
                .pretty(),
        )
        .try_init()?;

    dotenv().ok();
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct RunSummary<'a> {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub elapsed_ms: i64,
    pub config: &'a AcoConfig,
    pub iterations: usize,
    pub best_cost: f64,
    pub best_tour: &'a Tour,
    pub best_route: String,
}

pub fn run() -> Result<(), Box<dyn Error>> {
    init_tracing_and_env()?;

    let config = AcoConfig::from_env()?;
    let config = match config.seed {
        Some(_) => config,
        None => config.with_seed(SEED),
    };
    info!("Starting ACO solver with config {:?}", config);

    let nodes = generate_random_nodes(LOCATION_COUNT, SEED, LAT_RANGE, LON_RANGE);

    let mut colony = {
        let span = span!(Level::INFO, "setup");
        let _guard = span.enter();
        AntColony::new(&nodes, START_NODE, END_NODE, config)?
    };

    let started_at = Utc::now();
    let max_iterations = colony.config().max_iterations;
    {
        let loop_span = span!(Level::INFO, "main_search_loop", total_iterations = max_iterations);
        let _loop_guard = loop_span.enter();

        while !colony.is_complete() {
            let record = colony.run_one_iteration();
            if record.iteration % 25 == 0 {
                info!(
                    "[{:>3.0}%] iteration {}: best {:.2}, avg {:.2}, stalled for {}",
                    colony.progress() * 100.0,
                    record.iteration,
                    record.best_so_far_cost,
                    record.mean_cost,
                    colony.tracker().iterations_since_improvement()
                );
            }
        }
    }
    let finished_at = Utc::now();

    let best = colony
        .best_tour()
        .ok_or("colony finished without a best tour")?;
    print_solution(best, colony.nodes());

    save_to_csv(colony.history(), HISTORY_CSV_PATH)?;
    let summary = RunSummary {
        started_at,
        finished_at,
        elapsed_ms: (finished_at - started_at).num_milliseconds(),
        config: colony.config(),
        iterations: colony.iteration(),
        best_cost: best.cost,
        best_tour: best,
        best_route: best.labels(colony.nodes()),
    };
    save_summary(&summary, SUMMARY_JSON_PATH)?;

    info!(
        "Wrote {} and {} ({} ms)",
        HISTORY_CSV_PATH, SUMMARY_JSON_PATH, summary.elapsed_ms
    );
    Ok(())
}

fn save_to_csv(history: &[IterationRecord], filename: &str) -> Result<(), Box<dyn Error>> {
    let mut wtr = Writer::from_path(filename)?;

    wtr.write_record([
        "iteration",
        "best_cost",
        "mean_cost",
        "best_so_far_cost",
        "degenerate_tours",
    ])?;

    for record in history {
        wtr.write_record([
            record.iteration.to_string(),
            record.best_cost.to_string(),
            record.mean_cost.to_string(),
            record.best_so_far_cost.to_string(),
            record.degenerate_tours.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

fn save_summary(summary: &RunSummary<'_>, filename: &str) -> Result<(), Box<dyn Error>> {
    let writer = BufWriter::new(File::create(filename)?);
    serde_json::to_writer_pretty(writer, summary)?;
    Ok(())
}

fn print_solution(tour: &Tour, nodes: &[Node]) {
    println!(
        "{} {}",
        "Best distance:".bold(),
        format!("{:.2}", tour.cost).green().bold()
    );
    for (step, id) in tour.node_ids.iter().enumerate() {
        let name = nodes
            .iter()
            .find(|n| n.id == *id)
            .map_or("?", |n| n.name.as_str());
        let line = format!("{:>3}. {}", step + 1, name);
        if step == 0 {
            println!("{}", line.red());
        } else if step + 1 == tour.len() {
            println!("{}", line.yellow());
        } else {
            println!("{}", line.cyan());
        }
    }
}
