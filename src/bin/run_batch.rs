//! Run the quotation batch over CSV tables
//!
//! Local-file analog of the production pipeline: loads the parameter,
//! roster, rate, issuance, and history tables, quotes every policyholder,
//! and writes one quotation record (JSON) and one memoria de cálculo (CSV)
//! per contractor plus the updated historical ledger.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use quotation_system::policy::{load_parameters, load_roster};
use quotation_system::rates::{load_issuances, load_rate_table};
use quotation_system::{BatchRunner, HistoricalLedger};
use serde::Deserialize;
use std::fs::{self, File};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Parser)]
#[command(name = "run_batch", about = "Quote every policyholder in the parameter table")]
struct Args {
    /// JSON config naming the table paths; defaults apply when absent
    #[arg(long)]
    config: Option<PathBuf>,

    /// Process date for the ledger partition (YYYY-MM-DD)
    #[arg(long)]
    process_date: Option<String>,

    /// Quote policyholders sequentially instead of fanning out
    #[arg(long)]
    serial: bool,
}

/// Storage layout, mirroring the production config shape
///
/// The bucket identity is carried but opaque here: local paths stand in
/// for the object store.
#[derive(Debug, Deserialize)]
#[serde(default)]
struct PipelineConfig {
    bucket_name: Option<String>,
    parameters_path: String,
    roster_path: String,
    rates_path: String,
    issuances_path: String,
    history_path: String,
    output_dir: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            bucket_name: None,
            parameters_path: "data/parametros.csv".into(),
            roster_path: "data/solicitudes.csv".into(),
            rates_path: "data/experiencia.csv".into(),
            issuances_path: "data/emisiones.csv".into(),
            history_path: "data/cotizaciones.csv".into(),
            output_dir: "output".into(),
        }
    }
}

impl PipelineConfig {
    fn load(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(p) => {
                let raw = fs::read_to_string(p)
                    .with_context(|| format!("reading config {}", p.display()))?;
                serde_json::from_str(&raw).with_context(|| format!("parsing config {}", p.display()))
            }
            None => Ok(Self::default()),
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = PipelineConfig::load(args.config.as_ref())?;

    if let Some(bucket) = &config.bucket_name {
        log::info!("Configured bucket (opaque here): {}", bucket);
    }

    let start = Instant::now();
    println!("Loading quotation tables...");

    let parameters = load_parameters(&config.parameters_path)
        .map_err(|e| anyhow!("loading {}: {}", config.parameters_path, e))?;
    let roster = load_roster(&config.roster_path)
        .map_err(|e| anyhow!("loading {}: {}", config.roster_path, e))?;
    let rates = load_rate_table(&config.rates_path)
        .map_err(|e| anyhow!("loading {}: {}", config.rates_path, e))?;
    let issuances = load_issuances(&config.issuances_path)
        .map_err(|e| anyhow!("loading {}: {}", config.issuances_path, e))?;
    let history = HistoricalLedger::load(&config.history_path)
        .map_err(|e| anyhow!("loading {}: {}", config.history_path, e))?;

    println!(
        "Loaded {} policyholders, {} insured, {} rate bands, {} issuances, {} ledger rows in {:?}",
        parameters.len(),
        roster.len(),
        rates.len(),
        issuances.len(),
        history.len(),
        start.elapsed()
    );

    let runner = BatchRunner::new(rates, issuances);

    let quote_start = Instant::now();
    let outcome = if args.serial {
        runner.run(&parameters, &roster, &history)
    } else {
        runner.run_parallel(&parameters, &roster, &history)
    };
    println!("Quoted in {:?}", quote_start.elapsed());

    // One JSON record and one memoria per contractor, then the ledger
    let json_dir = PathBuf::from(&config.output_dir).join("json");
    let memoria_dir = PathBuf::from(&config.output_dir).join("memoria");
    fs::create_dir_all(&json_dir)?;
    fs::create_dir_all(&memoria_dir)?;

    for quote in &outcome.quotes {
        let slug = quote.quotation.contractor.replace(' ', "_");

        let json_path = json_dir.join(format!("{}.json", slug));
        let file = File::create(&json_path)
            .with_context(|| format!("creating {}", json_path.display()))?;
        serde_json::to_writer_pretty(file, &quote.quotation)?;

        let memoria_path = memoria_dir.join(format!("memoria_{}.csv", slug));
        let file = File::create(&memoria_path)
            .with_context(|| format!("creating {}", memoria_path.display()))?;
        quote
            .breakdown
            .write_csv(file)
            .map_err(|e| anyhow!("writing {}: {}", memoria_path.display(), e))?;
    }

    let ledger_path = match &args.process_date {
        Some(date) => {
            let dir = PathBuf::from(&config.output_dir)
                .join("historico")
                .join(format!("fecha={}", date));
            fs::create_dir_all(&dir)?;
            dir.join("cotizaciones.csv")
        }
        None => PathBuf::from(&config.output_dir).join("historial_cotizaciones_actualizado.csv"),
    };
    outcome
        .ledger
        .write(&ledger_path)
        .map_err(|e| anyhow!("writing {}: {}", ledger_path.display(), e))?;

    println!("\n=== Batch complete ===");
    println!("Policyholders quoted: {}", outcome.quotes.len());
    println!("Policyholders skipped: {}", outcome.failures.len());
    for failure in &outcome.failures {
        println!("  - {}: {}", failure.contractor, failure.error);
    }
    println!("Ledger rows: {} -> {}", history.len(), outcome.ledger.len());
    println!("Ledger written to: {}", ledger_path.display());

    Ok(())
}
