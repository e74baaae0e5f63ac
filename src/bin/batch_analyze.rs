// src/bin/batch_analyze.rs
use anyhow::{bail, Context, Result};
use dotenv::dotenv;
use log::info;
use rental_analyzer::models::AssumptionSet;
use rental_analyzer::services::batch::analyze_csv;
use std::env;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};

fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 || args.len() > 4 {
        bail!("usage: {} <input.csv> <output.csv> [assumptions.json]", args[0]);
    }

    let assumptions = match args.get(3) {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read assumptions file {}", path))?;
            serde_json::from_str::<AssumptionSet>(&raw)
                .with_context(|| format!("failed to parse assumptions file {}", path))?
        }
        None => AssumptionSet::default(),
    };
    info!("Using assumptions: {:?}", assumptions);

    let input = File::open(&args[1]).with_context(|| format!("failed to open {}", args[1]))?;
    let output = File::create(&args[2]).with_context(|| format!("failed to create {}", args[2]))?;

    let summary = analyze_csv(BufReader::new(input), BufWriter::new(output), &assumptions)?;
    println!(
        "Analyzed {} properties ({} skipped) -> {}",
        summary.analyzed, summary.skipped, args[2]
    );
    Ok(())
}
