// src/services/batch.rs
use anyhow::{Context, Result};
use csv::{Reader, Writer};
use log::{info, warn};
use serde::Serialize;
use std::io::{Read, Write};

use crate::models::{AssumptionSet, Metric, PropertyInput};
use crate::services::calculations::{compute, recommend};

#[derive(Debug, Serialize)]
struct AnalyzedRow<'a> {
    address: &'a str,
    price: f64,
    monthly_rent: f64,
    monthly_payment: f64,
    monthly_cash_flow: f64,
    cap_rate: f64,
    cash_on_cash: Metric,
    break_even_rent: f64,
    rent_to_price: f64,
    total_roi: Metric,
    payback_period: Metric,
    recommendation: String,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub analyzed: usize,
    pub skipped: usize,
}

/// Runs every property row in `input` through the calculator and writes one
/// metrics row per valid property to `output`.
pub fn analyze_csv<R: Read, W: Write>(
    input: R,
    output: W,
    assumptions: &AssumptionSet,
) -> Result<BatchSummary> {
    let mut rdr = Reader::from_reader(input);
    let mut wtr = Writer::from_writer(output);
    let mut summary = BatchSummary::default();

    for (line, record) in rdr.deserialize::<PropertyInput>().enumerate() {
        let property = match record {
            Ok(p) => p,
            Err(e) => {
                warn!("Skipping row {}: unreadable record: {}", line + 1, e);
                summary.skipped += 1;
                continue;
            }
        };

        let metrics = match compute(&property, assumptions) {
            Ok(m) => m,
            Err(e) => {
                warn!("Skipping row {} ({}): {}", line + 1, property.address, e);
                summary.skipped += 1;
                continue;
            }
        };

        wtr.serialize(AnalyzedRow {
            address: &property.address,
            price: property.price.unwrap_or_default(),
            monthly_rent: metrics.monthly_rent,
            monthly_payment: metrics.monthly_payment,
            monthly_cash_flow: metrics.monthly_cash_flow,
            cap_rate: metrics.cap_rate,
            cash_on_cash: metrics.cash_on_cash,
            break_even_rent: metrics.break_even_rent,
            rent_to_price: metrics.rent_to_price,
            total_roi: metrics.total_roi,
            payback_period: metrics.payback_period,
            recommendation: recommend(&metrics).to_string(),
        })
        .with_context(|| format!("failed to write row {}", line + 1))?;
        summary.analyzed += 1;
    }

    wtr.flush().context("failed to flush batch output")?;
    info!(
        "Batch complete: {} analyzed, {} skipped",
        summary.analyzed, summary.skipped
    );
    Ok(summary)
}
