// src/handlers/analyze.rs
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use warp::reply::Json;
use warp::Rejection;

use super::error::ApiError;
use crate::models::{
    AssumptionSet, Breakdown, Metric, MetricsResult, ProjectionYear, PropertyInput,
    Recommendation, SaleScenario, TargetGap,
};
use crate::services::calculations::{compute, recommend, target_gap};
use crate::services::projections::{hold_cash_flows, irr, npv, project, sale_scenario};

/// Property fields and assumption fields share one flat JSON object.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(flatten)]
    pub property: PropertyInput,
    #[serde(flatten)]
    pub assumptions: AssumptionSet,
}

fn default_years() -> u32 {
    10
}

fn default_rent_growth() -> f64 {
    2.0
}

fn default_discount_rate() -> f64 {
    8.0
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionRequest {
    #[serde(flatten)]
    pub analysis: AnalyzeRequest,
    #[serde(default = "default_years")]
    pub years: u32,
    #[serde(default = "default_rent_growth")]
    pub rent_growth_pct: f64,
    #[serde(default = "default_discount_rate")]
    pub discount_rate_pct: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeResponse<'a> {
    success: bool,
    results: &'a MetricsResult,
    breakdown: &'a Breakdown,
    recommendation: Recommendation,
    targets: TargetGap,
    property_data: &'a PropertyInput,
    assumptions: &'a AssumptionSet,
    analyzed_at: DateTime<Utc>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectionResponse {
    success: bool,
    years: Vec<ProjectionYear>,
    sale: SaleScenario,
    npv: Metric,
    irr: Metric,
    discount_rate_pct: f64,
}

fn reject(err: impl Into<ApiError>) -> Rejection {
    let err = err.into();
    warn!("Rejecting analysis request: {}", err);
    warp::reject::custom(err)
}

pub async fn analyze_property(request: AnalyzeRequest) -> Result<Json, Rejection> {
    info!("Handling analysis request for {:?}", request.property.address);

    let metrics = compute(&request.property, &request.assumptions).map_err(reject)?;
    let price = request.property.price.unwrap_or_default();
    let recommendation = recommend(&metrics);

    info!(
        "Analysis for {:?}: cash flow {:.2}, cap rate {:.2}%, {}",
        request.property.address, metrics.monthly_cash_flow, metrics.cap_rate, recommendation
    );

    let response = AnalyzeResponse {
        success: true,
        results: &metrics,
        breakdown: &metrics.breakdown,
        recommendation,
        targets: target_gap(&metrics, price),
        property_data: &request.property,
        assumptions: &request.assumptions,
        analyzed_at: Utc::now(),
    };
    Ok(warp::reply::json(&response))
}

pub async fn project_property(request: ProjectionRequest) -> Result<Json, Rejection> {
    info!(
        "Handling {}-year projection for {:?}",
        request.years, request.analysis.property.address
    );
    if !request.discount_rate_pct.is_finite() || request.discount_rate_pct <= -100.0 {
        return Err(reject(ApiError::bad_request(
            "invalid input for discountRatePct: must be a number above -100",
        )));
    }

    let property = &request.analysis.property;
    let assumptions = &request.analysis.assumptions;

    let metrics = compute(property, assumptions).map_err(reject)?;
    let years = project(property, assumptions, request.years, request.rent_growth_pct)
        .map_err(reject)?;
    let sale = sale_scenario(property, assumptions, request.years).map_err(reject)?;

    let flows = hold_cash_flows(
        metrics.breakdown.total_upfront_cost,
        metrics.monthly_cash_flow * 12.0,
        &sale,
    );

    let response = ProjectionResponse {
        success: true,
        years,
        sale,
        npv: Metric::from_f64(npv(request.discount_rate_pct, &flows)),
        irr: irr(&flows),
        discount_rate_pct: request.discount_rate_pct,
    };
    Ok(warp::reply::json(&response))
}
