use napi::Result as NapiResult;
use napi_derive::napi;

use rentbuy_core::mortgage::amortization::{self, AmortizationInput};
use rentbuy_core::portfolio::batch::{self, PortfolioInput};
use rentbuy_core::portfolio::city::{self, CitySummaryInput};
use rentbuy_core::portfolio::report::{self, SingleEvaluationInput};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Buy vs rent
// ---------------------------------------------------------------------------

/// `{ property, market_rate, policy? }` -> report envelope
#[napi]
pub fn evaluate_property(input_json: String) -> NapiResult<String> {
    let input: SingleEvaluationInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = report::evaluate_single(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// `{ properties, market_rate, policy? }` -> summary and one report per listing
#[napi]
pub fn analyze_portfolio(input_json: String) -> NapiResult<String> {
    let input: PortfolioInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = batch::analyze_portfolio(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn city_summary(input_json: String) -> NapiResult<String> {
    let input: CitySummaryInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = city::city_summary(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Mortgage
// ---------------------------------------------------------------------------

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let input: AmortizationInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = amortization::build_amortization(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
