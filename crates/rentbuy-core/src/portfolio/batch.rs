use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{info, warn};

use super::report::{analyze_property, PropertyReport};
use crate::buy_rent::property::PropertyRecord;
use crate::error::RentBuyError;
use crate::policy::FinancialPolicy;
use crate::types::*;
use crate::RentBuyResult;

/// A catalog of listings evaluated under one policy and one market rate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioInput {
    pub properties: Vec<PropertyRecord>,
    /// Market average loan rate in percent
    pub market_rate: RatePercent,
    #[serde(default)]
    pub policy: FinancialPolicy,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub total: usize,
    pub buy: usize,
    pub rent: usize,
    /// Listings without a usable price or rent
    pub skipped: usize,
    /// Listings whose evaluation failed; reported with null metrics
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioOutput {
    pub summary: PortfolioSummary,
    /// One report per input listing, in input order
    pub reports: Vec<PropertyReport>,
}

enum RowOutcome {
    Evaluated(PropertyReport),
    Failed(PropertyReport, RentBuyError),
}

fn analyze_row(index: usize, property: &PropertyRecord, market_rate: RatePercent, policy: &FinancialPolicy) -> RowOutcome {
    match analyze_property(property, market_rate, policy) {
        Ok(report) => RowOutcome::Evaluated(report),
        Err(e) => {
            warn!(row = index, error = %e, "property evaluation failed; emitting null metrics");
            RowOutcome::Failed(PropertyReport::without_metrics(property), e)
        }
    }
}

/// Evaluate every listing independently. Configuration is validated once up
/// front; after that no single listing can abort the batch.
pub fn analyze_portfolio(
    input: &PortfolioInput,
) -> RentBuyResult<ComputationOutput<PortfolioOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    input.policy.validate()?;
    if input.market_rate < Decimal::ZERO {
        return Err(RentBuyError::InvalidInput {
            field: "market_rate".into(),
            reason: "Market rate must not be negative".into(),
        });
    }

    let policy = &input.policy;
    let rate = input.market_rate;

    #[cfg(feature = "parallel")]
    let outcomes: Vec<RowOutcome> = {
        use rayon::prelude::*;
        input
            .properties
            .par_iter()
            .enumerate()
            .map(|(i, p)| analyze_row(i, p, rate, policy))
            .collect()
    };

    #[cfg(not(feature = "parallel"))]
    let outcomes: Vec<RowOutcome> = input
        .properties
        .iter()
        .enumerate()
        .map(|(i, p)| analyze_row(i, p, rate, policy))
        .collect();

    let mut summary = PortfolioSummary {
        total: outcomes.len(),
        ..PortfolioSummary::default()
    };
    let mut reports = Vec::with_capacity(outcomes.len());

    for (index, outcome) in outcomes.into_iter().enumerate() {
        match outcome {
            RowOutcome::Evaluated(report) => {
                match report.decision {
                    Some(Decision::Buy) => summary.buy += 1,
                    Some(Decision::Rent) => summary.rent += 1,
                    None => summary.skipped += 1,
                }
                reports.push(report);
            }
            RowOutcome::Failed(report, e) => {
                summary.failed += 1;
                warnings.push(format!("Row {index}: {e}"));
                reports.push(report);
            }
        }
    }

    if summary.skipped > 0 {
        warnings.push(format!(
            "{} listing(s) lack a usable price or rent; financial metrics are null",
            summary.skipped
        ));
    }

    info!(
        total = summary.total,
        buy = summary.buy,
        rent = summary.rent,
        skipped = summary.skipped,
        failed = summary.failed,
        "portfolio analysis complete"
    );

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Buy vs rent comparison per listing with one-at-a-time flip thresholds",
        &serde_json::json!({
            "market_rate": input.market_rate.to_string(),
            "policy": input.policy,
            "tie_break": "equal terminal wealth resolves to RENT",
        }),
        warnings,
        elapsed,
        PortfolioOutput { summary, reports },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn listing(title: &str, price: Option<Decimal>, rent: Option<Decimal>) -> PropertyRecord {
        PropertyRecord {
            title: Some(title.into()),
            price,
            rent_estimate: rent,
            area_sqft: Some(dec!(1000)),
            ..PropertyRecord::default()
        }
    }

    #[test]
    fn test_order_preserved_and_counts() {
        let input = PortfolioInput {
            properties: vec![
                listing("a", Some(dec!(10000000)), Some(dec!(25000))),
                listing("b", None, Some(dec!(25000))),
                listing("c", Some(dec!(5000000)), Some(dec!(30000))),
            ],
            market_rate: dec!(8.5),
            policy: FinancialPolicy::default(),
        };
        let out = analyze_portfolio(&input).unwrap();
        let titles: Vec<_> = out
            .result
            .reports
            .iter()
            .map(|r| r.title.clone().unwrap())
            .collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
        assert_eq!(
            out.result.summary,
            PortfolioSummary {
                total: 3,
                buy: 1,
                rent: 1,
                skipped: 1,
                failed: 0,
            }
        );
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_negative_market_rate_rejected() {
        let input = PortfolioInput {
            properties: vec![],
            market_rate: dec!(-1),
            policy: FinancialPolicy::default(),
        };
        assert!(analyze_portfolio(&input).is_err());
    }

    #[test]
    fn test_empty_portfolio() {
        let input = PortfolioInput {
            properties: vec![],
            market_rate: dec!(8.5),
            policy: FinancialPolicy::default(),
        };
        let out = analyze_portfolio(&input).unwrap();
        assert_eq!(out.result.summary.total, 0);
        assert!(out.result.reports.is_empty());
    }
}
