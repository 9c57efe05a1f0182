use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::buy_rent::comparator::evaluate;
use crate::buy_rent::property::{LoanTerms, PropertyRecord};
use crate::buy_rent::sensitivity::analyze_sensitivity;
use crate::error::RentBuyError;
use crate::policy::FinancialPolicy;
use crate::types::*;
use crate::RentBuyResult;

const LAKH: Decimal = dec!(100000);

/// The flat per-property hand-off record. Every financial field is either a
/// precomputed fact or null when the listing lacks a usable price or rent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyReport {
    pub title: Option<String>,
    pub city: Option<String>,
    pub location: Option<String>,
    pub bedrooms: Option<String>,
    pub price_inr: Option<Money>,
    pub area_sqft: Option<Decimal>,
    pub estimated_monthly_rent: Option<Money>,
    pub price_lakhs: Option<Decimal>,
    pub price_lakhs_per_sqft: Option<Decimal>,
    pub down_payment: Option<Money>,
    pub loan_amount: Option<Money>,
    pub monthly_installment: Option<Money>,
    pub effective_installment: Option<Money>,
    pub total_tax_saved: Option<Money>,
    pub final_property_value: Option<Money>,
    pub final_renting_wealth: Option<Money>,
    pub decision: Option<Decision>,
    pub wealth_difference: Option<Money>,
    pub current_interest_rate: Option<RatePercent>,
    pub interest_rate_flip: Option<RatePercent>,
    pub rent_flip: Option<Money>,
    pub holding_period_flip: Option<u32>,
}

impl PropertyReport {
    /// Display fields and price metrics only; all financial fields null.
    pub fn without_metrics(property: &PropertyRecord) -> Self {
        let (price_lakhs, price_lakhs_per_sqft) = price_metrics(property.price, property.area_sqft);
        Self {
            title: property.title.clone(),
            city: property.city.clone(),
            location: property.location.clone(),
            bedrooms: property.bedrooms.clone(),
            price_inr: property.price,
            area_sqft: property.area_sqft,
            estimated_monthly_rent: property.rent_estimate,
            price_lakhs,
            price_lakhs_per_sqft,
            ..Self::default()
        }
    }

    pub fn has_metrics(&self) -> bool {
        self.decision.is_some()
    }
}

/// Price in lakhs (2 dp) and lakhs per square foot (4 dp), when both price
/// and area are positive.
pub fn price_metrics(price: Option<Money>, area_sqft: Option<Decimal>) -> (Option<Decimal>, Option<Decimal>) {
    match (price, area_sqft) {
        (Some(p), Some(a)) if p > Decimal::ZERO && a > Decimal::ZERO => {
            let lakhs = p / LAKH;
            // a vanishing area has no meaningful per-sqft price
            let per_sqft = lakhs.checked_div(a).map(|v| v.round_dp(4));
            (Some(lakhs.round_dp(2)), per_sqft)
        }
        _ => (None, None),
    }
}

/// Evaluate one listing end to end: comparison, then flip thresholds.
///
/// A listing without a usable price or rent is not an error; it yields a
/// report whose financial fields are all null.
pub fn analyze_property(
    property: &PropertyRecord,
    market_rate: RatePercent,
    policy: &FinancialPolicy,
) -> RentBuyResult<PropertyReport> {
    let mut report = PropertyReport::without_metrics(property);

    let price = match (property.usable_price(), property.usable_rent()) {
        (Some(price), Some(_)) => price,
        _ => return Ok(report),
    };

    let terms = LoanTerms::new(price, market_rate, policy)?;
    let eval = evaluate(property, &terms, policy)?;
    let flips = analyze_sensitivity(property, &terms, policy, eval.decision)?;

    report.down_payment = Some(eval.down_payment.round());
    report.loan_amount = Some(eval.loan_amount.round());
    report.monthly_installment = Some(eval.monthly_installment.round());
    report.effective_installment = Some(eval.effective_monthly_installment.round());
    report.total_tax_saved = Some(eval.total_tax_saved.round());
    report.final_property_value = Some(eval.final_property_value.round());
    report.final_renting_wealth = Some(eval.final_renting_wealth.round());
    report.decision = Some(eval.decision);
    report.wealth_difference = Some(eval.wealth_difference.round());
    report.current_interest_rate = Some(market_rate.round_dp(2));
    report.interest_rate_flip = flips.interest_rate_flip;
    report.rent_flip = flips.rent_flip.map(|r| r.round());
    report.holding_period_flip = flips.holding_period_flip;

    Ok(report)
}

/// Input for a single-listing evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SingleEvaluationInput {
    pub property: PropertyRecord,
    /// Market average loan rate in percent
    pub market_rate: RatePercent,
    #[serde(default)]
    pub policy: FinancialPolicy,
}

/// One listing, wrapped in the standard output envelope.
pub fn evaluate_single(
    input: &SingleEvaluationInput,
) -> RentBuyResult<ComputationOutput<PropertyReport>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    input.policy.validate()?;
    if input.market_rate < Decimal::ZERO {
        return Err(RentBuyError::InvalidInput {
            field: "market_rate".into(),
            reason: "Market rate must not be negative".into(),
        });
    }

    let report = analyze_property(&input.property, input.market_rate, &input.policy)?;
    if !report.has_metrics() {
        warnings.push("Price or rent missing or non-positive; financial metrics are null".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Buy vs rent terminal wealth comparison with one-at-a-time flip thresholds",
        &serde_json::json!({
            "market_rate": input.market_rate.to_string(),
            "policy": input.policy,
            "tie_break": "equal terminal wealth resolves to RENT",
        }),
        warnings,
        elapsed,
        report,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn listing(price: Option<Money>, rent: Option<Money>, area: Option<Decimal>) -> PropertyRecord {
        PropertyRecord {
            title: Some("2 BHK Apartment".into()),
            city: Some("Pune".into()),
            location: Some("Baner".into()),
            bedrooms: Some("2".into()),
            price,
            rent_estimate: rent,
            area_sqft: area,
        }
    }

    #[test]
    fn test_price_metrics() {
        let (lakhs, psf) = price_metrics(Some(dec!(10000000)), Some(dec!(1000)));
        assert_eq!(lakhs, Some(dec!(100)));
        assert_eq!(psf, Some(dec!(0.1)));
    }

    #[test]
    fn test_price_metrics_tiny_area() {
        let (lakhs, psf) = price_metrics(Some(dec!(10000000)), Some(dec!(0.0000000000000000000000000001)));
        assert_eq!(lakhs, Some(dec!(100)));
        assert_eq!(psf, None);
    }

    #[test]
    fn test_price_metrics_missing_area() {
        assert_eq!(price_metrics(Some(dec!(10000000)), None), (None, None));
        assert_eq!(price_metrics(Some(dec!(10000000)), Some(dec!(0))), (None, None));
    }

    #[test]
    fn test_report_full_metrics() {
        let p = listing(Some(dec!(10000000)), Some(dec!(25000)), Some(dec!(1250)));
        let report = analyze_property(&p, dec!(8.5), &FinancialPolicy::default()).unwrap();

        assert_eq!(report.title.as_deref(), Some("2 BHK Apartment"));
        assert_eq!(report.price_lakhs, Some(dec!(100)));
        assert_eq!(report.price_lakhs_per_sqft, Some(dec!(0.08)));
        assert_eq!(report.down_payment, Some(dec!(2500000)));
        assert_eq!(report.loan_amount, Some(dec!(7500000)));
        assert_eq!(report.monthly_installment, Some(dec!(65087)));
        assert_eq!(report.decision, Some(Decision::Rent));
        assert_eq!(report.wealth_difference, Some(dec!(15188018)));
        assert_eq!(report.current_interest_rate, Some(dec!(8.5)));
        assert_eq!(report.interest_rate_flip, None);
        assert_eq!(report.rent_flip, Some(dec!(47500)));
        assert_eq!(report.holding_period_flip, None);
    }

    #[test]
    fn test_zero_rent_gives_null_metrics() {
        let p = listing(Some(dec!(10000000)), Some(dec!(0)), Some(dec!(1000)));
        let report = analyze_property(&p, dec!(8.5), &FinancialPolicy::default()).unwrap();
        assert!(!report.has_metrics());
        assert!(report.monthly_installment.is_none());
        assert!(report.current_interest_rate.is_none());
        // Price metrics do not depend on rent
        assert_eq!(report.price_lakhs, Some(dec!(100)));
    }

    #[test]
    fn test_zero_price_gives_null_metrics() {
        let p = listing(Some(dec!(0)), Some(dec!(20000)), Some(dec!(1000)));
        let report = analyze_property(&p, dec!(8.5), &FinancialPolicy::default()).unwrap();
        assert!(!report.has_metrics());
        assert!(report.price_lakhs.is_none());
    }

    #[test]
    fn test_evaluate_single_warns_on_missing_data() {
        let out = evaluate_single(&SingleEvaluationInput {
            property: listing(None, Some(dec!(20000)), None),
            market_rate: dec!(8.5),
            policy: FinancialPolicy::default(),
        })
        .unwrap();
        assert_eq!(out.warnings.len(), 1);
        assert!(!out.result.has_metrics());
    }

    #[test]
    fn test_evaluate_single_rejects_bad_policy() {
        let policy = FinancialPolicy {
            horizon_years: 0,
            ..FinancialPolicy::default()
        };
        let result = evaluate_single(&SingleEvaluationInput {
            property: listing(Some(dec!(1000000)), Some(dec!(5000)), None),
            market_rate: dec!(8.5),
            policy,
        });
        assert!(matches!(result, Err(RentBuyError::InvalidPolicy { .. })));
    }
}
