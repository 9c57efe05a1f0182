use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::buy_rent::comparator::{evaluate, BuyRentEvaluation};
use crate::buy_rent::property::{LoanTerms, PropertyRecord};
use crate::buy_rent::sensitivity::{analyze_sensitivity, FlipThresholds};
use crate::error::RentBuyError;
use crate::policy::FinancialPolicy;
use crate::time_value::{
    checked_add, checked_div, checked_mul, checked_sub, lump_sum_growth, months_in,
    periodic_contribution_future_value, total_rent_paid,
};
use crate::types::*;
use crate::RentBuyResult;

/// Input for a city-level summary built from the city's average listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitySummaryInput {
    pub properties: Vec<PropertyRecord>,
    pub city: String,
    /// Market average loan rate in percent
    pub market_rate: RatePercent,
    #[serde(default)]
    pub policy: FinancialPolicy,
}

/// Wealth on each side at the end of a given year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WealthPoint {
    pub year: u32,
    pub buy_wealth: Money,
    pub rent_wealth: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitySummary {
    pub city: String,
    pub listings_used: usize,
    pub average_price: Money,
    pub average_rent: Money,
    pub evaluation: BuyRentEvaluation,
    /// Installments over the loan minus total tax saved
    pub net_installment_paid: Money,
    /// Rent paid over the horizon with annual escalation
    pub total_rent_paid: Money,
    pub flip_thresholds: FlipThresholds,
    pub trajectory: Vec<WealthPoint>,
}

fn average(values: &[Money], context: &str) -> RentBuyResult<Money> {
    let total = values
        .iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))
        .ok_or_else(|| RentBuyError::Overflow {
            context: context.to_string(),
        })?;
    checked_div(total, Decimal::from(values.len()), context)
}

/// Year-by-year wealth of both paths up to the policy horizon.
pub fn wealth_trajectory(
    price: Money,
    eval: &BuyRentEvaluation,
    policy: &FinancialPolicy,
) -> RentBuyResult<Vec<WealthPoint>> {
    (1..=policy.horizon_years)
        .map(|year| {
            let buy_wealth = lump_sum_growth(price, policy.appreciation_rate, year)?;
            let invested_down_payment =
                lump_sum_growth(eval.down_payment, policy.investment_return_rate, year)?;
            let invested_savings = periodic_contribution_future_value(
                eval.monthly_saving,
                policy.investment_return_rate,
                year,
            )?;
            let rent_wealth = checked_add(invested_down_payment, invested_savings, "renting wealth")?;
            Ok(WealthPoint {
                year,
                buy_wealth,
                rent_wealth,
            })
        })
        .collect()
}

/// Evaluate the average evaluable listing of one city.
pub fn city_summary(input: &CitySummaryInput) -> RentBuyResult<ComputationOutput<CitySummary>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    input.policy.validate()?;
    let policy = &input.policy;

    let in_city: Vec<&PropertyRecord> = input
        .properties
        .iter()
        .filter(|p| {
            p.city
                .as_deref()
                .is_some_and(|c| c.trim().eq_ignore_ascii_case(input.city.trim()))
        })
        .collect();

    let evaluable: Vec<&PropertyRecord> = in_city.iter().copied().filter(|p| p.is_evaluable()).collect();
    if evaluable.is_empty() {
        return Err(RentBuyError::InsufficientData(format!(
            "No listings with usable price and rent for city '{}'",
            input.city
        )));
    }
    if evaluable.len() < in_city.len() {
        warnings.push(format!(
            "{} listing(s) in {} excluded for missing price or rent",
            in_city.len() - evaluable.len(),
            input.city
        ));
    }

    let prices: Vec<Money> = evaluable.iter().filter_map(|p| p.usable_price()).collect();
    let rents: Vec<Money> = evaluable.iter().filter_map(|p| p.usable_rent()).collect();
    let average_price = average(&prices, "average price")?;
    let average_rent = average(&rents, "average rent")?;

    let representative = PropertyRecord {
        city: Some(input.city.clone()),
        price: Some(average_price),
        rent_estimate: Some(average_rent),
        ..PropertyRecord::default()
    };

    let terms = LoanTerms::new(average_price, input.market_rate, policy)?;
    let evaluation = evaluate(&representative, &terms, policy)?;
    let flip_thresholds = analyze_sensitivity(&representative, &terms, policy, evaluation.decision)?;

    let months = Decimal::from(months_in(terms.loan_years, "loan months")?);
    let net_installment_paid = checked_sub(
        checked_mul(evaluation.monthly_installment, months, "net installment paid")?,
        evaluation.total_tax_saved,
        "net installment paid",
    )?;
    let rent_total = total_rent_paid(average_rent, policy.rent_escalation_rate, policy.horizon_years)?;
    let trajectory = wealth_trajectory(average_price, &evaluation, policy)?;

    let output = CitySummary {
        city: input.city.clone(),
        listings_used: evaluable.len(),
        average_price,
        average_rent,
        evaluation,
        net_installment_paid,
        total_rent_paid: rent_total,
        flip_thresholds,
        trajectory,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "City average listing: buy vs rent with escalating rent and yearly wealth path",
        &serde_json::json!({
            "city": input.city,
            "market_rate": input.market_rate.to_string(),
            "policy": input.policy,
        }),
        warnings,
        elapsed,
        output,
    ))
}
