use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::RentBuyError;
use crate::policy::MAX_YEARS;
use crate::time_value::{checked_add, checked_div, checked_mul, checked_sub, compound, months_in};
use crate::types::*;
use crate::RentBuyResult;

const MONTHS_PER_YEAR: u32 = 12;

/// Input for a standalone amortization run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationInput {
    pub principal: Money,
    /// Annual interest rate in percent (8.5 = 8.5%)
    pub annual_rate_percent: RatePercent,
    pub tenure_years: u32,
}

/// One year of a loan's life
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationYear {
    pub year: u32,
    pub interest_paid: Money,
    pub principal_paid: Money,
    /// Never negative; month-by-month drift is clamped at zero.
    pub ending_balance: Money,
}

/// Fixed installment plus the year-by-year breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub monthly_installment: Money,
    pub years: Vec<AmortizationYear>,
    pub total_interest: Money,
    pub total_principal: Money,
}

fn validate_loan(principal: Money, annual_rate_percent: RatePercent, tenure_years: u32) -> RentBuyResult<()> {
    if principal < Decimal::ZERO {
        return Err(RentBuyError::InvalidInput {
            field: "principal".into(),
            reason: "Principal must not be negative".into(),
        });
    }
    if annual_rate_percent < Decimal::ZERO {
        return Err(RentBuyError::InvalidInput {
            field: "annual_rate_percent".into(),
            reason: "Interest rate must not be negative".into(),
        });
    }
    if tenure_years < 1 {
        return Err(RentBuyError::InvalidInput {
            field: "tenure_years".into(),
            reason: "Tenure must be at least 1 year".into(),
        });
    }
    if tenure_years > MAX_YEARS {
        return Err(RentBuyError::InvalidInput {
            field: "tenure_years".into(),
            reason: format!("Tenure must not exceed {MAX_YEARS} years"),
        });
    }
    Ok(())
}

fn monthly_rate(annual_rate_percent: RatePercent) -> Rate {
    annual_rate_percent / Decimal::from(MONTHS_PER_YEAR * 100)
}

/// Standard fixed-rate installment: P * r(1+r)^n / ((1+r)^n - 1)
pub fn compute_installment(
    principal: Money,
    annual_rate_percent: RatePercent,
    tenure_years: u32,
) -> RentBuyResult<Money> {
    validate_loan(principal, annual_rate_percent, tenure_years)?;

    let r = monthly_rate(annual_rate_percent);
    let n = months_in(tenure_years, "installment months")?;

    if r.is_zero() {
        // Interest-free: straight-line repayment
        return Ok(principal / Decimal::from(n));
    }

    let factor = compound(r, n, "installment growth factor")?;
    let numerator = checked_mul(checked_mul(principal, r, "installment")?, factor, "installment")?;
    checked_div(numerator, factor - Decimal::ONE, "installment denominator")
}

/// Month-by-month simulation rolled up into calendar years of the loan.
pub fn amortize_yearly(
    principal: Money,
    annual_rate_percent: RatePercent,
    tenure_years: u32,
) -> RentBuyResult<AmortizationSchedule> {
    let installment = compute_installment(principal, annual_rate_percent, tenure_years)?;
    let r = monthly_rate(annual_rate_percent);

    let mut balance = principal;
    let mut years = Vec::with_capacity(tenure_years as usize);
    let mut total_interest = Decimal::ZERO;
    let mut total_principal = Decimal::ZERO;

    for year in 1..=tenure_years {
        let mut interest_year = Decimal::ZERO;
        let mut principal_year = Decimal::ZERO;

        for _ in 0..MONTHS_PER_YEAR {
            let interest = checked_mul(balance, r, "monthly interest")?;
            let principal_component = checked_sub(installment, interest, "principal component")?;
            balance = checked_sub(balance, principal_component, "loan balance")?;

            interest_year = checked_add(interest_year, interest, "yearly interest")?;
            principal_year = checked_add(principal_year, principal_component, "yearly principal")?;
        }

        total_interest = checked_add(total_interest, interest_year, "total interest")?;
        total_principal = checked_add(total_principal, principal_year, "total principal")?;

        years.push(AmortizationYear {
            year,
            interest_paid: interest_year,
            principal_paid: principal_year,
            ending_balance: balance.max(Decimal::ZERO),
        });
    }

    Ok(AmortizationSchedule {
        monthly_installment: installment,
        years,
        total_interest,
        total_principal,
    })
}

/// Amortization schedule wrapped in the standard output envelope.
pub fn build_amortization(
    input: &AmortizationInput,
) -> RentBuyResult<ComputationOutput<AmortizationSchedule>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let schedule = amortize_yearly(input.principal, input.annual_rate_percent, input.tenure_years)?;

    if input.principal.is_zero() {
        warnings.push("Principal is zero; schedule contains no repayments".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-installment amortization (monthly compounding, yearly roll-up)",
        &serde_json::json!({
            "principal": input.principal.to_string(),
            "annual_rate_percent": input.annual_rate_percent.to_string(),
            "tenure_years": input.tenure_years,
            "monthly_rate": monthly_rate(input.annual_rate_percent).to_string(),
        }),
        warnings,
        elapsed,
        schedule,
    ))
}
