use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use tracing::debug;

use super::comparator::evaluate;
use super::property::{LoanTerms, PropertyRecord};
use crate::error::RentBuyError;
use crate::policy::FinancialPolicy;
use crate::time_value::checked_mul;
use crate::types::*;
use crate::RentBuyResult;

/// Values at which the recommendation flips, one variable at a time.
/// `None` means the candidate set was exhausted without a flip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlipThresholds {
    /// Annual interest rate in percent
    pub interest_rate_flip: Option<RatePercent>,
    /// Monthly rent amount (current rent times the flipping multiplier)
    pub rent_flip: Option<Money>,
    /// Holding period in years
    pub holding_period_flip: Option<u32>,
}

/// Generate the sweep values for a sensitivity variable from min to max with step.
pub fn generate_sweep_values(var: &SensitivityVariable) -> RentBuyResult<Vec<Decimal>> {
    if var.step <= Decimal::ZERO {
        return Err(RentBuyError::InvalidInput {
            field: format!("variable:{}", var.name),
            reason: "Step must be positive".into(),
        });
    }
    if var.min > var.max {
        return Err(RentBuyError::InvalidInput {
            field: format!("variable:{}", var.name),
            reason: "Min must be <= max".into(),
        });
    }

    let mut values = Vec::new();
    let mut current = var.min;
    while current <= var.max {
        values.push(current);
        current += var.step;
    }
    // Ensure max is included if step doesn't land exactly on it
    if let Some(&last) = values.last() {
        if last < var.max {
            values.push(var.max);
        }
    }

    Ok(values)
}

/// Scan `candidates` in order and return the first one whose trial decision
/// differs from `baseline`.
///
/// A trial that fails on degenerate arithmetic counts as "no flip" and the
/// scan moves on. Any other error is a real defect and is returned.
pub fn first_flip<T, F>(
    variable: &str,
    candidates: &[T],
    baseline: Decision,
    mut trial: F,
) -> RentBuyResult<Option<T>>
where
    T: Copy + Display,
    F: FnMut(T) -> RentBuyResult<Decision>,
{
    for &candidate in candidates {
        match trial(candidate) {
            Ok(decision) if decision != baseline => return Ok(Some(candidate)),
            Ok(_) => {}
            Err(e) if e.is_numerical() => {
                debug!(variable, %candidate, error = %e, "sensitivity trial skipped");
            }
            Err(e) => return Err(e),
        }
    }
    Ok(None)
}

/// First market rate (percent) at which the decision changes.
pub fn interest_rate_flip(
    property: &PropertyRecord,
    terms: &LoanTerms,
    policy: &FinancialPolicy,
    baseline: Decision,
) -> RentBuyResult<Option<RatePercent>> {
    let rates = generate_sweep_values(&policy.sensitivity.interest_rates)?;
    first_flip("interest_rate", &rates, baseline, |rate| {
        let trial_terms = LoanTerms {
            annual_rate: rate,
            ..*terms
        };
        Ok(evaluate(property, &trial_terms, policy)?.decision)
    })
}

/// First monthly rent (current rent times a multiplier) at which the decision changes.
///
/// A multiplier whose rent leaves the decimal range is a numerical non-flip.
pub fn rent_flip(
    property: &PropertyRecord,
    terms: &LoanTerms,
    policy: &FinancialPolicy,
    baseline: Decision,
) -> RentBuyResult<Option<Money>> {
    let rent = match property.usable_rent() {
        Some(r) => r,
        None => return Ok(None),
    };
    let multipliers = generate_sweep_values(&policy.sensitivity.rent_multipliers)?;

    let flip = first_flip("rent_multiplier", &multipliers, baseline, |m| {
        let trial_property = PropertyRecord {
            rent_estimate: Some(checked_mul(rent, m, "rent candidate")?),
            ..property.clone()
        };
        Ok(evaluate(&trial_property, terms, policy)?.decision)
    })?;

    flip.map(|m| checked_mul(rent, m, "rent candidate")).transpose()
}

/// First holding period at which the decision changes. The loan never runs
/// longer than the holding period.
pub fn holding_period_flip(
    property: &PropertyRecord,
    terms: &LoanTerms,
    policy: &FinancialPolicy,
    baseline: Decision,
) -> RentBuyResult<Option<u32>> {
    first_flip(
        "holding_period",
        &policy.sensitivity.holding_periods,
        baseline,
        |years| {
            let trial_terms = LoanTerms {
                loan_years: years.min(terms.loan_years),
                ..*terms
            };
            let trial_policy = FinancialPolicy {
                horizon_years: years,
                ..policy.clone()
            };
            Ok(evaluate(property, &trial_terms, &trial_policy)?.decision)
        },
    )
}

/// All three flip thresholds around a known baseline decision.
pub fn analyze_sensitivity(
    property: &PropertyRecord,
    terms: &LoanTerms,
    policy: &FinancialPolicy,
    baseline: Decision,
) -> RentBuyResult<FlipThresholds> {
    Ok(FlipThresholds {
        interest_rate_flip: interest_rate_flip(property, terms, policy, baseline)?,
        rent_flip: rent_flip(property, terms, policy, baseline)?,
        holding_period_flip: holding_period_flip(property, terms, policy, baseline)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_sweep_values() {
        let var = SensitivityVariable {
            name: "test".into(),
            min: dec!(1),
            max: dec!(5),
            step: dec!(1),
        };
        let vals = generate_sweep_values(&var).unwrap();
        assert_eq!(vals, vec![dec!(1), dec!(2), dec!(3), dec!(4), dec!(5)]);
    }

    #[test]
    fn test_sweep_with_non_exact_step() {
        let var = SensitivityVariable {
            name: "test".into(),
            min: dec!(0),
            max: dec!(1),
            step: dec!(0.3),
        };
        let vals = generate_sweep_values(&var).unwrap();
        // 0, 0.3, 0.6, 0.9, 1.0 (max appended)
        assert_eq!(vals.len(), 5);
        assert_eq!(*vals.last().unwrap(), dec!(1));
    }

    #[test]
    fn test_default_grids() {
        let policy = FinancialPolicy::default();
        let rates = generate_sweep_values(&policy.sensitivity.interest_rates).unwrap();
        assert_eq!(rates.len(), 21);
        assert_eq!(rates[0], dec!(5.0));
        assert_eq!(rates[20], dec!(15.0));

        let mults = generate_sweep_values(&policy.sensitivity.rent_multipliers).unwrap();
        assert_eq!(mults.len(), 16);
        assert_eq!(*mults.last().unwrap(), dec!(2.0));
    }

    #[test]
    fn test_first_flip_returns_first_match() {
        let found = first_flip("x", &[1, 2, 3, 4], Decision::Rent, |v| {
            Ok(if v >= 3 { Decision::Buy } else { Decision::Rent })
        })
        .unwrap();
        assert_eq!(found, Some(3));
    }

    #[test]
    fn test_first_flip_exhausted_is_none() {
        let found = first_flip("x", &[1, 2, 3], Decision::Buy, |_| Ok(Decision::Buy)).unwrap();
        assert_eq!(found, None);
    }

    #[test]
    fn test_first_flip_skips_numerical_failures() {
        let found = first_flip("x", &[1, 2, 3], Decision::Rent, |v| {
            if v == 1 {
                Err(RentBuyError::DivisionByZero {
                    context: "trial".into(),
                })
            } else {
                Ok(Decision::Buy)
            }
        })
        .unwrap();
        assert_eq!(found, Some(2));
    }

    #[test]
    fn test_first_flip_propagates_other_errors() {
        let result = first_flip("x", &[1, 2], Decision::Rent, |_| {
            Err(RentBuyError::InvalidInput {
                field: "f".into(),
                reason: "bad".into(),
            })
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_reference_case_thresholds() {
        let policy = FinancialPolicy::default();
        let property = PropertyRecord {
            price: Some(dec!(10000000)),
            rent_estimate: Some(dec!(25000)),
            ..PropertyRecord::default()
        };
        let terms = LoanTerms::new(dec!(10000000), dec!(8.5), &policy).unwrap();
        let flips = analyze_sensitivity(&property, &terms, &policy, Decision::Rent).unwrap();
        assert_eq!(flips.interest_rate_flip, None);
        assert_eq!(flips.rent_flip, Some(dec!(47500)));
        assert_eq!(flips.holding_period_flip, None);
    }

    #[test]
    fn test_rent_scan_skips_out_of_range_candidates() {
        let policy = FinancialPolicy::default();
        let huge_rent = dec!(50_000_000_000_000_000_000_000_000_000);
        let property = PropertyRecord {
            price: Some(dec!(10000000)),
            rent_estimate: Some(huge_rent),
            ..PropertyRecord::default()
        };
        let terms = LoanTerms::new(dec!(10000000), dec!(8.5), &policy).unwrap();
        let flip = rent_flip(&property, &terms, &policy, Decision::Buy).unwrap();
        assert_eq!(flip, None);
    }
}
