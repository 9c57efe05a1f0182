use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::buy_rent::sensitivity::generate_sweep_values;
use crate::error::RentBuyError;
use crate::mortgage::tax_benefit::TaxPolicy;
use crate::types::{Rate, SensitivityVariable};
use crate::RentBuyResult;

/// Longest loan tenure, horizon or holding period accepted anywhere.
pub const MAX_YEARS: u32 = 100;

/// Candidate sets scanned by the flip-threshold search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensitivityGrid {
    /// Annual interest rates in percent
    pub interest_rates: SensitivityVariable,
    /// Multipliers applied to the current monthly rent
    pub rent_multipliers: SensitivityVariable,
    /// Holding periods in years, ascending
    pub holding_periods: Vec<u32>,
}

impl Default for SensitivityGrid {
    fn default() -> Self {
        Self {
            interest_rates: SensitivityVariable {
                name: "interest_rate".into(),
                min: dec!(5.0),
                max: dec!(15.0),
                step: dec!(0.5),
            },
            rent_multipliers: SensitivityVariable {
                name: "rent_multiplier".into(),
                min: dec!(0.5),
                max: dec!(2.0),
                step: dec!(0.1),
            },
            holding_periods: vec![5, 7, 10, 12, 15, 18, 20, 25, 30],
        }
    }
}

/// Every policy constant the engine consumes. Nothing here is hard-wired
/// into the computations; `Default` carries the reference values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialPolicy {
    pub down_payment_rate: Rate,
    pub loan_years: u32,
    pub tax: TaxPolicy,
    pub appreciation_rate: Rate,
    pub investment_return_rate: Rate,
    pub horizon_years: u32,
    /// Only used by the city summary's total-rent figure
    pub rent_escalation_rate: Rate,
    pub sensitivity: SensitivityGrid,
}

impl Default for FinancialPolicy {
    fn default() -> Self {
        Self {
            down_payment_rate: dec!(0.25),
            loan_years: 20,
            tax: TaxPolicy::default(),
            appreciation_rate: dec!(0.06),
            investment_return_rate: dec!(0.10),
            horizon_years: 20,
            rent_escalation_rate: dec!(0.05),
            sensitivity: SensitivityGrid::default(),
        }
    }
}

fn invalid(field: &str, reason: &str) -> RentBuyError {
    RentBuyError::InvalidPolicy {
        field: field.into(),
        reason: reason.into(),
    }
}

fn require_fraction(field: &str, value: Rate) -> RentBuyResult<()> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(invalid(field, "must be between 0 and 1"));
    }
    Ok(())
}

fn require_non_negative(field: &str, value: Decimal) -> RentBuyResult<()> {
    if value < Decimal::ZERO {
        return Err(invalid(field, "must not be negative"));
    }
    Ok(())
}

fn require_years(field: &str, years: u32) -> RentBuyResult<()> {
    if years < 1 {
        return Err(invalid(field, "must be at least 1"));
    }
    if years > MAX_YEARS {
        return Err(invalid(field, &format!("must not exceed {MAX_YEARS}")));
    }
    Ok(())
}

impl FinancialPolicy {
    /// Reject a malformed configuration before any property is evaluated.
    pub fn validate(&self) -> RentBuyResult<()> {
        require_fraction("down_payment_rate", self.down_payment_rate)?;
        require_fraction("tax.tax_rate", self.tax.tax_rate)?;
        require_non_negative("tax.interest_deduction_cap", self.tax.interest_deduction_cap)?;
        require_non_negative("tax.principal_deduction_cap", self.tax.principal_deduction_cap)?;
        require_non_negative("appreciation_rate", self.appreciation_rate)?;
        require_non_negative("investment_return_rate", self.investment_return_rate)?;
        require_non_negative("rent_escalation_rate", self.rent_escalation_rate)?;

        require_years("loan_years", self.loan_years)?;
        require_years("horizon_years", self.horizon_years)?;

        self.sensitivity.validate()
    }
}

impl SensitivityGrid {
    pub fn validate(&self) -> RentBuyResult<()> {
        if self.interest_rates.min < Decimal::ZERO {
            return Err(invalid("sensitivity.interest_rates.min", "must not be negative"));
        }
        if self.rent_multipliers.min <= Decimal::ZERO {
            return Err(invalid("sensitivity.rent_multipliers.min", "must be positive"));
        }

        for var in [&self.interest_rates, &self.rent_multipliers] {
            generate_sweep_values(var).map_err(|e| {
                invalid(&format!("sensitivity.{}", var.name), &e.to_string())
            })?;
        }

        if self.holding_periods.is_empty() {
            return Err(invalid("sensitivity.holding_periods", "must not be empty"));
        }
        for &period in &self.holding_periods {
            require_years("sensitivity.holding_periods", period)?;
        }
        if self.holding_periods.windows(2).any(|w| w[0] >= w[1]) {
            return Err(invalid("sensitivity.holding_periods", "must be strictly ascending"));
        }
        Ok(())
    }
}
