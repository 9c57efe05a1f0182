use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::amortization::AmortizationYear;
use crate::time_value::{checked_add, checked_mul};
use crate::types::{Money, Rate};
use crate::RentBuyResult;

/// Home-loan deduction policy: a tax slab plus separate ceilings on the
/// interest and principal components that may be deducted each year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxPolicy {
    pub tax_rate: Rate,
    pub interest_deduction_cap: Money,
    pub principal_deduction_cap: Money,
}

impl Default for TaxPolicy {
    fn default() -> Self {
        Self {
            tax_rate: dec!(0.30),
            interest_deduction_cap: dec!(200000),
            principal_deduction_cap: dec!(150000),
        }
    }
}

/// Tax saved in one year of the loan.
pub fn yearly_tax_saving(
    interest_paid: Money,
    principal_paid: Money,
    policy: &TaxPolicy,
) -> RentBuyResult<Money> {
    let interest_deduction = interest_paid.min(policy.interest_deduction_cap);
    let principal_deduction = principal_paid.min(policy.principal_deduction_cap);

    let deductible = checked_add(interest_deduction, principal_deduction, "tax deduction")?;
    checked_mul(deductible, policy.tax_rate, "tax saving")
}

/// Tax saved over every year of a schedule.
pub fn total_tax_saved(years: &[AmortizationYear], policy: &TaxPolicy) -> RentBuyResult<Money> {
    years.iter().try_fold(Decimal::ZERO, |acc, y| {
        let saving = yearly_tax_saving(y.interest_paid, y.principal_paid, policy)?;
        checked_add(acc, saving, "total tax saved")
    })
}
