use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::property::{LoanTerms, PropertyRecord};
use crate::error::RentBuyError;
use crate::mortgage::amortization::{amortize_yearly, AmortizationYear};
use crate::mortgage::tax_benefit::total_tax_saved;
use crate::policy::FinancialPolicy;
use crate::time_value::{
    checked_add, checked_div, checked_mul, lump_sum_growth, months_in,
    periodic_contribution_future_value,
};
use crate::types::{Decision, Money};
use crate::RentBuyResult;

/// Terminal wealth of owning vs renting-and-investing for one property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyRentEvaluation {
    pub down_payment: Money,
    pub loan_amount: Money,
    pub monthly_installment: Money,
    /// Installment net of tax relief, spread evenly over the loan
    pub effective_monthly_installment: Money,
    pub total_tax_saved: Money,
    pub final_property_value: Money,
    /// Invested down payment plus invested monthly savings
    pub final_renting_wealth: Money,
    /// What the renter invests each month: installment minus rent, floored at zero
    pub monthly_saving: Money,
    pub decision: Decision,
    /// Absolute gap between the two terminal wealth figures
    pub wealth_difference: Money,
    pub schedule: Vec<AmortizationYear>,
}

/// Run the full buy-vs-rent comparison for one property.
///
/// The loan is amortized over `terms.loan_years` at `terms.annual_rate`;
/// both wealth paths are projected over `policy.horizon_years`.
pub fn evaluate(
    property: &PropertyRecord,
    terms: &LoanTerms,
    policy: &FinancialPolicy,
) -> RentBuyResult<BuyRentEvaluation> {
    let price = property.usable_price().ok_or_else(|| RentBuyError::InvalidInput {
        field: "price".into(),
        reason: "Price must be positive".into(),
    })?;
    let rent = property.usable_rent().ok_or_else(|| RentBuyError::InvalidInput {
        field: "rent_estimate".into(),
        reason: "Monthly rent must be positive".into(),
    })?;

    // --- Owner side ---
    let schedule = amortize_yearly(terms.loan_amount, terms.annual_rate, terms.loan_years)?;
    let installment = schedule.monthly_installment;
    let tax_saved = total_tax_saved(&schedule.years, &policy.tax)?;

    let months = Decimal::from(months_in(terms.loan_years, "loan months")?);
    let total_installments = checked_mul(installment, months, "total installments paid")?;
    let effective_installment = checked_div(
        total_installments - tax_saved,
        months,
        "effective installment",
    )?;

    let final_property_value =
        lump_sum_growth(price, policy.appreciation_rate, policy.horizon_years)?;

    // --- Renter side ---
    let fd_value = lump_sum_growth(
        terms.down_payment,
        policy.investment_return_rate,
        policy.horizon_years,
    )?;
    let monthly_saving = (installment - rent).max(Decimal::ZERO);
    let sip_value = periodic_contribution_future_value(
        monthly_saving,
        policy.investment_return_rate,
        policy.horizon_years,
    )?;
    let final_renting_wealth = checked_add(fd_value, sip_value, "renting wealth")?;

    let decision = Decision::from_wealth(final_property_value, final_renting_wealth);

    Ok(BuyRentEvaluation {
        down_payment: terms.down_payment,
        loan_amount: terms.loan_amount,
        monthly_installment: installment,
        effective_monthly_installment: effective_installment,
        total_tax_saved: tax_saved,
        final_property_value,
        final_renting_wealth,
        monthly_saving,
        decision,
        wealth_difference: (final_property_value - final_renting_wealth).abs(),
        schedule: schedule.years,
    })
}
