use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::RentBuyError;
use crate::time_value::{checked_add, checked_div};
use crate::types::RatePercent;
use crate::RentBuyResult;

/// One lender's quoted home-loan rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankRate {
    #[serde(default)]
    pub bank: Option<String>,
    /// Annual rate in percent
    pub rate: RatePercent,
}

/// Market-wide average rate across all quoted lenders.
pub fn average_rate(rates: &[BankRate]) -> RentBuyResult<RatePercent> {
    if rates.is_empty() {
        return Err(RentBuyError::InsufficientData(
            "Rates table has no rows".into(),
        ));
    }
    if let Some(bad) = rates.iter().find(|r| r.rate < Decimal::ZERO) {
        return Err(RentBuyError::InvalidInput {
            field: "rate".into(),
            reason: format!(
                "Negative rate {} for {}",
                bad.rate,
                bad.bank.as_deref().unwrap_or("unnamed lender")
            ),
        });
    }

    let sum = rates
        .iter()
        .try_fold(Decimal::ZERO, |acc, r| checked_add(acc, r.rate, "rate total"))?;
    checked_div(sum, Decimal::from(rates.len()), "average rate")
}
