use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::RentBuyError;
use crate::policy::FinancialPolicy;
use crate::types::{Money, Rate, RatePercent};
use crate::RentBuyResult;

/// One real-estate listing as handed over by ingestion.
///
/// Display fields are opaque and only passed through to the report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyRecord {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub bedrooms: Option<String>,
    #[serde(default)]
    pub price: Option<Money>,
    /// Comparable monthly rent
    #[serde(default)]
    pub rent_estimate: Option<Money>,
    #[serde(default)]
    pub area_sqft: Option<Decimal>,
}

impl PropertyRecord {
    pub fn usable_price(&self) -> Option<Money> {
        self.price.filter(|p| *p > Decimal::ZERO)
    }

    pub fn usable_rent(&self) -> Option<Money> {
        self.rent_estimate.filter(|r| *r > Decimal::ZERO)
    }

    pub fn usable_area(&self) -> Option<Decimal> {
        self.area_sqft.filter(|a| *a > Decimal::ZERO)
    }

    /// Price and rent are both present and positive.
    pub fn is_evaluable(&self) -> bool {
        self.usable_price().is_some() && self.usable_rent().is_some()
    }
}

/// Financing of one purchase at the market rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub down_payment_rate: Rate,
    pub loan_years: u32,
    /// Market-wide average, in percent
    pub annual_rate: RatePercent,
    pub down_payment: Money,
    pub loan_amount: Money,
}

impl LoanTerms {
    pub fn new(price: Money, annual_rate: RatePercent, policy: &FinancialPolicy) -> RentBuyResult<Self> {
        if price < Decimal::ZERO {
            return Err(RentBuyError::InvalidInput {
                field: "price".into(),
                reason: "Price must not be negative".into(),
            });
        }
        if annual_rate < Decimal::ZERO {
            return Err(RentBuyError::InvalidInput {
                field: "annual_rate".into(),
                reason: "Market interest rate must not be negative".into(),
            });
        }

        let down_payment = price * policy.down_payment_rate;
        Ok(Self {
            down_payment_rate: policy.down_payment_rate,
            loan_years: policy.loan_years,
            annual_rate,
            down_payment,
            loan_amount: price - down_payment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_loan_terms_split() {
        let terms = LoanTerms::new(dec!(10000000), dec!(8.5), &FinancialPolicy::default()).unwrap();
        assert_eq!(terms.down_payment, dec!(2500000));
        assert_eq!(terms.loan_amount, dec!(7500000));
        assert_eq!(terms.loan_years, 20);
        assert_eq!(terms.annual_rate, dec!(8.5));
    }

    #[test]
    fn test_loan_terms_reject_negative() {
        let policy = FinancialPolicy::default();
        assert!(LoanTerms::new(dec!(-1), dec!(8.5), &policy).is_err());
        assert!(LoanTerms::new(dec!(100), dec!(-8.5), &policy).is_err());
    }

    #[test]
    fn test_usable_fields() {
        let p = PropertyRecord {
            price: Some(dec!(0)),
            rent_estimate: Some(dec!(15000)),
            area_sqft: Some(dec!(-3)),
            ..PropertyRecord::default()
        };
        assert!(p.usable_price().is_none());
        assert_eq!(p.usable_rent(), Some(dec!(15000)));
        assert!(p.usable_area().is_none());
        assert!(!p.is_evaluable());
    }
}
