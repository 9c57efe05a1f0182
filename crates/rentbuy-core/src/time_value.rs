use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::RentBuyError;
use crate::types::{Money, Rate};
use crate::RentBuyResult;

const MONTHS_PER_YEAR: u32 = 12;

/// Compute (1 + r)^n via iterative multiplication (avoids Decimal::powd drift).
///
/// Every product is checked; a result that leaves the 96-bit mantissa range is
/// reported as an overflow in `context` rather than panicking.
pub(crate) fn compound(rate: Rate, periods: u32, context: &str) -> RentBuyResult<Decimal> {
    let factor = Decimal::ONE + rate;
    let mut result = Decimal::ONE;
    for _ in 0..periods {
        result = result
            .checked_mul(factor)
            .ok_or_else(|| RentBuyError::Overflow {
                context: context.to_string(),
            })?;
    }
    Ok(result)
}

pub(crate) fn checked_mul(a: Decimal, b: Decimal, context: &str) -> RentBuyResult<Decimal> {
    a.checked_mul(b).ok_or_else(|| RentBuyError::Overflow {
        context: context.to_string(),
    })
}

pub(crate) fn checked_add(a: Decimal, b: Decimal, context: &str) -> RentBuyResult<Decimal> {
    a.checked_add(b).ok_or_else(|| RentBuyError::Overflow {
        context: context.to_string(),
    })
}

pub(crate) fn checked_sub(a: Decimal, b: Decimal, context: &str) -> RentBuyResult<Decimal> {
    a.checked_sub(b).ok_or_else(|| RentBuyError::Overflow {
        context: context.to_string(),
    })
}

/// `years * 12`, reported as an overflow instead of wrapping.
pub(crate) fn months_in(years: u32, context: &str) -> RentBuyResult<u32> {
    years
        .checked_mul(MONTHS_PER_YEAR)
        .ok_or_else(|| RentBuyError::Overflow {
            context: context.to_string(),
        })
}

pub(crate) fn checked_div(a: Decimal, b: Decimal, context: &str) -> RentBuyResult<Decimal> {
    if b.is_zero() {
        return Err(RentBuyError::DivisionByZero {
            context: context.to_string(),
        });
    }
    a.checked_div(b).ok_or_else(|| RentBuyError::Overflow {
        context: context.to_string(),
    })
}

fn require_non_negative(field: &str, value: Decimal) -> RentBuyResult<()> {
    if value < Decimal::ZERO {
        return Err(RentBuyError::InvalidInput {
            field: field.into(),
            reason: "must not be negative".into(),
        });
    }
    Ok(())
}

/// Terminal value of a single amount compounded annually: `amount * (1 + r)^years`.
pub fn lump_sum_growth(amount: Money, annual_return_rate: Rate, years: u32) -> RentBuyResult<Money> {
    require_non_negative("amount", amount)?;
    require_non_negative("annual_return_rate", annual_return_rate)?;

    let factor = compound(annual_return_rate, years, "lump-sum growth factor")?;
    checked_mul(amount, factor, "lump-sum growth")
}

/// Future value of an ordinary annuity of monthly contributions, compounded
/// monthly at `annual_return_rate / 12`.
///
/// A renter never contributes a negative amount; callers clamp shortfalls to
/// zero before calling.
pub fn periodic_contribution_future_value(
    monthly_contribution: Money,
    annual_return_rate: Rate,
    years: u32,
) -> RentBuyResult<Money> {
    require_non_negative("monthly_contribution", monthly_contribution)?;
    require_non_negative("annual_return_rate", annual_return_rate)?;

    let months = months_in(years, "contribution months")?;
    let monthly_rate = annual_return_rate / Decimal::from(MONTHS_PER_YEAR);

    if monthly_rate.is_zero() {
        return checked_mul(
            monthly_contribution,
            Decimal::from(months),
            "contribution future value",
        );
    }

    let growth = compound(monthly_rate, months, "contribution growth factor")?;
    let annuity_factor = checked_div(
        growth - Decimal::ONE,
        monthly_rate,
        "contribution annuity factor",
    )?;
    checked_mul(monthly_contribution, annuity_factor, "contribution future value")
}

/// Total rent paid over `years` when the monthly rent escalates once a year.
pub fn total_rent_paid(start_rent: Money, escalation_rate: Rate, years: u32) -> RentBuyResult<Money> {
    require_non_negative("start_rent", start_rent)?;
    require_non_negative("escalation_rate", escalation_rate)?;

    let mut total = Decimal::ZERO;
    let mut rent = start_rent;
    let step = Decimal::ONE + escalation_rate;

    for _ in 0..years {
        total = checked_add(total, checked_mul(rent, dec!(12), "annual rent")?, "total rent")?;
        rent = checked_mul(rent, step, "rent escalation")?;
    }

    Ok(total)
}
