use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.06 = 6%).
pub type Rate = Decimal;

/// Loan interest rates quoted as percentages (8.5 = 8.5% per year).
pub type RatePercent = Decimal;

/// Buy-vs-rent recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Decision {
    Buy,
    Rent,
}

impl Decision {
    /// BUY only when owning ends strictly ahead. An exact tie resolves to RENT.
    pub fn from_wealth(property_wealth: Money, renting_wealth: Money) -> Self {
        if property_wealth > renting_wealth {
            Decision::Buy
        } else {
            Decision::Rent
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decision::Buy => write!(f, "BUY"),
            Decision::Rent => write!(f, "RENT"),
        }
    }
}

/// Sweep range for one sensitivity variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityVariable {
    pub name: String,
    pub min: Decimal,
    pub max: Decimal,
    pub step: Decimal,
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_tie_resolves_to_rent() {
        assert_eq!(Decision::from_wealth(dec!(100), dec!(100)), Decision::Rent);
        assert_eq!(Decision::from_wealth(dec!(100.01), dec!(100)), Decision::Buy);
        assert_eq!(Decision::from_wealth(dec!(99), dec!(100)), Decision::Rent);
    }

    #[test]
    fn test_decision_serializes_uppercase() {
        let json = serde_json::to_string(&Decision::Buy).unwrap();
        assert_eq!(json, "\"BUY\"");
        assert_eq!(Decision::Rent.to_string(), "RENT");
    }
}
