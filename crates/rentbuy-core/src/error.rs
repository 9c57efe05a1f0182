use thiserror::Error;

#[derive(Debug, Error)]
pub enum RentBuyError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid policy: {field}: {reason}")]
    InvalidPolicy { field: String, reason: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Numeric overflow in {context}")]
    Overflow { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl RentBuyError {
    /// Degenerate arithmetic rather than bad input or a broken policy.
    pub fn is_numerical(&self) -> bool {
        matches!(
            self,
            RentBuyError::DivisionByZero { .. } | RentBuyError::Overflow { .. }
        )
    }
}

impl From<serde_json::Error> for RentBuyError {
    fn from(e: serde_json::Error) -> Self {
        RentBuyError::SerializationError(e.to_string())
    }
}
