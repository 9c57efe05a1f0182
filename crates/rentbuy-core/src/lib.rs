pub mod error;
pub mod policy;
pub mod time_value;
pub mod types;

pub mod buy_rent;
pub mod mortgage;
pub mod portfolio;

pub use error::RentBuyError;
pub use policy::{FinancialPolicy, SensitivityGrid};
pub use types::*;

/// Standard result type for all rent-vs-buy operations
pub type RentBuyResult<T> = Result<T, RentBuyError>;
