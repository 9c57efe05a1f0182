pub mod amortization;
pub mod tax_benefit;
