pub mod availability;
pub mod pricing;
