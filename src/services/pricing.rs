use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::errors::ServiceError;

/// Largest difference between expected and stored rates still treated as equal
const RATE_TOLERANCE: Decimal = dec!(0.01);

/// Relationship between ground-floor and mezzanine rates.
///
/// Mezzanine space is priced at the ground-floor rate minus a configured
/// discount (`mezzanine_discount_rate`, 20% unless overridden).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingPolicy {
    mezzanine_discount: Decimal,
}

impl PricingPolicy {
    pub fn new(mezzanine_discount: Decimal) -> Result<Self, ServiceError> {
        if mezzanine_discount < Decimal::ZERO || mezzanine_discount >= Decimal::ONE {
            return Err(ServiceError::ValidationError(format!(
                "Mezzanine discount must be in [0, 1), got {}",
                mezzanine_discount
            )));
        }
        Ok(Self { mezzanine_discount })
    }

    /// Builds the policy from the `f64` carried in configuration
    pub fn from_rate(rate: f64) -> Result<Self, ServiceError> {
        let discount = Decimal::from_f64(rate).ok_or_else(|| {
            ServiceError::ValidationError(format!("Invalid mezzanine discount: {}", rate))
        })?;
        Self::new(discount)
    }

    pub fn mezzanine_discount(&self) -> Decimal {
        self.mezzanine_discount
    }

    /// Mezzanine rate derived from a ground-floor rate, rounded to cents
    pub fn mezzanine_rate(&self, ground_rate: Decimal) -> Decimal {
        (ground_rate * (Decimal::ONE - self.mezzanine_discount)).round_dp(2)
    }

    /// Whether a stored pair of rates follows the discount rule
    pub fn is_consistent(&self, ground_rate: Decimal, mezzanine_rate: Decimal) -> bool {
        (self.mezzanine_rate(ground_rate) - mezzanine_rate).abs() <= RATE_TOLERANCE
    }
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            mezzanine_discount: dec!(0.20),
        }
    }
}
