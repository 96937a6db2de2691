//! Fixed three-way commission split of an order payment.

use serde::{Deserialize, Serialize};

use crate::money::{Money, MoneyError};

/// Restaurant share of the gross order amount, in percent.
pub const RESTAURANT_SHARE_PERCENT: i64 = 80;

/// Delivery rider share of the gross order amount, in percent.
pub const DELIVERY_SHARE_PERCENT: i64 = 15;

/// Platform share, in percent. Informational: the platform amount is always the remainder.
pub const PLATFORM_SHARE_PERCENT: i64 = 5;

/// Result of splitting a gross order amount.
///
/// The three parts always sum to the gross amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionSplit {
    pub restaurant_amount: Money,
    pub delivery_amount: Money,
    pub platform_amount: Money,
}

impl CommissionSplit {
    pub fn total(&self) -> Money {
        self.restaurant_amount + self.delivery_amount + self.platform_amount
    }
}

/// Split `total` 80 / 15 / 5.
///
/// Restaurant and rider shares are rounded half-up; the platform takes the remainder so no
/// unit is lost to rounding.
pub fn split(total: Money) -> Result<CommissionSplit, MoneyError> {
    if total.is_negative() {
        return Err(MoneyError::Negative);
    }
    let restaurant_amount = total.percent_round_half_up(RESTAURANT_SHARE_PERCENT);
    let delivery_amount = total.percent_round_half_up(DELIVERY_SHARE_PERCENT);
    Ok(CommissionSplit {
        restaurant_amount,
        delivery_amount,
        platform_amount: total - restaurant_amount - delivery_amount,
    })
}
