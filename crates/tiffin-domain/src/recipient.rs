//! Recipient kinds that receive a share of an order payment.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Owner kind of a recipient account.
///
/// Wire format: `restaurant`, `delivery_boy`, `admin`. The `delivery_boy` name is kept for
/// compatibility with existing payout reference ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipientType {
    Restaurant,
    #[serde(rename = "delivery_boy")]
    DeliveryRider,
    #[serde(rename = "admin")]
    Platform,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown recipient type: {0}")]
pub struct UnknownRecipientType(pub String);

impl RecipientType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Restaurant => "restaurant",
            Self::DeliveryRider => "delivery_boy",
            Self::Platform => "admin",
        }
    }
}

impl fmt::Display for RecipientType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecipientType {
    type Err = UnknownRecipientType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "restaurant" => Ok(Self::Restaurant),
            "delivery_boy" => Ok(Self::DeliveryRider),
            "admin" => Ok(Self::Platform),
            other => Err(UnknownRecipientType(other.to_owned())),
        }
    }
}
