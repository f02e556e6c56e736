use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::booking::BookingId;
use crate::validation::ValidationError;

/// Identifier wrapper for payment records.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct PaymentId(pub u64);

impl fmt::Display for PaymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Accepted settlement methods. Payments are recorded locally, never settled
/// against an external gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    Upi,
}

impl PaymentMethod {
    pub const fn label(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Card => "Card",
            PaymentMethod::Upi => "UPI",
        }
    }
}

/// Settlement progress of a recorded payment. New records start pending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Completed => "Completed",
            PaymentStatus::Failed => "Failed",
        }
    }
}

/// A recorded payment against a booking. Rows are append-only: once written
/// they are never edited, and `net_amount` always reflects the recomputation
/// done at write time rather than anything a caller supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub booking_id: BookingId,
    pub method: PaymentMethod,
    pub amount: Decimal,
    pub discount: Decimal,
    pub net_amount: Decimal,
    pub paid_at: DateTime<Utc>,
    pub status: PaymentStatus,
}

/// Input payload for recording a payment. Deliberately has no net-amount
/// field: the net is derived at persistence time and cannot be supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDraft {
    pub method: PaymentMethod,
    pub amount: Decimal,
    #[serde(default)]
    pub discount: Decimal,
}

impl PaymentDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();
        if self.amount < Decimal::ZERO {
            errors.push("amount", "must not be negative");
        }
        if self.discount < Decimal::ZERO {
            errors.push("discount", "must not be negative");
        }
        errors.into_result()
    }

    /// Amount after discount, floored at zero. The store calls this when it
    /// materializes the row, so an oversized discount yields a zero payment
    /// rather than a negative one.
    pub fn net_amount(&self) -> Decimal {
        (self.amount - self.discount).max(Decimal::ZERO)
    }
}
