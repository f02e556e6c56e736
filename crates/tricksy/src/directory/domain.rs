use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::validation::{is_blank, ValidationError};

/// Identifier wrapper for customer records.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct CustomerId(pub u64);

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier wrapper for cleaner records.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct CleanerId(pub u64);

impl fmt::Display for CleanerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier wrapper for catalog services.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ServiceId(pub u64);

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A client household plus the location detail crews need on site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub full_name: String,
    pub region: String,
    pub address: String,
    pub google_location: String,
    pub building: String,
    pub unit: String,
    pub location_notes: String,
}

/// Input payload for creating or overwriting a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDraft {
    pub full_name: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub google_location: String,
    #[serde(default)]
    pub building: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub location_notes: String,
}

impl CustomerDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();
        if is_blank(&self.full_name) {
            errors.push("full_name", "must not be blank");
        }
        if is_blank(&self.address) {
            errors.push("address", "must not be blank");
        }
        errors.into_result()
    }
}

/// A crew member available for assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cleaner {
    pub id: CleanerId,
    pub name: String,
    pub company: String,
    pub vehicle_code: String,
    pub available: bool,
}

/// Input payload for creating or overwriting a cleaner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanerDraft {
    pub name: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub vehicle_code: String,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

impl CleanerDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();
        if is_blank(&self.name) {
            errors.push("name", "must not be blank");
        }
        errors.into_result()
    }
}

/// A bookable catalog entry with its fixed price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub name: String,
    pub description: String,
    pub duration_minutes: u32,
    pub material: String,
    pub base_price: Decimal,
}

/// Input payload for creating or overwriting a catalog service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub duration_minutes: u32,
    #[serde(default)]
    pub material: String,
    pub base_price: Decimal,
}

impl ServiceDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();
        if is_blank(&self.name) {
            errors.push("name", "must not be blank");
        }
        if self.duration_minutes == 0 {
            errors.push("duration_minutes", "must be at least 1");
        }
        if self.base_price < Decimal::ZERO {
            errors.push("base_price", "must not be negative");
        }
        errors.into_result()
    }
}
