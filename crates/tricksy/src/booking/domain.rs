use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::access::ActorId;
use crate::directory::{CleanerId, CustomerDraft, CustomerId, ServiceId};
use crate::payments::PaymentMethod;
use crate::validation::ValidationError;

/// Identifier wrapper for bookings.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct BookingId(pub u64);

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// When the crew is expected on site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub start_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_date: NaiveDate,
    pub end_time: NaiveTime,
}

/// One service on a booking and how many cleaners it needs. A service appears
/// at most once per booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub service_id: ServiceId,
    pub cleaner_count: u32,
}

/// A scheduled job for one customer.
///
/// The reference and creator are write-once: they are stamped at creation and
/// survive every later edit. Line items are owned by the booking; the
/// assigned-cleaner set is owned by the assignment workflow, which replaces
/// it wholesale rather than editing individual rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub customer_id: CustomerId,
    pub reference: String,
    #[serde(flatten)]
    pub schedule: Schedule,
    pub cleaning_instructions: String,
    pub special_request: String,
    pub entry_instruction: String,
    pub created_by: ActorId,
    pub created_at: DateTime<Utc>,
    pub line_items: Vec<LineItem>,
    pub assigned_cleaners: Vec<CleanerId>,
}

impl Booking {
    /// How many cleaners the booking needs in total, summed over line items.
    pub fn required_cleaners(&self) -> u32 {
        self.line_items.iter().map(|item| item.cleaner_count).sum()
    }

    /// Whether the assignment workflow has run for this booking.
    pub fn is_assigned(&self) -> bool {
        !self.assigned_cleaners.is_empty()
    }

    pub fn line_item(&self, service_id: ServiceId) -> Option<&LineItem> {
        self.line_items
            .iter()
            .find(|item| item.service_id == service_id)
    }
}

/// Points a new booking at a customer record: an existing one by id, or a
/// fresh draft persisted together with the booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerRef {
    Existing(CustomerId),
    New(CustomerDraft),
}

/// One service row on a booking draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemDraft {
    pub service_id: ServiceId,
    #[serde(default = "default_cleaner_count")]
    pub cleaner_count: u32,
}

fn default_cleaner_count() -> u32 {
    1
}

/// Input payload for creating a booking together with its line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDraft {
    pub customer: CustomerRef,
    #[serde(flatten)]
    pub schedule: Schedule,
    #[serde(default)]
    pub cleaning_instructions: String,
    #[serde(default)]
    pub special_request: String,
    #[serde(default)]
    pub entry_instruction: String,
    pub line_items: Vec<LineItemDraft>,
}

impl BookingDraft {
    /// Batch-validate the draft: at least one line item, positive cleaner
    /// counts, no service twice, and a valid customer draft when the booking
    /// brings its own customer.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();
        if let CustomerRef::New(draft) = &self.customer {
            if let Err(customer_errors) = draft.validate() {
                errors.absorb_prefixed("customer", customer_errors);
            }
        }
        if self.line_items.is_empty() {
            errors.push("line_items", "booking needs at least one service");
        }
        let mut seen = BTreeSet::new();
        for (index, item) in self.line_items.iter().enumerate() {
            let row = format!("line item {}", index + 1);
            if item.cleaner_count == 0 {
                errors.push(format!("{row}: cleaner_count"), "must be at least 1");
            }
            if !seen.insert(item.service_id) {
                errors.push(
                    format!("{row}: service_id"),
                    "service already on this booking",
                );
            }
        }
        errors.into_result()
    }
}

/// One tagged edit to a booking's line items. The whole batch is validated
/// against the booking's current rows before any of it is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum LineItemOp {
    Add {
        service_id: ServiceId,
        #[serde(default = "default_cleaner_count")]
        cleaner_count: u32,
    },
    Update {
        service_id: ServiceId,
        cleaner_count: u32,
    },
    Remove {
        service_id: ServiceId,
    },
}

impl LineItemOp {
    pub fn service_id(&self) -> ServiceId {
        match *self {
            LineItemOp::Add { service_id, .. }
            | LineItemOp::Update { service_id, .. }
            | LineItemOp::Remove { service_id } => service_id,
        }
    }
}

/// Input payload for editing an existing booking. Schedule and instruction
/// fields overwrite; the reference, creator, creation time, customer link,
/// and current cleaner assignment are untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingUpdate {
    #[serde(flatten)]
    pub schedule: Schedule,
    #[serde(default)]
    pub cleaning_instructions: String,
    #[serde(default)]
    pub special_request: String,
    #[serde(default)]
    pub entry_instruction: String,
    #[serde(default)]
    pub line_items: Vec<LineItemOp>,
}

impl BookingUpdate {
    /// Apply the tagged line-item batch to the booking's current rows,
    /// returning the replacement set. Every violation in the batch is
    /// reported before anything is applied: adds must introduce a new
    /// service, updates and removes must name a linked one, counts stay
    /// positive, and the booking cannot be left without line items.
    pub fn resolve_line_items(
        &self,
        current: &[LineItem],
    ) -> Result<Vec<LineItem>, ValidationError> {
        let mut errors = ValidationError::new();
        let linked: BTreeSet<ServiceId> =
            current.iter().map(|item| item.service_id).collect();
        let mut touched = BTreeSet::new();

        for (index, op) in self.line_items.iter().enumerate() {
            let row = format!("line item op {}", index + 1);
            if !touched.insert(op.service_id()) {
                errors.push(
                    format!("{row}: service_id"),
                    "service appears more than once in the batch",
                );
                continue;
            }
            match *op {
                LineItemOp::Add {
                    service_id,
                    cleaner_count,
                } => {
                    if linked.contains(&service_id) {
                        errors.push(
                            format!("{row}: service_id"),
                            "service already on this booking",
                        );
                    }
                    if cleaner_count == 0 {
                        errors.push(format!("{row}: cleaner_count"), "must be at least 1");
                    }
                }
                LineItemOp::Update {
                    service_id,
                    cleaner_count,
                } => {
                    if !linked.contains(&service_id) {
                        errors.push(format!("{row}: service_id"), "service not on this booking");
                    }
                    if cleaner_count == 0 {
                        errors.push(format!("{row}: cleaner_count"), "must be at least 1");
                    }
                }
                LineItemOp::Remove { service_id } => {
                    if !linked.contains(&service_id) {
                        errors.push(format!("{row}: service_id"), "service not on this booking");
                    }
                }
            }
        }
        errors.into_result()?;

        let mut resolved: Vec<LineItem> = current.to_vec();
        for op in &self.line_items {
            match *op {
                LineItemOp::Add {
                    service_id,
                    cleaner_count,
                } => resolved.push(LineItem {
                    service_id,
                    cleaner_count,
                }),
                LineItemOp::Update {
                    service_id,
                    cleaner_count,
                } => {
                    if let Some(item) = resolved
                        .iter_mut()
                        .find(|item| item.service_id == service_id)
                    {
                        item.cleaner_count = cleaner_count;
                    }
                }
                LineItemOp::Remove { service_id } => {
                    resolved.retain(|item| item.service_id != service_id);
                }
            }
        }

        if resolved.is_empty() {
            return Err(ValidationError::single(
                "line_items",
                "booking needs at least one service",
            ));
        }
        Ok(resolved)
    }
}

/// Input payload for the cleaner-assignment workflow: the full replacement
/// cleaner set plus how the job will be paid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRequest {
    pub cleaners: Vec<CleanerId>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
}
