//! Read-only aggregation for the operations dashboard.

pub mod router;
pub mod service;

pub use router::dashboard_router;
pub use service::{DashboardError, DashboardService, DashboardSummary};
