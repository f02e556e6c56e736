//! Operations core for a cleaning-service business.
//!
//! The crate is organized around four surfaces: `access` (role and permission
//! checks applied before every privileged operation), `directory` (customers,
//! cleaners, and the service catalog), `booking` (scheduling, line items, and
//! cleaner assignment), and `payments` (the append-only payment ledger).
//! `admin` manages subadmin accounts and the permission grant set, while
//! `reporting` aggregates the dashboard summary. Persistence sits behind the
//! repository traits in each module; `store` provides the in-memory
//! implementation used by the API service and the test suites.

pub mod access;
pub mod admin;
pub mod booking;
pub mod config;
pub mod context;
pub mod directory;
pub mod error;
pub(crate) mod http;
pub mod payments;
pub mod reporting;
pub mod repository;
pub mod store;
pub mod telemetry;
pub mod validation;
