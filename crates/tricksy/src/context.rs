//! Application assembly: every service wired over one storage backend and one
//! access-guard configuration, plus the combined `/api/v1` router.

use std::sync::Arc;

use axum::Router;

use crate::access::{AccessGuard, GuardPoints};
use crate::admin::{admin_router, AdminService};
use crate::booking::{booking_router, BookingService};
use crate::directory::{directory_router, DirectoryService};
use crate::payments::{payments_router, PaymentsLedger};
use crate::reporting::{dashboard_router, DashboardService};
use crate::store::Stores;

/// One assembled application. Constructed once at startup (or per test) and
/// shared behind an `Arc` by every router.
pub struct AppContext<S> {
    store: Arc<S>,
    directory: DirectoryService<S>,
    bookings: BookingService<S>,
    payments: PaymentsLedger<S>,
    admin: AdminService<S>,
    dashboard: DashboardService<S>,
}

impl<S: Stores> AppContext<S> {
    pub fn new(store: Arc<S>, points: GuardPoints) -> Self {
        let guard = AccessGuard::new(store.clone(), points);
        Self {
            directory: DirectoryService::new(store.clone(), guard.clone()),
            bookings: BookingService::new(store.clone(), guard.clone()),
            payments: PaymentsLedger::new(store.clone(), guard.clone()),
            admin: AdminService::new(store.clone(), guard.clone()),
            dashboard: DashboardService::new(store.clone(), guard),
            store,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn directory(&self) -> &DirectoryService<S> {
        &self.directory
    }

    pub fn bookings(&self) -> &BookingService<S> {
        &self.bookings
    }

    pub fn payments(&self) -> &PaymentsLedger<S> {
        &self.payments
    }

    pub fn admin(&self) -> &AdminService<S> {
        &self.admin
    }

    pub fn dashboard(&self) -> &DashboardService<S> {
        &self.dashboard
    }
}

/// The full `/api/v1` surface over one context. Health, readiness, and
/// metrics endpoints are the serving binary's concern and are layered on top
/// there.
pub fn api_router<S: Stores>(context: Arc<AppContext<S>>) -> Router {
    Router::new()
        .merge(directory_router(context.clone()))
        .merge(booking_router(context.clone()))
        .merge(payments_router(context.clone()))
        .merge(admin_router(context.clone()))
        .merge(dashboard_router(context))
}
