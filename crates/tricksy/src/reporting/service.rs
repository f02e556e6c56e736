use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::access::{AccessDenied, AccessGuard, Actor, Permission, RolePermissionStore};
use crate::booking::BookingRepository;
use crate::directory::{CleanerRepository, CustomerRepository, ServiceRepository};
use crate::payments::PaymentRepository;
use crate::repository::RepositoryError;

/// Error raised by reporting operations.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error(transparent)]
    Denied(#[from] AccessDenied),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// The landing-page numbers: entity counts plus recorded revenue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub customers: u64,
    pub cleaners: u64,
    pub available_cleaners: u64,
    pub services: u64,
    pub bookings: u64,
    pub assigned_bookings: u64,
    pub payments: u64,
    pub net_revenue: Decimal,
}

/// Read-only aggregation over every collection, behind `dashboard_access`.
pub struct DashboardService<S> {
    store: Arc<S>,
    guard: AccessGuard<S>,
}

impl<S> Clone for DashboardService<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            guard: self.guard.clone(),
        }
    }
}

impl<S> DashboardService<S>
where
    S: CustomerRepository
        + CleanerRepository
        + ServiceRepository
        + BookingRepository
        + PaymentRepository
        + RolePermissionStore
        + 'static,
{
    pub fn new(store: Arc<S>, guard: AccessGuard<S>) -> Self {
        Self { store, guard }
    }

    /// Counts are taken in one pass per collection; revenue is the sum of the
    /// stored net amounts, so discounts are already accounted for.
    pub fn summary(&self, actor: &Actor) -> Result<DashboardSummary, DashboardError> {
        self.guard.protect(actor, Permission::DashboardAccess, || {
            let cleaners = self.store.list_cleaners()?;
            let bookings = self.store.list_bookings()?;
            let payments = self.store.list_payments()?;
            Ok(DashboardSummary {
                customers: self.store.list_customers()?.len() as u64,
                available_cleaners: cleaners
                    .iter()
                    .filter(|cleaner| cleaner.available)
                    .count() as u64,
                cleaners: cleaners.len() as u64,
                services: self.store.list_services()?.len() as u64,
                assigned_bookings: bookings
                    .iter()
                    .filter(|booking| booking.is_assigned())
                    .count() as u64,
                bookings: bookings.len() as u64,
                payments: payments.len() as u64,
                net_revenue: payments.iter().map(|payment| payment.net_amount).sum(),
            })
        })
    }
}
