use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tricksy::access::{Actor, Permission};
use tricksy::config::AccessConfig;
use tricksy::context::AppContext;
use tricksy::error::AppError;
use tricksy::store::MemoryStore;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Build the in-memory backend, wire the service context, and seed the
/// superadmin account. Both the server and the CLI demos start here.
pub(crate) fn build_context(
    access: &AccessConfig,
) -> Result<(Arc<AppContext<MemoryStore>>, Actor), AppError> {
    let store = Arc::new(MemoryStore::new());
    let context = Arc::new(AppContext::new(store, access.guard_points()));
    let superadmin = context
        .admin()
        .ensure_superadmin(&access.superadmin_username)?;
    Ok((context, superadmin))
}

pub(crate) fn parse_guard(raw: &str) -> Result<Permission, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "manage_bookings" => Ok(Permission::ManageBookings),
        "assign_cleaners" => Ok(Permission::AssignCleaners),
        other => Err(format!(
            "unknown assignment guard '{other}' (expected manage_bookings or assign_cleaners)"
        )),
    }
}
