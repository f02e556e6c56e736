use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed catalog of grantable permission codes.
///
/// Grant sets reference these codes; a code outside the catalog can never be
/// granted to a subadmin, so unknown codes only matter for superadmins (who
/// pass every check regardless).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ManageSubadmins,
    ManageServices,
    ViewServices,
    ViewBookings,
    ManageBookings,
    AssignCleaners,
    ManagePayments,
    ViewCustomers,
    ManageCustomers,
    DashboardAccess,
}

impl Permission {
    /// Catalog in its canonical display order.
    pub const fn ordered() -> [Self; 10] {
        [
            Permission::ManageSubadmins,
            Permission::ManageServices,
            Permission::ViewServices,
            Permission::ViewBookings,
            Permission::ManageBookings,
            Permission::AssignCleaners,
            Permission::ManagePayments,
            Permission::ViewCustomers,
            Permission::ManageCustomers,
            Permission::DashboardAccess,
        ]
    }

    /// Stable machine-readable code stored in grant sets.
    pub const fn code(self) -> &'static str {
        match self {
            Permission::ManageSubadmins => "manage_subadmins",
            Permission::ManageServices => "manage_services",
            Permission::ViewServices => "view_services",
            Permission::ViewBookings => "view_bookings",
            Permission::ManageBookings => "manage_bookings",
            Permission::AssignCleaners => "assign_cleaners",
            Permission::ManagePayments => "manage_payments",
            Permission::ViewCustomers => "view_customers",
            Permission::ManageCustomers => "manage_customers",
            Permission::DashboardAccess => "dashboard_access",
        }
    }

    /// Human-readable label for management screens. Some labels predate the
    /// codes and read wider than the code suggests; they are kept verbatim
    /// because operators know the screens by these names.
    pub const fn label(self) -> &'static str {
        match self {
            Permission::ManageSubadmins => "Manage Sub-admins",
            Permission::ManageServices => "Manage Services",
            Permission::ViewServices => "View Services",
            Permission::ViewBookings => "View Bookings",
            Permission::ManageBookings => "View/Add/Edit Bookings",
            Permission::AssignCleaners => "Assign Cleaners",
            Permission::ManagePayments => "View/Add Payments",
            Permission::ViewCustomers => "View Customer & Booking Details",
            Permission::ManageCustomers => "Manage Customers",
            Permission::DashboardAccess => "Dashboard Access",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|permission| permission.code() == code)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Grant set persisted per role. Ordered so serialized listings are stable.
pub type PermissionSet = BTreeSet<Permission>;

/// Code/label pair exposed to permission-management clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub code: &'static str,
    pub label: &'static str,
}

pub fn catalog() -> Vec<CatalogEntry> {
    Permission::ordered()
        .into_iter()
        .map(|permission| CatalogEntry {
            code: permission.code(),
            label: permission.label(),
        })
        .collect()
}
