//! Permission resolution exercised through the service facade: role rules,
//! grant-set membership, live grant replacement, and the configurable guard
//! points around the booking and assignment workflows.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use tricksy::access::{
    Actor, GuardPoints, Permission, PermissionResolver, PermissionSet, Role,
};
use tricksy::admin::{ActorRepository, NewSubadmin};
use tricksy::booking::{
    AssignmentRequest, BookingDraft, BookingError, BookingId, CustomerRef, LineItemDraft, Schedule,
};
use tricksy::context::AppContext;
use tricksy::directory::{CleanerDraft, CleanerId, CustomerDraft, DirectoryError, ServiceDraft};
use tricksy::payments::PaymentMethod;
use tricksy::store::MemoryStore;

fn harness() -> (Arc<MemoryStore>, Arc<AppContext<MemoryStore>>) {
    harness_with(GuardPoints::default())
}

fn harness_with(points: GuardPoints) -> (Arc<MemoryStore>, Arc<AppContext<MemoryStore>>) {
    let store = Arc::new(MemoryStore::new());
    let context = Arc::new(AppContext::new(store.clone(), points));
    (store, context)
}

fn root(context: &AppContext<MemoryStore>) -> Actor {
    context
        .admin()
        .ensure_superadmin("admin")
        .expect("superadmin bootstrapped")
}

fn subadmin_with(context: &AppContext<MemoryStore>, grants: PermissionSet) -> Actor {
    let admin = root(context);
    let actor = context
        .admin()
        .create_subadmin(
            &admin,
            NewSubadmin {
                username: "dispatch".to_string(),
            },
        )
        .expect("subadmin created");
    context
        .admin()
        .set_subadmin_permissions(&admin, grants)
        .expect("grants stored");
    actor
}

fn service_draft(name: &str, price: i64) -> ServiceDraft {
    ServiceDraft {
        name: name.to_string(),
        description: String::new(),
        duration_minutes: 90,
        material: String::new(),
        base_price: Decimal::from(price),
    }
}

fn customer_draft(name: &str) -> CustomerDraft {
    CustomerDraft {
        full_name: name.to_string(),
        region: "North".to_string(),
        address: "12 Hill Rd".to_string(),
        google_location: String::new(),
        building: String::new(),
        unit: String::new(),
        location_notes: String::new(),
    }
}

fn schedule() -> Schedule {
    Schedule {
        start_date: NaiveDate::from_ymd_opt(2026, 4, 2).expect("valid date"),
        start_time: NaiveTime::from_hms_opt(9, 0, 0).expect("valid time"),
        end_date: NaiveDate::from_ymd_opt(2026, 4, 2).expect("valid time"),
        end_time: NaiveTime::from_hms_opt(13, 0, 0).expect("valid time"),
    }
}

/// Seed one booking that needs two cleaners, plus exactly two cleaners.
fn seed_booking(context: &AppContext<MemoryStore>, admin: &Actor) -> (BookingId, Vec<CleanerId>) {
    let customer = context
        .directory()
        .create_customer(admin, customer_draft("Meera Pillai"))
        .expect("customer created");
    let service = context
        .directory()
        .create_service(admin, service_draft("Deep Clean", 100))
        .expect("service created");
    let cleaners = ["Asha", "Binod"]
        .into_iter()
        .map(|name| {
            context
                .directory()
                .create_cleaner(
                    admin,
                    CleanerDraft {
                        name: name.to_string(),
                        company: String::new(),
                        vehicle_code: String::new(),
                        available: true,
                    },
                )
                .expect("cleaner created")
                .id
        })
        .collect();
    let booking = context
        .bookings()
        .create(
            admin,
            BookingDraft {
                customer: CustomerRef::Existing(customer.id),
                schedule: schedule(),
                cleaning_instructions: String::new(),
                special_request: String::new(),
                entry_instruction: String::new(),
                line_items: vec![LineItemDraft {
                    service_id: service.id,
                    cleaner_count: 2,
                }],
            },
        )
        .expect("booking created");
    (booking.id, cleaners)
}

fn crew(cleaners: &[CleanerId]) -> AssignmentRequest {
    AssignmentRequest {
        cleaners: cleaners.to_vec(),
        payment_method: Some(PaymentMethod::Cash),
    }
}

#[test]
fn superadmin_passes_every_cataloged_code_and_unknown_ones() {
    let (store, context) = harness();
    let admin = root(&context);

    let resolver = PermissionResolver::new(store);
    for permission in Permission::ordered() {
        assert!(
            resolver.has_access(&admin, permission),
            "superadmin denied {permission}"
        );
    }
    assert!(
        resolver.has_access_code(&admin, "definitely_not_in_the_catalog"),
        "superadmin must pass codes outside the catalog"
    );
}

#[test]
fn actor_without_role_is_denied_everything() {
    let (store, context) = harness();
    root(&context);
    let ghost = store
        .insert_actor("ghost".to_string(), None)
        .expect("roleless actor inserted");

    let resolver = PermissionResolver::new(store);
    for permission in Permission::ordered() {
        assert!(
            !resolver.has_access(&ghost, permission),
            "roleless actor passed {permission}"
        );
    }

    assert!(matches!(
        context.directory().list_customers(&ghost),
        Err(DirectoryError::Denied(_))
    ));
    assert!(matches!(
        context
            .directory()
            .create_service(&ghost, service_draft("Deep Clean", 100)),
        Err(DirectoryError::Denied(_))
    ));
}

#[test]
fn subadmin_checks_are_plain_grant_membership() {
    let (_, context) = harness();
    let dispatch = subadmin_with(
        &context,
        PermissionSet::from([Permission::ViewServices, Permission::ManageCustomers]),
    );

    assert!(context.directory().list_services(&dispatch).is_ok());
    assert!(context
        .directory()
        .create_customer(&dispatch, customer_draft("Meera Pillai"))
        .is_ok());

    // `manage_customers` does not imply the read code.
    assert!(matches!(
        context.directory().list_customers(&dispatch),
        Err(DirectoryError::Denied(_))
    ));
    assert!(matches!(
        context
            .directory()
            .create_service(&dispatch, service_draft("Window Wash", 50)),
        Err(DirectoryError::Denied(_))
    ));
}

#[test]
fn fresh_subadmin_has_no_grants_until_the_set_is_stored() {
    let (_, context) = harness();
    let admin = root(&context);
    let dispatch = context
        .admin()
        .create_subadmin(
            &admin,
            NewSubadmin {
                username: "dispatch".to_string(),
            },
        )
        .expect("subadmin created");

    assert!(matches!(
        context.directory().list_services(&dispatch),
        Err(DirectoryError::Denied(_))
    ));
}

#[test]
fn grant_replacement_applies_to_the_next_check() {
    let (_, context) = harness();
    let admin = root(&context);
    let dispatch = subadmin_with(&context, PermissionSet::new());

    assert!(matches!(
        context.directory().list_services(&dispatch),
        Err(DirectoryError::Denied(_))
    ));

    context
        .admin()
        .set_subadmin_permissions(&admin, PermissionSet::from([Permission::ViewServices]))
        .expect("grants widened");
    assert!(context.directory().list_services(&dispatch).is_ok());

    context
        .admin()
        .set_subadmin_permissions(&admin, PermissionSet::new())
        .expect("grants revoked");
    assert!(matches!(
        context.directory().list_services(&dispatch),
        Err(DirectoryError::Denied(_))
    ));
}

#[test]
fn assignment_guard_defaults_to_manage_bookings() {
    let (_, context) = harness();
    let admin = root(&context);
    let (booking_id, cleaners) = seed_booking(&context, &admin);

    // Holding only the dedicated assignment code is not enough under the
    // default mapping.
    let assigner = subadmin_with(&context, PermissionSet::from([Permission::AssignCleaners]));
    assert!(matches!(
        context
            .bookings()
            .assign_cleaners(&assigner, booking_id, crew(&cleaners)),
        Err(BookingError::Denied(_))
    ));

    let (_, context) = harness();
    let admin = root(&context);
    let (booking_id, cleaners) = seed_booking(&context, &admin);
    let manager = subadmin_with(&context, PermissionSet::from([Permission::ManageBookings]));
    let outcome = context
        .bookings()
        .assign_cleaners(&manager, booking_id, crew(&cleaners))
        .expect("manage_bookings covers assignment by default");
    assert_eq!(outcome.booking.assigned_cleaners, cleaners);
}

#[test]
fn assignment_guard_can_be_remapped_to_assign_cleaners() {
    let points = GuardPoints {
        booking_mutation: Permission::ManageBookings,
        cleaner_assignment: Permission::AssignCleaners,
    };

    let (_, context) = harness_with(points);
    let admin = root(&context);
    let (booking_id, cleaners) = seed_booking(&context, &admin);
    let assigner = subadmin_with(&context, PermissionSet::from([Permission::AssignCleaners]));
    let outcome = context
        .bookings()
        .assign_cleaners(&assigner, booking_id, crew(&cleaners))
        .expect("assign_cleaners covers assignment once remapped");
    assert_eq!(outcome.booking.assigned_cleaners, cleaners);

    // Under the remapped point, booking managers lose the assignment
    // workflow but keep booking mutations.
    let (_, context) = harness_with(points);
    let admin = root(&context);
    let (booking_id, cleaners) = seed_booking(&context, &admin);
    let manager = subadmin_with(&context, PermissionSet::from([Permission::ManageBookings]));
    assert!(matches!(
        context
            .bookings()
            .assign_cleaners(&manager, booking_id, crew(&cleaners)),
        Err(BookingError::Denied(_))
    ));
    assert!(context
        .bookings()
        .delete(&manager, booking_id)
        .is_ok());
}

#[test]
fn denied_checks_never_reach_storage() {
    let (_, context) = harness();
    let admin = root(&context);
    let dispatch = subadmin_with(&context, PermissionSet::new());

    assert!(matches!(
        context
            .directory()
            .create_customer(&dispatch, customer_draft("Meera Pillai")),
        Err(DirectoryError::Denied(_))
    ));
    let customers = context
        .directory()
        .list_customers(&admin)
        .expect("superadmin reads customers");
    assert!(customers.is_empty(), "denied create must leave no record");
}

#[test]
fn grants_written_through_the_store_are_honored() {
    // The admin service is a thin wrapper over the grant row; writing the
    // row directly must be indistinguishable to the resolver.
    let (store, context) = harness();
    let admin = root(&context);
    let dispatch = context
        .admin()
        .create_subadmin(
            &admin,
            NewSubadmin {
                username: "dispatch".to_string(),
            },
        )
        .expect("subadmin created");

    use tricksy::access::RolePermissionStore;
    store
        .replace_permissions(Role::Subadmin, PermissionSet::from([Permission::ViewServices]))
        .expect("grant row replaced");

    assert!(context.directory().list_services(&dispatch).is_ok());
}
