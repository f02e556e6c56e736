//! Process-local storage with serializable transactions.
//!
//! Every repository trait is implemented over one `Mutex<State>`, so each
//! call observes and mutates a consistent snapshot. Compound effects (insert
//! a booking with its customer, commit an assignment with its payment,
//! cascade a delete) run their checks and writes under a single lock
//! acquisition, which is what makes them transactional.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use crate::access::{Actor, ActorId, PermissionSet, Role, RolePermissionStore};
use crate::admin::ActorRepository;
use crate::booking::{
    Booking, BookingChanges, BookingId, BookingRepository, CustomerSource, LineItem, NewBooking,
};
use crate::directory::{
    Cleaner, CleanerDraft, CleanerId, CleanerRepository, Customer, CustomerDraft, CustomerId,
    CustomerRepository, Service, ServiceDraft, ServiceId, ServiceRepository,
};
use crate::payments::{Payment, PaymentDraft, PaymentId, PaymentRepository, PaymentStatus};
use crate::repository::{Page, PageRequest, RepositoryError};

#[derive(Debug, Default)]
struct Sequences {
    actor: u64,
    customer: u64,
    cleaner: u64,
    service: u64,
    booking: u64,
    payment: u64,
}

fn next(sequence: &mut u64) -> u64 {
    *sequence += 1;
    *sequence
}

#[derive(Debug, Default)]
struct State {
    actors: BTreeMap<u64, Actor>,
    grants: HashMap<Role, PermissionSet>,
    customers: BTreeMap<u64, Customer>,
    cleaners: BTreeMap<u64, Cleaner>,
    services: BTreeMap<u64, Service>,
    bookings: BTreeMap<u64, Booking>,
    payments: BTreeMap<u64, Payment>,
    sequences: Sequences,
}

impl State {
    /// Data-level line-item constraints: every referenced service exists and
    /// no service appears twice on the same booking.
    fn check_line_items(&self, line_items: &[LineItem]) -> Result<(), RepositoryError> {
        let mut seen = BTreeSet::new();
        for item in line_items {
            if !self.services.contains_key(&item.service_id.0) {
                return Err(RepositoryError::NotFound { entity: "service" });
            }
            if !seen.insert(item.service_id) {
                return Err(RepositoryError::Conflict {
                    entity: "line item",
                    field: "service",
                });
            }
        }
        Ok(())
    }

    fn materialize_payment(&mut self, booking_id: BookingId, draft: PaymentDraft) -> Payment {
        let id = next(&mut self.sequences.payment);
        let payment = Payment {
            id: PaymentId(id),
            booking_id,
            method: draft.method,
            amount: draft.amount,
            discount: draft.discount,
            net_amount: draft.net_amount(),
            paid_at: Utc::now(),
            status: PaymentStatus::default(),
        };
        self.payments.insert(id, payment.clone());
        payment
    }

    fn remove_booking_rows(&mut self, id: BookingId) {
        self.bookings.remove(&id.0);
        self.payments.retain(|_, payment| payment.booking_id != id);
    }
}

/// In-memory backend for every repository trait.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, State>, RepositoryError> {
        self.state
            .lock()
            .map_err(|_| RepositoryError::Unavailable("store mutex poisoned".to_string()))
    }
}

impl ActorRepository for MemoryStore {
    fn insert_actor(&self, username: String, role: Option<Role>) -> Result<Actor, RepositoryError> {
        let mut state = self.state()?;
        if state
            .actors
            .values()
            .any(|actor| actor.username == username)
        {
            return Err(RepositoryError::Conflict {
                entity: "actor",
                field: "username",
            });
        }
        let id = next(&mut state.sequences.actor);
        let actor = Actor {
            id: ActorId(id),
            username,
            role,
        };
        state.actors.insert(id, actor.clone());
        Ok(actor)
    }

    fn fetch_actor(&self, id: ActorId) -> Result<Option<Actor>, RepositoryError> {
        Ok(self.state()?.actors.get(&id.0).cloned())
    }

    fn actor_by_username(&self, username: &str) -> Result<Option<Actor>, RepositoryError> {
        Ok(self
            .state()?
            .actors
            .values()
            .find(|actor| actor.username == username)
            .cloned())
    }

    fn search_actors(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<Actor>, RepositoryError> {
        let state = self.state()?;
        let needle = search.map(str::to_lowercase);
        let matches: Vec<Actor> = state
            .actors
            .values()
            .filter(|actor| match &needle {
                Some(needle) => actor.username.to_lowercase().contains(needle),
                None => true,
            })
            .cloned()
            .collect();
        Ok(Page::slice(matches, page))
    }
}

impl RolePermissionStore for MemoryStore {
    fn permissions_for(&self, role: Role) -> Result<Option<PermissionSet>, RepositoryError> {
        Ok(self.state()?.grants.get(&role).cloned())
    }

    fn replace_permissions(
        &self,
        role: Role,
        permissions: PermissionSet,
    ) -> Result<(), RepositoryError> {
        self.state()?.grants.insert(role, permissions);
        Ok(())
    }
}

impl CustomerRepository for MemoryStore {
    fn insert_customer(&self, draft: CustomerDraft) -> Result<Customer, RepositoryError> {
        let mut state = self.state()?;
        let id = next(&mut state.sequences.customer);
        let customer = materialize_customer(CustomerId(id), draft);
        state.customers.insert(id, customer.clone());
        Ok(customer)
    }

    fn update_customer(
        &self,
        id: CustomerId,
        draft: CustomerDraft,
    ) -> Result<Customer, RepositoryError> {
        let mut state = self.state()?;
        if !state.customers.contains_key(&id.0) {
            return Err(RepositoryError::NotFound { entity: "customer" });
        }
        let customer = materialize_customer(id, draft);
        state.customers.insert(id.0, customer.clone());
        Ok(customer)
    }

    fn delete_customer(&self, id: CustomerId) -> Result<(), RepositoryError> {
        let mut state = self.state()?;
        if state.customers.remove(&id.0).is_none() {
            return Err(RepositoryError::NotFound { entity: "customer" });
        }
        let owned: Vec<BookingId> = state
            .bookings
            .values()
            .filter(|booking| booking.customer_id == id)
            .map(|booking| booking.id)
            .collect();
        for booking in owned {
            state.remove_booking_rows(booking);
        }
        Ok(())
    }

    fn fetch_customer(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        Ok(self.state()?.customers.get(&id.0).cloned())
    }

    fn list_customers(&self) -> Result<Vec<Customer>, RepositoryError> {
        Ok(self.state()?.customers.values().cloned().collect())
    }
}

impl CleanerRepository for MemoryStore {
    fn insert_cleaner(&self, draft: CleanerDraft) -> Result<Cleaner, RepositoryError> {
        let mut state = self.state()?;
        let id = next(&mut state.sequences.cleaner);
        let cleaner = materialize_cleaner(CleanerId(id), draft);
        state.cleaners.insert(id, cleaner.clone());
        Ok(cleaner)
    }

    fn insert_cleaners(&self, drafts: Vec<CleanerDraft>) -> Result<Vec<Cleaner>, RepositoryError> {
        let mut state = self.state()?;
        let mut inserted = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let id = next(&mut state.sequences.cleaner);
            let cleaner = materialize_cleaner(CleanerId(id), draft);
            state.cleaners.insert(id, cleaner.clone());
            inserted.push(cleaner);
        }
        Ok(inserted)
    }

    fn update_cleaner(
        &self,
        id: CleanerId,
        draft: CleanerDraft,
    ) -> Result<Cleaner, RepositoryError> {
        let mut state = self.state()?;
        if !state.cleaners.contains_key(&id.0) {
            return Err(RepositoryError::NotFound { entity: "cleaner" });
        }
        let cleaner = materialize_cleaner(id, draft);
        state.cleaners.insert(id.0, cleaner.clone());
        Ok(cleaner)
    }

    fn delete_cleaner(&self, id: CleanerId) -> Result<(), RepositoryError> {
        let mut state = self.state()?;
        if state.cleaners.remove(&id.0).is_none() {
            return Err(RepositoryError::NotFound { entity: "cleaner" });
        }
        for booking in state.bookings.values_mut() {
            booking.assigned_cleaners.retain(|cleaner| *cleaner != id);
        }
        Ok(())
    }

    fn fetch_cleaner(&self, id: CleanerId) -> Result<Option<Cleaner>, RepositoryError> {
        Ok(self.state()?.cleaners.get(&id.0).cloned())
    }

    fn list_cleaners(&self) -> Result<Vec<Cleaner>, RepositoryError> {
        Ok(self.state()?.cleaners.values().cloned().collect())
    }
}

impl ServiceRepository for MemoryStore {
    fn insert_service(&self, draft: ServiceDraft) -> Result<Service, RepositoryError> {
        let mut state = self.state()?;
        let id = next(&mut state.sequences.service);
        let service = materialize_service(ServiceId(id), draft);
        state.services.insert(id, service.clone());
        Ok(service)
    }

    fn update_service(
        &self,
        id: ServiceId,
        draft: ServiceDraft,
    ) -> Result<Service, RepositoryError> {
        let mut state = self.state()?;
        if !state.services.contains_key(&id.0) {
            return Err(RepositoryError::NotFound { entity: "service" });
        }
        let service = materialize_service(id, draft);
        state.services.insert(id.0, service.clone());
        Ok(service)
    }

    fn delete_service(&self, id: ServiceId) -> Result<(), RepositoryError> {
        let mut state = self.state()?;
        if !state.services.contains_key(&id.0) {
            return Err(RepositoryError::NotFound { entity: "service" });
        }
        let referenced = state
            .bookings
            .values()
            .any(|booking| booking.line_item(id).is_some());
        if referenced {
            return Err(RepositoryError::ReferentialConflict {
                entity: "service",
                referenced_by: "bookings",
            });
        }
        state.services.remove(&id.0);
        Ok(())
    }

    fn fetch_service(&self, id: ServiceId) -> Result<Option<Service>, RepositoryError> {
        Ok(self.state()?.services.get(&id.0).cloned())
    }

    fn list_services(&self) -> Result<Vec<Service>, RepositoryError> {
        Ok(self.state()?.services.values().cloned().collect())
    }
}

impl BookingRepository for MemoryStore {
    fn insert_booking(&self, new: NewBooking) -> Result<Booking, RepositoryError> {
        let mut state = self.state()?;
        if state
            .bookings
            .values()
            .any(|booking| booking.reference == new.reference)
        {
            return Err(RepositoryError::Conflict {
                entity: "booking",
                field: "reference",
            });
        }
        state.check_line_items(&new.line_items)?;
        if let CustomerSource::Existing(id) = new.customer {
            if !state.customers.contains_key(&id.0) {
                return Err(RepositoryError::NotFound { entity: "customer" });
            }
        }

        // Checks done, writes from here on.
        let customer_id = match new.customer {
            CustomerSource::Existing(id) => id,
            CustomerSource::New(draft) => {
                let id = next(&mut state.sequences.customer);
                let customer = materialize_customer(CustomerId(id), draft);
                state.customers.insert(id, customer);
                CustomerId(id)
            }
        };
        let id = next(&mut state.sequences.booking);
        let booking = Booking {
            id: BookingId(id),
            customer_id,
            reference: new.reference,
            schedule: new.schedule,
            cleaning_instructions: new.cleaning_instructions,
            special_request: new.special_request,
            entry_instruction: new.entry_instruction,
            created_by: new.created_by,
            created_at: Utc::now(),
            line_items: new.line_items,
            assigned_cleaners: Vec::new(),
        };
        state.bookings.insert(id, booking.clone());
        Ok(booking)
    }

    fn update_booking(
        &self,
        id: BookingId,
        changes: BookingChanges,
    ) -> Result<Booking, RepositoryError> {
        let mut state = self.state()?;
        if !state.bookings.contains_key(&id.0) {
            return Err(RepositoryError::NotFound { entity: "booking" });
        }
        state.check_line_items(&changes.line_items)?;
        let booking = state
            .bookings
            .get_mut(&id.0)
            .ok_or(RepositoryError::NotFound { entity: "booking" })?;
        booking.schedule = changes.schedule;
        booking.cleaning_instructions = changes.cleaning_instructions;
        booking.special_request = changes.special_request;
        booking.entry_instruction = changes.entry_instruction;
        booking.line_items = changes.line_items;
        Ok(booking.clone())
    }

    fn delete_booking(&self, id: BookingId) -> Result<(), RepositoryError> {
        let mut state = self.state()?;
        if !state.bookings.contains_key(&id.0) {
            return Err(RepositoryError::NotFound { entity: "booking" });
        }
        state.remove_booking_rows(id);
        Ok(())
    }

    fn fetch_booking(&self, id: BookingId) -> Result<Option<Booking>, RepositoryError> {
        Ok(self.state()?.bookings.get(&id.0).cloned())
    }

    fn list_bookings(&self) -> Result<Vec<Booking>, RepositoryError> {
        Ok(self.state()?.bookings.values().rev().cloned().collect())
    }

    fn commit_assignment(
        &self,
        id: BookingId,
        cleaners: Vec<CleanerId>,
        payment: PaymentDraft,
    ) -> Result<(Booking, Payment), RepositoryError> {
        let mut state = self.state()?;
        let required = state
            .bookings
            .get(&id.0)
            .ok_or(RepositoryError::NotFound { entity: "booking" })?
            .required_cleaners();
        let mut seen = BTreeSet::new();
        for cleaner in &cleaners {
            if !state.cleaners.contains_key(&cleaner.0) {
                return Err(RepositoryError::NotFound { entity: "cleaner" });
            }
            if !seen.insert(*cleaner) {
                return Err(RepositoryError::Conflict {
                    entity: "assignment",
                    field: "cleaner",
                });
            }
        }
        // The caller validated the count against the booking it read, but the
        // requirement may have moved since. Re-checking under the lock turns
        // that race into a retryable serialization failure.
        if cleaners.len() != required as usize {
            return Err(RepositoryError::Serialization);
        }

        let updated = {
            let booking = state
                .bookings
                .get_mut(&id.0)
                .ok_or(RepositoryError::NotFound { entity: "booking" })?;
            booking.assigned_cleaners = cleaners;
            booking.clone()
        };
        let payment = state.materialize_payment(id, payment);
        Ok((updated, payment))
    }
}

impl PaymentRepository for MemoryStore {
    fn append_payment(
        &self,
        booking_id: BookingId,
        draft: PaymentDraft,
    ) -> Result<Payment, RepositoryError> {
        let mut state = self.state()?;
        if !state.bookings.contains_key(&booking_id.0) {
            return Err(RepositoryError::NotFound { entity: "booking" });
        }
        Ok(state.materialize_payment(booking_id, draft))
    }

    fn payments_for_booking(&self, booking_id: BookingId) -> Result<Vec<Payment>, RepositoryError> {
        let state = self.state()?;
        if !state.bookings.contains_key(&booking_id.0) {
            return Err(RepositoryError::NotFound { entity: "booking" });
        }
        Ok(state
            .payments
            .values()
            .filter(|payment| payment.booking_id == booking_id)
            .cloned()
            .collect())
    }

    fn list_payments(&self) -> Result<Vec<Payment>, RepositoryError> {
        Ok(self.state()?.payments.values().cloned().collect())
    }
}

fn materialize_customer(id: CustomerId, draft: CustomerDraft) -> Customer {
    Customer {
        id,
        full_name: draft.full_name,
        region: draft.region,
        address: draft.address,
        google_location: draft.google_location,
        building: draft.building,
        unit: draft.unit,
        location_notes: draft.location_notes,
    }
}

fn materialize_cleaner(id: CleanerId, draft: CleanerDraft) -> Cleaner {
    Cleaner {
        id,
        name: draft.name,
        company: draft.company,
        vehicle_code: draft.vehicle_code,
        available: draft.available,
    }
}

fn materialize_service(id: ServiceId, draft: ServiceDraft) -> Service {
    Service {
        id,
        name: draft.name,
        description: draft.description,
        duration_minutes: draft.duration_minutes,
        material: draft.material,
        base_price: draft.base_price,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::Schedule;
    use chrono::{NaiveDate, NaiveTime};
    use rust_decimal::Decimal;

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

    fn cleaner_draft(name: &str) -> CleanerDraft {
        CleanerDraft {
            name: name.to_string(),
            company: "Sparkle Co".to_string(),
            vehicle_code: "V-1".to_string(),
            available: true,
        }
    }

    fn service_draft(name: &str, price: i64) -> ServiceDraft {
        ServiceDraft {
            name: name.to_string(),
            description: String::new(),
            duration_minutes: 60,
            material: String::new(),
            base_price: Decimal::from(price),
        }
    }

    fn schedule() -> Schedule {
        Schedule {
            start_date: NaiveDate::from_ymd_opt(2026, 4, 2).expect("valid date"),
            start_time: NaiveTime::from_hms_opt(10, 0, 0).expect("valid time"),
            end_date: NaiveDate::from_ymd_opt(2026, 4, 2).expect("valid date"),
            end_time: NaiveTime::from_hms_opt(12, 0, 0).expect("valid time"),
        }
    }

    fn new_booking(
        customer: CustomerSource,
        reference: &str,
        line_items: Vec<LineItem>,
    ) -> NewBooking {
        NewBooking {
            customer,
            reference: reference.to_string(),
            schedule: schedule(),
            cleaning_instructions: String::new(),
            special_request: String::new(),
            entry_instruction: String::new(),
            created_by: ActorId(1),
            line_items,
        }
    }

    fn seeded_booking(store: &MemoryStore, cleaner_count: u32) -> (CustomerId, ServiceId, Booking) {
        let customer = store
            .insert_customer(customer_draft("Priya Shah"))
            .expect("customer inserts");
        let service = store
            .insert_service(service_draft("Deep Clean", 100))
            .expect("service inserts");
        let booking = store
            .insert_booking(new_booking(
                CustomerSource::Existing(customer.id),
                "BK-SEEDED01",
                vec![LineItem {
                    service_id: service.id,
                    cleaner_count,
                }],
            ))
            .expect("booking inserts");
        (customer.id, service.id, booking)
    }

    #[test]
    fn ids_start_at_one_and_ascend() {
        let store = MemoryStore::new();
        let first = store
            .insert_customer(customer_draft("Ana"))
            .expect("first insert");
        let second = store
            .insert_customer(customer_draft("Ben"))
            .expect("second insert");
        assert_eq!(first.id, CustomerId(1));
        assert_eq!(second.id, CustomerId(2));
    }

    #[test]
    fn duplicate_usernames_are_a_conflict() {
        let store = MemoryStore::new();
        store
            .insert_actor("dispatch".to_string(), Some(Role::Subadmin))
            .expect("first account");
        let error = store
            .insert_actor("dispatch".to_string(), None)
            .expect_err("reused username");
        assert!(matches!(
            error,
            RepositoryError::Conflict {
                entity: "actor",
                field: "username"
            }
        ));
    }

    #[test]
    fn actor_search_is_case_insensitive_and_paged() {
        let store = MemoryStore::new();
        for index in 0..12 {
            store
                .insert_actor(format!("Crew-{index}"), Some(Role::Subadmin))
                .expect("account inserts");
        }
        store
            .insert_actor("other".to_string(), None)
            .expect("account inserts");

        let page = store
            .search_actors(Some("crew"), PageRequest::new(2))
            .expect("search runs");
        assert_eq!(page.total, 12);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].username, "Crew-10");
    }

    #[test]
    fn customer_delete_cascades_to_bookings_and_payments() {
        let store = MemoryStore::new();
        let (customer, _, booking) = seeded_booking(&store, 1);
        store
            .append_payment(
                booking.id,
                PaymentDraft {
                    method: crate::payments::PaymentMethod::Cash,
                    amount: Decimal::from(100),
                    discount: Decimal::ZERO,
                },
            )
            .expect("payment appends");

        store.delete_customer(customer).expect("delete runs");
        assert!(store
            .fetch_booking(booking.id)
            .expect("fetch runs")
            .is_none());
        assert!(store.list_payments().expect("list runs").is_empty());
    }

    #[test]
    fn cleaner_delete_detaches_assignments() {
        let store = MemoryStore::new();
        let (_, _, booking) = seeded_booking(&store, 2);
        let alpha = store
            .insert_cleaner(cleaner_draft("Alpha"))
            .expect("cleaner inserts");
        let beta = store
            .insert_cleaner(cleaner_draft("Beta"))
            .expect("cleaner inserts");
        store
            .commit_assignment(
                booking.id,
                vec![alpha.id, beta.id],
                PaymentDraft {
                    method: crate::payments::PaymentMethod::Card,
                    amount: Decimal::from(200),
                    discount: Decimal::ZERO,
                },
            )
            .expect("assignment commits");

        store.delete_cleaner(alpha.id).expect("delete runs");
        let booking = store
            .fetch_booking(booking.id)
            .expect("fetch runs")
            .expect("booking still there");
        assert_eq!(booking.assigned_cleaners, vec![beta.id]);
    }

    #[test]
    fn referenced_service_refuses_deletion() {
        let store = MemoryStore::new();
        let (_, service, booking) = seeded_booking(&store, 1);
        let error = store.delete_service(service).expect_err("still referenced");
        assert!(matches!(
            error,
            RepositoryError::ReferentialConflict {
                entity: "service",
                ..
            }
        ));

        store.delete_booking(booking.id).expect("booking deletes");
        store
            .delete_service(service)
            .expect("unreferenced service deletes");
    }

    #[test]
    fn duplicate_references_are_a_conflict() {
        let store = MemoryStore::new();
        let (customer, service, _) = seeded_booking(&store, 1);
        let error = store
            .insert_booking(new_booking(
                CustomerSource::Existing(customer),
                "BK-SEEDED01",
                vec![LineItem {
                    service_id: service,
                    cleaner_count: 1,
                }],
            ))
            .expect_err("reference reused");
        assert!(matches!(
            error,
            RepositoryError::Conflict {
                entity: "booking",
                field: "reference"
            }
        ));
    }

    #[test]
    fn booking_insert_can_create_its_customer() {
        let store = MemoryStore::new();
        let service = store
            .insert_service(service_draft("Window Wash", 50))
            .expect("service inserts");
        let booking = store
            .insert_booking(new_booking(
                CustomerSource::New(customer_draft("Walk-in")),
                "BK-WALKIN01",
                vec![LineItem {
                    service_id: service.id,
                    cleaner_count: 1,
                }],
            ))
            .expect("booking inserts");
        let customer = store
            .fetch_customer(booking.customer_id)
            .expect("fetch runs")
            .expect("customer created with the booking");
        assert_eq!(customer.full_name, "Walk-in");
    }

    #[test]
    fn assignment_commit_detects_requirement_drift() {
        let store = MemoryStore::new();
        let (_, _, booking) = seeded_booking(&store, 2);
        let solo = store
            .insert_cleaner(cleaner_draft("Solo"))
            .expect("cleaner inserts");
        let error = store
            .commit_assignment(
                booking.id,
                vec![solo.id],
                PaymentDraft {
                    method: crate::payments::PaymentMethod::Cash,
                    amount: Decimal::from(100),
                    discount: Decimal::ZERO,
                },
            )
            .expect_err("count no longer matches");
        assert!(matches!(error, RepositoryError::Serialization));
        let booking = store
            .fetch_booking(booking.id)
            .expect("fetch runs")
            .expect("booking present");
        assert!(booking.assigned_cleaners.is_empty());
        assert!(store.list_payments().expect("list runs").is_empty());
    }

    #[test]
    fn assignment_commit_replaces_the_set_and_appends_a_payment() {
        let store = MemoryStore::new();
        let (_, _, booking) = seeded_booking(&store, 1);
        let first = store
            .insert_cleaner(cleaner_draft("First"))
            .expect("cleaner inserts");
        let second = store
            .insert_cleaner(cleaner_draft("Second"))
            .expect("cleaner inserts");

        let draft = PaymentDraft {
            method: crate::payments::PaymentMethod::Upi,
            amount: Decimal::from(100),
            discount: Decimal::ZERO,
        };
        let (updated, payment) = store
            .commit_assignment(booking.id, vec![first.id], draft.clone())
            .expect("first assignment");
        assert_eq!(updated.assigned_cleaners, vec![first.id]);
        assert_eq!(payment.net_amount, Decimal::from(100));

        let (updated, _) = store
            .commit_assignment(booking.id, vec![second.id], draft)
            .expect("second assignment");
        assert_eq!(updated.assigned_cleaners, vec![second.id]);
        assert_eq!(store.list_payments().expect("list runs").len(), 2);
    }

    #[test]
    fn bookings_list_newest_first() {
        let store = MemoryStore::new();
        let (customer, service, _) = seeded_booking(&store, 1);
        store
            .insert_booking(new_booking(
                CustomerSource::Existing(customer),
                "BK-SECOND01",
                vec![LineItem {
                    service_id: service,
                    cleaner_count: 1,
                }],
            ))
            .expect("second booking inserts");
        let listed = store.list_bookings().expect("list runs");
        assert_eq!(listed[0].reference, "BK-SECOND01");
        assert_eq!(listed[1].reference, "BK-SEEDED01");
    }

    #[test]
    fn grant_set_round_trips() {
        use crate::access::Permission;

        let store = MemoryStore::new();
        assert!(store
            .permissions_for(Role::Subadmin)
            .expect("read runs")
            .is_none());
        store
            .replace_permissions(
                Role::Subadmin,
                PermissionSet::from([Permission::ViewBookings]),
            )
            .expect("write runs");
        let granted = store
            .permissions_for(Role::Subadmin)
            .expect("read runs")
            .expect("set stored");
        assert!(granted.contains(&Permission::ViewBookings));
    }
}
