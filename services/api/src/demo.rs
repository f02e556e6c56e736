use crate::infra::build_context;
use chrono::{Local, NaiveTime};
use clap::Args;
use rust_decimal::Decimal;
use std::path::PathBuf;
use tricksy::access::{Actor, Permission, PermissionSet};
use tricksy::admin::NewSubadmin;
use tricksy::booking::{
    AssignmentRequest, BookingDraft, BookingError, CustomerRef, LineItemDraft, Schedule,
};
use tricksy::config::AccessConfig;
use tricksy::context::AppContext;
use tricksy::directory::{
    Cleaner, CleanerDraft, Customer, CustomerDraft, DirectoryError, RosterImporter, Service,
    ServiceDraft,
};
use tricksy::error::AppError;
use tricksy::payments::{PaymentDraft, PaymentMethod};
use tricksy::store::Stores;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Permission guarding the assignment step (manage_bookings or assign_cleaners)
    #[arg(long, value_parser = crate::infra::parse_guard)]
    pub(crate) assignment_guard: Option<Permission>,
    /// Skip the denied-request portion of the walkthrough
    #[arg(long)]
    pub(crate) skip_denials: bool,
}

#[derive(Args, Debug)]
pub(crate) struct RosterArgs {
    /// Roster CSV with Name, Company, Vehicle Code, and Available columns
    pub(crate) file: PathBuf,
}

fn demo_access(assignment_guard: Option<Permission>) -> AccessConfig {
    AccessConfig {
        superadmin_username: "admin".to_string(),
        assignment_guard: assignment_guard.unwrap_or(Permission::ManageBookings),
    }
}

/// Parse a roster file and run it through the same validation the import
/// endpoint applies, against a throwaway store.
pub(crate) fn run_roster_check(args: RosterArgs) -> Result<(), AppError> {
    let drafts = RosterImporter::from_path(&args.file)?;
    println!(
        "Parsed {} roster row(s) from {}",
        drafts.len(),
        args.file.display()
    );

    let (context, superadmin) = build_context(&demo_access(None))?;
    match context.directory().import_roster(&superadmin, drafts) {
        Ok(cleaners) => {
            println!("Every row passes validation:");
            for cleaner in cleaners {
                let availability = if cleaner.available {
                    "available"
                } else {
                    "off duty"
                };
                println!(
                    "- {} | {} | {} | {}",
                    cleaner.name, cleaner.company, cleaner.vehicle_code, availability
                );
            }
        }
        Err(DirectoryError::Validation(errors)) => {
            println!("Roster rejected, nothing would be imported:");
            for error in &errors.errors {
                println!("- {}: {}", error.field, error.message);
            }
        }
        Err(err) => println!("Roster import failed: {err}"),
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        assignment_guard,
        skip_denials,
    } = args;

    let access = demo_access(assignment_guard);
    let (context, superadmin) = build_context(&access)?;

    println!("Tricksy cleaning desk demo");
    println!("Assignment workflow guarded by `{}`", access.assignment_guard);

    let frontdesk = match context.admin().create_subadmin(
        &superadmin,
        NewSubadmin {
            username: "frontdesk".to_string(),
        },
    ) {
        Ok(actor) => actor,
        Err(err) => {
            println!("Account setup failed: {err}");
            return Ok(());
        }
    };
    let grants = PermissionSet::from([Permission::ViewBookings, Permission::ManageCustomers]);
    if let Err(err) = context.admin().set_subadmin_permissions(&superadmin, grants) {
        println!("Grant setup failed: {err}");
        return Ok(());
    }
    println!(
        "\nAccounts: superadmin `{}`, subadmin `{}` granted view_bookings + manage_customers",
        superadmin.username, frontdesk.username
    );

    let seed = match seed_directory(&context, &superadmin) {
        Ok(seed) => seed,
        Err(err) => {
            println!("Directory seeding failed: {err}");
            return Ok(());
        }
    };
    println!("\nCatalog");
    for service in [&seed.deep_clean, &seed.window_wash] {
        println!(
            "- {} at {} per cleaner ({} min)",
            service.name, service.base_price, service.duration_minutes
        );
    }
    println!(
        "Crew: {}",
        seed.cleaners
            .iter()
            .map(|cleaner| cleaner.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!(
        "Customer: {} at {}",
        seed.customer.full_name, seed.customer.address
    );

    let today = Local::now().date_naive();
    let draft = BookingDraft {
        customer: CustomerRef::Existing(seed.customer.id),
        schedule: Schedule {
            start_date: today,
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
            end_date: today,
            end_time: NaiveTime::from_hms_opt(13, 0, 0).unwrap_or_default(),
        },
        cleaning_instructions: "Focus on the kitchen and the balcony rails".to_string(),
        special_request: String::new(),
        entry_instruction: "Concierge holds the key".to_string(),
        line_items: vec![
            LineItemDraft {
                service_id: seed.deep_clean.id,
                cleaner_count: 2,
            },
            LineItemDraft {
                service_id: seed.window_wash.id,
                cleaner_count: 1,
            },
        ],
    };
    let booking = match context.bookings().create(&superadmin, draft) {
        Ok(booking) => booking,
        Err(err) => {
            println!("Booking creation failed: {err}");
            return Ok(());
        }
    };
    let totals = match context.bookings().totals(&superadmin, booking.id) {
        Ok(totals) => totals,
        Err(err) => {
            println!("Totals unavailable: {err}");
            return Ok(());
        }
    };
    println!(
        "\nBooking {} for {}: {} cleaner(s) required, {} due",
        booking.reference, seed.customer.full_name, totals.required_cleaners, totals.total_amount
    );

    if !skip_denials {
        println!("\nPermission checks");
        match context.bookings().get(&frontdesk, booking.id) {
            Ok(found) => println!(
                "- `{}` can read booking {} through view_bookings",
                frontdesk.username, found.reference
            ),
            Err(err) => println!("- unexpected read failure: {err}"),
        }
        match context.bookings().assign_cleaners(
            &frontdesk,
            booking.id,
            full_crew(&seed, PaymentMethod::Card),
        ) {
            Err(BookingError::Denied(denied)) => println!(
                "- `{}` cannot assign cleaners: {denied}",
                frontdesk.username
            ),
            Ok(_) => println!("- expected the assignment to be denied"),
            Err(err) => println!("- unexpected assignment failure: {err}"),
        }
    }

    println!("\nAssignment attempts");
    let short_crew = AssignmentRequest {
        cleaners: seed
            .cleaners
            .iter()
            .take(2)
            .map(|cleaner| cleaner.id)
            .collect(),
        payment_method: Some(PaymentMethod::Card),
    };
    match context
        .bookings()
        .assign_cleaners(&superadmin, booking.id, short_crew)
    {
        Err(BookingError::Validation(errors)) => {
            println!("- short crew rejected:");
            for error in &errors.errors {
                println!("    {}: {}", error.field, error.message);
            }
        }
        Ok(_) => println!("- expected the short crew to be rejected"),
        Err(err) => println!("- unexpected failure: {err}"),
    }

    let unpaid = AssignmentRequest {
        cleaners: seed.cleaners.iter().map(|cleaner| cleaner.id).collect(),
        payment_method: None,
    };
    match context
        .bookings()
        .assign_cleaners(&superadmin, booking.id, unpaid)
    {
        Err(BookingError::Validation(errors)) => {
            println!("- missing payment method rejected:");
            for error in &errors.errors {
                println!("    {}: {}", error.field, error.message);
            }
        }
        Ok(_) => println!("- expected the unpaid assignment to be rejected"),
        Err(err) => println!("- unexpected failure: {err}"),
    }

    match context.bookings().get(&superadmin, booking.id) {
        Ok(current) => println!(
            "- booking still has {} assigned cleaner(s) after the failed attempts",
            current.assigned_cleaners.len()
        ),
        Err(err) => println!("- booking lookup failed: {err}"),
    }

    let outcome = match context.bookings().assign_cleaners(
        &superadmin,
        booking.id,
        full_crew(&seed, PaymentMethod::Card),
    ) {
        Ok(outcome) => outcome,
        Err(err) => {
            println!("- assignment failed: {err}");
            return Ok(());
        }
    };
    let crew = outcome
        .booking
        .assigned_cleaners
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    println!("- full crew assigned (cleaners {crew})");
    println!(
        "- payment {} recorded: {} net by {} ({})",
        outcome.payment.id,
        outcome.payment.net_amount,
        outcome.payment.method.label(),
        outcome.payment.status.label()
    );

    println!("\nManual payment with a loyalty discount");
    match context.payments().record(
        &superadmin,
        booking.id,
        PaymentDraft {
            method: PaymentMethod::Cash,
            amount: Decimal::new(10000, 2),
            discount: Decimal::new(3000, 2),
        },
    ) {
        Ok(payment) => println!(
            "- {} minus {} discount -> {} net",
            payment.amount, payment.discount, payment.net_amount
        ),
        Err(err) => println!("- payment failed: {err}"),
    }
    match context.payments().for_booking(&superadmin, booking.id) {
        Ok(payments) => println!(
            "- ledger for {} now holds {} payment(s)",
            booking.reference,
            payments.len()
        ),
        Err(err) => println!("- ledger unavailable: {err}"),
    }

    match context.dashboard().summary(&superadmin) {
        Ok(summary) => match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("\nDashboard summary\n{json}"),
            Err(err) => println!("\nDashboard summary unavailable: {err}"),
        },
        Err(err) => println!("\nDashboard summary unavailable: {err}"),
    }

    Ok(())
}

struct DemoSeed {
    customer: Customer,
    deep_clean: Service,
    window_wash: Service,
    cleaners: Vec<Cleaner>,
}

fn full_crew(seed: &DemoSeed, method: PaymentMethod) -> AssignmentRequest {
    AssignmentRequest {
        cleaners: seed.cleaners.iter().map(|cleaner| cleaner.id).collect(),
        payment_method: Some(method),
    }
}

fn seed_directory<S: Stores>(
    context: &AppContext<S>,
    superadmin: &Actor,
) -> Result<DemoSeed, DirectoryError> {
    let customer = context.directory().create_customer(
        superadmin,
        CustomerDraft {
            full_name: "Meera Pillai".to_string(),
            region: "Indiranagar".to_string(),
            address: "48 Lakeview Terrace".to_string(),
            google_location: "https://maps.example/48-lakeview".to_string(),
            building: "Lakeview Heights".to_string(),
            unit: "7B".to_string(),
            location_notes: "Service lift behind the lobby".to_string(),
        },
    )?;

    let deep_clean = context.directory().create_service(
        superadmin,
        ServiceDraft {
            name: "Deep Clean".to_string(),
            description: "Full-home scrub including appliances".to_string(),
            duration_minutes: 180,
            material: "Team brings supplies".to_string(),
            base_price: Decimal::new(10000, 2),
        },
    )?;
    let window_wash = context.directory().create_service(
        superadmin,
        ServiceDraft {
            name: "Window Wash".to_string(),
            description: "Interior and exterior glass".to_string(),
            duration_minutes: 60,
            material: "Squeegees and eco detergent".to_string(),
            base_price: Decimal::new(5000, 2),
        },
    )?;

    let mut cleaners = Vec::new();
    for (name, vehicle) in [
        ("Asha Verma", "KA-01-4321"),
        ("Binod Rai", "KA-05-8876"),
        ("Chetna Iyer", "KA-03-1190"),
    ] {
        cleaners.push(context.directory().create_cleaner(
            superadmin,
            CleanerDraft {
                name: name.to_string(),
                company: "Tricksy Crew".to_string(),
                vehicle_code: vehicle.to_string(),
                available: true,
            },
        )?);
    }

    Ok(DemoSeed {
        customer,
        deep_clean,
        window_wash,
        cleaners,
    })
}
