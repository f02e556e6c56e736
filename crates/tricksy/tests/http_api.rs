//! End-to-end specifications for the HTTP surface: actor resolution from the
//! `x-actor` header, the fixed denial signal, error translation, and the full
//! desk workflow driven through the composed router.

mod common {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::Value;

    use tricksy::access::{Actor, GuardPoints};
    use tricksy::admin::NewSubadmin;
    use tricksy::context::{api_router, AppContext};
    use tricksy::store::MemoryStore;

    pub(super) fn build_router() -> (axum::Router, Arc<AppContext<MemoryStore>>, Actor) {
        let context = Arc::new(AppContext::new(
            Arc::new(MemoryStore::new()),
            GuardPoints::default(),
        ));
        let admin = context
            .admin()
            .ensure_superadmin("admin")
            .expect("superadmin bootstrapped");
        (api_router(context.clone()), context, admin)
    }

    pub(super) fn subadmin(context: &AppContext<MemoryStore>, admin: &Actor) -> Actor {
        context
            .admin()
            .create_subadmin(
                admin,
                NewSubadmin {
                    username: "dispatch".to_string(),
                },
            )
            .expect("subadmin created")
    }

    pub(super) fn authed(method: &str, uri: &str, actor: &Actor) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("x-actor", actor.id.0.to_string())
            .body(Body::empty())
            .expect("request")
    }

    pub(super) fn authed_json(
        method: &str,
        uri: &str,
        actor: &Actor,
        body: &Value,
    ) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("x-actor", actor.id.0.to_string())
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).expect("serialize body")))
            .expect("request")
    }

    pub(super) async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        serde_json::from_slice(&bytes).expect("json")
    }
}

mod authentication {
    use super::common::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    #[tokio::test]
    async fn requests_without_the_actor_header_are_unauthorized() {
        let (router, _, _) = build_router();

        let response = router
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/v1/services")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            json_body(response).await,
            json!({ "error": "actor header missing" })
        );
    }

    #[tokio::test]
    async fn non_numeric_actor_headers_are_unauthorized() {
        let (router, _, _) = build_router();

        let response = router
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/v1/services")
                    .header("x-actor", "the-desk")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            json_body(response).await,
            json!({ "error": "actor header must be a numeric id" })
        );
    }

    #[tokio::test]
    async fn unknown_actor_ids_are_unauthorized() {
        let (router, _, _) = build_router();

        let response = router
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/v1/services")
                    .header("x-actor", "999")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await, json!({ "error": "unknown actor" }));
    }
}

mod authorization {
    use super::common::*;
    use axum::http::StatusCode;
    use serde_json::json;
    use tower::ServiceExt;

    #[tokio::test]
    async fn denials_share_one_fixed_body() {
        let (router, context, admin) = build_router();
        let dispatch = subadmin(&context, &admin);

        for uri in ["/api/v1/bookings", "/api/v1/payments", "/api/v1/dashboard"] {
            let response = router
                .clone()
                .oneshot(authed("GET", uri, &dispatch))
                .await
                .expect("router dispatch");
            assert_eq!(response.status(), StatusCode::FORBIDDEN, "uri: {uri}");
            assert_eq!(
                json_body(response).await,
                json!({ "error": "access denied" }),
                "the denial body never names the missing permission"
            );
        }
    }

    #[tokio::test]
    async fn replaced_grants_open_routes_for_the_next_request() {
        let (router, context, admin) = build_router();
        let dispatch = subadmin(&context, &admin);

        let denied = router
            .clone()
            .oneshot(authed("GET", "/api/v1/services", &dispatch))
            .await
            .expect("router dispatch");
        assert_eq!(denied.status(), StatusCode::FORBIDDEN);

        let granted = router
            .clone()
            .oneshot(authed_json(
                "PUT",
                "/api/v1/roles/subadmin/permissions",
                &admin,
                &json!({ "permissions": ["view_services"] }),
            ))
            .await
            .expect("router dispatch");
        assert_eq!(granted.status(), StatusCode::OK);
        let view = json_body(granted).await;
        assert_eq!(view["granted"], json!(["view_services"]));

        let allowed = router
            .clone()
            .oneshot(authed("GET", "/api/v1/services", &dispatch))
            .await
            .expect("router dispatch");
        assert_eq!(allowed.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_permission_codes_never_reach_the_service() {
        let (router, _, admin) = build_router();

        let response = router
            .oneshot(authed_json(
                "PUT",
                "/api/v1/roles/subadmin/permissions",
                &admin,
                &json!({ "permissions": ["rule_the_world"] }),
            ))
            .await
            .expect("router dispatch");

        // The typed grant set fails deserialization at the boundary.
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn the_permission_catalog_is_readable_by_any_actor() {
        let (router, context, admin) = build_router();
        let dispatch = subadmin(&context, &admin);

        let response = router
            .oneshot(authed("GET", "/api/v1/permissions", &dispatch))
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::OK);
        let catalog = json_body(response).await;
        let entries = catalog.as_array().expect("catalog array");
        assert_eq!(entries.len(), 10);
        assert!(entries
            .iter()
            .all(|entry| entry.get("code").is_some() && entry.get("label").is_some()));
    }
}

mod resources {
    use super::common::*;
    use axum::http::StatusCode;
    use serde_json::json;
    use tower::ServiceExt;

    #[tokio::test]
    async fn created_services_are_readable_at_their_location() {
        let (router, _, admin) = build_router();

        let created = router
            .clone()
            .oneshot(authed_json(
                "POST",
                "/api/v1/services",
                &admin,
                &json!({
                    "name": "Deep Clean",
                    "description": "Full apartment pass",
                    "duration_minutes": 120,
                    "material": "Standard kit",
                    "base_price": 100.0
                }),
            ))
            .await
            .expect("router dispatch");
        assert_eq!(created.status(), StatusCode::CREATED);
        let service = json_body(created).await;
        let id = service["id"].as_u64().expect("service id");

        let fetched = router
            .clone()
            .oneshot(authed("GET", &format!("/api/v1/services/{id}"), &admin))
            .await
            .expect("router dispatch");
        assert_eq!(fetched.status(), StatusCode::OK);
        assert_eq!(json_body(fetched).await["name"], json!("Deep Clean"));
    }

    #[tokio::test]
    async fn validation_failures_list_every_field() {
        let (router, _, admin) = build_router();

        let response = router
            .oneshot(authed_json(
                "POST",
                "/api/v1/services",
                &admin,
                &json!({
                    "name": "  ",
                    "duration_minutes": 0,
                    "base_price": 10.0
                }),
            ))
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let payload = json_body(response).await;
        assert_eq!(payload["error"], json!("validation failed"));
        let fields = payload["fields"].as_array().expect("fields array");
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0]["field"], json!("name"));
        assert_eq!(fields[0]["message"], json!("must not be blank"));
        assert_eq!(fields[1]["field"], json!("duration_minutes"));
    }

    #[tokio::test]
    async fn missing_bookings_are_not_found() {
        let (router, _, admin) = build_router();

        let response = router
            .oneshot(authed("GET", "/api/v1/bookings/999", &admin))
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn referenced_services_refuse_deletion() {
        use chrono::{NaiveDate, NaiveTime};
        use rust_decimal::Decimal;
        use tricksy::booking::{BookingDraft, CustomerRef, LineItemDraft, Schedule};
        use tricksy::directory::{CustomerDraft, ServiceDraft};

        let (router, context, admin) = build_router();
        let customer = context
            .directory()
            .create_customer(
                &admin,
                CustomerDraft {
                    full_name: "Meera Pillai".to_string(),
                    region: String::new(),
                    address: "12 Hill Rd".to_string(),
                    google_location: String::new(),
                    building: String::new(),
                    unit: String::new(),
                    location_notes: String::new(),
                },
            )
            .expect("customer created");
        let service = context
            .directory()
            .create_service(
                &admin,
                ServiceDraft {
                    name: "Deep Clean".to_string(),
                    description: String::new(),
                    duration_minutes: 120,
                    material: String::new(),
                    base_price: Decimal::from(100),
                },
            )
            .expect("service created");
        context
            .bookings()
            .create(
                &admin,
                BookingDraft {
                    customer: CustomerRef::Existing(customer.id),
                    schedule: Schedule {
                        start_date: NaiveDate::from_ymd_opt(2026, 4, 2).expect("valid date"),
                        start_time: NaiveTime::from_hms_opt(9, 0, 0).expect("valid time"),
                        end_date: NaiveDate::from_ymd_opt(2026, 4, 2).expect("valid date"),
                        end_time: NaiveTime::from_hms_opt(13, 0, 0).expect("valid time"),
                    },
                    cleaning_instructions: String::new(),
                    special_request: String::new(),
                    entry_instruction: String::new(),
                    line_items: vec![LineItemDraft {
                        service_id: service.id,
                        cleaner_count: 1,
                    }],
                },
            )
            .expect("booking created");

        let response = router
            .oneshot(authed(
                "DELETE",
                &format!("/api/v1/services/{}", service.id),
                &admin,
            ))
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn actor_search_runs_through_the_query_string() {
        let (router, context, admin) = build_router();
        subadmin(&context, &admin);

        let response = router
            .oneshot(authed("GET", "/api/v1/actors?search=disp", &admin))
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::OK);
        let page = json_body(response).await;
        assert_eq!(page["total"], json!(1));
        assert_eq!(page["items"][0]["username"], json!("dispatch"));
    }

    #[tokio::test]
    async fn the_dashboard_aggregates_the_desk() {
        let (router, context, admin) = build_router();
        subadmin(&context, &admin);
        context
            .directory()
            .create_cleaner(
                &admin,
                tricksy::directory::CleanerDraft {
                    name: "Asha Verma".to_string(),
                    company: String::new(),
                    vehicle_code: String::new(),
                    available: true,
                },
            )
            .expect("cleaner created");

        let response = router
            .oneshot(authed("GET", "/api/v1/dashboard", &admin))
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::OK);
        let summary = json_body(response).await;
        assert_eq!(summary["cleaners"], json!(1));
        assert_eq!(summary["available_cleaners"], json!(1));
        assert_eq!(summary["bookings"], json!(0));
    }
}

mod desk_workflow {
    use super::common::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    #[tokio::test]
    async fn the_full_booking_workflow_runs_over_http() {
        let (router, _, admin) = build_router();

        let customer = json_body(
            router
                .clone()
                .oneshot(authed_json(
                    "POST",
                    "/api/v1/customers",
                    &admin,
                    &json!({
                        "full_name": "Meera Pillai",
                        "region": "North",
                        "address": "12 Hill Rd"
                    }),
                ))
                .await
                .expect("router dispatch"),
        )
        .await;
        let customer_id = customer["id"].as_u64().expect("customer id");

        let service = json_body(
            router
                .clone()
                .oneshot(authed_json(
                    "POST",
                    "/api/v1/services",
                    &admin,
                    &json!({
                        "name": "Deep Clean",
                        "duration_minutes": 120,
                        "base_price": 100.0
                    }),
                ))
                .await
                .expect("router dispatch"),
        )
        .await;
        let service_id = service["id"].as_u64().expect("service id");

        let mut cleaner_ids = Vec::new();
        for name in ["Asha Verma", "Binod Rai"] {
            let cleaner = json_body(
                router
                    .clone()
                    .oneshot(authed_json(
                        "POST",
                        "/api/v1/cleaners",
                        &admin,
                        &json!({ "name": name }),
                    ))
                    .await
                    .expect("router dispatch"),
            )
            .await;
            cleaner_ids.push(cleaner["id"].as_u64().expect("cleaner id"));
        }

        let created = router
            .clone()
            .oneshot(authed_json(
                "POST",
                "/api/v1/bookings",
                &admin,
                &json!({
                    "customer": { "existing": customer_id },
                    "start_date": "2026-04-02",
                    "start_time": "09:00:00",
                    "end_date": "2026-04-02",
                    "end_time": "13:00:00",
                    "cleaning_instructions": "Start with the kitchen",
                    "line_items": [
                        { "service_id": service_id, "cleaner_count": 2 }
                    ]
                }),
            ))
            .await
            .expect("router dispatch");
        assert_eq!(created.status(), StatusCode::CREATED);
        let booking = json_body(created).await;
        let booking_id = booking["id"].as_u64().expect("booking id");
        let reference = booking["reference"].as_str().expect("reference");
        assert!(reference.starts_with("BK-"));
        assert_eq!(booking["assigned_cleaners"], json!([]));

        let totals = json_body(
            router
                .clone()
                .oneshot(authed(
                    "GET",
                    &format!("/api/v1/bookings/{booking_id}/totals"),
                    &admin,
                ))
                .await
                .expect("router dispatch"),
        )
        .await;
        assert_eq!(totals["required_cleaners"], json!(2));
        assert_eq!(totals["total_amount"], json!(200.0));

        let assigned = router
            .clone()
            .oneshot(authed_json(
                "PUT",
                &format!("/api/v1/bookings/{booking_id}/assignment"),
                &admin,
                &json!({
                    "cleaners": cleaner_ids,
                    "payment_method": "card"
                }),
            ))
            .await
            .expect("router dispatch");
        assert_eq!(assigned.status(), StatusCode::OK);
        let outcome = json_body(assigned).await;
        assert_eq!(outcome["booking"]["assigned_cleaners"], json!(cleaner_ids));
        assert_eq!(outcome["payment"]["method"], json!("card"));
        assert_eq!(outcome["payment"]["net_amount"], json!(200.0));
        assert_eq!(outcome["payment"]["status"], json!("pending"));

        let ledger = json_body(
            router
                .clone()
                .oneshot(authed(
                    "GET",
                    &format!("/api/v1/bookings/{booking_id}/payments"),
                    &admin,
                ))
                .await
                .expect("router dispatch"),
        )
        .await;
        assert_eq!(ledger.as_array().expect("ledger array").len(), 1);

        let listed = json_body(
            router
                .clone()
                .oneshot(authed("GET", "/api/v1/bookings?page=1", &admin))
                .await
                .expect("router dispatch"),
        )
        .await;
        assert_eq!(listed["total"], json!(1));
        assert_eq!(listed["items"][0]["id"], json!(booking_id));

        let removed = router
            .clone()
            .oneshot(authed(
                "DELETE",
                &format!("/api/v1/bookings/{booking_id}"),
                &admin,
            ))
            .await
            .expect("router dispatch");
        assert_eq!(removed.status(), StatusCode::NO_CONTENT);

        let gone = router
            .clone()
            .oneshot(authed(
                "GET",
                &format!("/api/v1/bookings/{booking_id}"),
                &admin,
            ))
            .await
            .expect("router dispatch");
        assert_eq!(gone.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn roster_files_upload_as_plain_text() {
        let (router, _, admin) = build_router();
        let csv = "\
Name,Company,Vehicle Code,Available
Asha Verma,Tricksy Crew,TC-1,yes
Binod Rai,,,no
";

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/cleaners/import")
                    .header("x-actor", admin.id.0.to_string())
                    .header("content-type", "text/csv")
                    .body(Body::from(csv))
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::CREATED);
        let imported = json_body(response).await;
        assert_eq!(imported.as_array().expect("cleaner array").len(), 2);

        let listed = router
            .oneshot(authed("GET", "/api/v1/cleaners", &admin))
            .await
            .expect("router dispatch");
        assert_eq!(listed.status(), StatusCode::OK);
        assert_eq!(json_body(listed).await.as_array().expect("array").len(), 2);
    }
}
