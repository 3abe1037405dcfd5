//! End-to-end tests through the axum router

use axum::Router;
use axum::body::Body;
use canteen_server::api::build_router;
use canteen_server::{Config, ServerState};
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

struct TestApp {
    _dir: tempfile::TempDir,
    router: Router,
}

async fn spawn_app() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::with_work_dir(dir.path().to_string_lossy().to_string());
    config.call_number_backend = "database".into();
    config.call_number_start = 201;
    config.display_base = 201;
    config.display_range = 99;

    let state = ServerState::initialize(&config).await.unwrap();
    TestApp {
        _dir: dir,
        router: build_router(state),
    }
}

enum Caller<'a> {
    Anonymous,
    Customer(&'a str),
    Admin,
}

async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    caller: Caller<'_>,
    body: Option<Value>,
) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    builder = match caller {
        Caller::Anonymous => builder,
        Caller::Customer(id) => builder.header("X-User-Id", id),
        Caller::Admin => builder.header("X-User-Id", "staff-1").header("X-Role", "admin"),
    };
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

async fn send_json(
    router: &Router,
    method: &str,
    uri: &str,
    caller: Caller<'_>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let (status, bytes) = send(router, method, uri, caller, body).await;
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn seed_menu(router: &Router, capacity: i64) -> (i64, i64) {
    let (status, body) = send_json(
        router,
        "POST",
        "/api/products",
        Caller::Admin,
        Some(json!({ "name": "Karaage bento", "price": 520 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let product_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send_json(
        router,
        "POST",
        "/api/time-slots",
        Caller::Admin,
        Some(json!({ "label": "12:10-12:20", "starts_at": 0, "capacity": capacity })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let slot_id = body["data"]["id"].as_i64().unwrap();

    (product_id, slot_id)
}

async fn fill_cart(router: &Router, user: &str, product_id: i64, quantity: i64) {
    let (status, body) = send_json(
        router,
        "PUT",
        "/api/cart",
        Caller::Customer(user),
        Some(json!({ "product_id": product_id, "quantity": quantity })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
}

#[tokio::test]
async fn health_reports_backend() {
    let app = spawn_app().await;
    let (status, body) = send_json(&app.router, "GET", "/health", Caller::Anonymous, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["call_number_backend"], "database");
}

#[tokio::test]
async fn identity_and_admin_checks() {
    let app = spawn_app().await;

    let (status, body) = send_json(&app.router, "GET", "/api/cart", Caller::Anonymous, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1001);

    let (status, _) = send_json(
        &app.router,
        "POST",
        "/api/products",
        Caller::Customer("alice"),
        Some(json!({ "name": "Ramen", "price": 600 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send_json(
        &app.router,
        "GET",
        "/api/admin/call-number",
        Caller::Customer("alice"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Reading the menu needs no identity
    let (status, _) = send_json(&app.router, "GET", "/api/products", Caller::Anonymous, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_orders_get_distinct_call_numbers() {
    let app = spawn_app().await;
    let (product_id, slot_id) = seed_menu(&app.router, 2).await;
    fill_cart(&app.router, "alice", product_id, 1).await;
    fill_cart(&app.router, "bob", product_id, 2).await;

    let order = |user: &'static str| {
        let router = app.router.clone();
        tokio::spawn(async move {
            send_json(
                &router,
                "POST",
                "/api/orders",
                Caller::Customer(user),
                Some(json!({ "time_slot_id": slot_id })),
            )
            .await
        })
    };
    let (a, b) = (order("alice"), order("bob"));
    let (status_a, body_a) = a.await.unwrap();
    let (status_b, body_b) = b.await.unwrap();
    assert_eq!(status_a, StatusCode::OK, "{body_a}");
    assert_eq!(status_b, StatusCode::OK, "{body_b}");

    let raw_a = body_a["data"]["call_number_raw"].as_i64().unwrap();
    let raw_b = body_b["data"]["call_number_raw"].as_i64().unwrap();
    assert_ne!(raw_a, raw_b);
    let mut raws = vec![raw_a, raw_b];
    raws.sort_unstable();
    assert_eq!(raws, vec![201, 202]);

    for body in [&body_a, &body_b] {
        let raw = body["data"]["call_number_raw"].as_i64().unwrap();
        let display = body["data"]["call_number"].as_i64().unwrap();
        assert_eq!(display, raw % 99 + 201);
        assert!((201..=299).contains(&display));
    }

    // Capacity went from 2 to 0
    let (_, slots) = send_json(&app.router, "GET", "/api/time-slots", Caller::Anonymous, None).await;
    assert_eq!(slots["data"][0]["remaining"], 0);

    // Carts were emptied
    let (_, cart) = send_json(&app.router, "GET", "/api/cart", Caller::Customer("alice"), None).await;
    assert_eq!(cart["data"]["lines"].as_array().unwrap().len(), 0);

    // A third order does not fit
    fill_cart(&app.router, "carol", product_id, 1).await;
    let (status, body) = send_json(
        &app.router,
        "POST",
        "/api/orders",
        Caller::Customer("carol"),
        Some(json!({ "time_slot_id": slot_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 7002);

    let (status, body) = send_json(&app.router, "GET", "/api/admin/call-number", Caller::Admin, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["backend"], "database");
    assert_eq!(body["data"]["next_raw"], 203);
    assert_eq!(body["data"]["next_display"], 206);
}

#[tokio::test]
async fn empty_cart_is_rejected() {
    let app = spawn_app().await;
    let (_, slot_id) = seed_menu(&app.router, 5).await;

    let (status, body) = send_json(
        &app.router,
        "POST",
        "/api/orders",
        Caller::Customer("dave"),
        Some(json!({ "time_slot_id": slot_id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4002);
}

#[tokio::test]
async fn order_lifecycle_and_receipt() {
    let app = spawn_app().await;
    let (product_id, slot_id) = seed_menu(&app.router, 5).await;
    fill_cart(&app.router, "erin", product_id, 2).await;

    let (status, body) = send_json(
        &app.router,
        "POST",
        "/api/orders",
        Caller::Customer("erin"),
        Some(json!({ "time_slot_id": slot_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let order_id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["total"], 1040);
    assert_eq!(body["data"]["status"], "PENDING");
    assert_eq!(body["data"]["call_number"], 204);

    // Other customers cannot see it
    let uri = format!("/api/orders/{order_id}");
    let (status, _) = send_json(&app.router, "GET", &uri, Caller::Customer("frank"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, bytes) = send(
        &app.router,
        "GET",
        &format!("/api/orders/{order_id}/receipt"),
        Caller::Customer("erin"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(bytes).unwrap();
    assert!(text.contains("No. 204"), "{text}");
    assert!(text.contains("Karaage bento x2"), "{text}");

    let (status, body) = send_json(
        &app.router,
        "POST",
        &format!("/api/orders/{order_id}/payment"),
        Caller::Customer("erin"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "PAID");

    let (status, body) = send_json(
        &app.router,
        "POST",
        &format!("/api/orders/{order_id}/payment"),
        Caller::Customer("erin"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 4004);

    let status_uri = format!("/api/admin/orders/{order_id}/status");
    let (status, body) = send_json(
        &app.router,
        "PUT",
        &status_uri,
        Caller::Admin,
        Some(json!({ "status": "PICKED_UP" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 4003);

    let (status, body) = send_json(
        &app.router,
        "PUT",
        &status_uri,
        Caller::Admin,
        Some(json!({ "status": "READY" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "READY");
    // Call number never changes after creation
    assert_eq!(body["data"]["call_number"], 204);

    let (status, body) = send_json(
        &app.router,
        "GET",
        "/api/admin/orders?status=READY",
        Caller::Admin,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (_, body) = send_json(&app.router, "GET", "/api/orders/mine", Caller::Customer("erin"), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn unavailable_product_cannot_enter_cart() {
    let app = spawn_app().await;
    let (product_id, _) = seed_menu(&app.router, 5).await;

    let (status, _) = send_json(
        &app.router,
        "PUT",
        &format!("/api/products/{product_id}/availability"),
        Caller::Admin,
        Some(json!({ "is_available": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send_json(
        &app.router,
        "PUT",
        "/api/cart",
        Caller::Customer("gina"),
        Some(json!({ "product_id": product_id, "quantity": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6002);
}
