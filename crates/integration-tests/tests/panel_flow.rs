//! End-to-end tests for the admin router.
//!
//! Drives `catalog_sync_admin::app` with `tower::ServiceExt::oneshot`
//! against mocked backends: login gate, catalog navigation, selection and
//! the bulk submission flow.

use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use catalog_sync_admin::state::AppState;
use catalog_sync_admin::submit::BATCH_FAILURE_MESSAGE;
use catalog_sync_integration_tests::config_for;
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_app(server: &MockServer) -> Router {
    let config = config_for(&server.uri(), &[]).expect("test config");
    let state = AppState::new(config).expect("test state");
    catalog_sync_admin::app(state)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, String) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, String::from_utf8_lossy(&bytes).into_owned())
}

fn get(uri: &str, cookie: &str) -> Request<Body> {
    Request::get(uri)
        .header(header::COOKIE, cookie)
        .header("HX-Request", "true")
        .body(Body::empty())
        .unwrap()
}

fn post_form(uri: &str, cookie: &str, form: &str) -> Request<Body> {
    Request::post(uri)
        .header(header::COOKIE, cookie)
        .header("HX-Request", "true")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap()
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .and(body_json(json!({"username": "ana", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(server)
        .await;
}

async fn mount_catalog(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/categories/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 7, "title": "Informática"},
            {"id": 8, "title": "Audio"}
        ])))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/categories/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"childs": [
            {"id": 70, "title": "Periféricos"}
        ]})))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/categories/7/70"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"childs": [{"products": [
            {"id": 101, "title": "Mouse óptico", "description": "USB", "images": []},
            {"id": 102, "title": "Teclado mecánico", "description": "Switch azul", "images": []}
        ]}]})))
        .mount(server)
        .await;
}

/// Log in and return the `name=value` part of the session cookie.
async fn login(app: &Router) -> String {
    let request = Request::post("/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("username=ana&password=secret"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/catalog");

    response.headers()[header::SET_COOKIE]
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

/// Render the catalog page and load its category list, as the browser does.
async fn open_catalog(app: &Router, cookie: &str) {
    let (status, _, _) = send(app, get("/catalog", cookie)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _, _) = send(app, get("/catalog/categories", cookie)).await;
    assert_eq!(status, StatusCode::OK);
}

/// Poll the running submission until it shows its result.
async fn wait_for_batch_result(app: &Router, cookie: &str) -> String {
    for _ in 0..100 {
        let (_, _, fragment) = send(app, get("/catalog/submissions/current", cookie)).await;
        if !fragment.contains("every 1s") {
            return fragment;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    panic!("submission did not finish");
}

/// Load subcategory 70 of category 7 and check both products.
async fn select_both_products(app: &Router, cookie: &str) {
    open_catalog(app, cookie).await;
    send(app, post_form("/catalog/category", cookie, "category=7")).await;
    send(app, post_form("/catalog/products", cookie, "subcategory=70")).await;
    let (_, _, fragment) = send(app, post_form("/catalog/selection/all", cookie, "checked=true")).await;
    assert!(fragment.contains("2 products selected"));
}

// ---------------------------------------------------------------------------
// Login gate
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_catalog_redirects_to_login_without_session() {
    let server = MockServer::start().await;
    let app = test_app(&server);

    let request = Request::get("/catalog").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/login");
}

#[tokio::test]
async fn test_htmx_request_without_session_gets_client_redirect() {
    let server = MockServer::start().await;
    let app = test_app(&server);

    let (status, headers, _) = send(&app, post_form("/catalog/category", "", "category=7")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(headers["HX-Redirect"], "/login");
}

#[tokio::test]
async fn test_refused_login_shows_backend_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid credentials"})),
        )
        .mount(&server)
        .await;
    let app = test_app(&server);

    let request = Request::post("/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("username=ana&password=wrong"))
        .unwrap();
    let (status, headers, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(headers.get(header::SET_COOKIE).is_none());
    assert!(body.contains("Invalid credentials"));
    assert!(body.contains("value=\"ana\""));
}

#[tokio::test]
async fn test_login_page_welcomes_back_a_logged_in_operator() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    let app = test_app(&server);
    let cookie = login(&app).await;

    let (status, _, body) = send(&app, get("/login", &cookie)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Welcome back"));
}

// ---------------------------------------------------------------------------
// Catalog navigation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_catalog_navigation_and_selection() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_catalog(&server).await;
    let app = test_app(&server);
    let cookie = login(&app).await;

    let (status, _, page) = send(&app, get("/catalog", &cookie)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("Loading categories..."));
    assert!(page.contains("Select a category first"));

    let (status, _, select) = send(&app, get("/catalog/categories", &cookie)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(select.contains("Informática"));
    assert!(select.contains("Select a category"));

    let (_, _, fragment) = send(&app, post_form("/catalog/category", &cookie, "category=7")).await;
    assert!(fragment.contains("Periféricos"));
    assert!(fragment.contains("Select a subcategory"));

    let (_, _, fragment) = send(&app, post_form("/catalog/products", &cookie, "subcategory=70")).await;
    assert!(fragment.contains("Mouse óptico"));
    assert!(fragment.contains("Teclado mecánico"));
    assert!(fragment.contains("0 products selected"));

    let (status, _, fragment) = send(
        &app,
        post_form("/catalog/selection/toggle", &cookie, "product_id=101&checked=true"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(fragment.contains("1 product selected"));

    let (status, _, _) = send(
        &app,
        post_form("/catalog/selection/toggle", &cookie, "product_id=999&checked=true"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, _, fragment) = send(&app, post_form("/catalog/selection/all", &cookie, "checked=true")).await;
    assert!(fragment.contains("2 products selected"));

    let (_, _, fragment) = send(&app, post_form("/catalog/selection/all", &cookie, "")).await;
    assert!(fragment.contains("0 products selected"));
}

#[tokio::test]
async fn test_products_without_subcategory_prompts_in_modal() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_catalog(&server).await;
    let app = test_app(&server);
    let cookie = login(&app).await;

    open_catalog(&app, &cookie).await;
    let (status, headers, body) = send(&app, post_form("/catalog/products", &cookie, "subcategory=")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["HX-Retarget"], "#modal");
    assert!(body.contains("Please select a category and a subcategory"));
}

#[tokio::test]
async fn test_product_detail_is_fetched_lazily_and_sent() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_catalog(&server).await;
    let record = json!({
        "id": 101,
        "title": "Mouse óptico",
        "body": "<p>Ergonómico</p><script>alert(1)</script>",
        "availability": {"availability": false},
        "extraData": {"brand": "Logi"}
    });
    Mock::given(method("GET"))
        .and(path("/api/product/101"))
        .respond_with(ResponseTemplate::new(200).set_body_json(record.clone()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/shopify/create_product"))
        .and(body_json(record))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;
    let app = test_app(&server);
    let cookie = login(&app).await;

    open_catalog(&app, &cookie).await;
    send(&app, post_form("/catalog/category", &cookie, "category=7")).await;
    send(&app, post_form("/catalog/products", &cookie, "subcategory=70")).await;

    let (status, _, modal) = send(&app, get("/catalog/products/101", &cookie)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(modal.contains("Out of stock"));
    assert!(modal.contains("Logi"));
    assert!(modal.contains("<p>Ergonómico</p>"));
    assert!(!modal.contains("<script>"));

    // The displayed record is reused, so the detail endpoint is hit once.
    let (_, _, alert) = send(&app, post_form("/catalog/products/101/shopify", &cookie, "")).await;
    assert!(alert.contains("The product was sent to Shopify."));
}

// ---------------------------------------------------------------------------
// Bulk submission
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_bulk_submission_reports_each_product_once() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_catalog(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/shopify/create_products"))
        .and(body_json(json!({"product_ids": ["101", "102"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": [
            {"product_id": 101, "shopify_product_id": 555},
            {"product_id": 102, "status": "error", "error": "Duplicated SKU"}
        ]})))
        .expect(1)
        .mount(&server)
        .await;
    let app = test_app(&server);
    let cookie = login(&app).await;

    select_both_products(&app, &cookie).await;

    let (status, _, modal) = send(&app, post_form("/catalog/submissions", &cookie, "")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(modal.contains("batch-progress"));

    let result = wait_for_batch_result(&app, &cookie).await;

    assert!(result.contains("Product 101 - Shopify product 555"), "got: {result}");
    assert!(result.contains("Product 102 failed: Duplicated SKU"));
    assert!(result.contains("0 products selected"));

    // The result is shown once.
    let (_, _, after) = send(&app, get("/catalog/submissions/current", &cookie)).await;
    assert!(after.trim().is_empty());
}

#[tokio::test]
async fn test_bulk_submission_outlasting_request_timeout_shows_results() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_catalog(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/shopify/create_products"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_secs(2))
                .set_body_json(json!({"results": [
                    {"product_id": 101, "shopify_product_id": 555},
                    {"product_id": 102, "shopify_product_id": 556}
                ]})),
        )
        .expect(1)
        .mount(&server)
        .await;
    let config = config_for(
        &server.uri(),
        &[("BACKEND_TIMEOUT_SECS", "1"), ("BULK_TIMEOUT_SECS", "30")],
    )
    .expect("test config");
    let app = catalog_sync_admin::app(AppState::new(config).expect("test state"));
    let cookie = login(&app).await;
    select_both_products(&app, &cookie).await;

    send(&app, post_form("/catalog/submissions", &cookie, "")).await;
    let result = wait_for_batch_result(&app, &cookie).await;

    assert!(result.contains("Product 101 - Shopify product 555"), "got: {result}");
    assert!(result.contains("Product 102 - Shopify product 556"));
    assert!(!result.contains(BATCH_FAILURE_MESSAGE));
    assert!(result.contains("0 products selected"));
}

#[tokio::test]
async fn test_failed_bulk_submission_keeps_selection() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_catalog(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/shopify/create_products"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    let app = test_app(&server);
    let cookie = login(&app).await;
    select_both_products(&app, &cookie).await;

    send(&app, post_form("/catalog/submissions", &cookie, "")).await;
    let result = wait_for_batch_result(&app, &cookie).await;

    assert!(result.contains(BATCH_FAILURE_MESSAGE), "got: {result}");
    assert!(result.contains("2 products selected"));
    assert!(result.contains("Finished after"));

    // Both rows are still checked, so unchecking one leaves the other.
    let (status, _, bulk) = send(
        &app,
        post_form("/catalog/selection/toggle", &cookie, "product_id=101"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(bulk.contains("1 product selected"));
}

#[tokio::test]
async fn test_reload_during_submission_shows_progress() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_catalog(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/shopify/create_products"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_secs(1))
                .set_body_json(json!({"results": [
                    {"product_id": 101, "shopify_product_id": 555},
                    {"product_id": 102, "shopify_product_id": 556}
                ]})),
        )
        .mount(&server)
        .await;
    let app = test_app(&server);
    let cookie = login(&app).await;
    select_both_products(&app, &cookie).await;

    send(&app, post_form("/catalog/submissions", &cookie, "")).await;
    let (status, _, page) = send(&app, get("/catalog", &cookie)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("id=\"batch-progress\""));
    assert!(page.contains("hx-get=\"/catalog/submissions/current\""));

    let result = wait_for_batch_result(&app, &cookie).await;
    assert!(result.contains("Product 101 - Shopify product 555"), "got: {result}");
}

#[tokio::test]
async fn test_bulk_submission_without_selection_warns() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_catalog(&server).await;
    let app = test_app(&server);
    let cookie = login(&app).await;

    open_catalog(&app, &cookie).await;
    send(&app, post_form("/catalog/category", &cookie, "category=7")).await;
    send(&app, post_form("/catalog/products", &cookie, "subcategory=70")).await;

    let (status, _, body) = send(&app, post_form("/catalog/submissions", &cookie, "")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Select at least one product to send."));
}

// ---------------------------------------------------------------------------
// Daily report
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_report_panel_shows_summary_and_detail() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"ID": "A1", "Title": "Cable HDMI", "Stock": "0", "Changes": "3", "Brand": "Acme"}
        ])))
        .mount(&server)
        .await;
    let app = test_app(&server);
    let cookie = login(&app).await;

    let (status, _, panel) = send(&app, get("/reports?date=2025-03-05", &cookie)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(panel.contains("1 item with changes"));
    assert!(panel.contains("Cable HDMI"));
    assert!(panel.contains("/reports/2025-03-05/rows/A1"));

    let (_, _, detail) = send(&app, get("/reports/2025-03-05/rows/A1", &cookie)).await;
    assert!(detail.contains("Cable HDMI"));
    assert!(detail.contains("Acme"));
}

#[tokio::test]
async fn test_report_failure_shows_no_data_message() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/data"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "no file"})))
        .mount(&server)
        .await;
    let app = test_app(&server);
    let cookie = login(&app).await;

    let (_, _, panel) = send(&app, get("/reports?date=2025-03-05", &cookie)).await;

    assert!(panel.contains("No data found for this date."));
}
