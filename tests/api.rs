use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

use catalog_api::routes::{app, AppState};

/// Router over a lazy pool: no connection is made until a handler actually
/// queries, so authentication and routing behavior is testable without a
/// live database.
fn test_app() -> Router {
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://localhost/catalog_api_test")
        .expect("lazy pool");
    app(AppState { pool })
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    serde_json::from_slice(&bytes).expect("JSON body")
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

#[tokio::test]
async fn authentication_issues_token_on_both_versions() {
    for version in ["v1", "v2"] {
        let response = test_app()
            .oneshot(json_request(
                "POST",
                &format!("/api/{}/Authentication", version),
                r#"{"UserName": "any string", "Password": "any string"}"#,
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK, "version {}", version);
        let body = body_json(response).await;
        let token = body["token"].as_str().expect("token field");
        assert!(!token.is_empty());
    }
}

#[tokio::test]
async fn authentication_rejects_null_user() {
    let response = test_app()
        .oneshot(json_request("POST", "/api/v1/Authentication", "null"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn v2_state_probe_is_anonymous() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/api/v2/Authentication")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    let text = String::from_utf8(bytes.to_vec()).expect("utf8");
    assert!(text.contains("listening"));
}

#[tokio::test]
async fn catalog_routes_require_bearer_token() {
    for (method, uri) in [
        ("GET", "/api/v1/Categories"),
        ("GET", "/api/v1/Categories/products"),
        ("GET", "/api/v1/Categories/1"),
        ("GET", "/api/v2/Products"),
        ("GET", "/api/v1/Products/price"),
        ("DELETE", "/api/v1/Products/6"),
    ] {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "{} {}",
            method,
            uri
        );
        let body = body_json(response).await;
        assert_eq!(body["code"], "UNAUTHORIZED");
    }
}

#[tokio::test]
async fn garbage_bearer_token_is_rejected() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/api/v1/Categories")
                .header(header::AUTHORIZATION, "Bearer not-a-real-token")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

async fn bearer_token() -> String {
    let response = test_app()
        .oneshot(json_request(
            "POST",
            "/api/v1/Authentication",
            r#"{"UserName": "alice", "Password": "irrelevant"}"#,
        ))
        .await
        .expect("response");
    body_json(response).await["token"]
        .as_str()
        .expect("token")
        .to_string()
}

#[tokio::test]
async fn issued_token_passes_the_auth_middleware() {
    let token = bearer_token().await;

    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/api/v1/Categories")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    // The request reaches the handler; whether the backing database is up
    // only changes the downstream status, never the auth verdict
    assert_ne!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn update_rejects_mismatched_route_and_body_ids() {
    let token = bearer_token().await;

    for (uri, body) in [
        (
            "/api/v1/Categories/5",
            r#"{"categoryId": 6, "name": "Drinks", "imageUrl": "drinks.jpg"}"#,
        ),
        (
            "/api/v1/Products/5",
            r#"{"productId": 6, "name": "Espresso", "description": "Double shot",
                "price": "3.50", "imageUrl": "espresso.jpg", "categoryId": 1}"#,
        ),
    ] {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri(uri)
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .expect("request"),
            )
            .await
            .expect("response");

        // The mismatch check runs before any query, so no database is needed
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
        let body = body_json(response).await;
        assert_eq!(body["code"], "BAD_REQUEST");
    }
}

#[tokio::test]
async fn malformed_json_body_is_a_bad_request() {
    let response = test_app()
        .oneshot(json_request("POST", "/api/v1/Authentication", "{not json"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "BAD_REQUEST");

    let token = bearer_token().await;
    let response = test_app()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/v1/Categories/5")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"categoryId": "#))
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/api-docs/openapi.json")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["paths"]["/api/v1/Categories"].is_object());
    assert!(body["paths"]["/api/v1/Products/price"].is_object());
    assert_eq!(body["info"]["title"], "Catalog API");
}

#[tokio::test]
async fn root_lists_endpoints() {
    let response = test_app()
        .oneshot(Request::builder().uri("/").body(Body::empty()).expect("request"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["name"], "Catalog API");
}

#[tokio::test]
async fn health_reports_database_status() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    // OK with a database, degraded without one; both are valid liveness answers
    assert!(
        response.status() == StatusCode::OK
            || response.status() == StatusCode::SERVICE_UNAVAILABLE,
        "unexpected status: {}",
        response.status()
    );
    let body = body_json(response).await;
    assert!(body["status"].is_string());
}
