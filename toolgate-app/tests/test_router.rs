use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use toolgate_app::bootstrap::build_state;
use toolgate_app::config::{ApiKeyConfig, Config, SeedAdmin};
use toolgate_app::router;
use toolgate_policy::Role;
use tower::ServiceExt;

const ADMIN_KEY: &str = "admin-key-123";
const USER_KEY: &str = "user-key-456";

async fn app() -> Router {
    let mut config = Config::default();
    config.auth.api_keys = vec![
        ApiKeyConfig {
            id: "admin".into(),
            key: ADMIN_KEY.into(),
            role: Role::Admin,
        },
        ApiKeyConfig {
            id: "user".into(),
            key: USER_KEY.into(),
            role: Role::User,
        },
    ];
    config.seed.admin = Some(SeedAdmin {
        email: "admin@example.com".into(),
        password: "password1".into(),
        name: "Admin".into(),
    });
    router(build_state(&config).await.unwrap())
}

fn request(method: Method, uri: &str, key: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(key) = key {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {key}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn health_needs_no_credentials() {
    let app = app().await;
    let response = app
        .oneshot(request(Method::GET, "/health", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn missing_or_unknown_key_is_unauthorized() {
    let app = app().await;
    let (status, body) = send(&app, request(Method::GET, "/mcp", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, _) = send(&app, request(Method::GET, "/mcp", Some("nope"), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn user_role_can_list_but_not_execute() {
    let app = app().await;
    let (status, body) = send(&app, request(Method::GET, "/mcp", Some(USER_KEY), None)).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<_> = body["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids[0], "user_tool");
    assert!(ids.contains(&"user_delete".to_string()));

    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/mcp",
            Some(USER_KEY),
            Some(json!({"tool": "user_tool", "inputs": {"userId": "1"}})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");

    let (status, _) = send(&app, request(Method::DELETE, "/mcp", Some(USER_KEY), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_executes_user_tool() {
    let app = app().await;
    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/mcp",
            Some(ADMIN_KEY),
            Some(json!({"tool": "user_tool", "inputs": {"userId": "1"}})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["success"], true);
    assert_eq!(body["result"]["data"]["email"], "admin@example.com");
    assert_eq!(body["result"]["data"]["role"], "ADMIN");
}

#[tokio::test]
async fn gateway_errors_map_to_status_codes() {
    let app = app().await;
    let post = |body: Value| request(Method::POST, "/mcp", Some(ADMIN_KEY), Some(body));

    let (status, body) = send(&app, post(json!({"tool": "missing_tool"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_TOOL");
    assert_eq!(body["message"], "Invalid tool: missing_tool");

    let (status, body) = send(
        &app,
        post(json!({"tool": "user_tool", "inputs": {"userId": "abc"}})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");
    assert_eq!(body["errors"][0]["field"], "userId");

    let (status, body) = send(
        &app,
        post(json!({"tool": "user_tool", "inputs": {"userId": "99"}})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let app = app().await;
    let req = Request::builder()
        .method(Method::POST)
        .uri("/mcp")
        .header(header::AUTHORIZATION, format!("Bearer {ADMIN_KEY}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn delete_resets_sessions() {
    let app = app().await;
    let (status, body) = send(
        &app,
        request(Method::DELETE, "/mcp?sessionId=abc", Some(ADMIN_KEY), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));

    let (status, body) = send(&app, request(Method::DELETE, "/mcp", Some(ADMIN_KEY), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));
}

#[tokio::test]
async fn malformed_reset_query_is_bad_request() {
    let app = app().await;
    let (status, body) = send(
        &app,
        request(
            Method::DELETE,
            "/mcp?sessionId=a&sessionId=b",
            Some(ADMIN_KEY),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
    assert!(body["message"].as_str().unwrap().contains("sessionId"));
}
