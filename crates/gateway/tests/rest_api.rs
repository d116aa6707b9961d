use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use mentorlink_config::AppConfig;
use mentorlink_gateway::{create_router, GatewayState};
use mentorlink_runtime::BackendServices;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    pool: SqlitePool,
    _db_dir: TempDir,
}

struct TestResponse {
    status: StatusCode,
    json: Value,
}

impl TestApp {
    async fn new() -> Self {
        let db_dir = TempDir::new().expect("create temp dir");
        let db_path = db_dir.path().join("mentorlink-test.db");

        let mut config = AppConfig::default();
        config.database.url = format!("sqlite://{}", db_path.to_string_lossy());
        config.database.max_connections = 5;
        config.storage.public_base_url = "https://cdn.example.com/storage".to_string();

        let services = BackendServices::initialise(&config)
            .await
            .expect("initialise backend services");

        let state = GatewayState::new(services.db_pool.clone(), config.storage, &config.relay);
        let router = create_router(state);

        Self {
            router,
            pool: services.db_pool,
            _db_dir: db_dir,
        }
    }

    async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let app = self.router.clone();
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json_body) = body {
            let bytes = serde_json::to_vec(&json_body).expect("serialize request body");
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(bytes)
        } else {
            Body::empty()
        };

        let response = app
            .oneshot(builder.body(body).expect("build request"))
            .await
            .expect("dispatch request");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("collect response body")
            .to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse { status, json }
    }

    /// Profiles are externally provisioned in production; tests seed them
    /// directly since the public API only reads them.
    async fn seed_profile(&self, email: &str, role: &str, avatar: Option<&str>) -> String {
        let local_part = email.split('@').next().unwrap();
        let public_id = format!("profile-{local_part}");
        let now = "2026-08-27T00:00:00+00:00";
        sqlx::query(
            "INSERT INTO profiles (public_id, email, display_name, role, avatar_path, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&public_id)
        .bind(email)
        .bind(local_part)
        .bind(role)
        .bind(avatar)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .expect("seed profile");
        public_id
    }
}

#[tokio::test]
async fn health_check_reports_ok() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json["status"], "ok");
}

#[tokio::test]
async fn find_profile_by_email_resolves_avatar_url() {
    let app = TestApp::new().await;
    app.seed_profile("maya@example.com", "mentor", Some("avatars/maya.png"))
        .await;

    let response = app
        .request(Method::GET, "/api/profiles?email=maya@example.com", None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json["id"], "profile-maya");
    assert_eq!(response.json["role"], "mentor");
    assert_eq!(
        response.json["avatar_url"],
        "https://cdn.example.com/storage/avatars/maya.png"
    );
}

#[tokio::test]
async fn unknown_profile_lookups_return_not_found() {
    let app = TestApp::new().await;

    let by_email = app
        .request(Method::GET, "/api/profiles?email=ghost@example.com", None)
        .await;
    assert_eq!(by_email.status, StatusCode::NOT_FOUND);

    let by_id = app.request(Method::GET, "/api/profiles/ghost", None).await;
    assert_eq!(by_id.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn profile_query_without_email_is_a_bad_request() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/api/profiles", None).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn stored_messages_come_back_as_a_conversation() {
    let app = TestApp::new().await;

    let first = app
        .request(
            Method::POST,
            "/api/messages",
            Some(json!({"sender_id": "u1", "receiver_id": "u2", "content": "hi"})),
        )
        .await;
    assert_eq!(first.status, StatusCode::CREATED);
    assert!(first.json["id"].as_str().is_some());

    let reply = app
        .request(
            Method::POST,
            "/api/messages",
            Some(json!({"sender_id": "u2", "receiver_id": "u1", "content": "hello"})),
        )
        .await;
    assert_eq!(reply.status, StatusCode::CREATED);

    let history = app
        .request(Method::GET, "/api/messages?user_a=u1&user_b=u2", None)
        .await;
    assert_eq!(history.status, StatusCode::OK);

    let contents: Vec<&str> = history.json
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["content"].as_str().unwrap())
        .collect();
    assert_eq!(contents, vec!["hi", "hello"]);
}

#[tokio::test]
async fn message_to_self_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/messages",
            Some(json!({"sender_id": "u1", "receiver_id": "u1", "content": "hi"})),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn connection_lifecycle_create_accept_list() {
    let app = TestApp::new().await;
    let mentor = app.seed_profile("maya@example.com", "mentor", None).await;
    let student = app.seed_profile("sam@example.com", "student", None).await;

    let created = app
        .request(
            Method::POST,
            "/api/connections",
            Some(json!({"mentor_id": mentor, "student_id": student})),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.json["status"], "pending");
    let connection_id = created.json["id"].as_str().unwrap().to_string();

    let accepted = app
        .request(
            Method::POST,
            &format!("/api/connections/{connection_id}/respond"),
            Some(json!({"status": "accepted"})),
        )
        .await;
    assert_eq!(accepted.status, StatusCode::OK);
    assert_eq!(accepted.json["status"], "accepted");

    let listed = app
        .request(
            Method::GET,
            &format!("/api/connections?participant={student}&status=accepted"),
            None,
        )
        .await;
    assert_eq!(listed.status, StatusCode::OK);
    let list = listed.json.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["partner"]["id"], mentor);
}

#[tokio::test]
async fn responding_with_pending_or_garbage_is_rejected() {
    let app = TestApp::new().await;
    let mentor = app.seed_profile("maya@example.com", "mentor", None).await;
    let student = app.seed_profile("sam@example.com", "student", None).await;

    let created = app
        .request(
            Method::POST,
            "/api/connections",
            Some(json!({"mentor_id": mentor, "student_id": student})),
        )
        .await;
    let connection_id = created.json["id"].as_str().unwrap().to_string();

    let pending = app
        .request(
            Method::POST,
            &format!("/api/connections/{connection_id}/respond"),
            Some(json!({"status": "pending"})),
        )
        .await;
    assert_eq!(pending.status, StatusCode::BAD_REQUEST);

    let garbage = app
        .request(
            Method::POST,
            &format!("/api/connections/{connection_id}/respond"),
            Some(json!({"status": "maybe"})),
        )
        .await;
    assert_eq!(garbage.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn responding_to_a_missing_connection_is_not_found() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/connections/does-not-exist/respond",
            Some(json!({"status": "accepted"})),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
