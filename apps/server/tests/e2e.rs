use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use mealbox_config::{AppConfig, InboxConfig};
use mealbox_database::{
    ConversationProfile, ConversationRepository, CreateCategoryRequest, CategoryRepository,
    MessageRepository,
};
use mealbox_gateway::{build_router, GatewayState};
use mealbox_runtime::BackendServices;
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
        let db_path = db_dir.path().join("mealbox-test.db");
        let db_url = format!("sqlite://{}", db_path.to_string_lossy());

        let mut config = AppConfig::default();
        config.database.url = db_url;
        config.database.max_connections = 5;

        let services = BackendServices::initialise(&config)
            .await
            .expect("initialise backend services");

        let state = GatewayState::new(services.db_pool.clone(), InboxConfig::default());
        let router = build_router(state);

        Self {
            router,
            pool: services.db_pool.clone(),
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
        let text = String::from_utf8(bytes.to_vec()).unwrap_or_default();
        let json = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        TestResponse { status, json }
    }

    async fn create_category(&self, name: &str) -> String {
        let response = self
            .request(Method::POST, "/api/categories", Some(json!({ "name": name })))
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
        response.json["id"].as_str().expect("category id").to_string()
    }

    async fn category_names_in_order(&self) -> Vec<String> {
        let response = self.request(Method::GET, "/api/categories", None).await;
        assert_eq!(response.status, StatusCode::OK);
        response.json.as_array().expect("array response")
            .iter()
            .map(|entry| entry["name"].as_str().expect("name").to_string())
            .collect()
    }
}

#[tokio::test]
async fn health_check_responds_ok() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/health", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json["status"], "ok");
}

#[tokio::test]
async fn reorder_applies_submitted_relative_ordering() {
    let app = TestApp::new().await;

    let a = app.create_category("Soups").await;
    let b = app.create_category("Salads").await;
    let c = app.create_category("Mains").await;

    let response = app
        .request(
            Method::PUT,
            "/api/categories/reorder",
            Some(json!({
                "items": [
                    { "id": a, "order": 3 },
                    { "id": b, "order": 1 },
                    { "id": c, "order": 2 },
                ]
            })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json["success"], true);

    assert_eq!(
        app.category_names_in_order().await,
        vec!["Salads", "Mains", "Soups"]
    );
}

#[tokio::test]
async fn reorder_with_empty_items_is_rejected_without_writes() {
    let app = TestApp::new().await;

    app.create_category("Soups").await;

    let response = app
        .request(
            Method::PUT,
            "/api/categories/reorder",
            Some(json!({ "items": [] })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    assert_eq!(app.category_names_in_order().await, vec!["Soups"]);
}

#[tokio::test]
async fn reorder_with_non_array_items_is_a_bad_request() {
    let app = TestApp::new().await;

    app.create_category("Soups").await;

    let response = app
        .request(
            Method::PUT,
            "/api/categories/reorder",
            Some(json!({ "items": "not-a-list" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let missing = app
        .request(Method::PUT, "/api/categories/reorder", Some(json!({})))
        .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn reorder_with_unknown_id_fails_and_rolls_back() {
    let app = TestApp::new().await;

    let a = app.create_category("Soups").await;
    let b = app.create_category("Salads").await;

    let response = app
        .request(
            Method::PUT,
            "/api/categories/reorder",
            Some(json!({
                "items": [
                    { "id": a, "order": 2 },
                    { "id": "no-such-record", "order": 1 },
                    { "id": b, "order": 3 },
                ]
            })),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    // The whole batch rolled back; the original ordering is intact.
    assert_eq!(app.category_names_in_order().await, vec!["Soups", "Salads"]);
}

#[tokio::test]
async fn create_appends_after_current_maximum_order() {
    let app = TestApp::new().await;

    let first = app.create_category("Soups").await;

    sqlx::query("UPDATE categories SET sort_order = 5 WHERE public_id = ?")
        .bind(&first)
        .execute(&app.pool)
        .await
        .unwrap();

    let response = app
        .request(Method::POST, "/api/categories", Some(json!({ "name": "Salads" })))
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.json["sort_order"], 6);
}

#[tokio::test]
async fn duplicate_restaurant_name_maps_to_bad_request() {
    let app = TestApp::new().await;

    let first = app
        .request(
            Method::POST,
            "/api/restaurants",
            Some(json!({ "name": "Green Bowl" })),
        )
        .await;
    assert_eq!(first.status, StatusCode::CREATED);

    let duplicate = app
        .request(
            Method::POST,
            "/api/restaurants",
            Some(json!({ "name": "Green Bowl" })),
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::BAD_REQUEST);
    assert!(duplicate.json["message"]
        .as_str()
        .unwrap_or_default()
        .contains("already exists"));
}

async fn seed_conversation_with_unread(app: &TestApp, platform_user_id: &str, name: &str, unread: usize) -> String {
    let conversations = ConversationRepository::new(app.pool.clone());
    let messages = MessageRepository::new(app.pool.clone());

    let conversation = conversations
        .upsert_by_platform_user(&ConversationProfile {
            platform_user_id: platform_user_id.to_string(),
            display_name: name.to_string(),
            picture_url: None,
            status_text: None,
        })
        .await
        .unwrap();

    for index in 0..unread {
        messages
            .record_incoming(conversation.id, &format!("message {index}"))
            .await
            .unwrap();
    }

    conversation.public_id
}

#[tokio::test]
async fn viewing_a_conversation_clears_its_unread_signal() {
    let app = TestApp::new().await;

    let conversation_id = seed_conversation_with_unread(&app, "U100", "Ada", 3).await;

    let before = app.request(Method::GET, "/api/unread", None).await;
    assert_eq!(before.json["unreadCount"], 3);

    let detail = app
        .request(
            Method::GET,
            &format!("/api/conversations/{conversation_id}"),
            None,
        )
        .await;
    assert_eq!(detail.status, StatusCode::OK);
    assert_eq!(detail.json["conversation"]["unread_count"], 0);
    assert_eq!(detail.json["messages"].as_array().unwrap().len(), 3);

    let after = app.request(Method::GET, "/api/unread", None).await;
    assert_eq!(after.json["unreadCount"], 0);

    let unread_flags: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM messages WHERE direction = 'incoming' AND is_read = 0",
    )
    .fetch_one(&app.pool)
    .await
    .unwrap();
    assert_eq!(unread_flags.0, 0);
}

#[tokio::test]
async fn unknown_conversation_is_not_found() {
    let app = TestApp::new().await;

    let response = app
        .request(Method::GET, "/api/conversations/no-such-thread", None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn total_unread_is_zero_with_no_conversations() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/api/unread", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json["unreadCount"], 0);
}

#[tokio::test]
async fn conversation_list_filters_by_display_name() {
    let app = TestApp::new().await;

    seed_conversation_with_unread(&app, "U100", "Ada Lovelace", 1).await;
    seed_conversation_with_unread(&app, "U200", "Bob", 1).await;

    let all = app.request(Method::GET, "/api/conversations", None).await;
    assert_eq!(all.json.as_array().unwrap().len(), 2);

    let filtered = app
        .request(Method::GET, "/api/conversations?search=love", None)
        .await;
    let entries = filtered.json.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["display_name"], "Ada Lovelace");
    assert_eq!(entries[0]["last_message"]["content"], "message 0");
}

#[tokio::test]
async fn message_pagination_honours_the_before_cursor() {
    let app = TestApp::new().await;

    let conversation_id = seed_conversation_with_unread(&app, "U100", "Ada", 3).await;

    // Pin the timestamps so the cursor has a stable boundary.
    for (index, created_at) in [
        "2024-01-01T00:00:00Z",
        "2024-01-02T00:00:00Z",
        "2024-01-03T00:00:00Z",
    ]
    .iter()
    .enumerate()
    {
        sqlx::query("UPDATE messages SET created_at = ? WHERE content = ?")
            .bind(created_at)
            .bind(format!("message {index}"))
            .execute(&app.pool)
            .await
            .unwrap();
    }

    let page = app
        .request(
            Method::GET,
            &format!(
                "/api/conversations/{conversation_id}?before=2024-01-03T00:00:00Z&limit=10"
            ),
            None,
        )
        .await;
    assert_eq!(page.status, StatusCode::OK);

    let contents: Vec<_> = page.json["messages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["content"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(contents, vec!["message 0", "message 1"]);
}

#[tokio::test]
async fn sending_a_message_records_it_as_outgoing() {
    let app = TestApp::new().await;

    let conversation_id = seed_conversation_with_unread(&app, "U100", "Ada", 0).await;

    let response = app
        .request(
            Method::POST,
            &format!("/api/conversations/{conversation_id}/messages"),
            Some(json!({ "content": "your order is ready" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.json["direction"], "outgoing");
    assert_eq!(response.json["is_read"], true);

    // Outgoing messages never add to the unread counter.
    let unread = app.request(Method::GET, "/api/unread", None).await;
    assert_eq!(unread.json["unreadCount"], 0);
}

#[tokio::test]
async fn food_listing_follows_category_scope_and_order() {
    let app = TestApp::new().await;

    let category = app.create_category("Mains").await;
    let other = app.create_category("Desserts").await;

    for (name, target) in [("Burger", &category), ("Ramen", &category), ("Cake", &other)] {
        let response = app
            .request(
                Method::POST,
                "/api/foods",
                Some(json!({
                    "category": target,
                    "name": name,
                    "price_cents": 1000,
                    "calories": 500,
                })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
    }

    let scoped = app
        .request(Method::GET, &format!("/api/foods?category={category}"), None)
        .await;
    let names: Vec<_> = scoped
        .json
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Burger", "Ramen"]);
}

#[tokio::test]
async fn category_repository_is_reachable_from_the_binary_crate() {
    // The seed command drives the repositories directly; keep that path warm.
    let app = TestApp::new().await;

    let repo = CategoryRepository::new(app.pool.clone());
    let created = repo
        .create(&CreateCategoryRequest {
            name: "Sides".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(created.sort_order, 1);
}
