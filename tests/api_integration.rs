//! HTTP API integration tests
//!
//! Requests go through the full router (middleware included) via
//! `tower::ServiceExt::oneshot`, without binding a socket.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tokio_test::assert_ok;
use tower::ServiceExt;

use tako_template_service::config::Settings;
use tako_template_service::server::{create_app, AppState};

fn app() -> Router {
    create_app(AppState::new(Settings::default()))
}

fn app_with(configure: impl FnOnce(&mut Settings)) -> Router {
    let mut settings = Settings::default();
    configure(&mut settings);
    create_app(AppState::new(settings))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    };

    let response = assert_ok!(app.clone().oneshot(assert_ok!(request)).await);
    let status = response.status();
    let bytes = assert_ok!(to_bytes(response.into_body(), usize::MAX).await);
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::String(
            String::from_utf8_lossy(&bytes).into_owned(),
        ))
    };

    (status, value)
}

// =============================================================================
// Health & Metrics
// =============================================================================

mod health_tests {
    use super::*;

    #[tokio::test]
    async fn test_health_reports_helpers_and_templates() {
        let app = app();
        let (status, body) = send(&app, Method::GET, "/health", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["helpers"], 22);
        assert_eq!(body["templates"]["total"], 0);
        assert_eq!(body["templates"]["by_channel"]["email"], 0);
    }

    #[tokio::test]
    async fn test_metrics_exposition() {
        let app = app();
        send(
            &app,
            Method::POST,
            "/api/v1/engine/validate",
            Some(json!({"content": "{{amount}}", "channel": "push"})),
        )
        .await;

        let response = assert_ok!(
            app.clone()
                .oneshot(assert_ok!(Request::builder().uri("/metrics").body(Body::empty())))
                .await
        );
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4; charset=utf-8"
        );

        let (status, body) = send(&app, Method::GET, "/metrics", None).await;
        assert_eq!(status, StatusCode::OK);
        let text = body.as_str().unwrap_or_default();
        assert!(text.contains("tako_template_validations_total"));
        assert!(text.contains("tako_templates_stored"));
    }
}

// =============================================================================
// Engine
// =============================================================================

mod engine_tests {
    use super::*;

    #[tokio::test]
    async fn test_validate_endpoint() {
        let app = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/engine/validate",
            Some(json!({
                "content": "Olá {{user.name}}, {{formatCurrency amount}}",
                "channel": "whatsapp"
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["is_valid"], true);
        assert_eq!(body["variables"], json!(["user.name"]));
    }

    #[tokio::test]
    async fn test_validate_reports_errors_in_body() {
        let app = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/engine/validate",
            Some(json!({
                "content": "abcdef",
                "channel": "email",
                "options": {"max_length": 3}
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["is_valid"], false);
        assert_eq!(body["errors"].as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn test_validate_unknown_channel() {
        let app = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/engine/validate",
            Some(json!({"content": "x", "channel": "sms"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "UNKNOWN_CHANNEL");
    }

    #[tokio::test]
    async fn test_render_endpoint() {
        let app = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/engine/render",
            Some(json!({
                "content": "{{capitalize category}}: {{formatCurrency amount}}",
                "data": {"category": "ALIMENTAÇÃO", "amount": 150.75}
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["content"], "Alimentação: R$\u{a0}150,75");
    }

    #[tokio::test]
    async fn test_render_uses_configured_strictness() {
        let app = app_with(|s| s.templates.strict_rendering = true);

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/engine/render",
            Some(json!({"content": "Olá {{name}}", "data": {}})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "RENDER_ERROR");

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/engine/render",
            Some(json!({"content": "Olá {{name}}", "data": {}, "strict_mode": false})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["content"], "Olá ");
    }

    #[tokio::test]
    async fn test_preview_endpoint() {
        let app = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/engine/preview",
            Some(json!({
                "name": "Resumo",
                "channel": "email",
                "content": "Resumo de {{user.name}}\n<p>{{company}}</p>"
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["template"]["language"], "pt-BR");
        assert_eq!(body["processed"]["subject"], "Resumo de João Silva");
        assert_eq!(body["original_data"]["company"], "Meu Tako");
    }

    #[tokio::test]
    async fn test_preview_render_failure() {
        let app = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/engine/preview",
            Some(json!({"name": "x", "channel": "push", "content": "{{#if a}}{{/each}}"})),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "PREVIEW_ERROR");
    }

    #[tokio::test]
    async fn test_variables_endpoint() {
        let app = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/engine/variables",
            Some(json!({"content": "{{#each items}}{{name}}{{/each}} {{#repeat 2}}{{/repeat}} {{amount}}"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["variables"], json!(["name", "amount"]));
        assert_eq!(body["helpers"], json!(["repeat"]));
    }

    #[tokio::test]
    async fn test_example_data_endpoint() {
        let app = app();

        let (status, body) = send(&app, Method::GET, "/api/v1/engine/example-data/push", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Nova transação");
        assert_eq!(body["amount"], 150.75);

        let (status, body) = send(&app, Method::GET, "/api/v1/engine/example-data/sms", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.get("title").is_none());
        assert_eq!(body["user"]["name"], "João Silva");
    }

    #[tokio::test]
    async fn test_helpers_endpoint() {
        let app = app();
        let (status, body) = send(&app, Method::GET, "/api/v1/engine/helpers", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 22);
        let helpers = body["helpers"].as_array().cloned().unwrap_or_default();
        assert!(helpers.contains(&json!("formatCurrency")));
        assert!(helpers.contains(&json!("url")));
    }

    #[tokio::test]
    async fn test_body_limit() {
        let app = app_with(|s| s.templates.max_body_bytes = 128);
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/v1/engine/variables",
            Some(json!({"content": "x".repeat(512)})),
        )
        .await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }
}

// =============================================================================
// Template Catalogue
// =============================================================================

mod catalogue_tests {
    use super::*;

    async fn create(app: &Router, name: &str, channel: &str, content: &str) -> Value {
        let (status, body) = send(
            app,
            Method::POST,
            "/api/v1/templates",
            Some(json!({"name": name, "channel": channel, "content": content})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body
    }

    #[tokio::test]
    async fn test_template_lifecycle() {
        let app = app();
        let created = create(&app, "Nova transação", "whatsapp", "Olá {{user.name}}").await;
        let id = created["id"].as_str().unwrap_or_default().to_string();
        assert_eq!(created["variables"], json!(["user.name"]));
        assert_eq!(created["is_active"], true);

        let uri = format!("/api/v1/templates/{}", id);
        let (status, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Nova transação");

        let (status, body) = send(
            &app,
            Method::PUT,
            &uri,
            Some(json!({"content": "{{description}} {{amount}}"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["variables"], json!(["description", "amount"]));

        let (status, body) = send(&app, Method::PUT, &format!("{}/toggle-active", uri), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["is_active"], false);

        let (status, body) = send(&app, Method::POST, &format!("{}/duplicate", uri), None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["name"], "Nova transação_copy");
        assert_ne!(body["id"], created["id"]);

        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "TEMPLATE_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_list_filters() {
        let app = app();
        create(&app, "Limite", "push", "Limite de {{category}}").await;
        create(&app, "Resumo", "email", "<html>Resumo mensal</html>").await;

        let (status, body) = send(&app, Method::GET, "/api/v1/templates", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 2);

        let (_, body) = send(&app, Method::GET, "/api/v1/templates?channel=push", None).await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["templates"][0]["name"], "Limite");

        let (_, body) = send(&app, Method::GET, "/api/v1/templates?search=mensal", None).await;
        assert_eq!(body["templates"][0]["name"], "Resumo");

        let (_, body) = send(&app, Method::GET, "/api/v1/templates?active=false", None).await;
        assert_eq!(body["total"], 0);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_content() {
        let app = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/templates",
            Some(json!({"name": "Longo", "channel": "push", "content": "a".repeat(201)})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_TEMPLATE");
    }

    #[tokio::test]
    async fn test_stored_template_preview() {
        let app = app();
        let created = create(&app, "Meta", "push", "{{title}} - {{action}}").await;
        let uri = format!(
            "/api/v1/templates/{}/preview",
            created["id"].as_str().unwrap_or_default()
        );

        let (status, body) = send(&app, Method::POST, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["processed"]["content"], "Nova transação - Ver detalhes");

        let (status, body) = send(
            &app,
            Method::POST,
            &uri,
            Some(json!({"data": {"title": "Meta", "action": "Abrir"}})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["processed"]["content"], "Meta - Abrir");
    }

    #[tokio::test]
    async fn test_stored_preview_rejects_malformed_body() {
        let app = app();
        let created = create(&app, "Meta", "push", "{{title}}").await;
        let uri = format!(
            "/api/v1/templates/{}/preview",
            created["id"].as_str().unwrap_or_default()
        );

        let request = assert_ok!(Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json")));
        let response = assert_ok!(app.clone().oneshot(request).await);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = assert_ok!(to_bytes(response.into_body(), usize::MAX).await);
        let body: Value = assert_ok!(serde_json::from_slice(&bytes));
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_unknown_template_returns_404() {
        let app = app();
        let (status, _) = send(&app, Method::POST, "/api/v1/templates/missing/duplicate", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::PUT, "/api/v1/templates/missing/toggle-active", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
