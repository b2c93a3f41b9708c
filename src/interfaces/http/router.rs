//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::FromRef, middleware, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::common::ErrorResponse;
use super::modules::health::{self, HealthState};
use super::modules::metrics::{http_metrics_middleware, prometheus_metrics, MetricsState};
use super::modules::request_id::request_id_middleware;
use super::modules::users::{self, UserHandlerState};
use crate::application::{DirectoryService, ResponsePayload};
use crate::domain::User;
use crate::interfaces::web;

/// Shared state for every route. Handlers extract their own slice via `FromRef`.
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<DirectoryService<User>>,
    /// `None` when running on the in-memory backend.
    pub db: Option<DatabaseConnection>,
    pub started_at: Arc<Instant>,
}

impl AppState {
    pub fn new(directory: Arc<DirectoryService<User>>, db: Option<DatabaseConnection>) -> Self {
        Self {
            directory,
            db,
            started_at: Arc::new(Instant::now()),
        }
    }
}

impl FromRef<AppState> for UserHandlerState {
    fn from_ref(s: &AppState) -> Self {
        UserHandlerState {
            directory: Arc::clone(&s.directory),
        }
    }
}

impl FromRef<AppState> for web::WebState {
    fn from_ref(s: &AppState) -> Self {
        web::WebState {
            directory: Arc::clone(&s.directory),
        }
    }
}

impl FromRef<AppState> for HealthState {
    fn from_ref(s: &AppState) -> Self {
        HealthState {
            db: s.db.clone(),
            started_at: Arc::clone(&s.started_at),
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(health::health_check, users::list_users),
    components(schemas(
        ErrorResponse,
        ResponsePayload,
        users::UserDto,
        health::HealthResponse,
        health::ComponentHealth,
    )),
    tags(
        (name = "Users", description = "Paginated user directory"),
        (name = "Health", description = "Service health")
    ),
    info(title = "User Directory API", version = "0.1.0")
)]
pub struct ApiDoc;

/// Build the application router.
///
/// `/metrics` is only mounted when a Prometheus handle is supplied.
pub fn create_api_router(state: AppState, prometheus: Option<PrometheusHandle>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app_routes = Router::new()
        .route("/", get(web::directory_page))
        .route("/users", get(users::list_users))
        .route("/health", get(health::health_check))
        .with_state(state);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    let mut router = Router::new().merge(swagger_routes).merge(app_routes);

    if let Some(handle) = prometheus {
        router = router.merge(
            Router::new()
                .route("/metrics", get(prometheus_metrics))
                .with_state(MetricsState { handle }),
        );
    }

    router
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DomainError, DomainResult, RecordStore, Slice};
    use crate::infrastructure::InMemoryUserStore;
    use crate::interfaces::http::modules::request_id::REQUEST_ID_HEADER;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, HeaderMap, Request, StatusCode};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::Value;
    use tower::ServiceExt;

    struct UnreachableStore;

    #[async_trait]
    impl RecordStore for UnreachableStore {
        type Record = User;

        async fn find(&self, _offset: u64, _count: u64) -> DomainResult<Slice<User>> {
            Err(DomainError::StoreUnavailable("connection refused".into()))
        }
    }

    fn app_with(
        store: Arc<dyn RecordStore<Record = User>>,
        prometheus: Option<PrometheusHandle>,
    ) -> Router {
        let directory = Arc::new(DirectoryService::new(store));
        create_api_router(AppState::new(directory, None), prometheus)
    }

    fn app(count: u32) -> Router {
        app_with(Arc::new(InMemoryUserStore::with_demo_users(count)), None)
    }

    async fn get_raw(router: Router, uri: &str) -> (StatusCode, HeaderMap, String) {
        let resp = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
        let (status, _, body) = get_raw(router, uri).await;
        (status, serde_json::from_str(&body).unwrap())
    }

    #[tokio::test]
    async fn list_users_returns_stable_shape() {
        let (status, body) = get_json(app(23), "/users?page=3&limit=10").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 23);
        assert_eq!(body["page"], 3);
        assert_eq!(body["limit"], 10);
        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 3);
        let first = data[0].as_object().unwrap();
        for key in ["id", "firstname", "lastname", "email", "phone", "updatedAt"] {
            assert!(first.contains_key(key), "missing {key}");
        }
        assert!(!first.contains_key("createdAt"));
    }

    #[tokio::test]
    async fn list_users_defaults_without_query() {
        let (status, body) = get_json(app(15), "/users").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["page"], 1);
        assert_eq!(body["limit"], 10);
        assert_eq!(body["data"].as_array().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn list_users_normalizes_garbage() {
        let (status, body) = get_json(app(15), "/users?page=abc&limit=-5").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["page"], 1);
        assert_eq!(body["limit"], 10);
    }

    #[tokio::test]
    async fn list_users_past_the_end_is_empty() {
        let (status, body) = get_json(app(50), "/users?page=99").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], serde_json::json!([]));
        assert_eq!(body["total"], 50);
        assert_eq!(body["page"], 99);
    }

    #[tokio::test]
    async fn health_reports_memory_backend() {
        let (status, body) = get_json(app(0), "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["storage"]["backend"], "memory");
    }

    #[tokio::test]
    async fn request_id_is_echoed() {
        let resp = app(1)
            .oneshot(
                Request::builder()
                    .uri("/users")
                    .header(REQUEST_ID_HEADER, "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.headers()[REQUEST_ID_HEADER], "abc-123");
    }

    #[tokio::test]
    async fn openapi_document_lists_users_path() {
        let (status, body) = get_json(app(0), "/api-doc/openapi.json").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/users"].is_object());
    }

    #[tokio::test]
    async fn list_users_repeated_keys_use_first_value() {
        let (status, body) = get_json(app(23), "/users?page=1&page=2&limit=5&limit=x").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["page"], 1);
        assert_eq!(body["limit"], 5);
        assert_eq!(body["data"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn list_users_store_failure_is_json_503() {
        let (status, body) = get_json(app_with(Arc::new(UnreachableStore), None), "/users").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn metrics_are_not_mounted_without_handle() {
        let (status, _, _) = get_raw(app(1), "/metrics").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn metrics_are_labelled_by_matched_route() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let _local = metrics::set_default_local_recorder(&recorder);
        let router = app_with(
            Arc::new(InMemoryUserStore::with_demo_users(80)),
            Some(recorder.handle()),
        );

        let (status, _, _) = get_raw(router.clone(), "/users?page=7").await;
        assert_eq!(status, StatusCode::OK);
        let (status, _, _) = get_raw(router.clone(), "/no/such/route").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, headers, text) = get_raw(router, "/metrics").await;
        assert_eq!(status, StatusCode::OK);
        assert!(headers[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/plain; version=0.0.4"));

        let users_line = text
            .lines()
            .find(|l| l.starts_with("http_requests_total{") && l.contains("path=\"/users\""))
            .expect("no request counter for /users");
        assert!(users_line.contains("status=\"200\""));
        assert!(!text.contains("page=7"));

        let unmatched_line = text
            .lines()
            .find(|l| l.starts_with("http_requests_total{") && l.contains("path=\"unmatched\""))
            .expect("no request counter for unmatched routes");
        assert!(unmatched_line.contains("status=\"404\""));

        assert!(text.contains("http_request_duration_seconds"));
        assert!(text.contains("directory_list_requests_total{outcome=\"ok\"} 1"));
        assert!(!text.contains("http_server_errors_total"));
    }

    #[tokio::test]
    async fn server_errors_are_counted() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let _local = metrics::set_default_local_recorder(&recorder);
        let router = app_with(Arc::new(UnreachableStore), Some(recorder.handle()));

        let (status, _, _) = get_raw(router.clone(), "/users").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        let (_, _, text) = get_raw(router, "/metrics").await;
        assert!(text.contains("http_server_errors_total{path=\"/users\"} 1"));
        assert!(text.contains("directory_list_requests_total{outcome=\"store_error\"} 1"));
    }
}
