//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::FromRef,
    http::{header, HeaderName, Method},
    middleware,
    routing::{get, patch, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{AuthService, ReservationService};
use crate::domain::RepositoryProvider;
use crate::interfaces::http::common::ApiResponse;
use crate::interfaces::http::middleware::{identity_middleware, USER_ID_HEADER};
use crate::interfaces::http::modules::health::HealthState;
use crate::interfaces::http::modules::metrics::{http_metrics_middleware, MetricsState};
use crate::interfaces::http::modules::request_id::{request_id_middleware, REQUEST_ID_HEADER};

use super::modules::{admin, auth, health, metrics, reservations};

/// Shared state for every route. Handlers that need less extract their
/// own state via `FromRef`.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub reservations: Arc<ReservationService>,
    pub health: HealthState,
    pub metrics: MetricsState,
}

impl AppState {
    pub fn new(
        db: DatabaseConnection,
        repos: Arc<dyn RepositoryProvider>,
        prometheus: PrometheusHandle,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            auth: Arc::new(AuthService::new(repos.clone()).with_bcrypt_cost(bcrypt_cost)),
            reservations: Arc::new(ReservationService::new(repos)),
            health: HealthState {
                db,
                started_at: Arc::new(Instant::now()),
            },
            metrics: MetricsState { handle: prometheus },
        }
    }
}

impl FromRef<AppState> for HealthState {
    fn from_ref(s: &AppState) -> Self {
        s.health.clone()
    }
}

impl FromRef<AppState> for MetricsState {
    fn from_ref(s: &AppState) -> Self {
        s.metrics.clone()
    }
}

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "user_id",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                    "X-User-ID",
                    "Id of the signed-in user, as returned by register or login",
                ))),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        reservations::create_reservation,
        reservations::my_reservations,
        reservations::cancel_reservation,
        admin::list_reservations,
        admin::confirm_reservation,
        admin::cancel_reservation,
    ),
    components(
        schemas(
            ApiResponse,
            health::HealthResponse,
            health::ComponentHealth,
            auth::RegisterRequest,
            auth::LoginRequest,
            auth::UserDto,
            reservations::CreateReservationRequest,
            reservations::ReservationDto,
            reservations::ReservationOwnerDto,
            reservations::AdminReservationDto,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Server health check"),
        (name = "Authentication", description = "Registration and login"),
        (name = "Reservations", description = "Reservations of the signed-in user"),
        (name = "Administration", description = "Reservation management for administrators"),
    ),
    info(
        title = "Vesuvio Reservations API",
        version = "1.0.0",
        description = "Table reservations for the Vesuvio restaurant",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(USER_ID_HEADER)])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
}

/// Create the API router with all routes
pub fn create_api_router(state: AppState) -> Router {
    // Public routes
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/metrics", get(metrics::prometheus_metrics))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login));

    // Routes that need X-User-ID
    let protected_routes = Router::new()
        .route("/reservations", post(reservations::create_reservation))
        .route(
            "/reservations/{id}/cancel",
            patch(reservations::cancel_reservation),
        )
        .route("/my/reservations", get(reservations::my_reservations))
        .route("/admin/reservations", get(admin::list_reservations))
        .route(
            "/admin/reservations/{id}/confirm",
            patch(admin::confirm_reservation),
        )
        .route(
            "/admin/reservations/{id}/cancel",
            patch(admin::cancel_reservation),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            identity_middleware,
        ));

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        .merge(swagger_routes)
        .merge(public_routes)
        .merge(protected_routes)
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use sea_orm_migration::MigratorTrait;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::application::SeedUser;
    use crate::infrastructure::crypto::password::MIN_COST;
    use crate::infrastructure::database::migrator::Migrator;
    use crate::infrastructure::database::{init_database, DatabaseConfig};
    use crate::infrastructure::database::SeaOrmRepositoryProvider;

    const ADMIN_ID: i32 = 1;

    async fn app() -> Router {
        let db = init_database(&DatabaseConfig::in_memory()).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        let repos = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
        let handle = PrometheusBuilder::new().build_recorder().handle();
        let state = AppState::new(db, repos, handle, MIN_COST);
        state
            .auth
            .seed_users(&[SeedUser {
                name: "Admin".into(),
                email: "admin@vesuvio.local".into(),
                password: "admin".into(),
                is_admin: true,
            }])
            .await
            .unwrap();
        create_api_router(state)
    }

    async fn call(
        app: &Router,
        method: &str,
        uri: &str,
        user: Option<i32>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(id) = user {
            req = req.header(USER_ID_HEADER, id.to_string());
        }
        let req = match body {
            Some(b) => req
                .header("content-type", "application/json")
                .body(Body::from(b.to_string()))
                .unwrap(),
            None => req.body(Body::empty()).unwrap(),
        };
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    async fn register(app: &Router, name: &str, email: &str) -> i32 {
        let (status, body) = call(
            app,
            "POST",
            "/auth/register",
            None,
            Some(json!({"name": name, "email": email, "password": "pw"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_i64().unwrap() as i32
    }

    async fn reserve(app: &Router, user: i32, date: &str, time: &str) -> Value {
        let (status, body) = call(
            app,
            "POST",
            "/reservations",
            Some(user),
            Some(json!({"date": date, "time": time, "people": 2})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body
    }

    #[tokio::test]
    async fn register_then_login() {
        let app = app().await;

        let (status, body) = call(
            &app,
            "POST",
            "/auth/register",
            None,
            Some(json!({"name": "Ann", "email": " Ann@Example.com ", "password": "pw"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["email"], "ann@example.com");
        assert_eq!(body["is_admin"], false);
        assert!(body.get("password_hash").is_none());

        let (status, body) = call(
            &app,
            "POST",
            "/auth/register",
            None,
            Some(json!({"name": "Ann", "email": "ann@example.com", "password": "x"})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "conflict");
        assert_eq!(body["error"], "email already exists");
        assert_eq!(body["success"], false);

        let (status, body) = call(
            &app,
            "POST",
            "/auth/login",
            None,
            Some(json!({"email": "ann@example.com", "password": "wrong"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "authentication_error");

        let (status, body) = call(
            &app,
            "POST",
            "/auth/login",
            None,
            Some(json!({"email": "ann@example.com", "password": "pw"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Ann");
    }

    #[tokio::test]
    async fn register_with_empty_fields_is_rejected() {
        let app = app().await;
        let (status, body) = call(
            &app,
            "POST",
            "/auth/register",
            None,
            Some(json!({"name": "", "email": "", "password": ""})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "validation_error");

        let (status, _) = call(
            &app,
            "POST",
            "/auth/register",
            None,
            Some(json!({"name": "Bo", "email": "no-at-sign", "password": "pw"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn reservation_lifecycle_over_http() {
        let app = app().await;
        let guest = register(&app, "Guest", "guest@example.com").await;

        let created = reserve(&app, guest, "2025-12-25", "20:00").await;
        assert_eq!(created["status"], "pending");
        assert_eq!(created["date"], "2025-12-25");
        assert_eq!(created["time"], "20:00");
        assert_eq!(created["user_id"], guest);
        let id = created["id"].as_i64().unwrap();

        let (status, list) = call(&app, "GET", "/my/reservations", Some(guest), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.as_array().unwrap().len(), 1);

        let (status, body) = call(
            &app,
            "PATCH",
            &format!("/admin/reservations/{id}/confirm"),
            Some(ADMIN_ID),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "confirmed");

        let (status, body) = call(
            &app,
            "PATCH",
            &format!("/reservations/{id}/cancel"),
            Some(guest),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "cancelled");

        let (status, body) = call(
            &app,
            "PATCH",
            &format!("/reservations/{id}/cancel"),
            Some(guest),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "invalid_state");

        let (status, list) = call(
            &app,
            "GET",
            "/my/reservations?status=cancelled",
            Some(guest),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn zero_people_is_a_validation_error() {
        let app = app().await;
        let guest = register(&app, "Guest", "guest@example.com").await;
        let (status, body) = call(
            &app,
            "POST",
            "/reservations",
            Some(guest),
            Some(json!({"date": "2025-12-25", "time": "20:00", "people": 0})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "validation_error");

        let (status, _) = call(
            &app,
            "POST",
            "/reservations",
            Some(guest),
            Some(json!({"date": "2025-12-25", "time": "20:00", "people": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn identity_header_is_required() {
        let app = app().await;

        let (status, body) = call(&app, "GET", "/my/reservations", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "authentication_error");

        let (status, _) = call(&app, "GET", "/my/reservations", Some(999), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn customers_cannot_use_admin_routes() {
        let app = app().await;
        let guest = register(&app, "Guest", "guest@example.com").await;
        let id = reserve(&app, guest, "2025-12-25", "20:00").await["id"]
            .as_i64()
            .unwrap();

        for (method, uri) in [
            ("GET", "/admin/reservations".to_string()),
            ("PATCH", format!("/admin/reservations/{id}/confirm")),
            ("PATCH", format!("/admin/reservations/{id}/cancel")),
        ] {
            let (status, body) = call(&app, method, &uri, Some(guest), None).await;
            assert_eq!(status, StatusCode::FORBIDDEN, "{method} {uri}");
            assert_eq!(body["code"], "authorization_error");
        }
    }

    #[tokio::test]
    async fn other_customers_cannot_cancel() {
        let app = app().await;
        let owner = register(&app, "Owner", "owner@example.com").await;
        let other = register(&app, "Other", "other@example.com").await;
        let id = reserve(&app, owner, "2025-12-25", "20:00").await["id"]
            .as_i64()
            .unwrap();

        let (status, _) = call(
            &app,
            "PATCH",
            &format!("/reservations/{id}/cancel"),
            Some(other),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = call(
            &app,
            "PATCH",
            &format!("/admin/reservations/{id}/cancel"),
            Some(ADMIN_ID),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "cancelled");
    }

    #[tokio::test]
    async fn bad_ids_and_filters_are_rejected() {
        let app = app().await;
        let guest = register(&app, "Guest", "guest@example.com").await;

        let (status, _) = call(&app, "PATCH", "/reservations/abc/cancel", Some(guest), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = call(&app, "PATCH", "/reservations/0/cancel", Some(guest), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) =
            call(&app, "PATCH", "/reservations/4242/cancel", Some(guest), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "not_found");

        let (status, _) = call(
            &app,
            "GET",
            "/my/reservations?status=archived",
            Some(guest),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(
            &app,
            "GET",
            "/admin/reservations?date=25-12-2025",
            Some(ADMIN_ID),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn admin_list_embeds_owner_and_filters() {
        let app = app().await;
        let ann = register(&app, "Ann", "ann@example.com").await;
        let bob = register(&app, "Bob", "bob@example.com").await;
        let christmas = reserve(&app, ann, "2025-12-25", "20:00").await;
        reserve(&app, bob, "2025-12-24", "19:30").await;

        let (status, list) = call(&app, "GET", "/admin/reservations", Some(ADMIN_ID), None).await;
        assert_eq!(status, StatusCode::OK);
        let list = list.as_array().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0]["user"]["name"], "Bob");
        assert_eq!(list[1]["user"]["email"], "ann@example.com");
        assert_eq!(list[1]["id"], christmas["id"]);

        let (_, filtered) = call(
            &app,
            "GET",
            "/admin/reservations?date=2025-12-25&status=pending",
            Some(ADMIN_ID),
            None,
        )
        .await;
        let filtered = filtered.as_array().unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0]["user"]["id"], ann);

        let (_, none) = call(
            &app,
            "GET",
            "/admin/reservations?status=confirmed",
            Some(ADMIN_ID),
            None,
        )
        .await;
        assert!(none.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn confirm_twice_is_invalid_state() {
        let app = app().await;
        let guest = register(&app, "Guest", "guest@example.com").await;
        let id = reserve(&app, guest, "2025-12-25", "20:00").await["id"]
            .as_i64()
            .unwrap();
        let uri = format!("/admin/reservations/{id}/confirm");

        let (status, _) = call(&app, "PATCH", &uri, Some(ADMIN_ID), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, body) = call(&app, "PATCH", &uri, Some(ADMIN_ID), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "invalid_state");
    }

    #[tokio::test]
    async fn ambient_endpoints_respond() {
        let app = app().await;

        let (status, body) = call(&app, "GET", "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["database"]["status"], "ok");

        let (status, doc) = call(&app, "GET", "/api-doc/openapi.json", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(doc["paths"]["/admin/reservations"].is_object());

        let resp = app
            .clone()
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().contains_key(REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn cors_preflight_allows_identity_header() {
        let app = app().await;
        let resp = app
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/reservations")
                    .header("origin", "http://localhost:5173")
                    .header("access-control-request-method", "POST")
                    .header("access-control-request-headers", "content-type,x-user-id")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let allowed = resp
            .headers()
            .get("access-control-allow-headers")
            .unwrap()
            .to_str()
            .unwrap()
            .to_ascii_lowercase();
        assert!(allowed.contains("x-user-id"));
    }
}
