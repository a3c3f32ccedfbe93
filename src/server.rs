//! # Server Configuration
//!
//! Router assembly, shared state and the OpenAPI document.

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post, put},
};
use sea_orm::DatabaseConnection;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::auth_middleware;
use crate::config::AppConfig;
use crate::credentials::CredentialService;
use crate::handlers;
use crate::telemetry::{TRACE_ID_HEADER, trace_id_middleware};

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: DatabaseConnection,
    pub credentials: Arc<CredentialService>,
}

impl AppState {
    /// Build state from validated configuration and an open pool.
    pub fn new(config: AppConfig, db: DatabaseConnection) -> anyhow::Result<Self> {
        let token_config = config
            .token_config()
            .context("Token signing is not configured")?;

        Ok(Self {
            config: Arc::new(config),
            db,
            credentials: Arc::new(CredentialService::new(token_config)),
        })
    }
}

/// Creates and configures the Axum application router
pub fn create_app(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/auth/me", get(handlers::auth::me))
        .route(
            "/api/students",
            get(handlers::students::list_students).post(handlers::students::create_student),
        )
        .route(
            "/api/students/{id}",
            put(handlers::students::update_student).delete(handlers::students::delete_student),
        )
        .route(
            "/api/departments",
            get(handlers::departments::list_departments)
                .post(handlers::departments::create_department),
        )
        .route(
            "/api/departments/{id}",
            put(handlers::departments::update_department)
                .delete(handlers::departments::delete_department),
        )
        .route(
            "/api/employees",
            get(handlers::employees::list_employees).post(handlers::employees::create_employee),
        )
        .route(
            "/api/employees/{id}",
            axum::routing::delete(handlers::employees::delete_employee),
        )
        .route(
            "/api/attendance",
            get(handlers::attendance::list_attendance)
                .post(handlers::attendance::mark_attendance),
        )
        .route(
            "/api/attendance/history",
            get(handlers::attendance::attendance_history),
        )
        .route("/api/dashboard/stats", get(handlers::dashboard::stats))
        .route("/api/dashboard/weekly", get(handlers::dashboard::weekly))
        .route(
            "/api/settings",
            get(handlers::settings::get_settings).put(handlers::settings::update_settings),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let cors = cors_layer(&state.config);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/api/auth/signup", post(handlers::auth::signup))
        .route("/api/auth/login", post(handlers::auth::login))
        .merge(protected)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id_middleware))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .expose_headers([TRACE_ID_HEADER]);

    if config.cors_allows_any_origin() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}

/// Starts the server with the given configuration
pub async fn run_server(config: AppConfig, db: DatabaseConnection) -> anyhow::Result<()> {
    let addr = config
        .bind_addr()
        .with_context(|| format!("Invalid server address: {}", config.api_bind_addr))?;
    let profile = config.profile.clone();

    let app = create_app(AppState::new(config, db)?);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(%addr, %profile, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::health,
        crate::handlers::auth::signup,
        crate::handlers::auth::login,
        crate::handlers::auth::me,
        crate::handlers::students::list_students,
        crate::handlers::students::create_student,
        crate::handlers::students::update_student,
        crate::handlers::students::delete_student,
        crate::handlers::departments::list_departments,
        crate::handlers::departments::create_department,
        crate::handlers::departments::update_department,
        crate::handlers::departments::delete_department,
        crate::handlers::employees::list_employees,
        crate::handlers::employees::create_employee,
        crate::handlers::employees::delete_employee,
        crate::handlers::attendance::mark_attendance,
        crate::handlers::attendance::list_attendance,
        crate::handlers::attendance::attendance_history,
        crate::handlers::dashboard::stats,
        crate::handlers::dashboard::weekly,
        crate::handlers::settings::get_settings,
        crate::handlers::settings::update_settings,
    ),
    components(
        schemas(
            crate::models::ServiceInfo,
            crate::models::Role,
            crate::models::AttendanceStatus,
            crate::error::ApiError,
            crate::handlers::HealthStatus,
            crate::services::auth::SignupRequest,
            crate::services::auth::LoginRequest,
            crate::services::auth::TokenResponse,
            crate::services::auth::UserProfile,
            crate::services::students::StudentRequest,
            crate::services::students::StudentResponse,
            crate::services::departments::DepartmentRequest,
            crate::services::departments::DepartmentResponse,
            crate::services::employees::EmployeeRequest,
            crate::services::employees::EmployeeResponse,
            crate::services::attendance::AttendanceEntry,
            crate::services::attendance::MarkAttendanceRequest,
            crate::services::attendance::AttendanceResponse,
            crate::services::attendance::StudentSummary,
            crate::services::dashboard::DashboardStats,
            crate::services::dashboard::WeeklyEntry,
            crate::services::settings::CustomLabels,
            crate::services::settings::SettingsResponse,
            crate::services::settings::SettingsUpdateRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Company registration and login"),
        (name = "students", description = "Student records"),
        (name = "departments", description = "Departments"),
        (name = "employees", description = "Employee accounts"),
        (name = "attendance", description = "Daily attendance"),
        (name = "dashboard", description = "Attendance statistics"),
        (name = "settings", description = "Theme and custom labels"),
    ),
    info(
        title = "AttendTrack API",
        description = "Multi-tenant attendance tracking",
        version = env!("CARGO_PKG_VERSION"),
    )
)]
pub struct ApiDoc;
