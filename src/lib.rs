use axum::{Router, extract::FromRef, http::HeaderName};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod routes;

// --- Public Re-exports ---

pub use config::AppConfig;
pub use error::{CatalogError, CatalogResult};
pub use repository::{MemoryRepository, PostgresRepository, RepositoryState};

/// ApiDoc
///
/// Aggregates the catalog handlers and schemas into the OpenAPI document
/// served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::list_authors, handlers::list_books, handlers::list_publishers,
        handlers::get_author, handlers::get_book, handlers::get_publisher,
        handlers::update_author, handlers::update_publisher, handlers::update_book,
        handlers::create_author, handlers::create_publisher, handlers::create_book,
        handlers::delete_author, handlers::delete_publisher, handlers::delete_book,
    ),
    components(
        schemas(
            models::Author, models::Publisher, models::Book,
            models::AuthorInput, models::PublisherInput,
            models::UpdateAuthorRequest, models::UpdatePublisherRequest, models::UpdateBookRequest,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "lms-catalog", description = "Library catalog of authors, books and publishers")
    )
)]
pub struct ApiDoc;

/// AppState
///
/// Shared, immutable state handed to every request: the catalog repository
/// and the loaded configuration.
#[derive(Clone)]
pub struct AppState {
    /// Persistence layer, Postgres or in-memory depending on configuration.
    pub repo: RepositoryState,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(repo: RepositoryState, config: AppConfig) -> Self {
        Self { repo, config }
    }
}

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles the catalog routes, the documentation UI and the observability
/// middleware, and registers the application state.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(routes::service_routes())
        .merge(routes::catalog::catalog_routes())
        .with_state(state);

    // Request id generation runs first so the trace span can record it.
    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Builds the per-request span: HTTP method, URI and the `x-request-id`
/// assigned by `SetRequestIdLayer`.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
