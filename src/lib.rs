use axum::{
    extract::{FromRef, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
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

// Core application services and components.
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod passwords;
pub mod repository;
pub mod seed;
pub mod store;

// Module for routing segregation (Public, Authenticated).
pub mod routes;
use auth::AuthUser; // The resolved authenticated session identity.
use routes::{authenticated, public};

// --- Public Re-exports ---

// Makes core state types easily accessible to the main application entry point (main.rs).
pub use config::{AppConfig, Env};
pub use error::ApiError;
pub use repository::{Repositories, Repository};
pub use store::{DynDocumentStore, MemoryStore, MongoStore};

/// ApiDoc
///
/// Auto-generates the OpenAPI documentation (Swagger JSON) for the
/// application. It aggregates all API paths and data schemas decorated with
/// the `#[utoipa::path]` and `#[derive(utoipa::ToSchema)]` macros.
/// The resulting JSON is served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    // List all handler functions here for documentation generation.
    paths(
        handlers::api_status, handlers::signup, handlers::login, handlers::logout,
        handlers::get_universes, handlers::create_universe, handlers::get_universe,
        handlers::filter_universes_by_genre, handlers::get_stories,
        handlers::get_story_chapter, handlers::create_story, handlers::update_story,
        handlers::get_characters, handlers::create_character, handlers::get_lore,
        handlers::create_lore, handlers::get_clubs, handlers::create_club,
        handlers::join_club, handlers::get_forum_posts, handlers::get_forum_post,
        handlers::create_forum_post, handlers::create_forum_reply,
        handlers::get_challenges, handlers::create_challenge, handlers::get_profile,
        handlers::update_profile
    ),
    // List all models (schemas) used in the request/response bodies.
    components(
        schemas(
            models::Role, models::UniverseType, models::Genre, models::UniverseStatus,
            models::StoryStatus, models::CharacterRole, models::LoreCategory,
            models::ClubType, models::ForumCategory, models::ChallengeType,
            models::Universe, models::Story, models::Character, models::LoreEntry,
            models::Club, models::ForumPost, models::ForumReply, models::Challenge,
            models::SignupRequest, models::LoginRequest, models::CreateUniverseRequest,
            models::CreateStoryRequest, models::CreateCharacterRequest,
            models::CreateLoreEntryRequest, models::CreateClubRequest,
            models::CreateForumPostRequest, models::CreateForumReplyRequest,
            models::CreateChallengeRequest, models::UpdateProfileRequest,
            models::PublicUser, models::UserProfile, models::AuthResponse,
            models::MessageResponse, models::StatusResponse, models::UniverseGroups,
            models::ForumPostDetail, error::ErrorResponse,
        )
    ),
    tags(
        (name = "fictionverse", description = "The Fictionverse community API")
    )
)]
struct ApiDoc;

/// AppState
///
/// Implements the **Unified State Pattern**: the single, thread-safe,
/// immutable container holding all essential application services and
/// configuration, shared across all incoming requests.
#[derive(Clone)]
pub struct AppState {
    /// Repository Layer: typed collection access over the document store.
    pub repo: Repositories,
    /// Configuration: the loaded, immutable environment configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

// These let handlers and extractors pull individual components out of the
// shared AppState instead of taking the whole thing.

impl FromRef<AppState> for Repositories {
    fn from_ref(app_state: &AppState) -> Repositories {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// auth_middleware
///
/// Enforces a valid session on the `authenticated_routes`.
///
/// *Mechanism*: it extracts `AuthUser` from the request. Since `AuthUser`
/// implements `FromRequestParts`, a missing/expired/invalid token rejects the
/// request with the matching 401 body before the handler runs. On success the
/// request proceeds unchanged; handlers re-extract the identity themselves.
async fn auth_middleware(_auth_user: AuthUser, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// create_router
///
/// Assembles the application's entire routing structure, applies global and
/// scoped middleware, and registers the application state.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for Request Correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. API Router Assembly
    // Public routes carry no middleware; authenticated routes sit behind the
    // session layer. Both live under the /api prefix.
    let api_router = public::public_routes().merge(
        authenticated::authenticated_routes().route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        )),
    );

    let base_router = Router::new()
        // Documentation: serve the auto-generated Swagger UI.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // GET /health
        // Unauthenticated liveness probe for load balancers, outside /api.
        .route("/health", get(|| async { "ok" }))
        // The whole application surface, prefixed.
        .nest("/api", api_router)
        // Apply the Unified State to all routes.
        .with_state(state);

    // 3. Observability and Correlation Layers (applied outermost/first)
    base_router
        .layer(
            ServiceBuilder::new()
                // 3a. Request ID Generation: a unique UUID for every incoming request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // 3b. Request Tracing: wraps the request/response lifecycle in a
                // tracing span carrying the generated request ID.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // 3c. Request ID Propagation: returns the x-request-id header to
                // the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // 4. CORS Layer
        .layer(cors)
}

/// trace_span_logger
///
/// Helper used by `TraceLayer` to customize span creation. It extracts the
/// `x-request-id` header (if present) and includes it in the structured
/// logging metadata alongside the HTTP method and URI, so every log line for
/// a single request is correlated by a unique ID.
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
