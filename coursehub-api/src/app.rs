/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use coursehub_api::{app::{build_router, AppState}, config::Config};
/// use coursehub_shared::store::memory::MemoryStore;
///
/// # async fn example() -> anyhow::Result<()> {
/// let state = AppState::new(Arc::new(MemoryStore::new()), Config::in_memory());
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError, middleware::security::SecurityHeadersLayer};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
    Router,
};
use coursehub_shared::{auth::middleware::authenticate, store::Store};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Built once in `main` and cloned into every handler via `State`.
#[derive(Clone)]
pub struct AppState {
    /// Users and courses
    pub store: Arc<dyn Store>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET /health                 # Liveness + store connectivity
/// └── /api/
///     ├── /courses/
///     │   ├── GET    /            # List courses with owners
///     │   ├── POST   /            # Create course        (Basic auth)
///     │   ├── GET    /:id         # One course
///     │   ├── PUT    /:id         # Update, owner only   (Basic auth)
///     │   └── DELETE /:id         # Delete, owner only   (Basic auth)
///     └── /users/
///         ├── GET    /            # Current user         (Basic auth)
///         └── POST   /            # Register
/// ```
///
/// # Middleware Stack
///
/// Outermost first: security headers, CORS, request tracing, then Basic
/// authentication on the protected method routes only.
pub fn build_router(state: AppState) -> Router {
    use crate::routes::{courses, health, users};

    let public_routes = Router::new()
        .route("/courses", get(courses::list_courses))
        .route("/courses/:id", get(courses::get_course))
        .route("/users", post(users::create_user));

    let protected_routes = Router::new()
        .route("/courses", post(courses::create_course))
        .route(
            "/courses/:id",
            put(courses::update_course).delete(courses::delete_course),
        )
        .route("/users", get(users::get_current_user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            basic_auth_layer,
        ));

    let api_routes = public_routes.merge(protected_routes);

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config))
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.allows_any_origin() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .expose_headers([header::LOCATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}

/// Basic authentication middleware layer
///
/// Resolves the `Authorization` header to a stored user and injects the
/// resulting `AuthContext` into request extensions.
async fn basic_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // Request bodies are not Sync, so the headers are copied out before awaiting
    let headers = req.headers().clone();
    let auth_context = authenticate(state.store.as_ref(), &headers).await?;

    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
