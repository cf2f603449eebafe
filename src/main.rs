use axum::{routing::get, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use quadmeet_api::config;
use quadmeet_api::database::manager::DatabaseManager;
use quadmeet_api::handlers;
use quadmeet_api::middleware::jwt_auth_middleware;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();

    tracing_subscriber::fmt::init();
    tracing::info!("Starting QuadMeet API in {:?} mode", config.environment);

    // A missing database at boot is not fatal; /health reports degraded
    // and requests fail individually until it comes back.
    if config.database.run_migrations_on_startup {
        if let Err(e) = DatabaseManager::migrate().await {
            tracing::error!("Startup migration failed: {}", e);
        }
    }

    let app = app();

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("QuadMeet API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // User routes; registration and login are the public entry points
        .merge(user_routes())
        // Event routes, all behind the session middleware
        .merge(event_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn user_routes() -> Router {
    use axum::routing::post;
    use handlers::users;

    // POST /api/users shares its path with protected methods, so the
    // protected handlers authenticate via the AuthUser extractor
    // instead of a route_layer.
    Router::new()
        .route("/api/users", post(users::user_create).get(users::user_list))
        .route("/api/users/login", post(users::user_login))
        .route(
            "/api/users/:id",
            get(users::user_get)
                .put(users::user_update)
                .delete(users::user_delete),
        )
}

fn event_routes() -> Router {
    use axum::routing::post;
    use handlers::events;

    Router::new()
        // Collection and document operations
        .route("/api/events", post(events::event_create).get(events::event_list))
        .route(
            "/api/events/:id",
            get(events::event_get)
                .put(events::event_update)
                .delete(events::event_delete),
        )
        // Membership
        .route(
            "/api/events/:id/attend",
            post(events::event_attend).delete(events::event_leave),
        )
        // Chat
        .route("/api/events/:id/messages", post(events::event_post_message))
        .route_layer(axum::middleware::from_fn(jwt_auth_middleware))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "name": "QuadMeet API",
        "version": version,
        "description": "Campus social events backend with attendance and per-event chat",
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "register": "POST /api/users (public)",
            "login": "POST /api/users/login (public)",
            "users": "/api/users[/:id] (session required)",
            "events": "/api/events[/:id] (session required)",
            "attendance": "POST|DELETE /api/events/:id/attend (session required)",
            "messages": "POST /api/events/:id/messages (session required)",
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                axum::http::StatusCode::SERVICE_UNAVAILABLE,
                axum::response::Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable"
                })),
            )
        }
    }
}
