use fictionverse_api::{
    config::{AppConfig, Env},
    create_router, seed, AppState, DynDocumentStore, MongoStore, Repositories,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// The asynchronous entry point, responsible for initializing all core
/// components: Configuration, Logging, the Document Store, seed content, and
/// the HTTP server.
#[tokio::main]
async fn main() {
    // 1. Configuration & Environment Loading (Fail-Fast)
    // Loads .env file settings before configuration can be read.
    dotenv::dotenv().ok();
    // AppConfig::load() implements the fail-fast principle for missing Production secrets.
    let config = AppConfig::load();

    // 2. Logging Filter Setup
    // Sets the default log level. It prioritizes the RUST_LOG environment
    // variable, falling back to sensible defaults for local development.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "fictionverse_api=debug,tower_http=info,axum=trace".into());

    // 3. Initialize Logging based on Environment
    // Pretty output for humans locally, JSON for log aggregators in Production.
    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    // 4. Document Store Initialization (MongoDB)
    // Connects and pings the deployment so a bad URL fails here, then applies
    // the unique indexes the application relies on.
    let store = MongoStore::connect(&config.mongo_url, &config.db_name)
        .await
        .expect("FATAL: Failed to connect to MongoDB. Check MONGO_URL.");
    store
        .ensure_indexes()
        .await
        .expect("FATAL: Failed to create MongoDB indexes.");

    let store: DynDocumentStore = Arc::new(store);
    let repo = Repositories::new(&store);

    // 5. Seed Content
    // Idempotent: only empty collections receive fixtures.
    seed::run(&repo)
        .await
        .expect("FATAL: Failed to seed initial content.");

    // 6. Unified State Assembly
    let app_state = AppState { repo, config };

    // 7. Router and Server Startup
    let app = create_router(app_state);

    // Binds the TCP listener and initiates the HTTP server.
    let listener = TcpListener::bind("0.0.0.0:3000").await.unwrap();

    tracing::info!("HTTP server bound successfully.");
    tracing::info!("Listening on 0.0.0.0:3000");
    tracing::info!("API Documentation (Swagger UI) available at: http://localhost:3000/swagger-ui");

    // The long-running Axum server process.
    axum::serve(listener, app).await.unwrap();
}
