use std::env;

/// AppConfig
///
/// Holds the application's entire configuration state. This struct is designed to be
/// immutable once loaded, ensuring consistency across all threads and services
/// (e.g., Repositories, Auth Gateway). It is pulled into the application state via
/// FromRef, embodying the "immutable AppConfig" part of the Unified State Pattern.
#[derive(Clone)]
pub struct AppConfig {
    // MongoDB connection string.
    pub mongo_url: String,
    // Name of the MongoDB database holding all Fictionverse collections.
    pub db_name: String,
    // Runtime environment marker. Controls logging format and secret fallbacks.
    pub env: Env,
    // Symmetric secret used to sign and validate session tokens (HS256).
    // Loaded once at startup and never rotated within a running process.
    pub jwt_secret: String,
    // bcrypt work factor for password hashing. Valid range is 4..=31.
    pub bcrypt_cost: u32,
}

/// Env
///
/// Defines the runtime context, used to switch between development conveniences
/// (pretty logs, secret fallbacks) and production-grade behavior (JSON logs,
/// mandatory secrets).
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// default
    ///
    /// Provides a safe, non-panicking AppConfig instance primarily used for test setup.
    /// This allows us to instantiate the configuration without needing to set environment
    /// variables for lightweight unit or integration testing state scaffolding.
    fn default() -> Self {
        Self {
            mongo_url: "mongodb://localhost:27017".to_string(),
            db_name: "fictionverse_test".to_string(),
            env: Env::Local,
            jwt_secret: "fictionverse-test-secret-value-local".to_string(),
            // Minimum legal bcrypt cost, keeping password hashing fast in tests.
            bcrypt_cost: 4,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// The canonical function for initializing the application configuration at startup.
    /// It reads all parameters from environment variables and implements the **fail-fast** principle.
    ///
    /// # Panics
    /// Panics if a critical environment variable required for the current runtime environment
    /// (especially Production) is not found. This prevents the application from starting
    /// with an incomplete or insecure configuration.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        // JWT Secret Resolution
        // The production secret is mandatory and must be explicitly set.
        let jwt_secret = match env {
            Env::Production => {
                env::var("JWT_SECRET").expect("FATAL: JWT_SECRET must be set in production.")
            }
            // In local, we provide a fallback, though the developer should ideally set their own.
            _ => env::var("JWT_SECRET")
                .unwrap_or_else(|_| "fictionverse-secret-key-change-in-production".to_string()),
        };

        // bcrypt cost is tunable in every environment; the crate default (12) applies otherwise.
        let bcrypt_cost = env::var("BCRYPT_COST")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(bcrypt::DEFAULT_COST);

        match env {
            Env::Local => Self {
                env: Env::Local,
                // MONGO_URL must still be set, even in local environments (for the Docker store).
                mongo_url: env::var("MONGO_URL").expect("FATAL: MONGO_URL required in local"),
                db_name: env::var("DB_NAME").unwrap_or_else(|_| "fictionverse".to_string()),
                jwt_secret,
                bcrypt_cost,
            },
            Env::Production => Self {
                env: Env::Production,
                // Production environment demands explicit setting of all infrastructure values.
                mongo_url: env::var("MONGO_URL").expect("FATAL: MONGO_URL required in prod"),
                db_name: env::var("DB_NAME").expect("FATAL: DB_NAME required in prod"),
                jwt_secret,
                bcrypt_cost,
            },
        }
    }
}
