use crate::{handlers, AppState};
use axum::{
    routing::{get, post},
    Router,
};

/// Public Router Module
///
/// Defines endpoints that are **unauthenticated** and accessible to any
/// client. This covers all read-only browsing of community content plus the
/// auth gateway itself: signup, login and logout all run without a session.
///
/// Content mutation never lives here; every write route is in the
/// authenticated module behind the session layer.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /
        // Identity/liveness payload for the API root.
        .route("/", get(handlers::api_status))
        // --- Auth Gateway ---
        // POST /auth/signup
        // Creates an account, opens a session and sets the fv_token cookie.
        .route("/auth/signup", post(handlers::signup))
        // POST /auth/login
        // Verifies credentials and sets a fresh fv_token cookie.
        .route("/auth/login", post(handlers::login))
        // POST /auth/logout
        // Clears the cookie client-side. Needs no session: logging out an
        // already-expired session must still succeed.
        .route("/auth/logout", post(handlers::logout))
        // --- Universes ---
        // GET /universes
        // All universes, partitioned into {original, inspired}.
        .route("/universes", get(handlers::get_universes))
        // GET /universes/filter/{genre}
        // Universes of a single (typed) genre. Declared alongside
        // /universes/{title}; the static "filter" segment wins over the
        // title parameter.
        .route(
            "/universes/filter/{genre}",
            get(handlers::filter_universes_by_genre),
        )
        // GET /universes/{title}
        // Single universe by title, with an opaque-id fallback.
        .route("/universes/{title}", get(handlers::get_universe))
        // --- Stories ---
        // GET /stories/{id}
        // A universe's chapters in reading order. The segment is the universe
        // title; it shares the {id} name with the PUT route in the
        // authenticated module, which matches the same position.
        .route("/stories/{id}", get(handlers::get_stories))
        // GET /stories/{id}/{chapter_number}
        // One chapter by (universe, number); 404 when absent.
        .route(
            "/stories/{id}/{chapter_number}",
            get(handlers::get_story_chapter),
        )
        // --- Universe companion content ---
        // GET /characters/{universe_id}
        .route("/characters/{universe_id}", get(handlers::get_characters))
        // GET /lore/{universe_id}
        .route("/lore/{universe_id}", get(handlers::get_lore))
        // --- Community ---
        // GET /clubs
        .route("/clubs", get(handlers::get_clubs))
        // GET /forum/posts?category=...
        // Threads newest-first, optionally filtered by category.
        .route("/forum/posts", get(handlers::get_forum_posts))
        // GET /forum/posts/{post_id}
        // One thread with its replies embedded oldest-first.
        .route("/forum/posts/{post_id}", get(handlers::get_forum_post))
        // GET /challenges
        .route("/challenges", get(handlers::get_challenges))
}
