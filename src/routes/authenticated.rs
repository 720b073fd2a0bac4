use crate::{handlers, AppState};
use axum::{
    routing::{get, post, put},
    Router,
};

/// Authenticated Router Module
///
/// Defines the routes that require a valid session. Every content write in
/// the application lives here: creating universes, chapters, characters,
/// lore, clubs, forum content and challenges, plus the caller's own profile.
///
/// Access Control Strategy:
/// The session requirement is enforced by a route_layer applied to this whole
/// router (see `create_router`), so a request without a valid token is
/// rejected before any handler body runs. Handlers then use the `AuthUser`
/// extractor for the identity they stamp into created content.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // POST /universes
        // Creates a universe; author fields come from the session, duplicate
        // titles are rejected.
        .route("/universes", post(handlers::create_universe))
        // --- Stories ---
        // POST /stories
        // Publishes a chapter; one chapter per (universe, number).
        .route("/stories", post(handlers::create_story))
        // PUT /stories/{id}
        // Replaces a chapter's fields, scoped to the owning author. A
        // non-owner's request is a silent no-op (soft-failure policy).
        .route("/stories/{id}", put(handlers::update_story))
        // --- Universe companion content ---
        // POST /characters
        // POST /lore
        // Unowned content: the session gates the write, nothing is stamped.
        .route("/characters", post(handlers::create_character))
        .route("/lore", post(handlers::create_lore))
        // --- Community ---
        // POST /clubs
        // Creates a club with the caller as creator and first member.
        .route("/clubs", post(handlers::create_club))
        // POST /clubs/{club_id}/join
        // Set-union join; joining twice never duplicates membership.
        .route("/clubs/{club_id}/join", post(handlers::join_club))
        // POST /forum/posts
        .route("/forum/posts", post(handlers::create_forum_post))
        // POST /forum/replies
        // Inserts the reply and bumps the parent's replies_count.
        .route("/forum/replies", post(handlers::create_forum_reply))
        // POST /challenges
        .route("/challenges", post(handlers::create_challenge))
        // --- Profile ---
        // GET /profile
        // PUT /profile
        // The caller's own record; PUT patches only the fields present.
        .route(
            "/profile",
            get(handlers::get_profile).put(handlers::update_profile),
        )
}
