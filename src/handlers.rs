use crate::{
    auth::{clear_session_cookie, issue_token, session_cookie, AuthUser},
    error::ApiError,
    models::{
        AuthResponse, Challenge, Character, Club, CreateChallengeRequest, CreateCharacterRequest,
        CreateClubRequest, CreateForumPostRequest, CreateForumReplyRequest, CreateLoreEntryRequest,
        CreateStoryRequest, CreateUniverseRequest, ForumCategory, ForumPost, ForumPostDetail,
        ForumReply, Genre, LoginRequest, LoreEntry, MessageResponse, PublicUser, SignupRequest,
        StatusResponse, Stored, Story, Universe, UniverseGroups, UniverseType, UpdateProfileRequest,
        User, UserProfile,
    },
    passwords,
    store::StoreError,
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::header::SET_COOKIE,
    response::{AppendHeaders, IntoResponse},
    Json,
};
use bson::doc;
use chrono::Utc;
use serde::Deserialize;

// --- Filter Structs ---

/// ForumPostFilter
///
/// Accepted query parameters for the forum post listing (GET /forum/posts).
/// The category is typed: an unknown value is rejected by the extractor, a
/// missing one means no filtering.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct ForumPostFilter {
    /// Optional exact-match filter on the post category.
    pub category: Option<ForumCategory>,
}

// --- Status ---

/// api_status
///
/// [Public Route] Identity/liveness payload at the API root.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "API status", body = StatusResponse))
)]
pub async fn api_status() -> Json<StatusResponse> {
    Json(StatusResponse {
        message: "The Fictionverse API".to_string(),
        status: "operational".to_string(),
    })
}

// --- Auth Handlers ---

/// signup
///
/// [Public Route] Creates an account and opens a session in one step.
///
/// The email is the identity key: a duplicate is rejected with a Conflict
/// before anything is written. The stored password is the bcrypt hash, never
/// the plaintext, and the response projection never includes it. On success
/// the session token is delivered as an HTTP-only cookie.
#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Account created", body = AuthResponse),
        (status = 400, description = "Email already registered")
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.username.is_empty() || payload.email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation("All fields are required"));
    }
    if !payload.email.contains('@') {
        return Err(ApiError::Validation("Invalid email address"));
    }

    let existing = state
        .repo
        .users
        .count(doc! { "email": &payload.email })
        .await?;
    if existing > 0 {
        return Err(ApiError::Conflict("Email already registered"));
    }

    let user = User {
        username: payload.username,
        email: payload.email,
        password: passwords::hash_password(&payload.password, state.config.bcrypt_cost)?,
        bio: None,
        avatar_url: None,
        created_at: Utc::now(),
        ..Default::default()
    };
    state.repo.users.insert(&user).await?;

    let token = issue_token(&user.email, &user.username, &state.config.jwt_secret)?;

    Ok((
        AppendHeaders([(SET_COOKIE, session_cookie(&token))]),
        Json(AuthResponse {
            message: "User created successfully".to_string(),
            user: PublicUser::from(user),
        }),
    ))
}

/// login
///
/// [Public Route] Verifies credentials and opens a fresh session.
///
/// Unknown email and wrong password collapse into one generic 401 so the
/// response does not reveal which part failed.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session opened", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .repo
        .users
        .find_one(doc! { "email": &payload.email })
        .await?
        .ok_or(ApiError::Unauthorized("Invalid credentials"))?;

    if !passwords::verify_password(&payload.password, &user.password).unwrap_or(false) {
        return Err(ApiError::Unauthorized("Invalid credentials"));
    }

    let token = issue_token(&user.email, &user.username, &state.config.jwt_secret)?;

    Ok((
        AppendHeaders([(SET_COOKIE, session_cookie(&token))]),
        Json(AuthResponse {
            message: "Login successful".to_string(),
            user: PublicUser::from(user),
        }),
    ))
}

/// logout
///
/// [Public Route] Instructs the client to drop the session cookie.
/// Stateless on the server side; an already-issued token stays valid until
/// its natural expiry.
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses((status = 200, description = "Session cleared", body = MessageResponse))
)]
pub async fn logout() -> impl IntoResponse {
    (
        AppendHeaders([(SET_COOKIE, clear_session_cookie())]),
        Json(MessageResponse {
            message: "Logged out successfully".to_string(),
        }),
    )
}

// --- Universe Handlers ---

/// get_universes
///
/// [Public Route] Lists every universe, partitioned by type into
/// `{original, inspired}`. Each universe lands in exactly one group.
#[utoipa::path(
    get,
    path = "/universes",
    responses((status = 200, description = "Universes grouped by type", body = UniverseGroups))
)]
pub async fn get_universes(
    State(state): State<AppState>,
) -> Result<Json<UniverseGroups>, ApiError> {
    let universes = state.repo.universes.find_many(doc! {}, None).await?;

    let (original, inspired) = universes
        .into_iter()
        .partition(|u| u.universe_type == UniverseType::Original);

    Ok(Json(UniverseGroups { original, inspired }))
}

/// create_universe
///
/// [Authenticated Route] Creates a universe owned by the caller.
///
/// `author`/`author_email` are stamped from the session, never taken from the
/// payload, and `status` is forced to active. The title is a lookup key, so a
/// duplicate is rejected with a Conflict.
#[utoipa::path(
    post,
    path = "/universes",
    request_body = CreateUniverseRequest,
    responses(
        (status = 200, description = "Created", body = Universe),
        (status = 400, description = "Duplicate title")
    )
)]
pub async fn create_universe(
    AuthUser { email, username }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateUniverseRequest>,
) -> Result<Json<Stored<Universe>>, ApiError> {
    let duplicate = state
        .repo
        .universes
        .count(doc! { "title": &payload.title })
        .await?;
    if duplicate > 0 {
        return Err(ApiError::Conflict("Universe title already exists"));
    }

    let universe = Universe {
        title: payload.title,
        description: payload.description,
        universe_type: payload.universe_type,
        genre: payload.genre,
        author: username,
        author_email: email,
        cover_image: payload.cover_image,
        is_premium: payload.is_premium,
        created_at: Utc::now(),
        ..Default::default()
    };
    let id = state.repo.universes.insert(&universe).await?;

    Ok(Json(Stored {
        id,
        record: universe,
    }))
}

/// get_universe
///
/// [Public Route] Retrieves a single universe. The path segment is matched
/// against the title first (the human-readable key) and falls back to the
/// opaque store id, so both `/universes/Neon%20Shadows` and an id link work.
#[utoipa::path(
    get,
    path = "/universes/{title}",
    params(("title" = String, Path, description = "Universe title, or store id as fallback")),
    responses(
        (status = 200, description = "Found", body = Universe),
        (status = 404, description = "Universe not found")
    )
)]
pub async fn get_universe(
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> Result<Json<Universe>, ApiError> {
    if let Some(universe) = state
        .repo
        .universes
        .find_one(doc! { "title": &title })
        .await?
    {
        return Ok(Json(universe));
    }

    let by_id = state
        .repo
        .universes
        .find_one(doc! { "_id": &title })
        .await?;
    match by_id {
        Some(universe) => Ok(Json(universe)),
        None => Err(ApiError::NotFound("Universe not found")),
    }
}

/// filter_universes_by_genre
///
/// [Public Route] Lists universes of one genre. The genre is a typed path
/// parameter; an unknown value never reaches the query.
#[utoipa::path(
    get,
    path = "/universes/filter/{genre}",
    params(("genre" = Genre, Path, description = "Genre to filter by")),
    responses((status = 200, description = "Matching universes", body = [Universe]))
)]
pub async fn filter_universes_by_genre(
    State(state): State<AppState>,
    Path(genre): Path<Genre>,
) -> Result<Json<Vec<Universe>>, ApiError> {
    let universes = state
        .repo
        .universes
        .find_many(doc! { "genre": genre.as_str() }, None)
        .await?;
    Ok(Json(universes))
}

// --- Story Handlers ---

/// get_stories
///
/// [Public Route] Lists a universe's chapters in reading order
/// (ascending chapter_number).
#[utoipa::path(
    get,
    path = "/stories/{id}",
    params(("id" = String, Path, description = "Universe title")),
    responses((status = 200, description = "Chapters in order", body = [Story]))
)]
pub async fn get_stories(
    State(state): State<AppState>,
    Path(universe_id): Path<String>,
) -> Result<Json<Vec<Story>>, ApiError> {
    let stories = state
        .repo
        .stories
        .find_many(
            doc! { "universe_id": &universe_id },
            Some(doc! { "chapter_number": 1 }),
        )
        .await?;
    Ok(Json(stories))
}

/// get_story_chapter
///
/// [Public Route] Fetches one chapter by `(universe, chapter_number)`.
#[utoipa::path(
    get,
    path = "/stories/{id}/{chapter_number}",
    params(
        ("id" = String, Path, description = "Universe title"),
        ("chapter_number" = i32, Path, description = "Chapter number")
    ),
    responses(
        (status = 200, description = "Found", body = Story),
        (status = 404, description = "Chapter not found")
    )
)]
pub async fn get_story_chapter(
    State(state): State<AppState>,
    Path((universe_id, chapter_number)): Path<(String, i32)>,
) -> Result<Json<Story>, ApiError> {
    let story = state
        .repo
        .stories
        .find_one(doc! { "universe_id": &universe_id, "chapter_number": chapter_number })
        .await?;
    match story {
        Some(story) => Ok(Json(story)),
        None => Err(ApiError::NotFound("Chapter not found")),
    }
}

/// create_story
///
/// [Authenticated Route] Publishes a chapter, stamped with the caller's
/// identity. At most one chapter may exist per `(universe, chapter_number)`
/// pair; a duplicate is rejected with a Conflict.
#[utoipa::path(
    post,
    path = "/stories",
    request_body = CreateStoryRequest,
    responses(
        (status = 200, description = "Created", body = Story),
        (status = 400, description = "Duplicate chapter number")
    )
)]
pub async fn create_story(
    AuthUser { email, username }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateStoryRequest>,
) -> Result<Json<Stored<Story>>, ApiError> {
    let duplicate = state
        .repo
        .stories
        .count(doc! { "universe_id": &payload.universe_id, "chapter_number": payload.chapter_number })
        .await?;
    if duplicate > 0 {
        return Err(ApiError::Conflict("Chapter already exists for this universe"));
    }

    let story = Story {
        universe_id: payload.universe_id,
        title: payload.title,
        content: payload.content,
        chapter_number: payload.chapter_number,
        author: username,
        author_email: email,
        status: payload.status,
        created_at: Utc::now(),
    };
    let id = state.repo.stories.insert(&story).await?;

    Ok(Json(Stored { id, record: story }))
}

/// update_story
///
/// [Authenticated Route] Replaces a chapter's fields.
///
/// The update filter is `(story id AND author_email == caller)`: a non-owner's
/// request matches nothing and silently changes nothing, but the response is
/// the same success message either way. That is the store's soft-failure
/// policy for zero-match updates.
#[utoipa::path(
    put,
    path = "/stories/{id}",
    params(("id" = String, Path, description = "Story id")),
    request_body = CreateStoryRequest,
    responses((status = 200, description = "Updated (or ignored)", body = MessageResponse))
)]
pub async fn update_story(
    AuthUser { email, .. }: AuthUser,
    State(state): State<AppState>,
    Path(story_id): Path<String>,
    Json(payload): Json<CreateStoryRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let fields = bson::to_document(&payload)
        .map_err(|e| StoreError::Serialization(e.to_string()))?;

    state
        .repo
        .stories
        .update_one(
            doc! { "_id": &story_id, "author_email": &email },
            doc! { "$set": fields },
        )
        .await?;

    Ok(Json(MessageResponse {
        message: "Story updated".to_string(),
    }))
}

// --- Character Handlers ---

/// get_characters
///
/// [Public Route] Lists a universe's cast.
#[utoipa::path(
    get,
    path = "/characters/{universe_id}",
    params(("universe_id" = String, Path, description = "Universe title")),
    responses((status = 200, description = "Characters", body = [Character]))
)]
pub async fn get_characters(
    State(state): State<AppState>,
    Path(universe_id): Path<String>,
) -> Result<Json<Vec<Character>>, ApiError> {
    let characters = state
        .repo
        .characters
        .find_many(doc! { "universe_id": &universe_id }, None)
        .await?;
    Ok(Json(characters))
}

/// create_character
///
/// [Authenticated Route] Adds a character to a universe. Characters carry no
/// ownership; authentication gates the write but no author is stamped.
#[utoipa::path(
    post,
    path = "/characters",
    request_body = CreateCharacterRequest,
    responses((status = 200, description = "Created", body = Character))
)]
pub async fn create_character(
    _auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateCharacterRequest>,
) -> Result<Json<Stored<Character>>, ApiError> {
    let character = Character {
        universe_id: payload.universe_id,
        name: payload.name,
        description: payload.description,
        role: payload.role,
        image_url: payload.image_url,
        traits: payload.traits,
        backstory: payload.backstory,
        created_at: Utc::now(),
    };
    let id = state.repo.characters.insert(&character).await?;

    Ok(Json(Stored {
        id,
        record: character,
    }))
}

// --- Lore Handlers ---

/// get_lore
///
/// [Public Route] Lists a universe's lore entries.
#[utoipa::path(
    get,
    path = "/lore/{universe_id}",
    params(("universe_id" = String, Path, description = "Universe title")),
    responses((status = 200, description = "Lore entries", body = [LoreEntry]))
)]
pub async fn get_lore(
    State(state): State<AppState>,
    Path(universe_id): Path<String>,
) -> Result<Json<Vec<LoreEntry>>, ApiError> {
    let entries = state
        .repo
        .lore
        .find_many(doc! { "universe_id": &universe_id }, None)
        .await?;
    Ok(Json(entries))
}

/// create_lore
///
/// [Authenticated Route] Adds a lore entry to a universe. Like characters,
/// lore carries no ownership fields.
#[utoipa::path(
    post,
    path = "/lore",
    request_body = CreateLoreEntryRequest,
    responses((status = 200, description = "Created", body = LoreEntry))
)]
pub async fn create_lore(
    _auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateLoreEntryRequest>,
) -> Result<Json<Stored<LoreEntry>>, ApiError> {
    let entry = LoreEntry {
        universe_id: payload.universe_id,
        title: payload.title,
        content: payload.content,
        category: payload.category,
        created_at: Utc::now(),
    };
    let id = state.repo.lore.insert(&entry).await?;

    Ok(Json(Stored { id, record: entry }))
}

// --- Club Handlers ---

/// get_clubs
///
/// [Public Route] Lists every club.
#[utoipa::path(
    get,
    path = "/clubs",
    responses((status = 200, description = "Clubs", body = [Club]))
)]
pub async fn get_clubs(State(state): State<AppState>) -> Result<Json<Vec<Club>>, ApiError> {
    let clubs = state.repo.clubs.find_many(doc! {}, None).await?;
    Ok(Json(clubs))
}

/// create_club
///
/// [Authenticated Route] Creates a club with the caller as creator and sole
/// initial member.
#[utoipa::path(
    post,
    path = "/clubs",
    request_body = CreateClubRequest,
    responses((status = 200, description = "Created", body = Club))
)]
pub async fn create_club(
    AuthUser { email, username }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateClubRequest>,
) -> Result<Json<Stored<Club>>, ApiError> {
    let club = Club {
        name: payload.name,
        description: payload.description,
        club_type: payload.club_type,
        creator: username,
        members: vec![email],
        created_at: Utc::now(),
    };
    let id = state.repo.clubs.insert(&club).await?;

    Ok(Json(Stored { id, record: club }))
}

/// join_club
///
/// [Authenticated Route] Adds the caller to a club's member set.
///
/// Membership is a set union: joining twice never duplicates. A nonexistent
/// club id matches nothing and still reports success, per the soft-failure
/// update policy.
#[utoipa::path(
    post,
    path = "/clubs/{club_id}/join",
    params(("club_id" = String, Path, description = "Club id")),
    responses((status = 200, description = "Joined", body = MessageResponse))
)]
pub async fn join_club(
    AuthUser { email, .. }: AuthUser,
    State(state): State<AppState>,
    Path(club_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .repo
        .clubs
        .update_one(
            doc! { "_id": &club_id },
            doc! { "$addToSet": { "members": &email } },
        )
        .await?;

    Ok(Json(MessageResponse {
        message: "Joined club successfully".to_string(),
    }))
}

// --- Forum Handlers ---

/// get_forum_posts
///
/// [Public Route] Lists discussion threads newest-first, optionally filtered
/// to one category.
#[utoipa::path(
    get,
    path = "/forum/posts",
    params(ForumPostFilter),
    responses((status = 200, description = "Posts, newest first", body = [ForumPost]))
)]
pub async fn get_forum_posts(
    State(state): State<AppState>,
    Query(filter): Query<ForumPostFilter>,
) -> Result<Json<Vec<ForumPost>>, ApiError> {
    let query = match filter.category {
        Some(category) => doc! { "category": category.as_str() },
        None => doc! {},
    };
    let posts = state
        .repo
        .forum_posts
        .find_many(query, Some(doc! { "created_at": -1 }))
        .await?;
    Ok(Json(posts))
}

/// get_forum_post
///
/// [Public Route] Fetches one thread by its opaque id, with all replies
/// embedded oldest-first.
#[utoipa::path(
    get,
    path = "/forum/posts/{post_id}",
    params(("post_id" = String, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post with replies", body = ForumPostDetail),
        (status = 404, description = "Post not found")
    )
)]
pub async fn get_forum_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<Json<ForumPostDetail>, ApiError> {
    let post = state
        .repo
        .forum_posts
        .find_one(doc! { "_id": &post_id })
        .await?
        .ok_or(ApiError::NotFound("Post not found"))?;

    let replies = state
        .repo
        .forum_replies
        .find_many(
            doc! { "post_id": &post_id },
            Some(doc! { "created_at": 1 }),
        )
        .await?;

    Ok(Json(ForumPostDetail { post, replies }))
}

/// create_forum_post
///
/// [Authenticated Route] Opens a discussion thread with the caller's identity
/// stamped and the reply counter at zero.
#[utoipa::path(
    post,
    path = "/forum/posts",
    request_body = CreateForumPostRequest,
    responses((status = 200, description = "Created", body = ForumPost))
)]
pub async fn create_forum_post(
    AuthUser { email, username }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateForumPostRequest>,
) -> Result<Json<Stored<ForumPost>>, ApiError> {
    let post = ForumPost {
        title: payload.title,
        content: payload.content,
        author: username,
        author_email: email,
        category: payload.category,
        tags: payload.tags,
        replies_count: 0,
        created_at: Utc::now(),
    };
    let id = state.repo.forum_posts.insert(&post).await?;

    Ok(Json(Stored { id, record: post }))
}

/// create_forum_reply
///
/// [Authenticated Route] Replies to a thread and bumps the parent's
/// `replies_count`.
///
/// The insert and the counter increment are two separate writes with no
/// transaction between them; a crash in the gap leaves the counter one low.
#[utoipa::path(
    post,
    path = "/forum/replies",
    request_body = CreateForumReplyRequest,
    responses((status = 200, description = "Created", body = ForumReply))
)]
pub async fn create_forum_reply(
    AuthUser { email, username }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateForumReplyRequest>,
) -> Result<Json<Stored<ForumReply>>, ApiError> {
    let reply = ForumReply {
        post_id: payload.post_id,
        content: payload.content,
        author: username,
        author_email: email,
        created_at: Utc::now(),
    };
    let id = state.repo.forum_replies.insert(&reply).await?;

    state
        .repo
        .forum_posts
        .update_one(
            doc! { "_id": &reply.post_id },
            doc! { "$inc": { "replies_count": 1 } },
        )
        .await?;

    Ok(Json(Stored { id, record: reply }))
}

// --- Challenge Handlers ---

/// get_challenges
///
/// [Public Route] Lists writing challenges newest-first.
#[utoipa::path(
    get,
    path = "/challenges",
    responses((status = 200, description = "Challenges, newest first", body = [Challenge]))
)]
pub async fn get_challenges(
    State(state): State<AppState>,
) -> Result<Json<Vec<Challenge>>, ApiError> {
    let challenges = state
        .repo
        .challenges
        .find_many(doc! {}, Some(doc! { "created_at": -1 }))
        .await?;
    Ok(Json(challenges))
}

/// create_challenge
///
/// [Authenticated Route] Posts a challenge with an empty submission list.
#[utoipa::path(
    post,
    path = "/challenges",
    request_body = CreateChallengeRequest,
    responses((status = 200, description = "Created", body = Challenge))
)]
pub async fn create_challenge(
    _auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateChallengeRequest>,
) -> Result<Json<Stored<Challenge>>, ApiError> {
    let challenge = Challenge {
        title: payload.title,
        description: payload.description,
        prompt: payload.prompt,
        challenge_type: payload.challenge_type,
        deadline: payload.deadline,
        submissions: Vec::new(),
        created_at: Utc::now(),
    };
    let id = state.repo.challenges.insert(&challenge).await?;

    Ok(Json(Stored {
        id,
        record: challenge,
    }))
}

// --- Profile Handlers ---

/// get_profile
///
/// [Authenticated Route] Returns the caller's own account record, minus the
/// password hash. 404 covers the edge where the account was deleted while
/// its session was still live.
#[utoipa::path(
    get,
    path = "/profile",
    responses(
        (status = 200, description = "Profile", body = UserProfile),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_profile(
    AuthUser { email, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<UserProfile>, ApiError> {
    let user = state
        .repo
        .users
        .find_one(doc! { "email": &email })
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;

    Ok(Json(UserProfile::from(user)))
}

/// update_profile
///
/// [Authenticated Route] Patches the caller's bio and/or avatar.
/// Only fields present in the body are written; an empty body writes nothing
/// and still succeeds.
#[utoipa::path(
    put,
    path = "/profile",
    request_body = UpdateProfileRequest,
    responses((status = 200, description = "Updated", body = MessageResponse))
)]
pub async fn update_profile(
    AuthUser { email, .. }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let mut fields = bson::Document::new();
    if let Some(bio) = payload.bio {
        fields.insert("bio", bio);
    }
    if let Some(avatar_url) = payload.avatar_url {
        fields.insert("avatar_url", avatar_url);
    }

    if !fields.is_empty() {
        state
            .repo
            .users
            .update_one(doc! { "email": &email }, doc! { "$set": fields })
            .await?;
    }

    Ok(Json(MessageResponse {
        message: "Profile updated successfully".to_string(),
    }))
}
