use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

// --- Enumerated Field Types ---

/// Role
///
/// The community rank attached to every account. New signups always start as
/// `traveler`; the other ranks exist in stored data but are never assigned by
/// this API surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Traveler,
    Architect,
    Commander,
}

/// UniverseType
///
/// Partition key for the universe listing: original settings versus works
/// inspired by existing fiction. Serialized capitalized, matching stored data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub enum UniverseType {
    #[default]
    Original,
    Inspired,
}

/// Genre
///
/// The fixed genre taxonomy. `Sci-Fi` carries a serde rename because the wire
/// form contains a hyphen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub enum Genre {
    #[serde(rename = "Sci-Fi")]
    SciFi,
    Noir,
    #[default]
    Fantasy,
    Cyberpunk,
    Mystery,
}

impl Genre {
    /// The exact wire/store form, for building equality filters.
    pub fn as_str(&self) -> &'static str {
        match self {
            Genre::SciFi => "Sci-Fi",
            Genre::Noir => "Noir",
            Genre::Fantasy => "Fantasy",
            Genre::Cyberpunk => "Cyberpunk",
            Genre::Mystery => "Mystery",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum UniverseStatus {
    #[default]
    Active,
    Draft,
    Archived,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum StoryStatus {
    Draft,
    #[default]
    Published,
    Archived,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum CharacterRole {
    Protagonist,
    Antagonist,
    #[default]
    Supporting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum LoreCategory {
    #[default]
    History,
    Technology,
    Culture,
    Geography,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ClubType {
    Reading,
    Writing,
    #[default]
    Discussion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ForumCategory {
    Theory,
    Critique,
    #[default]
    General,
    Announcement,
}

impl ForumCategory {
    /// The exact wire/store form, for building equality filters.
    pub fn as_str(&self) -> &'static str {
        match self {
            ForumCategory::Theory => "theory",
            ForumCategory::Critique => "critique",
            ForumCategory::General => "general",
            ForumCategory::Announcement => "announcement",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeType {
    #[default]
    Writing,
    Worldbuilding,
    Character,
}

// --- Core Application Schemas (Stored Documents) ---

/// User
///
/// The canonical identity record stored in the `users` collection.
/// The `password` field holds the bcrypt hash, never plaintext; it is included
/// here because this struct *is* the stored document shape. Responses never
/// serialize this struct directly; they go through `PublicUser`/`UserProfile`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct User {
    // Unique display name, denormalized into authored content.
    pub username: String,
    // The sole authentication key. Unique across the store, matched exactly as stored.
    pub email: String,
    // bcrypt hash produced by the credential store.
    pub password: String,
    #[serde(default)]
    pub role: Role,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
}

/// Universe
///
/// A user-authored fictional setting; the top-level content container.
/// `title` doubles as the human-readable lookup key (unique across the store),
/// and stories reference their universe by title, not by store id.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct Universe {
    pub title: String,
    pub description: String,

    /// Maps the wire field "type" to a Rust-legal name.
    /// `type` is a reserved keyword in Rust, so the field is renamed for internal use.
    #[serde(rename = "type")]
    pub universe_type: UniverseType,

    #[serde(default)]
    pub genre: Genre,

    // Denormalized from the creating user at creation time; never re-synced.
    pub author: String,
    #[serde(default)]
    pub author_email: String,

    pub cover_image: Option<String>,
    #[serde(default)]
    pub status: UniverseStatus,
    #[serde(default)]
    pub is_premium: bool,

    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// Story
///
/// One chapter of a serialized story. `universe_id` is the owning universe's
/// *title*; `chapter_number` is unique within a universe.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct Story {
    pub universe_id: String,
    pub title: String,
    pub content: String,
    pub chapter_number: i32,

    // Denormalized author identity, stamped from the session at creation time.
    pub author: String,
    pub author_email: String,

    #[serde(default)]
    pub status: StoryStatus,

    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// Character
///
/// A cast member of a universe. No ownership is recorded; any authenticated
/// user may add characters to any universe.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct Character {
    pub universe_id: String,
    pub name: String,
    pub description: String,
    pub role: CharacterRole,
    pub image_url: Option<String>,
    #[serde(default)]
    pub traits: Vec<String>,
    pub backstory: Option<String>,

    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// LoreEntry
///
/// Worldbuilding background for a universe, grouped by category.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoreEntry {
    pub universe_id: String,
    pub title: String,
    pub content: String,
    pub category: LoreCategory,

    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// Club
///
/// A reading/writing/discussion circle. `members` is treated as a set of
/// email addresses: joins go through a set-union update and never duplicate.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct Club {
    pub name: String,
    pub description: String,

    #[serde(rename = "type")]
    pub club_type: ClubType,

    // Creator's display name; the creator's email is the first member.
    pub creator: String,
    pub members: Vec<String>,

    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// ForumPost
///
/// A discussion thread. `replies_count` is a denormalized counter maintained
/// by reply creation; it must equal the number of ForumReply documents whose
/// `post_id` references this post.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ForumPost {
    pub title: String,
    pub content: String,

    pub author: String,
    pub author_email: String,

    pub category: ForumCategory,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub replies_count: i64,

    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// ForumReply
///
/// A reply to a forum post; `post_id` is the parent post's opaque store id.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ForumReply {
    pub post_id: String,
    pub content: String,

    pub author: String,
    pub author_email: String,

    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// Challenge
///
/// A community writing prompt. `submissions` is initialized empty and never
/// appended to by this API surface.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct Challenge {
    pub title: String,
    pub description: String,
    pub prompt: String,

    #[serde(rename = "type")]
    pub challenge_type: ChallengeType,

    #[ts(type = "string | null")]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub submissions: Vec<String>,

    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

// --- Request Payloads (Input Schemas) ---

/// SignupRequest
///
/// Input payload for account creation (POST /auth/signup).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// LoginRequest
///
/// Input payload for session creation (POST /auth/login).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// CreateUniverseRequest
///
/// Input payload for POST /universes. Author identity and `status` are stamped
/// server-side from the session; client-supplied values for them do not exist
/// in this shape at all.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateUniverseRequest {
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub universe_type: UniverseType,
    pub genre: Genre,
    pub cover_image: Option<String>,
    #[serde(default)]
    pub is_premium: bool,
}

/// CreateStoryRequest
///
/// Input payload for POST /stories, and the full replacement body for
/// PUT /stories/{id}. `status` defaults to `published` when absent.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateStoryRequest {
    pub universe_id: String,
    pub title: String,
    pub content: String,
    pub chapter_number: i32,
    #[serde(default)]
    pub status: StoryStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateCharacterRequest {
    pub universe_id: String,
    pub name: String,
    pub description: String,
    pub role: CharacterRole,
    pub image_url: Option<String>,
    #[serde(default)]
    pub traits: Vec<String>,
    pub backstory: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateLoreEntryRequest {
    pub universe_id: String,
    pub title: String,
    pub content: String,
    pub category: LoreCategory,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateClubRequest {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub club_type: ClubType,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateForumPostRequest {
    pub title: String,
    pub content: String,
    pub category: ForumCategory,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateForumReplyRequest {
    pub post_id: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateChallengeRequest {
    pub title: String,
    pub description: String,
    pub prompt: String,
    #[serde(rename = "type")]
    pub challenge_type: ChallengeType,
    #[ts(type = "string | null")]
    pub deadline: Option<DateTime<Utc>>,
}

/// UpdateProfileRequest
///
/// Partial update payload for PUT /profile.
///
/// Uses `Option<T>` for all fields and `#[serde(skip_serializing_if = "Option::is_none")]`
/// so only the fields actually present are patched; absent fields are left
/// untouched, not nulled.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

// --- Response Schemas (Output) ---

/// PublicUser
///
/// The public projection of a User returned by signup/login. Deliberately
/// excludes the password hash and profile extras.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct PublicUser {
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            email: user.email,
            role: user.role,
        }
    }
}

/// UserProfile
///
/// Output schema for GET /profile: the caller's own User document minus the
/// password hash.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UserProfile {
    pub username: String,
    pub email: String,
    pub role: Role,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            email: user.email,
            role: user.role,
            bio: user.bio,
            avatar_url: user.avatar_url,
            created_at: user.created_at,
        }
    }
}

/// AuthResponse
///
/// Body returned by signup and login alongside the Set-Cookie header carrying
/// the session token.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct AuthResponse {
    pub message: String,
    pub user: PublicUser,
}

/// MessageResponse
///
/// The `{"message": ...}` acknowledgement shape shared by logout, story
/// update, club join and profile update.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct MessageResponse {
    pub message: String,
}

/// StatusResponse
///
/// The health/identity payload served at the API root.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct StatusResponse {
    pub message: String,
    pub status: String,
}

/// UniverseGroups
///
/// Output of GET /universes: the full universe set partitioned by `type`.
/// Every universe appears in exactly one group.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UniverseGroups {
    pub original: Vec<Universe>,
    pub inspired: Vec<Universe>,
}

/// ForumPostDetail
///
/// Output of GET /forum/posts/{id}: the post's own fields flattened at the top
/// level, plus its replies sorted oldest-first.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ForumPostDetail {
    #[serde(flatten)]
    pub post: ForumPost,
    pub replies: Vec<ForumReply>,
}

/// Stored
///
/// Envelope for create responses: the inserted document plus the store's
/// opaque id under `_id`. This is the only place the internal id surfaces.
#[derive(Debug, Clone, Serialize)]
pub struct Stored<T: serde::Serialize> {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub record: T,
}
