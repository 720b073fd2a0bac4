use chrono::{TimeZone, Utc};
use fictionverse_api::models::{
    Challenge, CharacterRole, ClubType, ForumCategory, ForumPost, ForumPostDetail, Genre,
    PublicUser, Role, Stored, Story, StoryStatus, Universe, UniverseStatus, UpdateProfileRequest,
    User, UserProfile,
};
use serde_json::json;

// --- Wire Name Tests ---

#[test]
fn test_universe_type_key_mapping() {
    let universe = Universe {
        title: "Wire Test".to_string(),
        created_at: Utc::now(),
        ..Default::default()
    };

    let json_output = serde_json::to_string(&universe).unwrap();

    // The JSON key is "type", not the Rust field name.
    assert!(json_output.contains(r#""type":"Original""#));
    assert!(!json_output.contains("universe_type"));
}

#[test]
fn test_genre_sci_fi_wire_name() {
    // "Sci-Fi" is not a valid Rust identifier, so this variant is renamed.
    assert_eq!(serde_json::to_string(&Genre::SciFi).unwrap(), r#""Sci-Fi""#);
    assert_eq!(
        serde_json::from_str::<Genre>(r#""Sci-Fi""#).unwrap(),
        Genre::SciFi
    );
    assert_eq!(serde_json::to_string(&Genre::Fantasy).unwrap(), r#""Fantasy""#);

    // The filter handlers build store queries from this accessor; it must
    // agree with the serialized form.
    assert_eq!(Genre::SciFi.as_str(), "Sci-Fi");
    assert_eq!(Genre::Fantasy.as_str(), "Fantasy");
}

#[test]
fn test_lowercase_enum_wire_names() {
    assert_eq!(
        serde_json::to_string(&ClubType::Discussion).unwrap(),
        r#""discussion""#
    );
    assert_eq!(
        serde_json::to_string(&ForumCategory::Theory).unwrap(),
        r#""theory""#
    );
    assert_eq!(
        serde_json::to_string(&CharacterRole::Protagonist).unwrap(),
        r#""protagonist""#
    );
    assert_eq!(ForumCategory::Theory.as_str(), "theory");
}

// --- Default Tests ---

#[test]
fn test_user_role_defaults_to_traveler_when_absent() {
    let user: User = serde_json::from_value(json!({
        "username": "fresh",
        "email": "fresh@example.com",
        "password": "hash"
    }))
    .unwrap();

    assert_eq!(user.role, Role::Traveler);
    assert!(user.bio.is_none());
    assert!(user.avatar_url.is_none());
}

#[test]
fn test_universe_fills_defaults_for_missing_fields() {
    // Early records were written before genre and status existed.
    let universe: Universe = serde_json::from_value(json!({
        "title": "Legacy Record",
        "description": "written long ago",
        "type": "Inspired",
        "author": "Old Hand",
        "created_at": "2024-01-15T12:00:00Z"
    }))
    .unwrap();

    assert_eq!(universe.genre, Genre::Fantasy);
    assert_eq!(universe.status, UniverseStatus::Active);
    assert_eq!(universe.author_email, "");
    assert!(!universe.is_premium);
    assert!(universe.cover_image.is_none());
}

#[test]
fn test_story_status_defaults_to_published() {
    let story: Story = serde_json::from_value(json!({
        "universe_id": "abc",
        "title": "Untagged",
        "content": "words",
        "chapter_number": 1,
        "author": "Someone",
        "author_email": "someone@example.com",
        "created_at": "2024-01-15T12:00:00Z"
    }))
    .unwrap();

    assert_eq!(story.status, StoryStatus::Published);
}

// --- Response Shape Tests ---

#[test]
fn test_public_user_never_carries_a_password() {
    let user = User {
        username: "hidden".to_string(),
        email: "hidden@example.com".to_string(),
        password: "super-secret-hash".to_string(),
        created_at: Utc::now(),
        ..Default::default()
    };

    let public = serde_json::to_string(&PublicUser::from(user.clone())).unwrap();
    assert!(!public.contains("password"));
    assert!(!public.contains("super-secret-hash"));
    assert!(public.contains(r#""username":"hidden""#));

    let profile = serde_json::to_string(&UserProfile::from(user)).unwrap();
    assert!(!profile.contains("password"));
    assert!(!profile.contains("super-secret-hash"));
}

#[test]
fn test_update_profile_request_optionality() {
    // Partial updates serialize only the fields that are present.
    let partial = UpdateProfileRequest {
        bio: Some("New bio only".to_string()),
        avatar_url: None,
    };

    let json_output = serde_json::to_string(&partial).unwrap();
    assert!(json_output.contains(r#""bio":"New bio only""#));
    assert!(!json_output.contains("avatar_url"));
}

#[test]
fn test_stored_wrapper_flattens_the_record() {
    let stored = Stored {
        id: "65f0c2a1b3d4e5f6a7b8c9d0".to_string(),
        record: Universe {
            title: "Wrapped".to_string(),
            created_at: Utc::now(),
            ..Default::default()
        },
    };

    let value = serde_json::to_value(&stored).unwrap();
    assert_eq!(value["_id"], "65f0c2a1b3d4e5f6a7b8c9d0");
    assert_eq!(value["title"], "Wrapped");
    assert!(value.get("record").is_none(), "the record flattens inline");
}

#[test]
fn test_forum_post_detail_flattens_the_post() {
    let detail = ForumPostDetail {
        post: ForumPost {
            title: "Flattened".to_string(),
            content: "body".to_string(),
            author: "op".to_string(),
            author_email: "op@example.com".to_string(),
            created_at: Utc::now(),
            ..Default::default()
        },
        replies: vec![],
    };

    let value = serde_json::to_value(&detail).unwrap();
    assert_eq!(value["title"], "Flattened");
    assert!(value["replies"].as_array().unwrap().is_empty());
    assert!(value.get("post").is_none());
}

#[test]
fn test_challenge_deadline_is_nullable() {
    let open_ended = Challenge {
        title: "No Deadline".to_string(),
        created_at: Utc::now(),
        ..Default::default()
    };

    let value = serde_json::to_value(&open_ended).unwrap();
    assert!(value["deadline"].is_null());
    assert!(value["submissions"].as_array().unwrap().is_empty());
}

#[test]
fn test_timestamps_serialize_as_rfc3339_strings() {
    // Listing handlers sort on this field as a string, which only stays
    // chronological because the wire form is RFC 3339 in UTC.
    let universe = Universe {
        title: "Clock Check".to_string(),
        created_at: Utc.with_ymd_and_hms(2025, 3, 9, 8, 30, 0).unwrap(),
        ..Default::default()
    };

    let value = serde_json::to_value(&universe).unwrap();
    let stamp = value["created_at"].as_str().expect("created_at is a string");
    assert!(stamp.starts_with("2025-03-09T08:30:00"));
    assert!(stamp.ends_with('Z'));
}
