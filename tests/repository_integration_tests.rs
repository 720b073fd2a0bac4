use bson::doc;
use chrono::Utc;
use fictionverse_api::{
    models::{Club, ClubType, ForumPost, LoreEntry, Story, Universe, UniverseType, User},
    repository::Repositories,
    store::{DocumentStore, DynDocumentStore, MemoryStore},
};
use std::sync::Arc;
use tokio::test;

// --- Test Context and Setup ---

/// Fresh repositories over a fresh in-memory store. Every test gets its own
/// isolated data.
fn memory_repos() -> (Repositories, DynDocumentStore) {
    let store: DynDocumentStore = Arc::new(MemoryStore::new());
    (Repositories::new(&store), store)
}

// --- Test Data Helpers ---

fn sample_universe(title: &str, universe_type: UniverseType) -> Universe {
    Universe {
        title: title.to_string(),
        description: "test description".to_string(),
        universe_type,
        author: "Test Author".to_string(),
        author_email: "author@test.com".to_string(),
        created_at: Utc::now(),
        ..Default::default()
    }
}

fn sample_story(universe_id: &str, chapter_number: i32) -> Story {
    Story {
        universe_id: universe_id.to_string(),
        title: format!("Chapter {}", chapter_number),
        content: "test content".to_string(),
        chapter_number,
        author: "Test Author".to_string(),
        author_email: "author@test.com".to_string(),
        created_at: Utc::now(),
        ..Default::default()
    }
}

fn sample_lore(universe_id: &str, title: &str) -> LoreEntry {
    LoreEntry {
        universe_id: universe_id.to_string(),
        title: title.to_string(),
        content: "test lore".to_string(),
        created_at: Utc::now(),
        ..Default::default()
    }
}

// --- Tests ---

#[test]
async fn test_insert_then_find_one_roundtrip() {
    let (repo, _store) = memory_repos();

    let universe = sample_universe("Roundtrip Realm", UniverseType::Original);
    let id = repo
        .universes
        .insert(&universe)
        .await
        .expect("insert failed");
    assert!(!id.is_empty(), "insert should hand back a non-empty id");

    let fetched = repo
        .universes
        .find_one(doc! { "title": "Roundtrip Realm" })
        .await
        .expect("find_one failed")
        .expect("universe should exist");

    assert_eq!(fetched.title, universe.title);
    assert_eq!(fetched.description, universe.description);
    assert_eq!(fetched.universe_type, UniverseType::Original);
}

#[test]
async fn test_find_one_by_store_id() {
    let (repo, _store) = memory_repos();

    let universe = sample_universe("Id Lookup Realm", UniverseType::Inspired);
    let id = repo
        .universes
        .insert(&universe)
        .await
        .expect("insert failed");

    let fetched = repo
        .universes
        .find_one(doc! { "_id": &id })
        .await
        .expect("find_one failed");
    assert!(fetched.is_some(), "lookup by the returned id should match");
    assert_eq!(fetched.unwrap().title, "Id Lookup Realm");

    // A fabricated id matches nothing.
    let missing = repo
        .universes
        .find_one(doc! { "_id": "ffffffffffffffffffffffff" })
        .await
        .expect("find_one failed");
    assert!(missing.is_none());
}

#[test]
async fn test_find_one_missing_returns_none() {
    let (repo, _store) = memory_repos();

    let fetched = repo
        .universes
        .find_one(doc! { "title": "Never Written" })
        .await
        .expect("find_one failed");
    assert!(fetched.is_none());
}

#[test]
async fn test_reads_never_expose_an_internal_id_field() {
    let (_repo, store) = memory_repos();
    let collection = store.collection("raw_docs");

    collection
        .insert_one(doc! { "name": "only field" })
        .await
        .expect("insert failed");

    let fetched = collection
        .find_one(doc! { "name": "only field" })
        .await
        .expect("find_one failed")
        .expect("document should exist");

    assert!(
        !fetched.contains_key("_id"),
        "read documents must not carry the store id inline"
    );
    assert_eq!(fetched.len(), 1);
}

#[test]
async fn test_find_many_sorts_ascending_and_descending() {
    let (repo, _store) = memory_repos();

    // Inserted out of order on purpose.
    for chapter in [3, 1, 2] {
        repo.stories
            .insert(&sample_story("Sorted Realm", chapter))
            .await
            .expect("insert failed");
    }

    let ascending = repo
        .stories
        .find_many(
            doc! { "universe_id": "Sorted Realm" },
            Some(doc! { "chapter_number": 1 }),
        )
        .await
        .expect("find_many failed");
    let numbers: Vec<i32> = ascending.iter().map(|s| s.chapter_number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);

    let descending = repo
        .stories
        .find_many(
            doc! { "universe_id": "Sorted Realm" },
            Some(doc! { "chapter_number": -1 }),
        )
        .await
        .expect("find_many failed");
    let numbers: Vec<i32> = descending.iter().map(|s| s.chapter_number).collect();
    assert_eq!(numbers, vec![3, 2, 1]);
}

#[test]
async fn test_find_many_filter_scopes_results() {
    let (repo, _store) = memory_repos();

    repo.stories
        .insert(&sample_story("Realm A", 1))
        .await
        .expect("insert failed");
    repo.stories
        .insert(&sample_story("Realm A", 2))
        .await
        .expect("insert failed");
    repo.stories
        .insert(&sample_story("Realm B", 1))
        .await
        .expect("insert failed");

    let realm_a = repo
        .stories
        .find_many(doc! { "universe_id": "Realm A" }, None)
        .await
        .expect("find_many failed");
    assert_eq!(realm_a.len(), 2);
    assert!(realm_a.iter().all(|s| s.universe_id == "Realm A"));
}

#[test]
async fn test_update_one_set_rewrites_fields() {
    let (repo, _store) = memory_repos();

    let user = User {
        username: "setter".to_string(),
        email: "setter@test.com".to_string(),
        password: "hash".to_string(),
        created_at: Utc::now(),
        ..Default::default()
    };
    repo.users.insert(&user).await.expect("insert failed");

    repo.users
        .update_one(
            doc! { "email": "setter@test.com" },
            doc! { "$set": { "bio": "updated bio" } },
        )
        .await
        .expect("update failed");

    let fetched = repo
        .users
        .find_one(doc! { "email": "setter@test.com" })
        .await
        .expect("find_one failed")
        .expect("user should exist");
    assert_eq!(fetched.bio.as_deref(), Some("updated bio"));
    // Untouched fields survive the $set.
    assert_eq!(fetched.username, "setter");
}

#[test]
async fn test_update_one_inc_accumulates() {
    let (repo, _store) = memory_repos();

    let post = ForumPost {
        title: "Counter Thread".to_string(),
        content: "counting".to_string(),
        author: "counter".to_string(),
        author_email: "counter@test.com".to_string(),
        created_at: Utc::now(),
        ..Default::default()
    };
    let id = repo.forum_posts.insert(&post).await.expect("insert failed");

    for _ in 0..2 {
        repo.forum_posts
            .update_one(doc! { "_id": &id }, doc! { "$inc": { "replies_count": 1 } })
            .await
            .expect("update failed");
    }

    let fetched = repo
        .forum_posts
        .find_one(doc! { "_id": &id })
        .await
        .expect("find_one failed")
        .expect("post should exist");
    assert_eq!(fetched.replies_count, 2);

    // An Int32 filter literal must still match the stored Int64 counter.
    let by_count = repo
        .forum_posts
        .find_one(doc! { "replies_count": 2 })
        .await
        .expect("find_one failed");
    assert!(by_count.is_some());
}

#[test]
async fn test_update_one_add_to_set_never_duplicates() {
    let (repo, _store) = memory_repos();

    let club = Club {
        name: "Dedup Society".to_string(),
        description: "test club".to_string(),
        club_type: ClubType::Discussion,
        creator: "founder".to_string(),
        members: vec!["founder@test.com".to_string()],
        created_at: Utc::now(),
    };
    let id = repo.clubs.insert(&club).await.expect("insert failed");

    // Join twice with the same email.
    for _ in 0..2 {
        repo.clubs
            .update_one(
                doc! { "_id": &id },
                doc! { "$addToSet": { "members": "joiner@test.com" } },
            )
            .await
            .expect("update failed");
    }

    let fetched = repo
        .clubs
        .find_one(doc! { "_id": &id })
        .await
        .expect("find_one failed")
        .expect("club should exist");
    assert_eq!(fetched.members.len(), 2);
    assert_eq!(
        fetched.members,
        vec!["founder@test.com".to_string(), "joiner@test.com".to_string()]
    );
}

#[test]
async fn test_update_matching_nothing_is_silent() {
    let (repo, _store) = memory_repos();

    repo.users
        .insert(&User {
            username: "bystander".to_string(),
            email: "bystander@test.com".to_string(),
            password: "hash".to_string(),
            created_at: Utc::now(),
            ..Default::default()
        })
        .await
        .expect("insert failed");

    // Filter matches no document; the call must succeed and change nothing.
    repo.users
        .update_one(
            doc! { "email": "nobody@test.com" },
            doc! { "$set": { "bio": "ghost bio" } },
        )
        .await
        .expect("zero-match update should not error");

    let bystander = repo
        .users
        .find_one(doc! { "email": "bystander@test.com" })
        .await
        .expect("find_one failed")
        .expect("user should exist");
    assert!(bystander.bio.is_none());
}

#[test]
async fn test_count_respects_filter() {
    let (repo, _store) = memory_repos();

    repo.universes
        .insert(&sample_universe("Counted One", UniverseType::Original))
        .await
        .expect("insert failed");
    repo.universes
        .insert(&sample_universe("Counted Two", UniverseType::Inspired))
        .await
        .expect("insert failed");

    let all = repo.universes.count(doc! {}).await.expect("count failed");
    assert_eq!(all, 2);

    let by_title = repo
        .universes
        .count(doc! { "title": "Counted One" })
        .await
        .expect("count failed");
    assert_eq!(by_title, 1);

    let none = repo
        .universes
        .count(doc! { "title": "Counted Three" })
        .await
        .expect("count failed");
    assert_eq!(none, 0);
}

#[test]
async fn test_find_many_caps_results() {
    let (repo, _store) = memory_repos();

    for i in 0..1005 {
        repo.lore
            .insert(&sample_lore("Big Realm", &format!("Entry {}", i)))
            .await
            .expect("insert failed");
    }

    let fetched = repo
        .lore
        .find_many(doc! { "universe_id": "Big Realm" }, None)
        .await
        .expect("find_many failed");
    assert_eq!(fetched.len(), 1000, "reads are capped at 1000 documents");
}
