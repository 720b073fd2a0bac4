use bson::doc;
use chrono::Utc;

use crate::models::{
    Character, CharacterRole, Genre, LoreCategory, LoreEntry, Story, Universe, UniverseType,
};
use crate::repository::Repositories;
use crate::store::StoreError;

/// Populates empty collections with sample content so a fresh deployment has
/// something to browse.
///
/// Idempotent per collection: any collection that already has documents is
/// left alone, so this is safe to run on every startup and never touches
/// user-created data.
pub async fn run(repo: &Repositories) -> Result<(), StoreError> {
    seed_universes(repo).await?;
    seed_stories(repo).await?;
    seed_characters(repo).await?;
    seed_lore(repo).await?;
    Ok(())
}

fn universe(
    title: &str,
    description: &str,
    universe_type: UniverseType,
    genre: Genre,
    author: &str,
    author_email: &str,
) -> Universe {
    Universe {
        title: title.to_string(),
        description: description.to_string(),
        universe_type,
        genre,
        author: author.to_string(),
        author_email: author_email.to_string(),
        cover_image: None,
        is_premium: false,
        created_at: Utc::now(),
        ..Default::default()
    }
}

async fn seed_universes(repo: &Repositories) -> Result<(), StoreError> {
    if repo.universes.count(doc! {}).await? > 0 {
        return Ok(());
    }

    let sample_universes = [
        universe(
            "Chronicles of Aether",
            "A mystical realm where magic and technology intertwine. Follow heroes as they navigate floating cities and ancient mysteries.",
            UniverseType::Original,
            Genre::Fantasy,
            "Nova Starweaver",
            "nova.starweaver@fictionverse.dev",
        ),
        universe(
            "Neon Shadows",
            "In a cyberpunk dystopia, hackers fight against corporate overlords. High-tech thrills meet underground resistance.",
            UniverseType::Original,
            Genre::Cyberpunk,
            "Cipher Echo",
            "cipher.echo@fictionverse.dev",
        ),
        universe(
            "The Last Garden",
            "After Earth's collapse, survivors discover a hidden sanctuary. Hope blooms in the most unexpected places.",
            UniverseType::Original,
            Genre::SciFi,
            "Eden Bloom",
            "eden.bloom@fictionverse.dev",
        ),
        universe(
            "Wizards United",
            "Expanding on the magical world we love, new students discover hidden chambers and forgotten spells at Hogwarts.",
            UniverseType::Inspired,
            Genre::Fantasy,
            "Mystic Quill",
            "mystic.quill@fictionverse.dev",
        ),
        universe(
            "Middle Earth: The Fourth Age",
            "Long after the Ring was destroyed, new threats emerge. Descendants of heroes must rise once more.",
            UniverseType::Inspired,
            Genre::Fantasy,
            "Ranger's Tale",
            "rangers.tale@fictionverse.dev",
        ),
        universe(
            "Starfleet Academy Chronicles",
            "Before the Enterprise, cadets learn what it means to explore strange new worlds and seek out new life.",
            UniverseType::Inspired,
            Genre::SciFi,
            "Commander Stellar",
            "commander.stellar@fictionverse.dev",
        ),
    ];

    for sample in &sample_universes {
        repo.universes.insert(sample).await?;
    }
    tracing::info!(count = sample_universes.len(), "Sample universes seeded successfully");
    Ok(())
}

async fn seed_stories(repo: &Repositories) -> Result<(), StoreError> {
    if repo.stories.count(doc! {}).await? > 0 {
        return Ok(());
    }

    let chapters = [
        Story {
            universe_id: "Neon Shadows".to_string(),
            title: "Jack In".to_string(),
            content: "Raven's fingers hovered over the deck. Somewhere above the smog line, \
                      Helix Corp's mainframe hummed, and tonight she would hear it sing."
                .to_string(),
            chapter_number: 1,
            author: "Cipher Echo".to_string(),
            author_email: "cipher.echo@fictionverse.dev".to_string(),
            created_at: Utc::now(),
            ..Default::default()
        },
        Story {
            universe_id: "Neon Shadows".to_string(),
            title: "Ghost Protocol".to_string(),
            content: "The trace hit her three layers deep. Raven burned two proxies and a \
                      year of favors getting out, and the data she carried was worth all of it."
                .to_string(),
            chapter_number: 2,
            author: "Cipher Echo".to_string(),
            author_email: "cipher.echo@fictionverse.dev".to_string(),
            created_at: Utc::now(),
            ..Default::default()
        },
    ];

    for chapter in &chapters {
        repo.stories.insert(chapter).await?;
    }
    tracing::info!(count = chapters.len(), "Sample chapters seeded successfully");
    Ok(())
}

async fn seed_characters(repo: &Repositories) -> Result<(), StoreError> {
    if repo.characters.count(doc! {}).await? > 0 {
        return Ok(());
    }

    let cast = [
        Character {
            universe_id: "Neon Shadows".to_string(),
            name: "Raven Nyx".to_string(),
            description: "A console cowgirl running jobs out of the undercity, one score away \
                          from buying her brother out of corporate indenture."
                .to_string(),
            role: CharacterRole::Protagonist,
            image_url: None,
            traits: vec![
                "resourceful".to_string(),
                "loyal".to_string(),
                "reckless".to_string(),
            ],
            backstory: Some(
                "Orphaned in the Grid Wars, raised by the Undermarket's fixers.".to_string(),
            ),
            created_at: Utc::now(),
        },
        Character {
            universe_id: "Neon Shadows".to_string(),
            name: "Director Voss".to_string(),
            description: "Helix Corp's head of security, equal parts bureaucrat and bloodhound."
                .to_string(),
            role: CharacterRole::Antagonist,
            image_url: None,
            traits: vec!["methodical".to_string(), "patient".to_string()],
            backstory: None,
            created_at: Utc::now(),
        },
    ];

    for character in &cast {
        repo.characters.insert(character).await?;
    }
    tracing::info!(count = cast.len(), "Sample characters seeded successfully");
    Ok(())
}

async fn seed_lore(repo: &Repositories) -> Result<(), StoreError> {
    if repo.lore.count(doc! {}).await? > 0 {
        return Ok(());
    }

    let entries = [
        LoreEntry {
            universe_id: "Neon Shadows".to_string(),
            title: "The Grid Wars".to_string(),
            content: "Thirty years ago the megacorps fought their last open war inside the \
                      network itself. The cities kept the blackout scars; the survivors kept \
                      the grudges."
                .to_string(),
            category: LoreCategory::History,
            created_at: Utc::now(),
        },
        LoreEntry {
            universe_id: "Neon Shadows".to_string(),
            title: "Neural Jacks".to_string(),
            content: "Direct cortical interfaces, licensed and metered by Helix Corp. Unlicensed \
                      jacks run hotter, burn out faster, and cannot be tracked."
                .to_string(),
            category: LoreCategory::Technology,
            created_at: Utc::now(),
        },
    ];

    for entry in &entries {
        repo.lore.insert(entry).await?;
    }
    tracing::info!(count = entries.len(), "Sample lore entries seeded successfully");
    Ok(())
}
