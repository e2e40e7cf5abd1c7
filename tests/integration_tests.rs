use cualprofe::ratings::{aggregate, aggregate_by_professor, ratings_for, recent, tag_counts};
use cualprofe::search::{paginate, search};
use cualprofe::store::{FileStore, load_professors, load_ratings};
use std::path::PathBuf;

fn fixtures() -> FileStore {
    FileStore::new(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures"))
}

#[tokio::test]
async fn test_full_pipeline() {
    let store = fixtures();
    let ratings = load_ratings(&store, "ratings").await.expect("Failed to load ratings");
    assert_eq!(ratings.len(), 5);

    let stats = aggregate(ratings_for(&ratings, "p1"));
    assert_eq!(stats.average_quality, 4.0);
    assert_eq!(stats.average_difficulty, 3.0);
    assert_eq!(stats.would_take_again_percent, 50);
    assert_eq!(stats.distribution, [1, 0, 1, 0, 0]);
    assert_eq!(stats.top_tags, vec!["Exigente", "Divertido"]);
}

#[tokio::test]
async fn test_malformed_fields_only_drop_their_own_contribution() {
    let ratings = load_ratings(&fixtures(), "ratings").await.unwrap();
    let stats = aggregate(ratings_for(&ratings, "p2"));

    assert_eq!(stats.rating_count, 2);
    assert_eq!(stats.average_quality, 4.0);
    assert_eq!(stats.average_difficulty, 4.0);
    assert_eq!(stats.would_take_again_percent, 50);
    assert_eq!(stats.distribution, [0, 1, 0, 0, 0]);
    assert_eq!(stats.top_tags, vec!["Barco"]);
}

#[tokio::test]
async fn test_grouping_and_directory() {
    let store = fixtures();
    let ratings = load_ratings(&store, "ratings").await.unwrap();
    let professors = load_professors(&store, "professors").await.unwrap();

    let grouped = aggregate_by_professor(&ratings);
    assert_eq!(grouped.unattributed, 1);
    assert!(!grouped.stats.contains_key("p3"));

    let unam = search(&professors, "unam");
    let names: Vec<&str> = unam.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Ana Ríos", "Carla Méndez"]);

    let page = paginate(unam, 2, 1);
    assert_eq!(page.items[0].id, "p3");
    assert!(!page.has_next);
}

#[tokio::test]
async fn test_recent_listing_and_tags() {
    let ratings = load_ratings(&fixtures(), "ratings").await.unwrap();

    let p1 = ratings_for(&ratings, "p1");
    let latest = recent(p1.iter().copied(), 1);
    assert_eq!(latest.len(), 1);
    assert_eq!(latest[0].quality, Some(3.0));

    let counts = tag_counts(&ratings);
    assert_eq!(counts[0], ("Exigente".to_string(), 2));
    assert_eq!(counts.len(), 3);
}
