#![allow(dead_code)]

use moviedb::Store;
use moviedb::config::LoaderConfig;
use moviedb::dataset::{Dataset, ListCell, MovieRow};
use moviedb::loader::{LoadReport, Loader};

pub const HEADER: &str = "Movie Name,Year of Release,Certification,Run Time in minutes,Genre,Description,Director,Stars,Movie Rating,Votes,MetaScore,Gross\n";

pub async fn memory_store() -> Store {
    let store = Store::connect("sqlite::memory:")
        .await
        .expect("failed to open in-memory store");
    store
        .initialize_schema()
        .await
        .expect("failed to initialize schema");
    store
}

pub fn temp_db_url(prefix: &str) -> (String, std::path::PathBuf) {
    let path = std::env::temp_dir()
        .join(format!("{prefix}-{}", uuid::Uuid::new_v4()))
        .join("moviedb.db");
    (format!("sqlite:{}", path.display()), path)
}

pub fn csv_dataset(body: &str) -> Dataset {
    Dataset::from_reader(format!("{HEADER}{body}").as_bytes()).expect("fixture csv must parse")
}

/// A movie with the required columns filled in.
pub fn movie(title: &str, year: i32) -> MovieRow {
    MovieRow {
        title: title.to_string(),
        release_year: Some(year),
        duration_minutes: Some(100),
        rating: Some(7.0),
        votes: Some(1000),
        ..MovieRow::default()
    }
}

pub fn list(items: &[&str]) -> ListCell {
    ListCell::items(items.iter().copied())
}

pub async fn load(store: &Store, dataset: &Dataset) -> LoadReport {
    Loader::new(store, LoaderConfig::default())
        .run(dataset)
        .await
        .expect("load should start")
}

/// Five movies over 2019-2021 with overlapping genres and credits.
pub fn catalogue() -> Dataset {
    let specs: [(&str, i32, &[&str], &[&str], &[&str], Option<f64>, Option<f64>, f64, &str); 5] = [
        ("Alpha", 2020, &["Action", "Drama"], &["Dir One"], &["Star A", "Star B"], Some(80.0), Some(500.0), 8.0, "A heist in space."),
        ("Beta", 2020, &["Comedy"], &["Dir Two"], &["Star A"], Some(60.0), Some(900.0), 6.0, "A wedding goes wrong."),
        ("Gamma", 2021, &["Action"], &["Dir One"], &["Star C"], Some(90.0), Some(300.0), 9.0, "Space pirates attack."),
        ("Delta", 2021, &["Drama"], &["Dir Two"], &["Star B"], None, Some(100.0), 5.0, "A quiet space drama."),
        ("Epsilon", 2019, &["Action"], &["Dir Three"], &[], Some(70.0), None, 7.0, "Love in wartime."),
    ];

    let rows = specs
        .into_iter()
        .map(|(title, year, genres, directors, stars, metascore, gross, rating, description)| {
            let mut row = movie(title, year);
            row.certification = Some("PG-13".to_string());
            row.genres = list(genres);
            row.directors = list(directors);
            row.stars = list(stars);
            row.metascore = metascore;
            row.gross = gross;
            row.rating = Some(rating);
            row.description = list(&[description]);
            row
        })
        .collect();

    Dataset::new(rows)
}

pub async fn loaded_store() -> Store {
    let store = memory_store().await;
    let report = load(&store, &catalogue()).await;
    assert!(report.is_complete(), "{report:?}");
    store
}
