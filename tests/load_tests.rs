//! Loader behaviour against in-memory stores.

mod common;

use common::{csv_dataset, list, load, memory_store, movie};
use moviedb::config::LoaderConfig;
use moviedb::dataset::{Dataset, ListCell};
use moviedb::entities::{
    certificate, genre, movie as movie_entity, movie_genre_association, movie_worker_association,
    prelude::*, worker,
};
use moviedb::loader::{LoadError, Loader, Pass, PassOutcome};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use std::collections::HashSet;

#[tokio::test]
async fn test_single_row_pg13_scenario() {
    let store = memory_store().await;
    let dataset = csv_dataset(
        "X,2020,PG-13,110,\"['Action', 'Drama']\",['A thing happens.'],['A. Director'],['B. Star'],7.1,5000,64,1000000\n",
    );

    let report = load(&store, &dataset).await;
    assert!(report.is_complete(), "{report:?}");

    let movie = Movie::find_by_id(1).one(&store.conn).await.unwrap().unwrap();
    assert_eq!(movie.title, "X");
    let cert = Certificate::find_by_id(movie.certificate_id.unwrap())
        .one(&store.conn)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cert.name, "PG-13");
    assert_eq!(cert.description, "Description placeholder");

    let genres = Genre::find()
        .order_by_asc(genre::Column::Name)
        .all(&store.conn)
        .await
        .unwrap();
    let names: Vec<&str> = genres.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["Action", "Drama"]);

    let links = MovieGenreAssociation::find().all(&store.conn).await.unwrap();
    assert_eq!(links.len(), 2);
    assert!(links.iter().all(|l| l.movie_id == 1));

    let director = Worker::find()
        .filter(worker::Column::FullName.eq("A. Director"))
        .one(&store.conn)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(director.role_id, 1);

    let star = Worker::find()
        .filter(worker::Column::FullName.eq("B. Star"))
        .one(&store.conn)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(star.role_id, 2);

    let credited: HashSet<i32> = MovieWorkerAssociation::find()
        .filter(movie_worker_association::Column::MovieId.eq(1))
        .all(&store.conn)
        .await
        .unwrap()
        .into_iter()
        .map(|l| l.worker_id)
        .collect();
    assert_eq!(credited, HashSet::from([director.worker_id, star.worker_id]));
}

#[tokio::test]
async fn test_movie_ids_follow_row_position() {
    let store = memory_store().await;
    let mut rows = vec![movie("A", 2001), movie("B", 2002), movie("C", 2003)];
    rows[0].certification = Some("R".to_string());
    rows[1].certification = Some("   ".to_string());
    rows[2].certification = Some("PG".to_string());

    let report = load(&store, &Dataset::new(rows)).await;
    assert!(report.is_complete(), "{report:?}");

    let movies = Movie::find()
        .order_by_asc(movie_entity::Column::MovieId)
        .all(&store.conn)
        .await
        .unwrap();
    let ids: Vec<i32> = movies.iter().map(|m| m.movie_id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(movies[1].title, "B");
    assert!(movies[0].certificate_id.is_some());
    assert!(movies[1].certificate_id.is_none());
    assert!(movies[2].certificate_id.is_some());
}

#[tokio::test]
async fn test_lookup_names_are_unique() {
    let store = memory_store().await;
    let mut a = movie("A", 2010);
    a.certification = Some("PG-13".to_string());
    a.genres = list(&["Drama", "Action"]);
    let mut b = movie("B", 2011);
    b.certification = Some(" PG-13 ".to_string());
    b.genres = list(&[" Action ", "Comedy"]);

    let report = load(&store, &Dataset::new(vec![a, b])).await;
    assert!(report.is_complete(), "{report:?}");

    let genres: Vec<String> = Genre::find()
        .all(&store.conn)
        .await
        .unwrap()
        .into_iter()
        .map(|g| g.name)
        .collect();
    let unique: HashSet<&String> = genres.iter().collect();
    assert_eq!(genres.len(), 3);
    assert_eq!(unique.len(), genres.len());

    let certificates = Certificate::find()
        .filter(certificate::Column::Name.eq("PG-13"))
        .count(&store.conn)
        .await
        .unwrap();
    assert_eq!(certificates, 1);
}

#[tokio::test]
async fn test_worker_rows_split_by_role() {
    let store = memory_store().await;
    let mut a = movie("A", 2010);
    a.directors = list(&["Only Director"]);
    a.stars = list(&["Both Ways"]);
    let mut b = movie("B", 2011);
    b.directors = list(&["Both Ways", "Only Director"]);
    b.stars = list(&["Someone Else"]);

    let report = load(&store, &Dataset::new(vec![a, b])).await;
    assert!(report.is_complete(), "{report:?}");

    let only = Worker::find()
        .filter(worker::Column::FullName.eq("Only Director"))
        .all(&store.conn)
        .await
        .unwrap();
    assert_eq!(only.len(), 1);
    assert_eq!(only[0].role_id, 1);

    let both: HashSet<i32> = Worker::find()
        .filter(worker::Column::FullName.eq("Both Ways"))
        .all(&store.conn)
        .await
        .unwrap()
        .into_iter()
        .map(|w| w.role_id)
        .collect();
    assert_eq!(both, HashSet::from([1, 2]));

    assert_eq!(Worker::find().count(&store.conn).await.unwrap(), 4);
}

#[tokio::test]
async fn test_repeated_names_in_one_row_link_once() {
    let store = memory_store().await;
    let mut a = movie("A", 2010);
    a.genres = list(&["Drama", "Drama", " Drama "]);
    a.stars = list(&["Same Star", "Same Star"]);

    let report = load(&store, &Dataset::new(vec![a])).await;
    assert!(report.is_complete(), "{report:?}");

    let genre_links = MovieGenreAssociation::find()
        .filter(movie_genre_association::Column::MovieId.eq(1))
        .count(&store.conn)
        .await
        .unwrap();
    assert_eq!(genre_links, 1);

    let worker_links = MovieWorkerAssociation::find().count(&store.conn).await.unwrap();
    assert_eq!(worker_links, 1);
}

#[tokio::test]
async fn test_metrics_link_round_trips() {
    let store = memory_store().await;
    let mut a = movie("A", 2010);
    a.metascore = Some(72.4);
    a.gross = Some(1_234_567.6);
    let b = movie("B", 2011);

    let report = load(&store, &Dataset::new(vec![a, b])).await;
    assert!(report.is_complete(), "{report:?}");

    for movie in Movie::find().all(&store.conn).await.unwrap() {
        let metrics_id = movie.metrics_id.expect("metrics_id backfilled");
        let metrics = MovieMetrics::find_by_id(metrics_id)
            .one(&store.conn)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(metrics.movie_id, Some(movie.movie_id));
    }

    let first = MovieMetrics::find()
        .filter(moviedb::entities::movie_metrics::Column::MovieId.eq(1))
        .one(&store.conn)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first.metascore, Some(72));
    assert_eq!(first.revenue, Some(1_234_568));
    assert_eq!(first.rating, Some(7.0));
}

#[tokio::test]
async fn test_unparsable_description_is_null() {
    let store = memory_store().await;
    let mut a = movie("A", 2010);
    a.description = ListCell::Literal("this is not a list".to_string());
    let mut b = movie("B", 2011);
    b.description = list(&["First.", "Second."]);

    let report = load(&store, &Dataset::new(vec![a, b])).await;
    assert!(report.is_complete(), "{report:?}");

    let a = Movie::find_by_id(1).one(&store.conn).await.unwrap().unwrap();
    let b = Movie::find_by_id(2).one(&store.conn).await.unwrap().unwrap();
    assert_eq!(a.description, None);
    assert_eq!(b.description.as_deref(), Some("First. Second."));
}

#[tokio::test]
async fn test_malformed_director_rolls_back_director_passes_only() {
    let store = memory_store().await;
    let mut a = movie("A", 2010);
    a.genres = list(&["Drama"]);
    a.directors = ListCell::Literal("A. Director".to_string());
    a.stars = list(&["B. Star"]);

    let report = load(&store, &Dataset::new(vec![a])).await;
    assert!(!report.is_complete());

    let failed: Vec<Pass> = report.rolled_back().map(|p| p.pass).collect();
    assert_eq!(failed, vec![Pass::Workers, Pass::MovieWorkerAssociations]);

    assert_eq!(Worker::find().count(&store.conn).await.unwrap(), 0);
    assert_eq!(Movie::find().count(&store.conn).await.unwrap(), 1);
    assert_eq!(
        MovieGenreAssociation::find().count(&store.conn).await.unwrap(),
        1
    );

    match &report.get(Pass::Workers).unwrap().outcome {
        PassOutcome::RolledBack { error } => assert!(error.contains("director"), "{error}"),
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_year_fails_movies_pass() {
    let store = memory_store().await;
    let mut a = movie("A", 2010);
    a.release_year = None;

    let report = load(&store, &Dataset::new(vec![a, movie("B", 2011)])).await;

    let movies = report.get(Pass::Movies).unwrap();
    assert!(!movies.committed());
    assert_eq!(Movie::find().count(&store.conn).await.unwrap(), 0);
    assert!(report.get(Pass::Genres).unwrap().committed());
}

#[tokio::test]
async fn test_blank_credit_names_are_ignored() {
    let store = memory_store().await;
    let mut a = movie("A", 2010);
    a.directors = list(&["Known"]);
    a.stars = list(&["  "]);

    let report = load(&store, &Dataset::new(vec![a])).await;
    assert!(report.is_complete(), "{report:?}");
    assert_eq!(
        MovieWorkerAssociation::find().count(&store.conn).await.unwrap(),
        1
    );
}

#[tokio::test]
async fn test_rerun_is_refused_on_populated_store() {
    let store = memory_store().await;
    let dataset = Dataset::new(vec![movie("A", 2010), movie("B", 2011)]);
    assert!(load(&store, &dataset).await.is_complete());

    let err = Loader::new(&store, LoaderConfig::default())
        .run(&dataset)
        .await
        .unwrap_err();
    assert!(matches!(err, LoadError::AlreadyLoaded { movies: 2 }));
    assert_eq!(MovieMetrics::find().count(&store.conn).await.unwrap(), 2);
}

#[tokio::test]
async fn test_forced_rerun_fails_movies_atomically() {
    let store = memory_store().await;
    let mut a = movie("A", 2010);
    a.genres = list(&["Drama"]);
    a.certification = Some("R".to_string());
    let dataset = Dataset::new(vec![a, movie("B", 2011)]);
    assert!(load(&store, &dataset).await.is_complete());

    let config = LoaderConfig {
        force: true,
        ..LoaderConfig::default()
    };
    let report = Loader::new(&store, config).run(&dataset).await.unwrap();

    assert_eq!(
        report.get(Pass::Certificates).unwrap().outcome,
        PassOutcome::Committed { rows: 0 }
    );
    assert_eq!(
        report.get(Pass::Roles).unwrap().outcome,
        PassOutcome::Committed { rows: 0 }
    );
    assert!(!report.get(Pass::Movies).unwrap().committed());
    assert!(!report.get(Pass::MovieGenreAssociations).unwrap().committed());

    assert_eq!(Movie::find().count(&store.conn).await.unwrap(), 2);
    assert_eq!(Genre::find().count(&store.conn).await.unwrap(), 1);
    assert_eq!(
        MovieGenreAssociation::find().count(&store.conn).await.unwrap(),
        1
    );
}

#[tokio::test]
async fn test_unavailable_store_rolls_back_every_pass() {
    let store = memory_store().await;
    let config = LoaderConfig {
        force: true,
        ..LoaderConfig::default()
    };
    let loader = Loader::new(&store, config);
    store.conn.close().await.unwrap();

    let report = loader
        .run(&Dataset::new(vec![movie("A", 2010)]))
        .await
        .expect("pass boundary failures are recorded, not returned");

    assert_eq!(report.passes.len(), Pass::ALL.len());
    assert_eq!(report.rolled_back().count(), Pass::ALL.len());
}

#[tokio::test]
async fn test_small_chunks_insert_everything() {
    let store = memory_store().await;
    let rows: Vec<_> = (0..25)
        .map(|i| {
            let mut row = movie(&format!("Movie {i}"), 2000 + i);
            row.stars = ListCell::items([format!("Star {i}"), "Shared Star".to_string()]);
            row
        })
        .collect();

    let config = LoaderConfig {
        insert_chunk_size: 4,
        ..LoaderConfig::default()
    };
    let report = Loader::new(&store, config)
        .run(&Dataset::new(rows))
        .await
        .unwrap();

    assert!(report.is_complete(), "{report:?}");
    assert_eq!(
        report.get(Pass::Workers).unwrap().outcome,
        PassOutcome::Committed { rows: 26 }
    );
    assert_eq!(Movie::find().count(&store.conn).await.unwrap(), 25);
    assert_eq!(
        MovieWorkerAssociation::find().count(&store.conn).await.unwrap(),
        50
    );
}
