//! Scripted sessions through the interactive menu.

mod common;

use common::{loaded_store, memory_store};
use moviedb::Store;
use moviedb::cli::menu::Menu;
use moviedb::config::AnalyticsConfig;
use std::io::Cursor;

async fn session(store: &Store, config: &AnalyticsConfig, script: &str) -> String {
    let mut menu = Menu::new(store, config, Cursor::new(script.to_string()), Vec::new());
    menu.run().await.unwrap();
    String::from_utf8(menu.into_output()).unwrap()
}

#[tokio::test]
async fn test_help_invalid_and_exit() {
    let store = memory_store().await;
    let out = session(&store, &AnalyticsConfig::default(), "help\nbogus\nexit\n1\n").await;

    assert_eq!(out.matches("Select an option:").count(), 2);
    assert!(out.contains("Invalid choice."));
    // nothing after exit is read
    assert!(!out.contains("how many years"));
}

#[tokio::test]
async fn test_end_of_input_leaves_the_loop() {
    let store = memory_store().await;
    let out = session(&store, &AnalyticsConfig::default(), "").await;
    assert!(out.contains("Enter your choice (1, 2, 3, 4, 5, exit, help): "));
}

#[tokio::test]
async fn test_top_genres_for_last_years() {
    let store = loaded_store().await;
    let out = session(&store, &AnalyticsConfig::default(), "1\n2\nexit\n").await;

    assert!(out.contains("Top Genre"));
    assert!(out.contains("2021   Action"));
    assert!(out.contains("2020   Comedy"));
}

#[tokio::test]
async fn test_configured_latest_year_wins() {
    let store = loaded_store().await;
    let config = AnalyticsConfig {
        latest_year: Some(2020),
        ..AnalyticsConfig::default()
    };
    let out = session(&store, &config, "1\n1\n").await;

    assert!(out.contains("2020   Comedy"));
    assert!(!out.contains("2021   Action"));
}

#[tokio::test]
async fn test_years_must_be_numeric() {
    let store = loaded_store().await;
    let out = session(&store, &AnalyticsConfig::default(), "1\nabc\n1\n-3\n").await;
    assert_eq!(
        out.matches("Invalid input for years. Please enter a valid number.")
            .count(),
        2
    );
}

#[tokio::test]
async fn test_genre_trend_reprompts_until_listed() {
    let store = loaded_store().await;
    let out = session(&store, &AnalyticsConfig::default(), "2\nHorror\nAction\n3\n").await;

    assert!(out.contains("Available Genres:"));
    assert!(out.contains("Invalid genre. Please enter a valid genre from the list above."));
    assert!(out.contains("Average revenue by year for Action (last 3 years)"));
    assert!(out.contains("Average rating by year for Action (last 3 years)"));
    assert!(out.contains("9.00"));
}

#[tokio::test]
async fn test_genre_trend_on_empty_store() {
    let store = memory_store().await;
    let out = session(&store, &AnalyticsConfig::default(), "2\n").await;
    assert!(out.contains("No genres available. Please check your database."));
}

#[tokio::test]
async fn test_top_genres_on_empty_store() {
    let store = memory_store().await;
    let out = session(&store, &AnalyticsConfig::default(), "1\n5\n").await;
    assert!(out.contains("No movies loaded."));
}

#[tokio::test]
async fn test_director_lookup() {
    let store = loaded_store().await;

    let out = session(&store, &AnalyticsConfig::default(), "3\n  Dir One \n").await;
    assert!(out.contains("Director Dir One is suitable to work with these actors in this order:"));
    assert!(out.contains("Star C, Star A, Star B"));

    let out = session(&store, &AnalyticsConfig::default(), "3\nNobody\n").await;
    assert!(out.contains("No data found for the director named Nobody."));
}

#[tokio::test]
async fn test_buzzwords_until_sentinel() {
    let store = loaded_store().await;
    let out = session(&store, &AnalyticsConfig::default(), "4\nspace\nN\nexit\n").await;

    assert!(out.contains("TOP 1 best-match by metascore"));
    assert!(out.contains("Movie Title: Gamma"));
    assert!(out.contains("TOP 2 best-match by metascore"));
    assert!(out.contains("Movie Title: Alpha"));
    assert!(!out.contains("Movie Title: Delta"));
}

#[tokio::test]
async fn test_buzzword_limit_from_config() {
    let store = loaded_store().await;
    let config = AnalyticsConfig {
        buzzword_limit: 1,
        ..AnalyticsConfig::default()
    };
    let out = session(&store, &config, "4\nspace\nN\n").await;

    assert!(out.contains("TOP 1 best-match by metascore"));
    assert!(!out.contains("TOP 2 best-match by metascore"));
}

#[tokio::test]
async fn test_above_average_revenue() {
    let store = loaded_store().await;
    let out = session(&store, &AnalyticsConfig::default(), "5\nspace\n").await;

    assert!(out.contains("title: Alpha"));
    assert!(out.contains("directors: Dir One"));
    assert!(out.contains("revenue: 500"));
    assert!(out.contains("average_revenue: 300.00"));
}

#[tokio::test]
async fn test_query_errors_do_not_end_the_session() {
    // no schema: every query fails
    let store = Store::connect("sqlite::memory:").await.unwrap();
    let out = session(&store, &AnalyticsConfig::default(), "3\nhelp\n").await;

    assert!(out.contains("Error while executing query"));
    assert_eq!(out.matches("Select an option:").count(), 2);
}
