mod common;

use axum::http::StatusCode;
use common::{movie, popular, series, spawn_app};
use pretty_assertions::assert_eq;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

#[tokio::test]
async fn no_history_means_no_top_picks() {
    let app = spawn_app(vec![movie("A", "Drama")]).await;

    let history = app.get("/api/v1/history").await;
    assert_eq!(history.status, StatusCode::OK);
    assert_eq!(history.data().as_array().unwrap().len(), 0);

    let picks = app.get("/api/v1/top-picks").await;
    assert_eq!(picks.status, StatusCode::OK);
    assert!(picks.titles().is_empty());
}

#[tokio::test]
async fn corrupt_cookie_reads_as_empty_history() {
    let app = spawn_app(vec![]).await;
    let res = app
        .get_with_cookie("/api/v1/history", Some("viewHistory=%7Bnot-json"))
        .await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data().as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn viewed_genres_drive_top_picks() {
    let seen = movie("Seen", "Horror");
    let seen_id = seen.id;
    let mut unreleased = movie("Soon", "Horror");
    unreleased.release_date = Some(OffsetDateTime::now_utc() + Duration::days(10));
    let mut hot = popular("Hot Horror", 1);
    hot.genre = Some("Horror".into());

    let app = spawn_app(vec![
        seen,
        series("Haunted", "Horror"),
        movie("Laughs", "Comedy"),
        unreleased,
        hot,
    ])
    .await;

    let detail = app.get(&format!("/api/v1/content/{seen_id}")).await;
    let cookie = detail.cookie_pair().expect("history cookie");

    let history = app.get_with_cookie("/api/v1/history", Some(&cookie)).await;
    let entries = history.data().as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["contentId"], seen_id.to_string());
    assert_eq!(entries[0]["genre"], "Horror");

    let picks = app.get_with_cookie("/api/v1/top-picks", Some(&cookie)).await;
    assert_eq!(picks.titles(), vec!["Hot Horror", "Seen", "Haunted"]);
}

#[tokio::test]
async fn history_keeps_the_last_five_views() {
    let items: Vec<_> = (0..6).map(|i| movie(&format!("M{i}"), "Drama")).collect();
    let ids: Vec<Uuid> = items.iter().map(|c| c.id).collect();
    let app = spawn_app(items).await;

    let mut cookie: Option<String> = None;
    for id in &ids {
        let res = app
            .get_with_cookie(&format!("/api/v1/content/{id}"), cookie.as_deref())
            .await;
        cookie = res.cookie_pair();
    }

    let history = app.get_with_cookie("/api/v1/history", cookie.as_deref()).await;
    let seen: Vec<String> = history
        .data()
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["contentId"].as_str().unwrap().to_string())
        .collect();
    let expected: Vec<String> = ids[1..].iter().map(Uuid::to_string).collect();
    assert_eq!(seen, expected);
}
