//! End-to-end tests: HTTP front server → datagram relay → ingest → store.

use std::time::Duration;

use axum::http::StatusCode;
use form_relay::lifecycle;

mod common;

#[tokio::test]
async fn test_post_is_stored() {
    let dir = tempfile::tempdir().unwrap();
    let config = common::test_config(28381, 28382, dir.path());
    let running = lifecycle::start(&config).await.unwrap();

    let res = common::client()
        .post(format!("http://{}/anything", running.http_addr()))
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body("name=Alice&email=a%40b.com")
        .send()
        .await
        .expect("front server unreachable");

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["content-type"], "text/html");
    assert!(res.text().await.unwrap().contains("Thank you"));

    let record = common::wait_for_entries(&config.store.path, 1).await;
    assert_eq!(record.len(), 1);
    let fields = record.values().next().unwrap();
    assert_eq!(*fields, serde_json::json!({ "name": "Alice", "email": "a@b.com" }));

    running.stop().await;
}

#[tokio::test]
async fn test_malformed_post_is_confirmed_but_not_stored() {
    let dir = tempfile::tempdir().unwrap();
    let config = common::test_config(28481, 28482, dir.path());
    let running = lifecycle::start(&config).await.unwrap();
    let client = common::client();
    let url = format!("http://{}/", running.http_addr());

    let res = client.post(&url).body("a=1&bad").send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK, "persistence outcome never reaches the client");

    // A valid submission after the bad one proves the ingest loop kept going.
    let res = client.post(&url).body("a=2&a=3").send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let record = common::wait_for_entries(&config.store.path, 1).await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    let record_after = common::wait_for_entries(&config.store.path, 1).await;

    assert_eq!(record.len(), 1);
    assert_eq!(record_after.len(), 1);
    assert_eq!(record.values().next().unwrap()["a"], "3");

    running.stop().await;
}

#[tokio::test]
async fn test_sequential_posts_are_separate_entries() {
    let dir = tempfile::tempdir().unwrap();
    let config = common::test_config(28581, 28582, dir.path());
    let running = lifecycle::start(&config).await.unwrap();
    let client = common::client();
    let url = format!("http://{}/message", running.http_addr());

    client.post(&url).body("n=1").send().await.unwrap();
    common::wait_for_entries(&config.store.path, 1).await;
    client.post(&url).body("n=2").send().await.unwrap();

    let record = common::wait_for_entries(&config.store.path, 2).await;
    assert_eq!(record.len(), 2);
    let mut values: Vec<_> = record.values().map(|v| v["n"].as_str().unwrap().to_string()).collect();
    values.sort();
    assert_eq!(values, ["1", "2"]);

    running.stop().await;
}

#[tokio::test]
async fn test_get_routes() {
    let dir = tempfile::tempdir().unwrap();
    let config = common::test_config(28681, 28682, dir.path());
    let running = lifecycle::start(&config).await.unwrap();
    let client = common::client();
    let base = format!("http://{}", running.http_addr());

    for path in ["/", "/message.html"] {
        let res = client.get(format!("{}{}", base, path)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::OK, "{}", path);
        assert_eq!(res.headers()["content-type"], "text/html", "{}", path);
    }

    let res = client.get(format!("{}/style.css", base)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["content-type"], "text/css");

    let res = client.get(format!("{}/does-not-exist.xyz", base)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // GET traffic never reaches the store.
    let record = form_relay::FormStore::new(&config.store.path).load().await.unwrap();
    assert!(record.is_empty());

    running.stop().await;
}

#[tokio::test]
async fn test_stop_releases_sockets() {
    let dir = tempfile::tempdir().unwrap();
    let config = common::test_config(28781, 28782, dir.path());

    let running = lifecycle::start(&config).await.unwrap();
    running.stop().await;

    let running = lifecycle::start(&config).await.expect("ports were not released");
    running.stop().await;
}
