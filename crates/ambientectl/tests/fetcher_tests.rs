//! HTTP fetcher tests against a local server.

use ambiente_shared::{FetchError, SensorKey, Timestamp, DEFAULT_TIMESTAMP_FORMAT};
use ambientectl::config::Config;
use ambientectl::commands::render_once;
use ambientectl::fetcher::{DataFetcher, HttpFetcher, RecordingFetcher};
use ambientectl::renderer::RenderOutcome;
use ambientectl::surface::{MemorySurface, SharedSurface};
use axum::http::{header, StatusCode};
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use std::time::Duration;

const BODY: &str = r#"[
  {"ts": 1000, "device": "A", "sensors": {"temp": 21}},
  {"ts": 2000, "device": "B", "sensors": {"temp": 22, "hum": 40},
   "metrics": {"i2cLatencyUs": 800, "wifiRSSI": -60, "resetReason": "POWERON"}}
]"#;

async fn serve() -> String {
    let app = Router::new()
        .route(
            "/api/data",
            get(|| async { ([(header::CONTENT_TYPE, "application/json")], BODY) }),
        )
        .route(
            "/broken/api/data",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        )
        .route("/html/api/data", get(|| async { "<html>not json</html>" }))
        .route("/object/api/data", get(|| async { r#"{"ts": 1}"# }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn fetcher(base: &str, prefix: &str) -> HttpFetcher {
    HttpFetcher::new(
        format!("{}{}/api/data", base, prefix),
        Some(Duration::from_secs(5)),
    )
    .unwrap()
}

#[tokio::test]
async fn test_fetch_parses_readings_in_order() {
    let base = serve().await;
    let readings = fetcher(&base, "").try_fetch().await.unwrap();

    assert_eq!(readings.len(), 2);
    assert_eq!(readings[0].ts, Some(Timestamp::Millis(1000)));
    assert_eq!(readings[1].device_label(), "B");
    assert_eq!(readings[1].sensor(SensorKey::Hum), Some(40.0));
    assert_eq!(readings[0].sensor(SensorKey::Hum), None);
}

#[tokio::test]
async fn test_server_error_is_empty_batch() {
    let base = serve().await;
    let broken = fetcher(&base, "/broken");

    assert!(matches!(broken.try_fetch().await, Err(FetchError::Status(500))));
    assert!(broken.fetch().await.is_empty());
}

#[tokio::test]
async fn test_unparseable_body_is_empty_batch() {
    let base = serve().await;
    for prefix in ["/html", "/object"] {
        let bad = fetcher(&base, prefix);
        assert!(
            matches!(bad.try_fetch().await, Err(FetchError::Decode(_))),
            "{}",
            prefix
        );
        assert!(bad.fetch().await.is_empty());
    }
}

#[tokio::test]
async fn test_unreachable_endpoint_is_empty_batch() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let gone = HttpFetcher::new(
        format!("http://{}/api/data", addr),
        Some(Duration::from_secs(2)),
    )
    .unwrap();
    assert!(matches!(gone.try_fetch().await, Err(FetchError::Transport(_))));
    assert!(gone.fetch().await.is_empty());
}

#[tokio::test]
async fn test_recording_fetcher_keeps_health_of_last_success() {
    let base = serve().await;
    let surface = SharedSurface::new(MemorySurface::dashboard());

    let ok = RecordingFetcher::new(Arc::new(fetcher(&base, "")), surface.clone());
    assert_eq!(ok.fetch().await.len(), 2);
    let health = surface.lock().health().cloned().unwrap();
    assert_eq!(health.readings, 2);
    assert!(surface.lock().last_fetch().is_some());

    let broken = RecordingFetcher::new(Arc::new(fetcher(&base, "/broken")), surface.clone());
    assert!(broken.fetch().await.is_empty());
    assert_eq!(surface.lock().health(), Some(&health));
}

#[tokio::test]
async fn test_render_once_table_and_charts() {
    let base = serve().await;
    let config = Config {
        base_url: base.clone(),
        ..Config::default()
    };
    let http: Arc<dyn DataFetcher> = Arc::new(HttpFetcher::from_config(&config).unwrap());

    let (outcome, text) = render_once(http.clone(), &config, "/datos", false).await;
    assert_eq!(outcome, RenderOutcome::Rendered { items: 2 });
    let newest = Timestamp::Millis(2000).format(DEFAULT_TIMESTAMP_FORMAT);
    let oldest = Timestamp::Millis(1000).format(DEFAULT_TIMESTAMP_FORMAT);
    let newest_at = text.find(&newest).unwrap();
    let oldest_at = text.find(&oldest).unwrap();
    assert!(newest_at < oldest_at, "latest reading comes first:\n{}", text);

    let (outcome, text) = render_once(http, &config, "/metricas", false).await;
    assert_eq!(outcome, RenderOutcome::Rendered { items: 5 });
    assert!(text.contains(SensorKey::Temp.label()));
}

#[tokio::test]
async fn test_render_once_against_failing_endpoint() {
    let base = serve().await;
    let config = Config {
        base_url: format!("{}/broken", base),
        ..Config::default()
    };
    let http: Arc<dyn DataFetcher> = Arc::new(HttpFetcher::from_config(&config).unwrap());

    let (outcome, text) = render_once(http.clone(), &config, "/datos", false).await;
    assert_eq!(outcome, RenderOutcome::Rendered { items: 0 });
    assert!(text.contains("(no readings)"));

    let (outcome, _) = render_once(http, &config, "/metricas", false).await;
    assert_eq!(outcome, RenderOutcome::EmptyDataset);
}
