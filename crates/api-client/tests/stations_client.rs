//! Integration tests for `StationsClient`.
//!
//! Each test stands up a local `wiremock` server so no real network traffic
//! is made.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fuelscope_api_client::{ApiError, ClientConfig, StationsClient};
use fuelscope_catalog::{FilterField, SchemaPreset, StationSession};
use fuelscope_core::retry::RetryConfig;

const LISTING_PATH: &str = "/EstacionesTerrestres/";

/// Millisecond backoff so retry tests stay fast.
fn fast_retry(max_attempts: u32) -> RetryConfig {
    RetryConfig {
        max_attempts,
        initial_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(5),
        ..RetryConfig::default()
    }
}

fn client_for(server: &MockServer, retry: RetryConfig) -> StationsClient {
    let config = ClientConfig::default()
        .with_url(format!("{}{}", server.uri(), LISTING_PATH))
        .with_timeout(Duration::from_secs(5))
        .with_retry(retry)
        .with_schema(SchemaPreset::Minetur);
    StationsClient::with_config(config).expect("failed to build test StationsClient")
}

fn station(brand: &str, province: &str, municipality: &str, lat: &str, lng: &str) -> serde_json::Value {
    json!({
        "Rótulo": brand,
        "Provincia": province,
        "Municipio": municipality,
        "Localidad": municipality.to_uppercase(),
        "Latitud": lat,
        "Longitud (WGS84)": lng,
        "Precio Gasoleo A": "1,459",
        "Precio Gasolina 95 E5": "1,629"
    })
}

fn envelope(entries: Vec<serde_json::Value>) -> serde_json::Value {
    json!({
        "Fecha": "18/10/2026 9:15:02",
        "ListaEESSPrecio": entries,
        "Nota": "Archivo de todos los productos",
        "ResultadoConsulta": "OK"
    })
}

#[tokio::test]
async fn fetch_listing_decodes_envelope() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(header_exists("X-Request-ID"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(vec![
            station("REPSOL", "MADRID", "Madrid", "40,416775", "-3,703790"),
            station("CEPSA", "SEVILLA", "Sevilla", "37,389092", "-5,984459"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let listing = client_for(&server, RetryConfig::no_retry())
        .fetch_listing()
        .await
        .expect("listing should decode");

    assert_eq!(listing.date.as_deref(), Some("18/10/2026 9:15:02"));
    assert_eq!(listing.records.len(), 2);
    assert_eq!(listing.records[1].brand, "CEPSA");
    assert_eq!(listing.records[0].price("Gasoleo A"), Some(1.459));
}

#[tokio::test]
async fn fetch_listing_retries_server_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let listing = client_for(&server, fast_retry(3)).fetch_listing().await;

    assert!(listing.is_ok(), "expected Ok after retries, got: {listing:?}");
    assert_eq!(server.received_requests().await.map(|r| r.len()), Some(3));
}

#[tokio::test]
async fn fetch_listing_gives_up_after_max_attempts() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(2)
        .mount(&server)
        .await;

    let err = client_for(&server, fast_retry(2))
        .fetch_listing()
        .await
        .unwrap_err();

    match err {
        ApiError::RetriesExhausted { attempts, last_error } => {
            assert_eq!(attempts, 2);
            assert!(last_error.contains("500"), "unexpected last error: {last_error}");
        }
        other => panic!("expected RetriesExhausted, got: {other:?}"),
    }
}

#[tokio::test]
async fn fetch_listing_does_not_retry_client_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server, fast_retry(3))
        .fetch_listing()
        .await
        .unwrap_err();

    assert!(err.is_client_error(), "expected 4xx, got: {err:?}");
}

#[tokio::test]
async fn fetch_listing_rejects_failed_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"ListaEESSPrecio": [], "ResultadoConsulta": "ERROR"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server, fast_retry(3))
        .fetch_listing()
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::UnexpectedListing(_)), "got: {err:?}");
}

#[tokio::test]
async fn fetch_listing_times_out_slow_servers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let config = ClientConfig::default()
        .with_url(format!("{}{}", server.uri(), LISTING_PATH))
        .with_timeout(Duration::from_millis(200))
        .with_retry(RetryConfig::no_retry());
    let err = StationsClient::with_config(config)
        .unwrap()
        .fetch_listing()
        .await
        .unwrap_err();

    match err {
        ApiError::RetriesExhausted { attempts, last_error } => {
            assert_eq!(attempts, 1);
            assert!(last_error.contains("timeout"), "unexpected last error: {last_error}");
        }
        other => panic!("expected a timeout, got: {other:?}"),
    }
}

#[tokio::test]
async fn session_refresh_feeds_the_filter_engine() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(vec![
            station("X", "A", "A-1", "40,0", "-3,0"),
            station("Y", "A", "A-2", "40,1", "-3,1"),
            station("X", "B", "B-1", "41,0", "-4,0"),
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server, RetryConfig::no_retry());
    let mut session = StationSession::new();
    session.refresh(&client).await.expect("refresh should apply");

    let engine = session.engine_mut();
    assert_eq!(engine.catalog().brands, vec!["X", "Y"]);
    assert_eq!(engine.catalog().fuel_types, vec!["Gasoleo A", "Gasolina 95 E5"]);

    engine.set_filter_field(FilterField::Province, "B");
    assert_eq!(engine.catalog().brands, vec!["X"]);
    assert_eq!(engine.filtered().len(), 1);
}
