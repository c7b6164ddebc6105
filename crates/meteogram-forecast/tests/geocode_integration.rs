//! Integration tests for GeocodingClient using wiremock.

use meteogram_core::GeocodingConfig;
use meteogram_forecast::location::FixedGeolocation;
use meteogram_forecast::{locate_current, GeocodingClient, SearchOutcome};
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> GeocodingClient {
    GeocodingClient::new(&GeocodingConfig {
        base_url: server.uri(),
        ..GeocodingConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_search_parses_string_coordinates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Boulder"))
        .and(query_param("format", "json"))
        .and(query_param("limit", "5"))
        .and(query_param("addressdetails", "1"))
        .and(header("user-agent", "WeatherForecastApp/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {
                "display_name": "Boulder, Boulder County, Colorado, United States",
                "lat": "40.0149856",
                "lon": "-105.270545",
                "address": { "city": "Boulder" }
            },
            {
                "display_name": "Broken entry",
                "lat": "not-a-number",
                "lon": "1.0"
            },
            {
                "display_name": "Boulder, Montana, United States",
                "lat": "46.2365",
                "lon": "-112.1208"
            }
        ])))
        .mount(&server)
        .await;

    let hits = client_for(&server).search("Boulder").await.unwrap();

    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].name, "Boulder, Boulder County, Colorado, United States");
    assert!((hits[0].lat - 40.0149856).abs() < 1e-9);
    assert!((hits[0].lon + 105.270545).abs() < 1e-9);
    assert_eq!(hits[1].name, "Boulder, Montana, United States");
}

#[tokio::test]
async fn test_search_empty_and_error_outcomes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "zzzz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "boom"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server);

    let empty = SearchOutcome::from_result(client.search("zzzz").await);
    assert_eq!(empty, SearchOutcome::NoResults);

    let failed = SearchOutcome::from_result(client.search("boom").await);
    assert_eq!(failed, SearchOutcome::Failed);
    assert_eq!(failed.message(), Some("Error searching location"));
}

#[tokio::test]
async fn test_reverse_uses_display_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reverse"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "display_name": "Pearl Street, Boulder, Colorado"
        })))
        .mount(&server)
        .await;

    let location = client_for(&server).reverse(40.0176, -105.2797).await;

    assert_eq!(location.name, "Pearl Street, Boulder, Colorado");
    assert_eq!(location.lat, 40.0176);
}

#[tokio::test]
async fn test_reverse_falls_back_to_coordinates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reverse"))
        .and(query_param("lat", "10.5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "error": "Unable to geocode"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/reverse"))
        .and(query_param("lat", "20.5"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let client = client_for(&server);

    let missing = client.reverse(10.5, 20.25).await;
    assert_eq!(missing.name, "10.5000, 20.2500");

    let failed = client.reverse(20.5, 30.125).await;
    assert_eq!(failed.name, "20.5000, 30.1250");
}

#[tokio::test]
async fn test_locate_current_names_position() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "display_name": "Golden, Colorado"
        })))
        .mount(&server)
        .await;

    let provider = FixedGeolocation {
        lat: 39.7555,
        lon: -105.2211,
    };
    let location = locate_current(&provider, &client_for(&server)).await.unwrap();

    assert_eq!(location.name, "Golden, Colorado");
    assert_eq!((location.lat, location.lon), (39.7555, -105.2211));
}

#[tokio::test]
async fn test_search_gives_up_after_configured_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([]))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let client = GeocodingClient::new(&GeocodingConfig {
        base_url: server.uri(),
        request_timeout_secs: 1,
        ..GeocodingConfig::default()
    })
    .unwrap();

    let outcome = SearchOutcome::from_result(client.search("Boulder").await);
    assert_eq!(outcome, SearchOutcome::Failed);
}
