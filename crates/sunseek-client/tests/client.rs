//! Integration tests for `SunseekClient` using wiremock HTTP mocks.

use std::time::Duration;

use sunseek_client::{ClientError, SunseekClient};
use sunseek_core::{GeoPoint, IndexType, ProjectionQuery, SearchQuery};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> SunseekClient {
    SunseekClient::new(base_url, 30, "sunseek-test").expect("client construction should not fail")
}

fn london_query() -> SearchQuery {
    SearchQuery::new("London", "2025-07-12", 9, 17, 50.0).expect("valid query")
}

fn destination(city: &str, distance: f64) -> serde_json::Value {
    serde_json::json!({
        "city": city,
        "region": "England",
        "country": "United Kingdom",
        "coordinates": {"lat": 51.0, "lon": -1.0},
        "distance": distance,
        "sunny_score": 8.4,
        "comfort_score": 6.1
    })
}

// ---------------------------------------------------------------------------
// search
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_posts_form_and_parses_results() {
    let server = MockServer::start().await;

    let expected_body = serde_json::json!({
        "from": "London",
        "date": "2025-07-12",
        "start_hour": 9,
        "end_hour": 17,
        "distance": 50
    });
    let body = serde_json::json!({
        "sunny_destinations": [destination("Brighton", 47.3), destination("Oxford", 51.9)],
        "comfortable_destinations": [destination("Bath", 97.2)]
    });

    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_json(&expected_body))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let results = client
        .search(&london_query())
        .await
        .expect("should parse results");

    assert_eq!(results.sunny_destinations.len(), 2);
    assert_eq!(results.sunny_destinations[0].city, "Brighton");
    assert_eq!(results.comfortable_destinations[0].city, "Bath");
    assert_eq!(results.sunny_destinations[1].sunny_score, Some(8.4));
}

#[tokio::test]
async fn search_sends_clamped_radius() {
    let server = MockServer::start().await;

    let query = SearchQuery::new("Leeds", "2025-07-12", 12, 12, 999.0).unwrap();
    let expected_body = serde_json::json!({
        "from": "Leeds",
        "date": "2025-07-12",
        "start_hour": 12,
        "end_hour": 12,
        "distance": 200
    });

    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_json(&expected_body))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "sunny_destinations": [destination("York", 22.0)],
            "comfortable_destinations": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    client.search(&query).await.expect("should succeed");
}

#[tokio::test]
async fn search_with_empty_rankings_is_no_data() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "sunny_destinations": [],
            "comfortable_destinations": []
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.search(&london_query()).await.unwrap_err();

    assert!(err.is_no_data(), "expected NoData, got: {err:?}");
}

#[tokio::test]
async fn search_surfaces_backend_error_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "Starting location not found"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.search(&london_query()).await.unwrap_err();

    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Starting location not found");
        }
        other => panic!("expected ClientError::Api, got: {other:?}"),
    }
}

#[tokio::test]
async fn error_shape_wins_even_with_200_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "error": "No weather data for that date"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.search(&london_query()).await.unwrap_err();

    assert!(
        matches!(err, ClientError::Api { status: 200, .. }),
        "expected Api, got: {err:?}"
    );
}

#[tokio::test]
async fn server_error_without_body_is_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.search(&london_query()).await.unwrap_err();

    assert!(
        matches!(err, ClientError::UnexpectedStatus { status: 503, .. }),
        "expected UnexpectedStatus, got: {err:?}"
    );
}

#[tokio::test]
async fn malformed_body_is_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.search(&london_query()).await.unwrap_err();

    assert!(
        matches!(err, ClientError::Deserialize { ref context, .. } if context == "search"),
        "expected Deserialize, got: {err:?}"
    );
}

#[tokio::test]
async fn slow_backend_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"sunny_destinations": []}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let client = SunseekClient::new(&server.uri(), 1, "sunseek-test").unwrap();
    let err = client.search(&london_query()).await.unwrap_err();

    assert!(
        matches!(err, ClientError::Timeout { .. }),
        "expected Timeout, got: {err:?}"
    );
    assert!(err.is_network());
}

#[tokio::test]
async fn unreachable_backend_is_network_error() {
    // Nothing listens on port 9 in the test environment.
    let client = SunseekClient::new("http://127.0.0.1:9", 5, "sunseek-test").unwrap();
    let err = client.search(&london_query()).await.unwrap_err();

    assert!(err.is_network(), "expected a network error, got: {err:?}");
}

// ---------------------------------------------------------------------------
// suggest
// ---------------------------------------------------------------------------

#[tokio::test]
async fn suggest_sends_query_and_parses_mixed_coordinates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/location-suggest"))
        .and(query_param("q", "Lon"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"display_name": "London, Greater London, England", "lat": "51.5074", "lon": "-0.1278"},
            {"display_name": "London, Ontario, Canada", "lat": 42.9849, "lon": -81.2453},
            {"display_name": "Broken", "lat": null, "lon": 0.0}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let suggestions = client.suggest("  Lon ").await.expect("should parse");

    assert_eq!(suggestions.len(), 2);
    assert_eq!(suggestions[0].display_name, "London, Greater London, England");
    assert!((suggestions[0].point.lat() - 51.5074).abs() < 1e-9);
    assert!((suggestions[1].point.lon() - -81.2453).abs() < 1e-9);
}

#[tokio::test]
async fn suggest_with_one_character_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/location-suggest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    assert!(client.suggest("L").await.unwrap().is_empty());
    assert!(client.suggest("   ").await.unwrap().is_empty());
}

#[tokio::test]
async fn suggest_honours_configured_minimum_length() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/location-suggest"))
        .and(query_param("q", "L"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"display_name": "Leeds, England", "lat": 53.8, "lon": -1.55}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri()).with_min_suggest_chars(1);
    let suggestions = client.suggest("L").await.expect("should parse");
    assert_eq!(suggestions.len(), 1);
    assert!(client.suggest("  ").await.unwrap().is_empty());
}

#[tokio::test]
async fn suggest_empty_answer_is_not_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/location-suggest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    assert!(client.suggest("Zzyzx").await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// project-weather-index
// ---------------------------------------------------------------------------

fn projection_query() -> ProjectionQuery {
    ProjectionQuery::new(
        GeoPoint::new(51.5, -0.125).unwrap(),
        25.0,
        IndexType::Comfort,
        "2025-07-12",
        10,
        16,
    )
    .expect("valid projection query")
}

#[tokio::test]
async fn projection_sends_query_params_and_parses_cells() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "cells": [{
            "id": 1,
            "center": {"latitude": 51.5, "longitude": -0.125},
            "boundaries": [
                {"latitude": 51.55, "longitude": -0.2},
                {"latitude": 51.55, "longitude": -0.05},
                {"latitude": 51.45, "longitude": -0.05},
                {"latitude": 51.45, "longitude": -0.2}
            ],
            "score": 7.25
        }],
        "total_cells": 1,
        "target_date": "2025-07-12",
        "time_range": "10:00-16:00"
    });

    Mock::given(method("GET"))
        .and(path("/project-weather-index"))
        .and(query_param("lat", "51.5"))
        .and(query_param("lon", "-0.125"))
        .and(query_param("radius", "25"))
        .and(query_param("index_type", "comfort"))
        .and(query_param("date", "2025-07-12"))
        .and(query_param("start_hour", "10"))
        .and(query_param("end_hour", "16"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let projection = client
        .project_weather_index(&projection_query())
        .await
        .expect("should parse projection");

    assert_eq!(projection.total_cells, 1);
    assert_eq!(projection.cells[0].boundaries.len(), 4);
    assert!((projection.cells[0].score - 7.25).abs() < f64::EPSILON);
    assert_eq!(projection.time_range, "10:00-16:00");
}

#[tokio::test]
async fn projection_without_cells_is_no_data() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/project-weather-index"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "cells": [],
            "total_cells": 0
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .project_weather_index(&projection_query())
        .await
        .unwrap_err();

    assert!(
        matches!(err, ClientError::NoData { endpoint } if endpoint == "/project-weather-index"),
        "expected NoData, got: {err:?}"
    );
}

#[tokio::test]
async fn base_url_prefix_is_preserved() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/location-suggest"))
        .and(query_param("q", "Bath"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"display_name": "Bath, Somerset", "lat": 51.38, "lon": -2.36}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&format!("{}/api/", server.uri()));
    let suggestions = client.suggest("Bath").await.unwrap();
    assert_eq!(suggestions.len(), 1);
}
