//! Integration tests for `GeocodingClient` using wiremock HTTP mocks.

use fieldmap_geocode::{GeocodeError, Geocoder, GeocodingClient};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds a client against the mock server: 5-second timeout, no retries.
fn test_client(server: &MockServer) -> GeocodingClient {
    client_with_retries(server, 0)
}

fn client_with_retries(server: &MockServer, max_retries: u32) -> GeocodingClient {
    let base_url = format!("{}/search", server.uri());
    GeocodingClient::new(&base_url, 5, "fieldmap-test/0.1", max_retries, 0)
        .expect("client construction should not fail")
}

#[tokio::test]
async fn lookup_returns_first_match() {
    let server = MockServer::start().await;

    let body = json!([
        {
            "lat": "48.8588897",
            "lon": "2.3200410",
            "display_name": "Paris, Île-de-France, France"
        },
        { "lat": "33.6617962", "lon": "-95.5555130", "display_name": "Paris, Texas" }
    ]);

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Paris"))
        .and(query_param("format", "json"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let coordinate = client
        .lookup("Paris", None)
        .await
        .expect("lookup should succeed")
        .expect("should have a match");

    assert!((coordinate.lat - 48.858_889_7).abs() < 1e-9);
    assert!((coordinate.lon - 2.320_041).abs() < 1e-9);
}

#[tokio::test]
async fn lookup_accepts_numeric_coordinates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "lat": 45.764, "lon": 4.8357 }])),
        )
        .mount(&server)
        .await;

    let coordinate = test_client(&server)
        .lookup("Lyon", None)
        .await
        .unwrap()
        .unwrap();
    assert!((coordinate.lat - 45.764).abs() < 1e-9);
}

#[tokio::test]
async fn lookup_sends_country_bias() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Namur"))
        .and(query_param("countrycodes", "be"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{ "lat": "50.4669", "lon": "4.8675" }])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let coordinate = test_client(&server).lookup("Namur", Some("be")).await.unwrap();
    assert!(coordinate.is_some());
}

#[tokio::test]
async fn empty_array_is_no_match() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = test_client(&server);
    assert!(client.lookup("zzzz", None).await.unwrap().is_none());
    assert!(client.geocode("zzzz", None).await.is_none());
}

#[tokio::test]
async fn server_error_surfaces_from_lookup_but_not_geocode() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client.lookup("Paris", None).await.unwrap_err();
    assert!(matches!(err, GeocodeError::Http(_)), "got {err:?}");
    assert!(client.geocode("Paris", None).await.is_none());
}

#[tokio::test]
async fn malformed_body_is_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client.lookup("Paris", None).await.unwrap_err();
    assert!(matches!(err, GeocodeError::Deserialize { .. }), "got {err:?}");
    assert!(client.geocode("Paris", None).await.is_none());
}

#[tokio::test]
async fn out_of_range_match_is_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "lat": "123", "lon": "2" }])),
        )
        .mount(&server)
        .await;

    let err = test_client(&server)
        .lookup("Nowhere", None)
        .await
        .unwrap_err();
    assert!(matches!(err, GeocodeError::InvalidCoordinate(_)), "got {err:?}");
}

#[tokio::test]
async fn transient_error_is_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "lat": "48.85", "lon": "2.35" }])),
        )
        .mount(&server)
        .await;

    let client = client_with_retries(&server, 1);
    let coordinate = client.lookup("Paris", None).await.unwrap();
    assert!(coordinate.is_some());
}

#[tokio::test]
async fn client_error_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(400))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with_retries(&server, 3);
    assert!(client.lookup("Paris", None).await.is_err());
}
