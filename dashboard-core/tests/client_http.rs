//! Integration tests for HttpWeatherClient against a mock backend.

use weather_dashboard_core::{
    ClientError, Coordinates, HttpWeatherClient, Location, WeatherApi,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn location(s: &str) -> Location {
    Location::parse(s).unwrap()
}

#[tokio::test]
async fn test_current_weather_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/current-weather"))
        .and(query_param("location", "New York"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "location": "New York, US",
            "icon": "01d",
            "description": "clear sky",
            "temperature": 24.5,
            "feels_like": 25.1,
            "humidity": 40,
            "pressure": 1016,
            "wind_speed": 3.6,
            "wind_direction": 200,
            "clouds": 0,
            "visibility": 10000,
            "timestamp": 1_710_072_000,
            "sunrise": 1_710_051_000,
            "sunset": 1_710_093_000
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpWeatherClient::new(&mock_server.uri(), None).unwrap();
    let reading = client.current_weather(&location("New York")).await.unwrap();

    assert_eq!(reading.location, "New York, US");
    assert_eq!(reading.temperature, 24.5);
    assert_eq!(reading.humidity, 40.0);
    assert_eq!(reading.wind_direction, Some(200.0));
    assert_eq!(reading.visibility, Some(10000.0));
    assert_eq!(reading.sunset, Some(1_710_093_000));
}

#[tokio::test]
async fn test_current_weather_missing_fields_default() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/current-weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "location": "Nowhere"
        })))
        .mount(&mock_server)
        .await;

    let client = HttpWeatherClient::new(&mock_server.uri(), None).unwrap();
    let reading = client.current_weather(&location("Nowhere")).await.unwrap();

    assert_eq!(reading.temperature, 0.0);
    assert_eq!(reading.description, "");
    assert_eq!(reading.sunrise, None);
}

#[tokio::test]
async fn test_current_weather_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/current-weather"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "error": "Could not retrieve weather data"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpWeatherClient::new(&mock_server.uri(), None).unwrap();
    let err = client.current_weather(&location("London")).await.unwrap_err();

    assert!(err.is_network());
    assert_eq!(err.status().map(|s| s.as_u16()), Some(500));
}

#[tokio::test]
async fn test_current_weather_malformed_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/current-weather"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let client = HttpWeatherClient::new(&mock_server.uri(), None).unwrap();
    let err = client.current_weather(&location("London")).await.unwrap_err();

    assert!(matches!(err, ClientError::MalformedResponse { .. }));
    assert!(!err.is_network());
}

#[tokio::test]
async fn test_forecast_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/forecast"))
        .and(query_param("location", "São Paulo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"dt": 1_710_072_000, "temp": 28.0, "temp_min": 27.0, "temp_max": 29.5,
             "humidity": 70, "icon": "02d", "description": "few clouds"},
            {"dt": 1_710_082_800, "temp": 26.0, "temp_min": 25.0, "temp_max": 26.5,
             "humidity": 75, "icon": "10d", "description": "light rain"}
        ])))
        .mount(&mock_server)
        .await;

    let client = HttpWeatherClient::new(&mock_server.uri(), None).unwrap();
    let points = client.forecast(&location("São Paulo")).await.unwrap();

    assert_eq!(points.len(), 2);
    assert_eq!(points[0].temp_max, 29.5);
    assert_eq!(points[1].description, "light rain");
}

#[tokio::test]
async fn test_forecast_empty_and_null_are_valid() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/forecast"))
        .and(query_param("location", "Empty"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/forecast"))
        .and(query_param("location", "Null"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&mock_server)
        .await;

    let client = HttpWeatherClient::new(&mock_server.uri(), None).unwrap();

    assert!(client.forecast(&location("Empty")).await.unwrap().is_empty());
    assert!(client.forecast(&location("Null")).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_reverse_geocode() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/reverse-geocode"))
        .and(query_param("lat", "51.5072"))
        .and(query_param("lon", "-0.1276"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "city": "London",
            "raw": {"country": "GB"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpWeatherClient::new(&mock_server.uri(), None).unwrap();
    let place = client
        .reverse_geocode(Coordinates {
            latitude: 51.5072,
            longitude: -0.1276,
        })
        .await
        .unwrap();

    assert_eq!(place.city, "London");
}

#[tokio::test]
async fn test_reverse_geocode_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/reverse-geocode"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "error": "no results"
        })))
        .mount(&mock_server)
        .await;

    let client = HttpWeatherClient::new(&mock_server.uri(), None).unwrap();
    let err = client
        .reverse_geocode(Coordinates {
            latitude: 0.0,
            longitude: 0.0,
        })
        .await
        .unwrap_err();

    assert_eq!(err.status().map(|s| s.as_u16()), Some(404));
}

#[tokio::test]
async fn test_transport_failure() {
    // Grab a free port and release it so nothing is listening there.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client = HttpWeatherClient::new(&format!("http://127.0.0.1:{port}"), None).unwrap();
    let err = client.current_weather(&location("London")).await.unwrap_err();

    assert!(matches!(err, ClientError::Transport { .. }));
    assert!(err.is_network());
}
