//! OpenWeatherProvider against a mock HTTP server.

use weatherwise_core::{
    Coordinates, LocationLookup, OpenWeatherProvider, Pollutant, WeatherProvider,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider(server: &MockServer) -> OpenWeatherProvider {
    OpenWeatherProvider::new("TEST_KEY".to_string())
        .with_data_url(format!("{}/data/2.5", server.uri()))
        .with_geo_url(format!("{}/geo/1.0", server.uri()))
}

fn entry(dt: i64, temp: f64, icon: &str) -> serde_json::Value {
    serde_json::json!({
        "dt": dt,
        "main": {
            "temp": temp, "feels_like": temp - 1.0, "temp_min": temp - 2.0, "temp_max": temp + 2.0,
            "pressure": 1014, "humidity": 63
        },
        "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": icon}],
        "clouds": {"all": 75},
        "wind": {"speed": 4.6, "deg": 225},
        "visibility": 9000
    })
}

#[tokio::test]
async fn resolve_returns_geocoding_matches() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", "Paris"))
        .and(query_param("limit", "1"))
        .and(query_param("appid", "TEST_KEY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"name": "Paris", "country": "FR", "state": "Ile-de-France", "lat": 48.8589, "lon": 2.32}
        ])))
        .mount(&server)
        .await;

    let places = provider(&server).resolve("Paris").await.expect("lookup should succeed");

    assert_eq!(places.len(), 1);
    assert_eq!(places[0].label(), "Paris, Ile-de-France, FR");
    assert_eq!(places[0].coordinates(), Coordinates::new(48.8589, 2.32));
}

#[tokio::test]
async fn resolve_unknown_city_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let places = provider(&server).resolve("Atlantis").await.expect("lookup should succeed");
    assert!(places.is_empty());
}

#[tokio::test]
async fn reverse_lookup_passes_coordinates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/reverse"))
        .and(query_param("lat", "51.5"))
        .and(query_param("lon", "-0.12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"name": "London", "country": "GB", "lat": 51.5, "lon": -0.12}
        ])))
        .mount(&server)
        .await;

    let places = provider(&server)
        .resolve_from_coordinates(Coordinates::new(51.5, -0.12))
        .await
        .expect("reverse lookup should succeed");

    assert_eq!(places[0].name, "London");
    assert_eq!(places[0].region, None);
}

#[tokio::test]
async fn current_conditions_are_requested_in_metric() {
    let server = MockServer::start().await;

    let mut body = entry(1_792_224_000, 12.5, "10n");
    body["timezone"] = serde_json::json!(3600);
    body["sys"] = serde_json::json!({"country": "FR", "sunrise": 1_792_220_000, "sunset": 1_792_259_000});

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("units", "metric"))
        .and(query_param("lat", "48.85"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let current = provider(&server)
        .current_conditions(Coordinates::new(48.85, 2.35))
        .await
        .expect("current conditions");

    assert_eq!(current.sample.temperature, 12.5);
    assert_eq!(current.sample.cloud_cover_percent, 75.0);
    assert_eq!(current.sample.wind_direction_degrees, 225.0);
    assert!(current.sample.is_night());
    let sun = current.sun.expect("sun times");
    assert_eq!(sun.sunrise.timestamp(), 1_792_220_000);
    assert_eq!(sun.sunrise.offset().local_minus_utc(), 3600);
}

#[tokio::test]
async fn forecast_keeps_provider_order() {
    let server = MockServer::start().await;

    let list: Vec<_> = (0..40).map(|i| entry(1_792_224_000 + i * 10_800, 10.0 + i as f64, "04d")).collect();

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"cnt": 40, "list": list})),
        )
        .mount(&server)
        .await;

    let samples = provider(&server)
        .forecast(Coordinates::new(48.85, 2.35))
        .await
        .expect("forecast");

    assert_eq!(samples.len(), 40);
    assert_eq!(samples[0].temperature, 10.0);
    assert!(samples.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    assert_eq!(samples[0].condition_description, "light rain");
}

#[tokio::test]
async fn air_quality_maps_components() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/air_pollution"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "coord": {"lon": 2.35, "lat": 48.85},
            "list": [{
                "dt": 1_792_224_000,
                "main": {"aqi": 4},
                "components": {"co": 201.94, "no": 0.02, "no2": 0.77, "o3": 68.66, "pm2_5": 0.5, "pm10": 0.54, "nh3": 0.12}
            }]
        })))
        .mount(&server)
        .await;

    let air = provider(&server)
        .air_quality(Coordinates::new(48.85, 2.35))
        .await
        .expect("request succeeds")
        .expect("reading present");

    assert_eq!(air.index, 4);
    let shown: Vec<_> = air.readings().map(|(p, _)| p).collect();
    assert_eq!(
        shown,
        vec![Pollutant::Pm2_5, Pollutant::Pm10, Pollutant::O3, Pollutant::No2, Pollutant::Co]
    );
}

#[tokio::test]
async fn air_quality_with_empty_list_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/air_pollution"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"list": []})))
        .mount(&server)
        .await;

    let air = provider(&server).air_quality(Coordinates::new(0.0, 0.0)).await.expect("request");
    assert!(air.is_none());
}

#[tokio::test]
async fn unauthorized_reports_invalid_api_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "cod": 401, "message": "Invalid API key."
        })))
        .mount(&server)
        .await;

    let err = provider(&server).forecast(Coordinates::new(0.0, 0.0)).await.unwrap_err();
    assert!(err.to_string().starts_with("Invalid API key."));
}

#[tokio::test]
async fn server_error_reports_friendly_message_with_detail_in_chain() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let err = provider(&server)
        .current_conditions(Coordinates::new(0.0, 0.0))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Failed to fetch weather data. Please try again.");
    let chain = format!("{err:#}");
    assert!(chain.contains("503"));
    assert!(chain.contains("upstream down"));
}

#[tokio::test]
async fn malformed_json_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;

    let err = provider(&server).forecast(Coordinates::new(0.0, 0.0)).await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to fetch forecast data. Please try again.");
    assert!(format!("{err:#}").contains("Failed to parse OpenWeather forecast JSON"));
}
