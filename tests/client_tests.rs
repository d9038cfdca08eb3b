//! Tests for the HTTP clients against mock servers
//!
//! Tests cover:
//! - Fetching and decoding forecasts
//! - Posting messages to Slack
//! - Pushing metrics to a Pushgateway

use reqwest::{Client, StatusCode, Url};
use tenki_report::client::{ClientError, TenkiClient};
use tenki_report::metrics::MetricExtractor;
use tenki_report::push::{PushClient, PushError};
use tenki_report::slack::{SlackClient, SlackError};
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKYO: &str = "130010";
const TOKYO_JSON: &str = include_str!("testdata/tokyo.json");

fn server_url(server: &MockServer) -> Url {
    Url::parse(&server.uri()).unwrap()
}

// ============================================================================
// Forecast client
// ============================================================================

mod forecast_tests {
    use super::*;

    #[tokio::test]
    async fn forecast_decodes_response() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/forecast/city/130010"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(TOKYO_JSON, "application/json"))
            .expect(1)
            .mount(&server)
            .await;

        let client = TenkiClient::new(Client::new(), server_url(&server));
        let res = client.forecast(TOKYO).await.unwrap();

        assert_eq!("2023/05/01 17:00:00", res.public_time_formatted);
        assert_eq!("晴れています。\n夜は月が見えるでしょう。\n", res.description.text);
        assert_eq!(3, res.forecasts.len());

        let today = &res.forecasts[0];
        assert_eq!("今日", today.date_label);
        assert_eq!("2023-05-01", today.date);
        assert_eq!(Some("0"), today.temperature.min.celsius.as_deref());
        assert_eq!(Some("30"), today.temperature.max.celsius.as_deref());
        assert_eq!("--%", today.chance_of_rain.t00_06);
        assert_eq!("70%", today.chance_of_rain.t18_24);
        assert_eq!(Some("南の風　やや強く　５メートル"), today.detail.wind.as_deref());

        let day_after = &res.forecasts[2];
        assert_eq!(None, day_after.temperature.max.celsius);
        assert_eq!(None, day_after.detail.wind);

        assert_eq!("東京", res.location.unwrap().city);
    }

    #[tokio::test]
    async fn forecast_unknown_city() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/forecast/city/999999"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = TenkiClient::new(Client::new(), server_url(&server));
        let err = client.forecast("999999").await.unwrap_err();

        assert!(matches!(err, ClientError::InvalidCity(ref c) if c == "999999"));
    }

    #[tokio::test]
    async fn forecast_server_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&server)
            .await;

        let client = TenkiClient::new(Client::new(), server_url(&server));
        let err = client.forecast(TOKYO).await.unwrap_err();

        assert!(matches!(err, ClientError::Unexpected(status, _) if status == StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[tokio::test]
    async fn forecast_invalid_json() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let client = TenkiClient::new(Client::new(), server_url(&server));
        let err = client.forecast(TOKYO).await.unwrap_err();

        assert!(matches!(err, ClientError::Internal(_)));
    }
}

// ============================================================================
// Slack client
// ============================================================================

mod slack_tests {
    use super::*;

    #[tokio::test]
    async fn post_message_ok() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/chat.postMessage"))
            .and(header("authorization", "Bearer xoxb-test"))
            .and(body_json(serde_json::json!({
                "channel": "C0123456789",
                "text": "message"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "channel": "C0123456789",
                "ts": "1682928000.000100"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = SlackClient::new(Client::new(), server_url(&server), "xoxb-test");
        let ts = client.post_message("C0123456789", "message").await.unwrap();

        assert_eq!("1682928000.000100", ts);
    }

    #[tokio::test]
    async fn post_message_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/chat.postMessage"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": false,
                "error": "too_many_attachments"
            })))
            .mount(&server)
            .await;

        let client = SlackClient::new(Client::new(), server_url(&server), "xoxb-test");
        let err = client.post_message("C0123456789", "message").await.unwrap_err();

        assert!(matches!(err, SlackError::Api(ref e) if e == "too_many_attachments"));
        assert_eq!("can not post. too_many_attachments", err.to_string());
    }

    #[tokio::test]
    async fn post_message_http_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = SlackClient::new(Client::new(), server_url(&server), "xoxb-test");
        let err = client.post_message("C0123456789", "message").await.unwrap_err();

        assert!(matches!(err, SlackError::Unexpected(status, _) if status == StatusCode::SERVICE_UNAVAILABLE));
    }
}

// ============================================================================
// Pushgateway client
// ============================================================================

mod push_tests {
    use super::*;
    use tenki_report::client::ForecastResponse;

    fn today_samples() -> Vec<tenki_report::metrics::MetricSample> {
        let res: ForecastResponse = serde_json::from_str(TOKYO_JSON).unwrap();
        MetricExtractor::full().extract(&res.forecasts[0])
    }

    #[tokio::test]
    async fn push_sends_text_format() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/metrics/job/tenki_report/city/130010"))
            .and(header("content-type", "text/plain; version=0.0.4"))
            .and(body_string_contains(
                "tenki_chance_of_rain_12_18{category=\"rain\",exporter=\"tenki_report\"}",
            ))
            .and(body_string_contains("# TYPE tenki_wind_speed gauge"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = PushClient::new(Client::new(), server_url(&server));
        let res = client.push("tenki_report", &[("city", TOKYO)], &today_samples()).await;

        assert!(res.is_ok());
    }

    #[tokio::test]
    async fn push_accepted() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&server)
            .await;

        let client = PushClient::new(Client::new(), server_url(&server));
        assert!(client.push("tenki_report", &[], &today_samples()).await.is_ok());
    }

    #[tokio::test]
    async fn push_rejected() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(400).set_body_string("text format parsing error"))
            .mount(&server)
            .await;

        let client = PushClient::new(Client::new(), server_url(&server));
        let err = client.push("tenki_report", &[], &today_samples()).await.unwrap_err();

        assert!(matches!(err, PushError::Unexpected(status, _) if status == StatusCode::BAD_REQUEST));
    }
}
