//! HTTP-level tests for the Satu Sehat client against a mock SIMRS API.

use satusehat_sync_monitor::satusehat_client::models::DATA_SYNC;
use satusehat_sync_monitor::satusehat_client::ConnectionStatus;
use satusehat_sync_monitor::{Config, MonitorError, SatuSehatClient, SessionContext, SyncBackend};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> SatuSehatClient {
    let config = Config {
        api_base_url: format!("{}/api/", server.uri()),
        request_timeout_secs: 1,
        ..Config::default()
    };
    SatuSehatClient::new(&config).unwrap()
}

fn session() -> SessionContext {
    SessionContext::new("session-token").with_facility("RS-0042")
}

fn status_body() -> serde_json::Value {
    json!({
        "dataSync": {"total": 1200, "synced": 1100, "percentage": 92},
        "fhirResources": {"total": 300, "synced": 150, "percentage": 50},
        "connection": {"status": "connected", "responseTime": 180, "uptime": 99.5},
        "validation": {"total": 40, "valid": 38, "percentage": 95},
        "lastSync": "2024-06-10T04:15:00Z"
    })
}

// =============================================================================
// Status Endpoint
// =============================================================================

mod status {
    use super::*;

    #[tokio::test]
    async fn fetches_and_parses_report_with_session_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/sync/status"))
            .and(header("authorization", "Bearer session-token"))
            .and(header("x-facility-id", "RS-0042"))
            .respond_with(ResponseTemplate::new(200).set_body_json(status_body()))
            .expect(1)
            .mount(&server)
            .await;

        let report = client_for(&server).fetch_status(&session()).await.unwrap();

        assert_eq!(report.categories.len(), 3);
        assert_eq!(report.category(DATA_SYNC).unwrap().percentage(), 92);
        assert_eq!(report.connection.status, ConnectionStatus::Connected);
        assert_eq!(report.summary().overall_percentage, 84);
        assert_eq!(
            report.summary().worst_category.unwrap().name(),
            "fhirResources"
        );
    }

    #[tokio::test]
    async fn server_error_is_connection_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/sync/status"))
            .respond_with(
                ResponseTemplate::new(503).set_body_json(json!({"message": "registry offline"})),
            )
            .mount(&server)
            .await;

        match client_for(&server).fetch_status(&session()).await {
            Err(MonitorError::Connection(message)) => {
                assert!(message.contains("registry offline"), "{message}")
            }
            other => panic!("expected Connection error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn slow_server_times_out_as_connection_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/sync/status"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(status_body())
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let result = client_for(&server).fetch_status(&session()).await;
        assert!(matches!(result, Err(MonitorError::Connection(_))), "{result:?}");
    }

    #[tokio::test]
    async fn unreachable_server_is_connection_error() {
        let config = Config {
            api_base_url: "http://127.0.0.1:1/api".to_string(),
            request_timeout_secs: 1,
            ..Config::default()
        };
        let client = SatuSehatClient::new(&config).unwrap();

        let result = client.fetch_status(&session()).await;
        assert!(matches!(result, Err(MonitorError::Connection(_))), "{result:?}");
    }

    #[tokio::test]
    async fn negative_counts_are_validation_errors() {
        let server = MockServer::start().await;
        let mut body = status_body();
        body["dataSync"]["synced"] = json!(-4);
        Mock::given(method("GET"))
            .and(path("/api/sync/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let result = client_for(&server).fetch_status(&session()).await;
        assert!(matches!(result, Err(MonitorError::Validation(_))), "{result:?}");
    }

    #[tokio::test]
    async fn missing_category_is_validation_error() {
        let server = MockServer::start().await;
        let mut body = status_body();
        body.as_object_mut().unwrap().remove("validation");
        Mock::given(method("GET"))
            .and(path("/api/sync/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let result = client_for(&server).fetch_status(&session()).await;
        assert!(matches!(result, Err(MonitorError::Validation(_))), "{result:?}");
    }

    #[tokio::test]
    async fn non_json_body_is_validation_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/sync/status"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
            .mount(&server)
            .await;

        let result = client_for(&server).fetch_status(&session()).await;
        assert!(matches!(result, Err(MonitorError::Validation(_))), "{result:?}");
    }
}

// =============================================================================
// Trigger Endpoint
// =============================================================================

mod trigger {
    use super::*;

    #[tokio::test]
    async fn successful_trigger_returns_result() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/sync/trigger"))
            .and(header("authorization", "Bearer session-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "message": "128 resources sent",
                "syncTime": "2099-01-01T00:00:00Z"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let result = client_for(&server).trigger_sync(&session()).await.unwrap();
        assert!(result.success);
        assert_eq!(result.message, "128 resources sent");
        assert_eq!(result.completed_at.to_rfc3339(), "2099-01-01T00:00:00+00:00");
    }

    #[tokio::test]
    async fn unsuccessful_body_is_sync_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/sync/trigger"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "message": "Satu Sehat token expired",
                "syncTime": "2024-06-10T04:15:00Z"
            })))
            .mount(&server)
            .await;

        match client_for(&server).trigger_sync(&session()).await {
            Err(MonitorError::Sync(message)) => assert_eq!(message, "Satu Sehat token expired"),
            other => panic!("expected Sync error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn server_error_is_sync_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/sync/trigger"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream failure"))
            .mount(&server)
            .await;

        match client_for(&server).trigger_sync(&session()).await {
            Err(MonitorError::Sync(message)) => assert!(message.contains("upstream failure")),
            other => panic!("expected Sync error, got {other:?}"),
        }
    }
}
