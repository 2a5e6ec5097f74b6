use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;
use urlencoding::encode;

use crate::types::{
    mta_stop_monitoring_response::GetStopMonitoringResponse,
    mta_vehicle_monitoring_response::GetVehicleMonitoringResponse,
};

pub const DEFAULT_MTA_HOST: &str = "https://bustime.mta.info";

#[derive(Debug)]
pub enum MtaClientError {
    Request(reqwest::Error),
    Status {
        status: reqwest::StatusCode,
        url: String,
    },
    Parse(serde_json::Error),
}

impl MtaClientError {
    /// The body arrived but did not have the expected SIRI shape.
    pub fn is_parse(&self) -> bool {
        matches!(self, MtaClientError::Parse(_))
    }
}

impl std::fmt::Display for MtaClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            MtaClientError::Request(e) => write!(f, "{}", e),
            MtaClientError::Status { status, url } => write!(f, "{} for url: {}", status, url),
            MtaClientError::Parse(e) => write!(f, "Failed to parse response body: {}", e),
        }
    }
}

impl std::error::Error for MtaClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MtaClientError::Request(e) => Some(e),
            MtaClientError::Parse(e) => Some(e),
            MtaClientError::Status { .. } => None,
        }
    }
}

#[derive(Clone)]
pub struct MtaClient {
    host: String,
    api_key: String,
    client: reqwest::Client,
}

impl MtaClient {
    pub fn new(host: String, api_key: String, timeout: Duration) -> Result<Self, MtaClientError> {
        let request_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(MtaClientError::Request)?;

        Ok(MtaClient {
            host: host.trim_end_matches('/').to_string(),
            api_key,
            client: request_client,
        })
    }

    pub async fn get_vehicle_monitoring(
        &self,
        line_ref: &str,
    ) -> Result<GetVehicleMonitoringResponse, MtaClientError> {
        self.get_siri(
            "/api/siri/vehicle-monitoring.json",
            &[
                ("LineRef", line_ref),
                ("VehicleMonitoringDetailLevel", "calls"),
            ],
        )
        .await
    }

    pub async fn get_stop_monitoring(
        &self,
        monitoring_ref: &str,
    ) -> Result<GetStopMonitoringResponse, MtaClientError> {
        self.get_siri(
            "/api/siri/stop-monitoring.json",
            &[
                ("MonitoringRef", monitoring_ref),
                ("StopMonitoringDetailLevel", "minimum"),
            ],
        )
        .await
    }

    async fn get_siri<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, MtaClientError> {
        let query = params
            .iter()
            .map(|(name, value)| format!("{}={}", name, encode(value)))
            .collect::<Vec<String>>()
            .join("&");

        // the key never goes into logs or error messages
        let redacted_url = format!("{}{}?key=***&{}", self.host, path, query);
        let url = format!(
            "{}{}?key={}&{}",
            self.host,
            path,
            encode(&self.api_key),
            query
        );

        debug!("GET {}", redacted_url);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| MtaClientError::Request(e.without_url()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(MtaClientError::Status {
                status,
                url: redacted_url,
            });
        }

        let body = resp
            .text()
            .await
            .map_err(|e| MtaClientError::Request(e.without_url()))?;

        serde_json::from_str::<T>(&body).map_err(MtaClientError::Parse)
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use serde_json::json;

    use super::*;

    fn gen_client(host: &str) -> MtaClient {
        MtaClient::new(host.to_string(), "key".to_string(), Duration::from_secs(5))
            .expect("Failed to build client")
    }

    #[tokio::test]
    async fn vehicle_monitoring_sends_siri_query() {
        let mut mock_server = mockito::Server::new_async().await;
        let client = gen_client(&mock_server.url());

        let mock = mock_server
            .mock("GET", "/api/siri/vehicle-monitoring.json")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("key".into(), "key".into()),
                Matcher::UrlEncoded("LineRef".into(), "MTA NYCT_SIM26".into()),
                Matcher::UrlEncoded("VehicleMonitoringDetailLevel".into(), "calls".into()),
            ]))
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "Siri": {"ServiceDelivery": {"VehicleMonitoringDelivery": [{"VehicleActivity": []}]}}
                })
                .to_string(),
            )
            .create_async()
            .await;

        let response = client
            .get_vehicle_monitoring("MTA NYCT_SIM26")
            .await
            .expect("Failed to fetch vehicle monitoring");

        mock.assert_async().await;
        assert_eq!(response.vehicle_activity().map(|a| a.len()), Some(0));
    }

    #[tokio::test]
    async fn stop_monitoring_sends_siri_query() {
        let mut mock_server = mockito::Server::new_async().await;
        let client = gen_client(&format!("{}/", mock_server.url()));

        let mock = mock_server
            .mock("GET", "/api/siri/stop-monitoring.json")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("key".into(), "key".into()),
                Matcher::UrlEncoded("MonitoringRef".into(), "MTA_805173".into()),
                Matcher::UrlEncoded("StopMonitoringDetailLevel".into(), "minimum".into()),
            ]))
            .with_body(
                json!({
                    "Siri": {"ServiceDelivery": {"StopMonitoringDelivery": [{"MonitoredStopVisit": []}]}}
                })
                .to_string(),
            )
            .create_async()
            .await;

        let response = client
            .get_stop_monitoring("MTA_805173")
            .await
            .expect("Failed to fetch stop monitoring");

        mock.assert_async().await;
        assert_eq!(response.stop_visits().map(|v| v.len()), Some(0));
    }

    #[tokio::test]
    async fn error_status_is_not_a_parse_error() {
        let mut mock_server = mockito::Server::new_async().await;
        let client = gen_client(&mock_server.url());

        let _mock = mock_server
            .mock("GET", "/api/siri/stop-monitoring.json")
            .match_query(Matcher::Any)
            .with_status(403)
            .create_async()
            .await;

        let err = client.get_stop_monitoring("MTA_1").await.err().unwrap();

        assert!(!err.is_parse());
        assert!(err.to_string().starts_with("403 Forbidden for url: "));
        assert!(err.to_string().contains("key=***"));
    }

    #[tokio::test]
    async fn unexpected_shape_is_a_parse_error() {
        let mut mock_server = mockito::Server::new_async().await;
        let client = gen_client(&mock_server.url());

        let _mock = mock_server
            .mock("GET", "/api/siri/vehicle-monitoring.json")
            .match_query(Matcher::Any)
            .with_body(json!({"Siri": {}}).to_string())
            .create_async()
            .await;

        let err = client
            .get_vehicle_monitoring("MTA NYCT_SIM26")
            .await
            .err()
            .unwrap();

        assert!(err.is_parse());
    }

    #[tokio::test]
    async fn unreachable_host_is_a_request_error() {
        let client = gen_client("http://127.0.0.1:1");

        let err = client.get_stop_monitoring("MTA_1").await.err().unwrap();

        assert!(matches!(err, MtaClientError::Request(_)));
        assert!(!err.to_string().contains("key="));
    }
}
