// src/core/dispatcher/backend.rs

use crate::core::dispatcher::normalize::check_embedded_error;
use crate::core::errors::ScanError;
use crate::core::models::{ScanRequest, ScannerType};
use serde_json::{Value, json};
use std::path::Path;
use tracing::{debug, info, warn};
use url::Url;

/// Path of the scan endpoint on the local backend for each scanner type.
pub fn scan_path(scanner_type: ScannerType) -> &'static str {
    match scanner_type {
        ScannerType::Network => "/api/network-scan",
        ScannerType::Port => "/api/port-scan",
        ScannerType::Traffic => "/api/capture-traffic",
        ScannerType::Vulnerability => "/api/vulnerability-scan",
    }
}

const INTERFACES_PATH: &str = "/api/network-interfaces";
const DOWNLOAD_CAPTURE_PATH: &str = "/api/download-capture";

/// Client for the optional local scanning backend.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: Url,
}

impl BackendClient {
    pub fn new(client: reqwest::Client, base_url: &str) -> Result<Self, ScanError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ScanError::InvalidRequest(format!("invalid backend URL '{base_url}': {e}")))?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ScanError> {
        self.base_url
            .join(path)
            .map_err(|e| ScanError::InvalidRequest(format!("cannot build backend URL for {path}: {e}")))
    }

    async fn expect_success(response: reqwest::Response, path: &str) -> Result<reqwest::Response, ScanError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        warn!(path, status = %status, "Backend responded with an error status.");
        Err(ScanError::UpstreamRejected {
            status: status.as_u16(),
            message: if body.is_empty() { format!("backend {path} failed") } else { body },
        })
    }

    /// Posts the scan to the backend. Any non-2xx status or transport failure
    /// is an error; the caller moves on to the next strategy.
    pub async fn scan(&self, request: &ScanRequest) -> Result<Value, ScanError> {
        let path = scan_path(request.scanner_type);
        let url = self.endpoint(path)?;
        debug!(url = %url, "Posting scan to local backend.");

        let response = self.client.post(url).json(&request.body()).send().await.map_err(|e| {
            debug!(path, error = %e, "Backend not available.");
            ScanError::from(e)
        })?;
        let response = Self::expect_success(response, path).await?;
        let body: Value = response
            .json()
            .await
            .map_err(|e| ScanError::MalformedResponse(format!("backend {path}: {e}")))?;
        info!(path, "Backend scan succeeded.");
        check_embedded_error(body)
    }

    /// Interfaces the backend can capture on. Accepts either a bare list or
    /// `{ "interfaces": [...] }`, with entries as names or `{ "name": ... }`.
    pub async fn network_interfaces(&self) -> Result<Vec<String>, ScanError> {
        let url = self.endpoint(INTERFACES_PATH)?;
        let response = self.client.get(url).send().await?;
        let response = Self::expect_success(response, INTERFACES_PATH).await?;
        let body: Value = response
            .json()
            .await
            .map_err(|e| ScanError::MalformedResponse(format!("backend {INTERFACES_PATH}: {e}")))?;
        let body = check_embedded_error(body)?;

        let list = match &body {
            Value::Array(items) => items,
            Value::Object(o) => o
                .get("interfaces")
                .and_then(Value::as_array)
                .ok_or_else(|| ScanError::MalformedResponse("no 'interfaces' list".to_string()))?,
            _ => return Err(ScanError::MalformedResponse("unexpected interfaces body".to_string())),
        };
        let names: Vec<String> = list
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Object(o) => o.get("name").and_then(Value::as_str).map(String::from),
                _ => None,
            })
            .collect();
        info!(count = names.len(), "Fetched network interfaces from backend.");
        Ok(names)
    }

    /// Downloads a finished capture and writes it to `dest`. Returns the byte count.
    pub async fn download_capture(&self, capture_id: &str, dest: &Path) -> Result<u64, ScanError> {
        let url = self.endpoint(DOWNLOAD_CAPTURE_PATH)?;
        let response = self
            .client
            .post(url)
            .json(&json!({ "captureId": capture_id }))
            .send()
            .await?;
        let response = Self::expect_success(response, DOWNLOAD_CAPTURE_PATH).await?;
        let bytes = response.bytes().await?;

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ScanError::Storage(format!("cannot create {}: {e}", parent.display())))?;
        }
        tokio::fs::write(dest, &bytes)
            .await
            .map_err(|e| ScanError::Storage(format!("cannot write {}: {e}", dest.display())))?;
        info!(capture_id, path = %dest.display(), bytes = bytes.len(), "Capture saved.");
        Ok(bytes.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> BackendClient {
        BackendClient::new(reqwest::Client::new(), &server.uri()).unwrap()
    }

    #[tokio::test]
    async fn scan_posts_to_the_type_specific_path() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/port-scan"))
            .and(body_partial_json(json!({ "target": "10.0.0.1", "portRange": "1-1024" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ports": [] })))
            .mount(&server)
            .await;

        let body = client_for(&server)
            .await
            .scan(&ScanRequest::new(ScannerType::Port, "10.0.0.1"))
            .await
            .unwrap();
        assert_eq!(body, json!({ "ports": [] }));
    }

    #[tokio::test]
    async fn missing_endpoint_is_an_upstream_rejection() {
        let server = MockServer::start().await;
        let err = client_for(&server)
            .await
            .scan(&ScanRequest::new(ScannerType::Network, "10.0.0.0/24"))
            .await
            .unwrap_err();
        assert!(matches!(err, ScanError::UpstreamRejected { status: 404, .. }));
    }

    #[tokio::test]
    async fn interfaces_accept_objects_and_names() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/network-interfaces"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "interfaces": ["eth0", { "name": "wlan0", "ip": "10.0.0.4" }, 42]
            })))
            .mount(&server)
            .await;

        let names = client_for(&server).await.network_interfaces().await.unwrap();
        assert_eq!(names, vec!["eth0".to_string(), "wlan0".to_string()]);
    }

    #[tokio::test]
    async fn download_capture_writes_the_body_to_disk() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/download-capture"))
            .and(body_partial_json(json!({ "captureId": "cap-1" })))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xd4, 0xc3, 0xb2, 0xa1]))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("captures").join("cap-1.pcap");
        let written = client_for(&server).await.download_capture("cap-1", &dest).await.unwrap();
        assert_eq!(written, 4);
        assert_eq!(std::fs::read(&dest).unwrap(), vec![0xd4, 0xc3, 0xb2, 0xa1]);
    }
}
