// src/core/proxy.rs

//! Forwards scan requests to third-party security APIs.
//!
//! The proxy receives a `{scanType, endpoint, apiKey, provider, data}`
//! envelope, reshapes it into whatever the named provider expects (auth
//! scheme, method, path and query) and hands back either the upstream JSON
//! or a uniform `{error, message}` envelope with a status code.

use crate::core::catalog;
use crate::core::errors::ScanError;
use crate::core::models::ScannerType;
use crate::core::target;
use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::str::FromStr;
use tracing::{debug, error, info, warn};
use url::Url;

/// Longest upstream error body echoed back in the `message` field.
const MAX_ERROR_BODY: usize = 512;

/// `error` value of the 502 returned when the provider could not be reached.
pub const PROVIDER_UNREACHABLE: &str = "API Error: Provider unreachable";

/// The envelope accepted by [`ScannerProxy::forward`]. Every field is
/// optional on the wire so that missing ones produce a 400, not a parse error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProxyRequest {
    pub scan_type: Option<String>,
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub provider: Option<String>,
    #[serde(default)]
    pub data: Value,
}

/// Status code plus JSON body, exactly what the caller would see over HTTP.
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyResponse {
    pub status: u16,
    pub body: Value,
}

impl ProxyResponse {
    fn error(status: u16, error: impl Into<String>, message: Option<String>) -> Self {
        let mut body = json!({ "error": error.into() });
        if let Some(message) = message {
            body["message"] = Value::String(message);
        }
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A fully shaped outbound request. Building one is pure; nothing is sent.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapedRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ShapedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn build_url(base: &str, path: &str, query: &[(&str, String)]) -> Result<String, ScanError> {
    let mut url = Url::parse(&format!("{}{}", base.trim_end_matches('/'), path))
        .map_err(|e| ScanError::InvalidRequest(format!("bad provider URL: {e}")))?;
    if !query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (k, v) in query {
            pairs.append_pair(k, v);
        }
    }
    Ok(url.into())
}

fn scan_target(data: &Value) -> String {
    ["ipRange", "target", "url", "domain"]
        .iter()
        .find_map(|k| data.get(*k).and_then(Value::as_str))
        .unwrap_or_default()
        .to_string()
}

/// Maps a generic scan request onto the wire format of one provider.
pub fn shape_request(
    scanner_type: ScannerType,
    provider: &str,
    base_url: &str,
    endpoint: &str,
    api_key: &str,
    data: &Value,
) -> Result<ShapedRequest, ScanError> {
    let json_only = vec![("Content-Type".to_string(), "application/json".to_string())];

    let shaped = match (scanner_type, provider) {
        (ScannerType::Network, "Shodan") => {
            // Shodan authenticates through the `key` query parameter.
            if endpoint == "/shodan/host/search" {
                let query = data.get("query").and_then(Value::as_str).unwrap_or_default();
                if let Some(network) = query.strip_prefix("net:") {
                    ShapedRequest {
                        method: Method::GET,
                        url: build_url(
                            base_url,
                            "/shodan/host/search/net",
                            &[("key", api_key.to_string()), ("query", network.to_string())],
                        )?,
                        headers: json_only,
                        body: None,
                    }
                } else {
                    let mut params = vec![("key", api_key.to_string())];
                    if let Some(fields) = data.as_object() {
                        params.extend(fields.iter().map(|(k, v)| (k.as_str(), query_value(v))));
                    }
                    ShapedRequest {
                        method: Method::GET,
                        url: build_url(base_url, endpoint, &params)?,
                        headers: json_only,
                        body: None,
                    }
                }
            } else {
                ShapedRequest {
                    method: Method::POST,
                    url: build_url(base_url, endpoint, &[])?,
                    headers: json_only,
                    body: Some(data.clone()),
                }
            }
        }
        (ScannerType::Network, "SecurityTrails") => {
            let mut headers = json_only;
            headers.push(("APIKEY".to_string(), api_key.to_string()));
            if endpoint.contains("{domain}") {
                let domain = target::domain_guess(&scan_target(data));
                ShapedRequest {
                    method: Method::GET,
                    url: build_url(base_url, &endpoint.replace("{domain}", &domain), &[])?,
                    headers,
                    body: None,
                }
            } else {
                ShapedRequest {
                    method: Method::POST,
                    url: build_url(base_url, endpoint, &[])?,
                    headers,
                    body: Some(data.clone()),
                }
            }
        }
        (ScannerType::Network, "Censys") => {
            // Basic auth with the key as user and an empty password.
            let credentials = STANDARD.encode(format!("{api_key}:"));
            let mut headers = json_only;
            headers.push(("Authorization".to_string(), format!("Basic {credentials}")));
            if endpoint == "/hosts/search" {
                let query = format!("ip:{}", scan_target(data));
                ShapedRequest {
                    method: Method::GET,
                    url: build_url(base_url, endpoint, &[("q", query), ("per_page", "50".to_string())])?,
                    headers,
                    body: None,
                }
            } else {
                ShapedRequest {
                    method: Method::POST,
                    url: build_url(base_url, endpoint, &[])?,
                    headers,
                    body: Some(data.clone()),
                }
            }
        }
        _ => {
            let mut headers = json_only;
            headers.push(("Authorization".to_string(), format!("Bearer {api_key}")));
            ShapedRequest {
                method: Method::POST,
                url: build_url(base_url, endpoint, &[])?,
                headers,
                body: Some(data.clone()),
            }
        }
    };

    debug!(%scanner_type, provider, method = %shaped.method, "Shaped provider request.");
    Ok(shaped)
}

/// Sends shaped requests and wraps the outcome into a [`ProxyResponse`].
#[derive(Debug, Clone)]
pub struct ScannerProxy {
    client: reqwest::Client,
    /// When set, replaces every provider's base URL (an API gateway).
    gateway: Option<String>,
}

impl ScannerProxy {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client, gateway: None }
    }

    pub fn with_gateway(client: reqwest::Client, gateway: impl Into<String>) -> Self {
        Self { client, gateway: Some(gateway.into()) }
    }

    /// Base URL requests for this provider go to.
    pub fn base_url(&self, scanner_type: ScannerType, provider: &str) -> String {
        if let Some(gateway) = &self.gateway {
            return gateway.clone();
        }
        catalog::find_provider(scanner_type, provider)
            .map(|p| p.base_url)
            .unwrap_or_else(|| catalog::default_base_url(scanner_type))
            .to_string()
    }

    /// Validates the envelope, shapes it for the provider and forwards it.
    pub async fn forward(&self, request: &ProxyRequest) -> ProxyResponse {
        let present = |v: &Option<String>| v.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(String::from);
        let (Some(scan_type), Some(endpoint), Some(api_key), Some(provider)) = (
            present(&request.scan_type),
            present(&request.endpoint),
            present(&request.api_key),
            present(&request.provider),
        ) else {
            warn!("Proxy request is missing required parameters.");
            return ProxyResponse::error(400, "API Error: Missing required parameters", None);
        };

        let Ok(scanner_type) = ScannerType::from_str(&scan_type) else {
            warn!(scan_type = %scan_type, "Proxy request has an invalid scan type.");
            return ProxyResponse::error(400, "API Error: Invalid scan type", None);
        };

        info!(%scanner_type, provider = %provider, "Received scan request.");

        let base_url = self.base_url(scanner_type, &provider);
        let shaped = match shape_request(scanner_type, &provider, &base_url, &endpoint, &api_key, &request.data) {
            Ok(s) => s,
            Err(e) => return ProxyResponse::error(400, format!("API Error: {e}"), None),
        };

        self.send(&shaped, &provider).await
    }

    async fn send(&self, shaped: &ShapedRequest, provider: &str) -> ProxyResponse {
        let mut builder = self.client.request(shaped.method.clone(), &shaped.url);
        for (name, value) in &shaped.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &shaped.body {
            builder = builder.json(body);
        }

        let response = match builder.send().await {
            Ok(r) => r,
            Err(e) => {
                error!(provider, error = %e, "Provider request failed.");
                return ProxyResponse::error(502, PROVIDER_UNREACHABLE, Some(e.to_string()));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let excerpt: String = text.chars().take(MAX_ERROR_BODY).collect();
            error!(provider, status = %status, "Provider responded with an error status.");
            return ProxyResponse::error(
                status.as_u16(),
                format!("API Error: {provider} responded with status {}", status.as_u16()),
                Some(excerpt),
            );
        }

        match response.json::<Value>().await {
            Ok(body) => {
                info!(provider, "Received response from provider.");
                ProxyResponse { status: status.as_u16(), body }
            }
            Err(e) => {
                error!(provider, error = %e, "Provider returned a non-JSON body.");
                ProxyResponse::error(502, "API Error: Provider returned invalid JSON", Some(e.to_string()))
            }
        }
    }

    /// Checks a key against the provider's `/verify-key` endpoint.
    pub async fn verify_key(&self, scanner_type: ScannerType, provider: &str, api_key: &str) -> bool {
        let url = format!("{}/verify-key", self.base_url(scanner_type, provider).trim_end_matches('/'));
        debug!(%scanner_type, provider, "Verifying API key.");
        match self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&json!({ "test": true }))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                warn!(%scanner_type, error = %e, "API key verification failed.");
                false
            }
        }
    }
}
