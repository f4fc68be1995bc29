// src/core/dispatcher/mod.rs

pub mod backend;
pub mod discovery;
pub mod normalize;

use crate::core::catalog;
use crate::core::config::AppConfig;
use crate::core::credentials::SharedCredentialStore;
use crate::core::errors::ScanError;
use crate::core::models::{Credential, ScanPayload, ScanRequest, ScanResult, ScannerType};
use crate::core::proxy::{PROVIDER_UNREACHABLE, ProxyRequest, ScannerProxy};
use crate::core::target;
use self::backend::BackendClient;
use self::discovery::{discover_local_ipv4, fabricate_devices, inferred_message, udp_probe};
use self::normalize::{ProviderResponse, check_embedded_error, normalize};
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::time::Duration;
use strum::Display;
use tracing::{debug, error, info, warn};

/// A named data source in the fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Strategy {
    /// The optional local scanning backend.
    Backend,
    /// A third-party API reached through the scanner proxy.
    Provider,
    /// Infers the local /24 and describes it. Network scans only.
    LocalDiscovery,
}

type StrategyOutcome = Result<(ScanPayload, Option<String>), ScanError>;

/// Ordered strategies for a scanner type.
pub fn plan(scanner_type: ScannerType, has_backend: bool) -> Vec<Strategy> {
    let mut strategies = Vec::with_capacity(3);
    if has_backend {
        strategies.push(Strategy::Backend);
    }
    strategies.push(Strategy::Provider);
    if scanner_type == ScannerType::Network {
        strategies.push(Strategy::LocalDiscovery);
    }
    strategies
}

/// The `data` field sent to a provider through the proxy.
fn provider_data(request: &ScanRequest, provider: &str) -> Value {
    match (request.scanner_type, provider) {
        (ScannerType::Network, "Shodan") => json!({ "query": format!("net:{}", request.target.trim()) }),
        _ => request.body(),
    }
}

/// Runs scan requests through the fallback chain.
pub struct Dispatcher {
    backend: Option<BackendClient>,
    proxy: ScannerProxy,
    store: SharedCredentialStore,
    discovery_route: SocketAddr,
    discovery_timeout: Duration,
}

impl Dispatcher {
    pub fn new(config: &AppConfig, store: SharedCredentialStore) -> Result<Self, ScanError> {
        let client = reqwest::Client::builder()
            .user_agent("VanguardRS/0.1")
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ScanError::CapabilityUnavailable(format!("Failed to build HTTP client: {e}")))?;

        let backend = config
            .backend_url
            .as_deref()
            .map(|url| BackendClient::new(client.clone(), url))
            .transpose()?;
        let proxy = match &config.provider_gateway {
            Some(gateway) => ScannerProxy::with_gateway(client, gateway.clone()),
            None => ScannerProxy::new(client),
        };

        Ok(Self {
            backend,
            proxy,
            store,
            discovery_route: config.discovery_route,
            discovery_timeout: config.discovery_timeout(),
        })
    }

    pub fn backend(&self) -> Option<&BackendClient> {
        self.backend.as_ref()
    }

    pub fn proxy(&self) -> &ScannerProxy {
        &self.proxy
    }

    /// Tries each strategy in order and returns the first success. Terminal
    /// errors (no API key, invalid request) end the chain immediately.
    pub async fn dispatch(&self, request: &ScanRequest) -> ScanResult {
        let scanner_type = request.scanner_type;
        if let Err(e) = target::validate_target(scanner_type, &request.target)
            .and_then(|_| target::validate_options(&request.options))
        {
            return ScanResult::Failure { error: e.to_string() };
        }

        info!(%scanner_type, target = %request.target, "Dispatching scan.");
        let mut last_error: Option<ScanError> = None;

        for strategy in plan(scanner_type, self.backend.is_some()) {
            debug!(%scanner_type, %strategy, "Trying strategy.");
            match self.run(strategy, request).await {
                Ok((payload, message)) => {
                    info!(%scanner_type, %strategy, rows = payload.len(), "Scan succeeded.");
                    return ScanResult::Success { payload, message };
                }
                Err(e) if e.is_terminal() => {
                    warn!(%scanner_type, %strategy, error = %e, "Scan stopped.");
                    return ScanResult::Failure { error: e.to_string() };
                }
                Err(e) => {
                    warn!(%scanner_type, %strategy, error = %e, "Strategy failed, falling through.");
                    last_error = Some(e);
                }
            }
        }

        let error = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| format!("No scan strategy available for {scanner_type}"));
        error!(%scanner_type, error = %error, "All strategies failed.");
        ScanResult::Failure { error }
    }

    async fn run(&self, strategy: Strategy, request: &ScanRequest) -> StrategyOutcome {
        match strategy {
            Strategy::Backend => self.run_backend(request).await,
            Strategy::Provider => self.run_provider(request).await,
            Strategy::LocalDiscovery => self.run_local_discovery().await,
        }
    }

    async fn run_backend(&self, request: &ScanRequest) -> StrategyOutcome {
        let backend = self
            .backend
            .as_ref()
            .ok_or_else(|| ScanError::CapabilityUnavailable("no backend configured".to_string()))?;
        let body = backend.scan(request).await?;
        normalize(request.scanner_type, ProviderResponse::Canonical(body), &request.target)
    }

    fn credential(&self, scanner_type: ScannerType) -> Result<Option<Credential>, ScanError> {
        let mut store = self
            .store
            .lock()
            .map_err(|_| ScanError::Storage("credential store lock poisoned".to_string()))?;
        Ok(store.credential(scanner_type))
    }

    async fn run_provider(&self, request: &ScanRequest) -> StrategyOutcome {
        let scanner_type = request.scanner_type;
        let credential = self
            .credential(scanner_type)?
            .ok_or(ScanError::MissingCredential(scanner_type))?;

        // No explicit choice means the first catalog entry. Stored names keep
        // the user's spacing; routing uses the bare name.
        let provider = if credential.provider.trim().is_empty() {
            catalog::providers_for(scanner_type)
                .first()
                .map(|p| p.name.to_string())
                .unwrap_or_default()
        } else {
            credential.provider.trim().to_string()
        };

        let proxy_request = ProxyRequest {
            scan_type: Some(scanner_type.to_string()),
            endpoint: Some(catalog::default_endpoint(scanner_type, &provider).to_string()),
            api_key: Some(credential.api_key),
            provider: Some(provider.clone()),
            data: provider_data(request, &provider),
        };
        let response = self.proxy.forward(&proxy_request).await;

        if !response.is_success() {
            let error = response.body.get("error").and_then(Value::as_str).unwrap_or_default();
            let message = response
                .body
                .get("message")
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .unwrap_or(error)
                .to_string();
            if error == PROVIDER_UNREACHABLE {
                return Err(ScanError::Transport(message));
            }
            return Err(ScanError::UpstreamRejected { status: response.status, message });
        }

        let body = check_embedded_error(response.body)?;
        let parsed = ProviderResponse::parse(&provider, body)?;
        normalize(scanner_type, parsed, &request.target)
    }

    async fn run_local_discovery(&self) -> StrategyOutcome {
        let local = discover_local_ipv4(udp_probe(self.discovery_route), self.discovery_timeout).await?;
        let devices = fabricate_devices(local, &mut rand::rng());
        Ok((ScanPayload::Devices { devices }, Some(inferred_message(local))))
    }
}
