// src/core/models.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

// --- Scanner Types ---

/// The four categories of scanner offered by the dashboard.
///
/// Serialized, parsed and displayed as the lowercase name used for storage
/// keys and the proxy envelope (`"network"`, `"port"`, ...).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
    Serialize, Deserialize, Display, EnumString, EnumIter, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ScannerType {
    Vulnerability,
    Network,
    Port,
    Traffic,
}

impl ScannerType {
    /// Human-friendly panel title.
    pub fn title(&self) -> &'static str {
        match self {
            ScannerType::Vulnerability => "Vulnerability Scanner",
            ScannerType::Network => "Network Scanner",
            ScannerType::Port => "Port Scanner",
            ScannerType::Traffic => "Traffic Analyzer",
        }
    }
}

// --- Credentials & Providers ---

/// An API key and provider selection for one scanner type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub scanner_type: ScannerType,
    pub api_key: String,
    /// Empty when the user never picked a provider.
    pub provider: String,
}

/// A named external security API and its base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Provider {
    pub name: &'static str,
    pub base_url: &'static str,
}

// --- Scan Requests ---

/// Per-type options collected alongside the target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ScanOptions {
    Vulnerability { full_scan: bool },
    Network { method: String },
    Port { port_range: String, enable_ids: bool },
    Traffic { duration_secs: u64, filter: Option<String> },
}

impl ScanOptions {
    /// Default options for a scanner type, matching what the panels pre-fill.
    pub fn default_for(scanner_type: ScannerType) -> Self {
        match scanner_type {
            ScannerType::Vulnerability => ScanOptions::Vulnerability { full_scan: false },
            ScannerType::Network => ScanOptions::Network { method: "ping".to_string() },
            ScannerType::Port => ScanOptions::Port { port_range: "1-1024".to_string(), enable_ids: false },
            ScannerType::Traffic => ScanOptions::Traffic { duration_secs: 60, filter: None },
        }
    }

    /// The scanner type these options belong to.
    pub fn scanner_type(&self) -> ScannerType {
        match self {
            ScanOptions::Vulnerability { .. } => ScannerType::Vulnerability,
            ScanOptions::Network { .. } => ScannerType::Network,
            ScanOptions::Port { .. } => ScannerType::Port,
            ScanOptions::Traffic { .. } => ScannerType::Traffic,
        }
    }
}

/// A single scan attempt, built per user action.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanRequest {
    pub scanner_type: ScannerType,
    /// IP range, host or interface name depending on the scanner type.
    pub target: String,
    pub options: ScanOptions,
}

impl ScanRequest {
    pub fn new(scanner_type: ScannerType, target: impl Into<String>) -> Self {
        Self {
            scanner_type,
            target: target.into(),
            options: ScanOptions::default_for(scanner_type),
        }
    }

    /// A request with explicit options; the scanner type comes from them.
    pub fn with_options(target: impl Into<String>, options: ScanOptions) -> Self {
        Self {
            scanner_type: options.scanner_type(),
            target: target.into(),
            options,
        }
    }

    /// The JSON body sent to the local backend and used as the proxy `data`.
    pub fn body(&self) -> serde_json::Value {
        let mut body = serde_json::json!({ "target": self.target });
        match &self.options {
            ScanOptions::Vulnerability { full_scan } => {
                body["url"] = self.target.clone().into();
                body["fullScan"] = (*full_scan).into();
            }
            ScanOptions::Network { method } => {
                body["ipRange"] = self.target.clone().into();
                body["scanMethod"] = method.clone().into();
            }
            ScanOptions::Port { port_range, enable_ids } => {
                body["portRange"] = port_range.clone().into();
                body["enableIDS"] = (*enable_ids).into();
            }
            ScanOptions::Traffic { duration_secs, filter } => {
                body["interface"] = self.target.clone().into();
                body["duration"] = (*duration_secs).into();
                if let Some(filter) = filter {
                    body["filter"] = filter.clone().into();
                }
            }
        }
        body
    }
}

// --- Canonical Results ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenPort {
    pub port: u16,
    pub service: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub ip: String,
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub mac: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub os: Option<String>,
    #[serde(default)]
    pub open_ports: Vec<OpenPort>,
}

fn default_status() -> String {
    "Online".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortEntry {
    pub port: u16,
    pub service: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default = "default_port_state")]
    pub state: String,
}

fn default_port_state() -> String {
    "open".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdsAlert {
    pub timestamp: DateTime<Utc>,
    pub severity: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub source: String,
    pub destination: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vulnerability {
    pub severity: String,
    pub issue: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub recommendation: String,
    #[serde(default)]
    pub cve: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Packet {
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    pub protocol: String,
    pub source: String,
    pub destination: String,
    #[serde(default)]
    pub source_port: Option<u16>,
    #[serde(default)]
    pub dest_port: Option<u16>,
    pub size: u32,
    #[serde(default)]
    pub info: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficStats {
    pub total_packets: u64,
    #[serde(default)]
    pub capture_time: u64,
    #[serde(default)]
    pub data_volume: String,
    /// Backend-side capture identifier, used for `download-capture`.
    #[serde(default)]
    pub capture_id: Option<String>,
}

/// The canonical payload every provider response is normalized into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ScanPayload {
    Devices { devices: Vec<Device> },
    Ports { ports: Vec<PortEntry>, ids_alerts: Vec<IdsAlert> },
    Vulnerabilities { vulnerabilities: Vec<Vulnerability> },
    Traffic { packets: Vec<Packet>, stats: TrafficStats },
}

impl ScanPayload {
    /// Number of rows the payload renders as.
    pub fn len(&self) -> usize {
        match self {
            ScanPayload::Devices { devices } => devices.len(),
            ScanPayload::Ports { ports, .. } => ports.len(),
            ScanPayload::Vulnerabilities { vulnerabilities } => vulnerabilities.len(),
            ScanPayload::Traffic { packets, .. } => packets.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Outcome of one dispatch. Every success and failure path ends here.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanResult {
    Success {
        payload: ScanPayload,
        /// Set when the data is inferred rather than returned by a scanner.
        message: Option<String>,
    },
    Failure { error: String },
}

impl ScanResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ScanResult::Success { .. })
    }

    /// Renders the uniform `{success, payload?, message?, error?}` envelope.
    pub fn envelope(&self) -> ScanEnvelope {
        match self {
            ScanResult::Success { payload, message } => ScanEnvelope {
                success: true,
                payload: Some(payload.clone()),
                message: message.clone(),
                error: None,
            },
            ScanResult::Failure { error } => ScanEnvelope {
                success: false,
                payload: None,
                message: None,
                error: Some(error.clone()),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanEnvelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<ScanPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn scanner_type_round_trips_through_lowercase_names() {
        for scanner_type in ScannerType::iter() {
            let name = scanner_type.to_string();
            assert_eq!(name, name.to_lowercase());
            assert_eq!(ScannerType::from_str(&name).unwrap(), scanner_type);
        }
        assert!(ScannerType::from_str("firewall").is_err());
    }

    #[test]
    fn network_request_body_carries_ip_range_and_method() {
        let request = ScanRequest::new(ScannerType::Network, "10.0.0.0/24");
        let body = request.body();
        assert_eq!(body["ipRange"], "10.0.0.0/24");
        assert_eq!(body["scanMethod"], "ping");
    }

    #[test]
    fn explicit_options_reach_the_body() {
        let options = ScanOptions::Port { port_range: "22,80,443".to_string(), enable_ids: true };
        let request = ScanRequest::with_options("10.0.0.1", options);
        assert_eq!(request.scanner_type, ScannerType::Port);
        let body = request.body();
        assert_eq!(body["portRange"], "22,80,443");
        assert_eq!(body["enableIDS"], true);

        let options = ScanOptions::Traffic { duration_secs: 120, filter: Some("tcp port 443".to_string()) };
        let body = ScanRequest::with_options("eth0", options).body();
        assert_eq!(body["duration"], 120);
        assert_eq!(body["filter"], "tcp port 443");
    }

    #[test]
    fn failure_envelope_has_no_payload() {
        let result = ScanResult::Failure { error: "boom".to_string() };
        let json = serde_json::to_value(result.envelope()).unwrap();
        assert_eq!(json, serde_json::json!({ "success": false, "error": "boom" }));
    }

    #[test]
    fn devices_deserialize_with_defaults() {
        let device: Device = serde_json::from_value(serde_json::json!({ "ip": "10.0.0.7" })).unwrap();
        assert_eq!(device.status, "Online");
        assert!(device.open_ports.is_empty());
    }
}
