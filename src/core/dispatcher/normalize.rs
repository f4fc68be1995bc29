// src/core/dispatcher/normalize.rs

use crate::core::errors::ScanError;
use crate::core::models::{
    Device, IdsAlert, OpenPort, Packet, PortEntry, ScanPayload, ScannerType, TrafficStats, Vulnerability,
};
use crate::core::target;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

// --- Provider-specific response shapes ---

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ShodanMatch {
    pub ip_str: String,
    pub port: u16,
    #[serde(default)]
    pub hostnames: Vec<String>,
    #[serde(default)]
    pub os: Option<String>,
    #[serde(default)]
    pub org: Option<String>,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default, rename = "_shodan")]
    pub meta: Option<ShodanMeta>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ShodanMeta {
    #[serde(default)]
    pub module: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ShodanSearch {
    pub matches: Vec<ShodanMatch>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CensysService {
    pub port: u16,
    #[serde(default)]
    pub service_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CensysAs {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CensysHit {
    pub ip: String,
    #[serde(default)]
    pub services: Vec<CensysService>,
    #[serde(default)]
    pub autonomous_system: Option<CensysAs>,
    #[serde(default)]
    pub dns: Option<CensysDns>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CensysDns {
    #[serde(default)]
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CensysResult {
    #[serde(default)]
    pub hits: Vec<CensysHit>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CensysSearch {
    pub result: CensysResult,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SecurityTrailsSubdomains {
    #[serde(default)]
    pub subdomains: Vec<String>,
}

// Canonical shapes, as returned by the local backend and generic providers.

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CanonicalBody {
    devices: Option<Vec<Device>>,
    ports: Option<Vec<PortEntry>>,
    ids_alerts: Option<Vec<IdsAlert>>,
    vulnerabilities: Option<Vec<Vulnerability>>,
    packets: Option<Vec<Packet>>,
    stats: Option<TrafficStats>,
    message: Option<String>,
}

/// A provider response, tagged by the provider that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderResponse {
    Shodan(ShodanSearch),
    Censys(CensysSearch),
    SecurityTrails(SecurityTrailsSubdomains),
    /// Already in the dashboard's own result format.
    Canonical(Value),
}

impl ProviderResponse {
    /// Picks the shape from the provider name and parses the body into it.
    pub fn parse(provider: &str, body: Value) -> Result<Self, ScanError> {
        let malformed = |e: serde_json::Error| ScanError::MalformedResponse(format!("{provider}: {e}"));
        match provider {
            "Shodan" => serde_json::from_value(body).map(Self::Shodan).map_err(malformed),
            "Censys" => serde_json::from_value(body).map(Self::Censys).map_err(malformed),
            "SecurityTrails" => serde_json::from_value(body).map(Self::SecurityTrails).map_err(malformed),
            _ => Ok(Self::Canonical(body)),
        }
    }
}

/// Rejects bodies that report failure despite a 2xx status.
pub fn check_embedded_error(body: Value) -> Result<Value, ScanError> {
    if let Some(error) = body.get("error").filter(|e| !e.is_null()) {
        let message = match error {
            Value::String(s) => s.clone(),
            Value::Object(o) => o
                .get("message")
                .and_then(Value::as_str)
                .map(String::from)
                .unwrap_or_else(|| error.to_string()),
            other => other.to_string(),
        };
        warn!(error = %message, "Response carries an embedded error.");
        return Err(ScanError::EmbeddedError(message));
    }
    if body.get("success").and_then(Value::as_bool) == Some(false) {
        return Err(ScanError::EmbeddedError("request reported success: false".to_string()));
    }
    Ok(body)
}

fn shodan_devices(search: ShodanSearch) -> Vec<Device> {
    let mut devices: Vec<Device> = Vec::new();
    for m in search.matches {
        let service = m
            .product
            .clone()
            .or_else(|| m.meta.as_ref().and_then(|meta| meta.module.clone()))
            .unwrap_or_else(|| "unknown".to_string());
        let port = OpenPort { port: m.port, service };
        // Shodan returns one match per (ip, port); fold them into one device.
        if let Some(device) = devices.iter_mut().find(|d| d.ip == m.ip_str) {
            if !device.open_ports.iter().any(|p| p.port == port.port) {
                device.open_ports.push(port);
            }
            continue;
        }
        devices.push(Device {
            ip: m.ip_str,
            hostname: m.hostnames.into_iter().next().unwrap_or_default(),
            mac: None,
            status: "Online".to_string(),
            vendor: m.org,
            os: m.os,
            open_ports: vec![port],
        });
    }
    devices
}

fn censys_devices(search: CensysSearch) -> Vec<Device> {
    search
        .result
        .hits
        .into_iter()
        .map(|hit| Device {
            ip: hit.ip,
            hostname: hit.dns.and_then(|d| d.names.into_iter().next()).unwrap_or_default(),
            mac: None,
            status: "Online".to_string(),
            vendor: hit.autonomous_system.and_then(|a| a.name),
            os: None,
            open_ports: hit
                .services
                .into_iter()
                .map(|s| OpenPort {
                    port: s.port,
                    service: s.service_name.unwrap_or_else(|| "unknown".to_string()).to_lowercase(),
                })
                .collect(),
        })
        .collect()
}

fn securitytrails_devices(subdomains: SecurityTrailsSubdomains, target_hint: &str) -> Vec<Device> {
    let domain = target::domain_guess(target_hint);
    subdomains
        .subdomains
        .into_iter()
        .map(|sub| Device {
            ip: "unresolved".to_string(),
            hostname: format!("{sub}.{domain}"),
            mac: None,
            status: "Unknown".to_string(),
            vendor: None,
            os: None,
            open_ports: Vec::new(),
        })
        .collect()
}

fn canonical_payload(scanner_type: ScannerType, body: Value) -> Result<(ScanPayload, Option<String>), ScanError> {
    let parsed: CanonicalBody = serde_json::from_value(body)
        .map_err(|e| ScanError::MalformedResponse(format!("{scanner_type} result: {e}")))?;
    let missing = |field: &str| ScanError::MalformedResponse(format!("{scanner_type} result has no '{field}' field"));

    let payload = match scanner_type {
        ScannerType::Network => ScanPayload::Devices { devices: parsed.devices.ok_or_else(|| missing("devices"))? },
        ScannerType::Port => ScanPayload::Ports {
            ports: parsed.ports.ok_or_else(|| missing("ports"))?,
            ids_alerts: parsed.ids_alerts.unwrap_or_default(),
        },
        ScannerType::Vulnerability => ScanPayload::Vulnerabilities {
            vulnerabilities: parsed.vulnerabilities.ok_or_else(|| missing("vulnerabilities"))?,
        },
        ScannerType::Traffic => {
            let packets = parsed.packets.ok_or_else(|| missing("packets"))?;
            let stats = parsed.stats.unwrap_or_else(|| TrafficStats {
                total_packets: packets.len() as u64,
                ..TrafficStats::default()
            });
            ScanPayload::Traffic { packets, stats }
        }
    };
    Ok((payload, parsed.message))
}

/// Maps any provider response into the canonical payload for the scanner type.
///
/// `target_hint` is the scan target, needed by providers whose responses do
/// not echo what was searched for.
pub fn normalize(
    scanner_type: ScannerType,
    response: ProviderResponse,
    target_hint: &str,
) -> Result<(ScanPayload, Option<String>), ScanError> {
    let result = match response {
        ProviderResponse::Shodan(search) => Ok((ScanPayload::Devices { devices: shodan_devices(search) }, None)),
        ProviderResponse::Censys(search) => Ok((ScanPayload::Devices { devices: censys_devices(search) }, None)),
        ProviderResponse::SecurityTrails(subs) => Ok((
            ScanPayload::Devices { devices: securitytrails_devices(subs, target_hint) },
            None,
        )),
        ProviderResponse::Canonical(body) => canonical_payload(scanner_type, body),
    };
    if let Ok((payload, _)) = &result {
        debug!(%scanner_type, rows = payload.len(), "Normalized provider response.");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn embedded_error_fails_even_on_success_status() {
        let err = check_embedded_error(json!({ "error": "quota exceeded" })).unwrap_err();
        assert_eq!(err, ScanError::EmbeddedError("quota exceeded".to_string()));

        let err = check_embedded_error(json!({ "error": { "message": "bad key" } })).unwrap_err();
        assert_eq!(err, ScanError::EmbeddedError("bad key".to_string()));

        assert!(check_embedded_error(json!({ "success": false })).is_err());
        assert!(check_embedded_error(json!({ "error": null, "devices": [] })).is_ok());
    }

    #[test]
    fn shodan_matches_fold_into_devices() {
        let body = json!({
            "matches": [
                { "ip_str": "203.0.113.5", "port": 22, "hostnames": ["gw.example"], "product": "OpenSSH" },
                { "ip_str": "203.0.113.5", "port": 443, "_shodan": { "module": "https" } },
                { "ip_str": "203.0.113.9", "port": 80, "org": "Example ISP" }
            ],
            "total": 3
        });
        let response = ProviderResponse::parse("Shodan", body).unwrap();
        let (payload, message) = normalize(ScannerType::Network, response, "203.0.113.0/24").unwrap();
        assert!(message.is_none());
        let ScanPayload::Devices { devices } = payload else { panic!("expected devices") };
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].hostname, "gw.example");
        assert_eq!(devices[0].open_ports.len(), 2);
        assert_eq!(devices[0].open_ports[1].service, "https");
        assert_eq!(devices[1].vendor.as_deref(), Some("Example ISP"));
    }

    #[test]
    fn censys_hits_become_devices() {
        let body = json!({
            "code": 200,
            "result": { "hits": [
                { "ip": "198.51.100.4", "services": [{ "port": 443, "service_name": "HTTP" }],
                  "autonomous_system": { "name": "EXAMPLE-AS" } }
            ]}
        });
        let response = ProviderResponse::parse("Censys", body).unwrap();
        let (payload, _) = normalize(ScannerType::Network, response, "198.51.100.0/24").unwrap();
        let ScanPayload::Devices { devices } = payload else { panic!("expected devices") };
        assert_eq!(devices[0].open_ports[0].service, "http");
        assert_eq!(devices[0].vendor.as_deref(), Some("EXAMPLE-AS"));
    }

    #[test]
    fn securitytrails_subdomains_use_the_domain_guess() {
        let response = ProviderResponse::parse("SecurityTrails", json!({ "subdomains": ["www", "mail"] })).unwrap();
        let (payload, _) = normalize(ScannerType::Network, response, "example.com").unwrap();
        let ScanPayload::Devices { devices } = payload else { panic!("expected devices") };
        assert_eq!(devices[1].hostname, "mail.example.com");
    }

    #[test]
    fn wrong_shape_for_a_named_provider_is_malformed() {
        let err = ProviderResponse::parse("Shodan", json!({ "hosts": [] })).unwrap_err();
        assert!(matches!(err, ScanError::MalformedResponse(_)));
    }

    #[test]
    fn canonical_port_results_keep_the_message() {
        let body = json!({
            "ports": [{ "port": 22, "service": "SSH", "version": "OpenSSH 8.2" }],
            "message": "partial scan"
        });
        let (payload, message) =
            normalize(ScannerType::Port, ProviderResponse::Canonical(body), "host").unwrap();
        assert_eq!(message.as_deref(), Some("partial scan"));
        let ScanPayload::Ports { ports, ids_alerts } = payload else { panic!("expected ports") };
        assert_eq!(ports[0].state, "open");
        assert!(ids_alerts.is_empty());
    }

    #[test]
    fn canonical_body_missing_its_field_is_malformed() {
        let err = normalize(ScannerType::Vulnerability, ProviderResponse::Canonical(json!({})), "x").unwrap_err();
        assert!(err.to_string().contains("vulnerabilities"));
    }

    #[test]
    fn traffic_stats_default_to_packet_count() {
        let body = json!({ "packets": [{
            "id": 1, "timestamp": "2025-01-01T00:00:00Z", "protocol": "TCP",
            "source": "10.0.0.2", "destination": "1.1.1.1", "size": 60
        }]});
        let (payload, _) = normalize(ScannerType::Traffic, ProviderResponse::Canonical(body), "eth0").unwrap();
        let ScanPayload::Traffic { stats, .. } = payload else { panic!("expected traffic") };
        assert_eq!(stats.total_packets, 1);
    }
}
