//! Static, read-only catalog of the external security APIs a user can pick
//! for each scanner type. The dashboard never mutates it; the credential store
//! only looks providers up by name to resolve their base URL.

use crate::core::models::{Provider, ScannerType};

static VULNERABILITY_PROVIDERS: &[Provider] = &[
    Provider { name: "Acunetix", base_url: "https://api.acunetix.com/v1" },
    Provider { name: "StackHawk", base_url: "https://api.stackhawk.com/api" },
    Provider { name: "OWASP ZAP", base_url: "https://zap.example.com/api" },
    Provider { name: "Qualys", base_url: "https://qualysapi.qualys.com/api" },
    Provider { name: "Nessus", base_url: "https://cloud.tenable.com/api" },
    Provider { name: "Burp Suite", base_url: "https://portswigger.net/burp/api" },
];

static NETWORK_PROVIDERS: &[Provider] = &[
    Provider { name: "Shodan", base_url: "https://api.shodan.io" },
    Provider { name: "SecurityTrails", base_url: "https://api.securitytrails.com/v1" },
    Provider { name: "Censys", base_url: "https://search.censys.io/api/v2" },
    Provider { name: "NetworkScan Pro", base_url: "https://api.networkscanpro.com/v1" },
    Provider { name: "Zmap", base_url: "https://api.zmap.io/v1" },
];

static TRAFFIC_PROVIDERS: &[Provider] = &[
    Provider { name: "NetworkMiner", base_url: "https://api.networkminer.net/v1" },
    Provider { name: "Wireshark API", base_url: "https://api.wireshark.org/v1" },
    Provider { name: "Packet Analyzer", base_url: "https://api.packetanalyzer.net/v1" },
    Provider { name: "TCPDump API", base_url: "https://api.tcpdump.org/v1" },
    Provider { name: "Zeek", base_url: "https://api.zeek.org/v1" },
    Provider { name: "Cloudshark", base_url: "https://api.cloudshark.org/v1" },
];

static PORT_PROVIDERS: &[Provider] = &[
    Provider { name: "Nmap API", base_url: "https://api.nmap.org/v1" },
    Provider { name: "OpenVAS", base_url: "https://api.openvas.org/v1" },
    Provider { name: "Qualys", base_url: "https://qualysapi.qualys.com/api" },
    Provider { name: "Snort IDS", base_url: "https://api.snort.org/v1" },
    Provider { name: "Suricata", base_url: "https://api.suricata.io/v1" },
    Provider { name: "Rapid7 Nexpose", base_url: "https://insightvm.rapid7.com/api/3" },
];

/// All providers selectable for a scanner type, in display order.
pub fn providers_for(scanner_type: ScannerType) -> &'static [Provider] {
    match scanner_type {
        ScannerType::Vulnerability => VULNERABILITY_PROVIDERS,
        ScannerType::Network => NETWORK_PROVIDERS,
        ScannerType::Port => PORT_PROVIDERS,
        ScannerType::Traffic => TRAFFIC_PROVIDERS,
    }
}

/// Looks a provider up by its exact display name.
pub fn find_provider(scanner_type: ScannerType, name: &str) -> Option<&'static Provider> {
    providers_for(scanner_type).iter().find(|p| p.name == name)
}

/// Base URL used when no catalog provider is selected.
pub fn default_base_url(scanner_type: ScannerType) -> &'static str {
    match scanner_type {
        ScannerType::Vulnerability => "https://api.security-scanner.example",
        ScannerType::Network => "https://api.networkscan.example",
        ScannerType::Port => "https://api.portscan.example",
        ScannerType::Traffic => "https://api.packet-capture.example",
    }
}

/// Provider endpoint a scan of this type is sent to.
///
/// Shodan and SecurityTrails get their own search paths; the proxy reshapes
/// the Shodan one further depending on the query.
pub fn default_endpoint(scanner_type: ScannerType, provider: &str) -> &'static str {
    match (scanner_type, provider) {
        (ScannerType::Network, "Shodan") => "/shodan/host/search",
        (ScannerType::Network, "SecurityTrails") => "/domain/{domain}/subdomains",
        (ScannerType::Network, "Censys") => "/hosts/search",
        (ScannerType::Network, _) => "/scan",
        (ScannerType::Port, _) => "/port-scan",
        (ScannerType::Vulnerability, _) => "/scans",
        (ScannerType::Traffic, _) => "/capture",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_scanner_type_has_providers_with_https_urls() {
        for scanner_type in ScannerType::iter() {
            let providers = providers_for(scanner_type);
            assert!(!providers.is_empty());
            assert!(providers.iter().all(|p| p.base_url.starts_with("https://")));
        }
    }

    #[test]
    fn lookup_is_scoped_to_the_scanner_type() {
        assert_eq!(
            find_provider(ScannerType::Network, "Shodan").map(|p| p.base_url),
            Some("https://api.shodan.io")
        );
        assert!(find_provider(ScannerType::Port, "Shodan").is_none());
        // Qualys is offered for two types.
        assert!(find_provider(ScannerType::Vulnerability, "Qualys").is_some());
        assert!(find_provider(ScannerType::Port, "Qualys").is_some());
    }

    #[test]
    fn shodan_gets_its_search_endpoint() {
        assert_eq!(default_endpoint(ScannerType::Network, "Shodan"), "/shodan/host/search");
        assert_eq!(default_endpoint(ScannerType::Network, "Zmap"), "/scan");
    }
}
