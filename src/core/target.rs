// src/core/target.rs

use crate::core::errors::ScanError;
use crate::core::models::{ScanOptions, ScannerType};
use once_cell::sync::Lazy;
use regex::Regex;
use std::net::Ipv4Addr;
use tracing::debug;
use url::Url;

static RE_IPV4_CIDR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,3})\.(\d{1,3})\.(\d{1,3})\.(\d{1,3})(?:/(\d{1,2}))?$").unwrap());
static RE_HOSTNAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i)[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?)*$").unwrap()
});
static RE_INTERFACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.:-]{0,31}$").unwrap());
static RE_PORT_SPEC: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{1,5})(?:-(\d{1,5}))?$").unwrap());

/// Longest capture the traffic panel may request.
pub const MAX_CAPTURE_SECS: u64 = 3_600;

/// An IPv4 address with an optional prefix length, e.g. `192.168.1.0/24`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv4Range {
    pub address: Ipv4Addr,
    pub prefix_len: Option<u8>,
}

impl Ipv4Range {
    pub fn parse(input: &str) -> Option<Self> {
        let caps = RE_IPV4_CIDR.captures(input.trim())?;
        let mut octets = [0u8; 4];
        for (i, octet) in octets.iter_mut().enumerate() {
            *octet = caps.get(i + 1)?.as_str().parse().ok()?;
        }
        let prefix_len = match caps.get(5) {
            Some(m) => {
                let len: u8 = m.as_str().parse().ok()?;
                if len > 32 {
                    return None;
                }
                Some(len)
            }
            None => None,
        };
        Some(Self { address: Ipv4Addr::from(octets), prefix_len })
    }

    /// First three octets, the /24 the heuristics work in.
    pub fn slash24(&self) -> [u8; 3] {
        let [a, b, c, _] = self.address.octets();
        [a, b, c]
    }
}

/// Derives a lookup domain for providers that only search by domain.
///
/// Hostnames are used as-is (minus a `www.` prefix); IP ranges map to the
/// reverse-DNS zone of their /24, the closest thing to a domain an address has.
pub fn domain_guess(target: &str) -> String {
    let target = target.trim();
    if let Some(range) = Ipv4Range::parse(target) {
        let [a, b, c] = range.slash24();
        let guess = format!("{c}.{b}.{a}.in-addr.arpa");
        debug!(target, guess = %guess, "Derived reverse zone from IP range.");
        return guess;
    }
    let host = Url::parse(target)
        .ok()
        .and_then(|url| url.host_str().map(String::from))
        .unwrap_or_else(|| target.to_string());
    host.strip_prefix("www.").map(String::from).unwrap_or(host)
}

/// Checks that a target has the shape its scanner type expects.
pub fn validate_target(scanner_type: ScannerType, target: &str) -> Result<(), ScanError> {
    let target = target.trim();
    if target.is_empty() {
        return Err(ScanError::InvalidRequest(match scanner_type {
            ScannerType::Network => "Please enter a valid IP range".to_string(),
            ScannerType::Traffic => "Please select a network interface".to_string(),
            _ => "Please enter a target".to_string(),
        }));
    }
    let valid = match scanner_type {
        ScannerType::Network => Ipv4Range::parse(target).is_some(),
        ScannerType::Port => Ipv4Range::parse(target).is_some() || RE_HOSTNAME.is_match(target),
        ScannerType::Vulnerability => {
            Url::parse(target).is_ok_and(|u| matches!(u.scheme(), "http" | "https"))
                || RE_HOSTNAME.is_match(target)
        }
        ScannerType::Traffic => RE_INTERFACE.is_match(target),
    };
    if valid {
        Ok(())
    } else {
        Err(ScanError::InvalidRequest(format!("'{target}' is not a valid {scanner_type} target")))
    }
}

/// Checks a port list such as `22,80,443` or `1-1024,8080`.
fn valid_port_range(spec: &str) -> bool {
    spec.split(',').all(|part| {
        let Some(caps) = RE_PORT_SPEC.captures(part.trim()) else { return false };
        let port = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());
        match (port(1), port(2)) {
            (Some(start), None) => (1..=65_535).contains(&start),
            (Some(start), Some(end)) => start >= 1 && start <= end && end <= 65_535,
            _ => false,
        }
    })
}

/// Checks the per-type options picked in a panel.
pub fn validate_options(options: &ScanOptions) -> Result<(), ScanError> {
    match options {
        ScanOptions::Port { port_range, .. } if !valid_port_range(port_range) => Err(ScanError::InvalidRequest(
            format!("'{port_range}' is not a valid port list (e.g. 22,80,443 or 1-1024)"),
        )),
        ScanOptions::Traffic { duration_secs, .. } if !(1..=MAX_CAPTURE_SECS).contains(duration_secs) => Err(
            ScanError::InvalidRequest(format!("capture duration must be between 1 and {MAX_CAPTURE_SECS} seconds")),
        ),
        ScanOptions::Network { method } if method.trim().is_empty() => {
            Err(ScanError::InvalidRequest("scan method must not be empty".to_string()))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cidr_and_bare_addresses() {
        let range = Ipv4Range::parse("192.168.1.0/24").unwrap();
        assert_eq!(range.prefix_len, Some(24));
        assert_eq!(range.slash24(), [192, 168, 1]);
        assert_eq!(Ipv4Range::parse("10.0.0.5").unwrap().prefix_len, None);
    }

    #[test]
    fn rejects_out_of_range_octets_and_prefixes() {
        assert!(Ipv4Range::parse("300.1.1.1").is_none());
        assert!(Ipv4Range::parse("10.0.0.0/33").is_none());
        assert!(Ipv4Range::parse("example.com").is_none());
    }

    #[test]
    fn domain_guess_for_ranges_and_hosts() {
        assert_eq!(domain_guess("192.168.1.0/24"), "1.168.192.in-addr.arpa");
        assert_eq!(domain_guess("https://www.example.com/login"), "example.com");
        assert_eq!(domain_guess("example.org"), "example.org");
    }

    #[test]
    fn validation_follows_scanner_type() {
        assert!(validate_target(ScannerType::Network, "192.168.1.0/24").is_ok());
        assert!(validate_target(ScannerType::Network, "example.com").is_err());
        assert!(validate_target(ScannerType::Port, "scanme.nmap.org").is_ok());
        assert!(validate_target(ScannerType::Vulnerability, "https://example.com").is_ok());
        assert!(validate_target(ScannerType::Traffic, "eth0").is_ok());
        assert!(validate_target(ScannerType::Traffic, "eth0; rm -rf").is_err());
        assert!(validate_target(ScannerType::Port, "  ").is_err());
    }

    #[test]
    fn port_lists_and_ranges_are_checked() {
        let port = |range: &str| ScanOptions::Port { port_range: range.to_string(), enable_ids: false };
        assert!(validate_options(&port("1-1024")).is_ok());
        assert!(validate_options(&port("80, 443,8000-8100")).is_ok());
        assert!(validate_options(&port("0")).is_err());
        assert!(validate_options(&port("1024-80")).is_err());
        assert!(validate_options(&port("70000")).is_err());
        assert!(validate_options(&port("")).is_err());
        assert!(validate_options(&port("http")).is_err());
    }

    #[test]
    fn capture_duration_is_bounded() {
        let traffic = |secs| ScanOptions::Traffic { duration_secs: secs, filter: None };
        assert!(validate_options(&traffic(60)).is_ok());
        assert!(validate_options(&traffic(0)).is_err());
        assert!(validate_options(&traffic(MAX_CAPTURE_SECS + 1)).is_err());
    }
}
