//! URL safety gate.
//!
//! Every URL a user hands us is checked here before any HTTP traffic is
//! sent, and the fetcher runs every redirect target through the same gate
//! before following it. The checks run in a fixed order and the first
//! failure wins:
//!
//! 1. the URL must use `http` or `https`
//! 2. it must carry a hostname
//! 3. the hostname must resolve (bounded by [`DNS_TIMEOUT`])
//! 4. none of the resolved addresses may be loopback, private or reserved

use crate::error::ValidationError;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use url::{Host, Url};

/// Upper bound for every DNS lookup performed by the gate.
pub const DNS_TIMEOUT: Duration = Duration::from_secs(5);

const ALLOWED_SCHEMES: [&str; 2] = ["http", "https"];

enum Target<'a> {
    Literal(IpAddr),
    Domain(&'a str),
}

/// Scheme, host and address checks applied to every outgoing URL.
///
/// The default gate refuses every address [`is_restricted`] flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct SafetyGate {
    allow_loopback: bool,
}

impl SafetyGate {
    /// Gate that also admits loopback addresses, for local HTTP mocks.
    #[cfg(test)]
    pub(crate) fn allowing_loopback() -> Self {
        Self { allow_loopback: true }
    }

    /// Validate a URL.
    ///
    /// Succeeds silently. Performs a DNS lookup for domain names, so this is
    /// network I/O and not a pure function.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::InvalidScheme`] for anything but http/https
    /// - [`ValidationError::MissingHost`] when no hostname can be read
    /// - [`ValidationError::ResolutionError`] when DNS fails or times out
    /// - [`ValidationError::PrivateNetworkAccess`] for restricted addresses
    #[instrument(level = "info", skip_all, fields(%url))]
    pub async fn validate(&self, url: &str) -> Result<(), ValidationError> {
        let parsed = parse(url)?;
        let addrs = match target(&parsed, url)? {
            Target::Literal(ip) => vec![ip],
            Target::Domain(host) => resolve(host, port_of(&parsed)).await?,
        };
        self.check_addresses(&parsed, &addrs)?;
        info!(addresses = addrs.len(), "URL passed safety checks");
        Ok(())
    }

    fn permits(&self, ip: &IpAddr) -> bool {
        !is_restricted(ip) || (self.allow_loopback && is_loopback(ip))
    }

    fn check_addresses(&self, url: &Url, addrs: &[IpAddr]) -> Result<(), ValidationError> {
        match addrs.iter().find(|ip| !self.permits(ip)) {
            Some(ip) => {
                warn!(host = url.host_str().unwrap_or_default(), %ip, "Blocked private network target");
                Err(ValidationError::PrivateNetworkAccess {
                    host: url.host_str().unwrap_or_default().to_string(),
                    ip: *ip,
                })
            }
            None => Ok(()),
        }
    }
}

/// Validate a user-supplied URL with the default gate.
///
/// See [`SafetyGate::validate`].
pub async fn validate(url: &str) -> Result<(), ValidationError> {
    SafetyGate::default().validate(url).await
}

fn parse(url: &str) -> Result<Url, ValidationError> {
    Url::parse(url.trim()).map_err(|e| {
        debug!(error = %e, "URL did not parse as an absolute URL");
        ValidationError::MissingHost(url.to_string())
    })
}

fn target<'a>(parsed: &'a Url, original: &str) -> Result<Target<'a>, ValidationError> {
    if !ALLOWED_SCHEMES.contains(&parsed.scheme()) {
        warn!(scheme = parsed.scheme(), "Rejected URL scheme");
        return Err(ValidationError::InvalidScheme(parsed.scheme().to_string()));
    }
    match parsed.host() {
        Some(Host::Ipv4(ip)) => Ok(Target::Literal(IpAddr::V4(ip))),
        Some(Host::Ipv6(ip)) => Ok(Target::Literal(IpAddr::V6(ip))),
        Some(Host::Domain(d)) if !d.is_empty() => Ok(Target::Domain(d)),
        _ => Err(ValidationError::MissingHost(original.to_string())),
    }
}

fn port_of(url: &Url) -> u16 {
    url.port_or_known_default().unwrap_or(80)
}

async fn resolve(host: &str, port: u16) -> Result<Vec<IpAddr>, ValidationError> {
    let lookup = tokio::time::timeout(DNS_TIMEOUT, tokio::net::lookup_host((host, port))).await;
    let addrs: Vec<IpAddr> = match lookup {
        Err(_) => {
            return Err(ValidationError::ResolutionError {
                host: host.to_string(),
                reason: format!("lookup timed out after {}s", DNS_TIMEOUT.as_secs()),
            });
        }
        Ok(Err(e)) => {
            return Err(ValidationError::ResolutionError {
                host: host.to_string(),
                reason: e.to_string(),
            });
        }
        Ok(Ok(addrs)) => addrs.map(|sa| sa.ip()).collect(),
    };
    if addrs.is_empty() {
        return Err(ValidationError::ResolutionError {
            host: host.to_string(),
            reason: "no addresses returned".to_string(),
        });
    }
    debug!(%host, ?addrs, "Resolved hostname");
    Ok(addrs)
}

fn is_loopback(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_loopback(),
        IpAddr::V6(v6) => v6.is_loopback() || v6.to_ipv4_mapped().is_some_and(|m| m.is_loopback()),
    }
}

/// True for addresses that must never be fetched: loopback, RFC1918,
/// link-local, shared, documentation, benchmarking, multicast and reserved.
pub fn is_restricted(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_restricted_v4(v4),
        IpAddr::V6(v6) => is_restricted_v6(v6),
    }
}

fn is_restricted_v4(ip: &Ipv4Addr) -> bool {
    let [a, b, c, _] = ip.octets();
    ip.is_private()
        || ip.is_loopback()
        || ip.is_link_local()
        || ip.is_broadcast()
        || ip.is_documentation()
        || ip.is_multicast()
        // 0.0.0.0/8
        || a == 0
        // 100.64.0.0/10 shared address space
        || (a == 100 && (64..=127).contains(&b))
        // 192.0.0.0/24 IETF protocol assignments
        || (a == 192 && b == 0 && c == 0)
        // 198.18.0.0/15 benchmarking
        || (a == 198 && (b == 18 || b == 19))
        // 240.0.0.0/4 reserved
        || a >= 240
}

fn is_restricted_v6(ip: &Ipv6Addr) -> bool {
    if let Some(mapped) = ip.to_ipv4_mapped() {
        return is_restricted_v4(&mapped);
    }
    let first = ip.segments()[0];
    ip.is_loopback()
        || ip.is_unspecified()
        || ip.is_multicast()
        // fc00::/7 unique local
        || (first & 0xfe00) == 0xfc00
        // fe80::/10 link local
        || (first & 0xffc0) == 0xfe80
        // 2001:db8::/32 documentation
        || (first == 0x2001 && ip.segments()[1] == 0x0db8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unsafe_schemes() {
        for url in ["ftp://example.com", "file:///etc/passwd", "javascript:alert(1)", "gopher://example.com/"] {
            let err = validate(url).await.unwrap_err();
            assert!(
                matches!(err, ValidationError::InvalidScheme(_)),
                "{url} should be rejected for its scheme, got {err:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_invalid_urls() {
        assert_eq!(
            validate("not_a_url").await,
            Err(ValidationError::MissingHost("not_a_url".to_string()))
        );
        assert!(matches!(
            validate("http://").await,
            Err(ValidationError::MissingHost(_))
        ));
        assert!(matches!(validate("").await, Err(ValidationError::MissingHost(_))));
    }

    #[tokio::test]
    async fn test_loopback_addresses() {
        for url in ["http://127.0.0.1", "http://127.0.0.1:8080/admin", "http://[::1]/", "http://0.0.0.0/"] {
            let err = validate(url).await.unwrap_err();
            assert!(
                matches!(err, ValidationError::PrivateNetworkAccess { .. }),
                "{url} should be blocked, got {err:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_localhost_is_blocked() {
        let err = validate("http://localhost:8080").await.unwrap_err();
        assert!(matches!(err, ValidationError::PrivateNetworkAccess { .. }));
    }

    #[tokio::test]
    async fn test_private_networks() {
        for url in [
            "http://10.0.0.1/",
            "http://172.16.0.1/",
            "http://172.31.255.255/",
            "http://192.168.1.1",
            "http://169.254.169.254/latest/meta-data/",
            "http://[fd00::1]/",
            "http://[::ffff:192.168.0.1]/",
        ] {
            let err = validate(url).await.unwrap_err();
            assert!(
                matches!(err, ValidationError::PrivateNetworkAccess { .. }),
                "{url} should be blocked, got {err:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_unresolvable_host() {
        let err = validate("http://does-not-exist.invalid/").await.unwrap_err();
        assert!(matches!(err, ValidationError::ResolutionError { .. }));
    }

    #[tokio::test]
    async fn test_scheme_checked_before_host() {
        // Scheme failure wins even though the host is also private.
        let err = validate("ftp://127.0.0.1/").await.unwrap_err();
        assert!(matches!(err, ValidationError::InvalidScheme(_)));
    }

    #[tokio::test]
    #[ignore = "requires network access"]
    async fn test_safe_url() {
        assert_eq!(validate("https://www.google.com").await, Ok(()));
    }

    #[test]
    fn test_is_restricted_public_addresses() {
        for ip in ["8.8.8.8", "1.1.1.1", "93.184.216.34", "2606:4700:4700::1111"] {
            let ip: IpAddr = ip.parse().unwrap();
            assert!(!is_restricted(&ip), "{ip} should be allowed");
        }
    }

    #[test]
    fn test_is_restricted_reserved_blocks() {
        for ip in [
            "100.64.0.1",
            "198.18.0.1",
            "192.0.2.10",
            "203.0.113.5",
            "224.0.0.1",
            "255.255.255.255",
            "250.1.2.3",
            "fe80::1",
            "2001:db8::1",
            "::",
        ] {
            let ip: IpAddr = ip.parse().unwrap();
            assert!(is_restricted(&ip), "{ip} should be blocked");
        }
    }

    #[tokio::test]
    async fn test_loopback_gate_admits_only_loopback() {
        let gate = SafetyGate::allowing_loopback();
        assert_eq!(gate.validate("http://127.0.0.1:8080/article").await, Ok(()));
        assert_eq!(gate.validate("http://[::1]/").await, Ok(()));
        assert_eq!(gate.validate("http://localhost/").await, Ok(()));

        for url in ["http://10.0.0.1/", "http://169.254.169.254/", "http://0.0.0.0/"] {
            assert!(
                matches!(gate.validate(url).await, Err(ValidationError::PrivateNetworkAccess { .. })),
                "{url} should still be blocked"
            );
        }
        assert!(matches!(
            gate.validate("ftp://127.0.0.1/").await,
            Err(ValidationError::InvalidScheme(_))
        ));
    }
}
