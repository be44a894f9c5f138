//! Service endpoint parsing and validation.
//!
//! Accepted forms are `host:port`, or a `http://` / `https://` URL whose port
//! defaults to 80 / 443. Hosts are DNS names or dotted IPv4 addresses made of
//! labels of 1–63 alphanumeric or hyphen characters, with no hyphen at either
//! end of a label. Ports are 2–5 digits and must fit a TCP port.

use std::fmt;
use std::str::FromStr;

use puppet_shared::constants::{DEFAULT_HTTPS_PORT, DEFAULT_HTTP_PORT};
use puppet_shared::PuppetError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Parse and validate an endpoint string.
    ///
    /// Fails with [`PuppetError::Configuration`] on any malformed input; no
    /// network access happens here.
    pub fn parse(raw: &str) -> Result<Self, PuppetError> {
        let raw = raw.trim();
        let invalid = |reason: &str| {
            PuppetError::Configuration(format!("invalid endpoint {raw:?}: {reason}"))
        };

        let (rest, default_port) = if let Some(rest) = raw.strip_prefix("https://") {
            (rest, Some(DEFAULT_HTTPS_PORT))
        } else if let Some(rest) = raw.strip_prefix("http://") {
            (rest, Some(DEFAULT_HTTP_PORT))
        } else {
            (raw, None)
        };
        let rest = rest.trim_end_matches('/');

        let (host, port) = match (rest.rsplit_once(':'), default_port) {
            (Some((host, port)), _) => (host, parse_port(port).ok_or_else(|| invalid("bad port"))?),
            (None, Some(port)) => (rest, port),
            (None, None) => return Err(invalid("expected host:port")),
        };

        if !is_valid_host(host) {
            return Err(invalid("bad host name"));
        }

        Ok(Self::new(host, port))
    }

    /// `host:port`, the authority used to build the channel URI.
    pub fn authority(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_port(raw: &str) -> Option<u16> {
    if !(2..=5).contains(&raw.len()) || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok().filter(|port| *port != 0)
}

fn is_valid_host(host: &str) -> bool {
    !host.is_empty() && host.split('.').all(is_valid_label)
}

fn is_valid_label(label: &str) -> bool {
    (1..=63).contains(&label.len())
        && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
        && !label.starts_with('-')
        && !label.ends_with('-')
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl FromStr for Endpoint {
    type Err = PuppetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_ip_and_port() {
        let endpoint = Endpoint::parse("127.0.0.1:80").unwrap();
        assert_eq!(endpoint.host, "127.0.0.1");
        assert_eq!(endpoint.port, 80);
        assert_eq!(endpoint.to_string(), "127.0.0.1:80");
    }

    #[test]
    fn test_accepts_hostname() {
        let endpoint: Endpoint = "puppet-1.example.com:8788".parse().unwrap();
        assert_eq!(endpoint, Endpoint::new("puppet-1.example.com", 8788));
    }

    #[test]
    fn test_rejects_port_out_of_range() {
        assert!(matches!(
            Endpoint::parse("badhost:99999"),
            Err(PuppetError::Configuration(_))
        ));
    }

    #[test]
    fn test_rejects_missing_port() {
        assert!(matches!(
            Endpoint::parse("nohostnoport"),
            Err(PuppetError::Configuration(_))
        ));
    }

    #[test]
    fn test_rejects_malformed_hosts_and_ports() {
        for raw in [
            ":8080",
            "-bad.host:8080",
            "bad-.host:8080",
            "bad..host:8080",
            "bad_host:8080",
            "host:8",
            "host:123456",
            "host:80a",
            "host:",
            "host:00",
            "host:00000",
        ] {
            assert!(Endpoint::parse(raw).is_err(), "{raw} should be rejected");
        }
        let long_label = format!("{}:8080", "a".repeat(64));
        assert!(Endpoint::parse(&long_label).is_err());
    }

    #[test]
    fn test_url_forms_default_port() {
        assert_eq!(
            Endpoint::parse("https://puppet.example.com").unwrap(),
            Endpoint::new("puppet.example.com", 443)
        );
        assert_eq!(
            Endpoint::parse("http://puppet.example.com/").unwrap(),
            Endpoint::new("puppet.example.com", 80)
        );
        assert_eq!(
            Endpoint::parse("http://10.0.0.2:8788").unwrap(),
            Endpoint::new("10.0.0.2", 8788)
        );
    }
}
