//! Endpoint discovery and reachability probing.
//!
//! When only a token is configured, the service endpoint is looked up over
//! HTTP: `GET {discovery_url}/{token}` answers `{"ip": ..., "port": ...}`.
//! A placeholder ip of `0.0.0.0` means the token has no live service.

use std::time::Duration;

use puppet_shared::constants::{PING_TIMEOUT_SECS, PLACEHOLDER_IP};
use puppet_shared::PuppetError;
use reqwest::StatusCode;
use serde::Deserialize;
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use crate::endpoint::Endpoint;

#[derive(Debug, Deserialize)]
struct DiscoveryResponse {
    ip: Option<String>,
    port: Option<u16>,
}

/// Resolve the service endpoint for `token` through the discovery service.
///
/// Every failure (HTTP error, non-200 status, unusable body) is reported as
/// a [`PuppetError::Configuration`], since the caller can only fix it by
/// changing the token or configuring an explicit endpoint.
pub async fn resolve_endpoint(discovery_url: &str, token: &str) -> Result<Endpoint, PuppetError> {
    let url = format!("{}/{}", discovery_url.trim_end_matches('/'), token);
    debug!(discovery_url = %discovery_url, "Resolving endpoint via discovery service");

    let response = reqwest::get(&url)
        .await
        .map_err(|e| PuppetError::Configuration(format!("discovery request failed: {e}")))?;

    if response.status() != StatusCode::OK {
        return Err(PuppetError::Configuration(format!(
            "discovery service answered {}",
            response.status()
        )));
    }

    let body: DiscoveryResponse = response
        .json()
        .await
        .map_err(|e| PuppetError::Configuration(format!("malformed discovery response: {e}")))?;

    let ip = match body.ip {
        Some(ip) if !ip.is_empty() && ip != PLACEHOLDER_IP => ip,
        _ => {
            warn!("Discovery service has no live endpoint for this token");
            return Err(PuppetError::Configuration(
                "no service endpoint registered for token".to_string(),
            ));
        }
    };
    let port = body.port.ok_or_else(|| {
        PuppetError::Configuration("discovery response is missing a port".to_string())
    })?;

    let endpoint = Endpoint::parse(&format!("{ip}:{port}"))?;
    info!(endpoint = %endpoint, "Discovered service endpoint");
    Ok(endpoint)
}

/// Check that a TCP connection to `endpoint` can be opened within the probe
/// timeout. The connection is dropped immediately.
pub async fn ping_endpoint(endpoint: &Endpoint) -> Result<(), PuppetError> {
    let timeout = Duration::from_secs(PING_TIMEOUT_SECS);
    match tokio::time::timeout(timeout, TcpStream::connect(endpoint.authority())).await {
        Ok(Ok(_stream)) => {
            debug!(endpoint = %endpoint, "Endpoint is reachable");
            Ok(())
        }
        Ok(Err(e)) => Err(PuppetError::Configuration(format!(
            "endpoint {endpoint} is unreachable: {e}"
        ))),
        Err(_) => Err(PuppetError::Configuration(format!(
            "endpoint {endpoint} did not answer within {PING_TIMEOUT_SECS}s"
        ))),
    }
}
