//! Request facade.
//!
//! Each sub-module adds one domain's operations to [`PuppetService`] as an
//! `impl` block. Every operation fetches the stub through the single session
//! accessor, so all of them fail with a precondition error before `start()`.
//!
//! [`PuppetService`]: crate::service::PuppetService

pub mod contact;
pub mod friendship;
pub mod message;
pub mod room;
pub mod tag;

use serde::de::DeserializeOwned;
use serde::Serialize;

use puppet_shared::{PuppetError, Result};

/// Serialize a value carried as a JSON string on the wire.
pub(crate) fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| PuppetError::payload(e.to_string()))
}

/// Parse a JSON string field of a response.
pub(crate) fn from_json<T: DeserializeOwned>(what: &str, raw: &str) -> Result<T> {
    serde_json::from_str(raw).map_err(|e| PuppetError::payload(format!("malformed {what}: {e}")))
}

/// Unwrap an optional response field the caller cannot do without.
pub(crate) fn required<T>(value: Option<T>, what: &str) -> Result<T> {
    value.ok_or_else(|| PuppetError::payload(format!("response is missing {what}")))
}
