//! # puppet-shared
//!
//! Types shared by the transport and client crates: the externally fixed
//! protobuf wire schema, the domain payloads handed to callers, the typed
//! event model with its envelope decoder, and the error taxonomy.

pub mod constants;
pub mod convert;
pub mod error;
pub mod events;
pub mod filebox;
pub mod protocol;
pub mod types;

pub use error::{DecodeError, PuppetError, Result, TransportError};
pub use events::{decode_envelope, EventKind, PuppetEvent};
pub use filebox::FileBox;
