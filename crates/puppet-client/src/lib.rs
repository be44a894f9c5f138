// Client adapter for a remote wechaty puppet service.

pub mod commands;
pub mod config;
pub mod dispatcher;
pub mod listener;
pub mod logging;
pub mod service;

#[cfg(test)]
mod testing;

pub use config::PuppetOptions;
pub use dispatcher::{Dispatcher, EventHandler};
pub use service::{PuppetService, SessionState};

pub use puppet_shared::events::{self, EventKind, PuppetEvent};
pub use puppet_shared::types;
pub use puppet_shared::{FileBox, PuppetError, Result};
