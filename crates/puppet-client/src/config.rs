//! Puppet connection options, merged from explicit values and the environment.

use puppet_shared::constants::{DEFAULT_DISCOVERY_URL, ENDPOINT_ENV_VARS, TOKEN_ENV_VARS};
use puppet_shared::PuppetError;
use tracing::warn;

/// Options for connecting to the puppet service.
#[derive(Debug, Clone)]
pub struct PuppetOptions {
    /// Service token, used for discovery and sent with every call.
    /// Env: `WECHATY_PUPPET_SERVICE_TOKEN`, `TOKEN`, `token`
    pub token: Option<String>,

    /// Explicit `host:port` of the service; skips discovery when set.
    /// Env: `WECHATY_PUPPET_SERVICE_ENDPOINT`, `ENDPOINT`, `endpoint`
    pub endpoint: Option<String>,

    /// Discovery service queried as `{discovery_url}/{token}`.
    /// Default: `https://api.chatie.io/v0/hosties`
    pub discovery_url: String,

    /// Name used in log lines.
    pub name: String,
}

impl Default for PuppetOptions {
    fn default() -> Self {
        Self {
            token: None,
            endpoint: None,
            discovery_url: DEFAULT_DISCOVERY_URL.to_string(),
            name: "puppet-service".to_string(),
        }
    }
}

impl PuppetOptions {
    /// Options built purely from environment variables.
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Fill unset fields from the process environment.
    pub fn with_env(self) -> Self {
        self.with_lookup(|key| std::env::var(key).ok())
    }

    /// Fill unset fields through `lookup`. Explicit values win; a warning is
    /// logged when both sources provide one.
    pub fn with_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_token = first_non_empty(&TOKEN_ENV_VARS, &lookup);
        let env_endpoint = first_non_empty(&ENDPOINT_ENV_VARS, &lookup);

        self.token = merge("token", self.token.take(), env_token);
        self.endpoint = merge("endpoint", self.endpoint.take(), env_endpoint);
        self
    }

    /// Check that the service can be located. Runs before any network access.
    pub fn validate(&self) -> Result<(), PuppetError> {
        match (&self.token, &self.endpoint) {
            (None, None) => Err(PuppetError::Configuration(
                "either a token or an endpoint is required".to_string(),
            )),
            (Some(_), Some(endpoint)) => {
                warn!(endpoint = %endpoint, "Both token and endpoint are set, using endpoint");
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

fn first_non_empty<F>(keys: &[&str], lookup: &F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    keys.iter()
        .filter_map(|key| lookup(key))
        .find(|value| !value.trim().is_empty())
}

fn merge(field: &str, explicit: Option<String>, from_env: Option<String>) -> Option<String> {
    match (explicit, from_env) {
        (Some(explicit), Some(_)) => {
            warn!(field, "Set both in options and environment, using options");
            Some(explicit)
        }
        (explicit, from_env) => explicit.or(from_env),
    }
}
