/// Fully qualified name of the remote gRPC service.
pub const SERVICE_NAME: &str = "wechaty.Puppet";

/// Endpoint discovery service queried with a token when no endpoint is configured.
pub const DEFAULT_DISCOVERY_URL: &str = "https://api.chatie.io/v0/hosties";

/// Address the discovery service reports when a token has no live endpoint.
pub const PLACEHOLDER_IP: &str = "0.0.0.0";

/// Environment variables consulted for the service token, in priority order.
pub const TOKEN_ENV_VARS: [&str; 3] = ["WECHATY_PUPPET_SERVICE_TOKEN", "TOKEN", "token"];

/// Environment variables consulted for the service endpoint, in priority order.
pub const ENDPOINT_ENV_VARS: [&str; 3] = ["WECHATY_PUPPET_SERVICE_ENDPOINT", "ENDPOINT", "endpoint"];

/// Scheme prefix of the `authorization` metadata sent with every call.
pub const AUTHORIZATION_SCHEME: &str = "Wechaty";

/// Reachability probe timeout in seconds
pub const PING_TIMEOUT_SECS: u64 = 3;

/// gRPC channel connect timeout in seconds
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default ports when an endpoint is given as a URL without a port
pub const DEFAULT_HTTP_PORT: u16 = 80;
pub const DEFAULT_HTTPS_PORT: u16 = 443;

/// Payload sent with the locally emitted logout event
pub const LOCAL_LOGOUT_DATA: &str = "logout";
