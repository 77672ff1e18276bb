use std::net::SocketAddrV4;
use std::time::Duration;

/// Managed backend connection settings
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// project url, e.g. `https://xyz.supabase.co`
    pub base_url: String,
    /// anon/service key sent as `apikey` and bearer token
    pub api_key: String,
    pub timeout: Duration,
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            timeout,
        }
    }
}

/// Server configs
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddrV4,
    pub backend: BackendConfig,
    /// sessions untouched for longer than this are dropped by the sweeper
    pub session_idle: Duration,
}

impl ServerConfig {
    pub fn new(addr: SocketAddrV4, backend: BackendConfig, session_idle: Duration) -> Self {
        Self {
            addr,
            backend,
            session_idle,
        }
    }
}
