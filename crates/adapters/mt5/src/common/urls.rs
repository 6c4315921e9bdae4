//! URL management for the MetaTrader 5 HTTP proxy routes.

use std::fmt;

/// Base URL of the proxy plus the route of each terminal function.
#[derive(Debug, Clone)]
pub struct Mt5Url {
    base_url: String,
}

impl Mt5Url {
    pub const INITIALIZE: &'static str = "/api/initialize";
    pub const LOGIN: &'static str = "/api/login";
    pub const SHUTDOWN: &'static str = "/api/shutdown";
    pub const LAST_ERROR: &'static str = "/api/last_error";
    pub const SYMBOL_INFO: &'static str = "/api/symbol_info";
    pub const SYMBOL_INFO_TICK: &'static str = "/api/symbol_info_tick";
    pub const SYMBOL_SELECT: &'static str = "/api/symbol_select";
    pub const POSITIONS_GET: &'static str = "/api/positions_get";
    pub const ORDER_SEND: &'static str = "/api/order_send";

    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of a proxy route.
    pub fn route(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl fmt::Display for Mt5Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base_url)
    }
}
