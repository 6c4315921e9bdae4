// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2025 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! Configuration structures for the MetaTrader 5 trader.
//!
//! `Mt5Config` describes the HTTP proxy in front of the terminal.
//! `Mt5TraderConfig` carries the defaults stamped onto every trade request.
//! The credentials (login/password/server) are carried by `Mt5Credential`.

use std::{env, fmt::Debug, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::common::{
    credential::Mt5Credential,
    enums::{OrderFilling, OrderTimeType},
};
use crate::error::{Mt5Error, Mt5Result};

pub const DEFAULT_COMMENT: &str = "MT5pytrader";
pub const DEFAULT_MAGIC: u64 = 260_000;
pub const DEFAULT_DEVIATION: u32 = 20;

/// Connection settings for the MT5 HTTP proxy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mt5Config {
    /// Base URL of the proxy, e.g. `http://localhost:5000`.
    pub base_url: String,
    /// HTTP timeout in seconds.
    pub http_timeout: u64,
    /// Optional outbound proxy URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
}

impl Default for Mt5Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            http_timeout: 30,
            proxy: None,
        }
    }
}

impl Mt5Config {
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            base_url,
            ..Self::default()
        }
    }

    /// Reads `MT5_BASE_URL`, `MT5_HTTP_TIMEOUT` and `MT5_PROXY`.
    pub fn from_env() -> Self {
        load_dotenv();
        let defaults = Self::default();
        Self {
            base_url: get_env_or_default("MT5_BASE_URL", defaults.base_url),
            http_timeout: get_env_or_default("MT5_HTTP_TIMEOUT", defaults.http_timeout),
            proxy: get_env_or_none("MT5_PROXY"),
        }
    }
}

/// Defaults applied to trade requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mt5TraderConfig {
    pub comment: String,
    /// Expert advisor id attached to orders.
    pub magic: u64,
    /// Maximum accepted slippage in points.
    pub deviation: u32,
    pub type_time: OrderTimeType,
    pub type_filling: OrderFilling,
}

impl Default for Mt5TraderConfig {
    fn default() -> Self {
        Self {
            comment: DEFAULT_COMMENT.to_string(),
            magic: DEFAULT_MAGIC,
            deviation: DEFAULT_DEVIATION,
            type_time: OrderTimeType::Gtc,
            type_filling: OrderFilling::Ioc,
        }
    }
}

impl Mt5TraderConfig {
    /// Reads `MT5_COMMENT`, `MT5_MAGIC` and `MT5_DEVIATION`.
    pub fn from_env() -> Self {
        load_dotenv();
        let defaults = Self::default();
        Self {
            comment: get_env_or_default("MT5_COMMENT", defaults.comment),
            magic: get_env_or_default("MT5_MAGIC", defaults.magic),
            deviation: get_env_or_default("MT5_DEVIATION", defaults.deviation),
            ..defaults
        }
    }
}

/// Reads `MT5_LOGIN`, `MT5_PASSWORD`, `MT5_SERVER` and the optional `MT5_PROXY`.
pub fn credential_from_env() -> Mt5Result<Mt5Credential> {
    load_dotenv();
    let login = required_env("MT5_LOGIN")?;
    let password = required_env("MT5_PASSWORD")?;
    let server = required_env("MT5_SERVER")?;

    Mt5Credential::builder()
        .login(login)
        .password(password)
        .server(server)
        .proxy(get_env_or_none::<String>("MT5_PROXY"))
        .build()
        .map_err(|e| Mt5Error::ConfigError(e.to_string()))
}

fn load_dotenv() {
    // A missing .env file is the normal case outside development.
    let _ = dotenv::dotenv();
}

fn required_env(env_var: &str) -> Mt5Result<String> {
    env::var(env_var).map_err(|_| Mt5Error::ConfigError(format!("{env_var} is not set")))
}

/// Gets an environment variable or returns `default` when missing or unparseable.
pub fn get_env_or_default<T: FromStr>(env_var: &str, default: T) -> T
where
    <T as FromStr>::Err: Debug,
{
    match env::var(env_var) {
        Ok(val) => val.parse::<T>().unwrap_or_else(|_| {
            error!("Failed to parse {}: {}, using default", env_var, val);
            default
        }),
        Err(_) => default,
    }
}

/// Gets an environment variable and parses it, returning `None` if not found or invalid.
pub fn get_env_or_none<T: FromStr>(env_var: &str) -> Option<T>
where
    <T as FromStr>::Err: Debug,
{
    env::var(env_var).ok().and_then(|val| val.parse::<T>().ok())
}
