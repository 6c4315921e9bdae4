// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2025 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
// Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------
//
//! HTTP client for the MetaTrader 5 HTTP proxy.
//!
//! The proxy exposes each terminal function as a POST JSON route
//! (`/api/initialize`, `/api/symbol_info`, `/api/order_send`, ...).
//!
//! This module therefore provides:
//! - Mt5HttpInnerClient: low-level client that speaks raw JSON to the routes.
//! - Mt5HttpClient: clonable wrapper decoding the answers into terminal models.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::common::{
    credential::Mt5Credential,
    enums::ConnectionStatus,
    models::{LastError, OrderSendResult, Position, SymbolInfo, Tick, TradeRequest},
    parse::{extract_string_field, parse_flag, parse_list, parse_optional},
    urls::Mt5Url,
};
use crate::config::Mt5Config;
use crate::http::{
    error::Mt5HttpError,
    models::Mt5Response,
    query::{LoginParams, PositionsGetParams, SymbolParams, SymbolSelectParams},
};

const USER_AGENT_VALUE: &str = concat!("mt5-trader/", env!("CARGO_PKG_VERSION"));

// Low-level MT5 HTTP client (inner)
pub struct Mt5HttpInnerClient {
    url: Mt5Url,
    client: reqwest::Client,
    credential: Arc<Mutex<Mt5Credential>>,
    is_connected: Arc<AtomicBool>,
}

#[derive(Clone)]
pub struct Mt5HttpClient {
    inner: Arc<Mt5HttpInnerClient>,
}

impl Mt5HttpInnerClient {
    pub fn new(
        config: Mt5Config,
        credential: Mt5Credential,
        url: Mt5Url,
    ) -> Result<Self, Mt5HttpError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.http_timeout));

        if let Some(proxy) = config.proxy.as_ref().or(credential.proxy.as_ref()) {
            let proxy = reqwest::Proxy::all(proxy)
                .map_err(|e| Mt5HttpError::RequestError(format!("invalid proxy: {e}")))?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build()?;

        Ok(Self {
            url,
            client,
            credential: Arc::new(Mutex::new(credential)),
            is_connected: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn is_connected(&self) -> bool {
        self.is_connected.load(Ordering::SeqCst)
    }

    fn set_connected(&self, connected: bool) {
        self.is_connected.store(connected, Ordering::SeqCst);
    }

    async fn auth_header(&self) -> Option<String> {
        let cred = self.credential.lock().await;
        cred.token.as_ref().map(|token| format!("Bearer {token}"))
    }

    /// Posts `body` to a proxy route and returns the unwrapped `result`.
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value, Mt5HttpError> {
        let url = self.url.route(path);
        debug!(%url, "POST");

        let mut request = self.client.post(&url).json(body);
        if let Some(auth) = self.auth_header().await {
            request = request.header(AUTHORIZATION, auth);
        }

        let resp = request.send().await?;
        let status = resp.status().as_u16();
        let text = resp.text().await?;

        if !(200..300).contains(&status) {
            return Err(Mt5HttpError::from_http_status(status, text));
        }

        let envelope: Mt5Response = serde_json::from_str(&text)
            .map_err(|e| Mt5HttpError::JsonDecodeError(format!("Invalid JSON response: {e}")))?;

        envelope.into_result().map_err(Mt5HttpError::ProxyError)
    }

    // Raw routes: each returns the `result` value as sent by the proxy.

    pub async fn http_initialize(&self) -> Result<Value, Mt5HttpError> {
        self.post_json(Mt5Url::INITIALIZE, &json!({})).await
    }

    pub async fn http_login(&self, params: &LoginParams) -> Result<Value, Mt5HttpError> {
        self.post_json(Mt5Url::LOGIN, params).await
    }

    pub async fn http_shutdown(&self) -> Result<Value, Mt5HttpError> {
        self.post_json(Mt5Url::SHUTDOWN, &json!({})).await
    }

    pub async fn http_last_error(&self) -> Result<Value, Mt5HttpError> {
        self.post_json(Mt5Url::LAST_ERROR, &json!({})).await
    }

    pub async fn http_symbol_info(&self, params: &SymbolParams) -> Result<Value, Mt5HttpError> {
        self.post_json(Mt5Url::SYMBOL_INFO, params).await
    }

    pub async fn http_symbol_info_tick(
        &self,
        params: &SymbolParams,
    ) -> Result<Value, Mt5HttpError> {
        self.post_json(Mt5Url::SYMBOL_INFO_TICK, params).await
    }

    pub async fn http_symbol_select(
        &self,
        params: &SymbolSelectParams,
    ) -> Result<Value, Mt5HttpError> {
        self.post_json(Mt5Url::SYMBOL_SELECT, params).await
    }

    pub async fn http_positions_get(
        &self,
        params: &PositionsGetParams,
    ) -> Result<Value, Mt5HttpError> {
        self.post_json(Mt5Url::POSITIONS_GET, params).await
    }

    pub async fn http_order_send(&self, request: &TradeRequest) -> Result<Value, Mt5HttpError> {
        self.post_json(Mt5Url::ORDER_SEND, request).await
    }
}

impl Mt5HttpClient {
    pub fn new(
        config: Mt5Config,
        credential: Mt5Credential,
        url: Mt5Url,
    ) -> Result<Self, Mt5HttpError> {
        let inner = Mt5HttpInnerClient::new(config, credential, url)?;
        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Builds a client whose URL comes from `config.base_url`.
    pub fn from_config(config: Mt5Config, credential: Mt5Credential) -> Result<Self, Mt5HttpError> {
        let url = Mt5Url::new(config.base_url.clone());
        Self::new(config, credential, url)
    }

    pub fn inner(&self) -> &Mt5HttpInnerClient {
        &self.inner
    }

    pub fn is_connected(&self) -> bool {
        self.inner.is_connected()
    }

    pub fn connection_status(&self) -> ConnectionStatus {
        if self.is_connected() {
            ConnectionStatus::Connected
        } else {
            ConnectionStatus::Disconnected
        }
    }

    /// Connects the proxy to the terminal.
    pub async fn initialize(&self) -> Result<bool, Mt5HttpError> {
        let resp = self.inner.http_initialize().await?;
        Ok(parse_flag(&resp, "result")?)
    }

    /// Logs in with the stored credentials, keeping any session token issued.
    pub async fn login(&self) -> Result<bool, Mt5HttpError> {
        let params = {
            let cred = self.inner.credential.lock().await;
            let login = cred.login_number().ok_or_else(|| {
                Mt5HttpError::InvalidRequestError(format!(
                    "login must be an account number, was {:?}",
                    cred.login
                ))
            })?;
            LoginParams {
                login,
                password: cred.password.clone(),
                server: cred.server.clone(),
            }
        };

        let resp = self.inner.http_login(&params).await?;

        let token = extract_string_field(&resp, "token").ok();
        let authorized = token.is_some() || parse_flag(&resp, "authorized").unwrap_or(false);

        if let Some(token) = token {
            self.inner.credential.lock().await.token = Some(token);
        }

        if authorized {
            info!(login = params.login, server = %params.server, "Authorized on trade account");
        } else {
            warn!(login = params.login, server = %params.server, "Login refused");
        }
        self.inner.set_connected(authorized);

        Ok(authorized)
    }

    /// Replaces the stored credentials, dropping any previous session token.
    pub async fn set_credential(&self, credential: Mt5Credential) {
        *self.inner.credential.lock().await = credential;
        self.inner.set_connected(false);
    }

    pub async fn shutdown(&self) -> Result<(), Mt5HttpError> {
        self.inner.http_shutdown().await?;
        self.inner.set_connected(false);
        Ok(())
    }

    pub async fn last_error(&self) -> Result<LastError, Mt5HttpError> {
        let resp = self.inner.http_last_error().await?;
        serde_json::from_value(resp).map_err(|e| Mt5HttpError::ParseError(e.to_string()))
    }

    pub async fn symbol_info(&self, symbol: &str) -> Result<Option<SymbolInfo>, Mt5HttpError> {
        let params = SymbolParams {
            symbol: symbol.to_string(),
        };
        Ok(parse_optional(self.inner.http_symbol_info(&params).await?)?)
    }

    pub async fn symbol_info_tick(&self, symbol: &str) -> Result<Option<Tick>, Mt5HttpError> {
        let params = SymbolParams {
            symbol: symbol.to_string(),
        };
        Ok(parse_optional(self.inner.http_symbol_info_tick(&params).await?)?)
    }

    pub async fn symbol_select(&self, symbol: &str, enable: bool) -> Result<bool, Mt5HttpError> {
        let params = SymbolSelectParams {
            symbol: symbol.to_string(),
            enable,
        };
        let resp = self.inner.http_symbol_select(&params).await?;
        Ok(parse_flag(&resp, "result")?)
    }

    pub async fn positions_get(
        &self,
        params: &PositionsGetParams,
    ) -> Result<Vec<Position>, Mt5HttpError> {
        Ok(parse_list(self.inner.http_positions_get(params).await?)?)
    }

    /// Sends a trade request. `None` means the terminal produced no result.
    pub async fn order_send(
        &self,
        request: &TradeRequest,
    ) -> Result<Option<OrderSendResult>, Mt5HttpError> {
        Ok(parse_optional(self.inner.http_order_send(request).await?)?)
    }
}
