//! The seam between the trader and the terminal.

use async_trait::async_trait;

use crate::common::{
    credential::Mt5Credential,
    models::{LastError, OrderSendResult, Position, SymbolInfo, Tick, TradeRequest},
};
use crate::error::{Mt5Error, Mt5Result};
use crate::http::{client::Mt5HttpClient, query::PositionsGetParams};

/// Terminal functions the trader relies on.
#[async_trait]
pub trait Mt5Gateway: Send + Sync {
    async fn initialize(&self) -> Mt5Result<bool>;

    /// Logs in to a trade account; `false` when the server refuses it.
    async fn login(&self, credential: Mt5Credential) -> Mt5Result<bool>;

    async fn last_error(&self) -> Mt5Result<LastError>;

    async fn symbol_info(&self, symbol: &str) -> Mt5Result<Option<SymbolInfo>>;

    async fn symbol_info_tick(&self, symbol: &str) -> Mt5Result<Option<Tick>>;

    async fn symbol_select(&self, symbol: &str, enable: bool) -> Mt5Result<bool>;

    async fn positions_get(&self, params: &PositionsGetParams) -> Mt5Result<Vec<Position>>;

    async fn order_send(&self, request: &TradeRequest) -> Mt5Result<Option<OrderSendResult>>;
}

#[async_trait]
impl Mt5Gateway for Mt5HttpClient {
    async fn initialize(&self) -> Mt5Result<bool> {
        Mt5HttpClient::initialize(self).await.map_err(Mt5Error::from)
    }

    async fn login(&self, credential: Mt5Credential) -> Mt5Result<bool> {
        self.set_credential(credential).await;
        Mt5HttpClient::login(self).await.map_err(Mt5Error::from)
    }

    async fn last_error(&self) -> Mt5Result<LastError> {
        Mt5HttpClient::last_error(self).await.map_err(Mt5Error::from)
    }

    async fn symbol_info(&self, symbol: &str) -> Mt5Result<Option<SymbolInfo>> {
        Mt5HttpClient::symbol_info(self, symbol)
            .await
            .map_err(Mt5Error::from)
    }

    async fn symbol_info_tick(&self, symbol: &str) -> Mt5Result<Option<Tick>> {
        Mt5HttpClient::symbol_info_tick(self, symbol)
            .await
            .map_err(Mt5Error::from)
    }

    async fn symbol_select(&self, symbol: &str, enable: bool) -> Mt5Result<bool> {
        Mt5HttpClient::symbol_select(self, symbol, enable)
            .await
            .map_err(Mt5Error::from)
    }

    async fn positions_get(&self, params: &PositionsGetParams) -> Mt5Result<Vec<Position>> {
        Mt5HttpClient::positions_get(self, params)
            .await
            .map_err(Mt5Error::from)
    }

    async fn order_send(&self, request: &TradeRequest) -> Mt5Result<Option<OrderSendResult>> {
        Mt5HttpClient::order_send(self, request)
            .await
            .map_err(Mt5Error::from)
    }
}
