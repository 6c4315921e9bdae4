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

//! The MT5 trader.
//!
//! Each operation prepares the symbol, reads what it needs from the terminal,
//! builds a request with [`crate::trader::request`] and hands it to
//! `order_send`. Every answer is checked against the trade server retcode.

use tracing::{debug, info, warn};

use crate::common::{
    credential::Mt5Credential,
    enums::{PositionType, Side},
    models::{OrderSendResult, Position, SymbolInfo, Tick, TradeRequest},
};
use crate::config::Mt5TraderConfig;
use crate::error::{Mt5Error, Mt5Result};
use crate::http::{client::Mt5HttpClient, query::PositionsGetParams};
use crate::trader::{
    gateway::Mt5Gateway,
    request::{self, OrderOptions},
    selector::PositionSelector,
};

pub struct Mt5Trader<G: Mt5Gateway = Mt5HttpClient> {
    gateway: G,
    config: Mt5TraderConfig,
}

impl<G: Mt5Gateway> Mt5Trader<G> {
    pub fn new(gateway: G, config: Mt5TraderConfig) -> Self {
        Self { gateway, config }
    }

    pub fn config(&self) -> &Mt5TraderConfig {
        &self.config
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Establishes the connection between the proxy and the terminal.
    pub async fn initialize(&self) -> Mt5Result<()> {
        if self.gateway.initialize().await? {
            info!("Terminal initialized, allow algo trading to send orders");
            return Ok(());
        }
        let reason = self.last_error_text().await;
        Err(Mt5Error::InitializeFailed(reason))
    }

    /// Logs in to the trade account described by `credential`.
    pub async fn connect(&self, credential: Mt5Credential) -> Mt5Result<()> {
        let login = credential.login.clone();
        if self.gateway.login(credential).await? {
            info!(%login, "Connected to trade account");
            return Ok(());
        }
        let reason = self.last_error_text().await;
        Err(Mt5Error::LoginFailed { login, reason })
    }

    /// Opens a buy position at the current ask.
    ///
    /// `options` is either plain [`StopOffsets`](crate::trader::StopOffsets) or an
    /// [`OrderOptions`] that also overrides the magic number and comment.
    pub async fn open_buy(
        &self,
        symbol: &str,
        lot: f64,
        options: impl Into<OrderOptions>,
    ) -> Mt5Result<OrderSendResult> {
        self.open_market(Side::Buy, symbol, lot, options.into()).await
    }

    /// Opens a sell position at the current bid.
    pub async fn open_sell(
        &self,
        symbol: &str,
        lot: f64,
        options: impl Into<OrderOptions>,
    ) -> Mt5Result<OrderSendResult> {
        self.open_market(Side::Sell, symbol, lot, options.into()).await
    }

    /// Places a buy limit order at `price`.
    pub async fn open_buy_limit(
        &self,
        symbol: &str,
        price: f64,
        lot: f64,
        options: impl Into<OrderOptions>,
    ) -> Mt5Result<OrderSendResult> {
        self.open_limit(Side::Buy, symbol, price, lot, options.into())
            .await
    }

    /// Places a sell limit order at `price`.
    pub async fn open_sell_limit(
        &self,
        symbol: &str,
        price: f64,
        lot: f64,
        options: impl Into<OrderOptions>,
    ) -> Mt5Result<OrderSendResult> {
        self.open_limit(Side::Sell, symbol, price, lot, options.into())
            .await
    }

    /// Closes the selected buy positions.
    pub async fn close_buy(
        &self,
        selector: impl Into<PositionSelector>,
    ) -> Mt5Result<Vec<OrderSendResult>> {
        self.close(PositionType::Buy, selector.into(), None).await
    }

    /// Closes the selected sell positions.
    pub async fn close_sell(
        &self,
        selector: impl Into<PositionSelector>,
    ) -> Mt5Result<Vec<OrderSendResult>> {
        self.close(PositionType::Sell, selector.into(), None).await
    }

    /// Closes `fraction` of each selected buy position, e.g. `0.5` for half.
    pub async fn close_partial_buy(
        &self,
        fraction: f64,
        selector: impl Into<PositionSelector>,
    ) -> Mt5Result<Vec<OrderSendResult>> {
        self.close(PositionType::Buy, selector.into(), Some(fraction))
            .await
    }

    /// Closes `fraction` of each selected sell position.
    pub async fn close_partial_sell(
        &self,
        fraction: f64,
        selector: impl Into<PositionSelector>,
    ) -> Mt5Result<Vec<OrderSendResult>> {
        self.close(PositionType::Sell, selector.into(), Some(fraction))
            .await
    }

    /// Sets the stop loss of the selected positions to the price `sl`.
    pub async fn modify_sl(
        &self,
        selector: impl Into<PositionSelector>,
        sl: f64,
    ) -> Mt5Result<Vec<OrderSendResult>> {
        let positions = self.select_positions(&selector.into(), None).await?;
        let requests = positions
            .iter()
            .map(|position| request::modify_stops(position, sl, position.tp, &self.config));
        self.send_all(requests).await
    }

    /// Sets the take profit of the selected positions to the price `tp`.
    pub async fn modify_tp(
        &self,
        selector: impl Into<PositionSelector>,
        tp: f64,
    ) -> Mt5Result<Vec<OrderSendResult>> {
        let positions = self.select_positions(&selector.into(), None).await?;
        let requests = positions
            .iter()
            .map(|position| request::modify_stops(position, position.sl, tp, &self.config));
        self.send_all(requests).await
    }

    /// Moves the stop loss of the selected positions that are in profit to their open price.
    pub async fn break_even(
        &self,
        selector: impl Into<PositionSelector>,
    ) -> Mt5Result<Vec<OrderSendResult>> {
        let positions = self.select_positions(&selector.into(), None).await?;
        let requests = positions
            .iter()
            .filter(|position| {
                if position.profit <= 0.0 {
                    warn!(
                        ticket = position.ticket,
                        profit = position.profit,
                        "Position not in profit, break even skipped"
                    );
                }
                position.profit > 0.0
            })
            .map(|position| request::break_even(position, &self.config));
        self.send_all(requests).await
    }

    /// Every open position on the account.
    pub async fn get_open_positions(&self) -> Mt5Result<Vec<Position>> {
        let positions = self
            .gateway
            .positions_get(&PositionsGetParams::default())
            .await?;
        if positions.is_empty() {
            info!("No open position");
        }
        Ok(positions)
    }

    /// Cumulative profit of all open positions, rounded to cents.
    pub async fn running_profit(&self) -> Mt5Result<f64> {
        let positions = self.get_open_positions().await?;
        let total: f64 = positions.iter().map(|p| p.profit).sum();
        Ok(request::round_cents(total))
    }

    async fn open_market(
        &self,
        side: Side,
        symbol: &str,
        lot: f64,
        options: OrderOptions,
    ) -> Mt5Result<OrderSendResult> {
        check_lot(lot)?;
        let info = self.prepare_symbol(symbol).await?;
        let tick = self.tick(symbol).await?;
        let price = match side {
            Side::Buy => tick.ask,
            Side::Sell => tick.bid,
        };

        let request = request::market_order(side, &info, lot, price, options, &self.config);
        info!(
            "Sending order: {side} {symbol} {lot} lots at {price} with deviation={} points",
            self.config.deviation
        );
        self.send(&request).await
    }

    async fn open_limit(
        &self,
        side: Side,
        symbol: &str,
        price: f64,
        lot: f64,
        options: OrderOptions,
    ) -> Mt5Result<OrderSendResult> {
        check_lot(lot)?;
        let info = self.prepare_symbol(symbol).await?;

        let request = request::limit_order(side, &info, lot, price, options, &self.config);
        info!("Sending order: {side} LIMIT {symbol} {lot} lots at {price}");
        self.send(&request).await
    }

    async fn close(
        &self,
        position_type: PositionType,
        selector: PositionSelector,
        fraction: Option<f64>,
    ) -> Mt5Result<Vec<OrderSendResult>> {
        if let Some(fraction) = fraction {
            request::check_fraction(fraction)?;
        }

        let positions = self
            .select_positions(&selector, Some(position_type))
            .await?;

        let mut results = Vec::with_capacity(positions.len());
        for position in &positions {
            match self.close_one(position, fraction).await {
                Ok(result) => results.push(result),
                Err(e) => return Err(e.after(results)),
            }
        }
        Ok(results)
    }

    async fn close_one(
        &self,
        position: &Position,
        fraction: Option<f64>,
    ) -> Mt5Result<OrderSendResult> {
        let tick = self.tick(&position.symbol).await?;
        // A buy is closed by selling at bid, a sell by buying at ask.
        let price = match position.position_type {
            PositionType::Buy => tick.bid,
            PositionType::Sell => tick.ask,
        };
        let volume = match fraction {
            Some(fraction) => request::partial_volume(position.volume, fraction)?,
            None => position.volume,
        };

        let request = request::close_position(position, volume, price, &self.config);
        info!(
            "Closing position #{}: {} {} {volume} lots at {price}",
            position.ticket,
            Side::from(position.position_type).opposite(),
            position.symbol,
        );
        self.send(&request).await
    }

    /// Looks the symbol up and makes sure it is shown in Market Watch.
    async fn prepare_symbol(&self, symbol: &str) -> Mt5Result<SymbolInfo> {
        let info = self
            .gateway
            .symbol_info(symbol)
            .await?
            .ok_or_else(|| Mt5Error::SymbolNotFound(symbol.to_string()))?;

        if !info.visible {
            warn!(symbol, "Symbol is not visible, trying to switch on");
            if !self.gateway.symbol_select(symbol, true).await? {
                return Err(Mt5Error::SymbolSelectFailed(symbol.to_string()));
            }
        }
        Ok(info)
    }

    async fn tick(&self, symbol: &str) -> Mt5Result<Tick> {
        self.gateway
            .symbol_info_tick(symbol)
            .await?
            .ok_or_else(|| Mt5Error::NoTick(symbol.to_string()))
    }

    async fn select_positions(
        &self,
        selector: &PositionSelector,
        position_type: Option<PositionType>,
    ) -> Mt5Result<Vec<Position>> {
        if let Some(symbol) = selector.symbol() {
            self.prepare_symbol(symbol).await?;
        }

        let mut positions = self.gateway.positions_get(&selector.params()).await?;
        if let Some(position_type) = position_type {
            positions.retain(|p| p.position_type == position_type);
        }

        if positions.is_empty() {
            let reason = self.last_error_text().await;
            warn!(%selector, %reason, "No positions");
            return Err(Mt5Error::NoPositions(selector.to_string()));
        }
        debug!(%selector, count = positions.len(), "Selected positions");
        Ok(positions)
    }

    async fn send(&self, request: &TradeRequest) -> Mt5Result<OrderSendResult> {
        debug!(?request, "order_send");

        let Some(result) = self.gateway.order_send(request).await? else {
            let reason = self.last_error_text().await;
            warn!(%reason, "order_send returned no result");
            return Err(Mt5Error::OrderSendFailed(reason));
        };

        if !result.retcode.is_success() {
            warn!(
                retcode = %result.retcode,
                comment = %result.comment,
                ?request,
                "order_send failed"
            );
            return Err(Mt5Error::OrderRejected {
                retcode: result.retcode,
                comment: result.comment,
            });
        }

        info!(order = result.order, deal = result.deal, "Order sent");
        Ok(result)
    }

    /// Sends `requests` in order, stopping at the first failure.
    async fn send_all(
        &self,
        requests: impl Iterator<Item = TradeRequest>,
    ) -> Mt5Result<Vec<OrderSendResult>> {
        let mut results = Vec::new();
        for request in requests {
            match self.send(&request).await {
                Ok(result) => results.push(result),
                Err(e) => return Err(e.after(results)),
            }
        }
        Ok(results)
    }

    async fn last_error_text(&self) -> String {
        match self.gateway.last_error().await {
            Ok(err) => err.to_string(),
            Err(e) => format!("last_error unavailable: {e}"),
        }
    }
}

fn check_lot(lot: f64) -> Mt5Result<()> {
    if lot.is_finite() && lot > 0.0 {
        Ok(())
    } else {
        Err(Mt5Error::InvalidVolume(format!("lot must be positive, was {lot}")))
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, sync::Mutex};

    use async_trait::async_trait;
    use tracing_test::traced_test;

    use super::*;
    use crate::common::{
        enums::{OrderType, TradeAction, TradeRetcode},
        models::LastError,
        testing,
    };
    use crate::trader::request::StopOffsets;

    #[derive(Default)]
    struct FakeGateway {
        symbols: HashMap<String, SymbolInfo>,
        ticks: HashMap<String, Tick>,
        positions: Vec<Position>,
        retcode: Option<TradeRetcode>,
        // Sends from this index on are rejected.
        reject_from: Option<usize>,
        no_result: bool,
        initialize_ok: bool,
        login_ok: bool,
        selected: Mutex<Vec<String>>,
        sent: Mutex<Vec<TradeRequest>>,
    }

    impl FakeGateway {
        fn with_eurusd() -> Self {
            let mut gateway = Self {
                initialize_ok: true,
                login_ok: true,
                ..Self::default()
            };
            gateway.symbols.insert(
                "EURUSD".to_string(),
                testing::symbol_info("EURUSD", 0.00001, true),
            );
            gateway
                .ticks
                .insert("EURUSD".to_string(), testing::tick(1.1000, 1.1002));
            gateway
        }

        fn sent(&self) -> Vec<TradeRequest> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Mt5Gateway for FakeGateway {
        async fn initialize(&self) -> Mt5Result<bool> {
            Ok(self.initialize_ok)
        }

        async fn login(&self, _credential: Mt5Credential) -> Mt5Result<bool> {
            Ok(self.login_ok)
        }

        async fn last_error(&self) -> Mt5Result<LastError> {
            Ok(LastError {
                code: -2,
                message: "Invalid arguments".to_string(),
            })
        }

        async fn symbol_info(&self, symbol: &str) -> Mt5Result<Option<SymbolInfo>> {
            Ok(self.symbols.get(symbol).cloned())
        }

        async fn symbol_info_tick(&self, symbol: &str) -> Mt5Result<Option<Tick>> {
            Ok(self.ticks.get(symbol).copied())
        }

        async fn symbol_select(&self, symbol: &str, _enable: bool) -> Mt5Result<bool> {
            self.selected.lock().unwrap().push(symbol.to_string());
            Ok(symbol != "LOCKED")
        }

        async fn positions_get(&self, params: &PositionsGetParams) -> Mt5Result<Vec<Position>> {
            Ok(self
                .positions
                .iter()
                .filter(|p| params.ticket.map_or(true, |t| p.ticket == t))
                .filter(|p| params.symbol.as_ref().map_or(true, |s| &p.symbol == s))
                .cloned()
                .collect())
        }

        async fn order_send(&self, request: &TradeRequest) -> Mt5Result<Option<OrderSendResult>> {
            let index = {
                let mut sent = self.sent.lock().unwrap();
                sent.push(request.clone());
                sent.len() - 1
            };
            if self.no_result {
                return Ok(None);
            }
            let retcode = match self.reject_from {
                Some(from) if index >= from => TradeRetcode::Reject,
                _ => self.retcode.unwrap_or(TradeRetcode::Done),
            };
            Ok(Some(testing::order_result(retcode, 1000 + index as u64)))
        }
    }

    fn trader(gateway: FakeGateway) -> Mt5Trader<FakeGateway> {
        Mt5Trader::new(gateway, Mt5TraderConfig::default())
    }

    #[tokio::test]
    async fn test_open_buy_uses_ask_and_point_offsets() {
        let trader = trader(FakeGateway::with_eurusd());

        let result = trader
            .open_buy("EURUSD", 0.1, StopOffsets::new(Some(20.0), Some(40.0)))
            .await
            .unwrap();

        assert_eq!(result.order, 1000);
        let sent = trader.gateway().sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].magic, Some(260_000));
        assert_eq!(sent[0].action, TradeAction::Deal);
        assert_eq!(sent[0].order_type, Some(OrderType::Buy));
        assert_eq!(sent[0].price, Some(1.1002));
        assert_eq!(sent[0].sl, Some(1.1));
        assert_eq!(sent[0].tp, Some(1.1006));
    }

    #[tokio::test]
    async fn test_open_sell_uses_bid_without_stops() {
        let trader = trader(FakeGateway::with_eurusd());

        trader
            .open_sell("EURUSD", 0.5, StopOffsets::none())
            .await
            .unwrap();

        let sent = trader.gateway().sent();
        assert_eq!(sent[0].order_type, Some(OrderType::Sell));
        assert_eq!(sent[0].price, Some(1.1));
        assert_eq!(sent[0].sl, None);
        assert_eq!(sent[0].tp, None);
    }

    #[tokio::test]
    async fn test_open_buy_limit_keeps_caller_price() {
        let trader = trader(FakeGateway::with_eurusd());

        trader
            .open_buy_limit("EURUSD", 1.095, 0.1, StopOffsets::none().with_stop_loss(100.0))
            .await
            .unwrap();

        let sent = trader.gateway().sent();
        assert_eq!(sent[0].action, TradeAction::Pending);
        assert_eq!(sent[0].order_type, Some(OrderType::BuyLimit));
        assert_eq!(sent[0].price, Some(1.095));
        assert_eq!(sent[0].sl, Some(1.094));
    }

    #[tokio::test]
    async fn test_order_options_override_magic_and_comment() {
        let trader = trader(FakeGateway::with_eurusd());
        let options = OrderOptions::new(StopOffsets::none().with_take_profit(40.0))
            .with_magic(42)
            .with_comment("grid-2");

        trader.open_sell("EURUSD", 0.1, options).await.unwrap();
        trader
            .open_buy_limit("EURUSD", 1.095, 0.1, OrderOptions::default().with_magic(7))
            .await
            .unwrap();

        let sent = trader.gateway().sent();
        assert_eq!(sent[0].magic, Some(42));
        assert_eq!(sent[0].comment.as_deref(), Some("grid-2"));
        assert_eq!(sent[0].tp, Some(1.0996));
        assert_eq!(sent[1].magic, Some(7));
        assert_eq!(sent[1].comment.as_deref(), Some("MT5pytrader"));
        assert_eq!(trader.config().magic, 260_000);
    }

    #[tokio::test]
    async fn test_missing_tick_is_an_error() {
        let mut gateway = FakeGateway::with_eurusd();
        gateway.symbols.insert(
            "USDJPY".to_string(),
            testing::symbol_info("USDJPY", 0.001, true),
        );
        gateway.positions = vec![
            testing::position(3, "USDJPY", PositionType::Buy, 0.1, 150.0, 1.0),
        ];
        let trader = trader(gateway);

        let err = trader
            .open_buy("USDJPY", 0.1, StopOffsets::none())
            .await
            .unwrap_err();
        assert!(matches!(err, Mt5Error::NoTick(ref s) if s == "USDJPY"));

        let err = trader.close_buy(3_u64).await.unwrap_err();
        assert!(matches!(err, Mt5Error::NoTick(_)));
        assert!(trader.gateway().sent().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_symbol_is_an_error() {
        let trader = trader(FakeGateway::with_eurusd());

        let err = trader
            .open_sell_limit("NOPE", 1.0, 0.1, StopOffsets::none())
            .await
            .unwrap_err();

        assert!(matches!(err, Mt5Error::SymbolNotFound(s) if s == "NOPE"));
        assert!(trader.gateway().sent().is_empty());
    }

    #[tokio::test]
    async fn test_hidden_symbol_is_selected() {
        let mut gateway = FakeGateway::with_eurusd();
        gateway.symbols.insert(
            "GBPUSD".to_string(),
            testing::symbol_info("GBPUSD", 0.00001, false),
        );
        gateway
            .ticks
            .insert("GBPUSD".to_string(), testing::tick(1.25, 1.2502));
        gateway
            .symbols
            .insert("LOCKED".to_string(), testing::symbol_info("LOCKED", 0.01, false));
        let trader = trader(gateway);

        trader
            .open_buy("GBPUSD", 0.1, StopOffsets::none())
            .await
            .unwrap();
        let err = trader
            .open_buy("LOCKED", 0.1, StopOffsets::none())
            .await
            .unwrap_err();

        assert!(matches!(err, Mt5Error::SymbolSelectFailed(_)));
        assert_eq!(
            *trader.gateway().selected.lock().unwrap(),
            vec!["GBPUSD".to_string(), "LOCKED".to_string()]
        );
    }

    #[tokio::test]
    async fn test_invalid_lot_is_rejected_before_sending() {
        let trader = trader(FakeGateway::with_eurusd());

        let err = trader
            .open_buy("EURUSD", 0.0, StopOffsets::none())
            .await
            .unwrap_err();

        assert!(matches!(err, Mt5Error::InvalidVolume(_)));
        assert!(trader.gateway().sent().is_empty());
    }

    #[tokio::test]
    #[traced_test]
    async fn test_rejected_order_reports_retcode() {
        let mut gateway = FakeGateway::with_eurusd();
        gateway.retcode = Some(TradeRetcode::MarketClosed);
        let trader = trader(gateway);

        let err = trader
            .open_buy("EURUSD", 0.1, StopOffsets::none())
            .await
            .unwrap_err();

        assert_eq!(err.retcode(), Some(TradeRetcode::MarketClosed));
        assert!(logs_contain("order_send failed"));
    }

    #[tokio::test]
    async fn test_missing_result_carries_last_error() {
        let mut gateway = FakeGateway::with_eurusd();
        gateway.no_result = true;
        let trader = trader(gateway);

        let err = trader
            .open_buy("EURUSD", 0.1, StopOffsets::none())
            .await
            .unwrap_err();

        assert!(matches!(err, Mt5Error::OrderSendFailed(reason) if reason.contains("Invalid arguments")));
    }

    #[tokio::test]
    async fn test_close_buy_by_symbol_closes_every_buy_at_bid() {
        let mut gateway = FakeGateway::with_eurusd();
        gateway.positions = vec![
            testing::position(1, "EURUSD", PositionType::Buy, 0.1, 1.09, 10.0),
            testing::position(2, "EURUSD", PositionType::Sell, 0.2, 1.11, 5.0),
            testing::position(3, "EURUSD", PositionType::Buy, 0.3, 1.08, 20.0),
        ];
        let trader = trader(gateway);

        let results = trader.close_buy("EURUSD").await.unwrap();

        assert_eq!(results.len(), 2);
        let sent = trader.gateway().sent();
        assert_eq!(
            sent.iter().map(|r| r.position).collect::<Vec<_>>(),
            vec![Some(1), Some(3)]
        );
        assert!(sent.iter().all(|r| r.order_type == Some(OrderType::Sell)));
        assert!(sent.iter().all(|r| r.price == Some(1.1)));
        assert_eq!(sent[1].volume, Some(0.3));
    }

    #[tokio::test]
    async fn test_close_sell_by_ticket_buys_at_ask() {
        let mut gateway = FakeGateway::with_eurusd();
        gateway.positions = vec![
            testing::position(8, "EURUSD", PositionType::Sell, 0.4, 1.11, 5.0),
        ];
        let trader = trader(gateway);

        trader.close_sell(8_u64).await.unwrap();

        let sent = trader.gateway().sent();
        assert_eq!(sent[0].order_type, Some(OrderType::Buy));
        assert_eq!(sent[0].price, Some(1.1002));
        assert_eq!(sent[0].position, Some(8));
    }

    #[tokio::test]
    async fn test_close_without_matching_positions() {
        let mut gateway = FakeGateway::with_eurusd();
        gateway.positions = vec![
            testing::position(8, "EURUSD", PositionType::Sell, 0.4, 1.11, 5.0),
        ];
        let trader = trader(gateway);

        let err = trader.close_buy(8_u64).await.unwrap_err();

        assert!(matches!(err, Mt5Error::NoPositions(s) if s == "#8"));
    }

    #[tokio::test]
    async fn test_partial_close_rounds_volume() {
        let mut gateway = FakeGateway::with_eurusd();
        gateway.positions = vec![
            testing::position(4, "EURUSD", PositionType::Buy, 0.3, 1.09, 3.0),
            testing::position(5, "EURUSD", PositionType::Sell, 1.0, 1.12, 3.0),
        ];
        let trader = trader(gateway);

        trader.close_partial_buy(0.5, "EURUSD").await.unwrap();
        trader.close_partial_sell(0.25, 5_u64).await.unwrap();

        let sent = trader.gateway().sent();
        assert_eq!(sent[0].volume, Some(0.15));
        assert_eq!(sent[1].volume, Some(0.25));
        assert_eq!(sent[1].order_type, Some(OrderType::Buy));
    }

    #[tokio::test]
    async fn test_partial_close_rejects_bad_fraction_without_sending() {
        let mut gateway = FakeGateway::with_eurusd();
        gateway.positions = vec![
            testing::position(4, "EURUSD", PositionType::Buy, 0.35, 1.09, 3.0),
        ];
        let trader = trader(gateway);

        let err = trader.close_partial_buy(1.5, 4_u64).await.unwrap_err();

        assert!(matches!(err, Mt5Error::InvalidVolume(_)));
        assert!(trader.gateway().sent().is_empty());
    }

    #[tokio::test]
    async fn test_modify_sl_and_tp_keep_the_other_level() {
        let mut gateway = FakeGateway::with_eurusd();
        let mut position = testing::position(6, "EURUSD", PositionType::Buy, 0.1, 1.09, 3.0);
        position.sl = 1.08;
        position.tp = 1.12;
        gateway.positions = vec![position];
        let trader = trader(gateway);

        trader.modify_sl(6_u64, 1.085).await.unwrap();
        trader.modify_tp("EURUSD", 1.13).await.unwrap();

        let sent = trader.gateway().sent();
        assert_eq!(sent[0].action, TradeAction::Sltp);
        assert_eq!((sent[0].sl, sent[0].tp), (Some(1.085), Some(1.12)));
        assert_eq!((sent[1].sl, sent[1].tp), (Some(1.08), Some(1.13)));
        assert_eq!(sent[1].comment.as_deref(), Some("MT5pytrader"));
    }

    #[tokio::test]
    async fn test_modify_by_symbol_updates_every_position() {
        let mut gateway = FakeGateway::with_eurusd();
        gateway.positions = [(21, 1.12), (22, 1.13), (23, 1.14)]
            .into_iter()
            .map(|(ticket, tp)| {
                let mut position =
                    testing::position(ticket, "EURUSD", PositionType::Buy, 0.1, 1.09, 1.0);
                position.sl = 1.07;
                position.tp = tp;
                position
            })
            .collect();
        let trader = trader(gateway);

        let results = trader.modify_sl("EURUSD", 1.08).await.unwrap();
        assert_eq!(results.len(), 3);
        trader.modify_tp("EURUSD", 1.15).await.unwrap();

        let sent = trader.gateway().sent();
        assert_eq!(sent.len(), 6);
        assert_eq!(
            sent[..3].iter().map(|r| (r.position, r.sl, r.tp)).collect::<Vec<_>>(),
            vec![
                (Some(21), Some(1.08), Some(1.12)),
                (Some(22), Some(1.08), Some(1.13)),
                (Some(23), Some(1.08), Some(1.14)),
            ]
        );
        assert!(sent[3..]
            .iter()
            .all(|r| r.sl == Some(1.07) && r.tp == Some(1.15)));
    }

    #[tokio::test]
    async fn test_rejection_after_first_close_keeps_applied_results() {
        let mut gateway = FakeGateway::with_eurusd();
        gateway.reject_from = Some(1);
        gateway.positions = vec![
            testing::position(1, "EURUSD", PositionType::Buy, 0.1, 1.09, 10.0),
            testing::position(2, "EURUSD", PositionType::Buy, 0.2, 1.09, 10.0),
            testing::position(3, "EURUSD", PositionType::Buy, 0.3, 1.09, 10.0),
        ];
        let trader = trader(gateway);

        let err = trader.close_buy("EURUSD").await.unwrap_err();

        let Mt5Error::PartiallyApplied { done, source } = &err else {
            panic!("expected a partially applied error, was {err}");
        };
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].order, 1000);
        assert!(matches!(**source, Mt5Error::OrderRejected { .. }));
        assert_eq!(err.retcode(), Some(TradeRetcode::Reject));
        // Nothing is sent after the rejection.
        assert_eq!(trader.gateway().sent().len(), 2);
    }

    #[tokio::test]
    async fn test_rejection_after_first_modify_keeps_applied_results() {
        let mut gateway = FakeGateway::with_eurusd();
        gateway.reject_from = Some(1);
        gateway.positions = vec![
            testing::position(1, "EURUSD", PositionType::Buy, 0.1, 1.09, 10.0),
            testing::position(2, "EURUSD", PositionType::Sell, 0.1, 1.11, 4.0),
        ];
        let trader = trader(gateway);

        let err = trader.break_even("EURUSD").await.unwrap_err();
        assert_eq!(err.applied().len(), 1);

        let err = trader.modify_tp("EURUSD", 1.2).await.unwrap_err();
        assert!(matches!(err, Mt5Error::OrderRejected { .. }));
        assert!(err.applied().is_empty());
    }

    #[tokio::test]
    async fn test_break_even_only_touches_profitable_positions() {
        let mut gateway = FakeGateway::with_eurusd();
        gateway.positions = vec![
            testing::position(10, "EURUSD", PositionType::Buy, 0.1, 1.09, 12.5),
            testing::position(11, "EURUSD", PositionType::Sell, 0.1, 1.08, -3.0),
        ];
        let trader = trader(gateway);

        let results = trader.break_even("EURUSD").await.unwrap();

        assert_eq!(results.len(), 1);
        let sent = trader.gateway().sent();
        assert_eq!(sent[0].position, Some(10));
        assert_eq!(sent[0].sl, Some(1.09));
    }

    #[tokio::test]
    async fn test_running_profit_sums_open_positions() {
        let mut gateway = FakeGateway::with_eurusd();
        gateway.positions = vec![
            testing::position(1, "EURUSD", PositionType::Buy, 0.1, 1.09, 10.126),
            testing::position(2, "GBPUSD", PositionType::Sell, 0.1, 1.25, -3.5),
        ];
        let trader = trader(gateway);

        assert_eq!(trader.get_open_positions().await.unwrap().len(), 2);
        assert_eq!(trader.running_profit().await.unwrap(), 6.63);
    }

    #[tokio::test]
    async fn test_running_profit_without_positions_is_zero() {
        let trader = trader(FakeGateway::with_eurusd());
        assert_eq!(trader.running_profit().await.unwrap(), 0.0);
    }

    #[tokio::test]
    async fn test_initialize_and_connect_failures() {
        let gateway = FakeGateway::default();
        let trader = trader(gateway);

        let err = trader.initialize().await.unwrap_err();
        assert!(matches!(err, Mt5Error::InitializeFailed(_)));

        let credential = Mt5Credential::builder()
            .login("5012345")
            .password("pw")
            .server("Demo")
            .build()
            .unwrap();
        let err = trader.connect(credential).await.unwrap_err();
        assert!(matches!(err, Mt5Error::LoginFailed { login, .. } if login == "5012345"));
    }
}
