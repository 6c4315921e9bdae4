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

//! Data models exchanged with the MetaTrader 5 terminal.
//!
//! Field names follow the terminal's own structures so the proxy can pass them
//! through unchanged. Fields the crate does not use are ignored on decode.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::enums::{
    OrderFilling, OrderTimeType, OrderType, PositionType, TradeAction, TradeRetcode,
};

/// Symbol properties as returned by `symbol_info`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolInfo {
    pub name: String,
    /// Whether the symbol is shown in Market Watch.
    #[serde(default)]
    pub visible: bool,
    /// Value of one point in price units.
    pub point: f64,
    #[serde(default)]
    pub digits: u32,
    #[serde(default)]
    pub bid: f64,
    #[serde(default)]
    pub ask: f64,
    #[serde(default)]
    pub volume_min: f64,
    #[serde(default)]
    pub volume_max: f64,
    #[serde(default)]
    pub volume_step: f64,
    #[serde(default)]
    pub trade_contract_size: f64,
}

/// Last prices of a symbol as returned by `symbol_info_tick`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    #[serde(default)]
    pub time: i64,
    pub bid: f64,
    pub ask: f64,
    #[serde(default)]
    pub last: f64,
    #[serde(default)]
    pub volume: u64,
}

/// An open position as returned by `positions_get`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub ticket: u64,
    #[serde(default)]
    pub identifier: u64,
    pub symbol: String,
    #[serde(rename = "type")]
    pub position_type: PositionType,
    pub volume: f64,
    pub price_open: f64,
    #[serde(default)]
    pub sl: f64,
    #[serde(default)]
    pub tp: f64,
    #[serde(default)]
    pub price_current: f64,
    #[serde(default)]
    pub profit: f64,
    #[serde(default)]
    pub swap: f64,
    #[serde(default)]
    pub magic: u64,
    #[serde(default)]
    pub comment: String,
    /// Open time in seconds since the epoch.
    #[serde(default)]
    pub time: i64,
}

impl Position {
    pub fn opened_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.time, 0)
    }
}

/// A trade request as accepted by `order_send`.
///
/// Only `action` is mandatory; absent fields are left out of the JSON body so
/// the terminal applies its own defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRequest {
    pub action: TradeAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub order_type: Option<OrderType>,
    /// Ticket of the position a close or modification applies to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sl: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tp: Option<f64>,
    /// Maximum price deviation in points.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deviation: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub magic: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_time: Option<OrderTimeType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_filling: Option<OrderFilling>,
}

impl TradeRequest {
    pub fn new(action: TradeAction) -> Self {
        Self {
            action,
            symbol: None,
            volume: None,
            order_type: None,
            position: None,
            price: None,
            sl: None,
            tp: None,
            deviation: None,
            magic: None,
            comment: None,
            type_time: None,
            type_filling: None,
        }
    }
}

/// Outcome of `order_send`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSendResult {
    pub retcode: TradeRetcode,
    #[serde(default)]
    pub deal: u64,
    #[serde(default)]
    pub order: u64,
    #[serde(default)]
    pub volume: f64,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub bid: f64,
    #[serde(default)]
    pub ask: f64,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub request_id: u64,
}

/// Error tuple returned by `last_error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastError {
    pub code: i32,
    pub message: String,
}

impl std::fmt::Display for LastError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.code, self.message)
    }
}
