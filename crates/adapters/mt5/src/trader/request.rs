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

//! Construction of `order_send` requests.
//!
//! Everything here is pure: prices, points and positions come in, a
//! [`TradeRequest`] comes out. Stop offsets are expressed in points and turned
//! into absolute price levels relative to the order price.

use crate::common::{
    enums::{Side, TradeAction},
    models::{Position, SymbolInfo, TradeRequest},
};
use crate::config::Mt5TraderConfig;
use crate::error::{Mt5Error, Mt5Result};

/// Optional stop loss and take profit distances, in points.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StopOffsets {
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
}

impl StopOffsets {
    pub fn new(stop_loss: Option<f64>, take_profit: Option<f64>) -> Self {
        Self {
            stop_loss,
            take_profit,
        }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_stop_loss(mut self, points: f64) -> Self {
        self.stop_loss = Some(points);
        self
    }

    pub fn with_take_profit(mut self, points: f64) -> Self {
        self.take_profit = Some(points);
        self
    }
}

/// Settings for a single order: stop offsets, plus a magic number and comment
/// that replace the trader defaults when set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderOptions {
    pub stops: StopOffsets,
    pub magic: Option<u64>,
    pub comment: Option<String>,
}

impl OrderOptions {
    pub fn new(stops: StopOffsets) -> Self {
        Self {
            stops,
            ..Self::default()
        }
    }

    pub fn with_magic(mut self, magic: u64) -> Self {
        self.magic = Some(magic);
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

impl From<StopOffsets> for OrderOptions {
    fn from(stops: StopOffsets) -> Self {
        Self::new(stops)
    }
}

/// Rounds to two decimals, halves going to the even digit.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Rounds a price to the symbol precision. Symbols reporting zero digits are left as is.
pub fn normalize_price(price: f64, digits: u32) -> f64 {
    if digits == 0 {
        return price;
    }
    let factor = 10_f64.powi(digits as i32);
    (price * factor).round() / factor
}

/// Absolute stop loss and take profit levels for an order on `side` at `price`.
///
/// A buy places its stop below and its target above the price; a sell the reverse.
pub fn stop_levels(
    side: Side,
    price: f64,
    symbol: &SymbolInfo,
    offsets: StopOffsets,
) -> (Option<f64>, Option<f64>) {
    let direction = side.direction();
    let sl = offsets
        .stop_loss
        .map(|points| normalize_price(price - direction * points * symbol.point, symbol.digits));
    let tp = offsets
        .take_profit
        .map(|points| normalize_price(price + direction * points * symbol.point, symbol.digits));
    (sl, tp)
}

fn order_request(
    action: TradeAction,
    side: Side,
    symbol: &SymbolInfo,
    lot: f64,
    price: f64,
    options: OrderOptions,
    defaults: &Mt5TraderConfig,
) -> TradeRequest {
    let (sl, tp) = stop_levels(side, price, symbol, options.stops);
    let order_type = match action {
        TradeAction::Pending => side.limit_order_type(),
        _ => side.market_order_type(),
    };

    TradeRequest {
        symbol: Some(symbol.name.clone()),
        volume: Some(lot),
        order_type: Some(order_type),
        price: Some(price),
        sl,
        tp,
        deviation: Some(defaults.deviation),
        magic: Some(options.magic.unwrap_or(defaults.magic)),
        comment: Some(options.comment.unwrap_or_else(|| defaults.comment.clone())),
        type_time: Some(defaults.type_time),
        type_filling: Some(defaults.type_filling),
        ..TradeRequest::new(action)
    }
}

/// Market order executed at `price` (ask for a buy, bid for a sell).
pub fn market_order(
    side: Side,
    symbol: &SymbolInfo,
    lot: f64,
    price: f64,
    options: impl Into<OrderOptions>,
    defaults: &Mt5TraderConfig,
) -> TradeRequest {
    order_request(TradeAction::Deal, side, symbol, lot, price, options.into(), defaults)
}

/// Pending limit order waiting at `price`.
pub fn limit_order(
    side: Side,
    symbol: &SymbolInfo,
    lot: f64,
    price: f64,
    options: impl Into<OrderOptions>,
    defaults: &Mt5TraderConfig,
) -> TradeRequest {
    order_request(TradeAction::Pending, side, symbol, lot, price, options.into(), defaults)
}

/// Opposite deal closing `volume` of `position` at `price`.
pub fn close_position(
    position: &Position,
    volume: f64,
    price: f64,
    defaults: &Mt5TraderConfig,
) -> TradeRequest {
    let side = Side::from(position.position_type).opposite();

    TradeRequest {
        symbol: Some(position.symbol.clone()),
        volume: Some(volume),
        order_type: Some(side.market_order_type()),
        position: Some(position.ticket),
        price: Some(price),
        deviation: Some(defaults.deviation),
        type_time: Some(defaults.type_time),
        type_filling: Some(defaults.type_filling),
        ..TradeRequest::new(TradeAction::Deal)
    }
}

/// Fails unless `fraction` lies in `(0, 1]`.
pub fn check_fraction(fraction: f64) -> Mt5Result<()> {
    if fraction > 0.0 && fraction <= 1.0 {
        Ok(())
    } else {
        Err(Mt5Error::InvalidVolume(format!(
            "fraction must be in (0, 1], was {fraction}"
        )))
    }
}

/// Share of `volume` to close, rounded to two decimals.
///
/// `fraction` must lie in `(0, 1]`, e.g. `0.5` closes half the position.
pub fn partial_volume(volume: f64, fraction: f64) -> Mt5Result<f64> {
    check_fraction(fraction)?;

    let partial = round_cents(volume * fraction);
    if partial <= 0.0 {
        return Err(Mt5Error::InvalidVolume(format!(
            "{fraction} of {volume} lots rounds to zero"
        )));
    }
    Ok(partial)
}

/// Sets absolute stop loss and take profit levels on an open position.
pub fn modify_stops(
    position: &Position,
    sl: f64,
    tp: f64,
    defaults: &Mt5TraderConfig,
) -> TradeRequest {
    TradeRequest {
        symbol: Some(position.symbol.clone()),
        position: Some(position.ticket),
        sl: Some(sl),
        tp: Some(tp),
        comment: Some(defaults.comment.clone()),
        type_time: Some(defaults.type_time),
        type_filling: Some(defaults.type_filling),
        ..TradeRequest::new(TradeAction::Sltp)
    }
}

/// Moves the stop loss to the open price, keeping the take profit.
pub fn break_even(position: &Position, defaults: &Mt5TraderConfig) -> TradeRequest {
    modify_stops(position, position.price_open, position.tp, defaults)
}
