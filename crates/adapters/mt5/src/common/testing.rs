//! Testing utilities and fixtures for the MetaTrader 5 trader.
//!
//! Shared by unit tests and the integration tests under `tests/`.

use crate::common::{
    enums::{PositionType, TradeRetcode},
    models::{OrderSendResult, Position, SymbolInfo, Tick},
};

pub fn symbol_info(name: &str, point: f64, visible: bool) -> SymbolInfo {
    SymbolInfo {
        name: name.to_string(),
        visible,
        point,
        digits: 5,
        bid: 0.0,
        ask: 0.0,
        volume_min: 0.01,
        volume_max: 100.0,
        volume_step: 0.01,
        trade_contract_size: 100_000.0,
    }
}

pub fn tick(bid: f64, ask: f64) -> Tick {
    Tick {
        time: 1_700_000_000,
        bid,
        ask,
        last: 0.0,
        volume: 0,
    }
}

pub fn position(
    ticket: u64,
    symbol: &str,
    position_type: PositionType,
    volume: f64,
    price_open: f64,
    profit: f64,
) -> Position {
    Position {
        ticket,
        identifier: ticket,
        symbol: symbol.to_string(),
        position_type,
        volume,
        price_open,
        sl: 0.0,
        tp: 0.0,
        price_current: price_open,
        profit,
        swap: 0.0,
        magic: 260_000,
        comment: "MT5pytrader".to_string(),
        time: 1_700_000_000,
    }
}

pub fn order_result(retcode: TradeRetcode, order: u64) -> OrderSendResult {
    OrderSendResult {
        retcode,
        deal: order,
        order,
        volume: 0.0,
        price: 0.0,
        bid: 0.0,
        ask: 0.0,
        comment: "Request executed".to_string(),
        request_id: 1,
    }
}
