//! Enumerations for the MetaTrader 5 trader.
//!
//! The terminal speaks plain integers for actions, order types, expiration and
//! filling modes. Each enum here serialises to the integer the terminal expects.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionStatus::Connected => write!(f, "CONNECTED"),
            ConnectionStatus::Disconnected => write!(f, "DISCONNECTED"),
        }
    }
}

/// Implements the integer conversions used by serde for a terminal constant enum.
macro_rules! terminal_constant {
    ($name:ident { $($variant:ident = $value:literal),+ $(,)? }) => {
        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                match value {
                    $($name::$variant => $value,)+
                }
            }
        }

        impl TryFrom<i32> for $name {
            type Error = String;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                match value {
                    $($value => Ok($name::$variant),)+
                    other => Err(format!("invalid {} value: {other}", stringify!($name))),
                }
            }
        }
    };
}

/// Trade operation type (`TRADE_ACTION_*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum TradeAction {
    /// Market order for immediate execution.
    Deal,
    /// Pending order placed at a given price.
    Pending,
    /// Modify stop loss and take profit of an open position.
    Sltp,
    /// Modify the parameters of a pending order.
    Modify,
    /// Delete a pending order.
    Remove,
    /// Close a position by an opposite one.
    CloseBy,
}

terminal_constant!(TradeAction {
    Deal = 1,
    Pending = 5,
    Sltp = 6,
    Modify = 7,
    Remove = 8,
    CloseBy = 10,
});

/// Order type (`ORDER_TYPE_*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum OrderType {
    Buy,
    Sell,
    BuyLimit,
    SellLimit,
    BuyStop,
    SellStop,
    BuyStopLimit,
    SellStopLimit,
    CloseBy,
}

terminal_constant!(OrderType {
    Buy = 0,
    Sell = 1,
    BuyLimit = 2,
    SellLimit = 3,
    BuyStop = 4,
    SellStop = 5,
    BuyStopLimit = 6,
    SellStopLimit = 7,
    CloseBy = 8,
});

/// Order expiration (`ORDER_TIME_*`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum OrderTimeType {
    /// Good till cancelled.
    #[default]
    Gtc,
    Day,
    Specified,
    SpecifiedDay,
}

terminal_constant!(OrderTimeType {
    Gtc = 0,
    Day = 1,
    Specified = 2,
    SpecifiedDay = 3,
});

/// Order filling policy (`ORDER_FILLING_*`).
///
/// `Ioc` shares its wire value (1) with `SYMBOL_TRADE_EXECUTION_INSTANT`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum OrderFilling {
    Fok,
    #[default]
    Ioc,
    Return,
    Boc,
}

terminal_constant!(OrderFilling {
    Fok = 0,
    Ioc = 1,
    Return = 2,
    Boc = 3,
});

/// Position direction (`POSITION_TYPE_*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum PositionType {
    Buy,
    Sell,
}

terminal_constant!(PositionType { Buy = 0, Sell = 1 });

impl From<PositionType> for Side {
    fn from(value: PositionType) -> Self {
        match value {
            PositionType::Buy => Side::Buy,
            PositionType::Sell => Side::Sell,
        }
    }
}

/// Direction of a new order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    /// Market order type for this side.
    pub fn market_order_type(self) -> OrderType {
        match self {
            Side::Buy => OrderType::Buy,
            Side::Sell => OrderType::Sell,
        }
    }

    /// Limit order type for this side.
    pub fn limit_order_type(self) -> OrderType {
        match self {
            Side::Buy => OrderType::BuyLimit,
            Side::Sell => OrderType::SellLimit,
        }
    }

    /// Sign applied to a take-profit offset; stop losses use the opposite sign.
    pub fn direction(self) -> f64 {
        match self {
            Side::Buy => 1.0,
            Side::Sell => -1.0,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// Trade server return code (`TRADE_RETCODE_*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", from = "i32")]
pub enum TradeRetcode {
    Requote,
    Reject,
    Cancel,
    Placed,
    Done,
    DonePartial,
    Error,
    Timeout,
    Invalid,
    InvalidVolume,
    InvalidPrice,
    InvalidStops,
    TradeDisabled,
    MarketClosed,
    NoMoney,
    PriceChanged,
    PriceOff,
    Other(i32),
}

const RETCODES: &[(TradeRetcode, i32)] = &[
    (TradeRetcode::Requote, 10004),
    (TradeRetcode::Reject, 10006),
    (TradeRetcode::Cancel, 10007),
    (TradeRetcode::Placed, 10008),
    (TradeRetcode::Done, 10009),
    (TradeRetcode::DonePartial, 10010),
    (TradeRetcode::Error, 10011),
    (TradeRetcode::Timeout, 10012),
    (TradeRetcode::Invalid, 10013),
    (TradeRetcode::InvalidVolume, 10014),
    (TradeRetcode::InvalidPrice, 10015),
    (TradeRetcode::InvalidStops, 10016),
    (TradeRetcode::TradeDisabled, 10017),
    (TradeRetcode::MarketClosed, 10018),
    (TradeRetcode::NoMoney, 10019),
    (TradeRetcode::PriceChanged, 10020),
    (TradeRetcode::PriceOff, 10021),
];

impl TradeRetcode {
    /// Whether the trade server accepted the request.
    pub fn is_success(self) -> bool {
        matches!(
            self,
            TradeRetcode::Done | TradeRetcode::Placed | TradeRetcode::DonePartial
        )
    }
}

impl From<TradeRetcode> for i32 {
    fn from(value: TradeRetcode) -> Self {
        if let TradeRetcode::Other(code) = value {
            return code;
        }
        RETCODES
            .iter()
            .find(|(retcode, _)| *retcode == value)
            .map_or(0, |(_, code)| *code)
    }
}

impl From<i32> for TradeRetcode {
    fn from(value: i32) -> Self {
        RETCODES
            .iter()
            .find(|(_, code)| *code == value)
            .map_or(TradeRetcode::Other(value), |(retcode, _)| *retcode)
    }
}

impl fmt::Display for TradeRetcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", i32::from(*self))
    }
}
