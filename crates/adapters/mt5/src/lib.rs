//! Order helpers for the MetaTrader 5 terminal, reached through the MT5 HTTP proxy.
//!
//! The crate builds `order_send` requests for market and limit orders, full and
//! partial closes, stop-loss / take-profit changes and break-even moves. The
//! terminal behind the proxy owns the session, prices and positions.
//!
//! ```no_run
//! use mt5_trader::{config::Mt5TraderConfig, Mt5HttpClient, Mt5Trader, OrderOptions, StopOffsets};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let credential = mt5_trader::config::credential_from_env()?;
//! let client = Mt5HttpClient::from_config(Default::default(), credential.clone())?;
//! let trader = Mt5Trader::new(client, Mt5TraderConfig::default());
//!
//! trader.initialize().await?;
//! trader.connect(credential).await?;
//! trader.open_buy("EURUSD", 0.1, StopOffsets::none().with_stop_loss(200.0)).await?;
//! let tagged = OrderOptions::new(StopOffsets::none()).with_magic(7).with_comment("hedge");
//! trader.open_sell("GBPUSD", 0.2, tagged).await?;
//! trader.break_even("EURUSD").await?;
//! # Ok(())
//! # }
//! ```

pub mod common;
pub mod config;
pub mod error;
pub mod http;
pub mod trader;

pub use common::{
    credential::Mt5Credential,
    enums::{OrderFilling, OrderTimeType, Side, TradeRetcode},
    models::{OrderSendResult, Position},
};
pub use error::{Mt5Error, Mt5Result};
pub use http::{Mt5HttpClient, Mt5HttpError};
pub use trader::{Mt5Gateway, Mt5Trader, OrderOptions, PositionSelector, StopOffsets};
