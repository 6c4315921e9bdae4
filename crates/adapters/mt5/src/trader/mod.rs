//! Order helpers on top of the terminal: opening, closing and adjusting positions.

pub mod client;
pub mod gateway;
pub mod request;
pub mod selector;

pub use client::Mt5Trader;
pub use gateway::Mt5Gateway;
pub use request::{OrderOptions, StopOffsets};
pub use selector::PositionSelector;
