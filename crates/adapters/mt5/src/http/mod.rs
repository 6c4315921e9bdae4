//! HTTP client for the MetaTrader 5 proxy.
//!
//! This module provides the transport to the terminal: request bodies, the
//! response envelope, error mapping and the typed client.

pub mod client;
pub mod error;
pub mod models;
pub mod query;

pub use client::{Mt5HttpClient, Mt5HttpInnerClient};
pub use error::*;
pub use models::*;
pub use query::*;
