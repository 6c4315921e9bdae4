//! Request bodies for the MetaTrader 5 proxy routes.
//!
//! Field names are the keyword arguments of the matching terminal function.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LoginParams {
    pub login: u64,
    pub password: String,
    pub server: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SymbolParams {
    pub symbol: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SymbolSelectParams {
    pub symbol: String,
    pub enable: bool,
}

/// Filter for `positions_get`. An empty filter returns every open position.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, Builder)]
#[builder(setter(into, strip_option), default)]
pub struct PositionsGetParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket: Option<u64>,
}

impl PositionsGetParams {
    pub fn by_ticket(ticket: u64) -> Self {
        Self {
            ticket: Some(ticket),
            ..Self::default()
        }
    }

    pub fn by_symbol(symbol: impl Into<String>) -> Self {
        Self {
            symbol: Some(symbol.into()),
            ..Self::default()
        }
    }
}
