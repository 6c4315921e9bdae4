//! Selection of the open positions an operation applies to.

use std::fmt;

use crate::http::query::PositionsGetParams;

/// A single position by ticket, or every position on a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PositionSelector {
    Ticket(u64),
    Symbol(String),
}

impl PositionSelector {
    pub fn params(&self) -> PositionsGetParams {
        match self {
            PositionSelector::Ticket(ticket) => PositionsGetParams::by_ticket(*ticket),
            PositionSelector::Symbol(symbol) => PositionsGetParams::by_symbol(symbol.clone()),
        }
    }

    pub fn symbol(&self) -> Option<&str> {
        match self {
            PositionSelector::Ticket(_) => None,
            PositionSelector::Symbol(symbol) => Some(symbol),
        }
    }
}

impl fmt::Display for PositionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionSelector::Ticket(ticket) => write!(f, "#{ticket}"),
            PositionSelector::Symbol(symbol) => write!(f, "{symbol}"),
        }
    }
}

impl From<u64> for PositionSelector {
    fn from(ticket: u64) -> Self {
        PositionSelector::Ticket(ticket)
    }
}

impl From<&str> for PositionSelector {
    fn from(symbol: &str) -> Self {
        PositionSelector::Symbol(symbol.to_string())
    }
}

impl From<String> for PositionSelector {
    fn from(symbol: String) -> Self {
        PositionSelector::Symbol(symbol)
    }
}
