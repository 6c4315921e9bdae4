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

//! Error types for the MT5 trader.

use std::fmt::Debug;

use thiserror::Error;

use crate::common::{enums::TradeRetcode, models::OrderSendResult};

#[derive(Error, Debug)]
pub enum Mt5Error {
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Connection timeout")]
    TimeoutError,

    #[error("Rate limit exceeded")]
    RateLimitError,

    #[error("Terminal initialization failed: {0}")]
    InitializeFailed(String),

    #[error("Login to account {login} failed: {reason}")]
    LoginFailed { login: String, reason: String },

    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("Symbol could not be selected in Market Watch: {0}")]
    SymbolSelectFailed(String),

    #[error("No tick available for {0}")]
    NoTick(String),

    #[error("No positions on {0}")]
    NoPositions(String),

    #[error("Invalid volume: {0}")]
    InvalidVolume(String),

    #[error("Order rejected, retcode={retcode}: {comment}")]
    OrderRejected {
        retcode: TradeRetcode,
        comment: String,
    },

    #[error("order_send returned no result: {0}")]
    OrderSendFailed(String),

    /// A multi-position operation stopped after some orders went through.
    #[error("Stopped after {} applied order(s): {source}", .done.len())]
    PartiallyApplied {
        done: Vec<OrderSendResult>,
        source: Box<Mt5Error>,
    },
}

impl Mt5Error {
    /// Returns the terminal retcode when the error is an order rejection.
    pub fn retcode(&self) -> Option<TradeRetcode> {
        match self {
            Mt5Error::OrderRejected { retcode, .. } => Some(*retcode),
            Mt5Error::PartiallyApplied { source, .. } => source.retcode(),
            _ => None,
        }
    }

    /// Orders that reached the account before the operation failed.
    pub fn applied(&self) -> &[OrderSendResult] {
        match self {
            Mt5Error::PartiallyApplied { done, .. } => done,
            _ => &[],
        }
    }

    /// Wraps `self` with the results already applied, if there are any.
    pub(crate) fn after(self, done: Vec<OrderSendResult>) -> Self {
        if done.is_empty() {
            return self;
        }
        Mt5Error::PartiallyApplied {
            done,
            source: Box::new(self),
        }
    }
}

pub type Mt5Result<T> = Result<T, Mt5Error>;
