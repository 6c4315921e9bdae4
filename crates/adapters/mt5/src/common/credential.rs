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

//! Credentials for a MetaTrader 5 trade account.
//!
//! The proxy logs the terminal into the account and may hand back a session
//! token, which is then sent with every request.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// MT5 trade account credentials.
#[derive(Clone, Serialize, Deserialize, Builder)]
#[builder(setter(into))]
pub struct Mt5Credential {
    /// Trade account number.
    pub login: String,
    pub password: String,
    /// Trade server name, e.g. `MetaQuotes-Demo`.
    pub server: String,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
    /// Session token issued by the proxy after login.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Mt5Credential {
    pub fn builder() -> Mt5CredentialBuilder {
        Mt5CredentialBuilder::default()
    }

    /// Numeric form of the login, as the terminal expects it.
    pub fn login_number(&self) -> Option<u64> {
        self.login.trim().parse().ok()
    }
}

impl std::fmt::Debug for Mt5Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mt5Credential")
            .field("login", &self.login)
            .field("password", &"***")
            .field("server", &self.server)
            .field("proxy", &self.proxy)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .finish()
    }
}
