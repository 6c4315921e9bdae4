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

//! Prints the open positions and running profit of an MT5 account.
//!
//! Connection settings come from the environment (or a `.env` file):
//! `MT5_BASE_URL`, `MT5_LOGIN`, `MT5_PASSWORD`, `MT5_SERVER`.

use anyhow::Context;
use mt5_trader::{
    config::{credential_from_env, Mt5Config, Mt5TraderConfig},
    Mt5HttpClient, Mt5Trader,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Mt5Config::from_env();
    let credential = credential_from_env()?;
    info!("Connecting to MT5 proxy at {}", config.base_url);

    let client = Mt5HttpClient::from_config(config, credential.clone())
        .context("failed to build HTTP client")?;
    let trader = Mt5Trader::new(client, Mt5TraderConfig::from_env());

    trader.initialize().await?;
    trader.connect(credential).await?;

    let positions = trader.get_open_positions().await?;
    for position in &positions {
        let opened = position
            .opened_at()
            .map(|t| t.to_rfc3339())
            .unwrap_or_default();
        println!(
            "#{:<10} {:<10} {:?} {:>6} @ {:<10} sl={:<10} tp={:<10} profit={:>10.2} {}",
            position.ticket,
            position.symbol,
            position.position_type,
            position.volume,
            position.price_open,
            position.sl,
            position.tp,
            position.profit,
            opened,
        );
    }

    println!("Running profit: {:.2}", trader.running_profit().await?);
    Ok(())
}
