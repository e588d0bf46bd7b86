/*
 * EDFlow
 * Copyright (c) 2026 EDFlow Contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program.  If not, see <http://www.gnu.org/licenses/>.
 *
 */

use clap::Parser;
use edflow_server::settings::Settings;
use edflow_server::{build_app, driver};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(settings.log.clone())))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(tick_ms = settings.tick_ms, productivity_factor = settings.productivity_factor, "starting edflow-server");

    let (state, app) = build_app(&settings);
    driver::spawn(state.sessions.clone(), settings.tick_ms);

    let listener = tokio::net::TcpListener::bind(settings.bind_address()).await?;
    tracing::info!(address = %settings.bind_address(), "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
