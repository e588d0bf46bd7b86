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

//! HTTP boundary for the emergency department simulator: a thin axum
//! router over a [`SessionManager`], with a single background driver
//! ticking every known session.

pub mod driver;
pub mod error;
pub mod handlers;
pub mod settings;

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::routing::get;
use edflow_engine::{EngineConfig, SessionManager};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use settings::Settings;

/// Application state shared across handlers.
pub struct AppState {
    pub sessions: Arc<SessionManager>,
    pub start_time: Instant,
}

pub fn build_app(settings: &Settings) -> (Arc<AppState>, Router) {
    let config = EngineConfig { productivity_factor: settings.productivity_factor };
    let state = Arc::new(AppState { sessions: Arc::new(SessionManager::new(config)), start_time: Instant::now() });

    let app = Router::new()
        .route("/status", get(handlers::status::status))
        .route("/alerts", get(handlers::alerts::alerts))
        .route("/facilities", get(handlers::facilities::facilities))
        .route("/health", get(handlers::health::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state.clone());

    (state, app)
}
