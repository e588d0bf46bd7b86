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

use std::collections::HashMap;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use edflow_engine::VitalsSnapshot;
use serde::Serialize;

use crate::AppState;
use crate::error::BoundaryError;

use super::require_session_id;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    #[serde(flatten)]
    pub vitals: VitalsSnapshot,
    pub total_alerts: usize,
}

pub async fn status(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<StatusResponse>, BoundaryError> {
    let session_id = require_session_id(&params)?;
    let session = state.sessions.get_or_create(session_id);
    Ok(Json(StatusResponse { vitals: session.status(), total_alerts: session.total_alerts() }))
}
