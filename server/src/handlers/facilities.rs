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
use edflow_engine::reference_data::{Facility, FACILITIES};
use serde::Serialize;

use crate::AppState;
use crate::error::BoundaryError;

use super::require_session_id;

#[derive(Debug, Serialize)]
pub struct FacilityView {
    #[serde(flatten)]
    pub facility: &'static Facility,
    pub current_census: usize,
}

#[derive(Debug, Serialize)]
pub struct FacilitiesResponse {
    pub facilities: Vec<FacilityView>,
}

pub async fn facilities(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<FacilitiesResponse>, BoundaryError> {
    let session_id = require_session_id(&params)?;
    let session = state.sessions.get_or_create(session_id);
    let vitals = session.status();

    let facilities = FACILITIES
        .iter()
        .map(|facility| FacilityView { facility, current_census: vitals.census.get(facility.id).copied().unwrap_or(0) })
        .collect();

    Ok(Json(FacilitiesResponse { facilities }))
}
