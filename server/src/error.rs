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

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Errors that can occur at the HTTP boundary, before a request ever
/// reaches a session's engine.
#[derive(Debug, thiserror::Error)]
pub enum BoundaryError {
    #[error("missing required query parameter: session_id")]
    MissingSessionId,
}

impl IntoResponse for BoundaryError {
    fn into_response(self) -> Response {
        let status = match self {
            BoundaryError::MissingSessionId => StatusCode::UNPROCESSABLE_ENTITY,
        };
        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}
