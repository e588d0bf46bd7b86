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

pub mod alerts;
pub mod facilities;
pub mod health;
pub mod status;

use std::collections::HashMap;

use crate::error::BoundaryError;

/// Pulls `session_id` out of the raw query map, or fails the request at
/// the boundary before any session is touched.
pub fn require_session_id(params: &HashMap<String, String>) -> Result<&str, BoundaryError> {
    params.get("session_id").map(String::as_str).filter(|s| !s.is_empty()).ok_or(BoundaryError::MissingSessionId)
}
