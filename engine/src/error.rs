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

/// Faults that can abort a single tick. The driver logs these against the
/// owning session id and moves on; state from transitions already applied
/// this tick is kept as-is.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("facility {facility_id} over capacity: {resource} occupied {occupied} > limit {limit}")]
    CapacityExceeded { facility_id: String, resource: &'static str, occupied: usize, limit: usize },
}
