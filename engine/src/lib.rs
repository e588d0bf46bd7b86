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

//! Discrete-event emergency department patient flow simulator and
//! clinical intelligence auditor. One tick advances the whole system by
//! one simulated minute: arrivals, stage transitions, admission, and the
//! rule-based auditor all run in that order. See [`session`] for how
//! multiple independent simulations are kept and driven concurrently.

pub mod alert;
pub mod config;
pub mod encounter;
pub mod engine;
pub mod error;
pub mod intel;
pub mod reference_data;
pub mod rng;
pub mod session;

pub use config::EngineConfig;
pub use engine::{HistoryPoint, PatientView, SimulationEngine, VitalsSnapshot};
pub use error::EngineError;
pub use rng::RandomSource;
pub use session::{Session, SessionManager};
