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

use std::time::Instant;

use serde::Serialize;
use uuid::Uuid;

/// Canadian Triage and Acuity Scale: 1 (resuscitation) to 5 (non-urgent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Ctas(u8);

impl Ctas {
    pub fn new(level: u8) -> Self {
        assert!((1..=5).contains(&level), "CTAS level out of range: {level}");
        Ctas(level)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for Ctas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The resource a roomed patient actually occupies. `Hallway` only ever
/// backs [`Placement::AdmittedNoBed`]; it can't be paired with `Roomed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RoomResource {
    Bed,
    Chair,
}

/// What a caller sees as the encounter's `resource_type`. Unlike
/// [`RoomResource`] this includes the `None`/`Hallway` cases so the whole
/// domain can be serialized without a second enum walking alongside status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResourceKind {
    None,
    Bed,
    Chair,
    Hallway,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Stage {
    Triage,
    Assessing,
    Testing,
    Treating,
    Boarding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Disposition {
    Admit,
    Discharge,
}

/// `status` and `resource_type` in the distilled model are not independent:
/// every legal combination is enumerated here so an illegal pairing (e.g.
/// WAITING with a BED attached) cannot be constructed in the first place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Waiting,
    Roomed(RoomResource),
    WaitingForResults,
    AdmittedNoBed,
    Lwbs,
    Discharged,
}

impl Placement {
    pub fn status_label(self) -> &'static str {
        match self {
            Placement::Waiting => "WAITING",
            Placement::Roomed(_) => "ROOMED",
            Placement::WaitingForResults => "WAITING_FOR_RESULTS",
            Placement::AdmittedNoBed => "ADMITTED_NO_BED",
            Placement::Lwbs => "LWBS",
            Placement::Discharged => "DISCHARGED",
        }
    }

    pub fn resource_kind(self) -> ResourceKind {
        match self {
            Placement::Roomed(RoomResource::Bed) => ResourceKind::Bed,
            Placement::Roomed(RoomResource::Chair) => ResourceKind::Chair,
            Placement::AdmittedNoBed => ResourceKind::Hallway,
            _ => ResourceKind::None,
        }
    }

    pub fn is_active(self) -> bool {
        !matches!(self, Placement::Lwbs | Placement::Discharged)
    }
}

/// A single patient's clinical encounter, from arrival to exit.
#[derive(Debug, Clone)]
pub struct Encounter {
    pub id: Uuid,
    pub facility_id: &'static str,
    pub patient_age: u8,
    pub symptom: &'static str,
    pub clinical_notes: String,
    pub arrival_tick: u64,
    /// Kept for data-model fidelity and the outbreak detector's sliding
    /// window; length-of-stay is computed from `arrival_tick` deltas, not
    /// from this, to avoid mixing wallclock and simulated time.
    pub arrival_wallclock: Instant,

    pub assigned_ctas: Ctas,
    pub is_serious: bool,

    pub placement: Placement,
    pub stage: Stage,

    pub wait_time_remaining: u32,
    pub lab_timer: i32,
    pub treatment_time_remaining: i32,

    pub disposition: Option<Disposition>,
}

impl Encounter {
    pub fn status_label(&self) -> &'static str {
        self.placement.status_label()
    }

    pub fn resource_kind(&self) -> ResourceKind {
        self.placement.resource_kind()
    }
}
