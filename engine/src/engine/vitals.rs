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

use serde::Serialize;

use crate::encounter::Placement;
use crate::reference_data::FACILITIES;

use super::SimulationEngine;

const NEDOCS_THRESHOLDS: [f64; 5] = [0.2, 0.4, 0.6, 0.8, 1.0];

#[derive(Debug, Clone, Copy, Serialize)]
pub struct HistoryPoint {
    pub hour: u8,
    pub active: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PatientView {
    pub id: String,
    pub facility_id: &'static str,
    pub assigned_ctas: u8,
    pub status: &'static str,
    pub stage: Option<&'static str>,
    pub disposition: Option<&'static str>,
    pub resource_type: &'static str,
    pub ttl: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct VitalsSnapshot {
    pub census: HashMap<&'static str, usize>,
    pub processed: u64,
    pub lwbs: u64,
    pub sim_hour: u8,
    pub history: Vec<HistoryPoint>,
    pub nedocs: u8,
    pub hallway_patients: usize,
    pub avg_los: f64,
    pub patients: Vec<PatientView>,
}

impl SimulationEngine {
    /// An atomic snapshot of everything a caller can see. Cannot fail:
    /// every field is derivable from state the engine already holds.
    pub fn status(&self) -> VitalsSnapshot {
        let mut census: HashMap<&'static str, usize> = HashMap::new();
        let mut hallway_patients = 0usize;
        let mut patients = Vec::with_capacity(self.active.len() + self.recent_exits.len());

        for encounter in self.active.values() {
            if matches!(encounter.placement, Placement::Roomed(_) | Placement::AdmittedNoBed) {
                *census.entry(encounter.facility_id).or_insert(0) += 1;
            }
            if encounter.placement == Placement::AdmittedNoBed {
                hallway_patients += 1;
            }
            patients.push(PatientView {
                id: encounter.id.to_string(),
                facility_id: encounter.facility_id,
                assigned_ctas: encounter.assigned_ctas.value(),
                status: encounter.status_label(),
                stage: Some(stage_label(encounter.stage)),
                disposition: encounter.disposition.map(disposition_label),
                resource_type: resource_label(encounter.resource_kind()),
                ttl: -1,
            });
        }

        for exit in &self.recent_exits {
            patients.push(PatientView {
                id: exit.id.to_string(),
                facility_id: exit.facility_id,
                assigned_ctas: exit.assigned_ctas.value(),
                status: exit.status,
                stage: Some(exit.destination),
                disposition: Some(exit.disposition),
                resource_type: "NONE",
                ttl: exit.ttl,
            });
        }

        let total_capacity: u32 = FACILITIES.iter().map(|f| f.capacity).sum();
        let active_total = self.active.len();
        let occupancy_ratio = if total_capacity > 0 { active_total as f64 / total_capacity as f64 } else { 0.0 };
        let nedocs = nedocs_score(occupancy_ratio);

        let avg_los = if self.los_history.is_empty() {
            0.0
        } else {
            let sum: f64 = self.los_history.iter().sum();
            round_one_decimal(sum / self.los_history.len() as f64)
        };

        VitalsSnapshot {
            census,
            processed: self.total_processed,
            lwbs: self.lwbs_count,
            sim_hour: self.sim_hour,
            history: self.history.iter().copied().collect(),
            nedocs,
            hallway_patients,
            avg_los,
            patients,
        }
    }
}

fn nedocs_score(occupancy_ratio: f64) -> u8 {
    for (bucket, threshold) in NEDOCS_THRESHOLDS.iter().enumerate() {
        if occupancy_ratio < *threshold {
            return bucket as u8 + 1;
        }
    }
    6
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn stage_label(stage: crate::encounter::Stage) -> &'static str {
    use crate::encounter::Stage::*;
    match stage {
        Triage => "TRIAGE",
        Assessing => "ASSESSING",
        Testing => "TESTING",
        Treating => "TREATING",
        Boarding => "BOARDING",
    }
}

fn disposition_label(disposition: crate::encounter::Disposition) -> &'static str {
    use crate::encounter::Disposition::*;
    match disposition {
        Admit => "ADMIT",
        Discharge => "DISCHARGE",
    }
}

fn resource_label(kind: crate::encounter::ResourceKind) -> &'static str {
    use crate::encounter::ResourceKind::*;
    match kind {
        None => "NONE",
        Bed => "BED",
        Chair => "CHAIR",
        Hallway => "HALLWAY",
    }
}
