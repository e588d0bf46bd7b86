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

use uuid::Uuid;

use crate::encounter::{Disposition, Encounter, Placement, RoomResource, Stage};
use crate::reference_data::FACILITIES;
use crate::rng::RandomSource;

use super::{Census, SimulationEngine};

impl SimulationEngine {
    pub(super) fn run_admission(&mut self, discharge_rate: &HashMap<&'static str, f64>) {
        for facility in FACILITIES {
            let mut census = self.facility_census(facility.id);
            let rate = discharge_rate.get(facility.id).copied().unwrap_or(0.0);
            let quota = self.admit_quota(rate);
            let mut admitted = 0u32;

            self.run_results_ready_pass(facility.id, facility.physical_beds, facility.chair_capacity, facility.surge_capacity, quota, &mut admitted, &mut census);
            self.run_waiting_queue_pass(facility.id, facility.physical_beds, facility.chair_capacity, facility.surge_capacity, quota, &mut admitted, &mut census);
        }
    }

    fn admit_quota(&mut self, rate: f64) -> u32 {
        let whole = rate.floor();
        let fraction = rate - whole;
        whole as u32 + if self.rng.bernoulli(fraction) { 1 } else { 0 }
    }

    /// Pass A: patients whose lab results are back (`lab_timer <= 0`) need a
    /// spot before they can be discharged or boarded. Iteration order over
    /// this set is unspecified by the model; a stable id order is used here.
    fn run_results_ready_pass(
        &mut self,
        facility_id: &'static str,
        physical_beds: u32,
        chair_capacity: u32,
        surge_capacity: u32,
        quota: u32,
        admitted: &mut u32,
        census: &mut Census,
    ) {
        let mut ready: Vec<Uuid> = self
            .active
            .iter()
            .filter(|(_, e)| e.facility_id == facility_id && e.placement == Placement::WaitingForResults && e.lab_timer <= 0)
            .map(|(id, _)| *id)
            .collect();
        ready.sort();

        for id in ready {
            if *admitted >= quota {
                break;
            }
            let ctas = self.active.get(&id).expect("id from live scan").assigned_ctas.value();
            let resource = if matches!(ctas, 2 | 3 | 4 | 5) && census.chair < chair_capacity {
                Some(RoomResource::Chair)
            } else if census.bed < physical_beds {
                Some(RoomResource::Bed)
            } else {
                None
            };

            let encounter = self.active.get_mut(&id).expect("id from live scan");
            if let Some(resource) = resource {
                encounter.placement = Placement::Roomed(resource);
                match resource {
                    RoomResource::Chair => census.chair += 1,
                    RoomResource::Bed => census.bed += 1,
                }
                census.total += 1;
            } else if census.total < surge_capacity {
                encounter.placement = Placement::AdmittedNoBed;
                census.total += 1;
            } else {
                continue;
            }
            encounter.stage = if encounter.disposition == Some(Disposition::Admit) { Stage::Boarding } else { Stage::Treating };
            *admitted += 1;
        }
    }

    /// Pass B: the waiting room, strictly ordered by (CTAS, arrival tick) so
    /// sicker and longer-waiting patients are never skipped over.
    fn run_waiting_queue_pass(
        &mut self,
        facility_id: &'static str,
        physical_beds: u32,
        chair_capacity: u32,
        surge_capacity: u32,
        quota: u32,
        admitted: &mut u32,
        census: &mut Census,
    ) {
        let mut waiting: Vec<Uuid> = self
            .active
            .iter()
            .filter(|(_, e)| e.facility_id == facility_id && e.placement == Placement::Waiting)
            .map(|(id, _)| *id)
            .collect();
        waiting.sort_by_key(|id| {
            let e = &self.active[id];
            (e.assigned_ctas.value(), e.arrival_tick)
        });

        let sim_hour = self.sim_hour;
        let productivity_factor = self.config.productivity_factor;

        for id in waiting {
            if *admitted >= quota {
                break;
            }
            let ctas = self.active[&id].assigned_ctas.value();
            let placement = decide_placement(ctas, physical_beds, chair_capacity, surge_capacity, census);
            let Some(placement) = placement else { continue };

            match placement {
                Placement::Roomed(RoomResource::Bed) => census.bed += 1,
                Placement::Roomed(RoomResource::Chair) => census.chair += 1,
                Placement::AdmittedNoBed => {}
                _ => unreachable!("decide_placement only returns roomed/hallway variants"),
            }
            census.total += 1;

            let encounter = self.active.get_mut(&id).expect("id from live scan");
            encounter.placement = placement;
            init_patient_flow(encounter, sim_hour, productivity_factor, &mut self.rng);
            *admitted += 1;
        }
    }
}

fn decide_placement(ctas: u8, physical_beds: u32, chair_capacity: u32, surge_capacity: u32, census: &Census) -> Option<Placement> {
    match ctas {
        1 => {
            if census.bed < physical_beds {
                Some(Placement::Roomed(RoomResource::Bed))
            } else if census.total < surge_capacity {
                Some(Placement::AdmittedNoBed)
            } else {
                None
            }
        }
        2 => {
            if census.chair < chair_capacity {
                Some(Placement::Roomed(RoomResource::Chair))
            } else if census.bed < physical_beds {
                Some(Placement::Roomed(RoomResource::Bed))
            } else if census.total < surge_capacity {
                Some(Placement::AdmittedNoBed)
            } else {
                None
            }
        }
        _ => {
            if census.chair < chair_capacity {
                Some(Placement::Roomed(RoomResource::Chair))
            } else if census.bed < physical_beds {
                Some(Placement::Roomed(RoomResource::Bed))
            } else if census.total < surge_capacity {
                Some(Placement::AdmittedNoBed)
            } else {
                None
            }
        }
    }
}

/// Sets the clinical timers for a patient's first rooming: stage, lab
/// timer, and the disposition/treatment-time draw scaled by the
/// productivity factor.
fn init_patient_flow(encounter: &mut Encounter, sim_hour: u8, productivity_factor: f64, rng: &mut RandomSource) {
    encounter.stage = Stage::Assessing;
    let base_lab = if sim_hour < 8 { 90.0 } else { 45.0 };
    encounter.lab_timer = (base_lab / productivity_factor).floor() as i32;

    if rng.bernoulli(0.15) {
        encounter.disposition = Some(Disposition::Admit);
        let base_treat = rng.uniform_int(1440, 2880) as f64;
        encounter.treatment_time_remaining = (base_treat / productivity_factor).floor() as i32;
    } else {
        encounter.disposition = Some(Disposition::Discharge);
        let base_treat = match encounter.assigned_ctas.value() {
            1 | 2 => rng.uniform_int(240, 480),
            3 => rng.uniform_int(180, 360),
            _ => rng.uniform_int(60, 180),
        } as f64;
        encounter.treatment_time_remaining = (base_treat / productivity_factor).floor() as i32;
    }
}
