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

use crate::encounter::{Disposition, Placement, Stage};
use crate::reference_data::FACILITIES;

use super::{ExitEvent, SimulationEngine};

const LWBS_CTAS5_THRESHOLD: u32 = 180;
const LWBS_CTAS4_THRESHOLD: u32 = 240;
const LWBS_CTAS3_THRESHOLD: u32 = 600;

impl SimulationEngine {
    /// Per-facility per-tick quota: `(md_count * productivity_factor) / 60`,
    /// taken as floor(quota) plus a Bernoulli draw on the fractional part.
    /// The same number also serves as the discharge gate probability in
    /// TREATING/BOARDING.
    pub(super) fn compute_discharge_rates(&self) -> HashMap<&'static str, f64> {
        FACILITIES
            .iter()
            .map(|f| {
                let staffing = f.staffing_for_hour(self.sim_hour);
                let rate = (staffing.md_count as f64 * self.config.productivity_factor) / 60.0;
                (f.id, rate)
            })
            .collect()
    }

    pub(super) fn run_pipeline(&mut self, discharge_rate: &HashMap<&'static str, f64>) {
        let mut exits: Vec<ExitEvent> = Vec::new();
        let mut to_remove: Vec<Uuid> = Vec::new();
        let current_tick = self.current_tick;
        let sim_hour = self.sim_hour;
        let productivity_factor = self.config.productivity_factor;
        let rng = &mut self.rng;

        for (id, encounter) in self.active.iter_mut() {
            match encounter.placement {
                Placement::Roomed(_) | Placement::AdmittedNoBed => match encounter.stage {
                    Stage::Triage => encounter.stage = Stage::Assessing,
                    Stage::Assessing => {
                        if rng.bernoulli(1.0 / 15.0) {
                            if encounter.assigned_ctas.value() <= 3 {
                                encounter.stage = Stage::Testing;
                                let base_lab = if sim_hour < 8 { 90.0 } else { 45.0 };
                                encounter.lab_timer = (base_lab / productivity_factor).floor() as i32;
                            } else {
                                encounter.stage = Stage::Treating;
                            }
                        }
                    }
                    Stage::Testing => {
                        if encounter.assigned_ctas.value() > 1 && rng.bernoulli(0.8) {
                            encounter.placement = Placement::WaitingForResults;
                        } else {
                            encounter.lab_timer -= 1;
                            if encounter.lab_timer <= 0 {
                                encounter.stage = if encounter.disposition == Some(Disposition::Admit) {
                                    Stage::Boarding
                                } else {
                                    Stage::Treating
                                };
                            }
                        }
                    }
                    Stage::Boarding => {
                        encounter.treatment_time_remaining -= 1;
                        if encounter.treatment_time_remaining <= 0 {
                            let rate = discharge_rate.get(encounter.facility_id).copied().unwrap_or(0.0);
                            if rng.bernoulli(rate) {
                                exits.push(ExitEvent {
                                    encounter_id: *id,
                                    facility_id: encounter.facility_id,
                                    assigned_ctas: encounter.assigned_ctas,
                                    status: "DISCHARGED",
                                    destination: "WARD",
                                    disposition: "ADMIT",
                                    ttl: 50,
                                    los_ticks: Some(current_tick.saturating_sub(encounter.arrival_tick)),
                                });
                                encounter.placement = Placement::Discharged;
                            }
                        }
                    }
                    Stage::Treating => {
                        encounter.treatment_time_remaining -= 1;
                        if encounter.treatment_time_remaining <= 0 {
                            let rate = discharge_rate.get(encounter.facility_id).copied().unwrap_or(0.0);
                            if rng.bernoulli(rate) {
                                exits.push(ExitEvent {
                                    encounter_id: *id,
                                    facility_id: encounter.facility_id,
                                    assigned_ctas: encounter.assigned_ctas,
                                    status: "DISCHARGED",
                                    destination: "HOME",
                                    disposition: "DISCHARGE",
                                    ttl: 50,
                                    los_ticks: Some(current_tick.saturating_sub(encounter.arrival_tick)),
                                });
                                encounter.placement = Placement::Discharged;
                            }
                        }
                    }
                },
                Placement::WaitingForResults => {
                    encounter.lab_timer -= 1;
                    // Eligibility for re-rooming is evaluated by the admission planner.
                }
                Placement::Waiting => {
                    encounter.wait_time_remaining += 1;
                    let ctas = encounter.assigned_ctas.value();
                    let waited = encounter.wait_time_remaining;
                    let should_leave = (ctas == 5 && waited > LWBS_CTAS5_THRESHOLD)
                        || (ctas == 4 && waited > LWBS_CTAS4_THRESHOLD)
                        || (ctas == 3 && waited > LWBS_CTAS3_THRESHOLD);
                    if should_leave {
                        exits.push(ExitEvent {
                            encounter_id: *id,
                            facility_id: encounter.facility_id,
                            assigned_ctas: encounter.assigned_ctas,
                            status: "LWBS",
                            destination: "EXIT",
                            disposition: "UNKNOWN",
                            ttl: 300,
                            los_ticks: None,
                        });
                        encounter.placement = Placement::Lwbs;
                    }
                }
                Placement::Lwbs | Placement::Discharged => {}
            }

            if !encounter.placement.is_active() {
                to_remove.push(*id);
            }
        }

        for id in to_remove {
            self.active.remove(&id);
        }
        for exit in exits {
            self.record_exit(exit);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Instant;

    use uuid::Uuid;

    use crate::config::EngineConfig;
    use crate::encounter::{Ctas, Disposition, Encounter, Placement, Stage};
    use crate::rng::RandomSource;

    use super::SimulationEngine;

    fn waiting_encounter(ctas: u8) -> Encounter {
        Encounter {
            id: Uuid::new_v4(),
            facility_id: "SBK",
            patient_age: 40,
            symptom: "Minor Laceration",
            clinical_notes: String::new(),
            arrival_tick: 0,
            arrival_wallclock: Instant::now(),
            assigned_ctas: Ctas::new(ctas),
            is_serious: false,
            placement: Placement::Waiting,
            stage: Stage::Triage,
            wait_time_remaining: 0,
            lab_timer: 0,
            treatment_time_remaining: 0,
            disposition: None,
        }
    }

    fn engine_with(encounter: Encounter) -> (SimulationEngine, Uuid) {
        let mut engine = SimulationEngine::new(EngineConfig::default(), RandomSource::seeded(7));
        let id = encounter.id;
        engine.active.insert(id, encounter);
        (engine, id)
    }

    #[test]
    fn ctas5_leaves_without_being_seen_exactly_at_tick_181() {
        let (mut engine, id) = engine_with(waiting_encounter(5));
        for _ in 0..180 {
            engine.run_pipeline(&HashMap::new());
            assert!(engine.active.contains_key(&id), "should still be waiting before threshold");
        }
        engine.run_pipeline(&HashMap::new());
        assert!(!engine.active.contains_key(&id));
        assert_eq!(engine.lwbs_count, 1);
    }

    #[test]
    fn ctas4_threshold_is_240_ticks() {
        let (mut engine, id) = engine_with(waiting_encounter(4));
        for _ in 0..240 {
            engine.run_pipeline(&HashMap::new());
        }
        assert!(engine.active.contains_key(&id));
        engine.run_pipeline(&HashMap::new());
        assert!(!engine.active.contains_key(&id));
    }

    #[test]
    fn ctas3_threshold_is_600_ticks() {
        let (mut engine, id) = engine_with(waiting_encounter(3));
        for _ in 0..600 {
            engine.run_pipeline(&HashMap::new());
        }
        assert!(engine.active.contains_key(&id));
        engine.run_pipeline(&HashMap::new());
        assert!(!engine.active.contains_key(&id));
    }

    #[test]
    fn ctas1_and_ctas2_never_leave_without_being_seen() {
        for ctas in [1u8, 2u8] {
            let (mut engine, id) = engine_with(waiting_encounter(ctas));
            for _ in 0..2000 {
                engine.run_pipeline(&HashMap::new());
            }
            assert!(engine.active.contains_key(&id), "CTAS {ctas} should never LWBS");
        }
    }

    #[test]
    fn treating_patient_discharges_once_timer_expires_and_rate_guarantees_it() {
        let mut encounter = waiting_encounter(4);
        encounter.placement = Placement::Roomed(crate::encounter::RoomResource::Chair);
        encounter.stage = Stage::Treating;
        encounter.treatment_time_remaining = 1;
        encounter.disposition = Some(Disposition::Discharge);
        let (mut engine, id) = engine_with(encounter);

        let mut rate = HashMap::new();
        rate.insert("SBK", 1.0);
        engine.run_pipeline(&rate);

        assert!(!engine.active.contains_key(&id));
    }

    #[test]
    fn boarding_patient_with_zero_discharge_rate_never_exits() {
        let mut encounter = waiting_encounter(2);
        encounter.placement = Placement::AdmittedNoBed;
        encounter.stage = Stage::Boarding;
        encounter.treatment_time_remaining = 1;
        encounter.disposition = Some(Disposition::Admit);
        let (mut engine, id) = engine_with(encounter);

        let mut rate = HashMap::new();
        rate.insert("SBK", 0.0);
        for _ in 0..50 {
            engine.run_pipeline(&rate);
        }

        assert!(engine.active.contains_key(&id));
    }

    #[test]
    fn compute_discharge_rates_covers_every_facility() {
        let engine = SimulationEngine::new(EngineConfig::default(), RandomSource::seeded(3));
        let rates = engine.compute_discharge_rates();
        assert_eq!(rates.len(), crate::reference_data::FACILITIES.len());
        assert!(rates.values().all(|r| *r >= 0.0));
    }
}
