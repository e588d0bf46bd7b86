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

use rand::Rng;
use uuid::Uuid;

use crate::alert::RiskLevel;
use crate::encounter::{Ctas, Encounter, Placement, Stage};
use crate::reference_data::{Facility, CLINICAL_RULES, FACILITIES};

use super::SimulationEngine;

const BASE_ARRIVAL_RATE: f64 = 0.25;
const MISTRIAGE_PROBABILITY: f64 = 0.2;

/// Diurnal arrival-rate multiplier: quiet overnight, busiest in the day.
fn hourly_multiplier(hour: u8) -> f64 {
    match hour {
        0..=7 => 0.20,
        8..=19 => 1.50,
        _ => 1.00,
    }
}

fn diversion_factor(waiting_queue_len: usize, physical_beds: u32) -> f64 {
    if waiting_queue_len as u32 > physical_beds * 3 {
        0.10
    } else {
        1.0
    }
}

impl SimulationEngine {
    pub(super) fn run_arrivals(&mut self) {
        let base_prob = BASE_ARRIVAL_RATE * hourly_multiplier(self.sim_hour);
        for facility in FACILITIES {
            let queue_len = self.waiting_queue_len(facility.id);
            let prob = base_prob * diversion_factor(queue_len, facility.physical_beds);
            if self.rng.bernoulli(prob) {
                self.spawn_arrival(facility);
            }
        }
    }

    fn waiting_queue_len(&self, facility_id: &str) -> usize {
        self.active.values().filter(|e| e.facility_id == facility_id && e.placement == Placement::Waiting).count()
    }

    fn spawn_arrival(&mut self, facility: &'static Facility) {
        let rule_idx = self.rng.get().gen_range(0..CLINICAL_RULES.len());
        let rule = &CLINICAL_RULES[rule_idx];

        let mut assigned_ctas = Ctas::new(rule.required_ctas);
        let mut is_serious = matches!(rule.risk_level, RiskLevel::High | RiskLevel::Critical);
        let mut notes = format!("Patient presents with {}.", rule.symptom);

        if self.rng.bernoulli(MISTRIAGE_PROBABILITY) {
            if self.rng.bernoulli(0.5) {
                let alternatives: Vec<u8> = (1..=5).filter(|c| *c != rule.required_ctas).collect();
                let pick = alternatives[self.rng.get().gen_range(0..alternatives.len())];
                assigned_ctas = Ctas::new(pick);
            } else {
                is_serious = false;
                notes.push_str(" slightly concerned about hospitalization.");
            }
        }

        let encounter = Encounter {
            id: Uuid::new_v4(),
            facility_id: facility.id,
            patient_age: self.rng.uniform_int(18, 90) as u8,
            symptom: rule.symptom,
            clinical_notes: notes,
            arrival_tick: self.current_tick,
            arrival_wallclock: Instant::now(),
            assigned_ctas,
            is_serious,
            placement: Placement::Waiting,
            stage: Stage::Triage,
            wait_time_remaining: 0,
            lab_timer: 0,
            treatment_time_remaining: 0,
            disposition: None,
        };

        self.total_processed += 1;
        tracing::info!(facility = facility.id, symptom = encounter.symptom, ctas = encounter.assigned_ctas.value(), "patient arrived");

        if let Some(alert) = self.auditor.audit(&encounter, encounter.arrival_wallclock) {
            tracing::warn!(rule = alert.rule_violated, severity = ?alert.severity, "intelligence alert raised");
            self.alerts.push(alert);
        }

        self.active.insert(encounter.id, encounter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::rng::RandomSource;

    #[test]
    fn hourly_multiplier_is_quiet_overnight_and_busy_in_the_day() {
        assert_eq!(hourly_multiplier(3), 0.20);
        assert_eq!(hourly_multiplier(14), 1.50);
        assert_eq!(hourly_multiplier(21), 1.00);
    }

    #[test]
    fn diversion_factor_kicks_in_past_three_times_physical_beds() {
        assert_eq!(diversion_factor(100, 45), 1.0);
        assert_eq!(diversion_factor(135, 45), 1.0);
        assert_eq!(diversion_factor(136, 45), 0.10);
    }

    #[test]
    fn diversion_is_per_facility_and_does_not_affect_other_facilities() {
        // A facility under pressure is diverted; one of equal size that is not is untouched.
        assert_eq!(diversion_factor(136, 45), 0.10);
        assert_eq!(diversion_factor(10, 45), 1.0);
    }

    #[test]
    fn spawn_arrival_increments_total_processed_and_queues_the_patient() {
        let mut engine = SimulationEngine::new(EngineConfig::default(), RandomSource::seeded(1));
        let facility = &FACILITIES[0];
        engine.spawn_arrival(facility);
        assert_eq!(engine.total_processed, 1);
        assert_eq!(engine.active.len(), 1);
        let encounter = engine.active.values().next().unwrap();
        assert_eq!(encounter.placement, Placement::Waiting);
        assert_eq!(encounter.stage, Stage::Triage);
    }
}
