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

//! Audits each arriving encounter against the static rule base and a
//! sliding-window outbreak detector. At most one alert is emitted per
//! arrival; the three checks are tried in priority order and the first
//! match wins.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::alert::{Alert, RiskLevel};
use crate::encounter::Encounter;
use crate::reference_data::{rule_for_symptom, SAFETY_KEYWORDS};

const RESPIRATORY_SYMPTOM: &str = "Difficulty Breathing";
const RESPIRATORY_WINDOW: Duration = Duration::from_secs(6);
const RESPIRATORY_THRESHOLD: usize = 3;

pub struct IntelligenceAuditor {
    respiratory_arrivals: VecDeque<Instant>,
}

impl IntelligenceAuditor {
    pub fn new() -> Self {
        IntelligenceAuditor { respiratory_arrivals: VecDeque::new() }
    }

    /// `now` is the caller's wallclock reading for this arrival; injecting
    /// it (rather than calling `Instant::now()` here) keeps the window
    /// deterministically testable.
    pub fn audit(&mut self, encounter: &Encounter, now: Instant) -> Option<Alert> {
        if let Some(alert) = self.check_ctas_mismatch(encounter) {
            return Some(alert);
        }
        if let Some(alert) = self.check_safety_keyword(encounter) {
            return Some(alert);
        }
        self.check_respiratory_outbreak(encounter, now)
    }

    fn check_ctas_mismatch(&self, encounter: &Encounter) -> Option<Alert> {
        let rule = rule_for_symptom(encounter.symptom)?;
        if rule.required_ctas == encounter.assigned_ctas.value() {
            return None;
        }
        let short_id = short_id(encounter.id);
        Some(Alert {
            id: Uuid::new_v4(),
            encounter_id: encounter.id,
            rule_violated: rule.rule_id,
            severity: rule.risk_level,
            timestamp_tick: encounter.arrival_tick,
            explanation: format!(
                "Patient P-{short_id} ({}) assigned CTAS {}. Protocol requires CTAS {}.",
                encounter.symptom,
                encounter.assigned_ctas,
                rule.required_ctas
            ),
        })
    }

    fn check_safety_keyword(&self, encounter: &Encounter) -> Option<Alert> {
        if encounter.is_serious {
            return None;
        }
        let notes_lower = encounter.clinical_notes.to_lowercase();
        let found = SAFETY_KEYWORDS.iter().any(|kw| notes_lower.contains(kw));
        if !found {
            return None;
        }
        Some(Alert {
            id: Uuid::new_v4(),
            encounter_id: encounter.id,
            rule_violated: "R-SAFETY-01",
            severity: RiskLevel::Critical,
            timestamp_tick: encounter.arrival_tick,
            explanation: "Safety keyword detected in notes but is_serious is False.".to_string(),
        })
    }

    fn check_respiratory_outbreak(&mut self, encounter: &Encounter, now: Instant) -> Option<Alert> {
        if encounter.symptom == RESPIRATORY_SYMPTOM {
            self.respiratory_arrivals.push_back(now);
        }
        self.prune(now);

        if self.respiratory_arrivals.len() <= RESPIRATORY_THRESHOLD {
            return None;
        }
        Some(Alert {
            id: Uuid::new_v4(),
            encounter_id: encounter.id,
            rule_violated: "R-BIO-01",
            severity: RiskLevel::Critical,
            timestamp_tick: encounter.arrival_tick,
            explanation: "BIO_SIGNAL_DETECTED: >3 Respiratory Distress cases in <60 mins.".to_string(),
        })
    }

    fn prune(&mut self, now: Instant) {
        while let Some(&oldest) = self.respiratory_arrivals.front() {
            if now.duration_since(oldest) > RESPIRATORY_WINDOW {
                self.respiratory_arrivals.pop_front();
            } else {
                break;
            }
        }
    }
}

impl Default for IntelligenceAuditor {
    fn default() -> Self {
        Self::new()
    }
}

fn short_id(id: Uuid) -> String {
    let s = id.simple().to_string();
    s[s.len() - 4..].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encounter::{Ctas, Placement, Stage};

    fn base_encounter(symptom: &'static str, ctas: u8, is_serious: bool, notes: &str) -> Encounter {
        Encounter {
            id: Uuid::new_v4(),
            facility_id: "SBK",
            patient_age: 40,
            symptom,
            clinical_notes: notes.to_string(),
            arrival_tick: 0,
            arrival_wallclock: Instant::now(),
            assigned_ctas: Ctas::new(ctas),
            is_serious,
            placement: Placement::Waiting,
            stage: Stage::Triage,
            wait_time_remaining: 0,
            lab_timer: 0,
            treatment_time_remaining: 0,
            disposition: None,
        }
    }

    #[test]
    fn correct_triage_emits_no_alert() {
        let mut auditor = IntelligenceAuditor::new();
        let encounter = base_encounter("Minor Laceration", 4, false, "Patient presents with Minor Laceration.");
        assert!(auditor.audit(&encounter, Instant::now()).is_none());
    }

    #[test]
    fn ctas_mismatch_flags_high_severity() {
        let mut auditor = IntelligenceAuditor::new();
        let encounter = base_encounter("Chest Pain", 3, true, "Patient presents with Chest Pain.");
        let alert = auditor.audit(&encounter, Instant::now()).expect("alert expected");
        assert_eq!(alert.rule_violated, "RULE_001");
        assert_eq!(alert.severity, RiskLevel::High);
    }

    #[test]
    fn safety_keyword_contradiction_is_critical() {
        let mut auditor = IntelligenceAuditor::new();
        let encounter = base_encounter(
            "Minor Laceration",
            4,
            false,
            "Minor cut, slightly concerned about hospitalization.",
        );
        let alert = auditor.audit(&encounter, Instant::now()).expect("alert expected");
        assert_eq!(alert.rule_violated, "R-SAFETY-01");
        assert_eq!(alert.severity, RiskLevel::Critical);
    }

    #[test]
    fn ctas_mismatch_takes_priority_over_safety_keyword() {
        let mut auditor = IntelligenceAuditor::new();
        // Mismatched CTAS AND a safety keyword with is_serious=false: mismatch wins.
        let encounter = base_encounter(
            "Chest Pain",
            5,
            false,
            "Patient presents with Chest Pain. slightly concerned about hospitalization.",
        );
        let alert = auditor.audit(&encounter, Instant::now()).expect("alert expected");
        assert_eq!(alert.rule_violated, "RULE_001");
    }

    #[test]
    fn fourth_respiratory_arrival_in_window_triggers_outbreak_alert() {
        let mut auditor = IntelligenceAuditor::new();
        let base = Instant::now();
        for i in 0..3u64 {
            let encounter = base_encounter("Difficulty Breathing", 1, true, "Patient presents with Difficulty Breathing.");
            let alert = auditor.audit(&encounter, base + Duration::from_millis(i * 500));
            assert!(alert.is_none(), "unexpected alert on arrival {i}");
        }
        let fourth = base_encounter("Difficulty Breathing", 1, true, "Patient presents with Difficulty Breathing.");
        let alert = auditor.audit(&fourth, base + Duration::from_millis(1500)).expect("outbreak alert expected");
        assert_eq!(alert.rule_violated, "R-BIO-01");
        assert_eq!(alert.severity, RiskLevel::Critical);
    }

    #[test]
    fn non_respiratory_arrival_still_triggers_outbreak_alert_once_window_is_over_threshold() {
        let mut auditor = IntelligenceAuditor::new();
        let base = Instant::now();
        for i in 0..4u64 {
            let encounter = base_encounter("Difficulty Breathing", 1, true, "notes");
            auditor.audit(&encounter, base + Duration::from_millis(i * 100));
        }
        // Unrelated symptom arriving while the window is still over threshold: the
        // prune/threshold check runs regardless of this arrival's own symptom.
        let unrelated = base_encounter("Minor Laceration", 4, false, "notes");
        let alert = auditor.audit(&unrelated, base + Duration::from_millis(500)).expect("outbreak alert expected");
        assert_eq!(alert.rule_violated, "R-BIO-01");
    }

    #[test]
    fn respiratory_window_prunes_stale_arrivals() {
        let mut auditor = IntelligenceAuditor::new();
        let base = Instant::now();
        for i in 0..3u64 {
            let encounter = base_encounter("Difficulty Breathing", 1, true, "notes");
            auditor.audit(&encounter, base + Duration::from_millis(i * 100));
        }
        // Arrives 7 seconds later: the first 3 have fallen out of the 6s window.
        let late = base_encounter("Difficulty Breathing", 1, true, "notes");
        let alert = auditor.audit(&late, base + Duration::from_secs(7));
        assert!(alert.is_none());
    }
}
