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

//! Static, compiled-in reference data: facilities, staffing, triage rules
//! and the safety-keyword list. Nothing here is loaded from disk or mutated
//! after process start.

use serde::Serialize;

use crate::alert::RiskLevel;

pub const DEFAULT_CHAIR_CAPACITY: u32 = 20;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ShiftStaffing {
    pub md_count: u32,
    pub rn_count: u32,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Staffing {
    pub day_shift: ShiftStaffing,
    pub evening_shift: ShiftStaffing,
    pub night_shift: ShiftStaffing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shift {
    Day,
    Evening,
    Night,
}

/// 08:00-16:00 day, 16:00-24:00 evening, 00:00-08:00 night.
pub fn shift_for_hour(hour: u8) -> Shift {
    match hour {
        0..=7 => Shift::Night,
        8..=15 => Shift::Day,
        _ => Shift::Evening,
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Facility {
    pub id: &'static str,
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
    pub capacity: u32,
    pub category: &'static str,
    pub physical_beds: u32,
    pub surge_capacity: u32,
    pub chair_capacity: u32,
    pub staffing: Staffing,
}

impl Facility {
    pub fn staffing_for_hour(&self, hour: u8) -> ShiftStaffing {
        match shift_for_hour(hour) {
            Shift::Day => self.staffing.day_shift,
            Shift::Evening => self.staffing.evening_shift,
            Shift::Night => self.staffing.night_shift,
        }
    }
}

pub fn facility(id: &str) -> Option<&'static Facility> {
    FACILITIES.iter().find(|f| f.id == id)
}

pub static FACILITIES: &[Facility] = &[
    Facility {
        id: "SBK",
        name: "Sunnybrook Health Sciences",
        lat: 43.722,
        lon: -79.375,
        capacity: 45,
        category: "Level 1 Trauma",
        physical_beds: 45,
        surge_capacity: 60,
        chair_capacity: DEFAULT_CHAIR_CAPACITY,
        staffing: Staffing {
            day_shift: ShiftStaffing { md_count: 10, rn_count: 28 },
            evening_shift: ShiftStaffing { md_count: 12, rn_count: 30 },
            night_shift: ShiftStaffing { md_count: 4, rn_count: 15 },
        },
    },
    Facility {
        id: "UHN-TGH",
        name: "Toronto General Hospital",
        lat: 43.659,
        lon: -79.390,
        capacity: 50,
        category: "Academic/Transplant",
        physical_beds: 50,
        surge_capacity: 65,
        chair_capacity: DEFAULT_CHAIR_CAPACITY,
        staffing: Staffing {
            day_shift: ShiftStaffing { md_count: 8, rn_count: 24 },
            evening_shift: ShiftStaffing { md_count: 10, rn_count: 26 },
            night_shift: ShiftStaffing { md_count: 3, rn_count: 12 },
        },
    },
    Facility {
        id: "SMH",
        name: "St. Michael's Hospital",
        lat: 43.653,
        lon: -79.379,
        capacity: 40,
        category: "Level 1 Trauma (Urban)",
        physical_beds: 40,
        surge_capacity: 55,
        chair_capacity: DEFAULT_CHAIR_CAPACITY,
        staffing: Staffing {
            day_shift: ShiftStaffing { md_count: 9, rn_count: 25 },
            evening_shift: ShiftStaffing { md_count: 11, rn_count: 28 },
            night_shift: ShiftStaffing { md_count: 4, rn_count: 14 },
        },
    },
    Facility {
        id: "NYGH",
        name: "North York General",
        lat: 43.769,
        lon: -79.363,
        capacity: 35,
        category: "High Volume Community",
        physical_beds: 35,
        surge_capacity: 50,
        chair_capacity: DEFAULT_CHAIR_CAPACITY,
        staffing: Staffing {
            day_shift: ShiftStaffing { md_count: 12, rn_count: 30 },
            evening_shift: ShiftStaffing { md_count: 14, rn_count: 32 },
            night_shift: ShiftStaffing { md_count: 5, rn_count: 16 },
        },
    },
    Facility {
        id: "MSH",
        name: "Mount Sinai Hospital",
        lat: 43.658,
        lon: -79.391,
        capacity: 38,
        category: "Academic",
        physical_beds: 38,
        surge_capacity: 48,
        chair_capacity: DEFAULT_CHAIR_CAPACITY,
        staffing: Staffing {
            day_shift: ShiftStaffing { md_count: 6, rn_count: 18 },
            evening_shift: ShiftStaffing { md_count: 8, rn_count: 20 },
            night_shift: ShiftStaffing { md_count: 3, rn_count: 10 },
        },
    },
];

#[derive(Debug, Clone, Copy)]
pub struct ClinicalRule {
    pub rule_id: &'static str,
    pub symptom: &'static str,
    pub required_ctas: u8,
    pub risk_level: RiskLevel,
    pub explanation: &'static str,
}

pub static CLINICAL_RULES: &[ClinicalRule] = &[
    ClinicalRule {
        rule_id: "RULE_001",
        symptom: "Chest Pain",
        required_ctas: 2,
        risk_level: RiskLevel::High,
        explanation: "Potential cardiac event requires rapid assessment (CTAS 2).",
    },
    ClinicalRule {
        rule_id: "RULE_002",
        symptom: "Difficulty Breathing",
        required_ctas: 1,
        risk_level: RiskLevel::Critical,
        explanation: "Respiratory distress is a life-threatening emergency (CTAS 1).",
    },
    ClinicalRule {
        rule_id: "RULE_003",
        symptom: "Minor Laceration",
        required_ctas: 4,
        risk_level: RiskLevel::Low,
        explanation: "Stable laceration requires suture but not immediate resuscitation (CTAS 4).",
    },
    ClinicalRule {
        rule_id: "RULE_004",
        symptom: "Lower Abdominal Pain",
        required_ctas: 3,
        risk_level: RiskLevel::Moderate,
        explanation: "Abdominal pain in elderly or immunocompromised requires CTAS 2/3.",
    },
];

pub static SAFETY_KEYWORDS: &[&str] = &["hospitalization", "admit", "icu"];

pub fn rule_for_symptom(symptom: &str) -> Option<&'static ClinicalRule> {
    CLINICAL_RULES.iter().find(|r| r.symptom == symptom)
}
