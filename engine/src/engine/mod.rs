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

//! The per-session discrete-event simulation engine. A tick runs, in
//! order: arrivals, pipeline stage advancement (including LWBS and
//! discharge), exit-ledger pruning, and the admission planner. Vitals are
//! always derivable from the resulting state; nothing here can panic on
//! caller input.

mod admission;
mod arrivals;
mod pipeline;
mod vitals;

use std::collections::{HashMap, VecDeque};

use uuid::Uuid;

use crate::alert::Alert;
use crate::config::EngineConfig;
use crate::encounter::{Ctas, Encounter, Placement, RoomResource};
use crate::error::EngineError;
use crate::intel::IntelligenceAuditor;
use crate::reference_data::FACILITIES;
use crate::rng::RandomSource;

pub use vitals::{HistoryPoint, PatientView, VitalsSnapshot};

const HOUR_ADVANCE_PROBABILITY: f64 = 1.0 / 60.0;
const HISTORY_CAPACITY: usize = 24;
const LOS_HISTORY_CAPACITY: usize = 150;
const STARTING_SIM_HOUR: u8 = 8;

pub(crate) struct ExitEvent {
    pub encounter_id: Uuid,
    pub facility_id: &'static str,
    pub assigned_ctas: Ctas,
    pub status: &'static str,
    /// The destination a patient exits to (`HOME`, `WARD`, `EXIT`) — kept
    /// distinct from the clinical `Stage` the encounter was last in.
    pub destination: &'static str,
    pub disposition: &'static str,
    pub ttl: i32,
    pub los_ticks: Option<u64>,
}

/// Live per-facility occupancy, recomputed from the active set after every
/// pipeline pass rather than carried incrementally, so it always reflects
/// "after stage transitions" as the admission planner requires.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Census {
    pub bed: u32,
    pub chair: u32,
    pub total: u32,
}

#[derive(Debug, Clone)]
pub(crate) struct RecentExit {
    pub id: Uuid,
    pub facility_id: &'static str,
    pub assigned_ctas: Ctas,
    pub status: &'static str,
    pub destination: &'static str,
    pub disposition: &'static str,
    pub ttl: i32,
}

pub struct SimulationEngine {
    config: EngineConfig,
    rng: RandomSource,

    active: HashMap<Uuid, Encounter>,
    alerts: Vec<Alert>,
    auditor: IntelligenceAuditor,

    current_tick: u64,
    sim_hour: u8,

    total_processed: u64,
    lwbs_count: u64,

    history: VecDeque<HistoryPoint>,
    recent_exits: VecDeque<RecentExit>,
    los_history: VecDeque<f64>,
}

impl SimulationEngine {
    pub fn new(config: EngineConfig, rng: RandomSource) -> Self {
        SimulationEngine {
            config,
            rng,
            active: HashMap::new(),
            alerts: Vec::new(),
            auditor: IntelligenceAuditor::new(),
            current_tick: 0,
            sim_hour: STARTING_SIM_HOUR,
            total_processed: 0,
            lwbs_count: 0,
            history: VecDeque::with_capacity(HISTORY_CAPACITY),
            recent_exits: VecDeque::new(),
            los_history: VecDeque::with_capacity(LOS_HISTORY_CAPACITY),
        }
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Advances the simulation by exactly one tick (one simulated minute).
    /// Order: clock → arrivals → pipeline → exit-ledger pruning →
    /// admission → invariant check. An `Err` means the tick is abandoned;
    /// the caller (the session driver) logs it and keeps the session alive.
    pub fn tick(&mut self) -> Result<(), EngineError> {
        self.current_tick += 1;
        self.maybe_advance_hour();

        self.run_arrivals();

        let discharge_rate = self.compute_discharge_rates();
        self.run_pipeline(&discharge_rate);
        self.prune_recent_exits();
        self.run_admission(&discharge_rate);

        self.check_invariants()
    }

    fn maybe_advance_hour(&mut self) {
        if !self.rng.bernoulli(HOUR_ADVANCE_PROBABILITY) {
            return;
        }
        self.sim_hour = (self.sim_hour + 1) % 24;
        let active_count = self.active.len();
        if self.history.len() >= HISTORY_CAPACITY {
            self.history.pop_front();
        }
        self.history.push_back(HistoryPoint { hour: self.sim_hour, active: active_count });
        tracing::debug!(hour = self.sim_hour, active = active_count, "simulated hour advanced");
    }

    pub(crate) fn record_exit(&mut self, exit: ExitEvent) {
        if exit.status == "LWBS" {
            self.lwbs_count += 1;
        }
        if let Some(los_ticks) = exit.los_ticks {
            let hours = los_ticks as f64 / 60.0;
            if self.los_history.len() >= LOS_HISTORY_CAPACITY {
                self.los_history.pop_front();
            }
            self.los_history.push_back(hours);
        }
        self.recent_exits.push_back(RecentExit {
            id: exit.encounter_id,
            facility_id: exit.facility_id,
            assigned_ctas: exit.assigned_ctas,
            status: exit.status,
            destination: exit.destination,
            disposition: exit.disposition,
            ttl: exit.ttl,
        });
    }

    fn prune_recent_exits(&mut self) {
        for exit in self.recent_exits.iter_mut() {
            exit.ttl -= 1;
        }
        self.recent_exits.retain(|e| e.ttl > 0);
    }

    pub(crate) fn facility_census(&self, facility_id: &str) -> Census {
        let mut census = Census::default();
        for encounter in self.active.values() {
            if encounter.facility_id != facility_id {
                continue;
            }
            match encounter.placement {
                Placement::Roomed(RoomResource::Bed) => {
                    census.bed += 1;
                    census.total += 1;
                }
                Placement::Roomed(RoomResource::Chair) => {
                    census.chair += 1;
                    census.total += 1;
                }
                Placement::AdmittedNoBed => census.total += 1,
                _ => {}
            }
        }
        census
    }

    fn check_invariants(&self) -> Result<(), EngineError> {
        for facility in FACILITIES {
            let census = self.facility_census(facility.id);
            if census.bed > facility.physical_beds {
                return Err(EngineError::CapacityExceeded {
                    facility_id: facility.id.to_string(),
                    resource: "BED",
                    occupied: census.bed as usize,
                    limit: facility.physical_beds as usize,
                });
            }
            if census.chair > facility.chair_capacity {
                return Err(EngineError::CapacityExceeded {
                    facility_id: facility.id.to_string(),
                    resource: "CHAIR",
                    occupied: census.chair as usize,
                    limit: facility.chair_capacity as usize,
                });
            }
            if census.total > facility.surge_capacity {
                return Err(EngineError::CapacityExceeded {
                    facility_id: facility.id.to_string(),
                    resource: "TOTAL",
                    occupied: census.total as usize,
                    limit: facility.surge_capacity as usize,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encounter::ResourceKind;

    fn run_for(ticks: u64, seed: u64) -> SimulationEngine {
        let mut engine = SimulationEngine::new(EngineConfig::default(), RandomSource::seeded(seed));
        for tick in 0..ticks {
            engine.tick().unwrap_or_else(|err| panic!("tick {tick} faulted: {err}"));
        }
        engine
    }

    #[test]
    fn capacity_invariants_hold_over_many_ticks_and_seeds() {
        for seed in [1, 2, 3, 42, 1000] {
            run_for(1500, seed);
        }
    }

    #[test]
    fn total_processed_and_lwbs_count_are_monotonic_and_consistent() {
        let mut engine = SimulationEngine::new(EngineConfig::default(), RandomSource::seeded(9));
        let mut prev_processed = 0u64;
        let mut prev_lwbs = 0u64;
        for _ in 0..1000 {
            engine.tick().unwrap();
            assert!(engine.total_processed >= prev_processed);
            assert!(engine.lwbs_count >= prev_lwbs);
            assert!(engine.lwbs_count <= engine.total_processed);
            prev_processed = engine.total_processed;
            prev_lwbs = engine.lwbs_count;
        }
    }

    #[test]
    fn bounded_collections_never_exceed_their_caps() {
        let engine = run_for(3000, 17);
        assert!(engine.history.len() <= HISTORY_CAPACITY);
        assert!(engine.los_history.len() <= LOS_HISTORY_CAPACITY);
        assert!(engine.recent_exits.iter().all(|e| e.ttl > 0));
    }

    #[test]
    fn status_and_resource_coupling_holds_for_every_active_encounter() {
        let engine = run_for(800, 21);
        for encounter in engine.active.values() {
            match encounter.placement {
                Placement::Waiting | Placement::WaitingForResults | Placement::Lwbs | Placement::Discharged => {
                    assert_eq!(encounter.resource_kind(), ResourceKind::None);
                }
                Placement::Roomed(RoomResource::Bed) => assert_eq!(encounter.resource_kind(), ResourceKind::Bed),
                Placement::Roomed(RoomResource::Chair) => assert_eq!(encounter.resource_kind(), ResourceKind::Chair),
                Placement::AdmittedNoBed => assert_eq!(encounter.resource_kind(), ResourceKind::Hallway),
            }
        }
    }

    #[test]
    fn status_snapshot_is_always_producible() {
        let engine = run_for(500, 4);
        let snapshot = engine.status();
        assert_eq!(snapshot.processed, engine.total_processed);
        assert_eq!(snapshot.lwbs, engine.lwbs_count);
    }
}
