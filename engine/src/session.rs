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

//! A keyed table of independent simulation engines, one per caller
//! session. A single background driver ticks every session; request
//! handlers read snapshots. `dashmap` gives both sides lock-free access to
//! the table itself, while each session's engine is behind its own mutex
//! so a handler's read and the driver's tick never interleave mid-tick.

use std::sync::{Arc, Mutex};

use dashmap::DashMap;

use crate::config::EngineConfig;
use crate::engine::{SimulationEngine, VitalsSnapshot};
use crate::error::EngineError;
use crate::rng::RandomSource;

pub struct Session {
    pub id: String,
    engine: Mutex<SimulationEngine>,
}

impl Session {
    fn new(id: String, config: EngineConfig) -> Self {
        Session { id, engine: Mutex::new(SimulationEngine::new(config, RandomSource::from_entropy())) }
    }

    /// Advances this session's engine by one tick. Errors are the caller's
    /// (the driver's) to log; the session is never torn down because of one.
    pub fn tick(&self) -> Result<(), EngineError> {
        self.engine.lock().expect("session engine mutex poisoned").tick()
    }

    pub fn active_count(&self) -> usize {
        self.engine.lock().expect("session engine mutex poisoned").active_count()
    }

    pub fn status(&self) -> VitalsSnapshot {
        self.engine.lock().expect("session engine mutex poisoned").status()
    }

    pub fn total_alerts(&self) -> usize {
        self.engine.lock().expect("session engine mutex poisoned").alerts().len()
    }

    pub fn alerts(&self) -> Vec<crate::alert::Alert> {
        self.engine.lock().expect("session engine mutex poisoned").alerts().to_vec()
    }
}

pub struct SessionManager {
    sessions: DashMap<String, Arc<Session>>,
    config: EngineConfig,
}

impl SessionManager {
    pub fn new(config: EngineConfig) -> Self {
        SessionManager { sessions: DashMap::new(), config }
    }

    /// Returns the session for `id`, creating it on first use. Unknown
    /// session ids are never an error at this layer.
    pub fn get_or_create(&self, id: &str) -> Arc<Session> {
        if let Some(session) = self.sessions.get(id) {
            return Arc::clone(&session);
        }
        tracing::info!(session_id = id, "creating new session");
        let session = Arc::new(Session::new(id.to_string(), self.config));
        self.sessions.entry(id.to_string()).or_insert(session).clone()
    }

    /// A stable snapshot of session ids for the driver to iterate. New
    /// sessions created mid-iteration are simply picked up next tick.
    pub fn session_ids(&self) -> Vec<String> {
        self.sessions.iter().map(|entry| entry.key().clone()).collect()
    }

    pub fn get(&self, id: &str) -> Option<Arc<Session>> {
        self.sessions.get(id).map(|entry| Arc::clone(&entry))
    }

    /// Advances every known session by one tick. A faulting session is
    /// logged and left alive; it will be retried on the next tick.
    pub fn tick_all(&self) {
        for id in self.session_ids() {
            if let Some(session) = self.get(&id) {
                match session.tick() {
                    Ok(()) => {
                        tracing::debug!(session_id = %id, active = session.active_count(), "tick complete");
                    }
                    Err(err) => {
                        tracing::error!(session_id = %id, error = %err, "tick fault, session kept alive");
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc as StdArc;
    use std::thread;

    #[test]
    fn get_or_create_is_idempotent_for_the_same_id() {
        let manager = SessionManager::new(EngineConfig::default());
        let first = manager.get_or_create("alpha");
        let second = manager.get_or_create("alpha");
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn concurrent_get_or_create_never_creates_duplicate_sessions() {
        let manager = StdArc::new(SessionManager::new(EngineConfig::default()));
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let manager = StdArc::clone(&manager);
                thread::spawn(move || manager.get_or_create("shared"))
            })
            .collect();
        let sessions: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let first = &sessions[0];
        assert!(sessions.iter().all(|s| Arc::ptr_eq(first, s)));
        assert_eq!(manager.session_ids().len(), 1);
    }

    #[test]
    fn tick_all_leaves_every_known_session_alive() {
        let manager = SessionManager::new(EngineConfig::default());
        manager.get_or_create("a");
        manager.get_or_create("b");
        for _ in 0..50 {
            manager.tick_all();
        }
        assert!(manager.get("a").is_some());
        assert!(manager.get("b").is_some());
    }
}
