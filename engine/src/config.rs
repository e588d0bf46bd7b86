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

pub const DEFAULT_PRODUCTIVITY_FACTOR: f64 = 5.0;

/// Knobs the engine itself needs, independent of how often the driver
/// calls `tick()`. The tick cadence is a transport-layer concern owned by
/// whoever drives the engine; the engine only cares about this.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    pub productivity_factor: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig { productivity_factor: DEFAULT_PRODUCTIVITY_FACTOR }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_the_documented_productivity_factor() {
        assert_eq!(EngineConfig::default().productivity_factor, DEFAULT_PRODUCTIVITY_FACTOR);
    }
}
