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

//! Process configuration. Every flag is also readable as an `EDFLOW_*`
//! environment variable via `clap`'s `env` feature; CLI flags win if both
//! are given.

use clap::Parser;
use edflow_engine::config::DEFAULT_PRODUCTIVITY_FACTOR;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_TICK_MS: u64 = 100;
const DEFAULT_LOG: &str = "info";

#[derive(Debug, Clone, Parser)]
#[command(name = "edflow-server", about = "Emergency department flow simulator")]
pub struct Settings {
    #[arg(long, env = "EDFLOW_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    #[arg(long, env = "EDFLOW_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    #[arg(long, env = "EDFLOW_TICK_MS", default_value_t = DEFAULT_TICK_MS)]
    pub tick_ms: u64,

    #[arg(long, env = "EDFLOW_PRODUCTIVITY_FACTOR", default_value_t = DEFAULT_PRODUCTIVITY_FACTOR)]
    pub productivity_factor: f64,

    #[arg(long, env = "EDFLOW_LOG", default_value = DEFAULT_LOG)]
    pub log: String,
}

impl Settings {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_external_interface_contract() {
        let settings = Settings::parse_from(["edflow-server"]);
        assert_eq!(settings.host, DEFAULT_HOST);
        assert_eq!(settings.port, DEFAULT_PORT);
        assert_eq!(settings.tick_ms, DEFAULT_TICK_MS);
        assert_eq!(settings.productivity_factor, DEFAULT_PRODUCTIVITY_FACTOR);
        assert_eq!(settings.bind_address(), "0.0.0.0:8000");
    }

    #[test]
    fn cli_flag_overrides_default() {
        let settings = Settings::parse_from(["edflow-server", "--port", "9500", "--productivity-factor", "2.5"]);
        assert_eq!(settings.port, 9500);
        assert_eq!(settings.productivity_factor, 2.5);
    }

    #[test]
    fn env_var_overrides_default_when_no_flag_given() {
        // SAFETY: test-only; no other test in this process reads EDFLOW_TICK_MS concurrently.
        unsafe { std::env::set_var("EDFLOW_TICK_MS", "250") };
        let settings = Settings::parse_from(["edflow-server"]);
        unsafe { std::env::remove_var("EDFLOW_TICK_MS") };
        assert_eq!(settings.tick_ms, 250);
    }
}
