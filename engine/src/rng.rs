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

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Wraps the RNG the engine draws from so it can be injected and seeded
/// deterministically in tests instead of reaching for thread-local entropy.
pub struct RandomSource {
    rng: StdRng,
}

impl RandomSource {
    pub fn from_entropy() -> Self {
        RandomSource { rng: StdRng::from_entropy() }
    }

    pub fn seeded(seed: u64) -> Self {
        RandomSource { rng: StdRng::seed_from_u64(seed) }
    }

    pub fn get(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Bernoulli draw; `p <= 0.0` never succeeds, `p >= 1.0` always does.
    pub fn bernoulli(&mut self, p: f64) -> bool {
        if p <= 0.0 {
            return false;
        }
        if p >= 1.0 {
            return true;
        }
        self.rng.gen_bool(p)
    }

    pub fn uniform_int(&mut self, low: i64, high: i64) -> i64 {
        self.rng.gen_range(low..=high)
    }
}

impl Default for RandomSource {
    fn default() -> Self {
        Self::from_entropy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bernoulli_is_a_hard_boundary_at_zero_and_one() {
        let mut rng = RandomSource::seeded(1);
        for _ in 0..100 {
            assert!(!rng.bernoulli(0.0));
            assert!(rng.bernoulli(1.0));
        }
    }

    #[test]
    fn same_seed_produces_the_same_draws() {
        let mut a = RandomSource::seeded(99);
        let mut b = RandomSource::seeded(99);
        let draws_a: Vec<i64> = (0..20).map(|_| a.uniform_int(0, 1_000_000)).collect();
        let draws_b: Vec<i64> = (0..20).map(|_| b.uniform_int(0, 1_000_000)).collect();
        assert_eq!(draws_a, draws_b);
    }

    #[test]
    fn uniform_int_stays_within_the_inclusive_bounds() {
        let mut rng = RandomSource::seeded(3);
        for _ in 0..500 {
            let draw = rng.uniform_int(10, 20);
            assert!((10..=20).contains(&draw));
        }
    }
}
