//  Copyright 2026. The Ringnote Developers
//
//  Redistribution and use in source and binary forms, with or without modification, are permitted provided that the
//  following conditions are met:
//
//  1. Redistributions of source code must retain the above copyright notice, this list of conditions and the following
//  disclaimer.
//
//  2. Redistributions in binary form must reproduce the above copyright notice, this list of conditions and the
//  following disclaimer in the documentation and/or other materials provided with the distribution.
//
//  3. Neither the name of the copyright holder nor the names of its contributors may be used to endorse or promote
//  products derived from this software without specific prior written permission.
//
//  THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS" AND ANY EXPRESS OR IMPLIED WARRANTIES,
//  INCLUDING, BUT NOT LIMITED TO, THE IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
//  DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL,
//  SPECIAL, EXEMPLARY, OR CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
//  SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY,
//  WHETHER IN CONTRACT, STRICT LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE
//  USE OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

//! A sparse partial Fisher-Yates shuffle (§11, "Shuffle generator"): draws a uniformly random
//! permutation prefix of `0..n` one element at a time without ever materializing the full `[0, n)`
//! array, which matters when `n` is the size of an amount's entire output list and only a handful
//! of decoys are needed. `random_outputs_for_amounts` (§4.H) uses this to pick mixin outputs.

use std::collections::HashMap;

use rand::{
    distributions::{Distribution, Uniform},
    RngCore,
};

/// Swap-with-last over a sparse map instead of a dense array: `selected[i]` records what value
/// logically lives at slot `i` after previous draws swapped it out, defaulting to `i` itself for
/// slots never touched.
pub struct ShuffleGenerator {
    selected: HashMap<u64, u64>,
    count: u64,
}

impl ShuffleGenerator {
    pub fn new(n: u64) -> Self {
        ShuffleGenerator {
            selected: HashMap::new(),
            count: n,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn remaining(&self) -> u64 {
        self.count
    }

    /// Draws and removes one more value from the shrinking pool, or `None` once exhausted.
    pub fn next_value<R: RngCore>(&mut self, rng: &mut R) -> Option<u64> {
        if self.count == 0 {
            return None;
        }
        self.count -= 1;
        let draw = if self.count == 0 { 0 } else { Uniform::new_inclusive(0, self.count).sample(rng) };

        let rval = *self.selected.get(&self.count).unwrap_or(&self.count);

        let value = match self.selected.get(&draw) {
            Some(&existing) => {
                self.selected.insert(draw, rval);
                existing
            }
            None => {
                self.selected.insert(draw, rval);
                draw
            }
        };
        Some(value)
    }
}

/// Draws `count` distinct values from `0..n` in shuffled order, or as many as are available if
/// `count > n`.
pub fn sample_indices<R: RngCore>(n: u64, count: usize, rng: &mut R) -> Vec<u64> {
    let mut generator = ShuffleGenerator::new(n);
    let mut out = Vec::with_capacity(count.min(n as usize));
    for _ in 0..count {
        match generator.next_value(rng) {
            Some(v) => out.push(v),
            None => break,
        }
    }
    out
}

#[cfg(test)]
mod test {
    use rand::rngs::OsRng;

    use super::*;

    #[test]
    fn draws_every_value_exactly_once_when_exhausted() {
        let mut generator = ShuffleGenerator::new(20);
        let mut seen = std::collections::HashSet::new();
        while let Some(v) = generator.next_value(&mut OsRng) {
            assert!(seen.insert(v), "value {v} drawn twice");
        }
        assert_eq!(seen.len(), 20);
        assert_eq!(seen, (0..20).collect());
    }

    #[test]
    fn sample_indices_never_repeats() {
        let samples = sample_indices(1000, 10, &mut OsRng);
        let unique: std::collections::HashSet<_> = samples.iter().collect();
        assert_eq!(samples.len(), 10);
        assert_eq!(unique.len(), 10);
    }

    #[test]
    fn sample_indices_caps_at_the_pool_size() {
        let samples = sample_indices(3, 10, &mut OsRng);
        assert_eq!(samples.len(), 3);
    }
}
