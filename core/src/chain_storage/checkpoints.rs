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

//! Out-of-band (height, hash) pins that bound how deep any reorg may go (§4.H "Checkpointing").
//! `is_pinned` lets the block validator skip the expensive PoW hash inside a checkpointed range
//! once the block hash already matches the pin (§11, "Checkpoint cheap-verification").

use std::collections::BTreeMap;

use crate::types::Hash;

#[derive(Default)]
pub struct Checkpoints {
    pins: BTreeMap<u32, Hash>,
}

impl Checkpoints {
    pub fn new() -> Self {
        Checkpoints::default()
    }

    pub fn add(&mut self, height: u32, hash: Hash) {
        self.pins.insert(height, hash);
    }

    pub fn top(&self) -> Option<(u32, Hash)> {
        self.pins.iter().next_back().map(|(h, hash)| (*h, *hash))
    }

    /// `true` if `height` is pinned and `hash` matches it exactly. `false` if `height` is pinned
    /// and `hash` does not match (the caller must reject outright), or if `height` is not pinned at
    /// all (no opinion either way).
    pub fn is_pinned(&self, height: u32, hash: &Hash) -> bool {
        self.pins.get(&height).is_some_and(|pinned| pinned == hash)
    }

    /// `true` iff `height` is covered by a pin whose hash does not match — an unconditional reject.
    pub fn conflicts(&self, height: u32, hash: &Hash) -> bool {
        self.pins.get(&height).is_some_and(|pinned| pinned != hash)
    }

    /// Whether `height` falls at or below the highest checkpoint — blocks in this range came with a
    /// pin and so may use cheaper verification once `is_pinned` confirms the hash.
    pub fn is_checkpointed_range(&self, height: u32) -> bool {
        self.top().is_some_and(|(top, _)| height <= top)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn pinned_hash_matches_and_conflicting_hash_does_not() {
        let mut checkpoints = Checkpoints::new();
        checkpoints.add(100, Hash([1; 32]));
        assert!(checkpoints.is_pinned(100, &Hash([1; 32])));
        assert!(!checkpoints.is_pinned(100, &Hash([2; 32])));
        assert!(checkpoints.conflicts(100, &Hash([2; 32])));
        assert!(!checkpoints.conflicts(100, &Hash([1; 32])));
    }

    #[test]
    fn unpinned_height_is_neither_pinned_nor_conflicting() {
        let checkpoints = Checkpoints::new();
        assert!(!checkpoints.is_pinned(5, &Hash([9; 32])));
        assert!(!checkpoints.conflicts(5, &Hash([9; 32])));
    }

    #[test]
    fn checkpointed_range_is_bounded_by_the_top_pin() {
        let mut checkpoints = Checkpoints::new();
        checkpoints.add(50, Hash([1; 32]));
        checkpoints.add(200, Hash([2; 32]));
        assert_eq!(checkpoints.top(), Some((200, Hash([2; 32]))));
        assert!(checkpoints.is_checkpointed_range(50));
        assert!(checkpoints.is_checkpointed_range(200));
        assert!(!checkpoints.is_checkpointed_range(201));
    }
}
