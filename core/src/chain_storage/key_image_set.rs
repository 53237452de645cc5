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

//! The spent key-image set (§4.F), grounded on `Blockchain.h`'s `m_spent_keys`. Each entry also
//! records the height it was spent at, so a reorg can roll back exactly the images a disconnected
//! block introduced without rescanning the whole set.

use std::collections::HashMap;

use crate::types::Hash;

#[derive(Default)]
pub struct KeyImageSet {
    spent_at: std::sync::RwLock<HashMap<Hash, u32>>,
}

impl KeyImageSet {
    pub fn new() -> Self {
        KeyImageSet::default()
    }

    pub fn contains(&self, image: &Hash) -> bool {
        self.spent_at.read().unwrap().contains_key(image)
    }

    pub fn spent_height(&self, image: &Hash) -> Option<u32> {
        self.spent_at.read().unwrap().get(image).copied()
    }

    pub fn insert(&self, image: Hash, height: u32) {
        self.spent_at.write().unwrap().insert(image, height);
    }

    /// Removes every key image spent at or above `height` — used when unwinding main-chain blocks
    /// during a reorg, where the popped range is always a height suffix.
    pub fn remove_at_or_above(&self, height: u32) {
        self.spent_at.write().unwrap().retain(|_, spent_height| *spent_height < height);
    }

    pub fn len(&self) -> usize {
        self.spent_at.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn insert_and_contains() {
        let set = KeyImageSet::new();
        let image = Hash([7; 32]);
        assert!(!set.contains(&image));
        set.insert(image, 10);
        assert!(set.contains(&image));
        assert_eq!(set.spent_height(&image), Some(10));
    }

    #[test]
    fn remove_at_or_above_rolls_back_a_height_suffix() {
        let set = KeyImageSet::new();
        set.insert(Hash([1; 32]), 5);
        set.insert(Hash([2; 32]), 10);
        set.insert(Hash([3; 32]), 15);
        set.remove_at_or_above(10);
        assert!(set.contains(&Hash([1; 32])));
        assert!(!set.contains(&Hash([2; 32])));
        assert!(!set.contains(&Hash([3; 32])));
        assert_eq!(set.len(), 1);
    }
}
