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

//! The height<->hash mapping over the main chain (§4.D), grounded on `Blockchain.h`'s
//! `m_blockIndex`/`buildSparseChain`/`findBlockchainSupplement`.

use ringnote_storage::KeyValueStore;

use super::error::ChainStorageError;
use crate::types::Hash;

pub struct BlockIndex<H, B>
where
    H: KeyValueStore<u32, Hash>,
    B: KeyValueStore<Hash, u32>,
{
    by_height: H,
    by_hash: B,
    tail: std::sync::RwLock<Option<(u32, Hash)>>,
}

impl<H, B> BlockIndex<H, B>
where
    H: KeyValueStore<u32, Hash>,
    B: KeyValueStore<Hash, u32>,
{
    pub fn new(by_height: H, by_hash: B) -> Self {
        BlockIndex {
            by_height,
            by_hash,
            tail: std::sync::RwLock::new(None),
        }
    }

    pub fn get_height(&self, hash: &Hash) -> Result<Option<u32>, ChainStorageError> {
        Ok(self.by_hash.get(hash)?)
    }

    pub fn get_hash(&self, height: u32) -> Result<Option<Hash>, ChainStorageError> {
        Ok(self.by_height.get(&height)?)
    }

    pub fn tail(&self) -> Option<(u32, Hash)> {
        *self.tail.read().unwrap()
    }

    /// Appends the main-chain block at `height` with `hash`, becoming the new tail.
    pub fn push(&self, height: u32, hash: Hash) -> Result<(), ChainStorageError> {
        self.by_height.insert(&height, &hash)?;
        self.by_hash.insert(&hash, &height)?;
        *self.tail.write().unwrap() = Some((height, hash));
        Ok(())
    }

    /// Removes the block at `height` from the index (used when unwinding during a reorg). Does not
    /// check that `height` is currently the tail — the caller pops from the tip downward.
    pub fn pop(&self, height: u32) -> Result<Option<Hash>, ChainStorageError> {
        let Some(hash) = self.by_height.remove(&height)? else {
            return Ok(None);
        };
        self.by_hash.remove(&hash)?;
        let new_tail = if height == 0 {
            None
        } else {
            self.get_hash(height - 1)?.map(|h| (height - 1, h))
        };
        *self.tail.write().unwrap() = new_tail;
        Ok(Some(hash))
    }

    /// Hashes at offsets 1, 2, 4, 8, ... back from `from_height`, ending at genesis, used to
    /// negotiate a common ancestor with a peer in a small number of round trips.
    pub fn build_sparse_chain(&self, from_height: u32) -> Result<Vec<Hash>, ChainStorageError> {
        let mut hashes = Vec::new();
        let Some(start) = self.get_hash(from_height)? else {
            return Ok(hashes);
        };
        hashes.push(start);

        let mut offset: u64 = 1;
        loop {
            let candidate = (from_height as i64) - (offset as i64);
            if candidate < 0 {
                break;
            }
            match self.get_hash(candidate as u32)? {
                Some(hash) => hashes.push(hash),
                None => break,
            }
            if candidate == 0 {
                break;
            }
            offset = offset.saturating_mul(2);
        }
        Ok(hashes)
    }

    /// Earliest index into `remote_sparse` (ordered tip-to-genesis, as produced by
    /// [`Self::build_sparse_chain`]) whose hash is NOT found locally — i.e. where the remote chain
    /// first diverges from ours. Returns `remote_sparse.len()` if every entry is known locally.
    pub fn find_supplement(&self, remote_sparse: &[Hash]) -> Result<usize, ChainStorageError> {
        for (i, hash) in remote_sparse.iter().enumerate() {
            if self.get_height(hash)?.is_none() {
                return Ok(i);
            }
        }
        Ok(remote_sparse.len())
    }
}

#[cfg(test)]
mod test {
    use ringnote_storage::MemoryKeyValueStore;

    use super::*;

    fn new_index() -> BlockIndex<MemoryKeyValueStore<u32, Hash>, MemoryKeyValueStore<Hash, u32>> {
        BlockIndex::new(MemoryKeyValueStore::new(), MemoryKeyValueStore::new())
    }

    fn hash_for(n: u8) -> Hash {
        Hash([n; 32])
    }

    #[test]
    fn push_and_lookup_roundtrip() {
        let index = new_index();
        index.push(0, hash_for(0)).unwrap();
        index.push(1, hash_for(1)).unwrap();
        assert_eq!(index.tail(), Some((1, hash_for(1))));
        assert_eq!(index.get_height(&hash_for(1)).unwrap(), Some(1));
        assert_eq!(index.get_hash(0).unwrap(), Some(hash_for(0)));
    }

    #[test]
    fn pop_rewinds_tail() {
        let index = new_index();
        for h in 0..5u8 {
            index.push(h as u32, hash_for(h)).unwrap();
        }
        assert_eq!(index.pop(4).unwrap(), Some(hash_for(4)));
        assert_eq!(index.tail(), Some((3, hash_for(3))));
        assert_eq!(index.get_height(&hash_for(4)).unwrap(), None);
    }

    #[test]
    fn sparse_chain_covers_offsets_and_genesis() {
        let index = new_index();
        for h in 0..20u8 {
            index.push(h as u32, hash_for(h)).unwrap();
        }
        let sparse = index.build_sparse_chain(19).unwrap();
        assert_eq!(sparse[0], hash_for(19));
        assert_eq!(*sparse.last().unwrap(), hash_for(0));
        assert!(sparse.len() < 20, "sparse chain should not include every height");
    }

    #[test]
    fn find_supplement_locates_first_unknown_hash() {
        let index = new_index();
        for h in 0..5u8 {
            index.push(h as u32, hash_for(h)).unwrap();
        }
        let remote = vec![hash_for(4), hash_for(3), hash_for(99), hash_for(1)];
        assert_eq!(index.find_supplement(&remote).unwrap(), 2);
    }
}
