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

//! The unconfirmed transaction pool (§4.G). Owned exclusively by the blockchain engine; external
//! callers submit transactions through `engine::Blockchain::add_transaction` but never reach in
//! here directly (§5, "Shared resources").

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::{debug, warn};

use super::{entry::MempoolEntry, error::MempoolError, priority::PriorityKey};
use crate::transactions::{Transaction, TransactionInput};
use crate::types::Hash;

pub struct MempoolConfig {
    pub tx_live_time: u64,
    pub tx_from_alt_block_live_time: u64,
    /// Recently-evicted hashes are remembered for `deleted_tx_live_time_multiplier * tx_live_time`
    /// to suppress re-gossip of transactions the node just dropped.
    pub deleted_tx_live_time_multiplier: u64,
}

impl Default for MempoolConfig {
    fn default() -> Self {
        MempoolConfig {
            tx_live_time: 86400,
            tx_from_alt_block_live_time: 604800,
            deleted_tx_live_time_multiplier: 7,
        }
    }
}

#[derive(Default)]
pub struct Mempool {
    config_tx_live_time: u64,
    config_alt_live_time: u64,
    config_deleted_multiplier: u64,
    entries: HashMap<Hash, MempoolEntry>,
    /// `PriorityKey -> tx_hash`, kept as a sorted structure so block-template assembly is a
    /// linear scan in priority order rather than a full sort on every call.
    priority: BTreeMap<PriorityKey, Hash>,
    key_image_owners: HashMap<Hash, Hash>,
    recently_deleted: HashMap<Hash, u64>,
}

impl Mempool {
    pub fn new(config: MempoolConfig) -> Self {
        Mempool {
            config_tx_live_time: config.tx_live_time,
            config_alt_live_time: config.tx_from_alt_block_live_time,
            config_deleted_multiplier: config.deleted_tx_live_time_multiplier,
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, tx_hash: &Hash) -> bool {
        self.entries.contains_key(tx_hash)
    }

    pub fn get(&self, tx_hash: &Hash) -> Option<&MempoolEntry> {
        self.entries.get(tx_hash)
    }

    fn key_images_of(tx: &Transaction) -> impl Iterator<Item = &Hash> {
        tx.inputs.iter().filter_map(TransactionInput::key_image)
    }

    /// Admits `tx` (§4.G "Admission"). The caller has already run full consensus validation
    /// against the current tip; this only enforces pool-local invariants: no duplicate entry, and
    /// no key-image collision with another pool entry unless `kept_by_block` (a block disconnect is
    /// allowed to reintroduce transactions that conflict with what's already pooled — the chain
    /// itself will resolve which one ultimately lands on main).
    pub fn add(&mut self, tx: Transaction, receive_time: u64, kept_by_block: bool) -> Result<Hash, MempoolError> {
        let tx_hash = tx.hash();
        if self.entries.contains_key(&tx_hash) {
            return Err(MempoolError::AlreadyInPool(tx_hash));
        }
        if !kept_by_block {
            for image in Self::key_images_of(&tx) {
                if let Some(owner) = self.key_image_owners.get(image) {
                    return Err(MempoolError::KeyImageConflict(*owner));
                }
            }
        }

        let entry = MempoolEntry::new(tx.clone(), receive_time, kept_by_block);
        self.priority.insert(PriorityKey::new(&entry, tx_hash), tx_hash);
        for image in Self::key_images_of(&tx) {
            self.key_image_owners.insert(*image, tx_hash);
        }
        self.entries.insert(tx_hash, entry);
        self.recently_deleted.remove(&tx_hash);
        debug!(target: "ringnote::mempool", %tx_hash, kept_by_block, "transaction admitted to pool");
        Ok(tx_hash)
    }

    fn remove_internal(&mut self, tx_hash: &Hash) -> Option<MempoolEntry> {
        let entry = self.entries.remove(tx_hash)?;
        let key = PriorityKey::new(&entry, *tx_hash);
        self.priority.remove(&key);
        for image in Self::key_images_of(&entry.transaction) {
            if self.key_image_owners.get(image) == Some(tx_hash) {
                self.key_image_owners.remove(image);
            }
        }
        Some(entry)
    }

    /// Block-template assembly order: fee-per-byte descending, blob size ascending, receive time
    /// ascending (§4.G "Priority order").
    pub fn transactions_by_priority(&self) -> Vec<Hash> {
        self.priority.values().copied().collect()
    }

    /// Called when `block`'s transactions land on main: evicts every included transaction, then
    /// evicts any remaining pool entry whose key image collides with one the block just spent —
    /// an invisible double-spend loses to whichever version made it into the chain (§4.G
    /// "Eviction").
    pub fn on_block_accepted(&mut self, block_transaction_hashes: &[Hash], newly_spent_images: &[Hash]) {
        for hash in block_transaction_hashes {
            self.remove_internal(hash);
        }
        let conflicting: Vec<Hash> = newly_spent_images
            .iter()
            .filter_map(|image| self.key_image_owners.get(image).copied())
            .collect();
        for hash in conflicting {
            warn!(target: "ringnote::mempool", %hash, "evicting pool transaction made invalid by newly accepted block");
            self.remove_internal(&hash);
        }
    }

    /// Re-queues `disconnected_transactions` (the non-coinbase transactions of a block that was
    /// just disconnected) back into the pool, marked kept-by-block (§4.G "Eviction", "On block
    /// disconnected").
    pub fn on_block_disconnected(&mut self, disconnected_transactions: Vec<Transaction>, now: u64) {
        for tx in disconnected_transactions {
            let tx_hash = tx.hash();
            if self.entries.contains_key(&tx_hash) {
                continue;
            }
            if let Err(err) = self.add(tx, now, true) {
                warn!(target: "ringnote::mempool", %tx_hash, %err, "failed to re-queue disconnected transaction");
            }
        }
    }

    /// Advances pool aging by one tick (§9 "Coroutine control flow": the core exposes `tick(now)`
    /// rather than owning a timer). Expires entries past their TTL and forgets deleted-hash
    /// suppression entries past their own TTL.
    pub fn tick(&mut self, now: u64) {
        let mut expired = Vec::new();
        for (hash, entry) in &self.entries {
            let live_time = if entry.kept_by_block { self.config_alt_live_time } else { self.config_tx_live_time };
            if now.saturating_sub(entry.receive_time) > live_time {
                expired.push(*hash);
            }
        }
        for hash in expired {
            self.remove_internal(&hash);
            self.recently_deleted.insert(hash, now);
            debug!(target: "ringnote::mempool", %hash, "transaction expired from pool");
        }

        let suppression_window = self.config_deleted_multiplier * self.config_tx_live_time;
        self.recently_deleted.retain(|_, deleted_at| now.saturating_sub(*deleted_at) <= suppression_window);
    }

    pub fn is_recently_deleted(&self, tx_hash: &Hash) -> bool {
        self.recently_deleted.contains_key(tx_hash)
    }

    pub fn spent_key_images(&self) -> HashSet<Hash> {
        self.key_image_owners.keys().copied().collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::transactions::test_helpers::{build_coinbase_transaction, TestAccount};

    fn sample_tx(height: u32) -> Transaction {
        let account = TestAccount::new();
        let (_, tx_secret) = crate::crypto::keys::generate_keypair(&mut rand::rngs::OsRng);
        build_coinbase_transaction(&account, height, 1_000_000, &tx_secret)
    }

    #[test]
    fn duplicate_admission_is_rejected() {
        let mut pool = Mempool::new(MempoolConfig::default());
        let tx = sample_tx(1);
        pool.add(tx.clone(), 0, false).unwrap();
        let err = pool.add(tx, 0, false).unwrap_err();
        assert!(matches!(err, MempoolError::AlreadyInPool(_)));
    }

    #[test]
    fn block_acceptance_evicts_included_and_conflicting_transactions() {
        let mut pool = Mempool::new(MempoolConfig::default());
        let tx = sample_tx(1);
        let tx_hash = pool.add(tx, 0, false).unwrap();
        assert_eq!(pool.len(), 1);
        pool.on_block_accepted(&[tx_hash], &[]);
        assert!(pool.is_empty());
    }

    #[test]
    fn disconnected_transactions_are_requeued_kept_by_block() {
        let mut pool = Mempool::new(MempoolConfig::default());
        let tx = sample_tx(2);
        pool.on_block_disconnected(vec![tx.clone()], 100);
        let entry = pool.get(&tx.hash()).unwrap();
        assert!(entry.kept_by_block);
    }

    #[test]
    fn tick_expires_entries_past_their_ttl() {
        let mut pool = Mempool::new(MempoolConfig {
            tx_live_time: 10,
            ..MempoolConfig::default()
        });
        let tx = sample_tx(3);
        let tx_hash = pool.add(tx, 0, false).unwrap();
        pool.tick(5);
        assert!(pool.contains(&tx_hash));
        pool.tick(11);
        assert!(!pool.contains(&tx_hash));
        assert!(pool.is_recently_deleted(&tx_hash));
    }
}
