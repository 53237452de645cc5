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

//! Ties the canonical block sequence, block index, output index and key-image set together behind
//! one `commit`/`disconnect` pair. This is the storage layer only: block validation (§4.H) lives in
//! `validation` and `engine`, which call into here after a candidate block has already been
//! accepted.

use ringnote_storage::KeyValueStore;
use tracing::debug;

use super::{
    block_index::BlockIndex,
    checkpoints::Checkpoints,
    error::ChainStorageError,
    key_image_set::KeyImageSet,
    output_index::{OutputIndex, OutputRef},
};
use crate::{
    block::BlockEntry,
    transactions::TransactionInput,
    types::{Amount, Hash},
};

pub struct BlockchainDatabase<Bs, H, Bk>
where
    Bs: KeyValueStore<u32, BlockEntry>,
    H: KeyValueStore<u32, Hash>,
    Bk: KeyValueStore<Hash, u32>,
{
    blocks: Bs,
    block_index: BlockIndex<H, Bk>,
    output_index: OutputIndex,
    key_images: KeyImageSet,
    checkpoints: std::sync::RwLock<Checkpoints>,
    quarantined: std::sync::atomic::AtomicBool,
}

impl<Bs, H, Bk> BlockchainDatabase<Bs, H, Bk>
where
    Bs: KeyValueStore<u32, BlockEntry>,
    H: KeyValueStore<u32, Hash>,
    Bk: KeyValueStore<Hash, u32>,
{
    pub fn new(blocks: Bs, by_height: H, by_hash: Bk, payment_id_index_enabled: bool) -> Self {
        BlockchainDatabase {
            blocks,
            block_index: BlockIndex::new(by_height, by_hash),
            output_index: OutputIndex::new(payment_id_index_enabled),
            key_images: KeyImageSet::new(),
            checkpoints: std::sync::RwLock::new(Checkpoints::new()),
            quarantined: std::sync::atomic::AtomicBool::new(false),
        }
    }

    pub fn block_index(&self) -> &BlockIndex<H, Bk> {
        &self.block_index
    }

    pub fn output_index(&self) -> &OutputIndex {
        &self.output_index
    }

    pub fn key_images(&self) -> &KeyImageSet {
        &self.key_images
    }

    pub fn checkpoints(&self) -> std::sync::RwLockReadGuard<'_, Checkpoints> {
        self.checkpoints.read().unwrap()
    }

    pub fn checkpoints_mut(&self) -> std::sync::RwLockWriteGuard<'_, Checkpoints> {
        self.checkpoints.write().unwrap()
    }

    pub fn is_quarantined(&self) -> bool {
        self.quarantined.load(std::sync::atomic::Ordering::SeqCst)
    }

    /// Enters the read-only "quarantine" state an invariant breach demands (§7): every further
    /// write is refused until the indices are rebuilt from the canonical sequence.
    pub fn quarantine(&self) {
        self.quarantined.store(true, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn lift_quarantine(&self) {
        self.quarantined.store(false, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn tail(&self) -> Option<(u32, Hash)> {
        self.block_index.tail()
    }

    pub fn get_by_height(&self, height: u32) -> Result<Option<BlockEntry>, ChainStorageError> {
        Ok(self.blocks.get(&height)?)
    }

    pub fn get_by_hash(&self, hash: &Hash) -> Result<Option<BlockEntry>, ChainStorageError> {
        let Some(height) = self.block_index.get_height(hash)? else {
            return Ok(None);
        };
        self.get_by_height(height)
    }

    /// Appends `entry` as the new tail: stores it, pushes the height/hash index, assigns global
    /// output indices to every output in the recorded order (coinbase first, then each child
    /// transaction in list order, within a transaction in output-slot order — §5's hard ordering
    /// guarantee), and inserts every spent key image tagged at this height.
    pub fn commit_block(&self, entry: BlockEntry) -> Result<(), ChainStorageError> {
        if self.is_quarantined() {
            return Err(ChainStorageError::DatabaseResyncRequired);
        }
        let height = entry.height;
        let block_hash = entry.block_hash();

        let coinbase_hash = entry.block.base_transaction.hash();
        for (slot, output) in entry.block.base_transaction.outputs.iter().enumerate() {
            self.output_index.push(
                output.amount,
                OutputRef {
                    tx_hash: coinbase_hash,
                    out_slot: slot as u16,
                    height,
                },
            );
        }

        for (tx_hash, tx) in entry.block.transaction_hashes.iter().zip(entry.transactions.iter()) {
            for (slot, output) in tx.outputs.iter().enumerate() {
                self.output_index.push(
                    output.amount,
                    OutputRef {
                        tx_hash: *tx_hash,
                        out_slot: slot as u16,
                        height,
                    },
                );
            }
            for input in &tx.inputs {
                if let TransactionInput::Key { key_image, .. } = input {
                    self.key_images.insert(*key_image, height);
                }
            }
        }

        self.blocks.insert(&height, &entry)?;
        self.block_index.push(height, block_hash)?;
        debug!(target: "ringnote::chain_storage", height, %block_hash, "block committed to main chain");
        Ok(())
    }

    /// Disconnects the current tail: removes it from the sequence and height/hash index, revokes
    /// every global output index it assigned (LIFO, undoing `commit_block`'s order), and removes
    /// every key image it spent. Returns the disconnected entry so the caller can re-queue its
    /// non-coinbase transactions into the mempool.
    pub fn disconnect_tip(&self) -> Result<BlockEntry, ChainStorageError> {
        if self.is_quarantined() {
            return Err(ChainStorageError::DatabaseResyncRequired);
        }
        let Some((height, _)) = self.tail() else {
            return Err(ChainStorageError::HeightNotFound(0));
        };
        let entry = self.get_by_height(height)?.ok_or(ChainStorageError::HeightNotFound(height))?;

        for tx in entry.transactions.iter().rev() {
            for output in tx.outputs.iter().rev() {
                self.output_index.pop(output.amount);
            }
        }
        for output in entry.block.base_transaction.outputs.iter().rev() {
            self.output_index.pop(output.amount);
        }

        self.key_images.remove_at_or_above(height);
        self.blocks.remove(&height)?;
        self.block_index.pop(height)?;
        debug!(target: "ringnote::chain_storage", height, "block disconnected from main chain");
        Ok(entry)
    }
}

#[cfg(test)]
mod test {
    use ringnote_storage::MemoryKeyValueStore;

    use super::*;
    use crate::transactions::test_helpers::{build_coinbase_transaction, TestAccount};

    fn new_db() -> BlockchainDatabase<MemoryKeyValueStore<u32, BlockEntry>, MemoryKeyValueStore<u32, Hash>, MemoryKeyValueStore<Hash, u32>>
    {
        BlockchainDatabase::new(MemoryKeyValueStore::new(), MemoryKeyValueStore::new(), MemoryKeyValueStore::new(), false)
    }

    fn sample_entry(height: u32) -> BlockEntry {
        let account = TestAccount::new();
        let (_, tx_secret) = crate::crypto::keys::generate_keypair(&mut rand::rngs::OsRng);
        let coinbase = build_coinbase_transaction(&account, height, 1_000_000, &tx_secret);
        let block = crate::block::Block {
            major_version: 1,
            minor_version: 0,
            timestamp: 1_700_000_000 + height as u64,
            previous_block_hash: Hash::zero(),
            nonce: 0,
            base_transaction: coinbase,
            transaction_hashes: vec![],
        };
        BlockEntry {
            height,
            cumulative_size: block.base_transaction.blob_size(),
            cumulative_difficulty: height as u128 * 100,
            cumulative_generated_coins: 1_000_000 * height as u64,
            block_difficulty: 100,
            transactions: vec![],
            block,
        }
    }

    #[test]
    fn commit_assigns_output_indices_and_disconnect_revokes_them() {
        let db = new_db();
        let entry = sample_entry(1);
        let amount = entry.block.base_transaction.outputs[0].amount;
        db.commit_block(entry).unwrap();
        assert_eq!(db.tail().unwrap().0, 1);
        assert_eq!(db.output_index().len_for_amount(amount), 1);

        let disconnected = db.disconnect_tip().unwrap();
        assert_eq!(disconnected.height, 1);
        assert_eq!(db.output_index().len_for_amount(amount), 0);
        assert!(db.tail().is_none());
    }

    #[test]
    fn quarantine_refuses_further_writes() {
        let db = new_db();
        db.commit_block(sample_entry(1)).unwrap();
        db.quarantine();
        let err = db.commit_block(sample_entry(2)).unwrap_err();
        assert!(matches!(err, ChainStorageError::DatabaseResyncRequired));
    }
}
