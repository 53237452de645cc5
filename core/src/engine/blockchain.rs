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

//! The blockchain engine (component H): block/transaction acceptance, alt-chain bookkeeping and
//! reorg, wrapped around a single mutex. Every public method locks once and delegates to a private
//! `_impl`/helper that assumes the lock is already held, since `std::sync::Mutex` is not
//! re-entrant — there is no virtual dispatch here either (§9): one struct, one lock, free
//! functions from `validation` called directly against a small [`ChainView`] adapter.

use std::collections::HashMap;
use std::sync::Mutex;

use rand::rngs::OsRng;
use ringnote_shutdown::ShutdownSignal;
use ringnote_storage::KeyValueStore;

use super::{
    config::EngineConfig,
    error::BlockchainError,
    observer::{BlockchainObserver, ObserverList},
};
use crate::{
    block::{Block, BlockEntry},
    chain_storage::{BlockchainDatabase, ChainStorageError},
    crypto::{keys::PublicKey, pow::ProofOfWorkHasher},
    currency::{block_reward, fee::minimum_total_fee, next_difficulty, ConsensusParams},
    mempool::{Mempool, MempoolConfig},
    transactions::{shuffle::sample_indices, Transaction, TransactionInput, TransactionTarget},
    types::{Amount, Hash},
    validation::{
        block_validators,
        transaction_validators::{self, ChainView, OutputDescriptor},
        BlockRejectionReason, TransactionRejectionReason,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddBlockResult {
    /// Landed on the main chain, either directly or via a reorg that just completed.
    Accepted { height: u32 },
    /// Buffered as a losing fork; not yet heavier than the main chain's tip.
    AddedToAltChain { height: u32 },
    AlreadyExists,
}

struct Inner<Bs, H, Bk>
where
    Bs: KeyValueStore<u32, BlockEntry>,
    H: KeyValueStore<u32, Hash>,
    Bk: KeyValueStore<Hash, u32>,
{
    database: BlockchainDatabase<Bs, H, Bk>,
    mempool: Mempool,
    /// Buffered candidates whose parent isn't the main tip, keyed by block hash. Entries carry
    /// provisional bookkeeping (difficulty, size) good enough to order forks; full consensus
    /// validation happens only when [`Blockchain::reorganize`] replays a chain onto main.
    alt_blocks: HashMap<Hash, BlockEntry>,
}

/// The read-only view [`transaction_validators`] needs, over whichever [`BlockchainDatabase`] the
/// engine is holding. `height` is fixed by the caller rather than read from the tip, since the
/// same view is reused, unmodified, to validate every transaction inside one candidate block.
struct DbView<'a, Bs, H, Bk>
where
    Bs: KeyValueStore<u32, BlockEntry>,
    H: KeyValueStore<u32, Hash>,
    Bk: KeyValueStore<Hash, u32>,
{
    database: &'a BlockchainDatabase<Bs, H, Bk>,
    height: u32,
}

impl<'a, Bs, H, Bk> ChainView for DbView<'a, Bs, H, Bk>
where
    Bs: KeyValueStore<u32, BlockEntry>,
    H: KeyValueStore<u32, Hash>,
    Bk: KeyValueStore<Hash, u32>,
{
    fn height(&self) -> u32 {
        self.height
    }

    fn is_key_image_spent(&self, image: &Hash) -> bool {
        self.database.key_images().contains(image)
    }

    fn output_count(&self, amount: Amount) -> u64 {
        self.database.output_index().len_for_amount(amount)
    }

    fn output(&self, amount: Amount, global_index: u64) -> Option<OutputDescriptor> {
        resolve_output(self.database, amount, global_index)
    }
}

/// Looks an output up by its global index and returns the one-time public key and unlock height
/// its producing transaction carries. `None` for a multisig output — those aren't spendable
/// through a ring and so never appear on the right-hand side of a [`TransactionInput::Key`].
fn resolve_output<Bs, H, Bk>(database: &BlockchainDatabase<Bs, H, Bk>, amount: Amount, global_index: u64) -> Option<OutputDescriptor>
where
    Bs: KeyValueStore<u32, BlockEntry>,
    H: KeyValueStore<u32, Hash>,
    Bk: KeyValueStore<Hash, u32>,
{
    let output_ref = database.output_index().get(amount, global_index).ok()?;
    let entry = database.get_by_height(output_ref.height).ok()??;
    let out_slot = output_ref.out_slot as usize;

    let (target, unlock_time) = if entry.block.base_transaction.hash() == output_ref.tx_hash {
        (entry.block.base_transaction.outputs.get(out_slot)?.target.clone(), entry.block.base_transaction.unlock_time)
    } else {
        let tx = entry.transactions.iter().find(|tx| tx.hash() == output_ref.tx_hash)?;
        (tx.outputs.get(out_slot)?.target.clone(), tx.unlock_time)
    };

    match target {
        TransactionTarget::Key(public_key) => Some(OutputDescriptor { public_key, unlock_height: unlock_time as u32 }),
        TransactionTarget::Multisig { .. } => None,
    }
}

/// Picks the widest difficulty-retargeting window any supported block version reads from, so one
/// walk of the block index always supplies enough trailing history regardless of which algorithm
/// `next_difficulty` ends up dispatching to.
fn max_difficulty_window(params: &ConsensusParams) -> usize {
    params
        .difficulty_window
        .max(params.difficulty_window_v2)
        .max(params.difficulty_window_v3)
        .max(params.difficulty_window_v4)
        .max(params.difficulty_window_v5)
}

pub struct Blockchain<Bs, H, Bk>
where
    Bs: KeyValueStore<u32, BlockEntry>,
    H: KeyValueStore<u32, Hash>,
    Bk: KeyValueStore<Hash, u32>,
{
    inner: Mutex<Inner<Bs, H, Bk>>,
    observers: ObserverList,
    config: EngineConfig,
    hasher: Box<dyn ProofOfWorkHasher>,
    shutdown: ShutdownSignal,
}

impl<Bs, H, Bk> Blockchain<Bs, H, Bk>
where
    Bs: KeyValueStore<u32, BlockEntry>,
    H: KeyValueStore<u32, Hash>,
    Bk: KeyValueStore<Hash, u32>,
{
    /// Opens the engine over `blocks`/`by_height`/`by_hash`, seeding `genesis` as height 0 if the
    /// store is empty. `genesis` is accepted on faith, the same way the reference node treats its
    /// hard-coded genesis block: no PoW, version or coinbase check applies to it.
    pub fn new(
        blocks: Bs,
        by_height: H,
        by_hash: Bk,
        config: EngineConfig,
        hasher: Box<dyn ProofOfWorkHasher>,
        shutdown: ShutdownSignal,
        genesis: Block,
    ) -> Result<Self, BlockchainError> {
        let database = BlockchainDatabase::new(blocks, by_height, by_hash, config.payment_id_index_enabled);
        let chain = Blockchain {
            inner: Mutex::new(Inner { database, mempool: Mempool::new(MempoolConfig::default()), alt_blocks: HashMap::new() }),
            observers: ObserverList::new(),
            config,
            hasher,
            shutdown,
        };
        let needs_genesis = chain.inner.lock().unwrap().database.tail().is_none();
        if needs_genesis {
            chain.seed_genesis(genesis)?;
        }
        Ok(chain)
    }

    fn seed_genesis(&self, genesis: Block) -> Result<(), BlockchainError> {
        let mut inner = self.inner.lock().unwrap();
        let cumulative_size = genesis.cumulative_size(&[]);
        let cumulative_generated_coins = genesis.base_transaction.total_output_amount();
        let entry = BlockEntry {
            height: 0,
            cumulative_size,
            cumulative_difficulty: 1,
            cumulative_generated_coins,
            block_difficulty: 1,
            transactions: Vec::new(),
            block: genesis,
        };
        inner.database.commit_block(entry)?;
        Ok(())
    }

    pub fn register_observer(&self, observer: Box<dyn BlockchainObserver>) {
        self.observers.register(observer);
    }

    pub fn tip_height(&self) -> Option<u32> {
        self.inner.lock().unwrap().database.tail().map(|(h, _)| h)
    }

    /// Advances mempool aging by one tick (§9 "Coroutine control flow": the engine exposes
    /// `tick(now)` instead of owning a timer or spawning its own sleep loop).
    pub fn tick(&self, now: u64) -> Result<(), BlockchainError> {
        if self.shutdown.is_triggered() {
            return Err(BlockchainError::ShuttingDown);
        }
        self.inner.lock().unwrap().mempool.tick(now);
        Ok(())
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutdown.is_triggered()
    }

    /// Validates `tx` structurally and against the current tip, then admits it to the pool (§4.G
    /// "Admission"). The engine is the only path a transaction reaches the pool through — there is
    /// no direct `Mempool` handle exposed to callers (§5 "Shared resources").
    pub fn add_transaction(&self, tx: Transaction, now: u64) -> Result<Hash, BlockchainError> {
        if self.shutdown.is_triggered() {
            return Err(BlockchainError::ShuttingDown);
        }
        let mut inner = self.inner.lock().unwrap();
        let params = &self.config.params;

        transaction_validators::validate_transaction_structure(&tx, params)?;
        let (height, _) = inner.database.tail().ok_or(ChainStorageError::HeightNotFound(0))?;
        let view = DbView { database: &inner.database, height };
        transaction_validators::validate_transaction_against_tip(&tx, &view)?;

        if let Some(fee) = tx.fee() {
            let minimum = minimum_total_fee(params, height, tx.extra.len());
            if fee < minimum {
                return Err(TransactionRejectionReason::FeeTooLow { actual: fee, minimum }.into());
            }
        }

        let tx_hash = inner.mempool.add(tx.clone(), now, false)?;
        self.observers.notify_transaction_added(&tx_hash, &tx);
        Ok(tx_hash)
    }

    /// Accepts, buffers as an alt candidate, or rejects `block` (§4.H). `transactions` must supply
    /// one body per hash in `block.transaction_hashes`, in the same order.
    pub fn add_block(&self, block: Block, transactions: Vec<Transaction>, now: u64) -> Result<AddBlockResult, BlockchainError> {
        if self.shutdown.is_triggered() {
            return Err(BlockchainError::ShuttingDown);
        }
        let mut inner = self.inner.lock().unwrap();
        self.add_block_impl(&mut inner, block, transactions, now)
    }

    fn add_block_impl(
        &self,
        inner: &mut Inner<Bs, H, Bk>,
        block: Block,
        transactions: Vec<Transaction>,
        now: u64,
    ) -> Result<AddBlockResult, BlockchainError> {
        let block_hash = block.hash();
        if inner.database.get_by_hash(&block_hash)?.is_some() || inner.alt_blocks.contains_key(&block_hash) {
            return Ok(AddBlockResult::AlreadyExists);
        }
        let (tip_height, tip_hash) = inner.database.tail().ok_or(ChainStorageError::HeightNotFound(0))?;

        if block.previous_block_hash == tip_hash {
            let entry = self.validate_candidate(inner, &block, transactions, tip_height, now)?;
            let height = entry.height;
            self.commit_and_notify(inner, entry)?;
            return Ok(AddBlockResult::Accepted { height });
        }

        let Some(parent) = self.lookup_entry(inner, &block.previous_block_hash)? else {
            return Err(BlockRejectionReason::BadParent(block.previous_block_hash).into());
        };

        let difficulty = self.validate_alt_header(inner, &block, &parent, now)?;
        let height = parent.height + 1;
        let cumulative_size = block.cumulative_size(&transactions);
        let cumulative_difficulty = parent.cumulative_difficulty + difficulty as u128;

        let alt_entry = BlockEntry {
            height,
            cumulative_size,
            cumulative_difficulty,
            cumulative_generated_coins: parent.cumulative_generated_coins,
            block_difficulty: difficulty,
            transactions,
            block,
        };
        inner.alt_blocks.insert(block_hash, alt_entry);

        let main_tip = inner.database.get_by_height(tip_height)?.ok_or(ChainStorageError::HeightNotFound(tip_height))?;
        if cumulative_difficulty > main_tip.cumulative_difficulty {
            self.reorganize(inner, block_hash, now)?;
            return Ok(AddBlockResult::Accepted { height });
        }
        Ok(AddBlockResult::AddedToAltChain { height })
    }

    /// Full acceptance check for a block whose parent is the chain it will be committed onto
    /// (§4.H step 2): version, timestamp, checkpoint, proof of work, size, every transaction, and
    /// the coinbase reward. Used both for ordinary direct-append and, during a reorg, to replay
    /// each alt block in turn onto the database the disconnect has just rewound.
    fn validate_candidate(
        &self,
        inner: &Inner<Bs, H, Bk>,
        block: &Block,
        transactions: Vec<Transaction>,
        parent_height: u32,
        now: u64,
    ) -> Result<BlockEntry, BlockchainError> {
        let params = &self.config.params;
        let height = parent_height + 1;
        let block_hash = block.hash();

        let checkpoint_conflict = inner.database.checkpoints().conflicts(height, &block_hash);
        if checkpoint_conflict {
            return Err(BlockRejectionReason::ChecksumMismatchAtCheckpoint { height }.into());
        }

        let expected_version = params.block_version_at(height);
        block_validators::validate_version(block, expected_version)?;

        if transactions.len() != block.transaction_hashes.len()
            || transactions.iter().zip(&block.transaction_hashes).any(|(tx, hash)| tx.hash() != *hash)
        {
            return Err(BlockRejectionReason::TransactionSetMismatch.into());
        }

        let (recent_timestamps, _) = self.history_window(inner, block.previous_block_hash, params.timestamp_check_window)?;
        block_validators::validate_timestamp(block.timestamp, &recent_timestamps, now, self.config.future_time_limit)?;

        let (window_timestamps, window_cumulative_difficulties) =
            self.history_window(inner, block.previous_block_hash, max_difficulty_window(params))?;
        let difficulty = next_difficulty(params, height, expected_version, &window_timestamps, &window_cumulative_difficulties);

        let pinned = inner.database.checkpoints().is_pinned(height, &block_hash);
        if !pinned {
            block_validators::validate_pow(block, difficulty, self.hasher.as_ref())?;
        }

        let cumulative_size = block.cumulative_size(&transactions);
        let median_size = self.median_block_size(inner, height, params.reward_blocks_window)?;
        block_validators::validate_size(cumulative_size, median_size)?;

        let view = DbView { database: &inner.database, height };
        let mut seen_key_images = std::collections::HashSet::new();
        for (index, tx) in transactions.iter().enumerate() {
            transaction_validators::validate_transaction_structure(tx, params)
                .map_err(|reason| BlockRejectionReason::BadInput { index, reason })?;
            transaction_validators::validate_transaction_against_tip(tx, &view)
                .map_err(|reason| BlockRejectionReason::BadInput { index, reason })?;
            for input in &tx.inputs {
                if let TransactionInput::Key { key_image, .. } = input {
                    if !seen_key_images.insert(*key_image) {
                        return Err(BlockRejectionReason::DoubleSpend(*key_image).into());
                    }
                }
            }
        }

        let total_fees: u64 = transactions.iter().filter_map(Transaction::fee).sum();
        let parent_entry = inner.database.get_by_height(parent_height)?.ok_or(ChainStorageError::HeightNotFound(parent_height))?;
        let reward = block_validators::validate_coinbase(
            &block.base_transaction,
            height,
            params,
            median_size,
            cumulative_size,
            parent_entry.cumulative_generated_coins,
            total_fees,
        )?;

        Ok(BlockEntry {
            height,
            cumulative_size,
            cumulative_difficulty: parent_entry.cumulative_difficulty + difficulty as u128,
            cumulative_generated_coins: parent_entry.cumulative_generated_coins + reward,
            block_difficulty: difficulty,
            transactions,
            block: block.clone(),
        })
    }

    /// The lightweight checks applied to an alt-chain candidate the moment it's received: version,
    /// timestamp, checkpoint conflict and proof of work. Transaction-level validation is deferred
    /// to [`Self::reorganize`] — this chain may never overtake main, and full validation against a
    /// not-yet-connected state is exactly what the replay step already does correctly.
    fn validate_alt_header(&self, inner: &Inner<Bs, H, Bk>, block: &Block, parent: &BlockEntry, now: u64) -> Result<u64, BlockchainError> {
        let params = &self.config.params;
        let height = parent.height + 1;
        let block_hash = block.hash();

        let checkpoints = inner.database.checkpoints();
        if checkpoints.conflicts(height, &block_hash) {
            return Err(BlockRejectionReason::ChecksumMismatchAtCheckpoint { height }.into());
        }
        let pinned = checkpoints.is_pinned(height, &block_hash);
        drop(checkpoints);

        let expected_version = params.block_version_at(height);
        block_validators::validate_version(block, expected_version)?;

        let (recent_timestamps, _) = self.history_window(inner, block.previous_block_hash, params.timestamp_check_window)?;
        block_validators::validate_timestamp(block.timestamp, &recent_timestamps, now, self.config.future_time_limit)?;

        let (window_timestamps, window_cumulative_difficulties) =
            self.history_window(inner, block.previous_block_hash, max_difficulty_window(params))?;
        let difficulty = next_difficulty(params, height, expected_version, &window_timestamps, &window_cumulative_difficulties);

        if !pinned {
            block_validators::validate_pow(block, difficulty, self.hasher.as_ref())?;
        }
        Ok(difficulty)
    }

    /// Disconnects main down to the fork point and replays the alt chain ending at `alt_tip_hash`
    /// block by block through [`Self::validate_candidate`] — the same function direct-append uses
    /// (§4.H step 3b). Any failure mid-replay unwinds back to exactly the main chain that was
    /// there before the reorg was attempted.
    fn reorganize(&self, inner: &mut Inner<Bs, H, Bk>, alt_tip_hash: Hash, now: u64) -> Result<(), BlockchainError> {
        let mut alt_chain = Vec::new();
        let mut current = alt_tip_hash;
        let fork_height = loop {
            if let Some(entry) = inner.database.get_by_hash(&current)? {
                break entry.height;
            }
            let entry = inner.alt_blocks.get(&current).cloned().ok_or(ChainStorageError::HashNotFound(current))?;
            let parent_hash = entry.block.previous_block_hash;
            alt_chain.push(entry);
            current = parent_hash;
        };
        alt_chain.reverse();

        let (main_tip_height, _) = inner.database.tail().ok_or(ChainStorageError::HeightNotFound(0))?;
        let depth = (main_tip_height - fork_height) as u64;
        if !self.config.allow_deep_reorg && depth > self.config.reorg_depth_limit {
            return Err(BlockchainError::ReorgTooDeep { depth, limit: self.config.reorg_depth_limit });
        }

        let mut disconnected = Vec::new();
        while inner.database.tail().map(|(h, _)| h) != Some(fork_height) {
            disconnected.push(inner.database.disconnect_tip()?);
        }

        let mut committed = Vec::new();
        for alt_entry in &alt_chain {
            let parent_height = alt_entry.height - 1;
            match self.validate_candidate(inner, &alt_entry.block, alt_entry.transactions.clone(), parent_height, now) {
                Ok(entry) => {
                    inner.database.commit_block(entry.clone())?;
                    committed.push(entry);
                }
                Err(err) => {
                    for _ in &committed {
                        inner.database.disconnect_tip()?;
                    }
                    for entry in disconnected.into_iter().rev() {
                        inner.database.commit_block(entry)?;
                    }
                    return Err(err);
                }
            }
        }

        for entry in &alt_chain {
            inner.alt_blocks.remove(&entry.block_hash());
        }
        for entry in disconnected.iter().rev() {
            inner.mempool.on_block_disconnected(entry.transactions.clone(), now);
            self.observers.notify_block_disconnected(entry);
        }
        for entry in &committed {
            let spent = spent_key_images(entry);
            inner.mempool.on_block_accepted(&entry.block.transaction_hashes, &spent);
            self.observers.notify_block_added(entry);
        }
        Ok(())
    }

    fn commit_and_notify(&self, inner: &mut Inner<Bs, H, Bk>, entry: BlockEntry) -> Result<(), BlockchainError> {
        let spent = spent_key_images(&entry);
        inner.database.commit_block(entry.clone())?;
        inner.mempool.on_block_accepted(&entry.block.transaction_hashes, &spent);
        self.observers.notify_block_added(&entry);
        Ok(())
    }

    /// Looks a block up by hash across both the committed main chain and the alt-block buffer —
    /// the same "search main, then alt" pattern the reference node's `getBlock` uses.
    fn lookup_entry(&self, inner: &Inner<Bs, H, Bk>, hash: &Hash) -> Result<Option<BlockEntry>, ChainStorageError> {
        if let Some(entry) = inner.alt_blocks.get(hash) {
            return Ok(Some(entry.clone()));
        }
        inner.database.get_by_hash(hash)
    }

    /// Walks back from `start_hash` (main or alt) collecting up to `window` timestamps and
    /// cumulative difficulties, oldest first, for the difficulty retargeting and timestamp-median
    /// checks. `u128` cumulative difficulties are truncated to `u64`: the retargeting algorithms
    /// only ever difference two window entries, and the true difference between any two entries
    /// within one window never approaches `u64::MAX` in practice.
    fn history_window(&self, inner: &Inner<Bs, H, Bk>, start_hash: Hash, window: usize) -> Result<(Vec<u64>, Vec<u64>), ChainStorageError> {
        let mut timestamps = Vec::new();
        let mut cumulative_difficulties = Vec::new();
        let mut current = Some(start_hash);
        while let Some(hash) = current {
            if timestamps.len() >= window {
                break;
            }
            let Some(entry) = self.lookup_entry(inner, &hash)? else { break };
            timestamps.push(entry.block.timestamp);
            cumulative_difficulties.push(entry.cumulative_difficulty as u64);
            current = if entry.height == 0 { None } else { Some(entry.block.previous_block_hash) };
        }
        timestamps.reverse();
        cumulative_difficulties.reverse();
        Ok((timestamps, cumulative_difficulties))
    }

    /// The running median block size over the `window` main-chain blocks immediately below
    /// `height` (§4.C "Size penalty"). Deliberately main-chain only: during a reorg replay this
    /// reads whatever the disconnect-then-replay has already committed at each step, which is
    /// exactly the history the candidate being replayed would have seen had it arrived directly.
    fn median_block_size(&self, inner: &Inner<Bs, H, Bk>, height: u32, window: usize) -> Result<usize, ChainStorageError> {
        let mut sizes = Vec::new();
        let mut cursor = if height == 0 { None } else { Some(height - 1) };
        while let Some(h) = cursor {
            if sizes.len() >= window {
                break;
            }
            let Some(entry) = inner.database.get_by_height(h)? else { break };
            sizes.push(entry.cumulative_size);
            cursor = if h == 0 { None } else { Some(h - 1) };
        }
        if sizes.is_empty() {
            return Ok(0);
        }
        sizes.sort_unstable();
        Ok(sizes[sizes.len() / 2])
    }

    /// Negotiates a common ancestor with a peer's sparse chain (§4.D): the first `max` locally
    /// known hashes starting just after the deepest hash the peer already has.
    pub fn find_blockchain_supplement(&self, remote_sparse: &[Hash], max: usize) -> Result<(u32, Vec<Hash>), BlockchainError> {
        let inner = self.inner.lock().unwrap();
        let index = inner.database.block_index();
        let first_unknown = index.find_supplement(remote_sparse)?;
        let start_height = if first_unknown == 0 {
            0
        } else {
            index.get_height(&remote_sparse[first_unknown - 1])?.map(|h| h + 1).unwrap_or(0)
        };

        let mut hashes = Vec::new();
        let mut height = start_height;
        while hashes.len() < max {
            match index.get_hash(height)? {
                Some(hash) => hashes.push(hash),
                None => break,
            }
            height += 1;
        }
        Ok((start_height, hashes))
    }

    /// Draws decoy global indices for each requested amount (§4.H, mixin selection), returning the
    /// one-time public key behind each chosen index so a wallet can assemble a ring without a
    /// second round trip.
    pub fn random_outputs_for_amounts(&self, requests: &[(Amount, usize)]) -> Vec<(Amount, Vec<(u64, PublicKey)>)> {
        let inner = self.inner.lock().unwrap();
        let mut rng = OsRng;
        requests
            .iter()
            .map(|(amount, count)| {
                let n = inner.database.output_index().len_for_amount(*amount);
                let indices = sample_indices(n, *count, &mut rng);
                let outputs = indices
                    .into_iter()
                    .filter_map(|index| resolve_output(&inner.database, *amount, index).map(|d| (index, d.public_key)))
                    .collect();
                (*amount, outputs)
            })
            .collect()
    }

    /// The global output indices a confirmed transaction's outputs were assigned, recovered by
    /// scanning each output's amount list for the matching `(tx_hash, slot)` pair. `height` is the
    /// block the caller already knows the transaction confirmed in.
    pub fn get_outputs_global_indices(&self, height: u32, tx_hash: &Hash) -> Result<Vec<u64>, BlockchainError> {
        let inner = self.inner.lock().unwrap();
        let entry = inner.database.get_by_height(height)?.ok_or(ChainStorageError::HeightNotFound(height))?;
        let tx = if entry.block.base_transaction.hash() == *tx_hash {
            &entry.block.base_transaction
        } else {
            entry.transactions.iter().find(|tx| tx.hash() == *tx_hash).ok_or(ChainStorageError::HashNotFound(*tx_hash))?
        };

        let mut indices = Vec::with_capacity(tx.outputs.len());
        for (slot, output) in tx.outputs.iter().enumerate() {
            let count = inner.database.output_index().len_for_amount(output.amount);
            let mut found = None;
            for global_index in 0..count {
                let output_ref = inner.database.output_index().get(output.amount, global_index)?;
                if output_ref.tx_hash == *tx_hash && output_ref.out_slot as usize == slot {
                    found = Some(global_index);
                    break;
                }
            }
            indices.push(found.ok_or(ChainStorageError::HashNotFound(*tx_hash))?);
        }
        Ok(indices)
    }

    pub fn get_transactions_by_payment_id(&self, payment_id: &Hash) -> Vec<Hash> {
        self.inner.lock().unwrap().database.output_index().transactions_by_payment_id(payment_id)
    }
}

fn spent_key_images(entry: &BlockEntry) -> Vec<Hash> {
    entry.transactions.iter().flat_map(|tx| tx.inputs.iter().filter_map(TransactionInput::key_image).copied()).collect()
}

#[cfg(test)]
mod test {
    use ringnote_common::{NetworkConfig, NodeConfig};
    use ringnote_shutdown::Shutdown;
    use ringnote_storage::MemoryKeyValueStore;

    use super::*;
    use crate::{
        crypto::{keys::generate_keypair, pow::ReferencePowHasher},
        currency::ConsensusParams,
        transactions::test_helpers::{build_coinbase_transaction, build_signed_transaction, build_spendable_output, TestAccount},
        transactions::TransactionOutput,
    };

    type TestChain = Blockchain<MemoryKeyValueStore<u32, BlockEntry>, MemoryKeyValueStore<u32, Hash>, MemoryKeyValueStore<Hash, u32>>;

    fn test_config() -> EngineConfig {
        EngineConfig {
            params: ConsensusParams {
                difficulty_floor: 1,
                timestamp_check_window: 0,
                ..ConsensusParams::test_net()
            },
            allow_deep_reorg: false,
            reorg_depth_limit: 1000,
            future_time_limit: 7200,
            payment_id_index_enabled: false,
        }
    }

    fn genesis_block(reward: u64) -> Block {
        let account = TestAccount::new();
        let (_, tx_secret) = crate::crypto::keys::generate_keypair(&mut rand::rngs::OsRng);
        let coinbase = build_coinbase_transaction(&account, 0, reward, &tx_secret);
        Block {
            major_version: 1,
            minor_version: 0,
            timestamp: 1_700_000_000,
            previous_block_hash: Hash::zero(),
            nonce: 0,
            base_transaction: coinbase,
            transaction_hashes: vec![],
        }
    }

    fn new_chain() -> TestChain {
        new_chain_with_config(test_config())
    }

    fn new_chain_with_config(config: EngineConfig) -> TestChain {
        let shutdown = Shutdown::new();
        Blockchain::new(
            MemoryKeyValueStore::new(),
            MemoryKeyValueStore::new(),
            MemoryKeyValueStore::new(),
            config,
            Box::new(ReferencePowHasher),
            shutdown.to_signal(),
            genesis_block(1_000_000),
        )
        .unwrap()
    }

    /// `test_config` with coinbase maturity dropped to zero, so a reorg scenario doesn't need to
    /// mine sixty blocks just to unlock the output it spends.
    fn reorg_test_config() -> EngineConfig {
        EngineConfig {
            params: ConsensusParams { mined_money_unlock_window: 0, ..test_config().params },
            ..test_config()
        }
    }

    /// Builds and mines (by brute-force nonce search against the reference hasher) a valid
    /// coinbase-only block extending whatever the chain's current tip is.
    fn mine_next_block(chain: &TestChain, timestamp: u64) -> Block {
        let inner = chain.inner.lock().unwrap();
        let (tip_height, tip_hash) = inner.database.tail().unwrap();
        let height = tip_height + 1;
        let params = &chain.config.params;
        let parent_entry = inner.database.get_by_height(tip_height).unwrap().unwrap();

        let (timestamps, cumulative_difficulties) = chain.history_window(&inner, tip_hash, max_difficulty_window(params)).unwrap();
        let version = params.block_version_at(height);
        let difficulty = next_difficulty(params, height, version, &timestamps, &cumulative_difficulties);
        drop(inner);

        let reward = block_reward(params, height, 0, 0, parent_entry.cumulative_generated_coins, 0).unwrap().reward;
        let account = TestAccount::new();
        let (_, tx_secret) = crate::crypto::keys::generate_keypair(&mut rand::rngs::OsRng);
        let mut coinbase = build_coinbase_transaction(&account, height, reward, &tx_secret);
        coinbase.unlock_time = height as u64 + params.mined_money_unlock_window;

        let mut block = Block {
            major_version: version as u8 + 1,
            minor_version: 0,
            timestamp,
            previous_block_hash: tip_hash,
            nonce: 0,
            base_transaction: coinbase,
            transaction_hashes: vec![],
        };
        loop {
            let hash = chain.hasher.pow_hash(&block.hashing_blob());
            if crate::crypto::pow::meets_target(&hash, difficulty) {
                break;
            }
            block.nonce += 1;
        }
        block
    }

    /// Like `mine_next_block`, but extends an explicit `parent_hash` (main or buffered alt) rather
    /// than always reading the current tip, so a test can build a competing branch without the
    /// engine's own bookkeeping getting in the way. `coinbase_account`/`coinbase_tx_secret` control
    /// who the new block's reward pays, and `transactions` are embedded as the block's body.
    fn mine_block_paying(
        chain: &TestChain,
        parent_hash: Hash,
        timestamp: u64,
        coinbase_account: &TestAccount,
        coinbase_tx_secret: &crate::crypto::keys::SecretKey,
        transactions: Vec<Transaction>,
    ) -> Block {
        let inner = chain.inner.lock().unwrap();
        let params = &chain.config.params;
        let parent_entry = chain.lookup_entry(&inner, &parent_hash).unwrap().unwrap();
        let height = parent_entry.height + 1;

        let (timestamps, cumulative_difficulties) = chain.history_window(&inner, parent_hash, max_difficulty_window(params)).unwrap();
        let version = params.block_version_at(height);
        let difficulty = next_difficulty(params, height, version, &timestamps, &cumulative_difficulties);
        drop(inner);

        let total_fees: u64 = transactions.iter().filter_map(Transaction::fee).sum();
        let reward = block_reward(params, height, 0, 0, parent_entry.cumulative_generated_coins, total_fees).unwrap().reward;
        let mut coinbase = build_coinbase_transaction(coinbase_account, height, reward, coinbase_tx_secret);
        coinbase.unlock_time = height as u64 + params.mined_money_unlock_window;

        let transaction_hashes = transactions.iter().map(Transaction::hash).collect();
        let mut block = Block {
            major_version: version as u8 + 1,
            minor_version: 0,
            timestamp,
            previous_block_hash: parent_hash,
            nonce: 0,
            base_transaction: coinbase,
            transaction_hashes,
        };
        loop {
            let hash = chain.hasher.pow_hash(&block.hashing_blob());
            if crate::crypto::pow::meets_target(&hash, difficulty) {
                break;
            }
            block.nonce += 1;
        }
        block
    }

    #[test]
    fn genesis_is_seeded_once_on_an_empty_store() {
        let chain = new_chain();
        assert_eq!(chain.tip_height(), Some(0));
    }

    #[test]
    fn a_valid_direct_append_block_is_accepted() {
        let chain = new_chain();
        let block = mine_next_block(&chain, 1_700_000_100);
        let result = chain.add_block(block, vec![], 1_700_000_100).unwrap();
        assert_eq!(result, AddBlockResult::Accepted { height: 1 });
        assert_eq!(chain.tip_height(), Some(1));
    }

    #[test]
    fn a_block_already_on_the_chain_is_reported_as_already_existing() {
        let chain = new_chain();
        let block = mine_next_block(&chain, 1_700_000_100);
        chain.add_block(block.clone(), vec![], 1_700_000_100).unwrap();
        let result = chain.add_block(block, vec![], 1_700_000_100).unwrap();
        assert_eq!(result, AddBlockResult::AlreadyExists);
    }

    #[test]
    fn an_unknown_parent_is_rejected_without_buffering() {
        let chain = new_chain();
        let mut block = mine_next_block(&chain, 1_700_000_100);
        block.previous_block_hash = Hash([0xAB; 32]);
        let err = chain.add_block(block, vec![], 1_700_000_100).unwrap_err();
        assert!(matches!(err, BlockchainError::BlockRejected(BlockRejectionReason::BadParent(_))));
        assert!(chain.inner.lock().unwrap().alt_blocks.is_empty());
    }

    #[test]
    fn node_config_based_chain_starts_on_testnet_floor() {
        let node = NodeConfig { network: NetworkConfig::TestNet, ..NodeConfig::default() };
        let config = EngineConfig::from_node_config(&node);
        assert_eq!(config.params.difficulty_floor, 1);
    }

    /// Builds a one-block-deep light chain whose second block spends a mature output, then buffers
    /// and grows a heavier alt chain from the same fork point until it overtakes main (§4.H
    /// scenario (b)). Checks that the switch rolls the spent key image back out of the database and
    /// lands the displaced spend back in the mempool, kept-by-block.
    #[test]
    fn a_reorg_switches_to_the_heavier_alt_chain_and_restores_mempool_entries() {
        let chain = new_chain_with_config(reorg_test_config());
        let genesis_hash = chain.inner.lock().unwrap().database.tail().unwrap().1;

        // Height 1, common to both branches. Its coinbase is the output the light branch spends.
        let spender = TestAccount::new();
        let (_, spender_tx_secret) = generate_keypair(&mut rand::rngs::OsRng);
        let block1 = mine_block_paying(&chain, genesis_hash, 1_700_000_100, &spender, &spender_tx_secret, vec![]);
        let block1_hash = block1.hash();
        assert_eq!(chain.add_block(block1, vec![], 1_700_000_100).unwrap(), AddBlockResult::Accepted { height: 1 });

        let reward_1 = chain.config.params.genesis_reward;
        let spendable = build_spendable_output(&spender, reward_1, &spender_tx_secret, 0);
        let real_key = match &spendable.output.target {
            crate::transactions::TransactionTarget::Key(key) => *key,
            crate::transactions::TransactionTarget::Multisig { .. } => unreachable!("coinbase outputs are never multisig"),
        };
        let fee = 1_000;
        let (recipient_key, _) = generate_keypair(&mut rand::rngs::OsRng);
        let outputs = vec![TransactionOutput { amount: reward_1 - fee, target: crate::transactions::TransactionTarget::Key(recipient_key) }];
        let spend_tx = build_signed_transaction(&spendable, &[real_key], 0, vec![0], reward_1, outputs);
        let spend_tx_hash = spend_tx.hash();

        chain.add_transaction(spend_tx.clone(), 1_700_000_150).unwrap();
        assert!(chain.inner.lock().unwrap().mempool.contains(&spend_tx_hash));

        // Height 2 on the light branch: commits the spend directly onto main.
        let (_, miner_secret) = generate_keypair(&mut rand::rngs::OsRng);
        let block2_light =
            mine_block_paying(&chain, block1_hash, 1_700_000_200, &TestAccount::new(), &miner_secret, vec![spend_tx.clone()]);
        let result = chain.add_block(block2_light, vec![spend_tx.clone()], 1_700_000_200).unwrap();
        assert_eq!(result, AddBlockResult::Accepted { height: 2 });
        assert!(!chain.inner.lock().unwrap().mempool.contains(&spend_tx_hash));
        assert!(chain.inner.lock().unwrap().database.key_images().contains(&spendable.key_image));

        // A two-block alt branch forked from block1, never including the spend. Its second block
        // gives it more cumulative difficulty than the light branch's single extra block.
        let (_, alt_secret_1) = generate_keypair(&mut rand::rngs::OsRng);
        let block2_alt = mine_block_paying(&chain, block1_hash, 1_700_000_201, &TestAccount::new(), &alt_secret_1, vec![]);
        let block2_alt_hash = block2_alt.hash();
        assert_eq!(chain.add_block(block2_alt, vec![], 1_700_000_201).unwrap(), AddBlockResult::AddedToAltChain { height: 2 });
        assert_eq!(chain.tip_height(), Some(2));

        let (_, alt_secret_2) = generate_keypair(&mut rand::rngs::OsRng);
        let block3_alt = mine_block_paying(&chain, block2_alt_hash, 1_700_000_202, &TestAccount::new(), &alt_secret_2, vec![]);
        let result = chain.add_block(block3_alt, vec![], 1_700_000_202).unwrap();
        assert_eq!(result, AddBlockResult::Accepted { height: 3 });

        // The switch disconnected block2_light: its key image is free again and its spend is back
        // in the pool, kept-by-block rather than dropped.
        assert_eq!(chain.tip_height(), Some(3));
        assert!(!chain.inner.lock().unwrap().database.key_images().contains(&spendable.key_image));
        let inner = chain.inner.lock().unwrap();
        let entry = inner.mempool.get(&spend_tx_hash).expect("the disconnected spend should have been requeued into the mempool");
        assert!(entry.kept_by_block);
    }
}
