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

//! The block data model (§3, "Block") and its hashing-blob construction. Versions 2 and 3 embed a
//! parent merge-mining block in the blob; merge mining itself is out of scope for this chain, so
//! those versions hash the same fields as v1 with their version byte — a deployment that needs
//! real merge-mining compatibility replaces just this function.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::{
    codec::VarInt,
    transactions::Transaction,
    types::Hash,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct Block {
    pub major_version: u8,
    pub minor_version: u8,
    pub timestamp: u64,
    pub previous_block_hash: Hash,
    pub nonce: u32,
    pub base_transaction: Transaction,
    /// Hashes of the non-coinbase transactions this block includes, in the order their global
    /// output indices were assigned (§4.H step 2g).
    pub transaction_hashes: Vec<Hash>,
}

impl Block {
    /// The canonical "hashing blob": header fields plus the base transaction's prefix hash and the
    /// Merkle-free transaction count and hash list, borsh-encoded. CryptoNight (or any other PoW
    /// hasher) operates on this blob via [`crate::crypto::pow::ProofOfWorkHasher`]; the engine never
    /// inspects its internal structure itself.
    pub fn hashing_blob(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.push(self.major_version);
        buf.push(self.minor_version);
        crate::codec::varint::write_varint(self.timestamp, &mut buf);
        buf.extend_from_slice(self.previous_block_hash.as_bytes());
        buf.extend_from_slice(&self.nonce.to_le_bytes());
        buf.extend_from_slice(self.base_transaction.hash().as_bytes());
        crate::codec::varint::write_varint(self.transaction_hashes.len() as u64, &mut buf);
        for hash in &self.transaction_hashes {
            buf.extend_from_slice(hash.as_bytes());
        }
        buf
    }

    /// The block identity hash: `keccak256(hashing_blob)`. Distinct from the PoW hash, which is a
    /// slow hash of the same blob used only for difficulty comparison.
    pub fn hash(&self) -> Hash {
        Hash(ringnote_hashing::keccak256(&self.hashing_blob()))
    }

    /// The block's cumulative size: base transaction plus every listed transaction's blob size.
    /// `child_transactions` must be supplied in the same order as `transaction_hashes`; the caller
    /// (chain_storage) is the one with access to the transaction bodies.
    pub fn cumulative_size(&self, child_transactions: &[Transaction]) -> usize {
        self.base_transaction.blob_size() + child_transactions.iter().map(Transaction::blob_size).sum::<usize>()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct BlockEntry {
    pub block: Block,
    pub height: u32,
    pub cumulative_size: usize,
    pub cumulative_difficulty: u128,
    pub cumulative_generated_coins: u64,
    pub block_difficulty: u64,
    /// The full bodies of every non-coinbase transaction this block includes, same order as
    /// `block.transaction_hashes`.
    pub transactions: Vec<Transaction>,
}

impl BlockEntry {
    pub fn block_hash(&self) -> Hash {
        self.block.hash()
    }
}

/// A stand-in for the varint-sized transaction count prefix used by [`Block::hashing_blob`],
/// exposed so callers building a blob incrementally (e.g. a miner iterating nonces) don't need to
/// reconstruct the whole struct each time.
pub fn transaction_count_prefix(count: usize) -> VarInt {
    VarInt(count as u64)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::transactions::test_helpers::{build_coinbase_transaction, TestAccount};

    fn sample_block() -> Block {
        let account = TestAccount::new();
        let (_, tx_secret) = crate::crypto::keys::generate_keypair(&mut rand::rngs::OsRng);
        let coinbase = build_coinbase_transaction(&account, 1, 1_000_000, &tx_secret);
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

    #[test]
    fn hash_is_deterministic_and_changes_with_nonce() {
        let block = sample_block();
        let hash_a = block.hash();
        let hash_b = sample_block().hash();
        assert_ne!(hash_a, hash_b, "independent coinbase keys should yield different block hashes");

        let mut same_block = block.clone();
        assert_eq!(same_block.hash(), block.hash());
        same_block.nonce += 1;
        assert_ne!(same_block.hash(), block.hash());
    }

    #[test]
    fn cumulative_size_counts_base_and_child_transactions() {
        let block = sample_block();
        let base_only = block.cumulative_size(&[]);
        assert_eq!(base_only, block.base_transaction.blob_size());
    }
}
