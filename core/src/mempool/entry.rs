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

//! A single mempool entry (§4.G): the transaction plus everything the pool needs to order, evict
//! and age it without re-deriving facts from the transaction body on every pass.

use crate::transactions::Transaction;

#[derive(Debug, Clone)]
pub struct MempoolEntry {
    pub transaction: Transaction,
    pub blob_size: usize,
    pub fee: u64,
    pub receive_time: u64,
    /// Set when this entry was re-injected by a block disconnect rather than received fresh; it
    /// extends its TTL and is exempt from the key-image-collision admission check (the network may
    /// legitimately reorg a transaction back in alongside another spending the same image).
    pub kept_by_block: bool,
    /// Height of the tip this entry was last validated against, so the pool can skip
    /// re-validating an entry whose watermark is already current.
    pub max_used_block: Option<u32>,
    /// Height of the tip this entry last failed validation against, so the pool doesn't hammer a
    /// known-bad entry every time the tip advances without a reason to expect it now passes.
    pub last_failed_block: Option<u32>,
}

impl MempoolEntry {
    pub fn new(transaction: Transaction, receive_time: u64, kept_by_block: bool) -> Self {
        let blob_size = transaction.blob_size();
        let fee = transaction.fee().unwrap_or(0);
        MempoolEntry {
            transaction,
            blob_size,
            fee,
            receive_time,
            kept_by_block,
            max_used_block: None,
            last_failed_block: None,
        }
    }

    pub fn fee_per_byte(&self) -> f64 {
        if self.blob_size == 0 {
            0.0
        } else {
            self.fee as f64 / self.blob_size as f64
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::transactions::test_helpers::{build_coinbase_transaction, TestAccount};

    #[test]
    fn new_entry_derives_blob_size_and_fee() {
        let account = TestAccount::new();
        let (_, tx_secret) = crate::crypto::keys::generate_keypair(&mut rand::rngs::OsRng);
        let tx = build_coinbase_transaction(&account, 1, 1_000_000, &tx_secret);
        let entry = MempoolEntry::new(tx.clone(), 1_700_000_000, false);
        assert_eq!(entry.blob_size, tx.blob_size());
        assert_eq!(entry.fee, 0);
        assert!(!entry.kept_by_block);
    }
}
