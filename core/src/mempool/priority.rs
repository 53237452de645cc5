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

//! Block-template assembly order (§4.G): fee-per-byte descending, then blob size ascending, then
//! receive time ascending, with the transaction hash as a final deterministic tiebreaker so
//! independent nodes building from the same pool pick the same transactions in the same order.

use std::cmp::Ordering;

use crate::types::Hash;

use super::entry::MempoolEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityKey {
    /// Stored pre-scaled so it can be compared with integer `Ord` instead of `f64`, which has no
    /// total order: fee-per-byte scaled by 10^9 and truncated.
    fee_per_byte_scaled: u64,
    blob_size: usize,
    receive_time: u64,
    tx_hash: Hash,
}

impl PriorityKey {
    pub fn new(entry: &MempoolEntry, tx_hash: Hash) -> Self {
        PriorityKey {
            fee_per_byte_scaled: (entry.fee_per_byte() * 1_000_000_000.0) as u64,
            blob_size: entry.blob_size,
            receive_time: entry.receive_time,
            tx_hash,
        }
    }
}

impl PartialOrd for PriorityKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PriorityKey {
    /// Higher fee-per-byte sorts first; among equal fee-per-byte, smaller blob size sorts first;
    /// among equal size, earlier receive time sorts first; the hash breaks any remaining tie.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .fee_per_byte_scaled
            .cmp(&self.fee_per_byte_scaled)
            .then_with(|| self.blob_size.cmp(&other.blob_size))
            .then_with(|| self.receive_time.cmp(&other.receive_time))
            .then_with(|| self.tx_hash.cmp(&other.tx_hash))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::transactions::test_helpers::{build_coinbase_transaction, TestAccount};

    fn entry_with(fee: u64, blob_size: usize, receive_time: u64) -> MempoolEntry {
        let account = TestAccount::new();
        let (_, tx_secret) = crate::crypto::keys::generate_keypair(&mut rand::rngs::OsRng);
        let tx = build_coinbase_transaction(&account, 1, 1_000_000, &tx_secret);
        let mut e = MempoolEntry::new(tx, receive_time, false);
        e.fee = fee;
        e.blob_size = blob_size;
        e
    }

    #[test]
    fn higher_fee_per_byte_sorts_first() {
        let high = PriorityKey::new(&entry_with(1000, 100, 0), Hash([1; 32]));
        let low = PriorityKey::new(&entry_with(10, 100, 0), Hash([2; 32]));
        let mut keys = vec![low, high];
        keys.sort();
        assert_eq!(keys[0], high);
    }

    #[test]
    fn equal_fee_per_byte_prefers_smaller_blob_then_earlier_receipt() {
        let small = PriorityKey::new(&entry_with(200, 100, 5), Hash([1; 32]));
        let big = PriorityKey::new(&entry_with(400, 200, 0), Hash([2; 32]));
        let mut keys = vec![big, small];
        keys.sort();
        assert_eq!(keys[0], small);
    }
}
