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

//! Per-amount global output indices (§4.E), grounded on `Blockchain.h`'s `outputs_container
//! m_outputs` (an `amount -> vector<(tx, out)>` map whose insertion order is the on-chain global
//! index). A parallel used-flag table covers multisig outputs, which are spent whole rather than
//! through a ring.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::error::ChainStorageError;
use crate::types::{Amount, Hash};

/// One entry in an amount's global output list: which transaction produced it and at which output
/// slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct OutputRef {
    pub tx_hash: Hash,
    pub out_slot: u16,
    /// Height of the block that produced this output, needed to evaluate unlock windows.
    pub height: u32,
}

/// Maps `amount -> ordered output list` and, separately, `amount -> (index -> used)` for
/// multisig outputs. Held entirely in memory: §10 describes this table as "rebuildable from the
/// canonical sequence at startup", so durability is the block sequence's job, not this index's.
#[derive(Default)]
pub struct OutputIndex {
    by_amount: std::sync::RwLock<HashMap<Amount, Vec<OutputRef>>>,
    multisig_used: std::sync::RwLock<HashMap<(Amount, u64), bool>>,
    /// Optional secondary index: a 32-byte payment id (extracted from `tx.extra`) to the set of
    /// transaction hashes carrying it. Off by default (§4.E).
    payment_id_index: std::sync::RwLock<Option<HashMap<Hash, Vec<Hash>>>>,
}

impl OutputIndex {
    pub fn new(payment_id_index_enabled: bool) -> Self {
        OutputIndex {
            by_amount: std::sync::RwLock::new(HashMap::new()),
            multisig_used: std::sync::RwLock::new(HashMap::new()),
            payment_id_index: std::sync::RwLock::new(if payment_id_index_enabled { Some(HashMap::new()) } else { None }),
        }
    }

    /// Appends one output of `amount`, returning its freshly assigned global index.
    pub fn push(&self, amount: Amount, output_ref: OutputRef) -> u64 {
        let mut map = self.by_amount.write().unwrap();
        let list = map.entry(amount).or_default();
        list.push(output_ref);
        (list.len() - 1) as u64
    }

    pub fn get(&self, amount: Amount, index: u64) -> Result<OutputRef, ChainStorageError> {
        let map = self.by_amount.read().unwrap();
        map.get(&amount)
            .and_then(|list| list.get(index as usize).copied())
            .ok_or(ChainStorageError::OutputIndexNotFound { amount, index })
    }

    pub fn len_for_amount(&self, amount: Amount) -> u64 {
        self.by_amount.read().unwrap().get(&amount).map(Vec::len).unwrap_or(0) as u64
    }

    /// Revokes the most recently assigned global index for `amount`; called when the block that
    /// produced it is disconnected during a reorg. Panics if called out of LIFO order — a caller
    /// bug, not a runtime condition.
    pub fn pop(&self, amount: Amount) -> Option<OutputRef> {
        self.by_amount.write().unwrap().get_mut(&amount).and_then(Vec::pop)
    }

    pub fn register_multisig_output(&self, amount: Amount, index: u64) {
        self.multisig_used.write().unwrap().insert((amount, index), false);
    }

    pub fn is_multisig_output_used(&self, amount: Amount, index: u64) -> Result<bool, ChainStorageError> {
        self.multisig_used
            .read()
            .unwrap()
            .get(&(amount, index))
            .copied()
            .ok_or(ChainStorageError::MultisigOutputNotFound { amount, index })
    }

    pub fn mark_multisig_output_used(&self, amount: Amount, index: u64, used: bool) -> Result<(), ChainStorageError> {
        let mut map = self.multisig_used.write().unwrap();
        let entry = map.get_mut(&(amount, index)).ok_or(ChainStorageError::MultisigOutputNotFound { amount, index })?;
        *entry = used;
        Ok(())
    }

    pub fn index_payment_id(&self, payment_id: Hash, tx_hash: Hash) {
        if let Some(index) = self.payment_id_index.write().unwrap().as_mut() {
            index.entry(payment_id).or_default().push(tx_hash);
        }
    }

    pub fn transactions_by_payment_id(&self, payment_id: &Hash) -> Vec<Hash> {
        self.payment_id_index
            .read()
            .unwrap()
            .as_ref()
            .and_then(|index| index.get(payment_id).cloned())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn output_ref(height: u32) -> OutputRef {
        OutputRef {
            tx_hash: Hash::zero(),
            out_slot: 0,
            height,
        }
    }

    #[test]
    fn push_assigns_increasing_global_indices() {
        let index = OutputIndex::new(false);
        assert_eq!(index.push(100, output_ref(1)), 0);
        assert_eq!(index.push(100, output_ref(2)), 1);
        assert_eq!(index.len_for_amount(100), 2);
        assert_eq!(index.get(100, 1).unwrap().height, 2);
    }

    #[test]
    fn pop_revokes_the_most_recent_index() {
        let index = OutputIndex::new(false);
        index.push(50, output_ref(1));
        index.push(50, output_ref(2));
        assert_eq!(index.pop(50).unwrap().height, 2);
        assert_eq!(index.len_for_amount(50), 1);
    }

    #[test]
    fn multisig_outputs_track_used_flag() {
        let index = OutputIndex::new(false);
        index.register_multisig_output(10, 0);
        assert!(!index.is_multisig_output_used(10, 0).unwrap());
        index.mark_multisig_output_used(10, 0, true).unwrap();
        assert!(index.is_multisig_output_used(10, 0).unwrap());
    }

    #[test]
    fn payment_id_index_is_off_by_default() {
        let index = OutputIndex::new(false);
        index.index_payment_id(Hash([1; 32]), Hash([2; 32]));
        assert!(index.transactions_by_payment_id(&Hash([1; 32])).is_empty());
    }
}
