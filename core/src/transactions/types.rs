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

//! The transaction data model (§3): tagged input/output variants, and the transaction that ties
//! them together with its fee/amount/ring-signature invariants.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::{
    codec::VarInt,
    crypto::{keys::PublicKey, ring_signature::RingSignature},
    types::{Amount, Hash},
};

/// A Key input references prior outputs of the same amount by GLOBAL INDEX, stored as relative
/// deltas from the previous entry (the first is absolute) — the canonical CryptoNote wire
/// encoding, kept so a stored transaction round-trips byte-for-byte (§3, "Key").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct RelativeOutputIndices(pub Vec<VarInt>);

impl RelativeOutputIndices {
    pub fn from_absolute(mut indices: Vec<u64>) -> Self {
        indices.sort_unstable();
        let mut relative = Vec::with_capacity(indices.len());
        let mut previous = 0u64;
        for (i, index) in indices.into_iter().enumerate() {
            let delta = if i == 0 { index } else { index - previous };
            relative.push(VarInt(delta));
            previous += delta;
        }
        RelativeOutputIndices(relative)
    }

    pub fn to_absolute(&self) -> Vec<u64> {
        let mut absolute = Vec::with_capacity(self.0.len());
        let mut running = 0u64;
        for (i, delta) in self.0.iter().enumerate() {
            running = if i == 0 { delta.0 } else { running + delta.0 };
            absolute.push(running);
        }
        absolute
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum TransactionInput {
    /// Appears exactly once, as `input[0]` of a block's base transaction (§3, "Coinbase").
    Coinbase { height: u32 },
    /// References prior outputs of `amount` by relative global-index deltas, proving one of them
    /// was spent via `key_image` without revealing which (§3, "Key").
    Key {
        amount: Amount,
        output_indices: RelativeOutputIndices,
        key_image: Hash,
    },
    /// References a single multisig output by amount and absolute global index (§3, "Multisig").
    Multisig {
        amount: Amount,
        output_index: u64,
        signatures_required: u32,
    },
}

impl TransactionInput {
    pub fn key_image(&self) -> Option<&Hash> {
        match self {
            TransactionInput::Key { key_image, .. } => Some(key_image),
            _ => None,
        }
    }

    pub fn amount(&self) -> Option<Amount> {
        match self {
            TransactionInput::Coinbase { .. } => None,
            TransactionInput::Key { amount, .. } => Some(*amount),
            TransactionInput::Multisig { amount, .. } => Some(*amount),
        }
    }

    pub fn ring_size(&self) -> usize {
        match self {
            TransactionInput::Key { output_indices, .. } => output_indices.0.len(),
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum TransactionTarget {
    /// A one-time output public key (§4.A's derivation construction computes exactly this).
    Key(PublicKey),
    /// `{required_signatures, keys}`: a multisig output spendable by any `required_signatures`-of-
    /// `keys.len()` participants.
    Multisig { required_signatures: u32, keys: Vec<PublicKey> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct TransactionOutput {
    pub amount: Amount,
    pub target: TransactionTarget,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct Transaction {
    pub version: u8,
    pub unlock_time: u64,
    pub inputs: Vec<TransactionInput>,
    pub outputs: Vec<TransactionOutput>,
    pub extra: Vec<u8>,
    /// `signatures[i]` is the ring signature for `inputs[i]`; empty for the coinbase input, which
    /// carries no signature (§3, "Transaction": "one scalar per public key referenced by input[i]").
    pub signatures: Vec<RingSignature>,
}

impl Transaction {
    /// True iff `inputs[0]` is a `Coinbase` input and it is the only input — the shape every base
    /// transaction must have.
    pub fn is_coinbase(&self) -> bool {
        matches!(self.inputs.as_slice(), [TransactionInput::Coinbase { .. }])
    }

    /// The canonical bytes signatures are computed over: the transaction with an empty
    /// `signatures` vector, borsh-encoded. Every ring signature in `self.signatures` signs this
    /// same digest (§3: "prefix hash ... is what ring signatures sign").
    pub fn prefix_bytes(&self) -> Vec<u8> {
        let prefix = Transaction {
            version: self.version,
            unlock_time: self.unlock_time,
            inputs: self.inputs.clone(),
            outputs: self.outputs.clone(),
            extra: self.extra.clone(),
            signatures: Vec::new(),
        };
        borsh::to_vec(&prefix).expect("borsh serialization of an owned Transaction cannot fail")
    }

    pub fn prefix_hash(&self) -> Hash {
        Hash(ringnote_hashing::keccak256(&self.prefix_bytes()))
    }

    /// The transaction hash: `hash(canonical_bytes)`, over the FULL transaction including
    /// signatures (§3: "The tx is addressed by `hash(canonical_bytes)`").
    pub fn hash(&self) -> Hash {
        let bytes = borsh::to_vec(self).expect("borsh serialization of an owned Transaction cannot fail");
        Hash(ringnote_hashing::keccak256(&bytes))
    }

    pub fn blob_size(&self) -> usize {
        borsh::to_vec(self).expect("borsh serialization of an owned Transaction cannot fail").len()
    }

    /// Σ of every non-coinbase input's declared amount; `None` if any input is a coinbase input
    /// (the coinbase provides its own amount via the block reward, §3 invariant 5).
    pub fn total_input_amount(&self) -> Option<Amount> {
        self.inputs.iter().try_fold(0u64, |acc, input| Some(acc + input.amount()?))
    }

    pub fn total_output_amount(&self) -> Amount {
        self.outputs.iter().map(|o| o.amount).sum()
    }

    /// `Σ input - Σ output`, or `None` for a coinbase transaction (which has no fee) or if outputs
    /// exceed inputs (invalid regardless of declared fee).
    pub fn fee(&self) -> Option<Amount> {
        if self.is_coinbase() {
            return None;
        }
        self.total_input_amount()?.checked_sub(self.total_output_amount())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn relative_output_indices_roundtrip() {
        let absolute = vec![5, 10, 10, 23, 1000];
        let relative = RelativeOutputIndices::from_absolute(absolute.clone());
        let mut expected = absolute;
        expected.sort_unstable();
        assert_eq!(relative.to_absolute(), expected);
    }

    #[test]
    fn prefix_hash_is_stable_across_signature_changes() {
        let input = TransactionInput::Key {
            amount: 100,
            output_indices: RelativeOutputIndices::from_absolute(vec![1, 2, 3]),
            key_image: Hash([9u8; 32]),
        };
        let base = Transaction {
            version: 1,
            unlock_time: 0,
            inputs: vec![input],
            outputs: vec![],
            extra: vec![],
            signatures: vec![],
        };
        let hash_before = base.prefix_hash();
        let mut signed = base.clone();
        signed.signatures = vec![crate::crypto::ring_signature::RingSignature { entries: vec![] }];
        assert_eq!(hash_before, signed.prefix_hash());
        assert_ne!(base.hash(), signed.hash());
    }

    #[test]
    fn fee_is_none_for_coinbase_and_computed_otherwise() {
        let coinbase = Transaction {
            version: 1,
            unlock_time: 0,
            inputs: vec![TransactionInput::Coinbase { height: 5 }],
            outputs: vec![],
            extra: vec![],
            signatures: vec![],
        };
        assert_eq!(coinbase.fee(), None);

        let spend = Transaction {
            version: 1,
            unlock_time: 0,
            inputs: vec![TransactionInput::Key {
                amount: 100,
                output_indices: RelativeOutputIndices::from_absolute(vec![1]),
                key_image: Hash([1u8; 32]),
            }],
            outputs: vec![TransactionOutput {
                amount: 95,
                target: TransactionTarget::Key(PublicKey([2u8; 32])),
            }],
            extra: vec![],
            signatures: vec![],
        };
        assert_eq!(spend.fee(), Some(5));
    }
}
