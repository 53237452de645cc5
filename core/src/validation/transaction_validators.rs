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

//! Transaction validation (§4.H step 2d/2e). Per §9 ("Dynamic dispatch over input variants... no
//! virtual dispatch"), validation is a set of free functions taking a `ChainView` capability
//! instead of a class hierarchy: the engine is the only implementer, but keeping the seam as a
//! trait lets these functions run unchanged against a test double.

use std::collections::HashSet;

use crate::{
    crypto::{keys::PublicKey, ring_signature::check_ring_signature},
    currency::ConsensusParams,
    transactions::{Transaction, TransactionInput},
    types::{Amount, Hash},
};

use super::error::TransactionRejectionReason;

/// What a referenced output looks like from the validator's point of view: enough to rebuild the
/// ring for signature verification and to check the unlock window, without exposing how the
/// engine actually stores it.
pub struct OutputDescriptor {
    pub public_key: PublicKey,
    pub unlock_height: u32,
}

/// The read-only slice of chain state a validator needs (§9's "current tip snapshot": output
/// index, key-image set, height).
pub trait ChainView {
    fn height(&self) -> u32;
    fn is_key_image_spent(&self, image: &Hash) -> bool;
    fn output_count(&self, amount: Amount) -> u64;
    fn output(&self, amount: Amount, global_index: u64) -> Option<OutputDescriptor>;
}

/// Structural checks that don't need chain state: ring sizes, one signature per non-coinbase
/// input, and `Σ input == Σ output + fee`.
pub fn validate_transaction_structure(tx: &Transaction, params: &ConsensusParams) -> Result<(), TransactionRejectionReason> {
    if tx.version == 0 || tx.version > 2 {
        return Err(TransactionRejectionReason::BadVersion(tx.version));
    }

    if tx.is_coinbase() {
        if !tx.signatures.is_empty() {
            return Err(TransactionRejectionReason::BadVersion(tx.version));
        }
        return Ok(());
    }

    if tx.signatures.len() != tx.inputs.len() {
        return Err(TransactionRejectionReason::BadSignature);
    }

    let mut seen_images = HashSet::new();
    for input in &tx.inputs {
        if let TransactionInput::Key { output_indices, key_image, .. } = input {
            let ring_size = output_indices.0.len();
            let min = params.min_mixin as usize + 1;
            let max = params.max_mixin as usize + 1;
            if ring_size < min || ring_size > max {
                return Err(TransactionRejectionReason::RingSizeOutOfBounds { actual: ring_size, min, max });
            }
            if !seen_images.insert(*key_image) {
                return Err(TransactionRejectionReason::DuplicateKeyImage(*key_image));
            }
        }
    }

    tx.fee().map(|_| ()).ok_or(TransactionRejectionReason::AmountMismatch)
}

/// Checks requiring chain state: referenced outputs exist and are unlocked, no double spend
/// against the spent set, and every ring signature verifies over the transaction's prefix hash.
pub fn validate_transaction_against_tip(tx: &Transaction, view: &impl ChainView) -> Result<(), TransactionRejectionReason> {
    if tx.is_coinbase() {
        return Ok(());
    }
    let message = tx.prefix_hash();

    for (i, input) in tx.inputs.iter().enumerate() {
        let TransactionInput::Key { amount, output_indices, key_image } = input else {
            continue;
        };
        if view.is_key_image_spent(key_image) {
            return Err(TransactionRejectionReason::DoubleSpend(*key_image));
        }

        let absolute = output_indices.to_absolute();
        let mut ring = Vec::with_capacity(absolute.len());
        for global_index in &absolute {
            if *global_index >= view.output_count(*amount) {
                return Err(TransactionRejectionReason::OutputIndexOutOfRange { amount: *amount, index: *global_index });
            }
            let descriptor = view
                .output(*amount, *global_index)
                .ok_or(TransactionRejectionReason::OutputIndexOutOfRange { amount: *amount, index: *global_index })?;
            if descriptor.unlock_height > view.height() {
                return Err(TransactionRejectionReason::OutputNotUnlocked);
            }
            ring.push(descriptor.public_key);
        }

        let signature = &tx.signatures[i];
        if !check_ring_signature(message.as_bytes(), key_image, &ring, signature) {
            return Err(TransactionRejectionReason::BadSignature);
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::currency::ConsensusParams;
    use crate::transactions::test_helpers::{build_signed_transaction, build_spendable_output, TestAccount};

    struct FixtureView {
        height: u32,
        outputs: Vec<(Amount, u64, OutputDescriptorFixture)>,
        spent: Vec<Hash>,
    }

    #[derive(Clone, Copy)]
    struct OutputDescriptorFixture {
        public_key: PublicKey,
        unlock_height: u32,
    }

    impl ChainView for FixtureView {
        fn height(&self) -> u32 {
            self.height
        }

        fn is_key_image_spent(&self, image: &Hash) -> bool {
            self.spent.contains(image)
        }

        fn output_count(&self, amount: Amount) -> u64 {
            self.outputs.iter().filter(|(a, ..)| *a == amount).count() as u64
        }

        fn output(&self, amount: Amount, global_index: u64) -> Option<OutputDescriptor> {
            self.outputs.iter().find(|(a, idx, _)| *a == amount && *idx == global_index).map(|(_, _, d)| OutputDescriptor {
                public_key: d.public_key,
                unlock_height: d.unlock_height,
            })
        }
    }

    #[test]
    fn structurally_valid_transaction_passes() {
        let params = ConsensusParams::main_net();
        let account = TestAccount::new();
        let (_, tx_secret) = crate::crypto::keys::generate_keypair(&mut rand::rngs::OsRng);
        let real = build_spendable_output(&account, 1000, &tx_secret, 0);
        let mut ring = vec![];
        for _ in 0..(params.min_mixin) {
            ring.push(crate::crypto::keys::generate_keypair(&mut rand::rngs::OsRng).0);
        }
        use crate::transactions::{TransactionOutput, TransactionTarget};
        let real_key = match &real.output.target {
            TransactionTarget::Key(k) => *k,
            _ => unreachable!(),
        };
        ring.push(real_key);
        let real_index = ring.len() - 1;
        let indices: Vec<u64> = (0..ring.len() as u64).collect();
        let outputs = vec![TransactionOutput {
            amount: 900,
            target: TransactionTarget::Key(crate::crypto::keys::generate_keypair(&mut rand::rngs::OsRng).0),
        }];
        let tx = build_signed_transaction(&real, &ring, real_index, indices, 1000, outputs);

        assert!(validate_transaction_structure(&tx, &params).is_ok());

        let view = FixtureView {
            height: 10,
            outputs: ring
                .iter()
                .enumerate()
                .map(|(i, pk)| (1000, i as u64, OutputDescriptorFixture { public_key: *pk, unlock_height: 0 }))
                .collect(),
            spent: vec![],
        };
        assert!(validate_transaction_against_tip(&tx, &view).is_ok());
    }

    #[test]
    fn double_spend_is_rejected() {
        let account = TestAccount::new();
        let (_, tx_secret) = crate::crypto::keys::generate_keypair(&mut rand::rngs::OsRng);
        let real = build_spendable_output(&account, 500, &tx_secret, 0);
        let ring = vec![match &real.output.target {
            crate::transactions::TransactionTarget::Key(k) => *k,
            _ => unreachable!(),
        }];
        let tx = build_signed_transaction(&real, &ring, 0, vec![0], 500, vec![]);

        let view = FixtureView {
            height: 1,
            outputs: vec![(500, 0, OutputDescriptorFixture { public_key: ring[0], unlock_height: 0 })],
            spent: vec![real.key_image],
        };
        let err = validate_transaction_against_tip(&tx, &view).unwrap_err();
        assert_eq!(err, TransactionRejectionReason::DoubleSpend(real.key_image));
    }
}
