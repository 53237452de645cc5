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

//! Builders for constructing spendable test outputs and signed transactions without going through
//! a wallet layer (out of scope, §1). Used by this crate's own unit and scenario tests.

use rand::rngs::OsRng;

use super::types::{RelativeOutputIndices, Transaction, TransactionInput, TransactionOutput, TransactionTarget};
use crate::crypto::{
    derivation::{derive_public_key, derive_secret_key, generate_key_derivation},
    keys::{generate_keypair, PublicKey, SecretKey},
    ring_signature::{generate_key_image, generate_ring_signature, KeyImage},
};

/// A recipient's view/spend keypairs, standing in for a wallet account in tests.
pub struct TestAccount {
    pub spend_public_key: PublicKey,
    pub spend_secret_key: SecretKey,
    pub view_public_key: PublicKey,
    pub view_secret_key: SecretKey,
}

impl TestAccount {
    pub fn new() -> Self {
        let (spend_public_key, spend_secret_key) = generate_keypair(&mut OsRng);
        let (view_public_key, view_secret_key) = generate_keypair(&mut OsRng);
        TestAccount {
            spend_public_key,
            spend_secret_key,
            view_public_key,
            view_secret_key,
        }
    }
}

impl Default for TestAccount {
    fn default() -> Self {
        Self::new()
    }
}

/// A constructed output together with everything needed to later spend it: its one-time public
/// key, the ephemeral secret derived for it, and the key image spending it would reveal.
pub struct SpendableOutput {
    pub output: TransactionOutput,
    pub one_time_secret_key: SecretKey,
    pub key_image: KeyImage,
}

/// Builds one coinbase-style output of `amount` addressed to `account`, as if a sender held
/// transaction secret `tx_secret` (its paired public key would be carried in the tx's `extra`).
pub fn build_spendable_output(account: &TestAccount, amount: u64, tx_secret: &SecretKey, output_index: u64) -> SpendableOutput {
    let tx_public_key = tx_secret.public_key();
    let derivation = generate_key_derivation(&tx_public_key, &account.view_secret_key).expect("tx public key is always on-curve here");
    let one_time_public_key = derive_public_key(&derivation, output_index, &account.spend_public_key).unwrap();
    let one_time_secret_key = derive_secret_key(&derivation, output_index, &account.spend_secret_key);
    let key_image = generate_key_image(&one_time_public_key, &one_time_secret_key);

    SpendableOutput {
        output: TransactionOutput {
            amount,
            target: TransactionTarget::Key(one_time_public_key),
        },
        one_time_secret_key,
        key_image,
    }
}

/// Builds a plain (non-coinbase) transaction spending `spend` (one of the ring's members, at
/// `real_index`) against the full `ring` of decoy public keys, producing `outputs` and the
/// implied fee (`spend`'s amount minus the sum of `outputs`' amounts).
pub fn build_signed_transaction(
    spend: &SpendableOutput,
    ring: &[PublicKey],
    real_index: usize,
    ring_output_indices: Vec<u64>,
    amount: u64,
    outputs: Vec<TransactionOutput>,
) -> Transaction {
    let input = TransactionInput::Key {
        amount,
        output_indices: RelativeOutputIndices::from_absolute(ring_output_indices),
        key_image: spend.key_image,
    };

    let mut tx = Transaction {
        version: 1,
        unlock_time: 0,
        inputs: vec![input],
        outputs,
        extra: Vec::new(),
        signatures: Vec::new(),
    };

    let message = tx.prefix_hash().0;
    let signature =
        generate_ring_signature(&message, &spend.key_image, ring, &spend.one_time_secret_key, real_index, &mut OsRng).unwrap();
    tx.signatures = vec![signature];
    tx
}

/// A minimal coinbase transaction for height `height`, carrying one output of `reward` addressed
/// to `account`.
pub fn build_coinbase_transaction(account: &TestAccount, height: u32, reward: u64, tx_secret: &SecretKey) -> Transaction {
    let spendable = build_spendable_output(account, reward, tx_secret, 0);
    let tx_public_key = tx_secret.public_key();
    Transaction {
        version: 1,
        unlock_time: 0,
        inputs: vec![TransactionInput::Coinbase { height }],
        outputs: vec![spendable.output],
        extra: tx_public_key.as_bytes().to_vec(),
        signatures: Vec::new(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn signed_transaction_verifies_against_its_own_ring() {
        let account = TestAccount::new();
        let (_, tx_secret) = generate_keypair(&mut OsRng);
        let real = build_spendable_output(&account, 1000, &tx_secret, 0);

        let mut ring = vec![real.output_public_key()];
        for _ in 0..4 {
            let (decoy, _) = generate_keypair(&mut OsRng);
            ring.push(decoy);
        }

        let outputs = vec![TransactionOutput {
            amount: 950,
            target: TransactionTarget::Key(generate_keypair(&mut OsRng).0),
        }];
        let tx = build_signed_transaction(&real, &ring, 0, vec![10, 20, 30, 40, 50], 1000, outputs);

        assert_eq!(tx.fee(), Some(50));
        let message = tx.prefix_hash().0;
        let sig = &tx.signatures[0];
        assert!(crate::crypto::ring_signature::check_ring_signature(&message, &real.key_image, &ring, sig));
    }

    #[test]
    fn coinbase_transaction_has_no_fee() {
        let account = TestAccount::new();
        let (_, tx_secret) = generate_keypair(&mut OsRng);
        let coinbase = build_coinbase_transaction(&account, 1, 1_000_000, &tx_secret);
        assert!(coinbase.is_coinbase());
        assert_eq!(coinbase.fee(), None);
    }
}

#[cfg(test)]
impl SpendableOutput {
    fn output_public_key(&self) -> PublicKey {
        match &self.output.target {
            TransactionTarget::Key(key) => *key,
            TransactionTarget::Multisig { .. } => panic!("spendable test output is never a multisig output"),
        }
    }
}
