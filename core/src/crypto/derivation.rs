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

//! Deterministic key derivation from a view secret (§4.A). Given the transaction's public key `R`
//! (carried in `extra`) and a recipient's view secret `a`, both the sender (who knows `r`, the
//! matching secret to `R`) and the receiver (who knows `a`) compute the same `D = 8*a*R`, and from
//! it the same per-output one-time public key `P_i = H_s(D, i)*G + B` (B: recipient's spend key).
//! The core re-runs this derivation when answering view-key-scoped queries; it never needs the
//! recipient's spend secret to do so.

use curve25519_dalek::{constants::ED25519_BASEPOINT_TABLE, scalar::Scalar};

use super::keys::{hash_to_scalar, PublicKey, SecretKey};

pub type KeyDerivation = [u8; 32];

/// `D = 8 * a * R`. The cofactor clear (`mul_by_cofactor`) matches the reference construction and
/// keeps the derivation inside the prime-order subgroup even if `R` was maliciously chosen with
/// torsion.
pub fn generate_key_derivation(tx_public_key: &PublicKey, view_secret: &SecretKey) -> Option<KeyDerivation> {
    let point = tx_public_key.decompress()?;
    let derived = (point * view_secret.as_scalar()).mul_by_cofactor();
    Some(derived.compress().to_bytes())
}

fn derivation_scalar(derivation: &KeyDerivation, output_index: u64) -> Scalar {
    let mut buf = Vec::with_capacity(32 + 10);
    buf.extend_from_slice(derivation);
    crate::codec::varint::write_varint(output_index, &mut buf);
    hash_to_scalar(&buf)
}

/// `P_i = H_s(D, i)*G + B`: the one-time output public key a receiver should look for (or a
/// sender should write into `TransactionOutput`).
pub fn derive_public_key(derivation: &KeyDerivation, output_index: u64, spend_public_key: &PublicKey) -> Option<PublicKey> {
    let base = spend_public_key.decompress()?;
    let point = (&derivation_scalar(derivation, output_index) * &ED25519_BASEPOINT_TABLE) + base;
    Some(PublicKey::from_point(&point))
}

/// `x_i = H_s(D, i) + b`: the one-time output secret key, computable only by whoever holds the
/// recipient's spend secret `b`. Used by test helpers that need to actually spend a constructed
/// output; the engine itself never calls this (verification only needs public keys).
pub fn derive_secret_key(derivation: &KeyDerivation, output_index: u64, spend_secret: &SecretKey) -> SecretKey {
    let scalar = derivation_scalar(derivation, output_index) + spend_secret.as_scalar();
    SecretKey::from_scalar(&scalar)
}

#[cfg(test)]
mod test {
    use rand::rngs::OsRng;

    use super::*;
    use crate::crypto::keys::generate_keypair;

    #[test]
    fn sender_and_receiver_compute_the_same_derivation() {
        let (tx_public, tx_secret) = generate_keypair(&mut OsRng);
        let (view_public, view_secret) = generate_keypair(&mut OsRng);

        let sender_side = generate_key_derivation(&view_public, &tx_secret).unwrap();
        let receiver_side = generate_key_derivation(&tx_public, &view_secret).unwrap();
        assert_eq!(sender_side, receiver_side);
    }

    #[test]
    fn derived_public_and_secret_keys_match() {
        let (tx_public, _tx_secret) = generate_keypair(&mut OsRng);
        let (_, view_secret) = generate_keypair(&mut OsRng);
        let (spend_public, spend_secret) = generate_keypair(&mut OsRng);

        let derivation = generate_key_derivation(&tx_public, &view_secret).unwrap();
        let out_public = derive_public_key(&derivation, 3, &spend_public).unwrap();
        let out_secret = derive_secret_key(&derivation, 3, &spend_secret);
        assert_eq!(out_secret.public_key(), out_public);
    }
}
