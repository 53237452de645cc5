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

//! Scalar and point types over edwards25519, and the `H_p` hash-to-point used by key images and
//! `H_s` hash-to-scalar used by ring signature challenges.

use std::fmt;

use borsh::{BorshDeserialize, BorshSerialize};
use curve25519_dalek::{
    constants::ED25519_BASEPOINT_TABLE,
    edwards::{CompressedEdwardsY, EdwardsPoint},
    scalar::Scalar,
};
use rand::{CryptoRng, RngCore};
use ringnote_hashing::keccak256;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// A compressed edwards25519 point. Validity (on-curve, in the prime-order subgroup, canonical
/// encoding) is checked by [`check_key`], not at construction — the wire format carries whatever
/// bytes were sent, and a malformed key is a validation failure, not a panic.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct PublicKey(pub [u8; 32]);

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", hex::encode(self.0))
    }
}

impl PublicKey {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn from_point(point: &EdwardsPoint) -> Self {
        PublicKey(point.compress().to_bytes())
    }

    /// Decompresses to a curve point, iff the bytes are a valid, canonically-encoded point.
    /// `curve25519-dalek`'s decompress already rejects non-canonical and off-curve encodings.
    pub fn decompress(&self) -> Option<EdwardsPoint> {
        CompressedEdwardsY(self.0).decompress()
    }
}

/// A scalar mod the edwards25519 group order `l`. Zeroized on drop since every secret key and
/// ring-signature response scalar passes through this type.
#[derive(Clone, Copy, Zeroize)]
#[zeroize(drop)]
pub struct SecretKey(pub [u8; 32]);

impl SecretKey {
    pub fn as_scalar(&self) -> Scalar {
        // Secret keys are always clamped/reduced scalars produced by `generate_keypair` or
        // derived via `Scalar::from_bytes_mod_order`; `from_bytes_mod_order` never fails.
        Scalar::from_bytes_mod_order(self.0)
    }

    pub fn from_scalar(scalar: &Scalar) -> Self {
        SecretKey(scalar.to_bytes())
    }

    pub fn public_key(&self) -> PublicKey {
        let point = &self.as_scalar() * &ED25519_BASEPOINT_TABLE;
        PublicKey::from_point(&point)
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey(..)")
    }
}

/// Generates a fresh keypair: `sec` uniform mod `l`, `pub = sec * G`.
pub fn generate_keypair<R: RngCore + CryptoRng>(rng: &mut R) -> (PublicKey, SecretKey) {
    let mut bytes = [0u8; 64];
    rng.fill_bytes(&mut bytes);
    let scalar = Scalar::from_bytes_mod_order_wide(&bytes);
    let sec = SecretKey::from_scalar(&scalar);
    let publ = sec.public_key();
    (publ, sec)
}

/// `check_key(P)`: true iff `P` decodes to a point on the prime-order subgroup (§4.A).
/// `curve25519-dalek`'s `is_torsion_free` rejects small-order (cofactor-8) points, which is the
/// subgroup check a consensus-critical verifier needs: a signer could otherwise pick a low-order
/// point to make a ring signature verify for multiple distinct "identities".
pub fn check_key(key: &PublicKey) -> bool {
    match key.decompress() {
        Some(point) => point.is_torsion_free(),
        None => false,
    }
}

/// `H_s`: hashes arbitrary data to a scalar mod `l`, used for ring-signature challenges and
/// deterministic key derivation.
pub fn hash_to_scalar(data: &[u8]) -> Scalar {
    let digest = keccak256(data);
    Scalar::from_bytes_mod_order_wide(&wide(&digest))
}

/// `H_p`: hashes a public key to a point on the curve, used to build key images
/// (`I = s * H_p(P)`). Uses the standard "hash to scalar, multiply the basepoint, then hash the
/// resulting point again and retry on cofactor-8 failure" construction is unnecessary here since
/// we immediately clear the cofactor by multiplying by 8 (`mul_by_cofactor`), forcing the result
/// into the prime-order subgroup regardless of which coset the raw hash landed in.
pub fn hash_to_point(key: &PublicKey) -> EdwardsPoint {
    let scalar = hash_to_scalar(&key.0);
    let point = &scalar * &ED25519_BASEPOINT_TABLE;
    point.mul_by_cofactor()
}

fn wide(bytes32: &[u8; 32]) -> [u8; 64] {
    let mut wide = [0u8; 64];
    wide[..32].copy_from_slice(bytes32);
    wide
}

#[cfg(test)]
mod test {
    use rand::rngs::OsRng;

    use super::*;

    #[test]
    fn generated_keypair_passes_check_key() {
        let (publ, sec) = generate_keypair(&mut OsRng);
        assert!(check_key(&publ));
        assert_eq!(sec.public_key(), publ);
    }

    #[test]
    fn check_key_rejects_garbage_bytes() {
        // All-0xFF is not a canonical point encoding on edwards25519.
        let bad = PublicKey([0xFFu8; 32]);
        assert!(!check_key(&bad));
    }

    #[test]
    fn hash_to_point_is_deterministic() {
        let (publ, _) = generate_keypair(&mut OsRng);
        let a = hash_to_point(&publ);
        let b = hash_to_point(&publ);
        assert_eq!(a.compress(), b.compress());
    }
}
