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

//! Linkable ring signatures (the CryptoNote/MLSAG-lite construction, one key per ring member, no
//! amount commitment): `generate_key_image`, `generate_ring_signature`, `check_ring_signature`.
//!
//! A ring signature proves "I know the secret key behind one of these `n` public keys" without
//! revealing which, while the key image makes that one output unspendable a second time: since
//! `I = s * H_p(P)` is a deterministic function of the signer's own secret key, the same output
//! always produces the same key image no matter which ring it's later reused in.

use borsh::{BorshDeserialize, BorshSerialize};
use curve25519_dalek::{constants::ED25519_BASEPOINT_TABLE, edwards::EdwardsPoint, scalar::Scalar};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use super::keys::{hash_to_point, hash_to_scalar, PublicKey, SecretKey};

/// `I = s * H_p(P)`, compressed. Two outputs spent with the same secret key always yield the same
/// key image regardless of which ring signature reveals it — this is what makes double-spend
/// detection a simple set-membership check (§4.F) instead of requiring the whole chain to be
/// re-scanned.
pub type KeyImage = crate::types::Hash;

pub fn generate_key_image(public: &PublicKey, secret: &SecretKey) -> KeyImage {
    let point = hash_to_point(public) * secret.as_scalar();
    KeyImage(point.compress().to_bytes())
}

/// One `(c, r)` pair per ring member. `signatures[i]` is valid input to the ring equation for
/// member `i`; exactly one of them was computed by `generate_ring_signature` "backwards" from the
/// real secret, the rest were drawn uniformly at random by the signer and their challenge solved
/// for algebraically — from a verifier's perspective all `n` look identical.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct RingSignature {
    pub entries: Vec<RingSignatureEntry>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct RingSignatureEntry {
    pub c: [u8; 32],
    pub r: [u8; 32],
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RingSignatureError {
    #[error("ring has {0} members but only {1} signature entries")]
    LengthMismatch(usize, usize),
    #[error("ring is empty")]
    EmptyRing,
    #[error("signer index {0} is out of range for a ring of size {1}")]
    SignerIndexOutOfRange(usize, usize),
    #[error("one or more ring member public keys do not decompress to a valid curve point")]
    InvalidRingMember,
}

/// Generates a ring signature over message `message` (the tx prefix hash) proving knowledge of the
/// secret behind `ring[real_index]`, whose key image is `image`. `secret` must satisfy
/// `secret.public_key() == ring[real_index]`.
///
/// Construction (one scalar multiply per ring member, Schnorr-style with a shared running hash):
/// draw `k`; for the real index, `L_j = k*G`, `R_j = k*H_p(P_j)`. For every other index `i`, draw
/// `(c_i, r_i)` uniformly, compute `L_i = r_i*G + c_i*P_i`, `R_i = r_i*H_p(P_i) + c_i*I`. The
/// overall challenge `c = H_s(message, L_0..L_{n-1}, R_0..R_{n-1})` is split so that
/// `sum(c_i) == c mod l`; the real index's `c_j` is whatever's left over, and
/// `r_j = k - c_j*secret mod l` closes the ring.
pub fn generate_ring_signature<R: RngCore + CryptoRng>(
    message: &[u8; 32],
    image: &KeyImage,
    ring: &[PublicKey],
    secret: &SecretKey,
    real_index: usize,
    rng: &mut R,
) -> Result<RingSignature, RingSignatureError> {
    let n = ring.len();
    if n == 0 {
        return Err(RingSignatureError::EmptyRing);
    }
    if real_index >= n {
        return Err(RingSignatureError::SignerIndexOutOfRange(real_index, n));
    }
    let points: Vec<EdwardsPoint> = ring
        .iter()
        .map(|p| p.decompress().ok_or(RingSignatureError::InvalidRingMember))
        .collect::<Result<_, _>>()?;
    let image_point = image_as_point(image).ok_or(RingSignatureError::InvalidRingMember)?;

    let mut c = vec![Scalar::ZERO; n];
    let mut r = vec![Scalar::ZERO; n];
    let mut l_points = vec![EdwardsPoint::default(); n];
    let mut r_points = vec![EdwardsPoint::default(); n];

    let mut sum_c = Scalar::ZERO;
    let k = random_scalar(rng);
    for i in 0..n {
        if i == real_index {
            l_points[i] = &k * &ED25519_BASEPOINT_TABLE;
            r_points[i] = k * hash_to_point(&ring[i]);
            continue;
        }
        let c_i = random_scalar(rng);
        let r_i = random_scalar(rng);
        l_points[i] = (&r_i * &ED25519_BASEPOINT_TABLE) + (c_i * points[i]);
        r_points[i] = (r_i * hash_to_point(&ring[i])) + (c_i * image_point);
        c[i] = c_i;
        r[i] = r_i;
        sum_c += c_i;
    }

    let challenge = challenge_hash(message, &l_points, &r_points);
    let c_real = challenge - sum_c;
    let r_real = k - c_real * secret.as_scalar();
    c[real_index] = c_real;
    r[real_index] = r_real;

    Ok(RingSignature {
        entries: (0..n)
            .map(|i| RingSignatureEntry {
                c: c[i].to_bytes(),
                r: r[i].to_bytes(),
            })
            .collect(),
    })
}

/// `check_ring_signature(m, I, ring, sig)`: recomputes every `L_i`/`R_i` from the signature's own
/// `(c_i, r_i)` and the public ring, then checks `sum(c_i) == H_s(m, L_0.., R_0..) mod l`. A
/// flipped byte in any `c_i` or `r_i` changes either the recomputed points or the sum, so it fails
/// deterministically (§8, scenario f).
pub fn check_ring_signature(message: &[u8; 32], image: &KeyImage, ring: &[PublicKey], sig: &RingSignature) -> bool {
    let n = ring.len();
    if n == 0 || sig.entries.len() != n {
        return false;
    }
    let Some(image_point) = image_as_point(image) else {
        return false;
    };
    let mut points = Vec::with_capacity(n);
    for key in ring {
        match key.decompress() {
            Some(p) if p.is_torsion_free() => points.push(p),
            _ => return false,
        }
    }

    let mut l_points = Vec::with_capacity(n);
    let mut r_points = Vec::with_capacity(n);
    let mut sum_c = Scalar::ZERO;
    for (i, entry) in sig.entries.iter().enumerate() {
        let c_i = match Option::<Scalar>::from(Scalar::from_canonical_bytes(entry.c)) {
            Some(s) => s,
            None => return false,
        };
        let r_i = match Option::<Scalar>::from(Scalar::from_canonical_bytes(entry.r)) {
            Some(s) => s,
            None => return false,
        };
        l_points.push((&r_i * &ED25519_BASEPOINT_TABLE) + (c_i * points[i]));
        r_points.push((r_i * hash_to_point(&ring[i])) + (c_i * image_point));
        sum_c += c_i;
    }

    let challenge = challenge_hash(message, &l_points, &r_points);
    challenge == sum_c
}

fn image_as_point(image: &KeyImage) -> Option<EdwardsPoint> {
    curve25519_dalek::edwards::CompressedEdwardsY(image.0).decompress()
}

fn challenge_hash(message: &[u8; 32], l_points: &[EdwardsPoint], r_points: &[EdwardsPoint]) -> Scalar {
    let mut buf = Vec::with_capacity(32 + (l_points.len() + r_points.len()) * 32);
    buf.extend_from_slice(message);
    for p in l_points {
        buf.extend_from_slice(p.compress().as_bytes());
    }
    for p in r_points {
        buf.extend_from_slice(p.compress().as_bytes());
    }
    hash_to_scalar(&buf)
}

fn random_scalar<R: RngCore + CryptoRng>(rng: &mut R) -> Scalar {
    let mut bytes = [0u8; 64];
    rng.fill_bytes(&mut bytes);
    Scalar::from_bytes_mod_order_wide(&bytes)
}

#[cfg(test)]
mod test {
    use rand::rngs::OsRng;

    use super::*;
    use crate::crypto::keys::generate_keypair;

    fn make_ring(n: usize, real_index: usize) -> (Vec<PublicKey>, SecretKey, KeyImage) {
        let mut ring = Vec::with_capacity(n);
        let mut real_secret = None;
        for i in 0..n {
            let (publ, sec) = generate_keypair(&mut OsRng);
            if i == real_index {
                real_secret = Some(sec);
            }
            ring.push(publ);
        }
        let secret = real_secret.unwrap();
        let image = generate_key_image(&ring[real_index], &secret);
        (ring, secret, image)
    }

    #[test]
    fn valid_signature_verifies() {
        let (ring, secret, image) = make_ring(5, 2);
        let message = [9u8; 32];
        let sig = generate_ring_signature(&message, &image, &ring, &secret, 2, &mut OsRng).unwrap();
        assert!(check_ring_signature(&message, &image, &ring, &sig));
    }

    #[test]
    fn flipped_c_byte_fails() {
        let (ring, secret, image) = make_ring(5, 2);
        let message = [9u8; 32];
        let mut sig = generate_ring_signature(&message, &image, &ring, &secret, 2, &mut OsRng).unwrap();
        sig.entries[0].c[0] ^= 0x01;
        assert!(!check_ring_signature(&message, &image, &ring, &sig));
    }

    #[test]
    fn flipped_r_byte_fails() {
        let (ring, secret, image) = make_ring(5, 2);
        let message = [9u8; 32];
        let mut sig = generate_ring_signature(&message, &image, &ring, &secret, 2, &mut OsRng).unwrap();
        sig.entries[3].r[0] ^= 0x01;
        assert!(!check_ring_signature(&message, &image, &ring, &sig));
    }

    #[test]
    fn wrong_message_fails() {
        let (ring, secret, image) = make_ring(3, 0);
        let message = [1u8; 32];
        let sig = generate_ring_signature(&message, &image, &ring, &secret, 0, &mut OsRng).unwrap();
        assert!(!check_ring_signature(&[2u8; 32], &image, &ring, &sig));
    }

    #[test]
    fn key_image_is_deterministic_regardless_of_ring() {
        let (publ, sec) = generate_keypair(&mut OsRng);
        let a = generate_key_image(&publ, &sec);
        let b = generate_key_image(&publ, &sec);
        assert_eq!(a, b);
    }

    #[test]
    fn single_member_ring_is_a_degenerate_schnorr_signature() {
        let (ring, secret, image) = make_ring(1, 0);
        let message = [3u8; 32];
        let sig = generate_ring_signature(&message, &image, &ring, &secret, 0, &mut OsRng).unwrap();
        assert!(check_ring_signature(&message, &image, &ring, &sig));
    }
}
