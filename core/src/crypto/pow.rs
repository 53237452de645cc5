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

//! The proof-of-work hash boundary (§4.A: "the core treats this as an opaque slow hash"). The
//! CryptoNight/RandomX family is GPU/ASIC-resistant by design and deliberately expensive to
//! compute; bundling a concrete implementation is explicitly out of this crate's scope (§1,
//! Non-goals: "GPU-optimized hashing"). [`ProofOfWorkHasher`] is the seam: production wires in
//! whatever slow-hash crate matches the deployed network, tests wire in a cheap stand-in.

use crate::types::Hash;

pub type PowHash = Hash;

/// A pluggable slow hash. The engine only ever compares `hash(blob)` against a target derived
/// from difficulty (§4.H step 2b); it never needs to know which hash family produced it.
pub trait ProofOfWorkHasher: Send + Sync {
    fn pow_hash(&self, hashing_blob: &[u8]) -> PowHash;
}

/// A domain-separated Blake2b stand-in used by every test and by any deployment that hasn't
/// plugged in the network's real slow hash. Not fit for production mining: it is fast, which is
/// exactly the property a real PoW hash must not have.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReferencePowHasher;

impl ProofOfWorkHasher for ReferencePowHasher {
    fn pow_hash(&self, hashing_blob: &[u8]) -> PowHash {
        pow_hash(hashing_blob)
    }
}

/// Free-function form of [`ReferencePowHasher`], used where a trait object would be overkill
/// (unit tests, the genesis block constructor).
pub fn pow_hash(hashing_blob: &[u8]) -> PowHash {
    Hash(ringnote_hashing::blake2b_256(hashing_blob))
}

/// `hash <= 2^256 / difficulty` (§4.H step 2b), checked as `hash * difficulty < 2^256` to avoid a
/// 256-bit division: the hash (read big-endian) is split into four 64-bit limbs and multiplied by
/// `difficulty` with carry propagation; the block meets target iff nothing spills past the 256th
/// bit.
pub fn meets_target(hash: &PowHash, difficulty: u64) -> bool {
    if difficulty <= 1 {
        return true;
    }
    let mut limbs = [0u64; 4];
    for i in 0..4 {
        limbs[i] = u64::from_be_bytes(hash.0[i * 8..i * 8 + 8].try_into().unwrap());
    }
    let mut carry = 0u128;
    for limb in limbs.iter().rev() {
        let product = u128::from(*limb) * u128::from(difficulty) + carry;
        carry = product >> 64;
    }
    carry == 0
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn pow_hash_is_deterministic() {
        let a = pow_hash(b"block blob");
        let b = pow_hash(b"block blob");
        assert_eq!(a, b);
    }

    #[test]
    fn zero_hash_meets_any_target() {
        let hash = Hash::zero();
        assert!(meets_target(&hash, 1_000_000));
    }

    #[test]
    fn max_hash_fails_high_difficulty() {
        let hash = Hash([0xFFu8; 32]);
        assert!(!meets_target(&hash, 1_000_000));
    }
}
