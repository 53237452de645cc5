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

//! The two types almost every other module in this crate names in its signature: the opaque
//! 32-byte [`Hash`] (§3, "Hash") and the atomic-unit [`Amount`].

use std::fmt;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// A 32-byte opaque identifier: block hash, transaction hash, key image, payment id, or a
/// secret/public key's byte representation. Kept as a single newtype so call sites can't
/// accidentally swap a block hash for a tx hash at the type level.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct Hash(pub [u8; 32]);

impl Hash {
    pub const LEN: usize = 32;

    pub const fn zero() -> Self {
        Hash([0u8; 32])
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != 32 {
            return None;
        }
        let mut out = [0u8; 32];
        out.copy_from_slice(bytes);
        Some(Hash(out))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", self.to_hex())
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<[u8; 32]> for Hash {
    fn from(bytes: [u8; 32]) -> Self {
        Hash(bytes)
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Default for Hash {
    fn default() -> Self {
        Hash::zero()
    }
}

/// An amount of atomic units. Consensus never constructs coins except via the emission schedule
/// (§4.C); every arithmetic operation that could overflow or underflow is explicit so a
/// miscomputed sum can't silently wrap into a valid-looking block.
pub type Amount = u64;

/// `d * 10^k` for `d` in `1..=9`, `k` in `0..20` — every amount an output can validly carry after
/// decomposition (§3, "Pretty amount"; GLOSSARY). Outputs sharing a pretty amount share an
/// anonymity set, which is the entire point of ring signatures: a wallet can only pick decoys of
/// the exact same amount.
pub fn pretty_amounts() -> impl Iterator<Item = Amount> {
    (0u32..20).flat_map(|k| (1u64..=9).map(move |d| d * 10u64.pow(k)))
}

/// Splits `amount` into the minimal multiset of pretty amounts that sum to it (one chunk per
/// non-zero decimal digit, matching the canonical CryptoNote decomposition). Chunks at or below
/// `dust_threshold` are merged into a single trailing dust chunk instead of being emitted
/// individually, so a wallet doesn't have to manage many sub-threshold outputs; with
/// `dust_threshold == 0` every chunk is emitted and the result always sums back to `amount`.
pub fn decompose_amount_into_digits(amount: Amount, dust_threshold: Amount) -> Vec<Amount> {
    let mut digits = Vec::new();
    let mut dust = 0u64;
    let mut remaining = amount;
    let mut multiplier = 1u64;
    while remaining > 0 {
        let digit = remaining % 10;
        remaining /= 10;
        if digit == 0 {
            multiplier = multiplier.saturating_mul(10);
            continue;
        }
        let chunk = digit * multiplier;
        if chunk <= dust_threshold {
            dust += chunk;
        } else {
            digits.push(chunk);
        }
        multiplier = multiplier.saturating_mul(10);
    }
    if dust > 0 {
        digits.push(dust);
    }
    digits
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn hash_roundtrips_through_hex() {
        let h = Hash([7u8; 32]);
        assert_eq!(Hash::from_slice(h.as_bytes()).unwrap(), h);
    }

    #[test]
    fn decompose_sums_to_original() {
        for amount in [0u64, 1, 9, 10, 99, 12345, 1_000_000_007] {
            let digits = decompose_amount_into_digits(amount, 0);
            assert_eq!(digits.iter().sum::<u64>(), amount);
        }
    }

    #[test]
    fn decompose_only_emits_pretty_amounts() {
        let pretty: std::collections::HashSet<Amount> = pretty_amounts().collect();
        for digit in decompose_amount_into_digits(918_273, 0) {
            assert!(pretty.contains(&digit), "{digit} is not a pretty amount");
        }
    }
}
