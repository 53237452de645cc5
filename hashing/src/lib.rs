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

//! Domain-separated hashing.
//!
//! Every hash the consensus core takes (tx prefix hash, key image hash-to-point, block hashing
//! blob, merkle nodes) is tagged with a label identifying *what* is being hashed, so that a hash
//! computed for one purpose can never collide with a hash computed for another purpose even if
//! the input bytes happen to coincide.

use std::marker::PhantomData;

use blake2::Blake2b512;
use digest::{consts::U32, Digest};

/// Marker identifying a hash domain. Each consensus use site defines its own label.
pub trait DomainTag {
    const LABEL: &'static str;
}

macro_rules! domain_tag {
    ($name:ident, $label:expr) => {
        pub struct $name;
        impl DomainTag for $name {
            const LABEL: &'static str = $label;
        }
    };
}

domain_tag!(TransactionPrefixDomain, "ringnote.transaction_prefix.v1");
domain_tag!(BlockHashDomain, "ringnote.block_hash.v1");
domain_tag!(KeyImageDomain, "ringnote.hash_to_point.v1");
domain_tag!(RingSignatureChallengeDomain, "ringnote.ring_signature_challenge.v1");
domain_tag!(KeyDerivationDomain, "ringnote.key_derivation.v1");
domain_tag!(MerkleNodeDomain, "ringnote.merkle_node.v1");
domain_tag!(AddressChecksumDomain, "ringnote.address_checksum.v1");

/// A domain-separated hasher over an arbitrary [`digest::Digest`].
///
/// The domain label is folded into the digest state before any caller data, so two different
/// domains always diverge from the first byte onward.
pub struct DomainSeparatedHasher<T, D> {
    digest: D,
    _tag: PhantomData<T>,
}

impl<T: DomainTag, D: Digest + Default> DomainSeparatedHasher<T, D> {
    pub fn new() -> Self {
        let mut digest = D::default();
        digest.update(T::LABEL.as_bytes());
        Self {
            digest,
            _tag: PhantomData,
        }
    }

    pub fn chain(mut self, data: impl AsRef<[u8]>) -> Self {
        self.digest.update(data.as_ref());
        self
    }

    pub fn update(&mut self, data: impl AsRef<[u8]>) {
        self.digest.update(data.as_ref());
    }

    pub fn finalize(self) -> digest::Output<D> {
        self.digest.finalize()
    }
}

impl<T: DomainTag, D: Digest + Default> Default for DomainSeparatedHasher<T, D> {
    fn default() -> Self {
        Self::new()
    }
}

/// 32-byte Blake2b domain-separated hash, the workhorse used throughout the core for
/// transaction, block and merkle hashing.
pub fn domain_hash<T: DomainTag>(chunks: &[&[u8]]) -> [u8; 32] {
    let mut hasher: DomainSeparatedHasher<T, Blake2b512> = DomainSeparatedHasher::new();
    for chunk in chunks {
        hasher.update(chunk);
    }
    let out = hasher.finalize();
    let mut result = [0u8; 32];
    result.copy_from_slice(&out[..32]);
    result
}

/// Keccak-256, used where the wire format specifically calls for Keccak rather than Blake2b
/// (the CryptoNote-lineage address checksum and hash-to-point construction).
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    use sha3::Keccak256;
    let mut hasher = Keccak256::new();
    hasher.update(data);
    let out = hasher.finalize();
    let mut result = [0u8; 32];
    result.copy_from_slice(&out);
    result
}

/// Blake2b-256 (not domain separated) for contexts that hash already-domain-tagged bytes, such
/// as merkle tree node concatenation where the tag lives in the leaf hash.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b512::new();
    hasher.update(data);
    let out = hasher.finalize();
    let mut result = [0u8; 32];
    result.copy_from_slice(&out[..32]);
    result
}

/// Type alias used by call sites that want a 256-bit digest output without spelling out the
/// underlying truncated Blake2b-512.
pub type Hash256 = digest::generic_array::GenericArray<u8, U32>;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn domains_diverge() {
        let a = domain_hash::<TransactionPrefixDomain>(&[b"same bytes"]);
        let b = domain_hash::<BlockHashDomain>(&[b"same bytes"]);
        assert_ne!(a, b);
    }

    #[test]
    fn deterministic() {
        let a = domain_hash::<KeyImageDomain>(&[b"abc", b"def"]);
        let b = domain_hash::<KeyImageDomain>(&[b"abc", b"def"]);
        assert_eq!(a, b);
    }

    #[test]
    fn keccak_is_deterministic_and_nonzero() {
        let a = keccak256(b"ringnote");
        let b = keccak256(b"ringnote");
        assert_eq!(a, b);
        assert_ne!(a, [0u8; 32]);
    }
}
