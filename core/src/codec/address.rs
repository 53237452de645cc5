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

//! `BASE58_CHECK(address_prefix || spend_pk || view_pk || H(prefix||spend||view)[0..4])` (§4.B).
//! Uses the Monero/CryptoNote "Base58, encoded in 8-byte (11-char) blocks" alphabet and block
//! structure rather than Bitcoin's whole-buffer Base58Check, since that's what the varint-prefixed
//! address blob format requires to round-trip byte-for-byte with the rest of this lineage.

use ringnote_hashing::keccak256;

use crate::crypto::keys::PublicKey;

const ALPHABET: &[u8] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";
const FULL_BLOCK_SIZE: usize = 8;
const FULL_ENCODED_BLOCK_SIZE: usize = 11;
const ENCODED_BLOCK_SIZES: [usize; 9] = [0, 2, 3, 5, 6, 7, 9, 10, 11];
const CHECKSUM_SIZE: usize = 4;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("invalid base58 character")]
    InvalidCharacter,
    #[error("address is too short to contain a checksum")]
    TooShort,
    #[error("checksum mismatch")]
    ChecksumMismatch,
    #[error("decoded payload has the wrong length for an address")]
    WrongLength,
    #[error("one or both public keys in the address are not valid curve points")]
    InvalidKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Address {
    pub prefix: u64,
    pub spend_public_key: PublicKey,
    pub view_public_key: PublicKey,
}

pub fn encode_address(address: &Address) -> String {
    let mut payload = Vec::with_capacity(1 + 32 + 32 + CHECKSUM_SIZE);
    crate::codec::varint::write_varint(address.prefix, &mut payload);
    payload.extend_from_slice(address.spend_public_key.as_bytes());
    payload.extend_from_slice(address.view_public_key.as_bytes());
    let checksum = keccak256(&payload);
    payload.extend_from_slice(&checksum[..CHECKSUM_SIZE]);
    base58_encode(&payload)
}

pub fn decode_address(encoded: &str) -> Result<Address, AddressError> {
    let payload = base58_decode(encoded)?;
    if payload.len() <= CHECKSUM_SIZE {
        return Err(AddressError::TooShort);
    }
    let (body, checksum) = payload.split_at(payload.len() - CHECKSUM_SIZE);
    let expected = keccak256(body);
    if &expected[..CHECKSUM_SIZE] != checksum {
        return Err(AddressError::ChecksumMismatch);
    }
    let (prefix, consumed) = crate::codec::varint::read_varint(body).map_err(|_| AddressError::WrongLength)?;
    let rest = &body[consumed..];
    if rest.len() != 64 {
        return Err(AddressError::WrongLength);
    }
    let spend_public_key = PublicKey(rest[0..32].try_into().unwrap());
    let view_public_key = PublicKey(rest[32..64].try_into().unwrap());
    if !crate::crypto::keys::check_key(&spend_public_key) || !crate::crypto::keys::check_key(&view_public_key) {
        return Err(AddressError::InvalidKey);
    }
    Ok(Address {
        prefix,
        spend_public_key,
        view_public_key,
    })
}

fn base58_encode(data: &[u8]) -> String {
    let mut out = String::new();
    let full_blocks = data.len() / FULL_BLOCK_SIZE;
    for i in 0..full_blocks {
        out.push_str(&encode_block(&data[i * FULL_BLOCK_SIZE..(i + 1) * FULL_BLOCK_SIZE], FULL_ENCODED_BLOCK_SIZE));
    }
    let remainder = &data[full_blocks * FULL_BLOCK_SIZE..];
    if !remainder.is_empty() {
        out.push_str(&encode_block(remainder, ENCODED_BLOCK_SIZES[remainder.len()]));
    }
    out
}

fn encode_block(block: &[u8], encoded_size: usize) -> String {
    let mut encoded = vec![ALPHABET[0]; encoded_size];
    let mut num = BigUint::from_be_bytes(block);
    let base = 58u64;
    let mut i = encoded_size;
    while !num.is_zero() {
        i -= 1;
        let (quotient, remainder) = num.div_rem_small(base);
        encoded[i] = ALPHABET[remainder as usize];
        num = quotient;
    }
    String::from_utf8(encoded).unwrap()
}

fn base58_decode(encoded: &str) -> Result<Vec<u8>, AddressError> {
    let full_blocks = encoded.len() / FULL_ENCODED_BLOCK_SIZE;
    let remainder_len = encoded.len() % FULL_ENCODED_BLOCK_SIZE;
    let remainder_block_size = if remainder_len == 0 {
        0
    } else {
        ENCODED_BLOCK_SIZES
            .iter()
            .position(|&sz| sz == remainder_len)
            .ok_or(AddressError::InvalidCharacter)?
    };

    let mut out = Vec::new();
    let bytes = encoded.as_bytes();
    for i in 0..full_blocks {
        let chunk = &bytes[i * FULL_ENCODED_BLOCK_SIZE..(i + 1) * FULL_ENCODED_BLOCK_SIZE];
        out.extend_from_slice(&decode_block(chunk, FULL_BLOCK_SIZE)?);
    }
    if remainder_len != 0 {
        let chunk = &bytes[full_blocks * FULL_ENCODED_BLOCK_SIZE..];
        out.extend_from_slice(&decode_block(chunk, remainder_block_size)?);
    }
    Ok(out)
}

fn decode_block(chunk: &[u8], decoded_size: usize) -> Result<Vec<u8>, AddressError> {
    let mut num = BigUint::zero();
    let base = BigUint::from_small(58);
    for &c in chunk {
        let digit = ALPHABET
            .iter()
            .position(|&a| a == c)
            .ok_or(AddressError::InvalidCharacter)? as u64;
        num = num.mul_small(&base).add_small(digit);
    }
    let mut bytes = num.to_be_bytes();
    if bytes.len() > decoded_size {
        return Err(AddressError::WrongLength);
    }
    while bytes.len() < decoded_size {
        bytes.insert(0, 0);
    }
    Ok(bytes)
}

/// A minimal big-unsigned-integer, just enough to drive base58's "divide repeatedly by 58"
/// algorithm without pulling in a general-purpose bignum crate for four arithmetic operations.
#[derive(Clone)]
struct BigUint {
    // Little-endian base-2^32 limbs.
    limbs: Vec<u32>,
}

impl BigUint {
    fn zero() -> Self {
        BigUint { limbs: vec![0] }
    }

    fn from_small(value: u64) -> Self {
        BigUint {
            limbs: vec![(value & 0xffff_ffff) as u32, (value >> 32) as u32],
        }
    }

    fn from_be_bytes(bytes: &[u8]) -> Self {
        let mut value = BigUint::zero();
        for &b in bytes {
            value = value.mul_small(&BigUint::from_small(256)).add_small(u64::from(b));
        }
        value
    }

    fn is_zero(&self) -> bool {
        self.limbs.iter().all(|&l| l == 0)
    }

    fn add_small(mut self, value: u64) -> Self {
        let mut carry = value;
        for limb in self.limbs.iter_mut() {
            let sum = u64::from(*limb) + (carry & 0xffff_ffff);
            *limb = (sum & 0xffff_ffff) as u32;
            carry = (carry >> 32) + (sum >> 32);
            if carry == 0 {
                break;
            }
        }
        while carry > 0 {
            self.limbs.push((carry & 0xffff_ffff) as u32);
            carry >>= 32;
        }
        self.trim()
    }

    fn mul_small(mut self, other: &BigUint) -> Self {
        // `other` is always a one-or-two-limb constant (base 58 or 256) in this module's usage.
        let multiplier: u64 = other.limbs.iter().enumerate().map(|(i, &l)| u64::from(l) << (32 * i)).sum();
        let mut carry: u128 = 0;
        for limb in self.limbs.iter_mut() {
            let product = u128::from(*limb) * u128::from(multiplier) + carry;
            *limb = (product & 0xffff_ffff) as u32;
            carry = product >> 32;
        }
        while carry > 0 {
            self.limbs.push((carry & 0xffff_ffff) as u32);
            carry >>= 32;
        }
        self.trim()
    }

    fn div_rem_small(mut self, divisor: u64) -> (Self, u64) {
        let mut remainder: u128 = 0;
        for limb in self.limbs.iter_mut().rev() {
            let acc = (remainder << 32) | u128::from(*limb);
            *limb = (acc / u128::from(divisor)) as u32;
            remainder = acc % u128::from(divisor);
        }
        self.trim();
        (self, remainder as u64)
    }

    fn trim(mut self) -> Self {
        while self.limbs.len() > 1 && *self.limbs.last().unwrap() == 0 {
            self.limbs.pop();
        }
        self
    }

    fn to_be_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        for &limb in self.limbs.iter().rev() {
            bytes.extend_from_slice(&limb.to_be_bytes());
        }
        while bytes.len() > 1 && bytes[0] == 0 {
            bytes.remove(0);
        }
        if self.is_zero() {
            return Vec::new();
        }
        bytes
    }
}

#[cfg(test)]
mod test {
    use rand::rngs::OsRng;

    use super::*;
    use crate::crypto::keys::generate_keypair;

    #[test]
    fn address_roundtrips() {
        let (spend_public_key, _) = generate_keypair(&mut OsRng);
        let (view_public_key, _) = generate_keypair(&mut OsRng);
        let address = Address {
            prefix: 0x17,
            spend_public_key,
            view_public_key,
        };
        let encoded = encode_address(&address);
        let decoded = decode_address(&encoded).unwrap();
        assert_eq!(decoded, address);
    }

    #[test]
    fn corrupted_checksum_is_rejected() {
        let (spend_public_key, _) = generate_keypair(&mut OsRng);
        let (view_public_key, _) = generate_keypair(&mut OsRng);
        let address = Address {
            prefix: 0x17,
            spend_public_key,
            view_public_key,
        };
        let mut encoded = encode_address(&address).into_bytes();
        let last = encoded.len() - 1;
        encoded[last] = if encoded[last] == b'1' { b'2' } else { b'1' };
        let encoded = String::from_utf8(encoded).unwrap();
        assert!(decode_address(&encoded).is_err());
    }
}
