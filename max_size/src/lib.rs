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

//! Bounded-size collection wrappers.
//!
//! Several wire structures (a transaction's extra field, the set of outputs in a block, a ring
//! signature's member list) are only valid consensus data up to a fixed maximum length. Rather
//! than check that bound at every call site, `MaxSizeVec`/`MaxSizeBytes`/`MaxSizeString` enforce
//! it once, at construction and at deserialization, so a value of this type is a proof the bound
//! holds.

use std::ops::Deref;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MaxSizeError {
    #[error("length {actual} exceeds the maximum of {max}")]
    ExceedsMaximum { actual: usize, max: usize },
}

/// A `Vec<T>` that can never grow past `MAX` elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<T>", into = "Vec<T>")]
pub struct MaxSizeVec<T, const MAX: usize> {
    inner: Vec<T>,
}

impl<T, const MAX: usize> MaxSizeVec<T, MAX> {
    pub fn new(inner: Vec<T>) -> Result<Self, MaxSizeError> {
        if inner.len() > MAX {
            return Err(MaxSizeError::ExceedsMaximum {
                actual: inner.len(),
                max: MAX,
            });
        }
        Ok(Self { inner })
    }

    pub fn empty() -> Self {
        Self { inner: Vec::new() }
    }

    pub fn push(&mut self, value: T) -> Result<(), MaxSizeError> {
        if self.inner.len() >= MAX {
            return Err(MaxSizeError::ExceedsMaximum {
                actual: self.inner.len() + 1,
                max: MAX,
            });
        }
        self.inner.push(value);
        Ok(())
    }

    pub fn into_vec(self) -> Vec<T> {
        self.inner
    }

    pub fn max(&self) -> usize {
        MAX
    }
}

impl<T, const MAX: usize> TryFrom<Vec<T>> for MaxSizeVec<T, MAX> {
    type Error = MaxSizeError;

    fn try_from(value: Vec<T>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<T, const MAX: usize> From<MaxSizeVec<T, MAX>> for Vec<T> {
    fn from(value: MaxSizeVec<T, MAX>) -> Self {
        value.inner
    }
}

impl<T, const MAX: usize> Deref for MaxSizeVec<T, MAX> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T: BorshSerialize, const MAX: usize> BorshSerialize for MaxSizeVec<T, MAX> {
    fn serialize<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
        self.inner.serialize(writer)
    }
}

impl<T: BorshDeserialize, const MAX: usize> BorshDeserialize for MaxSizeVec<T, MAX> {
    fn deserialize_reader<R: std::io::Read>(reader: &mut R) -> std::io::Result<Self> {
        let inner = Vec::<T>::deserialize_reader(reader)?;
        Self::new(inner).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }
}

/// A byte buffer bounded at `MAX` bytes, used for the transaction `extra` field and similar
/// free-form wire payloads that consensus only constrains by length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct MaxSizeBytes<const MAX: usize> {
    inner: Vec<u8>,
}

impl<const MAX: usize> MaxSizeBytes<MAX> {
    pub fn new(inner: Vec<u8>) -> Result<Self, MaxSizeError> {
        if inner.len() > MAX {
            return Err(MaxSizeError::ExceedsMaximum {
                actual: inner.len(),
                max: MAX,
            });
        }
        Ok(Self { inner })
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.inner
    }
}

impl<const MAX: usize> TryFrom<Vec<u8>> for MaxSizeBytes<MAX> {
    type Error = MaxSizeError;

    fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<const MAX: usize> From<MaxSizeBytes<MAX>> for Vec<u8> {
    fn from(value: MaxSizeBytes<MAX>) -> Self {
        value.inner
    }
}

impl<const MAX: usize> Deref for MaxSizeBytes<MAX> {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<const MAX: usize> BorshSerialize for MaxSizeBytes<MAX> {
    fn serialize<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
        self.inner.serialize(writer)
    }
}

impl<const MAX: usize> BorshDeserialize for MaxSizeBytes<MAX> {
    fn deserialize_reader<R: std::io::Read>(reader: &mut R) -> std::io::Result<Self> {
        let inner = Vec::<u8>::deserialize_reader(reader)?;
        Self::new(inner).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn rejects_over_capacity() {
        let err = MaxSizeVec::<u8, 2>::new(vec![1, 2, 3]).unwrap_err();
        assert_eq!(
            err,
            MaxSizeError::ExceedsMaximum { actual: 3, max: 2 }
        );
    }

    #[test]
    fn accepts_at_capacity() {
        let v = MaxSizeVec::<u8, 2>::new(vec![1, 2]).unwrap();
        assert_eq!(v.len(), 2);
    }

    #[test]
    fn push_past_capacity_fails() {
        let mut v = MaxSizeVec::<u8, 1>::empty();
        v.push(1).unwrap();
        assert!(v.push(2).is_err());
    }

    #[test]
    fn bytes_bound_is_enforced() {
        assert!(MaxSizeBytes::<4>::new(vec![0u8; 5]).is_err());
        assert!(MaxSizeBytes::<4>::new(vec![0u8; 4]).is_ok());
    }
}
