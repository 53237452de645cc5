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

//! Rejection reasons (§4.H's enumerated list, plus the per-transaction detail the block validator
//! needs to report which of a block's transactions failed and why).

use thiserror::Error;

use crate::types::Hash;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum TransactionRejectionReason {
    #[error("ring size {actual} outside [{min}, {max}]")]
    RingSizeOutOfBounds { actual: usize, min: usize, max: usize },

    #[error("key input references out-of-range global index {index} for amount {amount}")]
    OutputIndexOutOfRange { amount: u64, index: u64 },

    #[error("referenced output is not yet spendable at this height (unlock time not satisfied)")]
    OutputNotUnlocked,

    #[error("key image {0} already spent on this chain")]
    DoubleSpend(Hash),

    #[error("key image {0} spent twice within the same transaction or block")]
    DuplicateKeyImage(Hash),

    #[error("ring signature failed to verify")]
    BadSignature,

    #[error("sum of inputs does not equal sum of outputs plus fee")]
    AmountMismatch,

    #[error("multisig output already used")]
    MultisigOutputAlreadyUsed,

    #[error("unsupported transaction version {0}")]
    BadVersion(u8),

    #[error("fee {actual} is below the minimum {minimum} required at this height")]
    FeeTooLow { actual: u64, minimum: u64 },
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum BlockRejectionReason {
    #[error("block is already known")]
    AlreadyKnown,

    #[error("unsupported major/minor version ({major}, {minor}) for this height")]
    BadVersion { major: u8, minor: u8 },

    #[error("proof of work does not meet the required target")]
    BadPow,

    #[error("timestamp outside the allowed window")]
    BadTimestamp,

    #[error("parent block {0} is unknown")]
    BadParent(Hash),

    #[error("block cumulative size {size} exceeds twice the running median {median}")]
    TooBig { size: usize, median: usize },

    #[error("coinbase transaction is malformed: {0}")]
    BadCoinbase(String),

    #[error("input {index}: {reason}")]
    BadInput { index: usize, reason: TransactionRejectionReason },

    #[error("key image {0} spent by two transactions in the same block")]
    DoubleSpend(Hash),

    #[error("height {height} is checkpointed to a different hash")]
    ChecksumMismatchAtCheckpoint { height: u32 },

    #[error("supplied transaction bodies do not match the block's transaction_hashes list")]
    TransactionSetMismatch,
}
