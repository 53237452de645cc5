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

//! The engine's top-level error: every layer's error rolled into one, plus the outcome unique to
//! the engine itself (the shutdown signal firing mid-call).

use thiserror::Error;

use crate::{
    chain_storage::ChainStorageError,
    mempool::MempoolError,
    validation::{BlockRejectionReason, TransactionRejectionReason},
};

#[derive(Debug, Error)]
pub enum BlockchainError {
    #[error(transparent)]
    ChainStorage(#[from] ChainStorageError),

    #[error(transparent)]
    Mempool(#[from] MempoolError),

    #[error("block rejected: {0}")]
    BlockRejected(#[from] BlockRejectionReason),

    #[error("transaction rejected: {0}")]
    TransactionRejected(#[from] TransactionRejectionReason),

    #[error("engine is shutting down")]
    ShuttingDown,

    #[error("reorg depth {depth} exceeds the configured limit {limit}")]
    ReorgTooDeep { depth: u64, limit: u64 },
}
