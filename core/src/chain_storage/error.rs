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

use thiserror::Error;

/// Errors surfaced by the block index, output index, key-image set and their backing stores.
/// `DatabaseResyncRequired` is the distinguished "invariant breach" variant (error taxonomy, table
/// row "Invariant breach"): once returned, the engine quarantines itself until a caller rebuilds
/// the indices from the canonical block sequence.
#[derive(Debug, Error)]
pub enum ChainStorageError {
    #[error("backend error: {0}")]
    Backend(#[from] ringnote_storage::DataError),

    #[error("height {0} not found in the block index")]
    HeightNotFound(u32),

    #[error("block hash {0} not found in the block index")]
    HashNotFound(crate::types::Hash),

    #[error("amount {amount} has no output at global index {index}")]
    OutputIndexNotFound { amount: u64, index: u64 },

    #[error("multisig output {amount}:{index} not found")]
    MultisigOutputNotFound { amount: u64, index: u64 },

    #[error("key image {0:?} is not in the spent set")]
    KeyImageNotFound(crate::types::Hash),

    #[error("chain index is internally inconsistent and must be rebuilt from the block sequence")]
    DatabaseResyncRequired,
}
