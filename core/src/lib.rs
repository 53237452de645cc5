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

//! # Ringnote Core
//!
//! The consensus core of a CryptoNote-lineage proof-of-work chain: ring-signature transaction
//! validation, block and chain storage with reorg support, a fee-priority mempool, and the
//! currency/emission/difficulty rules that tie them together.
//!
//! ## Modules
//!
//! - `types` - the shared `Hash`/`Amount` primitives every other module builds on
//! - `crypto` - keys, linkable ring signatures, domain-separated hashing, proof of work
//! - `codec` - canonical wire encoding (varint, Base58 addresses)
//! - `currency` - emission curve, difficulty retargeting, fees, size penalty, upgrade voting
//! - `transactions` - the transaction data model and one-time-output shuffling
//! - `block` - the block data model
//! - `chain_storage` - the persisted chain: block index, output index, key image set, checkpoints
//! - `mempool` - the fee-priority transaction pool
//! - `validation` - the stateless and chain-view-dependent acceptance rules
//! - `engine` - `Blockchain`, the single entry point tying storage, mempool and reorg together

#![deny(unused_must_use)]
#![deny(unreachable_patterns)]

pub mod block;
pub mod chain_storage;
pub mod codec;
pub mod crypto;
pub mod currency;
pub mod engine;
pub mod mempool;
pub mod transactions;
pub mod types;
pub mod validation;
