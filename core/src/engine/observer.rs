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

//! Engine observers: four callbacks external subsystems (p2p relay, RPC notification) register for
//! instead of polling the engine. Registration is append-only; dispatch always happens after the
//! engine's single lock has been released, so an observer can safely call back into the engine.

use std::sync::RwLock;

use crate::{block::BlockEntry, transactions::Transaction, types::Hash};

pub trait BlockchainObserver: Send + Sync {
    fn block_added(&self, _entry: &BlockEntry) {}
    fn block_disconnected(&self, _entry: &BlockEntry) {}
    fn transaction_added(&self, _tx_hash: &Hash, _tx: &Transaction) {}
    fn transaction_removed(&self, _tx_hash: &Hash) {}
}

#[derive(Default)]
pub struct ObserverList {
    observers: RwLock<Vec<Box<dyn BlockchainObserver>>>,
}

impl ObserverList {
    pub fn new() -> Self {
        ObserverList::default()
    }

    pub fn register(&self, observer: Box<dyn BlockchainObserver>) {
        self.observers.write().unwrap().push(observer);
    }

    pub fn notify_block_added(&self, entry: &BlockEntry) {
        for observer in self.observers.read().unwrap().iter() {
            observer.block_added(entry);
        }
    }

    pub fn notify_block_disconnected(&self, entry: &BlockEntry) {
        for observer in self.observers.read().unwrap().iter() {
            observer.block_disconnected(entry);
        }
    }

    pub fn notify_transaction_added(&self, tx_hash: &Hash, tx: &Transaction) {
        for observer in self.observers.read().unwrap().iter() {
            observer.transaction_added(tx_hash, tx);
        }
    }

    pub fn notify_transaction_removed(&self, tx_hash: &Hash) {
        for observer in self.observers.read().unwrap().iter() {
            observer.transaction_removed(tx_hash);
        }
    }
}

#[cfg(test)]
mod test {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    struct CountingObserver {
        added: Arc<AtomicUsize>,
    }

    impl BlockchainObserver for CountingObserver {
        fn block_added(&self, _entry: &BlockEntry) {
            self.added.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn registered_observers_are_notified() {
        let added = Arc::new(AtomicUsize::new(0));
        let list = ObserverList::new();
        list.register(Box::new(CountingObserver { added: added.clone() }));

        let account = crate::transactions::test_helpers::TestAccount::new();
        let (_, tx_secret) = crate::crypto::keys::generate_keypair(&mut rand::rngs::OsRng);
        let coinbase = crate::transactions::test_helpers::build_coinbase_transaction(&account, 1, 1_000_000, &tx_secret);
        let block = crate::block::Block {
            major_version: 1,
            minor_version: 0,
            timestamp: 0,
            previous_block_hash: Hash::zero(),
            nonce: 0,
            base_transaction: coinbase,
            transaction_hashes: vec![],
        };
        let entry = BlockEntry {
            height: 1,
            cumulative_size: 0,
            cumulative_difficulty: 0,
            cumulative_generated_coins: 0,
            block_difficulty: 1,
            transactions: vec![],
            block,
        };
        list.notify_block_added(&entry);
        assert_eq!(added.load(Ordering::SeqCst), 1);
    }
}
