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

//! Adapts [`ringnote_storage::lmdb_store::LMDBDatabase`] — which is keyed generically but has no
//! `len`-via-trait story of its own — to the [`KeyValueStore`] trait the chain indices are written
//! against, so a production node can point the same index code at an on-disk LMDB environment
//! instead of [`super::MemoryKeyValueStore`].

use std::marker::PhantomData;

use ringnote_storage::{lmdb_store::LMDBDatabase, DataError, KeyValueStore};
use serde::{de::DeserializeOwned, Serialize};

pub struct TypedLmdbStore<K, V> {
    database: LMDBDatabase,
    _marker: PhantomData<fn() -> (K, V)>,
}

impl<K, V> TypedLmdbStore<K, V> {
    pub fn new(database: LMDBDatabase) -> Self {
        TypedLmdbStore {
            database,
            _marker: PhantomData,
        }
    }
}

impl<K, V> KeyValueStore<K, V> for TypedLmdbStore<K, V>
where
    K: Serialize + DeserializeOwned,
    V: Serialize + DeserializeOwned,
{
    fn get(&self, key: &K) -> Result<Option<V>, DataError> {
        Ok(self.database.get(key)?)
    }

    fn contains_key(&self, key: &K) -> Result<bool, DataError> {
        Ok(self.database.contains_key(key)?)
    }

    fn insert(&self, key: &K, value: &V) -> Result<(), DataError> {
        Ok(self.database.insert(key, value)?)
    }

    fn remove(&self, key: &K) -> Result<Option<V>, DataError> {
        let existing = self.database.get(key)?;
        self.database.remove(key)?;
        Ok(existing)
    }

    fn len(&self) -> Result<usize, DataError> {
        Ok(self.database.len()?)
    }
}
