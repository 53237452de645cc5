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

//! An in-memory [`KeyValueStore`] backend, used by unit tests and by any embedded deployment that
//! doesn't want an LMDB environment on disk.

use std::{
    collections::HashMap,
    hash::Hash,
    sync::RwLock,
};

use serde::{de::DeserializeOwned, Serialize};

use crate::{DataError, KeyValueStore};

pub struct MemoryKeyValueStore<K, V> {
    inner: RwLock<HashMap<K, V>>,
}

impl<K, V> MemoryKeyValueStore<K, V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> Default for MemoryKeyValueStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> KeyValueStore<K, V> for MemoryKeyValueStore<K, V>
where
    K: Serialize + DeserializeOwned + Eq + Hash + Clone,
    V: Serialize + DeserializeOwned + Clone,
{
    fn get(&self, key: &K) -> Result<Option<V>, DataError> {
        Ok(self.inner.read().unwrap().get(key).cloned())
    }

    fn contains_key(&self, key: &K) -> Result<bool, DataError> {
        Ok(self.inner.read().unwrap().contains_key(key))
    }

    fn insert(&self, key: &K, value: &V) -> Result<(), DataError> {
        self.inner.write().unwrap().insert(key.clone(), value.clone());
        Ok(())
    }

    fn remove(&self, key: &K) -> Result<Option<V>, DataError> {
        Ok(self.inner.write().unwrap().remove(key))
    }

    fn len(&self) -> Result<usize, DataError> {
        Ok(self.inner.read().unwrap().len())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn insert_get_remove_roundtrip() {
        let store: MemoryKeyValueStore<u64, String> = MemoryKeyValueStore::new();
        assert_eq!(store.len().unwrap(), 0);
        store.insert(&1, &"one".to_string()).unwrap();
        assert!(store.contains_key(&1).unwrap());
        assert_eq!(store.get(&1).unwrap(), Some("one".to_string()));
        assert_eq!(store.remove(&1).unwrap(), Some("one".to_string()));
        assert!(!store.contains_key(&1).unwrap());
    }
}
