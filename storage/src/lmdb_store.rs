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

//! A thin, typed wrapper around [`lmdb_zero`], giving every database handle `insert`/`get`/
//! `remove`/`for_each` methods that serialize through `bincode` so callers never touch raw bytes.

use std::{
    collections::HashMap,
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use lmdb_zero::{
    self as lmdb,
    open,
    put,
    traits::AsLmdbBytes,
    ConstAccessor, Database, EnvBuilder, Environment, ReadTransaction, WriteAccessor,
    WriteTransaction,
};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

pub use lmdb_zero::db;

#[derive(Debug, Error)]
pub enum LMDBError {
    #[error("LMDB error: {0}")]
    Lmdb(#[from] lmdb::Error),
    #[error("Unknown database: {0}")]
    UnknownDatabase(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Environment-level tuning knobs. The defaults favour a modest single-node deployment; a fully
/// synced chain database should raise `map_size_mb` well past the default.
#[derive(Debug, Clone)]
pub struct LMDBConfig {
    pub map_size_mb: usize,
    pub max_readers: u32,
    pub no_sync: bool,
}

impl Default for LMDBConfig {
    fn default() -> Self {
        Self {
            map_size_mb: 1024,
            max_readers: 126,
            no_sync: false,
        }
    }
}

/// A handle to a single named database within an [`Environment`]. The `'static` lifetime is a
/// controlled lie: the `Database` genuinely borrows from `env`, but since `env` is always kept
/// alive for at least as long by the enclosing `Arc`, and the handle is never exposed without
/// that `Arc` riding alongside it, the borrow can't outlive its environment in practice.
pub type DatabaseRef = Arc<Database<'static>>;

pub struct LMDBBuilder {
    path: Option<PathBuf>,
    config: LMDBConfig,
    max_databases: u32,
    databases: Vec<(String, lmdb::db::Flags)>,
}

impl LMDBBuilder {
    pub fn new() -> Self {
        Self {
            path: None,
            config: LMDBConfig::default(),
            max_databases: 1,
            databases: Vec::new(),
        }
    }

    pub fn set_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn set_env_config(mut self, config: LMDBConfig) -> Self {
        self.config = config;
        self
    }

    pub fn set_environment_size(mut self, size_mb: usize) -> Self {
        self.config.map_size_mb = size_mb;
        self
    }

    pub fn set_max_number_of_databases(mut self, n: u32) -> Self {
        self.max_databases = n;
        self
    }

    pub fn add_database(mut self, name: &str, flags: lmdb::db::Flags) -> Self {
        self.databases.push((name.to_string(), flags));
        self
    }

    pub fn build(self) -> Result<LMDBStore, LMDBError> {
        let path = self
            .path
            .ok_or_else(|| LMDBError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "no path set")))?;
        std::fs::create_dir_all(&path)?;

        let mut env_builder = EnvBuilder::new()?;
        env_builder.set_mapsize(self.config.map_size_mb * 1024 * 1024)?;
        env_builder.set_maxdbs(self.max_databases.max(self.databases.len() as u32))?;
        env_builder.set_maxreaders(self.config.max_readers)?;

        let mut flags = open::Flags::empty();
        if self.config.no_sync {
            flags |= open::NOSYNC;
        }
        let env = Arc::new(unsafe { env_builder.open(path.to_str().unwrap(), flags, 0o600)? });

        let mut databases = HashMap::with_capacity(self.databases.len());
        for (name, flags) in &self.databases {
            let opts = lmdb::DatabaseOptions::new(*flags);
            // SAFETY: `db` borrows `env` for the lifetime of this function call; the `Arc<Environment>`
            // stored in `LMDBStore`/`LMDBDatabase` alongside every handle keeps it alive for at least
            // as long as any handle derived from it, so extending the borrow to `'static` is sound in
            // practice even though the compiler can't see the relationship.
            let db: Database<'static> =
                unsafe { std::mem::transmute(Database::open(&env, Some(name), &opts)?) };
            databases.insert(name.clone(), Arc::new(db));
        }

        Ok(LMDBStore {
            env,
            path,
            databases,
        })
    }
}

impl Default for LMDBBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub struct LMDBStore {
    env: Arc<Environment>,
    path: PathBuf,
    databases: HashMap<String, DatabaseRef>,
}

impl LMDBStore {
    pub fn get_handle(&self, name: &str) -> Result<LMDBDatabase, LMDBError> {
        let db = self
            .databases
            .get(name)
            .cloned()
            .ok_or_else(|| LMDBError::UnknownDatabase(name.to_string()))?;
        Ok(LMDBDatabase {
            env: self.env.clone(),
            db,
            name: name.to_string(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn flush(&self) -> Result<(), LMDBError> {
        self.env.sync(true)?;
        Ok(())
    }

    pub fn log_info(&self) {
        tracing::debug!(target: "ringnote::storage", path = %self.path.display(), databases = self.databases.len(), "lmdb environment stats logged");
    }
}

/// A handle to a single database, carrying its own `Arc<Environment>` so it can open
/// transactions independently of the `LMDBStore` it came from.
#[derive(Clone)]
pub struct LMDBDatabase {
    env: Arc<Environment>,
    db: DatabaseRef,
    name: String,
}

impl fmt::Debug for LMDBDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LMDBDatabase").field("name", &self.name).finish()
    }
}

impl LMDBDatabase {
    pub fn db(&self) -> &DatabaseRef {
        &self.db
    }

    pub fn env(&self) -> &Arc<Environment> {
        &self.env
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn insert<K: Serialize, V: Serialize>(&self, key: &K, value: &V) -> Result<(), LMDBError> {
        let key_bytes = bincode::serialize(key).map_err(|e| LMDBError::Serialization(e.to_string()))?;
        let val_bytes = bincode::serialize(value).map_err(|e| LMDBError::Serialization(e.to_string()))?;
        let txn = WriteTransaction::new(&self.env)?;
        {
            let mut access = txn.access();
            access.put(&self.db, key_bytes.as_lmdb_bytes(), val_bytes.as_lmdb_bytes(), put::Flags::empty())?;
        }
        txn.commit()?;
        Ok(())
    }

    pub fn get<K: Serialize, V: DeserializeOwned>(&self, key: &K) -> Result<Option<V>, LMDBError> {
        let key_bytes = bincode::serialize(key).map_err(|e| LMDBError::Serialization(e.to_string()))?;
        let txn = ReadTransaction::new(&self.env)?;
        let access = txn.access();
        match access.get::<[u8], [u8]>(&self.db, key_bytes.as_lmdb_bytes()) {
            Ok(raw) => {
                let value = bincode::deserialize(raw).map_err(|e| LMDBError::Serialization(e.to_string()))?;
                Ok(Some(value))
            },
            Err(lmdb::Error::Code(lmdb::error::NOTFOUND)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn contains_key<K: Serialize>(&self, key: &K) -> Result<bool, LMDBError> {
        let key_bytes = bincode::serialize(key).map_err(|e| LMDBError::Serialization(e.to_string()))?;
        let txn = ReadTransaction::new(&self.env)?;
        let access = txn.access();
        match access.get::<[u8], [u8]>(&self.db, key_bytes.as_lmdb_bytes()) {
            Ok(_) => Ok(true),
            Err(lmdb::Error::Code(lmdb::error::NOTFOUND)) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    pub fn remove<K: Serialize>(&self, key: &K) -> Result<(), LMDBError> {
        let key_bytes = bincode::serialize(key).map_err(|e| LMDBError::Serialization(e.to_string()))?;
        let txn = WriteTransaction::new(&self.env)?;
        {
            let mut access = txn.access();
            match access.del_key(&self.db, key_bytes.as_lmdb_bytes()) {
                Ok(()) => {},
                Err(lmdb::Error::Code(lmdb::error::NOTFOUND)) => {},
                Err(e) => return Err(e.into()),
            }
        }
        txn.commit()?;
        Ok(())
    }

    pub fn len(&self) -> Result<usize, LMDBError> {
        let txn = ReadTransaction::new(&self.env)?;
        let stat = txn.db_stat(&self.db)?;
        Ok(stat.entries)
    }

    pub fn with_write_transaction<F>(&self, f: F) -> Result<(), LMDBError>
    where F: FnOnce(&mut WriteAccessor<'_>, &DatabaseRef) -> Result<(), LMDBError> {
        let txn = WriteTransaction::new(&self.env)?;
        {
            let mut access = txn.access();
            f(&mut access, &self.db)?;
        }
        txn.commit()?;
        Ok(())
    }

    pub fn with_read_transaction<F, R>(&self, f: F) -> Result<R, LMDBError>
    where F: FnOnce(&ConstAccessor<'_>, &DatabaseRef) -> Result<R, LMDBError> {
        let txn = ReadTransaction::new(&self.env)?;
        let access = txn.access();
        f(&access, &self.db)
    }

    pub fn for_each<K, V, F>(&self, mut f: F) -> Result<(), LMDBError>
    where
        K: DeserializeOwned,
        V: DeserializeOwned,
        F: FnMut(Result<(K, V), LMDBError>),
    {
        let txn = ReadTransaction::new(&self.env)?;
        let access = txn.access();
        let mut cursor = txn.cursor(&self.db)?;
        while let Ok((key_raw, val_raw)) = cursor.next::<[u8], [u8]>(&access) {
            let entry = bincode::deserialize::<K>(key_raw)
                .and_then(|k| bincode::deserialize::<V>(val_raw).map(|v| (k, v)))
                .map_err(|e| LMDBError::Serialization(e.to_string()));
            f(entry);
        }
        Ok(())
    }

    pub fn flush(&self) -> Result<(), LMDBError> {
        self.env.sync(true)?;
        Ok(())
    }

    pub fn log_info(&self) {
        tracing::debug!(target: "ringnote::storage", database = %self.name, "lmdb database stats logged");
    }
}
