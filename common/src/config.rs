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

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::dir_utils::default_data_dir;

/// Top-level node configuration, loaded from a TOML file and overridable by CLI flags via
/// [`config::Config`]'s layered sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    pub network: NetworkConfig,

    /// Root directory for the block index, output index, key-image set and LMDB environment.
    pub data_dir: PathBuf,

    /// Run against testnet consensus rules (lower minimum difficulty floor, relaxed checkpoint set).
    pub testnet: bool,

    /// Optional path to a file of height -> block-hash checkpoint pins.
    pub checkpoints_file: Option<PathBuf>,

    /// Permit a chain switch whose common ancestor is more than `reorg_depth_limit` blocks back.
    pub allow_deep_reorg: bool,

    /// Maximum reorg depth considered, when `allow_deep_reorg` is false.
    pub reorg_depth_limit: u64,

    /// Maintain the secondary by-amount output index and key-image set needed to answer queries,
    /// as opposed to running in a minimal validate-only mode.
    pub blockchain_indices_enabled: bool,

    /// Skip caching the serialized hashing blob alongside each stored block.
    pub no_blobs: bool,

    pub rpc_bind: String,
    pub p2p_bind: String,

    pub add_priority_node: Vec<String>,
    pub add_exclusive_node: Vec<String>,
    pub seed_node: Vec<String>,

    pub ban_list_file: Option<PathBuf>,
    pub connections_count: u32,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig::MainNet,
            data_dir: default_data_dir(),
            testnet: false,
            checkpoints_file: None,
            allow_deep_reorg: false,
            reorg_depth_limit: 100,
            blockchain_indices_enabled: true,
            no_blobs: false,
            rpc_bind: "127.0.0.1:18081".to_string(),
            p2p_bind: "0.0.0.0:18080".to_string(),
            add_priority_node: Vec::new(),
            add_exclusive_node: Vec::new(),
            seed_node: Vec::new(),
            ban_list_file: None,
            connections_count: 8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetworkConfig {
    MainNet,
    TestNet,
}

impl NodeConfig {
    /// Load configuration layered as: built-in defaults, then an optional TOML file at `path`, then
    /// environment variables prefixed `RINGNOTE_`. Later layers override earlier ones.
    pub fn load(path: Option<&std::path::Path>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::new();
        let defaults = Self::default();
        builder.merge(config::Config::try_from(&defaults)?)?;
        if let Some(path) = path {
            builder.merge(config::File::from(path).required(false))?;
        }
        builder.merge(config::Environment::with_prefix("RINGNOTE").separator("__"))?;
        builder.try_into()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_config_is_mainnet_with_indices_enabled() {
        let config = NodeConfig::default();
        assert_eq!(config.network, NetworkConfig::MainNet);
        assert!(config.blockchain_indices_enabled);
        assert!(!config.testnet);
    }

    #[test]
    fn load_with_no_file_falls_back_to_defaults() {
        let config = NodeConfig::load(None).unwrap();
        assert_eq!(config.connections_count, 8);
    }
}
