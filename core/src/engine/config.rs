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

//! Engine-level configuration: the consensus parameters plus the reorg policy, built from
//! [`ringnote_common::NodeConfig`] so the engine itself never branches on `testnet` directly.

use ringnote_common::NodeConfig;

use crate::currency::ConsensusParams;

/// CryptoNote's future-time-limit constant: how far ahead of the node's own clock a block's
/// timestamp may sit and still be accepted.
pub const DEFAULT_FUTURE_TIME_LIMIT: u64 = 60 * 60 * 2;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub params: ConsensusParams,
    pub allow_deep_reorg: bool,
    pub reorg_depth_limit: u64,
    pub future_time_limit: u64,
    pub payment_id_index_enabled: bool,
}

impl EngineConfig {
    pub fn from_node_config(node: &NodeConfig) -> Self {
        EngineConfig {
            params: ConsensusParams::from_network(node.network),
            allow_deep_reorg: node.allow_deep_reorg,
            reorg_depth_limit: node.reorg_depth_limit,
            future_time_limit: DEFAULT_FUTURE_TIME_LIMIT,
            payment_id_index_enabled: node.blockchain_indices_enabled,
        }
    }
}

#[cfg(test)]
mod test {
    use ringnote_common::NetworkConfig;

    use super::*;

    #[test]
    fn picks_consensus_params_from_the_network() {
        let node = NodeConfig {
            network: NetworkConfig::TestNet,
            ..NodeConfig::default()
        };
        let config = EngineConfig::from_node_config(&node);
        assert!(config.params.testnet);
        assert_eq!(config.reorg_depth_limit, node.reorg_depth_limit);
    }

    #[test]
    fn mainnet_keeps_the_difficulty_floor() {
        let node = NodeConfig::default();
        let config = EngineConfig::from_node_config(&node);
        assert!(!config.params.testnet);
        assert_eq!(config.params.difficulty_floor, 100_000);
    }
}
