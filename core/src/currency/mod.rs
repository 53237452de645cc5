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

//! Component C: network-specific consensus constants and the rules that consume them (emission,
//! size penalty, fee floor, difficulty retargeting, upgrade voting). Everything here is plain data
//! and pure functions over that data — the engine never branches on `testnet` itself, it only ever
//! reads a [`ConsensusParams`] (§10's "Configuration" note).

pub mod difficulty;
pub mod emission;
pub mod fee;
pub mod size_penalty;
pub mod upgrade;

use ringnote_common::NetworkConfig;

use crate::types::Amount;

pub use difficulty::{next_difficulty, BlockVersion};
pub use emission::block_reward;
pub use fee::{fee_per_extra_byte, minimum_fee};
pub use size_penalty::penalize_amount;
pub use upgrade::UpgradeVoting;

/// Every network-specific constant named in §4.C, gathered into one record so the engine reads
/// `ConsensusParams` rather than branching on a network flag at each call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsensusParams {
    /// Total atomic units ever to be emitted by the initial (non-tail) schedule.
    pub money_supply: u64,
    /// `K` in `base_reward(S) = (MAX_SUPPLY - S) >> K`.
    pub emission_speed_factor: u32,
    /// Blocks assumed to occur in a day, used to annualize the tail-emission rate.
    pub blocks_per_day: u64,

    /// The height-1 genesis premine grant, in atomic units (§11, "Genesis premine").
    pub genesis_reward: Amount,

    /// Block size, below which the size penalty never applies, regardless of the running median.
    pub block_granted_full_reward_zone: usize,
    /// Window (in blocks) the running median block size is computed over.
    pub reward_blocks_window: usize,

    /// `penalize_fee_by_size` gates whether the fee (not just the reward) is penalized below the
    /// block-major-version-2 threshold; preserved as an explicit bool rather than inferred from
    /// the version number so a deployment can flip it independently (§11, "Fee policy guard").
    pub penalize_fee_by_size: bool,
    pub minimum_fee_v1: u64,
    pub minimum_fee_v2: u64,
    pub minimum_fee_v3: u64,

    pub difficulty_target: u64,
    pub difficulty_window: usize,
    pub difficulty_cut: usize,
    pub difficulty_window_v2: usize,
    pub difficulty_window_v3: usize,
    pub difficulty_window_v4: usize,
    pub difficulty_window_v5: usize,
    /// `1000` in the reference implementation; see §9's open question on generalizing it.
    pub difficulty_reset_divisor_v5: u64,
    /// Non-testnet floor applied to every v2-v5 retargeting algorithm's result.
    pub difficulty_floor: u64,

    pub block_major_version_2_height: u32,
    pub block_major_version_3_height: u32,
    pub block_major_version_4_height: u32,
    /// Sub-height inside v4's window at which LWMA-2 switches to LWMA-3's monotonic-timestamp rule.
    pub block_major_version_4_1_height: u32,
    pub block_major_version_5_height: u32,

    pub upgrade_voting_threshold_percent: u32,
    pub upgrade_voting_window: u32,
    pub upgrade_window: u32,

    pub min_mixin: usize,
    pub max_mixin: usize,

    pub mined_money_unlock_window: u64,
    pub timestamp_check_window: usize,

    pub testnet: bool,
}

impl ConsensusParams {
    /// Production mainnet constants, as the reference chain deploys them.
    pub fn main_net() -> Self {
        ConsensusParams {
            money_supply: u64::MAX >> 4,
            emission_speed_factor: 20,
            blocks_per_day: 720,

            genesis_reward: 1_000_000 * COIN,

            block_granted_full_reward_zone: 100_000,
            reward_blocks_window: 100,

            penalize_fee_by_size: false,
            minimum_fee_v1: 10_000_000,
            minimum_fee_v2: 1_000_000,
            minimum_fee_v3: 100_000,

            difficulty_target: 120,
            difficulty_window: 720,
            difficulty_cut: 60,
            difficulty_window_v2: 720,
            difficulty_window_v3: 45,
            difficulty_window_v4: 60,
            difficulty_window_v5: 60,
            difficulty_reset_divisor_v5: 1000,
            difficulty_floor: 100_000,

            block_major_version_2_height: 100_000,
            block_major_version_3_height: 200_000,
            block_major_version_4_height: 300_000,
            block_major_version_4_1_height: 300_100,
            block_major_version_5_height: 400_000,

            upgrade_voting_threshold_percent: 90,
            upgrade_voting_window: 720,
            upgrade_window: 720,

            min_mixin: 0,
            max_mixin: 100,

            mined_money_unlock_window: 60,
            timestamp_check_window: 60,

            testnet: false,
        }
    }

    /// Testnet relaxes the difficulty floor to keep a local chain mineable in seconds rather than
    /// hours, and drops the upgrade-voting threshold so a handful of local test miners can flip
    /// versions without simulating a supermajority.
    pub fn test_net() -> Self {
        ConsensusParams {
            difficulty_floor: 1,
            upgrade_voting_threshold_percent: 51,
            testnet: true,
            ..Self::main_net()
        }
    }

    pub fn from_network(network: NetworkConfig) -> Self {
        match network {
            NetworkConfig::MainNet => Self::main_net(),
            NetworkConfig::TestNet => Self::test_net(),
        }
    }

    /// The block-major-version active at `height`, per the fixed hard-activation heights (§4.C,
    /// "Upgrade voting": "a fixed height defines the hard activation").
    pub fn block_version_at(&self, height: u32) -> BlockVersion {
        if height >= self.block_major_version_5_height {
            BlockVersion::V5
        } else if height >= self.block_major_version_4_height {
            BlockVersion::V4
        } else if height >= self.block_major_version_3_height {
            BlockVersion::V3
        } else if height >= self.block_major_version_2_height {
            BlockVersion::V2
        } else {
            BlockVersion::V1
        }
    }
}

/// Atomic units per display unit (10^`decimal_places`); mainnet and testnet both use 8 decimal
/// places, matching the reference `numberOfDecimalPlaces` default.
pub const COIN: u64 = 100_000_000;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn block_version_boundaries_are_inclusive_of_the_activation_height() {
        let params = ConsensusParams::main_net();
        assert_eq!(params.block_version_at(0), BlockVersion::V1);
        assert_eq!(params.block_version_at(params.block_major_version_2_height - 1), BlockVersion::V1);
        assert_eq!(params.block_version_at(params.block_major_version_2_height), BlockVersion::V2);
        assert_eq!(params.block_version_at(params.block_major_version_5_height), BlockVersion::V5);
    }

    #[test]
    fn testnet_drops_the_difficulty_floor() {
        assert_eq!(ConsensusParams::test_net().difficulty_floor, 1);
        assert_eq!(ConsensusParams::main_net().difficulty_floor, 100_000);
    }
}
