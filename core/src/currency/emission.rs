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

//! `base_reward(S) = max((MAX_SUPPLY - S) >> K, tail_rate(S))` (§4.C, "Emission") plus the
//! height-1 genesis special case and the quadratic size penalty that turns a base reward into the
//! coinbase amount a block must actually carry.

use super::ConsensusParams;
use crate::types::Amount;

/// `max((MAX_SUPPLY - S) >> K, tail_rate(S))`, the pre-penalty block subsidy. `tail_rate` is a
/// Friedman k-percent rule: 2% of already-generated coins, annualized over `blocks_per_day * 365`
/// blocks, computed in two integer steps (`S / 100 * 2` before dividing by the block count) to
/// match the reference implementation's rounding exactly rather than a mathematically-equivalent
/// single-division rewrite.
pub fn calculate_reward(params: &ConsensusParams, already_generated_coins: u64) -> u64 {
    let base_reward_initial = if already_generated_coins < params.money_supply {
        (params.money_supply - already_generated_coins) >> params.emission_speed_factor
    } else {
        0
    };

    let blocks_per_year = params.blocks_per_day * 365;
    let two_percent_of_emission = already_generated_coins / 100 * 2;
    let base_reward_tail = two_percent_of_emission / blocks_per_year;

    base_reward_initial.max(base_reward_tail)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockReward {
    /// The coinbase amount the block's outputs must sum to.
    pub reward: Amount,
    /// Signed change to the running `already_generated_coins` counter this block causes; can be
    /// negative when the penalized fee falls short of the unpenalized fee under
    /// `penalize_fee_by_size`.
    pub emission_change: i64,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RewardError {
    #[error("block cumulative size {size} exceeds twice the median {median}")]
    BlockTooBig { size: usize, median: usize },
}

/// `getBlockReward`: height 1 is a one-block special case granting `genesis_reward` outright
/// (§11, "Genesis premine" — preserved bitwise from the reference, keyed on `height == 1` and not
/// on `already_generated_coins == 0` alone, since that's the literal guard in the original).
/// Every other height computes [`calculate_reward`], applies the running-median size penalty to
/// both reward and fee, and returns their sum.
pub fn block_reward(
    params: &ConsensusParams,
    height: u32,
    median_size: usize,
    current_block_size: usize,
    already_generated_coins: u64,
    fee: u64,
) -> Result<BlockReward, RewardError> {
    if height == 1 {
        return Ok(BlockReward {
            reward: params.genesis_reward,
            emission_change: params.genesis_reward as i64,
        });
    }

    let base_reward = calculate_reward(params, already_generated_coins);
    let median_size = median_size.max(params.block_granted_full_reward_zone);

    if current_block_size > 2 * median_size {
        return Err(RewardError::BlockTooBig {
            size: current_block_size,
            median: median_size,
        });
    }

    let penalized_base_reward = super::size_penalty::penalize_amount(base_reward, median_size, current_block_size);
    let penalize_fee = params.penalize_fee_by_size || height >= params.block_major_version_2_height;
    let penalized_fee = if penalize_fee {
        super::size_penalty::penalize_amount(fee, median_size, current_block_size)
    } else {
        fee
    };

    let emission_change = penalized_base_reward as i64 - (fee as i64 - penalized_fee as i64);
    let reward = penalized_base_reward + penalized_fee;

    Ok(BlockReward { reward, emission_change })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn genesis_height_grants_the_fixed_premine() {
        let params = ConsensusParams::main_net();
        let result = block_reward(&params, 1, 0, 0, 0, 0).unwrap();
        assert_eq!(result.reward, params.genesis_reward);
        assert_eq!(result.emission_change, params.genesis_reward as i64);
    }

    #[test]
    fn reward_halves_roughly_with_the_emission_speed_factor() {
        let params = ConsensusParams::main_net();
        let early = calculate_reward(&params, 0);
        let later = calculate_reward(&params, params.money_supply / 2);
        assert!(later < early);
    }

    #[test]
    fn oversized_block_is_rejected_before_any_reward_is_computed() {
        let params = ConsensusParams::main_net();
        let err = block_reward(&params, 2, 1_000, 2_001, 0, 0).unwrap_err();
        assert_eq!(err, RewardError::BlockTooBig { size: 2_001, median: 1_000 });
    }

    #[test]
    fn tail_emission_eventually_dominates_the_halving_schedule() {
        let params = ConsensusParams::main_net();
        // Once the initial schedule has decayed near zero, the flat 2%-of-supply tail rate wins.
        let near_exhausted = params.money_supply - 1;
        let reward = calculate_reward(&params, near_exhausted);
        assert!(reward > 0);
    }
}
