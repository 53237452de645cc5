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

//! Block-level checks (§4.H step 2). Timestamp and version checks are pure functions over the
//! recent-block history the engine already has in hand; PoW, coinbase and size checks each take
//! exactly the inputs they need rather than the whole chain view.

use crate::{
    block::Block,
    crypto::pow::{meets_target, ProofOfWorkHasher},
    currency::{block_reward, penalize_amount, BlockVersion, ConsensusParams},
    transactions::Transaction,
    types::Amount,
};

use super::error::BlockRejectionReason;

/// `median(last K timestamps) <= ts <= now + FTL` (§4.H "Timestamp rule"). `recent_timestamps`
/// must already be the last `K` main-chain timestamps, oldest first.
pub fn validate_timestamp(ts: u64, recent_timestamps: &[u64], now: u64, future_time_limit: u64) -> Result<(), BlockRejectionReason> {
    if !recent_timestamps.is_empty() {
        let mut sorted = recent_timestamps.to_vec();
        sorted.sort_unstable();
        let median = sorted[sorted.len() / 2];
        if ts < median {
            return Err(BlockRejectionReason::BadTimestamp);
        }
    }
    if ts > now + future_time_limit {
        return Err(BlockRejectionReason::BadTimestamp);
    }
    Ok(())
}

pub fn validate_version(block: &Block, expected: BlockVersion) -> Result<(), BlockRejectionReason> {
    let expected_major = expected as u8 + 1;
    if block.major_version != expected_major {
        return Err(BlockRejectionReason::BadVersion { major: block.major_version, minor: block.minor_version });
    }
    Ok(())
}

/// Checks a checkpoint-free proof of work: `pow_hash(blob) <= 2^256 / difficulty`.
pub fn validate_pow(block: &Block, difficulty: u64, hasher: &dyn ProofOfWorkHasher) -> Result<(), BlockRejectionReason> {
    let hash = hasher.pow_hash(&block.hashing_blob());
    if meets_target(&hash, difficulty) {
        Ok(())
    } else {
        Err(BlockRejectionReason::BadPow)
    }
}

pub fn validate_size(cumulative_size: usize, median_size: usize) -> Result<(), BlockRejectionReason> {
    if cumulative_size > 2 * median_size.max(1) {
        return Err(BlockRejectionReason::TooBig { size: cumulative_size, median: median_size });
    }
    Ok(())
}

/// Validates `input[0] == Coinbase(height)`, unlock_time, and that the coinbase output sum equals
/// the penalized block reward plus the penalized sum of the block's fees (§4.H steps 2c/2f).
pub fn validate_coinbase(
    coinbase: &Transaction,
    height: u32,
    params: &ConsensusParams,
    median_size: usize,
    cumulative_size: usize,
    already_generated_coins: u64,
    total_fees: Amount,
) -> Result<u64, BlockRejectionReason> {
    match coinbase.inputs.as_slice() {
        [crate::transactions::TransactionInput::Coinbase { height: input_height }] if *input_height == height => {}
        _ => return Err(BlockRejectionReason::BadCoinbase("input[0] must be Coinbase(height)".to_string())),
    }

    let expected_unlock = height as u64 + params.mined_money_unlock_window;
    if coinbase.unlock_time != expected_unlock {
        return Err(BlockRejectionReason::BadCoinbase(format!(
            "unlock_time {} does not equal height + unlock window {}",
            coinbase.unlock_time, expected_unlock
        )));
    }

    let reward = block_reward(params, height, median_size, cumulative_size, already_generated_coins, 0)
        .map_err(|e| BlockRejectionReason::BadCoinbase(e.to_string()))?;

    let penalize_fee = params.penalize_fee_by_size || height >= params.block_major_version_2_height;
    let penalized_fee = if penalize_fee { penalize_amount(total_fees, median_size, cumulative_size) } else { total_fees };

    let expected_total = reward.reward + penalized_fee;
    let actual_total = coinbase.total_output_amount();
    if actual_total != expected_total {
        return Err(BlockRejectionReason::BadCoinbase(format!(
            "coinbase outputs sum to {actual_total}, expected {expected_total} (reward {} + fee {penalized_fee})",
            reward.reward
        )));
    }
    Ok(reward.reward)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn timestamp_must_be_at_least_the_window_median() {
        let recent = vec![100, 200, 300];
        assert!(validate_timestamp(300, &recent, 1000, 7200).is_ok());
        assert!(validate_timestamp(150, &recent, 1000, 7200).is_err());
    }

    #[test]
    fn timestamp_must_not_exceed_future_time_limit() {
        assert!(validate_timestamp(2000, &[], 1000, 500).is_err());
        assert!(validate_timestamp(1400, &[], 1000, 500).is_ok());
    }

    #[test]
    fn size_over_twice_the_median_is_rejected() {
        assert!(validate_size(1999, 1000).is_ok());
        assert!(validate_size(2001, 1000).is_err());
    }

    #[test]
    fn coinbase_must_carry_exactly_the_expected_reward() {
        let params = ConsensusParams::main_net();
        let account = crate::transactions::test_helpers::TestAccount::new();
        let (_, tx_secret) = crate::crypto::keys::generate_keypair(&mut rand::rngs::OsRng);

        let reward = block_reward(&params, 1, 0, 0, 0, 0).unwrap().reward;
        let coinbase = crate::transactions::test_helpers::build_coinbase_transaction(&account, 1, reward, &tx_secret);
        let mut coinbase_with_unlock = coinbase.clone();
        coinbase_with_unlock.unlock_time = 1 + params.mined_money_unlock_window;

        assert!(validate_coinbase(&coinbase_with_unlock, 1, &params, 0, 0, 0, 0).is_ok());
        assert!(validate_coinbase(&coinbase, 1, &params, 0, 0, 0, 0).is_err());
    }
}
