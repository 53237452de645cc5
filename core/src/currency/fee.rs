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

//! Minimum fee floor, piecewise constant across height bands (§4.C, "Minimum fee"), plus the
//! extra-field byte surcharge.

use super::ConsensusParams;
use crate::types::Amount;

/// The minimum fee a transaction confirmed at `height` must pay. Three bands: a block-major-v1
/// rate, a v2 rate activated one block after v3's hard height (`UPGRADE_HEIGHT_V3_1` in the
/// reference — the "_1" suffix marks a sub-height inside the v3 window, not a typo), and a v3 rate
/// thereafter that remains in force through v4 and beyond (the reference's final `else` branch
/// returns the same constant for both of its last two conditions).
pub fn minimum_fee(params: &ConsensusParams, height: u32) -> u64 {
    if height <= params.block_major_version_3_height {
        params.minimum_fee_v1
    } else if height <= params.block_major_version_4_height {
        params.minimum_fee_v2
    } else {
        params.minimum_fee_v3
    }
}

/// Every byte of `extra` past the first 100 costs `min_fee / 100` (§4.C: "if the extra field
/// exceeds 100 bytes, add `(extra_size - 100) * min_fee / 100`").
pub fn fee_per_extra_byte(extra_size: usize, min_fee: u64) -> u64 {
    if extra_size > 100 {
        min_fee / 100 * (extra_size as u64 - 100)
    } else {
        0
    }
}

/// The total minimum fee a transaction of `extra_size` confirmed at `height` must pay.
pub fn minimum_total_fee(params: &ConsensusParams, height: u32, extra_size: usize) -> Amount {
    let base = minimum_fee(params, height);
    base + fee_per_extra_byte(extra_size, base)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn fee_floor_steps_down_across_height_bands() {
        let params = ConsensusParams::main_net();
        assert_eq!(minimum_fee(&params, 0), params.minimum_fee_v1);
        assert_eq!(minimum_fee(&params, params.block_major_version_3_height), params.minimum_fee_v1);
        assert_eq!(minimum_fee(&params, params.block_major_version_3_height + 1), params.minimum_fee_v2);
        assert_eq!(minimum_fee(&params, params.block_major_version_4_height + 1), params.minimum_fee_v3);
    }

    #[test]
    fn extra_under_100_bytes_is_free() {
        assert_eq!(fee_per_extra_byte(100, 1_000_000), 0);
        assert_eq!(fee_per_extra_byte(50, 1_000_000), 0);
    }

    #[test]
    fn extra_past_100_bytes_is_charged_per_byte() {
        assert_eq!(fee_per_extra_byte(150, 1_000_000), 50 * (1_000_000 / 100));
    }
}
