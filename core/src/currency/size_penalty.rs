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

//! `(2M - B)*B / M^2`, applied to an amount (a reward or a fee) once the block's cumulative size
//! `B` exceeds the running median `M` (§4.C, "Size penalty"). The multiplication needs 128-bit
//! intermediates even though every input is a `u64`/`usize`: `amount * B * (2M - B)` overflows a
//! 64-bit product well before the division by `M^2` brings it back down.

use crate::types::Amount;

/// Returns `amount` unpenalized if `current_block_size <= median_size`; otherwise
/// `amount * (2*median - current) * current / median / median`, matching the reference's two
/// successive 128-bit-by-32-bit divisions rather than one 128-bit-by-64-bit division (the
/// reference's bugfix comment notes this avoids a 32-bit truncation bug on some targets — the
/// two-step form is kept here purely for bit-exact parity with the reference, not because Rust's
/// `u128` division has that bug).
pub fn penalize_amount(amount: Amount, median_size: usize, current_block_size: usize) -> Amount {
    debug_assert!(current_block_size <= 2 * median_size);

    if amount == 0 {
        return 0;
    }
    if current_block_size <= median_size {
        return amount;
    }

    let median = median_size as u128;
    let current = current_block_size as u128;
    let multiplicand = 2 * median - current;
    let product = (amount as u128) * multiplicand * current;
    let penalized = product / median / median;

    debug_assert!(penalized < amount as u128);
    penalized as Amount
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn amount_is_unpenalized_at_or_below_median() {
        assert_eq!(penalize_amount(1000, 500, 500), 1000);
        assert_eq!(penalize_amount(1000, 500, 100), 1000);
    }

    #[test]
    fn matches_the_spec_worked_example() {
        // §8(e): median 1000, current 1500 -> multiplier 0.75.
        let penalized = penalize_amount(4, 1000, 1500);
        assert_eq!(penalized, 3);
    }

    #[test]
    fn zero_amount_penalizes_to_zero() {
        assert_eq!(penalize_amount(0, 1000, 1500), 0);
    }

    #[test]
    fn full_block_penalizes_to_zero() {
        // current_block_size == 2*median_size drives the multiplier to zero.
        assert_eq!(penalize_amount(1000, 500, 1000), 0);
    }
}
