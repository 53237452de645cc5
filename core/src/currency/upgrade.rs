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

//! Minor-version voting ahead of a hard activation height (§4.C, "Upgrade voting"). Below the hard
//! height, miners signal readiness for the next major version via the block's minor version; once
//! a sliding window sees a supermajority vote "yes", activation can proceed early. After hard
//! activation, downgrade is impossible — [`UpgradeVoting`] simply never looks at votes again once
//! `height >= hard_activation_height`.

use super::ConsensusParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpgradeVoting {
    pub hard_activation_height: u32,
    pub voting_window: u32,
    pub threshold_percent: u32,
}

impl UpgradeVoting {
    pub fn for_version(params: &ConsensusParams, hard_activation_height: u32) -> Self {
        UpgradeVoting {
            hard_activation_height,
            voting_window: params.upgrade_voting_window,
            threshold_percent: params.upgrade_voting_threshold_percent,
        }
    }

    /// True once `height` has reached the hard activation height, regardless of vote history.
    pub fn is_active_at(&self, height: u32) -> bool {
        height >= self.hard_activation_height
    }

    /// True if `height` is still below hard activation but a supermajority of the trailing
    /// `voting_window` minor-version votes already favor the new version — an early activation.
    /// `votes_for` counts blocks within the window whose minor version signaled readiness.
    pub fn early_activation(&self, height: u32, votes_for: u32) -> bool {
        if self.is_active_at(height) {
            return false;
        }
        votes_for * 100 >= self.voting_window * self.threshold_percent
    }

    /// Whichever of hard activation or early activation applies first.
    pub fn is_active(&self, height: u32, votes_for: u32) -> bool {
        self.is_active_at(height) || self.early_activation(height, votes_for)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn activates_at_the_hard_height_regardless_of_votes() {
        let params = ConsensusParams::main_net();
        let voting = UpgradeVoting::for_version(&params, 100_000);
        assert!(voting.is_active(100_000, 0));
        assert!(!voting.is_active(99_999, 0));
    }

    #[test]
    fn supermajority_activates_early() {
        let params = ConsensusParams::main_net();
        let voting = UpgradeVoting::for_version(&params, 100_000);
        let window = voting.voting_window;
        let needed = (window * voting.threshold_percent).div_ceil(100);
        assert!(voting.is_active(50_000, needed));
        assert!(!voting.is_active(50_000, needed.saturating_sub(window / 10 + 1)));
    }

    #[test]
    fn downgrade_past_hard_activation_is_impossible() {
        let params = ConsensusParams::main_net();
        let voting = UpgradeVoting::for_version(&params, 100_000);
        assert!(voting.is_active_at(200_000));
    }
}
