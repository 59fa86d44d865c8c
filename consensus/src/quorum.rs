//! Quorum arithmetic.

/// Number of approvals needed to commit, given the total number of voters
/// (the local validator plus every known peer) and the policy threshold.
///
/// `ceil(total_voters x threshold)` — with the default 0.51 this is a
/// simple majority: 1 of 1, 2 of 2, 2 of 3, 6 of 10.
pub fn required_votes(total_voters: usize, threshold: f64) -> usize {
    ((total_voters as f64) * threshold).ceil() as usize
}

/// The finalized result of one quorum poll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuorumDecision {
    pub votes: usize,
    pub required: usize,
}

impl QuorumDecision {
    pub fn tally(approvals: usize, total_voters: usize, threshold: f64) -> Self {
        Self {
            votes: approvals,
            required: required_votes(total_voters, threshold),
        }
    }

    pub fn reached(&self) -> bool {
        self.votes >= self.required
    }
}
