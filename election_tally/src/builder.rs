use std::collections::BTreeMap;

use log::debug;

pub use crate::config::*;

/// A builder for the state-level tables.
///
/// Loaders add rows as they read them. When a state appears more than once,
/// the last row wins.
///
/// ```
/// pub use election_tally::builder::TallyBuilder;
/// pub use election_tally::{electoral_totals, StateId};
///
/// let mut builder = TallyBuilder::new();
/// builder.add_state_votes("ca", 60, 40);
/// builder.add_electoral_votes(" CA ", 54);
/// let (tally, allocation) = builder.build();
///
/// assert_eq!(allocation.votes_for(&StateId::new("CA")), 54);
/// assert_eq!(electoral_totals(&tally, &allocation).a, 54);
/// ```
#[derive(Debug, Default)]
pub struct TallyBuilder {
    pub(crate) _votes: BTreeMap<StateId, VotePair>,
    pub(crate) _electoral: BTreeMap<StateId, u64>,
}

impl TallyBuilder {
    pub fn new() -> TallyBuilder {
        TallyBuilder::default()
    }

    /// Records the votes of a state. Returns the votes it replaced, if any.
    pub fn add_state_votes(&mut self, state: &str, a_votes: u64, b_votes: u64) -> Option<VotePair> {
        let sid = StateId::new(state);
        let previous = self._votes.insert(sid.clone(), VotePair::new(a_votes, b_votes));
        if previous.is_some() {
            debug!("add_state_votes: overwriting votes for {}", sid);
        }
        previous
    }

    /// Records the electoral votes of a state. Returns the value it replaced, if any.
    pub fn add_electoral_votes(&mut self, state: &str, votes: u64) -> Option<u64> {
        let sid = StateId::new(state);
        let previous = self._electoral.insert(sid.clone(), votes);
        if previous.is_some() {
            debug!("add_electoral_votes: overwriting electoral votes for {}", sid);
        }
        previous
    }

    pub fn vote_tally(&self) -> VoteTally {
        VoteTally {
            states: self._votes.clone(),
        }
    }

    pub fn electoral_allocation(&self) -> ElectoralAllocation {
        ElectoralAllocation {
            states: self._electoral.clone(),
        }
    }

    pub fn build(self) -> (VoteTally, ElectoralAllocation) {
        (
            VoteTally {
                states: self._votes,
            },
            ElectoralAllocation {
                states: self._electoral,
            },
        )
    }
}
