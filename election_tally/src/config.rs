// ********* Input data structures ***********

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::Display;

/// A normalized state identifier (trimmed, uppercase).
///
/// This is the join key between the electoral allocation and the vote tally.
#[derive(Eq, PartialEq, Debug, Clone, Hash, Ord, PartialOrd)]
pub struct StateId(String);

impl StateId {
    pub fn new(raw: &str) -> StateId {
        StateId(raw.trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for StateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One of the two candidates of the race.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum Candidate {
    A,
    B,
}

impl Candidate {
    /// The winner of a county: A only with a strict majority, B otherwise.
    /// Ties go to B, unlike the state-level rule in `VotePair::leader`.
    pub fn county_winner(a_votes: i64, b_votes: i64) -> Candidate {
        if a_votes > b_votes {
            Candidate::A
        } else {
            Candidate::B
        }
    }
}

/// The outcome of a comparison between the two candidates.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Outcome {
    Winner(Candidate),
    Tie,
}

impl Outcome {
    pub fn compare(a: u64, b: u64) -> Outcome {
        match a.cmp(&b) {
            std::cmp::Ordering::Greater => Outcome::Winner(Candidate::A),
            std::cmp::Ordering::Less => Outcome::Winner(Candidate::B),
            std::cmp::Ordering::Equal => Outcome::Tie,
        }
    }
}

/// The votes cast in one state for each candidate.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub struct VotePair {
    pub a: u64,
    pub b: u64,
}

impl VotePair {
    pub fn new(a: u64, b: u64) -> VotePair {
        VotePair { a, b }
    }

    pub fn total(&self) -> u64 {
        self.a.saturating_add(self.b)
    }

    pub fn leader(&self) -> Outcome {
        Outcome::compare(self.a, self.b)
    }
}

/// The vote counts per state.
///
/// Built once by a `TallyBuilder`, read-only afterwards. The states are kept
/// in lexicographic order of their identifiers.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct VoteTally {
    pub(crate) states: BTreeMap<StateId, VotePair>,
}

impl VoteTally {
    pub fn get(&self, state: &StateId) -> Option<&VotePair> {
        self.states.get(state)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// The states in ascending order of identifier.
    pub fn iter(&self) -> impl Iterator<Item = (&StateId, &VotePair)> {
        self.states.iter()
    }
}

/// The number of electoral votes of each state.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct ElectoralAllocation {
    pub(crate) states: BTreeMap<StateId, u64>,
}

impl ElectoralAllocation {
    /// A state that is not in the allocation has no electoral votes.
    pub fn votes_for(&self, state: &StateId) -> u64 {
        self.states.get(state).cloned().unwrap_or(0)
    }

    pub fn contains(&self, state: &StateId) -> bool {
        self.states.contains_key(state)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StateId, &u64)> {
        self.states.iter()
    }
}

/// A county and its local winner, used for the map only.
#[derive(PartialEq, Debug, Clone)]
pub struct CountyRecord {
    pub state: StateId,
    pub latitude: f64,
    pub longitude: f64,
    pub winner: Candidate,
}

/// Display names of the candidates. They never influence the computations.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CandidateLabels {
    pub a: String,
    pub b: String,
}

impl CandidateLabels {
    pub fn new(a: Option<String>, b: Option<String>) -> CandidateLabels {
        let default = CandidateLabels::default();
        CandidateLabels {
            a: a.filter(|s| !s.trim().is_empty())
                .map(|s| s.trim().to_string())
                .unwrap_or(default.a),
            b: b.filter(|s| !s.trim().is_empty())
                .map(|s| s.trim().to_string())
                .unwrap_or(default.b),
        }
    }

    pub fn label(&self, candidate: Candidate) -> &str {
        match candidate {
            Candidate::A => self.a.as_str(),
            Candidate::B => self.b.as_str(),
        }
    }

    pub fn outcome_label(&self, outcome: Outcome) -> &str {
        match outcome {
            Outcome::Winner(c) => self.label(c),
            Outcome::Tie => "Tie",
        }
    }
}

impl Default for CandidateLabels {
    fn default() -> Self {
        CandidateLabels {
            a: "Candidate A".to_string(),
            b: "Candidate B".to_string(),
        }
    }
}

// ******** Output data structures *********

/// Share of the votes of each candidate in one state, in percent.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct StatePercentages {
    pub a: f64,
    pub b: f64,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub struct PopularTotals {
    pub a: u64,
    pub b: u64,
}

impl PopularTotals {
    pub fn total(&self) -> u64 {
        self.a.saturating_add(self.b)
    }

    pub fn leader(&self) -> Outcome {
        Outcome::compare(self.a, self.b)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub struct ElectoralTotals {
    pub a: u64,
    pub b: u64,
}

impl ElectoralTotals {
    pub fn leader(&self) -> Outcome {
        Outcome::compare(self.a, self.b)
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct StateSummary {
    pub state: StateId,
    pub votes: VotePair,
    pub total: u64,
    pub percentages: StatePercentages,
    pub winner: Outcome,
    pub electoral_votes: u64,
}

/// A snapshot of the results using only the states that have reported at a given hour.
#[derive(PartialEq, Debug, Clone)]
pub struct PartialReport {
    pub hour: i64,
    /// The states included in this report, in sorted order.
    pub reported_states: Vec<StateId>,
    pub total_states: usize,
    /// Share of the states that reported, in percent.
    pub coverage: f64,
    pub popular: PopularTotals,
    pub electoral: ElectoralTotals,
}

impl PartialReport {
    pub fn reported_count(&self) -> usize {
        self.reported_states.len()
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum TallyErrors {
    StateNotFound(String),
    InvalidCutoffHour(String),
}

impl Error for TallyErrors {}

impl Display for TallyErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TallyErrors::StateNotFound(s) => write!(f, "State not found: {}", s),
            TallyErrors::InvalidCutoffHour(s) => write!(f, "Invalid cutoff hour: {:?}", s),
        }
    }
}
