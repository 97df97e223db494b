mod config;
pub mod builder;
pub mod manual;

use log::{debug, info, warn};

use std::collections::BTreeMap;

pub use crate::config::*;

/// Computes the share of each candidate in every state.
///
/// States without any vote are left out of the result.
pub fn state_percentages(tally: &VoteTally) -> BTreeMap<StateId, StatePercentages> {
    let mut res: BTreeMap<StateId, StatePercentages> = BTreeMap::new();
    for (sid, votes) in tally.iter() {
        if let Some(pct) = percentages(votes) {
            res.insert(sid.clone(), pct);
        } else {
            debug!("state_percentages: no votes in {}, skipping", sid);
        }
    }
    res
}

fn percentages(votes: &VotePair) -> Option<StatePercentages> {
    let total = votes.total();
    if total == 0 {
        return None;
    }
    Some(StatePercentages {
        a: (votes.a as f64 * 100.0) / total as f64,
        b: (votes.b as f64 * 100.0) / total as f64,
    })
}

/// The national popular vote: the sum over all the states, including the ones without votes.
pub fn popular_totals(tally: &VoteTally) -> PopularTotals {
    sum_popular(tally.iter().map(|(_, v)| v))
}

/// The national electoral vote.
///
/// Each state awards all its electoral votes to the candidate with strictly more
/// votes. A tied state awards nothing, and a state without allocation counts for 0.
pub fn electoral_totals(tally: &VoteTally, allocation: &ElectoralAllocation) -> ElectoralTotals {
    sum_electoral(tally.iter(), allocation)
}

fn sum_popular<'a>(votes: impl Iterator<Item = &'a VotePair>) -> PopularTotals {
    let mut res = PopularTotals::default();
    for v in votes {
        res.a = res.a.saturating_add(v.a);
        res.b = res.b.saturating_add(v.b);
    }
    res
}

fn sum_electoral<'a>(
    states: impl Iterator<Item = (&'a StateId, &'a VotePair)>,
    allocation: &ElectoralAllocation,
) -> ElectoralTotals {
    let mut res = ElectoralTotals::default();
    for (sid, votes) in states {
        let ev = allocation.votes_for(sid);
        match votes.leader() {
            Outcome::Winner(Candidate::A) => res.a = res.a.saturating_add(ev),
            Outcome::Winner(Candidate::B) => res.b = res.b.saturating_add(ev),
            Outcome::Tie => {
                if ev > 0 {
                    debug!("sum_electoral: tie in {}, {} electoral votes not awarded", sid, ev);
                }
            }
        }
    }
    res
}

/// Looks up the results of a single state.
///
/// The identifier is normalized before the lookup, so `" ca"` finds `CA`.
pub fn state_summary(
    tally: &VoteTally,
    allocation: &ElectoralAllocation,
    state: &str,
) -> Result<StateSummary, TallyErrors> {
    let sid = StateId::new(state);
    let votes = match tally.get(&sid) {
        Some(v) => *v,
        None => {
            warn!("state_summary: state {:?} not found", sid.as_str());
            return Err(TallyErrors::StateNotFound(sid.as_str().to_string()));
        }
    };
    // A state without votes has no meaningful share: report 0 for both.
    let pcts = percentages(&votes).unwrap_or(StatePercentages { a: 0.0, b: 0.0 });
    Ok(StateSummary {
        electoral_votes: allocation.votes_for(&sid),
        state: sid,
        votes,
        total: votes.total(),
        percentages: pcts,
        winner: votes.leader(),
    })
}

/// Parses the cutoff hour typed by the user.
pub fn parse_cutoff_hour(input: &str) -> Result<i64, TallyErrors> {
    input
        .trim()
        .parse::<i64>()
        .map_err(|_| TallyErrors::InvalidCutoffHour(input.trim().to_string()))
}

/// The number of states that have reported at the given hour, out of `num_states`.
///
/// Hours outside of a day are accepted: the count is clamped to [0, num_states].
pub fn reported_state_count(hour: i64, num_states: usize) -> usize {
    let raw = ((hour as f64 / 24.0) * num_states as f64).floor();
    if raw <= 0.0 {
        0
    } else {
        (raw as usize).min(num_states)
    }
}

/// Simulates the results known at `hour`, assuming that the states report
/// one after the other in alphabetical order over a 24-hour day.
pub fn simulate_partial_report(
    tally: &VoteTally,
    allocation: &ElectoralAllocation,
    hour: i64,
) -> PartialReport {
    let total_states = tally.len();
    let num_reported = reported_state_count(hour, total_states);
    info!(
        "simulate_partial_report: hour {}: {}/{} states reporting",
        hour, num_reported, total_states
    );

    // The tally iterates in sorted order: the reported states are a prefix.
    let reported: Vec<(&StateId, &VotePair)> = tally.iter().take(num_reported).collect();

    let coverage = if total_states == 0 {
        0.0
    } else {
        (num_reported as f64 * 100.0) / total_states as f64
    };

    PartialReport {
        hour,
        reported_states: reported.iter().map(|(sid, _)| (*sid).clone()).collect(),
        total_states,
        coverage,
        popular: sum_popular(reported.iter().map(|(_, v)| *v)),
        electoral: sum_electoral(reported.iter().cloned(), allocation),
    }
}
