// Text sections of the console report.

use crate::vizzard::*;

const TABLE_RULE: &str = "---------------------------------------------";

fn section_header(title: &str) -> String {
    format!("\n========== {} ==========\n", title)
}

pub fn format_state_percentages(
    percentages: &BTreeMap<StateId, StatePercentages>,
    labels: &CandidateLabels,
) -> String {
    let mut res = section_header("STATE PERCENTAGES");
    for (sid, pct) in percentages.iter() {
        res.push_str(&format!(
            "{}: {} {:.2}% | {} {:.2}%\n",
            sid, labels.a, pct.a, labels.b, pct.b
        ));
    }
    res
}

pub fn format_popular_vote(popular: &PopularTotals, labels: &CandidateLabels) -> String {
    let mut res = section_header("POPULAR VOTE");
    res.push_str(&format!("{} Total Votes: {}\n", labels.a, popular.a));
    res.push_str(&format!("{} Total Votes: {}\n", labels.b, popular.b));
    match popular.leader() {
        Outcome::Winner(c) => {
            res.push_str(&format!("Popular Vote Winner: {}\n", labels.label(c)))
        }
        Outcome::Tie => res.push_str("Popular Vote Result: Tie\n"),
    }
    res
}

/// The national table: popular and electoral votes of each candidate.
/// The winner is decided on the electoral votes.
pub fn format_election_summary(
    electoral: &ElectoralTotals,
    popular: &PopularTotals,
    labels: &CandidateLabels,
) -> String {
    let mut res = section_header("ELECTION SUMMARY");
    res.push_str(&format!(
        "{:<14}| {:>13} | {:>14}\n",
        "Candidate", "Popular Votes", "Electoral Votes"
    ));
    res.push_str(TABLE_RULE);
    res.push('\n');
    res.push_str(&format!(
        "{:<14}| {:>13} | {:>14}\n",
        labels.a, popular.a, electoral.a
    ));
    res.push_str(&format!(
        "{:<14}| {:>13} | {:>14}\n",
        labels.b, popular.b, electoral.b
    ));
    res.push_str(TABLE_RULE);
    res.push('\n');
    match electoral.leader() {
        Outcome::Winner(c) => res.push_str(&format!("Winner: {}\n", labels.label(c))),
        Outcome::Tie => res.push_str("Result: Tie\n"),
    }
    res
}

pub fn format_state_summary(summary: &StateSummary, labels: &CandidateLabels) -> String {
    let mut res = format!("\nSummary for {}\n", summary.state);
    res.push_str(&format!("Total Votes: {}\n", summary.total));
    res.push_str(&format!(
        "{}: {} ({:.2}%)\n",
        labels.a, summary.votes.a, summary.percentages.a
    ));
    res.push_str(&format!(
        "{}: {} ({:.2}%)\n",
        labels.b, summary.votes.b, summary.percentages.b
    ));
    res.push_str(&format!(
        "Winner: {}\n",
        labels.outcome_label(summary.winner)
    ));
    res.push_str(&format!("Electoral Votes: {}\n", summary.electoral_votes));
    res
}

pub fn format_state_not_found() -> String {
    "State not found.\n".to_string()
}

pub fn format_partial_report(report: &PartialReport, labels: &CandidateLabels) -> String {
    let mut res = section_header("PARTIAL RESULTS");
    res.push_str(&format!(
        "Reporting Time: {:02}:00 ({}/{} states, {:.1}%)\n",
        report.hour,
        report.reported_count(),
        report.total_states,
        report.coverage
    ));
    res.push_str(&format!("{} Partial Votes: {}\n", labels.a, report.popular.a));
    res.push_str(&format!("{} Partial Votes: {}\n", labels.b, report.popular.b));
    res.push_str(&format!("{} Partial EV: {}\n", labels.a, report.electoral.a));
    res.push_str(&format!("{} Partial EV: {}\n", labels.b, report.electoral.b));
    res
}
