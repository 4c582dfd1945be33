use std::cmp::Ordering;

use crate::models::candidate::CandidateResult;

/// Stable sort by `final_score` descending. Equal scores keep input order; NaN sorts last.
/// Duplicate names are distinct candidates.
pub fn rank(mut results: Vec<CandidateResult>) -> Vec<CandidateResult> {
    results.sort_by(|a, b| descending(a.final_score, b.final_score));
    results
}

fn descending(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}
