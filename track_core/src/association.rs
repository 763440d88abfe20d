//! Report-to-track data association: candidate matrix plus greedy
//! best-fit resolution of ambiguous gate matches.
//!
//! A report in-gate for multiple tracks (or a track in-gate for multiple
//! reports) is resolved by repeatedly taking the candidate with the
//! smallest combined normalized error and retiring both its report and its
//! track. This is a deliberate tie-break policy, not a globally optimal
//! assignment — there is no guarantee of minimum total error.

/// One gate-passing (report, track) pair.
#[derive(Clone, Copy, Debug)]
pub struct Candidate {
    pub report_idx: usize,
    pub track_idx: usize,
    /// Combined normalized gate error (lower is a better fit).
    pub score: f64,
}

/// Resolved assignment for one cycle.
#[derive(Clone, Debug, Default)]
pub struct Assignment {
    /// Matched (report_idx, track_idx) pairs.
    pub pairs: Vec<(usize, usize)>,
    /// Reports with no surviving in-gate track (candidates for creation).
    pub unmatched_reports: Vec<usize>,
    /// Tracks with no surviving in-gate report (candidates for aging).
    pub unmatched_tracks: Vec<usize>,
}

/// Resolve candidates greedily: best score first, each report and track
/// used at most once.
pub fn greedy_assign(
    mut candidates: Vec<Candidate>,
    n_reports: usize,
    n_tracks: usize,
) -> Assignment {
    candidates.sort_by(|a, b| a.score.total_cmp(&b.score));

    let mut report_taken = vec![false; n_reports];
    let mut track_taken = vec![false; n_tracks];
    let mut pairs = Vec::new();

    for c in candidates {
        if report_taken[c.report_idx] || track_taken[c.track_idx] {
            continue;
        }
        report_taken[c.report_idx] = true;
        track_taken[c.track_idx] = true;
        pairs.push((c.report_idx, c.track_idx));
    }

    Assignment {
        pairs,
        unmatched_reports: (0..n_reports).filter(|&i| !report_taken[i]).collect(),
        unmatched_tracks: (0..n_tracks).filter(|&i| !track_taken[i]).collect(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn c(report_idx: usize, track_idx: usize, score: f64) -> Candidate {
        Candidate {
            report_idx,
            track_idx,
            score,
        }
    }

    #[test]
    fn one_to_one_pairs_all_match() {
        let a = greedy_assign(vec![c(0, 0, 0.1), c(1, 1, 0.2)], 2, 2);
        assert_eq!(a.pairs.len(), 2);
        assert!(a.unmatched_reports.is_empty());
        assert!(a.unmatched_tracks.is_empty());
    }

    #[test]
    fn ambiguous_report_takes_best_track() {
        // Report 0 in-gate for both tracks; track 1 fits better.
        let a = greedy_assign(vec![c(0, 0, 0.8), c(0, 1, 0.2)], 1, 2);
        assert_eq!(a.pairs, vec![(0, 1)]);
        assert_eq!(a.unmatched_tracks, vec![0]);
    }

    #[test]
    fn contested_track_goes_to_best_report() {
        // Both reports want track 0; report 1 wins, report 0 falls through
        // to its second choice.
        let a = greedy_assign(vec![c(0, 0, 0.5), c(1, 0, 0.1), c(0, 1, 0.9)], 2, 2);
        assert!(a.pairs.contains(&(1, 0)));
        assert!(a.pairs.contains(&(0, 1)));
    }

    #[test]
    fn greedy_is_not_globally_optimal() {
        // Optimal total: (0,1)+(1,0) = 0.2+0.3 = 0.5.
        // Greedy takes (0,0) = 0.1 first, forcing (1,1) = 1.0, total 1.1.
        let a = greedy_assign(
            vec![c(0, 0, 0.1), c(0, 1, 0.2), c(1, 0, 0.3), c(1, 1, 1.0)],
            2,
            2,
        );
        assert!(a.pairs.contains(&(0, 0)));
        assert!(a.pairs.contains(&(1, 1)));
    }

    #[test]
    fn leftovers_reported_on_both_sides() {
        let a = greedy_assign(vec![c(1, 2, 0.4)], 3, 4);
        assert_eq!(a.pairs, vec![(1, 2)]);
        assert_eq!(a.unmatched_reports, vec![0, 2]);
        assert_eq!(a.unmatched_tracks, vec![0, 1, 3]);
    }
}
