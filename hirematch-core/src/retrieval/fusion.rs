//! Reciprocal Rank Fusion: score = Σ 1/(k + rank + 1), rank 0-based.
//!
//! Combines ranked lists into a single ordering without normalizing scores
//! across retrieval methods. An id only collects contributions from the lists
//! it appears in; a missing list adds nothing rather than a penalty.

use super::types::{FusedResult, Payload, RankedResult};
use std::collections::HashMap;

/// Default smoothing constant.
pub const DEFAULT_RRF_K: u32 = 60;

/// Contribution of a hit at 0-based `rank` in one list.
pub fn reciprocal_rank(rank: usize, k: u32) -> f64 {
    1.0 / (k as f64 + rank as f64 + 1.0)
}

/// Fuses dense and sparse results.
///
/// Output is sorted by `rrf_score` descending. Equal scores keep the order in
/// which ids were first seen (dense list first, then sparse), so identical
/// inputs always give identical output. Payloads carried by the inputs are
/// kept; see [`hydrate`] for resolving the rest.
pub fn fuse(dense: &[RankedResult], sparse: &[RankedResult], k: u32) -> Vec<FusedResult> {
    let mut fused: Vec<FusedResult> = Vec::with_capacity(dense.len() + sparse.len());
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for (source, list) in [(Source::Dense, dense), (Source::Sparse, sparse)] {
        for (rank, result) in list.iter().enumerate() {
            let slot = *positions.entry(result.id.as_str()).or_insert_with(|| {
                fused.push(FusedResult {
                    id: result.id.clone(),
                    rrf_score: 0.0,
                    payload: None,
                    dense_rank: None,
                    sparse_rank: None,
                });
                fused.len() - 1
            });

            let entry = &mut fused[slot];
            entry.rrf_score += reciprocal_rank(rank, k);
            if entry.payload.is_none() {
                entry.payload = result.payload.clone();
            }
            match source {
                Source::Dense => {
                    entry.dense_rank.get_or_insert(rank);
                }
                Source::Sparse => {
                    entry.sparse_rank.get_or_insert(rank);
                }
            }
        }
    }

    // stable sort keeps first-seen order for ties
    fused.sort_by(|a, b| {
        b.rrf_score
            .partial_cmp(&a.rrf_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    fused
}

#[derive(Clone, Copy)]
enum Source {
    Dense,
    Sparse,
}

/// Fills payloads from a lookup by id.
///
/// With `lookup = None` (the lookup failed) every payload is cleared, leaving
/// ids and scores usable. Ids missing from a successful lookup keep whatever
/// payload they already had.
pub fn hydrate(results: &mut [FusedResult], lookup: Option<HashMap<String, Payload>>) {
    match lookup {
        Some(mut payloads) => {
            for result in results.iter_mut() {
                if let Some(payload) = payloads.remove(&result.id) {
                    result.payload = Some(payload);
                }
            }
        }
        None => {
            for result in results.iter_mut() {
                result.payload = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(ids: &[&str]) -> Vec<RankedResult> {
        ids.iter()
            .enumerate()
            .map(|(i, id)| RankedResult::new(*id, 1.0 - i as f32 * 0.1))
            .collect()
    }

    fn score_of(results: &[FusedResult], id: &str) -> f64 {
        results.iter().find(|r| r.id == id).unwrap().rrf_score
    }

    #[test]
    fn test_three_job_scenario() {
        let dense = list(&["J2", "J1"]);
        let sparse = list(&["J1", "J3"]);
        let fused = fuse(&dense, &sparse, 60);

        let ids: Vec<_> = fused.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["J1", "J2", "J3"]);

        let j1 = score_of(&fused, "J1");
        assert!((j1 - (1.0 / 62.0 + 1.0 / 61.0)).abs() < 1e-12);
        assert!(j1 > score_of(&fused, "J2"));
        assert!(j1 > score_of(&fused, "J3"));
        assert_eq!(score_of(&fused, "J2"), 1.0 / 61.0);
        assert_eq!(score_of(&fused, "J3"), 1.0 / 62.0);
    }

    #[test]
    fn test_single_list_contribution_is_exact() {
        let a = list(&["a0", "a1", "a2"]);
        let b = list(&["b0", "b1"]);
        let fused = fuse(&a, &b, 60);

        for (rank, id) in ["a0", "a1", "a2"].iter().enumerate() {
            assert_eq!(score_of(&fused, id), 1.0 / (60.0 + rank as f64 + 1.0));
        }
        for (rank, id) in ["b0", "b1"].iter().enumerate() {
            assert_eq!(score_of(&fused, id), 1.0 / (60.0 + rank as f64 + 1.0));
        }
    }

    #[test]
    fn test_consensus_outranks_single_source_at_same_rank() {
        let dense = list(&["only_dense", "shared"]);
        let sparse = list(&["only_sparse", "shared"]);
        let fused = fuse(&dense, &sparse, 60);

        let shared = score_of(&fused, "shared");
        assert_eq!(shared, 2.0 / 62.0);
        assert_eq!(fused[0].id, "shared");
        assert_eq!(fused[0].dense_rank, Some(1));
        assert_eq!(fused[0].sparse_rank, Some(1));
    }

    #[test]
    fn test_ties_broken_by_first_seen_order() {
        let dense = list(&["d0", "d1"]);
        let sparse = list(&["s0", "s1"]);
        let fused = fuse(&dense, &sparse, 60);
        let ids: Vec<_> = fused.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["d0", "s0", "d1", "s1"]);
        assert_eq!(fuse(&dense, &sparse, 60), fused);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(fuse(&[], &[], 60).is_empty());
        let sparse_only = fuse(&[], &list(&["x", "y"]), 60);
        assert_eq!(sparse_only.len(), 2);
        assert_eq!(sparse_only[0].id, "x");
        assert_eq!(sparse_only[0].dense_rank, None);
    }

    #[test]
    fn test_k_changes_scores() {
        let fused = fuse(&list(&["a"]), &[], 0);
        assert_eq!(fused[0].rrf_score, 1.0);
    }

    #[test]
    fn test_payload_carried_from_dense() {
        let mut payload = Payload::new();
        payload.insert("role".to_string(), "Engineer".to_string());
        let dense = vec![RankedResult::new("a", 0.9).with_payload(payload)];
        let sparse = list(&["a"]);

        let fused = fuse(&dense, &sparse, 60);
        assert_eq!(fused[0].payload.as_ref().unwrap()["role"], "Engineer");
    }

    #[test]
    fn test_hydrate_fills_payloads() {
        let mut fused = fuse(&list(&["a"]), &list(&["b"]), 60);
        let mut lookup = HashMap::new();
        let mut payload = Payload::new();
        payload.insert("company".to_string(), "Acme".to_string());
        lookup.insert("b".to_string(), payload);

        hydrate(&mut fused, Some(lookup));
        let b = fused.iter().find(|r| r.id == "b").unwrap();
        assert_eq!(b.payload.as_ref().unwrap()["company"], "Acme");
        let a = fused.iter().find(|r| r.id == "a").unwrap();
        assert!(a.payload.is_none());
    }

    #[test]
    fn test_hydrate_failure_clears_payloads_keeps_order() {
        let mut payload = Payload::new();
        payload.insert("role".to_string(), "x".to_string());
        let dense = vec![RankedResult::new("a", 0.9).with_payload(payload)];
        let mut fused = fuse(&dense, &list(&["b"]), 60);
        let before: Vec<_> = fused.iter().map(|r| (r.id.clone(), r.rrf_score)).collect();

        hydrate(&mut fused, None);
        assert!(fused.iter().all(|r| r.payload.is_none()));
        let after: Vec<_> = fused.iter().map(|r| (r.id.clone(), r.rrf_score)).collect();
        assert_eq!(before, after);
    }
}
