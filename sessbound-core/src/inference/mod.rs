//! Semi-supervised boundary inference
//!
//! Context statistics are gathered from the sessions a segmentation already
//! knows about, then every pool position is scored by the context around it
//! and the lowest-scoring positions are promoted to boundaries.

mod context;
mod scoring;
mod top_k;

pub use context::{contexts, Context, ContextPair, ContextTable, Contexts};
pub use scoring::{MaxDifference, MinProduct, ScoringStrategy};
pub use top_k::{Candidate, TopK};

use crate::config::InferenceConfig;
use crate::error::Result;
use crate::segmentation::Segmentation;
use context::window_at;

/// Score every pool position of `segmentation`, in stream order
///
/// Position `i` splits its session right after symbol `i`, so the past ends
/// at `i` and the future starts at `i + 1`.
pub fn score_pool(segmentation: &Segmentation, config: &InferenceConfig) -> Result<Vec<Candidate>> {
    config.validate()?;
    if segmentation.pool().is_empty() {
        return Ok(Vec::new());
    }

    let size = config.context_size;
    let table = ContextTable::build(contexts(segmentation.sessions(), size));
    let strategy = config.strategy.build(config.min_occurrences);

    let mut candidates = Vec::with_capacity(segmentation.pool().len());
    let mut offset = 0;
    for session in segmentation.sessions() {
        for split in 1..session.len() {
            let position = offset + split - 1;
            if segmentation.pool().contains(&position) {
                let pair = window_at(session, split, size);
                candidates.push(Candidate {
                    score: strategy.score(&table, &pair.past, &pair.future),
                    position,
                });
            }
        }
        offset += session.len();
    }
    log::debug!(
        "scored {} pool positions with {}",
        candidates.len(),
        strategy.name()
    );
    Ok(candidates)
}

/// Promote the `count` best-scoring pool positions to boundaries
///
/// An empty pool returns the segmentation unchanged. Fewer than `count`
/// positions are promoted when the pool is smaller.
///
/// # Errors
/// [`Error::InvalidArgument`](crate::Error::InvalidArgument) for a zero
/// context size.
pub fn infer(
    segmentation: &Segmentation,
    count: usize,
    config: &InferenceConfig,
) -> Result<Segmentation> {
    let candidates = score_pool(segmentation, config)?;
    if candidates.is_empty() {
        return Ok(segmentation.clone());
    }

    let mut top = TopK::new(count);
    for candidate in candidates {
        top.push(candidate);
    }
    let selected = top.into_sorted_vec();
    log::info!(
        "promoting {} of {} pool positions",
        selected.len(),
        segmentation.pool().len()
    );
    Ok(segmentation.promote(
        selected.iter().map(|candidate| candidate.position),
        segmentation.seed(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StrategyKind;
    use crate::error::Error;

    fn repeated_sessions() -> Segmentation {
        let sessions: Vec<Vec<u32>> = (0..6).map(|_| vec![1, 2, 3]).collect();
        Segmentation::from_sessions(&sessions)
    }

    #[test]
    fn test_zero_context_size_is_rejected() {
        let config = InferenceConfig {
            context_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            infer(&repeated_sessions(), 1, &config),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_empty_pool_returns_input() {
        let seg = repeated_sessions();
        let inferred = infer(&seg, 3, &InferenceConfig::default()).unwrap();
        assert_eq!(inferred, seg);
    }

    #[test]
    fn test_infer_promotes_exactly_count_pool_positions() {
        let seg = repeated_sessions().debound(2, 5);
        let pool_before = seg.pool().clone();
        let config = InferenceConfig::builder()
            .context_size(2)
            .min_occurrences(0)
            .build()
            .unwrap();

        let inferred = infer(&seg, 2, &config).unwrap();
        assert_eq!(inferred.boundary_count(), seg.boundary_count() + 2);
        assert_eq!(inferred.pool().len(), pool_before.len() - 2);
        let promoted: Vec<usize> = inferred
            .boundaries()
            .difference(seg.boundaries())
            .copied()
            .collect();
        assert!(promoted.iter().all(|p| pool_before.contains(p)));
    }

    #[test]
    fn test_infer_finds_the_repeated_cut() {
        // twelve "1 2 3" sessions with one cut removed
        let sessions: Vec<Vec<u32>> = (0..12).map(|_| vec![1, 2, 3]).collect();
        let gold = Segmentation::from_sessions(&sessions);
        let debounded = gold.debound(11, 3);
        assert_eq!(debounded.boundary_count(), 11);

        let config = InferenceConfig::builder()
            .context_size(2)
            .min_occurrences(0)
            .strategy(StrategyKind::MaxDifference)
            .build()
            .unwrap();
        let inferred = infer(&debounded, 1, &config).unwrap();
        assert_eq!(inferred.boundaries(), gold.boundaries());
    }

    #[test]
    fn test_default_strategy_finds_the_repeated_cut() {
        let sessions: Vec<Vec<u32>> = (0..12).map(|_| vec![1, 2, 3]).collect();
        let gold = Segmentation::from_sessions(&sessions);
        let config = InferenceConfig::builder()
            .context_size(2)
            .min_occurrences(0)
            .build()
            .unwrap();
        assert_eq!(config.strategy, StrategyKind::MinProduct);

        for seed in 0..8 {
            let debounded = gold.debound(11, seed);
            let inferred = infer(&debounded, 1, &config).unwrap();
            assert_eq!(inferred.boundaries(), gold.boundaries(), "seed {seed}");
        }
    }

    #[test]
    fn test_default_strategy_ranks_the_cut_strictly_first() {
        let sessions: Vec<Vec<u32>> = (0..12).map(|_| vec![1, 2, 3]).collect();
        let gold = Segmentation::from_sessions(&sessions);
        let debounded = gold.debound(11, 3);
        let removed = *gold
            .boundaries()
            .difference(debounded.boundaries())
            .next()
            .unwrap();
        let config = InferenceConfig::builder()
            .context_size(2)
            .min_occurrences(0)
            .build()
            .unwrap();

        let scores = score_pool(&debounded, &config).unwrap();
        let cut = scores.iter().find(|c| c.position == removed).unwrap();
        // (1 - 11/12) * 1/12
        assert!((cut.score - 1.0 / 144.0).abs() < 1e-12);
        assert!(scores
            .iter()
            .filter(|c| c.position != removed)
            .all(|c| c.score > cut.score));
    }

    #[test]
    fn test_unscored_positions_rank_last() {
        let sessions: Vec<Vec<u32>> = (0..12).map(|_| vec![1, 2, 3]).collect();
        let debounded = Segmentation::from_sessions(&sessions).debound(11, 3);
        // nothing qualifies as evidence, every score is +inf
        let config = InferenceConfig::builder()
            .context_size(2)
            .min_occurrences(1_000)
            .build()
            .unwrap();
        let scores = score_pool(&debounded, &config).unwrap();
        assert!(scores.iter().all(|c| c.score == f64::INFINITY));

        let inferred = infer(&debounded, 1, &config).unwrap();
        assert_eq!(inferred.boundary_count(), 12);
        let first_pool = *debounded.pool().iter().next().unwrap();
        assert!(inferred.is_boundary(first_pool));
    }

    #[test]
    fn test_score_pool_covers_every_pool_position() {
        let seg = repeated_sessions().debound(1, 0);
        let config = InferenceConfig::builder().context_size(3).build().unwrap();
        let scores = score_pool(&seg, &config).unwrap();
        let positions: Vec<usize> = scores.iter().map(|c| c.position).collect();
        assert_eq!(
            positions,
            seg.pool().iter().copied().collect::<Vec<_>>()
        );
    }
}
