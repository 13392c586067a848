//! Seeded boundary removal and restoration

use super::Segmentation;
use rand::seq::index;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeSet;

impl Segmentation {
    /// Keep `keep` boundaries (the final one always among them) and drop the rest
    ///
    /// Surviving boundaries are drawn uniformly with `seed`. Every gap between
    /// two consecutive survivors that used to hold a removed boundary is added
    /// to the pool, so the pool always contains the removed positions.
    pub fn debound(&self, keep: usize, seed: u64) -> Segmentation {
        let Some(last) = self.seq.len().checked_sub(1) else {
            return Segmentation {
                seed: Some(seed),
                ..self.clone()
            };
        };

        let removable: Vec<usize> = self
            .boundaries
            .iter()
            .copied()
            .filter(|&b| b != last)
            .collect();
        let amount = keep.saturating_sub(1).min(removable.len());
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let kept: BTreeSet<usize> = index::sample(&mut rng, removable.len(), amount)
            .into_iter()
            .map(|i| removable[i])
            .chain(std::iter::once(last))
            .collect();

        let mut pool = self.pool.clone();
        let mut gap_start = 0;
        for &survivor in &kept {
            if self.boundaries.range(gap_start..survivor).next().is_some() {
                pool.extend(gap_start..survivor);
            }
            gap_start = survivor + 1;
        }

        let non_boundaries = (0..self.seq.len()).filter(|p| !kept.contains(p)).collect();
        log::debug!(
            "debound kept {} of {} boundaries (seed {seed}), pool holds {} positions",
            kept.len(),
            self.boundaries.len(),
            pool.len()
        );

        Segmentation {
            seq: self.seq.clone(),
            alphabet: self.alphabet.clone(),
            boundaries: kept,
            non_boundaries,
            pool,
            seed: Some(seed),
        }
    }

    /// Promote `count` positions drawn uniformly from the pool with `seed`
    ///
    /// Asking for more positions than the pool holds promotes the whole pool.
    pub fn bound(&self, count: usize, seed: u64) -> Segmentation {
        let candidates: Vec<usize> = self.pool.iter().copied().collect();
        let amount = count.min(candidates.len());
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let picked: Vec<usize> = index::sample(&mut rng, candidates.len(), amount)
            .into_iter()
            .map(|i| candidates[i])
            .collect();
        log::debug!(
            "bound promoted {} of {} pool positions (seed {seed})",
            picked.len(),
            candidates.len()
        );
        self.promote(picked, Some(seed))
    }
}
