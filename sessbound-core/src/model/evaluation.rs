//! Session probability under a model
//!
//! Two paths compute the same quantity:
//!
//! - the deterministic walk follows the unique state chain and multiplies
//!   `(1 - final) * emission * transition` per symbol, then the final
//!   probability of the last state. A missing transition or an unknown
//!   symbol makes the session impossible.
//! - the forward recursion sums over all paths with a backward vector per
//!   suffix: `β(ε)[q] = final[q]` and
//!   `β(a·w)[q] = (1 - final[q]) * emission[q][a] * Σ transition[a][q][q'] * β(w)[q']`.
//!   The probability of `s` is `Σ initial[q] * β(s)[q]`.

use super::ProbabilisticModel;
use crate::config::{EvaluationConfig, EvaluationMode};
use crate::error::Result;
use crate::types::Symbol;
use std::collections::HashMap;

/// Memoised backward vectors keyed by session suffix
///
/// Shared across all sessions of one evaluation so common suffixes are
/// computed once. Cleared wholesale when `limit` entries are exceeded.
#[derive(Debug, Default)]
pub struct ForwardCache {
    table: HashMap<Vec<Symbol>, Vec<f64>>,
    limit: Option<usize>,
    clears: usize,
}

impl ForwardCache {
    /// Create a cache holding at most `limit` suffixes (None = unbounded)
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            table: HashMap::new(),
            limit,
            clears: 0,
        }
    }

    /// Number of memoised suffixes
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether nothing is memoised
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// How many times the cache was cleared for exceeding its limit
    pub fn clears(&self) -> usize {
        self.clears
    }

    fn get(&self, suffix: &[Symbol]) -> Option<&Vec<f64>> {
        self.table.get(suffix)
    }

    fn insert(&mut self, suffix: &[Symbol], beta: Vec<f64>) {
        if let Some(limit) = self.limit {
            if self.table.len() >= limit {
                log::debug!("forward cache reached {limit} suffixes, clearing");
                self.table.clear();
                self.clears += 1;
            }
        }
        self.table.insert(suffix.to_vec(), beta);
    }
}

impl ProbabilisticModel {
    /// Compute the probability of every session
    ///
    /// `EvaluationMode::Auto` walks deterministic models and runs the
    /// forward recursion otherwise. Forcing `Deterministic` on a
    /// non-deterministic model fails with
    /// [`Error::NonDeterministic`](crate::Error::NonDeterministic).
    pub fn evaluate<S: AsRef<[Symbol]>>(
        &self,
        sessions: &[S],
        config: &EvaluationConfig,
    ) -> Result<Vec<f64>> {
        self.evaluate_with(sessions, config, |_| {})
    }

    /// Same as [`evaluate`](Self::evaluate), calling `on_session` with the
    /// number of sessions scored so far after each one
    pub fn evaluate_with<S, F>(
        &self,
        sessions: &[S],
        config: &EvaluationConfig,
        mut on_session: F,
    ) -> Result<Vec<f64>>
    where
        S: AsRef<[Symbol]>,
        F: FnMut(usize),
    {
        config.validate()?;
        let deterministic = match config.mode {
            EvaluationMode::Auto => self.is_deterministic(),
            EvaluationMode::Deterministic => {
                self.check_deterministic()?;
                true
            }
            EvaluationMode::Forward => false,
        };
        log::debug!(
            "evaluating {} sessions ({})",
            sessions.len(),
            if deterministic { "walk" } else { "forward" }
        );

        let mut cache = ForwardCache::new(config.cache_limit);
        let mut probabilities = Vec::with_capacity(sessions.len());
        for session in sessions {
            let session = session.as_ref();
            let probability = if deterministic {
                self.walk_probability(session)
            } else {
                self.forward_probability(session, &mut cache)
            };
            probabilities.push(probability);
            on_session(probabilities.len());
        }

        if !deterministic {
            log::debug!(
                "forward cache holds {} suffixes after {} clears",
                cache.len(),
                cache.clears()
            );
        }
        Ok(probabilities)
    }

    /// Probability of `session` along the unique state chain
    ///
    /// Follows the first positive transition at each step, so the result is
    /// only meaningful for deterministic models.
    pub fn walk_probability(&self, session: &[Symbol]) -> f64 {
        let Some(start) = self.start_state() else {
            return 0.0;
        };
        let mut probability = self.initial(start);
        let mut state = start;
        for &symbol in session {
            let Some(next) = self.next_state(state, symbol) else {
                return 0.0;
            };
            probability *= (1.0 - self.final_probability(state))
                * self.emission(state, symbol)
                * self.transition(symbol, state, next);
            state = next;
        }
        probability * self.final_probability(state)
    }

    /// Probability of `session` summed over all state paths
    pub fn forward_probability(&self, session: &[Symbol], cache: &mut ForwardCache) -> f64 {
        // longest suffix already memoised
        let mut computed_from = session.len();
        let mut beta = self.final_row().to_vec();
        for start in 0..session.len() {
            if let Some(cached) = cache.get(&session[start..]) {
                computed_from = start;
                beta = cached.clone();
                break;
            }
        }

        for start in (0..computed_from).rev() {
            beta = self.backward_step(session[start], &beta);
            cache.insert(&session[start..], beta.clone());
        }

        self.initial_row()
            .iter()
            .zip(&beta)
            .map(|(initial, b)| initial * b)
            .sum()
    }

    fn backward_step(&self, symbol: Symbol, next: &[f64]) -> Vec<f64> {
        (0..self.num_states())
            .map(|q| {
                let row = self.transition_row(symbol, q);
                if row.is_empty() {
                    return 0.0;
                }
                let reach: f64 = row.iter().zip(next).map(|(t, b)| t * b).sum();
                (1.0 - self.final_probability(q)) * self.emission(q, symbol) * reach
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    const EPS: f64 = 1e-12;

    /// One state that loops on symbol 0 and always stops
    fn single_state_model() -> ProbabilisticModel {
        let mut model = ProbabilisticModel::new(1, 1);
        model.set_initial(0, 1.0);
        model.set_final(0, 1.0);
        model.set_emission(0, 0, 1.0);
        model.set_transition(0, 0, 0, 1.0);
        model
    }

    /// Two paths for symbol 0 out of state 0
    fn branching_model() -> ProbabilisticModel {
        let mut model = ProbabilisticModel::new(3, 2);
        model.set_initial(0, 1.0);
        model.set_final(1, 0.5);
        model.set_final(2, 1.0);
        model.set_emission(0, 0, 1.0);
        model.set_emission(1, 1, 1.0);
        model.set_transition(0, 0, 1, 0.4);
        model.set_transition(0, 0, 2, 0.6);
        model.set_transition(1, 1, 2, 1.0);
        model
    }

    #[test]
    fn test_final_probability_one_stops_immediately() {
        let mut model = ProbabilisticModel::new(2, 1);
        model.set_initial(0, 1.0);
        model.set_final(1, 1.0);
        model.set_emission(0, 0, 1.0);
        model.set_transition(0, 0, 1, 1.0);
        let probabilities = model
            .evaluate(&[vec![0], vec![0, 0]], &EvaluationConfig::default())
            .unwrap();
        assert_eq!(probabilities, vec![1.0, 0.0]);
    }

    #[test]
    fn test_unknown_symbol_has_zero_probability() {
        let model = single_state_model();
        assert_eq!(model.walk_probability(&[3]), 0.0);
        let mut cache = ForwardCache::default();
        assert_eq!(model.forward_probability(&[3], &mut cache), 0.0);
    }

    #[test]
    fn test_empty_session() {
        let model = single_state_model();
        assert_eq!(model.walk_probability(&[]), 1.0);
        let mut cache = ForwardCache::default();
        assert_eq!(model.forward_probability(&[], &mut cache), 1.0);
    }

    #[test]
    fn test_forward_sums_over_paths() {
        let model = branching_model();
        let mut cache = ForwardCache::default();

        // stop in 1 (0.4 * 0.5) or in 2 (0.6 * 1)
        let single = model.forward_probability(&[0], &mut cache);
        assert!((single - 0.8).abs() < EPS);

        // 0 -> 1 -> 2: 0.4 * (0.5 * 1 * 1) * 1
        let double = model.forward_probability(&[0, 1], &mut cache);
        assert!((double - 0.2).abs() < EPS);
    }

    #[test]
    fn test_auto_mode_picks_forward_for_branching_model() {
        let model = branching_model();
        let probabilities = model
            .evaluate(&[vec![0]], &EvaluationConfig::default())
            .unwrap();
        assert!((probabilities[0] - 0.8).abs() < EPS);
    }

    #[test]
    fn test_forced_deterministic_mode_rejects_branching_model() {
        let model = branching_model();
        let config = EvaluationConfig {
            mode: EvaluationMode::Deterministic,
            ..Default::default()
        };
        assert!(matches!(
            model.evaluate(&[vec![0]], &config),
            Err(Error::NonDeterministic { .. })
        ));
    }

    #[test]
    fn test_walk_and_forward_agree_on_deterministic_model() {
        let mut model = ProbabilisticModel::new(2, 2);
        model.set_initial(0, 1.0);
        model.set_final(0, 0.2);
        model.set_final(1, 0.5);
        model.set_emission(0, 0, 0.7);
        model.set_emission(0, 1, 0.3);
        model.set_emission(1, 0, 0.4);
        model.set_emission(1, 1, 0.6);
        model.set_transition(0, 0, 1, 1.0);
        model.set_transition(1, 0, 0, 1.0);
        model.set_transition(0, 1, 0, 1.0);
        model.set_transition(1, 1, 1, 1.0);

        let sessions = vec![vec![0], vec![0, 1, 1], vec![1, 0, 0, 1], vec![]];
        let walk = model
            .evaluate(
                &sessions,
                &EvaluationConfig {
                    mode: EvaluationMode::Deterministic,
                    ..Default::default()
                },
            )
            .unwrap();
        let forward = model
            .evaluate(
                &sessions,
                &EvaluationConfig {
                    mode: EvaluationMode::Forward,
                    ..Default::default()
                },
            )
            .unwrap();
        for (w, f) in walk.iter().zip(&forward) {
            assert!((w - f).abs() < EPS, "{w} != {f}");
        }
    }

    #[test]
    fn test_cache_limit_clears_table() {
        let model = single_state_model();
        let mut cache = ForwardCache::new(Some(2));
        model.forward_probability(&[0, 0, 0, 0], &mut cache);
        assert!(cache.len() <= 2);
        assert!(cache.clears() > 0);
    }

    #[test]
    fn test_cache_is_reused_across_sessions() {
        let model = branching_model();
        let mut cache = ForwardCache::default();
        model.forward_probability(&[0, 1], &mut cache);
        assert_eq!(cache.len(), 2);
        model.forward_probability(&[1], &mut cache);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_evaluate_with_reports_each_session() {
        let model = branching_model();
        let mut seen = Vec::new();
        model
            .evaluate_with(
                &[vec![0], vec![0, 1], vec![1]],
                &EvaluationConfig::default(),
                |done| seen.push(done),
            )
            .unwrap();
        assert_eq!(seen, vec![1, 2, 3]);
    }
}
