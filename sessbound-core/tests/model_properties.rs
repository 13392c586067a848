//! Property-based tests for the probabilistic model.

use proptest::prelude::*;
use sessbound_core::{
    EvaluationConfig, EvaluationMode, ProbabilisticModel, SamplingConfig, Symbol,
};

/// A deterministic skeleton: one destination per (state, symbol), state 0 starts
fn skeleton() -> impl Strategy<Value = ProbabilisticModel> {
    (1usize..5, 1usize..4).prop_flat_map(|(states, symbols)| {
        prop::collection::vec(0..states, states * symbols).prop_map(move |destinations| {
            let mut model = ProbabilisticModel::new(states, symbols);
            model.set_initial(0, 1.0);
            for q in 0..states {
                for a in 0..symbols {
                    let to = destinations[q * symbols + a];
                    model.set_transition(a as Symbol, q, to, 1.0);
                    model.set_emission(q, a as Symbol, 1.0 / symbols as f64);
                }
                model.set_final(q, 0.5);
            }
            model
        })
    })
}

fn training() -> impl Strategy<Value = Vec<Vec<Symbol>>> {
    prop::collection::vec(prop::collection::vec(0u32..3, 0..10), 1..30)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Estimated models survive store then load.
    #[test]
    fn estimated_model_round_trips(skeleton in skeleton(), training in training()) {
        let model = skeleton.estimate(&training).unwrap();
        let reloaded = ProbabilisticModel::load(&model.store()).unwrap();

        prop_assert_eq!(reloaded.num_states(), model.num_states());
        prop_assert_eq!(reloaded.num_symbols(), model.num_symbols());
        for q in 0..model.num_states() {
            prop_assert!((reloaded.initial(q) - model.initial(q)).abs() < 1e-9);
            prop_assert!((reloaded.final_probability(q) - model.final_probability(q)).abs() < 1e-9);
            for a in 0..model.num_symbols() as Symbol {
                prop_assert!((reloaded.emission(q, a) - model.emission(q, a)).abs() < 1e-9);
                for to in 0..model.num_states() {
                    prop_assert!(
                        (reloaded.transition(a, q, to) - model.transition(a, q, to)).abs() < 1e-9
                    );
                }
            }
        }
    }

    /// Estimated rows are distributions or all zero.
    #[test]
    fn estimated_rows_are_normalised(skeleton in skeleton(), training in training()) {
        let model = skeleton.estimate(&training).unwrap();
        for q in 0..model.num_states() {
            let total: f64 = model.emission_row(q).iter().sum();
            prop_assert!(total == 0.0 || (total - 1.0).abs() < 1e-9);
            prop_assert!((0.0..=1.0).contains(&model.final_probability(q)));
        }
    }

    /// The deterministic walk and the forward recursion agree.
    #[test]
    fn walk_matches_forward(skeleton in skeleton(), sessions in training()) {
        let walk = skeleton
            .evaluate(&sessions, &EvaluationConfig { mode: EvaluationMode::Deterministic, ..Default::default() })
            .unwrap();
        let forward = skeleton
            .evaluate(&sessions, &EvaluationConfig { mode: EvaluationMode::Forward, cache_limit: Some(16) })
            .unwrap();
        for (w, f) in walk.iter().zip(&forward) {
            prop_assert!((w - f).abs() < 1e-12, "{} != {}", w, f);
        }
    }

    /// Sampling depends on the seed alone.
    #[test]
    fn sampling_is_reproducible(skeleton in skeleton(), count in 0usize..20, seed in any::<u64>()) {
        let config = SamplingConfig { max_session_length: 50 };
        let first = skeleton.sample(count, seed, &config).unwrap();
        let second = skeleton.sample(count, seed, &config).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert!(first.iter().all(|s| !s.is_empty() && s.len() <= 50));
    }
}

#[test]
fn different_seeds_give_different_samples() {
    let mut model = ProbabilisticModel::new(1, 4);
    model.set_initial(0, 1.0);
    model.set_final(0, 0.1);
    for a in 0..4 {
        model.set_emission(0, a, 0.25);
        model.set_transition(a, 0, 0, 1.0);
    }
    let config = SamplingConfig::default();
    let first = model.sample(50, 1, &config).unwrap();
    let second = model.sample(50, 2, &config).unwrap();
    assert_ne!(first, second);
}
