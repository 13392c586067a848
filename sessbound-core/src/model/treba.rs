//! Loader for automata printed by the treba learner
//!
//! Two kinds of lines matter, everything else is ignored:
//!
//! ```text
//! 0 1 3 0.25
//! 1 0.4
//! ```
//!
//! A transition line is `source target symbol probability`, a final line is
//! `state probability`. Treba's probabilities are joint: the outgoing mass
//! of a state plus its final probability sums to 1. They are factored into
//! the model's `(1 - final) · emission · transition` form, so a session gets
//! the same probability under both. State 0 is the start state and negative
//! states are skipped.

use super::{Dimensions, ProbabilisticModel, MAX_MODEL_CELLS};
use crate::error::{Error, Result};
use crate::types::{State, Symbol};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

const NUMBER: &str = r"[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?";

static TRANSITION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^(-?\d+) (-?\d+) (\d+) ({NUMBER})$"))
        .expect("transition line pattern is valid")
});

static FINAL_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^(-?\d+) ({NUMBER})$")).expect("final line pattern is valid")
});

fn parse_id<T: std::str::FromStr>(line_no: usize, text: &str) -> Result<T> {
    text.parse()
        .map_err(|_| Error::format(line_no, "treba", format!("id '{text}' out of range")))
}

fn parse_probability(line_no: usize, text: &str) -> Result<f64> {
    text.parse::<f64>()
        .ok()
        .filter(|p| (0.0..=1.0).contains(p))
        .ok_or_else(|| {
            Error::format(
                line_no,
                "treba",
                format!("probability {text} outside [0, 1]"),
            )
        })
}

/// Build a model from treba output
///
/// # Errors
/// [`Error::Format`] for out-of-range ids or probabilities, for a model
/// larger than [`MAX_MODEL_CELLS`] and for output without any state.
pub fn load(text: &str) -> Result<ProbabilisticModel> {
    let mut dims = Dimensions::default();
    let mut finals: Vec<(State, f64)> = Vec::new();
    let mut transitions: Vec<(State, Symbol, State, f64)> = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();

        // a final line also matches the start of a transition line
        if let Some(caps) = TRANSITION_LINE.captures(line) {
            if caps[1].starts_with('-') || caps[2].starts_with('-') {
                continue;
            }
            let from: State = parse_id(line_no, &caps[1])?;
            let to: State = parse_id(line_no, &caps[2])?;
            let symbol: Symbol = parse_id(line_no, &caps[3])?;
            let probability = parse_probability(line_no, &caps[4])?;
            if !dims.cover(from.max(to), symbol as usize + 1) {
                return Err(too_large(line_no, dims));
            }
            transitions.push((from, symbol, to, probability));
        } else if let Some(caps) = FINAL_LINE.captures(line) {
            if caps[1].starts_with('-') {
                continue;
            }
            let state: State = parse_id(line_no, &caps[1])?;
            let probability = parse_probability(line_no, &caps[2])?;
            if !dims.cover(state, 0) {
                return Err(too_large(line_no, dims));
            }
            finals.push((state, probability));
        }
    }

    if dims.states == 0 {
        return Err(Error::format(
            text.lines().count(),
            "treba",
            "no states found in treba output",
        ));
    }
    let Dimensions { states, symbols } = dims;

    let mut model = ProbabilisticModel::new(states, symbols);
    model.set_initial(0, 1.0);
    for &(state, probability) in &finals {
        model.set_final(state, probability);
    }

    // joint mass of every (state, symbol) pair, split over its targets
    let mut mass: BTreeMap<(State, Symbol), f64> = BTreeMap::new();
    for &(from, symbol, _, probability) in &transitions {
        *mass.entry((from, symbol)).or_default() += probability;
    }
    for &(from, symbol, to, probability) in &transitions {
        let total = mass[&(from, symbol)];
        if total > 0.0 {
            model.set_transition(symbol, from, to, probability / total);
        }
    }
    for (&(state, symbol), &total) in &mass {
        let going_on = 1.0 - model.final_probability(state);
        let emission = if going_on > 0.0 { total / going_on } else { total };
        model.set_emission(state, symbol, emission.min(1.0));
    }

    log::debug!(
        "treba model: {states} states, {symbols} symbols, {} transitions, {} finals",
        transitions.len(),
        finals.len()
    );
    Ok(model)
}

fn too_large(line_no: usize, dims: Dimensions) -> Error {
    Error::format(
        line_no,
        "treba",
        format!(
            "{} states over {} symbols exceed {MAX_MODEL_CELLS} transition cells",
            dims.states, dims.symbols
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    // 0 -a-> 1 or 0 -b-> 0, then 1 -a-> 0 or stops
    const OUTPUT: &str = "\
0 1 0 0.6
0 0 1 0.4
1 0 0 0.5
1 0.5
";

    #[test]
    fn test_load_factors_joint_probabilities() {
        let model = load(OUTPUT).unwrap();
        assert_eq!(model.num_states(), 2);
        assert_eq!(model.num_symbols(), 2);
        assert_eq!(model.initial(0), 1.0);
        assert_eq!(model.final_probability(0), 0.0);
        assert_eq!(model.final_probability(1), 0.5);
        assert!((model.emission(0, 0) - 0.6).abs() < 1e-12);
        assert!((model.emission(0, 1) - 0.4).abs() < 1e-12);
        // 0.5 of the remaining 0.5
        assert!((model.emission(1, 0) - 1.0).abs() < 1e-12);
        assert_eq!(model.transition(0, 0, 1), 1.0);
        assert_eq!(model.transition(1, 0, 0), 1.0);
        assert_eq!(model.transition(0, 1, 0), 1.0);
        assert!(model.is_deterministic());
    }

    #[test]
    fn test_session_probability_matches_joint_product() {
        let model = load(OUTPUT).unwrap();
        let config = crate::config::EvaluationConfig::default();
        let probabilities = model.evaluate(&[vec![1, 0], vec![0, 0, 0]], &config).unwrap();
        // b a: 0.4 · 0.6 · 0.5
        assert!((probabilities[0] - 0.12).abs() < 1e-12);
        // a a a: 0.6 · 0.5 · 0.6 · 0.5
        assert!((probabilities[1] - 0.09).abs() < 1e-12);
    }

    #[test]
    fn test_nondeterministic_targets_share_the_mass() {
        let model = load("0 0 0 0.2\n0 1 0 0.6\n0 0.2\n1 1\n").unwrap();
        assert!((model.emission(0, 0) - 1.0).abs() < 1e-12);
        assert!((model.transition(0, 0, 0) - 0.25).abs() < 1e-12);
        assert!((model.transition(0, 0, 1) - 0.75).abs() < 1e-12);
        assert!(!model.is_deterministic());
    }

    #[test]
    fn test_negative_states_and_unrelated_lines_are_skipped() {
        let model = load("training done\n0 -1 0 0.5\n0 0 1 0.5\n-1 1\n0 0.5\n").unwrap();
        assert_eq!(model.num_states(), 1);
        assert_eq!(model.num_symbols(), 2);
        assert_eq!(model.emission(0, 0), 0.0);
        assert!((model.emission(0, 1) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            load("0 1 0 1.5\n"),
            Err(Error::Format { line: 1, .. })
        ));
        assert!(matches!(
            load("0 1 0 0.5\n1 -2.3\n"),
            Err(Error::Format { line: 2, .. })
        ));
        assert!(matches!(
            load("0 4294967296 0 0.5\n"),
            Err(Error::Format { line: 1, .. })
        ));
        assert!(matches!(
            load("0 0 4294967296 0.5\n"),
            Err(Error::Format { line: 1, .. })
        ));
        assert!(matches!(load("\n"), Err(Error::Format { .. })));
    }
}
