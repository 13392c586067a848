//! Loader for state machines printed by the RTI+ learner
//!
//! Two kinds of lines matter, everything else is ignored:
//!
//! ```text
//! 0 prob: symbol= 3 0 5
//! 0 2 [0, 10]->1
//! ```
//!
//! A state line gives per-symbol counts, normalised into the emission row.
//! A transition line is `source symbol [lo, hi]->target`. The sink state
//! `-1` is skipped on both sides. The result is a deterministic skeleton
//! rooted at state 0 with final probabilities 0, meant to be filled in by
//! [`ProbabilisticModel::estimate`].

use super::{Dimensions, ProbabilisticModel, MAX_MODEL_CELLS};
use crate::error::{Error, Result};
use crate::types::{State, Symbol};
use regex::Regex;
use std::sync::LazyLock;

static STATE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(-?\d+) prob: symbol=((?: \d+)+)").expect("state line pattern is valid")
});

static TRANSITION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(-?\d+) (\d+) \[(\d+), (\d+)\]->(-?\d+)$")
        .expect("transition line pattern is valid")
});

fn parse_id<T: std::str::FromStr>(line_no: usize, text: &str) -> Result<T> {
    text.parse()
        .map_err(|_| Error::format(line_no, "rti", format!("id '{text}' out of range")))
}

fn too_large(line_no: usize, dims: Dimensions) -> Error {
    Error::format(
        line_no,
        "rti",
        format!(
            "{} states over {} symbols exceed {MAX_MODEL_CELLS} transition cells",
            dims.states, dims.symbols
        ),
    )
}

/// Build a skeleton model from RTI+ output
pub fn load(text: &str) -> Result<ProbabilisticModel> {
    let mut dims = Dimensions::default();
    let mut emissions: Vec<(State, Vec<f64>)> = Vec::new();
    let mut transitions: Vec<(State, Symbol, State)> = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim_end();

        if let Some(caps) = STATE_LINE.captures(line) {
            if caps[1].starts_with('-') {
                continue;
            }
            let state: State = parse_id(line_no, &caps[1])?;
            let counts = caps[2]
                .split_whitespace()
                .map(|c| parse_id::<u64>(line_no, c))
                .collect::<Result<Vec<_>>>()?;
            let total: f64 = counts.iter().map(|&c| c as f64).sum();
            let row = counts
                .iter()
                .map(|&c| if total > 0.0 { c as f64 / total } else { 0.0 })
                .collect::<Vec<f64>>();
            if !dims.cover(state, row.len()) {
                return Err(too_large(line_no, dims));
            }
            emissions.push((state, row));
        } else if let Some(caps) = TRANSITION_LINE.captures(line) {
            if caps[1].starts_with('-') || caps[5].starts_with('-') {
                continue;
            }
            let from: State = parse_id(line_no, &caps[1])?;
            let symbol: Symbol = parse_id(line_no, &caps[2])?;
            let to: State = parse_id(line_no, &caps[5])?;
            if !dims.cover(from.max(to), symbol as usize + 1) {
                return Err(too_large(line_no, dims));
            }
            transitions.push((from, symbol, to));
        }
    }

    if dims.states == 0 {
        return Err(Error::format(
            text.lines().count(),
            "rti",
            "no states found in RTI+ output",
        ));
    }
    let Dimensions { states, symbols } = dims;

    let mut model = ProbabilisticModel::new(states, symbols);
    model.set_initial(0, 1.0);
    for (q, row) in &emissions {
        for (a, &p) in row.iter().enumerate() {
            model.set_emission(*q, a as Symbol, p);
        }
    }
    let mut skipped = 0;
    for &(from, symbol, to) in &transitions {
        // only symbols the source state actually emits
        if model.emission(from, symbol) > 0.0 {
            model.set_transition(symbol, from, to, 1.0);
        } else {
            skipped += 1;
        }
    }
    log::debug!(
        "RTI+ skeleton: {states} states, {symbols} symbols, {} transitions ({skipped} skipped)",
        transitions.len() - skipped
    );
    Ok(model)
}
