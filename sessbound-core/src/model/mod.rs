//! Probabilistic finite-state model
//!
//! All parameters live in flat arrays sized once at construction:
//!
//! - `initial[q]`, `finals[q]`: one entry per state
//! - `emission[q * |Σ| + a]`: row-major by state
//! - `transition[(a * |Q| + q) * |Q| + q']`: one |Q|×|Q| block per symbol
//!
//! Symbols outside the alphabet read as probability 0.

mod dot;
mod estimation;
mod evaluation;
mod format;
pub mod rti;
mod sampling;
pub mod treba;

pub use evaluation::ForwardCache;

use crate::error::{Error, Result};
use crate::types::{State, Symbol};

/// Largest `|Σ|·|Q|²` a loader will allocate
pub const MAX_MODEL_CELLS: usize = 1 << 24;

/// Model dimensions grown from the ids a loader meets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Dimensions {
    pub states: usize,
    pub symbols: usize,
}

impl Dimensions {
    /// Widen to cover `state` and an alphabet of `symbols`
    ///
    /// Returns `false` once the transition arrays would exceed
    /// [`MAX_MODEL_CELLS`].
    pub fn cover(&mut self, state: State, symbols: usize) -> bool {
        self.states = self.states.max(state.saturating_add(1));
        self.symbols = self.symbols.max(symbols);
        self.cells().is_some_and(|cells| cells <= MAX_MODEL_CELLS)
    }

    fn cells(&self) -> Option<usize> {
        self.states
            .checked_mul(self.states)?
            .checked_mul(self.symbols.max(1))
    }
}

/// A PDFA-like generative model over a finite alphabet
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilisticModel {
    states: usize,
    symbols: usize,
    initial: Vec<f64>,
    finals: Vec<f64>,
    emission: Vec<f64>,
    transition: Vec<f64>,
}

impl ProbabilisticModel {
    /// Create a model with every probability set to 0
    ///
    /// # Panics
    /// Panics on allocation failure; loaders bound their sizes with
    /// [`MAX_MODEL_CELLS`] first.
    pub fn new(states: usize, symbols: usize) -> Self {
        Self {
            states,
            symbols,
            initial: vec![0.0; states],
            finals: vec![0.0; states],
            emission: vec![0.0; states * symbols],
            transition: vec![0.0; symbols * states * states],
        }
    }

    /// Number of states |Q|
    pub fn num_states(&self) -> usize {
        self.states
    }

    /// Alphabet size |Σ|
    pub fn num_symbols(&self) -> usize {
        self.symbols
    }

    fn symbol_index(&self, symbol: Symbol) -> Option<usize> {
        let index = symbol as usize;
        (index < self.symbols).then_some(index)
    }

    /// Probability of starting in `state`
    pub fn initial(&self, state: State) -> f64 {
        self.initial[state]
    }

    /// Probability of ending the session while in `state`
    pub fn final_probability(&self, state: State) -> f64 {
        self.finals[state]
    }

    /// Probability of emitting `symbol` in `state`
    pub fn emission(&self, state: State, symbol: Symbol) -> f64 {
        self.symbol_index(symbol)
            .map_or(0.0, |a| self.emission[state * self.symbols + a])
    }

    /// Probability of moving from `from` to `to` after emitting `symbol`
    pub fn transition(&self, symbol: Symbol, from: State, to: State) -> f64 {
        self.symbol_index(symbol).map_or(0.0, |a| {
            self.transition[(a * self.states + from) * self.states + to]
        })
    }

    /// The initial distribution over states
    pub fn initial_row(&self) -> &[f64] {
        &self.initial
    }

    /// The final probability of every state
    pub fn final_row(&self) -> &[f64] {
        &self.finals
    }

    /// The emission distribution of `state`
    pub fn emission_row(&self, state: State) -> &[f64] {
        let start = state * self.symbols;
        &self.emission[start..start + self.symbols]
    }

    /// Destination distribution of `from` on `symbol` (empty for unknown symbols)
    pub fn transition_row(&self, symbol: Symbol, from: State) -> &[f64] {
        match self.symbol_index(symbol) {
            Some(a) => {
                let start = (a * self.states + from) * self.states;
                &self.transition[start..start + self.states]
            }
            None => &[],
        }
    }

    /// Set the initial probability of `state`
    ///
    /// # Panics
    /// Panics if `state` is out of range.
    pub fn set_initial(&mut self, state: State, probability: f64) {
        self.initial[state] = probability;
    }

    /// Set the final probability of `state`
    ///
    /// # Panics
    /// Panics if `state` is out of range.
    pub fn set_final(&mut self, state: State, probability: f64) {
        self.finals[state] = probability;
    }

    /// Set the emission probability of `symbol` in `state`
    ///
    /// # Panics
    /// Panics if `state` or `symbol` is out of range.
    pub fn set_emission(&mut self, state: State, symbol: Symbol, probability: f64) {
        let a = symbol as usize;
        assert!(a < self.symbols, "symbol {symbol} outside the alphabet");
        self.emission[state * self.symbols + a] = probability;
    }

    /// Set the transition probability `from -symbol-> to`
    ///
    /// # Panics
    /// Panics if a state or `symbol` is out of range.
    pub fn set_transition(&mut self, symbol: Symbol, from: State, to: State, probability: f64) {
        let a = symbol as usize;
        assert!(a < self.symbols, "symbol {symbol} outside the alphabet");
        assert!(from < self.states && to < self.states, "state out of range");
        self.transition[(a * self.states + from) * self.states + to] = probability;
    }

    /// The canonical start state: the first state with positive initial mass
    pub fn start_state(&self) -> Option<State> {
        self.initial.iter().position(|&p| p > 0.0)
    }

    /// The first destination with positive probability from `from` on `symbol`
    pub fn next_state(&self, from: State, symbol: Symbol) -> Option<State> {
        self.transition_row(symbol, from)
            .iter()
            .position(|&p| p > 0.0)
    }

    /// Check that the model has one start state and at most one positive
    /// transition per (state, symbol)
    pub fn check_deterministic(&self) -> Result<()> {
        let mut starts = self
            .initial
            .iter()
            .enumerate()
            .filter(|(_, &p)| p > 0.0)
            .map(|(q, _)| q);
        if let (Some(_), Some(second)) = (starts.next(), starts.next()) {
            return Err(Error::NonDeterministic {
                state: second,
                symbol: None,
            });
        }

        for a in 0..self.symbols as Symbol {
            for q in 0..self.states {
                let positive = self
                    .transition_row(a, q)
                    .iter()
                    .filter(|&&p| p > 0.0)
                    .count();
                if positive > 1 {
                    return Err(Error::NonDeterministic {
                        state: q,
                        symbol: Some(a),
                    });
                }
            }
        }
        Ok(())
    }

    /// Whether [`check_deterministic`](Self::check_deterministic) succeeds
    pub fn is_deterministic(&self) -> bool {
        self.check_deterministic().is_ok()
    }
}
