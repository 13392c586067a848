//! Seeded session generation

use super::ProbabilisticModel;
use crate::config::SamplingConfig;
use crate::error::{Error, Result};
use crate::types::{RowKind, Session, State, Symbol};
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Draw one index from `row` in proportion to its weights
fn draw(
    rng: &mut ChaCha8Rng,
    row: &[f64],
    kind: RowKind,
    state: State,
    seed: u64,
) -> Result<usize> {
    let distribution = WeightedIndex::<f64>::new(row).map_err(|_| Error::DegenerateRow {
        row: kind,
        state,
        seed,
    })?;
    Ok(distribution.sample(rng))
}

impl ProbabilisticModel {
    /// Generate `count` sessions from the model
    ///
    /// Each session draws a start state, then repeatedly emits a symbol and
    /// moves on until the state's final probability fires or the session
    /// reaches `config.max_session_length`. A session always holds at least
    /// one symbol. The same `seed` reproduces the same sessions.
    ///
    /// # Errors
    /// [`Error::DegenerateRow`] when a row that must be drawn from carries no
    /// positive mass; the error records `seed`.
    pub fn sample(&self, count: usize, seed: u64, config: &SamplingConfig) -> Result<Vec<Session>> {
        config.validate()?;
        log::info!("sampling {count} sessions with seed {seed}");

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut sessions = Vec::with_capacity(count);
        for _ in 0..count {
            sessions.push(self.sample_session(&mut rng, seed, config.max_session_length)?);
        }
        Ok(sessions)
    }

    fn sample_session(&self, rng: &mut ChaCha8Rng, seed: u64, limit: usize) -> Result<Session> {
        let mut state = draw(rng, self.initial_row(), RowKind::Initial, 0, seed)?;
        let mut session = Session::new();
        loop {
            if !session.is_empty()
                && (rng.random::<f64>() < self.final_probability(state) || session.len() >= limit)
            {
                return Ok(session);
            }
            let symbol = draw(rng, self.emission_row(state), RowKind::Emission, state, seed)?
                as Symbol;
            let next = draw(
                rng,
                self.transition_row(symbol, state),
                RowKind::Transition,
                state,
                seed,
            )?;
            session.push(symbol);
            state = next;
        }
    }
}
