//! Maximum-likelihood re-estimation over a fixed deterministic skeleton

use super::ProbabilisticModel;
use crate::error::Result;
use crate::types::Symbol;

impl ProbabilisticModel {
    /// Re-estimate final and emission probabilities from training sessions
    ///
    /// Each session is walked from the start state. Every symbol step counts
    /// one visit and one emission at the current state; the end of the
    /// session counts one visit and one stop at the last state. A walk that
    /// hits a missing transition stops counting for that session.
    ///
    /// The returned model keeps this model's initial and transition
    /// parameters. States never reached get final and emission 0.
    ///
    /// # Errors
    /// [`Error::NonDeterministic`](crate::Error::NonDeterministic) if the
    /// skeleton is not deterministic.
    pub fn estimate<S: AsRef<[Symbol]>>(&self, training: &[S]) -> Result<ProbabilisticModel> {
        self.check_deterministic()?;

        let states = self.num_states();
        let symbols = self.num_symbols();
        let start = self.start_state().unwrap_or(0);

        let mut visits = vec![0u64; states];
        let mut stops = vec![0u64; states];
        let mut emitted = vec![0u64; states * symbols];
        let mut dead = 0usize;

        'sessions: for session in training {
            let mut state = start;
            for &symbol in session.as_ref() {
                let Some(next) = self.next_state(state, symbol) else {
                    dead += 1;
                    continue 'sessions;
                };
                visits[state] += 1;
                emitted[state * symbols + symbol as usize] += 1;
                state = next;
            }
            visits[state] += 1;
            stops[state] += 1;
        }
        if dead > 0 {
            log::warn!(
                "{dead} of {} training sessions left the skeleton",
                training.len()
            );
        }

        let mut estimated = self.clone();
        for q in 0..states {
            let final_probability = if visits[q] > 0 {
                stops[q] as f64 / visits[q] as f64
            } else {
                0.0
            };
            estimated.set_final(q, final_probability);

            let row = &emitted[q * symbols..(q + 1) * symbols];
            let total: u64 = row.iter().sum();
            for (a, &count) in row.iter().enumerate() {
                let probability = if total > 0 {
                    count as f64 / total as f64
                } else {
                    0.0
                };
                estimated.set_emission(q, a as Symbol, probability);
            }
        }
        Ok(estimated)
    }
}
