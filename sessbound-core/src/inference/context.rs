//! Past/future context windows and their co-occurrence counts

use crate::types::Symbol;
use smallvec::SmallVec;
use std::collections::HashMap;

/// A short run of symbols; stays inline for the usual window sizes
pub type Context = SmallVec<[Symbol; 8]>;

/// The symbols right before and right after one split point of a session
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContextPair {
    /// Up to `size` symbols ending at the split
    pub past: Context,
    /// Up to `size` symbols starting at the split; empty at the session end
    pub future: Context,
}

/// The context pair at split `split` of `session` (0 ≤ split ≤ len)
pub(crate) fn window_at(session: &[Symbol], split: usize, size: usize) -> ContextPair {
    let past = &session[split.saturating_sub(size)..split];
    let future = &session[split..(split + size).min(session.len())];
    ContextPair {
        past: Context::from_slice(past),
        future: Context::from_slice(future),
    }
}

/// Lazily yields every context pair of every session
///
/// A session of length n yields n + 1 pairs, one per split point, the last
/// one with an empty future.
#[derive(Debug, Clone)]
pub struct Contexts<'a, I> {
    sessions: I,
    current: Option<&'a [Symbol]>,
    split: usize,
    size: usize,
}

/// Context pairs of width `size` over `sessions`
pub fn contexts<'a, I>(sessions: I, size: usize) -> Contexts<'a, I::IntoIter>
where
    I: IntoIterator<Item = &'a [Symbol]>,
{
    Contexts {
        sessions: sessions.into_iter(),
        current: None,
        split: 0,
        size,
    }
}

impl<'a, I> Iterator for Contexts<'a, I>
where
    I: Iterator<Item = &'a [Symbol]>,
{
    type Item = ContextPair;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(session) = self.current {
                if self.split <= session.len() {
                    let pair = window_at(session, self.split, self.size);
                    self.split += 1;
                    return Some(pair);
                }
            }
            self.current = Some(self.sessions.next()?);
            self.split = 0;
        }
    }
}

/// Counts of past suffixes and of the futures that follow them
///
/// For every pair, each suffix of the past (the empty one included) gets one
/// prior occurrence, and each non-empty prefix of the future is counted
/// under it. A pair at a session end counts the empty future instead, which
/// stands for "the session stops here".
#[derive(Debug, Clone, Default)]
pub struct ContextTable {
    priors: HashMap<Context, u64>,
    joint: HashMap<Context, HashMap<Context, u64>>,
}

impl ContextTable {
    /// Count every pair
    pub fn build<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = ContextPair>,
    {
        let mut table = Self::default();
        for pair in pairs {
            table.add(&pair);
        }
        log::debug!("context table holds {} past suffixes", table.priors.len());
        table
    }

    /// Count one pair
    pub fn add(&mut self, pair: &ContextPair) {
        for start in 0..=pair.past.len() {
            let suffix = Context::from_slice(&pair.past[start..]);
            *self.priors.entry(suffix.clone()).or_default() += 1;

            let futures = self.joint.entry(suffix).or_default();
            if pair.future.is_empty() {
                *futures.entry(Context::new()).or_default() += 1;
            } else {
                for end in 1..=pair.future.len() {
                    *futures
                        .entry(Context::from_slice(&pair.future[..end]))
                        .or_default() += 1;
                }
            }
        }
    }

    /// Occurrences of `past` as a past suffix
    pub fn prior(&self, past: &[Symbol]) -> u64 {
        self.priors.get(past).copied().unwrap_or(0)
    }

    /// Occurrences of `future` right after `past`
    pub fn count(&self, past: &[Symbol], future: &[Symbol]) -> u64 {
        self.joint
            .get(past)
            .and_then(|futures| futures.get(future))
            .copied()
            .unwrap_or(0)
    }

    /// P(future | past), or `None` if `past` was never seen
    pub fn probability(&self, past: &[Symbol], future: &[Symbol]) -> Option<f64> {
        match self.prior(past) {
            0 => None,
            prior => Some(self.count(past, future) as f64 / prior as f64),
        }
    }

    /// P(session ends | past)
    pub fn stop_probability(&self, past: &[Symbol]) -> Option<f64> {
        self.probability(past, &[])
    }
}
