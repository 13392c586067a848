//! A symbol stream with its session boundaries
//!
//! A [`Segmentation`] stores the concatenated symbols once and describes
//! sessions by the positions where a boundary follows. Every position is
//! either in `boundaries` or in `non_boundaries`; the last position is
//! always a boundary. The `pool` is a subset of non-boundaries that are
//! candidates for promotion by [`bound`](Segmentation::bound) and
//! [`infer`](crate::inference::infer).

mod metrics;
mod rebound;

pub use metrics::{evaluate, BoundaryMetrics, ContingencyTable};

use crate::codec::{self, Dialect, Header};
use crate::error::{Error, Result};
use crate::types::{Session, Symbol, Token};
use std::collections::btree_set;
use std::collections::BTreeSet;

/// Symbol stream plus boundary sets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segmentation {
    seq: Vec<Symbol>,
    alphabet: BTreeSet<Symbol>,
    boundaries: BTreeSet<usize>,
    non_boundaries: BTreeSet<usize>,
    pool: BTreeSet<usize>,
    seed: Option<u64>,
}

impl Segmentation {
    /// Build from a token stream
    ///
    /// EPSILON tokens are dropped. The last position is forced to be a
    /// boundary.
    pub fn build<I>(stream: I) -> Self
    where
        I: IntoIterator<Item = Token>,
    {
        let mut segmentation = Segmentation::default();
        for token in stream {
            let Some(symbol) = token.symbol else {
                continue;
            };
            let position = segmentation.seq.len();
            segmentation.seq.push(symbol);
            segmentation.alphabet.insert(symbol);
            if token.is_boundary {
                segmentation.boundaries.insert(position);
            } else {
                segmentation.non_boundaries.insert(position);
            }
        }

        if let Some(last) = segmentation.seq.len().checked_sub(1) {
            if segmentation.non_boundaries.remove(&last) {
                log::debug!("stream did not end on a boundary, closing position {last}");
                segmentation.boundaries.insert(last);
            }
        }
        segmentation
    }

    /// Build from a fallible token stream, stopping at the first error
    pub fn try_build<I>(stream: I) -> Result<Self>
    where
        I: IntoIterator<Item = Result<Token>>,
    {
        let tokens = stream.into_iter().collect::<Result<Vec<_>>>()?;
        Ok(Self::build(tokens))
    }

    /// Decode interchange text straight into a segmentation
    pub fn decode(text: &str, dialect: Dialect) -> Result<Self> {
        Self::try_build(codec::decode(text, dialect)?)
    }

    /// Build from already separated sessions
    pub fn from_sessions<S: AsRef<[Symbol]>>(sessions: &[S]) -> Self {
        Self::build(sessions.iter().flat_map(|session| {
            let session = session.as_ref();
            session
                .iter()
                .enumerate()
                .map(move |(i, &symbol)| Token::new(symbol, i + 1 == session.len()))
        }))
    }

    /// Restore a persisted pool
    ///
    /// Every position must be an in-range non-boundary.
    pub fn with_pool<I>(mut self, pool: I) -> Result<Self>
    where
        I: IntoIterator<Item = usize>,
    {
        for position in pool {
            if !self.non_boundaries.contains(&position) {
                return Err(Error::InvalidArgument(format!(
                    "pool position {position} is not a non-boundary of the stream"
                )));
            }
            self.pool.insert(position);
        }
        Ok(self)
    }

    /// The concatenated symbols
    pub fn seq(&self) -> &[Symbol] {
        &self.seq
    }

    /// Distinct symbols of the stream
    pub fn alphabet(&self) -> &BTreeSet<Symbol> {
        &self.alphabet
    }

    /// Positions followed by a boundary
    pub fn boundaries(&self) -> &BTreeSet<usize> {
        &self.boundaries
    }

    /// Positions not followed by a boundary
    pub fn non_boundaries(&self) -> &BTreeSet<usize> {
        &self.non_boundaries
    }

    /// Candidate positions for promotion
    pub fn pool(&self) -> &BTreeSet<usize> {
        &self.pool
    }

    /// Seed of the randomized operation that produced this value, if any
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Number of symbols in the stream
    pub fn len(&self) -> usize {
        self.seq.len()
    }

    /// Whether the stream holds no symbols
    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    /// Number of sessions delimited by boundaries
    pub fn boundary_count(&self) -> usize {
        self.boundaries.len()
    }

    /// Whether a boundary follows `position`
    pub fn is_boundary(&self, position: usize) -> bool {
        self.boundaries.contains(&position)
    }

    /// Iterate over the sessions in stream order
    pub fn sessions(&self) -> Sessions<'_> {
        Sessions {
            seq: &self.seq,
            cuts: self.boundaries.iter(),
            start: 0,
        }
    }

    /// Render the segmentation in a codec dialect
    ///
    /// The header records `max(1, boundaries)` sessions.
    pub fn encode(&self, dialect: Dialect) -> String {
        let header = Header {
            sessions: self.boundaries.len().max(1),
            alphabet_size: self.alphabet.len(),
        };
        let sessions: Vec<&[Symbol]> = self.sessions().collect();
        codec::encode_with_header(header, &sessions, dialect)
    }

    /// Sliding windows of `size` symbols over the raw stream
    ///
    /// A stream shorter than `size` yields itself as a single window.
    pub fn windows(&self, size: usize) -> Result<std::slice::Windows<'_, Symbol>> {
        if size == 0 {
            return Err(Error::InvalidArgument(
                "window size must be positive".to_string(),
            ));
        }
        let size = size.min(self.seq.len().max(1));
        Ok(self.seq.windows(size))
    }

    /// Every window of the stream as its own session
    pub fn sliding_sample(&self, size: usize) -> Result<Vec<Session>> {
        Ok(self.windows(size)?.map(<[Symbol]>::to_vec).collect())
    }

    /// Copy with `positions` promoted to boundaries and removed from the pool
    pub(crate) fn promote<I>(&self, positions: I, seed: Option<u64>) -> Segmentation
    where
        I: IntoIterator<Item = usize>,
    {
        let mut promoted = self.clone();
        for position in positions {
            if promoted.non_boundaries.remove(&position) {
                promoted.boundaries.insert(position);
            }
            promoted.pool.remove(&position);
        }
        promoted.seed = seed;
        promoted
    }
}

/// Iterator over the sessions of a [`Segmentation`]
///
/// Yields one slice per boundary, then any trailing symbols.
#[derive(Debug, Clone)]
pub struct Sessions<'a> {
    seq: &'a [Symbol],
    cuts: btree_set::Iter<'a, usize>,
    start: usize,
}

impl<'a> Iterator for Sessions<'a> {
    type Item = &'a [Symbol];

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(&cut) = self.cuts.next() {
            let session = &self.seq[self.start..=cut];
            self.start = cut + 1;
            return Some(session);
        }
        if self.start < self.seq.len() {
            let rest = &self.seq[self.start..];
            self.start = self.seq.len();
            return Some(rest);
        }
        None
    }
}
