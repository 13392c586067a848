//! Core value types shared by every component

/// A symbol of the finite alphabet Σ
pub type Symbol = u32;

/// Index of a state of a probabilistic model
pub type State = usize;

/// One complete string of symbols, bounded by two boundaries
pub type Session = Vec<Symbol>;

/// Seed used when a caller does not pick one explicitly
pub const DEFAULT_SEED: u64 = 1984;

/// One decoded entry of a symbol stream
///
/// `symbol` is `None` for the EPSILON placeholder emitted in place of an
/// empty session; such tokens always carry `is_boundary = true` and are
/// dropped by every consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token {
    /// The emitted symbol, or `None` for EPSILON
    pub symbol: Option<Symbol>,
    /// Whether a session ends right after this token
    pub is_boundary: bool,
}

impl Token {
    /// Create a token for a real symbol
    pub fn new(symbol: Symbol, is_boundary: bool) -> Self {
        Self {
            symbol: Some(symbol),
            is_boundary,
        }
    }

    /// The placeholder emitted for an empty session
    pub fn epsilon() -> Self {
        Self {
            symbol: None,
            is_boundary: true,
        }
    }

    /// Whether this token is the EPSILON placeholder
    pub fn is_epsilon(&self) -> bool {
        self.symbol.is_none()
    }
}

impl From<(Symbol, bool)> for Token {
    fn from((symbol, is_boundary): (Symbol, bool)) -> Self {
        Self::new(symbol, is_boundary)
    }
}

/// The distribution a categorical draw was taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// The initial-state distribution
    Initial,
    /// The emission row of one state
    Emission,
    /// The transition row of one (state, symbol) pair
    Transition,
}

impl std::fmt::Display for RowKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowKind::Initial => write!(f, "initial"),
            RowKind::Emission => write!(f, "emission"),
            RowKind::Transition => write!(f, "transition"),
        }
    }
}
