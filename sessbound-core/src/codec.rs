//! Textual session files
//!
//! A session file lists one session per row. Three dialects exist:
//!
//! - [`Dialect::Plain`]: header `"<sessions> <alphabet>"`, rows
//!   `"<length> s1 s2 ..."`
//! - [`Dialect::Paired`]: same header, rows `"<length> s1 0 s2 0 ..."` where
//!   every symbol is followed by an auxiliary field (written as `0`,
//!   ignored on read)
//! - [`Dialect::Bare`]: no header, rows `"s1 s2 ..."`; an empty row is an
//!   empty session
//!
//! All three decode to the same flat stream of [`Token`]s: every symbol of
//! a row is emitted with `is_boundary = false` except the last one. An empty
//! session is emitted as a single [`Token::epsilon`] so that no row is ever
//! silently dropped.

use crate::error::{Error, Result};
use crate::types::{Session, Symbol, Token};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::iter::Enumerate;
use std::str::{FromStr, Lines};

/// Wire dialect of a session file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Length-prefixed rows of bare symbols
    #[default]
    Plain,
    /// Length-prefixed rows of `symbol aux` pairs
    Paired,
    /// Header-less rows of bare symbols
    Bare,
}

impl Dialect {
    /// Whether files of this dialect start with a header line
    pub fn has_header(&self) -> bool {
        !matches!(self, Dialect::Bare)
    }
}

impl FromStr for Dialect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "plain" | "pautomac" => Ok(Dialect::Plain),
            "paired" | "rti" => Ok(Dialect::Paired),
            "bare" | "treba" => Ok(Dialect::Bare),
            other => Err(Error::InvalidArgument(format!("unknown dialect '{other}'"))),
        }
    }
}

/// The informational first line of a session file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Declared number of sessions
    pub sessions: usize,
    /// Declared alphabet size
    pub alphabet_size: usize,
}

impl Header {
    fn parse(line_no: usize, line: &str) -> Result<Self> {
        let mut fields = line.split_whitespace();
        let (Some(sessions), Some(alphabet), None) = (fields.next(), fields.next(), fields.next())
        else {
            return Err(Error::format(
                line_no,
                "header",
                format!("expected '<sessions> <alphabet size>', found '{}'", line.trim()),
            ));
        };
        Ok(Self {
            sessions: parse_number(line_no, "header", sessions)?,
            alphabet_size: parse_number(line_no, "header", alphabet)?,
        })
    }
}

fn parse_number<T: FromStr>(line_no: usize, section: &str, field: &str) -> Result<T> {
    field.parse().map_err(|_| {
        Error::format(line_no, section, format!("'{field}' is not a non-negative integer"))
    })
}

/// Parse one session row into its symbols
fn parse_row(line_no: usize, line: &str, dialect: Dialect) -> Result<Session> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if dialect == Dialect::Bare {
        return fields
            .iter()
            .map(|field| parse_number(line_no, "row", field))
            .collect();
    }

    let Some((length, rest)) = fields.split_first() else {
        return Err(Error::format(line_no, "row", "missing length prefix"));
    };
    let length: usize = parse_number(line_no, "row", length)?;
    let symbols: Vec<&str> = match dialect {
        Dialect::Paired => {
            if rest.len() % 2 != 0 {
                return Err(Error::format(
                    line_no,
                    "row",
                    "paired row has a symbol without its auxiliary field",
                ));
            }
            rest.iter().step_by(2).copied().collect()
        }
        _ => rest.to_vec(),
    };
    if symbols.len() != length {
        return Err(Error::format(
            line_no,
            "row",
            format!("declared length {length}, found {} symbols", symbols.len()),
        ));
    }
    symbols
        .iter()
        .map(|field| parse_number(line_no, "row", field))
        .collect()
}

/// Lazy stream of tokens decoded from a session file
///
/// Yields `Err` once on the first malformed row and then stops.
#[derive(Debug)]
pub struct Decoder<'a> {
    lines: Enumerate<Lines<'a>>,
    dialect: Dialect,
    header: Option<Header>,
    pending: std::vec::IntoIter<Token>,
    failed: bool,
}

impl Decoder<'_> {
    /// The parsed header, if the dialect has one
    pub fn header(&self) -> Option<Header> {
        self.header
    }

    fn next_row(&mut self) -> Option<Result<Session>> {
        let (index, line) = self.lines.next()?;
        Some(parse_row(index + 1, line, self.dialect))
    }
}

impl Iterator for Decoder<'_> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            if let Some(token) = self.pending.next() {
                return Some(Ok(token));
            }
            match self.next_row()? {
                Ok(session) => self.pending = row_tokens(&session).into_iter(),
                Err(error) => {
                    self.failed = true;
                    return Some(Err(error));
                }
            }
        }
    }
}

fn row_tokens(session: &[Symbol]) -> Vec<Token> {
    match session.split_last() {
        None => vec![Token::epsilon()],
        Some((last, body)) => body
            .iter()
            .map(|&symbol| Token::new(symbol, false))
            .chain(std::iter::once(Token::new(*last, true)))
            .collect(),
    }
}

/// Start decoding a session file
///
/// The header (if any) is parsed eagerly; rows are parsed on demand.
pub fn decode(text: &str, dialect: Dialect) -> Result<Decoder<'_>> {
    let mut lines = text.lines().enumerate();
    let header = if dialect.has_header() {
        match lines.next() {
            Some((index, line)) if !line.trim().is_empty() => Some(Header::parse(index + 1, line)?),
            _ => return Err(Error::format(1, "header", "empty header")),
        }
    } else {
        None
    };
    Ok(Decoder {
        lines,
        dialect,
        header,
        pending: Vec::new().into_iter(),
        failed: false,
    })
}

/// Decode a session file straight into sessions (empty sessions included)
pub fn decode_sessions(text: &str, dialect: Dialect) -> Result<Vec<Session>> {
    let mut sessions = Vec::new();
    let mut current = Vec::new();
    for token in decode(text, dialect)? {
        let token = token?;
        if let Some(symbol) = token.symbol {
            current.push(symbol);
        }
        if token.is_boundary {
            sessions.push(std::mem::take(&mut current));
        }
    }
    Ok(sessions)
}

/// Encode sessions with a header computed from them
///
/// The header holds the session count and the number of distinct symbols.
pub fn encode<S: AsRef<[Symbol]>>(sessions: &[S], dialect: Dialect) -> String {
    let alphabet: BTreeSet<Symbol> = sessions
        .iter()
        .flat_map(|session| session.as_ref().iter().copied())
        .collect();
    let header = Header {
        sessions: sessions.len(),
        alphabet_size: alphabet.len(),
    };
    encode_with_header(header, sessions, dialect)
}

/// Encode sessions under an explicit header
///
/// Every row, the header included, is terminated by a newline. The header is
/// skipped for [`Dialect::Bare`].
pub fn encode_with_header<S: AsRef<[Symbol]>>(
    header: Header,
    sessions: &[S],
    dialect: Dialect,
) -> String {
    let mut out = String::new();
    if dialect.has_header() {
        // Writing into a String cannot fail
        let _ = writeln!(out, "{} {}", header.sessions, header.alphabet_size);
    }
    for session in sessions {
        let session = session.as_ref();
        let mut fields: Vec<String> = Vec::with_capacity(session.len() * 2 + 1);
        if dialect.has_header() {
            fields.push(session.len().to_string());
        }
        for symbol in session {
            fields.push(symbol.to_string());
            if dialect == Dialect::Paired {
                fields.push("0".to_string());
            }
        }
        out.push_str(&fields.join(" "));
        out.push('\n');
    }
    out
}

/// Summary statistics of a session file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Session count declared in the header
    pub declared_sessions: Option<usize>,
    /// Alphabet size declared in the header
    pub declared_alphabet_size: Option<usize>,
    /// Number of rows actually present
    pub sessions: usize,
    /// Number of distinct symbols actually present
    pub alphabet_size: usize,
    /// Length of the shortest session
    pub min_length: usize,
    /// Length of the longest session
    pub max_length: usize,
    /// Mean session length
    pub average_length: f64,
    /// Total number of symbols
    pub total_length: usize,
}

impl SessionStats {
    /// Compute statistics for a session file
    pub fn from_text(text: &str, dialect: Dialect) -> Result<Self> {
        let header = decode(text, dialect)?.header();
        let sessions = decode_sessions(text, dialect)?;
        let lengths: Vec<usize> = sessions.iter().map(Vec::len).collect();
        let alphabet: BTreeSet<Symbol> = sessions.iter().flatten().copied().collect();
        let total_length: usize = lengths.iter().sum();
        let average_length = if lengths.is_empty() {
            0.0
        } else {
            total_length as f64 / lengths.len() as f64
        };

        Ok(Self {
            declared_sessions: header.map(|h| h.sessions),
            declared_alphabet_size: header.map(|h| h.alphabet_size),
            sessions: sessions.len(),
            alphabet_size: alphabet.len(),
            min_length: lengths.iter().copied().min().unwrap_or(0),
            max_length: lengths.iter().copied().max().unwrap_or(0),
            average_length,
            total_length,
        })
    }
}
