//! Pool files: one boundary candidate position per line

use crate::error::CliError;
use anyhow::Result;
use std::collections::BTreeSet;
use std::fmt::Write as _;

/// Parse a pool file; blank lines are ignored
pub fn parse_pool(text: &str) -> Result<BTreeSet<usize>> {
    let mut pool = BTreeSet::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let position = line.parse::<usize>().map_err(|_| CliError::InvalidPool {
            line: index + 1,
            content: line.to_string(),
        })?;
        pool.insert(position);
    }
    Ok(pool)
}

/// Render a pool in ascending order
pub fn format_pool(pool: &BTreeSet<usize>) -> String {
    let mut out = String::new();
    for position in pool {
        let _ = writeln!(out, "{position}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_blank_lines() {
        let pool = parse_pool("4\n\n1\n  7 \n").unwrap();
        assert_eq!(pool.into_iter().collect::<Vec<_>>(), vec![1, 4, 7]);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let error = parse_pool("1\n-2\n").unwrap_err();
        match error.downcast_ref::<CliError>() {
            Some(CliError::InvalidPool { line, content }) => {
                assert_eq!(*line, 2);
                assert_eq!(content, "-2");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_format_is_sorted() {
        let pool: BTreeSet<usize> = [9, 2, 5].into_iter().collect();
        assert_eq!(format_pool(&pool), "2\n5\n9\n");
        assert_eq!(format_pool(&BTreeSet::new()), "");
    }
}
