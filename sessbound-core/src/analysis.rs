//! Numeric helpers for comparing model outputs
//!
//! A solution file holds the number of probabilities on its first line and
//! one probability per following line, in session order.

use crate::error::{Error, Result};
use std::fmt::Write;

/// Stand-in for zero probabilities so logarithms stay finite
pub const MIN_PROBABILITY: f64 = 1e-200;

/// Render probabilities as a solution file
pub fn write_solution(probabilities: &[f64]) -> String {
    let mut out = String::new();
    let _ = write!(out, "{}", probabilities.len());
    for p in probabilities {
        let _ = write!(out, "\n{p:?}");
    }
    out.push('\n');
    out
}

/// Parse a solution file
///
/// The count on the first line is informational; a mismatch with the
/// number of values is logged, not rejected.
pub fn read_solution(text: &str) -> Result<Vec<f64>> {
    let mut lines = text.lines().enumerate();
    let declared: usize = match lines.next() {
        Some((_, header)) => header
            .trim()
            .parse()
            .map_err(|_| Error::format(1, "solution", format!("invalid count '{header}'")))?,
        None => return Err(Error::format(1, "solution", "empty solution file")),
    };

    let values = lines
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            line.trim().parse::<f64>().map_err(|_| {
                Error::format(index + 1, "solution", format!("invalid probability '{line}'"))
            })
        })
        .collect::<Result<Vec<_>>>()?;
    if values.len() != declared {
        log::warn!(
            "solution declares {declared} values but holds {}",
            values.len()
        );
    }
    Ok(values)
}

/// Replace non-positive values by `floor` and scale to sum to 1
pub fn normalize(probabilities: &[f64], floor: f64) -> Result<Vec<f64>> {
    if probabilities.is_empty() {
        return Err(Error::DivideByZero {
            metric: "normalization",
        });
    }
    let floored: Vec<f64> = probabilities
        .iter()
        .map(|&p| if p > 0.0 { p } else { floor })
        .collect();
    let total: f64 = floored.iter().sum();
    if total <= 0.0 || !total.is_finite() {
        return Err(Error::InvalidArgument(format!(
            "cannot normalise values summing to {total}"
        )));
    }
    Ok(floored.into_iter().map(|p| p / total).collect())
}

/// `2^(-Σ target_i · log2 candidate_i)` over two aligned distributions
pub fn perplexity(target: &[f64], candidate: &[f64]) -> Result<f64> {
    if target.len() != candidate.len() {
        return Err(Error::InvalidArgument(format!(
            "target has {} values but candidate has {}",
            target.len(),
            candidate.len()
        )));
    }
    if target.is_empty() {
        return Err(Error::DivideByZero {
            metric: "perplexity",
        });
    }
    let cross_entropy: f64 = target
        .iter()
        .zip(candidate)
        .map(|(t, c)| t * c.log2())
        .sum();
    Ok((-cross_entropy).exp2())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solution_file_layout() {
        assert_eq!(write_solution(&[0.5, 0.25]), "2\n0.5\n0.25\n");
        assert_eq!(write_solution(&[]), "0\n");
    }

    #[test]
    fn test_read_solution() {
        let values = read_solution("3\n0.5\n0.0\n1e-5\n").unwrap();
        assert_eq!(values, vec![0.5, 0.0, 1e-5]);
        let again = read_solution(&write_solution(&values)).unwrap();
        assert_eq!(again, values);
    }

    #[test]
    fn test_read_solution_errors() {
        assert!(read_solution("").is_err());
        assert!(matches!(
            read_solution("2\n0.5\nabc\n"),
            Err(Error::Format { line: 3, .. })
        ));
    }

    #[test]
    fn test_normalize_floors_zeros() {
        let normalized = normalize(&[0.0, 1.0, 3.0], MIN_PROBABILITY).unwrap();
        assert!((normalized[1] - 0.25).abs() < 1e-12);
        assert!((normalized[2] - 0.75).abs() < 1e-12);
        assert!(normalized[0] > 0.0);
        assert!(normalize(&[], MIN_PROBABILITY).is_err());
    }

    #[test]
    fn test_perplexity_of_uniform_distribution() {
        let uniform = vec![0.25; 4];
        let value = perplexity(&uniform, &uniform).unwrap();
        assert!((value - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_perplexity_errors() {
        assert!(matches!(
            perplexity(&[0.5, 0.5], &[1.0]),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            perplexity(&[], &[]),
            Err(Error::DivideByZero { .. })
        ));
    }
}
