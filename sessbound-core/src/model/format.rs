//! Sectioned text format for [`ProbabilisticModel`]
//!
//! ```text
//! I: (state)
//! 	(0) 1
//! F: (state)
//! 	(1) 1
//! S: (state,symbol)
//! 	(0,0) 1
//! T: (state,symbol,state)
//! 	(0,0,1) 1
//! ```
//!
//! Missing entries are 0. Sizes are inferred from the largest ids seen.

use super::{Dimensions, ProbabilisticModel, MAX_MODEL_CELLS};
use crate::error::{Error, Result};
use crate::types::Symbol;
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Initial,
    Final,
    Emission,
    Transition,
}

impl Section {
    fn from_tag(tag: char) -> Option<Self> {
        match tag {
            'I' => Some(Section::Initial),
            'F' => Some(Section::Final),
            'S' => Some(Section::Emission),
            'T' => Some(Section::Transition),
            _ => None,
        }
    }

    fn arity(self) -> usize {
        match self {
            Section::Initial | Section::Final => 1,
            Section::Emission => 2,
            Section::Transition => 3,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Section::Initial => "I",
            Section::Final => "F",
            Section::Emission => "S",
            Section::Transition => "T",
        }
    }
}

struct Entry {
    line: usize,
    section: Section,
    ids: [usize; 3],
    probability: f64,
}

fn parse_entry(line_no: usize, section: Section, line: &str) -> Result<Entry> {
    let fail = |reason: String| Error::format(line_no, section.name(), reason);

    let mut parts = line.split_whitespace();
    let (Some(key), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(fail(format!("expected '(ids) probability', found '{line}'")));
    };

    let inner = key
        .strip_prefix('(')
        .and_then(|k| k.strip_suffix(')'))
        .ok_or_else(|| fail(format!("malformed key '{key}'")))?;

    let mut ids = [0usize; 3];
    let mut arity = 0;
    for id in inner.split(',') {
        if arity == 3 {
            arity += 1;
            break;
        }
        ids[arity] = id
            .trim()
            .parse()
            .map_err(|_| fail(format!("invalid id '{}'", id.trim())))?;
        arity += 1;
    }
    if arity != section.arity() {
        return Err(fail(format!(
            "expected {} ids, found {}",
            section.arity(),
            inner.split(',').count()
        )));
    }

    let probability: f64 = value
        .parse()
        .map_err(|_| fail(format!("invalid probability '{value}'")))?;
    if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
        return Err(fail(format!("probability {value} outside [0, 1]")));
    }

    Ok(Entry {
        line: line_no,
        section,
        ids,
        probability,
    })
}

impl ProbabilisticModel {
    /// Parse a model from its sectioned text form
    pub fn load(text: &str) -> Result<Self> {
        let mut section = None;
        let mut entries = Vec::new();

        for (index, raw) in text.lines().enumerate() {
            let line_no = index + 1;
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            if line.starts_with('(') {
                let current = section.ok_or_else(|| {
                    Error::format(line_no, "model", "entry before any section header")
                })?;
                entries.push(parse_entry(line_no, current, line)?);
                continue;
            }
            let tag = line.chars().next().and_then(Section::from_tag);
            match tag {
                Some(next) => section = Some(next),
                None => {
                    return Err(Error::format(
                        line_no,
                        "model",
                        format!("unknown section '{line}'"),
                    ))
                }
            }
        }

        let mut dims = Dimensions::default();
        for entry in &entries {
            let [first, second, third] = entry.ids;
            let fits = match entry.section {
                Section::Initial | Section::Final => dims.cover(first, 0),
                Section::Emission => dims.cover(first, second.saturating_add(1)),
                Section::Transition => {
                    dims.cover(first.max(third), second.saturating_add(1))
                }
            };
            if !fits {
                return Err(Error::format(
                    entry.line,
                    entry.section.name(),
                    format!(
                        "{} states over {} symbols exceed {MAX_MODEL_CELLS} transition cells",
                        dims.states, dims.symbols
                    ),
                ));
            }
        }
        if dims.states == 0 {
            return Err(Error::format(
                text.lines().count(),
                "model",
                "model declares no states",
            ));
        }

        let mut model = ProbabilisticModel::new(dims.states, dims.symbols);
        for entry in entries {
            let [q, a, to] = entry.ids;
            match entry.section {
                Section::Initial => model.set_initial(q, entry.probability),
                Section::Final => model.set_final(q, entry.probability),
                Section::Emission => model.set_emission(q, a as Symbol, entry.probability),
                Section::Transition => {
                    model.set_transition(a as Symbol, q, to, entry.probability)
                }
            }
        }

        log::debug!(
            "loaded model with {} states over {} symbols",
            model.num_states(),
            model.num_symbols()
        );
        Ok(model)
    }

    /// Render the model in its sectioned text form
    ///
    /// Initial and final sections list positive entries only; emission and
    /// transition sections are dense so the alphabet size survives a reload.
    pub fn store(&self) -> String {
        let mut out = String::new();

        out.push_str("I: (state)\n");
        write_sparse(&mut out, self.initial_row());
        out.push_str("F: (state)\n");
        write_sparse(&mut out, self.final_row());

        out.push_str("S: (state,symbol)\n");
        for q in 0..self.num_states() {
            for (a, p) in self.emission_row(q).iter().enumerate() {
                let _ = writeln!(out, "\t({q},{a}) {p:?}");
            }
        }

        out.push_str("T: (state,symbol,state)\n");
        for q in 0..self.num_states() {
            for a in 0..self.num_symbols() as Symbol {
                for (to, p) in self.transition_row(a, q).iter().enumerate() {
                    let _ = writeln!(out, "\t({q},{a},{to}) {p:?}");
                }
            }
        }
        out
    }
}

fn write_sparse(out: &mut String, row: &[f64]) {
    for (q, p) in row.iter().enumerate().filter(|(_, &p)| p > 0.0) {
        let _ = writeln!(out, "\t({q}) {p:?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_STATES: &str = "\
I: (state)
\t(0) 1
F: (state)
\t(1) 1
S: (state,symbol)
\t(0,0) 1
T: (state,symbol,state)
\t(0,0,1) 1
";

    #[test]
    fn test_load_two_state_model() {
        let model = ProbabilisticModel::load(TWO_STATES).unwrap();
        assert_eq!(model.num_states(), 2);
        assert_eq!(model.num_symbols(), 1);
        assert_eq!(model.initial(0), 1.0);
        assert_eq!(model.final_probability(1), 1.0);
        assert_eq!(model.final_probability(0), 0.0);
        assert_eq!(model.transition(0, 0, 1), 1.0);
    }

    #[test]
    fn test_store_then_load_is_identity() {
        let mut model = ProbabilisticModel::new(2, 2);
        model.set_initial(0, 1.0);
        model.set_final(0, 0.25);
        model.set_final(1, 0.1);
        model.set_emission(0, 0, 0.3);
        model.set_emission(0, 1, 0.7);
        model.set_emission(1, 1, 1.0);
        model.set_transition(0, 0, 1, 1.0);
        model.set_transition(1, 0, 0, 1.0);
        model.set_transition(1, 1, 1, 1.0);

        let reloaded = ProbabilisticModel::load(&model.store()).unwrap();
        assert_eq!(reloaded, model);
    }

    #[test]
    fn test_store_layout() {
        let model = ProbabilisticModel::load(TWO_STATES).unwrap();
        let text = model.store();
        assert!(text.starts_with("I: (state)\n\t(0) 1.0\nF: (state)\n\t(1) 1.0\n"));
        assert!(text.contains("S: (state,symbol)\n\t(0,0) 1.0\n\t(1,0) 0.0\n"));
        assert!(text.contains("\t(1,0,1) 0.0\n"));
    }

    #[test]
    fn test_wrong_arity_is_rejected() {
        let text = "S: (state,symbol)\n\t(0,0,1) 0.5\n";
        let err = ProbabilisticModel::load(text).unwrap_err();
        match err {
            Error::Format { line, section, .. } => {
                assert_eq!(line, 2);
                assert_eq!(section, "S");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_probability_out_of_range_is_rejected() {
        let text = "I: (state)\n\t(0) 1.5\n";
        assert!(matches!(
            ProbabilisticModel::load(text),
            Err(Error::Format { line: 2, .. })
        ));
        let text = "I: (state)\n\t(0) NaN\n";
        assert!(ProbabilisticModel::load(text).is_err());
    }

    #[test]
    fn test_entry_without_section_is_rejected() {
        assert!(matches!(
            ProbabilisticModel::load("(0) 1\n"),
            Err(Error::Format { line: 1, .. })
        ));
    }

    #[test]
    fn test_oversized_ids_are_rejected() {
        let text = "T: (state,symbol,state)\n\t(0,0,4294967296) 1\n";
        match ProbabilisticModel::load(text).unwrap_err() {
            Error::Format { line, section, .. } => {
                assert_eq!(line, 2);
                assert_eq!(section, "T");
            }
            other => panic!("unexpected error: {other}"),
        }

        let text = format!("I: (state)\n\t({}) 1\n", usize::MAX);
        assert!(matches!(
            ProbabilisticModel::load(&text),
            Err(Error::Format { line: 2, .. })
        ));

        // a wide alphabet on one line and many states on another
        let text = "S: (state,symbol)\n\t(0,70000) 1\nI: (state)\n\t(100) 1\n";
        assert!(matches!(
            ProbabilisticModel::load(text),
            Err(Error::Format { line: 4, .. })
        ));
    }

    #[test]
    fn test_largest_allowed_model_loads() {
        let text = "T: (state,symbol,state)\n\t(0,0,4095) 1\n";
        let model = ProbabilisticModel::load(text).unwrap();
        assert_eq!(model.num_states(), 4096);
        assert_eq!(model.num_symbols(), 1);
    }

    #[test]
    fn test_empty_model_is_rejected() {
        assert!(ProbabilisticModel::load("I: (state)\n").is_err());
        assert!(ProbabilisticModel::load("").is_err());
    }

    #[test]
    fn test_blank_lines_and_spacing_are_tolerated() {
        let text = "I: (state)\n\n   (0)   1\nF: (state)\n( 0 ) 0.5\n";
        // "( 0 )" splits into three tokens and is malformed
        assert!(ProbabilisticModel::load(text).is_err());

        let text = "I: (state)\n\n   (0)   1\nF: (state)\n(0) 0.5\n";
        let model = ProbabilisticModel::load(text).unwrap();
        assert_eq!(model.final_probability(0), 0.5);
    }
}
