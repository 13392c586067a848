//! Plain text output formatter

use super::OutputFormatter;
use anyhow::Result;
use serde_json::Value;
use std::io::Write;

/// Plain text formatter - outputs one `name: value` line per field
///
/// Nested objects are flattened with dotted names, e.g.
/// `table.true_positives: 3`.
pub struct TextFormatter<W: Write> {
    writer: W,
}

impl<W: Write> TextFormatter<W> {
    /// Create a new text formatter
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_value(&mut self, name: &str, value: &Value) -> Result<()> {
        match value {
            Value::Object(fields) => {
                for (key, field) in fields {
                    let nested = if name.is_empty() {
                        key.clone()
                    } else {
                        format!("{name}.{key}")
                    };
                    self.write_value(&nested, field)?;
                }
            }
            Value::Null => writeln!(self.writer, "{name}: -")?,
            Value::String(s) => writeln!(self.writer, "{name}: {s}")?,
            other if name.is_empty() => writeln!(self.writer, "{other}")?,
            other => writeln!(self.writer, "{name}: {other}")?,
        }
        Ok(())
    }
}

impl<W: Write + Send + Sync> OutputFormatter for TextFormatter<W> {
    fn format_report(&mut self, report: &Value) -> Result<()> {
        self.write_value("", report)
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(report: Value) -> String {
        let mut buffer = Vec::new();
        {
            let mut formatter = TextFormatter::new(&mut buffer);
            formatter.format_report(&report).unwrap();
            formatter.finish().unwrap();
        }
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_nested_fields_are_dotted() {
        let text = render(json!({
            "table": {"true_positives": 3},
            "f1_score": 0.75,
        }));
        assert!(text.contains("table.true_positives: 3\n"));
        assert!(text.contains("f1_score: 0.75\n"));
    }

    #[test]
    fn test_missing_values_print_a_dash() {
        let text = render(json!({"declared_sessions": null}));
        assert_eq!(text, "declared_sessions: -\n");
    }

    #[test]
    fn test_bare_scalar() {
        assert_eq!(render(json!(4.0)), "4.0\n");
    }
}
