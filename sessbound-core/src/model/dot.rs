//! Graphviz rendering

use super::ProbabilisticModel;
use crate::types::Symbol;
use std::fmt::Write;

impl ProbabilisticModel {
    /// Render the model as a Graphviz digraph
    ///
    /// Nodes are labelled with their id, initial and final probability.
    /// Edges carry the symbol, the transition probability and the emission
    /// probability; only positive transitions are drawn.
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph model {\n");
        for q in 0..self.num_states() {
            let shape = if self.final_probability(q) > 0.0 {
                "doublecircle"
            } else {
                "circle"
            };
            let _ = writeln!(
                out,
                "  {q} [shape={shape}, label=\"{q}\\n{:.2}\\n{:.2}\"];",
                self.initial(q),
                self.final_probability(q)
            );
        }
        for q in 0..self.num_states() {
            for a in 0..self.num_symbols() as Symbol {
                for (to, &t) in self.transition_row(a, q).iter().enumerate() {
                    if t > 0.0 {
                        let _ = writeln!(
                            out,
                            "  {q} -> {to} [label=\"{a} {t:.2} {:.2}\"];",
                            self.emission(q, a)
                        );
                    }
                }
            }
        }
        out.push_str("}\n");
        out
    }
}
