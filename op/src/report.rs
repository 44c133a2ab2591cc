//! Plain-text rendering of an operator-precedence analysis.

use std::fmt::{self, Display};
use bit_set::BitSet;
use itertools::Itertools;
use grammar::{Grammar, TerminalId};
use crate::{OpAnalysis, PrecedenceMatrix};

/// FIRSTVT and LASTVT sets, the precedence matrix, then the verdict.
pub struct Report<'a, 'g>(pub &'a OpAnalysis<'g>);

/// The matrix as a grid, rows are the left terminal.
pub struct Matrix<'a>(pub &'a Grammar, pub &'a PrecedenceMatrix);

struct Set<'a>(&'a Grammar, &'a BitSet);

impl Display for Set<'_> {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    if self.1.is_empty() {
      return write!(f, "{{}}");
    }
    let names = self.1.iter()
      .map(|t| self.0.terminal_name(TerminalId::new(t as u32)))
      .join(", ");
    write!(f, "{{ {} }}", names)
  }
}

impl Display for Report<'_, '_> {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    let analysis = self.0;
    let grammar = analysis.grammar();

    if analysis.firstvt(grammar.start()).is_some() {
      writeln!(f, "FIRSTVT")?;
      for nt in grammar.nonterminals() {
        if let Some(set) = analysis.firstvt(nt) {
          writeln!(f, "  {}: {}", grammar.nonterminal_name(nt), Set(grammar, set))?;
        }
      }

      writeln!(f, "LASTVT")?;
      for nt in grammar.nonterminals() {
        if let Some(set) = analysis.lastvt(nt) {
          writeln!(f, "  {}: {}", grammar.nonterminal_name(nt), Set(grammar, set))?;
        }
      }
    }

    match analysis.matrix() {
      Some(matrix) => {
        writeln!(f, "MATRIX")?;
        write!(f, "{}", Matrix(grammar, matrix))?;
        writeln!(f, "operator precedence: yes")
      }
      None => writeln!(f, "operator precedence: no, {}", analysis.describe_verdict()),
    }
  }
}

impl Display for Matrix<'_> {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    let Matrix(grammar, matrix) = *self;
    let width = matrix.terminals()
      .map(|t| grammar.terminal_name(t).len())
      .max()
      .unwrap_or(1);

    let mut header = format!("  {:w$}", "", w = width);
    for t in matrix.terminals() {
      header.push_str(&format!(" {:>w$}", grammar.terminal_name(t), w = width));
    }
    writeln!(f, "{}", header.trim_end())?;

    for l in matrix.terminals() {
      let mut row = format!("  {:<w$}", grammar.terminal_name(l), w = width);
      for r in matrix.terminals() {
        let cell = matrix.get(l, r).map(|rel| rel.to_string()).unwrap_or_default();
        row.push_str(&format!(" {:>w$}", cell, w = width));
      }
      writeln!(f, "{}", row.trim_end())?;
    }

    Ok(())
  }
}
