//! Plain-text rendering of the LL(1) artifacts.

use std::fmt::{self, Display};
use bit_set::BitSet;
use itertools::Itertools;
use grammar::Grammar;
use crate::{set_names, Ll1Analysis, ParseStep, ParsingTable};

/// FIRST, FOLLOW and SELECT sets followed by the LL(1) verdict.
pub struct Report<'a, 'g>(pub &'a Ll1Analysis<'g>);

/// Non-empty cells of a parsing table, one per line.
pub struct Table<'a>(pub &'a Grammar, pub &'a ParsingTable);

/// A parse trace, one step per line.
pub struct Steps<'a>(pub &'a Grammar, pub &'a [ParseStep]);

struct Set<'a>(&'a Grammar, &'a BitSet);

impl Display for Set<'_> {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    if self.1.is_empty() {
      write!(f, "{{}}")
    } else {
      write!(f, "{{ {} }}", set_names(self.0, self.1).join(", "))
    }
  }
}

impl Display for Report<'_, '_> {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    let analysis = self.0;
    let grammar = analysis.grammar();

    writeln!(f, "FIRST")?;
    for nt in grammar.nonterminals() {
      writeln!(f, "  {}: {}",
        grammar.nonterminal_name(nt), Set(grammar, analysis.ffn().first(nt)))?;
    }

    writeln!(f, "FOLLOW")?;
    for nt in grammar.nonterminals() {
      writeln!(f, "  {}: {}",
        grammar.nonterminal_name(nt), Set(grammar, analysis.follow(nt)))?;
    }

    writeln!(f, "SELECT")?;
    for prod_ix in 0..grammar.prods().len() {
      writeln!(f, "  {}: {}",
        grammar.prod_to_string(prod_ix), Set(grammar, analysis.select(prod_ix)))?;
    }

    match analysis.conflict() {
      None => writeln!(f, "LL(1): yes"),
      Some(conflict) => {
        writeln!(f, "LL(1): no, {}", analysis.describe_conflict(conflict))
      }
    }
  }
}

impl Display for Table<'_> {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    let Table(grammar, table) = *self;

    for (nt, t, prod_ix) in table.iter() {
      writeln!(f, "[{}, {}] {}",
        grammar.nonterminal_name(nt),
        grammar.terminal_name(t),
        grammar.prod_to_string(prod_ix))?;
    }

    Ok(())
  }
}

impl Display for Steps<'_> {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    let Steps(grammar, steps) = *self;

    for step in steps {
      match *step {
        ParseStep::Expand { prod, .. } => writeln!(f, "expand {}", grammar.prod_to_string(prod))?,
        ParseStep::Match(t) => writeln!(f, "match  {}", grammar.terminal_name(t))?,
        ParseStep::Accept => writeln!(f, "accept")?,
      }
    }

    Ok(())
  }
}
