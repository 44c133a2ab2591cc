use bit_set::BitSet;
use itertools::Itertools;
use log::debug;
use thiserror::Error;
use grammar::{Grammar, NonterminalId, Symbol, TerminalId};

pub mod ffn;
pub mod select;
pub mod report;
mod parser;
mod table;

pub use ffn::Ffn;
pub use select::Ll1Conflict;
pub use parser::{PredictiveParser, ParseStep, ParseError, ParseErrorKind};
pub use table::ParsingTable;

/// A predictive parser was requested for a grammar that is not LL(1).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("grammar is not LL(1): {description}")]
pub struct IllegalGrammarError {
  pub conflict: Ll1Conflict,
  pub description: String,
}

/// FIRST, FOLLOW and SELECT sets of one grammar, computed once.
#[derive(Debug, Clone)]
pub struct Ll1Analysis<'g> {
  grammar: &'g Grammar,
  ffn: Ffn,
  select: Vec<BitSet>,
  conflict: Option<Ll1Conflict>,
}

impl<'g> Ll1Analysis<'g> {
  pub fn new(grammar: &'g Grammar) -> Self {
    let ffn = ffn::compute(grammar);
    let select = select::compute(grammar, &ffn);
    let conflict = select::find_conflict(grammar, &select);

    match &conflict {
      None => debug!("grammar is LL(1)"),
      Some(conflict) => debug!("grammar is not LL(1): {}", describe(grammar, conflict)),
    }

    Self {
      grammar,
      ffn,
      select,
      conflict,
    }
  }

  pub fn grammar(&self) -> &'g Grammar {
    self.grammar
  }

  pub fn ffn(&self) -> &Ffn {
    &self.ffn
  }

  pub fn first(&self, sym: Symbol) -> BitSet {
    self.ffn.first_of_symbol(sym)
  }

  pub fn follow(&self, nt: NonterminalId) -> &BitSet {
    self.ffn.follow(nt)
  }

  pub fn select(&self, prod_ix: usize) -> &BitSet {
    &self.select[prod_ix]
  }

  pub fn selects(&self) -> &[BitSet] {
    &self.select
  }

  pub fn is_ll1(&self) -> bool {
    self.conflict.is_none()
  }

  /// The first conflicting pair of alternatives found.
  pub fn conflict(&self) -> Option<&Ll1Conflict> {
    self.conflict.as_ref()
  }

  pub fn conflicts(&self) -> impl Iterator<Item = Ll1Conflict> + '_ {
    select::conflicts(self.grammar, &self.select)
  }

  pub fn parser(&self) -> Result<PredictiveParser<'g>, IllegalGrammarError> {
    PredictiveParser::new(self)
  }

  pub fn describe_conflict(&self, conflict: &Ll1Conflict) -> String {
    describe(self.grammar, conflict)
  }
}

/// Terminal names of a set, in id order.
pub fn set_names<'a>(grammar: &'a Grammar, set: &'a BitSet) -> impl Iterator<Item = &'a str> + 'a {
  set.iter().map(move |t| grammar.terminal_name(TerminalId::new(t as u32)))
}

fn describe(grammar: &Grammar, conflict: &Ll1Conflict) -> String {
  format!("`{}` and `{}` both select on {}",
    grammar.prod_to_string(conflict.prods.0),
    grammar.prod_to_string(conflict.prods.1),
    conflict.lookaheads.iter()
      .map(|&t| format!("`{}`", grammar.terminal_name(t)))
      .join(", "))
}
