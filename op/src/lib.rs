use bit_set::BitSet;
use log::debug;
use grammar::{Grammar, NonterminalId, Symbol};

mod vt;
mod matrix;
pub mod report;

pub use matrix::{PrecedenceMatrix, PrecConflict, Relation};

/// Outcome of the operator-precedence analysis. Only `OperatorPrecedence`
/// comes with a matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpVerdict {
  OperatorPrecedence,
  /// `prods()[prod]` has nonterminals at `pos` and `pos + 1`
  AdjacentNonterminals { prod: usize, pos: usize },
  EpsilonProduction { prod: usize },
  Conflict(PrecConflict),
}

#[derive(Debug, Clone)]
pub struct OpAnalysis<'g> {
  grammar: &'g Grammar,
  /// FIRSTVT, LASTVT; absent when the grammar fails the shape checks
  vt: Option<(Vec<BitSet>, Vec<BitSet>)>,
  matrix: Option<PrecedenceMatrix>,
  verdict: OpVerdict,
}

impl<'g> OpAnalysis<'g> {
  pub fn new(grammar: &'g Grammar) -> Self {
    if let Some(verdict) = check_shape(grammar) {
      debug!("not an operator-precedence grammar: {:?}", verdict);
      return Self {
        grammar,
        vt: None,
        matrix: None,
        verdict,
      };
    }

    let firstvt = vt::compute(grammar, vt::Direction::First);
    let lastvt = vt::compute(grammar, vt::Direction::Last);

    let (matrix, verdict) = match matrix::build(grammar, &firstvt, &lastvt) {
      Ok(matrix) => {
        debug!("operator-precedence grammar, {} relations", matrix.len());
        (Some(matrix), OpVerdict::OperatorPrecedence)
      }
      Err(conflict) => {
        debug!("precedence conflict: {:?}", conflict);
        (None, OpVerdict::Conflict(conflict))
      }
    };

    Self {
      grammar,
      vt: Some((firstvt, lastvt)),
      matrix,
      verdict,
    }
  }

  pub fn grammar(&self) -> &'g Grammar {
    self.grammar
  }

  pub fn verdict(&self) -> &OpVerdict {
    &self.verdict
  }

  pub fn is_operator_precedence(&self) -> bool {
    self.verdict == OpVerdict::OperatorPrecedence
  }

  /// No alternative has two adjacent nonterminals.
  pub fn is_operator_grammar(&self) -> bool {
    match self.verdict {
      OpVerdict::AdjacentNonterminals { .. } => false,
      _ => true,
    }
  }

  pub fn firstvt(&self, nt: NonterminalId) -> Option<&BitSet> {
    self.vt.as_ref().map(|(first, _)| &first[nt.id() as usize])
  }

  pub fn lastvt(&self, nt: NonterminalId) -> Option<&BitSet> {
    self.vt.as_ref().map(|(_, last)| &last[nt.id() as usize])
  }

  pub fn matrix(&self) -> Option<&PrecedenceMatrix> {
    self.matrix.as_ref()
  }

  pub fn describe_verdict(&self) -> String {
    let grammar = self.grammar;
    match &self.verdict {
      OpVerdict::OperatorPrecedence => "operator-precedence grammar".to_owned(),
      OpVerdict::AdjacentNonterminals { prod, pos } => {
        let symbols = &grammar.prods()[*prod].symbols;
        format!("`{}` has adjacent nonterminals `{}{}`",
          grammar.prod_to_string(*prod),
          grammar.symbol_name(symbols[*pos]),
          grammar.symbol_name(symbols[*pos + 1]))
      }
      OpVerdict::EpsilonProduction { prod } => {
        format!("`{}` is an epsilon production", grammar.prod_to_string(*prod))
      }
      OpVerdict::Conflict(conflict) => {
        format!("`{}` and `{}` are both {} and {}, asserted by `{}`",
          grammar.terminal_name(conflict.left),
          grammar.terminal_name(conflict.right),
          conflict.existing,
          conflict.asserted,
          grammar.prod_to_string(conflict.prod))
      }
    }
  }
}

/// First violation of the operator-grammar shape, then of the no-epsilon
/// rule, in production order.
fn check_shape(grammar: &Grammar) -> Option<OpVerdict> {
  let is_nt = |sym: &Symbol| match sym {
    Symbol::Nonterminal(_) => true,
    Symbol::Terminal(_) => false,
  };

  let adjacent = grammar.prods().iter().enumerate().find_map(|(prod, p)| {
    p.symbols.windows(2)
      .position(|pair| is_nt(&pair[0]) && is_nt(&pair[1]))
      .map(|pos| OpVerdict::AdjacentNonterminals { prod, pos })
  });

  adjacent.or_else(|| {
    (0..grammar.prods().len())
      .find(|&prod| grammar.is_epsilon_prod(prod))
      .map(|prod| OpVerdict::EpsilonProduction { prod })
  })
}
