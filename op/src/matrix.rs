//! Terminal-pair precedence relations.

use std::fmt;
use bit_set::BitSet;
use log::trace;
use grammar::{Grammar, Symbol, TerminalId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
  Less,
  Equal,
  Greater,
}

impl fmt::Display for Relation {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    let s = match self {
      Relation::Less => "<",
      Relation::Equal => "=",
      Relation::Greater => ">",
    };
    f.write_str(s)
  }
}

/// A cell asserted with two different relations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrecConflict {
  pub left: TerminalId,
  pub right: TerminalId,
  /// relation already in the cell
  pub existing: Relation,
  pub asserted: Relation,
  /// production whose occurrence asserted the second relation
  pub prod: usize,
}

/// Square matrix over the terminals of a grammar, epsilon and the
/// end-marker excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrecedenceMatrix {
  size: usize,
  epsilon: TerminalId,
  cells: Vec<Option<Relation>>,
}

impl PrecedenceMatrix {
  fn new(grammar: &Grammar) -> Self {
    let size = grammar.terminal_count();
    Self {
      size,
      epsilon: grammar.epsilon(),
      cells: vec![None; size * size],
    }
  }

  fn index(&self, left: TerminalId, right: TerminalId) -> Option<usize> {
    let (l, r) = (left.id() as usize, right.id() as usize);
    if l >= self.size || r >= self.size || left == self.epsilon || right == self.epsilon {
      None
    } else {
      Some(l * self.size + r)
    }
  }

  /// Relation of `left` followed by `right`. `None` for an empty cell or a
  /// terminal outside the matrix.
  pub fn get(&self, left: TerminalId, right: TerminalId) -> Option<Relation> {
    self.index(left, right).and_then(|ix| self.cells[ix])
  }

  /// Terminals indexing the rows and columns, in id order.
  pub fn terminals(&self) -> impl Iterator<Item = TerminalId> + '_ {
    (0..self.size as u32)
      .map(TerminalId::new)
      .filter(move |&t| t != self.epsilon)
  }

  /// Populated cells, row by row.
  pub fn iter(&self) -> impl Iterator<Item = (TerminalId, TerminalId, Relation)> + '_ {
    self.terminals().flat_map(move |l| {
      self.terminals().filter_map(move |r| self.get(l, r).map(|rel| (l, r, rel)))
    })
  }

  pub fn len(&self) -> usize {
    self.cells.iter().filter(|c| c.is_some()).count()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

/// Fill the matrix from every terminal occurrence of every production.
/// The grammar must satisfy the operator-grammar shape and have no epsilon
/// productions.
pub(crate) fn build(
  grammar: &Grammar,
  firstvt: &[BitSet],
  lastvt: &[BitSet],
) -> Result<PrecedenceMatrix, PrecConflict> {
  let mut builder = Builder {
    matrix: PrecedenceMatrix::new(grammar),
    prod: 0,
  };

  for (prod_ix, prod) in grammar.prods().iter().enumerate() {
    builder.prod = prod_ix;
    let symbols = &prod.symbols;

    for (i, &sym) in symbols.iter().enumerate() {
      let t = match sym {
        Symbol::Terminal(t) => t,
        Symbol::Nonterminal(_) => continue,
      };

      if let Some(&Symbol::Nonterminal(prev)) = i.checked_sub(1).map(|i| &symbols[i]) {
        for a in lastvt[prev.id() as usize].iter() {
          builder.assert(TerminalId::new(a as u32), t, Relation::Greater)?;
        }
      }

      match symbols.get(i + 1) {
        Some(&Symbol::Nonterminal(next)) => {
          for b in firstvt[next.id() as usize].iter() {
            builder.assert(t, TerminalId::new(b as u32), Relation::Less)?;
          }
          if let Some(&Symbol::Terminal(b)) = symbols.get(i + 2) {
            builder.assert(t, b, Relation::Equal)?;
          }
        }
        Some(&Symbol::Terminal(b)) => {
          builder.assert(t, b, Relation::Equal)?;
        }
        None => {}
      }
    }
  }

  Ok(builder.matrix)
}

struct Builder {
  matrix: PrecedenceMatrix,
  prod: usize,
}

impl Builder {
  fn assert(&mut self, left: TerminalId, right: TerminalId, rel: Relation) -> Result<(), PrecConflict> {
    let ix = match self.matrix.index(left, right) {
      Some(ix) => ix,
      None => return Ok(()),
    };

    match self.matrix.cells[ix] {
      None => {
        trace!("[{}, {}] {}", left.id(), right.id(), rel);
        self.matrix.cells[ix] = Some(rel);
        Ok(())
      }
      Some(existing) if existing == rel => Ok(()),
      Some(existing) => Err(PrecConflict {
        left,
        right,
        existing,
        asserted: rel,
        prod: self.prod,
      }),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::vt::{self, Direction};
  use pretty_assertions::assert_eq;

  fn prepare(input: &str) -> (Grammar, Result<PrecedenceMatrix, PrecConflict>) {
    let grammar = grammar::build(input).unwrap();
    let firstvt = vt::compute(&grammar, Direction::First);
    let lastvt = vt::compute(&grammar, Direction::Last);
    let matrix = build(&grammar, &firstvt, &lastvt);
    (grammar, matrix)
  }

  fn rel(grammar: &Grammar, matrix: &PrecedenceMatrix, l: &str, r: &str) -> Option<Relation> {
    matrix.get(grammar.terminal(l).unwrap(), grammar.terminal(r).unwrap())
  }

  #[test]
  fn arithmetic() {
    let (grammar, matrix) = prepare(r"
%nonterminals E T F
%terminals + * ( ) i
%start E
E->E+T|T
T->T*F|F
F->(E)|i
    ");
    let matrix = matrix.unwrap();

    assert_eq!(rel(&grammar, &matrix, "+", "+"), Some(Relation::Greater));
    assert_eq!(rel(&grammar, &matrix, "+", "*"), Some(Relation::Less));
    assert_eq!(rel(&grammar, &matrix, "*", "+"), Some(Relation::Greater));
    assert_eq!(rel(&grammar, &matrix, "*", "*"), Some(Relation::Greater));
    assert_eq!(rel(&grammar, &matrix, "(", ")"), Some(Relation::Equal));
    assert_eq!(rel(&grammar, &matrix, "(", "i"), Some(Relation::Less));
    assert_eq!(rel(&grammar, &matrix, "i", ")"), Some(Relation::Greater));
    assert_eq!(rel(&grammar, &matrix, "i", "i"), None);
    assert_eq!(rel(&grammar, &matrix, ")", "("), None);
  }

  #[test]
  fn adjacent_terminals_are_equal() {
    let (grammar, matrix) = prepare(r"
%nonterminals S
%terminals a b c
%start S
S->abc
    ");
    let matrix = matrix.unwrap();

    assert_eq!(matrix.iter().map(|(l, r, rel)| {
      format!("{}{}{}", grammar.terminal_name(l), rel, grammar.terminal_name(r))
    }).collect::<Vec<_>>(), vec!["a=b", "b=c"]);
  }

  #[test]
  fn ambiguous_operator() {
    let (grammar, matrix) = prepare(r"
%nonterminals E
%terminals + i
%start E
E->E+E|i
    ");
    let plus = grammar.terminal("+").unwrap();

    assert_eq!(matrix, Err(PrecConflict {
      left: plus,
      right: plus,
      existing: Relation::Greater,
      asserted: Relation::Less,
      prod: 0,
    }));
  }

  #[test]
  fn epsilon_is_not_indexed() {
    let (grammar, matrix) = prepare(r"
%nonterminals S
%terminals a
%start S
S->a
    ");
    let matrix = matrix.unwrap();

    assert_eq!(matrix.terminals().collect::<Vec<_>>(), vec![grammar.terminal("a").unwrap()]);
    assert_eq!(matrix.get(grammar.epsilon(), grammar.epsilon()), None);
    assert!(matrix.is_empty());
  }
}
