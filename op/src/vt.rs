//! compute FIRSTVT and LASTVT sets.
//!
//! Same pass structure as FIRST: recursive visits guarded by a per-pass
//! status, repeated until nothing grows, so unit-production cycles such as
//! `A -> B`, `B -> A` terminate.

use bit_set::BitSet;
use log::debug;
use grammar::{Grammar, NonterminalId, Symbol};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
  First,
  Last,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
  Unvisited,
  InProgress,
  Done,
}

pub(crate) fn compute(grammar: &Grammar, direction: Direction) -> Vec<BitSet> {
  let mut vt = vec![BitSet::new(); grammar.nonterminal_count()];
  let mut passes = 0;

  loop {
    passes += 1;
    let mut pass = VtPass {
      grammar,
      direction,
      vt: &mut vt,
      status: vec![Status::Unvisited; grammar.nonterminal_count()],
      changed: false,
    };

    for nt in grammar.nonterminals() {
      pass.visit(nt);
    }

    if !pass.changed {
      break;
    }
  }

  debug!("{:?}VT converged after {} passes", direction, passes);
  vt
}

struct VtPass<'a> {
  grammar: &'a Grammar,
  direction: Direction,
  vt: &'a mut Vec<BitSet>,
  status: Vec<Status>,
  changed: bool,
}

impl<'a> VtPass<'a> {
  fn visit(&mut self, nt: NonterminalId) {
    let ix = nt.id() as usize;
    if self.status[ix] != Status::Unvisited {
      return;
    }
    self.status[ix] = Status::InProgress;

    let grammar = self.grammar;
    let mut nt_vt = self.vt[ix].clone();

    for prod in grammar.prods_of(nt) {
      let symbols = &prod.symbols;
      // outermost symbol, then its neighbour
      let (outer, inner) = match self.direction {
        Direction::First => (symbols[0], symbols.get(1).copied()),
        Direction::Last => {
          let len = symbols.len();
          (symbols[len - 1], len.checked_sub(2).map(|i| symbols[i]))
        }
      };

      match (outer, inner) {
        (Symbol::Terminal(t), _) => {
          nt_vt.insert(t.id() as usize);
        }
        (Symbol::Nonterminal(other), None) => {
          self.visit(other);
          nt_vt.union_with(&self.vt[other.id() as usize]);
        }
        (Symbol::Nonterminal(_), Some(Symbol::Terminal(t))) => {
          nt_vt.insert(t.id() as usize);
        }
        // two adjacent nonterminals; rejected before we get here
        (Symbol::Nonterminal(_), Some(Symbol::Nonterminal(_))) => {}
      }
    }

    if nt_vt != self.vt[ix] {
      self.vt[ix] = nt_vt;
      self.changed = true;
    }
    self.status[ix] = Status::Done;
  }
}
