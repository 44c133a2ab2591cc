//! SELECT sets and the LL(1) disjointness check.

use bit_set::BitSet;
use itertools::Itertools;
use grammar::{Grammar, NonterminalId, TerminalId};
use crate::ffn::Ffn;

/// SELECT set of every production, indexed by production index.
pub fn compute(grammar: &Grammar, ffn: &Ffn) -> Vec<BitSet> {
  let epsilon = grammar.epsilon().id() as usize;

  grammar.prods().iter().map(|prod| {
    let mut set = ffn.first_of_string(&prod.symbols);
    if set.remove(epsilon) {
      set.union_with(ffn.follow(prod.nt));
    }
    set
  }).collect()
}

/// Two alternatives of one nonterminal whose SELECT sets intersect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ll1Conflict {
  pub nt: NonterminalId,
  /// production indices, the earlier one first
  pub prods: (usize, usize),
  pub lookaheads: Vec<TerminalId>,
}

/// Every conflicting pair of alternatives, in production order.
pub fn conflicts<'a>(
  grammar: &'a Grammar,
  select: &'a [BitSet],
) -> impl Iterator<Item = Ll1Conflict> + 'a {
  grammar.nonterminals().flat_map(move |nt| {
    grammar.prod_range(nt)
      .tuple_combinations::<(usize, usize)>()
      .filter_map(move |(a, b)| {
        let lookaheads = select[a].intersection(&select[b])
          .map(|t| TerminalId::new(t as u32))
          .collect::<Vec<_>>();

        if lookaheads.is_empty() {
          None
        } else {
          Some(Ll1Conflict {
            nt,
            prods: (a, b),
            lookaheads,
          })
        }
      })
  })
}

/// The first conflict, if any. `None` means the grammar is LL(1).
pub fn find_conflict(grammar: &Grammar, select: &[BitSet]) -> Option<Ll1Conflict> {
  conflicts(grammar, select).next()
}
