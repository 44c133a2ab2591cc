use bit_set::BitSet;
use grammar::{Grammar, Map, NonterminalId, TerminalId};

/// LL(1) parsing table: (nonterminal, lookahead) -> production index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsingTable {
  entries: Map<(NonterminalId, TerminalId), usize>,
}

impl ParsingTable {
  /// The grammar must already be known to be LL(1); with disjoint SELECT
  /// sets no two productions can claim the same cell.
  pub(crate) fn build(grammar: &Grammar, select: &[BitSet]) -> Self {
    let mut entries = Map::default();

    for (prod_ix, prod) in grammar.prods().iter().enumerate() {
      for t in select[prod_ix].iter() {
        let old = entries.insert((prod.nt, TerminalId::new(t as u32)), prod_ix);
        debug_assert!(old.is_none());
      }
    }

    Self { entries }
  }

  pub fn get(&self, nt: NonterminalId, lookahead: TerminalId) -> Option<usize> {
    self.entries.get(&(nt, lookahead)).copied()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Entries in production order.
  pub fn iter(&self) -> impl Iterator<Item = (NonterminalId, TerminalId, usize)> + '_ {
    self.entries.iter().map(|(&(nt, t), &prod_ix)| (nt, t, prod_ix))
  }
}
