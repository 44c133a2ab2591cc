use grammar::{Grammar, Symbol, END_MARKER};

/// Terminal string of a leftmost derivation from the start symbol.
///
/// Alternatives are picked by cycling through `choices`; once `budget`
/// expansions have been made, the alternative with the fewest nonterminals is
/// always taken so the derivation ends. The end-marker is appended.
pub fn leftmost(grammar: &Grammar, choices: &[usize], budget: usize) -> Vec<String> {
  let mut sentential = vec![Symbol::Nonterminal(grammar.start())];
  let mut expansions = 0;

  while let Some(pos) = sentential.iter().position(|sym| matches!(sym, Symbol::Nonterminal(_))) {
    let nt = match sentential[pos] {
      Symbol::Nonterminal(nt) => nt,
      Symbol::Terminal(_) => unreachable!(),
    };
    let range = grammar.prod_range(nt);

    let prod_ix = if expansions < budget {
      range.start + choices[expansions % choices.len()] % range.len()
    } else {
      range.min_by_key(|&ix| {
        grammar.prods()[ix].symbols.iter()
          .filter(|sym| matches!(sym, Symbol::Nonterminal(_)))
          .count()
      }).unwrap()
    };
    expansions += 1;

    let rhs = if grammar.is_epsilon_prod(prod_ix) {
      vec![]
    } else {
      grammar.prods()[prod_ix].symbols.clone()
    };
    sentential.splice(pos..pos + 1, rhs);
  }

  let mut input = sentential.into_iter()
    .map(|sym| grammar.symbol_name(sym).to_owned())
    .collect::<Vec<_>>();
  input.push(END_MARKER.to_owned());
  input
}
