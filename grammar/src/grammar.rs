use std::fmt;
use std::ops::Range;
use log::debug;
use crate::{GrammarError, GrammarErrorKind, Map, Set, EPSILON, END_MARKER};
use crate::split::{disassemble, split_production};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NonterminalId(u32);

impl NonterminalId {
  pub fn new(id: u32) -> Self {
    Self(id)
  }

  pub fn id(self) -> u32 {
    self.0
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TerminalId(u32);

impl TerminalId {
  pub fn new(id: u32) -> Self {
    Self(id)
  }

  pub fn id(self) -> u32 {
    self.0
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
  Nonterminal(NonterminalId),
  Terminal(TerminalId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
  pub nt: NonterminalId,
  /// never empty; an epsilon production is the single epsilon terminal
  pub symbols: Vec<Symbol>,
}

/// An immutable context-free grammar.
///
/// Nonterminal and terminal indices follow declaration order. The epsilon
/// terminal is always present; the end-marker has the id one past the last
/// declared terminal and is not part of the terminal alphabet.
#[derive(Debug, Clone)]
pub struct Grammar {
  nts: Set<String>,
  terms: Set<String>,
  prods: Vec<Production>,
  nt_prods: Map<NonterminalId, Range<usize>>,
  start: NonterminalId,
  epsilon: TerminalId,
}

/// One piece of authored text, with its location in a grammar file.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Decl<'a> {
  pub text: &'a str,
  pub span: Option<(usize, usize)>,
}

#[derive(Debug, Default)]
pub(crate) struct Decls<'a> {
  pub nts: Vec<Decl<'a>>,
  pub terms: Vec<Decl<'a>>,
  pub prods: Vec<Decl<'a>>,
  pub start: Option<Decl<'a>>,
}

impl Grammar {
  /// Build a grammar from the four flat lists: nonterminals, terminals,
  /// `LHS->alt1|alt2` production strings and the start symbol.
  pub fn new<N, T, P>(
    nonterminals: &[N],
    terminals: &[T],
    productions: &[P],
    start: &str,
  ) -> Result<Self, GrammarError>
    where N: AsRef<str>,
          T: AsRef<str>,
          P: AsRef<str>,
  {
    assemble(Decls {
      nts: unspanned(nonterminals),
      terms: unspanned(terminals),
      prods: unspanned(productions),
      start: Some(Decl { text: start.trim(), span: None }),
    })
  }

  pub fn start(&self) -> NonterminalId {
    self.start
  }

  pub fn epsilon(&self) -> TerminalId {
    self.epsilon
  }

  pub fn end_marker(&self) -> TerminalId {
    TerminalId(self.terms.len() as u32)
  }

  pub fn nonterminals(&self) -> impl Iterator<Item = NonterminalId> {
    (0..self.nts.len() as u32).map(NonterminalId)
  }

  /// Declared terminals, epsilon included, end-marker excluded.
  pub fn terminals(&self) -> impl Iterator<Item = TerminalId> {
    (0..self.terms.len() as u32).map(TerminalId)
  }

  pub fn nonterminal_count(&self) -> usize {
    self.nts.len()
  }

  pub fn terminal_count(&self) -> usize {
    self.terms.len()
  }

  pub fn nonterminal(&self, name: &str) -> Option<NonterminalId> {
    self.nts.get_index_of(name).map(|i| NonterminalId(i as u32))
  }

  pub fn terminal(&self, name: &str) -> Option<TerminalId> {
    self.terms.get_index_of(name).map(|i| TerminalId(i as u32))
  }

  pub fn symbol(&self, name: &str) -> Option<Symbol> {
    self.nonterminal(name).map(Symbol::Nonterminal)
      .or_else(|| self.terminal(name).map(Symbol::Terminal))
  }

  pub fn nonterminal_name(&self, nt: NonterminalId) -> &str {
    &self.nts[nt.id() as usize]
  }

  pub fn terminal_name(&self, t: TerminalId) -> &str {
    if t == self.end_marker() {
      END_MARKER
    } else {
      &self.terms[t.id() as usize]
    }
  }

  pub fn symbol_name(&self, sym: Symbol) -> &str {
    match sym {
      Symbol::Nonterminal(nt) => self.nonterminal_name(nt),
      Symbol::Terminal(t) => self.terminal_name(t),
    }
  }

  pub fn is_epsilon(&self, sym: Symbol) -> bool {
    sym == Symbol::Terminal(self.epsilon)
  }

  pub fn prods(&self) -> &[Production] {
    &self.prods
  }

  pub fn prod_range(&self, nt: NonterminalId) -> Range<usize> {
    self.nt_prods[&nt].clone()
  }

  pub fn prods_of(&self, nt: NonterminalId) -> &[Production] {
    &self.prods[self.prod_range(nt)]
  }

  pub fn is_epsilon_prod(&self, prod_ix: usize) -> bool {
    let symbols = &self.prods[prod_ix].symbols;
    symbols.len() == 1 && self.is_epsilon(symbols[0])
  }

  pub fn symbols_to_string(&self, symbols: &[Symbol]) -> String {
    symbols.iter().map(|&sym| self.symbol_name(sym)).collect()
  }

  /// `E' -> +TE'`
  pub fn prod_to_string(&self, prod_ix: usize) -> String {
    let prod = &self.prods[prod_ix];
    format!("{} -> {}",
      self.nonterminal_name(prod.nt),
      self.symbols_to_string(&prod.symbols))
  }
}

impl fmt::Display for Grammar {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    for (nt, range) in &self.nt_prods {
      write!(f, "{} -> ", self.nonterminal_name(*nt))?;
      for (i, prod) in self.prods[range.clone()].iter().enumerate() {
        if i != 0 {
          write!(f, " | ")?;
        }
        write!(f, "{}", self.symbols_to_string(&prod.symbols))?;
      }
      writeln!(f)?;
    }
    Ok(())
  }
}

fn unspanned<S: AsRef<str>>(items: &[S]) -> Vec<Decl<'_>> {
  items.iter()
    .map(|s| Decl { text: s.as_ref().trim(), span: None })
    .collect()
}

fn error(kind: GrammarErrorKind, decl: &Decl) -> GrammarError {
  GrammarError::new(kind, decl.span)
}

fn check_symbol(decl: &Decl) -> Result<(), GrammarError> {
  if decl.text.is_empty() {
    Err(error(GrammarErrorKind::UnknownSymbol(String::new()), decl))
  } else if decl.text == END_MARKER {
    Err(error(GrammarErrorKind::ReservedSymbol(decl.text.to_owned()), decl))
  } else {
    Ok(())
  }
}

pub(crate) fn assemble(decls: Decls) -> Result<Grammar, GrammarError> {
  let mut nts = Set::default();
  for decl in &decls.nts {
    check_symbol(decl)?;
    if decl.text == EPSILON {
      return Err(error(GrammarErrorKind::AmbiguousSymbol(EPSILON.to_owned()), decl));
    }
    if !nts.insert(decl.text.to_owned()) {
      return Err(error(GrammarErrorKind::DuplicateSymbol(decl.text.to_owned()), decl));
    }
  }

  let mut terms = Set::default();
  for decl in &decls.terms {
    check_symbol(decl)?;
    if nts.contains(decl.text) {
      return Err(error(GrammarErrorKind::AmbiguousSymbol(decl.text.to_owned()), decl));
    }
    if !terms.insert(decl.text.to_owned()) {
      return Err(error(GrammarErrorKind::DuplicateSymbol(decl.text.to_owned()), decl));
    }
  }
  let (epsilon, _) = terms.insert_full(EPSILON.to_owned());
  let epsilon = TerminalId(epsilon as u32);

  let start_decl = decls.start
    .ok_or_else(|| GrammarError::new(GrammarErrorKind::MissingStart, None))?;
  let start = nts.get_index_of(start_decl.text)
    .map(|i| NonterminalId(i as u32))
    .ok_or_else(|| error(
      GrammarErrorKind::StartNotNonterminal(start_decl.text.to_owned()),
      &start_decl))?;

  let lookup = |name: &str| -> Option<Symbol> {
    nts.get_index_of(name)
      .map(|i| Symbol::Nonterminal(NonterminalId(i as u32)))
      .or_else(|| terms.get_index_of(name).map(|i| Symbol::Terminal(TerminalId(i as u32))))
  };

  let mut rhs_by_nt = Map::<NonterminalId, Vec<Vec<Symbol>>>::default();
  for decl in &decls.prods {
    let (lhs, alts) = split_production(decl.text)
      .map_err(|kind| error(kind, decl))?;

    let nt = match lookup(lhs) {
      Some(Symbol::Nonterminal(nt)) => nt,
      _ => return Err(error(GrammarErrorKind::NotNonterminal(lhs.to_owned()), decl)),
    };
    if rhs_by_nt.contains_key(&nt) {
      return Err(error(GrammarErrorKind::DuplicateProduction(lhs.to_owned()), decl));
    }

    let mut rhss = vec![];
    for alt in alts {
      let names = disassemble(alt);
      if names.is_empty() {
        return Err(error(GrammarErrorKind::EmptyAlternative(lhs.to_owned()), decl));
      }
      if names.len() > 1 && names.contains(&EPSILON) {
        return Err(error(GrammarErrorKind::EpsilonMixed(alt.to_owned()), decl));
      }

      let symbols = names.iter()
        .map(|&name| lookup(name).ok_or_else(|| {
          error(GrammarErrorKind::UnknownSymbol(name.to_owned()), decl)
        }))
        .collect::<Result<Vec<_>, _>>()?;
      rhss.push(symbols);
    }

    rhs_by_nt.insert(nt, rhss);
  }

  for (i, decl) in decls.nts.iter().enumerate() {
    if !rhs_by_nt.contains_key(&NonterminalId(i as u32)) {
      return Err(error(GrammarErrorKind::MissingProductions(decl.text.to_owned()), decl));
    }
  }

  let mut prods = vec![];
  let mut nt_prods = Map::default();
  for (nt, rhss) in rhs_by_nt {
    let start = prods.len();
    prods.extend(rhss.into_iter().map(|symbols| Production { nt, symbols }));
    nt_prods.insert(nt, start..prods.len());
  }

  debug!("grammar: {} nonterminals, {} terminals, {} productions, start {}",
    nts.len(), terms.len(), prods.len(), start_decl.text);

  Ok(Grammar {
    nts,
    terms,
    prods,
    nt_prods,
    start,
    epsilon,
  })
}
