//! compute FIRST and FOLLOW sets.
//!
//! Both sets are computed by recursive descent over the nonterminals with a
//! per-pass visitation status. Re-entering a nonterminal that is still in
//! progress contributes only what that nonterminal has accumulated so far;
//! passes repeat until no set grows, which picks up whatever a cycle cut off.

use bit_set::BitSet;
use log::debug;
use grammar::{Grammar, NonterminalId, Symbol, TerminalId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
  Unvisited,
  InProgress,
  Done,
}

/// FIRST and FOLLOW sets, indexed by terminal id. FOLLOW sets may contain the
/// end-marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ffn {
  first: Vec<BitSet>,
  follow: Vec<BitSet>,
  epsilon: usize,
}

pub fn compute(grammar: &Grammar) -> Ffn {
  let first = compute_first(grammar);
  let follow = compute_follow(grammar, &first);

  Ffn {
    first,
    follow,
    epsilon: grammar.epsilon().id() as usize,
  }
}

impl Ffn {
  pub fn first(&self, nt: NonterminalId) -> &BitSet {
    &self.first[nt.id() as usize]
  }

  pub fn follow(&self, nt: NonterminalId) -> &BitSet {
    &self.follow[nt.id() as usize]
  }

  pub fn nullable(&self, nt: NonterminalId) -> bool {
    self.first(nt).contains(self.epsilon)
  }

  /// FIRST of a single symbol; a terminal's FIRST is the terminal itself.
  pub fn first_of_symbol(&self, sym: Symbol) -> BitSet {
    match sym {
      Symbol::Terminal(t) => singleton(t),
      Symbol::Nonterminal(nt) => self.first(nt).clone(),
    }
  }

  /// FIRST of a symbol string. Contains epsilon only if every symbol of the
  /// string can derive epsilon.
  pub fn first_of_string(&self, symbols: &[Symbol]) -> BitSet {
    let mut set = BitSet::new();

    for &sym in symbols {
      match sym {
        Symbol::Terminal(t) => {
          set.insert(t.id() as usize);
          return set;
        }
        Symbol::Nonterminal(nt) => {
          set.extend(self.first(nt).iter().filter(|&t| t != self.epsilon));
          if !self.nullable(nt) {
            return set;
          }
        }
      }
    }

    set.insert(self.epsilon);
    set
  }
}

fn singleton(t: TerminalId) -> BitSet {
  let mut set = BitSet::new();
  set.insert(t.id() as usize);
  set
}

fn compute_first(grammar: &Grammar) -> Vec<BitSet> {
  let mut first = vec![BitSet::new(); grammar.nonterminal_count()];
  let mut passes = 0;

  loop {
    passes += 1;
    let mut pass = FirstPass {
      grammar,
      first: &mut first,
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

  debug!("FIRST converged after {} passes", passes);
  first
}

struct FirstPass<'a> {
  grammar: &'a Grammar,
  first: &'a mut Vec<BitSet>,
  status: Vec<Status>,
  changed: bool,
}

impl<'a> FirstPass<'a> {
  fn visit(&mut self, nt: NonterminalId) {
    let ix = nt.id() as usize;
    if self.status[ix] != Status::Unvisited {
      return;
    }
    self.status[ix] = Status::InProgress;

    let grammar = self.grammar;
    let epsilon = grammar.epsilon().id() as usize;
    let mut nt_first = self.first[ix].clone();

    for prod in grammar.prods_of(nt) {
      for (i, &sym) in prod.symbols.iter().enumerate() {
        match sym {
          Symbol::Terminal(t) => {
            nt_first.insert(t.id() as usize);
            break;
          }
          Symbol::Nonterminal(inner) => {
            self.visit(inner);

            let inner_first = &self.first[inner.id() as usize];
            let last = i == prod.symbols.len() - 1;
            nt_first.extend(inner_first.iter().filter(|&t| last || t != epsilon));

            if !inner_first.contains(epsilon) {
              break;
            }
          }
        }
      }
    }

    if nt_first != self.first[ix] {
      self.first[ix] = nt_first;
      self.changed = true;
    }
    self.status[ix] = Status::Done;
  }
}

fn compute_follow(grammar: &Grammar, first: &[BitSet]) -> Vec<BitSet> {
  let mut follow = vec![BitSet::new(); grammar.nonterminal_count()];
  follow[grammar.start().id() as usize].insert(grammar.end_marker().id() as usize);
  let mut passes = 0;

  loop {
    passes += 1;
    let mut pass = FollowPass {
      grammar,
      first,
      follow: &mut follow,
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

  debug!("FOLLOW converged after {} passes", passes);
  follow
}

struct FollowPass<'a> {
  grammar: &'a Grammar,
  first: &'a [BitSet],
  follow: &'a mut Vec<BitSet>,
  status: Vec<Status>,
  changed: bool,
}

impl<'a> FollowPass<'a> {
  fn visit(&mut self, x: NonterminalId) {
    let ix = x.id() as usize;
    if self.status[ix] != Status::Unvisited {
      return;
    }
    self.status[ix] = Status::InProgress;

    let grammar = self.grammar;
    let epsilon = grammar.epsilon().id() as usize;
    let mut x_follow = self.follow[ix].clone();

    for prod in grammar.prods() {
      for (i, &sym) in prod.symbols.iter().enumerate() {
        if sym != Symbol::Nonterminal(x) {
          continue;
        }

        let mut reaches_end = true;
        for &next in &prod.symbols[i + 1..] {
          match next {
            Symbol::Terminal(t) => {
              x_follow.insert(t.id() as usize);
              reaches_end = false;
              break;
            }
            Symbol::Nonterminal(nt) => {
              let nt_first = &self.first[nt.id() as usize];
              x_follow.extend(nt_first.iter().filter(|&t| t != epsilon));
              if !nt_first.contains(epsilon) {
                reaches_end = false;
                break;
              }
            }
          }
        }

        // FOLLOW(x) ⊆ FOLLOW(x) adds nothing
        if reaches_end && prod.nt != x {
          self.visit(prod.nt);
          x_follow.union_with(&self.follow[prod.nt.id() as usize]);
        }
      }
    }

    if x_follow != self.follow[ix] {
      self.follow[ix] = x_follow;
      self.changed = true;
    }
    self.status[ix] = Status::Done;
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  fn names(grammar: &Grammar, set: &BitSet) -> Vec<String> {
    set.iter()
      .map(|t| grammar.terminal_name(TerminalId::new(t as u32)).to_owned())
      .collect()
  }

  fn first(grammar: &Grammar, ffn: &Ffn, nt: &str) -> Vec<String> {
    names(grammar, ffn.first(grammar.nonterminal(nt).unwrap()))
  }

  fn follow(grammar: &Grammar, ffn: &Ffn, nt: &str) -> Vec<String> {
    names(grammar, ffn.follow(grammar.nonterminal(nt).unwrap()))
  }

  #[test]
  fn ll_expr() {
    let grammar = grammar::build(r"
%nonterminals E E' T T' F
%terminals + NULL * ( ) i
%start E
E->TE'
E'->+TE'|NULL
T->FT'
T'->*FT'|NULL
F->(E)|i
    ").unwrap();
    let ffn = compute(&grammar);

    assert_eq!(first(&grammar, &ffn, "E"), vec!["(", "i"]);
    assert_eq!(first(&grammar, &ffn, "E'"), vec!["+", "NULL"]);
    assert_eq!(first(&grammar, &ffn, "T'"), vec!["NULL", "*"]);
    assert_eq!(follow(&grammar, &ffn, "E"), vec![")", "#"]);
    assert_eq!(follow(&grammar, &ffn, "E'"), vec![")", "#"]);
    assert_eq!(follow(&grammar, &ffn, "T"), vec!["+", ")", "#"]);
    assert_eq!(follow(&grammar, &ffn, "T'"), vec!["+", ")", "#"]);
    assert_eq!(follow(&grammar, &ffn, "F"), vec!["+", "*", ")", "#"]);
  }

  #[test]
  fn nullable_chain() {
    // X Y Z where every symbol but Z can vanish
    let grammar = grammar::build(r"
%nonterminals Z X Y
%terminals a c d
%start Z
Z->d|XYZ
Y->NULL|c
X->Y|a
    ").unwrap();
    let ffn = compute(&grammar);

    assert_eq!(first(&grammar, &ffn, "Z"), vec!["a", "c", "d"]);
    assert_eq!(first(&grammar, &ffn, "X"), vec!["a", "c", "NULL"]);
    assert_eq!(first(&grammar, &ffn, "Y"), vec!["c", "NULL"]);
    assert!(ffn.nullable(grammar.nonterminal("X").unwrap()));
    assert!(!ffn.nullable(grammar.nonterminal("Z").unwrap()));
    assert_eq!(follow(&grammar, &ffn, "X"), vec!["a", "c", "d"]);
    assert_eq!(follow(&grammar, &ffn, "Y"), vec!["a", "c", "d"]);
    assert_eq!(follow(&grammar, &ffn, "Z"), vec!["#"]);
  }

  #[test]
  fn left_recursion_terminates() {
    let grammar = grammar::build(r"
%nonterminals E T F
%terminals + * ( ) i
%start E
E->E+T|T
T->T*F|F
F->(E)|i
    ").unwrap();
    let ffn = compute(&grammar);

    assert_eq!(first(&grammar, &ffn, "E"), vec!["(", "i"]);
    assert_eq!(first(&grammar, &ffn, "T"), vec!["(", "i"]);
    assert_eq!(follow(&grammar, &ffn, "E"), vec!["+", ")", "#"]);
    assert_eq!(follow(&grammar, &ffn, "T"), vec!["+", "*", ")", "#"]);
    assert_eq!(follow(&grammar, &ffn, "F"), vec!["+", "*", ")", "#"]);
  }

  #[test]
  fn mutual_recursion_through_nullable_tails() {
    // A and B feed each other's FOLLOW sets through their rightmost positions
    let grammar = grammar::build(r"
%nonterminals S A B
%terminals a b x y
%start S
S->AxBy
A->aB|NULL
B->bA|NULL
    ").unwrap();
    let ffn = compute(&grammar);

    assert_eq!(follow(&grammar, &ffn, "A"), vec!["x", "y"]);
    assert_eq!(follow(&grammar, &ffn, "B"), vec!["x", "y"]);
  }

  #[test]
  fn direct_self_alternative() {
    let grammar = grammar::build(r"
%nonterminals S
%terminals a
%start S
S->S|a
    ").unwrap();
    let ffn = compute(&grammar);

    assert_eq!(first(&grammar, &ffn, "S"), vec!["a"]);
    assert_eq!(follow(&grammar, &ffn, "S"), vec!["#"]);
  }

  #[test]
  fn string_first() {
    let grammar = grammar::build(r"
%nonterminals S A
%terminals a b
%start S
S->Ab
A->a|NULL
    ").unwrap();
    let ffn = compute(&grammar);
    let a = Symbol::Nonterminal(grammar.nonterminal("A").unwrap());
    let b = Symbol::Terminal(grammar.terminal("b").unwrap());

    assert_eq!(names(&grammar, &ffn.first_of_string(&[a, b])), vec!["a", "b"]);
    assert_eq!(names(&grammar, &ffn.first_of_string(&[a])), vec!["a", "NULL"]);
    assert_eq!(names(&grammar, &ffn.first_of_symbol(b)), vec!["b"]);
  }

  #[test]
  fn recomputation_is_identical() {
    let grammar = grammar::build(r"
%nonterminals C B E S D
%terminals i t e NULL a b + *
%start C
C->iEtSB
B->NULL|eS
E->a|b
S->aD
D->+b|*b
    ").unwrap();

    assert_eq!(compute(&grammar), compute(&grammar));
  }
}
