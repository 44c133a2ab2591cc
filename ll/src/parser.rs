//! Stack-driven predictive parser over an LL(1) table.

use log::trace;
use thiserror::Error;
use grammar::{Grammar, NonterminalId, Symbol, TerminalId, END_MARKER};
use crate::{IllegalGrammarError, Ll1Analysis};
use crate::table::ParsingTable;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at input position {position}")]
pub struct ParseError {
  pub kind: ParseErrorKind,
  /// index of the offending input symbol
  pub position: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
  #[error("expected `{expected}`, found `{found}`")]
  Mismatch { expected: String, found: String },
  #[error("no production for `{nonterminal}` on `{lookahead}`")]
  NoProduction { nonterminal: String, lookahead: String },
  #[error("`{0}` is not a terminal of the grammar")]
  UnknownSymbol(String),
  #[error("input ended before the end-marker")]
  UnexpectedEnd,
  #[error("unexpected `{0}` after the end-marker")]
  TrailingInput(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStep {
  /// the nonterminal on top of the stack was replaced by a production
  Expand { nt: NonterminalId, prod: usize },
  /// the terminal on top of the stack matched the current input symbol
  Match(TerminalId),
  Accept,
}

#[derive(Debug, Clone)]
pub struct PredictiveParser<'g> {
  grammar: &'g Grammar,
  table: ParsingTable,
}

impl<'g> PredictiveParser<'g> {
  pub fn new(analysis: &Ll1Analysis<'g>) -> Result<Self, IllegalGrammarError> {
    if let Some(conflict) = analysis.conflict() {
      return Err(IllegalGrammarError {
        conflict: conflict.clone(),
        description: analysis.describe_conflict(conflict),
      });
    }

    let grammar = analysis.grammar();
    let table = ParsingTable::build(grammar, analysis.selects());

    Ok(Self { grammar, table })
  }

  pub fn grammar(&self) -> &'g Grammar {
    self.grammar
  }

  pub fn table(&self) -> &ParsingTable {
    &self.table
  }

  /// Parse a symbol stream terminated by the end-marker `#`, returning the
  /// steps taken. Fails on the first error.
  pub fn parse<I>(&self, input: I) -> Result<Vec<ParseStep>, ParseError>
    where I: IntoIterator,
          I::Item: AsRef<str>,
  {
    let grammar = self.grammar;
    let end = grammar.end_marker();
    let mut input = Input {
      parser: self,
      symbols: input.into_iter(),
      position: 0,
    };

    let mut stack = vec![Symbol::Terminal(end), Symbol::Nonterminal(grammar.start())];
    let mut steps = vec![];
    let mut c = input.advance()?;

    while let Some(&x) = stack.last() {
      match x {
        Symbol::Terminal(t) => {
          if t != c {
            return Err(input.error(ParseErrorKind::Mismatch {
              expected: grammar.terminal_name(t).to_owned(),
              found: grammar.terminal_name(c).to_owned(),
            }));
          }

          if t == end {
            input.finish()?;
            trace!("accept");
            steps.push(ParseStep::Accept);
            return Ok(steps);
          }

          trace!("match {}", grammar.terminal_name(t));
          stack.pop();
          steps.push(ParseStep::Match(t));
          c = input.advance()?;
        }
        Symbol::Nonterminal(nt) => {
          let prod_ix = self.table.get(nt, c).ok_or_else(|| {
            input.error(ParseErrorKind::NoProduction {
              nonterminal: grammar.nonterminal_name(nt).to_owned(),
              lookahead: grammar.terminal_name(c).to_owned(),
            })
          })?;

          trace!("expand {}", grammar.prod_to_string(prod_ix));
          stack.pop();
          if !grammar.is_epsilon_prod(prod_ix) {
            stack.extend(grammar.prods()[prod_ix].symbols.iter().rev());
          }
          steps.push(ParseStep::Expand { nt, prod: prod_ix });
        }
      }
    }

    unreachable!("the end-marker is only popped on accept")
  }

  fn lookahead(&self, name: &str) -> Option<TerminalId> {
    if name == END_MARKER {
      Some(self.grammar.end_marker())
    } else {
      self.grammar.terminal(name).filter(|&t| t != self.grammar.epsilon())
    }
  }
}

struct Input<'p, 'g, I> {
  parser: &'p PredictiveParser<'g>,
  symbols: I,
  position: usize,
}

impl<'p, 'g, I> Input<'p, 'g, I>
  where I: Iterator,
        I::Item: AsRef<str>,
{
  /// Position of the symbol most recently returned by `advance`.
  fn error(&self, kind: ParseErrorKind) -> ParseError {
    ParseError {
      kind,
      position: self.position.saturating_sub(1),
    }
  }

  fn advance(&mut self) -> Result<TerminalId, ParseError> {
    let position = self.position;
    let symbol = self.symbols.next()
      .ok_or(ParseError { kind: ParseErrorKind::UnexpectedEnd, position })?;
    self.position += 1;

    let name = symbol.as_ref();
    self.parser.lookahead(name)
      .ok_or_else(|| self.error(ParseErrorKind::UnknownSymbol(name.to_owned())))
  }

  fn finish(&mut self) -> Result<(), ParseError> {
    match self.symbols.next() {
      Some(symbol) => Err(ParseError {
        kind: ParseErrorKind::TrailingInput(symbol.as_ref().to_owned()),
        position: self.position,
      }),
      None => Ok(()),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  static EXPR: &str = r"
%nonterminals E E' T T' F
%terminals + NULL * ( ) i
%start E
E->TE'
E'->+TE'|NULL
T->FT'
T'->*FT'|NULL
F->(E)|i
  ";

  fn parse(grammar: &Grammar, input: &str) -> Result<Vec<ParseStep>, ParseError> {
    let analysis = Ll1Analysis::new(grammar);
    let parser = analysis.parser().unwrap();
    parser.parse(input.split_whitespace())
  }

  #[test]
  fn steps() {
    let grammar = grammar::build(EXPR).unwrap();
    let steps = parse(&grammar, "i #").unwrap();
    let e = grammar.nonterminal("E").unwrap();
    let i = grammar.terminal("i").unwrap();

    assert_eq!(steps.len(), 7);
    assert_eq!(steps[0], ParseStep::Expand { nt: e, prod: 0 });
    assert_eq!(steps[3], ParseStep::Match(i));
    assert_eq!(steps[6], ParseStep::Accept);
  }

  #[test]
  fn missing_end_marker() {
    let grammar = grammar::build(EXPR).unwrap();
    assert_eq!(parse(&grammar, "i + i"), Err(ParseError {
      kind: ParseErrorKind::UnexpectedEnd,
      position: 3,
    }));
    assert_eq!(parse(&grammar, ""), Err(ParseError {
      kind: ParseErrorKind::UnexpectedEnd,
      position: 0,
    }));
  }

  #[test]
  fn no_production() {
    let grammar = grammar::build(EXPR).unwrap();
    assert_eq!(parse(&grammar, "i + + #"), Err(ParseError {
      kind: ParseErrorKind::NoProduction {
        nonterminal: "T".to_owned(),
        lookahead: "+".to_owned(),
      },
      position: 2,
    }));
  }

  #[test]
  fn mismatch() {
    let grammar = grammar::build(EXPR).unwrap();
    assert_eq!(parse(&grammar, "( i #"), Err(ParseError {
      kind: ParseErrorKind::Mismatch {
        expected: ")".to_owned(),
        found: "#".to_owned(),
      },
      position: 2,
    }));
  }

  #[test]
  fn unknown_symbols() {
    let grammar = grammar::build(EXPR).unwrap();
    assert_eq!(parse(&grammar, "i x #").unwrap_err().kind,
      ParseErrorKind::UnknownSymbol("x".to_owned()));
    assert_eq!(parse(&grammar, "NULL #").unwrap_err().kind,
      ParseErrorKind::UnknownSymbol("NULL".to_owned()));
  }

  #[test]
  fn trailing_input() {
    let grammar = grammar::build(EXPR).unwrap();
    assert_eq!(parse(&grammar, "i # i"), Err(ParseError {
      kind: ParseErrorKind::TrailingInput("i".to_owned()),
      position: 2,
    }));
  }

  #[test]
  fn parser_is_reusable() {
    let grammar = grammar::build(EXPR).unwrap();
    let analysis = Ll1Analysis::new(&grammar);
    let parser = analysis.parser().unwrap();

    assert!(parser.parse(vec!["i", "*"]).is_err());
    assert!(parser.parse(vec!["i", "*", "i", "#"]).is_ok());
    assert!(parser.parse(vec!["(", "i", ")", "#"]).is_ok());
  }
}
