use thiserror::Error;

/// Malformed grammar text. No partial grammar is ever returned alongside one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct GrammarError {
  pub kind: GrammarErrorKind,
  /// byte range into the grammar file, when the grammar came from one
  pub span: Option<(usize, usize)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarErrorKind {
  #[error("production `{0}` has no `->`")]
  MissingArrow(String),
  #[error("production `{0}` has an empty left-hand side")]
  EmptyLhs(String),
  #[error("production for `{0}` has an empty alternative")]
  EmptyAlternative(String),
  #[error("alternative `{0}` mixes NULL with other symbols")]
  EpsilonMixed(String),
  #[error("`{0}` is neither a terminal nor a nonterminal")]
  UnknownSymbol(String),
  #[error("`{0}` has productions but is not a nonterminal")]
  NotNonterminal(String),
  #[error("`{0}` appears twice as a left-hand side; use | to separate alternatives")]
  DuplicateProduction(String),
  #[error("nonterminal `{0}` has no productions")]
  MissingProductions(String),
  #[error("`{0}` is declared twice")]
  DuplicateSymbol(String),
  #[error("`{0}` is declared as both a terminal and a nonterminal")]
  AmbiguousSymbol(String),
  #[error("`{0}` is reserved for the end-marker")]
  ReservedSymbol(String),
  #[error("start symbol `{0}` is not a nonterminal")]
  StartNotNonterminal(String),
  #[error("missing start symbol")]
  MissingStart,
  #[error("start symbol is declared more than once")]
  DuplicateStart,
  #[error("unexpected `{0}` after the start symbol")]
  ExtraStartSymbol(String),
  #[error("unknown directive `{0}`")]
  UnknownDirective(String),
}

impl GrammarError {
  pub(crate) fn new(kind: GrammarErrorKind, span: Option<(usize, usize)>) -> Self {
    Self { kind, span }
  }
}
