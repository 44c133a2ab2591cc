//! Context-free grammar model: interned symbols, productions grouped by
//! nonterminal, and the two ways of authoring one (flat lists via
//! [`Grammar::new`], or the directive file format via [`build`]).

use fnv::FnvBuildHasher;

mod error;
mod grammar;
mod parse;
mod split;

pub use self::error::{GrammarError, GrammarErrorKind};
pub use self::grammar::*;
pub use self::split::disassemble;

pub type Map<K, V> = indexmap::IndexMap<K, V, FnvBuildHasher>;
pub type Set<K> = indexmap::IndexSet<K, FnvBuildHasher>;

/// The terminal standing for the empty string.
pub const EPSILON: &str = "NULL";
/// End-of-input sentinel; never part of the symbol alphabet.
pub const END_MARKER: &str = "#";
/// Marks a primed symbol such as `E'`.
pub const PRIME: char = '\'';

/// Build a grammar from the directive file format.
///
/// ```text
/// %nonterminals E E' T T' F
/// %terminals + * ( ) i NULL
/// %start E
/// E->TE'
/// E'->+TE'|NULL
/// ```
pub fn build(input: &str) -> Result<Grammar, GrammarError> {
  let decls = parse::parse(input)?;
  grammar::assemble(decls)
}
