//! Lexical decomposition of production text. Knows nothing about which
//! symbols are terminals.

use crate::{GrammarErrorKind, EPSILON, PRIME};

/// Split one alternative into its symbols.
///
/// Every character is a symbol, except that a character followed by `'`
/// forms a two-character symbol (`E'`). A whitespace-separated chunk equal
/// to `NULL` is the epsilon symbol. Whitespace itself only separates.
pub fn disassemble(alt: &str) -> Vec<&str> {
  let mut symbols = vec![];

  for chunk in alt.split_whitespace() {
    if chunk == EPSILON {
      symbols.push(chunk);
      continue;
    }

    let mut chars = chunk.char_indices().peekable();
    while let Some((start, _)) = chars.next() {
      let end = match chars.peek() {
        Some(&(i, PRIME)) => {
          chars.next();
          i + PRIME.len_utf8()
        }
        Some(&(i, _)) => i,
        None => chunk.len(),
      };
      symbols.push(&chunk[start..end]);
    }
  }

  symbols
}

/// Split `LHS->alt1|alt2|...` into the left-hand side and the raw
/// alternative strings.
pub(crate) fn split_production(
  text: &str
) -> Result<(&str, Vec<&str>), GrammarErrorKind> {
  let arrow = text.find("->")
    .ok_or_else(|| GrammarErrorKind::MissingArrow(text.to_owned()))?;

  let lhs = text[..arrow].trim();
  if lhs.is_empty() {
    return Err(GrammarErrorKind::EmptyLhs(text.to_owned()));
  }

  let alts = text[arrow + 2..].split('|').map(str::trim).collect();

  Ok((lhs, alts))
}
