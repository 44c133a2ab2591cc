//! Line-oriented reader for grammar files.

use crate::{GrammarError, GrammarErrorKind};
use crate::grammar::{Decl, Decls};

pub(crate) fn parse(input: &str) -> Result<Decls, GrammarError> {
  let mut decls = Decls::default();

  for raw in input.split('\n') {
    let line = raw.trim();
    if line.is_empty() || line.starts_with("//") {
      continue;
    }
    let span = span_of(input, line);

    if !line.starts_with('%') {
      decls.prods.push(Decl { text: line, span: Some(span) });
      continue;
    }

    let mut words = line.split_whitespace();
    let directive = words.next().unwrap_or(line);
    let symbols = words
      .map(|word| Decl { text: word, span: Some(span_of(input, word)) })
      .collect::<Vec<_>>();

    match directive {
      "%nonterminals" => decls.nts.extend(symbols),
      "%terminals" => decls.terms.extend(symbols),
      "%start" => {
        if decls.start.is_some() {
          return Err(GrammarError::new(GrammarErrorKind::DuplicateStart, Some(span)));
        }
        match symbols.as_slice() {
          [start] => decls.start = Some(*start),
          [] => {
            return Err(GrammarError::new(GrammarErrorKind::MissingStart, Some(span)));
          }
          [_, extra, ..] => {
            return Err(GrammarError::new(
              GrammarErrorKind::ExtraStartSymbol(extra.text.to_owned()),
              extra.span));
          }
        }
      }
      _ => {
        let span = (span.0, span.0 + directive.len());
        return Err(GrammarError::new(
          GrammarErrorKind::UnknownDirective(directive.to_owned()),
          Some(span)));
      }
    }
  }

  Ok(decls)
}

/// Byte range of `part`, which must be a subslice of `input`.
fn span_of(input: &str, part: &str) -> (usize, usize) {
  let start = part.as_ptr() as usize - input.as_ptr() as usize;
  (start, start + part.len())
}
