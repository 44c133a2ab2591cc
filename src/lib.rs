//! Load grammar files and render their LL(1) and operator-precedence
//! analyses.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::{self, SimpleFile};
use codespan_reporting::term::{self, termcolor::WriteColor};
use log::debug;
use thiserror::Error;
use walkdir::WalkDir;
use grammar::GrammarError;
use ll::Ll1Analysis;
use op::OpAnalysis;

pub const GRAMMAR_EXT: &str = "grammar";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
  Ll,
  Op,
  All,
}

impl Default for Mode {
  fn default() -> Self {
    Mode::All
  }
}

impl FromStr for Mode {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, String> {
    match s.to_ascii_lowercase().as_str() {
      "ll" => Ok(Mode::Ll),
      "op" => Ok(Mode::Op),
      "all" => Ok(Mode::All),
      _ => Err(format!("unsupported mode `{}`, expected one of LL, OP, ALL", s)),
    }
  }
}

impl Mode {
  fn ll(self) -> bool {
    self != Mode::Op
  }

  fn op(self) -> bool {
    self != Mode::Ll
  }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
  pub mode: Mode,
  /// symbols to run through the predictive parser, end-marker included
  pub input: Option<Vec<String>>,
}

impl Config {
  /// Input symbols are only consumed by the LL(1) parser.
  pub fn validate(&self) -> Result<(), Error> {
    if self.input.is_some() && !self.mode.ll() {
      return Err(Error::InputWithoutLl);
    }
    Ok(())
  }
}

/// Failure of one grammar. "Not LL(1)" or "not operator-precedence" alone
/// is a report, not an error.
#[derive(Debug, Error)]
pub enum AnalysisError {
  #[error(transparent)]
  Format(#[from] GrammarError),
  #[error(transparent)]
  IllegalGrammar(#[from] ll::IllegalGrammarError),
  #[error("parse failed: {0}")]
  Parse(#[from] ll::ParseError),
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("cannot read {}: {source}", .path.display())]
  Io { path: PathBuf, source: io::Error },
  #[error(transparent)]
  Walk(#[from] walkdir::Error),
  #[error("--input is parsed with the LL(1) table and needs mode LL or ALL")]
  InputWithoutLl,
  #[error("{}: {source}", .path.display())]
  Analysis {
    path: PathBuf,
    /// file contents, kept for diagnostics
    text: String,
    source: AnalysisError,
  },
}

/// `path` itself, or every `*.grammar` file below it when it is a directory,
/// ordered by file name.
pub fn grammar_files(path: &Path) -> Result<Vec<PathBuf>, Error> {
  if !path.is_dir() {
    return Ok(vec![path.to_owned()]);
  }

  let mut files = vec![];
  for entry in WalkDir::new(path).sort_by(|a, b| a.file_name().cmp(b.file_name())) {
    let entry = entry?;
    let is_grammar = entry.path().extension().map_or(false, |ext| ext == GRAMMAR_EXT);
    if entry.file_type().is_file() && is_grammar {
      files.push(entry.into_path());
    }
  }

  debug!("found {} grammar files under {}", files.len(), path.display());
  Ok(files)
}

pub fn analyze_file(path: &Path, config: &Config) -> Result<String, Error> {
  let text = fs::read_to_string(path).map_err(|source| Error::Io {
    path: path.to_owned(),
    source,
  })?;

  match analyze(&text, config) {
    Ok(report) => Ok(report),
    Err(source) => Err(Error::Analysis {
      path: path.to_owned(),
      text,
      source,
    }),
  }
}

/// Analyze every file in order. A failing file does not stop the rest.
pub fn analyze_files<'a>(
  files: &'a [PathBuf],
  config: &'a Config,
) -> impl Iterator<Item = (&'a Path, Result<String, Error>)> + 'a {
  files.iter().map(move |file| (file.as_path(), analyze_file(file, config)))
}

/// Files analyzed and failed so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
  pub analyzed: usize,
  pub failed: usize,
}

impl Summary {
  pub fn record<T>(&mut self, result: &Result<T, Error>) {
    self.analyzed += 1;
    if result.is_err() {
      self.failed += 1;
    }
  }

  /// Classification results never fail a run; any error does.
  pub fn exit_code(&self) -> i32 {
    if self.failed == 0 { 0 } else { 1 }
  }
}

/// Render the analyses `config.mode` asks for, sections separated by a
/// blank line.
pub fn analyze(text: &str, config: &Config) -> Result<String, AnalysisError> {
  let grammar = grammar::build(text)?;
  debug!("loaded grammar with {} nonterminals, {} terminals, {} productions",
    grammar.nonterminal_count(), grammar.terminal_count(), grammar.prods().len());

  let mut sections = vec![grammar.to_string()];

  if config.mode.ll() {
    let analysis = Ll1Analysis::new(&grammar);
    sections.push(ll::report::Report(&analysis).to_string());

    if let Some(input) = &config.input {
      let parser = analysis.parser()?;
      sections.push(ll::report::Table(&grammar, parser.table()).to_string());
      let steps = parser.parse(input)?;
      sections.push(ll::report::Steps(&grammar, &steps).to_string());
    } else if let Ok(parser) = analysis.parser() {
      sections.push(ll::report::Table(&grammar, parser.table()).to_string());
    }
  }

  if config.mode.op() {
    let analysis = OpAnalysis::new(&grammar);
    sections.push(op::report::Report(&analysis).to_string());
  }

  let sections = sections.iter()
    .map(|s| s.trim_end())
    .collect::<Vec<_>>();
  Ok(format!("{}\n", sections.join("\n\n")))
}

/// Render a grammar format error against the file it came from.
pub fn emit_diagnostic(
  writer: &mut dyn WriteColor,
  name: &str,
  text: &str,
  error: &GrammarError,
) -> Result<(), files::Error> {
  let file = SimpleFile::new(name, text);
  let mut diagnostic = Diagnostic::error().with_message(error.to_string());
  if let Some((start, end)) = error.span {
    diagnostic = diagnostic.with_labels(vec![Label::primary((), start..end)]);
  }

  term::emit(writer, &term::Config::default(), &file, &diagnostic)
}

#[cfg(test)]
mod tests {
  use super::*;
  use codespan_reporting::term::termcolor::NoColor;
  use pretty_assertions::assert_eq;

  static IF_THEN: &str = r"
%nonterminals C B E S D
%terminals i t e NULL a b + *
%start C
C->iEtSB
B->NULL|eS
E->a|b
S->aD
D->+b|*b
";

  #[test]
  fn mode_names() {
    assert_eq!("LL".parse::<Mode>(), Ok(Mode::Ll));
    assert_eq!("op".parse::<Mode>(), Ok(Mode::Op));
    assert_eq!("All".parse::<Mode>(), Ok(Mode::All));
    assert!("lr".parse::<Mode>().is_err());
  }

  #[test]
  fn sections_follow_mode() {
    let ll_only = analyze(IF_THEN, &Config { mode: Mode::Ll, input: None }).unwrap();
    assert!(ll_only.contains("LL(1): yes"));
    assert!(ll_only.contains("[B, #] B -> NULL"));
    assert!(!ll_only.contains("operator precedence"));

    let op_only = analyze(IF_THEN, &Config { mode: Mode::Op, input: None }).unwrap();
    assert!(!op_only.contains("LL(1)"));
    assert!(op_only.ends_with("operator precedence: no, `C -> iEtSB` has adjacent nonterminals `SB`\n"));
  }

  #[test]
  fn input_is_parsed() {
    let input = "i a t a * b #".split(' ').map(str::to_owned).collect();
    let report = analyze(IF_THEN, &Config { mode: Mode::All, input: Some(input) }).unwrap();
    assert!(report.contains("expand D -> *b\nmatch  *\nmatch  b\nexpand B -> NULL\naccept"));

    let input = vec!["i".to_owned(), "#".to_owned()];
    let err = analyze(IF_THEN, &Config { mode: Mode::Ll, input: Some(input) }).unwrap_err();
    assert!(matches!(err, AnalysisError::Parse(_)));
  }

  #[test]
  fn input_needs_ll_mode() {
    let input = Some(vec!["i".to_owned(), "#".to_owned()]);

    assert!(Config { mode: Mode::Ll, input: input.clone() }.validate().is_ok());
    assert!(Config { mode: Mode::All, input: input.clone() }.validate().is_ok());
    assert!(Config { mode: Mode::Op, input: None }.validate().is_ok());
    assert!(matches!(
      Config { mode: Mode::Op, input }.validate(),
      Err(Error::InputWithoutLl)));
  }

  #[test]
  fn input_needs_ll1_grammar() {
    let text = "%nonterminals S\n%terminals a b\n%start S\nS->ab|a\n";
    let input = vec!["a".to_owned(), "#".to_owned()];

    assert!(analyze(text, &Config::default()).is_ok());
    let err = analyze(text, &Config { mode: Mode::Ll, input: Some(input) }).unwrap_err();
    assert!(matches!(err, AnalysisError::IllegalGrammar(_)));
  }

  #[test]
  fn diagnostic_points_at_line() {
    let text = "%nonterminals S\n%terminals a\n%start S\nS->ab\n";
    let err = match analyze(text, &Config::default()) {
      Err(AnalysisError::Format(err)) => err,
      other => panic!("unexpected {:?}", other),
    };

    let mut out = NoColor::new(vec![]);
    emit_diagnostic(&mut out, "s.grammar", text, &err).unwrap();
    let out = String::from_utf8(out.into_inner()).unwrap();

    assert!(out.starts_with("error: `b` is neither a terminal nor a nonterminal"));
    assert!(out.contains("s.grammar:4:1"));
  }
}
