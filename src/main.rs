use std::env;
use std::path::Path;
use std::process;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use getopts::Options;
use grammarscope::{AnalysisError, Config, Error, Mode, Summary};

fn main() {
  let args = env::args().collect::<Vec<_>>();
  let prog = args[0].clone();
  let mut opts = Options::new();
  opts.optopt("m", "mode",
    "Analyses to run. Defaults to ALL.\n\
      Supported modes: LL, OP, ALL (case insensitive)",
    "MODE");
  opts.optopt("i", "input",
    "Whitespace-separated symbols to parse with the LL(1) table,\n\
      ending with #",
    "SYMBOLS");
  opts.optflagmulti("v", "verbose", "Log analysis progress, repeat for more");
  opts.optflag("h", "help", "Print this message");

  let matches = match opts.parse(&args[1..]) {
    Ok(m) => m,
    Err(err) => {
      eprintln!("{}", err);
      process::exit(1);
    }
  };

  if matches.opt_present("h") {
    print_usage(prog, opts);
    return;
  }

  init_logger(matches.opt_count("v"));

  let mode = match matches.opt_str("m").map(|m| m.parse::<Mode>()).transpose() {
    Ok(mode) => mode.unwrap_or_default(),
    Err(err) => {
      eprintln!("{}", err);
      process::exit(1);
    }
  };
  let input = matches.opt_str("i")
    .map(|s| s.split_whitespace().map(str::to_owned).collect());

  let path = if matches.free.len() == 1 {
    matches.free[0].clone()
  } else {
    print_usage(prog, opts);
    process::exit(1);
  };

  let config = Config { mode, input };
  if let Err(err) = config.validate() {
    eprintln!("{}", err);
    process::exit(1);
  }

  let files = match grammarscope::grammar_files(Path::new(&path)) {
    Ok(files) => files,
    Err(err) => {
      eprintln!("{}", err);
      process::exit(1);
    }
  };

  let mut stderr = StandardStream::stderr(ColorChoice::Auto);
  let mut summary = Summary::default();

  for (file, result) in grammarscope::analyze_files(&files, &config) {
    let shown = dunce::canonicalize(file).unwrap_or_else(|_| file.to_owned());
    if files.len() > 1 {
      println!("==> {} <==", shown.display());
    }

    summary.record(&result);
    match result {
      Ok(report) => print!("{}", report),
      Err(err) => report_error(&mut stderr, &shown, err),
    }
  }

  process::exit(summary.exit_code());
}

fn report_error(stderr: &mut StandardStream, shown: &Path, err: Error) {
  if let Error::Analysis { text, source: AnalysisError::Format(format), .. } = &err {
    let name = shown.display().to_string();
    if grammarscope::emit_diagnostic(stderr, &name, text, format).is_ok() {
      return;
    }
  }
  eprintln!("{}", err);
}

fn init_logger(verbosity: usize) {
  let level = match verbosity {
    0 => "warn",
    1 => "debug",
    _ => "trace",
  };
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn print_usage(prog: String, opts: Options) {
  let brief = format!("Usage: {} [options] PATH", prog);
  print!("{}", opts.usage(&brief));
}
