//! Command-line driver: `pymips <source.py> [-o <output.s>] [--strict]`.
//!
//! Reads the source file, runs the pipeline, and writes the assembly to
//! stdout or to the `-o` path (creating its directory). Logging goes to
//! stderr and is controlled by `RUST_LOG`.

use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process;

use pymips::{CompileOptions, generate_assembly_with};
use snafu::{ResultExt, Snafu};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Snafu)]
enum CliError {
  #[snafu(display("usage: {program} <source.py> [-o <output.s>] [--strict]"))]
  Usage { program: String },

  #[snafu(display("failed to read {}: {source}", path.display()))]
  Read { path: PathBuf, source: io::Error },

  #[snafu(display("failed to create directory {}: {source}", path.display()))]
  CreateDir { path: PathBuf, source: io::Error },

  #[snafu(display("failed to write {}: {source}", path.display()))]
  Write { path: PathBuf, source: io::Error },

  #[snafu(display("{report}"))]
  Compile { report: String },
}

#[derive(Debug)]
struct Config {
  input: PathBuf,
  output: Option<PathBuf>,
  options: CompileOptions,
}

impl Config {
  fn from_args(mut args: impl Iterator<Item = String>) -> CliResult<Self> {
    let program = args.next().unwrap_or_else(|| "pymips".to_string());
    let mut input = None;
    let mut output = None;
    let mut options = CompileOptions::default();

    while let Some(arg) = args.next() {
      match arg.as_str() {
        "--strict" => options.strict = true,
        "-o" => match args.next() {
          Some(path) => output = Some(PathBuf::from(path)),
          None => return UsageSnafu { program }.fail(),
        },
        _ if input.is_none() && !arg.starts_with('-') => input = Some(PathBuf::from(arg)),
        _ => return UsageSnafu { program }.fail(),
      }
    }

    let Some(input) = input else {
      return UsageSnafu { program }.fail();
    };
    Ok(Self {
      input,
      output,
      options,
    })
  }
}

fn run(config: &Config) -> CliResult<()> {
  let source = fs::read_to_string(&config.input).context(ReadSnafu {
    path: &config.input,
  })?;
  debug!(path = %config.input.display(), bytes = source.len(), "read source");

  let asm = generate_assembly_with(&source, config.options).map_err(|err| {
    CliError::Compile {
      report: err.render(&source),
    }
  })?;

  match &config.output {
    Some(path) => {
      if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
      {
        fs::create_dir_all(dir).context(CreateDirSnafu { path: dir })?;
      }
      fs::write(path, &asm).context(WriteSnafu { path })?;
      info!(path = %path.display(), "wrote assembly");
    }
    None => print!("{asm}"),
  }
  Ok(())
}

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
    .with_writer(io::stderr)
    .with_target(false)
    .init();

  let result = Config::from_args(env::args()).and_then(|config| run(&config));
  if let Err(err) = result {
    eprintln!("{err}");
    process::exit(1);
  }
}
