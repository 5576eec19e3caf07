//! Command-line front end for the IPPcode23 interpreter: resolves
//! `--source`/`--input` to concrete byte streams (file or stdin), hands the
//! decoded program to the `loader` crate and the resolved input stream to
//! `ippvm::Executor`, and turns the first `Error` anywhere in that pipeline
//! into the one process exit code it maps to. This crate owns the two exit
//! codes (10, 11) that exist before either the loader or the core ever runs.

#[macro_use]
extern crate clap;

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::PathBuf;

use clap::Arg;
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

use ippvm::{Executor, LineReader};

#[derive(Debug)]
enum Error {
    /// Neither `--source` nor `--input` was given (exit 10).
    NoStreamsGiven,
    /// A path named by `--source`/`--input` could not be opened (exit 11).
    CannotOpen { path: PathBuf, source: io::Error },
    Loader(loader::Error),
    Core(ippvm::Error),
}

impl Error {
    fn exit_code(&self) -> i32 {
        match self {
            Error::NoStreamsGiven => 10,
            Error::CannotOpen { .. } => 11,
            Error::Loader(err) => err.exit_code(),
            Error::Core(err) => err.exit_code(),
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::NoStreamsGiven => write!(f, "at least one of --source, --input must be given"),
            Error::CannotOpen { path, source } => {
                write!(f, "cannot open \"{}\": {}", path.display(), source)
            }
            Error::Loader(err) => write!(f, "{}", err),
            Error::Core(err) => write!(f, "{}", err),
        }
    }
}

impl From<loader::Error> for Error {
    fn from(err: loader::Error) -> Error {
        Error::Loader(err)
    }
}

impl From<ippvm::Error> for Error {
    fn from(err: ippvm::Error) -> Error {
        Error::Core(err)
    }
}

fn main() {
    let matches = app_from_crate!()
        .arg(
            Arg::with_name("source")
                .long("source")
                .takes_value(true)
                .value_name("PATH")
                .help("Path to the IPPcode23 XML source document (stdin if omitted)"),
        )
        .arg(
            Arg::with_name("input")
                .long("input")
                .takes_value(true)
                .value_name("PATH")
                .help("Path to the input stream read by READ (stdin if omitted)"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Raise the logging level to debug (does not affect program semantics)"),
        )
        .get_matches();

    init_logging(if matches.is_present("verbose") { LevelFilter::Debug } else { LevelFilter::Warn });

    let source_path = matches.value_of("source").map(PathBuf::from);
    let input_path = matches.value_of("input").map(PathBuf::from);

    let code = match run(source_path, input_path) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{}", err);
            err.exit_code()
        }
    };
    std::process::exit(code);
}

fn run(source_path: Option<PathBuf>, input_path: Option<PathBuf>) -> Result<i32, Error> {
    if source_path.is_none() && input_path.is_none() {
        return Err(Error::NoStreamsGiven);
    }

    let xml = read_source(source_path)?;
    let instructions = loader::load(&xml)?;

    let input: Box<dyn BufRead> = open_input(input_path)?;
    let mut executor = Executor::new(instructions, LineReader::new(input))?;

    let stdout = io::stdout();
    let stderr = io::stderr();
    let code = executor.run(&mut stdout.lock(), &mut stderr.lock())?;
    Ok(code)
}

fn read_source(path: Option<PathBuf>) -> Result<String, Error> {
    match path {
        Some(path) => {
            let mut text = String::new();
            File::open(&path)
                .and_then(|mut file| file.read_to_string(&mut text))
                .map_err(|source| Error::CannotOpen { path, source })?;
            Ok(text)
        }
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .map_err(|source| Error::CannotOpen { path: PathBuf::from("<stdin>"), source })?;
            Ok(text)
        }
    }
}

fn open_input(path: Option<PathBuf>) -> Result<Box<dyn BufRead>, Error> {
    match path {
        Some(path) => {
            let file = File::open(&path).map_err(|source| Error::CannotOpen { path, source })?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(BufReader::new(io::stdin()))),
    }
}

/// Installs a console logger writing to stderr (the same
/// console-appender-based approach other tools in this problem domain use):
/// `Warn`-and-above normally, `Debug`-and-above under `--verbose`. Strictly
/// additional diagnostics — it never substitutes for WRITE/DPRINT/BREAK
/// output, which is written directly and unconditionally.
fn init_logging(level: LevelFilter) {
    let encoder = PatternEncoder::new("[{l}] {m}{n}");
    let stderr = ConsoleAppender::builder()
        .target(log4rs::append::console::Target::Stderr)
        .encoder(Box::new(encoder))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(level))
        .unwrap();
    let _handle = log4rs::init_config(config).unwrap();
}
