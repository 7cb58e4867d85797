// lamparse: parse a lambda-language program and print its syntax tree

use std::fs;
use std::io::{self, Read};
use std::process;

use crossterm::style::Stylize;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use lamparse::parser::{keywords, Parser, SyntaxError};

/// Largest input accepted, in bytes
const MAX_INPUT_BYTES: usize = 10 * 1024;

/// Process exit codes
mod exit {
    pub const OK: i32 = 0;
    pub const USAGE: i32 = 1;
    pub const SYNTAX: i32 = 2;
    pub const UNPARSED: i32 = 3;
    pub const EMPTY: i32 = 4;
    pub const IO: i32 = 5;
}

#[derive(Debug, Error)]
enum CliError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("input is {size} bytes, more than the limit of {limit}")]
    TooLarge { size: usize, limit: usize },
}

impl CliError {
    fn exit_code(&self) -> i32 {
        match self {
            CliError::Read { .. } => exit::IO,
            CliError::TooLarge { .. } => exit::USAGE,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let program_name = args.first().map(|s| s.as_str()).unwrap_or("lamparse");

    let mut path = None;
    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "-h" | "--help" => {
                print_usage(program_name);
                process::exit(exit::OK);
            }
            "-k" | "--keywords" => {
                for word in keywords() {
                    println!("{}", word);
                }
                process::exit(exit::OK);
            }
            _ if path.is_none() => path = Some(arg.clone()),
            _ => {
                eprintln!("Error: unexpected argument '{}'", arg);
                print_usage(program_name);
                process::exit(exit::USAGE);
            }
        }
    }

    let source = match read_source(path.as_deref()) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            process::exit(e.exit_code());
        }
    };

    process::exit(run(&source));
}

fn print_usage(program_name: &str) {
    eprintln!("Usage: {} [--keywords] [FILE]", program_name);
    eprintln!();
    eprintln!("Parses one program from FILE (or stdin, or when FILE is '-')");
    eprintln!("and prints its syntax tree.");
    eprintln!();
    eprintln!("Set RUST_LOG=debug (or trace) to log parser activity.");
}

fn read_source(path: Option<&str>) -> Result<Vec<u8>, CliError> {
    let source = match path {
        Some(path) if path != "-" => {
            fs::read(path).map_err(|source| CliError::Read {
                path: path.to_string(),
                source,
            })?
        }
        _ => {
            let mut buffer = Vec::new();
            io::stdin()
                .read_to_end(&mut buffer)
                .map_err(|source| CliError::Read {
                    path: "<stdin>".to_string(),
                    source,
                })?;
            buffer
        }
    };

    if source.len() > MAX_INPUT_BYTES {
        return Err(CliError::TooLarge {
            size: source.len(),
            limit: MAX_INPUT_BYTES,
        });
    }
    Ok(source)
}

fn run(source: &[u8]) -> i32 {
    let mut parser = Parser::new(source);
    let program = match parser.read_program() {
        Ok(Some(program)) => program,
        Ok(None) => {
            eprintln!("No program found in input");
            return exit::EMPTY;
        }
        Err(e) => {
            print_syntax_error(&e);
            return exit::SYNTAX;
        }
    };
    print!("{}", program.tree());

    // A second read tells us whether anything follows the program
    let end = parser.position();
    match parser.read_program() {
        Ok(None) => exit::OK,
        Ok(Some(_)) | Err(_) => {
            eprintln!(
                "{} unparsed input remains after byte {}",
                "Warning:".yellow().bold(),
                end
            );
            exit::UNPARSED
        }
    }
}

fn print_syntax_error(e: &SyntaxError<'_>) {
    let report = e.report();
    let mut lines = report.lines();
    if let Some(header) = lines.next() {
        eprintln!("{}", header.red().bold());
    }
    for line in lines {
        eprintln!("{}", line);
    }
}
