//! CLI tool to dump and check the tokens of Lua source files.

use std::fs;
use std::process::ExitCode;

use lua_scanner::{LexError, Scanner, ScannerConfig, Token};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        eprintln!("Usage: lualex <command> [--skip-comments] [files...]");
        eprintln!();
        eprintln!("Commands:");
        eprintln!("  tokens  Print every token with its span");
        eprintln!("  check   Check that file(s) tokenize cleanly");
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  lualex tokens init.lua");
        eprintln!("  lualex check --skip-comments src/*.lua");
        eprintln!();
        eprintln!("Set RUST_LOG=lua_scanner=trace to log each scanned token.");
        return ExitCode::from(2);
    }

    let command = args[1].as_str();
    let mut config = ScannerConfig::new();
    let mut files = Vec::new();
    for arg in &args[2..] {
        if arg == "--skip-comments" {
            config = config.skip_comments(true);
        } else {
            files.push(arg.as_str());
        }
    }

    if files.is_empty() {
        eprintln!("Error: no files specified");
        return ExitCode::from(2);
    }

    let mut had_error = false;

    for path in files {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{path}: {e}");
                had_error = true;
                continue;
            }
        };

        match command {
            "tokens" => match scan(&content, config) {
                Ok(tokens) => {
                    for token in &tokens {
                        println!("{}", describe(token));
                    }
                }
                Err(e) => {
                    eprintln!("{path}: {e}");
                    had_error = true;
                }
            },
            "check" => match scan(&content, config) {
                Ok(tokens) => {
                    eprintln!("{path}: ok ({} token(s))", tokens.len());
                }
                Err(e) => {
                    eprintln!("{path}: {e}");
                    had_error = true;
                }
            },
            _ => {
                eprintln!("Unknown command: {command}");
                return ExitCode::from(2);
            }
        }
    }

    if had_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Log to stderr, but only when `RUST_LOG` is set.
fn init_tracing() {
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn scan(source: &str, config: ScannerConfig) -> Result<Vec<Token>, LexError> {
    let mut scanner = Scanner::with_config(source, config);
    scanner.tokens().collect()
}

fn describe(token: &Token) -> String {
    let span = token.span;
    format!(
        "{}:{}-{}:{} {:?} {:?}",
        span.start.line + 1,
        span.start.column + 1,
        span.end.line + 1,
        span.end.column + 1,
        token.kind,
        token.text(),
    )
}
