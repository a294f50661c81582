mod cli;

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use cmm_compiler::{compile, CompileOutcome};

use cli::Cli;

/// Exit codes, per the driver's contract: `0` success, `1` semantic
/// errors, `2` parse/lex error, `3` I/O error.
const EXIT_OK: u8 = 0;
const EXIT_SEMANTIC_ERROR: u8 = 1;
const EXIT_SYNTAX_ERROR: u8 = 2;
const EXIT_IO_ERROR: u8 = 3;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("cannot read {path}: {source}")]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot write {path}: {source}")]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(EXIT_IO_ERROR)
        }
    }
}

fn run(cli: &Cli) -> Result<u8, CliError> {
    let source = fs::read_to_string(&cli.input).map_err(|source| CliError::ReadInput {
        path: cli.input.clone(),
        source,
    })?;

    let outcome = compile(&source);

    if cli.emit_ast {
        println!("{:#?}", outcome.program);
    }

    let path_str = cli.input.to_string_lossy();
    if outcome.has_errors() {
        print_diagnostics(&outcome, &source, &path_str, cli.color.should_colorize());
        return Ok(if outcome.parse_failed {
            EXIT_SYNTAX_ERROR
        } else {
            EXIT_SEMANTIC_ERROR
        });
    }

    if cli.emit_diagnostics_only {
        return Ok(EXIT_OK);
    }

    // Write nothing until emission has fully succeeded: a failing run
    // must never clobber a previous successful output.
    let assembly = outcome
        .assembly
        .expect("no diagnostics were reported, so emission produced assembly");
    let output_path = cli.output_path();
    fs::write(&output_path, assembly).map_err(|source| CliError::WriteOutput {
        path: output_path.clone(),
        source,
    })?;

    Ok(EXIT_OK)
}

fn print_diagnostics(outcome: &CompileOutcome, source: &str, path: &str, colored: bool) {
    let rendered = outcome
        .diagnostics
        .printer(source)
        .path(path)
        .colored(colored)
        .render();
    eprintln!("{rendered}");
}
