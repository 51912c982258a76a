//! `coursepack` CLI entrypoint.
//!
//! This binary ingests uploaded SCORM archives into the content root,
//! resolves extracted packages and removes them again. Results go to stdout;
//! errors and logs go to stderr.

use clap::Parser;
use coursepack_common::IngestConfig;
use coursepack_ingest::cli::{Cli, Command, IngestArgs, RemoveArgs, ResolveArgs};
use coursepack_ingest::error::{IngestError, Result};
use coursepack_ingest::manifest::{ResolvedPackage, resolve};
use coursepack_ingest::output::{format_human, format_json, write_stderr_line};
use coursepack_ingest::pipeline::{ingest, remove_package};
use log::LevelFilter;
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_level());
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stdout, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

/// Installs the logger. `RUST_LOG` takes precedence over `-v`/`-q`.
fn init_logging(level: LevelFilter) {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level)
        .format_timestamp(None)
        .parse_default_env();
    if builder.try_init().is_err() {
        // A logger is already installed.
    }
}

fn run(cli: &Cli, stdout: &mut dyn Write, stderr: &mut dyn Write) -> Result<()> {
    let config = IngestConfig::load(cli.config.as_deref())?.with_process_environment();
    match &cli.command {
        Command::Ingest(args) => run_ingest(args, &args.apply_to(config), stdout, stderr),
        Command::Resolve(args) => run_resolve(args, &args.apply_to(config), stdout),
        Command::Remove(args) => run_remove(args, &args.apply_to(config), stdout),
    }
}

fn run_ingest(
    args: &IngestArgs,
    config: &IngestConfig,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<()> {
    let outcome = ingest(&args.archive, config)?;
    if !args.json {
        write_stderr_line(
            stderr,
            format!(
                "Extracted {} files into {}",
                outcome.files_written, outcome.destination
            ),
        );
    }
    print_package(&outcome.package, args.json, stdout)
}

fn run_resolve(args: &ResolveArgs, config: &IngestConfig, stdout: &mut dyn Write) -> Result<()> {
    let package = resolve(args.dir.as_std_path(), &config.url_prefix)?;
    print_package(&package, args.json, stdout)
}

fn run_remove(args: &RemoveArgs, config: &IngestConfig, stdout: &mut dyn Write) -> Result<()> {
    let removed = remove_package(&config.content_root, &args.folder)?;
    writeln!(stdout, "Removed {removed}").map_err(|source| IngestError::WriteFailed { source })
}

fn print_package(package: &ResolvedPackage, json: bool, stdout: &mut dyn Write) -> Result<()> {
    let rendered = if json {
        format_json(package)
    } else {
        format_human(package)
    };
    writeln!(stdout, "{}", rendered.trim_end())
        .map_err(|source| IngestError::WriteFailed { source })
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, format!("error: {err}"));
            let mut source = std::error::Error::source(&err);
            while let Some(cause) = source {
                write_stderr_line(stderr, format!("  caused by: {cause}"));
                source = std::error::Error::source(cause);
            }
            err.exit_code()
        }
    }
}
