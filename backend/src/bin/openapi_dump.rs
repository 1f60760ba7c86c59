//! Print the OpenAPI document as JSON.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use users_backend::ApiDoc;
use utoipa::OpenApi;

/// `openapi-dump` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "openapi-dump",
    about = "Write the users API OpenAPI document as JSON",
    version
)]
struct CliArgs {
    /// Write to this file instead of standard output.
    #[arg(long, value_name = "path")]
    output: Option<PathBuf>,
    /// Emit a single line instead of indented JSON.
    #[arg(long)]
    compact: bool,
}

fn render(compact: bool) -> io::Result<String> {
    let doc = ApiDoc::openapi();
    let json = if compact {
        doc.to_json()
    } else {
        doc.to_pretty_json()
    };
    json.map_err(|error| io::Error::other(format!("serialise OpenAPI document: {error}")))
}

fn run(args: CliArgs) -> io::Result<()> {
    let json = render(args.compact)?;
    match args.output {
        Some(path) => std::fs::write(&path, json)
            .map_err(|error| io::Error::other(format!("write {}: {error}", path.display()))),
        None => {
            println!("{json}");
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    match run(CliArgs::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("openapi-dump: {error}");
            ExitCode::FAILURE
        }
    }
}
