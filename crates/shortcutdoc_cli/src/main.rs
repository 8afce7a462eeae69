#![allow(missing_docs)]

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;

#[derive(Parser)]
#[command(name = "shortcutdoc", about = "Apple .shortcut decoding tools")]
struct Cli {
	/// Log decoder progress at debug level.
	#[arg(short, long, global = true)]
	verbose: bool,
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Write XML plists and/or action listings for a batch of files.
	Decode(cmd::decode::Args),
	/// Print the decoded value tree of one file.
	Show(cmd::show::Args),
	/// Print container and plist layout facts for one file.
	Info(cmd::info::Args),
}

fn main() -> ExitCode {
	let cli = Cli::parse();
	init_tracing(cli.verbose);

	match run(cli.command) {
		Ok(code) => code,
		Err(err) => {
			eprintln!("error: {err}");
			ExitCode::FAILURE
		}
	}
}

fn run(command: Commands) -> shortcutdoc::shortcut::Result<ExitCode> {
	match command {
		Commands::Decode(args) => Ok(cmd::decode::run(args)),
		Commands::Show(args) => cmd::show::run(args).map(|()| ExitCode::SUCCESS),
		Commands::Info(args) => cmd::info::run(args).map(|()| ExitCode::SUCCESS),
	}
}

/// `RUST_LOG` wins; otherwise warnings only, or debug with `--verbose`.
fn init_tracing(verbose: bool) {
	let fallback = if verbose { "debug" } else { "warn" };
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}
