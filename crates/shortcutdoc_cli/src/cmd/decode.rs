use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::ArgGroup;
use shortcutdoc::shortcut::{Result, ShortcutError, ShortcutFile, render_action_list, render_xml};

use crate::cmd::util::{emit_json, output_path};

/// Suffix of the XML plist output.
pub const XML_SUFFIX: &str = ".xml";
/// Suffix of the action listing output.
pub const ACTIONS_SUFFIX: &str = ".actions.txt";

#[derive(clap::Args)]
#[command(group(ArgGroup::new("mode").required(true).multiple(true).args(["xml", "actions", "both"])))]
pub struct Args {
	/// Shortcut files to decode.
	#[arg(required = true)]
	pub files: Vec<PathBuf>,
	/// Produce XML plist output.
	#[arg(short = 'A', long)]
	pub xml: bool,
	/// Produce the human-readable action list.
	#[arg(short = 'B', long)]
	pub actions: bool,
	/// Produce both outputs.
	#[arg(short = 'C', long)]
	pub both: bool,
	/// Print a JSON report instead of progress lines.
	#[arg(long)]
	pub json: bool,
	/// Directory for output files instead of beside each input.
	#[arg(short = 'o', long = "out-dir")]
	pub out_dir: Option<PathBuf>,
}

/// Which renderers run for each file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mode {
	/// Write `<stem>.xml`.
	pub xml: bool,
	/// Write `<stem>.actions.txt`.
	pub actions: bool,
}

impl Mode {
	fn from_args(args: &Args) -> Self {
		Self {
			xml: args.xml || args.both,
			actions: args.actions || args.both,
		}
	}
}

/// Per-file outcome collected for reporting.
#[derive(Debug, serde::Serialize)]
pub struct FileReport {
	/// Input path as given.
	pub path: String,
	/// Whether every requested output was written.
	pub ok: bool,
	/// Output files written, even when a later step failed.
	pub written: Vec<String>,
	/// Error kind label when `ok` is false.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error_kind: Option<&'static str>,
	/// Error message when `ok` is false.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

/// Decode every file, continuing past failures.
///
/// Returns a failing exit code when any file failed.
pub fn run(args: Args) -> ExitCode {
	let mode = Mode::from_args(&args);
	let Args { files, json, out_dir, .. } = args;

	if let Some(dir) = &out_dir
		&& let Err(err) = fs::create_dir_all(dir)
	{
		eprintln!("ERROR: {}: {err}", dir.display());
		return ExitCode::FAILURE;
	}

	let mut reports = Vec::with_capacity(files.len());
	for path in &files {
		if !json {
			println!("Processing: {}", path.display());
		}

		let mut written = Vec::new();
		let result = process_file(path, out_dir.as_deref(), mode, &mut written);
		if !json {
			for output in &written {
				let label = if output.to_string_lossy().ends_with(ACTIONS_SUFFIX) { "Action list" } else { "XML plist" };
				println!("{label} written to {}", output.display());
			}
		}

		let report = FileReport {
			path: path.display().to_string(),
			ok: result.is_ok(),
			written: written.iter().map(|item| item.display().to_string()).collect(),
			error_kind: result.as_ref().err().map(ShortcutError::kind),
			error: result.as_ref().err().map(ToString::to_string),
		};
		if let Err(err) = &result {
			tracing::warn!(path = %path.display(), kind = err.kind(), "decode failed");
			eprintln!("ERROR: {}: {err}", path.display());
		}
		reports.push(report);
	}

	if json {
		emit_json(&reports);
	}

	let failed = reports.iter().filter(|item| !item.ok).count();
	tracing::debug!(files = reports.len(), failed, "batch finished");
	if failed > 0 { ExitCode::FAILURE } else { ExitCode::SUCCESS }
}

/// Decode one file and write the outputs `mode` asks for.
///
/// Paths land in `written` as soon as each file is on disk, so a listing
/// failure still reports the XML that was produced.
pub fn process_file(path: &Path, out_dir: Option<&Path>, mode: Mode, written: &mut Vec<PathBuf>) -> Result<()> {
	let file = ShortcutFile::open(path)?;

	if mode.xml {
		let target = output_path(path, out_dir, XML_SUFFIX);
		let xml = render_xml(file.root())?;
		fs::write(&target, xml)?;
		written.push(target);
	}

	if mode.actions {
		let listing = render_action_list(file.root())?;
		let target = output_path(path, out_dir, ACTIONS_SUFFIX);
		fs::write(&target, listing)?;
		written.push(target);
	}

	Ok(())
}
