use std::path::{Path, PathBuf};

use serde::Serialize;

/// Pretty-print a serializable report to stdout.
pub(crate) fn emit_json<T: Serialize>(value: &T) {
	match serde_json::to_string_pretty(value) {
		Ok(text) => println!("{text}"),
		Err(err) => eprintln!("error: json encoding failed: {err}"),
	}
}

/// Derive an output path by swapping the input extension for `suffix`.
///
/// The file lands beside the input unless `out_dir` is given.
pub(crate) fn output_path(input: &Path, out_dir: Option<&Path>, suffix: &str) -> PathBuf {
	let stem = input.file_stem().map(|item| item.to_string_lossy().into_owned()).unwrap_or_default();
	let name = format!("{stem}{suffix}");
	match out_dir {
		Some(dir) => dir.join(name),
		None => input.with_file_name(name),
	}
}

#[cfg(test)]
mod tests {
	use std::path::Path;

	use super::output_path;

	#[test]
	fn output_path_replaces_extension() {
		let path = output_path(Path::new("dir/My Shortcut.shortcut"), None, ".xml");
		assert_eq!(path, Path::new("dir/My Shortcut.xml"));
	}

	#[test]
	fn output_path_keeps_inner_dots() {
		let path = output_path(Path::new("a.b.shortcut"), None, ".actions.txt");
		assert_eq!(path, Path::new("a.b.actions.txt"));
	}

	#[test]
	fn output_path_honors_out_dir() {
		let path = output_path(Path::new("in/x.shortcut"), Some(Path::new("out")), ".xml");
		assert_eq!(path, Path::new("out/x.xml"));
	}
}
