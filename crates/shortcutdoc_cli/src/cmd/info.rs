use std::path::PathBuf;

use shortcutdoc::shortcut::{Result, ShortcutFile};

use crate::cmd::util::emit_json;

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub json: bool,
}

/// Print container, trailer, and workflow facts.
pub fn run(args: Args) -> Result<()> {
	let Args { path, json } = args;

	let file = ShortcutFile::open(&path)?;
	let trailer = file.trailer();
	let action_count = file.workflow().ok().map(|workflow| workflow.len());

	if json {
		let payload = InfoJson {
			path: path.display().to_string(),
			container: file.container().as_str(),
			envelope_offset: file.envelope_offset(),
			payload_size: file.payload().len(),
			trailer: TrailerJson {
				offset_size: trailer.offset_size,
				ref_size: trailer.ref_size,
				object_count: trailer.object_count,
				root: trailer.root,
				table_offset: trailer.table_offset,
			},
			root_kind: file.root().kind(),
			action_count,
		};
		emit_json(&payload);
		return Ok(());
	}

	println!("path: {}", path.display());
	println!("container: {}", file.container().as_str());
	match file.envelope_offset() {
		Some(offset) => println!("envelope_offset: {offset}"),
		None => println!("envelope_offset: none"),
	}
	println!("payload_size: {}", file.payload().len());
	println!("offset_size: {}", trailer.offset_size);
	println!("ref_size: {}", trailer.ref_size);
	println!("object_count: {}", trailer.object_count);
	println!("root_object: {}", trailer.root);
	println!("table_offset: {}", trailer.table_offset);
	println!("root_kind: {}", file.root().kind());
	if let Some(count) = action_count {
		println!("action_count: {count}");
	}

	Ok(())
}

#[derive(serde::Serialize)]
struct InfoJson {
	path: String,
	container: &'static str,
	envelope_offset: Option<usize>,
	payload_size: usize,
	trailer: TrailerJson,
	root_kind: &'static str,
	#[serde(skip_serializing_if = "Option::is_none")]
	action_count: Option<usize>,
}

#[derive(serde::Serialize)]
struct TrailerJson {
	offset_size: u8,
	ref_size: u8,
	object_count: u64,
	root: u64,
	table_offset: u64,
}
