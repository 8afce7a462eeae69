use std::fmt::Write as _;

use crate::shortcut::error::{Result, ShortcutError};
use crate::shortcut::value::{Dict, Value, format_date};

/// Key of the optional wrapper dict some exports nest the workflow under.
pub const WORKFLOW_KEY: &str = "WFWorkflow";
/// Key of the ordered action array.
pub const ACTIONS_KEY: &str = "WFWorkflowActions";
/// Key of an action's type identifier.
pub const IDENTIFIER_KEY: &str = "WFWorkflowActionIdentifier";
/// Key of an action's parameter dict.
pub const PARAMETERS_KEY: &str = "WFWorkflowActionParameters";
/// Identifier reported for actions that carry none.
pub const UNKNOWN_ACTION: &str = "UnknownAction";

/// One step of a decoded workflow.
#[derive(Debug, Clone, Copy)]
pub struct Action<'a> {
	/// Action type identifier.
	pub identifier: &'a str,
	/// Named parameters, absent when the action declares none.
	pub parameters: Option<&'a Dict>,
}

impl Action<'_> {
	/// Number of parameters.
	pub fn parameter_count(&self) -> usize {
		self.parameters.map_or(0, Dict::len)
	}
}

/// Borrowed view of the workflow stored in a decoded root value.
#[derive(Debug, Clone)]
pub struct Workflow<'a> {
	/// Dict holding the workflow keys.
	pub dict: &'a Dict,
	/// Actions in execution order.
	pub actions: Vec<Action<'a>>,
}

impl<'a> Workflow<'a> {
	/// Locate the workflow and validate every action element.
	pub fn from_value(root: &'a Value) -> Result<Self> {
		let root = root
			.as_dict()
			.ok_or_else(|| ShortcutError::workflow(format!("root is {}, expected dict", root.kind())))?;
		let dict = match root.get(WORKFLOW_KEY).and_then(Value::as_dict) {
			Some(nested) => nested,
			None => root,
		};

		let list = dict
			.get(ACTIONS_KEY)
			.ok_or_else(|| ShortcutError::workflow(format!("missing {ACTIONS_KEY}")))?;
		let items = list
			.as_array()
			.ok_or_else(|| ShortcutError::workflow(format!("{ACTIONS_KEY} is {}, expected array", list.kind())))?;

		let actions = items
			.iter()
			.enumerate()
			.map(|(idx, item)| parse_action(idx, item))
			.collect::<Result<Vec<_>>>()?;

		tracing::debug!(actions = actions.len(), "workflow located");
		Ok(Self { dict, actions })
	}

	/// Number of actions.
	pub fn len(&self) -> usize {
		self.actions.len()
	}

	/// Return `true` when the workflow has no actions.
	pub fn is_empty(&self) -> bool {
		self.actions.is_empty()
	}
}

fn parse_action(idx: usize, item: &Value) -> Result<Action<'_>> {
	let dict = item
		.as_dict()
		.ok_or_else(|| ShortcutError::workflow(format!("action {} is {}, expected dict", idx + 1, item.kind())))?;

	let identifier = match dict.get(IDENTIFIER_KEY) {
		None => UNKNOWN_ACTION,
		Some(value) => value.as_str().ok_or_else(|| {
			ShortcutError::workflow(format!("action {} identifier is {}, expected string", idx + 1, value.kind()))
		})?,
	};

	let parameters = match dict.get(PARAMETERS_KEY) {
		None => None,
		Some(value) => Some(value.as_dict().ok_or_else(|| {
			ShortcutError::workflow(format!("action {} parameters are {}, expected dict", idx + 1, value.kind()))
		})?),
	};

	Ok(Action { identifier, parameters })
}

/// Render the numbered action listing for a decoded workflow root.
///
/// Each action gets an `=== Action {n}: {identifier} ===` header followed by
/// one `key: value` line per parameter. Blocks are separated by a blank line.
pub fn render_action_list(root: &Value) -> Result<String> {
	let workflow = Workflow::from_value(root)?;
	let mut out = String::new();

	for (idx, action) in workflow.actions.iter().enumerate() {
		if idx > 0 {
			out.push('\n');
		}
		let _ = writeln!(out, "=== Action {}: {} ===", idx + 1, action.identifier);
		if let Some(parameters) = action.parameters {
			for (key, value) in parameters.iter() {
				let _ = writeln!(out, "{key}: {}", summarize(value));
			}
		}
	}

	Ok(out)
}

/// One-line rendering of a parameter value.
///
/// Scalars print directly; containers collapse to a count, except token
/// strings (`{"Value": {"string": ...}}`) which show their text.
pub fn summarize(value: &Value) -> String {
	match value {
		Value::Null => "null".to_owned(),
		Value::Bool(v) => v.to_string(),
		Value::Integer(v) => v.to_string(),
		Value::Real(v) => v.to_string(),
		Value::Date(v) => format_date(*v),
		Value::String(v) => single_line(v),
		Value::Bytes(v) => format!("bytes[{}]", v.len()),
		Value::ObjectRef(v) => format!("uid({v})"),
		Value::Array(items) => format!("[... {} items]", items.len()),
		Value::Dict(dict) => match token_text(dict) {
			Some(text) => single_line(text),
			None => format!("{{ ... {} keys }}", dict.len()),
		},
	}
}

fn token_text(dict: &Dict) -> Option<&str> {
	dict.get("Value")?.get("string")?.as_str()
}

fn single_line(text: &str) -> String {
	text.replace('\r', "\\r").replace('\n', "\\n")
}
