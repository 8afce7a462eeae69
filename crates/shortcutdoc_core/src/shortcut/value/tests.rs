use super::{Dict, Value, format_date};

#[test]
fn dict_preserves_insertion_order() {
	let dict: Dict = [("b", Value::Integer(1)), ("a", Value::Integer(2)), ("c", Value::Integer(3))].into_iter().collect();
	assert_eq!(dict.keys().collect::<Vec<_>>(), ["b", "a", "c"]);
	assert_eq!(dict.get("a"), Some(&Value::Integer(2)));
	assert_eq!(dict.get("missing"), None);
}

#[test]
fn dict_replace_keeps_first_position() {
	let mut dict = Dict::new();
	assert!(dict.insert("x".into(), Value::Integer(1)).is_none());
	assert!(dict.insert("y".into(), Value::Integer(2)).is_none());
	let previous = dict.insert("x".into(), Value::Integer(3));

	assert_eq!(previous, Some(Value::Integer(1)));
	assert_eq!(dict.len(), 2);
	let entries: Vec<_> = dict.iter().map(|(key, value)| (key.to_owned(), value.clone())).collect();
	assert_eq!(entries, [("x".to_owned(), Value::Integer(3)), ("y".to_owned(), Value::Integer(2))]);
}

#[test]
fn accessors_match_variant() {
	let value = Value::from(vec![Value::from("text"), Value::from(true)]);
	let items = value.as_array().expect("array");
	assert_eq!(items[0].as_str(), Some("text"));
	assert_eq!(items[1].as_bool(), Some(true));
	assert_eq!(items[1].as_integer(), None);
	assert_eq!(value.kind(), "array");
	assert!(value.get("key").is_none());
}

#[test]
fn clones_share_storage() {
	let value = Value::from(vec![Value::Null]);
	let copy = value.clone();
	assert!(value.shares_storage(&copy));
	assert!(!value.shares_storage(&Value::from(vec![Value::Null])));
}

#[test]
fn formats_reference_epoch() {
	assert_eq!(format_date(0.0), "2001-01-01T00:00:00Z");
	assert_eq!(format_date(-1.0), "2000-12-31T23:59:59Z");
	assert_eq!(format_date(59.9), "2001-01-01T00:00:59Z");
}

#[test]
fn formats_leap_day() {
	// 2024-02-29T12:34:56Z
	assert_eq!(format_date(730_902_896.0), "2024-02-29T12:34:56Z");
}
