//! Query-string layout for persisting selections across page reloads.
//!
//! One key per declared dimension. Values equal to their default are omitted,
//! multi values are comma-joined and flags are written as `true`/`false`.
//! Inside a multi value, `,` and `\` are escaped with a backslash so ids
//! containing commas survive; plain ids are written as-is.
//! Percent-encoding is left to whoever owns the URL.

use log::warn;

use crate::filters::{FilterConfig, FilterDimension, FilterSelections, FilterValue, normalize_multi_selection};

/// Serialize non-default selections into ordered query pairs.
pub fn to_query_pairs(selections: &FilterSelections, config: &FilterConfig) -> Vec<(String, String)> {
	config
		.dimensions
		.iter()
		.filter_map(|spec| {
			let value = selections.get(spec.dimension)?;
			if value.equivalent(&spec.default) {
				return None;
			}
			let encoded = encode_value(value);
			(!encoded.is_empty()).then(|| (spec.dimension.key().to_string(), encoded))
		})
		.collect()
}

/// Rebuild selections from query pairs. Unknown keys and empty values are ignored.
pub fn from_query_pairs<I, K, V>(pairs: I, config: &FilterConfig) -> FilterSelections
where
	I: IntoIterator<Item = (K, V)>,
	K: AsRef<str>,
	V: AsRef<str>,
{
	let mut selections = FilterSelections::defaults(config);
	for (key, raw) in pairs {
		let (key, raw) = (key.as_ref(), raw.as_ref());
		if raw.is_empty() {
			continue;
		}
		let Some(spec) = FilterDimension::from_key(key).and_then(|d| config.spec(d)) else {
			continue;
		};
		match decode_value(&spec.default, raw) {
			Some(value) => selections.set(spec.dimension, value),
			None => warn!("ignoring unparseable value {raw:?} for {key}"),
		}
	}
	selections
}

const SEPARATOR: char = ',';
const ESCAPE: char = '\\';

fn encode_value(value: &FilterValue) -> String {
	match value {
		FilterValue::Flag(b) => b.to_string(),
		FilterValue::Single(v) => v.clone(),
		FilterValue::Multi(vs) => vs
			.iter()
			.map(|v| escape_item(v))
			.collect::<Vec<_>>()
			.join(","),
	}
}

fn escape_item(item: &str) -> String {
	let mut escaped = String::with_capacity(item.len());
	for c in item.chars() {
		if c == ESCAPE || c == SEPARATOR {
			escaped.push(ESCAPE);
		}
		escaped.push(c);
	}
	escaped
}

/// Split a multi value on unescaped separators, unescaping each item.
fn split_items(raw: &str) -> Vec<String> {
	let mut items = Vec::new();
	let mut current = String::new();
	let mut chars = raw.chars();
	while let Some(c) = chars.next() {
		match c {
			ESCAPE => current.push(chars.next().unwrap_or(ESCAPE)),
			SEPARATOR => items.push(std::mem::take(&mut current)),
			other => current.push(other),
		}
	}
	items.push(current);
	items
}

/// Parse `raw` into a value shaped like `default`.
fn decode_value(default: &FilterValue, raw: &str) -> Option<FilterValue> {
	match default {
		FilterValue::Flag(_) => raw.parse().ok().map(FilterValue::Flag),
		FilterValue::Single(_) => Some(FilterValue::Single(raw.to_string())),
		FilterValue::Multi(_) => Some(FilterValue::Multi(normalize_multi_selection(
			&[],
			split_items(raw),
		))),
	}
}
