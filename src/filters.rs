//! Filter dimensions, user selections, and the declared priority order.
//!
//! Each [`FilterDimension`] carries the aggregation policy the resolver applies
//! when that dimension is the active one. The order of dimensions in
//! [`FilterConfig`] is the tie-break: when several dimensions differ from their
//! defaults, the last one declared wins.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::DatasetError;
use crate::highlight::HighlightScale;

/// Sentinel value meaning "no restriction" for single and multi-valued filters.
pub const ALL: &str = "All";

/// One axis of user-selectable criteria.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterDimension {
	/// A single material or tool, highlighted directly.
	InputResource,
	/// Countries, shaded by their summed provision share.
	Country,
	/// Organizations, shaded by their summed provision share.
	Organization,
	/// Toggle shading nodes supplied by few countries.
	Concentration,
}

/// Which provision table an additive dimension reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProvisionSource {
	/// Country provision table.
	Country,
	/// Organization provision table.
	Organization,
}

/// How the resolver turns an active dimension's value into highlights.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AggregationPolicy {
	/// The selected value itself is highlighted.
	Identity,
	/// Nodes are shaded by supplier-country count.
	Concentration,
	/// Shares of every selected entity are summed per node.
	Additive(ProvisionSource),
}

impl FilterDimension {
	/// Every dimension, in the default priority order.
	pub const DEFAULT_ORDER: [FilterDimension; 4] = [
		FilterDimension::InputResource,
		FilterDimension::Concentration,
		FilterDimension::Country,
		FilterDimension::Organization,
	];

	/// Query-string key for this dimension.
	pub fn key(self) -> &'static str {
		match self {
			FilterDimension::InputResource => "input-resource",
			FilterDimension::Country => "country",
			FilterDimension::Organization => "organization",
			FilterDimension::Concentration => "concentration",
		}
	}

	/// Inverse of [`FilterDimension::key`].
	pub fn from_key(key: &str) -> Option<Self> {
		Self::DEFAULT_ORDER.into_iter().find(|d| d.key() == key)
	}

	/// Aggregation applied when this dimension is active.
	pub fn policy(self) -> AggregationPolicy {
		match self {
			FilterDimension::InputResource => AggregationPolicy::Identity,
			FilterDimension::Country => AggregationPolicy::Additive(ProvisionSource::Country),
			FilterDimension::Organization => {
				AggregationPolicy::Additive(ProvisionSource::Organization)
			}
			FilterDimension::Concentration => AggregationPolicy::Concentration,
		}
	}

	/// Baseline value used when no configuration overrides it.
	pub fn default_value(self) -> FilterValue {
		match self {
			FilterDimension::InputResource => FilterValue::Single(ALL.to_string()),
			FilterDimension::Country | FilterDimension::Organization => {
				FilterValue::Multi(vec![ALL.to_string()])
			}
			FilterDimension::Concentration => FilterValue::Flag(false),
		}
	}
}

/// Current value of one filter dimension.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum FilterValue {
	/// Boolean toggle.
	Flag(bool),
	/// Single choice.
	Single(String),
	/// Multiple choices.
	Multi(Vec<String>),
}

impl FilterValue {
	/// Whether two values select the same thing. Multi values compare as sets.
	pub fn equivalent(&self, other: &FilterValue) -> bool {
		match (self, other) {
			(FilterValue::Multi(a), FilterValue::Multi(b)) => {
				a.iter().collect::<BTreeSet<_>>() == b.iter().collect::<BTreeSet<_>>()
			}
			_ => self == other,
		}
	}

	/// The named values, without duplicates. Flags name nothing.
	pub fn values(&self) -> BTreeSet<&str> {
		match self {
			FilterValue::Flag(_) => BTreeSet::new(),
			FilterValue::Single(v) => BTreeSet::from([v.as_str()]),
			FilterValue::Multi(vs) => vs.iter().map(String::as_str).collect(),
		}
	}

	/// True when a multi value mixes the `All` sentinel with concrete values.
	pub fn mixes_all(&self) -> bool {
		match self {
			FilterValue::Multi(vs) => vs.iter().any(|v| v == ALL) && vs.iter().any(|v| v != ALL),
			_ => false,
		}
	}
}

/// Apply the multi-select rule to a new raw selection.
///
/// Adding a concrete value while `All` is selected drops `All`; picking `All`
/// while concrete values are selected collapses to `All`. An empty selection
/// falls back to `All`. Duplicates and empty strings are removed.
pub fn normalize_multi_selection(previous: &[String], next: Vec<String>) -> Vec<String> {
	let mut seen = BTreeSet::new();
	let next: Vec<String> = next
		.into_iter()
		.filter(|v| !v.is_empty() && seen.insert(v.clone()))
		.collect();

	let has_all = next.iter().any(|v| v == ALL);
	let has_concrete = next.iter().any(|v| v != ALL);
	if next.is_empty() {
		return vec![ALL.to_string()];
	}
	if has_all && has_concrete {
		if previous.iter().any(|v| v == ALL) {
			return next.into_iter().filter(|v| v != ALL).collect();
		}
		return vec![ALL.to_string()];
	}
	next
}

/// Check or uncheck one entry of a multi-valued selection.
pub fn toggle_multi_value(current: &[String], value: &str, checked: bool) -> Vec<String> {
	let mut next = current.to_vec();
	if checked {
		if !next.iter().any(|v| v == value) {
			next.push(value.to_string());
		}
	} else {
		next.retain(|v| v != value);
	}
	normalize_multi_selection(current, next)
}

/// One value per filter dimension. Dimensions without an entry are at their default.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct FilterSelections {
	values: BTreeMap<FilterDimension, FilterValue>,
}

impl FilterSelections {
	/// Selections with every configured dimension at its default.
	pub fn defaults(config: &FilterConfig) -> Self {
		let values = config
			.dimensions
			.iter()
			.map(|spec| (spec.dimension, spec.default.clone()))
			.collect();
		Self { values }
	}

	/// Value currently held for `dimension`, if any.
	pub fn get(&self, dimension: FilterDimension) -> Option<&FilterValue> {
		self.values.get(&dimension)
	}

	/// Replace the value of `dimension`.
	pub fn set(&mut self, dimension: FilterDimension, value: FilterValue) {
		self.values.insert(dimension, value);
	}

	/// Builder-style [`FilterSelections::set`].
	pub fn with(mut self, dimension: FilterDimension, value: FilterValue) -> Self {
		self.set(dimension, value);
		self
	}
}

/// A declared dimension and its baseline value.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct DimensionSpec {
	/// The dimension.
	pub dimension: FilterDimension,
	/// Value meaning "this filter is not in use".
	pub default: FilterValue,
}

impl DimensionSpec {
	/// Spec using the dimension's built-in default.
	pub fn new(dimension: FilterDimension) -> Self {
		Self {
			dimension,
			default: dimension.default_value(),
		}
	}
}

/// Resolver configuration: dimension priority order and highlight anchors.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterConfig {
	/// Declared dimensions; later entries win ties.
	pub dimensions: Vec<DimensionSpec>,
	/// Numeric anchors used by the resolver.
	pub scale: HighlightScale,
}

impl Default for FilterConfig {
	fn default() -> Self {
		Self {
			dimensions: FilterDimension::DEFAULT_ORDER
				.into_iter()
				.map(DimensionSpec::new)
				.collect(),
			scale: HighlightScale::default(),
		}
	}
}

impl FilterConfig {
	/// Parse a configuration from JSON; missing fields take their defaults.
	pub fn from_json(json: &str) -> Result<Self, DatasetError> {
		let config: FilterConfig = serde_json::from_str(json)?;
		Ok(config)
	}

	/// Configuration declaring `order` with built-in defaults.
	pub fn with_order(order: &[FilterDimension]) -> Self {
		Self {
			dimensions: order.iter().copied().map(DimensionSpec::new).collect(),
			..Self::default()
		}
	}

	/// Spec of `dimension`, if declared.
	pub fn spec(&self, dimension: FilterDimension) -> Option<&DimensionSpec> {
		self.dimensions.iter().find(|s| s.dimension == dimension)
	}

	/// Declared default of `dimension`, or its built-in default.
	pub fn default_for(&self, dimension: FilterDimension) -> FilterValue {
		self.spec(dimension)
			.map(|s| s.default.clone())
			.unwrap_or_else(|| dimension.default_value())
	}

	/// Query-string keys of every declared dimension.
	pub fn keys(&self) -> Vec<&'static str> {
		self.dimensions.iter().map(|s| s.dimension.key()).collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn strings(values: &[&str]) -> Vec<String> {
		values.iter().map(|s| s.to_string()).collect()
	}

	#[test]
	fn adding_concrete_value_drops_all() {
		let next = normalize_multi_selection(&strings(&["All"]), strings(&["All", "USA"]));
		assert_eq!(next, strings(&["USA"]));
	}

	#[test]
	fn selecting_all_collapses() {
		let next = normalize_multi_selection(&strings(&["USA", "China"]), strings(&["USA", "China", "All"]));
		assert_eq!(next, strings(&["All"]));
	}

	#[test]
	fn empty_selection_falls_back_to_all() {
		assert_eq!(normalize_multi_selection(&strings(&["USA"]), Vec::new()), strings(&["All"]));
		assert_eq!(toggle_multi_value(&strings(&["USA"]), "USA", false), strings(&["All"]));
	}

	#[test]
	fn toggling_keeps_order_and_dedupes() {
		let current = strings(&["USA"]);
		assert_eq!(toggle_multi_value(&current, "China", true), strings(&["USA", "China"]));
		assert_eq!(toggle_multi_value(&current, "USA", true), strings(&["USA"]));
		assert_eq!(toggle_multi_value(&strings(&["All"]), "Japan", true), strings(&["Japan"]));
		assert_eq!(toggle_multi_value(&current, "All", true), strings(&["All"]));
	}

	#[test]
	fn multi_values_compare_as_sets() {
		let a = FilterValue::Multi(strings(&["USA", "China"]));
		let b = FilterValue::Multi(strings(&["China", "USA"]));
		assert!(a.equivalent(&b));
		assert!(!a.equivalent(&FilterDimension::Country.default_value()));
		assert!(FilterValue::Multi(strings(&["All", "USA"])).mixes_all());
	}

	#[test]
	fn keys_round_trip() {
		for dimension in FilterDimension::DEFAULT_ORDER {
			assert_eq!(FilterDimension::from_key(dimension.key()), Some(dimension));
		}
		assert_eq!(FilterDimension::from_key("material-resource"), None);
	}

	#[test]
	fn config_parses_partial_json() {
		let config = FilterConfig::from_json(
			r#"{"dimensions": [
				{"dimension": "organization", "default": ["All"]},
				{"dimension": "country", "default": ["All"]}
			]}"#,
		)
		.unwrap();
		assert_eq!(config.keys(), vec!["organization", "country"]);
		assert_eq!(config.scale, HighlightScale::default());
		assert_eq!(
			config.default_for(FilterDimension::Concentration),
			FilterValue::Flag(false)
		);
	}
}
