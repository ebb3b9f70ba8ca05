//! Filter-to-highlight resolution.
//!
//! [`resolve_highlights`] is a pure function of the current selections, the
//! configuration, and the lookup indices. It picks the single active filter
//! dimension and aggregates that dimension's lookup data into a
//! [`HighlightMap`] the renderer can shade from.
//!
//! Missing lookups never fail: they contribute nothing.

use std::collections::{BTreeMap, BTreeSet};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::filters::{
	ALL, AggregationPolicy, FilterConfig, FilterDimension, FilterSelections, FilterValue,
	ProvisionSource,
};
use crate::index::LookupIndices;
use crate::model::{ConcentrationTable, ProvisionTable, QualitativeAnchors};

/// How the renderer should interpret intensities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightMode {
	/// Present ids are highlighted, everything else is not.
	Binary,
	/// Intensities feed a continuous color scale.
	Gradient,
}

impl HighlightMode {
	/// Short human-readable label.
	pub fn label(self) -> &'static str {
		match self {
			HighlightMode::Binary => "binary",
			HighlightMode::Gradient => "gradient",
		}
	}
}

/// Node or entity id -> intensity, tagged with its mode.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct HighlightMap {
	/// Shading semantics.
	pub mode: HighlightMode,
	/// Intensity per id. Ids absent from the map are not highlighted.
	pub intensities: BTreeMap<String, f64>,
}

impl HighlightMap {
	/// An empty map in `mode`.
	pub fn empty(mode: HighlightMode) -> Self {
		Self {
			mode,
			intensities: BTreeMap::new(),
		}
	}

	/// Intensity of `id`, if highlighted.
	pub fn get(&self, id: &str) -> Option<f64> {
		self.intensities.get(id).copied()
	}

	/// Number of highlighted ids.
	pub fn len(&self) -> usize {
		self.intensities.len()
	}

	/// True when nothing is highlighted.
	pub fn is_empty(&self) -> bool {
		self.intensities.is_empty()
	}

	/// Highlighted ids with their intensities, in id order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
		self.intensities.iter().map(|(k, v)| (k.as_str(), *v))
	}
}

/// Numeric anchors used when converting lookup data into intensities.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct HighlightScale {
	/// Intensity assigned to the single-input selection.
	pub identity: f64,
	/// Intensity of nodes supplied by exactly one country.
	pub high_concentration: f64,
	/// Intensity of nodes supplied by two up to `medium_max_count` countries.
	pub medium_concentration: f64,
	/// Largest country count still considered concentrated.
	pub medium_max_count: u32,
	/// Values of qualitative provision labels.
	pub qualitative: QualitativeAnchors,
}

impl Default for HighlightScale {
	fn default() -> Self {
		Self {
			identity: 1.0,
			high_concentration: 81.0,
			medium_concentration: 41.0,
			medium_max_count: 3,
			qualitative: QualitativeAnchors::default(),
		}
	}
}

impl HighlightScale {
	/// Intensity for a node supplied by `count` countries, or `None` if not concentrated.
	pub fn concentration_intensity(&self, count: u32) -> Option<f64> {
		match count {
			1 => Some(self.high_concentration),
			c if c >= 2 && c <= self.medium_max_count => Some(self.medium_concentration),
			_ => None,
		}
	}
}

/// Find the dimension driving the highlights and its current value.
///
/// Walks the declared dimensions in order; the last one differing from its
/// default wins. With every dimension at its default the single-input
/// dimension is active.
pub fn active_dimension(
	selections: &FilterSelections,
	config: &FilterConfig,
) -> (FilterDimension, FilterValue) {
	let mut active = None;
	for spec in &config.dimensions {
		if let Some(value) = selections.get(spec.dimension) {
			if !value.equivalent(&spec.default) {
				active = Some((spec.dimension, value.clone()));
			}
		}
	}

	active.unwrap_or_else(|| {
		let dimension = FilterDimension::InputResource;
		let value = selections
			.get(dimension)
			.cloned()
			.unwrap_or_else(|| config.default_for(dimension));
		(dimension, value)
	})
}

/// Compute the highlight map for the current selections.
pub fn resolve_highlights(
	selections: &FilterSelections,
	config: &FilterConfig,
	indices: &LookupIndices,
) -> HighlightMap {
	let (dimension, value) = active_dimension(selections, config);
	debug!("resolving highlights for active dimension {}", dimension.key());

	let scale = &config.scale;
	match dimension.policy() {
		AggregationPolicy::Identity => identity_highlights(&value, scale),
		AggregationPolicy::Concentration => {
			concentration_highlights(&indices.concentration, scale)
		}
		AggregationPolicy::Additive(source) => {
			if value.mixes_all() {
				warn!(
					"{} selection mixes {ALL:?} with concrete values: {:?}",
					dimension.key(),
					value
				);
			}
			let table = match source {
				ProvisionSource::Country => &indices.country_provision,
				ProvisionSource::Organization => &indices.organization_provision,
			};
			// Selections are sets: a repeated entity is summed once.
			additive_highlights(table, &value.values(), scale)
		}
	}
}

fn identity_highlights(value: &FilterValue, scale: &HighlightScale) -> HighlightMap {
	let mut map = HighlightMap::empty(HighlightMode::Binary);
	for selected in value.values() {
		map.intensities.insert(selected.to_string(), scale.identity);
	}
	map
}

fn concentration_highlights(table: &ConcentrationTable, scale: &HighlightScale) -> HighlightMap {
	let intensities = table
		.iter()
		.filter_map(|(node, &count)| {
			scale
				.concentration_intensity(count)
				.map(|i| (node.clone(), i))
		})
		.collect();
	HighlightMap {
		mode: HighlightMode::Gradient,
		intensities,
	}
}

fn additive_highlights(
	table: &ProvisionTable,
	selected: &BTreeSet<&str>,
	scale: &HighlightScale,
) -> HighlightMap {
	let mut map = HighlightMap::empty(HighlightMode::Gradient);
	for entity in selected.iter().filter(|v| **v != ALL) {
		let Some(shares) = table.get(*entity) else {
			debug!("no provision data for {entity}");
			continue;
		};
		for (node, share) in shares {
			if let Some(v) = share.intensity(&scale.qualitative) {
				*map.intensities.entry(node.clone()).or_insert(0.0) += v;
			}
		}
	}
	map
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::ShareDescriptor;

	fn multi(values: &[&str]) -> FilterValue {
		FilterValue::Multi(values.iter().map(|s| s.to_string()).collect())
	}

	fn indices() -> LookupIndices {
		let mut indices = LookupIndices::default();
		indices.concentration = [("A", 1), ("B", 2), ("C", 4), ("D", 3), ("E", 0)]
			.into_iter()
			.map(|(k, v)| (k.to_string(), v))
			.collect();
		let usa = [
			("A", ShareDescriptor::Percent(40.0)),
			("B", ShareDescriptor::Label("Major".into())),
		];
		let china = [
			("A", ShareDescriptor::Percent(25.0)),
			("C", ShareDescriptor::Label("Minor".into())),
			("D", ShareDescriptor::Label("unknown".into())),
		];
		for (entity, shares) in [("USA", &usa[..]), ("China", &china[..])] {
			indices.country_provision.insert(
				entity.into(),
				shares.iter().map(|(k, v)| (k.to_string(), v.clone())).collect(),
			);
		}
		indices.organization_provision.insert(
			"Acme".into(),
			[("B".to_string(), ShareDescriptor::Percent(10.0))].into(),
		);
		indices
	}

	#[test]
	fn defaults_resolve_to_identity_all() {
		let config = FilterConfig::default();
		let map = resolve_highlights(&FilterSelections::defaults(&config), &config, &indices());
		assert_eq!(map.mode, HighlightMode::Binary);
		assert_eq!(map.get(ALL), Some(1.0));
		assert_eq!(map.len(), 1);
	}

	#[test]
	fn single_input_is_identity() {
		let config = FilterConfig::default();
		let selections = FilterSelections::defaults(&config).with(
			FilterDimension::InputResource,
			FilterValue::Single("M7".into()),
		);
		let map = resolve_highlights(&selections, &config, &indices());
		assert_eq!(map.mode, HighlightMode::Binary);
		assert_eq!(map.iter().collect::<Vec<_>>(), vec![("M7", 1.0)]);
	}

	#[test]
	fn concentration_buckets() {
		let config = FilterConfig::default();
		let selections = FilterSelections::defaults(&config)
			.with(FilterDimension::Concentration, FilterValue::Flag(true));
		let map = resolve_highlights(&selections, &config, &indices());
		assert_eq!(map.mode, HighlightMode::Gradient);
		assert_eq!(map.get("A"), Some(81.0));
		assert_eq!(map.get("B"), Some(41.0));
		assert_eq!(map.get("D"), Some(41.0));
		assert_eq!(map.get("C"), None);
		assert_eq!(map.get("E"), None);
	}

	#[test]
	fn countries_sum_shares() {
		let config = FilterConfig::default();
		let selections = FilterSelections::defaults(&config)
			.with(FilterDimension::Country, multi(&["USA", "China"]));
		let map = resolve_highlights(&selections, &config, &indices());
		assert_eq!(map.mode, HighlightMode::Gradient);
		assert_eq!(map.get("A"), Some(65.0));
		assert_eq!(map.get("B"), Some(80.0));
		assert_eq!(map.get("C"), Some(0.0));
		assert_eq!(map.get("D"), None);
	}

	#[test]
	fn all_mixed_with_a_country_sums_only_the_country() {
		let config = FilterConfig::default();
		let resolve = |countries: &[&str]| {
			let selections = FilterSelections::defaults(&config)
				.with(FilterDimension::Country, multi(countries));
			resolve_highlights(&selections, &config, &indices())
		};
		let mixed = resolve(&["All", "USA"]);
		assert_eq!(mixed.mode, HighlightMode::Gradient);
		assert_eq!(mixed, resolve(&["USA"]));
		assert_eq!(mixed.get("A"), Some(40.0));
		assert_eq!(mixed.get("C"), None);
	}

	#[test]
	fn unknown_entity_contributes_nothing() {
		let config = FilterConfig::default();
		let selections = FilterSelections::defaults(&config)
			.with(FilterDimension::Organization, multi(&["Nobody"]));
		let map = resolve_highlights(&selections, &config, &indices());
		assert_eq!(map, HighlightMap::empty(HighlightMode::Gradient));
	}

	#[test]
	fn later_declared_dimension_wins() {
		let config = FilterConfig::default();
		let both = FilterSelections::defaults(&config)
			.with(FilterDimension::Country, multi(&["USA"]))
			.with(FilterDimension::Organization, multi(&["Acme"]));
		let (dimension, _) = active_dimension(&both, &config);
		assert_eq!(dimension, FilterDimension::Organization);

		let reversed = FilterConfig::with_order(&[
			FilterDimension::InputResource,
			FilterDimension::Organization,
			FilterDimension::Country,
		]);
		let (dimension, _) = active_dimension(&both, &reversed);
		assert_eq!(dimension, FilterDimension::Country);
	}

	#[test]
	fn undeclared_dimensions_are_ignored() {
		let config = FilterConfig::with_order(&[FilterDimension::InputResource]);
		let selections = FilterSelections::default()
			.with(FilterDimension::Concentration, FilterValue::Flag(true));
		let map = resolve_highlights(&selections, &config, &indices());
		assert_eq!(map.mode, HighlightMode::Binary);
		assert_eq!(map.get(ALL), Some(1.0));
	}
}
