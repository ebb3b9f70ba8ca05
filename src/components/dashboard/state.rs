//! Dashboard state and filter-change handling.
//!
//! Owns the current selections and the last resolved highlight map. Every
//! change goes through [`DashboardState::select`] so highlights never drift
//! from the selections they were computed for.

use crate::filters::{
	ALL, FilterConfig, FilterDimension, FilterSelections, FilterValue, normalize_multi_selection,
	toggle_multi_value,
};
use crate::highlight::{HighlightMap, resolve_highlights};
use crate::index::LookupIndices;
use crate::query::{from_query_pairs, to_query_pairs};

use super::theme::HighlightTheme;

/// One entry of the highlight legend.
#[derive(Clone, Debug, PartialEq)]
pub struct LegendRow {
	/// Node id the intensity belongs to.
	pub id: String,
	/// Display name, or the id when the node has none.
	pub name: String,
	/// Resolved highlight intensity.
	pub intensity: f64,
	/// CSS color from the active theme.
	pub color: String,
}

/// Selections, lookup data, and the highlights derived from them.
#[derive(Clone, Debug)]
pub struct DashboardState {
	indices: LookupIndices,
	config: FilterConfig,
	selections: FilterSelections,
	highlights: HighlightMap,
}

impl DashboardState {
	/// Start with every dimension at its default.
	pub fn new(indices: LookupIndices, config: FilterConfig) -> Self {
		let selections = FilterSelections::defaults(&config);
		let highlights = resolve_highlights(&selections, &config, &indices);
		Self {
			indices,
			config,
			selections,
			highlights,
		}
	}

	/// Lookup tables the highlights are resolved against.
	pub fn indices(&self) -> &LookupIndices {
		&self.indices
	}

	/// Declared dimensions and highlight scale.
	pub fn config(&self) -> &FilterConfig {
		&self.config
	}

	/// Current filter selections.
	pub fn selections(&self) -> &FilterSelections {
		&self.selections
	}

	/// Highlights for the current selections.
	pub fn highlights(&self) -> &HighlightMap {
		&self.highlights
	}

	/// Set one dimension and reset every other dimension to its default.
	///
	/// Only one filter is in use at a time from the dashboard; combinations
	/// can still arrive through [`DashboardState::restore`].
	pub fn select(&mut self, dimension: FilterDimension, value: FilterValue) {
		let value = match value {
			FilterValue::Multi(next) => {
				let previous = self.multi_value(dimension);
				FilterValue::Multi(normalize_multi_selection(&previous, next))
			}
			other => other,
		};
		let mut updated = FilterSelections::defaults(&self.config);
		updated.set(dimension, value);
		self.selections = updated;
		self.refresh();
	}

	/// Check or uncheck one entry of a multi-valued dimension.
	pub fn toggle(&mut self, dimension: FilterDimension, value: &str, checked: bool) {
		let current = self.multi_value(dimension);
		let next = toggle_multi_value(&current, value, checked);
		self.select(dimension, FilterValue::Multi(next));
	}

	/// Restore every dimension to its default.
	pub fn clear(&mut self) {
		self.selections = FilterSelections::defaults(&self.config);
		self.refresh();
	}

	/// Replace the selections with those encoded in query pairs.
	pub fn restore<I, K, V>(&mut self, pairs: I)
	where
		I: IntoIterator<Item = (K, V)>,
		K: AsRef<str>,
		V: AsRef<str>,
	{
		self.selections = from_query_pairs(pairs, &self.config);
		self.refresh();
	}

	/// Query pairs mirroring the current selections.
	pub fn query_pairs(&self) -> Vec<(String, String)> {
		to_query_pairs(&self.selections, &self.config)
	}

	/// Current single value of `dimension`, or `All`.
	pub fn single_value(&self, dimension: FilterDimension) -> String {
		match self.current(dimension) {
			FilterValue::Single(v) => v,
			_ => ALL.to_string(),
		}
	}

	/// Current flag value of `dimension`.
	pub fn flag(&self, dimension: FilterDimension) -> bool {
		matches!(self.current(dimension), FilterValue::Flag(true))
	}

	/// Whether `value` is part of the multi-valued selection of `dimension`.
	pub fn is_selected(&self, dimension: FilterDimension, value: &str) -> bool {
		self.multi_value(dimension).iter().any(|v| v == value)
	}

	/// Highlighted ids, strongest first.
	pub fn legend_rows(&self, theme: &HighlightTheme) -> Vec<LegendRow> {
		let mode = self.highlights.mode;
		let mut rows: Vec<LegendRow> = self
			.highlights
			.iter()
			.map(|(id, intensity)| LegendRow {
				id: id.to_string(),
				name: self.indices.display_name(id).to_string(),
				intensity,
				color: theme.color_for(mode, Some(intensity)).to_css(),
			})
			.collect();
		rows.sort_by(|a, b| b.intensity.total_cmp(&a.intensity).then_with(|| a.id.cmp(&b.id)));
		rows
	}

	fn current(&self, dimension: FilterDimension) -> FilterValue {
		self.selections
			.get(dimension)
			.cloned()
			.unwrap_or_else(|| self.config.default_for(dimension))
	}

	fn multi_value(&self, dimension: FilterDimension) -> Vec<String> {
		match self.current(dimension) {
			FilterValue::Multi(vs) => vs,
			_ => vec![ALL.to_string()],
		}
	}

	fn refresh(&mut self) {
		self.highlights = resolve_highlights(&self.selections, &self.config, &self.indices);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::highlight::HighlightMode;
	use crate::model::{Dataset, Node, NodeType, ShareDescriptor};

	fn state() -> DashboardState {
		let mut dataset = Dataset {
			nodes: vec![
				Node {
					id: "P1".into(),
					node_type: NodeType::Process,
					name: "Lithography".into(),
					materials: vec!["M1".into()],
					tools: vec!["T1".into()],
				},
				Node {
					id: "M1".into(),
					node_type: NodeType::Material,
					name: "Photoresist".into(),
					..Default::default()
				},
			],
			..Default::default()
		};
		dataset.country_provision.insert(
			"Japan".into(),
			[
				("M1".to_string(), ShareDescriptor::Percent(90.0)),
				("T1".to_string(), ShareDescriptor::Label("Minor".into())),
			]
			.into(),
		);
		dataset.country_provision.insert(
			"USA".into(),
			[("M1".to_string(), ShareDescriptor::Percent(5.0))].into(),
		);
		dataset.concentration.insert("M1".into(), 2);
		DashboardState::new(LookupIndices::from_dataset(dataset), FilterConfig::default())
	}

	#[test]
	fn selecting_resets_other_dimensions() {
		let mut state = state();
		state.select(FilterDimension::InputResource, FilterValue::Single("M1".into()));
		assert_eq!(state.highlights().mode, HighlightMode::Binary);

		state.toggle(FilterDimension::Country, "Japan", true);
		assert_eq!(state.single_value(FilterDimension::InputResource), ALL);
		assert!(state.is_selected(FilterDimension::Country, "Japan"));
		assert!(!state.is_selected(FilterDimension::Country, ALL));
		assert_eq!(state.highlights().get("M1"), Some(90.0));

		state.toggle(FilterDimension::Country, "USA", true);
		assert_eq!(state.highlights().get("M1"), Some(95.0));
		assert_eq!(state.query_pairs(), vec![("country".to_string(), "Japan,USA".to_string())]);
	}

	#[test]
	fn clear_and_restore() {
		let mut state = state();
		state.select(FilterDimension::Concentration, FilterValue::Flag(true));
		assert!(state.flag(FilterDimension::Concentration));
		assert_eq!(state.highlights().get("M1"), Some(41.0));

		let pairs = state.query_pairs();
		state.clear();
		assert!(state.query_pairs().is_empty());
		assert_eq!(state.highlights().get(ALL), Some(1.0));

		state.restore(pairs);
		assert!(state.flag(FilterDimension::Concentration));
	}

	#[test]
	fn legend_is_sorted_and_named() {
		let mut state = state();
		state.toggle(FilterDimension::Country, "Japan", true);
		let rows = state.legend_rows(&HighlightTheme::default());
		assert_eq!(rows.len(), 2);
		assert_eq!(rows[0].id, "M1");
		assert_eq!(rows[0].name, "Photoresist");
		assert_eq!(rows[1].id, "T1");
		assert_eq!(rows[1].name, "T1");
	}
}
