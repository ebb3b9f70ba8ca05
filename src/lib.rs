//! supply-chain-explorer: filter-driven highlighting of supply-chain graphs.
//!
//! The core is pure and I/O-free: [`build_input_index`] derives lookup indices
//! from a [`Dataset`], and [`resolve_highlights`] turns the current
//! [`FilterSelections`] into a [`HighlightMap`]. The [`App`] component wraps
//! that core in a WASM dashboard that reads its data from the page.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::HtmlScriptElement;

pub mod components;
pub mod error;
pub mod filters;
pub mod highlight;
pub mod index;
pub mod model;
pub mod query;

pub use components::dashboard::{Dashboard, DashboardState, HighlightTheme};
pub use error::DatasetError;
pub use filters::{
	ALL, AggregationPolicy, DimensionSpec, FilterConfig, FilterDimension, FilterSelections,
	FilterValue, ProvisionSource, normalize_multi_selection, toggle_multi_value,
};
pub use highlight::{HighlightMap, HighlightMode, HighlightScale, active_dimension, resolve_highlights};
pub use index::{InputIndex, LookupIndices, build_input_index};
pub use model::{Dataset, Node, NodeType, ShareDescriptor};
pub use query::{from_query_pairs, to_query_pairs};

/// Element holding the dataset JSON.
const DATASET_ELEMENT: &str = "supply-chain-data";
/// Optional element holding a [`FilterConfig`] JSON override.
const CONFIG_ELEMENT: &str = "filter-config";

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("supply-chain-explorer: logging initialized");
}

/// Text content of the `<script>` element with `id`.
fn script_text(id: &'static str) -> Result<String, DatasetError> {
	let element = web_sys::window()
		.and_then(|w| w.document())
		.and_then(|d| d.get_element_by_id(id))
		.ok_or(DatasetError::MissingElement(id))?;
	let script: HtmlScriptElement = element
		.dyn_into()
		.map_err(|_| DatasetError::MissingElement(id))?;
	script.text().map_err(|_| DatasetError::MissingElement(id))
}

/// Load the dataset from a script element with id="supply-chain-data".
/// Expected format: JSON with { nodes, country_provision, organization_provision, concentration }
fn load_dataset() -> Option<Dataset> {
	match script_text(DATASET_ELEMENT).and_then(|json| Dataset::from_json(&json)) {
		Ok(dataset) => {
			info!(
				"supply-chain-explorer: loaded {} nodes, {} countries, {} organizations",
				dataset.nodes.len(),
				dataset.country_provision.len(),
				dataset.organization_provision.len()
			);
			Some(dataset)
		}
		Err(e) => {
			warn!("supply-chain-explorer: failed to load dataset: {}", e);
			None
		}
	}
}

/// Load a filter configuration override, if the page provides one.
fn load_filter_config() -> Option<FilterConfig> {
	let json = script_text(CONFIG_ELEMENT).ok()?;
	match FilterConfig::from_json(&json) {
		Ok(config) => Some(config),
		Err(e) => {
			warn!("supply-chain-explorer: ignoring filter config: {}", e);
			None
		}
	}
}

/// Main application component.
/// Loads the dataset from the DOM and renders the filter dashboard.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let dataset = load_dataset().unwrap_or_default();
	let config = load_filter_config().unwrap_or_default();

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Supply Chain Explorer" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<main class="explorer">
			<h1>"Supply Chain Explorer"</h1>
			<p class="subtitle">"Pick an input, countries, organizations, or concentrated supply to highlight the graph."</p>
			<Dashboard dataset=dataset config=config />
		</main>
	}
}
