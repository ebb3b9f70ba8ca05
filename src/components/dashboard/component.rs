//! Leptos component wiring the filter bar to the highlight resolver.
//!
//! The component restores selections from the URL on mount, recomputes
//! highlights on every filter change and writes the new selections back to
//! the URL. Highlighted entities are listed in a legend with their shading.

use leptos::prelude::*;

use crate::filters::{ALL, FilterConfig, FilterDimension, FilterValue};
use crate::index::LookupIndices;
use crate::model::Dataset;

use super::state::DashboardState;
use super::theme::HighlightTheme;
use super::url_sync;

fn sync_url(state: RwSignal<DashboardState>) {
	state.with_untracked(|s| url_sync::write_query_pairs(&s.config().keys(), &s.query_pairs()));
}

/// Filter bar plus highlight legend for a loaded dataset.
///
/// Lookup indices are built once here; every filter change re-runs the
/// resolver against them.
#[component]
pub fn Dashboard(
	dataset: Dataset,
	config: FilterConfig,
	#[prop(optional)] theme: Option<HighlightTheme>,
) -> impl IntoView {
	let keys = config.keys();
	let mut initial = DashboardState::new(LookupIndices::from_dataset(dataset), config);
	initial.restore(url_sync::read_query_pairs(&keys));
	let state = RwSignal::new(initial);
	let theme = theme.unwrap_or_default();

	let (inputs, countries, organizations) = state.with_untracked(|s| {
		let indices = s.indices();
		let inputs: Vec<(String, String)> = indices
			.input_options()
			.into_iter()
			.map(|id| {
				let name = indices.display_name(&id).to_string();
				(id, name)
			})
			.collect();
		(inputs, indices.country_options(), indices.organization_options())
	});

	let on_input_change = move |ev: leptos::ev::Event| {
		let value = event_target_value(&ev);
		state.update(|s| s.select(FilterDimension::InputResource, FilterValue::Single(value)));
		sync_url(state);
	};

	let on_concentration_change = move |ev: leptos::ev::Event| {
		let checked = event_target_checked(&ev);
		state.update(|s| s.select(FilterDimension::Concentration, FilterValue::Flag(checked)));
		sync_url(state);
	};

	let on_clear = move |_: leptos::ev::MouseEvent| {
		state.update(|s| s.clear());
		sync_url(state);
	};

	view! {
		<div class="dashboard">
			<div class="filter-bar">
				<label class="input-filter">
					"Inputs"
					<select
						on:change=on_input_change
						prop:value=move || state.with(|s| s.single_value(FilterDimension::InputResource))
					>
						<option value=ALL>{ALL}</option>
						{inputs
							.into_iter()
							.map(|(id, name)| view! { <option value=id>{name}</option> })
							.collect_view()}
					</select>
				</label>
				<EntityChecklist
					state=state
					dimension=FilterDimension::Country
					label="Countries"
					options=countries
				/>
				<EntityChecklist
					state=state
					dimension=FilterDimension::Organization
					label="Organizations"
					options=organizations
				/>
				<label class="concentration-filter">
					<input
						type="checkbox"
						prop:checked=move || state.with(|s| s.flag(FilterDimension::Concentration))
						on:change=on_concentration_change
					/>
					"Concentrated supply"
				</label>
				<button class="clear" on:click=on_clear>
					"Clear"
				</button>
			</div>
			<HighlightLegend state=state theme=theme />
		</div>
	}
}

/// Checkbox list for a multi-valued dimension, with `All` first.
#[component]
fn EntityChecklist(
	state: RwSignal<DashboardState>,
	dimension: FilterDimension,
	label: &'static str,
	options: Vec<String>,
) -> impl IntoView {
	let entries = std::iter::once(ALL.to_string()).chain(options);

	view! {
		<fieldset class="entity-filter">
			<legend>{label}</legend>
			{entries
				.map(move |entity| {
					let checked_entity = entity.clone();
					let toggled_entity = entity.clone();
					view! {
						<label>
							<input
								type="checkbox"
								prop:checked=move || state.with(|s| s.is_selected(dimension, &checked_entity))
								on:change=move |ev| {
									let checked = event_target_checked(&ev);
									state.update(|s| s.toggle(dimension, &toggled_entity, checked));
									sync_url(state);
								}
							/>
							{entity}
						</label>
					}
				})
				.collect_view()}
		</fieldset>
	}
}

/// Highlighted entities, strongest first, with their shading color.
#[component]
fn HighlightLegend(state: RwSignal<DashboardState>, theme: HighlightTheme) -> impl IntoView {
	view! {
		<section class="highlight-legend">
			<p class="highlight-mode">
				"Mode: " {move || state.with(|s| s.highlights().mode.label())}
			</p>
			<table>
				<tbody>
					{move || {
						state
							.with(|s| s.legend_rows(&theme))
							.into_iter()
							.map(|row| {
								view! {
									<tr>
										<td>
											<span
												class="swatch"
												style=format!("background-color: {}", row.color)
											></span>
										</td>
										<td title=row.id>{row.name}</td>
										<td>{format!("{:.0}", row.intensity)}</td>
									</tr>
								}
							})
							.collect_view()
					}}
				</tbody>
			</table>
		</section>
	}
}
