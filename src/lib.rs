//! org-flow: interactive org-chart editor for the browser.
//!
//! Departments are laid out on a pannable, zoomable diagram and connected by
//! animated reporting lines. A side panel creates departments, roles and
//! employees, edits the selected department, tints the background and keeps
//! an editable shortcut reference.

use std::sync::Arc;

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod chart;
pub mod components;

use chart::color::{DEFAULT_BACKGROUND, background_gradient, grid_color};
use chart::seed::{ChartSeed, SeedError, sample_chart, sample_shortcuts};
use chart::{Chart, ChartStore, Shortcut};
pub use components::ChartHandle;
pub use components::org_flow::OrgFlow;
use components::sidebar::Sidebar;

/// Id of the optional `<script type="application/json">` chart seed.
pub const CHART_DATA_ID: &str = "chart-data";

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("org-flow: logging initialized");
}

/// Reads the chart seed embedded in the page.
/// Expected format: JSON with optional `departments`, `connections` and
/// `shortcuts` arrays.
pub fn load_chart_seed() -> Result<ChartSeed, SeedError> {
	let window: Window = web_sys::window().ok_or(SeedError::Missing("window"))?;
	let script: HtmlScriptElement = window
		.document()
		.and_then(|document| document.get_element_by_id(CHART_DATA_ID))
		.and_then(|element| element.dyn_into().ok())
		.ok_or(SeedError::Missing(CHART_DATA_ID))?;
	let json_text = script.text().map_err(|_| SeedError::Missing(CHART_DATA_ID))?;
	ChartSeed::from_json(&json_text)
}

/// Chart and shortcuts to start from: the seed when usable, the built-in
/// sample otherwise.
fn initial_state(seed: Result<ChartSeed, SeedError>) -> (Chart, Vec<Arc<Shortcut>>) {
	match seed {
		Ok(seed) => {
			let (chart, shortcuts) = seed.into_parts();
			info!(
				"org-flow: loaded {} departments, {} connections",
				chart.departments.len(),
				chart.connections.len()
			);
			(chart, shortcuts)
		}
		Err(SeedError::Missing(what)) => {
			info!("org-flow: no {what} seed, using sample chart");
			(sample_chart(), sample_shortcuts())
		}
		Err(e) => {
			warn!("org-flow: {e}, using sample chart");
			(sample_chart(), sample_shortcuts())
		}
	}
}

/// Main application component.
/// Owns the chart store and lays out the side panel next to the diagram.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let (initial_chart, shortcuts) = initial_state(load_chart_seed());
	let chart = ChartHandle::new(ChartStore::new(initial_chart, shortcuts));
	let background = RwSignal::new(DEFAULT_BACKGROUND.to_string());
	let show_shortcuts = RwSignal::new(true);

	let gradient = Memo::new(move |_| background.with(|base| background_gradient(base)));
	let grid = Memo::new(move |_| background.with(|base| grid_color(base)));

	view! {
		<Html attr:lang="it" attr:dir="ltr" />
		<Title text="Organigramma" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="app">
			<Sidebar chart=chart background=background show_shortcuts=show_shortcuts />
			<main class="canvas" style:background=move || gradient.get()>
				<OrgFlow chart=chart grid_color=grid />
			</main>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn missing_seed_uses_sample() {
		let (chart, shortcuts) = initial_state(Err(SeedError::Missing(CHART_DATA_ID)));
		assert_eq!(chart, sample_chart());
		assert_eq!(shortcuts.len(), 4);
	}

	#[test]
	fn broken_seed_uses_sample() {
		let (chart, _) = initial_state(ChartSeed::from_json("{\"departments\": 7}"));
		assert_eq!(chart.departments.len(), 3);
	}

	#[test]
	fn seed_replaces_sample() {
		let json = r##"{
			"departments": [
				{"id": "hr", "name": "HR", "color": "#10b981", "size": 3.0,
				 "roles": [], "position": {"x": 0, "y": 0}}
			],
			"shortcuts": []
		}"##;
		let (chart, shortcuts) = initial_state(ChartSeed::from_json(json));
		assert_eq!(chart.departments.len(), 1);
		assert_eq!(chart.departments[0].size, 1.6);
		assert!(chart.connections.is_empty());
		assert!(shortcuts.is_empty());
	}
}
