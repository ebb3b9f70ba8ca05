//! Mirrors selections into the page URL so they survive a reload.

use log::warn;
use wasm_bindgen::JsValue;
use web_sys::UrlSearchParams;

fn current_params() -> Option<UrlSearchParams> {
	let window = web_sys::window()?;
	let search = window.location().search().ok()?;
	UrlSearchParams::new_with_str(&search).ok()
}

/// Read the values of `keys` from the current query string.
pub fn read_query_pairs(keys: &[&str]) -> Vec<(String, String)> {
	let Some(params) = current_params() else {
		return Vec::new();
	};
	keys.iter()
		.filter_map(|key| params.get(key).map(|value| (key.to_string(), value)))
		.collect()
}

/// Replace the values of `keys` in the URL with `pairs`, leaving other parameters alone.
pub fn write_query_pairs(keys: &[&str], pairs: &[(String, String)]) {
	let (Some(window), Some(params)) = (web_sys::window(), current_params()) else {
		return;
	};
	for key in keys {
		params.delete(key);
	}
	for (key, value) in pairs {
		params.set(key, value);
	}

	let query: js_sys::JsString = params.to_string();
	let query = String::from(query);
	let path = window.location().pathname().unwrap_or_default();
	let url = if query.is_empty() {
		path
	} else {
		format!("{path}?{query}")
	};

	let replaced = window
		.history()
		.and_then(|history| history.replace_state_with_url(&JsValue::NULL, "", Some(&url)));
	if let Err(e) = replaced {
		warn!("supply-chain-explorer: failed to update URL: {:?}", e);
	}
}
