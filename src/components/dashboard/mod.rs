//! Browser dashboard for exploring supply-chain highlights.
//!
//! Provides:
//! - A filter bar with one control per filter dimension
//! - Highlight recomputation on every filter change
//! - Query-string persistence of the current selections
//! - A legend listing highlighted entities with their shading
//!
//! # Example
//!
//! ```ignore
//! use supply_chain_explorer::{Dashboard, Dataset, FilterConfig};
//!
//! let dataset = Dataset::from_json(json)?;
//! view! { <Dashboard dataset=dataset config=FilterConfig::default() /> }
//! ```

mod component;
mod state;
pub mod theme;
mod url_sync;

pub use component::Dashboard;
pub use state::{DashboardState, LegendRow};
pub use theme::HighlightTheme;
