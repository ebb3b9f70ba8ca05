//! Error types for loading explorer inputs.
//!
//! Highlight resolution itself never fails; only turning raw JSON into a
//! dataset or a filter configuration can.

use thiserror::Error;

/// Errors raised while loading the dataset or the filter configuration.
#[derive(Debug, Error)]
pub enum DatasetError {
	/// The JSON payload could not be parsed into the expected shape.
	#[error("failed to parse JSON: {0}")]
	Parse(#[from] serde_json::Error),
	/// The page does not contain the expected data element.
	#[error("missing data element #{0}")]
	MissingElement(&'static str),
}
