//! Supply-chain dataset structures loaded once per page.
//!
//! Everything here is immutable reference data: the node metadata list, the
//! country and organization provision tables, and the per-node supplier
//! concentration counts. Deserialization is permissive so a slightly
//! malformed dataset still loads.

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::DatasetError;

/// Identifier of a graph node (material, tool, process, ...).
pub type NodeId = String;

/// Identifier of a provision-table entity (country or organization).
pub type EntityId = String;

/// Kind of node in the supply-chain graph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
	/// A raw or intermediate material.
	Material,
	/// A piece of equipment or software tool.
	Tool,
	/// A production step consuming materials and tools.
	Process,
	/// A country node.
	Country,
	/// An organization node.
	Organization,
	/// Anything the explorer does not know about.
	#[default]
	#[serde(other)]
	Other,
}

/// A node of the supply-chain graph.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Node {
	/// Unique identifier, referenced by process inputs and provision tables.
	/// Empty when the record has none; such nodes are ignored by the indices.
	#[serde(default, deserialize_with = "lenient_string")]
	pub id: NodeId,
	/// Node classification.
	#[serde(rename = "type", default)]
	pub node_type: NodeType,
	/// Human-readable name shown in filter options.
	#[serde(default, deserialize_with = "lenient_string")]
	pub name: String,
	/// Material inputs (only meaningful for processes).
	#[serde(default, deserialize_with = "lenient_ids")]
	pub materials: Vec<NodeId>,
	/// Tool inputs (only meaningful for processes).
	#[serde(default, deserialize_with = "lenient_ids")]
	pub tools: Vec<NodeId>,
}

/// A string field, or empty for `null` and non-string values.
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
	let value = serde_json::Value::deserialize(deserializer)?;
	Ok(value.as_str().map(str::to_string).unwrap_or_default())
}

/// A list of ids, keeping only its string entries. `null` and non-lists are empty.
fn lenient_ids<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<NodeId>, D::Error> {
	let value = serde_json::Value::deserialize(deserializer)?;
	let ids = match value {
		serde_json::Value::Array(items) => items
			.into_iter()
			.filter_map(|item| match item {
				serde_json::Value::String(id) => Some(id),
				_ => None,
			})
			.collect(),
		_ => Vec::new(),
	};
	Ok(ids)
}

/// Node records, skipping any that are not node-shaped objects.
fn lenient_nodes<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Node>, D::Error> {
	let value = serde_json::Value::deserialize(deserializer)?;
	let serde_json::Value::Array(items) = value else {
		return Ok(Vec::new());
	};
	let nodes = items
		.into_iter()
		.filter_map(|item| match serde_json::from_value::<Node>(item) {
			Ok(node) => Some(node),
			Err(e) => {
				debug!("skipping malformed node: {e}");
				None
			}
		})
		.collect();
	Ok(nodes)
}

/// Concentration counts, skipping entries that are not non-negative integers.
fn lenient_counts<'de, D: Deserializer<'de>>(
	deserializer: D,
) -> Result<ConcentrationTable, D::Error> {
	let value = serde_json::Value::deserialize(deserializer)?;
	let serde_json::Value::Object(entries) = value else {
		return Ok(ConcentrationTable::new());
	};
	let counts = entries
		.into_iter()
		.filter_map(|(node, count)| {
			let count = count.as_u64().and_then(|c| u32::try_from(c).ok());
			if count.is_none() {
				debug!("skipping concentration entry for {node}");
			}
			count.map(|c| (node, c))
		})
		.collect();
	Ok(counts)
}

impl Node {
	/// Material and tool inputs, in declaration order.
	pub fn inputs(&self) -> impl Iterator<Item = &NodeId> {
		self.materials.iter().chain(self.tools.iter())
	}
}

/// Numeric values assigned to qualitative provision labels.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct QualitativeAnchors {
	/// Value contributed by a `Major` label.
	pub major: f64,
	/// Value contributed by a `Minor` label.
	pub minor: f64,
}

impl Default for QualitativeAnchors {
	fn default() -> Self {
		Self {
			major: 80.0,
			minor: 0.0,
		}
	}
}

/// Share of a node provided by one entity.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ShareDescriptor {
	/// Market share as a percentage.
	Percent(f64),
	/// Qualitative label (`Major`, `Minor`) or a number stored as text.
	Label(String),
	/// Any other JSON value; never contributes.
	Unrecognized(serde_json::Value),
}

impl ShareDescriptor {
	/// Numeric contribution of this share, or `None` when it should be skipped.
	pub fn intensity(&self, anchors: &QualitativeAnchors) -> Option<f64> {
		match self {
			ShareDescriptor::Percent(p) if p.is_finite() => Some(*p),
			ShareDescriptor::Percent(_) => None,
			ShareDescriptor::Label(label) => match label.trim() {
				"Major" => Some(anchors.major),
				"Minor" => Some(anchors.minor),
				other => other.parse::<f64>().ok().filter(|v| v.is_finite()),
			},
			ShareDescriptor::Unrecognized(_) => None,
		}
	}
}

/// Entity id -> (node id -> share) mapping.
pub type ProvisionTable = BTreeMap<EntityId, BTreeMap<NodeId, ShareDescriptor>>;

/// Node id -> number of countries supplying it.
pub type ConcentrationTable = BTreeMap<NodeId, u32>;

/// Complete dataset handed over by the data loader.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Dataset {
	/// Node metadata.
	#[serde(deserialize_with = "lenient_nodes")]
	pub nodes: Vec<Node>,
	/// Country provision shares.
	pub country_provision: ProvisionTable,
	/// Organization provision shares.
	pub organization_provision: ProvisionTable,
	/// Supplier-country counts per node.
	#[serde(deserialize_with = "lenient_counts")]
	pub concentration: ConcentrationTable,
}

impl Dataset {
	/// Parse a dataset from its JSON representation.
	pub fn from_json(json: &str) -> Result<Self, DatasetError> {
		let dataset: Dataset = serde_json::from_str(json)?;
		Ok(dataset)
	}
}
