//! Lookup indices derived from the dataset.
//!
//! Built once per dataset load and shared read-only by every highlight
//! resolution afterwards.

use std::collections::{BTreeMap, BTreeSet};

use log::debug;

use crate::model::{ConcentrationTable, Dataset, EntityId, Node, NodeId, NodeType, ProvisionTable};

/// Input id -> set of process ids consuming it.
pub type InputIndex = BTreeMap<NodeId, BTreeSet<NodeId>>;

/// Provision bucket excluded from entity filter options.
const OTHER_ENTITY: &str = "Other";

/// Build the reverse index from process inputs to the processes consuming them.
///
/// Only `process` nodes with an id contribute. Empty input ids are skipped, and a process
/// listing the same input twice (or as both material and tool) is recorded once.
pub fn build_input_index(nodes: &[Node]) -> InputIndex {
	let mut index = InputIndex::new();
	let processes = nodes
		.iter()
		.filter(|n| n.node_type == NodeType::Process && !n.id.is_empty());
	for node in processes {
		for input in node.inputs().filter(|i| !i.is_empty()) {
			index
				.entry(input.clone())
				.or_default()
				.insert(node.id.clone());
		}
	}
	debug!("input index: {} inputs", index.len());
	index
}

/// Every table the resolver consults, bundled together.
#[derive(Clone, Debug, Default)]
pub struct LookupIndices {
	/// Input -> consuming processes.
	pub input_index: InputIndex,
	/// Country provision shares.
	pub country_provision: ProvisionTable,
	/// Organization provision shares.
	pub organization_provision: ProvisionTable,
	/// Supplier-country counts per node.
	pub concentration: ConcentrationTable,
	names: BTreeMap<NodeId, String>,
}

impl LookupIndices {
	/// Derive all indices from a freshly loaded dataset.
	pub fn from_dataset(dataset: Dataset) -> Self {
		let input_index = build_input_index(&dataset.nodes);
		let names = dataset
			.nodes
			.into_iter()
			.filter(|n| !n.id.is_empty() && !n.name.is_empty())
			.map(|n| (n.id, n.name))
			.collect();

		Self {
			input_index,
			country_provision: dataset.country_provision,
			organization_provision: dataset.organization_provision,
			concentration: dataset.concentration,
			names,
		}
	}

	/// Display name for a node, falling back to its id.
	pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
		self.names.get(id).map(String::as_str).unwrap_or(id)
	}

	/// Input ids usable by the single-input filter, sorted by display name.
	pub fn input_options(&self) -> Vec<NodeId> {
		let mut options: Vec<NodeId> = self.input_index.keys().cloned().collect();
		options.sort_by(|a, b| {
			self.display_name(a)
				.cmp(self.display_name(b))
				.then_with(|| a.cmp(b))
		});
		options
	}

	/// Countries offered by the country filter.
	pub fn country_options(&self) -> Vec<EntityId> {
		entity_options(&self.country_provision)
	}

	/// Organizations offered by the organization filter.
	pub fn organization_options(&self) -> Vec<EntityId> {
		entity_options(&self.organization_provision)
	}
}

fn entity_options(table: &ProvisionTable) -> Vec<EntityId> {
	table
		.keys()
		.filter(|k| k.as_str() != OTHER_ENTITY)
		.cloned()
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn node(id: &str, node_type: NodeType, name: &str, materials: &[&str], tools: &[&str]) -> Node {
		Node {
			id: id.into(),
			node_type,
			name: name.into(),
			materials: materials.iter().map(|s| s.to_string()).collect(),
			tools: tools.iter().map(|s| s.to_string()).collect(),
		}
	}

	#[test]
	fn processes_sharing_an_input_accumulate() {
		let nodes = vec![
			node("P1", NodeType::Process, "Deposition", &["M1", "M2"], &["T1"]),
			node("P2", NodeType::Process, "Etch", &["M1"], &["T1", "T1"]),
			node("M1", NodeType::Material, "Silicon", &[], &[]),
		];
		let index = build_input_index(&nodes);
		assert_eq!(index.len(), 3);
		assert_eq!(
			index["M1"].iter().cloned().collect::<Vec<_>>(),
			vec!["P1".to_string(), "P2".to_string()]
		);
		assert_eq!(index["M2"].len(), 1);
		assert_eq!(index["T1"].len(), 2);
	}

	#[test]
	fn non_process_inputs_are_ignored() {
		let nodes = vec![
			node("M1", NodeType::Material, "Silicon", &["M9"], &["T9"]),
			node("P1", NodeType::Process, "Etch", &[""], &[]),
		];
		assert!(build_input_index(&nodes).is_empty());
	}

	#[test]
	fn id_less_processes_are_dropped() {
		let dataset = Dataset::from_json(
			r#"{"nodes": [
				{"type": "process", "name": "Anonymous", "materials": ["M1"]},
				{"id": "P1", "type": "process", "materials": null, "tools": ["T1"]}
			]}"#,
		)
		.unwrap();
		let indices = LookupIndices::from_dataset(dataset);
		assert!(!indices.input_index.contains_key("M1"));
		assert_eq!(indices.input_index["T1"].iter().collect::<Vec<_>>(), vec!["P1"]);
		assert_eq!(indices.display_name(""), "");
	}

	#[test]
	fn options_are_sorted_and_filtered() {
		let mut dataset = Dataset {
			nodes: vec![
				node("P1", NodeType::Process, "Etch", &["M1", "M2"], &[]),
				node("M1", NodeType::Material, "Wafer", &[], &[]),
				node("M2", NodeType::Material, "Argon", &[], &[]),
			],
			..Default::default()
		};
		for entity in ["USA", "Other", "China"] {
			dataset.country_provision.insert(entity.into(), Default::default());
		}
		let indices = LookupIndices::from_dataset(dataset);
		assert_eq!(indices.input_options(), vec!["M2", "M1"]);
		assert_eq!(indices.country_options(), vec!["China", "USA"]);
		assert_eq!(indices.display_name("M1"), "Wafer");
		assert_eq!(indices.display_name("missing"), "missing");
	}
}
