//! Pure projection of a parsed motif into what the canvas draws.

use serde_json::Value;

use super::model::{Constraints, GraphModel, NodeId};

/// Lightness shared by every node fill.
const NODE_LIGHTNESS: f64 = 0.7;
/// Saturation steps picked by the constraint hash.
const NODE_SATURATIONS: [f64; 3] = [0.35, 0.5, 0.65];

/// Stroke style of a motif edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeStroke {
	/// Required edge.
	Solid,
	/// Forbidden edge.
	Dashed,
}

/// A node as drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderNode {
	/// Motif node id.
	pub id: NodeId,
	/// Caption drawn with the node.
	pub label: String,
	/// `#rrggbb` fill derived from the node's constraints.
	pub color: String,
}

/// An edge as drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderLink {
	/// Tail node.
	pub source: NodeId,
	/// Head node.
	pub target: NodeId,
	/// Solid when required, dashed when forbidden.
	pub stroke: EdgeStroke,
}

/// Drawable form of a [`GraphModel`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderableGraph {
	/// Drawable nodes.
	pub nodes: Vec<RenderNode>,
	/// Drawable edges, dangling ones removed.
	pub links: Vec<RenderLink>,
}

impl RenderableGraph {
	/// No nodes to draw.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}

/// Projects a motif graph for rendering.
///
/// Links whose endpoints are not declared nodes are skipped.
pub fn project(graph: &GraphModel) -> RenderableGraph {
	let nodes: Vec<RenderNode> = graph
		.nodes
		.iter()
		.map(|node| RenderNode {
			id: node.id.clone(),
			label: node.id.to_string(),
			color: constraint_color(&node.constraints),
		})
		.collect();

	let known = |id: &NodeId| nodes.iter().any(|n| &n.id == id);
	let links = graph
		.links
		.iter()
		.filter(|link| known(&link.source) && known(&link.target))
		.map(|link| RenderLink {
			source: link.source.clone(),
			target: link.target.clone(),
			stroke: if link.exists {
				EdgeStroke::Solid
			} else {
				EdgeStroke::Dashed
			},
		})
		.collect();

	RenderableGraph { nodes, links }
}

/// Fill colour for a constraint set. Equal constraints give equal colours
/// regardless of which node carries them.
pub fn constraint_color(constraints: &Constraints) -> String {
	// serde_json maps are key-sorted, so equal sets serialize identically.
	let serialized = serde_json::to_string(constraints).unwrap_or_default();
	let mut hash = fnv1a(serialized.as_bytes());

	let hue = (hash % 359) as f64;
	hash /= 360;
	let saturation = NODE_SATURATIONS[(hash % NODE_SATURATIONS.len() as u64) as usize];
	hsl_to_hex(hue, saturation, NODE_LIGHTNESS)
}

fn fnv1a(bytes: &[u8]) -> u64 {
	bytes.iter().fold(0xcbf2_9ce4_8422_2325, |hash, &byte| {
		(hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
	})
}

fn hsl_to_hex(hue: f64, saturation: f64, lightness: f64) -> String {
	let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
	let sector = hue / 60.0;
	let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
	let (r, g, b) = match sector as u32 {
		0 => (chroma, x, 0.0),
		1 => (x, chroma, 0.0),
		2 => (0.0, chroma, x),
		3 => (0.0, x, chroma),
		4 => (x, 0.0, chroma),
		_ => (chroma, 0.0, x),
	};
	let m = lightness - chroma / 2.0;
	let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
	format!("#{:02x}{:02x}{:02x}", channel(r), channel(g), channel(b))
}

/// One `attribute operator value` line of a constraint listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintRow {
	/// Constrained attribute.
	pub attribute: String,
	/// Comparison, empty for a bare value.
	pub operator: String,
	/// Compared value.
	pub value: String,
}

/// Constraints of one node (`A`) or edge (`A→B`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintGroup {
	/// Node id or `source→target`.
	pub label: String,
	/// One row per comparison.
	pub rows: Vec<ConstraintRow>,
}

/// Constraint listing of a whole motif.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstraintListing {
	/// Constrained nodes.
	pub nodes: Vec<ConstraintGroup>,
	/// Constrained edges.
	pub links: Vec<ConstraintGroup>,
}

/// Flattens node and edge constraints for the build view. Unconstrained
/// nodes and edges are left out.
pub fn constraint_listing(graph: &GraphModel) -> ConstraintListing {
	let nodes = graph
		.nodes
		.iter()
		.filter_map(|node| group(node.id.to_string(), &node.constraints))
		.collect();
	let links = graph
		.links
		.iter()
		.filter_map(|link| group(format!("{}→{}", link.source, link.target), &link.constraints))
		.collect();
	ConstraintListing { nodes, links }
}

fn group(label: String, constraints: &Constraints) -> Option<ConstraintGroup> {
	let rows = constraint_rows(constraints);
	(!rows.is_empty()).then_some(ConstraintGroup { label, rows })
}

fn constraint_rows(constraints: &Constraints) -> Vec<ConstraintRow> {
	let mut rows = Vec::new();
	for (attribute, condition) in constraints {
		let Value::Object(operators) = condition else {
			rows.push(ConstraintRow {
				attribute: attribute.clone(),
				operator: String::new(),
				value: display_value(condition),
			});
			continue;
		};
		for (operator, values) in operators {
			let values = match values {
				Value::Array(items) => items.iter().collect(),
				single => vec![single],
			};
			rows.extend(values.into_iter().map(|value| ConstraintRow {
				attribute: attribute.clone(),
				operator: operator.clone(),
				value: display_value(value),
			}));
		}
	}
	rows
}

fn display_value(value: &Value) -> String {
	match value {
		Value::String(text) => text.clone(),
		other => other.to_string(),
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use serde_json::json;

	use super::*;
	use crate::studio::model::{MotifLink, MotifNode};

	fn constraints(value: Value) -> Constraints {
		match value {
			Value::Object(map) => map,
			_ => unreachable!(),
		}
	}

	fn sample() -> GraphModel {
		GraphModel {
			nodes: vec![
				MotifNode {
					id: "A".into(),
					constraints: constraints(json!({"size": {">": [10]}})),
				},
				MotifNode {
					id: "B".into(),
					constraints: constraints(json!({"size": {">": [10]}})),
				},
				MotifNode {
					id: "C".into(),
					constraints: Constraints::new(),
				},
			],
			links: vec![
				MotifLink {
					source: "A".into(),
					target: "B".into(),
					exists: true,
					constraints: Constraints::new(),
				},
				MotifLink {
					source: "B".into(),
					target: "C".into(),
					exists: false,
					constraints: constraints(json!({"weight": {"<": [3, 4]}})),
				},
			],
		}
	}

	#[test]
	fn color_follows_constraints_not_ids() {
		let projected = project(&sample());

		assert_eq!(projected.nodes[0].color, projected.nodes[1].color);
		assert_ne!(projected.nodes[0].color, projected.nodes[2].color);
		assert_eq!(projected.nodes[2].color, constraint_color(&Constraints::new()));
		assert!(projected.nodes[0].color.starts_with('#') && projected.nodes[0].color.len() == 7);
	}

	#[test]
	fn forbidden_edges_are_dashed() {
		let strokes: Vec<EdgeStroke> = project(&sample()).links.iter().map(|l| l.stroke).collect();
		assert_eq!(strokes, [EdgeStroke::Solid, EdgeStroke::Dashed]);
	}

	#[test]
	fn projection_is_idempotent() {
		let graph = sample();
		assert_eq!(project(&graph), project(&graph));
	}

	#[test]
	fn dangling_links_are_skipped() {
		let mut graph = sample();
		graph.links.push(MotifLink {
			source: "A".into(),
			target: "Z".into(),
			exists: true,
			constraints: Constraints::new(),
		});

		assert_eq!(project(&graph).links.len(), 2);
	}

	#[test]
	fn listing_flattens_operator_values() {
		let listing = constraint_listing(&sample());

		assert_eq!(listing.nodes.len(), 2);
		assert_eq!(listing.links.len(), 1);
		assert_eq!(listing.links[0].label, "B→C");
		assert_eq!(
			listing.links[0].rows,
			vec![
				ConstraintRow {
					attribute: "weight".into(),
					operator: "<".into(),
					value: "3".into(),
				},
				ConstraintRow {
					attribute: "weight".into(),
					operator: "<".into(),
					value: "4".into(),
				},
			]
		);
	}
}
