//! Data exchanged between the editor core, the remote services and the
//! rendering surface.
//!
//! Payload shapes follow the service's JSON: graphs arrive in node-link form,
//! result sets arrive column-major keyed by motif node id.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Identifier of a motif or host-graph node.
///
/// The services emit ids as either JSON strings or numbers; both normalise to
/// the textual form.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
	/// The id as text.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for NodeId {
	fn from(value: &str) -> Self {
		Self(value.to_owned())
	}
}

impl<'de> Deserialize<'de> for NodeId {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		#[derive(Deserialize)]
		#[serde(untagged)]
		enum Repr {
			Text(String),
			Number(serde_json::Number),
		}

		Ok(match Repr::deserialize(deserializer)? {
			Repr::Text(text) => Self(text),
			Repr::Number(number) => Self(number.to_string()),
		})
	}
}

/// Attribute constraints attached to a node or edge, e.g.
/// `{"size": {">": [10]}}`.
pub type Constraints = Map<String, Value>;

/// A motif vertex.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MotifNode {
	/// Motif-local node name.
	pub id: NodeId,
	/// Attribute constraints, opaque to the editor.
	#[serde(default)]
	pub constraints: Constraints,
}

/// A motif edge. `exists == false` marks a forbidden edge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotifLink {
	/// Tail node.
	pub source: NodeId,
	/// Head node.
	pub target: NodeId,
	/// `false` marks a forbidden edge.
	#[serde(default = "edge_exists_default")]
	pub exists: bool,
	/// Attribute constraints on the edge.
	#[serde(default)]
	pub constraints: Constraints,
}

fn edge_exists_default() -> bool {
	true
}

/// Parsed structure of a motif. Replaced wholesale on every successful parse.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphModel {
	/// Motif nodes.
	#[serde(default)]
	pub nodes: Vec<MotifNode>,
	/// Motif edges. May reference ids missing from `nodes`.
	#[serde(default)]
	pub links: Vec<MotifLink>,
}

/// Human-readable parse diagnostics. The parser may send one message or a list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationError(pub Vec<String>);

impl ValidationError {
	/// One entry per reported problem.
	pub fn messages(&self) -> &[String] {
		&self.0
	}
}

impl fmt::Display for ValidationError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0.join("\n"))
	}
}

impl<'de> Deserialize<'de> for ValidationError {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		#[derive(Deserialize)]
		#[serde(untagged)]
		enum Repr {
			One(String),
			Many(Vec<String>),
		}

		Ok(match Repr::deserialize(deserializer)? {
			Repr::One(message) => Self(vec![message]),
			Repr::Many(messages) => Self(messages),
		})
	}
}

/// A queryable host graph.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetDescriptor {
	/// Identifier passed back on execute.
	pub uri: String,
	/// Display name.
	pub name: String,
}

/// Orthogonal execution flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOptions {
	/// Report matches that differ only by a motif automorphism.
	pub allow_automorphisms: bool,
	/// Match edges regardless of direction.
	pub ignore_direction: bool,
}

/// One result column: zero-based row index to matched host node.
pub type ResultColumn = BTreeMap<u64, NodeId>;

/// Column-major result set keyed by motif node id, in the order the
/// executor sent the columns.
pub type ResultsByColumn = IndexMap<String, ResultColumn>;

/// Channel identifiers for an external volumetric viewer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visualization {
	/// Image layer source.
	#[serde(default)]
	pub image: Option<String>,
	/// Segmentation layer source.
	pub segmentation: String,
	/// Mesh source shown alongside the segmentation.
	#[serde(default)]
	pub mesh: Option<String>,
}

/// Opaque linking hints passed through from the executor.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultMetadata {
	/// Viewer channels, when the host has them.
	#[serde(default)]
	pub visualization: Option<Visualization>,
	/// Fallback page for result rows.
	#[serde(default)]
	pub website: Option<String>,
	/// Anything else the executor sent.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

/// Outcome of a successful execution.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExecutionResult {
	/// Matches, one column per motif node.
	pub results_by_column: ResultsByColumn,
	/// Linking hints for the rows.
	pub metadata: ResultMetadata,
}

/// A named pattern snapshot in the persistent store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedPattern {
	/// Unique snapshot name.
	pub name: String,
	/// Saved pattern source.
	pub motif_text: String,
	/// When the snapshot was taken.
	pub saved_date: DateTime<Utc>,
}

/// `POST /parse` body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ParseRequest {
	/// Pattern source.
	pub motif: String,
}

/// `POST /parse` reply.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ParseReply {
	/// Parsed graph, absent when the text is invalid.
	#[serde(default)]
	pub motif: Option<GraphModel>,
	/// Why the text is invalid.
	#[serde(default)]
	pub error: Option<ValidationError>,
}

/// `POST /execute` body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteRequest {
	/// Pattern source.
	pub motif: String,
	/// Dataset uri.
	#[serde(rename = "hostID")]
	pub host_id: String,
	/// See [`SearchOptions::allow_automorphisms`].
	pub allow_automorphisms: bool,
	/// See [`SearchOptions::ignore_direction`].
	pub ignore_direction: bool,
}

/// `POST /execute` reply.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ExecuteReply {
	/// Graph the executor searched for.
	#[serde(default)]
	pub motif: Option<GraphModel>,
	/// Column-major matches.
	#[serde(default)]
	pub results: ResultsByColumn,
	/// Linking hints.
	#[serde(default)]
	pub metadata: Option<ResultMetadata>,
}

impl From<ExecuteReply> for ExecutionResult {
	fn from(reply: ExecuteReply) -> Self {
		Self {
			results_by_column: reply.results,
			metadata: reply.metadata.unwrap_or_default(),
		}
	}
}

/// `GET /hosts` reply.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct HostsReply {
	/// Available host graphs.
	#[serde(default)]
	pub hosts: Vec<DatasetDescriptor>,
}

/// `POST /hosts/upload/{filename}` reply.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct UploadReply {
	/// Uri of the stored host graph.
	pub uri: String,
}
