//! Reshaping of column-major match results for display, export and
//! external-viewer links.

use std::time::Duration;

use serde_json::{Value, json};
use url::form_urlencoded;

use super::error::ExportError;
use super::model::{ResultMetadata, ResultsByColumn, Visualization};

/// Leading character the executor prefixes to segment ids.
pub const SEGMENT_SENTINEL: char = 'n';
/// Link target when a result row has nowhere to point.
pub const DEAD_LINK: &str = "#";

const DEFAULT_EXPORT_STEM: &str = "motif-studio";

/// Row-major view of a result set, capped for interactive display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultTable {
	/// Motif node ids in the executor's column order.
	pub header: Vec<String>,
	/// At most `cap` rows.
	pub rows: Vec<Vec<String>>,
	/// Rows available before capping.
	pub total_rows: usize,
}

impl ResultTable {
	/// Some rows were left out by the cap.
	pub fn is_truncated(&self) -> bool {
		self.rows.len() < self.total_rows
	}
}

/// Column names, one per motif node.
pub fn header(results: &ResultsByColumn) -> Vec<String> {
	results.keys().cloned().collect()
}

/// Number of complete matches. Columns of unequal length truncate to the shortest.
pub fn row_count(results: &ResultsByColumn) -> usize {
	results.values().map(|column| column.len()).min().unwrap_or(0)
}

/// Zips the columns, in column order, into rows.
pub fn rows(results: &ResultsByColumn) -> impl Iterator<Item = Vec<String>> + '_ {
	let mut columns: Vec<_> = results.values().map(|column| column.values()).collect();
	let count = row_count(results);
	(0..count).map(move |_| {
		columns
			.iter_mut()
			.filter_map(|values| values.next().map(|id| id.to_string()))
			.collect()
	})
}

/// Row-major table of at most `cap` rows.
pub fn build_table(results: &ResultsByColumn, cap: usize) -> ResultTable {
	ResultTable {
		header: header(results),
		rows: rows(results).take(cap).collect(),
		total_rows: row_count(results),
	}
}

/// `"N results in S seconds."`
pub fn summary(results: &ResultsByColumn, duration: Duration) -> String {
	format!(
		"{} results in {} seconds.",
		row_count(results),
		duration.as_millis() as f64 / 1000.0
	)
}

/// Downloadable delimited-text document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
	/// Suggested download name.
	pub filename: String,
	/// CSV text.
	pub contents: String,
}

/// Builds the CSV export: one header row plus every match, uncapped.
pub fn export_csv(results: &ResultsByColumn, dataset: Option<&str>) -> Result<ExportArtifact, ExportError> {
	let mut writer = csv::WriterBuilder::new()
		.terminator(csv::Terminator::Any(b'\n'))
		.from_writer(Vec::new());
	writer.write_record(header(results))?;
	for row in rows(results) {
		writer.write_record(&row)?;
	}
	let bytes = writer.into_inner().map_err(|e| ExportError::Csv(e.to_string()))?;
	let contents = String::from_utf8(bytes).map_err(|e| ExportError::Encoding(e.to_string()))?;
	Ok(ExportArtifact {
		filename: export_filename(dataset),
		contents,
	})
}

/// Export file name derived from the dataset uri, with path separators removed.
pub fn export_filename(dataset: Option<&str>) -> String {
	let stem: String = dataset
		.unwrap_or_default()
		.split(['/', '\\', ':'])
		.filter(|part| !part.is_empty())
		.collect::<Vec<_>>()
		.join("_");
	if stem.is_empty() {
		format!("{DEFAULT_EXPORT_STEM}-results.csv")
	} else {
		format!("{stem}-results.csv")
	}
}

/// Removes one leading [`SEGMENT_SENTINEL`], if present.
pub fn strip_sentinel(id: &str) -> &str {
	id.strip_prefix(SEGMENT_SENTINEL).unwrap_or(id)
}

/// Link for one result row: a viewer URL when visualization channels are
/// known, else the dataset website, else [`DEAD_LINK`].
pub fn row_link(row: &[String], metadata: &ResultMetadata, viewer_base: &str) -> String {
	match (&metadata.visualization, &metadata.website) {
		(Some(visualization), _) => {
			let segments: Vec<&str> = row.iter().map(|id| strip_sentinel(id)).collect();
			viewer_url(viewer_base, visualization, &segments)
		}
		(None, Some(website)) => website.clone(),
		(None, None) => DEAD_LINK.to_owned(),
	}
}

/// Builds the external viewer URL with `segments` selected.
pub fn viewer_url(base: &str, visualization: &Visualization, segments: &[&str]) -> String {
	let segmentation_source = match &visualization.mesh {
		Some(mesh) => json!([visualization.segmentation, mesh]),
		None => json!(visualization.segmentation),
	};
	let mut layers = Vec::new();
	if let Some(image) = &visualization.image {
		layers.push(json!({ "type": "image", "source": image, "name": "image" }));
	}
	layers.push(json!({
		"type": "segmentation",
		"source": segmentation_source,
		"segments": segments,
		"name": "segmentation",
	}));
	let state: Value = json!({ "layers": layers, "layout": "3d" });

	let encoded: String = form_urlencoded::byte_serialize(state.to_string().as_bytes()).collect();
	format!("{base}#!{encoded}")
}
