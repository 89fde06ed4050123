//! Shareable address state.
//!
//! The pattern text and dataset uri round-trip through the query string of
//! the page address. Other query parameters are left alone.

use std::cell::RefCell;

use url::form_urlencoded;

/// Query parameter carrying the pattern text.
pub const TEXT_PARAM: &str = "mS";
/// Query parameter carrying the dataset uri.
pub const DATASET_PARAM: &str = "hostID";

/// Editor fields mirrored in the address. `None` means "not present" when
/// decoding and "leave untouched" when encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationState {
	/// Pattern text (`mS`).
	pub text: Option<String>,
	/// Dataset uri (`hostID`).
	pub dataset: Option<String>,
}

/// Reads the editor fields from a query string, with or without the leading `?`.
pub fn decode(query: &str) -> LocationState {
	let mut state = LocationState::default();
	for (key, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
		let value = Some(value.into_owned()).filter(|v| !v.is_empty());
		match key.as_ref() {
			TEXT_PARAM => state.text = value.map(unescape_legacy),
			DATASET_PARAM => state.dataset = value,
			_ => {}
		}
	}
	state
}

/// Links written by earlier releases escaped the pattern twice. A value with
/// no whitespace that still carries `%XX` escapes is decoded once more.
fn unescape_legacy(value: String) -> String {
	let escaped = value
		.as_bytes()
		.windows(3)
		.any(|w| w[0] == b'%' && w[1].is_ascii_hexdigit() && w[2].is_ascii_hexdigit());
	if !escaped || value.contains(char::is_whitespace) || value.contains(['+', '&', '=']) {
		return value;
	}
	// With no `&`, `=` or `+` left, the whole value parses as a single key.
	form_urlencoded::parse(value.as_bytes())
		.next()
		.map(|(decoded, _)| decoded.into_owned())
		.unwrap_or(value)
}

/// Writes the present fields of `state` into `query`, keeping parameter
/// order and any unrelated parameters. Returns the query without `?`.
pub fn encode_into(query: &str, state: &LocationState) -> String {
	let mut pairs: Vec<(String, String)> = form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
		.into_owned()
		.collect();

	let updates = [(TEXT_PARAM, &state.text), (DATASET_PARAM, &state.dataset)];
	for (key, value) in updates {
		let Some(value) = value else { continue };
		match pairs.iter_mut().find(|(k, _)| k == key) {
			Some(pair) => pair.1 = value.clone(),
			None => pairs.push((key.to_owned(), value.clone())),
		}
	}

	form_urlencoded::Serializer::new(String::new())
		.extend_pairs(pairs)
		.finish()
}

/// In-app link to `path` carrying the editor fields, merged into
/// `current_query` so unrelated parameters survive navigation.
pub fn route_href(path: &str, current_query: &str, state: &LocationState) -> String {
	let query = encode_into(current_query, state);
	if query.is_empty() {
		path.to_owned()
	} else {
		format!("{path}?{query}")
	}
}

/// The navigable address of the running page.
pub trait AddressBar {
	/// Current query string, `?` optional.
	fn query(&self) -> String;
	/// Replaces the query without adding a history entry.
	fn replace_query(&self, query: &str);
}

/// Address bar stand-in holding the query in memory.
#[derive(Debug, Default)]
pub struct MemoryAddressBar {
	query: RefCell<String>,
}

impl MemoryAddressBar {
	/// Bar preset to `query`.
	pub fn with_query(query: &str) -> Self {
		Self {
			query: RefCell::new(query.to_owned()),
		}
	}
}

impl AddressBar for MemoryAddressBar {
	fn query(&self) -> String {
		self.query.borrow().clone()
	}

	fn replace_query(&self, query: &str) {
		*self.query.borrow_mut() = query.to_owned();
	}
}

/// Restores the editor fields from the address.
pub fn restore(bar: &dyn AddressBar) -> LocationState {
	decode(&bar.query())
}

/// Mirrors `state` into the address.
pub fn publish(bar: &dyn AddressBar, state: &LocationState) {
	let query = encode_into(&bar.query(), state);
	bar.replace_query(&query);
}
