//! Browser-backed implementations of the core's storage and address seams.

use js_sys::{Array, Uint8Array};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, File, HtmlAnchorElement, Storage, Url};

use crate::studio::error::StoreError;
use crate::studio::location::AddressBar;
use crate::studio::results::ExportArtifact;
use crate::studio::store::KeyValueBackend;

fn describe(err: JsValue) -> String {
	err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

/// `window.localStorage`.
pub struct LocalStorageBackend {
	storage: Storage,
}

impl LocalStorageBackend {
	/// `None` when the page has no local storage (e.g. disabled by the user).
	pub fn open() -> Option<Self> {
		let storage = web_sys::window()?.local_storage().ok()??;
		Some(Self { storage })
	}
}

impl KeyValueBackend for LocalStorageBackend {
	fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
		self.storage
			.get_item(key)
			.map_err(|e| StoreError::Backend(describe(e)))
	}

	fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
		self.storage
			.set_item(key, value)
			.map_err(|e| StoreError::Backend(describe(e)))
	}

	fn remove(&self, key: &str) -> Result<(), StoreError> {
		self.storage
			.remove_item(key)
			.map_err(|e| StoreError::Backend(describe(e)))
	}
}

/// The page address, rewritten in place through `history.replaceState`.
pub struct BrowserAddressBar;

impl AddressBar for BrowserAddressBar {
	fn query(&self) -> String {
		web_sys::window()
			.and_then(|w| w.location().search().ok())
			.unwrap_or_default()
	}

	fn replace_query(&self, query: &str) {
		let Some(window) = web_sys::window() else {
			return;
		};
		let location = window.location();
		let path = location.pathname().unwrap_or_default();
		let hash = location.hash().unwrap_or_default();
		let target = if query.is_empty() {
			format!("{path}{hash}")
		} else {
			format!("{path}?{query}{hash}")
		};
		let replaced = window
			.history()
			.and_then(|history| history.replace_state_with_url(&JsValue::NULL, "", Some(&target)));
		if let Err(err) = replaced {
			log::warn!("could not update the address: {}", describe(err));
		}
	}
}

/// Reads a user-picked file into memory.
pub async fn read_file(file: &File) -> Result<Vec<u8>, String> {
	let buffer = JsFuture::from(file.array_buffer()).await.map_err(describe)?;
	Ok(Uint8Array::new(&buffer).to_vec())
}

/// Offers `artifact` to the user as a file download.
pub fn download(artifact: &ExportArtifact) -> Result<(), String> {
	let document = web_sys::window()
		.and_then(|w| w.document())
		.ok_or_else(|| "no document".to_owned())?;

	let parts = Array::of1(&JsValue::from_str(&artifact.contents));
	let options = BlobPropertyBag::new();
	options.set_type("text/csv;charset=utf-8");
	let blob = Blob::new_with_str_sequence_and_options(&parts, &options).map_err(describe)?;
	let href = Url::create_object_url_with_blob(&blob).map_err(describe)?;

	let anchor: HtmlAnchorElement = document
		.create_element("a")
		.map_err(describe)?
		.dyn_into()
		.map_err(|_| "anchor element has unexpected type".to_owned())?;
	anchor.set_href(&href);
	anchor.set_download(&artifact.filename);
	anchor.click();

	Url::revoke_object_url(&href).map_err(describe)
}
