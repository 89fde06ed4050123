//! Named pattern snapshots kept in a key-value backend.
//!
//! All snapshots live in one JSON dictionary under a configurable root key;
//! the last edited text lives under its own key.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use super::error::StoreError;
use super::model::SavedPattern;

/// String key-value storage, e.g. browser local storage.
pub trait KeyValueBackend {
	fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
	fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
	fn remove(&self, key: &str) -> Result<(), StoreError>;
}

impl<B: KeyValueBackend + ?Sized> KeyValueBackend for Rc<B> {
	fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
		(**self).get(key)
	}

	fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
		(**self).set(key, value)
	}

	fn remove(&self, key: &str) -> Result<(), StoreError> {
		(**self).remove(key)
	}
}

/// In-process backend for tests and storage-less environments.
#[derive(Debug, Default)]
pub struct MemoryBackend {
	entries: RefCell<HashMap<String, String>>,
}

impl MemoryBackend {
	/// Raw value stored under `key`.
	pub fn raw(&self, key: &str) -> Option<String> {
		self.entries.borrow().get(key).cloned()
	}
}

impl KeyValueBackend for MemoryBackend {
	fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
		Ok(self.entries.borrow().get(key).cloned())
	}

	fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
		self.entries.borrow_mut().insert(key.to_owned(), value.to_owned());
		Ok(())
	}

	fn remove(&self, key: &str) -> Result<(), StoreError> {
		self.entries.borrow_mut().remove(key);
		Ok(())
	}
}

type Dictionary = BTreeMap<String, SavedPattern>;

/// Save/load/delete of [`SavedPattern`]s keyed by name. Saving an existing
/// name replaces it.
pub struct PatternStore<B> {
	backend: B,
	root_key: String,
	last_text_key: String,
}

impl<B: KeyValueBackend> PatternStore<B> {
	/// Store keeping snapshots under `root_key` and the last text under `last_text_key`.
	pub fn new(backend: B, root_key: impl Into<String>, last_text_key: impl Into<String>) -> Self {
		Self {
			backend,
			root_key: root_key.into(),
			last_text_key: last_text_key.into(),
		}
	}

	/// Saves `pattern`, replacing any snapshot of the same name.
	pub fn save(&self, pattern: SavedPattern) -> Result<(), StoreError> {
		let mut dictionary = self.read()?;
		dictionary.insert(pattern.name.clone(), pattern);
		self.write(&dictionary)
	}

	/// Snapshot called `name`.
	pub fn load(&self, name: &str) -> Result<SavedPattern, StoreError> {
		self.read()?
			.remove(name)
			.ok_or_else(|| StoreError::Miss(name.to_owned()))
	}

	/// Removes and returns the snapshot.
	pub fn delete(&self, name: &str) -> Result<SavedPattern, StoreError> {
		let mut dictionary = self.read()?;
		let removed = dictionary
			.remove(name)
			.ok_or_else(|| StoreError::Miss(name.to_owned()))?;
		self.write(&dictionary)?;
		Ok(removed)
	}

	/// All snapshots ordered by name.
	pub fn list(&self) -> Result<Vec<SavedPattern>, StoreError> {
		Ok(self.read()?.into_values().collect())
	}

	/// Last edited text, if any.
	pub fn last_text(&self) -> Result<Option<String>, StoreError> {
		self.backend.get(&self.last_text_key)
	}

	/// Caches `text` as the last edited text.
	pub fn set_last_text(&self, text: &str) -> Result<(), StoreError> {
		self.backend.set(&self.last_text_key, text)
	}

	fn read(&self) -> Result<Dictionary, StoreError> {
		match self.backend.get(&self.root_key)? {
			None => Ok(Dictionary::new()),
			Some(raw) if raw.trim().is_empty() || raw.trim() == "null" => Ok(Dictionary::new()),
			Some(raw) => serde_json::from_str(&raw).map_err(|e| StoreError::Corrupt(e.to_string())),
		}
	}

	fn write(&self, dictionary: &Dictionary) -> Result<(), StoreError> {
		let raw = serde_json::to_string(dictionary).map_err(|e| StoreError::Corrupt(e.to_string()))?;
		self.backend.set(&self.root_key, &raw)
	}
}

#[cfg(test)]
mod tests {
	use chrono::{TimeZone, Utc};
	use pretty_assertions::assert_eq;

	use super::*;

	fn store() -> (Rc<MemoryBackend>, PatternStore<Rc<MemoryBackend>>) {
		let backend = Rc::new(MemoryBackend::default());
		let store = PatternStore::new(backend.clone(), "savedMotifs", "motifText");
		(backend, store)
	}

	fn pattern(name: &str, text: &str) -> SavedPattern {
		SavedPattern {
			name: name.into(),
			motif_text: text.into(),
			saved_date: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
		}
	}

	#[test]
	fn save_load_delete_round_trip() {
		let (_, store) = store();
		store.save(pattern("x", "A->B")).unwrap();

		assert_eq!(store.load("x").unwrap().motif_text, "A->B");
		assert_eq!(store.delete("x").unwrap().name, "x");
		assert_eq!(store.load("x"), Err(StoreError::Miss("x".into())));
		assert_eq!(store.delete("x"), Err(StoreError::Miss("x".into())));
	}

	#[test]
	fn last_write_wins() {
		let (_, store) = store();
		store.save(pattern("x", "A->B")).unwrap();
		store.save(pattern("x", "B->C")).unwrap();

		assert_eq!(store.list().unwrap(), vec![pattern("x", "B->C")]);
	}

	#[test]
	fn dictionary_lives_under_root_key() {
		let (backend, store) = store();
		store.save(pattern("b", "1")).unwrap();
		store.save(pattern("a", "2")).unwrap();

		let raw: serde_json::Value = serde_json::from_str(&backend.raw("savedMotifs").unwrap()).unwrap();
		assert_eq!(raw["a"]["motifText"], "2");
		assert_eq!(raw["a"]["savedDate"], "2024-03-01T12:00:00Z");
		let names: Vec<String> = store.list().unwrap().into_iter().map(|p| p.name).collect();
		assert_eq!(names, ["a", "b"]);
	}

	#[test]
	fn corrupt_dictionary_is_reported() {
		let (backend, store) = store();
		backend.set("savedMotifs", "{not json").unwrap();

		assert!(matches!(store.list(), Err(StoreError::Corrupt(_))));
	}

	#[test]
	fn last_text_is_separate() {
		let (_, store) = store();
		assert_eq!(store.last_text().unwrap(), None);
		store.set_last_text("A -> B").unwrap();

		assert_eq!(store.last_text().unwrap().as_deref(), Some("A -> B"));
		assert!(store.list().unwrap().is_empty());
	}
}
