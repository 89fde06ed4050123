//! Failure taxonomy of the editor core.
//!
//! Nothing here is fatal to a session: every variant ends up as a transient
//! [`Notification`] while the state it would have touched stays as it was.

use std::time::Duration;

use thiserror::Error;

/// Network or service failure on any remote call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
	/// The request never produced a response.
	#[error("request failed: {0}")]
	Request(String),
	/// The service answered with a non-success status.
	#[error("service responded with status {0}")]
	Status(u16),
	/// The response body did not match the expected shape.
	#[error("malformed response: {0}")]
	Decode(String),
}

/// Failure of the persistent pattern store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
	/// No snapshot is saved under the requested name.
	#[error("no saved motif named {0:?}")]
	Miss(String),
	/// The storage backend refused the operation.
	#[error("storage unavailable: {0}")]
	Backend(String),
	/// The stored dictionary could not be decoded.
	#[error("stored motifs are corrupt: {0}")]
	Corrupt(String),
}

/// Failure to produce a downloadable export.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
	/// The CSV writer rejected a record or could not be flushed.
	#[error("could not write CSV: {0}")]
	Csv(String),
	/// The written bytes were not valid UTF-8.
	#[error("export is not valid UTF-8: {0}")]
	Encoding(String),
}

impl From<csv::Error> for ExportError {
	fn from(err: csv::Error) -> Self {
		Self::Csv(err.to_string())
	}
}

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Level {
	/// Informational message (default).
	#[default]
	Info,
	/// Something the user should look at.
	Warn,
	/// A failed operation.
	Error,
}

/// A transient, user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
	/// Handle for dismissal.
	pub id: u64,
	/// Severity.
	pub level: Level,
	/// Text shown to the user.
	pub message: String,
}

/// Queue of live notifications with monotonically assigned ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notifications {
	live: Vec<Notification>,
	next_id: u64,
}

impl Notifications {
	/// Appends a notification and returns its id.
	pub fn push(&mut self, level: Level, message: impl Into<String>) -> u64 {
		let id = self.next_id;
		self.next_id += 1;
		self.live.push(Notification {
			id,
			level,
			message: message.into(),
		});
		id
	}

	/// Removes a notification. Unknown ids are ignored.
	pub fn dismiss(&mut self, id: u64) -> bool {
		let before = self.live.len();
		self.live.retain(|n| n.id != id);
		self.live.len() != before
	}

	/// Notifications in arrival order.
	pub fn iter(&self) -> impl Iterator<Item = &Notification> {
		self.live.iter()
	}

	/// Number of notifications on screen.
	pub fn len(&self) -> usize {
		self.live.len()
	}

	/// Nothing on screen.
	pub fn is_empty(&self) -> bool {
		self.live.is_empty()
	}

	/// Most recent notification.
	pub fn last(&self) -> Option<&Notification> {
		self.live.last()
	}
}

/// How long notifications of each level stay on screen.
pub fn dwell_for(level: Level, base: Duration) -> Duration {
	match level {
		Level::Info => base,
		Level::Warn | Level::Error => base * 2,
	}
}
