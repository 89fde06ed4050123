//! The editor's state machine.
//!
//! [`EditorState::update`] is the only mutator of observable state. It takes
//! one [`Event`] (user input or a completed remote call), adjusts the state,
//! and returns the [`Effect`]s the shell must carry out: network calls,
//! storage writes, address updates and timers. Time is read from the events,
//! never from a clock, so every transition can be replayed in tests.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, warn};
use web_time::Instant;

use super::error::{Level, Notifications, StoreError, TransportError, dwell_for};
use super::location::LocationState;
use super::model::{
	DatasetDescriptor, ExecuteRequest, ExecutionResult, GraphModel, ParseReply, SavedPattern, SearchOptions,
	ValidationError,
};
use super::results::{self, ResultTable};
use super::throttle::{Schedule, Throttle};
use crate::config::Config;

/// File extensions accepted for host graph uploads.
pub const UPLOAD_EXTENSIONS: [&str; 2] = ["graphml", "xml"];

/// Inputs to the state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
	/// The editor came up. `location` and `last_text` are what the address
	/// and the store hold at that moment.
	Mounted {
		/// Fields restored from the page address.
		location: LocationState,
		/// Text cached by the previous session.
		last_text: Option<String>,
		/// Mount time.
		at: Instant,
	},
	/// The user edited the pattern.
	TextChanged {
		/// Full editor contents after the edit.
		text: String,
		/// Time of the edit.
		at: Instant,
	},
	/// A timer armed by [`Effect::ArmParseTimer`] went off.
	ParseTimerElapsed {
		/// Token the timer was armed with.
		token: u64,
		/// Expiry time.
		at: Instant,
	},
	/// The parse request tagged `seq` completed.
	ParseSettled {
		/// Sequence number from [`Effect::SendParse`].
		seq: u64,
		/// Parser reply or transport failure.
		outcome: Result<ParseReply, TransportError>,
	},
	/// A host graph was picked, or the selection cleared.
	DatasetChanged(Option<String>),
	/// Search flags changed.
	OptionsChanged(SearchOptions),
	/// The run button was pressed.
	ExecuteRequested {
		/// Press time, used for the duration.
		at: Instant,
	},
	/// The running search completed.
	ExecuteSettled {
		/// Result set or transport failure.
		outcome: Result<ExecutionResult, TransportError>,
		/// Completion time.
		at: Instant,
	},
	/// The host catalog arrived.
	HostsLoaded(Result<Vec<DatasetDescriptor>, TransportError>),
	/// The user picked a host graph file.
	UploadRequested {
		/// Name of the picked file.
		filename: String,
		/// File contents.
		bytes: Vec<u8>,
	},
	/// Upload finished, with the new dataset uri on success.
	UploadSettled(Result<String, TransportError>),
	/// Save the current text.
	SaveRequested {
		/// Snapshot name, trimmed before use.
		name: String,
		/// Wall-clock save date.
		at: DateTime<Utc>,
	},
	/// Restore a snapshot.
	LoadRequested {
		/// Snapshot name.
		name: String,
	},
	/// Forget a snapshot.
	DeleteRequested {
		/// Snapshot name.
		name: String,
	},
	/// Store reply to [`Effect::SaveSnapshot`].
	SnapshotSaved {
		/// Snapshot name.
		name: String,
		/// Updated snapshot list.
		result: Result<Vec<SavedPattern>, StoreError>,
	},
	/// Store reply to [`Effect::ListSnapshots`].
	SnapshotsListed(Result<Vec<SavedPattern>, StoreError>),
	/// Store reply to [`Effect::LoadSnapshot`].
	SnapshotLoaded {
		/// Snapshot name.
		name: String,
		/// The snapshot, or why it could not be read.
		result: Result<SavedPattern, StoreError>,
		/// Load time; the restored text is parsed right away.
		at: Instant,
	},
	/// Store reply to [`Effect::DeleteSnapshot`].
	SnapshotDeleted {
		/// Snapshot name.
		name: String,
		/// Updated snapshot list.
		result: Result<Vec<SavedPattern>, StoreError>,
	},
	/// Expired or closed by the user.
	NotificationDismissed(u64),
}

/// Work the shell performs on behalf of the state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
	/// Cache the text as the last edited pattern.
	PersistLastText(String),
	/// Merge the fields into the page address.
	WriteLocation(LocationState),
	/// Report back with [`Event::ParseTimerElapsed`] after `delay`.
	ArmParseTimer {
		/// Token to report back.
		token: u64,
		/// Time until expiry.
		delay: Duration,
	},
	/// Report back with [`Event::ParseSettled`] carrying the same `seq`.
	SendParse {
		/// Sequence number of this request.
		seq: u64,
		/// Text to parse.
		text: String,
	},
	/// Report back with [`Event::ExecuteSettled`].
	SendExecute(ExecuteRequest),
	/// Report back with [`Event::HostsLoaded`].
	FetchHosts,
	/// Report back with [`Event::UploadSettled`].
	Upload {
		/// Name the file is uploaded under.
		filename: String,
		/// File contents.
		bytes: Vec<u8>,
	},
	/// Report back with [`Event::SnapshotSaved`].
	SaveSnapshot(SavedPattern),
	/// Report back with [`Event::SnapshotLoaded`].
	LoadSnapshot(String),
	/// Report back with [`Event::SnapshotDeleted`].
	DeleteSnapshot(String),
	/// Report back with [`Event::SnapshotsListed`].
	ListSnapshots,
	/// Report back with [`Event::NotificationDismissed`] after `after`.
	ExpireNotification {
		/// Notification to expire.
		id: u64,
		/// Dwell time.
		after: Duration,
	},
}

/// Authoritative editor state.
#[derive(Debug, Clone)]
pub struct EditorState {
	/// Pattern source as typed.
	pub text: String,
	/// Last successfully parsed graph. Kept while newer text fails to parse.
	pub graph: Option<GraphModel>,
	/// Bumped whenever `graph` is replaced.
	pub graph_revision: u64,
	/// Validation error of the latest parse.
	pub error: Option<ValidationError>,
	/// Selected host graph uri.
	pub dataset: Option<String>,
	/// Host catalog.
	pub hosts: Vec<DatasetDescriptor>,
	/// Search flags.
	pub options: SearchOptions,
	/// Latest successful search.
	pub results: Option<ExecutionResult>,
	/// A search is in flight.
	pub executing: bool,
	/// Wall time of the latest successful search.
	pub execution_duration: Duration,
	/// An upload is in flight.
	pub uploading: bool,
	/// Saved snapshots, sorted by name.
	pub saved: Vec<SavedPattern>,
	/// Messages on screen.
	pub notifications: Notifications,
	execution_started: Option<Instant>,
	throttle: Throttle,
	parse_seq: u64,
	notification_ttl: Duration,
	example_motif: String,
}

impl EditorState {
	/// Empty editor tuned by `config`.
	pub fn new(config: &Config) -> Self {
		Self {
			text: String::new(),
			graph: None,
			graph_revision: 0,
			error: None,
			dataset: None,
			hosts: Vec::new(),
			options: SearchOptions::default(),
			results: None,
			executing: false,
			execution_duration: Duration::ZERO,
			uploading: false,
			saved: Vec::new(),
			notifications: Notifications::default(),
			execution_started: None,
			throttle: Throttle::new(config.throttle_config()),
			parse_seq: 0,
			notification_ttl: config.notification_ttl,
			example_motif: config.example_motif.clone(),
		}
	}

	/// Whether the execute affordance is enabled.
	pub fn can_execute(&self) -> bool {
		!self.executing && !self.text.is_empty() && self.dataset.is_some()
	}

	/// [`Self::execution_duration`] in whole milliseconds.
	pub fn execution_duration_ms(&self) -> u128 {
		self.execution_duration.as_millis()
	}

	/// Sequence number of the most recently issued parse.
	pub fn parse_seq(&self) -> u64 {
		self.parse_seq
	}

	/// A throttled parse is waiting for its timer.
	pub fn parse_pending(&self) -> bool {
		self.throttle.is_pending()
	}

	/// Label of the execute button.
	pub fn run_label(&self) -> String {
		match (&self.dataset, self.executing) {
			(_, true) => "Running...".into(),
			(Some(uri), false) => format!("Run on {uri}"),
			(None, false) => "Run".into(),
		}
	}

	/// Display table of the latest results, at most `cap` rows.
	pub fn result_table(&self, cap: usize) -> Option<ResultTable> {
		self.results
			.as_ref()
			.map(|r| results::build_table(&r.results_by_column, cap))
	}

	/// "N results in S seconds." for the latest results.
	pub fn result_summary(&self) -> Option<String> {
		self.results
			.as_ref()
			.map(|r| results::summary(&r.results_by_column, self.execution_duration))
	}

	/// Applies one event and returns the effects to run, in order.
	pub fn update(&mut self, event: Event) -> Vec<Effect> {
		let mut fx = Vec::new();
		match event {
			Event::Mounted {
				location,
				last_text,
				at,
			} => self.mount(location, last_text, at, &mut fx),
			Event::TextChanged { text, at } => self.change_text(text, at, &mut fx),
			Event::ParseTimerElapsed { token, at } => {
				if self.throttle.on_timer(token, at) && !self.text.is_empty() {
					self.issue_parse(&mut fx);
				}
			}
			Event::ParseSettled { seq, outcome } => self.settle_parse(seq, outcome, &mut fx),
			Event::DatasetChanged(uri) => self.change_dataset(uri, &mut fx),
			Event::OptionsChanged(options) => self.options = options,
			Event::ExecuteRequested { at } => self.request_execute(at, &mut fx),
			Event::ExecuteSettled { outcome, at } => self.settle_execute(outcome, at, &mut fx),
			Event::HostsLoaded(Ok(hosts)) => self.hosts = hosts,
			Event::HostsLoaded(Err(err)) => {
				warn!("host catalog fetch failed: {err}");
				self.notify(
					Level::Error,
					format!("Could not get a list of available host graphs: {err}"),
					&mut fx,
				);
			}
			Event::UploadRequested { filename, bytes } => self.request_upload(filename, bytes, &mut fx),
			Event::UploadSettled(result) => self.settle_upload(result, &mut fx),
			Event::SaveRequested { name, at } => self.request_save(name, at, &mut fx),
			Event::LoadRequested { name } => fx.push(Effect::LoadSnapshot(name)),
			Event::DeleteRequested { name } => fx.push(Effect::DeleteSnapshot(name)),
			Event::SnapshotSaved { name, result } => match result {
				Ok(saved) => {
					self.saved = saved;
					self.notify(Level::Info, format!("Saved motif {name:?}"), &mut fx);
				}
				Err(err) => self.store_failed(err, &mut fx),
			},
			Event::SnapshotsListed(result) => match result {
				Ok(saved) => self.saved = saved,
				Err(err) => self.store_failed(err, &mut fx),
			},
			Event::SnapshotLoaded { name, result, at } => match result {
				Ok(snapshot) => {
					debug!("restoring saved motif {name:?}");
					self.commit_and_parse(snapshot.motif_text, at, &mut fx);
				}
				Err(err) => self.store_failed(err, &mut fx),
			},
			Event::SnapshotDeleted { name, result } => match result {
				Ok(saved) => {
					self.saved = saved;
					self.notify(Level::Info, format!("Deleted motif {name:?}"), &mut fx);
				}
				Err(err) => self.store_failed(err, &mut fx),
			},
			Event::NotificationDismissed(id) => {
				self.notifications.dismiss(id);
			}
		}
		fx
	}

	fn mount(&mut self, location: LocationState, last_text: Option<String>, at: Instant, fx: &mut Vec<Effect>) {
		self.text = location
			.text
			.or(last_text.filter(|text| !text.is_empty()))
			.unwrap_or_else(|| self.example_motif.clone());
		self.dataset = location.dataset;
		fx.push(Effect::FetchHosts);
		fx.push(Effect::ListSnapshots);
		if !self.text.is_empty() {
			self.throttle.note_fired(at);
			self.issue_parse(fx);
		}
	}

	fn change_text(&mut self, text: String, at: Instant, fx: &mut Vec<Effect>) {
		self.text = text;
		if self.text.is_empty() {
			// Nothing left to validate: drop the stale error and whatever parse is queued or in flight.
			self.error = None;
			self.throttle.cancel();
			self.parse_seq += 1;
			return;
		}

		self.persist_text(fx);
		match self.throttle.schedule(at) {
			Schedule::Immediate => self.issue_parse(fx),
			Schedule::Arm { token, delay } => fx.push(Effect::ArmParseTimer { token, delay }),
			Schedule::Coalesced => {}
		}
	}

	/// Commits text that arrives as a whole (e.g. a restored snapshot) and
	/// parses it without waiting for the throttle window.
	fn commit_and_parse(&mut self, text: String, at: Instant, fx: &mut Vec<Effect>) {
		self.text = text;
		self.throttle.cancel();
		if self.text.is_empty() {
			self.error = None;
			self.parse_seq += 1;
			return;
		}
		self.persist_text(fx);
		self.throttle.note_fired(at);
		self.issue_parse(fx);
	}

	fn persist_text(&self, fx: &mut Vec<Effect>) {
		fx.push(Effect::PersistLastText(self.text.clone()));
		fx.push(Effect::WriteLocation(LocationState {
			text: Some(self.text.clone()),
			dataset: None,
		}));
	}

	fn issue_parse(&mut self, fx: &mut Vec<Effect>) {
		self.parse_seq += 1;
		fx.push(Effect::SendParse {
			seq: self.parse_seq,
			text: self.text.clone(),
		});
	}

	fn settle_parse(&mut self, seq: u64, outcome: Result<ParseReply, TransportError>, fx: &mut Vec<Effect>) {
		if seq != self.parse_seq {
			debug!("dropping parse response {seq}, latest is {}", self.parse_seq);
			return;
		}
		match outcome {
			Ok(ParseReply { error: Some(error), .. }) => self.error = Some(error),
			Ok(ParseReply { motif, error: None }) => {
				self.error = None;
				if let Some(graph) = motif {
					self.graph = Some(graph);
					self.graph_revision += 1;
				}
			}
			Err(err) => {
				warn!("parse request failed: {err}");
				self.notify(Level::Error, format!("Failed to parse motif: {err}"), fx);
			}
		}
	}

	fn change_dataset(&mut self, uri: Option<String>, fx: &mut Vec<Effect>) {
		self.dataset = uri.filter(|uri| !uri.is_empty());
		if let Some(uri) = &self.dataset {
			fx.push(Effect::WriteLocation(LocationState {
				text: None,
				dataset: Some(uri.clone()),
			}));
		}
	}

	fn request_execute(&mut self, at: Instant, fx: &mut Vec<Effect>) {
		if self.executing {
			debug!("execute ignored, a search is already running");
			return;
		}
		let Some(host_id) = self.dataset.clone().filter(|_| !self.text.is_empty()) else {
			debug!("execute ignored, motif or dataset missing");
			return;
		};

		self.executing = true;
		self.execution_started = Some(at);
		fx.push(Effect::SendExecute(ExecuteRequest {
			motif: self.text.clone(),
			host_id,
			allow_automorphisms: self.options.allow_automorphisms,
			ignore_direction: self.options.ignore_direction,
		}));
	}

	fn settle_execute(&mut self, outcome: Result<ExecutionResult, TransportError>, at: Instant, fx: &mut Vec<Effect>) {
		if !self.executing {
			debug!("dropping execute response with no search in flight");
			return;
		}
		self.executing = false;
		let started = self.execution_started.take();
		match outcome {
			Ok(result) => {
				self.results = Some(result);
				self.execution_duration = started.map_or(Duration::ZERO, |s| at.saturating_duration_since(s));
			}
			Err(err) => {
				warn!("motif search failed: {err}");
				self.notify(Level::Error, format!("Motif search failed: {err}"), fx);
			}
		}
	}

	fn request_upload(&mut self, filename: String, bytes: Vec<u8>, fx: &mut Vec<Effect>) {
		if self.uploading {
			debug!("upload of {filename} ignored, another upload is running");
			return;
		}
		let accepted = Path::new(&filename)
			.extension()
			.and_then(|ext| ext.to_str())
			.is_some_and(|ext| UPLOAD_EXTENSIONS.iter().any(|ok| ext.eq_ignore_ascii_case(ok)));
		if !accepted {
			self.notify(
				Level::Warn,
				format!("{filename} is not a host graph, upload a .graphml or .xml file"),
				fx,
			);
			return;
		}
		self.uploading = true;
		fx.push(Effect::Upload { filename, bytes });
	}

	fn settle_upload(&mut self, result: Result<String, TransportError>, fx: &mut Vec<Effect>) {
		self.uploading = false;
		match result {
			Ok(uri) => {
				self.notify(Level::Info, format!("Uploaded host graph {uri}"), fx);
				self.change_dataset(Some(uri), fx);
				fx.push(Effect::FetchHosts);
			}
			Err(err) => {
				warn!("host upload failed: {err}");
				self.notify(Level::Error, format!("Upload failed: {err}"), fx);
			}
		}
	}

	fn request_save(&mut self, name: String, at: DateTime<Utc>, fx: &mut Vec<Effect>) {
		let name = name.trim().to_owned();
		if name.is_empty() {
			self.notify(Level::Warn, "Name the motif before saving it", fx);
			return;
		}
		if self.text.is_empty() {
			self.notify(Level::Warn, "There is no motif to save", fx);
			return;
		}
		fx.push(Effect::SaveSnapshot(SavedPattern {
			name,
			motif_text: self.text.clone(),
			saved_date: at,
		}));
	}

	fn store_failed(&mut self, err: StoreError, fx: &mut Vec<Effect>) {
		let level = match err {
			StoreError::Miss(_) => Level::Warn,
			StoreError::Backend(_) | StoreError::Corrupt(_) => Level::Error,
		};
		self.notify(level, err.to_string(), fx);
	}

	fn notify(&mut self, level: Level, message: impl Into<String>, fx: &mut Vec<Effect>) {
		let id = self.notifications.push(level, message);
		fx.push(Effect::ExpireNotification {
			id,
			after: dwell_for(level, self.notification_ttl),
		});
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::studio::model::{MotifNode, NodeId, ResultColumn, ResultsByColumn};

	fn state() -> EditorState {
		EditorState::new(&Config::default())
	}

	fn graph(ids: &[&str]) -> GraphModel {
		GraphModel {
			nodes: ids
				.iter()
				.map(|id| MotifNode {
					id: NodeId::from(*id),
					constraints: Default::default(),
				})
				.collect(),
			links: Vec::new(),
		}
	}

	fn sent_parse(fx: &[Effect]) -> Option<(u64, String)> {
		fx.iter().find_map(|effect| match effect {
			Effect::SendParse { seq, text } => Some((*seq, text.clone())),
			_ => None,
		})
	}

	fn armed(fx: &[Effect]) -> Option<u64> {
		fx.iter().find_map(|effect| match effect {
			Effect::ArmParseTimer { token, .. } => Some(*token),
			_ => None,
		})
	}

	#[test]
	fn mount_prefers_address_then_store_then_example() {
		let now = Instant::now();

		let mut from_address = state();
		let fx = from_address.update(Event::Mounted {
			location: LocationState {
				text: Some("A -> B".into()),
				dataset: Some("ds://1".into()),
			},
			last_text: Some("cached".into()),
			at: now,
		});
		assert_eq!(from_address.text, "A -> B");
		assert_eq!(from_address.dataset.as_deref(), Some("ds://1"));
		assert_eq!(sent_parse(&fx), Some((1, "A -> B".into())));
		assert!(fx.contains(&Effect::FetchHosts));

		let mut from_store = state();
		from_store.update(Event::Mounted {
			location: LocationState::default(),
			last_text: Some("cached".into()),
			at: now,
		});
		assert_eq!(from_store.text, "cached");

		let mut fallback = state();
		fallback.update(Event::Mounted {
			location: LocationState::default(),
			last_text: Some(String::new()),
			at: now,
		});
		assert_eq!(fallback.text, Config::default().example_motif);
	}

	#[test]
	fn empty_text_is_not_persisted_or_parsed() {
		let mut state = state();
		let fx = state.update(Event::TextChanged {
			text: String::new(),
			at: Instant::now(),
		});
		assert!(fx.is_empty());
	}

	#[test]
	fn edit_persists_and_arms_timer() {
		let mut state = state();
		let fx = state.update(Event::TextChanged {
			text: "A -> B".into(),
			at: Instant::now(),
		});

		assert_eq!(fx[0], Effect::PersistLastText("A -> B".into()));
		assert_eq!(
			fx[1],
			Effect::WriteLocation(LocationState {
				text: Some("A -> B".into()),
				dataset: None,
			})
		);
		assert!(armed(&fx).is_some());
		assert_eq!(sent_parse(&fx), None);
	}

	#[test]
	fn error_keeps_last_good_graph() {
		let mut state = state();
		state.update(Event::ParseSettled {
			seq: 0,
			outcome: Ok(ParseReply {
				motif: Some(graph(&["A", "B"])),
				error: None,
			}),
		});
		let good = state.graph.clone();

		state.update(Event::ParseSettled {
			seq: 0,
			outcome: Ok(ParseReply {
				motif: None,
				error: Some(ValidationError(vec!["unexpected token".into()])),
			}),
		});

		assert_eq!(state.graph, good);
		assert_eq!(state.graph_revision, 1);
		assert!(state.error.is_some());
	}

	#[test]
	fn transport_failure_preserves_state() {
		let mut state = state();
		state.error = Some(ValidationError(vec!["old".into()]));
		let fx = state.update(Event::ParseSettled {
			seq: 0,
			outcome: Err(TransportError::Status(500)),
		});

		assert_eq!(state.error, Some(ValidationError(vec!["old".into()])));
		assert_eq!(state.notifications.len(), 1);
		assert!(matches!(fx[..], [Effect::ExpireNotification { .. }]));
	}

	#[test]
	fn clearing_text_clears_error_and_supersedes_parse() {
		let t0 = Instant::now();
		let mut state = state();
		let fx = state.update(Event::TextChanged {
			text: "A -> ".into(),
			at: t0,
		});
		let token = armed(&fx).unwrap();
		let fx = state.update(Event::ParseTimerElapsed {
			token,
			at: t0 + Duration::from_secs(1),
		});
		let (seq, _) = sent_parse(&fx).unwrap();
		state.error = Some(ValidationError(vec!["dangling edge".into()]));

		state.update(Event::TextChanged {
			text: String::new(),
			at: t0 + Duration::from_millis(1100),
		});
		state.update(Event::ParseSettled {
			seq,
			outcome: Ok(ParseReply {
				motif: None,
				error: Some(ValidationError(vec!["dangling edge".into()])),
			}),
		});

		assert_eq!(state.error, None);
		assert!(!state.parse_pending());
	}

	#[test]
	fn execute_is_single_flight() {
		let t0 = Instant::now();
		let mut state = state();
		state.text = "A -> B".into();
		state.dataset = Some("ds://1".into());

		let first = state.update(Event::ExecuteRequested { at: t0 });
		let second = state.update(Event::ExecuteRequested { at: t0 });
		assert_eq!(first.len(), 1);
		assert!(second.is_empty());
		assert_eq!(state.run_label(), "Running...");

		state.update(Event::ExecuteSettled {
			outcome: Ok(ExecutionResult::default()),
			at: t0 + Duration::from_millis(2500),
		});
		assert!(!state.executing);
		assert_eq!(state.execution_duration_ms(), 2500);
		assert_eq!(state.run_label(), "Run on ds://1");
	}

	#[test]
	fn failed_execute_keeps_previous_results() {
		let t0 = Instant::now();
		let mut state = state();
		state.text = "A -> B".into();
		state.dataset = Some("ds://1".into());
		let previous = ExecutionResult {
			results_by_column: ResultsByColumn::from([("A".to_owned(), ResultColumn::from([(0, NodeId::from("n1"))]))]),
			..Default::default()
		};
		state.results = Some(previous.clone());

		state.update(Event::ExecuteRequested { at: t0 });
		state.update(Event::ExecuteSettled {
			outcome: Err(TransportError::Request("connection reset".into())),
			at: t0,
		});

		assert_eq!(state.results, Some(previous));
		assert!(!state.executing);
		assert!(state.error.is_none());
		assert_eq!(
			state.notifications.last().map(|n| n.message.as_str()),
			Some("Motif search failed: request failed: connection reset")
		);
	}

	#[test]
	fn dataset_change_updates_address_immediately() {
		let mut state = state();
		let fx = state.update(Event::DatasetChanged(Some("file://takemura".into())));
		assert_eq!(
			fx,
			[Effect::WriteLocation(LocationState {
				text: None,
				dataset: Some("file://takemura".into()),
			})]
		);

		assert!(state.update(Event::DatasetChanged(Some(String::new()))).is_empty());
		assert_eq!(state.dataset, None);
	}

	#[test]
	fn upload_rejects_foreign_files_and_selects_result() {
		let mut state = state();
		state.update(Event::UploadRequested {
			filename: "graph.csv".into(),
			bytes: vec![1],
		});
		assert!(!state.uploading);
		assert_eq!(state.notifications.last().map(|n| n.level), Some(Level::Warn));

		let fx = state.update(Event::UploadRequested {
			filename: "medulla.GraphML".into(),
			bytes: vec![1],
		});
		assert!(state.uploading);
		assert!(matches!(fx[..], [Effect::Upload { .. }]));

		let fx = state.update(Event::UploadSettled(Ok("file://medulla".into())));
		assert_eq!(state.dataset.as_deref(), Some("file://medulla"));
		assert!(fx.contains(&Effect::FetchHosts));
	}

	#[test]
	fn save_requires_name_and_text() {
		let at = Utc::now();
		let mut state = state();
		state.text = "A -> B".into();

		assert!(matches!(
			state.update(Event::SaveRequested { name: "  ".into(), at })[..],
			[Effect::ExpireNotification { .. }]
		));
		let fx = state.update(Event::SaveRequested {
			name: " ring ".into(),
			at,
		});
		assert_eq!(
			fx,
			[Effect::SaveSnapshot(SavedPattern {
				name: "ring".into(),
				motif_text: "A -> B".into(),
				saved_date: at,
			})]
		);
	}

	#[test]
	fn loading_snapshot_parses_immediately() {
		let t0 = Instant::now();
		let mut state = state();
		state.update(Event::TextChanged {
			text: "draft".into(),
			at: t0,
		});
		let fx = state.update(Event::SnapshotLoaded {
			name: "ring".into(),
			result: Ok(SavedPattern {
				name: "ring".into(),
				motif_text: "A -> B\nB -> A".into(),
				saved_date: Utc::now(),
			}),
			at: t0 + Duration::from_millis(10),
		});

		assert_eq!(sent_parse(&fx).map(|(_, text)| text).as_deref(), Some("A -> B\nB -> A"));
		assert!(!state.parse_pending());
	}

	#[test]
	fn store_miss_is_a_warning() {
		let mut state = state();
		state.update(Event::SnapshotLoaded {
			name: "x".into(),
			result: Err(StoreError::Miss("x".into())),
			at: Instant::now(),
		});
		let note = state.notifications.last().unwrap();
		assert_eq!(note.level, Level::Warn);
		assert_eq!(note.message, "no saved motif named \"x\"");

		let id = note.id;
		state.update(Event::NotificationDismissed(id));
		assert!(state.notifications.is_empty());
	}
}
