//! End-to-end runs of the editor state machine against in-memory storage,
//! an in-memory address bar and a scripted remote.

use std::time::Duration;

use chrono::{TimeZone, Utc};
use motif_studio::config::Config;
use motif_studio::studio::location::{self, AddressBar, MemoryAddressBar};
use motif_studio::studio::model::{
	ExecuteRequest, ExecutionResult, MotifLink, MotifNode, ParseReply, ResultColumn, ResultsByColumn,
	ValidationError,
};
use motif_studio::studio::store::{MemoryBackend, PatternStore};
use motif_studio::studio::{Effect, EditorState, Event, GraphModel, NodeId};
use pretty_assertions::assert_eq;
use web_time::Instant;

/// Runs effects the way the browser shell does, with a manual clock.
struct Harness {
	state: EditorState,
	store: PatternStore<MemoryBackend>,
	bar: MemoryAddressBar,
	now: Instant,
	timers: Vec<(u64, Instant)>,
	parses: Vec<(u64, String)>,
	executes: Vec<ExecuteRequest>,
	host_fetches: usize,
}

impl Harness {
	fn new(query: &str) -> Self {
		let config = Config::default();
		Self {
			state: EditorState::new(&config),
			store: PatternStore::new(MemoryBackend::default(), config.store_key, config.last_text_key),
			bar: MemoryAddressBar::with_query(query),
			now: Instant::now(),
			timers: Vec::new(),
			parses: Vec::new(),
			executes: Vec::new(),
			host_fetches: 0,
		}
	}

	fn mount(&mut self) {
		let location = location::restore(&self.bar);
		let last_text = self.store.last_text().unwrap();
		self.dispatch(Event::Mounted {
			location,
			last_text,
			at: self.now,
		});
	}

	fn dispatch(&mut self, event: Event) {
		let effects = self.state.update(event);
		for effect in effects {
			self.run(effect);
		}
	}

	fn run(&mut self, effect: Effect) {
		match effect {
			Effect::PersistLastText(text) => self.store.set_last_text(&text).unwrap(),
			Effect::WriteLocation(state) => location::publish(&self.bar, &state),
			Effect::ArmParseTimer { token, delay } => self.timers.push((token, self.now + delay)),
			Effect::SendParse { seq, text } => self.parses.push((seq, text)),
			Effect::SendExecute(request) => self.executes.push(request),
			Effect::FetchHosts => self.host_fetches += 1,
			Effect::Upload { .. } => {}
			Effect::SaveSnapshot(pattern) => {
				let name = pattern.name.clone();
				let result = self.store.save(pattern).and_then(|()| self.store.list());
				self.dispatch(Event::SnapshotSaved { name, result });
			}
			Effect::LoadSnapshot(name) => {
				let result = self.store.load(&name);
				let at = self.now;
				self.dispatch(Event::SnapshotLoaded { name, result, at });
			}
			Effect::DeleteSnapshot(name) => {
				let result = self.store.delete(&name).and_then(|_| self.store.list());
				self.dispatch(Event::SnapshotDeleted { name, result });
			}
			Effect::ListSnapshots => {
				let result = self.store.list();
				self.dispatch(Event::SnapshotsListed(result));
			}
			Effect::ExpireNotification { .. } => {}
		}
	}

	fn type_text(&mut self, text: &str) {
		self.dispatch(Event::TextChanged {
			text: text.to_owned(),
			at: self.now,
		});
	}

	/// Moves the clock forward and fires every timer that came due.
	fn advance(&mut self, by: Duration) {
		self.now += by;
		let now = self.now;
		let (due, pending): (Vec<_>, Vec<_>) = self.timers.drain(..).partition(|(_, at)| *at <= now);
		self.timers = pending;
		for (token, at) in due {
			self.dispatch(Event::ParseTimerElapsed { token, at });
		}
	}

	fn answer_parse(&mut self, seq: u64, reply: ParseReply) {
		self.dispatch(Event::ParseSettled {
			seq,
			outcome: Ok(reply),
		});
	}

	fn parse_for(&self, text: &str) -> u64 {
		self.parses
			.iter()
			.rev()
			.find(|(_, sent)| sent == text)
			.map(|(seq, _)| *seq)
			.unwrap()
	}
}

fn chain(ids: &[&str]) -> GraphModel {
	GraphModel {
		nodes: ids
			.iter()
			.map(|id| MotifNode {
				id: NodeId::from(*id),
				constraints: Default::default(),
			})
			.collect(),
		links: ids
			.windows(2)
			.map(|pair| MotifLink {
				source: NodeId::from(pair[0]),
				target: NodeId::from(pair[1]),
				exists: true,
				constraints: Default::default(),
			})
			.collect(),
	}
}

fn ok(graph: GraphModel) -> ParseReply {
	ParseReply {
		motif: Some(graph),
		error: None,
	}
}

#[test]
fn burst_of_edits_sends_one_parse_with_final_text() {
	let mut h = Harness::new("");
	for i in 0..10 {
		h.type_text(&format!("A -> B{i}"));
		h.advance(Duration::from_millis(90));
	}
	assert!(h.parses.is_empty());

	h.advance(Duration::from_millis(200));
	assert_eq!(h.parses, vec![(1, "A -> B9".to_owned())]);
	assert_eq!(h.store.last_text().unwrap().as_deref(), Some("A -> B9"));
	assert_eq!(location::decode(&h.bar.query()).text.as_deref(), Some("A -> B9"));
}

#[test]
fn continuous_typing_parses_once_per_window() {
	let mut h = Harness::new("");
	for i in 0..25 {
		h.type_text(&format!("A -> B{i}"));
		h.advance(Duration::from_millis(100));
	}
	h.advance(Duration::from_secs(1));
	assert!((2..=4).contains(&h.parses.len()), "{:?}", h.parses);
	assert_eq!(h.parses.last().map(|(_, text)| text.as_str()), Some("A -> B24"));
}

#[test]
fn out_of_order_parse_replies_keep_newest_graph() {
	let mut h = Harness::new("");
	h.type_text("A -> B");
	h.advance(Duration::from_secs(1));
	h.type_text("A -> B -> C");
	h.advance(Duration::from_secs(1));
	let (older, newer) = (h.parse_for("A -> B"), h.parse_for("A -> B -> C"));
	assert!(older < newer);
	assert_eq!(h.state.parse_seq(), newer);

	h.answer_parse(newer, ok(chain(&["A", "B", "C"])));
	h.answer_parse(older, ok(chain(&["A", "B"])));

	assert_eq!(h.state.graph, Some(chain(&["A", "B", "C"])));
	assert_eq!(h.state.graph_revision, 1);
}

#[test]
fn invalid_text_keeps_last_good_graph() {
	let mut h = Harness::new("");
	h.type_text("A -> B");
	h.advance(Duration::from_secs(1));
	let seq = h.parse_for("A -> B");
	h.answer_parse(seq, ok(chain(&["A", "B"])));

	h.type_text("A -> ");
	h.advance(Duration::from_secs(1));
	let seq = h.parse_for("A -> ");
	h.answer_parse(
		seq,
		ParseReply {
			motif: None,
			error: Some(ValidationError(vec!["unexpected end of input".into()])),
		},
	);

	assert_eq!(h.state.graph, Some(chain(&["A", "B"])));
	assert_eq!(h.state.error.as_ref().map(ToString::to_string).as_deref(), Some("unexpected end of input"));
	assert_eq!(h.state.text, "A -> ");
}

#[test]
fn mount_restores_address_and_keeps_foreign_params() {
	let mut h = Harness::new("view=run&mS=A+-%3E+B&hostID=ds%3A%2F%2Fhemibrain");
	h.mount();

	assert_eq!(h.state.text, "A -> B");
	assert_eq!(h.state.dataset.as_deref(), Some("ds://hemibrain"));
	assert_eq!(h.parses, vec![(1, "A -> B".to_owned())]);
	assert_eq!(h.host_fetches, 1);

	h.type_text("A -> C");
	let query = h.bar.query();
	assert!(query.starts_with("view=run&"), "{query}");
	let restored = location::decode(&query);
	assert_eq!(restored.text.as_deref(), Some("A -> C"));
	assert_eq!(restored.dataset.as_deref(), Some("ds://hemibrain"));
}

#[test]
fn mount_without_address_uses_cached_text() {
	let mut h = Harness::new("");
	h.store.set_last_text("X -> Y").unwrap();
	h.mount();
	assert_eq!(h.state.text, "X -> Y");
}

#[test]
fn saved_snapshot_restores_text_and_parses_immediately() {
	let mut h = Harness::new("");
	h.type_text("A -> B");
	h.dispatch(Event::SaveRequested {
		name: "pair".into(),
		at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
	});
	assert_eq!(h.state.saved.len(), 1);
	assert_eq!(h.state.saved[0].motif_text, "A -> B");

	h.type_text("something else");
	let before = h.parses.len();
	h.dispatch(Event::LoadRequested { name: "pair".into() });

	assert_eq!(h.state.text, "A -> B");
	assert_eq!(h.parses.len(), before + 1);
	assert_eq!(h.parses.last().map(|(_, text)| text.as_str()), Some("A -> B"));

	h.dispatch(Event::DeleteRequested { name: "pair".into() });
	assert!(h.state.saved.is_empty());

	h.dispatch(Event::LoadRequested { name: "pair".into() });
	assert_eq!(h.state.text, "A -> B");
	assert!(h.state.notifications.last().unwrap().message.contains("pair"));
}

#[test]
fn execute_needs_text_and_dataset_and_runs_once() {
	let mut h = Harness::new("");
	h.type_text("A -> B");
	h.dispatch(Event::ExecuteRequested { at: h.now });
	assert!(h.executes.is_empty());

	h.dispatch(Event::DatasetChanged(Some("ds://1".into())));
	assert!(h.state.can_execute());
	h.dispatch(Event::ExecuteRequested { at: h.now });
	h.dispatch(Event::ExecuteRequested { at: h.now });
	assert_eq!(h.executes.len(), 1);
	assert_eq!(h.executes[0].host_id, "ds://1");
	assert!(!h.state.can_execute());

	let results = ResultsByColumn::from([
		("A".to_owned(), ResultColumn::from([(0, NodeId::from("1")), (1, NodeId::from("3"))])),
		("B".to_owned(), ResultColumn::from([(0, NodeId::from("2")), (1, NodeId::from("4"))])),
	]);
	let at = h.now + Duration::from_millis(1500);
	h.dispatch(Event::ExecuteSettled {
		outcome: Ok(ExecutionResult {
			results_by_column: results,
			metadata: Default::default(),
		}),
		at,
	});

	assert!(h.state.can_execute());
	assert_eq!(h.state.result_summary().as_deref(), Some("2 results in 1.5 seconds."));
	let table = h.state.result_table(1).unwrap();
	assert_eq!(table.rows, vec![vec!["1".to_owned(), "2".to_owned()]]);
	assert!(table.is_truncated());
}
