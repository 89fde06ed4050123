//! Effect runner connecting the editor core to the browser.
//!
//! [`Studio`] owns the reactive copy of [`EditorState`]. Every event goes
//! through [`Studio::dispatch`]; the effects the core returns are carried out
//! here and report back as further events.

mod browser;

use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{info, warn};
use web_sys::File;
use web_time::Instant;

use crate::api::ApiClient;
use crate::config::Config;
use crate::studio::error::TransportError;
use crate::studio::location::{self, AddressBar, LocationState};
use crate::studio::results;
use crate::studio::store::{KeyValueBackend, MemoryBackend, PatternStore};
use crate::studio::{Effect, EditorState, Event};

use self::browser::{BrowserAddressBar, LocalStorageBackend};

struct Services {
	api: ApiClient,
	store: PatternStore<Rc<dyn KeyValueBackend>>,
	address: Rc<dyn AddressBar>,
	config: Config,
}

/// Handle to the running editor. Cheap to copy into event handlers.
#[derive(Clone, Copy)]
pub struct Studio {
	state: RwSignal<EditorState>,
	services: StoredValue<Rc<Services>, LocalStorage>,
}

impl Studio {
	/// Wires the editor to browser storage, the address bar and the API.
	pub fn new(config: Config) -> Self {
		let backend: Rc<dyn KeyValueBackend> = match LocalStorageBackend::open() {
			Some(storage) => Rc::new(storage),
			None => {
				warn!("local storage unavailable, saved motifs last for this session only");
				Rc::new(MemoryBackend::default())
			}
		};
		let services = Services {
			api: ApiClient::new(&config),
			store: PatternStore::new(backend, config.store_key.clone(), config.last_text_key.clone()),
			address: Rc::new(BrowserAddressBar),
			config: config.clone(),
		};
		Self {
			state: RwSignal::new(EditorState::new(&config)),
			services: StoredValue::new_local(Rc::new(services)),
		}
	}

	/// Reactive read access to the editor state.
	pub fn state(&self) -> ReadSignal<EditorState> {
		self.state.read_only()
	}

	/// Settings the studio was created with.
	pub fn config(&self) -> Config {
		self.services.with_value(|services| services.config.clone())
	}

	/// Restores text and dataset, then loads the catalog and the first parse.
	pub fn mount(&self) {
		let services = self.services.get_value();
		let last_text = services.store.last_text().unwrap_or_else(|err| {
			warn!("could not read the last edited motif: {err}");
			None
		});
		let location = location::restore(services.address.as_ref());
		info!("mounting editor, address carries text: {}", location.text.is_some());
		self.dispatch(Event::Mounted {
			location,
			last_text,
			at: Instant::now(),
		});
	}

	/// Applies `event` and carries out the resulting effects.
	pub fn dispatch(&self, event: Event) {
		let effects = self.state.try_update(|state| state.update(event)).unwrap_or_default();
		for effect in effects {
			self.run(effect);
		}
	}

	/// Link to another page that keeps the pattern and dataset in the address.
	pub fn href(&self, path: &str) -> String {
		let fields = self.state.with(|s| LocationState {
			text: Some(s.text.clone()).filter(|text| !text.is_empty()),
			dataset: s.dataset.clone(),
		});
		let query = self.services.with_value(|services| services.address.query());
		location::route_href(path, &query, &fields)
	}

	/// Reads a picked file and hands it to the upload flow.
	pub fn upload_file(&self, file: File) {
		let studio = *self;
		spawn_local(async move {
			let filename = file.name();
			match browser::read_file(&file).await {
				Ok(bytes) => studio.dispatch(Event::UploadRequested { filename, bytes }),
				Err(err) => studio.dispatch(Event::UploadSettled(Err(TransportError::Request(format!(
					"could not read {filename}: {err}"
				))))),
			}
		});
	}

	/// Downloads the full result set as CSV.
	pub fn export_results(&self) {
		let artifact = self.state.with_untracked(|state| {
			state
				.results
				.as_ref()
				.map(|r| results::export_csv(&r.results_by_column, state.dataset.as_deref()))
		});
		match artifact {
			Some(Ok(artifact)) => {
				if let Err(err) = browser::download(&artifact) {
					warn!("export of {} failed: {err}", artifact.filename);
				}
			}
			Some(Err(err)) => warn!("{err}"),
			None => {}
		}
	}

	fn run(&self, effect: Effect) {
		let studio = *self;
		let services = self.services.get_value();
		match effect {
			Effect::PersistLastText(text) => {
				if let Err(err) = services.store.set_last_text(&text) {
					warn!("could not cache the motif text: {err}");
				}
			}
			Effect::WriteLocation(state) => location::publish(services.address.as_ref(), &state),
			Effect::ArmParseTimer { token, delay } => set_timeout(
				move || {
					studio.dispatch(Event::ParseTimerElapsed {
						token,
						at: Instant::now(),
					})
				},
				delay,
			),
			Effect::SendParse { seq, text } => spawn_local(async move {
				let outcome = services.api.parse(&text).await;
				studio.dispatch(Event::ParseSettled { seq, outcome });
			}),
			Effect::SendExecute(request) => spawn_local(async move {
				let outcome = services.api.execute(&request).await;
				studio.dispatch(Event::ExecuteSettled {
					outcome,
					at: Instant::now(),
				});
			}),
			Effect::FetchHosts => spawn_local(async move {
				let hosts = services.api.hosts().await;
				studio.dispatch(Event::HostsLoaded(hosts));
			}),
			Effect::Upload { filename, bytes } => spawn_local(async move {
				let uri = services.api.upload(&filename, bytes).await;
				studio.dispatch(Event::UploadSettled(uri));
			}),
			Effect::SaveSnapshot(pattern) => {
				let name = pattern.name.clone();
				let result = services.store.save(pattern).and_then(|()| services.store.list());
				self.dispatch(Event::SnapshotSaved { name, result });
			}
			Effect::LoadSnapshot(name) => {
				let result = services.store.load(&name);
				self.dispatch(Event::SnapshotLoaded {
					name,
					result,
					at: Instant::now(),
				});
			}
			Effect::DeleteSnapshot(name) => {
				let result = services.store.delete(&name).and_then(|_| services.store.list());
				self.dispatch(Event::SnapshotDeleted { name, result });
			}
			Effect::ListSnapshots => self.dispatch(Event::SnapshotsListed(services.store.list())),
			Effect::ExpireNotification { id, after } => {
				set_timeout(move || studio.dispatch(Event::NotificationDismissed(id)), after)
			}
		}
	}
}

/// The studio provided by [`provide_studio`].
pub fn use_studio() -> Studio {
	expect_context::<Studio>()
}

/// Creates the studio, makes it available to the component tree and mounts it.
pub fn provide_studio(config: Config) -> Studio {
	let studio = Studio::new(config);
	provide_context(studio);
	studio.mount();
	studio
}
