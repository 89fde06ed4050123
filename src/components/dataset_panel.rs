use leptos::ev;
use leptos::prelude::*;
use web_sys::HtmlInputElement;
use web_time::Instant;

use crate::runtime::use_studio;
use crate::studio::controller::UPLOAD_EXTENSIONS;
use crate::studio::model::DatasetDescriptor;
use crate::studio::{EditorState, Event};

/// Host selection, host upload, search flags and the run button.
#[component]
pub fn DatasetPanel() -> impl IntoView {
	let studio = use_studio();
	let state = studio.state();

	let hosts = move || state.with(|s| s.hosts.clone());
	let accept = UPLOAD_EXTENSIONS.map(|ext| format!(".{ext}")).join(",");

	let on_select = move |ev: ev::Event| {
		let uri = event_target_value(&ev);
		studio.dispatch(Event::DatasetChanged(Some(uri).filter(|uri| !uri.is_empty())));
	};

	let on_file = move |ev: ev::Event| {
		let input: HtmlInputElement = event_target(&ev);
		if let Some(file) = input.files().and_then(|files| files.get(0)) {
			studio.upload_file(file);
		}
		// Allow picking the same file again.
		input.set_value("");
	};

	let on_automorphisms = move |ev: ev::Event| {
		let mut options = state.with_untracked(|s| s.options);
		options.allow_automorphisms = event_target_checked(&ev);
		studio.dispatch(Event::OptionsChanged(options));
	};
	let on_ignore_direction = move |ev: ev::Event| {
		let mut options = state.with_untracked(|s| s.options);
		options.ignore_direction = event_target_checked(&ev);
		studio.dispatch(Event::OptionsChanged(options));
	};

	view! {
		<div class="dataset-panel">
			<label>
				"Host graph "
				<select on:change=on_select>
					<option value="" prop:selected=move || state.with(|s| s.dataset.is_none())>
						"Choose a dataset"
					</option>
					<For
						each=hosts
						key=|host: &DatasetDescriptor| host.uri.clone()
						children=move |host: DatasetDescriptor| {
							let uri = host.uri.clone();
							view! {
								<option
									value=host.uri
									prop:selected=move || state.with(|s| s.dataset.as_deref() == Some(uri.as_str()))
								>
									{host.name}
								</option>
							}
						}
					/>
				</select>
			</label>
			<label class="upload">
				"Upload host graph "
				<input
					type="file"
					accept=accept
					disabled=move || state.with(|s| s.uploading)
					on:change=on_file
				/>
				{move || state.with(|s| s.uploading).then(|| view! { <span>"Uploading..."</span> })}
			</label>
			<label>
				<input
					type="checkbox"
					prop:checked=move || state.with(|s| s.options.allow_automorphisms)
					on:change=on_automorphisms
				/>
				" Allow automorphisms"
			</label>
			<label>
				<input
					type="checkbox"
					prop:checked=move || state.with(|s| s.options.ignore_direction)
					on:change=on_ignore_direction
				/>
				" Ignore edge direction"
			</label>
			<button
				class="run"
				disabled=move || !state.with(EditorState::can_execute)
				on:click=move |_| studio.dispatch(Event::ExecuteRequested { at: Instant::now() })
			>
				{move || state.with(EditorState::run_label)}
			</button>
		</div>
	}
}
