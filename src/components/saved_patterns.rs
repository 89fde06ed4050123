use chrono::Utc;
use leptos::ev::SubmitEvent;
use leptos::prelude::*;

use crate::runtime::use_studio;
use crate::studio::Event;
use crate::studio::model::SavedPattern;

/// Save the current motif under a name, and load or delete earlier ones.
#[component]
pub fn SavedPatterns() -> impl IntoView {
	let studio = use_studio();
	let state = studio.state();
	let name = RwSignal::new(String::new());

	let on_save = move |ev: SubmitEvent| {
		ev.prevent_default();
		studio.dispatch(Event::SaveRequested {
			name: name.get_untracked(),
			at: Utc::now(),
		});
		name.set(String::new());
	};

	let saved = move || state.with(|s| s.saved.clone());

	view! {
		<section class="saved-patterns">
			<form on:submit=on_save>
				<input
					type="text"
					placeholder="Motif name"
					prop:value=move || name.get()
					on:input=move |ev| name.set(event_target_value(&ev))
				/>
				<button type="submit">"Save"</button>
			</form>
			<Show
				when=move || state.with(|s| !s.saved.is_empty())
				fallback=|| view! { <p class="empty">"No saved motifs yet."</p> }
			>
				<ul>
					<For
						each=saved
						key=|pattern: &SavedPattern| (pattern.name.clone(), pattern.saved_date)
						children=move |pattern: SavedPattern| {
							let (load, delete) = (pattern.name.clone(), pattern.name.clone());
							view! {
								<li>
									<span class="name">{pattern.name}</span>
									<span class="date">
										{pattern.saved_date.format("%Y-%m-%d %H:%M").to_string()}
									</span>
									<button on:click=move |_| {
										studio.dispatch(Event::LoadRequested { name: load.clone() })
									}>"Load"</button>
									<button on:click=move |_| {
										studio.dispatch(Event::DeleteRequested { name: delete.clone() })
									}>"Delete"</button>
								</li>
							}
						}
					/>
				</ul>
			</Show>
		</section>
	}
}
