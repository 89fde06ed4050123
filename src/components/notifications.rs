use leptos::prelude::*;

use crate::runtime::use_studio;
use crate::studio::Event;
use crate::studio::error::{Level, Notification};

fn level_class(level: Level) -> &'static str {
	match level {
		Level::Info => "toast info",
		Level::Warn => "toast warn",
		Level::Error => "toast error",
	}
}

/// Transient messages. They expire on their own or close on click.
#[component]
pub fn Toasts() -> impl IntoView {
	let studio = use_studio();
	let state = studio.state();
	let items = move || state.with(|s| s.notifications.iter().cloned().collect::<Vec<_>>());

	view! {
		<div class="toasts">
			<For
				each=items
				key=|note: &Notification| note.id
				children=move |note: Notification| {
					let id = note.id;
					view! {
						<div class=level_class(note.level) on:click=move |_| studio.dispatch(Event::NotificationDismissed(id))>
							{note.message}
						</div>
					}
				}
			/>
		</div>
	}
}
