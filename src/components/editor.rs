use leptos::prelude::*;
use web_time::Instant;

use crate::runtime::use_studio;
use crate::studio::Event;

/// Text area holding the motif source.
#[component]
pub fn MotifEditor() -> impl IntoView {
	let studio = use_studio();
	let state = studio.state();
	let text = move || state.with(|s| s.text.clone());

	view! {
		<textarea
			class="motif-editor"
			spellcheck="false"
			placeholder="Neuron_A -> Neuron_B"
			prop:value=text
			on:input=move |ev| {
				studio
					.dispatch(Event::TextChanged {
						text: event_target_value(&ev),
						at: Instant::now(),
					})
			}
		/>
	}
}
