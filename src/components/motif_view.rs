use leptos::prelude::*;

use super::force_graph::ForceGraphCanvas;
use crate::runtime::use_studio;
use crate::studio::projection::{RenderableGraph, project};

/// The last good graph, drawn, with the current validation error above it.
#[component]
pub fn MotifView() -> impl IntoView {
	let state = use_studio().state();
	let graph = Memo::new(move |_| state.with(|s| s.graph.as_ref().map(project).unwrap_or_default()));
	let error = move || state.with(|s| s.error.as_ref().map(ToString::to_string));

	view! {
		<div class="motif-view">
			{move || error().map(|message| view! { <pre class="motif-error">{message}</pre> })}
			<Show
				when=move || !graph.with(RenderableGraph::is_empty)
				fallback=|| view! { <p class="empty">"Write a motif to see it drawn here."</p> }
			>
				<div class="motif-canvas-frame">
					<ForceGraphCanvas data=graph />
				</div>
			</Show>
		</div>
	}
}
