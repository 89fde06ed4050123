use leptos::prelude::*;
use leptos_router::components::A;

use crate::runtime::use_studio;

/// 404 page.
#[component]
pub fn NotFound() -> impl IntoView {
	let studio = use_studio();
	view! {
		<div class="not-found">
			<h1>"Nothing here"</h1>
			<A href=move || studio.href("/")>"Back to the studio"</A>
		</div>
	}
}
