use leptos::prelude::*;

use crate::components::{ConstraintList, MotifEditor, MotifView};

/// Edit a motif and inspect its constraints without running it.
#[component]
pub fn BuildPage() -> impl IntoView {
	view! {
		<div class="studio build">
			<div class="column editor-column">
				<MotifEditor />
			</div>
			<div class="column view-column">
				<MotifView />
				<ConstraintList />
			</div>
		</div>
	}
}
