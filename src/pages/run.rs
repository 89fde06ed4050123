use leptos::prelude::*;

use crate::components::{DatasetPanel, MotifEditor, MotifView, ResultsTable, SavedPatterns};

/// Edit a motif, pick a host graph and run the search.
#[component]
pub fn RunPage() -> impl IntoView {
	view! {
		<div class="studio run">
			<div class="column editor-column">
				<MotifEditor />
				<SavedPatterns />
			</div>
			<div class="column view-column">
				<MotifView />
				<DatasetPanel />
				<ResultsTable />
			</div>
		</div>
	}
}
