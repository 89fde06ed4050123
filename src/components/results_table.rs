use leptos::prelude::*;

use crate::runtime::use_studio;
use crate::studio::results;

/// Summary, export and the first rows of the latest execution.
#[component]
pub fn ResultsTable() -> impl IntoView {
	let studio = use_studio();
	let state = studio.state();
	let config = studio.config();
	let cap = config.row_cap;
	let viewer_base = config.viewer_base_url;

	let body = move || {
		state.with(|s| {
			let (Some(result), Some(table)) = (&s.results, s.result_table(cap)) else {
				return view! { <p class="empty">"Results will appear here once you run a motif."</p> }
					.into_any();
			};
			if table.total_rows == 0 {
				return view! { <p class="empty">"No results found."</p> }.into_any();
			}

			let summary = s.result_summary().unwrap_or_default();
			let truncated = table.is_truncated().then(|| {
				view! {
					<p class="truncated">
						{format!(
							"Showing {} of {} rows. Export to get all of them.",
							table.rows.len(),
							table.total_rows,
						)}
					</p>
				}
			});
			let header = table.header.iter().map(|name| view! { <th>{name.clone()}</th> }).collect_view();
			let rows = table
				.rows
				.iter()
				.map(|row| {
					let href = results::row_link(row, &result.metadata, &viewer_base);
					let cells = row
						.iter()
						.map(|id| view! { <td>{id.clone()}</td> })
						.collect_view();
					view! {
						<tr>
							<td>
								<a href=href target="_blank" rel="noopener noreferrer">
									"View"
								</a>
							</td>
							{cells}
						</tr>
					}
				})
				.collect_view();

			view! {
				<p class="summary">{summary}</p>
				<button class="export" on:click=move |_| studio.export_results()>
					"Export CSV"
				</button>
				<table class="results">
					<thead>
						<tr>
							<th></th>
							{header}
						</tr>
					</thead>
					<tbody>{rows}</tbody>
				</table>
				{truncated}
			}
				.into_any()
		})
	};

	view! { <section class="results-panel">{body}</section> }
}
