use leptos::prelude::*;

use crate::runtime::use_studio;
use crate::studio::projection::{ConstraintGroup, constraint_listing};

fn groups_view(heading: &'static str, groups: Vec<ConstraintGroup>) -> impl IntoView {
	(!groups.is_empty()).then(|| {
		let groups = groups
			.into_iter()
			.map(|group| {
				let rows = group
					.rows
					.into_iter()
					.map(|row| {
						view! {
							<tr>
								<td>{row.attribute}</td>
								<td>{row.operator}</td>
								<td>{row.value}</td>
							</tr>
						}
					})
					.collect_view();
				view! {
					<div class="constraint-group">
						<h4>{group.label}</h4>
						<table>
							<tbody>{rows}</tbody>
						</table>
					</div>
				}
			})
			.collect_view();
		view! {
			<h3>{heading}</h3>
			{groups}
		}
	})
}

/// Attribute constraints of every constrained node and edge.
#[component]
pub fn ConstraintList() -> impl IntoView {
	let state = use_studio().state();

	let body = move || {
		let listing = state.with(|s| s.graph.as_ref().map(constraint_listing)).unwrap_or_default();
		if listing.nodes.is_empty() && listing.links.is_empty() {
			return view! { <p class="empty">"No constraints in this motif."</p> }.into_any();
		}
		view! {
			{groups_view("Nodes", listing.nodes)}
			{groups_view("Edges", listing.links)}
		}
		.into_any()
	};

	view! { <section class="constraint-list">{body}</section> }
}
