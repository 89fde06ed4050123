//! Motif studio: an editor for graph motif queries, with a live drawing of
//! the parsed motif and a search against a chosen host graph.
//!
//! [`studio`] holds the browser-free core. Everything else is the Leptos
//! shell around it.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

pub mod config;
pub mod studio;

mod api;
mod components;
mod pages;
mod runtime;

use crate::components::Toasts;
use crate::config::Config;
use crate::pages::build::BuildPage;
use crate::pages::not_found::NotFound;
use crate::pages::run::RunPage;
use crate::runtime::provide_studio;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// Top-level app: provides the studio, renders the run and build views and handles 404's.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();
	let studio = provide_studio(Config::from_build_env());

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />

		<Title text="Motif Studio" />

		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<nav class="studio-nav">
				<span class="brand">"Motif Studio"</span>
				<A href=move || studio.href("/")>"Run"</A>
				<A href=move || studio.href("/build")>"Build"</A>
			</nav>
			<ErrorBoundary fallback=|errors| {
				view! {
					<h1>"Uh oh! Something went wrong!"</h1>
					<ul>
						{move || {
							errors
								.get()
								.into_iter()
								.map(|(_, e)| view! { <li>{e.to_string()}</li> })
								.collect_view()
						}}
					</ul>
				}
			}>
				<main>
					<Routes fallback=|| view! { <NotFound /> }>
						<Route path=path!("/") view=RunPage />
						<Route path=path!("/build") view=BuildPage />
					</Routes>
				</main>
			</ErrorBoundary>
			<Toasts />
		</Router>
	}
}
