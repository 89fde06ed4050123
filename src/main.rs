use leptos::prelude::*;
use motif_studio::{App, init_logging};

fn main() {
	init_logging();
	mount_to_body(App)
}
