//! Binary entry for the CSR bundle.

// The bin target only touches the app crate and leptos; every other
// dependency is consumed through the library.
#![allow(unused_crate_dependencies)]

use mule_defense::{App, init_logging};

fn main() {
	init_logging();
	leptos::mount::mount_to_body(App);
}
