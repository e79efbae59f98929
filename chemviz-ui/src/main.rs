//! Chemviz Dashboard
//!
//! Chemical equipment dashboard built with Leptos (WASM).
//!
//! # Features
//!
//! - Login and registration gate backed by browser storage
//! - CSV/Excel upload with an instant summary
//! - Bar, doughnut and trend charts of the upload history
//! - History table with per-dataset PDF reports
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles to
//! WebAssembly. View state machines live in the `chemviz` core crate; this
//! crate renders them and talks to the backend over HTTP.

use leptos::*;

mod api;
mod app;
mod components;
mod pages;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    // Mount the app to the document body
    mount_to_body(|| view! { <app::App /> });
}
