//! # credits-client
//!
//! Leptos frontend for the extracurricular credits portal.
//!
//! This crate contains the authentication session store, the REST client it
//! drives, role-aware route guarding, and the pages built on top of them.
//! The `hydrate` feature builds the browser bundle; `ssr` builds the same
//! components for server rendering inside `credits-server`.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// Browser entry point: install logging and hydrate the server-rendered body.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::hydrate_body(app::App);
}
