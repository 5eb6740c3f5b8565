//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components read shared session state from Leptos context providers and
//! never mutate it directly; mutations go through the session handle.

pub mod app_header;
pub mod protected_route;
