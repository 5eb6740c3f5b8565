//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! `session` owns and mutates authentication state; `auth` is the read-only
//! snapshot the rest of the UI consumes through a signal.

pub mod auth;
pub mod session;
