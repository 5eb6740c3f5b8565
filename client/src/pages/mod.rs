//! Route-level page components.
//!
//! SYSTEM CONTEXT
//! ==============
//! `login` and `register` are public. Every other page is mounted behind
//! `ProtectedRoute` and may assume a resolved user in the session state.

pub mod dashboard;
pub mod login;
pub mod profile;
pub mod register;
pub mod workspace;
