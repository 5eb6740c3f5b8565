//! Networking modules for the REST backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `http` owns the transport and default headers, `api` names the endpoints
//! the session layer calls, and `types` defines the shared wire schema.

pub mod api;
pub mod http;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;
