//! Shared contract between the registro client and server: the field rules
//! both sides enforce, and a typed client for the HTTP API.

/// Talk to the registration API.
pub mod api;

/// Field rules shared by client- and server-side validation.
pub mod validate;
