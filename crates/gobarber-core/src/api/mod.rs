//! REST API client module for the GoBarber backend.
//!
//! This module provides the `ApiClient` for creating sessions, registering
//! accounts and requesting password recovery e-mails, and the `SessionApi`
//! trait the session store signs in through.
//!
//! Authenticated requests carry the session token as a bearer token.

pub mod client;
pub mod error;

pub use client::{ApiClient, SessionApi};
pub use error::ApiError;
