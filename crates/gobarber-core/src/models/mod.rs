//! Data models for GoBarber entities.
//!
//! This module contains the wire and domain structures shared by the
//! API client, the session store and the forms:
//!
//! - `User`: the signed-in identity returned by the backend
//! - `Credentials`, `SessionResponse`: sign-in request and response
//! - `SignUpData`, `ForgotPasswordData`: account creation and recovery bodies

pub mod user;

pub use user::{Credentials, ForgotPasswordData, SessionResponse, SignUpData, User};
