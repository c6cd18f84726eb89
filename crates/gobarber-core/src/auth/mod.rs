//! Authentication module for managing the signed-in session.
//!
//! This module provides:
//! - `Session`: user + token mirrored between memory and `Storage`
//! - `AuthProvider`: shared handle exposing `sign_in`, `sign_out` and
//!   `update_user` to the rest of the application
//!
//! The session is persisted under two keys, `@Gobarber:token` and
//! `@Gobarber:user`, and restored when the provider is created.

pub mod error;
pub mod provider;
pub mod session;

pub use error::AuthError;
pub use provider::AuthProvider;
pub use session::{Session, SessionData, TOKEN_KEY, USER_KEY};
