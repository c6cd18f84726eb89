//! GoBarber client core.
//!
//! The pieces a GoBarber front end is built from:
//!
//! - `auth`: the signed-in session and the `AuthProvider` handle
//! - `storage`: where the session is persisted between runs
//! - `api`: the HTTP client for the GoBarber backend
//! - `forms`: sign-in, sign-up and forgot-password flows with validation
//! - `toast`: notifications the flows hand back to the UI
//! - `config`: backend address and storage backend selection

pub mod api;
pub mod auth;
pub mod config;
pub mod forms;
pub mod models;
pub mod storage;
pub mod toast;

pub use api::{ApiClient, ApiError, SessionApi};
pub use auth::{AuthError, AuthProvider, SessionData};
pub use config::Config;
pub use forms::FormOutcome;
pub use models::{Credentials, ForgotPasswordData, SignUpData, User};
pub use storage::{Storage, StorageError};
pub use toast::{Toast, ToastKind};
