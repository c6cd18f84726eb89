//! Form flows for the sign-in, sign-up and forgot-password pages.
//!
//! Each flow validates its input, talks to the backend only when the input
//! is valid, and reports back with either field errors or a notification.
//! Backend failures are never distinguished for the user: wrong credentials
//! and an unreachable server produce the same message.

pub mod forgot_password;
pub mod sign_in;
pub mod sign_up;
pub mod validation;

use crate::toast::Toast;

pub use forgot_password::forgot_password;
pub use sign_in::sign_in;
pub use sign_up::sign_up;
pub use validation::{FieldErrors, Rule, Validate};

pub(crate) const NAME_REQUIRED: &str = "Name is required";
pub(crate) const EMAIL_REQUIRED: &str = "E-mail is required";
pub(crate) const PASSWORD_REQUIRED: &str = "Password is required";
pub(crate) const PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters";

/// Minimum password length accepted at sign-up
pub const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    /// Input was rejected before anything was sent
    Invalid(FieldErrors),
    /// The request went through; some flows have something to say about it
    Success(Option<Toast>),
    /// The request failed
    Failed(Toast),
}

impl FormOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FormOutcome::Success(_))
    }

    pub fn toast(&self) -> Option<&Toast> {
        match self {
            FormOutcome::Success(toast) => toast.as_ref(),
            FormOutcome::Failed(toast) => Some(toast),
            FormOutcome::Invalid(_) => None,
        }
    }
}
