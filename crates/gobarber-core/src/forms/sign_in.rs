use tracing::warn;

use crate::auth::{AuthError, AuthProvider};
use crate::models::Credentials;
use crate::toast::Toast;

use super::validation::{FieldErrors, Rule, Validate};
use super::{FormOutcome, EMAIL_REQUIRED, PASSWORD_REQUIRED};

impl Validate for Credentials {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors
            .check("email", &self.email, &[Rule::Required(EMAIL_REQUIRED), Rule::Email])
            .check("password", &self.password, &[Rule::Required(PASSWORD_REQUIRED)]);
        errors.into_result()
    }
}

pub fn failure_toast() -> Toast {
    Toast::error(
        "Authentication error",
        "Could not sign in, check your credentials",
    )
}

/// Validate `credentials` and sign in through `auth`
pub async fn sign_in(auth: &AuthProvider, credentials: &Credentials) -> FormOutcome {
    if let Err(errors) = credentials.validate() {
        return FormOutcome::Invalid(errors);
    }

    match auth.sign_in(credentials).await {
        Ok(()) => FormOutcome::Success(None),
        Err(AuthError::SignInInProgress) => FormOutcome::Failed(Toast::error(
            "Authentication error",
            "A sign-in is already in progress",
        )),
        Err(e) => {
            warn!(error = %e, "Sign-in failed");
            FormOutcome::Failed(failure_toast())
        }
    }
}
