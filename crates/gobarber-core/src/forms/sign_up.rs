use tracing::{info, warn};

use crate::api::ApiClient;
use crate::models::SignUpData;
use crate::toast::Toast;

use super::validation::{FieldErrors, Rule, Validate};
use super::{
    FormOutcome, EMAIL_REQUIRED, MIN_PASSWORD_LENGTH, NAME_REQUIRED, PASSWORD_REQUIRED,
    PASSWORD_TOO_SHORT,
};

impl Validate for SignUpData {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors
            .check("name", &self.name, &[Rule::Required(NAME_REQUIRED)])
            .check("email", &self.email, &[Rule::Required(EMAIL_REQUIRED), Rule::Email])
            .check(
                "password",
                &self.password,
                &[
                    Rule::Required(PASSWORD_REQUIRED),
                    Rule::MinLength(MIN_PASSWORD_LENGTH, PASSWORD_TOO_SHORT),
                ],
            );
        errors.into_result()
    }
}

/// Validate `data` and register a new account
pub async fn sign_up(api: &ApiClient, data: &SignUpData) -> FormOutcome {
    if let Err(errors) = data.validate() {
        return FormOutcome::Invalid(errors);
    }

    match api.create_user(data).await {
        Ok(()) => {
            info!(email = %data.email, "Account created");
            FormOutcome::Success(Some(Toast::success(
                "Account created",
                "You can now sign in to GoBarber",
            )))
        }
        Err(e) => {
            warn!(error = %e, "Sign-up failed");
            FormOutcome::Failed(Toast::error(
                "Sign-up error",
                "Something went wrong while creating your account, please try again",
            ))
        }
    }
}
