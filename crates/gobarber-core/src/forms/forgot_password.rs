use tracing::{info, warn};

use crate::api::ApiClient;
use crate::models::ForgotPasswordData;
use crate::toast::Toast;

use super::validation::{FieldErrors, Rule, Validate};
use super::{FormOutcome, EMAIL_REQUIRED};

impl Validate for ForgotPasswordData {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check("email", &self.email, &[Rule::Required(EMAIL_REQUIRED), Rule::Email]);
        errors.into_result()
    }
}

/// Validate `data` and ask for a password recovery e-mail
pub async fn forgot_password(api: &ApiClient, data: &ForgotPasswordData) -> FormOutcome {
    if let Err(errors) = data.validate() {
        return FormOutcome::Invalid(errors);
    }

    match api.forgot_password(data).await {
        Ok(()) => {
            info!(email = %data.email, "Password recovery requested");
            FormOutcome::Success(Some(Toast::success(
                "Recovery e-mail sent",
                "We sent you an e-mail to reset your password, check your inbox",
            )))
        }
        Err(e) => {
            warn!(error = %e, "Password recovery failed");
            FormOutcome::Failed(Toast::error(
                "Password recovery error",
                "Something went wrong while requesting password recovery, please try again",
            ))
        }
    }
}
