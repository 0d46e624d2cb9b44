//! Account actions: authenticate and sign up.

use tracing::{debug, info, warn};

use super::{
    messages, ActionContext, ActionError, ActionOutcome, FormState, RejectReason, DASHBOARD_PATH,
};
use crate::auth::{hash_password, AuthErrorKind, SignInError, CREDENTIALS_PROVIDER};
use crate::db::{self, NewUser};
use crate::schema::{parse_sign_up_form, FormData};

/// Sign in with the credentials provider. Known provider failures become form
/// messages; anything outside the provider's taxonomy propagates.
pub async fn authenticate(
    ctx: &ActionContext,
    prior: &FormState,
    form: &FormData,
) -> Result<ActionOutcome, ActionError> {
    match ctx.auth.sign_in(CREDENTIALS_PROVIDER, form).await {
        Ok(signed_in) => Ok(ActionOutcome::Redirect {
            to: DASHBOARD_PATH,
            session: Some(signed_in.session),
        }),
        Err(SignInError::Auth(e)) => {
            debug!(kind = %e.kind, resubmitted = !prior.is_empty(), "Sign-in rejected");
            let (reason, message) = match e.kind {
                AuthErrorKind::CredentialsSignin => {
                    (RejectReason::Credentials, messages::INVALID_CREDENTIALS)
                }
                _ => (RejectReason::Provider, messages::SOMETHING_WENT_WRONG),
            };
            Ok(ActionOutcome::rejected(reason, FormState::message(message)))
        }
        Err(SignInError::Internal(e)) => Err(ActionError::SignIn(e)),
    }
}

/// Register a user and sign them straight in with the same submission.
///
/// The existence check only gives a friendly message early; the UNIQUE
/// constraint on `users.email` is what keeps two racing sign-ups apart, and
/// its conflict is reported the same way.
pub async fn sign_up_user(
    ctx: &ActionContext,
    prior: &FormState,
    form: &FormData,
) -> Result<ActionOutcome, ActionError> {
    let input = match parse_sign_up_form(form) {
        Ok(input) => input,
        Err(errors) => {
            debug!("Sign-up form failed validation");
            return Ok(ActionOutcome::rejected(
                RejectReason::Validation,
                FormState::with_errors(errors, messages::SIGN_UP_INVALID),
            ));
        }
    };

    if db::find_user_by_email(&ctx.db, &input.email).await?.is_some() {
        debug!(email = %input.email, "Sign-up for existing email");
        return Ok(user_exists());
    }

    let password_hash =
        hash_password(&input.password).map_err(|e| ActionError::PasswordHash(e.to_string()))?;

    let user = NewUser {
        email: input.email,
        name: input.username,
        password_hash,
    };

    match db::insert_user(&ctx.db, &user).await {
        Ok(()) => info!(email = %user.email, "User signed up"),
        Err(e) if e.is_conflict() => {
            warn!(email = %user.email, "Concurrent sign-up lost the race for this email");
            return Ok(user_exists());
        }
        Err(e) => return Err(e.into()),
    }

    authenticate(ctx, prior, form).await
}

fn user_exists() -> ActionOutcome {
    ActionOutcome::rejected(RejectReason::Conflict, FormState::message(messages::USER_EXISTS))
}
