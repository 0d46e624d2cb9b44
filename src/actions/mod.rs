//! Form actions.
//!
//! Every action validates the raw submission, performs at most one write,
//! revalidates the affected view and ends in one of three outcomes: a
//! redirect, a plain completion, or a rejection carrying a [`FormState`] for
//! the form to render. Only failures the form cannot explain come back as
//! [`ActionError`].

mod invoices;
mod users;

pub use invoices::{create_invoice, delete_invoice, update_invoice};
pub use users::{authenticate, sign_up_user};

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use crate::auth::{AuthProvider, SessionToken};
use crate::cache::Revalidator;
use crate::db::{DataError, DbPool};
use crate::schema::FieldErrors;

/// Invoice list view, revalidated after every invoice write
pub const INVOICES_PATH: &str = "/dashboard/invoices";
/// Landing page after sign-in
pub const DASHBOARD_PATH: &str = "/dashboard";

pub mod messages {
    pub const CREATE_MISSING_FIELDS: &str = "Missing Fields. Failed to Create Invoice.";
    pub const UPDATE_MISSING_FIELDS: &str = "Missing Fields. Failed to Update Invoice.";
    pub const CREATE_DB_ERROR: &str = "Database Error: Failed to Create Invoice.";
    pub const UPDATE_DB_ERROR: &str = "Database Error: Failed to Update Invoice.";
    pub const DELETE_DB_ERROR: &str = "Database Error: Failed to Delete Invoice.";
    pub const INVALID_CREDENTIALS: &str = "Invalid credentials.";
    pub const SOMETHING_WENT_WRONG: &str = "Something went wrong.";
    pub const SIGN_UP_INVALID: &str = "Credentials Inputed Incorrectly";
    pub const USER_EXISTS: &str = "User Already Exists";
}

/// Source of the server-assigned invoice date
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// UTC calendar date
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Utc::now().date_naive()
    }
}

/// Collaborators an action needs, passed explicitly on every call
#[derive(Clone)]
pub struct ActionContext {
    pub db: DbPool,
    pub revalidator: Arc<dyn Revalidator>,
    pub auth: Arc<dyn AuthProvider>,
    pub clock: Arc<dyn Clock>,
}

impl ActionContext {
    pub fn new(db: DbPool, revalidator: Arc<dyn Revalidator>, auth: Arc<dyn AuthProvider>) -> Self {
        Self {
            db,
            revalidator,
            auth,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

/// Messages returned to the submitting form
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct FormState {
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub errors: HashMap<String, Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FormState {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            errors: HashMap::new(),
            message: Some(message.into()),
        }
    }

    pub fn with_errors(errors: FieldErrors, message: impl Into<String>) -> Self {
        Self {
            errors: errors.into_map(),
            message: Some(message.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.message.is_none()
    }
}

/// Why an action handed a [`FormState`] back instead of finishing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    Validation,
    Persistence,
    Conflict,
    Credentials,
    Provider,
}

#[derive(Debug)]
pub enum ActionOutcome {
    /// Navigate away; ends the submission
    Redirect {
        to: &'static str,
        session: Option<SessionToken>,
    },
    Completed,
    Rejected {
        reason: RejectReason,
        state: FormState,
    },
}

impl ActionOutcome {
    pub fn redirect(to: &'static str) -> Self {
        Self::Redirect { to, session: None }
    }

    pub fn rejected(reason: RejectReason, state: FormState) -> Self {
        Self::Rejected { reason, state }
    }

    /// The form state of a rejection, if this is one
    pub fn state(&self) -> Option<&FormState> {
        match self {
            Self::Rejected { state, .. } => Some(state),
            _ => None,
        }
    }
}

/// Failures that propagate past the form
#[derive(Error, Debug)]
pub enum ActionError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error("Failed to hash password: {0}")]
    PasswordHash(String),

    #[error("Sign-in failed: {0}")]
    SignIn(#[source] anyhow::Error),
}
