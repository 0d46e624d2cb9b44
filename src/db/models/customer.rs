//! Customer models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Trimmed customer shape used to populate the invoice form select
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CustomerField {
    pub id: String,
    pub name: String,
}
