//! Invoice models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Pending,
    Paid,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
        }
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for InvoiceStatus {
    type Err = String;

    /// Exact match only: form values are not normalised.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            _ => Err(format!("Unknown invoice status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct Invoice {
    pub id: String,
    pub customer_id: String,
    /// Amount in cents
    pub amount: i64,
    pub status: String,
    /// ISO calendar date (YYYY-MM-DD)
    pub date: String,
}

/// Column values written by the insert statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInvoice {
    pub customer_id: String,
    pub amount_cents: i64,
    pub status: InvoiceStatus,
    pub date: String,
}

/// Column values replaced by the update statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceChanges {
    pub customer_id: String,
    pub amount_cents: i64,
    pub status: InvoiceStatus,
}
