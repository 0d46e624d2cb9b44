//! Invoice statements. Each call is a single parameterized statement.

use super::{DataError, DbPool, InvoiceChanges, NewInvoice};

pub async fn insert_invoice(pool: &DbPool, invoice: &NewInvoice) -> Result<(), DataError> {
    sqlx::query("INSERT INTO invoices (customer_id, amount, status, date) VALUES (?, ?, ?, ?)")
        .bind(&invoice.customer_id)
        .bind(invoice.amount_cents)
        .bind(invoice.status.as_str())
        .bind(&invoice.date)
        .execute(pool)
        .await?;
    Ok(())
}

/// Replace customer, amount and status. Returns the number of rows touched.
pub async fn update_invoice(
    pool: &DbPool,
    id: &str,
    changes: &InvoiceChanges,
) -> Result<u64, DataError> {
    let result = sqlx::query("UPDATE invoices SET customer_id = ?, amount = ?, status = ? WHERE id = ?")
        .bind(&changes.customer_id)
        .bind(changes.amount_cents)
        .bind(changes.status.as_str())
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Returns the number of rows removed; zero when the id is unknown.
pub async fn delete_invoice(pool: &DbPool, id: &str) -> Result<u64, DataError> {
    let result = sqlx::query("DELETE FROM invoices WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
pub async fn get_invoice(pool: &DbPool, id: &str) -> Result<Option<super::Invoice>, DataError> {
    let invoice = sqlx::query_as::<_, super::Invoice>(
        "SELECT id, customer_id, amount, status, date FROM invoices WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(invoice)
}
