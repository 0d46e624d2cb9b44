//! Customer statements.

use super::{CustomerField, DataError, DbPool};

/// Customers for the invoice form select, ordered by name
pub async fn list_customers(pool: &DbPool) -> Result<Vec<CustomerField>, DataError> {
    let customers = sqlx::query_as::<_, CustomerField>("SELECT id, name FROM customers ORDER BY name ASC")
        .fetch_all(pool)
        .await?;
    Ok(customers)
}

/// Insert a customer and return its generated id
#[cfg(test)]
pub async fn insert_customer(pool: &DbPool, name: &str, email: &str) -> Result<String, DataError> {
    let id: String = sqlx::query_scalar("INSERT INTO customers (name, email) VALUES (?, ?) RETURNING id")
        .bind(name)
        .bind(email)
        .fetch_one(pool)
        .await?;
    Ok(id)
}
