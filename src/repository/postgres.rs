//! PostgreSQL adapters backed by `sqlx`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::domain::{
    Customer, CustomerDirectory, Order, OrderDraft, OrderEdit, OrderRepository, OrderStatus, Quantity,
    RepositoryError, UnitPrice, Viewer,
};

const ORDER_COLUMNS: &str =
    "id, client_name, client_email, product_name, quantity, unit_price, status, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i64,
    client_name: String,
    client_email: String,
    product_name: String,
    quantity: i32,
    unit_price: Decimal,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let invalid = |what: String| RepositoryError::InvalidRow(format!("order {id}: {what}"));
        Ok(Order {
            id,
            quantity: Quantity::try_from(i64::from(row.quantity)).map_err(|e| invalid(e.to_string()))?,
            unit_price: UnitPrice::new(row.unit_price).map_err(|e| invalid(e.to_string()))?,
            status: row.status.parse::<OrderStatus>().map_err(|e| invalid(e.to_string()))?,
            client_name: row.client_name,
            client_email: row.client_email,
            product_name: row.product_name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn storage_quantity(quantity: Quantity) -> Result<i32, RepositoryError> {
    i32::try_from(quantity.value()).map_err(|_| RepositoryError::Storage(format!("quantity {quantity} exceeds storage range")))
}

/// Customer lookups against the `customers` table.
#[derive(Clone)]
pub struct PgCustomerDirectory { db: PgPool }

impl PgCustomerDirectory {
    pub fn new(db: PgPool) -> Self { Self { db } }
}

#[async_trait]
impl CustomerDirectory for PgCustomerDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, RepositoryError> {
        let customer = sqlx::query_as::<_, Customer>("SELECT id, name, email FROM customers WHERE email = $1")
            .bind(email).fetch_optional(&self.db).await?;
        Ok(customer)
    }
}

/// Order storage in the `orders` table. Concurrent writes to one row are
/// serialized by PostgreSQL's row locks.
#[derive(Clone)]
pub struct PgOrderRepository { db: PgPool, customers: Arc<dyn CustomerDirectory> }

impl PgOrderRepository {
    pub fn new(db: PgPool, customers: Arc<dyn CustomerDirectory>) -> Self { Self { db, customers } }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn create(&self, draft: &OrderDraft) -> Result<Order, RepositoryError> {
        let customer = self.customers.find_by_email(&draft.client_email).await?
            .ok_or_else(|| RepositoryError::ClientNotFound { email: draft.client_email.clone() })?;
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "INSERT INTO orders (client_name, client_email, product_name, quantity, unit_price, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW()) RETURNING {ORDER_COLUMNS}"))
            .bind(&customer.name).bind(&customer.email).bind(&draft.product_name)
            .bind(storage_quantity(draft.quantity)?).bind(draft.unit_price.amount()).bind(OrderStatus::Pending.as_str())
            .fetch_one(&self.db).await?;
        row.try_into()
    }

    async fn get_by_id(&self, id: i64) -> Result<Order, RepositoryError> {
        sqlx::query_as::<_, OrderRow>(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
            .bind(id).fetch_optional(&self.db).await?
            .ok_or(RepositoryError::NotFound { id })?
            .try_into()
    }

    async fn list_for_viewer(&self, viewer: &Viewer) -> Result<Vec<Order>, RepositoryError> {
        let rows = if viewer.is_admin() {
            sqlx::query_as::<_, OrderRow>(&format!("SELECT {ORDER_COLUMNS} FROM orders ORDER BY id"))
                .fetch_all(&self.db).await?
        } else {
            sqlx::query_as::<_, OrderRow>(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE client_email = $1 ORDER BY id"))
                .bind(&viewer.email).fetch_all(&self.db).await?
        };
        rows.into_iter().map(Order::try_from).collect()
    }

    async fn update_status(&self, id: i64, status: OrderStatus) -> Result<Order, RepositoryError> {
        sqlx::query_as::<_, OrderRow>(&format!(
            "UPDATE orders SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING {ORDER_COLUMNS}"))
            .bind(id).bind(status.as_str()).fetch_optional(&self.db).await?
            .ok_or(RepositoryError::NotFound { id })?
            .try_into()
    }

    async fn update_fields(&self, id: i64, edit: &OrderEdit) -> Result<Order, RepositoryError> {
        sqlx::query_as::<_, OrderRow>(&format!(
            "UPDATE orders SET product_name = $2, quantity = $3, unit_price = $4, updated_at = NOW() \
             WHERE id = $1 RETURNING {ORDER_COLUMNS}"))
            .bind(id).bind(&edit.product_name).bind(storage_quantity(edit.quantity)?).bind(edit.unit_price.amount())
            .fetch_optional(&self.db).await?
            .ok_or(RepositoryError::NotFound { id })?
            .try_into()
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1").bind(id).execute(&self.db).await?;
        if result.rows_affected() == 0 { return Err(RepositoryError::NotFound { id }); }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(status: &str, quantity: i32) -> OrderRow {
        let now = Utc::now();
        OrderRow {
            id: 4, client_name: "Alice".into(), client_email: "a@b.com".into(), product_name: "Widget".into(),
            quantity, unit_price: Decimal::new(1000, 2), status: status.into(), created_at: now, updated_at: now,
        }
    }

    #[test]
    fn test_row_maps_to_order() {
        let order = Order::try_from(row("On Process", 3)).unwrap();
        assert_eq!(order.status, OrderStatus::OnProcess);
        assert_eq!(order.total(), Decimal::new(30, 0));
    }

    #[test]
    fn test_corrupt_rows_are_rejected() {
        assert!(matches!(Order::try_from(row("shipped", 3)), Err(RepositoryError::InvalidRow(_))));
        assert!(matches!(Order::try_from(row("Pending", 0)), Err(RepositoryError::InvalidRow(_))));
    }
}
