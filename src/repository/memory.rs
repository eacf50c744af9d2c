//! In-process adapters for tests and local runs without PostgreSQL.

use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::{
    Customer, CustomerDirectory, Order, OrderDraft, OrderEdit, OrderRepository, OrderStatus, RepositoryError, Viewer,
};

/// Fixed set of customers, looked up by exact email.
#[derive(Debug, Default)]
pub struct InMemoryCustomerDirectory { customers: RwLock<Vec<Customer>> }

impl InMemoryCustomerDirectory {
    pub fn new() -> Self { Self::default() }

    pub fn with_customers(customers: impl IntoIterator<Item = Customer>) -> Self {
        Self { customers: RwLock::new(customers.into_iter().collect()) }
    }

    /// Register a customer and return the stored record.
    pub async fn insert(&self, name: impl Into<String>, email: impl Into<String>) -> Customer {
        let mut customers = self.customers.write().await;
        let customer = Customer { id: customers.len() as i64 + 1, name: name.into(), email: email.into() };
        customers.push(customer.clone());
        customer
    }
}

#[async_trait]
impl CustomerDirectory for InMemoryCustomerDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, RepositoryError> {
        Ok(self.customers.read().await.iter().find(|c| c.email == email).cloned())
    }
}

#[derive(Debug, Default)]
struct Table { next_id: i64, rows: BTreeMap<i64, Order> }

/// Order storage guarded by a single async lock, so writes are serialized.
pub struct InMemoryOrderRepository { customers: Arc<dyn CustomerDirectory>, table: RwLock<Table> }

impl InMemoryOrderRepository {
    pub fn new(customers: Arc<dyn CustomerDirectory>) -> Self {
        Self { customers, table: RwLock::new(Table { next_id: 1, rows: BTreeMap::new() }) }
    }

    pub async fn len(&self) -> usize { self.table.read().await.rows.len() }

    pub async fn is_empty(&self) -> bool { self.len().await == 0 }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn create(&self, draft: &OrderDraft) -> Result<Order, RepositoryError> {
        let customer = self.customers.find_by_email(&draft.client_email).await?
            .ok_or_else(|| RepositoryError::ClientNotFound { email: draft.client_email.clone() })?;
        let mut table = self.table.write().await;
        let id = table.next_id;
        table.next_id += 1;
        let now = Utc::now();
        let order = Order {
            id, client_name: customer.name, client_email: customer.email, product_name: draft.product_name.clone(),
            quantity: draft.quantity, unit_price: draft.unit_price, status: OrderStatus::Pending,
            created_at: now, updated_at: now,
        };
        table.rows.insert(id, order.clone());
        Ok(order)
    }

    async fn get_by_id(&self, id: i64) -> Result<Order, RepositoryError> {
        self.table.read().await.rows.get(&id).cloned().ok_or(RepositoryError::NotFound { id })
    }

    async fn list_for_viewer(&self, viewer: &Viewer) -> Result<Vec<Order>, RepositoryError> {
        let table = self.table.read().await;
        Ok(table.rows.values().filter(|o| viewer.can_see(&o.client_email)).cloned().collect())
    }

    async fn update_status(&self, id: i64, status: OrderStatus) -> Result<Order, RepositoryError> {
        let mut table = self.table.write().await;
        let order = table.rows.get_mut(&id).ok_or(RepositoryError::NotFound { id })?;
        order.status = status;
        order.updated_at = Utc::now();
        Ok(order.clone())
    }

    async fn update_fields(&self, id: i64, edit: &OrderEdit) -> Result<Order, RepositoryError> {
        let mut table = self.table.write().await;
        let order = table.rows.get_mut(&id).ok_or(RepositoryError::NotFound { id })?;
        order.product_name = edit.product_name.clone();
        order.quantity = edit.quantity;
        order.unit_price = edit.unit_price;
        order.updated_at = Utc::now();
        Ok(order.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        self.table.write().await.rows.remove(&id).map(|_| ()).ok_or(RepositoryError::NotFound { id })
    }
}
