//! PostgreSQL adapter contract. Each test gets a fresh database from
//! `DATABASE_URL` with the crate migrations applied; run them with
//! `cargo test -- --ignored` against a disposable server.

use std::sync::Arc;

use rust_decimal::Decimal;
use sqlx::PgPool;

use orderdesk::domain::{
    CustomerDirectory, OrderDraft, OrderEdit, OrderRepository, OrderStatus, Quantity, RepositoryError, UnitPrice, Viewer,
};
use orderdesk::repository::{PgCustomerDirectory, PgOrderRepository};

async fn repo(pool: PgPool) -> PgOrderRepository {
    sqlx::query("INSERT INTO customers (name, email) VALUES ('Alice', 'a@b.com'), ('Carol', 'c@d.com')")
        .execute(&pool).await.unwrap();
    PgOrderRepository::new(pool.clone(), Arc::new(PgCustomerDirectory::new(pool)))
}

fn draft(email: &str, price: Decimal) -> OrderDraft {
    OrderDraft {
        client_email: email.into(), product_name: "Widget".into(),
        quantity: Quantity::new(3).unwrap(), unit_price: UnitPrice::new(price).unwrap(),
    }
}

#[sqlx::test]
#[ignore = "needs a PostgreSQL DATABASE_URL"]
async fn customer_lookup_is_exact(pool: PgPool) {
    let directory = PgCustomerDirectory::new(pool.clone());
    sqlx::query("INSERT INTO customers (name, email) VALUES ('Alice', 'a@b.com')").execute(&pool).await.unwrap();

    assert_eq!(directory.find_by_email("a@b.com").await.unwrap().map(|c| c.name), Some("Alice".to_string()));
    assert!(directory.find_by_email("A@B.COM").await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "needs a PostgreSQL DATABASE_URL"]
async fn create_resolves_client_and_starts_pending(pool: PgPool) {
    let repo = repo(pool).await;

    let order = repo.create(&draft("a@b.com", Decimal::new(1000, 2))).await.unwrap();

    assert_eq!(order.client_name, "Alice");
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.total(), Decimal::new(30, 0));
    assert_eq!(repo.get_by_id(order.id).await.unwrap(), order);
}

#[sqlx::test]
#[ignore = "needs a PostgreSQL DATABASE_URL"]
async fn largest_unit_price_fits_the_column(pool: PgPool) {
    let repo = repo(pool).await;

    let order = repo.create(&draft("a@b.com", UnitPrice::MAX)).await.unwrap();

    assert_eq!(repo.get_by_id(order.id).await.unwrap().unit_price.amount(), UnitPrice::MAX);
}

#[sqlx::test]
#[ignore = "needs a PostgreSQL DATABASE_URL"]
async fn create_rejects_unknown_client_without_persisting(pool: PgPool) {
    let repo = repo(pool.clone()).await;

    let err = repo.create(&draft("ghost@nowhere.test", Decimal::ONE)).await.unwrap_err();

    assert!(matches!(err, RepositoryError::ClientNotFound { ref email } if email == "ghost@nowhere.test"));
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders").fetch_one(&pool).await.unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test]
#[ignore = "needs a PostgreSQL DATABASE_URL"]
async fn list_is_scoped_by_role(pool: PgPool) {
    let repo = repo(pool).await;
    let first = repo.create(&draft("a@b.com", Decimal::ONE)).await.unwrap();
    repo.create(&draft("c@d.com", Decimal::ONE)).await.unwrap();
    let third = repo.create(&draft("a@b.com", Decimal::ONE)).await.unwrap();

    assert_eq!(repo.list_for_viewer(&Viewer::admin("admin@shop.test")).await.unwrap().len(), 3);
    let mine = repo.list_for_viewer(&Viewer::member("a@b.com")).await.unwrap();
    assert_eq!(mine.iter().map(|o| o.id).collect::<Vec<_>>(), vec![first.id, third.id]);
    assert!(repo.list_for_viewer(&Viewer::member("x@y.com")).await.unwrap().is_empty());
}

#[sqlx::test]
#[ignore = "needs a PostgreSQL DATABASE_URL"]
async fn updates_and_delete_report_missing_rows(pool: PgPool) {
    let repo = repo(pool).await;
    let order = repo.create(&draft("a@b.com", Decimal::new(1000, 2))).await.unwrap();

    let updated = repo.update_status(order.id, OrderStatus::OnProcess).await.unwrap();
    assert_eq!(updated.status, OrderStatus::OnProcess);
    let edit = OrderEdit { product_name: "Gadget".into(), quantity: Quantity::new(1).unwrap(), unit_price: UnitPrice::new(Decimal::new(5, 0)).unwrap() };
    let edited = repo.update_fields(order.id, &edit).await.unwrap();
    assert_eq!((edited.product_name.as_str(), edited.status, edited.client_name.as_str()), ("Gadget", OrderStatus::OnProcess, "Alice"));
    assert!(edited.updated_at >= order.updated_at);

    let missing = order.id + 1000;
    assert!(matches!(repo.get_by_id(missing).await, Err(RepositoryError::NotFound { id }) if id == missing));
    assert!(matches!(repo.update_status(missing, OrderStatus::Approved).await, Err(RepositoryError::NotFound { .. })));
    assert!(matches!(repo.update_fields(missing, &edit).await, Err(RepositoryError::NotFound { .. })));
    repo.delete(order.id).await.unwrap();
    assert!(matches!(repo.delete(order.id).await, Err(RepositoryError::NotFound { .. })));
}
