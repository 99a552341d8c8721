//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency.
//! Run with:
//!
//! ```bash
//! cargo test -p storage --test postgres_integration -- --test-threads=1
//! ```

use std::sync::Arc;

use sqlx::PgPool;
use storage::{
    CustomerId, CustomerRepository, Money, NewCustomer, NewOrder, NewProduct, OrderLineItem,
    OrderRepository, PostgresCustomerRepository, PostgresOrderRepository,
    PostgresProductRepository, ProductId, ProductRepository, QuantityDelta, StorageError,
};
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            // Create a temporary pool just for migrations
            let temp_pool = PgPool::connect(&connection_string).await.unwrap();

            sqlx::raw_sql(include_str!(
                "../../../migrations/001_create_order_tables.sql"
            ))
            .execute(&temp_pool)
            .await
            .unwrap();

            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

async fn get_pool() -> PgPool {
    let info = get_container_info().await;
    PgPool::connect(&info.connection_string).await.unwrap()
}

fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@example.com", uuid::Uuid::new_v4())
}

fn unique_sku(prefix: &str) -> ProductId {
    ProductId::new(format!("{prefix}-{}", uuid::Uuid::new_v4()))
}

#[tokio::test]
async fn customer_roundtrip() {
    let pool = get_pool().await;
    let repo = PostgresCustomerRepository::new(pool);

    let email = unique_email("roundtrip");
    let created = repo
        .create(NewCustomer {
            name: "Ada".to_string(),
            email: email.clone(),
        })
        .await
        .unwrap();

    let by_id = repo.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(by_id.id, created.id);
    assert_eq!(by_id.email, email);

    let by_email = repo.find_by_email(&email).await.unwrap().unwrap();
    assert_eq!(by_email.id, created.id);
}

#[tokio::test]
async fn unknown_customer_is_absent() {
    let pool = get_pool().await;
    let repo = PostgresCustomerRepository::new(pool);

    let found = repo.find_by_id(CustomerId::new()).await.unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn duplicate_customer_email_rejected() {
    let pool = get_pool().await;
    let repo = PostgresCustomerRepository::new(pool);

    let email = unique_email("duplicate");
    repo.create(NewCustomer {
        name: "Ada".to_string(),
        email: email.clone(),
    })
    .await
    .unwrap();

    let result = repo
        .create(NewCustomer {
            name: "Other Ada".to_string(),
            email,
        })
        .await;
    assert!(matches!(result, Err(StorageError::Duplicate { .. })));
}

#[tokio::test]
async fn find_by_ids_returns_only_known_products() {
    let pool = get_pool().await;
    let repo = PostgresProductRepository::new(pool);

    let sku = unique_sku("known");
    repo.create(NewProduct {
        id: sku.clone(),
        name: "Widget".to_string(),
        price: Money::from_cents(999),
        available_quantity: 3,
    })
    .await
    .unwrap();

    let found = repo
        .find_by_ids(&[sku.clone(), unique_sku("missing")])
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, sku);
    assert_eq!(found[0].price.cents(), 999);
    assert_eq!(found[0].available_quantity, 3);
}

#[tokio::test]
async fn quantity_delta_batch_rolls_back_on_unknown_product() {
    let pool = get_pool().await;
    let repo = PostgresProductRepository::new(pool);

    let sku = unique_sku("rollback");
    repo.create(NewProduct {
        id: sku.clone(),
        name: "Widget".to_string(),
        price: Money::from_cents(500),
        available_quantity: 5,
    })
    .await
    .unwrap();

    let result = repo
        .apply_quantity_deltas(&[
            QuantityDelta {
                product_id: sku.clone(),
                new_quantity: 1,
            },
            QuantityDelta {
                product_id: unique_sku("missing"),
                new_quantity: 1,
            },
        ])
        .await;
    assert!(matches!(result, Err(StorageError::NotFound { .. })));

    let found = repo.find_by_ids(std::slice::from_ref(&sku)).await.unwrap();
    assert_eq!(found[0].available_quantity, 5);
}

#[tokio::test]
async fn quantity_deltas_apply_atomically() {
    let pool = get_pool().await;
    let repo = PostgresProductRepository::new(pool);

    let sku_a = unique_sku("atomic-a");
    let sku_b = unique_sku("atomic-b");
    for (sku, qty) in [(&sku_a, 5), (&sku_b, 8)] {
        repo.create(NewProduct {
            id: sku.clone(),
            name: "Widget".to_string(),
            price: Money::from_cents(500),
            available_quantity: qty,
        })
        .await
        .unwrap();
    }

    repo.apply_quantity_deltas(&[
        QuantityDelta {
            product_id: sku_a.clone(),
            new_quantity: 0,
        },
        QuantityDelta {
            product_id: sku_b.clone(),
            new_quantity: 6,
        },
    ])
    .await
    .unwrap();

    let found = repo
        .find_by_ids(&[sku_a.clone(), sku_b.clone()])
        .await
        .unwrap();
    let qty_of = |sku: &ProductId| {
        found
            .iter()
            .find(|p| &p.id == sku)
            .map(|p| p.available_quantity)
            .unwrap()
    };
    assert_eq!(qty_of(&sku_a), 0);
    assert_eq!(qty_of(&sku_b), 6);
}

#[tokio::test]
async fn negative_quantity_rejected_by_schema() {
    let pool = get_pool().await;
    let repo = PostgresProductRepository::new(pool);

    let sku = unique_sku("negative");
    repo.create(NewProduct {
        id: sku.clone(),
        name: "Widget".to_string(),
        price: Money::from_cents(500),
        available_quantity: 2,
    })
    .await
    .unwrap();

    let result = repo
        .apply_quantity_deltas(&[QuantityDelta {
            product_id: sku.clone(),
            new_quantity: -1,
        }])
        .await;
    assert!(result.is_err());

    let found = repo.find_by_ids(std::slice::from_ref(&sku)).await.unwrap();
    assert_eq!(found[0].available_quantity, 2);
}

#[tokio::test]
async fn order_create_and_find_roundtrip() {
    let pool = get_pool().await;
    let customers = PostgresCustomerRepository::new(pool.clone());
    let products = PostgresProductRepository::new(pool.clone());
    let orders = PostgresOrderRepository::new(pool);

    let customer = customers
        .create(NewCustomer {
            name: "Ada".to_string(),
            email: unique_email("order"),
        })
        .await
        .unwrap();

    let sku = unique_sku("order");
    products
        .create(NewProduct {
            id: sku.clone(),
            name: "Widget".to_string(),
            price: Money::from_cents(999),
            available_quantity: 3,
        })
        .await
        .unwrap();

    let created = orders
        .create(NewOrder {
            customer: customer.clone(),
            items: vec![OrderLineItem {
                product_id: sku.clone(),
                quantity: 2,
                unit_price: Money::from_cents(999),
            }],
        })
        .await
        .unwrap();

    let found = orders.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(found.id, created.id);
    assert_eq!(found.customer.id, customer.id);
    assert_eq!(found.items.len(), 1);
    assert_eq!(found.items[0].product_id, sku);
    assert_eq!(found.items[0].quantity, 2);
    assert_eq!(found.items[0].unit_price.cents(), 999);
    assert_eq!(found.total().cents(), 1998);
}
