//! PostgreSQL-backed repository implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{CustomerId, Money, OrderId, ProductId};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{
    Customer, CustomerRepository, NewCustomer, NewOrder, NewProduct, Order, OrderLineItem,
    OrderRepository, Product, ProductRepository, QuantityDelta, Result, StorageError,
};

/// Runs the database migrations for all repositories.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    Ok(())
}

fn row_to_customer(row: &PgRow) -> Result<Customer> {
    Ok(Customer {
        id: CustomerId::from_uuid(row.try_get::<Uuid, _>("id")?),
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

fn row_to_product(row: &PgRow) -> Result<Product> {
    Ok(Product {
        id: ProductId::new(row.try_get::<String, _>("id")?),
        name: row.try_get("name")?,
        price: Money::from_cents(row.try_get("price_cents")?),
        available_quantity: row.try_get("available_quantity")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}

fn row_to_line_item(row: &PgRow) -> Result<OrderLineItem> {
    let quantity: i64 = row.try_get("quantity")?;
    Ok(OrderLineItem {
        product_id: ProductId::new(row.try_get::<String, _>("product_id")?),
        quantity: u32::try_from(quantity)
            .map_err(|_| StorageError::Backend(format!("stored quantity out of range: {quantity}")))?,
        unit_price: Money::from_cents(row.try_get("unit_price_cents")?),
    })
}

/// PostgreSQL customer repository.
#[derive(Clone)]
pub struct PostgresCustomerRepository {
    pool: PgPool,
}

impl PostgresCustomerRepository {
    /// Creates a repository over an existing connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CustomerRepository for PostgresCustomerRepository {
    #[tracing::instrument(skip(self, new), fields(email = %new.email))]
    async fn create(&self, new: NewCustomer) -> Result<Customer> {
        let id = CustomerId::new();
        let created_at = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO customers (id, name, email, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(id.as_uuid())
        .bind(&new.name)
        .bind(&new.email)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.constraint() == Some("customers_email_key")
            {
                return StorageError::duplicate("Customer", &new.email);
            }
            StorageError::Database(e)
        })?;

        Ok(Customer {
            id,
            name: new.name,
            email: new.email,
            created_at,
        })
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, created_at
            FROM customers
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_customer).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, created_at
            FROM customers
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_customer).transpose()
    }
}

/// PostgreSQL product repository.
#[derive(Clone)]
pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    /// Creates a repository over an existing connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    #[tracing::instrument(skip(self, new), fields(product_id = %new.id))]
    async fn create(&self, new: NewProduct) -> Result<Product> {
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO products (id, name, price_cents, available_quantity, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            "#,
        )
        .bind(new.id.as_str())
        .bind(&new.name)
        .bind(new.price.cents())
        .bind(new.available_quantity)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.constraint() == Some("products_pkey")
            {
                return StorageError::duplicate("Product", &new.id);
            }
            StorageError::Database(e)
        })?;

        Ok(Product {
            id: new.id,
            name: new.name,
            price: new.price,
            available_quantity: new.available_quantity,
            created_at: now,
            updated_at: now,
        })
    }

    async fn find_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>> {
        let id_strings: Vec<String> = ids.iter().map(|id| id.as_str().to_string()).collect();

        let rows = sqlx::query(
            r#"
            SELECT id, name, price_cents, available_quantity, created_at, updated_at
            FROM products
            WHERE id = ANY($1)
            "#,
        )
        .bind(&id_strings)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_product).collect()
    }

    #[tracing::instrument(skip(self, deltas), fields(batch_size = deltas.len()))]
    async fn apply_quantity_deltas(&self, deltas: &[QuantityDelta]) -> Result<()> {
        // One transaction across the batch: a missing product, or the
        // CHECK (available_quantity >= 0) guard, rolls everything back.
        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        for delta in deltas {
            let result = sqlx::query(
                r#"
                UPDATE products
                SET available_quantity = $2, updated_at = $3
                WHERE id = $1
                "#,
            )
            .bind(delta.product_id.as_str())
            .bind(delta.new_quantity)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                return Err(StorageError::not_found("Product", &delta.product_id));
            }
        }

        tx.commit().await?;
        tracing::debug!(batch_size = deltas.len(), "quantity deltas committed");
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Product>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, price_cents, available_quantity, created_at, updated_at
            FROM products
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_product).collect()
    }
}

/// PostgreSQL order repository.
#[derive(Clone)]
pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    /// Creates a repository over an existing connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    #[tracing::instrument(skip(self, new), fields(customer_id = %new.customer.id, items = new.items.len()))]
    async fn create(&self, new: NewOrder) -> Result<Order> {
        let id = OrderId::new();
        let created_at = Utc::now();

        // Order row and line items commit together or not at all.
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO orders (id, customer_id, created_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(id.as_uuid())
        .bind(new.customer.id.as_uuid())
        .bind(created_at)
        .execute(&mut *tx)
        .await?;

        for item in &new.items {
            sqlx::query(
                r#"
                INSERT INTO order_line_items (id, order_id, product_id, quantity, unit_price_cents)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(id.as_uuid())
            .bind(item.product_id.as_str())
            .bind(item.quantity as i64)
            .bind(item.unit_price.cents())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(Order {
            id,
            customer: new.customer,
            items: new.items,
            created_at,
        })
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>> {
        let order_row = sqlx::query(
            r#"
            SELECT o.id, o.created_at,
                   c.id AS customer_id, c.name, c.email, c.created_at AS customer_created_at
            FROM orders o
            JOIN customers c ON c.id = o.customer_id
            WHERE o.id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        let Some(order_row) = order_row else {
            return Ok(None);
        };

        let item_rows = sqlx::query(
            r#"
            SELECT product_id, quantity, unit_price_cents
            FROM order_line_items
            WHERE order_id = $1
            ORDER BY product_id
            "#,
        )
        .bind(id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        let items = item_rows
            .iter()
            .map(row_to_line_item)
            .collect::<Result<Vec<_>>>()?;

        Ok(Some(Order {
            id,
            customer: Customer {
                id: CustomerId::from_uuid(order_row.try_get::<Uuid, _>("customer_id")?),
                name: order_row.try_get("name")?,
                email: order_row.try_get("email")?,
                created_at: order_row.try_get::<DateTime<Utc>, _>("customer_created_at")?,
            },
            items,
            created_at: order_row.try_get::<DateTime<Utc>, _>("created_at")?,
        }))
    }
}
