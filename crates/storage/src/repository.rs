use async_trait::async_trait;
use common::{CustomerId, OrderId, ProductId};

use crate::{Customer, NewCustomer, NewOrder, NewProduct, Order, Product, QuantityDelta, Result};

/// Lookup and registration of customers.
///
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Registers a new customer.
    ///
    /// Fails with [`StorageError::Duplicate`](crate::StorageError::Duplicate)
    /// if a customer with the same email already exists.
    async fn create(&self, new: NewCustomer) -> Result<Customer>;

    /// Resolves a customer id to a record, or `None` if absent.
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>>;

    /// Resolves an email to a customer record, or `None` if absent.
    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>>;
}

/// Lookup and stock adjustment of products.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Registers a new product.
    ///
    /// Fails with [`StorageError::Duplicate`](crate::StorageError::Duplicate)
    /// if the product id is already taken.
    async fn create(&self, new: NewProduct) -> Result<Product>;

    /// Resolves multiple product ids in one batch.
    ///
    /// Returns only matching products; missing ids are omitted, never an
    /// error. The returned order is unspecified.
    async fn find_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>>;

    /// Applies a batch of absolute quantity replacements.
    ///
    /// The batch is atomic: partial application must never be observable.
    /// An unknown product id fails the whole batch. Callers racing on the
    /// same product can still overwrite each other's quantities; guarding
    /// against that is the backend's responsibility, not this contract's.
    async fn apply_quantity_deltas(&self, deltas: &[QuantityDelta]) -> Result<()>;

    /// Lists all products.
    async fn list(&self) -> Result<Vec<Product>>;
}

/// Persistence of order aggregates.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persists a new order, assigning its id and creation timestamp.
    ///
    /// Returns the full stored aggregate. The order and all of its line
    /// items are written atomically.
    async fn create(&self, new: NewOrder) -> Result<Order>;

    /// Resolves an order id to the stored aggregate, or `None` if absent.
    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>>;
}
