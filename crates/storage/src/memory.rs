//! In-memory repository implementations.
//!
//! These back the test suites and local runs without a database. Beyond the
//! repository contracts they expose call counters and fail-injection
//! switches so tests can assert which collaborators were touched.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use common::{CustomerId, OrderId, ProductId};
use tokio::sync::RwLock;

use crate::{
    Customer, CustomerRepository, NewCustomer, NewOrder, NewProduct, Order, OrderRepository,
    Product, ProductRepository, QuantityDelta, Result, StorageError,
};

#[derive(Debug, Default)]
struct CustomerState {
    customers: HashMap<CustomerId, Customer>,
    find_calls: usize,
}

/// In-memory customer repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCustomerRepository {
    state: Arc<RwLock<CustomerState>>,
}

impl InMemoryCustomerRepository {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns how many times `find_by_id` was called.
    pub async fn find_call_count(&self) -> usize {
        self.state.read().await.find_calls
    }
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn create(&self, new: NewCustomer) -> Result<Customer> {
        let mut state = self.state.write().await;

        if state.customers.values().any(|c| c.email == new.email) {
            return Err(StorageError::duplicate("Customer", &new.email));
        }

        let customer = Customer {
            id: CustomerId::new(),
            name: new.name,
            email: new.email,
            created_at: Utc::now(),
        };
        state.customers.insert(customer.id, customer.clone());
        Ok(customer)
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>> {
        let mut state = self.state.write().await;
        state.find_calls += 1;
        Ok(state.customers.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>> {
        let state = self.state.read().await;
        Ok(state.customers.values().find(|c| c.email == email).cloned())
    }
}

#[derive(Debug, Default)]
struct ProductState {
    products: HashMap<ProductId, Product>,
    find_calls: usize,
    update_calls: usize,
    fail_on_update: bool,
}

/// In-memory product repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProductRepository {
    state: Arc<RwLock<ProductState>>,
}

impl InMemoryProductRepository {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the repository to fail the next quantity update.
    pub async fn set_fail_on_update(&self, fail: bool) {
        self.state.write().await.fail_on_update = fail;
    }

    /// Returns how many times `find_by_ids` was called.
    pub async fn find_call_count(&self) -> usize {
        self.state.read().await.find_calls
    }

    /// Returns how many times `apply_quantity_deltas` was called.
    pub async fn update_call_count(&self) -> usize {
        self.state.read().await.update_calls
    }

    /// Returns the stored record for a product, if present.
    pub async fn get(&self, id: &ProductId) -> Option<Product> {
        self.state.read().await.products.get(id).cloned()
    }

    /// Overwrites a product's price, leaving everything else untouched.
    pub async fn set_price(&self, id: &ProductId, price: common::Money) {
        if let Some(product) = self.state.write().await.products.get_mut(id) {
            product.price = price;
            product.updated_at = Utc::now();
        }
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, new: NewProduct) -> Result<Product> {
        let mut state = self.state.write().await;

        if state.products.contains_key(&new.id) {
            return Err(StorageError::duplicate("Product", &new.id));
        }

        let now = Utc::now();
        let product = Product {
            id: new.id,
            name: new.name,
            price: new.price,
            available_quantity: new.available_quantity,
            created_at: now,
            updated_at: now,
        };
        state.products.insert(product.id.clone(), product.clone());
        Ok(product)
    }

    async fn find_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>> {
        let mut state = self.state.write().await;
        state.find_calls += 1;
        Ok(ids
            .iter()
            .filter_map(|id| state.products.get(id).cloned())
            .collect())
    }

    async fn apply_quantity_deltas(&self, deltas: &[QuantityDelta]) -> Result<()> {
        let mut state = self.state.write().await;
        state.update_calls += 1;

        if state.fail_on_update {
            return Err(StorageError::Backend(
                "injected quantity update failure".to_string(),
            ));
        }

        // Validate the whole batch before touching anything so a bad id
        // cannot leave it half applied.
        for delta in deltas {
            if !state.products.contains_key(&delta.product_id) {
                return Err(StorageError::not_found("Product", &delta.product_id));
            }
        }

        let now = Utc::now();
        for delta in deltas {
            let product = state
                .products
                .get_mut(&delta.product_id)
                .ok_or_else(|| StorageError::not_found("Product", &delta.product_id))?;
            product.available_quantity = delta.new_quantity;
            product.updated_at = now;
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Product>> {
        let state = self.state.read().await;
        let mut products: Vec<_> = state.products.values().cloned().collect();
        products.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        Ok(products)
    }
}

#[derive(Debug, Default)]
struct OrderState {
    orders: HashMap<OrderId, Order>,
    create_calls: usize,
    fail_on_create: bool,
}

/// In-memory order repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderRepository {
    state: Arc<RwLock<OrderState>>,
}

impl InMemoryOrderRepository {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the repository to fail the next create.
    pub async fn set_fail_on_create(&self, fail: bool) {
        self.state.write().await.fail_on_create = fail;
    }

    /// Returns how many times `create` was called.
    pub async fn create_call_count(&self) -> usize {
        self.state.read().await.create_calls
    }

    /// Returns the number of stored orders.
    pub async fn order_count(&self) -> usize {
        self.state.read().await.orders.len()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn create(&self, new: NewOrder) -> Result<Order> {
        let mut state = self.state.write().await;
        state.create_calls += 1;

        if state.fail_on_create {
            return Err(StorageError::Backend(
                "injected order create failure".to_string(),
            ));
        }

        let order = Order {
            id: OrderId::new(),
            customer: new.customer,
            items: new.items,
            created_at: Utc::now(),
        };
        state.orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>> {
        let state = self.state.read().await;
        Ok(state.orders.get(&id).cloned())
    }
}
