//! Route handlers and shared application state.

pub mod customers;
pub mod health;
pub mod metrics;
pub mod orders;
pub mod products;

use domain::OrderPlacementService;
use storage::{CustomerRepository, OrderRepository, ProductRepository};

/// Shared application state accessible from all handlers.
pub struct AppState<C, P, O> {
    pub placement: OrderPlacementService<C, P, O>,
    pub customers: C,
    pub products: P,
    pub orders: O,
}

impl<C, P, O> AppState<C, P, O>
where
    C: CustomerRepository + Clone,
    P: ProductRepository + Clone,
    O: OrderRepository + Clone,
{
    /// Builds the state, wiring the placement service over clones of the
    /// repositories.
    pub fn new(customers: C, products: P, orders: O) -> Self {
        let placement =
            OrderPlacementService::new(customers.clone(), products.clone(), orders.clone());
        Self {
            placement,
            customers,
            products,
            orders,
        }
    }
}
