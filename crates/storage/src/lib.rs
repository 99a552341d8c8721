//! Storage layer for the order system.
//!
//! This crate defines the narrow repository contracts the placement
//! workflow depends on ([`CustomerRepository`], [`ProductRepository`],
//! [`OrderRepository`]) together with two interchangeable backends:
//! an in-memory implementation used by tests and local runs, and a
//! PostgreSQL implementation backed by `sqlx`.

pub mod entities;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod repository;

pub use common::{CustomerId, Money, OrderId, ProductId};
pub use entities::{
    Customer, NewCustomer, NewOrder, NewProduct, Order, OrderLineItem, Product, QuantityDelta,
};
pub use error::{Result, StorageError};
pub use memory::{InMemoryCustomerRepository, InMemoryOrderRepository, InMemoryProductRepository};
pub use postgres::{PostgresCustomerRepository, PostgresOrderRepository, PostgresProductRepository};
pub use repository::{CustomerRepository, OrderRepository, ProductRepository};
