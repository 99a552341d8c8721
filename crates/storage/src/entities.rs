//! Entity records stored and retrieved through the repositories.

use chrono::{DateTime, Utc};
use common::{CustomerId, Money, OrderId, ProductId};
use serde::{Deserialize, Serialize};

/// A registered customer.
///
/// The placement workflow only cares about existence; name and email are
/// carried for the customer management surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Fields required to register a new customer.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
}

/// A product with its current price and stock level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Money,
    /// Units currently available. Never negative.
    pub available_quantity: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to register a new product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub id: ProductId,
    pub name: String,
    pub price: Money,
    pub available_quantity: i64,
}

/// An absolute replacement quantity for one product.
///
/// Batches of deltas are applied atomically: either every product in the
/// batch ends up at its new quantity or none does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantityDelta {
    pub product_id: ProductId,
    pub new_quantity: i64,
}

/// One product-quantity-price line within an order.
///
/// `unit_price` is the price snapshotted when the order was placed; later
/// price changes never alter a stored line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: Money,
}

impl OrderLineItem {
    /// Returns the total for this line (quantity * unit_price).
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

/// A persisted order aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer: Customer,
    pub items: Vec<OrderLineItem>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Returns the sum of all line totals.
    pub fn total(&self) -> Money {
        self.items.iter().map(OrderLineItem::line_total).sum()
    }
}

/// An order aggregate ready to be persisted.
///
/// The store assigns the order id and creation timestamp.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer: Customer,
    pub items: Vec<OrderLineItem>,
}
