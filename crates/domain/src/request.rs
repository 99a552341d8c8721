//! Caller-constructed placement request.

use common::{CustomerId, ProductId};
use serde::{Deserialize, Serialize};

/// One requested (product, quantity) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestedItem {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl RequestedItem {
    /// Creates a new requested item.
    pub fn new(product_id: impl Into<ProductId>, quantity: u32) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// A request to place an order. Transient, never persisted directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub customer_id: CustomerId,
    pub items: Vec<RequestedItem>,
}

impl OrderRequest {
    /// Creates a new order request.
    pub fn new(customer_id: CustomerId, items: Vec<RequestedItem>) -> Self {
        Self { customer_id, items }
    }

    /// Returns the distinct requested product ids, first occurrence order.
    pub fn distinct_product_ids(&self) -> Vec<ProductId> {
        let mut seen = Vec::new();
        for item in &self.items {
            if !seen.contains(&item.product_id) {
                seen.push(item.product_id.clone());
            }
        }
        seen
    }
}
