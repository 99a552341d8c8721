//! Placement error taxonomy.

use common::{CustomerId, ProductId};
use storage::StorageError;
use thiserror::Error;

/// One offending line of an insufficient-stock failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockShortfall {
    /// The product that could not cover the requested quantity.
    pub product_id: ProductId,
    /// Quantity the line asked for.
    pub requested: u32,
    /// Quantity available in the snapshot the line was checked against.
    pub available: i64,
    /// `available - requested`; always negative.
    pub shortfall: i64,
}

impl std::fmt::Display for StockShortfall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: requested {}, available {} (shortfall {})",
            self.product_id, self.requested, self.available, self.shortfall
        )
    }
}

/// Errors that can abort an order placement.
///
/// All variants are terminal; the workflow never retries. Each carries
/// enough structure for the caller to build a precise user-facing message.
#[derive(Debug, Error)]
pub enum PlaceOrderError {
    /// No customer matches the given id.
    #[error("Customer not found: {0}")]
    CustomerNotFound(CustomerId),

    /// None of the requested product ids exist.
    #[error("No products found for the requested ids")]
    NoProductsFound,

    /// Some requested product ids do not exist.
    #[error("Products not found: {}", format_ids(missing))]
    ProductsNotFound { missing: Vec<ProductId> },

    /// One or more lines requested more than available.
    #[error("Insufficient stock: {}", format_shortfalls(shortfalls))]
    InsufficientStock { shortfalls: Vec<StockShortfall> },

    /// A requested line carries a zero quantity.
    #[error("Invalid quantity {quantity} for product {product_id} (must be greater than 0)")]
    InvalidQuantity {
        product_id: ProductId,
        quantity: u32,
    },

    /// A collaborator failed after validation passed.
    ///
    /// Surfaced as-is, with no compensation: if order creation fails after
    /// the stock decrement succeeded, inventory stays decremented.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

fn format_ids(ids: &[ProductId]) -> String {
    ids.iter()
        .map(|id| id.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_shortfalls(shortfalls: &[StockShortfall]) -> String {
    shortfalls
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn products_not_found_lists_ids() {
        let err = PlaceOrderError::ProductsNotFound {
            missing: vec![ProductId::new("SKU-001"), ProductId::new("SKU-002")],
        };
        assert_eq!(err.to_string(), "Products not found: SKU-001, SKU-002");
    }

    #[test]
    fn insufficient_stock_reports_shortfall() {
        let err = PlaceOrderError::InsufficientStock {
            shortfalls: vec![StockShortfall {
                product_id: ProductId::new("SKU-001"),
                requested: 6,
                available: 5,
                shortfall: -1,
            }],
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock: SKU-001: requested 6, available 5 (shortfall -1)"
        );
    }
}
