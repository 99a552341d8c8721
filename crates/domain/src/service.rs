//! Order placement workflow.

use std::collections::HashMap;

use common::ProductId;
use storage::{
    CustomerRepository, NewOrder, Order, OrderLineItem, OrderRepository, Product,
    ProductRepository, QuantityDelta,
};

use crate::error::{PlaceOrderError, StockShortfall};
use crate::request::OrderRequest;

/// Service orchestrating the order placement workflow.
///
/// The workflow is strictly sequential and single-pass: validate customer,
/// validate product existence, validate availability, commit the stock
/// decrement, persist the order. The first failure aborts the remaining
/// steps. Failures before the decrement leave no side effects; after the
/// decrement there is no compensating rollback, so a failed order write
/// leaves inventory decremented with no order recorded.
///
/// The service holds no concurrency control of its own: two concurrent
/// placements can read the same availability snapshot and both pass the
/// check. Preventing that oversell is the inventory backend's job.
pub struct OrderPlacementService<C, P, O> {
    customers: C,
    products: P,
    orders: O,
}

impl<C, P, O> OrderPlacementService<C, P, O>
where
    C: CustomerRepository,
    P: ProductRepository,
    O: OrderRepository,
{
    /// Creates a new service over the three repository contracts.
    pub fn new(customers: C, products: P, orders: O) -> Self {
        Self {
            customers,
            products,
            orders,
        }
    }

    /// Places an order, returning the stored aggregate.
    #[tracing::instrument(skip(self, request), fields(customer_id = %request.customer_id))]
    pub async fn place(&self, request: OrderRequest) -> Result<Order, PlaceOrderError> {
        for item in &request.items {
            if item.quantity == 0 {
                return Err(PlaceOrderError::InvalidQuantity {
                    product_id: item.product_id.clone(),
                    quantity: item.quantity,
                });
            }
        }

        let customer = self
            .customers
            .find_by_id(request.customer_id)
            .await?
            .ok_or(PlaceOrderError::CustomerNotFound(request.customer_id))?;

        let requested_ids = request.distinct_product_ids();
        let products = self.products.find_by_ids(&requested_ids).await?;

        if products.is_empty() {
            return Err(PlaceOrderError::NoProductsFound);
        }

        let by_id: HashMap<&ProductId, &Product> =
            products.iter().map(|p| (&p.id, p)).collect();

        let missing: Vec<ProductId> = requested_ids
            .iter()
            .filter(|id| !by_id.contains_key(id))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(PlaceOrderError::ProductsNotFound { missing });
        }

        // Each line is evaluated against the snapshot quantity read above,
        // not a running total: duplicate lines for the same product are
        // checked independently, and the later delta overwrites the earlier.
        let mut deltas = Vec::with_capacity(request.items.len());
        let mut shortfalls = Vec::new();
        for item in &request.items {
            let product = by_id[&item.product_id];
            let remaining = product.available_quantity - i64::from(item.quantity);
            if remaining < 0 {
                shortfalls.push(StockShortfall {
                    product_id: item.product_id.clone(),
                    requested: item.quantity,
                    available: product.available_quantity,
                    shortfall: remaining,
                });
            }
            deltas.push(QuantityDelta {
                product_id: item.product_id.clone(),
                new_quantity: remaining,
            });
        }
        if !shortfalls.is_empty() {
            return Err(PlaceOrderError::InsufficientStock { shortfalls });
        }

        self.products.apply_quantity_deltas(&deltas).await?;

        let items: Vec<OrderLineItem> = request
            .items
            .iter()
            .map(|item| OrderLineItem {
                product_id: item.product_id.clone(),
                quantity: item.quantity,
                unit_price: by_id[&item.product_id].price,
            })
            .collect();

        let order = self.orders.create(NewOrder { customer, items }).await?;

        tracing::info!(order_id = %order.id, items = order.items.len(), "order placed");
        Ok(order)
    }
}
