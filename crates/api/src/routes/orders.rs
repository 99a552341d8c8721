//! Order placement and lookup endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use common::{CustomerId, OrderId};
use domain::{OrderRequest, RequestedItem};
use serde::{Deserialize, Serialize};
use storage::{CustomerRepository, Order, OrderRepository, ProductRepository};

use crate::error::ApiError;

use super::AppState;

// -- Request types --

#[derive(Deserialize)]
pub struct PlaceOrderBody {
    pub customer_id: String,
    pub items: Vec<RequestedItemBody>,
}

#[derive(Deserialize)]
pub struct RequestedItemBody {
    pub product_id: String,
    pub quantity: u32,
}

// -- Response types --

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub customer_id: String,
    pub items: Vec<OrderLineItemResponse>,
    pub total_cents: i64,
    pub created_at: String,
}

#[derive(Serialize)]
pub struct OrderLineItemResponse {
    pub product_id: String,
    pub quantity: u32,
    pub unit_price_cents: i64,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        OrderResponse {
            id: order.id.to_string(),
            customer_id: order.customer.id.to_string(),
            total_cents: order.total().cents(),
            items: order
                .items
                .iter()
                .map(|item| OrderLineItemResponse {
                    product_id: item.product_id.to_string(),
                    quantity: item.quantity,
                    unit_price_cents: item.unit_price.cents(),
                })
                .collect(),
            created_at: order.created_at.to_rfc3339(),
        }
    }
}

// -- Handlers --

/// POST /orders — place a new order.
#[tracing::instrument(skip(state, body))]
pub async fn create<C, P, O>(
    State(state): State<Arc<AppState<C, P, O>>>,
    Json(body): Json<PlaceOrderBody>,
) -> Result<(axum::http::StatusCode, Json<OrderResponse>), ApiError>
where
    C: CustomerRepository + Clone + 'static,
    P: ProductRepository + Clone + 'static,
    O: OrderRepository + Clone + 'static,
{
    let customer_id = parse_customer_id(&body.customer_id)?;
    let items = body
        .items
        .iter()
        .map(|item| RequestedItem::new(item.product_id.as_str(), item.quantity))
        .collect();

    let request = OrderRequest::new(customer_id, items);

    match state.placement.place(request).await {
        Ok(order) => {
            metrics::counter!("orders_placed_total").increment(1);
            Ok((axum::http::StatusCode::CREATED, Json(order.into())))
        }
        Err(err) => {
            metrics::counter!("order_placement_failures_total").increment(1);
            Err(err.into())
        }
    }
}

/// GET /orders/:id — load a stored order aggregate.
#[tracing::instrument(skip(state))]
pub async fn get<C, P, O>(
    State(state): State<Arc<AppState<C, P, O>>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError>
where
    C: CustomerRepository + Clone + 'static,
    P: ProductRepository + Clone + 'static,
    O: OrderRepository + Clone + 'static,
{
    let order_id = parse_order_id(&id)?;
    let order = state
        .orders
        .find_by_id(order_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Order {id} not found")))?;

    Ok(Json(order.into()))
}

pub(super) fn parse_customer_id(id: &str) -> Result<CustomerId, ApiError> {
    let uuid = uuid::Uuid::parse_str(id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid customer_id: {e}")))?;
    Ok(CustomerId::from_uuid(uuid))
}

fn parse_order_id(id: &str) -> Result<OrderId, ApiError> {
    let uuid = uuid::Uuid::parse_str(id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid order id: {e}")))?;
    Ok(OrderId::from_uuid(uuid))
}
