//! Product catalog endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use common::{Money, ProductId};
use serde::{Deserialize, Serialize};
use storage::{CustomerRepository, NewProduct, OrderRepository, Product, ProductRepository};

use crate::error::ApiError;

use super::AppState;

#[derive(Deserialize)]
pub struct CreateProductBody {
    pub id: String,
    pub name: String,
    pub price_cents: i64,
    pub available_quantity: i64,
}

#[derive(Serialize)]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub price_cents: i64,
    pub available_quantity: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        ProductResponse {
            id: product.id.to_string(),
            name: product.name,
            price_cents: product.price.cents(),
            available_quantity: product.available_quantity,
            created_at: product.created_at.to_rfc3339(),
            updated_at: product.updated_at.to_rfc3339(),
        }
    }
}

/// POST /products — register a product in the catalog.
#[tracing::instrument(skip(state, body))]
pub async fn create<C, P, O>(
    State(state): State<Arc<AppState<C, P, O>>>,
    Json(body): Json<CreateProductBody>,
) -> Result<(axum::http::StatusCode, Json<ProductResponse>), ApiError>
where
    C: CustomerRepository + Clone + 'static,
    P: ProductRepository + Clone + 'static,
    O: OrderRepository + Clone + 'static,
{
    if body.id.trim().is_empty() {
        return Err(ApiError::BadRequest("id must not be empty".into()));
    }
    if body.price_cents < 0 {
        return Err(ApiError::BadRequest("price_cents must not be negative".into()));
    }
    if body.available_quantity < 0 {
        return Err(ApiError::BadRequest(
            "available_quantity must not be negative".into(),
        ));
    }

    let product = state
        .products
        .create(NewProduct {
            id: ProductId::new(body.id),
            name: body.name,
            price: Money::from_cents(body.price_cents),
            available_quantity: body.available_quantity,
        })
        .await?;

    Ok((axum::http::StatusCode::CREATED, Json(product.into())))
}

/// GET /products — list the catalog.
#[tracing::instrument(skip(state))]
pub async fn list<C, P, O>(
    State(state): State<Arc<AppState<C, P, O>>>,
) -> Result<Json<Vec<ProductResponse>>, ApiError>
where
    C: CustomerRepository + Clone + 'static,
    P: ProductRepository + Clone + 'static,
    O: OrderRepository + Clone + 'static,
{
    let products = state.products.list().await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}
