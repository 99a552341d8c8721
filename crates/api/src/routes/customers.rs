//! Customer registration and lookup endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use storage::{Customer, CustomerRepository, NewCustomer, OrderRepository, ProductRepository};

use crate::error::ApiError;

use super::AppState;
use super::orders::parse_customer_id;

#[derive(Deserialize)]
pub struct CreateCustomerBody {
    pub name: String,
    pub email: String,
}

#[derive(Serialize)]
pub struct CustomerResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: String,
}

impl From<Customer> for CustomerResponse {
    fn from(customer: Customer) -> Self {
        CustomerResponse {
            id: customer.id.to_string(),
            name: customer.name,
            email: customer.email,
            created_at: customer.created_at.to_rfc3339(),
        }
    }
}

/// POST /customers — register a customer.
#[tracing::instrument(skip(state, body))]
pub async fn create<C, P, O>(
    State(state): State<Arc<AppState<C, P, O>>>,
    Json(body): Json<CreateCustomerBody>,
) -> Result<(axum::http::StatusCode, Json<CustomerResponse>), ApiError>
where
    C: CustomerRepository + Clone + 'static,
    P: ProductRepository + Clone + 'static,
    O: OrderRepository + Clone + 'static,
{
    if body.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".into()));
    }
    if body.email.trim().is_empty() {
        return Err(ApiError::BadRequest("email must not be empty".into()));
    }

    let customer = state
        .customers
        .create(NewCustomer {
            name: body.name,
            email: body.email,
        })
        .await?;

    Ok((axum::http::StatusCode::CREATED, Json(customer.into())))
}

/// GET /customers/:id — fetch a customer by id.
#[tracing::instrument(skip(state))]
pub async fn get<C, P, O>(
    State(state): State<Arc<AppState<C, P, O>>>,
    Path(id): Path<String>,
) -> Result<Json<CustomerResponse>, ApiError>
where
    C: CustomerRepository + Clone + 'static,
    P: ProductRepository + Clone + 'static,
    O: OrderRepository + Clone + 'static,
{
    let customer_id = parse_customer_id(&id)?;
    let customer = state
        .customers
        .find_by_id(customer_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Customer {id} not found")))?;

    Ok(Json(customer.into()))
}
