//! Domain layer for the order system.
//!
//! The only business-logic-bearing unit here is the
//! [`OrderPlacementService`]: a single-pass workflow that validates an
//! [`OrderRequest`] against customer and inventory state, commits the stock
//! decrement, and persists a price-snapshotted order. Everything else
//! (routing, persistence, wiring) lives behind the repository contracts in
//! the `storage` crate.

pub mod error;
pub mod request;
pub mod service;

pub use error::{PlaceOrderError, StockShortfall};
pub use request::{OrderRequest, RequestedItem};
pub use service::OrderPlacementService;
