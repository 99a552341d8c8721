//! Shared value types for the order system.
//!
//! Identifier newtypes keep customer, order, and product ids from being
//! mixed up, and [`Money`] keeps all monetary arithmetic in integer cents.

pub mod money;
pub mod types;

pub use money::Money;
pub use types::{CustomerId, OrderId, ProductId};
