//! Shared types for the order-management system.

mod types;

pub use types::{CustomerId, OrderId, ProductId};
