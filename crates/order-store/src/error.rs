use thiserror::Error;

/// Errors that can occur during store operations.
///
/// Every mutation is all-or-nothing: an operation that returns an error has
/// left the store unchanged.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An id, email, or phone collided with an existing entry on add.
    #[error("Duplicate {field}: {value}")]
    DuplicateKey {
        field: &'static str,
        value: String,
    },

    /// A referenced customer, product, or order id is not in the store.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// An order item was given a non-positive quantity.
    #[error("Invalid quantity: {quantity} (must be greater than 0)")]
    InvalidQuantity { quantity: u32 },

    /// A product price was negative.
    #[error("Invalid price: {price} (must not be negative)")]
    InvalidPrice { price: f64 },
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
