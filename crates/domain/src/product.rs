use common::ProductId;
use serde::{Deserialize, Serialize};

/// A product record.
///
/// The id is immutable after creation. The price is mutable but must stay
/// non-negative; the store validates that on add and on price update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,

    /// Human-readable product name.
    pub name: String,

    /// Unit price.
    pub price: f64,
}

impl Product {
    /// Creates a new product record.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
        }
    }
}

impl std::fmt::Display for Product {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Product[id={}, name={}, price={:.2}]",
            self.id, self.name, self.price
        )
    }
}
