use common::CustomerId;
use serde::{Deserialize, Serialize};

/// A customer record.
///
/// The id is immutable after creation; email and phone are unique among
/// live customers (enforced by the store's index, not here).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Unique customer identifier.
    pub id: CustomerId,

    /// Full name.
    pub name: String,

    /// Contact email, unique among live customers.
    pub email: String,

    /// Contact phone number, unique among live customers.
    pub phone: String,
}

impl Customer {
    /// Creates a new customer record.
    pub fn new(
        id: impl Into<CustomerId>,
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
        }
    }
}

impl std::fmt::Display for Customer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Customer[id={}, name={}, email={}, phone={}]",
            self.id, self.name, self.email, self.phone
        )
    }
}
