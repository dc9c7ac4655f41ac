//! Customer collection with secondary indexes.

use std::collections::HashMap;

use common::CustomerId;
use domain::Customer;

use crate::error::{Result, StoreError};

/// The live customer collection plus its secondary indexes.
///
/// Holds the primary `id -> Customer` map and keeps `email -> id` and
/// `phone -> id` maps in lockstep with it: every live customer has exactly
/// one entry in each secondary map under its current email and phone. The
/// index never touches orders; cascading is the store's job.
#[derive(Debug, Clone, Default)]
pub struct CustomerIndex {
    by_id: HashMap<CustomerId, Customer>,
    by_email: HashMap<String, CustomerId>,
    by_phone: HashMap<String, CustomerId>,
}

impl CustomerIndex {
    /// Creates a new empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a customer into all three maps.
    ///
    /// Fails with `DuplicateKey` if the id, email, or phone is already
    /// present. All three keys are checked before any map is touched, so a
    /// failed insert leaves the index unchanged.
    pub fn insert(&mut self, customer: Customer) -> Result<()> {
        if self.by_id.contains_key(&customer.id) {
            return Err(StoreError::DuplicateKey {
                field: "customer id",
                value: customer.id.to_string(),
            });
        }
        if self.by_email.contains_key(&customer.email) {
            return Err(StoreError::DuplicateKey {
                field: "email",
                value: customer.email,
            });
        }
        if self.by_phone.contains_key(&customer.phone) {
            return Err(StoreError::DuplicateKey {
                field: "phone",
                value: customer.phone,
            });
        }

        self.by_email
            .insert(customer.email.clone(), customer.id.clone());
        self.by_phone
            .insert(customer.phone.clone(), customer.id.clone());
        self.by_id.insert(customer.id.clone(), customer);
        Ok(())
    }

    /// Removes a customer from all three maps, returning the record.
    ///
    /// Fails with `NotFound` if the id is absent.
    pub fn remove(&mut self, id: &CustomerId) -> Result<Customer> {
        let customer = self.by_id.remove(id).ok_or_else(|| StoreError::NotFound {
            kind: "Customer",
            id: id.to_string(),
        })?;
        self.by_email.remove(&customer.email);
        self.by_phone.remove(&customer.phone);
        Ok(customer)
    }

    /// Looks up a customer by id.
    pub fn by_id(&self, id: &CustomerId) -> Option<&Customer> {
        self.by_id.get(id)
    }

    /// Looks up a customer by email.
    pub fn by_email(&self, email: &str) -> Option<&Customer> {
        self.by_email.get(email).and_then(|id| self.by_id.get(id))
    }

    /// Looks up a customer by phone.
    pub fn by_phone(&self, phone: &str) -> Option<&Customer> {
        self.by_phone.get(phone).and_then(|id| self.by_id.get(id))
    }

    /// Returns the number of live customers.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Returns true if there are no live customers.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Iterates over the live customers in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &Customer> {
        self.by_id.values()
    }
}
