//! Whole-snapshot persistence codec.
//!
//! Serializes the full store to a typed JSON document and reconstructs it.
//! The document's order records carry the embedded customer/product
//! snapshots inline, and on load those embedded copies are authoritative:
//! they are parsed directly from the document, never re-resolved against the
//! live collections, and stored totals are kept verbatim.

use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

use domain::{Customer, Order, Product};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::OrderStore;

/// Default data file name.
pub const DEFAULT_DATA_FILE: &str = "order_management_data.json";

/// Errors that can occur while persisting or restoring a store.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The document is malformed: a required field is missing or of the
    /// wrong shape, or the records cannot rebuild a consistent store
    /// (duplicate ids, emails, or phones).
    #[error("Corrupt data: {0}")]
    CorruptData(String),

    /// A serialization error occurred while writing.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An I/O error occurred. In-memory state is unaffected.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for persistence operations.
pub type Result<T> = std::result::Result<T, PersistenceError>;

/// The persisted document: three named sequences covering the full live
/// state. Field-by-field validation on load comes from the typed schema;
/// any shape mismatch surfaces as [`PersistenceError::CorruptData`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// The full live customer collection.
    pub customers: Vec<Customer>,

    /// The full live product collection.
    pub products: Vec<Product>,

    /// All orders, each with its embedded snapshots inline.
    pub orders: Vec<Order>,
}

/// Captures the full store state as a document.
///
/// Customers and products are emitted sorted by id so the document is
/// deterministic; orders keep their insertion order.
pub fn snapshot(store: &OrderStore) -> StoreSnapshot {
    let mut customers: Vec<Customer> = store.customers().cloned().collect();
    customers.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));

    let mut products: Vec<Product> = store.products().cloned().collect();
    products.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));

    StoreSnapshot {
        customers,
        products,
        orders: store.orders().cloned().collect(),
    }
}

/// Rebuilds a store from a document.
///
/// Customers and products are loaded first (repopulating the secondary
/// indexes), then each order is inserted verbatim: embedded snapshots and
/// stored totals are taken as written, not recomputed. A document whose
/// records collide on any unique key is rejected as `CorruptData`.
pub fn restore(snapshot: StoreSnapshot) -> Result<OrderStore> {
    let mut store = OrderStore::new();

    for customer in snapshot.customers {
        store
            .add_customer(customer)
            .map_err(|e| PersistenceError::CorruptData(e.to_string()))?;
    }
    for product in snapshot.products {
        store
            .add_product(product)
            .map_err(|e| PersistenceError::CorruptData(e.to_string()))?;
    }
    for order in snapshot.orders {
        store
            .insert_order_verbatim(order)
            .map_err(|e| PersistenceError::CorruptData(e.to_string()))?;
    }

    Ok(store)
}

/// Writes the store to a writer as pretty-printed JSON.
pub fn write_to<W: Write>(store: &OrderStore, writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, &snapshot(store))?;
    Ok(())
}

/// Reads a store from a reader.
///
/// Fails with `CorruptData` if the document does not match the schema.
pub fn read_from<R: Read>(reader: R) -> Result<OrderStore> {
    let snapshot: StoreSnapshot =
        serde_json::from_reader(reader).map_err(|e| PersistenceError::CorruptData(e.to_string()))?;
    restore(snapshot)
}

/// Saves the store to a file, replacing any previous contents.
#[tracing::instrument(skip(store))]
pub fn save_to_path(store: &OrderStore, path: impl AsRef<Path> + std::fmt::Debug) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write_to(store, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Loads a store from a file.
///
/// A missing file is not an error: it yields a fresh empty store.
#[tracing::instrument]
pub fn load_from_path(path: impl AsRef<Path> + std::fmt::Debug) -> Result<OrderStore> {
    let file = match File::open(path.as_ref()) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(OrderStore::new()),
        Err(e) => return Err(e.into()),
    };
    read_from(BufReader::new(file))
}
