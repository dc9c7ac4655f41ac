//! In-memory order-management store.
//!
//! This crate provides the engine around the entity model in `domain`:
//! - [`CustomerIndex`]: the customer collection with email/phone secondary
//!   indexes kept in lockstep with it
//! - [`OrderStore`]: the mutation engine (cascading price propagation and
//!   customer deletion) and query layer
//! - [`invoice`]: invoice text rendering
//! - [`persistence`]: the whole-snapshot JSON codec and file helpers
//!
//! All operations are synchronous and the store provides no internal
//! locking; one `OrderStore` instance exclusively owns its state.

pub mod error;
pub mod index;
pub mod invoice;
pub mod persistence;
pub mod store;

pub use error::{Result, StoreError};
pub use index::CustomerIndex;
pub use persistence::{
    DEFAULT_DATA_FILE, PersistenceError, StoreSnapshot, load_from_path, read_from, restore,
    save_to_path, snapshot, write_to,
};
pub use store::OrderStore;
