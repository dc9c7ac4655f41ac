//! Entity model for the order-management system.
//!
//! This crate provides the record types the store operates on:
//! - [`Customer`] and [`Product`], the live collections
//! - [`Order`] and [`OrderItem`], which embed point-in-time snapshots of the
//!   customer and products they were created from
//!
//! The serde shape of these types is the persisted document layout: orders
//! serialize with `orderDate` as integer epoch-millis and `totalAmount` as a
//! float, with the embedded customer/product copies inline.

mod customer;
mod order;
mod product;

pub use customer::Customer;
pub use order::{Order, OrderItem};
pub use product::Product;
