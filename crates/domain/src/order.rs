use chrono::{DateTime, Utc};
use common::{OrderId, ProductId};
use serde::{Deserialize, Serialize};

use crate::{Customer, Product};

/// A line item in an order.
///
/// The embedded [`Product`] is a point-in-time snapshot taken when the item
/// was added, not a live reference. The only mutation it ever sees is a
/// price propagated through [`Order::apply_price_update`]; name changes to
/// the live product never reach it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    product: Product,
    quantity: u32,
    subtotal: f64,
}

impl OrderItem {
    /// Creates a new line item, computing `subtotal = quantity * price`.
    pub fn new(product: Product, quantity: u32) -> Self {
        let subtotal = f64::from(quantity) * product.price;
        Self {
            product,
            quantity,
            subtotal,
        }
    }

    /// Returns the embedded product snapshot.
    pub fn product(&self) -> &Product {
        &self.product
    }

    /// Returns the quantity ordered.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Returns the line subtotal.
    pub fn subtotal(&self) -> f64 {
        self.subtotal
    }
}

impl std::fmt::Display for OrderItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "OrderItem[product={}, quantity={}, subtotal={:.2}]",
            self.product.name, self.quantity, self.subtotal
        )
    }
}

/// An order record.
///
/// Embeds a snapshot of the customer as it existed at creation time and one
/// [`OrderItem`] per product, in insertion order. `total_amount` is derived
/// from the item subtotals; the fields are private so neither it nor the
/// subtotals can be assigned from outside the recompute rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    id: OrderId,
    customer: Customer,
    items: Vec<OrderItem>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    order_date: DateTime<Utc>,
    total_amount: f64,
}

impl Order {
    /// Creates a new order, computing `total_amount` from the items.
    pub fn new(
        id: impl Into<OrderId>,
        customer: Customer,
        items: Vec<OrderItem>,
        order_date: DateTime<Utc>,
    ) -> Self {
        let total_amount = items.iter().map(OrderItem::subtotal).sum();
        Self {
            id: id.into(),
            customer,
            items,
            order_date,
            total_amount,
        }
    }

    /// Returns the order identifier.
    pub fn id(&self) -> &OrderId {
        &self.id
    }

    /// Returns the embedded customer snapshot.
    pub fn customer(&self) -> &Customer {
        &self.customer
    }

    /// Returns the line items in insertion order.
    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    /// Returns the number of line items.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the order date.
    pub fn order_date(&self) -> DateTime<Utc> {
        self.order_date
    }

    /// Returns the order total.
    pub fn total_amount(&self) -> f64 {
        self.total_amount
    }

    /// Returns true if any line item embeds the given product.
    pub fn contains_product(&self, product_id: &ProductId) -> bool {
        self.items.iter().any(|item| item.product.id == *product_id)
    }

    /// Propagates a price change into every line item embedding the given
    /// product, recomputing each touched subtotal and, if anything matched,
    /// the order total from all items.
    ///
    /// Returns true if the order contained the product. An order without a
    /// matching item is left untouched.
    pub fn apply_price_update(&mut self, product_id: &ProductId, new_price: f64) -> bool {
        let mut touched = false;
        for item in &mut self.items {
            if item.product.id == *product_id {
                item.product.price = new_price;
                item.subtotal = f64::from(item.quantity) * new_price;
                touched = true;
            }
        }
        if touched {
            self.total_amount = self.items.iter().map(OrderItem::subtotal).sum();
        }
        touched
    }
}

impl std::fmt::Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Order[id={}, customer={}, date={}, items={}, total={:.2}]",
            self.id,
            self.customer.name,
            self.order_date.format("%Y-%m-%d"),
            self.items.len(),
            self.total_amount
        )
    }
}
