//! The order store: mutation engine and query layer.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use common::{CustomerId, OrderId, ProductId};
use domain::{Customer, Order, OrderItem, Product};
use indexmap::IndexMap;

use crate::error::{Result, StoreError};
use crate::index::CustomerIndex;
use crate::invoice;

/// In-memory order-management store.
///
/// Owns the customer collection (with its secondary indexes), the product
/// collection, and the order collection. All mutations go through the
/// methods here and are all-or-nothing; queries borrow from the live state.
/// Orders iterate in insertion order.
///
/// The store is single-threaded and synchronous. Callers that share one
/// across threads must serialize access themselves.
#[derive(Debug, Clone, Default)]
pub struct OrderStore {
    customers: CustomerIndex,
    products: HashMap<ProductId, Product>,
    orders: IndexMap<OrderId, Order>,
}

impl OrderStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // Mutations

    /// Adds a customer.
    ///
    /// Fails with `DuplicateKey` if the id, email, or phone is already in
    /// use by a live customer.
    #[tracing::instrument(skip(self, customer), fields(customer_id = %customer.id))]
    pub fn add_customer(&mut self, customer: Customer) -> Result<()> {
        self.customers.insert(customer)?;
        tracing::debug!("customer added");
        Ok(())
    }

    /// Adds a product.
    ///
    /// Fails with `DuplicateKey` if the id exists and `InvalidPrice` if the
    /// price is negative.
    #[tracing::instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add_product(&mut self, product: Product) -> Result<()> {
        if product.price < 0.0 {
            return Err(StoreError::InvalidPrice {
                price: product.price,
            });
        }
        if self.products.contains_key(&product.id) {
            return Err(StoreError::DuplicateKey {
                field: "product id",
                value: product.id.to_string(),
            });
        }
        self.products.insert(product.id.clone(), product);
        tracing::debug!("product added");
        Ok(())
    }

    /// Creates an order from `(product id, quantity)` pairs.
    ///
    /// Resolves the customer and each product by id and embeds by-value
    /// snapshots of them into the order, computing each line subtotal and
    /// the order total. Fails with `DuplicateKey` if the order id exists,
    /// `NotFound` if the customer or any product is missing, and
    /// `InvalidQuantity` for a zero quantity. Nothing is stored on failure.
    #[tracing::instrument(skip(self, items, order_date))]
    pub fn add_order(
        &mut self,
        id: impl Into<OrderId> + std::fmt::Debug,
        customer_id: &CustomerId,
        items: &[(ProductId, u32)],
        order_date: DateTime<Utc>,
    ) -> Result<&Order> {
        let id = id.into();
        if self.orders.contains_key(&id) {
            return Err(StoreError::DuplicateKey {
                field: "order id",
                value: id.to_string(),
            });
        }

        let customer = self
            .customers
            .by_id(customer_id)
            .ok_or_else(|| StoreError::NotFound {
                kind: "Customer",
                id: customer_id.to_string(),
            })?
            .clone();

        let mut order_items = Vec::with_capacity(items.len());
        for (product_id, quantity) in items {
            if *quantity == 0 {
                return Err(StoreError::InvalidQuantity {
                    quantity: *quantity,
                });
            }
            let product = self
                .products
                .get(product_id)
                .ok_or_else(|| StoreError::NotFound {
                    kind: "Product",
                    id: product_id.to_string(),
                })?
                .clone();
            order_items.push(OrderItem::new(product, *quantity));
        }

        let order = Order::new(id.clone(), customer, order_items, order_date);
        tracing::debug!(total = order.total_amount(), "order added");
        Ok(self.orders.entry(id).or_insert(order))
    }

    /// Updates a product's price and propagates it into every order item
    /// embedding that product.
    ///
    /// Touched items get their subtotal recomputed and each affected order
    /// gets its total recomputed from all of its items; orders without a
    /// matching item are untouched. Fails with `NotFound` if the product is
    /// missing and `InvalidPrice` if the new price is negative.
    #[tracing::instrument(skip(self))]
    pub fn update_product_price(&mut self, product_id: &ProductId, new_price: f64) -> Result<()> {
        if new_price < 0.0 {
            return Err(StoreError::InvalidPrice { price: new_price });
        }
        let product = self
            .products
            .get_mut(product_id)
            .ok_or_else(|| StoreError::NotFound {
                kind: "Product",
                id: product_id.to_string(),
            })?;
        product.price = new_price;

        let mut affected = 0usize;
        for order in self.orders.values_mut() {
            if order.apply_price_update(product_id, new_price) {
                affected += 1;
            }
        }
        tracing::debug!(affected_orders = affected, "price updated");
        Ok(())
    }

    /// Deletes a customer and every order whose embedded customer id
    /// matches, returning the removed customer record.
    ///
    /// Fails with `NotFound` if the customer is absent, in which case
    /// nothing changes.
    #[tracing::instrument(skip(self))]
    pub fn delete_customer(&mut self, customer_id: &CustomerId) -> Result<Customer> {
        let customer = self.customers.remove(customer_id)?;

        let before = self.orders.len();
        self.orders
            .retain(|_, order| order.customer().id != *customer_id);
        tracing::debug!(
            cascaded_orders = before - self.orders.len(),
            "customer deleted"
        );
        Ok(customer)
    }

    // Queries

    /// Returns all orders in insertion order.
    pub fn orders(&self) -> impl Iterator<Item = &Order> {
        self.orders.values()
    }

    /// Returns all orders placed by the customer with the given email, in
    /// insertion order. An unknown email yields an empty result, not an
    /// error.
    pub fn find_orders_by_customer_email(&self, email: &str) -> Vec<&Order> {
        self.customers
            .by_email(email)
            .map(|customer| self.orders_for(&customer.id))
            .unwrap_or_default()
    }

    /// Returns all orders placed by the customer with the given phone
    /// number. An unknown phone yields an empty result, not an error.
    pub fn find_orders_by_customer_phone(&self, phone: &str) -> Vec<&Order> {
        self.customers
            .by_phone(phone)
            .map(|customer| self.orders_for(&customer.id))
            .unwrap_or_default()
    }

    /// Returns all orders with a total strictly greater than `amount`.
    pub fn find_orders_where_total_greater_than(&self, amount: f64) -> Vec<&Order> {
        self.orders
            .values()
            .filter(|order| order.total_amount() > amount)
            .collect()
    }

    /// Renders the invoice text for an order.
    ///
    /// Fails with `NotFound` if the order id is absent. Pure rendering, no
    /// side effects.
    pub fn generate_order_invoice(&self, order_id: &OrderId) -> Result<String> {
        let order = self.order(order_id).ok_or_else(|| StoreError::NotFound {
            kind: "Order",
            id: order_id.to_string(),
        })?;
        Ok(invoice::render(order))
    }

    fn orders_for(&self, customer_id: &CustomerId) -> Vec<&Order> {
        self.orders
            .values()
            .filter(|order| order.customer().id == *customer_id)
            .collect()
    }

    // Accessors

    /// Looks up a live customer by id.
    pub fn customer(&self, id: &CustomerId) -> Option<&Customer> {
        self.customers.by_id(id)
    }

    /// Looks up a live customer by email.
    pub fn customer_by_email(&self, email: &str) -> Option<&Customer> {
        self.customers.by_email(email)
    }

    /// Looks up a live customer by phone.
    pub fn customer_by_phone(&self, phone: &str) -> Option<&Customer> {
        self.customers.by_phone(phone)
    }

    /// Looks up a live product by id.
    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.products.get(id)
    }

    /// Looks up an order by id.
    pub fn order(&self, id: &OrderId) -> Option<&Order> {
        self.orders.get(id)
    }

    /// Iterates over the live customers in unspecified order.
    pub fn customers(&self) -> impl Iterator<Item = &Customer> {
        self.customers.iter()
    }

    /// Iterates over the live products in unspecified order.
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }

    /// Returns the number of live customers.
    pub fn customer_count(&self) -> usize {
        self.customers.len()
    }

    /// Returns the number of live products.
    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    /// Returns the number of orders.
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// Inserts an already-built order verbatim, without recomputing its
    /// totals. Used by the persistence codec, where the embedded snapshots
    /// and the stored total are authoritative.
    pub(crate) fn insert_order_verbatim(&mut self, order: Order) -> Result<()> {
        if self.orders.contains_key(order.id()) {
            return Err(StoreError::DuplicateKey {
                field: "order id",
                value: order.id().to_string(),
            });
        }
        self.orders.insert(order.id().clone(), order);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn test_date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 10, 30, 0).unwrap()
    }

    fn seeded_store() -> OrderStore {
        let mut store = OrderStore::new();
        store
            .add_customer(Customer::new(
                "cust1",
                "John Doe",
                "john@example.com",
                "1234567890",
            ))
            .unwrap();
        store
            .add_product(Product::new("prod1", "Laptop", 999.99))
            .unwrap();
        store
            .add_product(Product::new("prod3", "Headphones", 149.99))
            .unwrap();
        store
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn add_order_snapshots_and_totals() {
        let mut store = seeded_store();
        let order = store
            .add_order(
                "order1",
                &CustomerId::new("cust1"),
                &[(ProductId::new("prod1"), 1), (ProductId::new("prod3"), 2)],
                test_date(),
            )
            .unwrap();

        assert_eq!(order.item_count(), 2);
        assert_close(order.total_amount(), 1299.97);
        assert_eq!(order.customer().name, "John Doe");
    }

    #[test]
    fn add_order_with_duplicate_id_fails() {
        let mut store = seeded_store();
        let customer_id = CustomerId::new("cust1");
        let items = [(ProductId::new("prod1"), 1)];
        store
            .add_order("order1", &customer_id, &items, test_date())
            .unwrap();

        let result = store.add_order("order1", &customer_id, &items, test_date());
        assert!(matches!(
            result,
            Err(StoreError::DuplicateKey { field: "order id", .. })
        ));
        assert_eq!(store.order_count(), 1);
    }

    #[test]
    fn add_order_with_unknown_customer_fails() {
        let mut store = seeded_store();
        let result = store.add_order(
            "order1",
            &CustomerId::new("ghost"),
            &[(ProductId::new("prod1"), 1)],
            test_date(),
        );
        assert!(matches!(
            result,
            Err(StoreError::NotFound { kind: "Customer", .. })
        ));
        assert_eq!(store.order_count(), 0);
    }

    #[test]
    fn add_order_with_unknown_product_fails() {
        let mut store = seeded_store();
        let result = store.add_order(
            "order1",
            &CustomerId::new("cust1"),
            &[(ProductId::new("prod1"), 1), (ProductId::new("ghost"), 1)],
            test_date(),
        );
        assert!(matches!(
            result,
            Err(StoreError::NotFound { kind: "Product", .. })
        ));
        assert_eq!(store.order_count(), 0);
    }

    #[test]
    fn add_order_with_zero_quantity_fails() {
        let mut store = seeded_store();
        let result = store.add_order(
            "order1",
            &CustomerId::new("cust1"),
            &[(ProductId::new("prod1"), 0)],
            test_date(),
        );
        assert!(matches!(
            result,
            Err(StoreError::InvalidQuantity { quantity: 0 })
        ));
        assert_eq!(store.order_count(), 0);
    }

    #[test]
    fn add_product_with_negative_price_fails() {
        let mut store = OrderStore::new();
        let result = store.add_product(Product::new("prod1", "Laptop", -1.0));
        assert!(matches!(result, Err(StoreError::InvalidPrice { .. })));
        assert_eq!(store.product_count(), 0);
    }

    #[test]
    fn update_price_propagates_into_embedded_snapshots() {
        let mut store = seeded_store();
        store
            .add_order(
                "order1",
                &CustomerId::new("cust1"),
                &[(ProductId::new("prod1"), 1), (ProductId::new("prod3"), 2)],
                test_date(),
            )
            .unwrap();

        store
            .update_product_price(&ProductId::new("prod1"), 899.99)
            .unwrap();

        assert_close(store.product(&ProductId::new("prod1")).unwrap().price, 899.99);
        let order = store.order(&OrderId::new("order1")).unwrap();
        assert_close(order.items()[0].product().price, 899.99);
        assert_close(order.total_amount(), 1199.97);
    }

    #[test]
    fn update_price_leaves_unrelated_orders_untouched() {
        let mut store = seeded_store();
        store
            .add_order(
                "order1",
                &CustomerId::new("cust1"),
                &[(ProductId::new("prod3"), 2)],
                test_date(),
            )
            .unwrap();
        let before = store.order(&OrderId::new("order1")).unwrap().clone();

        store
            .update_product_price(&ProductId::new("prod1"), 899.99)
            .unwrap();

        assert_eq!(store.order(&OrderId::new("order1")).unwrap(), &before);
    }

    #[test]
    fn update_price_rejects_negative_and_missing() {
        let mut store = seeded_store();
        assert!(matches!(
            store.update_product_price(&ProductId::new("prod1"), -0.01),
            Err(StoreError::InvalidPrice { .. })
        ));
        assert!(matches!(
            store.update_product_price(&ProductId::new("ghost"), 10.0),
            Err(StoreError::NotFound { kind: "Product", .. })
        ));
        // Failed updates must not have changed the live price.
        assert_close(store.product(&ProductId::new("prod1")).unwrap().price, 999.99);
    }

    #[test]
    fn name_changes_do_not_propagate_into_snapshots() {
        // Only price updates flow into embedded copies. There is no rename
        // operation, so the embedded name can only diverge the other way:
        // the snapshot keeps the name from order-creation time.
        let mut store = seeded_store();
        store
            .add_order(
                "order1",
                &CustomerId::new("cust1"),
                &[(ProductId::new("prod1"), 1)],
                test_date(),
            )
            .unwrap();

        store
            .update_product_price(&ProductId::new("prod1"), 899.99)
            .unwrap();
        let order = store.order(&OrderId::new("order1")).unwrap();
        assert_eq!(order.items()[0].product().name, "Laptop");
        assert_eq!(order.customer().email, "john@example.com");
    }

    #[test]
    fn delete_customer_cascades_to_orders() {
        let mut store = seeded_store();
        store
            .add_customer(Customer::new(
                "cust2",
                "Jane Smith",
                "jane@example.com",
                "0987654321",
            ))
            .unwrap();
        store
            .add_order(
                "order1",
                &CustomerId::new("cust1"),
                &[(ProductId::new("prod1"), 1)],
                test_date(),
            )
            .unwrap();
        store
            .add_order(
                "order2",
                &CustomerId::new("cust2"),
                &[(ProductId::new("prod3"), 1)],
                test_date(),
            )
            .unwrap();

        let removed = store.delete_customer(&CustomerId::new("cust2")).unwrap();
        assert_eq!(removed.name, "Jane Smith");

        let remaining: Vec<_> = store.orders().map(|o| o.id().as_str()).collect();
        assert_eq!(remaining, vec!["order1"]);
        assert!(store.customer_by_email("jane@example.com").is_none());
        assert!(store.customer_by_phone("0987654321").is_none());
    }

    #[test]
    fn delete_missing_customer_changes_nothing() {
        let mut store = seeded_store();
        store
            .add_order(
                "order1",
                &CustomerId::new("cust1"),
                &[(ProductId::new("prod1"), 1)],
                test_date(),
            )
            .unwrap();

        let result = store.delete_customer(&CustomerId::new("ghost"));
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
        assert_eq!(store.customer_count(), 1);
        assert_eq!(store.order_count(), 1);
    }

    #[test]
    fn orders_iterate_in_insertion_order() {
        let mut store = seeded_store();
        let customer_id = CustomerId::new("cust1");
        for n in 1..=5 {
            store
                .add_order(
                    format!("order{n}"),
                    &customer_id,
                    &[(ProductId::new("prod3"), 1)],
                    test_date(),
                )
                .unwrap();
        }

        let ids: Vec<_> = store.orders().map(|o| o.id().as_str()).collect();
        assert_eq!(ids, vec!["order1", "order2", "order3", "order4", "order5"]);
    }

    #[test]
    fn find_orders_by_unknown_contact_is_empty() {
        let store = seeded_store();
        assert!(store
            .find_orders_by_customer_email("nonexistent@x.com")
            .is_empty());
        assert!(store.find_orders_by_customer_phone("0000000000").is_empty());
    }

    #[test]
    fn find_orders_by_contact_matches_embedded_customer_id() {
        let mut store = seeded_store();
        store
            .add_order(
                "order1",
                &CustomerId::new("cust1"),
                &[(ProductId::new("prod1"), 1)],
                test_date(),
            )
            .unwrap();

        let by_email = store.find_orders_by_customer_email("john@example.com");
        assert_eq!(by_email.len(), 1);
        assert_eq!(by_email[0].id().as_str(), "order1");

        let by_phone = store.find_orders_by_customer_phone("1234567890");
        assert_eq!(by_phone.len(), 1);
    }

    #[test]
    fn total_threshold_filter_is_strict() {
        let mut store = seeded_store();
        let customer_id = CustomerId::new("cust1");
        store
            .add_order(
                "order1",
                &customer_id,
                &[(ProductId::new("prod1"), 1)],
                test_date(),
            )
            .unwrap();
        store
            .add_order(
                "order2",
                &customer_id,
                &[(ProductId::new("prod3"), 1)],
                test_date(),
            )
            .unwrap();

        let over_500 = store.find_orders_where_total_greater_than(500.0);
        assert_eq!(over_500.len(), 1);
        assert_eq!(over_500[0].id().as_str(), "order1");

        // Strict comparison: a total equal to the threshold is excluded.
        let order1_total = store.order(&OrderId::new("order1")).unwrap().total_amount();
        assert!(store
            .find_orders_where_total_greater_than(order1_total)
            .is_empty());
    }
}
