//! Invoice text rendering.

use std::fmt::Write;

use domain::Order;

/// Renders an order as an invoice text document.
///
/// Layout: `INVOICE` header, order id and date, the embedded customer's
/// contact block, one line per item in original item order (name, quantity,
/// unit price, line total), then the order total.
pub fn render(order: &Order) -> String {
    let mut invoice = String::new();

    let _ = writeln!(invoice, "INVOICE");
    let _ = writeln!(invoice, "Order ID: {}", order.id());
    let _ = writeln!(
        invoice,
        "Date: {}",
        order.order_date().format("%Y-%m-%d %H:%M:%S")
    );
    let _ = writeln!(invoice);
    let _ = writeln!(invoice, "Customer:");
    let _ = writeln!(invoice, "  Name: {}", order.customer().name);
    let _ = writeln!(invoice, "  Email: {}", order.customer().email);
    let _ = writeln!(invoice, "  Phone: {}", order.customer().phone);
    let _ = writeln!(invoice);
    let _ = writeln!(invoice, "Items:");

    for item in order.items() {
        let unit = format!("${:.2}", item.product().price);
        let _ = writeln!(
            invoice,
            "  {:<20} {:>3} x {:<9} ${:.2}",
            item.product().name,
            item.quantity(),
            unit,
            item.subtotal()
        );
    }

    let _ = writeln!(invoice);
    let _ = write!(invoice, "Total Amount: ${:.2}", order.total_amount());

    invoice
}
