//! Email bodies for order notifications.

use crate::domain::value_objects::format_amount;
use crate::domain::{Order, OrderEvent};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Audience { Client, Admin }

/// Subject and HTML body for one audience.
pub fn compose(event: OrderEvent, order: &Order, audience: Audience) -> (String, String) {
    match (event, audience) {
        (OrderEvent::Placed, Audience::Client) => (
            format!("Order Confirmation - Order #{}", order.id),
            format!(
                "<h2>Thank you for your order, {name}!</h2>\
                 <p>Your order has been received and is now <strong>{status}</strong>.</p>{summary}\
                 <p>Your invoice is attached to this email.</p>",
                name = escape(&order.client_name), status = order.status, summary = summary(order),
            ),
        ),
        (OrderEvent::Placed, Audience::Admin) => (
            format!("New Order Received - Order #{}", order.id),
            format!(
                "<h2>New order received</h2><p>Client: {name} &lt;{email}&gt;</p>{summary}\
                 <p>The invoice is attached.</p>",
                name = escape(&order.client_name), email = escape(&order.client_email), summary = summary(order),
            ),
        ),
        (OrderEvent::StatusChanged { previous, current }, Audience::Client) => (
            format!("Order Status Updated - Order #{}", order.id),
            format!(
                "<h2>Hello {name},</h2><p>The status of your order #{id} changed from \
                 <strong>{previous}</strong> to <strong>{current}</strong>.</p>{summary}",
                name = escape(&order.client_name), id = order.id, summary = summary(order),
            ),
        ),
        (OrderEvent::StatusChanged { previous, current }, Audience::Admin) => (
            format!("Order Status Updated - Order #{}", order.id),
            format!(
                "<h2>Order #{id} updated</h2><p>Client: {name} &lt;{email}&gt;</p>\
                 <p>Status changed from <strong>{previous}</strong> to <strong>{current}</strong>.</p>{summary}",
                id = order.id, name = escape(&order.client_name), email = escape(&order.client_email), summary = summary(order),
            ),
        ),
    }
}

fn summary(order: &Order) -> String {
    format!(
        "<table><tr><th>Order ID</th><td>{id}</td></tr><tr><th>Product</th><td>{product}</td></tr>\
         <tr><th>Quantity</th><td>{quantity}</td></tr><tr><th>Unit Price</th><td>{price}</td></tr>\
         <tr><th>Total</th><td>{total}</td></tr></table>",
        id = order.id, product = escape(&order.product_name), quantity = order.quantity,
        price = format_amount(order.unit_price.amount()), total = format_amount(order.total()),
    )
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OrderStatus, Quantity, UnitPrice};
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn order(name: &str) -> Order {
        let now = Utc::now();
        Order {
            id: 5, client_name: name.into(), client_email: "a@b.com".into(), product_name: "Widget".into(),
            quantity: Quantity::new(2).unwrap(), unit_price: UnitPrice::new(Decimal::new(1250, 2)).unwrap(),
            status: OrderStatus::Pending, created_at: now, updated_at: now,
        }
    }

    #[test]
    fn placed_messages_name_the_order() {
        let (subject, body) = compose(OrderEvent::Placed, &order("Alice"), Audience::Client);
        assert_eq!(subject, "Order Confirmation - Order #5");
        assert!(body.contains("Alice") && body.contains("25.00") && body.contains("12.50"));
        let (subject, body) = compose(OrderEvent::Placed, &order("Alice"), Audience::Admin);
        assert_eq!(subject, "New Order Received - Order #5");
        assert!(body.contains("a@b.com"));
    }

    #[test]
    fn status_change_mentions_both_states() {
        let event = OrderEvent::StatusChanged { previous: OrderStatus::Pending, current: OrderStatus::OnProcess };
        let (subject, body) = compose(event, &order("Alice"), Audience::Client);
        assert_eq!(subject, "Order Status Updated - Order #5");
        assert!(body.contains("<strong>Pending</strong> to <strong>On Process</strong>"));
    }

    #[test]
    fn user_fields_are_escaped() {
        let (_, body) = compose(OrderEvent::Placed, &order("<script>x</script>"), Audience::Client);
        assert!(!body.contains("<script>"));
        assert!(body.contains("&lt;script&gt;"));
    }
}
