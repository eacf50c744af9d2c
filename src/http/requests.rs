//! Request bodies and their validation.
//!
//! Every field is optional at the serde level so a missing field becomes a
//! `400 ValidationFailed` instead of a deserialization rejection.

use rust_decimal::Decimal;
use serde::Deserialize;
use validator::{Validate, ValidationErrors};

use crate::domain::{OrderDraft, OrderEdit, OrderStatus, Quantity, UnitPrice};
use crate::workflow::Fatal;

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[validate(required(message = "clientEmail is required"), email(message = "clientEmail must be a valid email address"))]
    pub client_email: Option<String>,
    #[validate(required(message = "productName is required"), length(min = 1, message = "productName must not be empty"))]
    pub product_name: Option<String>,
    #[validate(required(message = "quantity is required"), range(min = 1, max = 2147483647, message = "quantity must be a positive integer"))]
    pub quantity: Option<i64>,
    #[validate(required(message = "price is required"))]
    pub price: Option<Decimal>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EditOrderRequest {
    #[validate(required(message = "productName is required"), length(min = 1, message = "productName must not be empty"))]
    pub product_name: Option<String>,
    #[validate(required(message = "quantity is required"), range(min = 1, max = 2147483647, message = "quantity must be a positive integer"))]
    pub quantity: Option<i64>,
    #[validate(required(message = "price is required"))]
    pub price: Option<Decimal>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateStatusRequest {
    #[validate(required(message = "status is required"))]
    pub status: Option<String>,
}

impl CreateOrderRequest {
    pub fn into_draft(self) -> Result<OrderDraft, Fatal> {
        self.validate().map_err(validation_failed)?;
        let (product_name, quantity, unit_price) = line(self.product_name, self.quantity, self.price)?;
        Ok(OrderDraft { client_email: self.client_email.unwrap_or_default().trim().to_string(), product_name, quantity, unit_price })
    }
}

impl EditOrderRequest {
    pub fn into_edit(self) -> Result<OrderEdit, Fatal> {
        self.validate().map_err(validation_failed)?;
        let (product_name, quantity, unit_price) = line(self.product_name, self.quantity, self.price)?;
        Ok(OrderEdit { product_name, quantity, unit_price })
    }
}

impl UpdateStatusRequest {
    pub fn into_status(self) -> Result<OrderStatus, Fatal> {
        self.validate().map_err(validation_failed)?;
        self.status.unwrap_or_default().parse().map_err(|e: crate::domain::aggregates::UnknownStatus| Fatal::Validation(e.to_string()))
    }
}

fn line(product_name: Option<String>, quantity: Option<i64>, price: Option<Decimal>) -> Result<(String, Quantity, UnitPrice), Fatal> {
    let product_name = product_name.unwrap_or_default().trim().to_string();
    if product_name.is_empty() { return Err(Fatal::Validation("productName must not be empty".into())); }
    let quantity = Quantity::try_from(quantity.unwrap_or_default())
        .map_err(|e| Fatal::Validation(e.to_string()))?;
    let unit_price = UnitPrice::new(price.unwrap_or_default()).map_err(|e| Fatal::Validation(e.to_string()))?;
    Ok((product_name, quantity, unit_price))
}

/// Flatten validator output into one message, ordered by field name.
fn validation_failed(errors: ValidationErrors) -> Fatal {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by_key(|(field, _)| *field);
    let messages: Vec<String> = fields.into_iter().flat_map(|(field, errs)| {
        errs.iter().map(move |e| e.message.as_ref().map_or_else(|| format!("{field} is invalid"), |m| m.to_string()))
    }).collect();
    Fatal::Validation(messages.join("; "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn create(body: serde_json::Value) -> Result<OrderDraft, Fatal> {
        serde_json::from_value::<CreateOrderRequest>(body).unwrap().into_draft()
    }

    #[test]
    fn accepts_string_and_number_prices() {
        let draft = create(json!({"clientEmail": "a@b.com", "productName": "Widget", "quantity": 3, "price": "10.00"})).unwrap();
        assert_eq!(draft.unit_price.amount(), Decimal::new(10, 0));
        let draft = create(json!({"clientEmail": " a@b.com ", "productName": "Widget", "quantity": 3, "price": 9.5})).unwrap();
        assert_eq!(draft.unit_price.amount(), Decimal::new(95, 1));
        assert_eq!(draft.client_email, "a@b.com");
    }

    #[rstest]
    #[case(json!({"productName": "Widget", "quantity": 3, "price": "10.00"}), "clientEmail is required")]
    #[case(json!({"clientEmail": "not-an-email", "productName": "Widget", "quantity": 3, "price": "10.00"}), "clientEmail must be a valid email address")]
    #[case(json!({"clientEmail": "a@b.com", "productName": "Widget", "quantity": 0, "price": "10.00"}), "quantity must be a positive integer")]
    #[case(json!({"clientEmail": "a@b.com", "productName": "Widget", "quantity": 3}), "price is required")]
    #[case(json!({"clientEmail": "a@b.com", "productName": "   ", "quantity": 3, "price": "1"}), "productName must not be empty")]
    #[case(json!({"clientEmail": "a@b.com", "productName": "Widget", "quantity": 3, "price": "-1"}), "price must not be negative")]
    #[case(json!({"clientEmail": "a@b.com", "productName": "Widget", "quantity": 3, "price": "10000000000"}), "price must not exceed 9999999999.99")]
    fn invalid_create_bodies(#[case] body: serde_json::Value, #[case] message: &str) {
        match create(body) {
            Err(Fatal::Validation(text)) => assert!(text.contains(message), "{text}"),
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn edit_requires_every_field() {
        let missing = serde_json::from_value::<EditOrderRequest>(json!({"productName": "Widget"})).unwrap().into_edit();
        assert!(matches!(missing, Err(Fatal::Validation(ref m)) if m.contains("price is required") && m.contains("quantity is required")));
        let ok = serde_json::from_value::<EditOrderRequest>(json!({"productName": "Gadget", "quantity": 2, "price": 4})).unwrap().into_edit();
        assert!(ok.is_ok());
    }

    #[test]
    fn status_must_match_exactly() {
        let parse = |v: serde_json::Value| serde_json::from_value::<UpdateStatusRequest>(v).unwrap().into_status();
        assert_eq!(parse(json!({"status": "On Process"})).unwrap(), OrderStatus::OnProcess);
        assert!(matches!(parse(json!({"status": "completed"})), Err(Fatal::Validation(_))));
        assert!(matches!(parse(json!({})), Err(Fatal::Validation(ref m)) if m == "status is required"));
    }
}
