use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};

use super::access::CustomerId;

pub type OrderId = i32;

pub const STATUS_PENDING: &str = "PENDING";

#[derive(Debug, Clone)]
pub struct OrderLineInput {
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct OrderLineView {
    pub id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub lines: Vec<OrderLineView>,
}
