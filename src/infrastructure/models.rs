use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::schema::{
    addresses, cities, customer_profiles, customers, order_lines, orders, phones,
};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = cities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CityRow {
    pub id: i32,
    pub name: String,
    pub state: String,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = customers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CustomerRow {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub document: String,
    pub kind: i32,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = customers)]
pub struct NewCustomerRow<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub document: &'a str,
    pub kind: i32,
    pub password_hash: &'a str,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = customers)]
pub struct CustomerChangeset<'a> {
    pub name: &'a str,
    pub email: &'a str,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = customer_profiles)]
pub struct CustomerProfileRow {
    pub customer_id: i32,
    pub profile: i32,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = addresses)]
#[diesel(belongs_to(CustomerRow, foreign_key = customer_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AddressRow {
    pub id: i32,
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub district: String,
    pub zip_code: String,
    pub customer_id: i32,
    pub city_id: i32,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = addresses)]
pub struct NewAddressRow<'a> {
    pub street: &'a str,
    pub number: &'a str,
    pub complement: Option<&'a str>,
    pub district: &'a str,
    pub zip_code: &'a str,
    pub customer_id: i32,
    pub city_id: i32,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = phones)]
pub struct PhoneRow<'a> {
    pub customer_id: i32,
    pub number: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: i32,
    pub customer_id: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow<'a> {
    pub customer_id: i32,
    pub status: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = order_lines)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderLineRow {
    pub id: i32,
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_lines)]
pub struct NewOrderLineRow {
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}
