use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::errors::DomainError;

const NAME_MIN: usize = 5;
const NAME_MAX: usize = 120;

// Column widths of the customer tables.
pub(crate) const EMAIL_MAX: usize = 255;
pub(crate) const DOCUMENT_MAX: usize = 20;
pub(crate) const STREET_MAX: usize = 255;
pub(crate) const NUMBER_MAX: usize = 20;
pub(crate) const COMPLEMENT_MAX: usize = 255;
pub(crate) const DISTRICT_MAX: usize = 255;
pub(crate) const ZIP_CODE_MAX: usize = 20;
pub(crate) const PHONE_MAX: usize = 30;

/// Editable customer fields, as sent by `PUT /customers/{id}`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CustomerDto {
    pub name: String,
    pub email: String,
}

/// Sign-up payload: one flat document carrying the customer, its first
/// address and up to three phone numbers.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewCustomerDto {
    pub name: String,
    pub email: String,
    /// CPF for individuals, CNPJ for legal entities.
    pub document: String,
    /// 1 = individual, 2 = legal entity
    pub kind: i32,
    pub password: String,

    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub district: String,
    pub zip_code: String,

    pub phone1: String,
    pub phone2: Option<String>,
    pub phone3: Option<String>,

    pub city_id: i32,
}

/// One order line as submitted. The price stays a string until the caller
/// is authorized, then parses as a decimal, e.g. "9.99".
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct OrderLineDto {
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price: String,
}

pub(crate) fn validate_name(name: &str) -> Result<(), DomainError> {
    let len = name.trim().chars().count();
    if !(NAME_MIN..=NAME_MAX).contains(&len) {
        return Err(DomainError::InvalidInput(format!(
            "name must be between {NAME_MIN} and {NAME_MAX} characters"
        )));
    }
    Ok(())
}

pub(crate) fn validate_email(email: &str) -> Result<(), DomainError> {
    let email = email.trim();
    max_len("email", email, EMAIL_MAX)?;
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(DomainError::InvalidInput(format!("invalid email: '{email}'"))),
    }
}

pub(crate) fn require(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::InvalidInput(format!("{field} is required")));
    }
    Ok(())
}

/// Character count, matching how Postgres measures VARCHAR(n).
pub(crate) fn max_len(field: &str, value: &str, max: usize) -> Result<(), DomainError> {
    if value.chars().count() > max {
        return Err(DomainError::InvalidInput(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}
