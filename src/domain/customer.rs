use std::collections::BTreeSet;
use std::str::FromStr;

use super::access::{CustomerId, Profile};
use super::errors::DomainError;
use super::page::SortDirection;

pub type CityId = i32;

/// Individual (tax id is a CPF) or legal entity (CNPJ). Stored as an integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CustomerKind {
    Individual,
    LegalEntity,
}

impl CustomerKind {
    pub const fn code(self) -> i32 {
        match self {
            CustomerKind::Individual => 1,
            CustomerKind::LegalEntity => 2,
        }
    }

    pub fn from_code(code: i32) -> Result<Self, DomainError> {
        match code {
            1 => Ok(CustomerKind::Individual),
            2 => Ok(CustomerKind::LegalEntity),
            other => Err(DomainError::InvalidInput(format!(
                "unknown customer kind code: {other}"
            ))),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            CustomerKind::Individual => "INDIVIDUAL",
            CustomerKind::LegalEntity => "LEGAL_ENTITY",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct City {
    pub id: CityId,
    pub name: String,
    pub state: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub id: i32,
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub district: String,
    pub zip_code: String,
    pub city: City,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    pub document: String,
    pub kind: CustomerKind,
    pub profiles: BTreeSet<Profile>,
    pub addresses: Vec<Address>,
    pub phones: BTreeSet<String>,
}

/// Listing row: identity and contact only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerSummary {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
}

impl From<&Customer> for CustomerSummary {
    fn from(c: &Customer) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
            email: c.email.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAddress {
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub district: String,
    pub zip_code: String,
    pub city_id: CityId,
}

/// Aggregate written in one transaction: customer, addresses, phones and profiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    pub document: String,
    pub kind: CustomerKind,
    pub password_hash: String,
    pub profiles: BTreeSet<Profile>,
    pub addresses: Vec<NewAddress>,
    pub phones: BTreeSet<String>,
}

/// The only fields a customer update may change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerUpdate {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CustomerSortField {
    #[default]
    Name,
    Email,
    Id,
}

impl FromStr for CustomerSortField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "name" => Ok(CustomerSortField::Name),
            "email" => Ok(CustomerSortField::Email),
            "id" => Ok(CustomerSortField::Id),
            other => Err(DomainError::InvalidInput(format!(
                "cannot sort customers by '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CustomerSort {
    pub field: CustomerSortField,
    pub direction: SortDirection,
}

impl CustomerSort {
    pub fn parse(order_by: &str, direction: &str) -> Result<Self, DomainError> {
        Ok(Self {
            field: order_by.parse()?,
            direction: direction.parse()?,
        })
    }
}
