use std::sync::Arc;

use super::access::CustomerId;
use super::customer::{City, CityId, Customer, CustomerSort, CustomerSummary, CustomerUpdate, NewCustomer};
use super::errors::DomainError;
use super::order::{OrderId, OrderLineInput, OrderView};
use super::page::{Page, PageRequest};

pub trait CustomerRepository: Send + Sync + 'static {
    /// Persist the whole aggregate atomically and return it with assigned ids.
    fn insert(&self, customer: NewCustomer) -> Result<Customer, DomainError>;
    fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, DomainError>;
    fn find_by_email(&self, email: &str) -> Result<Option<Customer>, DomainError>;
    fn update(&self, id: CustomerId, changes: &CustomerUpdate) -> Result<(), DomainError>;
    fn delete(&self, id: CustomerId) -> Result<(), DomainError>;
    fn find_all(&self) -> Result<Vec<CustomerSummary>, DomainError>;
    fn find_page(
        &self,
        request: PageRequest,
        sort: CustomerSort,
    ) -> Result<Page<CustomerSummary>, DomainError>;
}

pub trait CityRepository: Send + Sync + 'static {
    fn find_by_id(&self, id: CityId) -> Result<Option<City>, DomainError>;
}

pub trait OrderRepository: Send + Sync + 'static {
    fn create(&self, customer_id: CustomerId, lines: Vec<OrderLineInput>)
        -> Result<OrderId, DomainError>;
    fn find_by_id(&self, id: OrderId) -> Result<Option<OrderView>, DomainError>;
    fn list(&self, request: PageRequest) -> Result<Page<OrderView>, DomainError>;
}

pub trait PasswordEncoder: Send + Sync + 'static {
    fn encode(&self, raw: &str) -> Result<String, DomainError>;
}

pub trait ImageProcessor: Send + Sync + 'static {
    /// Decode `bytes`, crop to a centered square, resize to `size` pixels and encode as JPEG.
    fn square_jpeg(&self, bytes: &[u8], size: u32) -> Result<Vec<u8>, DomainError>;
}

impl<T: CustomerRepository + ?Sized> CustomerRepository for Arc<T> {
    fn insert(&self, customer: NewCustomer) -> Result<Customer, DomainError> {
        (**self).insert(customer)
    }
    fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, DomainError> {
        (**self).find_by_id(id)
    }
    fn find_by_email(&self, email: &str) -> Result<Option<Customer>, DomainError> {
        (**self).find_by_email(email)
    }
    fn update(&self, id: CustomerId, changes: &CustomerUpdate) -> Result<(), DomainError> {
        (**self).update(id, changes)
    }
    fn delete(&self, id: CustomerId) -> Result<(), DomainError> {
        (**self).delete(id)
    }
    fn find_all(&self) -> Result<Vec<CustomerSummary>, DomainError> {
        (**self).find_all()
    }
    fn find_page(
        &self,
        request: PageRequest,
        sort: CustomerSort,
    ) -> Result<Page<CustomerSummary>, DomainError> {
        (**self).find_page(request, sort)
    }
}

impl<T: OrderRepository + ?Sized> OrderRepository for Arc<T> {
    fn create(&self, customer_id: CustomerId, lines: Vec<OrderLineInput>)
        -> Result<OrderId, DomainError> {
        (**self).create(customer_id, lines)
    }
    fn find_by_id(&self, id: OrderId) -> Result<Option<OrderView>, DomainError> {
        (**self).find_by_id(id)
    }
    fn list(&self, request: PageRequest) -> Result<Page<OrderView>, DomainError> {
        (**self).list(request)
    }
}
