//! In-memory collaborators for unit tests.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use object_store::memory::InMemory;

use crate::application::{CustomerService, ProfilePictureSettings};
use crate::domain::access::{CustomerId, Principal, Profile};
use crate::domain::customer::{
    Address, City, CityId, Customer, CustomerKind, CustomerSort, CustomerSortField,
    CustomerSummary, CustomerUpdate, NewCustomer,
};
use crate::domain::errors::DomainError;
use crate::domain::order::{OrderId, OrderLineInput, OrderLineView, OrderView, STATUS_PENDING};
use crate::domain::page::{Page, PageRequest, SortDirection};
use crate::domain::ports::{
    CityRepository, CustomerRepository, ImageProcessor, OrderRepository, PasswordEncoder,
};

pub fn customer_principal(id: CustomerId, email: &str) -> Principal {
    Principal::new(id, email, [Profile::Customer])
}

pub fn admin() -> Principal {
    Principal::new(1000, "admin@store.test", [Profile::Admin, Profile::Customer])
}

pub fn sample_city(id: CityId) -> City {
    City {
        id,
        name: format!("City {id}"),
        state: "MG".to_string(),
    }
}

pub fn sample_customer(id: CustomerId, name: &str, email: &str) -> Customer {
    Customer {
        id,
        name: name.to_string(),
        email: email.to_string(),
        document: format!("{id:011}"),
        kind: CustomerKind::Individual,
        profiles: BTreeSet::from([Profile::Customer]),
        addresses: vec![Address {
            id,
            street: "Rua Flores".to_string(),
            number: "300".to_string(),
            complement: None,
            district: "Jardim".to_string(),
            zip_code: "38220834".to_string(),
            city: sample_city(1),
        }],
        phones: BTreeSet::from(["27363323".to_string()]),
    }
}

#[derive(Default)]
struct CustomerState {
    next_id: CustomerId,
    next_address_id: i32,
    customers: BTreeMap<CustomerId, Customer>,
    with_orders: BTreeSet<CustomerId>,
}

/// Customer store that also counts lookups, so tests can assert that access
/// checks run before the repository is queried.
#[derive(Default)]
pub struct InMemoryCustomerRepository {
    state: Mutex<CustomerState>,
    lookups: AtomicUsize,
}

impl InMemoryCustomerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, customer: Customer) {
        let mut state = self.state.lock().unwrap();
        state.next_id = state.next_id.max(customer.id + 1);
        state.next_address_id = state.next_address_id.max(customer.id + 1);
        state.customers.insert(customer.id, customer);
    }

    pub fn mark_has_orders(&self, id: CustomerId) {
        self.state.lock().unwrap().with_orders.insert(id);
    }

    pub fn get(&self, id: CustomerId) -> Option<Customer> {
        self.state.lock().unwrap().customers.get(&id).cloned()
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl CustomerRepository for InMemoryCustomerRepository {
    fn insert(&self, new: NewCustomer) -> Result<Customer, DomainError> {
        let mut state = self.state.lock().unwrap();
        if state.customers.values().any(|c| c.email == new.email) {
            return Err(DomainError::DataIntegrity(
                "email already registered".to_string(),
            ));
        }
        let id = state.next_id.max(1);
        state.next_id = id + 1;
        let mut addresses = Vec::new();
        for a in new.addresses {
            let address_id = state.next_address_id.max(1);
            state.next_address_id = address_id + 1;
            addresses.push(Address {
                id: address_id,
                street: a.street,
                number: a.number,
                complement: a.complement,
                district: a.district,
                zip_code: a.zip_code,
                city: sample_city(a.city_id),
            });
        }
        let customer = Customer {
            id,
            name: new.name,
            email: new.email,
            document: new.document,
            kind: new.kind,
            profiles: new.profiles,
            addresses,
            phones: new.phones,
        };
        state.customers.insert(id, customer.clone());
        Ok(customer)
    }

    fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, DomainError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.get(id))
    }

    fn find_by_email(&self, email: &str) -> Result<Option<Customer>, DomainError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock().unwrap();
        Ok(state.customers.values().find(|c| c.email == email).cloned())
    }

    fn update(&self, id: CustomerId, changes: &CustomerUpdate) -> Result<(), DomainError> {
        let mut state = self.state.lock().unwrap();
        if state
            .customers
            .values()
            .any(|c| c.id != id && c.email == changes.email)
        {
            return Err(DomainError::DataIntegrity(
                "email already registered".to_string(),
            ));
        }
        let customer = state
            .customers
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("Customer", id))?;
        customer.name = changes.name.clone();
        customer.email = changes.email.clone();
        Ok(())
    }

    fn delete(&self, id: CustomerId) -> Result<(), DomainError> {
        let mut state = self.state.lock().unwrap();
        if state.with_orders.contains(&id) {
            return Err(DomainError::DataIntegrity(
                "cannot delete a customer that has orders".to_string(),
            ));
        }
        state.customers.remove(&id);
        Ok(())
    }

    fn find_all(&self) -> Result<Vec<CustomerSummary>, DomainError> {
        let state = self.state.lock().unwrap();
        let mut all: Vec<CustomerSummary> =
            state.customers.values().map(CustomerSummary::from).collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    fn find_page(
        &self,
        request: PageRequest,
        sort: CustomerSort,
    ) -> Result<Page<CustomerSummary>, DomainError> {
        let mut all: Vec<CustomerSummary> = {
            let state = self.state.lock().unwrap();
            state.customers.values().map(CustomerSummary::from).collect()
        };
        all.sort_by(|a, b| match sort.field {
            CustomerSortField::Name => a.name.cmp(&b.name),
            CustomerSortField::Email => a.email.cmp(&b.email),
            CustomerSortField::Id => a.id.cmp(&b.id),
        });
        if sort.direction == SortDirection::Desc {
            all.reverse();
        }
        let total = all.len() as i64;
        let content = all
            .into_iter()
            .skip(usize::try_from(request.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(request.size).unwrap_or(usize::MAX))
            .collect();
        Ok(Page::new(content, total, request))
    }
}

/// Knows cities 1 through 3.
pub struct FixedCityRepository;

impl CityRepository for FixedCityRepository {
    fn find_by_id(&self, id: CityId) -> Result<Option<City>, DomainError> {
        Ok((1..=3).contains(&id).then(|| sample_city(id)))
    }
}

pub struct PlainPasswordEncoder;

impl PasswordEncoder for PlainPasswordEncoder {
    fn encode(&self, raw: &str) -> Result<String, DomainError> {
        Ok(format!("hashed:{raw}"))
    }
}

/// Tags the input instead of transcoding it.
pub struct TaggingImageProcessor;

impl ImageProcessor for TaggingImageProcessor {
    fn square_jpeg(&self, bytes: &[u8], size: u32) -> Result<Vec<u8>, DomainError> {
        let mut out = format!("jpeg:{size}:").into_bytes();
        out.extend_from_slice(bytes);
        Ok(out)
    }
}

pub fn customer_service<R: CustomerRepository>(
    repo: R,
    store: Arc<InMemory>,
) -> CustomerService<R> {
    CustomerService::new(
        repo,
        Arc::new(FixedCityRepository),
        Arc::new(PlainPasswordEncoder),
        Arc::new(TaggingImageProcessor),
        store,
        ProfilePictureSettings {
            prefix: "cp".to_string(),
            size: 200,
            public_base_url: "https://images.test/".to_string(),
        },
    )
}

#[derive(Default)]
pub struct InMemoryOrderRepository {
    orders: Mutex<BTreeMap<OrderId, OrderView>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OrderRepository for InMemoryOrderRepository {
    fn create(
        &self,
        customer_id: CustomerId,
        lines: Vec<OrderLineInput>,
    ) -> Result<OrderId, DomainError> {
        let mut orders = self.orders.lock().unwrap();
        let id = orders.keys().next_back().copied().unwrap_or(0) + 1;
        let lines = lines
            .into_iter()
            .enumerate()
            .map(|(i, l)| OrderLineView {
                id: i as i32 + 1,
                product_id: l.product_id,
                quantity: l.quantity,
                unit_price: l.unit_price,
            })
            .collect();
        orders.insert(
            id,
            OrderView {
                id,
                customer_id,
                status: STATUS_PENDING.to_string(),
                created_at: Utc::now(),
                lines,
            },
        );
        Ok(id)
    }

    fn find_by_id(&self, id: OrderId) -> Result<Option<OrderView>, DomainError> {
        Ok(self.orders.lock().unwrap().get(&id).cloned())
    }

    fn list(&self, request: PageRequest) -> Result<Page<OrderView>, DomainError> {
        let orders = self.orders.lock().unwrap();
        let total = orders.len() as i64;
        let content = orders
            .values()
            .rev()
            .skip(usize::try_from(request.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(request.size).unwrap_or(usize::MAX))
            .map(|o| OrderView {
                lines: vec![],
                ..o.clone()
            })
            .collect();
        Ok(Page::new(content, total, request))
    }
}
