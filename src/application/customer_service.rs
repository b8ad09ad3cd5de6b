use std::collections::BTreeSet;
use std::sync::Arc;

use log::{error, info};
use object_store::path::Path as ObjectPath;
use object_store::{ObjectStore, PutPayload};

use crate::domain::access::{AccessGuard, CustomerId, Principal, Profile, ResourceKind};
use crate::domain::customer::{
    Customer, CustomerKind, CustomerSort, CustomerSummary, CustomerUpdate, NewAddress, NewCustomer,
};
use crate::domain::errors::DomainError;
use crate::domain::page::{Page, PageRequest};
use crate::domain::ports::{CityRepository, CustomerRepository, ImageProcessor, PasswordEncoder};

use super::dto::{
    max_len, require, validate_email, validate_name, CustomerDto, NewCustomerDto, COMPLEMENT_MAX,
    DISTRICT_MAX, DOCUMENT_MAX, NUMBER_MAX, PHONE_MAX, STREET_MAX, ZIP_CODE_MAX,
};
use super::enforce;

/// Where and how profile pictures are stored.
#[derive(Debug, Clone)]
pub struct ProfilePictureSettings {
    /// Object name prefix; the file is `<prefix><customer id>.jpg`.
    pub prefix: String,
    /// Edge length in pixels of the stored square picture.
    pub size: u32,
    /// Base URL under which stored objects are publicly reachable.
    pub public_base_url: String,
}

pub struct CustomerService<R> {
    repo: R,
    cities: Arc<dyn CityRepository>,
    passwords: Arc<dyn PasswordEncoder>,
    images: Arc<dyn ImageProcessor>,
    storage: Arc<dyn ObjectStore>,
    pictures: ProfilePictureSettings,
}

impl<R: CustomerRepository> CustomerService<R> {
    pub fn new(
        repo: R,
        cities: Arc<dyn CityRepository>,
        passwords: Arc<dyn PasswordEncoder>,
        images: Arc<dyn ImageProcessor>,
        storage: Arc<dyn ObjectStore>,
        pictures: ProfilePictureSettings,
    ) -> Self {
        Self {
            repo,
            cities,
            passwords,
            images,
            storage,
            pictures,
        }
    }

    /// Authorization is checked before the lookup, so a denied caller never
    /// learns whether the customer exists.
    pub fn find(&self, principal: Option<&Principal>, id: CustomerId) -> Result<Customer, DomainError> {
        enforce(
            AccessGuard::authorize_by_id(principal, id),
            principal,
            format_args!("{} {}", ResourceKind::Customer, id),
        )?;
        self.repo
            .find_by_id(id)?
            .ok_or_else(|| DomainError::not_found(ResourceKind::Customer.as_str(), id))
    }

    pub fn find_by_email(
        &self,
        principal: Option<&Principal>,
        email: &str,
    ) -> Result<Customer, DomainError> {
        enforce(
            AccessGuard::authorize_by_username(principal, email),
            principal,
            format_args!("{} {}", ResourceKind::Customer, email),
        )?;
        self.repo
            .find_by_email(email)?
            .ok_or_else(|| DomainError::not_found(ResourceKind::Customer.as_str(), email))
    }

    pub fn find_all(&self, principal: Option<&Principal>) -> Result<Vec<CustomerSummary>, DomainError> {
        enforce(AccessGuard::require_admin(principal), principal, "customer list")?;
        self.repo.find_all()
    }

    pub fn find_page(
        &self,
        principal: Option<&Principal>,
        page: i64,
        lines_per_page: i64,
        order_by: &str,
        direction: &str,
    ) -> Result<Page<CustomerSummary>, DomainError> {
        enforce(AccessGuard::require_admin(principal), principal, "customer page")?;
        let sort = CustomerSort::parse(order_by, direction)?;
        self.repo
            .find_page(PageRequest::new(page, lines_per_page), sort)
    }

    /// Sign-up. Open to anonymous callers; every referenced city must exist.
    pub fn insert(&self, customer: NewCustomer) -> Result<Customer, DomainError> {
        for address in &customer.addresses {
            if self.cities.find_by_id(address.city_id)?.is_none() {
                return Err(DomainError::InvalidInput(format!(
                    "city {} does not exist",
                    address.city_id
                )));
            }
        }
        let saved = self.repo.insert(customer)?;
        info!("customer {} registered", saved.id);
        Ok(saved)
    }

    pub fn update(
        &self,
        principal: Option<&Principal>,
        id: CustomerId,
        changes: CustomerUpdate,
    ) -> Result<(), DomainError> {
        self.find(principal, id)?;
        self.repo.update(id, &changes)
    }

    pub fn delete(&self, principal: Option<&Principal>, id: CustomerId) -> Result<(), DomainError> {
        self.find(principal, id)?;
        self.repo.delete(id)?;
        info!("customer {} deleted", id);
        Ok(())
    }

    pub fn from_dto(&self, dto: CustomerDto) -> Result<CustomerUpdate, DomainError> {
        validate_name(&dto.name)?;
        validate_email(&dto.email)?;
        Ok(CustomerUpdate {
            name: dto.name.trim().to_string(),
            email: dto.email.trim().to_string(),
        })
    }

    /// Assemble the customer aggregate from the flat sign-up payload.
    pub fn from_new_dto(&self, dto: NewCustomerDto) -> Result<NewCustomer, DomainError> {
        validate_name(&dto.name)?;
        validate_email(&dto.email)?;
        require("document", &dto.document)?;
        require("password", &dto.password)?;
        require("phone1", &dto.phone1)?;
        max_len("document", &dto.document, DOCUMENT_MAX)?;
        max_len("street", &dto.street, STREET_MAX)?;
        max_len("number", &dto.number, NUMBER_MAX)?;
        if let Some(complement) = &dto.complement {
            max_len("complement", complement, COMPLEMENT_MAX)?;
        }
        max_len("district", &dto.district, DISTRICT_MAX)?;
        max_len("zip_code", &dto.zip_code, ZIP_CODE_MAX)?;
        for (field, phone) in [
            ("phone1", Some(&dto.phone1)),
            ("phone2", dto.phone2.as_ref()),
            ("phone3", dto.phone3.as_ref()),
        ] {
            if let Some(phone) = phone {
                max_len(field, phone.trim(), PHONE_MAX)?;
            }
        }
        let kind = CustomerKind::from_code(dto.kind)?;
        let password_hash = self.passwords.encode(&dto.password)?;

        let address = NewAddress {
            street: dto.street,
            number: dto.number,
            complement: dto.complement.filter(|c| !c.trim().is_empty()),
            district: dto.district,
            zip_code: dto.zip_code,
            city_id: dto.city_id,
        };

        let phones: BTreeSet<String> = std::iter::once(dto.phone1)
            .chain(dto.phone2)
            .chain(dto.phone3)
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();

        Ok(NewCustomer {
            name: dto.name.trim().to_string(),
            email: dto.email.trim().to_string(),
            document: dto.document,
            kind,
            password_hash,
            profiles: BTreeSet::from([Profile::Customer]),
            addresses: vec![address],
            phones,
        })
    }

    /// Store the caller's picture as a square JPEG and return its public URL.
    pub async fn upload_profile_picture(
        &self,
        principal: Option<&Principal>,
        bytes: Vec<u8>,
    ) -> Result<String, DomainError> {
        enforce(
            AccessGuard::require_authenticated(principal),
            principal,
            "profile picture",
        )?;
        let Some(principal) = principal else {
            return Err(DomainError::Unauthenticated);
        };
        if bytes.is_empty() {
            return Err(DomainError::InvalidInput("image is empty".to_string()));
        }

        let images = Arc::clone(&self.images);
        let size = self.pictures.size;
        let jpeg = tokio::task::spawn_blocking(move || images.square_jpeg(&bytes, size))
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))??;

        let file_name = format!("{}{}.jpg", self.pictures.prefix, principal.id);
        self.storage
            .put(&ObjectPath::from(file_name.as_str()), PutPayload::from(jpeg))
            .await
            .map_err(|e| {
                error!("failed to store {}: {}", file_name, e);
                DomainError::Internal(e.to_string())
            })?;

        info!("profile picture stored for customer {}", principal.id);
        Ok(format!(
            "{}/{}",
            self.pictures.public_base_url.trim_end_matches('/'),
            file_name
        ))
    }
}
