pub mod city_repo;
pub mod customer_repo;
pub mod models;
pub mod order_repo;
pub mod password;
pub mod thumbnail;

use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::domain::errors::DomainError;

pub use city_repo::DieselCityRepository;
pub use customer_repo::DieselCustomerRepository;
pub use order_repo::DieselOrderRepository;
pub use password::Argon2PasswordEncoder;
pub use thumbnail::JpegThumbnailer;

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<DieselError> for DomainError {
    fn from(e: DieselError) -> Self {
        match e {
            DieselError::DatabaseError(
                DatabaseErrorKind::UniqueViolation | DatabaseErrorKind::ForeignKeyViolation,
                info,
            ) => DomainError::DataIntegrity(info.message().to_string()),
            other => DomainError::Internal(other.to_string()),
        }
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}
