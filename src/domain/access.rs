//! Resource-level access decisions.
//!
//! Every read or write of customer-owned data goes through [`AccessGuard`]
//! before the repository is touched. A request is permitted when the caller
//! is an administrator or owns the resource; anything else is denied, and a
//! request without a principal is always denied as unauthenticated.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::errors::DomainError;

pub type CustomerId = i32;

/// Role held by a principal. Stored as an integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Profile {
    Admin,
    Customer,
}

impl Profile {
    pub const fn code(self) -> i32 {
        match self {
            Profile::Admin => 1,
            Profile::Customer => 2,
        }
    }

    /// Decode a stored role code. Unknown codes are an error, never a silent `None`.
    pub fn from_code(code: i32) -> Result<Self, DomainError> {
        match code {
            1 => Ok(Profile::Admin),
            2 => Ok(Profile::Customer),
            other => Err(DomainError::InvalidInput(format!(
                "unknown profile code: {other}"
            ))),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Profile::Admin => "ADMIN",
            Profile::Customer => "CUSTOMER",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Profile {
    type Err = DomainError;

    /// Accepts `ADMIN`, `ROLE_ADMIN` (any case) or the numeric code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(code) = s.parse::<i32>() {
            return Profile::from_code(code);
        }
        let upper = s.to_ascii_uppercase();
        match upper.strip_prefix("ROLE_").unwrap_or(&upper) {
            "ADMIN" => Ok(Profile::Admin),
            "CUSTOMER" => Ok(Profile::Customer),
            _ => Err(DomainError::InvalidInput(format!("unknown profile: {s}"))),
        }
    }
}

/// The authenticated caller. Built once per request and never persisted here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: CustomerId,
    pub username: String,
    pub roles: BTreeSet<Profile>,
}

impl Principal {
    pub fn new(
        id: CustomerId,
        username: impl Into<String>,
        roles: impl IntoIterator<Item = Profile>,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            roles: roles.into_iter().collect(),
        }
    }

    pub fn has_role(&self, role: Profile) -> bool {
        self.roles.contains(&role)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Customer,
    Order,
}

impl ResourceKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Customer => "Customer",
            ResourceKind::Order => "Order",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target of an access check: who owns it and what it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceRef {
    pub owner_id: CustomerId,
    pub kind: ResourceKind,
}

impl ResourceRef {
    pub const fn new(kind: ResourceKind, owner_id: CustomerId) -> Self {
        Self { owner_id, kind }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    Unauthenticated,
    Forbidden,
}

impl DenyReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            DenyReason::Unauthenticated => "unauthenticated",
            DenyReason::Forbidden => "forbidden",
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Decision {
    Permit,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_permit(self) -> bool {
        matches!(self, Decision::Permit)
    }

    pub fn into_result(self) -> Result<(), DomainError> {
        match self {
            Decision::Permit => Ok(()),
            Decision::Deny(DenyReason::Unauthenticated) => Err(DomainError::Unauthenticated),
            Decision::Deny(DenyReason::Forbidden) => Err(DomainError::Forbidden),
        }
    }
}

/// Stateless authorization rules shared by every service.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessGuard;

impl AccessGuard {
    /// Permit admins, or the principal whose id equals `owner_id`.
    pub fn authorize_by_id(principal: Option<&Principal>, owner_id: CustomerId) -> Decision {
        Self::decide(principal, |p| p.id == owner_id)
    }

    /// Permit admins, or the principal whose username equals `target_username`.
    pub fn authorize_by_username(principal: Option<&Principal>, target_username: &str) -> Decision {
        Self::decide(principal, |p| p.username == target_username)
    }

    pub fn authorize_resource(principal: Option<&Principal>, resource: &ResourceRef) -> Decision {
        Self::authorize_by_id(principal, resource.owner_id)
    }

    /// Any authenticated principal, regardless of role or ownership.
    pub fn require_authenticated(principal: Option<&Principal>) -> Decision {
        Self::decide(principal, |_| true)
    }

    /// Administrator-only operations: there is no owner to match.
    pub fn require_admin(principal: Option<&Principal>) -> Decision {
        Self::decide(principal, |_| false)
    }

    fn decide(principal: Option<&Principal>, is_owner: impl FnOnce(&Principal) -> bool) -> Decision {
        let Some(principal) = principal else {
            return Decision::Deny(DenyReason::Unauthenticated);
        };
        let is_admin = principal.has_role(Profile::Admin);
        if is_admin || is_owner(principal) {
            Decision::Permit
        } else {
            Decision::Deny(DenyReason::Forbidden)
        }
    }
}
