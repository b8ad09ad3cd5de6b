//! Principal resolution from trusted gateway headers.
//!
//! Authentication happens upstream; the gateway forwards the verified
//! identity as `X-User-Id`, `X-User-Email` and `X-User-Roles`. A request
//! without `X-User-Id` is anonymous. Headers that are present but malformed
//! reject the request instead of silently downgrading it to anonymous.

use std::collections::BTreeSet;
use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::http::header::HeaderMap;
use actix_web::{FromRequest, HttpRequest};

use crate::domain::access::{Principal, Profile};
use crate::errors::AppError;

pub const USER_ID_HEADER: &str = "X-User-Id";
pub const USER_EMAIL_HEADER: &str = "X-User-Email";
pub const USER_ROLES_HEADER: &str = "X-User-Roles";

/// The calling principal, if any.
#[derive(Debug, Clone)]
pub struct CurrentPrincipal(pub Option<Principal>);

impl CurrentPrincipal {
    pub fn get(&self) -> Option<&Principal> {
        self.0.as_ref()
    }
}

impl FromRequest for CurrentPrincipal {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(principal_from_headers(req.headers()).map(CurrentPrincipal))
    }
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Result<Option<&'a str>, AppError> {
    headers
        .get(name)
        .map(|v| {
            v.to_str()
                .map(str::trim)
                .map_err(|_| AppError::BadRequest(format!("{name} is not valid text")))
        })
        .transpose()
}

pub fn principal_from_headers(headers: &HeaderMap) -> Result<Option<Principal>, AppError> {
    let Some(raw_id) = header(headers, USER_ID_HEADER)? else {
        return Ok(None);
    };
    let id = raw_id
        .parse::<i32>()
        .map_err(|_| AppError::BadRequest(format!("invalid {USER_ID_HEADER}: '{raw_id}'")))?;

    let username = header(headers, USER_EMAIL_HEADER)?
        .filter(|e| !e.is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("{USER_EMAIL_HEADER} is required")))?;

    let roles = match header(headers, USER_ROLES_HEADER)? {
        Some(csv) => csv
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<Profile>())
            .collect::<Result<BTreeSet<_>, _>>()?,
        None => BTreeSet::new(),
    };

    Ok(Some(Principal {
        id,
        username: username.to_string(),
        roles,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut req = TestRequest::default();
        for (k, v) in pairs {
            req = req.insert_header((*k, *v));
        }
        req.to_http_request().headers().clone()
    }

    #[test]
    fn missing_id_is_anonymous() {
        assert_eq!(principal_from_headers(&headers(&[])).unwrap(), None);
    }

    #[test]
    fn full_headers_build_principal() {
        let p = principal_from_headers(&headers(&[
            (USER_ID_HEADER, "1"),
            (USER_EMAIL_HEADER, "a@x.com"),
            (USER_ROLES_HEADER, "ROLE_CUSTOMER, ADMIN"),
        ]))
        .unwrap()
        .unwrap();
        assert_eq!(p.id, 1);
        assert_eq!(p.username, "a@x.com");
        assert!(p.has_role(Profile::Admin));
        assert!(p.has_role(Profile::Customer));
    }

    #[test]
    fn roles_are_optional() {
        let p = principal_from_headers(&headers(&[
            (USER_ID_HEADER, "3"),
            (USER_EMAIL_HEADER, "c@x.com"),
        ]))
        .unwrap()
        .unwrap();
        assert!(p.roles.is_empty());
    }

    #[test]
    fn malformed_id_is_rejected() {
        let err = principal_from_headers(&headers(&[
            (USER_ID_HEADER, "abc"),
            (USER_EMAIL_HEADER, "a@x.com"),
        ]))
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn unknown_role_is_rejected() {
        let err = principal_from_headers(&headers(&[
            (USER_ID_HEADER, "1"),
            (USER_EMAIL_HEADER, "a@x.com"),
            (USER_ROLES_HEADER, "ROOT"),
        ]))
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn id_without_email_is_rejected() {
        let err = principal_from_headers(&headers(&[(USER_ID_HEADER, "1")])).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
