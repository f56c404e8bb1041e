//! Bearer-token extraction for protected handlers.
//!
//! Handlers take a [`BearerUser`] argument; extraction fails with
//! `401 Unauthorized` before the handler body runs when the
//! `Authorization` header is missing, malformed, or carries a token the
//! issuer rejects.

use std::future::{Ready, ready};

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use tracing::debug;

use crate::domain::{AuthenticatedUser, Error, UserId};

use super::state::HttpState;

const BEARER_PREFIX: &str = "Bearer ";

/// Authenticated caller derived from the request's bearer token.
#[derive(Debug, Clone)]
pub struct BearerUser(AuthenticatedUser);

impl BearerUser {
    /// Caller's user id.
    pub fn id(&self) -> &UserId {
        self.0.id()
    }
}

fn bearer_token(req: &HttpRequest) -> Result<&str, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("login required"))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized("malformed authorization header"))?;
    let token = match value.split_at_checked(BEARER_PREFIX.len()) {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case(BEARER_PREFIX) => rest.trim(),
        _ => return Err(Error::unauthorized("authorization scheme must be Bearer")),
    };
    if token.is_empty() {
        return Err(Error::unauthorized("bearer token must not be empty"));
    }
    Ok(token)
}

fn authenticate(req: &HttpRequest) -> Result<BearerUser, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("HTTP state is not configured"))?;
    let token = bearer_token(req)?;
    let user = state.issuer.authenticate(token).inspect_err(|err| {
        debug!(reason = err.message(), "bearer token rejected");
    })?;
    Ok(BearerUser(user))
}

impl FromRequest for BearerUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
