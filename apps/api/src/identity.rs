//! Resolves the caller's identity-provider user id from a request.
//!
//! Authentication itself happens upstream: the gateway verifies the session
//! and forwards the provider's user id in a header. Handlers receive the
//! result as `Option<IdentityId>` and pass it to the core explicitly.

use std::convert::Infallible;
use std::fmt;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderName};

use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityId(String);

impl IdentityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub trait IdentityResolver: Send + Sync {
    fn resolve(&self, headers: &HeaderMap) -> Option<IdentityId>;
}

/// Reads the identity from a header set by the authenticating proxy.
pub struct HeaderIdentityResolver {
    header: HeaderName,
}

impl HeaderIdentityResolver {
    pub fn new(header: HeaderName) -> Self {
        Self { header }
    }
}

impl IdentityResolver for HeaderIdentityResolver {
    fn resolve(&self, headers: &HeaderMap) -> Option<IdentityId> {
        let value = headers.get(&self.header)?.to_str().ok()?.trim();
        if value.is_empty() {
            None
        } else {
            Some(IdentityId::new(value))
        }
    }
}

/// Extractor for the current caller. Never rejects: a missing session is `None`.
pub struct CurrentIdentity(pub Option<IdentityId>);

#[async_trait]
impl FromRequestParts<AppState> for CurrentIdentity {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(CurrentIdentity(state.identity.resolve(&parts.headers)))
    }
}
