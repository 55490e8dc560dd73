//! Bearer API key authentication.
//!
//! Keys come from `auth.api_keys` in the config file. A request carrying a
//! known key gets a [`Principal`] in its extensions; route handlers then
//! check the principal's role against the right they need.

use crate::config::ApiKeyConfig;
use crate::error::ApiError;
use crate::server::AppState;
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use toolgate_policy::{authorize, Right, Role};

/// The authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub key_id: String,
    pub role: Role,
}

struct ApiKeyEntry {
    id: String,
    key: String,
    role: Role,
}

/// Configured keys, shared across requests.
#[derive(Clone, Default)]
pub struct ApiKeys {
    entries: Arc<Vec<ApiKeyEntry>>,
}

impl ApiKeys {
    pub fn new(keys: &[ApiKeyConfig]) -> Self {
        let entries = keys
            .iter()
            .map(|k| ApiKeyEntry {
                id: k.id.clone(),
                key: k.key.clone(),
                role: k.role,
            })
            .collect();
        Self {
            entries: Arc::new(entries),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every entry is compared so the time taken does not depend on which
    /// key matched.
    pub fn resolve(&self, presented: &str) -> Option<Principal> {
        let mut found = None;
        for entry in self.entries.iter() {
            let matches: bool = entry.key.as_bytes().ct_eq(presented.as_bytes()).into();
            if matches && found.is_none() {
                found = Some(Principal {
                    key_id: entry.id.clone(),
                    role: entry.role,
                });
            }
        }
        found
    }
}

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let principal = bearer_token(request.headers())
        .and_then(|token| state.keys.resolve(token))
        .ok_or_else(|| {
            tracing::debug!(path = %request.uri().path(), "Rejected unauthenticated request");
            ApiError::unauthorized()
        })?;

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

pub fn require(principal: &Principal, right: Right) -> Result<(), ApiError> {
    authorize(principal.role, right).map_err(|err| {
        tracing::warn!(key_id = %principal.key_id, error = %err, "Denied request");
        ApiError::forbidden()
    })
}
