use async_trait::async_trait;
use ftrack_core::DEFAULT_CALLER_ID;
use std::collections::BTreeMap;
use subtle::ConstantTimeEq;

use super::models::{AuthError, CallerIdentity};

/// Maps the presented credential (if any) to a caller identity.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve(&self, credential: Option<&str>) -> Result<CallerIdentity, AuthError>;
}

/// Fixed table of API key -> caller id.
pub struct StaticKeyResolver {
    keys: Vec<(String, String)>,
}

impl StaticKeyResolver {
    pub fn new(keys: &BTreeMap<String, String>) -> Self {
        Self {
            keys: keys
                .iter()
                .map(|(key, caller)| (key.clone(), caller.clone()))
                .collect(),
        }
    }
}

fn secure_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

#[async_trait]
impl IdentityResolver for StaticKeyResolver {
    async fn resolve(&self, credential: Option<&str>) -> Result<CallerIdentity, AuthError> {
        // Exact match only: padding is part of the presented key.
        let presented = credential
            .filter(|c| !c.is_empty())
            .ok_or(AuthError::MissingCredential)?;

        self.keys
            .iter()
            .find(|(key, _)| secure_compare(presented, key))
            .map(|(_, caller)| CallerIdentity::new(caller.clone()))
            .ok_or(AuthError::InvalidCredential)
    }
}

/// Development resolver: every request is the default caller, credential or not.
pub struct DevIdentityResolver;

#[async_trait]
impl IdentityResolver for DevIdentityResolver {
    async fn resolve(&self, _credential: Option<&str>) -> Result<CallerIdentity, AuthError> {
        Ok(CallerIdentity::new(DEFAULT_CALLER_ID))
    }
}
