//! In-process store facades.
//!
//! Applications and scopes live only in memory. Authorizations and tokens sit on a
//! [`JsonFileStore`](crate::storage::JsonFileStore) that rewrites its file after every mutation
//! when a path is configured.

pub mod application_store;
pub mod authorization_store;
pub mod scope_store;
pub mod token_store;

pub use application_store::MemoryApplicationStore;
pub use authorization_store::MemoryAuthorizationStore;
pub use scope_store::MemoryScopeStore;
pub use token_store::MemoryTokenStore;

use crate::storage::DuplicatePolicy;

/// Behaviour shared by every facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreOptions {
    pub duplicates: DuplicatePolicy,
}

impl StoreOptions {
    pub fn rejecting_duplicates(reject: bool) -> Self {
        let duplicates = if reject { DuplicatePolicy::Reject } else { DuplicatePolicy::Allow };
        Self { duplicates }
    }
}

/// Absent input is stored as the empty string.
pub(crate) fn or_empty(value: Option<&str>) -> String {
    value.unwrap_or_default().to_owned()
}

/// Empty foreign keys read back as `None`.
pub(crate) fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_owned())
}

/// Optional narrowing filter: `None` matches anything, `Some("")` is a caller error.
pub(crate) fn optional_key(
    value: Option<&str>,
    param: &'static str,
) -> Result<Option<String>, crate::errors::StoreError> {
    match value {
        Some(v) => {
            crate::errors::require_key(v, param)?;
            Ok(Some(v.to_owned()))
        }
        None => Ok(None),
    }
}
