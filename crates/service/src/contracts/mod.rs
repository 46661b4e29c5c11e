//! Storage contracts the authorization-server runtime calls.
//!
//! One trait per entity type. Implementations may be memory-backed, file-backed, or remote.
//! Operations a deployment does not offer return [`StoreError::NotSupported`](crate::errors::StoreError),
//! which is distinct from a lookup that simply finds nothing (`Ok(None)` / an empty stream).

pub mod application_store;
pub mod authorization_store;
pub mod scope_store;
pub mod token_store;

pub use application_store::ApplicationStore;
pub use authorization_store::AuthorizationStore;
pub use scope_store::ScopeStore;
pub use token_store::TokenStore;
